use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use convivio_core::{
    AddCommentRequest, AddEducationRequest, AddExperienceRequest, ApiMessage, CommentsResponse,
    CreatePostRequest, LikesResponse, ListPostsResponse, ListProfilesResponse, LoginRequest,
    LoginResponse, Post, Profile, RegisterRequest, RegisterResponse, UpsertProfileRequest,
};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::{services, validate, AppState};

/// Handler per POST /api/register
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    validate::check(&req)?;
    let resp = services::users::register(&state.pool, req).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// Handler per POST /api/login
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    validate::check(&req)?;
    let resp = services::users::login(&state.pool, req).await?;
    Ok(Json(resp))
}

/// Handler per GET /api/profile/me
pub async fn my_profile(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = services::profiles::get_own_profile(&state.pool, &auth.user_id).await?;
    Ok(Json(profile))
}

/// Handler per POST /api/profile (upsert)
pub async fn upsert_profile(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(req): ApiJson<UpsertProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    validate::check_profile(&req)?;
    let profile = services::profiles::upsert_profile(&state.pool, &auth.user_id, req).await?;
    Ok(Json(profile))
}

/// Handler per GET /api/profile (pubblico)
pub async fn list_profiles(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<ListProfilesResponse>, ApiError> {
    let profiles = services::profiles::list_profiles(&state.pool).await?;
    Ok(Json(ListProfilesResponse { profiles }))
}

/// Handler per GET /api/profile/user/:user_id (pubblico)
pub async fn profile_by_user(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let profile = services::profiles::get_profile_by_user(&state.pool, &user_id).await?;
    Ok(Json(profile))
}

/// Handler per DELETE /api/profile: elimina profilo e utente.
pub async fn delete_account(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ApiMessage>, ApiError> {
    services::profiles::delete_account(&state.pool, &auth.user_id, state.cascade_delete_posts)
        .await?;
    Ok(Json(ApiMessage {
        message: "User deleted".to_string(),
    }))
}

/// Handler per PUT /api/profile/experience
pub async fn add_experience(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(req): ApiJson<AddExperienceRequest>,
) -> Result<Json<Profile>, ApiError> {
    validate::check(&req)?;
    let profile = services::profiles::add_experience(&state.pool, &auth.user_id, req).await?;
    Ok(Json(profile))
}

/// Handler per DELETE /api/profile/experience/:exp_id
pub async fn remove_experience(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
    Path(exp_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let profile = services::profiles::remove_experience(&state.pool, &auth.user_id, &exp_id).await?;
    Ok(Json(profile))
}

/// Handler per PUT /api/profile/education
pub async fn add_education(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(req): ApiJson<AddEducationRequest>,
) -> Result<Json<Profile>, ApiError> {
    validate::check(&req)?;
    let profile = services::profiles::add_education(&state.pool, &auth.user_id, req).await?;
    Ok(Json(profile))
}

/// Handler per DELETE /api/profile/education/:edu_id
pub async fn remove_education(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
    Path(edu_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let profile = services::profiles::remove_education(&state.pool, &auth.user_id, &edu_id).await?;
    Ok(Json(profile))
}

/// Handler per GET /api/posts
pub async fn list_posts(
    Extension(state): Extension<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<Json<ListPostsResponse>, ApiError> {
    let posts = services::posts::list_posts(&state.pool).await?;
    Ok(Json(ListPostsResponse { posts }))
}

/// Handler per GET /api/posts/:id
pub async fn get_post(
    Extension(state): Extension<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post = services::posts::get_post(&state.pool, &id).await?;
    Ok(Json(post))
}

/// Handler per POST /api/posts
pub async fn create_post(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    validate::check(&req)?;
    let post = services::posts::create_post(&state.pool, &auth, req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Handler per DELETE /api/posts/:id (solo il proprietario)
pub async fn delete_post(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>, ApiError> {
    services::posts::delete_post(&state.pool, &id, &auth.user_id).await?;
    Ok(Json(ApiMessage {
        message: "Post removed".to_string(),
    }))
}

/// Handler per PUT /api/posts/like/:id
pub async fn like_post(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<LikesResponse>, ApiError> {
    let likes = services::posts::like_post(&state.pool, &id, &auth.user_id).await?;
    Ok(Json(LikesResponse { likes }))
}

/// Handler per PUT /api/posts/unlike/:id
pub async fn unlike_post(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<LikesResponse>, ApiError> {
    let likes = services::posts::unlike_post(&state.pool, &id, &auth.user_id).await?;
    Ok(Json(LikesResponse { likes }))
}

/// Handler per POST /api/posts/comment/:id
pub async fn add_comment(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AddCommentRequest>,
) -> Result<Json<CommentsResponse>, ApiError> {
    validate::check(&req)?;
    let comments = services::posts::add_comment(&state.pool, &auth, &id, req).await?;
    Ok(Json(CommentsResponse { comments }))
}

/// Handler per DELETE /api/posts/comment/:id/:comment_id
pub async fn remove_comment(
    Extension(state): Extension<Arc<AppState>>,
    auth: AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let comments =
        services::posts::remove_comment(&state.pool, &id, &comment_id, &auth.user_id).await?;
    Ok(Json(CommentsResponse { comments }))
}
