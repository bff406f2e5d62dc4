use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use std::sync::Arc;

use crate::controllers;
use crate::{health_with_pool, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/health",
            get(|Extension(state): Extension<Arc<AppState>>| async move {
                health_with_pool(&state.pool).await
            }),
        )
        .route("/api/register", post(controllers::register))
        .route("/api/login", post(controllers::login))
        .route("/api/profile/me", get(controllers::my_profile))
        .route(
            "/api/profile",
            post(controllers::upsert_profile)
                .get(controllers::list_profiles)
                .delete(controllers::delete_account),
        )
        .route("/api/profile/user/:user_id", get(controllers::profile_by_user))
        .route("/api/profile/experience", put(controllers::add_experience))
        .route(
            "/api/profile/experience/:exp_id",
            delete(controllers::remove_experience),
        )
        .route("/api/profile/education", put(controllers::add_education))
        .route(
            "/api/profile/education/:edu_id",
            delete(controllers::remove_education),
        )
        .route(
            "/api/posts",
            get(controllers::list_posts).post(controllers::create_post),
        )
        .route(
            "/api/posts/:id",
            get(controllers::get_post).delete(controllers::delete_post),
        )
        .route("/api/posts/like/:id", put(controllers::like_post))
        .route("/api/posts/unlike/:id", put(controllers::unlike_post))
        .route("/api/posts/comment/:id", post(controllers::add_comment))
        .route(
            "/api/posts/comment/:id/:comment_id",
            delete(controllers::remove_comment),
        )
        .layer(Extension(state))
}
