use convivio_core::{
    new_id, now_timestamp, AddCommentRequest, Comment, CreatePostRequest, Like, Post,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::auth::AuthUser;
use crate::error::ApiError;

const POST_SELECT: &str =
    "SELECT post_id, user_id, text, name, avatar, likes, comments, created_at FROM posts";

fn post_from_row(row: &SqliteRow) -> Result<Post, ApiError> {
    let likes: Vec<Like> = serde_json::from_str(&row.try_get::<String, _>("likes")?)?;
    let comments: Vec<Comment> = serde_json::from_str(&row.try_get::<String, _>("comments")?)?;
    Ok(Post {
        post_id: row.try_get("post_id")?,
        user: row.try_get("user_id")?,
        text: row.try_get("text")?,
        name: row.try_get("name")?,
        avatar: row.try_get("avatar")?,
        likes,
        comments,
        created_at: row.try_get("created_at")?,
    })
}

fn post_not_found() -> ApiError {
    ApiError::NotFound("Post not found".to_string())
}

async fn store_likes(pool: &SqlitePool, post_id: &str, likes: &[Like]) -> Result<(), ApiError> {
    sqlx::query("UPDATE posts SET likes = ? WHERE post_id = ?")
        .bind(serde_json::to_string(likes)?)
        .bind(post_id)
        .execute(pool)
        .await?;
    Ok(())
}

async fn store_comments(
    pool: &SqlitePool,
    post_id: &str,
    comments: &[Comment],
) -> Result<(), ApiError> {
    sqlx::query("UPDATE posts SET comments = ? WHERE post_id = ?")
        .bind(serde_json::to_string(comments)?)
        .bind(post_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Crea un post: name/avatar dell'autore vengono copiati dentro il post alla
/// creazione e non seguono le modifiche successive del profilo.
pub async fn create_post(
    pool: &SqlitePool,
    author: &AuthUser,
    req: CreatePostRequest,
) -> Result<Post, ApiError> {
    let post_id = new_id();
    sqlx::query(
        "INSERT INTO posts (post_id, user_id, text, name, avatar, likes, comments, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&post_id)
    .bind(&author.user_id)
    .bind(&req.text)
    .bind(&author.name)
    .bind(&author.avatar)
    .bind("[]")
    .bind("[]")
    .bind(now_timestamp())
    .execute(pool)
    .await?;
    get_post(pool, &post_id).await
}

/// Tutti i post, il più recente per primo.
pub async fn list_posts(pool: &SqlitePool) -> Result<Vec<Post>, ApiError> {
    let rows = sqlx::query(&format!(
        "{} ORDER BY created_at DESC, rowid DESC",
        POST_SELECT
    ))
    .fetch_all(pool)
    .await?;
    rows.iter().map(post_from_row).collect()
}

pub async fn get_post(pool: &SqlitePool, post_id: &str) -> Result<Post, ApiError> {
    let row = sqlx::query(&format!("{} WHERE post_id = ?", POST_SELECT))
        .bind(post_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(post_not_found)?;
    post_from_row(&row)
}

/// Solo il proprietario può cancellare il post.
pub async fn delete_post(
    pool: &SqlitePool,
    post_id: &str,
    requester_id: &str,
) -> Result<(), ApiError> {
    let post = get_post(pool, post_id).await?;
    if post.user != requester_id {
        return Err(ApiError::Forbidden("User not authorized".to_string()));
    }
    sqlx::query("DELETE FROM posts WHERE post_id = ?")
        .bind(post_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Mette un like: al più uno per utente, controllato per appartenenza.
/// Il check-then-act sul documento letto non è atomico: due like concorrenti
/// dello stesso utente restano una corsa nota di questo modello.
pub async fn like_post(
    pool: &SqlitePool,
    post_id: &str,
    user_id: &str,
) -> Result<Vec<Like>, ApiError> {
    let post = get_post(pool, post_id).await?;
    if post.likes.iter().any(|l| l.user == user_id) {
        return Err(ApiError::BadRequest("User already liked post".to_string()));
    }
    let mut likes = post.likes;
    likes.insert(
        0,
        Like {
            user: user_id.to_string(),
        },
    );
    store_likes(pool, post_id, &likes).await?;
    Ok(likes)
}

/// Toglie il like: errore se l'utente non aveva messo like.
pub async fn unlike_post(
    pool: &SqlitePool,
    post_id: &str,
    user_id: &str,
) -> Result<Vec<Like>, ApiError> {
    let post = get_post(pool, post_id).await?;
    let mut likes = post.likes;
    let idx = likes
        .iter()
        .position(|l| l.user == user_id)
        .ok_or_else(|| ApiError::BadRequest("User has not liked post".to_string()))?;
    likes.remove(idx);
    store_likes(pool, post_id, &likes).await?;
    Ok(likes)
}

/// Aggiunge un commento in testa, con snapshot di name/avatar dell'autore.
pub async fn add_comment(
    pool: &SqlitePool,
    author: &AuthUser,
    post_id: &str,
    req: AddCommentRequest,
) -> Result<Vec<Comment>, ApiError> {
    let post = get_post(pool, post_id).await?;
    let mut comments = post.comments;
    comments.insert(
        0,
        Comment {
            id: new_id(),
            user: author.user_id.clone(),
            text: req.text,
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            created_at: now_timestamp(),
        },
    );
    store_comments(pool, post_id, &comments).await?;
    Ok(comments)
}

/// Rimuove un commento: solo l'autore del commento può farlo.
/// L'indice da rimuovere si cerca per id del commento già risolto, mai per
/// autore: un utente con più commenti sullo stesso post perde solo quello chiesto.
pub async fn remove_comment(
    pool: &SqlitePool,
    post_id: &str,
    comment_id: &str,
    requester_id: &str,
) -> Result<Vec<Comment>, ApiError> {
    let post = get_post(pool, post_id).await?;
    let mut comments = post.comments;
    let idx = comments
        .iter()
        .position(|c| c.id == comment_id)
        .ok_or_else(|| ApiError::NotFound("Comment does not exist".to_string()))?;
    if comments[idx].user != requester_id {
        return Err(ApiError::Forbidden("Unauthorized request".to_string()));
    }
    comments.remove(idx);
    store_comments(pool, post_id, &comments).await?;
    Ok(comments)
}
