use std::sync::Arc;

use anyhow::anyhow;
use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use sqlx::Row;

use crate::{error::ApiError, AppState};

/// Identità autenticata risolta dal token di sessione. Gli handler che la
/// estraggono sono protetti: senza token valido la richiesta muore qui con 401,
/// nessuna identità di ripiego.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    /// name/avatar correnti dell'utente, pronti per gli snapshot di post e commenti.
    pub name: String,
    pub avatar: String,
}

// Il token arriva nell'header x-auth-token (convenzione del client) oppure
// come Authorization: Bearer.
fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(v) = parts.headers.get("x-auth-token").and_then(|v| v.to_str().ok()) {
        return Some(v.to_string());
    }
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = parts
            .extensions
            .get::<Arc<AppState>>()
            .cloned()
            .ok_or_else(|| ApiError::internal(anyhow!("AppState extension missing")))?;

        let token = token_from_parts(parts)
            .ok_or_else(|| ApiError::Unauthorized("No token, authorization denied".to_string()))?;

        let row = sqlx::query("SELECT user_id, name, avatar FROM users WHERE token = ?")
            .bind(&token)
            .fetch_optional(&state.pool)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Token is not valid".to_string()))?;

        Ok(AuthUser {
            user_id: row.try_get("user_id").map_err(ApiError::internal)?,
            name: row.try_get("name").map_err(ApiError::internal)?,
            avatar: row.try_get("avatar").map_err(ApiError::internal)?,
        })
    }
}
