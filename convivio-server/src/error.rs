use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use convivio_core::Error;
use serde::Serialize;
use serde_json::json;

/// Errore di validazione di un singolo campo, aggregato nella risposta 400.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Tassonomia degli errori degli handler: ogni variante ha uno status e un
/// codice stabile sul wire. Il dettaglio degli errori interni finisce nei log,
/// mai nella risposta.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// Credenziale assente o non valida (gate di autenticazione).
    #[error("{0}")]
    Unauthorized(String),
    /// Violazione di proprietà su post/commenti. Sul wire resta un 401,
    /// come si aspettano i client esistenti.
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn internal<E: Into<anyhow::Error>>(err: E) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Error {
                    code: "validation_error".to_string(),
                    message: "invalid request".to_string(),
                    details: Some(json!({ "errors": errors })),
                },
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Error {
                    code: "bad_request".to_string(),
                    message,
                    details: None,
                },
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Error {
                    code: "not_found".to_string(),
                    message,
                    details: None,
                },
            ),
            ApiError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                Error {
                    code: "unauthorized".to_string(),
                    message,
                    details: None,
                },
            ),
            ApiError::Forbidden(message) => (
                StatusCode::UNAUTHORIZED,
                Error {
                    code: "forbidden".to_string(),
                    message,
                    details: None,
                },
            ),
            ApiError::Internal(err) => {
                tracing::error!("internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Error {
                        code: "internal_error".to_string(),
                        message: "Server Error".to_string(),
                        details: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
