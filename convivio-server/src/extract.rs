use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
};

use crate::error::{ApiError, FieldError};

/// Estrattore del body JSON per gli handler: il rifiuto di default di axum
/// risponde 422 text/plain, mentre i client si aspettano sempre un 400 nella
/// forma condivisa `{code, message, details}`.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(ApiJson(value)),
            // campo obbligatorio assente o di tipo sbagliato: stessa forma
            // aggregata degli errori di validazione per-campo
            Err(rejection @ JsonRejection::JsonDataError(_)) => {
                Err(ApiError::Validation(vec![FieldError {
                    field: "body".to_string(),
                    message: rejection.body_text(),
                }]))
            }
            // JSON sintatticamente rotto, content-type mancante, body illeggibile
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}
