use convivio_core::UpsertProfileRequest;
use validator::Validate;

use crate::error::{ApiError, FieldError};

// Appiattisce gli errori della derive Validate in una lista campo/messaggio.
fn collect<T: Validate>(req: &T) -> Vec<FieldError> {
    let mut fields = Vec::new();
    if let Err(errors) = req.validate() {
        for (field, errs) in errors.field_errors() {
            for e in errs {
                let message = e
                    .message
                    .clone()
                    .map(|m| m.into_owned())
                    .unwrap_or_else(|| "invalid value".to_string());
                fields.push(FieldError {
                    field: field.to_string(),
                    message,
                });
            }
        }
    }
    fields
}

/// Esegue i controlli dichiarativi per-campo del DTO e aggrega tutti gli
/// errori in un unico 400.
pub fn check<T: Validate>(req: &T) -> Result<(), ApiError> {
    let fields = collect(req);
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(fields))
    }
}

/// Come `check`, più il controllo sulle skill che la derive non copre
/// (l'input può essere lista o stringa CSV).
pub fn check_profile(req: &UpsertProfileRequest) -> Result<(), ApiError> {
    let mut fields = collect(req);
    if req.skills.is_empty() {
        fields.push(FieldError {
            field: "skills".to_string(),
            message: "Skills is required".to_string(),
        });
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(fields))
    }
}
