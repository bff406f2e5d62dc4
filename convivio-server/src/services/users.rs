use convivio_core::{
    new_id, now_timestamp, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User,
};
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};

use crate::error::ApiError;

// hash semplice della password
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// URL Gravatar derivato dall'e-mail (digest dell'indirizzo minuscolo e trimmato).
pub fn gravatar_url(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{:x}?s=200&r=pg&d=mm",
        hasher.finalize()
    )
}

/// Registra un nuovo utente e apre subito una sessione (token UUIDv4).
pub async fn register(pool: &SqlitePool, req: RegisterRequest) -> Result<RegisterResponse, ApiError> {
    // controllo se l'e-mail esiste già
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(&req.email)
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let user_id = new_id();
    let token = new_id();
    let avatar = gravatar_url(&req.email);
    let created_at = now_timestamp();

    sqlx::query(
        "INSERT INTO users (user_id, name, email, password_hash, avatar, token, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&user_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(hash_password(&req.password))
    .bind(&avatar)
    .bind(&token)
    .bind(&created_at)
    .execute(pool)
    .await?;

    let user = User {
        user_id,
        name: req.name,
        email: req.email,
        avatar,
        created_at,
    };
    Ok(RegisterResponse { user, token })
}

/// Verifica le credenziali e ruota il token di sessione.
pub async fn login(pool: &SqlitePool, req: LoginRequest) -> Result<LoginResponse, ApiError> {
    let row = sqlx::query(
        "SELECT user_id, name, password_hash, avatar, created_at FROM users WHERE email = ?",
    )
    .bind(&req.email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    let user_id: String = row.try_get("user_id").map_err(ApiError::internal)?;
    let name: String = row.try_get("name").map_err(ApiError::internal)?;
    let stored_hash: String = row.try_get("password_hash").map_err(ApiError::internal)?;
    let avatar: String = row.try_get("avatar").map_err(ApiError::internal)?;
    let created_at: String = row.try_get("created_at").map_err(ApiError::internal)?;

    // confronto dell'hash calcolato con quello salvato
    if hash_password(&req.password) != stored_hash {
        return Err(ApiError::Unauthorized("invalid credentials".to_string()));
    }

    // genera token nuovo e aggiorna
    let token = new_id();
    sqlx::query("UPDATE users SET token = ? WHERE user_id = ?")
        .bind(&token)
        .bind(&user_id)
        .execute(pool)
        .await?;

    let user = User {
        user_id,
        name,
        email: req.email,
        avatar,
        created_at,
    };
    Ok(LoginResponse { token, user })
}
