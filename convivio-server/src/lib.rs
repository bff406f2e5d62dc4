use anyhow::Context;
use axum::http::StatusCode;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

/// Stato condiviso tra gli handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Se true, la cancellazione dell'account elimina anche i post dell'utente
    /// nella stessa transazione. Di default i post restano (comportamento storico).
    pub cascade_delete_posts: bool,
}

// Dato un percorso di file, restituisce un URL SQLite valido. Crea le directory genitrici se non esistono.
pub fn sqlite_url_for_path(p: &Path) -> anyhow::Result<String> {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dirs for {:?}", parent))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(&abs)
        .with_context(|| format!("create/open sqlite file {:?}", abs))?;
    let s = abs.to_string_lossy().replace('\\', "/");
    Ok(format!("sqlite:///{}", s))
}

/// Crea un DB URL SQLite leggendo la variabile d'ambiente DATABASE_URL.
/// Se non è impostata, usa "convivio.db" nella directory corrente.
pub fn build_sqlite_url() -> anyhow::Result<String> {
    let raw = std::env::var("DATABASE_URL").unwrap_or_else(|_| "convivio.db".to_string());
    if raw == "sqlite::memory:" {
        return Ok(raw);
    }
    // Rimuovi il prefisso "sqlite://" se presente, per ottenere il percorso del file.
    let path_part = if raw.starts_with("sqlite://") {
        raw.trim_start_matches("sqlite:///")
            .trim_start_matches("sqlite://")
            .to_string()
    } else {
        raw
    };
    sqlite_url_for_path(&PathBuf::from(path_part))
}

/// Legge il flag CASCADE_DELETE_POSTS dall'ambiente (default: disattivo).
pub fn cascade_delete_posts_from_env() -> bool {
    matches!(
        std::env::var("CASCADE_DELETE_POSTS").as_deref(),
        Ok("1") | Ok("true")
    )
}

// Connect to the database and return a connection pool.
pub async fn connect_pool(db_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(db_url)
        .await
        .with_context(|| format!("connect to sqlite via {}", db_url))?;
    Ok(pool)
}

// Esegue le migrazioni del database. Crea le tabelle se non esistono.
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    // Enable foreign keys (SQLite)
    sqlx::query("PRAGMA foreign_keys = ON;")
        .execute(pool)
        .await
        .context("enable foreign_keys")?;

    let stmts = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id       TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            avatar        TEXT NOT NULL,
            token         TEXT,
            created_at    TEXT NOT NULL
        );"#,
        // Le collezioni annidate del profilo (skills, social, esperienze, studi)
        // vivono come colonne JSON: il documento si riscrive per intero, come
        // farebbe un document store.
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            user_id        TEXT PRIMARY KEY,
            company        TEXT NOT NULL DEFAULT '',
            website        TEXT NOT NULL DEFAULT '',
            location       TEXT NOT NULL DEFAULT '',
            bio            TEXT NOT NULL DEFAULT '',
            status         TEXT NOT NULL,
            githubusername TEXT NOT NULL DEFAULT '',
            skills         TEXT NOT NULL,
            social         TEXT NOT NULL,
            experience     TEXT NOT NULL,
            education      TEXT NOT NULL,
            created_at     TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(user_id)
        );"#,
        // Niente vincolo FK sul proprietario: il post è un'entità indipendente
        // e di default sopravvive alla cancellazione dell'account.
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            post_id    TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL,
            text       TEXT NOT NULL,
            name       TEXT NOT NULL,
            avatar     TEXT NOT NULL,
            likes      TEXT NOT NULL,
            comments   TEXT NOT NULL,
            created_at TEXT NOT NULL
        );"#,
    ];
    // applica ogni statement di migrazione
    for s in &stmts {
        sqlx::query(s)
            .execute(pool)
            .await
            .with_context(|| format!("apply migration: {}", &s[..s.len().min(40)].replace('\n', " ")))?;
    }
    Ok(())
}

pub mod auth;
pub mod controllers;
pub mod error;
pub mod extract;
pub mod routes;
pub mod services;
pub mod validate;

/// Controlla lo stato di salute del database tentando di acquisire una connessione dal pool.
pub async fn health_with_pool(pool: &SqlitePool) -> StatusCode {
    match pool.acquire().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
