use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

// ri-utilizziamo le funzioni e strutture definite in lib.rs
use convivio_server::{
    build_sqlite_url, cascade_delete_posts_from_env, connect_pool, routes, run_migrations,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Costruisci l'URL del database SQLite
    let db_url = build_sqlite_url().context("build sqlite DATABASE_URL")?;
    info!("using DATABASE_URL = {}", db_url);
    // Connetti al database
    let pool = connect_pool(&db_url).await.context("connect to sqlite")?;
    // Esegui le migrazioni del database
    run_migrations(&pool).await.context("run migrations")?;
    // Crea lo stato dell'applicazione condiviso
    let state = Arc::new(AppState {
        pool,
        cascade_delete_posts: cascade_delete_posts_from_env(),
    });
    // Configura le rotte dell'applicazione
    let app = routes::router(state);
    // Ottieni l'indirizzo di binding dall'ambiente o usa il default (porta 5000)
    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
        let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());
        format!("127.0.0.1:{}", port)
    });
    let addr: SocketAddr = bind.parse().context("parse BIND_ADDR")?;
    info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind tcp listener")?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("server shutdown")?;

    Ok(())
}
