mod colonist;
mod config;
mod error;
mod filter;
mod model;
mod seed;
mod server;
mod service;
mod sqlite_store;
mod store;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use server::AppState;
use service::GuideQueryService;
use site_common::sqlite::Database;
use sqlite_store::SqliteGuideStore;
use store::{GuideStore, MemoryGuideStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting guide-server");

    let config = Config::from_env()?;
    info!(
        listen_addr = %config.listen_addr,
        database = config.database_path.as_deref().unwrap_or("<memory>"),
        max_connections = config.max_connections,
        cors_any = config.cors_any,
        "configuration loaded"
    );

    let store = open_store(&config).await;
    let guides = Arc::new(GuideQueryService::new(store));

    // Seeding runs before the listener exists, so it never races with reads.
    let outcome = guides.initialize().await?;
    info!(
        store = guides.backend_name(),
        guides = outcome.guide_count,
        seeded = outcome.seeded,
        "guide store ready"
    );

    let app = server::create_router(AppState { guides }, config.cors_any);

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!(listen_addr = %config.listen_addr, "HTTP server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("guide-server shut down");
    Ok(())
}

/// SQLite when configured and reachable, otherwise the in-memory sample guides.
async fn open_store(config: &Config) -> GuideStore {
    let Some(path) = config.database_path.as_deref() else {
        info!("no GUIDES_DATABASE_PATH set, serving in-memory guides");
        return GuideStore::Memory(MemoryGuideStore::new());
    };

    match Database::open(path, config.max_connections).await {
        Ok(db) => GuideStore::Sqlite(SqliteGuideStore::new(db)),
        Err(e) => {
            warn!(error = %e, path, "sqlite unavailable, falling back to in-memory guides");
            GuideStore::Memory(MemoryGuideStore::new())
        }
    }
}
