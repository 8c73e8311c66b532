//! NVC Bank API server

use anyhow::{Context, Result};
use nvcbank_api::{create_router, AppConfig, AppState};
use nvcbank_persistence::Database;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::new(&config.database_url, &config.error_log_dir)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    let report = db.migrate().await.context("Schema migration failed")?;
    if !report.is_noop() {
        tracing::info!(added = ?report.added, "schema columns added");
    }

    let addr: SocketAddr = config.bind_address().parse()?;
    let state = AppState::new(&db, config)?;
    let app = create_router(state);

    tracing::info!("NVC Bank API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
