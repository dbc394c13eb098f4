use std::sync::Arc;

use unimatch_intake::config::AppConfig;
use unimatch_intake::{build_router, AppState};
use unimatch_shared::clients::db::create_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    unimatch_shared::middleware::init_tracing("unimatch-intake");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url)?;
    tracing::info!(database = %config.database_url, static_dir = %config.static_dir, "opened database");

    let metrics_handle = unimatch_shared::middleware::init_metrics()?;

    let state = Arc::new(AppState {
        db,
        config,
        metrics_handle,
    });

    let app = build_router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "unimatch-intake starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
