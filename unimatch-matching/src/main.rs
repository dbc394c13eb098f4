use std::sync::Arc;

use unimatch_matching::config::AppConfig;
use unimatch_matching::matching::SimilarityScorer;
use unimatch_matching::{build_router, AppState};
use unimatch_shared::clients::db::create_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    unimatch_shared::middleware::init_tracing("unimatch-matching");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url)?;
    tracing::info!(database = %config.database_url, "opened database");

    let metrics_handle = unimatch_shared::middleware::init_metrics()?;

    // The oracle is only contacted when a matching run starts.
    let embedder = config.embedder()?;
    tracing::info!(
        url = %config.embedding_url,
        model = %config.embedding_model,
        "embedding client ready"
    );

    let state = Arc::new(AppState {
        db,
        scorer: SimilarityScorer::new(Arc::new(embedder)),
        config,
        metrics_handle,
    });

    let app = build_router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "unimatch-matching starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
