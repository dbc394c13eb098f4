pub mod config;
pub mod pages;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use unimatch_shared::clients::db::DbPool;

use config::AppConfig;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub metrics_handle: PrometheusHandle,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::pages::index))
        .route("/roadmap", get(routes::pages::roadmap))
        .route("/submit", post(routes::submit::submit_form))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(middleware::from_fn(unimatch_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
