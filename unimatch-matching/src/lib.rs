pub mod config;
pub mod embedding;
pub mod matching;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use unimatch_shared::clients::db::DbPool;

use config::AppConfig;
use matching::SimilarityScorer;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub scorer: SimilarityScorer,
    pub metrics_handle: PrometheusHandle,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/users", get(routes::admin::list_users))
        .route("/pairs", post(routes::admin::generate_pairs))
        .route(
            "/candidates",
            get(routes::admin::list_candidates).post(routes::admin::refresh_candidates),
        )
        .route("/candidates/:user_id", get(routes::admin::user_candidates))
        .route("/score", post(routes::admin::score_texts));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .nest("/admin", admin_routes)
        .layer(middleware::from_fn(unimatch_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
