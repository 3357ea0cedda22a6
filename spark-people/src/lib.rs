use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

use config::AppConfig;
use services::{DecisionService, RecommendationFeed};
use store::{SwipeStore, UserDirectory};

pub struct AppState {
    pub config: AppConfig,
    pub directory: Arc<dyn UserDirectory>,
    pub feed: RecommendationFeed,
    pub decisions: DecisionService,
    pub metrics_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        swipes: Arc<dyn SwipeStore>,
        directory: Arc<dyn UserDirectory>,
        metrics_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
    ) -> Self {
        Self {
            config,
            feed: RecommendationFeed::new(swipes.clone(), directory.clone()),
            decisions: DecisionService::new(swipes, directory.clone()),
            directory,
            metrics_handle,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/people/recommended", get(routes::people::recommended))
        .route("/people/liked", get(routes::people::liked))
        .route("/people/:id/like", post(routes::people::like))
        .route("/people/:id/dislike", post(routes::people::dislike))
        // Internal service-to-service endpoints (no auth)
        .route("/internal/popular", get(routes::internal::popular_targets))
        .layer(axum::middleware::from_fn(spark_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
