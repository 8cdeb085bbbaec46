mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::delivery::DeliveryConfig;

pub fn build_router(config: DeliveryConfig) -> Router {
    let state = Arc::new(AppState { config });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/quote", get(handlers::quote))
        .route("/api/distance", get(handlers::distance))
        .route("/api/areas", get(handlers::areas))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, config: DeliveryConfig) -> std::io::Result<()> {
    let store_id = config.store_id.clone();
    let app = build_router(config);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, store = %store_id, "delivery quote server listening");

    axum::serve(listener, app).await
}
