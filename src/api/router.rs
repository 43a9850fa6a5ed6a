use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_auth;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes, no authentication
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Report API, Bearer token required when API_TOKEN is set
    let protected = Router::new()
        .route("/api/report", get(handlers::report::full))
        .route("/api/report/summary", get(handlers::report::summary))
        .route("/api/report/records", get(handlers::report::records))
        .route("/api/report/equity-curve", get(handlers::report::equity))
        .route("/api/report/daily-pnl", get(handlers::report::daily))
        .route("/api/report/refresh", post(handlers::report::refresh))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // The dashboard front end is served from elsewhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
