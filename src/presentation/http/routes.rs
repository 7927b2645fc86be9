//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::auth_middleware;
use crate::presentation::middleware::logging::metrics_middleware;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes, all behind bearer authentication
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(trip_routes())
        .merge(admin_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn trip_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/trips",
            get(handlers::trip::list_trips).post(handlers::trip::create_trip),
        )
        .route("/trips/search", get(handlers::trip::search_trips))
        .route(
            "/trips/{trip_id}",
            get(handlers::trip::get_trip)
                .put(handlers::trip::update_trip)
                .delete(handlers::trip::delete_trip),
        )
        .route("/trips/{trip_id}/exists", get(handlers::trip::trip_exists))
        .route(
            "/trips/{trip_id}/mates",
            post(handlers::trip::invite_trip_mate),
        )
        .route(
            "/trips/{trip_id}/mates/{username}",
            delete(handlers::trip::remove_trip_mate),
        )
}

/// Admin routes; handlers check the ADMIN role
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/trips", get(handlers::admin::list_all_trips))
        .route(
            "/admin/trips/notifying-today",
            get(handlers::admin::trips_notifying_today),
        )
        .route(
            "/admin/trips/reminders",
            post(handlers::admin::send_reminders),
        )
}
