//! Rutas HTTP
//!
//! Cada recurso expone su propio `Router<AppState>`; `create_router` los
//! compone bajo `/api` junto con CORS y trazas de peticiones.

pub mod alert_routes;
pub mod analytics_routes;
pub mod driver_routes;
pub mod fuel_log_routes;
pub mod maintenance_routes;
pub mod trip_routes;
pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/drivers", driver_routes::create_driver_router())
        .nest("/api/trips", trip_routes::create_trip_router())
        .nest("/api/fuel-logs", fuel_log_routes::create_fuel_log_router())
        .nest("/api/maintenance-logs", maintenance_routes::create_maintenance_router())
        .nest("/api/analytics", analytics_routes::create_analytics_router())
        .nest("/api/alerts", alert_routes::create_alert_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Liveness
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
