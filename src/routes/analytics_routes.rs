use axum::{extract::State, routing::get, Json, Router};

use crate::dto::ApiResponse;
use crate::models::{FleetMetrics, MonthlyRollupRow};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_analytics_router() -> Router<AppState> {
    Router::new()
        .route("/fleet", get(fleet_metrics))
        .route("/monthly", get(monthly_rollup))
}

async fn fleet_metrics(State(state): State<AppState>) -> Result<Json<ApiResponse<FleetMetrics>>, AppError> {
    Ok(Json(ApiResponse::success(state.analytics.fleet_metrics().await)))
}

async fn monthly_rollup(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MonthlyRollupRow>>>, AppError> {
    Ok(Json(ApiResponse::success(state.analytics.monthly_rollup().await)))
}
