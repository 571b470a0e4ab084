use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::dto::ApiResponse;
use crate::models::{CreateFuelLogRequest, FuelLog, UpdateFuelLogRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Filtro opcional por vehículo, compartido con los registros de mantenimiento
#[derive(Debug, Default, Deserialize)]
pub struct LogFilter {
    pub vehicle_id: Option<Uuid>,
}

pub fn create_fuel_log_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_fuel_logs).post(create_fuel_log))
        .route("/:id", put(update_fuel_log).delete(delete_fuel_log))
}

async fn list_fuel_logs(
    State(state): State<AppState>,
    Query(filter): Query<LogFilter>,
) -> Result<Json<ApiResponse<Vec<FuelLog>>>, AppError> {
    Ok(Json(ApiResponse::success(state.fleet.list_fuel_logs(filter.vehicle_id).await)))
}

async fn create_fuel_log(
    State(state): State<AppState>,
    Json(request): Json<CreateFuelLogRequest>,
) -> Result<Json<ApiResponse<FuelLog>>, AppError> {
    let log = state.fleet.create_fuel_log(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        log,
        "Repostaje registrado".to_string(),
    )))
}

async fn update_fuel_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFuelLogRequest>,
) -> Result<Json<ApiResponse<FuelLog>>, AppError> {
    Ok(Json(ApiResponse::success(state.fleet.update_fuel_log(id, request).await?)))
}

async fn delete_fuel_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FuelLog>>, AppError> {
    Ok(Json(ApiResponse::success(state.fleet.delete_fuel_log(id).await?)))
}
