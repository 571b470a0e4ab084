use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::ApiResponse;
use crate::models::{
    CreateMaintenanceLogRequest, MaintenanceLog, MaintenanceOutcome, UpdateMaintenanceLogRequest,
};
use crate::routes::fuel_log_routes::LogFilter;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_maintenance_logs).post(create_maintenance_log))
        .route("/:id", put(update_maintenance_log).delete(delete_maintenance_log))
}

async fn list_maintenance_logs(
    State(state): State<AppState>,
    Query(filter): Query<LogFilter>,
) -> Result<Json<ApiResponse<Vec<MaintenanceLog>>>, AppError> {
    Ok(Json(ApiResponse::success(
        state.fleet.list_maintenance_logs(filter.vehicle_id).await,
    )))
}

/// El vehículo pasa a taller; el cambio de estado viaja en la respuesta
async fn create_maintenance_log(
    State(state): State<AppState>,
    Json(request): Json<CreateMaintenanceLogRequest>,
) -> Result<Json<ApiResponse<MaintenanceOutcome>>, AppError> {
    let outcome = state.fleet.create_maintenance_log(request).await?;
    let message = match &outcome.status_change {
        Some(change) => format!("Mantenimiento registrado; vehículo {} -> {}", change.from, change.to),
        None => "Mantenimiento registrado".to_string(),
    };
    Ok(Json(ApiResponse::success_with_message(outcome, message)))
}

async fn update_maintenance_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMaintenanceLogRequest>,
) -> Result<Json<ApiResponse<MaintenanceLog>>, AppError> {
    Ok(Json(ApiResponse::success(
        state.fleet.update_maintenance_log(id, request).await?,
    )))
}

async fn delete_maintenance_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MaintenanceLog>>, AppError> {
    Ok(Json(ApiResponse::success(state.fleet.delete_maintenance_log(id).await?)))
}
