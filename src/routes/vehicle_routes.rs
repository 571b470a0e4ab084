use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::dto::ApiResponse;
use crate::models::{CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleMetrics};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
        .route("/:id/metrics", get(get_vehicle_metrics))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let vehicle = state.fleet.create_vehicle(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        vehicle,
        "Vehículo creado exitosamente".to_string(),
    )))
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    Ok(Json(ApiResponse::success(state.fleet.list_vehicles().await)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    Ok(Json(ApiResponse::success(state.fleet.get_vehicle(id).await?)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let vehicle = state.fleet.update_vehicle(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        vehicle,
        "Vehículo actualizado exitosamente".to_string(),
    )))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let vehicle = state.fleet.delete_vehicle(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        vehicle,
        "Vehículo eliminado exitosamente".to_string(),
    )))
}

async fn get_vehicle_metrics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleMetrics>>, AppError> {
    Ok(Json(ApiResponse::success(state.analytics.vehicle_metrics(id).await?)))
}
