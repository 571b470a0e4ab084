use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::dto::ApiResponse;
use crate::models::{CreateDriverRequest, Driver, UpdateDriverRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/:id", get(get_driver).put(update_driver).delete(delete_driver))
}

async fn create_driver(
    State(state): State<AppState>,
    Json(request): Json<CreateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let driver = state.fleet.create_driver(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        driver,
        "Conductor registrado exitosamente".to_string(),
    )))
}

async fn list_drivers(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Driver>>>, AppError> {
    Ok(Json(ApiResponse::success(state.fleet.list_drivers().await)))
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    Ok(Json(ApiResponse::success(state.fleet.get_driver(id).await?)))
}

async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let driver = state.fleet.update_driver(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        driver,
        "Conductor actualizado exitosamente".to_string(),
    )))
}

async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let driver = state.fleet.delete_driver(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        driver,
        "Conductor eliminado exitosamente".to_string(),
    )))
}
