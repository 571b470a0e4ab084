use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::ApiResponse;
use crate::models::{AdvanceTripRequest, DispatchPreview, Trip, TripCandidate};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(dispatch_trip))
        .route("/draft", post(create_draft))
        .route("/preview", post(preview_dispatch))
        .route("/:id", get(get_trip).delete(delete_trip))
        .route("/:id/advance", post(advance_trip))
        .route("/:id/cancel", post(cancel_trip))
}

async fn list_trips(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Trip>>>, AppError> {
    Ok(Json(ApiResponse::success(state.fleet.list_trips().await)))
}

async fn dispatch_trip(
    State(state): State<AppState>,
    Json(candidate): Json<TripCandidate>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    let trip = state.coordinator.dispatch(candidate).await?;
    let message = format!("Viaje {} despachado", trip.trip_number);
    Ok(Json(ApiResponse::success_with_message(trip, message)))
}

async fn create_draft(
    State(state): State<AppState>,
    Json(candidate): Json<TripCandidate>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    let trip = state.coordinator.create_draft(candidate).await?;
    let message = format!("Borrador {} creado", trip.trip_number);
    Ok(Json(ApiResponse::success_with_message(trip, message)))
}

async fn preview_dispatch(
    State(state): State<AppState>,
    Json(candidate): Json<TripCandidate>,
) -> Result<Json<ApiResponse<DispatchPreview>>, AppError> {
    Ok(Json(ApiResponse::success(state.coordinator.preview(&candidate).await)))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    Ok(Json(ApiResponse::success(state.fleet.get_trip(id).await?)))
}

async fn advance_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AdvanceTripRequest>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    let trip = state.coordinator.advance(id, request.status, request.extra).await?;
    Ok(Json(ApiResponse::success(trip)))
}

async fn cancel_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    let trip = state.coordinator.cancel(id).await?;
    let message = format!("Viaje {} cancelado", trip.trip_number);
    Ok(Json(ApiResponse::success_with_message(trip, message)))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    let trip = state.coordinator.delete_trip(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        trip,
        "Viaje eliminado exitosamente".to_string(),
    )))
}
