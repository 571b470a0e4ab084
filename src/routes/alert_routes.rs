use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::dto::ApiResponse;
use crate::models::Alert;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_alert_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/:id/acknowledge", post(acknowledge_alert))
}

async fn list_alerts(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Alert>>>, AppError> {
    Ok(Json(ApiResponse::success(state.alerts.current().await)))
}

async fn acknowledge_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Alert>>, AppError> {
    let alert = state.alerts.acknowledge(&id).await?;
    Ok(Json(ApiResponse::success_with_message(
        alert,
        "Alerta reconocida".to_string(),
    )))
}
