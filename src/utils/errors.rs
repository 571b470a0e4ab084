//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del núcleo de despacho
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::{TripStatus, VehicleStatus};
use crate::services::dispatch_validator::DispatchRejection;

/// Regla de la máquina de estados que impidió una transición
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    #[error("trip is already {0} and cannot change status")]
    TerminalStatus(TripStatus),

    #[error("transition from {from} to {to} is not allowed")]
    NotAllowed { from: TripStatus, to: TripStatus },

    #[error("trip has no start odometer")]
    MissingStartOdometer,

    #[error("completing a trip requires an end odometer")]
    MissingEndOdometer,

    #[error("end odometer {end} km is below start odometer {start} km")]
    EndOdometerBeforeStart { start: f64, end: f64 },

    #[error("vehicle is on an active trip")]
    VehicleOnTrip,

    #[error("vehicle is {0}, expected it to be held by this trip")]
    VehicleNotClaimed(VehicleStatus),

    #[error("driver is not held by this trip")]
    DriverNotClaimed,

    #[error("driver is on an active trip")]
    DriverOnTrip,

    #[error("trip is active and cannot be deleted")]
    TripActive,

    #[error("status {0} is managed by dispatch and cannot be set manually")]
    StatusManagedByDispatch(String),

    #[error("retired vehicles cannot change status")]
    VehicleRetired,
}

impl TransitionError {
    /// Código estable para consumidores
    pub fn code(&self) -> &'static str {
        match self {
            TransitionError::TerminalStatus(_) => "TERMINAL_STATUS",
            TransitionError::NotAllowed { .. } => "NOT_ALLOWED",
            TransitionError::MissingStartOdometer => "MISSING_START_ODOMETER",
            TransitionError::MissingEndOdometer => "MISSING_END_ODOMETER",
            TransitionError::EndOdometerBeforeStart { .. } => "END_ODOMETER_BEFORE_START",
            TransitionError::VehicleOnTrip => "VEHICLE_ON_TRIP",
            TransitionError::VehicleNotClaimed(_) => "VEHICLE_NOT_CLAIMED",
            TransitionError::DriverNotClaimed => "DRIVER_NOT_CLAIMED",
            TransitionError::DriverOnTrip => "DRIVER_ON_TRIP",
            TransitionError::TripActive => "TRIP_ACTIVE",
            TransitionError::StatusManagedByDispatch(_) => "STATUS_MANAGED_BY_DISPATCH",
            TransitionError::VehicleRetired => "VEHICLE_RETIRED",
        }
    }
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(DispatchRejection),

    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    #[error("Referential error: {0}")]
    Referential(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(rejection) => {
                warn!("Dispatch validation failed: {}", rejection);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The dispatch request violates fleet constraints".to_string(),
                        details: Some(json!(rejection.fields())),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::InvalidTransition(rule) => {
                warn!("Invalid transition: {}", rule);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Invalid Transition".to_string(),
                        message: rule.to_string(),
                        details: Some(json!({ "rule": rule.code() })),
                        code: Some("INVALID_TRANSITION".to_string()),
                    },
                )
            }

            AppError::Referential(msg) => {
                warn!("Referential error: {}", msg);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse {
                        error: "Referential Error".to_string(),
                        message: msg,
                        details: None,
                        code: Some("REFERENTIAL_ERROR".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONFLICT".to_string()),
                    },
                )
            }

            AppError::InvalidInput(e) => {
                warn!("Invalid input: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("INVALID_INPUT".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: None,
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

/// Función helper para crear errores referenciales
pub fn referential_error(resource: &str, id: &impl std::fmt::Display, reason: &str) -> AppError {
    AppError::Referential(format!("{} '{}' {}", resource, id, reason))
}
