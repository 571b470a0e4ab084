//! Modelo de MaintenanceLog
//!
//! Crear un registro de mantenimiento pasa el vehículo a `InShop`; ese efecto
//! se devuelve explícitamente en `MaintenanceOutcome`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::VehicleStatus;
use crate::utils::validation::validate_non_negative_decimal;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceLog {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    pub service_type: String,
    pub description: Option<String>,
    pub cost: Decimal,
    pub next_due_km: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceLog {
    pub fn new(request: CreateMaintenanceLogRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id: request.vehicle_id,
            date: request.date,
            service_type: request.service_type,
            description: request.description,
            cost: request.cost,
            next_due_km: request.next_due_km,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMaintenanceLogRequest {
    pub vehicle_id: Uuid,
    pub date: NaiveDate,

    #[validate(length(min = 2, max = 100))]
    pub service_type: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(custom = "validate_non_negative_decimal")]
    pub cost: Decimal,

    #[validate(range(min = 0.0))]
    pub next_due_km: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMaintenanceLogRequest {
    pub date: Option<NaiveDate>,

    #[validate(length(min = 2, max = 100))]
    pub service_type: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(custom = "validate_non_negative_decimal")]
    pub cost: Option<Decimal>,

    #[validate(range(min = 0.0))]
    pub next_due_km: Option<f64>,
}

/// Cambio de estado de un vehículo provocado por otra operación
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct VehicleStatusChange {
    pub vehicle_id: Uuid,
    pub from: VehicleStatus,
    pub to: VehicleStatus,
}

/// Resultado de crear un mantenimiento: el registro y el efecto sobre el vehículo
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceOutcome {
    pub log: MaintenanceLog,
    /// `None` si el vehículo ya estaba en taller
    pub status_change: Option<VehicleStatusChange>,
}
