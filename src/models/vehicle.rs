//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, su estado y las requests para CRUD.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_license_plate, validate_non_negative_decimal};

/// Estado del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    OnTrip,
    InShop,
    Retired,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::OnTrip => "on_trip",
            VehicleStatus::InShop => "in_shop",
            VehicleStatus::Retired => "retired",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle principal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub registration: String,
    pub name: String,
    pub max_capacity_kg: f64,
    pub odometer_km: f64,
    pub acquisition_cost: Decimal,
    pub status: VehicleStatus,
    pub region: Option<String>,
    pub license_expiry: Option<NaiveDate>,
    pub next_service_due_km: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Construir un vehículo nuevo (siempre nace `Available`)
    pub fn new(request: CreateVehicleRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            registration: request.registration.trim().to_uppercase(),
            name: request.name,
            max_capacity_kg: request.max_capacity_kg,
            odometer_km: request.odometer_km.unwrap_or(0.0),
            acquisition_cost: request.acquisition_cost.unwrap_or(Decimal::ZERO),
            status: VehicleStatus::Available,
            region: request.region,
            license_expiry: request.license_expiry,
            next_service_due_km: request.next_service_due_km,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_retired(&self) -> bool {
        self.status == VehicleStatus::Retired
    }
}

/// Request para crear un nuevo vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub registration: String,

    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(range(min = 1.0))]
    pub max_capacity_kg: f64,

    #[validate(range(min = 0.0))]
    pub odometer_km: Option<f64>,

    #[validate(custom = "validate_non_negative_decimal")]
    pub acquisition_cost: Option<Decimal>,

    #[validate(length(min = 2, max = 100))]
    pub region: Option<String>,

    pub license_expiry: Option<NaiveDate>,

    #[validate(range(min = 0.0))]
    pub next_service_due_km: Option<f64>,
}

/// Request para actualizar un vehículo existente
///
/// `status` solo acepta estados manuales; `OnTrip` lo gestiona el despacho.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub registration: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(range(min = 1.0))]
    pub max_capacity_kg: Option<f64>,

    #[validate(range(min = 0.0))]
    pub odometer_km: Option<f64>,

    #[validate(custom = "validate_non_negative_decimal")]
    pub acquisition_cost: Option<Decimal>,

    pub status: Option<VehicleStatus>,

    #[validate(length(min = 2, max = 100))]
    pub region: Option<String>,

    pub license_expiry: Option<NaiveDate>,

    #[validate(range(min = 0.0))]
    pub next_service_due_km: Option<f64>,
}
