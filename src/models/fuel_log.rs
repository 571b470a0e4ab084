//! Modelo de FuelLog
//!
//! Registros de repostaje. Son hechos financieros: no disparan transiciones.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::validate_positive_decimal;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelLog {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    pub liters: Decimal,
    pub price_per_liter: Decimal,
    /// liters × price_per_liter
    pub cost: Decimal,
    pub odometer_km: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl FuelLog {
    pub fn new(request: CreateFuelLogRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id: request.vehicle_id,
            date: request.date,
            liters: request.liters,
            price_per_liter: request.price_per_liter,
            cost: (request.liters * request.price_per_liter).round_dp(2),
            odometer_km: request.odometer_km,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFuelLogRequest {
    pub vehicle_id: Uuid,
    pub date: NaiveDate,

    #[validate(custom = "validate_positive_decimal")]
    pub liters: Decimal,

    #[validate(custom = "validate_positive_decimal")]
    pub price_per_liter: Decimal,

    #[validate(range(min = 0.0))]
    pub odometer_km: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFuelLogRequest {
    pub date: Option<NaiveDate>,

    #[validate(custom = "validate_positive_decimal")]
    pub liters: Option<Decimal>,

    #[validate(custom = "validate_positive_decimal")]
    pub price_per_liter: Option<Decimal>,

    #[validate(range(min = 0.0))]
    pub odometer_km: Option<f64>,
}
