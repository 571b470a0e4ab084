//! Modelo de Driver
//!
//! Conductores de la flota con su licencia, estado y métricas de desempeño.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Estado del conductor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    OnDuty,
    OnTrip,
    OffDuty,
    Suspended,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::OnDuty => "on_duty",
            DriverStatus::OnTrip => "on_trip",
            DriverStatus::OffDuty => "off_duty",
            DriverStatus::Suspended => "suspended",
        }
    }
}

impl std::fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub license_number: String,
    pub license_category: String,
    pub license_expiry: NaiveDate,
    pub status: DriverStatus,
    /// 0–100
    pub safety_score: f64,
    /// Porcentaje de viajes completados (0–100)
    pub completion_rate: f64,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Driver {
    pub fn new(request: CreateDriverRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: request.name,
            license_number: request.license_number.trim().to_uppercase(),
            license_category: request.license_category,
            license_expiry: request.license_expiry,
            status: request.status.unwrap_or(DriverStatus::OnDuty),
            safety_score: request.safety_score.unwrap_or(100.0),
            completion_rate: request.completion_rate.unwrap_or(100.0),
            phone: request.phone,
            created_at: now,
            updated_at: now,
        }
    }

    /// Licencia vencida respecto a `today`
    pub fn license_expired(&self, today: NaiveDate) -> bool {
        self.license_expiry < today
    }
}

/// Request para registrar un conductor
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(min = 4, max = 30))]
    pub license_number: String,

    #[validate(length(min = 1, max = 10))]
    pub license_category: String,

    pub license_expiry: NaiveDate,

    /// Solo `OnDuty`, `OffDuty` o `Suspended`
    pub status: Option<DriverStatus>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub safety_score: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub completion_rate: Option<f64>,

    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
}

/// Request para actualizar un conductor existente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 4, max = 30))]
    pub license_number: Option<String>,

    #[validate(length(min = 1, max = 10))]
    pub license_category: Option<String>,

    pub license_expiry: Option<NaiveDate>,

    pub status: Option<DriverStatus>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub safety_score: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub completion_rate: Option<f64>,

    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
}
