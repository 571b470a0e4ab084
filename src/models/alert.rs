//! Modelo de Alert
//!
//! Las alertas se derivan del estado actual; no son autoritativas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    VehicleLicenseExpired,
    VehicleLicenseExpiring,
    ServiceOverdue,
    ServiceDueSoon,
    DriverLicenseExpired,
    DriverLicenseExpiring,
    LowSafetyScore,
    FuelCostSpike,
}

impl AlertType {
    /// Prefijo estable para los ids derivados
    pub fn key(&self) -> &'static str {
        match self {
            AlertType::VehicleLicenseExpired => "vehicle-license-expired",
            AlertType::VehicleLicenseExpiring => "vehicle-license-expiring",
            AlertType::ServiceOverdue => "service-overdue",
            AlertType::ServiceDueSoon => "service-due-soon",
            AlertType::DriverLicenseExpired => "driver-license-expired",
            AlertType::DriverLicenseExpiring => "driver-license-expiring",
            AlertType::LowSafetyScore => "low-safety-score",
            AlertType::FuelCostSpike => "fuel-cost-spike",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// Entidad que disparó la alerta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AlertSubject {
    Vehicle(Uuid),
    Driver(Uuid),
    Fleet,
}

impl std::fmt::Display for AlertSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSubject::Vehicle(id) => write!(f, "vehicle:{}", id),
            AlertSubject::Driver(id) => write!(f, "driver:{}", id),
            AlertSubject::Fleet => f.write_str("fleet"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    /// `<tipo>:<sujeto>@<ocurrencia>`, estable mientras la condición no cambie
    pub id: String,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub subject: AlertSubject,
    pub acknowledged: bool,
    /// Solo presente en alertas reconocidas o históricas
    pub acknowledged_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// `occurrence` identifica la condición concreta (fecha de vencimiento,
    /// km de servicio, mes...); una nueva ocurrencia produce un id nuevo.
    pub fn new(
        alert_type: AlertType,
        severity: AlertSeverity,
        subject: AlertSubject,
        occurrence: &str,
        message: String,
    ) -> Self {
        Self {
            id: format!("{}:{}@{}", alert_type.key(), subject, occurrence),
            alert_type,
            severity,
            message,
            subject,
            acknowledged: false,
            acknowledged_at: None,
        }
    }
}
