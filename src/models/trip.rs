//! Modelo de Trip
//!
//! Un Trip vincula un vehículo y un conductor con una carga entre origen y destino.
//! El ciclo de vida lo gestiona `services::dispatch_coordinator`.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Estado del viaje
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Draft,
    Dispatched,
    OnRoute,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Draft => "draft",
            TripStatus::Dispatched => "dispatched",
            TripStatus::OnRoute => "on_route",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }

    /// Completed y Cancelled no admiten más transiciones
    pub fn is_terminal(&self) -> bool {
        matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }

    /// El viaje tiene vehículo y conductor reclamados
    pub fn holds_resources(&self) -> bool {
        matches!(self, TripStatus::Dispatched | TripStatus::OnRoute)
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    pub id: Uuid,
    pub trip_number: String,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub cargo_weight_kg: f64,
    pub cargo_description: Option<String>,
    pub origin: String,
    pub destination: String,
    pub estimated_revenue: Decimal,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub start_odometer_km: Option<f64>,
    pub end_odometer_km: Option<f64>,
}

impl Trip {
    /// Crear un viaje en estado Draft a partir de un candidato ya validado
    pub fn draft(candidate: &TripCandidate, sequence: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_number: format_trip_number(now.year(), sequence),
            vehicle_id: candidate.vehicle_id,
            driver_id: candidate.driver_id,
            cargo_weight_kg: candidate.cargo_weight_kg,
            cargo_description: candidate.cargo_description.clone(),
            origin: candidate.origin.trim().to_string(),
            destination: candidate.destination.trim().to_string(),
            estimated_revenue: candidate.estimated_revenue,
            status: TripStatus::Draft,
            created_at: now,
            dispatched_at: None,
            completed_at: None,
            cancelled_at: None,
            start_odometer_km: None,
            end_odometer_km: None,
        }
    }

    /// Distancia recorrida; solo definida para viajes completados
    pub fn distance_km(&self) -> Option<f64> {
        match (self.status, self.start_odometer_km, self.end_odometer_km) {
            (TripStatus::Completed, Some(start), Some(end)) => Some((end - start).max(0.0)),
            _ => None,
        }
    }

    /// Vista del viaje como candidato, para revalidar al despachar un Draft
    pub fn as_candidate(&self) -> TripCandidate {
        TripCandidate {
            vehicle_id: self.vehicle_id,
            driver_id: self.driver_id,
            cargo_weight_kg: self.cargo_weight_kg,
            cargo_description: self.cargo_description.clone(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            estimated_revenue: self.estimated_revenue,
        }
    }
}

/// Número de viaje legible: `TRP-2026-007`
pub fn format_trip_number(year: i32, sequence: u64) -> String {
    format!("TRP-{}-{:03}", year, sequence)
}

/// Datos de un viaje tal como los introduce el operador, aún sin persistir
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripCandidate {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub cargo_weight_kg: f64,
    #[serde(default)]
    pub cargo_description: Option<String>,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub estimated_revenue: Decimal,
}

/// Request para avanzar un viaje
#[derive(Debug, Clone, Deserialize)]
pub struct AdvanceTripRequest {
    pub status: TripStatus,
    #[serde(flatten)]
    pub extra: TransitionExtra,
}

/// Datos adicionales que requieren algunas transiciones
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitionExtra {
    pub end_odometer_km: Option<f64>,
}
