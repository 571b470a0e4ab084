//! Modelos de Analytics
//!
//! Este módulo contiene los resultados del motor de agregación: métricas de
//! utilización, financieras por vehículo, de flota y rollups mensuales.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::vehicle::VehicleStatus;

/// Utilización de la flota
///
/// `utilization_pct` cuenta solo vehículos en viaje; `readiness_pct` cuenta
/// disponibles + en viaje. Son métricas distintas y se publican por separado.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UtilizationMetrics {
    pub total_vehicles: usize,
    pub available: usize,
    pub on_trip: usize,
    pub in_shop: usize,
    pub retired: usize,
    pub utilization_pct: f64,
    pub readiness_pct: f64,
}

/// Métricas financieras y operativas de un vehículo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleMetrics {
    pub vehicle_id: Uuid,
    pub registration: String,
    pub status: VehicleStatus,
    pub completed_trips: usize,
    pub completed_distance_km: f64,
    pub revenue: Decimal,
    pub fuel_cost: Decimal,
    pub maintenance_cost: Decimal,
    pub total_cost: Decimal,
    pub fuel_liters: Decimal,
    pub roi_pct: f64,
    pub cost_per_km: f64,
    pub km_per_liter: f64,
}

/// Resumen financiero y operativo de toda la flota
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FleetMetrics {
    pub utilization: UtilizationMetrics,

    // Conductores
    pub total_drivers: usize,
    pub drivers_on_duty: usize,
    pub drivers_on_trip: usize,
    pub drivers_suspended: usize,

    // Viajes
    pub draft_trips: usize,
    pub active_trips: usize,
    pub completed_trips: usize,
    pub cancelled_trips: usize,

    // Finanzas
    pub total_revenue: Decimal,
    pub total_fuel_cost: Decimal,
    pub total_maintenance_cost: Decimal,
    pub total_operational_cost: Decimal,
    pub net_profit: Decimal,
    pub total_acquisition_cost: Decimal,
    pub fleet_roi_pct: f64,
    pub total_completed_distance_km: f64,
    pub cost_per_km: f64,
}

/// Fila del rollup mensual
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRollupRow {
    /// "Mon YYYY", independiente del locale
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub revenue: Decimal,
    pub fuel_cost: Decimal,
    pub maintenance_cost: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
}

/// Vista previa de un despacho: validación + métricas del vehículo
#[derive(Debug, Clone, Serialize)]
pub struct DispatchPreview {
    pub valid: bool,
    pub errors: std::collections::BTreeMap<String, Vec<String>>,
    pub vehicle: Option<VehicleMetrics>,
    pub load_factor_pct: Option<f64>,
    pub remaining_capacity_kg: Option<f64>,
}
