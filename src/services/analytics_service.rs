//! Servicio de analytics
//!
//! Cada consulta toma un único lock de lectura, así que todas las cifras de
//! una respuesta salen del mismo estado.

use tracing::debug;
use uuid::Uuid;

use crate::models::{FleetMetrics, MonthlyRollupRow, VehicleMetrics};
use crate::repositories::FleetStore;
use crate::services::aggregation::{compute_fleet_metrics, compute_monthly_rollup, find_vehicle_metrics};
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Clone)]
pub struct AnalyticsService {
    store: FleetStore,
}

impl AnalyticsService {
    pub fn new(store: FleetStore) -> Self {
        Self { store }
    }

    pub async fn fleet_metrics(&self) -> FleetMetrics {
        let data = self.store.read().await;
        debug!("Computing fleet metrics over {} vehicles", data.vehicles.len());
        compute_fleet_metrics(
            data.vehicles.all(),
            data.drivers.all(),
            data.trips.all(),
            data.fuel_logs.all(),
            data.maintenance_logs.all(),
        )
    }

    pub async fn vehicle_metrics(&self, vehicle_id: Uuid) -> AppResult<VehicleMetrics> {
        let data = self.store.read().await;
        find_vehicle_metrics(
            vehicle_id,
            data.vehicles.all(),
            data.trips.all(),
            data.fuel_logs.all(),
            data.maintenance_logs.all(),
        )
        .ok_or_else(|| not_found_error("Vehicle", &vehicle_id))
    }

    pub async fn monthly_rollup(&self) -> Vec<MonthlyRollupRow> {
        let data = self.store.read().await;
        compute_monthly_rollup(data.trips.all(), data.fuel_logs.all(), data.maintenance_logs.all())
    }
}
