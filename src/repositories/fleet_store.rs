//! Almacén de la flota
//!
//! Todas las colecciones viven en un único `FleetData` protegido por un
//! `RwLock`. Las transiciones toman el lock de escritura (un solo escritor para
//! todas las colecciones) y las lecturas ven todas las colecciones en el mismo
//! instante lógico.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::models::{Alert, Driver, FuelLog, MaintenanceLog, Trip, Vehicle};
use crate::repositories::entity_store::EntityStore;

/// Alertas reconocidas (guardadas tal cual) e históricas sembradas
#[derive(Debug, Clone, Default)]
pub struct AlertBook {
    pub acknowledged: Vec<Alert>,
    pub historical: Vec<Alert>,
}

impl AlertBook {
    pub fn is_acknowledged(&self, alert_id: &str) -> bool {
        self.acknowledged.iter().any(|alert| alert.id == alert_id)
    }
}

/// Estado completo de la flota en un instante
#[derive(Debug, Clone, Default)]
pub struct FleetData {
    pub vehicles: EntityStore<Vehicle>,
    pub drivers: EntityStore<Driver>,
    pub trips: EntityStore<Trip>,
    pub fuel_logs: EntityStore<FuelLog>,
    pub maintenance_logs: EntityStore<MaintenanceLog>,
    pub alerts: AlertBook,
    /// Último número de viaje emitido; nunca retrocede
    trip_sequence: u64,
}

impl FleetData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserva el siguiente número de secuencia de viaje
    pub fn next_trip_sequence(&mut self) -> u64 {
        self.trip_sequence += 1;
        self.trip_sequence
    }

    pub fn trip_sequence(&self) -> u64 {
        self.trip_sequence
    }

    /// Viajes no terminales (incluye Draft) que referencian el vehículo
    pub fn open_trips_for_vehicle(&self, vehicle_id: Uuid) -> impl Iterator<Item = &Trip> {
        self.trips
            .iter()
            .filter(move |trip| trip.vehicle_id == vehicle_id && !trip.status.is_terminal())
    }

    /// Viajes no terminales (incluye Draft) que referencian el conductor
    pub fn open_trips_for_driver(&self, driver_id: Uuid) -> impl Iterator<Item = &Trip> {
        self.trips
            .iter()
            .filter(move |trip| trip.driver_id == driver_id && !trip.status.is_terminal())
    }

    /// Viaje que tiene reclamado el vehículo (Dispatched u OnRoute)
    pub fn active_trip_for_vehicle(&self, vehicle_id: Uuid) -> Option<&Trip> {
        self.trips
            .iter()
            .find(|trip| trip.vehicle_id == vehicle_id && trip.status.holds_resources())
    }

    /// Viaje que tiene reclamado el conductor (Dispatched u OnRoute)
    pub fn active_trip_for_driver(&self, driver_id: Uuid) -> Option<&Trip> {
        self.trips
            .iter()
            .find(|trip| trip.driver_id == driver_id && trip.status.holds_resources())
    }
}

/// Handle compartido del almacén; se clona barato y se inyecta en los servicios
#[derive(Debug, Clone, Default)]
pub struct FleetStore {
    inner: Arc<RwLock<FleetData>>,
}

impl FleetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: FleetData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, FleetData> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, FleetData> {
        self.inner.write().await
    }
}
