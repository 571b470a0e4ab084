//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Todos los servicios comparten el mismo
//! `FleetStore`.

use crate::config::environment::EnvironmentConfig;
use crate::repositories::FleetStore;
use crate::services::{
    system_clock, AlertService, AnalyticsService, Clock, DispatchCoordinator, FleetService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub store: FleetStore,
    pub coordinator: DispatchCoordinator,
    pub fleet: FleetService,
    pub analytics: AnalyticsService,
    pub alerts: AlertService,
}

impl AppState {
    pub fn new(store: FleetStore, config: EnvironmentConfig) -> Self {
        Self::with_clock(store, config, system_clock())
    }

    /// Igual que `new` pero con un reloj fijo para despacho y alertas
    pub fn with_clock(store: FleetStore, config: EnvironmentConfig, clock: Clock) -> Self {
        Self {
            coordinator: DispatchCoordinator::with_clock(store.clone(), clock.clone()),
            fleet: FleetService::new(store.clone()),
            analytics: AnalyticsService::new(store.clone()),
            alerts: AlertService::with_clock(store.clone(), config.alerts.clone(), clock),
            config,
            store,
        }
    }
}
