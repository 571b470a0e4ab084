//! Services module
//!
//! Este módulo contiene la lógica de negocio del núcleo de despacho:
//! validación, máquina de estados de viajes, agregación y alertas.
//! Los servicios reciben el `FleetStore` explícitamente desde la raíz de composición.

pub mod aggregation;
pub mod alerts;
pub mod analytics_service;
pub mod dispatch_coordinator;
pub mod dispatch_validator;
pub mod fleet_service;
pub mod seed;

pub use aggregation::*;
pub use alerts::{derive_alerts, AlertService, AlertThresholds};
pub use analytics_service::AnalyticsService;
pub use dispatch_coordinator::DispatchCoordinator;
pub use dispatch_validator::{validate_dispatch, DispatchRejection, ValidationResult};
pub use fleet_service::FleetService;

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Fuente de "ahora" inyectable
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Reloj fijo, útil en tests y herramientas
pub fn fixed_clock(at: DateTime<Utc>) -> Clock {
    Arc::new(move || at)
}
