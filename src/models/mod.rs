//! Modelos del sistema
//!
//! Este módulo contiene las entidades de la flota (vehículos, conductores,
//! viajes, combustible, mantenimiento), las alertas y los resultados de analytics.

pub mod alert;
pub mod analytics;
pub mod driver;
pub mod fuel_log;
pub mod maintenance_log;
pub mod trip;
pub mod vehicle;

pub use alert::{Alert, AlertSeverity, AlertSubject, AlertType};
pub use analytics::{DispatchPreview, FleetMetrics, MonthlyRollupRow, UtilizationMetrics, VehicleMetrics};
pub use driver::{CreateDriverRequest, Driver, DriverStatus, UpdateDriverRequest};
pub use fuel_log::{CreateFuelLogRequest, FuelLog, UpdateFuelLogRequest};
pub use maintenance_log::{
    CreateMaintenanceLogRequest, MaintenanceLog, MaintenanceOutcome, UpdateMaintenanceLogRequest,
    VehicleStatusChange,
};
pub use trip::{AdvanceTripRequest, TransitionExtra, Trip, TripCandidate, TripStatus};
pub use vehicle::{CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleStatus};
