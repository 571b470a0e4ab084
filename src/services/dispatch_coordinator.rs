//! Coordinador de despacho
//!
//! Máquina de estados de los viajes. Cada transición se planifica sobre una
//! vista exclusiva del almacén (lock de escritura), se comprueban todas las
//! reglas y solo entonces se escriben viaje, vehículo y conductor juntos.
//!
//! ```text
//! Draft ──► Dispatched ──► OnRoute ──► Completed
//!   │           │  └──────────────────►  ▲
//!   └───────────┴──► Cancelled
//! ```

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    DispatchPreview, Driver, DriverStatus, TransitionExtra, Trip, TripCandidate, TripStatus, Vehicle,
    VehicleStatus,
};
use crate::repositories::{FleetData, FleetStore};
use crate::services::aggregation::compute_vehicle_metrics;
use crate::services::dispatch_validator::{
    validate_dispatch, validate_draft, DispatchRejection, FIELD_DRIVER, FIELD_VEHICLE,
};
use crate::services::{system_clock, Clock};
use crate::utils::errors::{not_found_error, referential_error, AppError, AppResult, TransitionError};

/// Escrituras de una transición, aplicadas juntas o no aplicadas
#[derive(Debug)]
struct TransitionPlan {
    trip: Trip,
    vehicle: Option<Vehicle>,
    driver: Option<Driver>,
}

impl TransitionPlan {
    fn trip_only(trip: Trip) -> Self {
        Self {
            trip,
            vehicle: None,
            driver: None,
        }
    }

    fn apply(self, data: &mut FleetData) -> Trip {
        if let Some(vehicle) = self.vehicle {
            data.vehicles.upsert(vehicle);
        }
        if let Some(driver) = self.driver {
            data.drivers.upsert(driver);
        }
        data.trips.upsert(self.trip.clone());
        self.trip
    }
}

#[derive(Clone)]
pub struct DispatchCoordinator {
    store: FleetStore,
    clock: Clock,
}

impl DispatchCoordinator {
    pub fn new(store: FleetStore) -> Self {
        Self::with_clock(store, system_clock())
    }

    pub fn with_clock(store: FleetStore, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Crea y despacha un viaje en una sola operación
    pub async fn dispatch(&self, candidate: TripCandidate) -> AppResult<Trip> {
        let now = (self.clock)();
        let mut data = self.store.write().await;

        ensure_references(&data, &candidate)?;
        check_dispatch(&data, &candidate, now, None)?;

        let draft = Trip::draft(&candidate, data.trip_sequence() + 1, now);
        let plan = plan_dispatch(&data, draft, now)?;

        data.next_trip_sequence();
        let trip = plan.apply(&mut data);
        info!(
            "🚚 Trip {} dispatched: vehicle {} / driver {} ({} kg)",
            trip.trip_number, trip.vehicle_id, trip.driver_id, trip.cargo_weight_kg
        );
        Ok(trip)
    }

    /// Crea un viaje en Draft para planificación, sin reclamar recursos
    pub async fn create_draft(&self, candidate: TripCandidate) -> AppResult<Trip> {
        let now = (self.clock)();
        let mut data = self.store.write().await;

        ensure_references(&data, &candidate)?;
        let mut rejection = validate_draft(&candidate, data.vehicles.get(candidate.vehicle_id))
            .err()
            .unwrap_or_default();
        add_open_trip_conflicts(&data, &candidate, None, &mut rejection);
        if !rejection.is_empty() {
            return Err(AppError::Validation(rejection));
        }

        let sequence = data.next_trip_sequence();
        let trip = Trip::draft(&candidate, sequence, now);
        data.trips.upsert(trip.clone());
        info!("📝 Draft trip {} created", trip.trip_number);
        Ok(trip)
    }

    /// Avanza un viaje al estado indicado
    pub async fn advance(&self, trip_id: Uuid, next: TripStatus, extra: TransitionExtra) -> AppResult<Trip> {
        let now = (self.clock)();
        let mut data = self.store.write().await;

        let trip = data
            .trips
            .get(trip_id)
            .cloned()
            .ok_or_else(|| not_found_error("Trip", &trip_id))?;

        if trip.status.is_terminal() {
            return Err(TransitionError::TerminalStatus(trip.status).into());
        }

        let plan = match (trip.status, next) {
            (TripStatus::Draft, TripStatus::Dispatched) => {
                let candidate = trip.as_candidate();
                ensure_references(&data, &candidate)?;
                check_dispatch(&data, &candidate, now, Some(trip.id))?;
                plan_dispatch(&data, trip, now)?
            }
            (TripStatus::Dispatched, TripStatus::OnRoute) => {
                let mut trip = trip;
                trip.status = TripStatus::OnRoute;
                TransitionPlan::trip_only(trip)
            }
            (TripStatus::Dispatched | TripStatus::OnRoute, TripStatus::Completed) => {
                plan_completion(&data, trip, &extra, now)?
            }
            (TripStatus::Draft | TripStatus::Dispatched, TripStatus::Cancelled) => {
                plan_cancellation(&data, trip, now)
            }
            (from, to) => return Err(TransitionError::NotAllowed { from, to }.into()),
        };

        let trip = plan.apply(&mut data);
        info!("🔄 Trip {} is now {}", trip.trip_number, trip.status);
        Ok(trip)
    }

    /// Cancela un viaje en Draft o Dispatched
    pub async fn cancel(&self, trip_id: Uuid) -> AppResult<Trip> {
        self.advance(trip_id, TripStatus::Cancelled, TransitionExtra::default())
            .await
    }

    /// Elimina un viaje que no tiene recursos reclamados
    pub async fn delete_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        let mut data = self.store.write().await;
        let trip = data
            .trips
            .get(trip_id)
            .ok_or_else(|| not_found_error("Trip", &trip_id))?;

        if trip.status.holds_resources() {
            return Err(TransitionError::TripActive.into());
        }

        let removed = data
            .trips
            .remove(trip_id)
            .ok_or_else(|| not_found_error("Trip", &trip_id))?;
        info!("🗑️ Trip {} deleted", removed.trip_number);
        Ok(removed)
    }

    /// Valida un candidato y calcula la vista previa sin escribir nada
    pub async fn preview(&self, candidate: &TripCandidate) -> DispatchPreview {
        let now = (self.clock)();
        let data = self.store.read().await;

        let rejection = dispatch_rejection(&data, candidate, now, None);
        let vehicle = data.vehicles.get(candidate.vehicle_id);
        let metrics = vehicle.map(|v| {
            compute_vehicle_metrics(
                v,
                data.trips.all(),
                data.fuel_logs.all(),
                data.maintenance_logs.all(),
            )
        });
        let (load_factor_pct, remaining_capacity_kg) = match vehicle {
            Some(v) if v.max_capacity_kg > 0.0 => (
                Some(candidate.cargo_weight_kg / v.max_capacity_kg * 100.0),
                Some(v.max_capacity_kg - candidate.cargo_weight_kg),
            ),
            _ => (None, None),
        };

        debug!("Dispatch preview computed for vehicle {}", candidate.vehicle_id);
        DispatchPreview {
            valid: rejection.is_empty(),
            errors: rejection.fields().clone(),
            vehicle: metrics,
            load_factor_pct,
            remaining_capacity_kg,
        }
    }
}

/// Un candidato debe referenciar un vehículo no retirado y un conductor existentes
fn ensure_references(data: &FleetData, candidate: &TripCandidate) -> AppResult<()> {
    match data.vehicles.get(candidate.vehicle_id) {
        None => return Err(referential_error("Vehicle", &candidate.vehicle_id, "does not exist")),
        Some(v) if v.is_retired() => {
            return Err(referential_error("Vehicle", &candidate.vehicle_id, "is retired"))
        }
        Some(_) => {}
    }
    if !data.drivers.contains(candidate.driver_id) {
        return Err(referential_error("Driver", &candidate.driver_id, "does not exist"));
    }
    Ok(())
}

/// Reglas de despacho más la unicidad de viajes abiertos por recurso
fn dispatch_rejection(
    data: &FleetData,
    candidate: &TripCandidate,
    now: DateTime<Utc>,
    except: Option<Uuid>,
) -> DispatchRejection {
    let mut rejection = validate_dispatch(candidate, data.vehicles.all(), data.drivers.all(), now.date_naive())
        .err()
        .unwrap_or_default();
    add_open_trip_conflicts(data, candidate, except, &mut rejection);
    rejection
}

fn check_dispatch(
    data: &FleetData,
    candidate: &TripCandidate,
    now: DateTime<Utc>,
    except: Option<Uuid>,
) -> AppResult<()> {
    let rejection = dispatch_rejection(data, candidate, now, except);
    if rejection.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(rejection))
    }
}

/// Un vehículo o conductor solo puede figurar en un viaje no terminal
fn add_open_trip_conflicts(
    data: &FleetData,
    candidate: &TripCandidate,
    except: Option<Uuid>,
    rejection: &mut DispatchRejection,
) {
    if let Some(open) = data
        .open_trips_for_vehicle(candidate.vehicle_id)
        .find(|t| Some(t.id) != except)
    {
        rejection.add(
            FIELD_VEHICLE,
            format!("vehicle is already assigned to open trip {}", open.trip_number),
        );
    }
    if let Some(open) = data
        .open_trips_for_driver(candidate.driver_id)
        .find(|t| Some(t.id) != except)
    {
        rejection.add(
            FIELD_DRIVER,
            format!("driver is already assigned to open trip {}", open.trip_number),
        );
    }
}

fn plan_dispatch(data: &FleetData, mut trip: Trip, now: DateTime<Utc>) -> AppResult<TransitionPlan> {
    let mut vehicle = data
        .vehicles
        .get(trip.vehicle_id)
        .cloned()
        .ok_or_else(|| referential_error("Vehicle", &trip.vehicle_id, "does not exist"))?;
    let mut driver = data
        .drivers
        .get(trip.driver_id)
        .cloned()
        .ok_or_else(|| referential_error("Driver", &trip.driver_id, "does not exist"))?;

    if data.active_trip_for_vehicle(vehicle.id).is_some() {
        warn!("Vehicle {} already held by another trip", vehicle.registration);
        return Err(TransitionError::VehicleOnTrip.into());
    }
    if data.active_trip_for_driver(driver.id).is_some() {
        warn!("Driver {} already held by another trip", driver.name);
        return Err(TransitionError::DriverOnTrip.into());
    }

    trip.status = TripStatus::Dispatched;
    trip.dispatched_at = Some(now);
    trip.start_odometer_km = Some(vehicle.odometer_km);

    vehicle.status = VehicleStatus::OnTrip;
    vehicle.updated_at = now;
    driver.status = DriverStatus::OnTrip;
    driver.updated_at = now;

    Ok(TransitionPlan {
        trip,
        vehicle: Some(vehicle),
        driver: Some(driver),
    })
}

fn plan_completion(
    data: &FleetData,
    mut trip: Trip,
    extra: &TransitionExtra,
    now: DateTime<Utc>,
) -> AppResult<TransitionPlan> {
    let start = trip
        .start_odometer_km
        .ok_or(TransitionError::MissingStartOdometer)?;
    let end = extra
        .end_odometer_km
        .ok_or(TransitionError::MissingEndOdometer)?;
    // `!(end >= start)` también rechaza NaN
    if !(end >= start) {
        return Err(TransitionError::EndOdometerBeforeStart { start, end }.into());
    }

    let mut vehicle = data
        .vehicles
        .get(trip.vehicle_id)
        .cloned()
        .ok_or_else(|| not_found_error("Vehicle", &trip.vehicle_id))?;
    let mut driver = data
        .drivers
        .get(trip.driver_id)
        .cloned()
        .ok_or_else(|| not_found_error("Driver", &trip.driver_id))?;

    if vehicle.status != VehicleStatus::OnTrip {
        return Err(TransitionError::VehicleNotClaimed(vehicle.status).into());
    }
    if driver.status != DriverStatus::OnTrip {
        return Err(TransitionError::DriverNotClaimed.into());
    }

    trip.status = TripStatus::Completed;
    trip.end_odometer_km = Some(end);
    trip.completed_at = Some(now);

    vehicle.status = VehicleStatus::Available;
    vehicle.odometer_km = vehicle.odometer_km.max(end);
    vehicle.updated_at = now;
    driver.status = DriverStatus::OnDuty;
    driver.updated_at = now;

    Ok(TransitionPlan {
        trip,
        vehicle: Some(vehicle),
        driver: Some(driver),
    })
}

fn plan_cancellation(data: &FleetData, mut trip: Trip, now: DateTime<Utc>) -> TransitionPlan {
    let claimed = trip.status.holds_resources();

    // Solo se liberan recursos que este viaje tenía reclamados
    let vehicle = data
        .vehicles
        .get(trip.vehicle_id)
        .filter(|v| claimed && v.status == VehicleStatus::OnTrip)
        .cloned()
        .map(|mut v| {
            v.status = VehicleStatus::Available;
            v.updated_at = now;
            v
        });
    let driver = data
        .drivers
        .get(trip.driver_id)
        .filter(|d| claimed && d.status == DriverStatus::OnTrip)
        .cloned()
        .map(|mut d| {
            d.status = DriverStatus::OnDuty;
            d.updated_at = now;
            d
        });

    trip.status = TripStatus::Cancelled;
    trip.cancelled_at = Some(now);

    TransitionPlan {
        trip,
        vehicle,
        driver,
    }
}
