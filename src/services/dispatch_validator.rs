//! Validador de despacho
//!
//! Funciones puras que deciden si un viaje candidato puede despacharse con el
//! estado actual de vehículos y conductores. Todas las reglas se evalúan y sus
//! fallos se acumulan por campo, para que el consumidor marque todo a la vez.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Driver, DriverStatus, TripCandidate, Vehicle, VehicleStatus};
use crate::utils::validation::validate_not_empty;

pub const FIELD_VEHICLE: &str = "vehicle_id";
pub const FIELD_CARGO: &str = "cargo_weight_kg";
pub const FIELD_DRIVER: &str = "driver_id";
pub const FIELD_DRIVER_LICENSE: &str = "driver_license";
pub const FIELD_ORIGIN: &str = "origin";
pub const FIELD_DESTINATION: &str = "destination";
pub const FIELD_REVENUE: &str = "estimated_revenue";

/// Conjunto no vacío de pares (campo, motivo)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DispatchRejection {
    fields: BTreeMap<String, Vec<String>>,
}

impl DispatchRejection {
    pub fn add(&mut self, field: &str, reason: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(reason.into());
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    pub fn reasons(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn into_result(self) -> ValidationResult {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for DispatchRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, reasons)| format!("{}: {}", field, reasons.join(", ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

pub type ValidationResult = Result<(), DispatchRejection>;

/// Valida un despacho contra instantáneas de vehículos y conductores.
///
/// Reglas:
/// 1. el vehículo existe y está `Available`;
/// 2. la carga es > 0 y no supera la capacidad del vehículo;
/// 3. el conductor existe y está `OnDuty`;
/// 4. la licencia del conductor no está vencida respecto a `today`;
/// 5. origen, destino e ingreso estimado están informados.
pub fn validate_dispatch(
    candidate: &TripCandidate,
    vehicles: &[Vehicle],
    drivers: &[Driver],
    today: NaiveDate,
) -> ValidationResult {
    let mut rejection = DispatchRejection::default();

    let vehicle = vehicles.iter().find(|v| v.id == candidate.vehicle_id);
    match vehicle {
        None => rejection.add(FIELD_VEHICLE, "vehicle not found"),
        Some(v) if v.status != VehicleStatus::Available => rejection.add(
            FIELD_VEHICLE,
            format!("vehicle {} is unavailable (status: {})", v.registration, v.status),
        ),
        Some(_) => {}
    }

    check_cargo(candidate, vehicle, &mut rejection);

    match drivers.iter().find(|d| d.id == candidate.driver_id) {
        None => rejection.add(FIELD_DRIVER, "driver not found"),
        Some(driver) => {
            if driver.status != DriverStatus::OnDuty {
                rejection.add(
                    FIELD_DRIVER,
                    format!("driver {} is not on duty (status: {})", driver.name, driver.status),
                );
            }
            if driver.license_expired(today) {
                rejection.add(
                    FIELD_DRIVER_LICENSE,
                    format!("driver license expired on {}", driver.license_expiry),
                );
            }
        }
    }

    check_trip_fields(candidate, &mut rejection);

    rejection.into_result()
}

/// Validación para borradores: solo carga y campos del formulario, sin exigir
/// disponibilidad de vehículo ni conductor.
pub fn validate_draft(candidate: &TripCandidate, vehicle: Option<&Vehicle>) -> ValidationResult {
    let mut rejection = DispatchRejection::default();
    check_cargo(candidate, vehicle, &mut rejection);
    check_trip_fields(candidate, &mut rejection);
    rejection.into_result()
}

fn check_cargo(candidate: &TripCandidate, vehicle: Option<&Vehicle>, rejection: &mut DispatchRejection) {
    // `!(x > 0)` también rechaza NaN
    if !(candidate.cargo_weight_kg > 0.0) {
        rejection.add(FIELD_CARGO, "cargo weight must be greater than 0");
        return;
    }
    if let Some(v) = vehicle {
        if candidate.cargo_weight_kg > v.max_capacity_kg {
            rejection.add(
                FIELD_CARGO,
                format!(
                    "cargo weight {} kg exceeds vehicle capacity of {} kg",
                    candidate.cargo_weight_kg, v.max_capacity_kg
                ),
            );
        }
    }
}

fn check_trip_fields(candidate: &TripCandidate, rejection: &mut DispatchRejection) {
    if validate_not_empty(&candidate.origin).is_err() {
        rejection.add(FIELD_ORIGIN, "origin is required");
    }
    if validate_not_empty(&candidate.destination).is_err() {
        rejection.add(FIELD_DESTINATION, "destination is required");
    }
    if candidate.estimated_revenue <= Decimal::ZERO {
        rejection.add(FIELD_REVENUE, "estimated revenue must be greater than 0");
    }
}
