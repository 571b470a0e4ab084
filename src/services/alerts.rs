//! Derivación de alertas
//!
//! Cada regla es independiente y puede disparar varias alertas para la misma
//! entidad. `derive_alerts` es pura; el reconocimiento vive en `AlertBook` y no
//! influye en la derivación.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::models::{Alert, AlertSeverity, AlertSubject, AlertType, FuelLog, VehicleStatus};
use crate::repositories::{AlertBook, FleetData, FleetStore};
use crate::services::aggregation::month_label;
use crate::services::{system_clock, Clock};
use crate::utils::errors::{not_found_error, AppResult};

/// Umbrales configurables de las reglas de alerta
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlertThresholds {
    /// Días de antelación para avisar de licencias por vencer
    pub license_horizon_days: i64,
    /// Margen (%) antes del próximo servicio
    pub service_due_pct: f64,
    /// Puntuación de seguridad mínima de bajo riesgo
    pub safety_score_min: f64,
    /// Incremento mensual (%) del gasto de combustible que dispara alerta
    pub fuel_spike_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            license_horizon_days: 90,
            service_due_pct: 5.0,
            safety_score_min: 70.0,
            fuel_spike_pct: 20.0,
        }
    }
}

/// Deriva todas las alertas del estado actual de la flota
pub fn derive_alerts(data: &FleetData, thresholds: &AlertThresholds, today: NaiveDate) -> Vec<Alert> {
    let mut alerts = Vec::new();
    vehicle_license_alerts(data, thresholds, today, &mut alerts);
    service_due_alerts(data, thresholds, &mut alerts);
    driver_license_alerts(data, thresholds, today, &mut alerts);
    safety_score_alerts(data, thresholds, &mut alerts);
    fuel_spike_alerts(data.fuel_logs.all(), thresholds, &mut alerts);
    alerts
}

/// Alertas actuales: derivadas no reconocidas + reconocidas tal cual + históricas
///
/// Solo se oculta una derivada cuyo id (con su ocurrencia) ya fue reconocido.
pub fn merge_with_book(derived: Vec<Alert>, book: &AlertBook) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = derived
        .into_iter()
        .filter(|alert| !book.is_acknowledged(&alert.id))
        .collect();
    alerts.extend(book.acknowledged.iter().cloned());
    alerts.extend(book.historical.iter().cloned());
    alerts
}

fn license_alert(
    expiry: NaiveDate,
    today: NaiveDate,
    horizon_days: i64,
    subject: AlertSubject,
    owner: &str,
    expired: AlertType,
    expiring: AlertType,
) -> Option<Alert> {
    let days_left = (expiry - today).num_days();
    if days_left < 0 {
        Some(Alert::new(
            expired,
            AlertSeverity::Critical,
            subject,
            &expiry.to_string(),
            format!("{} license expired on {}", owner, expiry),
        ))
    } else if days_left <= horizon_days {
        Some(Alert::new(
            expiring,
            AlertSeverity::Warning,
            subject,
            &expiry.to_string(),
            format!("{} license expires in {} days ({})", owner, days_left, expiry),
        ))
    } else {
        None
    }
}

fn vehicle_license_alerts(
    data: &FleetData,
    thresholds: &AlertThresholds,
    today: NaiveDate,
    alerts: &mut Vec<Alert>,
) {
    for vehicle in data.vehicles.iter().filter(|v| v.status != VehicleStatus::Retired) {
        let Some(expiry) = vehicle.license_expiry else {
            continue;
        };
        alerts.extend(license_alert(
            expiry,
            today,
            thresholds.license_horizon_days,
            AlertSubject::Vehicle(vehicle.id),
            &format!("Vehicle {}", vehicle.registration),
            AlertType::VehicleLicenseExpired,
            AlertType::VehicleLicenseExpiring,
        ));
    }
}

fn service_due_alerts(data: &FleetData, thresholds: &AlertThresholds, alerts: &mut Vec<Alert>) {
    for vehicle in data.vehicles.iter().filter(|v| v.status != VehicleStatus::Retired) {
        let Some(due) = vehicle.next_service_due_km.filter(|due| *due > 0.0) else {
            continue;
        };
        let subject = AlertSubject::Vehicle(vehicle.id);
        let occurrence = format!("{:.0}", due);
        if vehicle.odometer_km >= due {
            alerts.push(Alert::new(
                AlertType::ServiceOverdue,
                AlertSeverity::Critical,
                subject,
                &occurrence,
                format!(
                    "Vehicle {} is {:.0} km past its service due at {:.0} km",
                    vehicle.registration,
                    vehicle.odometer_km - due,
                    due
                ),
            ));
        } else if vehicle.odometer_km >= due * (1.0 - thresholds.service_due_pct / 100.0) {
            alerts.push(Alert::new(
                AlertType::ServiceDueSoon,
                AlertSeverity::Warning,
                subject,
                &occurrence,
                format!(
                    "Vehicle {} is {:.0} km from its service due at {:.0} km",
                    vehicle.registration,
                    due - vehicle.odometer_km,
                    due
                ),
            ));
        }
    }
}

fn driver_license_alerts(
    data: &FleetData,
    thresholds: &AlertThresholds,
    today: NaiveDate,
    alerts: &mut Vec<Alert>,
) {
    for driver in data.drivers.iter() {
        alerts.extend(license_alert(
            driver.license_expiry,
            today,
            thresholds.license_horizon_days,
            AlertSubject::Driver(driver.id),
            &format!("Driver {}", driver.name),
            AlertType::DriverLicenseExpired,
            AlertType::DriverLicenseExpiring,
        ));
    }
}

fn safety_score_alerts(data: &FleetData, thresholds: &AlertThresholds, alerts: &mut Vec<Alert>) {
    for driver in data
        .drivers
        .iter()
        .filter(|d| d.safety_score < thresholds.safety_score_min)
    {
        alerts.push(Alert::new(
            AlertType::LowSafetyScore,
            AlertSeverity::Warning,
            AlertSubject::Driver(driver.id),
            &format!("{:.0}", driver.safety_score),
            format!(
                "Driver {} has a safety score of {:.0} (minimum {:.0})",
                driver.name, driver.safety_score, thresholds.safety_score_min
            ),
        ));
    }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Compara el último mes con repostajes contra el mes natural anterior
fn fuel_spike_alerts(fuel_logs: &[FuelLog], thresholds: &AlertThresholds, alerts: &mut Vec<Alert>) {
    let Some(latest) = fuel_logs.iter().map(|f| (f.date.year(), f.date.month())).max() else {
        return;
    };
    let previous = previous_month(latest.0, latest.1);
    let month_cost = |key: (i32, u32)| -> Decimal {
        fuel_logs
            .iter()
            .filter(|f| (f.date.year(), f.date.month()) == key)
            .map(|f| f.cost)
            .sum()
    };

    let current_cost = month_cost(latest);
    let previous_cost = month_cost(previous);
    if previous_cost <= Decimal::ZERO {
        return;
    }

    let increase_pct = ((current_cost - previous_cost) / previous_cost * Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0);
    if increase_pct > thresholds.fuel_spike_pct {
        alerts.push(Alert::new(
            AlertType::FuelCostSpike,
            AlertSeverity::Warning,
            AlertSubject::Fleet,
            &format!("{}-{:02}", latest.0, latest.1),
            format!(
                "Fuel cost rose {:.1}% in {} ({} vs {})",
                increase_pct,
                month_label(latest.0, latest.1),
                current_cost,
                previous_cost
            ),
        ));
    }
}

/// Servicio de alertas sobre el almacén compartido
#[derive(Clone)]
pub struct AlertService {
    store: FleetStore,
    thresholds: AlertThresholds,
    clock: Clock,
}

impl AlertService {
    pub fn new(store: FleetStore, thresholds: AlertThresholds) -> Self {
        Self::with_clock(store, thresholds, system_clock())
    }

    pub fn with_clock(store: FleetStore, thresholds: AlertThresholds, clock: Clock) -> Self {
        Self {
            store,
            thresholds,
            clock,
        }
    }

    /// Alertas actuales, derivadas de una lectura consistente del almacén
    pub async fn current(&self) -> Vec<Alert> {
        let today = (self.clock)().date_naive();
        let data = self.store.read().await;
        let derived = derive_alerts(&data, &self.thresholds, today);
        merge_with_book(derived, &data.alerts)
    }

    /// Reconoce una alerta; la copia queda guardada tal cual
    pub async fn acknowledge(&self, alert_id: &str) -> AppResult<Alert> {
        let now: DateTime<Utc> = (self.clock)();
        let mut data = self.store.write().await;

        if let Some(existing) = data
            .alerts
            .acknowledged
            .iter()
            .chain(data.alerts.historical.iter())
            .find(|alert| alert.id == alert_id)
        {
            return Ok(existing.clone());
        }

        let mut alert = derive_alerts(&data, &self.thresholds, now.date_naive())
            .into_iter()
            .find(|alert| alert.id == alert_id)
            .ok_or_else(|| not_found_error("Alert", &alert_id))?;
        alert.acknowledged = true;
        alert.acknowledged_at = Some(now);
        data.alerts.acknowledged.push(alert.clone());

        info!("✅ Alert {} acknowledged", alert.id);
        Ok(alert)
    }
}
