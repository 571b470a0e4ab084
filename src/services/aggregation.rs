//! Motor de agregación
//!
//! Funciones puras sobre instantáneas completas del almacén. Son totales:
//! colecciones vacías producen métricas a cero y ninguna división por cero
//! llega a producir NaN o infinito.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    Driver, DriverStatus, FleetMetrics, FuelLog, MaintenanceLog, MonthlyRollupRow, Trip, TripStatus,
    UtilizationMetrics, Vehicle, VehicleMetrics, VehicleStatus,
};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Etiqueta "Mon YYYY" con nombres fijos en inglés
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_LABELS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???");
    format!("{} {}", name, year)
}

/// `part / whole × 100`, 0 si `whole` es 0
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn decimal_ratio(numerator: Decimal, denominator: Decimal) -> f64 {
    if denominator.is_zero() {
        return 0.0;
    }
    (numerator / denominator).to_f64().unwrap_or(0.0)
}

fn per_unit(amount: Decimal, units: f64) -> f64 {
    if units > 0.0 && units.is_finite() {
        amount.to_f64().unwrap_or(0.0) / units
    } else {
        0.0
    }
}

/// Ingreso de un viaje completado; cero para cualquier otro estado
fn completed_revenue(trip: &Trip) -> Decimal {
    if trip.status == TripStatus::Completed {
        trip.estimated_revenue
    } else {
        Decimal::ZERO
    }
}

/// Utilización: vehículos en viaje sobre el total de la flota.
///
/// La disponibilidad operativa (disponibles + en viaje) se informa aparte como
/// `readiness_pct`.
pub fn compute_utilization(vehicles: &[Vehicle]) -> UtilizationMetrics {
    let count = |status: VehicleStatus| vehicles.iter().filter(|v| v.status == status).count();
    let total = vehicles.len();
    let available = count(VehicleStatus::Available);
    let on_trip = count(VehicleStatus::OnTrip);

    UtilizationMetrics {
        total_vehicles: total,
        available,
        on_trip,
        in_shop: count(VehicleStatus::InShop),
        retired: count(VehicleStatus::Retired),
        utilization_pct: percentage(on_trip, total),
        readiness_pct: percentage(available + on_trip, total),
    }
}

/// Métricas financieras de un vehículo
pub fn compute_vehicle_metrics(
    vehicle: &Vehicle,
    trips: &[Trip],
    fuel_logs: &[FuelLog],
    maintenance_logs: &[MaintenanceLog],
) -> VehicleMetrics {
    let completed: Vec<&Trip> = trips
        .iter()
        .filter(|t| t.vehicle_id == vehicle.id && t.status == TripStatus::Completed)
        .collect();
    let revenue: Decimal = completed.iter().map(|t| t.estimated_revenue).sum();
    let distance: f64 = completed.iter().filter_map(|t| t.distance_km()).sum();

    let fuel: Vec<&FuelLog> = fuel_logs.iter().filter(|f| f.vehicle_id == vehicle.id).collect();
    let fuel_cost: Decimal = fuel.iter().map(|f| f.cost).sum();
    let fuel_liters: Decimal = fuel.iter().map(|f| f.liters).sum();

    let maintenance_cost: Decimal = maintenance_logs
        .iter()
        .filter(|m| m.vehicle_id == vehicle.id)
        .map(|m| m.cost)
        .sum();

    let total_cost = fuel_cost + maintenance_cost;
    let roi_pct = if vehicle.acquisition_cost > Decimal::ZERO {
        decimal_ratio(revenue - total_cost, vehicle.acquisition_cost) * 100.0
    } else {
        0.0
    };
    let liters = fuel_liters.to_f64().unwrap_or(0.0);
    let km_per_liter = if liters > 0.0 { distance / liters } else { 0.0 };

    VehicleMetrics {
        vehicle_id: vehicle.id,
        registration: vehicle.registration.clone(),
        status: vehicle.status,
        completed_trips: completed.len(),
        completed_distance_km: distance,
        revenue,
        fuel_cost,
        maintenance_cost,
        total_cost,
        fuel_liters,
        roi_pct,
        cost_per_km: per_unit(total_cost, distance),
        km_per_liter,
    }
}

/// Métricas para un vehículo concreto dentro de la colección
pub fn find_vehicle_metrics(
    vehicle_id: Uuid,
    vehicles: &[Vehicle],
    trips: &[Trip],
    fuel_logs: &[FuelLog],
    maintenance_logs: &[MaintenanceLog],
) -> Option<VehicleMetrics> {
    vehicles
        .iter()
        .find(|v| v.id == vehicle_id)
        .map(|v| compute_vehicle_metrics(v, trips, fuel_logs, maintenance_logs))
}

/// Resumen financiero y operativo de toda la flota
pub fn compute_fleet_metrics(
    vehicles: &[Vehicle],
    drivers: &[Driver],
    trips: &[Trip],
    fuel_logs: &[FuelLog],
    maintenance_logs: &[MaintenanceLog],
) -> FleetMetrics {
    let trip_count = |status: TripStatus| trips.iter().filter(|t| t.status == status).count();
    let driver_count = |status: DriverStatus| drivers.iter().filter(|d| d.status == status).count();

    let total_revenue: Decimal = trips.iter().map(completed_revenue).sum();
    let total_fuel_cost: Decimal = fuel_logs.iter().map(|f| f.cost).sum();
    let total_maintenance_cost: Decimal = maintenance_logs.iter().map(|m| m.cost).sum();
    let total_operational_cost = total_fuel_cost + total_maintenance_cost;
    let net_profit = total_revenue - total_operational_cost;
    let total_acquisition_cost: Decimal = vehicles.iter().map(|v| v.acquisition_cost).sum();
    let total_completed_distance_km: f64 = trips.iter().filter_map(Trip::distance_km).sum();

    FleetMetrics {
        utilization: compute_utilization(vehicles),
        total_drivers: drivers.len(),
        drivers_on_duty: driver_count(DriverStatus::OnDuty),
        drivers_on_trip: driver_count(DriverStatus::OnTrip),
        drivers_suspended: driver_count(DriverStatus::Suspended),
        draft_trips: trip_count(TripStatus::Draft),
        active_trips: trips.iter().filter(|t| t.status.holds_resources()).count(),
        completed_trips: trip_count(TripStatus::Completed),
        cancelled_trips: trip_count(TripStatus::Cancelled),
        total_revenue,
        total_fuel_cost,
        total_maintenance_cost,
        total_operational_cost,
        net_profit,
        total_acquisition_cost,
        fleet_roi_pct: decimal_ratio(net_profit, total_acquisition_cost) * 100.0,
        total_completed_distance_km,
        cost_per_km: per_unit(total_operational_cost, total_completed_distance_km),
    }
}

#[derive(Default)]
struct MonthBucket {
    revenue: Decimal,
    fuel_cost: Decimal,
    maintenance_cost: Decimal,
}

fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

/// Rollup mensual: ingresos de viajes completados por mes de finalización,
/// combustible y mantenimiento por fecha del registro. Filas en orden cronológico.
pub fn compute_monthly_rollup(
    trips: &[Trip],
    fuel_logs: &[FuelLog],
    maintenance_logs: &[MaintenanceLog],
) -> Vec<MonthlyRollupRow> {
    let mut buckets: BTreeMap<(i32, u32), MonthBucket> = BTreeMap::new();

    for trip in trips.iter().filter(|t| t.status == TripStatus::Completed) {
        // Un viaje completado siempre lleva completed_at; si no, cuenta en su creación
        let date = trip.completed_at.unwrap_or(trip.created_at).date_naive();
        buckets.entry(month_key(date)).or_default().revenue += trip.estimated_revenue;
    }
    for log in fuel_logs {
        buckets.entry(month_key(log.date)).or_default().fuel_cost += log.cost;
    }
    for log in maintenance_logs {
        buckets.entry(month_key(log.date)).or_default().maintenance_cost += log.cost;
    }

    buckets
        .into_iter()
        .map(|((year, month), bucket)| {
            let expenses = bucket.fuel_cost + bucket.maintenance_cost;
            MonthlyRollupRow {
                label: month_label(year, month),
                year,
                month,
                revenue: bucket.revenue,
                fuel_cost: bucket.fuel_cost,
                maintenance_cost: bucket.maintenance_cost,
                expenses,
                profit: bucket.revenue - expenses,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateFuelLogRequest, CreateMaintenanceLogRequest, CreateVehicleRequest, TripCandidate};
    use chrono::{TimeZone, Utc};

    fn vehicle(acquisition: i64) -> Vehicle {
        Vehicle::new(CreateVehicleRequest {
            registration: "BE-771-KL".to_string(),
            name: "MAN TGX".to_string(),
            max_capacity_kg: 24_000.0,
            odometer_km: Some(50_000.0),
            acquisition_cost: Some(Decimal::new(acquisition, 0)),
            region: None,
            license_expiry: None,
            next_service_due_km: None,
        })
    }

    fn completed_trip(vehicle: &Vehicle, revenue: i64, start: f64, end: f64, year: i32, month: u32) -> Trip {
        let candidate = TripCandidate {
            vehicle_id: vehicle.id,
            driver_id: Uuid::new_v4(),
            cargo_weight_kg: 1_000.0,
            cargo_description: None,
            origin: "Ghent".to_string(),
            destination: "Lille".to_string(),
            estimated_revenue: Decimal::new(revenue, 0),
        };
        let when = Utc.with_ymd_and_hms(year, month, 10, 12, 0, 0).unwrap();
        let mut trip = Trip::draft(&candidate, 1, when);
        trip.status = TripStatus::Completed;
        trip.start_odometer_km = Some(start);
        trip.end_odometer_km = Some(end);
        trip.completed_at = Some(when);
        trip
    }

    fn fuel(vehicle: &Vehicle, liters: i64, price_cents: i64, date: NaiveDate) -> FuelLog {
        FuelLog::new(CreateFuelLogRequest {
            vehicle_id: vehicle.id,
            date,
            liters: Decimal::new(liters, 0),
            price_per_liter: Decimal::new(price_cents, 2),
            odometer_km: None,
        })
    }

    fn maintenance(vehicle: &Vehicle, cost: i64, date: NaiveDate) -> MaintenanceLog {
        MaintenanceLog::new(CreateMaintenanceLogRequest {
            vehicle_id: vehicle.id,
            date,
            service_type: "Oil change".to_string(),
            description: None,
            cost: Decimal::new(cost, 0),
            next_due_km: None,
        })
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_fleet_is_all_zero() {
        let metrics = compute_fleet_metrics(&[], &[], &[], &[], &[]);
        assert_eq!(metrics, FleetMetrics::default());
        assert!(compute_monthly_rollup(&[], &[], &[]).is_empty());
    }

    #[test]
    fn test_roi_with_zero_acquisition_cost() {
        let v = vehicle(0);
        let trips = [completed_trip(&v, 10_000, 0.0, 100.0, 2026, 1)];
        let metrics = compute_vehicle_metrics(&v, &trips, &[], &[]);
        assert_eq!(metrics.roi_pct, 0.0);
        assert_eq!(metrics.revenue, Decimal::new(10_000, 0));
    }

    #[test]
    fn test_vehicle_financials() {
        let v = vehicle(100_000);
        let mut draft = completed_trip(&v, 99_999, 0.0, 0.0, 2026, 1);
        draft.status = TripStatus::Draft;
        let trips = [completed_trip(&v, 30_000, 50_000.0, 50_400.0, 2026, 2), draft];
        let fuel_logs = [fuel(&v, 100, 180, date(2026, 2, 3))];
        let maintenance_logs = [maintenance(&v, 2_000, date(2026, 2, 20))];

        let m = compute_vehicle_metrics(&v, &trips, &fuel_logs, &maintenance_logs);
        assert_eq!(m.completed_trips, 1);
        assert_eq!(m.revenue, Decimal::new(30_000, 0));
        assert_eq!(m.fuel_cost, Decimal::new(180, 0));
        assert_eq!(m.total_cost, Decimal::new(2_180, 0));
        assert!((m.roi_pct - 27.82).abs() < 1e-9);
        assert!((m.cost_per_km - 5.45).abs() < 1e-9);
        assert!((m.km_per_liter - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_utilization_definitions() {
        let mut fleet = vec![vehicle(1), vehicle(1), vehicle(1), vehicle(1)];
        fleet[0].status = VehicleStatus::OnTrip;
        fleet[1].status = VehicleStatus::InShop;
        fleet[2].status = VehicleStatus::Retired;

        let u = compute_utilization(&fleet);
        assert_eq!(u.utilization_pct, 25.0);
        assert_eq!(u.readiness_pct, 50.0);
        assert_eq!(compute_utilization(&[]).utilization_pct, 0.0);
    }

    #[test]
    fn test_cost_per_km_without_distance() {
        let v = vehicle(1);
        let fuel_logs = [fuel(&v, 10, 200, date(2026, 1, 1))];
        let metrics = compute_fleet_metrics(&[v], &[], &[], &fuel_logs, &[]);
        assert_eq!(metrics.cost_per_km, 0.0);
        assert_eq!(metrics.total_operational_cost, Decimal::new(20, 0));
        assert_eq!(metrics.net_profit, Decimal::new(-20, 0));
    }

    #[test]
    fn test_monthly_rollup_matches_fleet_totals() {
        let v = vehicle(80_000);
        let trips = [
            completed_trip(&v, 12_000, 0.0, 300.0, 2025, 12),
            completed_trip(&v, 8_500, 300.0, 520.0, 2026, 1),
            completed_trip(&v, 4_250, 520.0, 600.0, 2026, 1),
        ];
        let fuel_logs = [
            fuel(&v, 120, 179, date(2025, 12, 2)),
            fuel(&v, 95, 183, date(2026, 2, 14)),
        ];
        let maintenance_logs = [maintenance(&v, 1_450, date(2026, 1, 30))];

        let rows = compute_monthly_rollup(&trips, &fuel_logs, &maintenance_logs);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Dec 2025", "Jan 2026", "Feb 2026"]);

        let fleet = compute_fleet_metrics(&[v], &[], &trips, &fuel_logs, &maintenance_logs);
        let revenue: Decimal = rows.iter().map(|r| r.revenue).sum();
        let expenses: Decimal = rows.iter().map(|r| r.expenses).sum();
        let profit: Decimal = rows.iter().map(|r| r.profit).sum();
        assert_eq!(revenue, fleet.total_revenue);
        assert_eq!(expenses, fleet.total_operational_cost);
        assert_eq!(profit, fleet.net_profit);
    }

    #[test]
    fn test_month_label_is_fixed() {
        assert_eq!(month_label(2026, 1), "Jan 2026");
        assert_eq!(month_label(2026, 12), "Dec 2026");
    }
}
