//! Datos de demostración
//!
//! Flota pequeña con historia suficiente para que analytics y alertas
//! devuelvan algo útil en un entorno de desarrollo recién arrancado.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::models::{
    Alert, AlertSeverity, AlertSubject, AlertType, CreateDriverRequest, CreateFuelLogRequest,
    CreateMaintenanceLogRequest, CreateVehicleRequest, Driver, FuelLog, MaintenanceLog, Trip, TripCandidate,
    TripStatus, Vehicle, VehicleStatus,
};
use crate::repositories::FleetData;

fn vehicle(registration: &str, name: &str, capacity_kg: f64, odometer_km: f64, cost: i64, region: &str) -> Vehicle {
    Vehicle::new(CreateVehicleRequest {
        registration: registration.to_string(),
        name: name.to_string(),
        max_capacity_kg: capacity_kg,
        odometer_km: Some(odometer_km),
        acquisition_cost: Some(Decimal::new(cost, 0)),
        region: Some(region.to_string()),
        license_expiry: None,
        next_service_due_km: Some(odometer_km + 10_000.0),
    })
}

fn driver(name: &str, license_number: &str, category: &str, expiry_in_days: i64, safety_score: f64, now: DateTime<Utc>) -> Driver {
    Driver::new(CreateDriverRequest {
        name: name.to_string(),
        license_number: license_number.to_string(),
        license_category: category.to_string(),
        license_expiry: now.date_naive() + Duration::days(expiry_in_days),
        status: None,
        safety_score: Some(safety_score),
        completion_rate: Some(96.0),
        phone: None,
    })
}

/// Viaje ya completado, numerado con la secuencia del almacén
fn completed_trip(
    data: &mut FleetData,
    vehicle: &Vehicle,
    driver: &Driver,
    route: (&str, &str),
    cargo_kg: f64,
    revenue: i64,
    distance_km: f64,
    days_ago: i64,
    now: DateTime<Utc>,
) -> Trip {
    let candidate = TripCandidate {
        vehicle_id: vehicle.id,
        driver_id: driver.id,
        cargo_weight_kg: cargo_kg,
        cargo_description: None,
        origin: route.0.to_string(),
        destination: route.1.to_string(),
        estimated_revenue: Decimal::new(revenue, 0),
    };
    let created = now - Duration::days(days_ago);
    let sequence = data.next_trip_sequence();
    let mut trip = Trip::draft(&candidate, sequence, created);

    let start = vehicle.odometer_km - distance_km * (days_ago as f64 / 10.0 + 1.0);
    trip.status = TripStatus::Completed;
    trip.dispatched_at = Some(created);
    trip.completed_at = Some(created + Duration::hours(9));
    trip.start_odometer_km = Some(start);
    trip.end_odometer_km = Some(start + distance_km);
    trip
}

fn fuel(vehicle: &Vehicle, days_ago: i64, liters: i64, now: DateTime<Utc>) -> FuelLog {
    FuelLog::new(CreateFuelLogRequest {
        vehicle_id: vehicle.id,
        date: now.date_naive() - Duration::days(days_ago),
        liters: Decimal::new(liters, 0),
        price_per_liter: Decimal::new(182, 2),
        odometer_km: None,
    })
}

/// Construye la flota de demostración
pub fn demo_fleet(now: DateTime<Utc>) -> FleetData {
    let mut data = FleetData::new();

    let van = vehicle("VAN-001", "Van Nord", 1_200.0, 48_300.0, 32_000, "Nord");
    let truck = vehicle("TRK-002", "Porteur Est", 7_500.0, 121_800.0, 86_000, "Est");
    let mut rigid = vehicle("TRK-003", "Rigide Sud", 12_000.0, 203_400.0, 112_000, "Sud");
    rigid.next_service_due_km = Some(204_000.0);
    let mut old_van = vehicle("VAN-009", "Van Ouest", 900.0, 310_000.0, 18_000, "Ouest");
    old_van.status = VehicleStatus::Retired;

    let alex = driver("Alex Martin", "DL-48213", "C", 400, 92.0, now);
    let sam = driver("Sam Leroy", "DL-51877", "CE", 45, 88.0, now);
    let robin = driver("Robin Petit", "DL-60321", "B", 700, 64.0, now);

    let trips = vec![
        completed_trip(&mut data, &van, &alex, ("Lille", "Arras"), 800.0, 650, 54.0, 62, now),
        completed_trip(&mut data, &truck, &sam, ("Metz", "Nancy"), 6_200.0, 2_100, 58.0, 35, now),
        completed_trip(&mut data, &van, &alex, ("Lille", "Douai"), 950.0, 540, 41.0, 12, now),
        completed_trip(&mut data, &rigid, &robin, ("Lyon", "Grenoble"), 10_500.0, 3_400, 112.0, 6, now),
    ];

    let fuel_logs = vec![
        fuel(&van, 60, 48, now),
        fuel(&truck, 33, 160, now),
        fuel(&van, 11, 61, now),
        fuel(&rigid, 5, 240, now),
    ];

    let maintenance = MaintenanceLog::new(CreateMaintenanceLogRequest {
        vehicle_id: truck.id,
        date: now.date_naive() - Duration::days(20),
        service_type: "Oil change".to_string(),
        description: Some("Vidange et filtres".to_string()),
        cost: Decimal::new(42_000, 2),
        next_due_km: Some(131_800.0),
    });

    let mut historical = Alert::new(
        AlertType::FuelCostSpike,
        AlertSeverity::Warning,
        AlertSubject::Vehicle(truck.id),
        &(now - Duration::days(40)).format("%Y-%m").to_string(),
        format!("Fuel spend for {} rose sharply over the previous month", truck.registration),
    );
    historical.id = format!("history:{}", historical.id);
    historical.acknowledged = true;
    historical.acknowledged_at = Some(now - Duration::days(40));

    for v in [van, truck, rigid, old_van] {
        data.vehicles.upsert(v);
    }
    for d in [alex, sam, robin] {
        data.drivers.upsert(d);
    }
    for t in trips {
        data.trips.upsert(t);
    }
    for f in fuel_logs {
        data.fuel_logs.upsert(f);
    }
    data.maintenance_logs.upsert(maintenance);
    data.alerts.historical.push(historical);

    info!(
        "🌱 Demo fleet seeded: {} vehicles, {} drivers, {} trips",
        data.vehicles.len(),
        data.drivers.len(),
        data.trips.len()
    );
    data
}
