#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use fleet_dispatch::models::{CreateDriverRequest, CreateVehicleRequest, Driver, TripCandidate, Vehicle};
use fleet_dispatch::repositories::FleetStore;
use fleet_dispatch::services::{
    fixed_clock, AnalyticsService, Clock, DispatchCoordinator, FleetService,
};

pub fn clock() -> Clock {
    fixed_clock(Utc.with_ymd_and_hms(2026, 3, 15, 10, 0, 0).unwrap())
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn vehicle_request(registration: &str, capacity_kg: f64, odometer_km: f64) -> CreateVehicleRequest {
    CreateVehicleRequest {
        registration: registration.to_string(),
        name: format!("Truck {}", registration),
        max_capacity_kg: capacity_kg,
        odometer_km: Some(odometer_km),
        acquisition_cost: Some(Decimal::new(50_000, 0)),
        region: Some("North".to_string()),
        license_expiry: None,
        next_service_due_km: None,
    }
}

pub fn driver_request(name: &str, license_number: &str) -> CreateDriverRequest {
    CreateDriverRequest {
        name: name.to_string(),
        license_number: license_number.to_string(),
        license_category: "C".to_string(),
        license_expiry: date(2027, 6, 30),
        status: None,
        safety_score: Some(90.0),
        completion_rate: None,
        phone: None,
    }
}

pub fn candidate(vehicle_id: Uuid, driver_id: Uuid, cargo_kg: f64) -> TripCandidate {
    TripCandidate {
        vehicle_id,
        driver_id,
        cargo_weight_kg: cargo_kg,
        cargo_description: Some("Pallets".to_string()),
        origin: "Rotterdam".to_string(),
        destination: "Utrecht".to_string(),
        estimated_revenue: Decimal::new(500, 0),
    }
}

/// Flota mínima: V1 (1000 kg), V2 (5000 kg), D1 y D2 en servicio
pub struct Fixture {
    pub store: FleetStore,
    pub coordinator: DispatchCoordinator,
    pub fleet: FleetService,
    pub analytics: AnalyticsService,
    pub v1: Vehicle,
    pub v2: Vehicle,
    pub d1: Driver,
    pub d2: Driver,
}

pub async fn fixture() -> Fixture {
    let store = FleetStore::new();
    let fleet = FleetService::new(store.clone());

    let v1 = fleet.create_vehicle(vehicle_request("NL-001-AA", 1_000.0, 10_000.0)).await.unwrap();
    let v2 = fleet.create_vehicle(vehicle_request("NL-002-BB", 5_000.0, 42_000.0)).await.unwrap();
    let d1 = fleet.create_driver(driver_request("Daan de Vries", "DL-1001")).await.unwrap();
    let d2 = fleet.create_driver(driver_request("Eva Jansen", "DL-1002")).await.unwrap();

    Fixture {
        coordinator: DispatchCoordinator::with_clock(store.clone(), clock()),
        analytics: AnalyticsService::new(store.clone()),
        fleet,
        store,
        v1,
        v2,
        d1,
        d2,
    }
}
