//! Servicio de entidades de la flota
//!
//! CRUD de vehículos, conductores, combustible y mantenimiento sobre el
//! `FleetStore`. Los cambios de estado que pertenecen al despacho (`OnTrip`)
//! no pueden fijarse desde aquí.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    CreateDriverRequest, CreateFuelLogRequest, CreateMaintenanceLogRequest, CreateVehicleRequest, Driver,
    DriverStatus, FuelLog, MaintenanceLog, MaintenanceOutcome, Trip, UpdateDriverRequest,
    UpdateFuelLogRequest, UpdateMaintenanceLogRequest, UpdateVehicleRequest, Vehicle, VehicleStatus,
    VehicleStatusChange,
};
use crate::repositories::{FleetData, FleetStore};
use crate::utils::errors::{
    conflict_error, not_found_error, referential_error, AppError, AppResult, TransitionError,
};

#[derive(Clone)]
pub struct FleetService {
    store: FleetStore,
}

impl FleetService {
    pub fn new(store: FleetStore) -> Self {
        Self { store }
    }

    // ------------------------------------------------------------------
    // Vehículos
    // ------------------------------------------------------------------

    pub async fn list_vehicles(&self) -> Vec<Vehicle> {
        self.store.read().await.vehicles.all().to_vec()
    }

    pub async fn get_vehicle(&self, id: Uuid) -> AppResult<Vehicle> {
        self.store
            .read()
            .await
            .vehicles
            .get(id)
            .cloned()
            .ok_or_else(|| not_found_error("Vehicle", &id))
    }

    pub async fn create_vehicle(&self, request: CreateVehicleRequest) -> AppResult<Vehicle> {
        request.validate()?;
        let vehicle = Vehicle::new(request);

        let mut data = self.store.write().await;
        ensure_unique_registration(&data, &vehicle.registration, None)?;
        data.vehicles.upsert(vehicle.clone());

        info!("🚛 Vehicle {} registered ({} kg)", vehicle.registration, vehicle.max_capacity_kg);
        Ok(vehicle)
    }

    pub async fn update_vehicle(&self, id: Uuid, request: UpdateVehicleRequest) -> AppResult<Vehicle> {
        request.validate()?;
        let mut data = self.store.write().await;
        let mut vehicle = data
            .vehicles
            .get(id)
            .cloned()
            .ok_or_else(|| not_found_error("Vehicle", &id))?;

        if let Some(status) = request.status {
            check_vehicle_status_change(&data, &vehicle, status)?;
            vehicle.status = status;
        }
        if let Some(registration) = request.registration {
            let registration = registration.trim().to_uppercase();
            ensure_unique_registration(&data, &registration, Some(id))?;
            vehicle.registration = registration;
        }
        if let Some(name) = request.name {
            vehicle.name = name;
        }
        if let Some(capacity) = request.max_capacity_kg {
            vehicle.max_capacity_kg = capacity;
        }
        if let Some(odometer) = request.odometer_km {
            vehicle.odometer_km = odometer;
        }
        if let Some(cost) = request.acquisition_cost {
            vehicle.acquisition_cost = cost;
        }
        if request.region.is_some() {
            vehicle.region = request.region;
        }
        if request.license_expiry.is_some() {
            vehicle.license_expiry = request.license_expiry;
        }
        if request.next_service_due_km.is_some() {
            vehicle.next_service_due_km = request.next_service_due_km;
        }
        vehicle.updated_at = Utc::now();

        data.vehicles.upsert(vehicle.clone());
        info!("✏️ Vehicle {} updated (status: {})", vehicle.registration, vehicle.status);
        Ok(vehicle)
    }

    pub async fn delete_vehicle(&self, id: Uuid) -> AppResult<Vehicle> {
        let mut data = self.store.write().await;
        if !data.vehicles.contains(id) {
            return Err(not_found_error("Vehicle", &id));
        }
        if data.open_trips_for_vehicle(id).next().is_some() {
            return Err(referential_error("Vehicle", &id, "is referenced by an open trip"));
        }
        let vehicle = data
            .vehicles
            .remove(id)
            .ok_or_else(|| not_found_error("Vehicle", &id))?;
        info!("🗑️ Vehicle {} deleted", vehicle.registration);
        Ok(vehicle)
    }

    // ------------------------------------------------------------------
    // Conductores
    // ------------------------------------------------------------------

    pub async fn list_drivers(&self) -> Vec<Driver> {
        self.store.read().await.drivers.all().to_vec()
    }

    pub async fn get_driver(&self, id: Uuid) -> AppResult<Driver> {
        self.store
            .read()
            .await
            .drivers
            .get(id)
            .cloned()
            .ok_or_else(|| not_found_error("Driver", &id))
    }

    pub async fn create_driver(&self, request: CreateDriverRequest) -> AppResult<Driver> {
        request.validate()?;
        if request.status == Some(DriverStatus::OnTrip) {
            return Err(TransitionError::StatusManagedByDispatch(DriverStatus::OnTrip.to_string()).into());
        }
        let driver = Driver::new(request);

        let mut data = self.store.write().await;
        ensure_unique_license(&data, &driver.license_number, None)?;
        data.drivers.upsert(driver.clone());

        info!("🧑‍✈️ Driver {} registered", driver.name);
        Ok(driver)
    }

    pub async fn update_driver(&self, id: Uuid, request: UpdateDriverRequest) -> AppResult<Driver> {
        request.validate()?;
        let mut data = self.store.write().await;
        let mut driver = data
            .drivers
            .get(id)
            .cloned()
            .ok_or_else(|| not_found_error("Driver", &id))?;

        if let Some(status) = request.status {
            if status != driver.status {
                if status == DriverStatus::OnTrip {
                    return Err(TransitionError::StatusManagedByDispatch(status.to_string()).into());
                }
                if driver.status == DriverStatus::OnTrip {
                    return Err(TransitionError::DriverOnTrip.into());
                }
            }
            driver.status = status;
        }
        if let Some(license_number) = request.license_number {
            let license_number = license_number.trim().to_uppercase();
            ensure_unique_license(&data, &license_number, Some(id))?;
            driver.license_number = license_number;
        }
        if let Some(name) = request.name {
            driver.name = name;
        }
        if let Some(category) = request.license_category {
            driver.license_category = category;
        }
        if let Some(expiry) = request.license_expiry {
            driver.license_expiry = expiry;
        }
        if let Some(score) = request.safety_score {
            driver.safety_score = score;
        }
        if let Some(rate) = request.completion_rate {
            driver.completion_rate = rate;
        }
        if request.phone.is_some() {
            driver.phone = request.phone;
        }
        driver.updated_at = Utc::now();

        data.drivers.upsert(driver.clone());
        info!("✏️ Driver {} updated (status: {})", driver.name, driver.status);
        Ok(driver)
    }

    pub async fn delete_driver(&self, id: Uuid) -> AppResult<Driver> {
        let mut data = self.store.write().await;
        if !data.drivers.contains(id) {
            return Err(not_found_error("Driver", &id));
        }
        if data.open_trips_for_driver(id).next().is_some() {
            return Err(referential_error("Driver", &id, "is referenced by an open trip"));
        }
        let driver = data
            .drivers
            .remove(id)
            .ok_or_else(|| not_found_error("Driver", &id))?;
        info!("🗑️ Driver {} deleted", driver.name);
        Ok(driver)
    }

    // ------------------------------------------------------------------
    // Viajes (solo lectura; las escrituras pasan por el coordinador)
    // ------------------------------------------------------------------

    pub async fn list_trips(&self) -> Vec<Trip> {
        self.store.read().await.trips.all().to_vec()
    }

    pub async fn get_trip(&self, id: Uuid) -> AppResult<Trip> {
        self.store
            .read()
            .await
            .trips
            .get(id)
            .cloned()
            .ok_or_else(|| not_found_error("Trip", &id))
    }

    // ------------------------------------------------------------------
    // Combustible
    // ------------------------------------------------------------------

    pub async fn list_fuel_logs(&self, vehicle_id: Option<Uuid>) -> Vec<FuelLog> {
        let data = self.store.read().await;
        data.fuel_logs
            .iter()
            .filter(|log| vehicle_id.map_or(true, |id| log.vehicle_id == id))
            .cloned()
            .collect()
    }

    pub async fn create_fuel_log(&self, request: CreateFuelLogRequest) -> AppResult<FuelLog> {
        request.validate()?;
        let mut data = self.store.write().await;
        ensure_loggable_vehicle(&data, request.vehicle_id)?;

        let log = FuelLog::new(request);
        data.fuel_logs.upsert(log.clone());
        info!("⛽ Fuel log {} L for vehicle {} ({})", log.liters, log.vehicle_id, log.cost);
        Ok(log)
    }

    pub async fn update_fuel_log(&self, id: Uuid, request: UpdateFuelLogRequest) -> AppResult<FuelLog> {
        request.validate()?;
        let mut data = self.store.write().await;
        let mut log = data
            .fuel_logs
            .get(id)
            .cloned()
            .ok_or_else(|| not_found_error("FuelLog", &id))?;

        if let Some(date) = request.date {
            log.date = date;
        }
        if let Some(liters) = request.liters {
            log.liters = liters;
        }
        if let Some(price) = request.price_per_liter {
            log.price_per_liter = price;
        }
        if request.odometer_km.is_some() {
            log.odometer_km = request.odometer_km;
        }
        log.cost = (log.liters * log.price_per_liter).round_dp(2);

        data.fuel_logs.upsert(log.clone());
        Ok(log)
    }

    pub async fn delete_fuel_log(&self, id: Uuid) -> AppResult<FuelLog> {
        self.store
            .write()
            .await
            .fuel_logs
            .remove(id)
            .ok_or_else(|| not_found_error("FuelLog", &id))
    }

    // ------------------------------------------------------------------
    // Mantenimiento
    // ------------------------------------------------------------------

    pub async fn list_maintenance_logs(&self, vehicle_id: Option<Uuid>) -> Vec<MaintenanceLog> {
        let data = self.store.read().await;
        data.maintenance_logs
            .iter()
            .filter(|log| vehicle_id.map_or(true, |id| log.vehicle_id == id))
            .cloned()
            .collect()
    }

    /// Registra un mantenimiento y pasa el vehículo a `InShop` en la misma escritura
    pub async fn create_maintenance_log(
        &self,
        request: CreateMaintenanceLogRequest,
    ) -> AppResult<MaintenanceOutcome> {
        request.validate()?;
        let mut data = self.store.write().await;
        let mut vehicle = ensure_loggable_vehicle(&data, request.vehicle_id)?.clone();

        if vehicle.status == VehicleStatus::OnTrip {
            return Err(TransitionError::VehicleOnTrip.into());
        }

        let log = MaintenanceLog::new(request);
        let status_change = (vehicle.status != VehicleStatus::InShop).then(|| VehicleStatusChange {
            vehicle_id: vehicle.id,
            from: vehicle.status,
            to: VehicleStatus::InShop,
        });

        vehicle.status = VehicleStatus::InShop;
        if log.next_due_km.is_some() {
            vehicle.next_service_due_km = log.next_due_km;
        }
        vehicle.updated_at = Utc::now();

        data.maintenance_logs.upsert(log.clone());
        data.vehicles.upsert(vehicle);

        if let Some(change) = &status_change {
            info!("🔧 Vehicle {} moved {} -> {} by maintenance", change.vehicle_id, change.from, change.to);
        }
        Ok(MaintenanceOutcome { log, status_change })
    }

    pub async fn update_maintenance_log(
        &self,
        id: Uuid,
        request: UpdateMaintenanceLogRequest,
    ) -> AppResult<MaintenanceLog> {
        request.validate()?;
        let mut data = self.store.write().await;
        let mut log = data
            .maintenance_logs
            .get(id)
            .cloned()
            .ok_or_else(|| not_found_error("MaintenanceLog", &id))?;

        if let Some(date) = request.date {
            log.date = date;
        }
        if let Some(service_type) = request.service_type {
            log.service_type = service_type;
        }
        if request.description.is_some() {
            log.description = request.description;
        }
        if let Some(cost) = request.cost {
            log.cost = cost;
        }
        if request.next_due_km.is_some() {
            log.next_due_km = request.next_due_km;
        }

        data.maintenance_logs.upsert(log.clone());
        Ok(log)
    }

    pub async fn delete_maintenance_log(&self, id: Uuid) -> AppResult<MaintenanceLog> {
        self.store
            .write()
            .await
            .maintenance_logs
            .remove(id)
            .ok_or_else(|| not_found_error("MaintenanceLog", &id))
    }
}

fn ensure_unique_registration(data: &FleetData, registration: &str, except: Option<Uuid>) -> AppResult<()> {
    let taken = data
        .vehicles
        .iter()
        .any(|v| v.registration == registration && Some(v.id) != except);
    if taken {
        return Err(conflict_error("Vehicle", "registration", registration));
    }
    Ok(())
}

fn ensure_unique_license(data: &FleetData, license_number: &str, except: Option<Uuid>) -> AppResult<()> {
    let taken = data
        .drivers
        .iter()
        .any(|d| d.license_number == license_number && Some(d.id) != except);
    if taken {
        return Err(conflict_error("Driver", "license number", license_number));
    }
    Ok(())
}

/// Los registros financieros solo pueden apuntar a vehículos existentes y no retirados
fn ensure_loggable_vehicle(data: &FleetData, vehicle_id: Uuid) -> AppResult<&Vehicle> {
    let vehicle = data
        .vehicles
        .get(vehicle_id)
        .ok_or_else(|| referential_error("Vehicle", &vehicle_id, "does not exist"))?;
    if vehicle.is_retired() {
        return Err(referential_error("Vehicle", &vehicle_id, "is retired"));
    }
    Ok(vehicle)
}

fn check_vehicle_status_change(data: &FleetData, vehicle: &Vehicle, next: VehicleStatus) -> AppResult<()> {
    if next == vehicle.status {
        return Ok(());
    }
    if vehicle.is_retired() {
        return Err(TransitionError::VehicleRetired.into());
    }
    if next == VehicleStatus::OnTrip {
        return Err(TransitionError::StatusManagedByDispatch(next.to_string()).into());
    }
    if vehicle.status == VehicleStatus::OnTrip {
        return Err(TransitionError::VehicleOnTrip.into());
    }
    if next == VehicleStatus::Retired && data.open_trips_for_vehicle(vehicle.id).next().is_some() {
        return Err(AppError::Referential(format!(
            "Vehicle '{}' is referenced by an open trip and cannot be retired",
            vehicle.id
        )));
    }
    Ok(())
}
