mod common;

use chrono::Utc;
use rust_decimal::Decimal;

use fleet_dispatch::models::{
    AlertType, CreateFuelLogRequest, CreateMaintenanceLogRequest, Driver, DriverStatus, TransitionExtra, Trip, TripStatus,
    UpdateDriverRequest, UpdateVehicleRequest, Vehicle, VehicleStatus,
};
use fleet_dispatch::repositories::{FleetData, FleetStore};
use fleet_dispatch::services::dispatch_validator::{FIELD_DRIVER, FIELD_VEHICLE};
use fleet_dispatch::services::{AlertService, AlertThresholds, DispatchCoordinator};
use fleet_dispatch::utils::{AppError, TransitionError};

use common::{candidate, clock, date, driver_request, fixture, vehicle_request};

fn end_at(km: f64) -> TransitionExtra {
    TransitionExtra {
        end_odometer_km: Some(km),
    }
}

#[tokio::test]
async fn test_dispatch_claims_vehicle_and_driver() {
    let fx = fixture().await;

    let trip = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();

    assert_eq!(trip.status, TripStatus::Dispatched);
    assert_eq!(trip.trip_number, "TRP-2026-001");
    assert_eq!(trip.start_odometer_km, Some(10_000.0));
    assert!(trip.dispatched_at.is_some());

    let vehicle = fx.fleet.get_vehicle(fx.v1.id).await.unwrap();
    let driver = fx.fleet.get_driver(fx.d1.id).await.unwrap();
    assert_eq!(vehicle.status, VehicleStatus::OnTrip);
    assert_eq!(driver.status, DriverStatus::OnTrip);
}

#[tokio::test]
async fn test_second_dispatch_on_busy_vehicle_is_rejected() {
    let fx = fixture().await;
    fx.coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();

    let err = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d2.id, 200.0))
        .await
        .unwrap_err();

    match err {
        AppError::Validation(rejection) => {
            assert!(rejection
                .reasons(FIELD_VEHICLE)
                .iter()
                .any(|r| r.contains("unavailable")));
            assert!(!rejection.contains(FIELD_DRIVER));
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    // D2 sigue libre y no se emitió ningún número de viaje
    assert_eq!(fx.fleet.get_driver(fx.d2.id).await.unwrap().status, DriverStatus::OnDuty);
    assert_eq!(fx.store.read().await.trip_sequence(), 1);
}

#[tokio::test]
async fn test_overweight_cargo_is_rejected_without_writes() {
    let fx = fixture().await;

    let err = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 1_200.0))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref r) if r.contains("cargo_weight_kg")));
    assert!(fx.fleet.list_trips().await.is_empty());
    assert_eq!(fx.fleet.get_vehicle(fx.v1.id).await.unwrap().status, VehicleStatus::Available);
}

#[tokio::test]
async fn test_full_lifecycle_releases_resources_and_advances_odometer() {
    let fx = fixture().await;
    let trip = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();

    let on_route = fx
        .coordinator
        .advance(trip.id, TripStatus::OnRoute, TransitionExtra::default())
        .await
        .unwrap();
    assert_eq!(on_route.status, TripStatus::OnRoute);

    let completed = fx
        .coordinator
        .advance(trip.id, TripStatus::Completed, end_at(10_250.0))
        .await
        .unwrap();

    assert_eq!(completed.status, TripStatus::Completed);
    assert_eq!(completed.distance_km(), Some(250.0));
    assert!(completed.completed_at.is_some());

    let vehicle = fx.fleet.get_vehicle(fx.v1.id).await.unwrap();
    assert_eq!(vehicle.status, VehicleStatus::Available);
    assert_eq!(vehicle.odometer_km, 10_250.0);
    assert_eq!(fx.fleet.get_driver(fx.d1.id).await.unwrap().status, DriverStatus::OnDuty);
}

#[tokio::test]
async fn test_completion_directly_from_dispatched() {
    let fx = fixture().await;
    let trip = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();

    let completed = fx
        .coordinator
        .advance(trip.id, TripStatus::Completed, end_at(10_000.0))
        .await
        .unwrap();

    assert_eq!(completed.distance_km(), Some(0.0));
}

#[tokio::test]
async fn test_terminal_trip_cannot_change() {
    let fx = fixture().await;
    let trip = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();
    fx.coordinator
        .advance(trip.id, TripStatus::Completed, end_at(10_100.0))
        .await
        .unwrap();

    for next in [TripStatus::OnRoute, TripStatus::Cancelled, TripStatus::Completed] {
        let err = fx
            .coordinator
            .advance(trip.id, next, end_at(10_200.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition(TransitionError::TerminalStatus(TripStatus::Completed))
        ));
    }
}

#[tokio::test]
async fn test_end_odometer_below_start_leaves_state_untouched() {
    let fx = fixture().await;
    let trip = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();

    let err = fx
        .coordinator
        .advance(trip.id, TripStatus::Completed, end_at(9_000.0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidTransition(TransitionError::EndOdometerBeforeStart { .. })
    ));

    let err = fx
        .coordinator
        .advance(trip.id, TripStatus::Completed, TransitionExtra::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(TransitionError::MissingEndOdometer)));

    assert_eq!(fx.fleet.get_trip(trip.id).await.unwrap().status, TripStatus::Dispatched);
    assert_eq!(fx.fleet.get_vehicle(fx.v1.id).await.unwrap().status, VehicleStatus::OnTrip);
    assert_eq!(fx.fleet.get_driver(fx.d1.id).await.unwrap().status, DriverStatus::OnTrip);
}

#[tokio::test]
async fn test_completion_requires_start_odometer() {
    let mut data = FleetData::new();
    let mut vehicle = Vehicle::new(vehicle_request("NL-900-ZZ", 1_000.0, 500.0));
    vehicle.status = VehicleStatus::OnTrip;
    let mut driver = Driver::new(driver_request("Sem Bakker", "DL-9000"));
    driver.status = DriverStatus::OnTrip;
    let sequence = data.next_trip_sequence();
    let mut trip = Trip::draft(&candidate(vehicle.id, driver.id, 100.0), sequence, Utc::now());
    trip.status = TripStatus::Dispatched;
    let trip_id = trip.id;

    data.vehicles.upsert(vehicle);
    data.drivers.upsert(driver);
    data.trips.upsert(trip);

    let coordinator = DispatchCoordinator::with_clock(FleetStore::with_data(data), clock());
    let err = coordinator
        .advance(trip_id, TripStatus::Completed, end_at(600.0))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidTransition(TransitionError::MissingStartOdometer)));
}

#[tokio::test]
async fn test_draft_then_dispatch() {
    let fx = fixture().await;
    let draft = fx
        .coordinator
        .create_draft(candidate(fx.v2.id, fx.d2.id, 3_000.0))
        .await
        .unwrap();

    assert_eq!(draft.status, TripStatus::Draft);
    assert_eq!(draft.start_odometer_km, None);
    assert_eq!(fx.fleet.get_vehicle(fx.v2.id).await.unwrap().status, VehicleStatus::Available);

    let dispatched = fx
        .coordinator
        .advance(draft.id, TripStatus::Dispatched, TransitionExtra::default())
        .await
        .unwrap();

    assert_eq!(dispatched.trip_number, draft.trip_number);
    assert_eq!(dispatched.start_odometer_km, Some(42_000.0));
    assert_eq!(fx.fleet.get_vehicle(fx.v2.id).await.unwrap().status, VehicleStatus::OnTrip);
    assert_eq!(fx.fleet.get_driver(fx.d2.id).await.unwrap().status, DriverStatus::OnTrip);
}

#[tokio::test]
async fn test_draft_dispatch_revalidates_current_state() {
    let fx = fixture().await;
    let draft = fx
        .coordinator
        .create_draft(candidate(fx.v1.id, fx.d2.id, 500.0))
        .await
        .unwrap();
    fx.fleet
        .update_vehicle(
            fx.v1.id,
            UpdateVehicleRequest {
                status: Some(VehicleStatus::InShop),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = fx
        .coordinator
        .advance(draft.id, TripStatus::Dispatched, TransitionExtra::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref r) if r.contains(FIELD_VEHICLE)));
    assert_eq!(fx.fleet.get_trip(draft.id).await.unwrap().status, TripStatus::Draft);
}

#[tokio::test]
async fn test_open_draft_blocks_other_trips_on_same_resources() {
    let fx = fixture().await;
    fx.coordinator
        .create_draft(candidate(fx.v1.id, fx.d1.id, 500.0))
        .await
        .unwrap();

    let err = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d2.id, 500.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref r) if r.contains(FIELD_VEHICLE) && !r.contains(FIELD_DRIVER)));

    let err = fx
        .coordinator
        .create_draft(candidate(fx.v2.id, fx.d1.id, 500.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref r) if r.contains(FIELD_DRIVER) && !r.contains(FIELD_VEHICLE)));

    assert_eq!(fx.fleet.list_trips().await.len(), 1);
}

#[tokio::test]
async fn test_cancel_dispatched_trip_releases_resources() {
    let fx = fixture().await;
    let trip = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();

    let cancelled = fx.coordinator.cancel(trip.id).await.unwrap();

    assert_eq!(cancelled.status, TripStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(fx.fleet.get_vehicle(fx.v1.id).await.unwrap().status, VehicleStatus::Available);
    assert_eq!(fx.fleet.get_driver(fx.d1.id).await.unwrap().status, DriverStatus::OnDuty);
}

#[tokio::test]
async fn test_cancel_draft_does_not_touch_resources() {
    let fx = fixture().await;
    let draft = fx
        .coordinator
        .create_draft(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();
    // El vehículo entra a taller mientras el borrador existe
    fx.fleet
        .update_vehicle(
            fx.v1.id,
            UpdateVehicleRequest {
                status: Some(VehicleStatus::InShop),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    fx.coordinator.cancel(draft.id).await.unwrap();

    assert_eq!(fx.fleet.get_vehicle(fx.v1.id).await.unwrap().status, VehicleStatus::InShop);
}

#[tokio::test]
async fn test_on_route_trip_cannot_be_cancelled() {
    let fx = fixture().await;
    let trip = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();
    fx.coordinator
        .advance(trip.id, TripStatus::OnRoute, TransitionExtra::default())
        .await
        .unwrap();

    let err = fx.coordinator.cancel(trip.id).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::InvalidTransition(TransitionError::NotAllowed {
            from: TripStatus::OnRoute,
            to: TripStatus::Cancelled
        })
    ));
    assert_eq!(fx.fleet.get_vehicle(fx.v1.id).await.unwrap().status, VehicleStatus::OnTrip);
}

#[tokio::test]
async fn test_draft_cannot_skip_to_on_route() {
    let fx = fixture().await;
    let draft = fx
        .coordinator
        .create_draft(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();

    let err = fx
        .coordinator
        .advance(draft.id, TripStatus::OnRoute, TransitionExtra::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidTransition(TransitionError::NotAllowed { .. })));
}

#[tokio::test]
async fn test_trip_numbers_are_never_reused() {
    let fx = fixture().await;
    let first = fx
        .coordinator
        .create_draft(candidate(fx.v1.id, fx.d1.id, 100.0))
        .await
        .unwrap();
    fx.coordinator.delete_trip(first.id).await.unwrap();

    let second = fx
        .coordinator
        .create_draft(candidate(fx.v1.id, fx.d1.id, 100.0))
        .await
        .unwrap();

    assert_eq!(first.trip_number, "TRP-2026-001");
    assert_eq!(second.trip_number, "TRP-2026-002");
}

#[tokio::test]
async fn test_active_trip_cannot_be_deleted() {
    let fx = fixture().await;
    let trip = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();

    let err = fx.coordinator.delete_trip(trip.id).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidTransition(TransitionError::TripActive)));
}

#[tokio::test]
async fn test_unknown_and_retired_references() {
    let fx = fixture().await;

    let err = fx
        .coordinator
        .dispatch(candidate(uuid::Uuid::new_v4(), fx.d1.id, 100.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Referential(_)));

    fx.fleet
        .update_vehicle(
            fx.v2.id,
            UpdateVehicleRequest {
                status: Some(VehicleStatus::Retired),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let err = fx
        .coordinator
        .dispatch(candidate(fx.v2.id, fx.d1.id, 100.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Referential(_)));

    let err = fx.coordinator.advance(uuid::Uuid::new_v4(), TripStatus::OnRoute, TransitionExtra::default()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_maintenance_moves_vehicle_to_shop_and_blocks_dispatch() {
    let fx = fixture().await;

    let outcome = fx
        .fleet
        .create_maintenance_log(CreateMaintenanceLogRequest {
            vehicle_id: fx.v2.id,
            date: date(2026, 3, 14),
            service_type: "Brake pads".to_string(),
            description: None,
            cost: Decimal::new(350, 0),
            next_due_km: Some(60_000.0),
        })
        .await
        .unwrap();

    let change = outcome.status_change.expect("vehicle should move to the shop");
    assert_eq!(change.from, VehicleStatus::Available);
    assert_eq!(change.to, VehicleStatus::InShop);

    let vehicle = fx.fleet.get_vehicle(fx.v2.id).await.unwrap();
    assert_eq!(vehicle.status, VehicleStatus::InShop);
    assert_eq!(vehicle.next_service_due_km, Some(60_000.0));

    let err = fx
        .coordinator
        .dispatch(candidate(fx.v2.id, fx.d1.id, 1_000.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref r) if r.contains(FIELD_VEHICLE)));

    // Liberación manual del taller
    fx.fleet
        .update_vehicle(
            fx.v2.id,
            UpdateVehicleRequest {
                status: Some(VehicleStatus::Available),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    fx.coordinator
        .dispatch(candidate(fx.v2.id, fx.d1.id, 1_000.0))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_second_maintenance_reports_no_status_change() {
    let fx = fixture().await;
    let request = CreateMaintenanceLogRequest {
        vehicle_id: fx.v1.id,
        date: date(2026, 3, 10),
        service_type: "Inspection".to_string(),
        description: None,
        cost: Decimal::new(120, 0),
        next_due_km: None,
    };

    fx.fleet.create_maintenance_log(request.clone()).await.unwrap();
    let outcome = fx.fleet.create_maintenance_log(request).await.unwrap();

    assert!(outcome.status_change.is_none());
}

#[tokio::test]
async fn test_maintenance_on_vehicle_in_trip_is_rejected() {
    let fx = fixture().await;
    fx.coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();

    let err = fx
        .fleet
        .create_maintenance_log(CreateMaintenanceLogRequest {
            vehicle_id: fx.v1.id,
            date: date(2026, 3, 15),
            service_type: "Tyres".to_string(),
            description: None,
            cost: Decimal::new(800, 0),
            next_due_km: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidTransition(TransitionError::VehicleOnTrip)));
    assert!(fx.fleet.list_maintenance_logs(None).await.is_empty());
}

#[tokio::test]
async fn test_manual_status_changes_are_guarded() {
    let fx = fixture().await;

    let err = fx
        .fleet
        .update_vehicle(
            fx.v1.id,
            UpdateVehicleRequest {
                status: Some(VehicleStatus::OnTrip),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidTransition(TransitionError::StatusManagedByDispatch(_))
    ));

    fx.coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();
    let err = fx
        .fleet
        .update_driver(
            fx.d1.id,
            UpdateDriverRequest {
                status: Some(DriverStatus::OffDuty),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(TransitionError::DriverOnTrip)));
}

#[tokio::test]
async fn test_referenced_entities_cannot_be_deleted() {
    let fx = fixture().await;
    fx.coordinator
        .create_draft(candidate(fx.v1.id, fx.d1.id, 100.0))
        .await
        .unwrap();

    assert!(matches!(fx.fleet.delete_vehicle(fx.v1.id).await, Err(AppError::Referential(_))));
    assert!(matches!(fx.fleet.delete_driver(fx.d1.id).await, Err(AppError::Referential(_))));

    // Sin viajes abiertos el borrado procede
    fx.fleet.delete_vehicle(fx.v2.id).await.unwrap();
    assert!(matches!(fx.fleet.get_vehicle(fx.v2.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let fx = fixture().await;

    let err = fx
        .fleet
        .create_vehicle(vehicle_request("nl-001-aa", 2_000.0, 0.0))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_monthly_rollup_matches_fleet_totals() {
    let fx = fixture().await;
    let trip = fx
        .coordinator
        .dispatch(candidate(fx.v1.id, fx.d1.id, 800.0))
        .await
        .unwrap();
    fx.coordinator
        .advance(trip.id, TripStatus::Completed, end_at(10_300.0))
        .await
        .unwrap();

    for (day, liters) in [(date(2026, 2, 10), 40), (date(2026, 3, 12), 55)] {
        fx.fleet
            .create_fuel_log(CreateFuelLogRequest {
                vehicle_id: fx.v1.id,
                date: day,
                liters: Decimal::new(liters, 0),
                price_per_liter: Decimal::new(175, 2),
                odometer_km: None,
            })
            .await
            .unwrap();
    }
    fx.fleet
        .create_maintenance_log(CreateMaintenanceLogRequest {
            vehicle_id: fx.v2.id,
            date: date(2026, 1, 20),
            service_type: "Oil change".to_string(),
            description: None,
            cost: Decimal::new(21_050, 2),
            next_due_km: None,
        })
        .await
        .unwrap();

    let fleet = fx.analytics.fleet_metrics().await;
    let rollup = fx.analytics.monthly_rollup().await;

    assert_eq!(rollup.len(), 3);
    let revenue: Decimal = rollup.iter().map(|r| r.revenue).sum();
    let fuel: Decimal = rollup.iter().map(|r| r.fuel_cost).sum();
    let maintenance: Decimal = rollup.iter().map(|r| r.maintenance_cost).sum();

    assert_eq!(revenue, fleet.total_revenue);
    assert_eq!(fuel, fleet.total_fuel_cost);
    assert_eq!(maintenance, fleet.total_maintenance_cost);
    assert_eq!(fleet.total_revenue, Decimal::new(500, 0));
    assert_eq!(fleet.completed_trips, 1);
    assert_eq!(fleet.total_completed_distance_km, 300.0);
}

#[tokio::test]
async fn test_new_service_overdue_surfaces_after_old_one_was_acknowledged() {
    let fx = fixture().await;
    let alerts = AlertService::with_clock(fx.store.clone(), AlertThresholds::default(), clock());
    fx.fleet
        .update_vehicle(
            fx.v1.id,
            UpdateVehicleRequest {
                odometer_km: Some(10_500.0),
                next_service_due_km: Some(10_000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let overdue = alerts
        .current()
        .await
        .into_iter()
        .find(|a| a.alert_type == AlertType::ServiceOverdue)
        .unwrap();
    alerts.acknowledge(&overdue.id).await.unwrap();

    fx.fleet
        .create_maintenance_log(CreateMaintenanceLogRequest {
            vehicle_id: fx.v1.id,
            date: date(2026, 3, 14),
            service_type: "Full service".to_string(),
            description: None,
            cost: Decimal::new(400, 0),
            next_due_km: Some(20_000.0),
        })
        .await
        .unwrap();
    fx.fleet
        .update_vehicle(
            fx.v1.id,
            UpdateVehicleRequest {
                odometer_km: Some(25_000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let current: Vec<_> = alerts
        .current()
        .await
        .into_iter()
        .filter(|a| a.alert_type == AlertType::ServiceOverdue)
        .collect();
    assert_eq!(current.len(), 2);
    assert!(current.iter().any(|a| a.id == overdue.id && a.acknowledged));
    let fresh = current.iter().find(|a| !a.acknowledged).unwrap();
    assert_ne!(fresh.id, overdue.id);
    assert!(fresh.message.contains("20000 km"));
}
