//! End-to-end lifecycle scenarios against a file-backed database.
//!
//! Every scenario drives the public [`LifecycleManager`] API with a pinned
//! clock and then checks the persisted state, including the slot/session
//! invariants.

mod common;

use chrono::Duration;
use common::{at, plate, slot, TestLot};
use lotkeeper::database::Database;
use lotkeeper::operations::{verify_invariants, EntryOptions, LifecycleManager};
use lotkeeper::{
    Amount, BillingMode, Error, FixedClock, SessionStatus, Settings, Severity, SlotCategory,
    SlotStatus, VehicleCategory,
};

fn standard_lot() -> TestLot {
    TestLot::with_slots(&[
        ("R-01", SlotCategory::Regular),
        ("R-02", SlotCategory::Regular),
        ("C-01", SlotCategory::Compact),
        ("EV-01", SlotCategory::ElectricCharging),
        ("AR-01", SlotCategory::AccessibleReserved),
    ])
}

/// Parks `raw_plate` at `entry` and takes it out at `exit`, returning the charge.
fn park_and_leave(
    db: &mut Database,
    settings: &Settings,
    raw_plate: &str,
    mode: BillingMode,
    entry: chrono::DateTime<chrono::Utc>,
    exit: chrono::DateTime<chrono::Utc>,
) -> (u32, Amount) {
    LifecycleManager::with_clock(db, settings, FixedClock::new(entry))
        .enter(&EntryOptions::new(plate(raw_plate), VehicleCategory::Car).with_billing_mode(mode))
        .unwrap();
    let receipt = LifecycleManager::with_clock(db, settings, FixedClock::new(exit))
        .exit(&plate(raw_plate))
        .unwrap();
    (receipt.duration_hours, receipt.billing_amount)
}

#[test]
fn test_short_stay_bills_first_slab() {
    let lot = standard_lot();
    let mut db = lot.connect();
    let settings = Settings::default();

    let (hours, amount) = park_and_leave(
        &mut db,
        &settings,
        "KA01AB1234",
        BillingMode::Hourly,
        at(10, 0),
        at(10, 45),
    );
    assert_eq!(hours, 1);
    assert_eq!(amount, Amount::new(50));
}

#[test]
fn test_partial_hour_rounds_up() {
    let lot = standard_lot();
    let mut db = lot.connect();
    let settings = Settings::default();

    let (hours, amount) = park_and_leave(
        &mut db,
        &settings,
        "MH12XY9",
        BillingMode::Hourly,
        at(10, 0),
        at(13, 1),
    );
    assert_eq!(hours, 4);
    assert_eq!(amount, Amount::new(150));
}

#[test]
fn test_overnight_stay_bills_top_slab() {
    let lot = standard_lot();
    let mut db = lot.connect();
    let settings = Settings::default();

    let (hours, amount) = park_and_leave(
        &mut db,
        &settings,
        "DL3C1",
        BillingMode::Hourly,
        at(10, 0),
        at(9, 0) + Duration::days(1),
    );
    assert_eq!(hours, 23);
    assert_eq!(amount, Amount::new(200));
}

#[test]
fn test_sixty_minutes_is_one_hour_sixty_one_is_two() {
    let lot = standard_lot();
    let mut db = lot.connect();
    let settings = Settings::default();

    let (hours, amount) = park_and_leave(
        &mut db,
        &settings,
        "ONE",
        BillingMode::Hourly,
        at(8, 0),
        at(9, 0),
    );
    assert_eq!((hours, amount), (1, Amount::new(50)));

    let (hours, amount) = park_and_leave(
        &mut db,
        &settings,
        "TWO",
        BillingMode::Hourly,
        at(8, 0),
        at(9, 1),
    );
    assert_eq!((hours, amount), (2, Amount::new(100)));
}

#[test]
fn test_auto_assignment_takes_lowest_number_across_categories() {
    let lot = TestLot::with_slots(&[
        ("R-01", SlotCategory::Regular),
        ("C-01", SlotCategory::Compact),
        ("EV-01", SlotCategory::ElectricCharging),
        ("A-01", SlotCategory::Regular),
        ("Z-01", SlotCategory::AccessibleReserved),
    ]);
    let mut db = lot.connect();
    let settings = Settings::default();
    let mut manager = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(at(9, 0)));

    let mut park = |raw: &str, category| {
        manager
            .enter(&EntryOptions::new(plate(raw), category))
            .unwrap()
            .slot_number
            .to_string()
    };

    assert_eq!(park("ACC1", VehicleCategory::AccessibleNeed), "A-01");
    assert_eq!(park("VOLT1", VehicleCategory::ElectricVehicle), "EV-01");
    assert_eq!(park("CAR1", VehicleCategory::Car), "C-01");
    assert_eq!(park("VOLT2", VehicleCategory::ElectricVehicle), "R-01");
    assert_eq!(park("ACC2", VehicleCategory::AccessibleNeed), "Z-01");
}

#[test]
fn test_car_with_only_special_slots_left() {
    let lot = TestLot::with_slots(&[
        ("R-01", SlotCategory::Regular),
        ("EV-01", SlotCategory::ElectricCharging),
        ("AR-01", SlotCategory::AccessibleReserved),
    ]);
    let mut db = lot.connect();
    let settings = Settings::default();
    let mut manager = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(at(9, 0)));

    manager
        .enter(&EntryOptions::new(plate("FIRST"), VehicleCategory::Car))
        .unwrap();
    let err = manager
        .enter(&EntryOptions::new(plate("SECOND"), VehicleCategory::Car))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::NoSlotsAvailable {
            category: VehicleCategory::Car
        }
    ));
    assert!(err.is_domain());

    // The special slots still take their own categories.
    manager
        .enter(&EntryOptions::new(plate("VOLT"), VehicleCategory::ElectricVehicle))
        .unwrap();
    manager
        .enter(&EntryOptions::new(plate("ACCESS"), VehicleCategory::AccessibleNeed))
        .unwrap();
    assert!(verify_invariants(manager.database().connection())
        .unwrap()
        .is_clean());
}

#[test]
fn test_accessible_vehicle_cannot_move_to_charging_slot() {
    let lot = standard_lot();
    let mut db = lot.connect();
    let settings = Settings::default();
    let mut manager = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(at(9, 0)));

    let receipt = manager
        .enter(&EntryOptions::new(plate("ACC1"), VehicleCategory::AccessibleNeed))
        .unwrap();
    assert_eq!(receipt.slot_number.as_str(), "AR-01");

    let err = manager
        .override_slot(receipt.session_id, &slot("EV-01"))
        .unwrap_err();
    assert!(matches!(err, Error::IncompatibleSlot { .. }));
    assert!(err.to_string().contains("EV-01"));

    let conn = manager.database().connection();
    let ev = Database::get_slot_by_number(conn, &slot("EV-01")).unwrap().unwrap();
    assert_eq!(ev.status, SlotStatus::Available);
}

#[test]
fn test_nine_hour_car_raises_alert() {
    let lot = standard_lot();
    let mut db = lot.connect();
    let settings = Settings::default();

    LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(at(8, 0)))
        .enter(&EntryOptions::new(plate("LATE1"), VehicleCategory::Car))
        .unwrap();

    let manager = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(at(17, 0)));
    let alerts = manager.overstay_alerts().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Alert);
    assert!((alerts[0].overstay_hours - 1.0).abs() < 1e-9);
    assert_eq!(alerts[0].estimated_cost, Amount::new(200));
}

#[test]
fn test_override_keeps_entry_time_for_billing() {
    let lot = standard_lot();
    let mut db = lot.connect();
    let settings = Settings::default();

    let entry = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(at(10, 0)))
        .enter(&EntryOptions::new(plate("MOVER"), VehicleCategory::Car))
        .unwrap();
    assert_eq!(entry.slot_number.as_str(), "C-01");

    let moved = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(at(11, 30)))
        .override_slot(entry.session_id, &slot("R-01"))
        .unwrap();
    assert_eq!(moved.entry_time, at(10, 0));

    let bill = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(at(13, 1)))
        .exit(&plate("MOVER"))
        .unwrap();
    assert_eq!(bill.entry_time, at(10, 0));
    assert_eq!(bill.slot_number.as_str(), "R-01");
    assert_eq!(bill.duration_hours, 4);
    assert_eq!(bill.billing_amount, Amount::new(150));

    let conn = db.connection();
    for number in ["R-01", "C-01"] {
        let s = Database::get_slot_by_number(conn, &slot(number)).unwrap().unwrap();
        assert_eq!(s.status, SlotStatus::Available, "slot {number}");
    }
    assert!(verify_invariants(conn).unwrap().is_clean());
}

#[test]
fn test_day_pass_charges_flat_rate() {
    let lot = standard_lot();
    let mut db = lot.connect();
    let settings = Settings::default();

    let (_, short) = park_and_leave(
        &mut db,
        &settings,
        "PASS1",
        BillingMode::DayPass,
        at(9, 0),
        at(9, 10),
    );
    let (_, long) = park_and_leave(
        &mut db,
        &settings,
        "PASS2",
        BillingMode::DayPass,
        at(9, 0),
        at(21, 0),
    );
    assert_eq!(short, Amount::new(150));
    assert_eq!(long, Amount::new(150));
}

#[test]
fn test_history_records_every_visit() {
    let lot = standard_lot();
    let mut db = lot.connect();
    let settings = Settings::default();

    park_and_leave(&mut db, &settings, "REGULAR", BillingMode::Hourly, at(8, 0), at(9, 0));
    park_and_leave(&mut db, &settings, "REGULAR", BillingMode::Hourly, at(12, 0), at(15, 0));

    let history = Database::session_history(db.connection(), &plate("REGULAR"), None).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].entry_time, at(12, 0));
    assert!(history
        .iter()
        .all(|s| s.status == SessionStatus::Completed && s.exit_time.is_some()));
}

#[test]
fn test_returning_vehicle_category_is_updated() {
    let lot = standard_lot();
    let mut db = lot.connect();
    let settings = Settings::default();
    let mut manager = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(at(9, 0)));

    manager
        .enter(&EntryOptions::new(plate("SWAP1"), VehicleCategory::Car))
        .unwrap();
    manager.exit(&plate("SWAP1")).unwrap();
    let receipt = manager
        .enter(&EntryOptions::new(plate("SWAP1"), VehicleCategory::ElectricVehicle))
        .unwrap();
    assert_eq!(receipt.slot_number.as_str(), "EV-01");

    let vehicle = Database::get_vehicle(manager.database().connection(), &plate("SWAP1"))
        .unwrap()
        .unwrap();
    assert_eq!(vehicle.category, VehicleCategory::ElectricVehicle);
}
