//! Property-based tests for lifecycle operations.
//!
//! Random interleavings of entries, exits, overrides and maintenance must
//! never leave the inventory and sessions disagreeing, and must only ever
//! fail with domain errors.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use crate::category::{BillingMode, SlotCategory, VehicleCategory};
use crate::clock::FixedClock;
use crate::database::Database;
use crate::error::Result;
use crate::settings::Settings;
use crate::slot::SlotNumber;
use crate::vehicle::LicensePlate;

use super::{verify_invariants, EntryOptions, LifecycleManager};

const SLOTS: [(&str, SlotCategory); 5] = [
    ("R-01", SlotCategory::Regular),
    ("R-02", SlotCategory::Regular),
    ("C-01", SlotCategory::Compact),
    ("EV-01", SlotCategory::ElectricCharging),
    ("AR-01", SlotCategory::AccessibleReserved),
];

const PLATES: [&str; 4] = ["KA01", "KA02", "MH12", "DL03"];

#[derive(Debug, Clone)]
enum Op {
    Enter {
        plate: usize,
        category: VehicleCategory,
        mode: BillingMode,
        slot: Option<usize>,
    },
    Exit(usize),
    Override { plate: usize, slot: usize },
    ForceEnd(usize),
    Maintenance(usize),
    Restore(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let plate = 0..PLATES.len();
    let slot = 0..SLOTS.len();
    prop_oneof![
        4 => (
            plate.clone(),
            prop::sample::select(VehicleCategory::ALL),
            prop::sample::select(BillingMode::ALL),
            prop::option::of(slot.clone()),
        )
            .prop_map(|(plate, category, mode, slot)| Op::Enter { plate, category, mode, slot }),
        3 => plate.clone().prop_map(Op::Exit),
        2 => (plate.clone(), slot.clone()).prop_map(|(plate, slot)| Op::Override { plate, slot }),
        1 => plate.prop_map(Op::ForceEnd),
        1 => slot.clone().prop_map(Op::Maintenance),
        1 => slot.prop_map(Op::Restore),
    ]
}

fn plate(index: usize) -> LicensePlate {
    LicensePlate::parse(PLATES[index]).unwrap()
}

fn slot(index: usize) -> SlotNumber {
    SlotNumber::parse(SLOTS[index].0).unwrap()
}

fn apply(manager: &mut LifecycleManager<'_, FixedClock>, op: &Op) -> Result<()> {
    match op {
        Op::Enter {
            plate: p,
            category,
            mode,
            slot: s,
        } => {
            let options = EntryOptions::new(plate(*p), *category)
                .with_billing_mode(*mode)
                .with_slot(s.map(slot));
            manager.enter(&options).map(drop)
        }
        Op::Exit(p) => manager.exit(&plate(*p)).map(drop),
        Op::Override { plate: p, slot: s } => {
            let active =
                Database::active_session_for_plate(manager.database().connection(), &plate(*p))?;
            match active {
                Some(session) => manager.override_slot(session.id, &slot(*s)).map(drop),
                None => Ok(()),
            }
        }
        Op::ForceEnd(p) => {
            let active =
                Database::active_session_for_plate(manager.database().connection(), &plate(*p))?;
            match active {
                Some(session) => manager.force_end(session.id).map(drop),
                None => Ok(()),
            }
        }
        Op::Maintenance(s) => manager.set_maintenance(&slot(*s)).map(drop),
        Op::Restore(s) => manager.restore_slot(&slot(*s)).map(drop),
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap()
}

/// Longer runs with `--features property-tests`.
const CASES: u32 = if cfg!(feature = "property-tests") { 1024 } else { 64 };

proptest! {
    #![proptest_config(ProptestConfig {
        cases: CASES,
        .. ProptestConfig::default()
    })]

    #[test]
    fn random_lifecycles_keep_invariants(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut db = Database::open_in_memory().unwrap();
        for (number, category) in SLOTS {
            db.add_slot(&SlotNumber::parse(number).unwrap(), category).unwrap();
        }
        let settings = Settings::default();

        for (step, op) in ops.iter().enumerate() {
            let at = start() + Duration::minutes(37 * i64::try_from(step).unwrap());
            let mut manager = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(at));

            if let Err(e) = apply(&mut manager, op) {
                prop_assert!(e.is_domain() || matches!(e, crate::Error::NotFound { .. }),
                    "unexpected fault for {:?}: {}", op, e);
                prop_assert!(!matches!(e, crate::Error::InvalidState { .. }),
                    "engine reached an inconsistent state on {:?}: {}", op, e);
            }

            let report = verify_invariants(manager.database().connection()).unwrap();
            prop_assert!(report.is_clean(), "after {:?}: {:?}", op, report);
        }
    }

    #[test]
    fn exit_charge_matches_calculator(minutes in 1i64..(48 * 60), day_pass in any::<bool>()) {
        let mut db = Database::open_in_memory().unwrap();
        db.add_slot(&SlotNumber::parse("R-01").unwrap(), SlotCategory::Regular).unwrap();
        let settings = Settings::default();
        let mode = if day_pass { BillingMode::DayPass } else { BillingMode::Hourly };

        let entry_at = start();
        let exit_at = entry_at + Duration::minutes(minutes);
        let mut manager = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(entry_at));
        manager
            .enter(&EntryOptions::new(plate(0), VehicleCategory::Car).with_billing_mode(mode))
            .unwrap();

        let mut manager = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(exit_at));
        let receipt = manager.exit(&plate(0)).unwrap();
        let expected = crate::billing::compute_amount(entry_at, exit_at, mode, &settings.rates);
        prop_assert_eq!(receipt.billing_amount, expected.amount);
        prop_assert_eq!(receipt.duration_hours, expected.duration_hours);
    }
}
