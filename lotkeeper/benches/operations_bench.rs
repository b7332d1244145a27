use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tempfile::TempDir;

use chrono::{Duration, TimeZone, Utc};
use lotkeeper::database::{Database, DatabaseConfig};
use lotkeeper::operations::{EntryOptions, LifecycleManager};
use lotkeeper::{FixedClock, LicensePlate, Settings, SlotCategory, SlotNumber, VehicleCategory};

const LOT_SIZES: &[usize] = &[10, 100, 1000];

fn setup_lot(slots: usize) -> (TempDir, Database) {
    let temp_dir = TempDir::new().expect("failed to create temporary directory");
    let mut db = Database::open(DatabaseConfig::new(temp_dir.path().join("lotkeeper.db")))
        .expect("failed to open temporary database");
    for index in 0..slots {
        let number = SlotNumber::parse(&format!("R-{index:04}")).expect("valid slot number");
        db.add_slot(&number, SlotCategory::Regular)
            .expect("failed to add slot");
    }
    (temp_dir, db)
}

/// Fills all but the last slot so allocation has to skip past them.
fn fill(db: &mut Database, settings: &Settings, count: usize) {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    let mut manager = LifecycleManager::with_clock(db, settings, FixedClock::new(at));
    for index in 0..count {
        let plate = LicensePlate::parse(&format!("FILL{index}")).expect("valid plate");
        manager
            .enter(&EntryOptions::new(plate, VehicleCategory::Car))
            .expect("entry should succeed");
    }
}

fn bench_entry_exit_cycle(c: &mut Criterion) {
    let settings = Settings::default();
    let mut group = c.benchmark_group("entry_exit_cycle");

    for &size in LOT_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (_temp_dir, mut db) = setup_lot(size);
            fill(&mut db, &settings, size - 1);
            let entry = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
            let plate = LicensePlate::parse("BENCH1").expect("valid plate");

            b.iter(|| {
                LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(entry))
                    .enter(&EntryOptions::new(plate.clone(), VehicleCategory::Car))
                    .expect("entry should succeed");
                let receipt = LifecycleManager::with_clock(
                    &mut db,
                    &settings,
                    FixedClock::new(entry + Duration::minutes(95)),
                )
                .exit(&plate)
                .expect("exit should succeed");
                black_box(receipt.billing_amount);
            });
        });
    }

    group.finish();
}

fn bench_overstay_scan(c: &mut Criterion) {
    let settings = Settings::default();
    let mut group = c.benchmark_group("overstay_scan");

    for &size in LOT_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (_temp_dir, mut db) = setup_lot(size);
            fill(&mut db, &settings, size);
            let now = Utc.with_ymd_and_hms(2024, 1, 1, 21, 0, 0).unwrap();

            b.iter(|| {
                let manager = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(now));
                black_box(manager.overstay_alerts().expect("scan should succeed").len());
            });
        });
    }

    group.finish();
}

fn bench_fresh_lot_entry(c: &mut Criterion) {
    let settings = Settings::default();
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();

    c.bench_function("fresh_lot_entry", |b| {
        b.iter_batched(
            || setup_lot(10),
            |(temp_dir, mut db)| {
                let _temp_dir = temp_dir;
                let receipt = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(at))
                    .enter(&EntryOptions::new(
                        LicensePlate::parse("NEW1").expect("valid plate"),
                        VehicleCategory::Car,
                    ))
                    .expect("entry should succeed");
                black_box(receipt.session_id);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    operations_bench,
    bench_entry_exit_cycle,
    bench_overstay_scan,
    bench_fresh_lot_entry
);
criterion_main!(operations_bench);
