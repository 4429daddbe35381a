//! Performance benchmarks for the attendance engine.
//!
//! Covers the hot paths of a nightly run:
//! - A single employee-day
//! - One employee across a month
//! - Month-long batches for growing headcounts
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use attendance_engine::config::ConfigLoader;
use attendance_engine::models::{Employee, PunchEvent};
use attendance_engine::processing::{process_day, process_range};
use attendance_engine::store::AttendanceStore;

fn month_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn month_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
}

/// Creates a store with `headcount` employees punching every working day of March 2026.
fn create_store(headcount: usize) -> AttendanceStore {
    let loader = ConfigLoader::load("./config/default").expect("Failed to load config");
    let mut store = AttendanceStore::from_config(loader.config());

    for n in 0..headcount {
        let id = format!("emp_{n:04}");
        store.add_employee(Employee {
            id: id.clone(),
            name: format!("Employee {n}"),
            shift_id: Some("GEN".to_string()),
            weekly_off: Some(Weekday::Sun),
            probation_end: None,
        });

        let mut date = month_start();
        while date <= month_end() {
            if date.weekday() != Weekday::Sun {
                // Spread arrivals so some days are late.
                let arrival = NaiveTime::from_hms_opt(8, 50, 0).unwrap()
                    + Duration::minutes(((n + date.day() as usize) % 25) as i64);
                let departure = NaiveTime::from_hms_opt(18, 5, 0).unwrap();
                store.add_punch(PunchEvent::device(&id, date.and_time(arrival)));
                store.add_punch(PunchEvent::device(&id, date.and_time(departure)));
            }
            date += Duration::days(1);
        }
    }

    store
}

/// Benchmark: one employee-day.
fn bench_single_day(c: &mut Criterion) {
    let store = create_store(1);
    let date = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();

    c.bench_function("single_employee_day", |b| {
        b.iter_batched(
            || store.clone(),
            |mut store| black_box(process_day(&mut store, Some("emp_0000"), black_box(date))),
            criterion::BatchSize::SmallInput,
        )
    });
}

/// Benchmark: one employee across a month.
fn bench_single_month(c: &mut Criterion) {
    let store = create_store(1);

    c.bench_function("single_employee_month", |b| {
        b.iter_batched(
            || store.clone(),
            |mut store| {
                black_box(process_range(
                    &mut store,
                    Some("emp_0000"),
                    month_start(),
                    month_end(),
                ))
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

/// Benchmark: month-long batches as headcount grows.
fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("monthly_batch");
    group.sample_size(10);

    for headcount in [10usize, 50, 100] {
        let store = create_store(headcount);
        group.throughput(Throughput::Elements((headcount * 31) as u64));
        group.bench_with_input(
            BenchmarkId::new("employees", headcount),
            &store,
            |b, store| {
                b.iter_batched(
                    || store.clone(),
                    |mut store| {
                        black_box(process_range(&mut store, None, month_start(), month_end()))
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_day, bench_single_month, bench_scaling);
criterion_main!(benches);
