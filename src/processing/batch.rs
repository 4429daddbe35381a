//! Batch processing over employees and date ranges.
//!
//! Each employee's dates are processed in ascending order so monthly counters
//! see earlier results from the same run. Records are collected per employee
//! and persisted once that employee's range completes. A failure for one
//! employee-day is logged and reported without stopping the batch.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::DailyAttendanceRecord;
use crate::store::AttendanceStore;

use super::daily_processor::process_employee_day;

/// An employee-day that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayFailure {
    /// The employee being processed.
    pub employee_id: String,
    /// The day being processed.
    pub date: NaiveDate,
    /// The error message.
    pub message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Identifier used to correlate log lines for this run.
    pub run_id: Uuid,
    /// Number of employee-days written.
    pub processed: usize,
    /// Employee-days that failed.
    pub failures: Vec<DayFailure>,
}

impl BatchReport {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            processed: 0,
            failures: Vec::new(),
        }
    }

    /// Returns true if every employee-day was processed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Processes one date for one employee, or for every employee when `employee_id` is `None`.
pub fn process_day(
    store: &mut AttendanceStore,
    employee_id: Option<&str>,
    date: NaiveDate,
) -> BatchReport {
    process_range(store, employee_id, date, date)
}

/// Processes an inclusive date range for one employee or for every employee.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{AttendanceStatus, Employee};
/// use attendance_engine::processing::process_range;
/// use attendance_engine::store::AttendanceStore;
/// use chrono::NaiveDate;
///
/// let mut store = AttendanceStore::default();
/// store.add_employee(Employee {
///     id: "emp_001".to_string(),
///     name: "Asha".to_string(),
///     shift_id: None,
///     weekly_off: None,
///     probation_end: None,
/// });
///
/// let from = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let to = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap();
/// let report = process_range(&mut store, None, from, to);
///
/// assert_eq!(report.processed, 5);
/// assert_eq!(store.record("emp_001", from).unwrap().status, AttendanceStatus::Absent);
/// ```
pub fn process_range(
    store: &mut AttendanceStore,
    employee_id: Option<&str>,
    from: NaiveDate,
    to: NaiveDate,
) -> BatchReport {
    let mut report = BatchReport::new();
    let employees = match employee_id {
        Some(id) => vec![id.to_string()],
        None => store.employee_ids(),
    };

    info!(
        run_id = %report.run_id,
        employees = employees.len(),
        %from,
        %to,
        "Starting attendance batch"
    );

    for employee_id in &employees {
        let mut in_run: Vec<DailyAttendanceRecord> = Vec::new();
        let mut date = from;
        while date <= to {
            match process_employee_day(store, employee_id, date, &in_run) {
                Ok(record) => in_run.push(record),
                Err(err) => {
                    warn!(
                        run_id = %report.run_id,
                        employee_id = %employee_id,
                        %date,
                        error = %err,
                        "Failed to process attendance"
                    );
                    report.failures.push(DayFailure {
                        employee_id: employee_id.clone(),
                        date,
                        message: err.to_string(),
                    });
                }
            }
            date += Duration::days(1);
        }

        report.processed += in_run.len();
        for record in in_run {
            store.save_record(record);
        }
    }

    info!(
        run_id = %report.run_id,
        processed = report.processed,
        failed = report.failures.len(),
        "Attendance batch complete"
    );
    report
}
