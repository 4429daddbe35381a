//! Day classification for an employee.
//!
//! A date is a holiday, a weekoff or a working day for a given employee.
//! Holidays take precedence over the weekly off.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Employee, LeaveDayType};
use crate::store::AttendanceStore;

/// What kind of day a date is for one employee.
///
/// # Example
///
/// ```
/// use attendance_engine::processing::DayKind;
///
/// assert_eq!(DayKind::Weekoff.to_string(), "Weekoff");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// An applicable holiday.
    Holiday,
    /// The employee's weekly off.
    Weekoff,
    /// A scheduled working day.
    Workday,
}

impl std::fmt::Display for DayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayKind::Holiday => write!(f, "Holiday"),
            DayKind::Weekoff => write!(f, "Weekoff"),
            DayKind::Workday => write!(f, "Workday"),
        }
    }
}

/// Classifies `date` for the employee.
pub fn classify_day(store: &AttendanceStore, employee: &Employee, date: NaiveDate) -> DayKind {
    if store.is_holiday(&employee.id, date) {
        DayKind::Holiday
    } else if employee.is_weekoff(date) {
        DayKind::Weekoff
    } else {
        DayKind::Workday
    }
}

/// Leave days a request over `[start, end]` would consume.
///
/// Holidays and weekoffs are skipped; each working day counts one, or half
/// for half-day leave types.
pub fn working_days(
    store: &AttendanceStore,
    employee: &Employee,
    start: NaiveDate,
    end: NaiveDate,
    day_type: LeaveDayType,
) -> Decimal {
    let mut days = Decimal::ZERO;
    let mut date = start;
    while date <= end {
        if classify_day(store, employee, date) == DayKind::Workday {
            days += day_type.day_weight();
        }
        date += Duration::days(1);
    }
    days
}
