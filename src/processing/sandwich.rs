//! Sandwich leave detection for unworked weekoffs.
//!
//! A weekoff flanked by leave is treated as a leave day. Only approved,
//! full-day leave without the ignore-sandwich flag can bridge, and a day with
//! punches never counts as covered even when leave was granted for it.

use chrono::{Duration, NaiveDate};

use crate::models::LeaveApplication;
use crate::store::AttendanceStore;

fn covered<'a>(
    store: &'a AttendanceStore,
    employee_id: &str,
    date: NaiveDate,
) -> Option<&'a LeaveApplication> {
    if store.has_punches(employee_id, date) {
        return None;
    }
    store.bridging_leave_on(employee_id, date)
}

/// Returns the leave that bridges the employee's weekoff, if any.
///
/// The weekoff is bridged when the adjacent day on both sides is covered, or
/// when the two days immediately before (or after) it are both covered. The
/// returned application is the one covering the day before, falling back to
/// the day after.
pub fn find_sandwiching_leave(
    store: &AttendanceStore,
    employee_id: &str,
    weekoff: NaiveDate,
) -> Option<LeaveApplication> {
    let day = Duration::days(1);
    let previous = covered(store, employee_id, weekoff - day);
    let next = covered(store, employee_id, weekoff + day);

    let before_both =
        previous.is_some() && covered(store, employee_id, weekoff - day * 2).is_some();
    let after_both = next.is_some() && covered(store, employee_id, weekoff + day * 2).is_some();
    let flanked = previous.is_some() && next.is_some();

    if flanked || before_both || after_both {
        previous.or(next).cloned()
    } else {
        None
    }
}
