//! Yearly leave allocation maintenance.
//!
//! Allocations are opened per employee, leave type and leave year. Employees
//! finishing probation part-way through a leave year receive a pro-rata
//! quota; balances of carry-forward leave types roll into the next year's
//! opening balance.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;

use crate::models::{LEAVE_YEAR_START_MONTH, LeaveAllocation, LeaveYear};
use crate::store::AttendanceStore;

/// Quota for an employee whose probation ends on `probation_end`.
///
/// Probation ending on or before the first day of the leave year earns the
/// full quota; ending after its last day earns nothing. Otherwise each month
/// from the probation-end month through October counts, starting the month
/// after when probation ends after the 15th. The result is rounded to the
/// nearest half day.
///
/// # Example
///
/// ```
/// use attendance_engine::models::LeaveYear;
/// use attendance_engine::processing::prorata_quota;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let ends = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
/// // May through October: 6 of 12 months.
/// assert_eq!(prorata_quota(Decimal::from(12), Some(ends), LeaveYear(2025)), Decimal::from(6));
/// ```
pub fn prorata_quota(
    yearly_quota: Decimal,
    probation_end: Option<NaiveDate>,
    leave_year: LeaveYear,
) -> Decimal {
    let Some(probation_end) = probation_end else {
        return yearly_quota;
    };
    if probation_end <= leave_year.start() {
        return yearly_quota;
    }
    if probation_end > leave_year.end() {
        return Decimal::ZERO;
    }

    let month_index = (probation_end.month() + 12 - LEAVE_YEAR_START_MONTH) % 12;
    let first_month = if probation_end.day() > 15 {
        month_index + 1
    } else {
        month_index
    };
    let eligible_months = 12u32.saturating_sub(first_month);

    let raw = yearly_quota / Decimal::from(12) * Decimal::from(eligible_months);
    (raw * Decimal::TWO).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        / Decimal::TWO
}

/// Opens missing allocations for every employee and leave type in a leave year.
///
/// Paid leave types use the pro-rata quota for employees with a probation end
/// date. Existing rows are left alone. Returns the number of rows created.
pub fn initialize_allocations(store: &mut AttendanceStore, leave_year: LeaveYear) -> usize {
    let leave_types = store.leave_types();
    let mut created = 0;

    for employee_id in store.employee_ids() {
        let Ok(employee) = store.employee(&employee_id) else {
            continue;
        };
        let probation_end = employee.probation_end;

        for leave_type in &leave_types {
            if store
                .allocation(&employee_id, &leave_type.code, leave_year)
                .is_some()
            {
                continue;
            }

            let quota = if leave_type.is_paid {
                prorata_quota(leave_type.default_yearly_quota, probation_end, leave_year)
            } else {
                leave_type.default_yearly_quota
            };
            let mut allocation = LeaveAllocation::new(&employee_id, &leave_type.code, leave_year);
            allocation.total_allocated = quota;
            store.upsert_allocation(allocation);
            created += 1;
        }
    }

    info!(%leave_year, created, "Initialized leave allocations");
    created
}

/// Rolls every allocation of `from` into the following leave year.
///
/// The next year's opening balance is the remaining balance for leave types
/// that allow carry forward, zero otherwise. Missing rows are created with
/// the leave type's default quota. Returns the number of rows written.
pub fn carry_forward(store: &mut AttendanceStore, from: LeaveYear) -> usize {
    let to = from.next();
    let previous = store.allocations_in_year(from);
    let mut written = 0;

    for prev in previous {
        let leave_type = store.leave_type(&prev.leave_type_code).ok().cloned();
        let carried = match &leave_type {
            Some(lt) if lt.allow_carry_forward => prev.remaining().max(Decimal::ZERO),
            _ => Decimal::ZERO,
        };

        match store.allocation_mut(&prev.employee_id, &prev.leave_type_code, to) {
            Some(current) => current.opening_balance = carried,
            None => {
                let mut current =
                    LeaveAllocation::new(&prev.employee_id, &prev.leave_type_code, to);
                current.total_allocated = leave_type
                    .map(|lt| lt.default_yearly_quota)
                    .unwrap_or(prev.total_allocated);
                current.opening_balance = carried;
                store.upsert_allocation(current);
            }
        }
        written += 1;
    }

    info!(%from, %to, written, "Carried leave balances forward");
    written
}
