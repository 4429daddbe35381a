//! Leave booking and cancellation.
//!
//! Booking validates the request against the employee's allocation before
//! anything is written. A successful booking consumes balance, issues a
//! ticket, stores the approved application and reprocesses the affected days.
//! Cancellation reverses each of those steps.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{ApprovalStatus, LeaveApplication, LeaveDayType, LeaveYear};
use crate::store::AttendanceStore;

use super::batch::{BatchReport, process_range};
use super::comp_off::usable_comp_off_balance;
use super::day_detection::working_days;
use super::sequence::{catch_up_sequence, generate_ticket, resync_sequence};

/// Days either side of a leave range that are reprocessed with it, so
/// weekoffs the leave now bridges (or no longer bridges) are settled again.
const SANDWICH_REACH_DAYS: i64 = 2;

/// A request to book leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// The employee taking leave.
    pub employee_id: String,
    /// Leave type code.
    pub leave_type_code: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Full day or one half.
    pub day_type: LeaveDayType,
    /// Exempts the leave from the sandwich rule.
    #[serde(default)]
    pub ignore_sandwich: bool,
    /// A ticket issued elsewhere; one is generated when absent.
    #[serde(default)]
    pub ticket: Option<String>,
}

/// The result of a successful booking.
#[derive(Debug, Clone)]
pub struct LeaveBooking {
    /// The stored, approved application.
    pub application: LeaveApplication,
    /// Reprocessing of the affected days.
    pub report: BatchReport,
}

fn reprocess_window(
    store: &mut AttendanceStore,
    employee_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> BatchReport {
    let reach = Duration::days(SANDWICH_REACH_DAYS);
    process_range(store, Some(employee_id), start - reach, end + reach)
}

/// Books an approved leave.
///
/// # Errors
///
/// - `InvalidLeaveRange` if the end precedes the start.
/// - `EmployeeNotFound` / `LeaveTypeNotFound` for unknown references.
/// - `LeaveNotAvailableOnProbation` if a paid type restricted to confirmed
///   employees starts before the employee's probation ends.
/// - `OverlappingLeave` if the range intersects an approved leave.
/// - `NoWorkingDays` if every day in the range is a holiday or weekoff.
/// - `AllocationNotFound` if a paid type has no allocation for the start
///   date's leave year.
/// - `InsufficientBalance` if the allocation (or, for comp-off, the
///   expiry-aware usable balance) cannot cover the request.
///
/// Nothing is written when an error is returned.
pub fn apply_leave(
    store: &mut AttendanceStore,
    request: LeaveRequest,
) -> EngineResult<LeaveBooking> {
    if request.end_date < request.start_date {
        return Err(EngineError::InvalidLeaveRange {
            start: request.start_date,
            end: request.end_date,
        });
    }

    let employee = store.employee(&request.employee_id)?.clone();
    let leave_type = store.leave_type(&request.leave_type_code)?.clone();

    if let Some(probation_end) = employee.probation_end {
        let restricted = leave_type.is_paid && leave_type.applicable_after_probation;
        if restricted && request.start_date < probation_end {
            return Err(EngineError::LeaveNotAvailableOnProbation {
                employee_id: request.employee_id,
                leave_type: leave_type.code,
                probation_end,
            });
        }
    }

    if let Some(existing) =
        store.overlapping_leave(&request.employee_id, request.start_date, request.end_date)
    {
        debug!(
            employee_id = %request.employee_id,
            existing = %existing.id,
            "Rejected overlapping leave"
        );
        return Err(EngineError::OverlappingLeave {
            employee_id: request.employee_id,
            start: request.start_date,
            end: request.end_date,
        });
    }

    let days = working_days(
        store,
        &employee,
        request.start_date,
        request.end_date,
        request.day_type,
    );
    if days == Decimal::ZERO {
        return Err(EngineError::NoWorkingDays {
            start: request.start_date,
            end: request.end_date,
        });
    }

    let leave_year = LeaveYear::containing(request.start_date);
    let is_comp_off = leave_type.code == store.policy().comp_off.leave_type_code;
    if leave_type.is_paid {
        if is_comp_off {
            validate_comp_off(store, &request, leave_year, days)?;
            charge_comp_off(store, &request.employee_id, &leave_type.code, days);
        } else {
            store
                .allocation_mut(&request.employee_id, &leave_type.code, leave_year)
                .ok_or_else(|| EngineError::AllocationNotFound {
                    employee_id: request.employee_id.clone(),
                    leave_type: leave_type.code.clone(),
                    leave_year: leave_year.0,
                })?
                .consume(days)?;
        }
    }

    let ticket = match &request.ticket {
        Some(ticket) => {
            catch_up_sequence(store, request.start_date, ticket);
            ticket.clone()
        }
        None => generate_ticket(store, request.start_date).to_string(),
    };

    let application = LeaveApplication {
        id: Uuid::new_v4(),
        employee_id: request.employee_id,
        leave_type_code: leave_type.code,
        start_date: request.start_date,
        end_date: request.end_date,
        day_type: request.day_type,
        ignore_sandwich: request.ignore_sandwich,
        status: ApprovalStatus::Approved,
        ticket: Some(ticket),
        total_days: days,
    };
    store.add_leave_application(application.clone());

    info!(
        employee_id = %application.employee_id,
        leave_type = %application.leave_type_code,
        start = %application.start_date,
        end = %application.end_date,
        %days,
        ticket = ?application.ticket,
        "Leave booked"
    );

    let report = reprocess_window(
        store,
        &application.employee_id,
        application.start_date,
        application.end_date,
    );
    Ok(LeaveBooking {
        application,
        report,
    })
}

fn validate_comp_off(
    store: &AttendanceStore,
    request: &LeaveRequest,
    leave_year: LeaveYear,
    days: Decimal,
) -> EngineResult<()> {
    let has_rows = !store
        .allocations_of_type(&request.employee_id, &request.leave_type_code)
        .is_empty();
    if !has_rows {
        return Err(EngineError::AllocationNotFound {
            employee_id: request.employee_id.clone(),
            leave_type: request.leave_type_code.clone(),
            leave_year: leave_year.0,
        });
    }

    let available = usable_comp_off_balance(store, &request.employee_id, request.start_date);
    if available < days {
        return Err(EngineError::InsufficientBalance {
            employee_id: request.employee_id.clone(),
            leave_type: request.leave_type_code.clone(),
            available,
            requested: days,
        });
    }
    Ok(())
}

/// Spreads comp-off usage over allocation rows, oldest leave year first.
fn charge_comp_off(store: &mut AttendanceStore, employee_id: &str, code: &str, days: Decimal) {
    let mut outstanding = days;
    for allocation in store.allocations_of_type_mut(employee_id, code) {
        if outstanding <= Decimal::ZERO {
            break;
        }
        let take = allocation.remaining().max(Decimal::ZERO).min(outstanding);
        allocation.used_count += take;
        outstanding -= take;
    }
}

/// Returns comp-off usage to allocation rows, newest leave year first.
fn release_comp_off(store: &mut AttendanceStore, employee_id: &str, code: &str, days: Decimal) {
    let mut outstanding = days;
    for allocation in store.allocations_of_type_mut(employee_id, code).into_iter().rev() {
        if outstanding <= Decimal::ZERO {
            break;
        }
        let give = allocation.used_count.min(outstanding);
        allocation.release(give);
        outstanding -= give;
    }
}

/// Cancels a leave application.
///
/// Approved leave gives its days back to the allocation. The application is
/// removed and the affected days are reprocessed; the month's ticket cache is
/// then resynced so the freed number can be reused.
pub fn cancel_leave(store: &mut AttendanceStore, id: Uuid) -> EngineResult<BatchReport> {
    let application = store.remove_leave_application(id)?;

    if application.status == ApprovalStatus::Approved {
        let is_paid = store
            .leave_type(&application.leave_type_code)
            .map(|lt| lt.is_paid)
            .unwrap_or(false);
        let is_comp_off = application.leave_type_code == store.policy().comp_off.leave_type_code;

        if is_paid && is_comp_off {
            release_comp_off(
                store,
                &application.employee_id,
                &application.leave_type_code,
                application.total_days,
            );
        } else if is_paid {
            if let Some(allocation) = store.allocation_mut(
                &application.employee_id,
                &application.leave_type_code,
                LeaveYear::containing(application.start_date),
            ) {
                allocation.release(application.total_days);
            }
        }
    }

    let report = reprocess_window(
        store,
        &application.employee_id,
        application.start_date,
        application.end_date,
    );
    let start = application.start_date;
    resync_sequence(store, start.year(), start.month());

    info!(
        employee_id = %application.employee_id,
        %id,
        ticket = ?application.ticket,
        "Leave cancelled"
    );
    Ok(report)
}
