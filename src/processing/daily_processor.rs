//! The per-employee, per-day attendance state machine.
//!
//! [`process_employee_day`] rebuilds a [`DailyAttendanceRecord`] from scratch
//! each time it runs. Sources are consulted in a fixed precedence: holiday,
//! regularization, weekoff (with sandwich resolution), leave, then punches.
//! The first rule that settles the day stops evaluation; punch evaluation
//! finishes with the monthly penalty accumulator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::EngineResult;
use crate::models::{
    AttendanceStatus, DailyAttendanceRecord, Employee, LeaveDayType, LeaveYear, PunchEvent, Shift,
};
use crate::store::{AttendanceStore, SandwichCharge};

use super::comp_off::{close_with_out_punch, open_draft};
use super::day_detection::{DayKind, classify_day};
use super::late_early::{EarlyVerdict, LateVerdict, evaluate_early, evaluate_late, late_minutes};
use super::monthly_penalty::{apply_monthly_penalties, month_history, prior_late_count};
use super::punches::{BreakSource, PunchPattern, deduct_break, evaluate_punches, sort_punches};
use super::sandwich::find_sandwiching_leave;
use super::sequence::catch_up_sequence;

/// A record under construction. The status stays unset until a rule decides it.
struct DayState {
    record: DailyAttendanceRecord,
    status: Option<AttendanceStatus>,
}

impl DayState {
    fn new(employee: &Employee, date: NaiveDate) -> Self {
        let mut record = DailyAttendanceRecord::new(&employee.id, date, AttendanceStatus::Absent);
        record.shift_id = employee.shift_id.clone();
        Self {
            record,
            status: None,
        }
    }

    fn settle(mut self, status: AttendanceStatus) -> DailyAttendanceRecord {
        self.record.status = status;
        self.record
    }

    fn finish(self) -> DailyAttendanceRecord {
        let status = self.status.clone().unwrap_or(AttendanceStatus::Absent);
        self.settle(status)
    }

    fn remark(&mut self, remark: impl Into<String>) {
        self.record.remarks.push(remark.into());
    }

    fn has_half_day_leave(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(AttendanceStatus::is_half_day_leave)
    }

    /// Marks a generic half day. A half-day leave status is kept as it is.
    fn mark_half_day(&mut self, remark: impl Into<String>) {
        if self.has_half_day_leave() {
            return;
        }
        self.status = Some(AttendanceStatus::HalfDay);
        self.record.is_half_day = true;
        self.remark(remark);
    }
}

/// Computes the attendance record for one employee on one date.
///
/// `in_run` holds records for the same employee produced earlier in the
/// current batch and not yet persisted; they take precedence over stored
/// records when counting monthly infractions.
///
/// Side effects on the store are limited to comp-off drafts for worked
/// weekoffs and sandwich charges against leave allocations. A previous
/// sandwich charge for the same day is released first, so re-running a day
/// never charges twice. When the day fails the released charge is put back.
///
/// # Errors
///
/// Returns an error if the employee is unknown or references a shift id that
/// does not exist. An employee without a shift is processed without late,
/// early or break rules.
pub fn process_employee_day(
    store: &mut AttendanceStore,
    employee_id: &str,
    date: NaiveDate,
    in_run: &[DailyAttendanceRecord],
) -> EngineResult<DailyAttendanceRecord> {
    let employee = store.employee(employee_id)?.clone();
    let shift = store.shift_for(&employee)?.cloned();

    let released = store.release_sandwich_charge(employee_id, date);
    let result = evaluate_day(store, &employee, shift.as_ref(), date, in_run);
    if let (Err(error), Some(charge)) = (&result, released) {
        warn!(employee_id, %date, %error, "Restoring sandwich charge after failed day");
        store.restore_sandwich_charge(employee_id, date, charge);
    }
    result
}

fn evaluate_day(
    store: &mut AttendanceStore,
    employee: &Employee,
    shift: Option<&Shift>,
    date: NaiveDate,
    in_run: &[DailyAttendanceRecord],
) -> EngineResult<DailyAttendanceRecord> {
    let employee_id = employee.id.as_str();
    let mut day = DayState::new(employee, date);

    let kind = classify_day(store, employee, date);
    if kind == DayKind::Holiday {
        debug!(employee_id, %date, "Holiday");
        return Ok(day.settle(AttendanceStatus::Holiday));
    }

    let regularization = store.approved_regularization_on(employee_id, date).cloned();
    let (waive_late, waive_early) = regularization
        .as_ref()
        .map_or((false, false), |r| (r.waives_late(), r.waives_early()));
    if let Some(regularization) = &regularization {
        day.record.ticket = regularization.ticket.clone();
        match &regularization.ticket {
            Some(ticket) => day.remark(format!("{} Regularized ({ticket})", regularization.kind)),
            None => day.remark(format!("{} Regularized", regularization.kind)),
        }
    }

    let mut punches = store.punches_for(employee_id, date);
    sort_punches(&mut punches);

    if kind == DayKind::Weekoff {
        let (Some(first), Some(last)) = (punches.first(), punches.last()) else {
            return settle_unworked_weekoff(store, day, employee_id, date);
        };

        day.status = Some(AttendanceStatus::WorkedWeekoff);
        let (first_time, last_time) = (first.timestamp.time(), last.timestamp.time());
        open_draft(store, employee_id, date, first_time, employee.shift_id.clone());
        if punches.len() > 1 {
            close_with_out_punch(store, employee_id, date, last_time)?;
        }
    }

    let leave = store.approved_leave_on(employee_id, date).cloned();
    let mut half_day_leave: Option<(String, LeaveDayType)> = None;
    if let Some(leave) = leave {
        day.record.ticket = leave.ticket.clone().or(day.record.ticket.take());
        if leave.day_type.is_half_day() {
            day.remark(format!(
                "Half Day Leave: {} ({})",
                leave.leave_type_code, leave.day_type
            ));
            half_day_leave = Some((leave.leave_type_code, leave.day_type));
        } else {
            let name = leave_type_name(store, &leave.leave_type_code);
            match &leave.ticket {
                Some(ticket) => day.remark(format!("Leave: {name} ({ticket})")),
                None => day.remark(format!("Leave: {name}")),
            }
            if punches.is_empty() {
                return Ok(day.settle(AttendanceStatus::LeaveFull(leave.leave_type_code)));
            }
            day.status = Some(AttendanceStatus::PresentOnLeave);
        }
    }

    if punches.is_empty() {
        return Ok(match half_day_leave {
            Some((code, _)) => {
                day.record.is_half_day = true;
                day.settle(AttendanceStatus::HalfDayLeave(code))
            }
            None => day.settle(AttendanceStatus::Absent),
        });
    }

    evaluate_punched_day(
        store,
        day,
        employee,
        shift,
        &punches,
        half_day_leave,
        Waivers {
            late: waive_late,
            early: waive_early,
        },
        in_run,
    )
}

#[derive(Debug, Clone, Copy)]
struct Waivers {
    late: bool,
    early: bool,
}

#[allow(clippy::too_many_arguments)]
fn evaluate_punched_day(
    store: &AttendanceStore,
    mut day: DayState,
    employee: &Employee,
    shift: Option<&Shift>,
    punches: &[PunchEvent],
    half_day_leave: Option<(String, LeaveDayType)>,
    waivers: Waivers,
    in_run: &[DailyAttendanceRecord],
) -> EngineResult<DailyAttendanceRecord> {
    let date = day.record.date;
    let on_probation = employee.is_on_probation(date);

    if matches!(day.status, None | Some(AttendanceStatus::Absent)) {
        day.status = Some(AttendanceStatus::Present);
    }
    if let Some((code, day_type)) = half_day_leave {
        day.remark(format!("{code} Half ({day_type})"));
        day.status = Some(AttendanceStatus::HalfDayLeave(code));
    }

    let pattern = evaluate_punches(punches);
    let history = || {
        month_history(
            store.records_in_month_before(&employee.id, date),
            in_run,
            date,
        )
    };

    match pattern {
        PunchPattern::Missing => Ok(day.finish()),
        PunchPattern::Single { time, out_only } => {
            if !day.has_half_day_leave() {
                day.status = Some(AttendanceStatus::HalfDay);
            }
            day.record.is_half_day = true;

            if out_only {
                day.record.out_time = Some(time);
                day.remark("Single Punch (In Missing)");
            } else {
                day.record.in_time = Some(time);
                day.record.out_time = Some(time);
                day.record.late_minutes = shift.map_or(0, |s| late_minutes(time, s));
                if day.record.late_minutes > 0 {
                    let occurrence = prior_late_count(&history()) + 1;
                    day.remark(format!("Late #{occurrence}"));
                } else {
                    day.remark("Single Punch (In/Out Missing)");
                }
            }
            Ok(day.finish())
        }
        PunchPattern::Span {
            in_time,
            out_time,
            total_minutes,
        } => {
            day.record.in_time = Some(in_time);
            day.record.out_time = Some(out_time);

            let deduction = deduct_break(punches, shift);
            day.record.break_minutes = deduction.minutes;
            day.record.work_minutes = (total_minutes - deduction.minutes).max(0);
            match deduction.source {
                BreakSource::Actual => {
                    day.record.is_actual_break = true;
                    day.remark(format!("Actual Lunch: {}m", deduction.minutes));
                }
                BreakSource::Standard => {}
                BreakSource::Unassigned => {
                    debug!(employee_id = %employee.id, %date, "No shift assigned");
                    day.remark("No Shift Assigned (No Break Deducted)");
                    return Ok(day.finish());
                }
            }
            let Some(shift) = shift else {
                return Ok(day.finish());
            };

            apply_late(&mut day, evaluate_late(in_time, shift, on_probation, waivers.late));
            apply_early(&mut day, evaluate_early(out_time, shift, on_probation, waivers.early));

            let mut record = day.finish();
            apply_monthly_penalties(&mut record, shift, on_probation, &history());
            Ok(record)
        }
    }
}

fn apply_late(day: &mut DayState, verdict: LateVerdict) {
    match verdict {
        LateVerdict::OnTime => {}
        LateVerdict::Waived { .. } => {
            day.record.late_minutes = 0;
            day.record.is_late = false;
        }
        LateVerdict::Minor { minutes } => {
            day.record.late_minutes = minutes;
            day.record.is_late = true;
        }
        LateVerdict::Major { minutes }
        | LateVerdict::Probation { minutes }
        | LateVerdict::BeyondGrace { minutes } => {
            day.record.late_minutes = minutes;
        }
    }

    if let Some(remark) = verdict.remark() {
        if verdict.is_half_day() {
            day.mark_half_day(remark);
        } else {
            day.remark(remark);
        }
    }
}

fn apply_early(day: &mut DayState, verdict: EarlyVerdict) {
    match verdict {
        EarlyVerdict::OnTime => {}
        EarlyVerdict::MajorWaived { minutes } => {
            day.record.early_minutes = minutes;
            day.remark("Early Waived (Half Day Granted)");
        }
        EarlyVerdict::Major { minutes, floor } => {
            day.record.early_minutes = minutes;
            day.mark_half_day(format!("Major Early Exit (< {})", floor.format("%H:%M")));
        }
        EarlyVerdict::MinorWaived { minutes } => {
            day.record.early_minutes = 0;
            day.record.is_early = false;
            day.remark(format!("Early Waived ({minutes}m)"));
        }
        EarlyVerdict::Minor { minutes, counted } => {
            day.record.early_minutes = minutes;
            day.record.is_early = counted;
        }
    }
}

fn leave_type_name(store: &AttendanceStore, code: &str) -> String {
    store
        .leave_type(code)
        .map(|lt| lt.name.clone())
        .unwrap_or_else(|_| code.to_string())
}

/// Settles a weekoff without punches: bridged weekoffs become leave (or LWP).
fn settle_unworked_weekoff(
    store: &mut AttendanceStore,
    mut day: DayState,
    employee_id: &str,
    date: NaiveDate,
) -> EngineResult<DailyAttendanceRecord> {
    let Some(leave) = find_sandwiching_leave(store, employee_id, date) else {
        return Ok(day.settle(AttendanceStatus::Weekoff));
    };

    let code = leave.leave_type_code.clone();
    let leave_year = LeaveYear::containing(date);
    let charged = match store.allocation_mut(employee_id, &code, leave_year) {
        Some(allocation) if allocation.remaining() >= Decimal::ONE => {
            allocation.consume(Decimal::ONE)?;
            true
        }
        _ => false,
    };

    if !charged {
        warn!(employee_id, %date, leave_type = %code, "Sandwich leave without balance");
        day.remark("Sandwich Leave (LWP - No Balance)");
        return Ok(day.settle(AttendanceStatus::Lwp));
    }

    store.record_sandwich_charge(
        employee_id,
        date,
        SandwichCharge {
            leave_type_code: code.clone(),
            leave_year,
        },
    );
    let name = leave_type_name(store, &code);
    info!(employee_id, %date, leave_type = %code, "Weekoff charged as sandwich leave");
    day.record.ticket = leave.ticket.clone();
    day.remark(format!("Sandwich Leave (covered by {name})"));
    Ok(day.settle(AttendanceStatus::LeaveFull(code)))
}

/// Replaces the status of a stored record by hand.
///
/// The record is created if the day was never processed. A supplied ticket is
/// attached and the month's sequence cache fast-forwarded past it. Later
/// reprocessing of the day recomputes the record and discards the override.
pub fn apply_manual_override(
    store: &mut AttendanceStore,
    employee_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
    ticket: Option<&str>,
    remark: &str,
) -> EngineResult<DailyAttendanceRecord> {
    let employee = store.employee(employee_id)?;
    let mut record = store.record(employee_id, date).cloned().unwrap_or_else(|| {
        let mut record = DailyAttendanceRecord::new(employee_id, date, status.clone());
        record.shift_id = employee.shift_id.clone();
        record
    });

    record.is_half_day = matches!(
        status,
        AttendanceStatus::HalfDay | AttendanceStatus::HalfDayLeave(_)
    );
    record.status = status;
    record.remarks.push(format!("Manual Override: {remark}"));
    if let Some(ticket) = ticket {
        record.ticket = Some(ticket.to_string());
        catch_up_sequence(store, date, ticket);
    }

    info!(employee_id, %date, status = %record.status, "Manual override applied");
    store.save_record(record.clone());
    Ok(record)
}
