//! Comp-off credit lifecycle and usable balance.
//!
//! Working a weekoff opens a draft credit on the first punch; the closing punch
//! sizes the credit and submits it for approval. Approved credits are added to
//! the employee's comp-off allocation and expire a fixed number of days after
//! the worked date. Consumption is tracked on allocations while expiry is per
//! credit, so the usable balance replays usage FIFO over credits.

use chrono::{Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{CompOffRequest, CompOffStatus, LeaveYear, elapsed_minutes};
use crate::store::AttendanceStore;

/// Opens a draft credit for a worked weekoff unless one already exists.
///
/// Returns the id of the new or existing request.
pub fn open_draft(
    store: &mut AttendanceStore,
    employee_id: &str,
    worked_date: NaiveDate,
    in_time: NaiveTime,
    shift_id: Option<String>,
) -> Uuid {
    if let Some(existing) = store.comp_off_for(employee_id, worked_date) {
        return existing.id;
    }

    let request = CompOffRequest::draft(employee_id, worked_date, in_time, shift_id);
    let id = request.id;
    debug!(employee_id, %worked_date, %id, "Opened comp-off draft");
    store.add_comp_off_request(request);
    id
}

/// Sizes a credit from its closing punch and moves it to pending.
///
/// Decided requests are left untouched. Returns the request's resulting status,
/// or `None` when no request exists for the day.
pub fn close_with_out_punch(
    store: &mut AttendanceStore,
    employee_id: &str,
    worked_date: NaiveDate,
    out_time: NaiveTime,
) -> EngineResult<Option<CompOffStatus>> {
    let Some(request) = store.comp_off_for(employee_id, worked_date) else {
        return Ok(None);
    };
    if request.status.is_decided() {
        return Ok(Some(request.status));
    }

    let (full_day, half_day) = credit_thresholds(store, request.shift_id.as_deref())?;
    let worked = request
        .in_time
        .map(|in_time| elapsed_minutes(in_time, out_time))
        .unwrap_or(0);
    let credit = credit_for_minutes(worked, full_day, half_day);

    let Some(request) = store.comp_off_for_mut(employee_id, worked_date) else {
        return Ok(None);
    };
    request.out_time = Some(out_time);
    request.work_minutes = Some(worked);
    request.credit_days = Some(credit);
    request.status = CompOffStatus::Pending;

    debug!(employee_id, %worked_date, worked, %credit, "Comp-off submitted");
    Ok(Some(CompOffStatus::Pending))
}

fn credit_thresholds(store: &AttendanceStore, shift_id: Option<&str>) -> EngineResult<(i64, i64)> {
    match shift_id {
        Some(id) => {
            let full = store.shift(id)?.working_minutes();
            Ok((full, full / 2))
        }
        None => {
            let policy = &store.policy().comp_off;
            Ok((policy.default_full_day_minutes, policy.default_half_day_minutes))
        }
    }
}

/// Credit earned for `worked` minutes: one day at the full threshold, half at the half threshold.
///
/// # Example
///
/// ```
/// use attendance_engine::processing::credit_for_minutes;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(credit_for_minutes(480, 480, 240), Decimal::ONE);
/// assert_eq!(credit_for_minutes(300, 480, 240), Decimal::from_str("0.5").unwrap());
/// assert_eq!(credit_for_minutes(100, 480, 240), Decimal::ZERO);
/// ```
pub fn credit_for_minutes(worked: i64, full_day: i64, half_day: i64) -> Decimal {
    if worked >= full_day {
        Decimal::ONE
    } else if worked >= half_day {
        Decimal::new(5, 1)
    } else {
        Decimal::ZERO
    }
}

fn ensure_pending(request: &CompOffRequest) -> EngineResult<()> {
    if request.status != CompOffStatus::Pending {
        return Err(EngineError::InvalidCompOffState {
            id: request.id.to_string(),
            status: request.status.to_string(),
            expected: CompOffStatus::Pending.to_string(),
        });
    }
    Ok(())
}

/// Approves a pending credit and books it to the comp-off allocation.
///
/// The allocation for the worked date's leave year is created when missing.
/// A request whose credit is zero cannot be approved and is left pending.
pub fn approve_comp_off(
    store: &mut AttendanceStore,
    id: Uuid,
    approver: &str,
) -> EngineResult<()> {
    let request = store.comp_off(id)?;
    ensure_pending(request)?;

    let employee_id = request.employee_id.clone();
    let worked_date = request.worked_date;
    let credit = request.credit();
    if credit <= Decimal::ZERO {
        return Err(EngineError::InvalidCompOffCredit {
            id: id.to_string(),
            credit,
        });
    }
    let leave_type_code = store.policy().comp_off.leave_type_code.clone();
    let validity = Duration::days(store.policy().comp_off.validity_days);

    let allocation =
        store.allocation_entry(&employee_id, &leave_type_code, LeaveYear::containing(worked_date));
    allocation.total_allocated += credit;

    let request = store.comp_off_mut(id)?;
    request.status = CompOffStatus::Approved;
    request.expiry_date = Some(worked_date + validity);
    request.decided_by = Some(approver.to_string());

    info!(
        employee_id = %employee_id,
        %worked_date,
        %credit,
        approver,
        "Comp-off approved"
    );
    Ok(())
}

/// Rejects a pending credit. No balance is touched.
pub fn reject_comp_off(
    store: &mut AttendanceStore,
    id: Uuid,
    approver: &str,
    reason: &str,
) -> EngineResult<()> {
    let request = store.comp_off_mut(id)?;
    ensure_pending(request)?;

    request.status = CompOffStatus::Rejected;
    request.decided_by = Some(approver.to_string());
    request.rejection_reason = Some(reason.to_string());

    info!(employee_id = %request.employee_id, %id, approver, "Comp-off rejected");
    Ok(())
}

/// Comp-off days the employee can still use on `as_of`.
///
/// All-time usage across every leave year's comp-off allocation is consumed
/// against approved credits oldest first; what is left of each credit counts
/// only while it has not expired.
pub fn usable_comp_off_balance(
    store: &AttendanceStore,
    employee_id: &str,
    as_of: NaiveDate,
) -> Decimal {
    let leave_type_code = &store.policy().comp_off.leave_type_code;
    let mut unconsumed_use = store.total_used(employee_id, leave_type_code);
    let mut balance = Decimal::ZERO;

    for credit in store.approved_comp_offs(employee_id) {
        let amount = credit.credit();
        let consumed = amount.min(unconsumed_use);
        unconsumed_use -= consumed;

        let leftover = amount - consumed;
        if leftover > Decimal::ZERO && credit.expiry_date.is_some_and(|expiry| expiry >= as_of) {
            balance += leftover;
        }
    }

    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnginePolicy;
    use crate::models::{LeaveAllocation, Shift};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn store() -> AttendanceStore {
        let mut store = AttendanceStore::default();
        let shift: Shift = serde_yaml::from_str(
            "id: GEN\nstart_time: \"09:00:00\"\nend_time: \"18:00:00\"\nlunch:\n  start: \"13:00:00\"\n  end: \"14:00:00\"\n",
        )
        .unwrap();
        store.add_shift(shift);
        store
    }

    fn pending(store: &mut AttendanceStore, worked_date: NaiveDate, out: NaiveTime) -> Uuid {
        let id = open_draft(store, "emp_001", worked_date, time(9, 0), Some("GEN".to_string()));
        close_with_out_punch(store, "emp_001", worked_date, out).unwrap();
        id
    }

    #[test]
    fn test_open_draft_is_idempotent() {
        let mut store = store();
        let first = open_draft(&mut store, "emp_001", date(3, 8), time(9, 0), None);
        let second = open_draft(&mut store, "emp_001", date(3, 8), time(10, 0), None);

        assert_eq!(first, second);
        assert_eq!(store.comp_off(first).unwrap().in_time, Some(time(9, 0)));
    }

    #[test]
    fn test_close_sizes_credit_from_shift() {
        let mut store = store();
        let full = pending(&mut store, date(3, 8), time(17, 0));
        let half = pending(&mut store, date(3, 15), time(13, 30));
        let none = pending(&mut store, date(3, 22), time(11, 0));

        let request = store.comp_off(full).unwrap();
        assert_eq!(request.status, CompOffStatus::Pending);
        assert_eq!(request.work_minutes, Some(480));
        assert_eq!(request.credit(), Decimal::ONE);
        assert_eq!(store.comp_off(half).unwrap().credit(), dec("0.5"));
        assert_eq!(store.comp_off(none).unwrap().credit(), Decimal::ZERO);
    }

    #[test]
    fn test_close_without_shift_uses_policy_defaults() {
        let mut store = store();
        open_draft(&mut store, "emp_001", date(3, 8), time(22, 0), None);
        close_with_out_punch(&mut store, "emp_001", date(3, 8), time(2, 30)).unwrap();

        let request = store.comp_off_for("emp_001", date(3, 8)).unwrap();
        assert_eq!(request.work_minutes, Some(270));
        assert_eq!(request.credit(), dec("0.5"));
    }

    #[test]
    fn test_close_is_noop_once_decided() {
        let mut store = store();
        let id = pending(&mut store, date(3, 8), time(18, 0));
        approve_comp_off(&mut store, id, "manager").unwrap();

        let status = close_with_out_punch(&mut store, "emp_001", date(3, 8), time(10, 0)).unwrap();
        assert_eq!(status, Some(CompOffStatus::Approved));
        assert_eq!(store.comp_off(id).unwrap().credit(), Decimal::ONE);
    }

    #[test]
    fn test_close_without_draft_returns_none() {
        let mut store = store();
        assert_eq!(
            close_with_out_punch(&mut store, "emp_001", date(3, 8), time(18, 0)).unwrap(),
            None
        );
    }

    #[test]
    fn test_approve_books_allocation_and_expiry() {
        let mut store = store();
        let id = pending(&mut store, date(3, 8), time(18, 0));
        approve_comp_off(&mut store, id, "manager").unwrap();

        let request = store.comp_off(id).unwrap();
        assert_eq!(request.status, CompOffStatus::Approved);
        assert_eq!(request.expiry_date, Some(date(6, 6)));
        assert_eq!(request.decided_by.as_deref(), Some("manager"));

        let allocation = store.allocation("emp_001", "CO", LeaveYear(2025)).unwrap();
        assert_eq!(allocation.total_allocated, Decimal::ONE);
    }

    #[test]
    fn test_approve_requires_pending() {
        let mut store = store();
        let id = open_draft(&mut store, "emp_001", date(3, 8), time(9, 0), None);

        match approve_comp_off(&mut store, id, "manager") {
            Err(EngineError::InvalidCompOffState { status, .. }) => assert_eq!(status, "Draft"),
            other => panic!("Expected InvalidCompOffState, got {:?}", other),
        }
    }

    #[test]
    fn test_approve_rejects_zero_credit() {
        let mut store = store();
        let id = pending(&mut store, date(3, 8), time(10, 0));

        assert!(matches!(
            approve_comp_off(&mut store, id, "manager"),
            Err(EngineError::InvalidCompOffCredit { .. })
        ));
        let request = store.comp_off(id).unwrap();
        assert_eq!(request.status, CompOffStatus::Pending);
        assert_eq!(request.expiry_date, None);
        assert!(store.allocation("emp_001", "CO", LeaveYear(2025)).is_none());

        // The request can still be rejected.
        reject_comp_off(&mut store, id, "manager", "Too short").unwrap();
    }

    #[test]
    fn test_reject_leaves_balance_untouched() {
        let mut store = store();
        let id = pending(&mut store, date(3, 8), time(18, 0));
        reject_comp_off(&mut store, id, "manager", "Not authorised").unwrap();

        let request = store.comp_off(id).unwrap();
        assert_eq!(request.status, CompOffStatus::Rejected);
        assert_eq!(request.rejection_reason.as_deref(), Some("Not authorised"));
        assert!(store.allocation("emp_001", "CO", LeaveYear(2025)).is_none());
        assert!(reject_comp_off(&mut store, id, "manager", "again").is_err());
    }

    #[test]
    fn test_unknown_request() {
        let mut store = store();
        assert!(matches!(
            approve_comp_off(&mut store, Uuid::new_v4(), "manager"),
            Err(EngineError::CompOffRequestNotFound { .. })
        ));
    }

    #[test]
    fn test_usable_balance_fifo_with_expiry() {
        let mut store = store();
        let worked_a = date(1, 4);
        let worked_b = date(2, 3);
        let a = pending(&mut store, worked_a, time(18, 0));
        let b = pending(&mut store, worked_b, time(18, 0));
        approve_comp_off(&mut store, a, "manager").unwrap();
        approve_comp_off(&mut store, b, "manager").unwrap();
        store
            .allocation_mut("emp_001", "CO", LeaveYear(2025))
            .unwrap()
            .used_count = dec("1.2");

        // A expires on worked_a + 90, B on worked_b + 90 (30 days later).
        let a_expiry = worked_a + Duration::days(90);
        let day_95 = a_expiry + Duration::days(5);
        let day_130 = a_expiry + Duration::days(40);
        assert_eq!(usable_comp_off_balance(&store, "emp_001", day_95), dec("0.8"));
        assert_eq!(usable_comp_off_balance(&store, "emp_001", day_130), Decimal::ZERO);
    }

    #[test]
    fn test_usable_balance_spans_leave_years() {
        let mut store = store();
        let october = NaiveDate::from_ymd_opt(2025, 10, 26).unwrap();
        let id = pending(&mut store, october, time(18, 0));
        approve_comp_off(&mut store, id, "manager").unwrap();
        let mut next_year = LeaveAllocation::new("emp_001", "CO", LeaveYear(2025));
        next_year.used_count = dec("0.5");
        store.upsert_allocation(next_year);

        let as_of = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        assert_eq!(usable_comp_off_balance(&store, "emp_001", as_of), dec("0.5"));
    }

    #[test]
    fn test_custom_comp_off_code() {
        let mut policy = EnginePolicy::default();
        policy.comp_off.leave_type_code = "COFF".to_string();
        let config = crate::config::AttendanceConfig::new(policy, Vec::new(), Vec::new());
        let mut store = AttendanceStore::from_config(&config);

        let id = open_draft(&mut store, "emp_001", date(3, 8), time(9, 0), None);
        close_with_out_punch(&mut store, "emp_001", date(3, 8), time(18, 0)).unwrap();
        approve_comp_off(&mut store, id, "manager").unwrap();

        assert!(store.allocation("emp_001", "COFF", LeaveYear(2025)).is_some());
        assert_eq!(usable_comp_off_balance(&store, "emp_001", date(3, 9)), Decimal::ONE);
    }
}
