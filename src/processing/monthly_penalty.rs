//! Monthly escalation of repeated lateness and early exits.
//!
//! A day that is individually acceptable can still become a half day once the
//! employee exceeds the shift's monthly allowance. Counting looks at every
//! earlier day of the same calendar month, including records produced earlier
//! in the current batch run that are not yet persisted.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{AttendanceStatus, DailyAttendanceRecord, Shift};

/// Builds the same-month history preceding `date`.
///
/// Stored records and in-run records are merged and de-duplicated by date;
/// the in-run version wins. Records outside `[first of month, date)` are
/// dropped.
pub fn month_history<'a>(
    stored: impl IntoIterator<Item = &'a DailyAttendanceRecord>,
    in_run: impl IntoIterator<Item = &'a DailyAttendanceRecord>,
    date: NaiveDate,
) -> Vec<DailyAttendanceRecord> {
    let in_window = |record: &DailyAttendanceRecord| {
        record.date < date
            && record.date.year() == date.year()
            && record.date.month() == date.month()
    };

    let mut by_date: BTreeMap<NaiveDate, &DailyAttendanceRecord> = stored
        .into_iter()
        .filter(|r| in_window(r))
        .map(|r| (r.date, r))
        .collect();
    for record in in_run.into_iter().filter(|r| in_window(r)) {
        by_date.insert(record.date, record);
    }

    by_date.into_values().cloned().collect()
}

/// Number of earlier days with any late minutes.
pub fn prior_late_count(history: &[DailyAttendanceRecord]) -> u32 {
    history.iter().filter(|r| r.late_minutes > 0).count() as u32
}

/// Number of earlier days flagged as a counted early exit.
pub fn prior_early_count(history: &[DailyAttendanceRecord]) -> u32 {
    history.iter().filter(|r| r.is_early).count() as u32
}

/// Escalates `record` to a half day when its monthly allowances are exceeded.
///
/// Lateness is counted whenever late minutes are recorded, whether or not the
/// day was within grace. Days already a generic half day are left alone. A
/// half-day leave status is preserved; only the half-day flag is set.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{AttendanceStatus, DailyAttendanceRecord, Shift};
/// use attendance_engine::processing::apply_monthly_penalties;
/// use chrono::NaiveDate;
///
/// let shift: Shift = serde_yaml::from_str(
///     "id: GEN\nstart_time: \"09:00:00\"\nend_time: \"18:00:00\"\nmax_late_per_month: 3\n",
/// ).unwrap();
/// let late_day = |d| {
///     let mut r = DailyAttendanceRecord::new(
///         "emp_001",
///         NaiveDate::from_ymd_opt(2026, 3, d).unwrap(),
///         AttendanceStatus::Present,
///     );
///     r.late_minutes = 10;
///     r.is_late = true;
///     r
/// };
///
/// let history = vec![late_day(2), late_day(3), late_day(4)];
/// let mut today = late_day(5);
/// apply_monthly_penalties(&mut today, &shift, false, &history);
///
/// assert_eq!(today.status, AttendanceStatus::HalfDay);
/// assert!(today.remarks.contains(&"Late #4".to_string()));
/// ```
pub fn apply_monthly_penalties(
    record: &mut DailyAttendanceRecord,
    shift: &Shift,
    on_probation: bool,
    history: &[DailyAttendanceRecord],
) {
    if record.late_minutes > 0 && record.status != AttendanceStatus::HalfDay {
        let occurrence = prior_late_count(history) + 1;
        record.remarks.push(format!("Late #{occurrence}"));

        if on_probation {
            escalate(record, "Probation Penalty".to_string());
        } else if occurrence > shift.max_late_per_month && shift.half_day_on_late_exceed {
            escalate(
                record,
                format!("Penalty Applied (Max {} allowed)", shift.max_late_per_month),
            );
        }
    }

    if record.is_early && record.status != AttendanceStatus::HalfDay {
        if on_probation {
            escalate(record, "Early Go (Probation)".to_string());
        } else {
            let occurrence = prior_early_count(history) + 1;
            if occurrence > shift.max_early_per_month {
                escalate(
                    record,
                    format!(
                        "Early Go #{occurrence} Penalty (Max {} allowed)",
                        shift.max_early_per_month
                    ),
                );
            }
        }
    }
}

fn escalate(record: &mut DailyAttendanceRecord, remark: String) {
    if !record.status.is_half_day_leave() {
        record.status = AttendanceStatus::HalfDay;
    }
    record.is_half_day = true;
    record.remarks.push(remark);
}
