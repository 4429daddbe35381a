//! Attendance status and the daily record the engine produces.
//!
//! The [`DailyAttendanceRecord`] is fully recomputed on every run and is the
//! value downstream payroll aggregation consumes.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// The single authoritative status of an employee-day.
///
/// Leave-derived variants carry the leave type code they came from.
///
/// # Example
///
/// ```
/// use attendance_engine::models::AttendanceStatus;
///
/// assert_eq!(AttendanceStatus::HalfDayLeave("PL".to_string()).code(), "PHF");
/// assert_eq!(AttendanceStatus::LeaveFull("SL".to_string()).code(), "SL");
/// assert_eq!(AttendanceStatus::Weekoff.code(), "W/O");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "leave_code", rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Worked a regular day.
    Present,
    /// No punches and nothing excusing the day.
    Absent,
    /// Unworked weekly off.
    Weekoff,
    /// Punched on the weekly off.
    WorkedWeekoff,
    /// Holiday applicable to the employee.
    Holiday,
    /// Half day from a punch or penalty rule.
    HalfDay,
    /// Half-day leave; the other half is worked or absent.
    HalfDayLeave(String),
    /// Full-day leave of the given type.
    LeaveFull(String),
    /// Leave without pay.
    Lwp,
    /// Punched despite an approved full-day leave.
    PresentOnLeave,
}

impl AttendanceStatus {
    /// Short status code as printed on attendance sheets.
    pub fn code(&self) -> String {
        match self {
            AttendanceStatus::Present => "P".to_string(),
            AttendanceStatus::Absent => "A".to_string(),
            AttendanceStatus::Weekoff => "W/O".to_string(),
            AttendanceStatus::WorkedWeekoff => "W/OP".to_string(),
            AttendanceStatus::Holiday => "H".to_string(),
            AttendanceStatus::HalfDay => "HD".to_string(),
            AttendanceStatus::HalfDayLeave(code) => {
                let initial = code
                    .chars()
                    .next()
                    .map(|c| c.to_ascii_uppercase())
                    .unwrap_or('L');
                format!("{initial}HF")
            }
            AttendanceStatus::LeaveFull(code) => code.clone(),
            AttendanceStatus::Lwp => "LWP".to_string(),
            AttendanceStatus::PresentOnLeave => "P(L)".to_string(),
        }
    }

    /// Returns true for a half-day leave status, which punch rules never overwrite.
    pub fn is_half_day_leave(&self) -> bool {
        matches!(self, AttendanceStatus::HalfDayLeave(_))
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "Present"),
            AttendanceStatus::Absent => write!(f, "Absent"),
            AttendanceStatus::Weekoff => write!(f, "Weekoff"),
            AttendanceStatus::WorkedWeekoff => write!(f, "Worked Weekoff"),
            AttendanceStatus::Holiday => write!(f, "Holiday"),
            AttendanceStatus::HalfDay => write!(f, "Half Day"),
            AttendanceStatus::HalfDayLeave(_) => write!(f, "{}", self.code()),
            AttendanceStatus::LeaveFull(code) => write!(f, "{code}"),
            AttendanceStatus::Lwp => write!(f, "LWP"),
            AttendanceStatus::PresentOnLeave => write!(f, "Present (Leave)"),
        }
    }
}

/// The engine's verdict for one employee-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttendanceRecord {
    /// The employee.
    pub employee_id: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// The shift in force when the day was processed.
    pub shift_id: Option<String>,
    /// First effective punch.
    pub in_time: Option<NaiveTime>,
    /// Last effective punch.
    pub out_time: Option<NaiveTime>,
    /// Final status.
    pub status: AttendanceStatus,
    /// Minor late arrival awaiting monthly frequency evaluation.
    pub is_late: bool,
    /// Minutes after shift start (kept for reporting even when not penalised).
    pub late_minutes: i64,
    /// Minor early exit awaiting monthly frequency evaluation.
    pub is_early: bool,
    /// Minutes before shift end.
    pub early_minutes: i64,
    /// The day counts as a half day.
    pub is_half_day: bool,
    /// Net worked minutes.
    pub work_minutes: i64,
    /// Break minutes deducted.
    pub break_minutes: i64,
    /// Break measured from lunch punches rather than the shift standard.
    pub is_actual_break: bool,
    /// Human-readable notes, in the order rules produced them.
    pub remarks: Vec<String>,
    /// Linked audit ticket.
    pub ticket: Option<String>,
}

impl DailyAttendanceRecord {
    /// Creates a record with the given status and every computed field cleared.
    pub fn new(employee_id: impl Into<String>, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            shift_id: None,
            in_time: None,
            out_time: None,
            status,
            is_late: false,
            late_minutes: 0,
            is_early: false,
            early_minutes: 0,
            is_half_day: false,
            work_minutes: 0,
            break_minutes: 0,
            is_actual_break: false,
            remarks: Vec::new(),
            ticket: None,
        }
    }

    /// Remarks joined the way attendance sheets print them.
    pub fn remarks_text(&self) -> String {
        self.remarks.join(", ")
    }
}
