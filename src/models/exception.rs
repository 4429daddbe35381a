//! Approved exceptions: regularizations and leave applications.
//!
//! Approval workflows live outside the engine; these types only carry the
//! outcome the engine reacts to.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PunchEvent, PunchOrigin};

/// Workflow state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; the engine honours it.
    Approved,
    /// Rejected; the engine ignores it.
    Rejected,
}

/// What a regularization corrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegularizationKind {
    /// Excuses a late arrival.
    LateComing,
    /// Excuses an early exit.
    EarlyGo,
    /// Supplies missing punches.
    MissedPunch,
}

impl std::fmt::Display for RegularizationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegularizationKind::LateComing => write!(f, "Late Coming"),
            RegularizationKind::EarlyGo => write!(f, "Early Go"),
            RegularizationKind::MissedPunch => write!(f, "Missed Punch"),
        }
    }
}

/// An attendance regularization request for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regularization {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee the request is for.
    pub employee_id: String,
    /// What is being regularized.
    pub kind: RegularizationKind,
    /// The day being regularized.
    pub date: NaiveDate,
    /// Virtual in-punch time (missed-punch requests).
    #[serde(default)]
    pub punch_in: Option<NaiveTime>,
    /// Virtual out-punch time (missed-punch requests).
    #[serde(default)]
    pub punch_out: Option<NaiveTime>,
    /// Whether the late/early penalty is waived.
    pub waive_penalty: bool,
    /// Workflow state.
    pub status: ApprovalStatus,
    /// Audit ticket, e.g. "FEB 12".
    #[serde(default)]
    pub ticket: Option<String>,
}

impl Regularization {
    /// Returns true if this is an approved late-coming waiver.
    pub fn waives_late(&self) -> bool {
        self.waive_penalty && self.kind == RegularizationKind::LateComing
    }

    /// Returns true if this is an approved early-go waiver.
    pub fn waives_early(&self) -> bool {
        self.waive_penalty && self.kind == RegularizationKind::EarlyGo
    }

    /// Returns the virtual punches an approved missed-punch request contributes.
    pub fn virtual_punches(&self) -> Vec<PunchEvent> {
        if self.kind != RegularizationKind::MissedPunch || self.status != ApprovalStatus::Approved
        {
            return Vec::new();
        }

        let in_punch = self.punch_in.map(|time| PunchEvent {
            employee_id: self.employee_id.clone(),
            timestamp: self.date.and_time(time),
            origin: PunchOrigin::RegularizedIn,
        });
        let out_punch = self.punch_out.map(|time| PunchEvent {
            employee_id: self.employee_id.clone(),
            timestamp: self.date.and_time(time),
            origin: PunchOrigin::RegularizedOut,
        });

        in_punch.into_iter().chain(out_punch).collect()
    }
}

/// Which part of the day a leave covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveDayType {
    /// The whole day.
    FullDay,
    /// Morning half.
    FirstHalf,
    /// Afternoon half.
    SecondHalf,
}

impl LeaveDayType {
    /// Returns true for the two half-day variants.
    pub fn is_half_day(self) -> bool {
        matches!(self, LeaveDayType::FirstHalf | LeaveDayType::SecondHalf)
    }

    /// Days of balance one calendar day of this type consumes.
    pub fn day_weight(self) -> Decimal {
        if self.is_half_day() {
            Decimal::new(5, 1)
        } else {
            Decimal::ONE
        }
    }
}

impl std::fmt::Display for LeaveDayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveDayType::FullDay => write!(f, "Full Day"),
            LeaveDayType::FirstHalf => write!(f, "First Half"),
            LeaveDayType::SecondHalf => write!(f, "Second Half"),
        }
    }
}

/// A leave application over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee on leave.
    pub employee_id: String,
    /// Leave type code (e.g. "PL", "SL", "CO").
    pub leave_type_code: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Full or half day.
    pub day_type: LeaveDayType,
    /// Exempts this leave from bridging adjacent weekoffs.
    #[serde(default)]
    pub ignore_sandwich: bool,
    /// Workflow state.
    pub status: ApprovalStatus,
    /// Audit ticket.
    #[serde(default)]
    pub ticket: Option<String>,
    /// Balance days charged when the leave was booked.
    #[serde(default)]
    pub total_days: Decimal,
}

impl LeaveApplication {
    /// Returns true if `date` falls within the leave range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if this leave can bridge a weekoff on `date`.
    pub fn bridges(&self, date: NaiveDate) -> bool {
        self.status == ApprovalStatus::Approved
            && !self.ignore_sandwich
            && self.day_type == LeaveDayType::FullDay
            && self.covers(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn missed_punch(status: ApprovalStatus) -> Regularization {
        Regularization {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            kind: RegularizationKind::MissedPunch,
            date: date("2026-03-03"),
            punch_in: NaiveTime::from_hms_opt(9, 0, 0),
            punch_out: NaiveTime::from_hms_opt(18, 0, 0),
            waive_penalty: false,
            status,
            ticket: Some("MAR 1".to_string()),
        }
    }

    fn leave(day_type: LeaveDayType, ignore_sandwich: bool) -> LeaveApplication {
        LeaveApplication {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            leave_type_code: "PL".to_string(),
            start_date: date("2026-03-06"),
            end_date: date("2026-03-07"),
            day_type,
            ignore_sandwich,
            status: ApprovalStatus::Approved,
            ticket: None,
            total_days: Decimal::TWO,
        }
    }

    #[test]
    fn test_approved_missed_punch_yields_tagged_virtual_punches() {
        let punches = missed_punch(ApprovalStatus::Approved).virtual_punches();
        assert_eq!(punches.len(), 2);
        assert_eq!(punches[0].origin, PunchOrigin::RegularizedIn);
        assert_eq!(punches[1].origin, PunchOrigin::RegularizedOut);
        assert_eq!(punches[1].date(), date("2026-03-03"));
    }

    #[test]
    fn test_pending_missed_punch_yields_nothing() {
        assert!(missed_punch(ApprovalStatus::Pending).virtual_punches().is_empty());
    }

    #[test]
    fn test_waiver_kinds() {
        let mut reg = missed_punch(ApprovalStatus::Approved);
        reg.kind = RegularizationKind::LateComing;
        reg.waive_penalty = true;
        assert!(reg.waives_late());
        assert!(!reg.waives_early());
        reg.waive_penalty = false;
        assert!(!reg.waives_late());
    }

    #[test]
    fn test_only_full_day_non_exempt_leave_bridges() {
        assert!(leave(LeaveDayType::FullDay, false).bridges(date("2026-03-06")));
        assert!(!leave(LeaveDayType::FullDay, false).bridges(date("2026-03-08")));
        assert!(!leave(LeaveDayType::FullDay, true).bridges(date("2026-03-06")));
        assert!(!leave(LeaveDayType::FirstHalf, false).bridges(date("2026-03-06")));
    }

    #[test]
    fn test_day_weight() {
        assert_eq!(LeaveDayType::FullDay.day_weight(), Decimal::ONE);
        assert_eq!(LeaveDayType::SecondHalf.day_weight(), Decimal::new(5, 1));
    }
}
