//! Compensatory-off credit requests.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a comp-off credit: Draft -> Pending -> Approved | Rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompOffStatus {
    /// Opened by an in-punch on a weekoff.
    Draft,
    /// Closed by an out-punch, awaiting review.
    Pending,
    /// Credited to the comp-off allocation.
    Approved,
    /// Declined with no balance effect.
    Rejected,
}

impl CompOffStatus {
    /// Approved and rejected requests are no longer touched by processing.
    pub fn is_decided(self) -> bool {
        matches!(self, CompOffStatus::Approved | CompOffStatus::Rejected)
    }
}

impl std::fmt::Display for CompOffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompOffStatus::Draft => write!(f, "Draft"),
            CompOffStatus::Pending => write!(f, "Pending"),
            CompOffStatus::Approved => write!(f, "Approved"),
            CompOffStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// A comp-off credit earned by working a weekoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompOffRequest {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee who worked.
    pub employee_id: String,
    /// The weekoff that was worked.
    pub worked_date: NaiveDate,
    /// The employee's shift at the time, used for the full-day threshold.
    pub shift_id: Option<String>,
    /// First punch of the day.
    pub in_time: Option<NaiveTime>,
    /// Last punch of the day.
    pub out_time: Option<NaiveTime>,
    /// Minutes between in and out, overnight-aware.
    pub work_minutes: Option<i64>,
    /// Credit earned: 0, 0.5 or 1 day.
    pub credit_days: Option<Decimal>,
    /// Workflow state.
    pub status: CompOffStatus,
    /// Last day the credit can be used (set on approval).
    pub expiry_date: Option<NaiveDate>,
    /// Who approved or rejected the request.
    pub decided_by: Option<String>,
    /// Reason given on rejection.
    pub rejection_reason: Option<String>,
}

impl CompOffRequest {
    /// Opens a draft for a worked weekoff.
    pub fn draft(
        employee_id: impl Into<String>,
        worked_date: NaiveDate,
        in_time: NaiveTime,
        shift_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.into(),
            worked_date,
            shift_id,
            in_time: Some(in_time),
            out_time: None,
            work_minutes: None,
            credit_days: None,
            status: CompOffStatus::Draft,
            expiry_date: None,
            decided_by: None,
            rejection_reason: None,
        }
    }

    /// Credit days as a value, zero while undetermined.
    pub fn credit(&self) -> Decimal {
        self.credit_days.unwrap_or(Decimal::ZERO)
    }
}
