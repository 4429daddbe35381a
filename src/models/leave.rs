//! Leave types, leave years and per-year allocations.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Month in which a leave year starts (November).
pub const LEAVE_YEAR_START_MONTH: u32 = 11;

/// A leave cycle running Nov 1 to Oct 31, named by its starting year.
///
/// # Example
///
/// ```
/// use attendance_engine::models::LeaveYear;
/// use chrono::NaiveDate;
///
/// let nov = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
/// let oct = NaiveDate::from_ymd_opt(2026, 10, 31).unwrap();
/// assert_eq!(LeaveYear::containing(nov), LeaveYear(2025));
/// assert_eq!(LeaveYear::containing(oct), LeaveYear(2025));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaveYear(pub i32);

impl LeaveYear {
    /// Returns the leave year a date belongs to.
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= LEAVE_YEAR_START_MONTH {
            LeaveYear(date.year())
        } else {
            LeaveYear(date.year() - 1)
        }
    }

    /// First day of the cycle (Nov 1).
    pub fn start(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0, LEAVE_YEAR_START_MONTH, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the cycle (Oct 31 of the following year).
    pub fn end(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0 + 1, 10, 31).unwrap_or(NaiveDate::MAX)
    }

    /// The following leave year.
    pub fn next(self) -> Self {
        LeaveYear(self.0 + 1)
    }
}

impl std::fmt::Display for LeaveYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A leave type from the policy catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    /// Short code used as the attendance status (e.g. "PL").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Quota granted for a full leave year.
    #[serde(default)]
    pub default_yearly_quota: Decimal,
    /// Paid leave requires an allocation with sufficient balance.
    #[serde(default = "default_is_paid")]
    pub is_paid: bool,
    /// Whether the unused balance carries into the next leave year.
    #[serde(default)]
    pub allow_carry_forward: bool,
    /// Paid leave of this type can only start once probation has ended.
    #[serde(default = "default_applicable_after_probation")]
    pub applicable_after_probation: bool,
}

fn default_is_paid() -> bool {
    true
}

fn default_applicable_after_probation() -> bool {
    true
}

/// An employee's balance for one leave type in one leave year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAllocation {
    /// The employee owning the balance.
    pub employee_id: String,
    /// Leave type code.
    pub leave_type_code: String,
    /// The leave year this row covers.
    pub leave_year: LeaveYear,
    /// Days granted for the year.
    pub total_allocated: Decimal,
    /// Days carried forward from the previous year.
    #[serde(default)]
    pub opening_balance: Decimal,
    /// Days consumed so far.
    #[serde(default)]
    pub used_count: Decimal,
}

impl LeaveAllocation {
    /// Creates an empty allocation row.
    pub fn new(
        employee_id: impl Into<String>,
        leave_type_code: impl Into<String>,
        leave_year: LeaveYear,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            leave_type_code: leave_type_code.into(),
            leave_year,
            total_allocated: Decimal::ZERO,
            opening_balance: Decimal::ZERO,
            used_count: Decimal::ZERO,
        }
    }

    /// Remaining days: allocated + opening - used.
    pub fn remaining(&self) -> Decimal {
        self.total_allocated + self.opening_balance - self.used_count
    }

    /// Consumes `days`, failing without mutation if the balance cannot cover them.
    pub fn consume(&mut self, days: Decimal) -> EngineResult<()> {
        let available = self.remaining();
        if days > available {
            return Err(EngineError::InsufficientBalance {
                employee_id: self.employee_id.clone(),
                leave_type: self.leave_type_code.clone(),
                available,
                requested: days,
            });
        }
        self.used_count += days;
        Ok(())
    }

    /// Returns previously consumed days to the balance, never below zero used.
    pub fn release(&mut self, days: Decimal) {
        self.used_count = (self.used_count - days).max(Decimal::ZERO);
    }
}
