//! Raw clock events.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Where a punch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchOrigin {
    /// A biometric device punch (direction unknown).
    Device,
    /// A virtual in-punch from an approved missed-punch regularization.
    RegularizedIn,
    /// A virtual out-punch from an approved missed-punch regularization.
    RegularizedOut,
}

impl PunchOrigin {
    /// Tie-break rank for punches sharing a timestamp: In < untagged < Out.
    pub fn tie_rank(self) -> u8 {
        match self {
            PunchOrigin::RegularizedIn => 0,
            PunchOrigin::Device => 1,
            PunchOrigin::RegularizedOut => 2,
        }
    }
}

/// A single clock event for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchEvent {
    /// The employee who punched.
    pub employee_id: String,
    /// When the punch happened.
    pub timestamp: NaiveDateTime,
    /// Device or regularized origin.
    pub origin: PunchOrigin,
}

impl PunchEvent {
    /// Creates a device punch.
    pub fn device(employee_id: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            employee_id: employee_id.into(),
            timestamp,
            origin: PunchOrigin::Device,
        }
    }

    /// The calendar day the punch belongs to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}
