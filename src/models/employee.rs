//! Employee model.
//!
//! Employees are read-only to the engine: it only consults their shift
//! assignment, weekly-off day and probation end date.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Represents an employee whose attendance is reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// The assigned shift, if any. Without one, late/early rules are skipped.
    #[serde(default)]
    pub shift_id: Option<String>,
    /// The employee's weekly-off day (e.g. "Sunday").
    #[serde(default)]
    pub weekly_off: Option<Weekday>,
    /// The first day after probation. Days before it are probation days.
    #[serde(default)]
    pub probation_end: Option<NaiveDate>,
}

impl Employee {
    /// Returns true if the employee is still on probation on `date`.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Employee;
    /// use chrono::NaiveDate;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Asha".to_string(),
    ///     shift_id: None,
    ///     weekly_off: None,
    ///     probation_end: NaiveDate::from_ymd_opt(2026, 3, 1),
    /// };
    /// assert!(employee.is_on_probation(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()));
    /// assert!(!employee.is_on_probation(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
    /// ```
    pub fn is_on_probation(&self, date: NaiveDate) -> bool {
        self.probation_end.is_some_and(|end| date < end)
    }

    /// Returns true if `date` falls on the employee's weekly-off day.
    pub fn is_weekoff(&self, date: NaiveDate) -> bool {
        self.weekly_off == Some(date.weekday())
    }
}
