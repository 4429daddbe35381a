//! Error types for the attendance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while reconciling attendance.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the attendance engine.
///
/// Balance and allocation violations are always raised before any ledger
/// write, so a caller receiving one of them can assume nothing was applied.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No employee with the given id is known to the store.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The employee id that was not found.
        employee_id: String,
    },

    /// An employee references a shift that is not in the shift catalogue.
    #[error("Shift not found: {shift_id}")]
    ShiftNotFound {
        /// The shift id that was not found.
        shift_id: String,
    },

    /// A leave type code is not in the leave type catalogue.
    #[error("Leave type not found: {code}")]
    LeaveTypeNotFound {
        /// The leave type code that was not found.
        code: String,
    },

    /// A paid leave or comp-off was requested with no allocation for the leave year.
    #[error("No '{leave_type}' allocation for employee '{employee_id}' in leave year {leave_year}")]
    AllocationNotFound {
        /// The employee the allocation was looked up for.
        employee_id: String,
        /// The leave type code.
        leave_type: String,
        /// The leave year (named by its starting year).
        leave_year: i32,
    },

    /// The remaining balance cannot cover the requested days.
    #[error(
        "Insufficient '{leave_type}' balance for employee '{employee_id}': available {available}, requested {requested}"
    )]
    InsufficientBalance {
        /// The employee whose balance was checked.
        employee_id: String,
        /// The leave type code.
        leave_type: String,
        /// Days available at the time of the check.
        available: Decimal,
        /// Days requested.
        requested: Decimal,
    },

    /// A ticket string did not match the `<MON> <N>` format.
    #[error("Invalid ticket: '{value}'")]
    InvalidTicket {
        /// The rejected ticket text.
        value: String,
    },

    /// No comp-off request with the given id exists.
    #[error("Comp-off request not found: {id}")]
    CompOffRequestNotFound {
        /// The request id.
        id: String,
    },

    /// A comp-off request was not in the state an operation requires.
    #[error("Comp-off request {id} is {status}, expected {expected}")]
    InvalidCompOffState {
        /// The request id.
        id: String,
        /// The current status.
        status: String,
        /// The status the operation requires.
        expected: String,
    },

    /// No leave application with the given id exists.
    #[error("Leave application not found: {id}")]
    LeaveApplicationNotFound {
        /// The application id.
        id: String,
    },

    /// A leave range ends before it starts.
    #[error("Invalid leave range: {start} to {end}")]
    InvalidLeaveRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },

    /// A leave range overlaps an approved leave of the same employee.
    #[error("Leave {start} to {end} overlaps an approved leave for employee '{employee_id}'")]
    OverlappingLeave {
        /// The employee requesting leave.
        employee_id: String,
        /// First day of the requested range.
        start: NaiveDate,
        /// Last day of the requested range.
        end: NaiveDate,
    },

    /// A leave type restricted to confirmed employees was requested during probation.
    #[error(
        "Leave type '{leave_type}' is not available to employee '{employee_id}' before probation ends on {probation_end}"
    )]
    LeaveNotAvailableOnProbation {
        /// The employee requesting leave.
        employee_id: String,
        /// The leave type code.
        leave_type: String,
        /// The day probation ends.
        probation_end: NaiveDate,
    },

    /// A comp-off request carries no credit to approve.
    #[error("Comp-off request {id} has invalid credit: {credit} days")]
    InvalidCompOffCredit {
        /// The request id.
        id: String,
        /// The credit on the request.
        credit: Decimal,
    },

    /// A leave range only contains holidays and weekoffs.
    #[error("Leave range {start} to {end} contains no working days")]
    NoWorkingDays {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_allocation_not_found_displays_year() {
        let error = EngineError::AllocationNotFound {
            employee_id: "emp_001".to_string(),
            leave_type: "PL".to_string(),
            leave_year: 2025,
        };
        assert_eq!(
            error.to_string(),
            "No 'PL' allocation for employee 'emp_001' in leave year 2025"
        );
    }

    #[test]
    fn test_insufficient_balance_displays_amounts() {
        let error = EngineError::InsufficientBalance {
            employee_id: "emp_001".to_string(),
            leave_type: "CO".to_string(),
            available: Decimal::from_str("0.5").unwrap(),
            requested: Decimal::ONE,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient 'CO' balance for employee 'emp_001': available 0.5, requested 1"
        );
    }

    #[test]
    fn test_invalid_leave_range_displays_dates() {
        let error = EngineError::InvalidLeaveRange {
            start: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid leave range: 2026-03-10 to 2026-03-09"
        );
    }

    #[test]
    fn test_invalid_comp_off_state_displays_statuses() {
        let error = EngineError::InvalidCompOffState {
            id: "abc".to_string(),
            status: "Draft".to_string(),
            expected: "Pending".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Comp-off request abc is Draft, expected Pending"
        );
    }

    #[test]
    fn test_overlapping_leave_displays_range() {
        let error = EngineError::OverlappingLeave {
            employee_id: "emp_001".to_string(),
            start: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Leave 2026-03-03 to 2026-03-04 overlaps an approved leave for employee 'emp_001'"
        );
    }

    #[test]
    fn test_probation_leave_displays_end_date() {
        let error = EngineError::LeaveNotAvailableOnProbation {
            employee_id: "emp_001".to_string(),
            leave_type: "PL".to_string(),
            probation_end: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Leave type 'PL' is not available to employee 'emp_001' before probation ends on 2026-06-30"
        );
    }

    #[test]
    fn test_invalid_comp_off_credit_displays_credit() {
        let error = EngineError::InvalidCompOffCredit {
            id: "abc".to_string(),
            credit: Decimal::ZERO,
        };
        assert_eq!(
            error.to_string(),
            "Comp-off request abc has invalid credit: 0 days"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_ticket_error() -> EngineResult<()> {
            Err(EngineError::InvalidTicket {
                value: "FEBRUARY".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_ticket_error()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
