//! Core data models for the attendance engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod comp_off;
mod employee;
mod exception;
mod holiday;
mod leave;
mod punch;
mod shift;
mod ticket;

pub use attendance::{AttendanceStatus, DailyAttendanceRecord};
pub use comp_off::{CompOffRequest, CompOffStatus};
pub use employee::Employee;
pub use exception::{
    ApprovalStatus, LeaveApplication, LeaveDayType, Regularization, RegularizationKind,
};
pub use holiday::{Holiday, HolidayScope};
pub use leave::{LEAVE_YEAR_START_MONTH, LeaveAllocation, LeaveType, LeaveYear};
pub use punch::{PunchEvent, PunchOrigin};
pub use shift::{LunchWindow, Shift, elapsed_minutes};
pub use ticket::{ApplicationSequence, Ticket, month_abbreviation};
