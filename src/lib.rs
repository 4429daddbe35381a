//! Attendance Reconciliation Engine
//!
//! This crate computes one authoritative attendance status per employee and
//! calendar day from raw punches, approved exceptions, leave grants and shift
//! policy, and maintains the monthly penalty counts and leave/comp-off balances
//! that payroll consumes.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod models;
pub mod processing;
pub mod store;
