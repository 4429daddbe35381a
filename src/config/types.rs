//! Configuration types for attendance policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::models::{LeaveType, Shift};

fn default_comp_off_code() -> String {
    "CO".to_string()
}

fn default_validity_days() -> i64 {
    90
}

fn default_full_day_minutes() -> i64 {
    480
}

fn default_half_day_minutes() -> i64 {
    240
}

/// Comp-off crediting policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompOffPolicy {
    /// Leave type code comp-off credits are booked under.
    #[serde(default = "default_comp_off_code")]
    pub leave_type_code: String,
    /// Days a credit stays usable after the worked date.
    #[serde(default = "default_validity_days")]
    pub validity_days: i64,
    /// Minutes that earn a full day when the employee has no shift.
    #[serde(default = "default_full_day_minutes")]
    pub default_full_day_minutes: i64,
    /// Minutes that earn a half day when the employee has no shift.
    #[serde(default = "default_half_day_minutes")]
    pub default_half_day_minutes: i64,
}

impl Default for CompOffPolicy {
    fn default() -> Self {
        Self {
            leave_type_code: default_comp_off_code(),
            validity_days: default_validity_days(),
            default_full_day_minutes: default_full_day_minutes(),
            default_half_day_minutes: default_half_day_minutes(),
        }
    }
}

/// Engine-wide policy from policy.yaml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnginePolicy {
    /// Organisation the policy belongs to.
    #[serde(default)]
    pub organisation: String,
    /// Comp-off crediting policy.
    #[serde(default)]
    pub comp_off: CompOffPolicy,
}

/// Shift catalogue file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftsConfig {
    /// All configured shifts.
    pub shifts: Vec<Shift>,
}

/// Leave type catalogue file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveTypesConfig {
    /// All configured leave types.
    pub leave_types: Vec<LeaveType>,
}

/// The complete attendance policy loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct AttendanceConfig {
    /// Engine-wide policy.
    policy: EnginePolicy,
    /// Shifts keyed by id.
    shifts: BTreeMap<String, Shift>,
    /// Leave types keyed by code.
    leave_types: BTreeMap<String, LeaveType>,
}

impl AttendanceConfig {
    /// Creates a new AttendanceConfig from its component parts.
    pub fn new(policy: EnginePolicy, shifts: Vec<Shift>, leave_types: Vec<LeaveType>) -> Self {
        Self {
            policy,
            shifts: shifts.into_iter().map(|s| (s.id.clone(), s)).collect(),
            leave_types: leave_types
                .into_iter()
                .map(|lt| (lt.code.clone(), lt))
                .collect(),
        }
    }

    /// Returns the engine-wide policy.
    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    /// Returns all shifts keyed by id.
    pub fn shifts(&self) -> &BTreeMap<String, Shift> {
        &self.shifts
    }

    /// Returns all leave types keyed by code.
    pub fn leave_types(&self) -> &BTreeMap<String, LeaveType> {
        &self.leave_types
    }
}
