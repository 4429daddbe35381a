//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading attendance
//! policy from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveType, Shift};

use super::types::{AttendanceConfig, EnginePolicy, LeaveTypesConfig, ShiftsConfig};

/// Loads and provides access to attendance policy.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policy.yaml        # Engine-wide policy (comp-off code, validity)
/// ├── shifts.yaml        # Shift catalogue
/// └── leave_types.yaml   # Leave type catalogue
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let shift = loader.get_shift("GEN").unwrap();
/// println!("General shift starts at {}", shift.start_time);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AttendanceConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing or contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<EnginePolicy>(&path.join("policy.yaml"))?;
        let shifts = Self::load_yaml::<ShiftsConfig>(&path.join("shifts.yaml"))?;
        let leave_types = Self::load_yaml::<LeaveTypesConfig>(&path.join("leave_types.yaml"))?;

        tracing::debug!(
            path = %path.display(),
            shifts = shifts.shifts.len(),
            leave_types = leave_types.leave_types.len(),
            "Loaded attendance policy"
        );

        let config = AttendanceConfig::new(policy, shifts.shifts, leave_types.leave_types);
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying attendance configuration.
    pub fn config(&self) -> &AttendanceConfig {
        &self.config
    }

    /// Returns the engine-wide policy.
    pub fn policy(&self) -> &EnginePolicy {
        self.config.policy()
    }

    /// Gets a shift by its id.
    pub fn get_shift(&self, id: &str) -> EngineResult<&Shift> {
        self.config
            .shifts()
            .get(id)
            .ok_or_else(|| EngineError::ShiftNotFound {
                shift_id: id.to_string(),
            })
    }

    /// Gets a leave type by its code.
    pub fn get_leave_type(&self, code: &str) -> EngineResult<&LeaveType> {
        self.config
            .leave_types()
            .get(code)
            .ok_or_else(|| EngineError::LeaveTypeNotFound {
                code: code.to_string(),
            })
    }
}
