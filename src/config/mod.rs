//! Configuration loading and management for the attendance engine.
//!
//! This module loads attendance policy from a directory of YAML files:
//! engine-wide comp-off policy, the shift catalogue and the leave type
//! catalogue.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded policy for: {}", config.policy().organisation);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AttendanceConfig, CompOffPolicy, EnginePolicy, LeaveTypesConfig, ShiftsConfig};
