//! Configuration module.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Configuration validation
//! - Record id parsing for CLI input

pub mod loader;
pub mod validation;

pub use loader::{AccountConfig, Config, OptionsConfig, SessionConfig};
pub use validation::{parse_record_id, validate_config};
