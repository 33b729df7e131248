//! Configuration module.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - CLI argument merging
//! - Configuration validation and profile input parsing

pub mod loader;
pub mod validation;

pub use loader::{ClientConfig, Config, OptionsConfig, ProfileConfig};
pub use validation::{parse_profile_input, validate_config, validate_username};
