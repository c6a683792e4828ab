//! Configuration module for befake.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Default locations for the session file and downloads
//! - Configuration, credential and template validation

pub mod loader;
pub mod validation;

pub use loader::{ApiConfig, Config, OptionsConfig, SessionConfig};
pub use validation::{
    validate_config, validate_friends_templates, validate_otp_code, validate_phone_number,
    validate_templates,
};
