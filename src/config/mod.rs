//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, BotConfig, DispatchConfig, ReportingConfig)
//! - [`validation`]: Startup checks that collect every problem at once

mod types;
mod validation;

pub use types::{
    BotConfig, Config, ConfigError, ConsentPolicy, DispatchConfig, RegistryConfig,
    ReportingConfig,
};
pub use validation::{MAX_PREFIX_LEN, ValidationError, validate};
