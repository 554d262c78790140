//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::collections::HashSet;
use thiserror::Error;

/// Longest prefix that fits the persisted prefix column.
pub const MAX_PREFIX_LEN: usize = 20;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("bot.default_prefix must not be empty")]
    EmptyPrefix,
    #[error("bot.default_prefix must be at most {MAX_PREFIX_LEN} characters, got {0}")]
    PrefixTooLong(usize),
    #[error("dispatch.resolve_timeout_ms must be greater than zero")]
    ZeroResolveTimeout,
    #[error("registry.reserved_categories entry '{0}' must be lowercase")]
    ReservedCategoryCase(String),
    #[error("bot.owners lists {0} more than once")]
    DuplicateOwner(u64),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = &config.bot.default_prefix;
    if prefix.trim().is_empty() {
        errors.push(ValidationError::EmptyPrefix);
    }
    let len = prefix.chars().count();
    if len > MAX_PREFIX_LEN {
        errors.push(ValidationError::PrefixTooLong(len));
    }

    if config.dispatch.resolve_timeout_ms == 0 {
        errors.push(ValidationError::ZeroResolveTimeout);
    }

    for category in &config.registry.reserved_categories {
        if *category != category.to_lowercase() {
            errors.push(ValidationError::ReservedCategoryCase(category.clone()));
        }
    }

    let mut seen = HashSet::new();
    for owner in &config.bot.owners {
        if !seen.insert(*owner) {
            errors.push(ValidationError::DuplicateOwner(*owner));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
