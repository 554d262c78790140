//! Core configuration types and loading.

use crate::platform::{Capability, Snowflake};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bot identity and owners.
    #[serde(default)]
    pub bot: BotConfig,
    /// Command registry rules.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Dispatch and argument resolution.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Operator error reporting.
    #[serde(default)]
    pub reporting: ReportingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Display name used in greetings.
    #[serde(default = "default_name")]
    pub name: String,
    /// Prefix used when no guild prefixes are stored.
    #[serde(default = "default_prefix")]
    pub default_prefix: String,
    /// The bot's own user id. Enables `<@id>` mention prefixes.
    #[serde(default)]
    pub user_id: Option<Snowflake>,
    /// Users allowed to run owner-only commands.
    #[serde(default)]
    pub owners: Vec<Snowflake>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            default_prefix: default_prefix(),
            user_id: None,
            owners: Vec::new(),
        }
    }
}

fn default_name() -> String {
    "glyphbot".to_string()
}

fn default_prefix() -> String {
    "!".to_string()
}

/// Registry rules applied when commands are registered.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Categories whose commands must all be owner-only.
    #[serde(default = "default_reserved_categories")]
    pub reserved_categories: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reserved_categories: default_reserved_categories(),
        }
    }
}

fn default_reserved_categories() -> Vec<String> {
    vec!["owner".to_string()]
}

/// Dispatch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Upper bound for one entity lookup during argument parsing.
    #[serde(default = "default_resolve_timeout_ms")]
    pub resolve_timeout_ms: u64,
    /// Capabilities the bot needs in a guild channel before it answers at all.
    #[serde(default = "default_baseline_permissions")]
    pub baseline_permissions: Vec<Capability>,
}

impl DispatchConfig {
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: default_resolve_timeout_ms(),
            baseline_permissions: default_baseline_permissions(),
        }
    }
}

fn default_resolve_timeout_ms() -> u64 {
    3000
}

fn default_baseline_permissions() -> Vec<Capability> {
    vec![Capability::ViewChannel, Capability::SendMessages]
}

/// When unclassified faults may be forwarded to the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentPolicy {
    /// Forward without asking.
    Always,
    /// Ask the invoking user first.
    #[default]
    Ask,
    /// Never forward.
    Never,
}

/// Operator error reporting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub consent: ConsentPolicy,
    /// How long a consent prompt waits for an answer.
    #[serde(default = "default_consent_timeout_secs")]
    pub consent_timeout_secs: u64,
    /// Environment variables whose values are scrubbed from reports.
    #[serde(default = "default_redact_env")]
    pub redact_env: Vec<String>,
}

impl ReportingConfig {
    pub fn consent_timeout(&self) -> Duration {
        Duration::from_secs(self.consent_timeout_secs)
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            consent: ConsentPolicy::default(),
            consent_timeout_secs: default_consent_timeout_secs(),
            redact_env: default_redact_env(),
        }
    }
}

pub(super) fn default_true() -> bool {
    true
}

fn default_consent_timeout_secs() -> u64 {
    30
}

fn default_redact_env() -> Vec<String> {
    vec!["BOT_TOKEN".to_string()]
}
