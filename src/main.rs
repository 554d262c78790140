//! glyphbot console runner.
//!
//! Reads lines from stdin and dispatches each one as a private message from
//! the first configured owner. Replies are printed to stdout.

use glyphbot::config::{self, Config};
use glyphbot::handlers::core::report::{LogReporter, install_panic_hook};
use glyphbot::handlers::{Dispatcher, Registry, builtin_source};
use glyphbot::platform::console::ConsoleReplies;
use glyphbot::platform::memory::{MemoryCapabilities, MemoryResolver, MemorySettings, StaticOwners};
use glyphbot::platform::{Message, Platform, StoredPrefixes, User};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Private channel used for console input.
const CONSOLE_CHANNEL: u64 = 1;

/// Author id used when no owner is configured.
const CONSOLE_USER: u64 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "glyphbot.toml".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %config_path, error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "configuration has {} error(s), see log above",
            errors.len()
        ));
    }

    info!(
        name = %config.bot.name,
        prefix = %config.bot.default_prefix,
        owners = config.bot.owners.len(),
        "Starting glyphbot"
    );

    glyphbot::metrics::init();

    let settings = Arc::new(MemorySettings::new());
    let reporter = Arc::new(LogReporter);
    let resolver = Arc::new(MemoryResolver::new());
    let platform = Platform {
        resolver: resolver.clone(),
        replies: Arc::new(ConsoleReplies::new()),
        capabilities: Arc::new(MemoryCapabilities::new()),
        owners: Arc::new(StaticOwners::new(config.bot.owners.iter().copied())),
        prefixes: Arc::new(StoredPrefixes::new(
            settings.clone(),
            config.bot.default_prefix.clone(),
        )),
        settings,
        reporter: reporter.clone(),
        emotes: resolver,
    };

    let registry = Arc::new(Registry::with_source(
        &config.registry,
        Arc::new(builtin_source()),
    ));
    let count = registry.register_all()?;

    let author = User::new(
        config.bot.owners.first().copied().unwrap_or(CONSOLE_USER),
        "console",
    );
    let config = Arc::new(config);
    let dispatcher = Dispatcher::new(registry, platform, config);
    install_panic_hook(reporter, dispatcher.redactor().clone());

    info!(commands = count, "Ready, reading commands from stdin");

    let next_id = AtomicU64::new(1);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let message = Message {
            id: next_id.fetch_add(1, Ordering::Relaxed),
            channel_id: CONSOLE_CHANNEL,
            guild_id: None,
            author: author.clone(),
            content: line,
        };
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            let outcome = dispatcher.dispatch(message).await;
            tracing::debug!(outcome = outcome.as_str(), "Dispatch finished");
        });
    }

    info!("stdin closed, shutting down");
    Ok(())
}
