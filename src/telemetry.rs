//! Telemetry utilities for command timing and dispatch spans.

use std::time::Instant;

/// Guard for timing command execution and recording metrics.
///
/// Records command latency when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(&self.command, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use crate::platform::{Message, Scope};
    use tracing::{Span, debug_span};

    /// Span for one command execution.
    pub fn command(name: &str, message: &Message, scope: &Scope) -> Span {
        debug_span!(
            "bot.command",
            command = %name,
            user = message.author.id,
            scope = %scope,
            message = message.id,
        )
    }
}
