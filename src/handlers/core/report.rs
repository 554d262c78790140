//! Operator error reports.
//!
//! Unclassified faults are turned into an [`ErrorReport`], scrubbed by a
//! [`Redactor`] and posted to the configured [`ErrorReporter`]. A process
//! panic hook forwards panics that happen outside any dispatch.

use super::context::Context;
use crate::platform::{ErrorReporter, PlatformError, Snowflake};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::any::Any;
use std::sync::{Arc, OnceLock};
use tracing::{error, warn};
use uuid::Uuid;

/// Maximum length of the error text in a report.
pub const MAX_REPORT_CHARS: usize = 2000;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"[MNO][A-Za-z\d_-]{23,27}\.[A-Za-z\d_-]{6}\.[A-Za-z\d_-]{27,40}")
            .expect("token pattern is valid")
    })
}

tokio::task_local! {
    /// Set while a command handler runs, so the panic hook leaves those
    /// panics to the dispatcher.
    static IN_DISPATCH: ();
}

/// Run `fut` marked as dispatch-owned.
pub(crate) async fn dispatch_scope<F: std::future::Future>(fut: F) -> F::Output {
    IN_DISPATCH.scope((), fut).await
}

fn in_dispatch() -> bool {
    IN_DISPATCH.try_with(|_| ()).is_ok()
}

/// Shorten to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Replaces secret values and token-shaped strings.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    /// `(label, value)` pairs.
    secrets: Vec<(String, String)>,
}

impl Redactor {
    pub fn new<I, L, V>(secrets: I) -> Self
    where
        I: IntoIterator<Item = (L, V)>,
        L: Into<String>,
        V: Into<String>,
    {
        let mut secrets: Vec<(String, String)> = secrets
            .into_iter()
            .map(|(l, v)| (l.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        // Longest first so overlapping secrets are fully replaced.
        secrets.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        Self { secrets }
    }

    /// Read the named environment variables once. Unset names are skipped.
    pub fn from_env(names: &[String]) -> Self {
        Self::new(
            names
                .iter()
                .filter_map(|name| std::env::var(name).ok().map(|v| (name.clone(), v))),
        )
    }

    pub fn redact(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (label, value) in &self.secrets {
            out = out.replace(value.as_str(), &format!("[{label}]"));
        }
        token_regex().replace_all(&out, "[TOKEN]").into_owned()
    }
}

/// Diagnostic detail for one unclassified fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Correlates the log line with the operator-facing post.
    pub id: Uuid,
    pub command: Option<String>,
    /// `name (id)` of the caller.
    pub user: Option<String>,
    pub guild_id: Option<Snowflake>,
    pub channel_id: Option<Snowflake>,
    pub message_id: Option<Snowflake>,
    /// Raw arguments joined by spaces, or `-`.
    pub arguments: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorReport {
    /// Report for a fault inside a command invocation.
    pub fn from_context(ctx: &Context, error: &str, redactor: &Redactor) -> Self {
        let arguments = if ctx.raw_args.is_empty() {
            "-".to_string()
        } else {
            ctx.raw_args.join(" ")
        };
        Self {
            id: Uuid::new_v4(),
            command: Some(ctx.command_name.clone()),
            user: Some(ctx.message.author.tag()),
            guild_id: ctx.scope.guild_id(),
            channel_id: Some(ctx.scope.channel_id()),
            message_id: Some(ctx.message.id),
            arguments: redactor.redact(&arguments),
            error: truncate(&redactor.redact(error), MAX_REPORT_CHARS),
            timestamp: Utc::now(),
        }
    }

    /// Report for a fault with no invocation attached.
    pub fn detached(error: &str, redactor: &Redactor) -> Self {
        Self {
            id: Uuid::new_v4(),
            command: None,
            user: None,
            guild_id: None,
            channel_id: None,
            message_id: None,
            arguments: "-".to_string(),
            error: truncate(&redactor.redact(error), MAX_REPORT_CHARS),
            timestamp: Utc::now(),
        }
    }
}

/// Reporter that writes reports to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

#[async_trait]
impl ErrorReporter for LogReporter {
    async fn post_error(&self, report: &ErrorReport) -> Result<(), PlatformError> {
        error!(
            report = %report.id,
            command = report.command.as_deref().unwrap_or("-"),
            user = report.user.as_deref().unwrap_or("-"),
            guild = ?report.guild_id,
            channel = ?report.channel_id,
            message = ?report.message_id,
            arguments = %report.arguments,
            at = %report.timestamp.to_rfc3339(),
            "Error report: {}",
            report.error
        );
        Ok(())
    }
}

/// Post `report`, logging instead of failing.
pub async fn post_best_effort(reporter: &dyn ErrorReporter, report: &ErrorReport) {
    if let Err(e) = reporter.post_error(report).await {
        warn!(error = %e, "Failed to post error report");
    }
}

/// Forward panics raised outside of command dispatch to `reporter`.
///
/// Chains the previously installed hook. Must be called from within a Tokio
/// runtime for reports to be delivered.
pub fn install_panic_hook(reporter: Arc<dyn ErrorReporter>, redactor: Arc<Redactor>) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if in_dispatch() {
            return;
        }
        previous(info);

        let location = info
            .location()
            .map(|l| format!(" at {}:{}", l.file(), l.line()))
            .unwrap_or_default();
        let text = format!("panic{location}: {}", panic_message(info.payload()));
        let report = ErrorReport::detached(&text, &redactor);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let reporter = reporter.clone();
                handle.spawn(async move {
                    post_best_effort(reporter.as_ref(), &report).await;
                });
            }
            Err(_) => error!(error = %report.error, "Panic outside runtime"),
        }
    }));
}
