//! Message dispatch.
//!
//! Turns one incoming [`Message`] into at most one command execution:
//! resolve the prefix and command name, look the command up, apply the owner
//! and permission gates, parse arguments and run the handler. Every failure is
//! recovered here and converted to a reply. Unclassified faults, including
//! handler panics, are additionally forwarded to the operator reporter.

use super::context::{Context, resolve_invocation};
use super::registry::Registry;
use super::report::{self, ErrorReport, Redactor};
use super::traits::CommandDescriptor;
use crate::args::ArgParser;
use crate::config::{Config, ConsentPolicy};
use crate::error::{CommandError, ErrorKind};
use crate::platform::{Actor, Capability, Message, Platform, Prefixes};
use crate::telemetry::{CommandTimer, spans};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{Instrument, debug, error, trace, warn};

/// Generic reply for unclassified faults.
pub const APOLOGY: &str = "I'm sorry, an error occurred while executing this command.";

/// Prompt sent when the consent policy is `ask`.
pub const CONSENT_PROMPT: &str =
    "Is it okay for me to automatically report this error to my owner?";

/// Terminal state of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Authored by a bot account.
    Ignored,
    /// No prefix matched.
    NotACommand,
    /// A bare mention of the bot was answered with a greeting.
    Greeted,
    UnknownCommand,
    /// Owner-only command invoked by a non-owner.
    Hidden,
    /// The service account lacks the baseline capabilities in this channel.
    Muted,
    /// Guild-only command invoked in private scope.
    GuildOnly,
    PermissionDenied,
    InvalidArguments,
    /// The handler rejected the request deliberately.
    Rejected,
    Completed,
    /// Unclassified fault or panic.
    Faulted,
}

impl Outcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::NotACommand => "not_a_command",
            Self::Greeted => "greeted",
            Self::UnknownCommand => "unknown_command",
            Self::Hidden => "hidden",
            Self::Muted => "muted",
            Self::GuildOnly => "guild_only",
            Self::PermissionDenied => "permission_denied",
            Self::InvalidArguments => "invalid_arguments",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Faulted => "faulted",
        }
    }

    /// Whether the dispatch ended without replying and without reporting.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::Ignored | Self::NotACommand | Self::UnknownCommand | Self::Hidden | Self::Muted
        )
    }
}

/// Routes messages to registered commands.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    platform: Platform,
    config: Arc<Config>,
    parser: ArgParser,
    redactor: Arc<Redactor>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, platform: Platform, config: Arc<Config>) -> Self {
        let parser = ArgParser::new(config.dispatch.resolve_timeout());
        let redactor = Arc::new(Redactor::from_env(&config.reporting.redact_env));
        Self {
            registry,
            platform,
            config,
            parser,
            redactor,
        }
    }

    pub fn with_redactor(mut self, redactor: Arc<Redactor>) -> Self {
        self.redactor = redactor;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn redactor(&self) -> &Arc<Redactor> {
        &self.redactor
    }

    /// Process one incoming message.
    pub async fn dispatch(&self, message: Message) -> Outcome {
        let outcome = self.run(message).await;
        crate::metrics::record_outcome(outcome.as_str());
        if outcome.is_silent() {
            trace!(outcome = outcome.as_str(), "Dispatch ended silently");
        } else {
            debug!(outcome = outcome.as_str(), "Dispatch finished");
        }
        outcome
    }

    async fn run(&self, message: Message) -> Outcome {
        if message.author.bot {
            return Outcome::Ignored;
        }
        let scope = message.scope();

        let prefixes = match self.platform.prefixes.prefixes(&message).await {
            Ok(prefixes) => prefixes,
            Err(e) => {
                warn!(error = %e, user = message.author.id, "Prefix lookup failed, using default");
                Prefixes::new(Vec::new(), vec![self.config.bot.default_prefix.clone()])
            }
        };

        let Some(invocation) =
            resolve_invocation(&message.content, &prefixes, self.config.bot.user_id, &scope)
        else {
            return Outcome::NotACommand;
        };

        if invocation.command_name.is_empty() {
            self.send(&message, &self.greeting(&message)).await;
            return Outcome::Greeted;
        }

        let Some(command) = self.registry.find(&invocation.command_name) else {
            debug!(command = %invocation.command_name, "Unknown command");
            return Outcome::UnknownCommand;
        };

        if command.owner_only && !self.platform.owners.is_owner(message.author.id) {
            debug!(command = %command.name, user = message.author.id, "Owner-only command hidden");
            return Outcome::Hidden;
        }

        let ctx = Context::new(
            message,
            invocation,
            prefixes,
            self.platform.clone(),
            self.registry.clone(),
            self.config.clone(),
            self.parser,
        );

        if ctx.is_guild() {
            match self.check_permissions(&ctx, &command).await {
                Ok(Some(outcome)) => return outcome,
                Ok(None) => {}
                Err(e) => return self.fail(&ctx, &command, e).await,
            }
        } else if command.guild_only {
            self.send(&ctx.message, "This command can only be used on a server.")
                .await;
            return Outcome::GuildOnly;
        }

        self.invoke(&ctx, &command).await
    }

    /// `Ok(Some(_))` stops dispatch, `Ok(None)` lets it continue.
    async fn check_permissions(
        &self,
        ctx: &Context,
        command: &CommandDescriptor,
    ) -> Result<Option<Outcome>, CommandError> {
        let checker = &self.platform.capabilities;

        let baseline = &self.config.dispatch.baseline_permissions;
        if !baseline.is_empty()
            && !checker
                .has_capabilities(baseline, Actor::Service, &ctx.scope)
                .await?
        {
            debug!(scope = %ctx.scope, "Missing baseline permissions, staying silent");
            return Ok(Some(Outcome::Muted));
        }

        let missing = self
            .missing(&command.client_permissions, Actor::Service, ctx)
            .await?;
        if !missing.is_empty() {
            return Err(CommandError::service_permission(missing));
        }

        let missing = self
            .missing(&command.user_permissions, Actor::Caller(ctx.author_id()), ctx)
            .await?;
        if !missing.is_empty() {
            return Err(CommandError::caller_permission(missing));
        }

        Ok(None)
    }

    async fn missing(
        &self,
        required: &[Capability],
        actor: Actor,
        ctx: &Context,
    ) -> Result<Vec<Capability>, CommandError> {
        if required.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .platform
            .capabilities
            .missing_capabilities(required, actor, &ctx.scope)
            .await?)
    }

    async fn invoke(&self, ctx: &Context, command: &Arc<CommandDescriptor>) -> Outcome {
        self.registry.record_use(&command.name);
        let span = spans::command(&command.name, &ctx.message, &ctx.scope);

        let result = async {
            let timer = CommandTimer::new(&command.name);
            let run = AssertUnwindSafe(ctx.execute(command)).catch_unwind();
            let result = match report::dispatch_scope(run).await {
                Ok(result) => result,
                Err(payload) => Err(CommandError::Internal(anyhow::anyhow!(
                    "handler panicked: {}",
                    report::panic_message(payload.as_ref())
                ))),
            };
            debug!(
                elapsed_ms = u64::try_from(timer.elapsed_ms()).unwrap_or(u64::MAX),
                ok = result.is_ok(),
                "Command returned"
            );
            result
        }
        .instrument(span)
        .await;

        match result {
            Ok(()) => Outcome::Completed,
            Err(e) => self.fail(ctx, command, e).await,
        }
    }

    /// Convert a failed invocation into its reply, and report it if
    /// unclassified.
    async fn fail(&self, ctx: &Context, command: &CommandDescriptor, err: CommandError) -> Outcome {
        crate::metrics::record_command_error(&command.name, err.error_code());

        match (err.kind(), err.user_message()) {
            (ErrorKind::Argument, Some(text)) => {
                debug!(command = %command.name, error = %text, "Invalid arguments");
                self.send(&ctx.message, &text).await;
                Outcome::InvalidArguments
            }
            (ErrorKind::Permission, Some(text)) => {
                debug!(command = %command.name, error = %text, "Permission denied");
                self.send(&ctx.message, &text).await;
                Outcome::PermissionDenied
            }
            (ErrorKind::Rejected, Some(text)) => {
                self.send(&ctx.message, &format!("❌ {text}")).await;
                Outcome::Rejected
            }
            _ => {
                let detail = match &err {
                    CommandError::Internal(inner) => format!("{inner:?}"),
                    other => other.to_string(),
                };
                error!(
                    command = %command.name,
                    user = ctx.author_id(),
                    scope = %ctx.scope,
                    error = %self.redactor.redact(&detail),
                    "Command failed"
                );
                self.send(&ctx.message, APOLOGY).await;
                if err.is_reportable() && self.consented(ctx).await {
                    let report = ErrorReport::from_context(ctx, &detail, &self.redactor);
                    report::post_best_effort(self.platform.reporter.as_ref(), &report).await;
                    crate::metrics::record_error_report();
                }
                Outcome::Faulted
            }
        }
    }

    async fn consented(&self, ctx: &Context) -> bool {
        let reporting = &self.config.reporting;
        if !reporting.enabled {
            return false;
        }
        match reporting.consent {
            ConsentPolicy::Always => true,
            ConsentPolicy::Never => false,
            ConsentPolicy::Ask => {
                let timeout = reporting.consent_timeout();
                let ask = self
                    .platform
                    .replies
                    .request_consent(&ctx.message, CONSENT_PROMPT, timeout);
                match tokio::time::timeout(timeout, ask).await {
                    Ok(Ok(answer)) => answer,
                    Ok(Err(e)) => {
                        warn!(error = %e, "Consent prompt failed");
                        false
                    }
                    Err(_) => false,
                }
            }
        }
    }

    fn greeting(&self, message: &Message) -> String {
        let name = &self.config.bot.name;
        format!(
            "Hello {}! I am {name}, an open source bot focused all around emotes\n\n\
             Run `@{name} prefixes` for a list of available prefixes or `@{name} help` for a list of commands!",
            message.author
        )
    }

    /// Best-effort reply used on the error path.
    async fn send(&self, to: &Message, content: &str) {
        if let Err(e) = self.platform.replies.reply(to, content).await {
            warn!(error = %e, channel = to.channel_id, "Failed to send reply");
        }
    }
}
