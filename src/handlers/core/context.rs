//! Execution context for one command invocation.
//!
//! [`resolve_invocation`] splits raw message text into the matched prefix, the
//! command name and the raw argument tokens. A [`Context`] is then built for
//! the resolved command and handed to its handler.

use super::registry::Registry;
use super::traits::CommandDescriptor;
use crate::args::ArgParser;
use crate::config::Config;
use crate::error::{CommandError, CommandResult};
use crate::platform::{Message, Platform, Prefixes, Scope, SentMessage, Snowflake};
use parking_lot::Mutex;
use std::sync::Arc;

/// Result of prefix matching and tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The matched prefix including trailing whitespace. Empty for bare
    /// private-scope invocations.
    pub prefix: String,
    /// Empty when the text was only a prefix.
    pub command_name: String,
    pub raw_args: Vec<String>,
    /// The prefix was a mention of the bot.
    pub mentioned: bool,
}

/// Mention forms that address the bot.
pub fn mention_prefixes(bot_id: Snowflake) -> [String; 2] {
    [format!("<@{bot_id}>"), format!("<@!{bot_id}>")]
}

/// Match `content` against the candidates in order: mentions of `bot_id`,
/// then `prefixes.all`. First match wins. Private scope accepts text without
/// any prefix.
///
/// Returns `None` when the text is not addressed to the bot.
pub fn resolve_invocation(
    content: &str,
    prefixes: &Prefixes,
    bot_id: Option<Snowflake>,
    scope: &Scope,
) -> Option<Invocation> {
    let mentions = bot_id.map(mention_prefixes);
    let mention_hit = mentions
        .iter()
        .flatten()
        .find(|m| content.starts_with(m.as_str()));

    let (matched, mentioned) = match mention_hit {
        Some(m) => (Some(m.as_str()), true),
        None => (
            prefixes
                .all
                .iter()
                .find(|p| !p.is_empty() && content.starts_with(p.as_str()))
                .map(String::as_str),
            false,
        ),
    };

    let matched = match matched {
        Some(p) => p,
        None if !scope.is_guild() => "",
        None => return None,
    };

    let rest = &content[matched.len()..];
    let trimmed = rest.trim_start();
    let prefix = content[..content.len() - trimmed.len()].to_string();

    let mut tokens = trimmed.split_whitespace().map(str::to_string);
    let command_name = tokens.next().unwrap_or_default();
    if command_name.is_empty() && !mentioned {
        return None;
    }

    Some(Invocation {
        prefix,
        command_name,
        raw_args: tokens.collect(),
        mentioned,
    })
}

/// Per-invocation state handed to command handlers.
pub struct Context {
    pub message: Message,
    pub scope: Scope,
    /// The prefix this command was invoked with.
    pub prefix: String,
    /// All prefixes valid for this message.
    pub prefixes: Prefixes,
    /// The name or alias the user typed.
    pub command_name: String,
    /// Raw unparsed tokens after the command name.
    pub raw_args: Vec<String>,
    pub platform: Platform,
    pub registry: Arc<Registry>,
    pub config: Arc<Config>,
    pub parser: ArgParser,
    last_reply: Mutex<Option<SentMessage>>,
}

impl Context {
    pub fn new(
        message: Message,
        invocation: Invocation,
        prefixes: Prefixes,
        platform: Platform,
        registry: Arc<Registry>,
        config: Arc<Config>,
        parser: ArgParser,
    ) -> Self {
        Self {
            scope: message.scope(),
            message,
            prefix: invocation.prefix,
            prefixes,
            command_name: invocation.command_name,
            raw_args: invocation.raw_args,
            platform,
            registry,
            config,
            parser,
            last_reply: Mutex::new(None),
        }
    }

    #[inline]
    pub fn is_guild(&self) -> bool {
        self.scope.is_guild()
    }

    #[inline]
    pub fn author_id(&self) -> Snowflake {
        self.message.author.id
    }

    pub fn is_owner(&self) -> bool {
        self.platform.owners.is_owner(self.message.author.id)
    }

    /// Send a reply and remember it for [`Context::edit`].
    pub async fn reply(&self, content: impl AsRef<str>) -> Result<SentMessage, CommandError> {
        let sent = self
            .platform
            .replies
            .reply(&self.message, content.as_ref())
            .await?;
        *self.last_reply.lock() = Some(sent.clone());
        Ok(sent)
    }

    /// Edit the last reply, or send a new one if nothing was sent yet.
    pub async fn edit(&self, content: impl AsRef<str>) -> Result<SentMessage, CommandError> {
        let previous = self.last_reply.lock().clone();
        let Some(previous) = previous else {
            return self.reply(content).await;
        };
        let sent = self
            .platform
            .replies
            .edit(&previous, content.as_ref())
            .await?;
        *self.last_reply.lock() = Some(sent.clone());
        Ok(sent)
    }

    pub fn last_reply(&self) -> Option<SentMessage> {
        self.last_reply.lock().clone()
    }

    /// Parse this context's raw arguments against `command` and run it.
    /// Errors propagate to the caller unchanged.
    pub async fn execute(&self, command: &CommandDescriptor) -> CommandResult {
        let args = self
            .parser
            .parse(
                &command.args,
                &self.raw_args,
                self.platform.resolver.as_ref(),
                &self.scope,
            )
            .await?;
        command.handler.handle(self, &args).await
    }
}
