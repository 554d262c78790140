//! Command handler trait and the immutable command descriptor.
//!
//! A descriptor is built once by a discovery source, validated by the
//! [`Registry`](super::Registry) and then shared as `Arc<CommandDescriptor>`.
//! In-flight invocations keep the descriptor they resolved even across a
//! registry reload.

use super::context::Context;
use crate::args::{ArgSpec, ArgumentDef, ParsedArgs};
use crate::error::CommandResult;
use crate::platform::Capability;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Business logic of one command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &Context, args: &ParsedArgs) -> CommandResult;
}

/// Registered definition of a command.
#[derive(Clone)]
pub struct CommandDescriptor {
    /// Canonical lowercase name.
    pub name: String,
    pub aliases: Vec<String>,
    /// Set by discovery from the command's group.
    pub category: String,
    pub description: String,
    pub args: ArgSpec,
    pub owner_only: bool,
    pub guild_only: bool,
    /// Capabilities the caller needs.
    pub user_permissions: Vec<Capability>,
    /// Capabilities the bot's service account needs.
    pub client_permissions: Vec<Capability>,
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.into().to_lowercase(),
            aliases: Vec::new(),
            category: String::new(),
            description: String::new(),
            args: ArgSpec::new(),
            owner_only: false,
            guild_only: false,
            user_permissions: Vec::new(),
            client_permissions: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases
            .into_iter()
            .map(|a| a.into().to_lowercase())
            .collect();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into().to_lowercase();
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append one positional argument.
    pub fn arg(mut self, def: impl Into<ArgumentDef>) -> Self {
        self.args = self.args.arg(def);
        self
    }

    pub fn flag(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.args = self.args.flag(name, description);
        self
    }

    pub fn owner_only(mut self) -> Self {
        self.owner_only = true;
        self
    }

    pub fn guild_only(mut self) -> Self {
        self.guild_only = true;
        self
    }

    pub fn user_permissions(mut self, caps: impl IntoIterator<Item = Capability>) -> Self {
        self.user_permissions = caps.into_iter().collect();
        self
    }

    pub fn client_permissions(mut self, caps: impl IntoIterator<Item = Capability>) -> Self {
        self.client_permissions = caps.into_iter().collect();
        self
    }

    /// Name followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Case-insensitive exact match against the name or any alias.
    pub fn answers_to(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.names().any(|n| n == name)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("category", &self.category)
            .field("owner_only", &self.owner_only)
            .field("guild_only", &self.guild_only)
            .finish_non_exhaustive()
    }
}
