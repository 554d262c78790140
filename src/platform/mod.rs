//! Messaging platform contracts.
//!
//! The command core never talks to the network directly. It consumes the
//! traits in this module:
//! - [`EntityResolver`]: fetch channels, messages, users, roles and emotes by id
//! - [`ReplySink`]: send and edit replies, ask the user for consent
//! - [`CapabilityChecker`]: permission checks for the caller or the service account
//! - [`OwnerRegistry`]: who may run owner-only commands
//! - [`PrefixProvider`]: valid prefixes for one message
//! - [`SettingsStore`]: persisted per-user and per-guild prefixes
//! - [`ErrorReporter`]: operator-facing error channel
//! - [`EmoteManager`]: delete and rename guild emotes
//!
//! [`memory`] holds in-process implementations used by tests and the console
//! binary.

pub mod console;
pub mod memory;
mod types;

pub use types::{
    Actor, Capability, Channel, GuildEmote, Message, Prefixes, Role, Scope, SentMessage,
    Snowflake, User,
};

use crate::handlers::core::report::ErrorReport;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by platform collaborators.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("{0} not found")]
    NotFound(String),
}

/// Resolves raw ids to platform entities. `Ok(None)` means not found.
#[async_trait]
pub trait EntityResolver: Send + Sync {
    async fn channel(&self, id: Snowflake) -> Result<Option<Channel>, PlatformError>;

    async fn message(
        &self,
        channel_id: Snowflake,
        id: Snowflake,
    ) -> Result<Option<Message>, PlatformError>;

    async fn user(&self, id: Snowflake) -> Result<Option<User>, PlatformError>;

    async fn role(&self, guild_id: Snowflake, id: Snowflake)
    -> Result<Option<Role>, PlatformError>;

    async fn guild_emote(
        &self,
        guild_id: Snowflake,
        id: Snowflake,
    ) -> Result<Option<GuildEmote>, PlatformError>;
}

/// Outbound message channel.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Reply in the channel `to` was sent in.
    async fn reply(&self, to: &Message, content: &str) -> Result<SentMessage, PlatformError>;

    /// Replace the content of a message the bot sent earlier.
    async fn edit(&self, sent: &SentMessage, content: &str) -> Result<SentMessage, PlatformError>;

    /// Ask the author of `to` to approve an action. Sinks without an
    /// interactive surface decline.
    async fn request_consent(
        &self,
        _to: &Message,
        _prompt: &str,
        _timeout: Duration,
    ) -> Result<bool, PlatformError> {
        Ok(false)
    }
}

#[async_trait]
pub trait CapabilityChecker: Send + Sync {
    /// Returns the subset of `required` that `actor` lacks in `scope`.
    async fn missing_capabilities(
        &self,
        required: &[Capability],
        actor: Actor,
        scope: &Scope,
    ) -> Result<Vec<Capability>, PlatformError>;

    async fn has_capabilities(
        &self,
        required: &[Capability],
        actor: Actor,
        scope: &Scope,
    ) -> Result<bool, PlatformError> {
        Ok(self
            .missing_capabilities(required, actor, scope)
            .await?
            .is_empty())
    }
}

pub trait OwnerRegistry: Send + Sync {
    fn is_owner(&self, user_id: Snowflake) -> bool;
}

#[async_trait]
pub trait PrefixProvider: Send + Sync {
    async fn prefixes(&self, message: &Message) -> Result<Prefixes, PlatformError>;
}

/// Persisted prefix settings. `None` means nothing stored.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn user_prefixes(&self, user_id: Snowflake) -> Result<Option<Vec<String>>, PlatformError>;

    async fn set_user_prefixes(
        &self,
        user_id: Snowflake,
        prefixes: Vec<String>,
    ) -> Result<(), PlatformError>;

    async fn guild_prefixes(
        &self,
        guild_id: Snowflake,
    ) -> Result<Option<Vec<String>>, PlatformError>;

    async fn set_guild_prefixes(
        &self,
        guild_id: Snowflake,
        prefixes: Vec<String>,
    ) -> Result<(), PlatformError>;
}

/// Operator-facing error channel. Best-effort.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn post_error(&self, report: &ErrorReport) -> Result<(), PlatformError>;
}

/// Guild emote administration. Callers check `MANAGE_EMOJIS` first.
#[async_trait]
pub trait EmoteManager: Send + Sync {
    async fn delete_emote(&self, guild_id: Snowflake, id: Snowflake) -> Result<(), PlatformError>;

    /// Returns the emote as it reads after the rename.
    async fn rename_emote(
        &self,
        guild_id: Snowflake,
        id: Snowflake,
        name: &str,
    ) -> Result<GuildEmote, PlatformError>;
}

/// Prefix provider backed by a [`SettingsStore`].
///
/// Guild prefixes fall back to the configured default when nothing is stored,
/// in private scope as well.
pub struct StoredPrefixes {
    settings: Arc<dyn SettingsStore>,
    default_prefix: String,
}

impl StoredPrefixes {
    pub fn new(settings: Arc<dyn SettingsStore>, default_prefix: impl Into<String>) -> Self {
        Self {
            settings,
            default_prefix: default_prefix.into(),
        }
    }
}

#[async_trait]
impl PrefixProvider for StoredPrefixes {
    async fn prefixes(&self, message: &Message) -> Result<Prefixes, PlatformError> {
        let user = self
            .settings
            .user_prefixes(message.author.id)
            .await?
            .unwrap_or_default();

        let stored_guild = match message.guild_id {
            Some(guild_id) => self.settings.guild_prefixes(guild_id).await?,
            None => None,
        };
        let guild = match stored_guild {
            Some(list) if !list.is_empty() => list,
            _ => vec![self.default_prefix.clone()],
        };

        Ok(Prefixes::new(user, guild))
    }
}

/// Bundle of collaborator handles shared by every invocation.
#[derive(Clone)]
pub struct Platform {
    pub resolver: Arc<dyn EntityResolver>,
    pub replies: Arc<dyn ReplySink>,
    pub capabilities: Arc<dyn CapabilityChecker>,
    pub owners: Arc<dyn OwnerRegistry>,
    pub prefixes: Arc<dyn PrefixProvider>,
    pub settings: Arc<dyn SettingsStore>,
    pub reporter: Arc<dyn ErrorReporter>,
    pub emotes: Arc<dyn EmoteManager>,
}

#[cfg(test)]
mod tests {
    use super::memory::MemorySettings;
    use super::*;

    fn message(guild_id: Option<Snowflake>) -> Message {
        Message {
            id: 1,
            channel_id: 2,
            guild_id,
            author: User::new(7, "alice"),
            content: String::new(),
        }
    }

    #[tokio::test]
    async fn test_stored_prefixes_fall_back_to_default() {
        let settings = Arc::new(MemorySettings::new());
        let provider = StoredPrefixes::new(settings.clone(), "!");

        let p = provider.prefixes(&message(Some(9))).await.unwrap();
        assert_eq!(p.all, vec!["!"]);

        settings
            .set_user_prefixes(7, vec!["?".into()])
            .await
            .unwrap();
        settings
            .set_guild_prefixes(9, vec!["e!".into()])
            .await
            .unwrap();
        let p = provider.prefixes(&message(Some(9))).await.unwrap();
        assert_eq!(p.all, vec!["?", "e!"]);
        assert_eq!(p.user, vec!["?"]);
        assert_eq!(p.guild, vec!["e!"]);

        let p = provider.prefixes(&message(None)).await.unwrap();
        assert_eq!(p.all, vec!["?", "!"]);
    }

    #[tokio::test]
    async fn test_empty_guild_list_uses_default() {
        let settings = Arc::new(MemorySettings::new());
        settings.set_guild_prefixes(9, Vec::new()).await.unwrap();
        let provider = StoredPrefixes::new(settings, "!");
        let p = provider.prefixes(&message(Some(9))).await.unwrap();
        assert_eq!(p.guild, vec!["!"]);
    }
}
