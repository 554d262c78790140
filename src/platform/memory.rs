//! In-memory platform implementations.
//!
//! Backed by `DashMap` so tests and the console binary can share one instance
//! across concurrently running invocations.

use super::{
    Actor, Capability, CapabilityChecker, Channel, EmoteManager, EntityResolver, ErrorReporter,
    GuildEmote, Message, OwnerRegistry, PlatformError, ReplySink, Role, Scope, SentMessage, SettingsStore,
    Snowflake, User,
};
use crate::handlers::core::report::ErrorReport;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

// ============================================================================
// Entity resolution
// ============================================================================

/// Entity store with an optional artificial lookup delay. Also manages the
/// emotes it holds.
#[derive(Default)]
pub struct MemoryResolver {
    channels: DashMap<Snowflake, Channel>,
    messages: DashMap<(Snowflake, Snowflake), Message>,
    users: DashMap<Snowflake, User>,
    roles: DashMap<(Snowflake, Snowflake), Role>,
    emotes: DashMap<Snowflake, Vec<GuildEmote>>,
    delay: Mutex<Option<Duration>>,
    locked: AtomicBool,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every lookup sleeps for `delay` before answering.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }

    pub fn insert_channel(&self, channel: Channel) {
        self.channels.insert(channel.id, channel);
    }

    pub fn insert_message(&self, message: Message) {
        self.messages
            .insert((message.channel_id, message.id), message);
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn insert_role(&self, role: Role) {
        self.roles.insert((role.guild_id, role.id), role);
    }

    pub fn insert_emote(&self, emote: GuildEmote) {
        self.emotes.entry(emote.guild_id).or_default().push(emote);
    }

    /// While locked, emote deletes and renames fail.
    pub fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::Relaxed);
    }

    /// Emotes of `guild_id` in insertion order.
    pub fn guild_emotes(&self, guild_id: Snowflake) -> Vec<GuildEmote> {
        self.emotes
            .get(&guild_id)
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    fn check_writable(&self) -> Result<(), PlatformError> {
        if self.locked.load(Ordering::Relaxed) {
            return Err(PlatformError::Transport("emote store is read-only".into()));
        }
        Ok(())
    }

    async fn pause(&self) {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl EntityResolver for MemoryResolver {
    async fn channel(&self, id: Snowflake) -> Result<Option<Channel>, PlatformError> {
        self.pause().await;
        Ok(self.channels.get(&id).map(|c| c.clone()))
    }

    async fn message(
        &self,
        channel_id: Snowflake,
        id: Snowflake,
    ) -> Result<Option<Message>, PlatformError> {
        self.pause().await;
        Ok(self.messages.get(&(channel_id, id)).map(|m| m.clone()))
    }

    async fn user(&self, id: Snowflake) -> Result<Option<User>, PlatformError> {
        self.pause().await;
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn role(
        &self,
        guild_id: Snowflake,
        id: Snowflake,
    ) -> Result<Option<Role>, PlatformError> {
        self.pause().await;
        Ok(self.roles.get(&(guild_id, id)).map(|r| r.clone()))
    }

    async fn guild_emote(
        &self,
        guild_id: Snowflake,
        id: Snowflake,
    ) -> Result<Option<GuildEmote>, PlatformError> {
        self.pause().await;
        Ok(self
            .emotes
            .get(&guild_id)
            .and_then(|list| list.iter().find(|e| e.id == id).cloned()))
    }
}

#[async_trait]
impl EmoteManager for MemoryResolver {
    async fn delete_emote(&self, guild_id: Snowflake, id: Snowflake) -> Result<(), PlatformError> {
        self.pause().await;
        self.check_writable()?;
        let mut list = self
            .emotes
            .get_mut(&guild_id)
            .ok_or_else(|| PlatformError::NotFound(format!("emote {id}")))?;
        let before = list.len();
        list.retain(|e| e.id != id);
        if list.len() == before {
            return Err(PlatformError::NotFound(format!("emote {id}")));
        }
        Ok(())
    }

    async fn rename_emote(
        &self,
        guild_id: Snowflake,
        id: Snowflake,
        name: &str,
    ) -> Result<GuildEmote, PlatformError> {
        self.pause().await;
        self.check_writable()?;
        let mut list = self
            .emotes
            .get_mut(&guild_id)
            .ok_or_else(|| PlatformError::NotFound(format!("emote {id}")))?;
        let emote = list
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| PlatformError::NotFound(format!("emote {id}")))?;
        emote.name = name.to_string();
        Ok(emote.clone())
    }
}

// ============================================================================
// Permissions and owners
// ============================================================================

/// Capability grants per (actor, guild). Private scope grants everything.
#[derive(Default)]
pub struct MemoryCapabilities {
    grants: DashMap<(Option<Snowflake>, Snowflake), HashSet<Capability>>,
}

impl MemoryCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(actor: Actor, guild_id: Snowflake) -> (Option<Snowflake>, Snowflake) {
        match actor {
            Actor::Caller(id) => (Some(id), guild_id),
            Actor::Service => (None, guild_id),
        }
    }

    pub fn grant(&self, actor: Actor, guild_id: Snowflake, caps: &[Capability]) {
        self.grants
            .entry(Self::key(actor, guild_id))
            .or_default()
            .extend(caps.iter().copied());
    }

    pub fn revoke(&self, actor: Actor, guild_id: Snowflake, cap: Capability) {
        if let Some(mut set) = self.grants.get_mut(&Self::key(actor, guild_id)) {
            set.remove(&cap);
        }
    }
}

#[async_trait]
impl CapabilityChecker for MemoryCapabilities {
    async fn missing_capabilities(
        &self,
        required: &[Capability],
        actor: Actor,
        scope: &Scope,
    ) -> Result<Vec<Capability>, PlatformError> {
        let Some(guild_id) = scope.guild_id() else {
            return Ok(Vec::new());
        };
        let granted = self.grants.get(&Self::key(actor, guild_id));
        let missing = required
            .iter()
            .copied()
            .filter(|cap| match granted.as_deref() {
                Some(set) => !set.contains(&Capability::Administrator) && !set.contains(cap),
                None => true,
            })
            .collect();
        Ok(missing)
    }
}

/// Fixed owner set, usually taken from `[bot].owners`.
#[derive(Debug, Default)]
pub struct StaticOwners {
    owners: HashSet<Snowflake>,
}

impl StaticOwners {
    pub fn new(owners: impl IntoIterator<Item = Snowflake>) -> Self {
        Self {
            owners: owners.into_iter().collect(),
        }
    }
}

impl OwnerRegistry for StaticOwners {
    fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owners.contains(&user_id)
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Default)]
pub struct MemorySettings {
    users: DashMap<Snowflake, Vec<String>>,
    guilds: DashMap<Snowflake, Vec<String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn user_prefixes(&self, user_id: Snowflake) -> Result<Option<Vec<String>>, PlatformError> {
        Ok(self.users.get(&user_id).map(|p| p.clone()))
    }

    async fn set_user_prefixes(
        &self,
        user_id: Snowflake,
        prefixes: Vec<String>,
    ) -> Result<(), PlatformError> {
        self.users.insert(user_id, prefixes);
        Ok(())
    }

    async fn guild_prefixes(
        &self,
        guild_id: Snowflake,
    ) -> Result<Option<Vec<String>>, PlatformError> {
        Ok(self.guilds.get(&guild_id).map(|p| p.clone()))
    }

    async fn set_guild_prefixes(
        &self,
        guild_id: Snowflake,
        prefixes: Vec<String>,
    ) -> Result<(), PlatformError> {
        self.guilds.insert(guild_id, prefixes);
        Ok(())
    }
}

// ============================================================================
// Replies and reports
// ============================================================================

/// One outbound action observed by [`MemoryReplies`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Reply { channel_id: Snowflake, content: String },
    Edit { message_id: Snowflake, content: String },
    Consent { channel_id: Snowflake, prompt: String },
}

/// Reply sink that records everything and answers consent prompts with a
/// fixed value.
#[derive(Default)]
pub struct MemoryReplies {
    log: Mutex<Vec<Outbound>>,
    next_id: AtomicU64,
    consent: AtomicBool,
    fail: AtomicBool,
}

impl MemoryReplies {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1_000),
            ..Self::default()
        }
    }

    /// Answer given to every consent request.
    pub fn set_consent(&self, answer: bool) {
        self.consent.store(answer, Ordering::Relaxed);
    }

    /// Make every send fail with a transport error.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    pub fn outbound(&self) -> Vec<Outbound> {
        self.log.lock().clone()
    }

    /// Contents of plain replies, in send order.
    pub fn replies(&self) -> Vec<String> {
        self.log
            .lock()
            .iter()
            .filter_map(|o| match o {
                Outbound::Reply { content, .. } => Some(content.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }

    fn check(&self) -> Result<(), PlatformError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(PlatformError::Transport("reply sink unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ReplySink for MemoryReplies {
    async fn reply(&self, to: &Message, content: &str) -> Result<SentMessage, PlatformError> {
        self.check()?;
        self.log.lock().push(Outbound::Reply {
            channel_id: to.channel_id,
            content: content.to_string(),
        });
        Ok(SentMessage {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            channel_id: to.channel_id,
            content: content.to_string(),
        })
    }

    async fn edit(&self, sent: &SentMessage, content: &str) -> Result<SentMessage, PlatformError> {
        self.check()?;
        self.log.lock().push(Outbound::Edit {
            message_id: sent.id,
            content: content.to_string(),
        });
        Ok(SentMessage {
            content: content.to_string(),
            ..sent.clone()
        })
    }

    async fn request_consent(
        &self,
        to: &Message,
        prompt: &str,
        _timeout: Duration,
    ) -> Result<bool, PlatformError> {
        self.check()?;
        self.log.lock().push(Outbound::Consent {
            channel_id: to.channel_id,
            prompt: prompt.to_string(),
        });
        Ok(self.consent.load(Ordering::Relaxed))
    }
}

/// Reporter that keeps every report it receives.
#[derive(Default)]
pub struct MemoryReporter {
    reports: Mutex<Vec<ErrorReport>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().clone()
    }
}

#[async_trait]
impl ErrorReporter for MemoryReporter {
    async fn post_error(&self, report: &ErrorReport) -> Result<(), PlatformError> {
        self.reports.lock().push(report.clone());
        Ok(())
    }
}
