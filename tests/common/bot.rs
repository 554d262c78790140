//! In-memory bot harness.

use glyphbot::config::Config;
use glyphbot::handlers::core::report::Redactor;
use glyphbot::handlers::{CommandSource, Dispatcher, Outcome, Registry, builtin_source};
use glyphbot::platform::memory::{
    MemoryCapabilities, MemoryReplies, MemoryReporter, MemoryResolver, MemorySettings,
    Outbound, StaticOwners,
};
use glyphbot::platform::{Actor, Capability, Message, Platform, StoredPrefixes, User};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const OWNER: u64 = 1;
pub const STRANGER: u64 = 7;
pub const SELF_ID: u64 = 42;
pub const GUILD: u64 = 100;
pub const CHANNEL: u64 = 200;

/// Value redacted from every report produced through the harness.
#[allow(dead_code)]
pub const SECRET: &str = "hunter2-very-secret";

#[allow(dead_code)]
pub struct TestBot {
    pub dispatcher: Dispatcher,
    pub registry: Arc<Registry>,
    pub replies: Arc<MemoryReplies>,
    pub reporter: Arc<MemoryReporter>,
    pub capabilities: Arc<MemoryCapabilities>,
    pub resolver: Arc<MemoryResolver>,
    pub settings: Arc<MemorySettings>,
    next_id: AtomicU64,
}

#[allow(dead_code)]
impl TestBot {
    /// Builtin commands plus the test commands, default configuration.
    pub fn new() -> Self {
        Self::with_config(Self::config())
    }

    pub fn with_config(config: Config) -> Self {
        let source = builtin_source().group("test", super::commands::ALL);
        Self::with_source(config, Arc::new(source))
    }

    pub fn with_source(config: Config, source: Arc<dyn CommandSource>) -> Self {
        let registry = Arc::new(Registry::with_source(&config.registry, source));
        registry
            .register_all()
            .expect("test commands must register");

        let replies = Arc::new(MemoryReplies::new());
        let reporter = Arc::new(MemoryReporter::new());
        let capabilities = Arc::new(MemoryCapabilities::new());
        let resolver = Arc::new(MemoryResolver::new());
        let settings = Arc::new(MemorySettings::new());

        capabilities.grant(
            Actor::Service,
            GUILD,
            &[Capability::ViewChannel, Capability::SendMessages],
        );

        let platform = Platform {
            resolver: resolver.clone(),
            replies: replies.clone(),
            capabilities: capabilities.clone(),
            owners: Arc::new(StaticOwners::new(config.bot.owners.iter().copied())),
            prefixes: Arc::new(StoredPrefixes::new(
                settings.clone(),
                config.bot.default_prefix.clone(),
            )),
            settings: settings.clone(),
            reporter: reporter.clone(),
            emotes: resolver.clone(),
        };

        let dispatcher = Dispatcher::new(registry.clone(), platform, Arc::new(config))
            .with_redactor(Arc::new(Redactor::new([("BOT_TOKEN", SECRET)])));

        Self {
            dispatcher,
            registry,
            replies,
            reporter,
            capabilities,
            resolver,
            settings,
            next_id: AtomicU64::new(1),
        }
    }

    /// Default configuration with one owner and a known bot id.
    pub fn config() -> Config {
        let mut config = Config::default();
        config.bot.owners = vec![OWNER];
        config.bot.user_id = Some(SELF_ID);
        config.bot.name = "glyphbot".into();
        config
    }

    fn message(&self, author: u64, guild_id: Option<u64>, content: &str) -> Message {
        Message {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            channel_id: CHANNEL,
            guild_id,
            author: User::new(author, format!("user{author}")),
            content: content.to_string(),
        }
    }

    /// Send `content` as a guild message from `author`.
    pub async fn guild(&self, author: u64, content: &str) -> Outcome {
        let msg = self.message(author, Some(GUILD), content);
        self.dispatcher.dispatch(msg).await
    }

    /// Send `content` as a private message from `author`.
    pub async fn dm(&self, author: u64, content: &str) -> Outcome {
        let msg = self.message(author, None, content);
        self.dispatcher.dispatch(msg).await
    }

    pub async fn from_bot(&self, content: &str) -> Outcome {
        let mut msg = self.message(99, Some(GUILD), content);
        msg.author.bot = true;
        self.dispatcher.dispatch(msg).await
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.replies()
    }

    pub fn last_reply(&self) -> Option<String> {
        self.replies().pop()
    }

    pub fn outbound(&self) -> Vec<Outbound> {
        self.replies.outbound()
    }

    pub fn grant(&self, user: u64, caps: &[Capability]) {
        self.capabilities.grant(Actor::Caller(user), GUILD, caps);
    }

    pub fn grant_service(&self, caps: &[Capability]) {
        self.capabilities.grant(Actor::Service, GUILD, caps);
    }
}
