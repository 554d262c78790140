//! Plain platform entity types.
//!
//! These mirror the handful of fields the command core needs from the
//! messaging platform. Transport-specific data never reaches this layer.

use std::fmt;

/// Platform-wide numeric identifier.
pub type Snowflake = u64;

/// A platform user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub name: String,
    /// Bot accounts never trigger commands.
    pub bot: bool,
}

impl User {
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            bot: false,
        }
    }

    /// `name (id)` form used in logs and error reports.
    pub fn tag(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<@{}>", self.id)
    }
}

/// A text channel, either inside a guild or a private one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub name: String,
    pub guild_id: Option<Snowflake>,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<#{}>", self.id)
    }
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub name: String,
    pub guild_id: Snowflake,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<@&{}>", self.id)
    }
}

/// A custom emote that belongs to a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildEmote {
    pub id: Snowflake,
    pub name: String,
    pub animated: bool,
    pub guild_id: Snowflake,
}

impl fmt::Display for GuildEmote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let anim = if self.animated { "a" } else { "" };
        write!(f, "<{}:{}:{}>", anim, self.name, self.id)
    }
}

/// An incoming (or fetched) chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    /// `None` for private messages.
    pub guild_id: Option<Snowflake>,
    pub author: User,
    pub content: String,
}

impl Message {
    /// The scope this message was sent in.
    pub fn scope(&self) -> Scope {
        match self.guild_id {
            Some(guild_id) => Scope::Guild {
                guild_id,
                channel_id: self.channel_id,
            },
            None => Scope::Direct {
                channel_id: self.channel_id,
            },
        }
    }
}

/// Handle to a message the bot sent, used for later edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub content: String,
}

/// Where an invocation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// A shared guild channel; permissions apply.
    Guild {
        guild_id: Snowflake,
        channel_id: Snowflake,
    },
    /// A one-to-one private channel.
    Direct { channel_id: Snowflake },
}

impl Scope {
    #[inline]
    pub fn is_guild(&self) -> bool {
        matches!(self, Scope::Guild { .. })
    }

    #[inline]
    pub fn guild_id(&self) -> Option<Snowflake> {
        match self {
            Scope::Guild { guild_id, .. } => Some(*guild_id),
            Scope::Direct { .. } => None,
        }
    }

    #[inline]
    pub fn channel_id(&self) -> Snowflake {
        match self {
            Scope::Guild { channel_id, .. } | Scope::Direct { channel_id } => *channel_id,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Guild {
                guild_id,
                channel_id,
            } => write!(f, "guild {guild_id} / channel {channel_id}"),
            Scope::Direct { channel_id } => write!(f, "direct / channel {channel_id}"),
        }
    }
}

/// Who a capability check is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// The user invoking the command.
    Caller(Snowflake),
    /// The bot's own service account.
    Service,
}

/// A named permission bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    ViewChannel,
    SendMessages,
    EmbedLinks,
    AttachFiles,
    AddReactions,
    ManageMessages,
    ManageEmojis,
    ManageGuild,
    Administrator,
}

impl Capability {
    /// Wire identifier, e.g. `MANAGE_EMOJIS`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ViewChannel => "VIEW_CHANNEL",
            Self::SendMessages => "SEND_MESSAGES",
            Self::EmbedLinks => "EMBED_LINKS",
            Self::AttachFiles => "ATTACH_FILES",
            Self::AddReactions => "ADD_REACTIONS",
            Self::ManageMessages => "MANAGE_MESSAGES",
            Self::ManageEmojis => "MANAGE_EMOJIS",
            Self::ManageGuild => "MANAGE_GUILD",
            Self::Administrator => "ADMINISTRATOR",
        }
    }

    /// Human-readable name, e.g. `Manage Emojis`.
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix lists valid for one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefixes {
    /// Candidate order used for matching: user prefixes, then guild prefixes.
    pub all: Vec<String>,
    pub user: Vec<String>,
    pub guild: Vec<String>,
}

impl Prefixes {
    pub fn new(user: Vec<String>, guild: Vec<String>) -> Self {
        let all = user.iter().chain(guild.iter()).cloned().collect();
        Self { all, user, guild }
    }
}
