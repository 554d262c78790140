//! Argument definition model.
//!
//! A command declares an ordered list of [`ArgumentDef`]s plus an optional set
//! of boolean [`FlagDef`]s. Positional matching is index based, so order
//! matters. The whole declaration is checked once by [`ArgSpec::validate`]
//! when the command is registered.

use super::value::ArgValue;
use crate::error::ArgSpecError;
use std::collections::HashSet;
use std::fmt;

/// The closed set of supported argument types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Text,
    Bool,
    Int,
    Float,
    Url,
    Channel,
    Message,
    User,
    Role,
    /// A custom emote that must exist in the invoking guild.
    GuildEmote,
    GuildEmotes,
    /// Any `<:name:id>` / `<a:name:id>` token.
    Emote,
    Emotes,
    /// A default unicode emoji.
    Emoji,
    Emojis,
    EmoteOrEmoji,
    EmotesOrEmojis,
}

impl ArgKind {
    /// Label used in error messages and usage text.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bool => "boolean",
            Self::Int => "number",
            Self::Float => "float",
            Self::Url => "url",
            Self::Channel => "channel",
            Self::Message => "message",
            Self::User => "user",
            Self::Role => "role",
            Self::GuildEmote => "server emote",
            Self::GuildEmotes => "server emotes",
            Self::Emote => "custom emote",
            Self::Emotes => "custom emotes",
            Self::Emoji => "default emoji",
            Self::Emojis => "default emojis",
            Self::EmoteOrEmoji => "custom emote or default emoji",
            Self::EmotesOrEmojis => "custom emotes or default emojis",
        }
    }

    /// Kinds that extract a list from free text.
    pub const fn is_multi(&self) -> bool {
        matches!(
            self,
            Self::GuildEmotes | Self::Emotes | Self::Emojis | Self::EmotesOrEmojis
        )
    }

    /// Kinds that can only be resolved inside a guild.
    pub const fn needs_guild(&self) -> bool {
        matches!(self, Self::GuildEmote | Self::GuildEmotes | Self::Role)
    }

    /// Whether `value` is a legal value of this kind.
    pub fn accepts(&self, value: &ArgValue) -> bool {
        use super::glyph::Glyph;
        match (self, value) {
            (Self::Text, ArgValue::Text(_))
            | (Self::Bool, ArgValue::Bool(_))
            | (Self::Int, ArgValue::Int(_))
            | (Self::Float, ArgValue::Float(_))
            | (Self::Url, ArgValue::Url(_))
            | (Self::Channel, ArgValue::Channel(_))
            | (Self::Message, ArgValue::Message(_))
            | (Self::User, ArgValue::User(_))
            | (Self::Role, ArgValue::Role(_))
            | (Self::GuildEmote, ArgValue::GuildEmote(_))
            | (Self::GuildEmotes, ArgValue::GuildEmotes(_))
            | (Self::EmoteOrEmoji, ArgValue::Glyph(_))
            | (Self::EmotesOrEmojis, ArgValue::Glyphs(_)) => true,
            (Self::Emote, ArgValue::Glyph(g)) => matches!(g, Glyph::Custom(_)),
            (Self::Emoji, ArgValue::Glyph(g)) => matches!(g, Glyph::Unicode(_)),
            (Self::Emotes, ArgValue::Glyphs(gs)) => gs.iter().all(|g| matches!(g, Glyph::Custom(_))),
            (Self::Emojis, ArgValue::Glyphs(gs)) => {
                gs.iter().all(|g| matches!(g, Glyph::Unicode(_)))
            }
            _ => false,
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One positional argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDef {
    pub key: String,
    pub kind: ArgKind,
    pub optional: bool,
    pub default: Option<ArgValue>,
    pub remainder: bool,
    pub choices: Vec<String>,
    pub description: Option<String>,
}

impl ArgumentDef {
    /// Required argument with no choices and no default.
    pub fn new(key: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            key: key.into(),
            kind,
            optional: false,
            default: None,
            remainder: false,
            choices: Vec::new(),
            description: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Fallback for a missing value. Implies optional.
    pub fn default_value(mut self, value: impl Into<ArgValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Capture every remaining token. Only honoured on the last argument.
    pub fn remainder(mut self) -> Self {
        self.remainder = true;
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional || self.default.is_some()
    }

    #[inline]
    pub fn is_remainder(&self, position: usize, total: usize) -> bool {
        self.remainder && position + 1 == total
    }

    /// Description if set, else the type label.
    pub fn expected(&self) -> &str {
        self.description.as_deref().unwrap_or(self.kind.label())
    }
}

impl<K: Into<String>> From<(K, ArgKind)> for ArgumentDef {
    fn from((key, kind): (K, ArgKind)) -> Self {
        Self::new(key, kind)
    }
}

/// A boolean `--switch`. `name` is the camelCase form (`--no-cache` is `noCache`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDef {
    pub name: String,
    pub description: String,
}

/// Ordered argument definitions plus flag definitions of one command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgSpec {
    args: Vec<ArgumentDef>,
    flags: Vec<FlagDef>,
}

impl ArgSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, def: impl Into<ArgumentDef>) -> Self {
        self.args.push(def.into());
        self
    }

    pub fn flag(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.flags.push(FlagDef {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    pub fn args(&self) -> &[ArgumentDef] {
        &self.args
    }

    pub fn flags(&self) -> &[FlagDef] {
        &self.flags
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.flags.is_empty()
    }

    /// Definitions that are neither optional nor defaulted.
    pub fn required_count(&self) -> usize {
        self.args.iter().filter(|a| !a.is_optional()).count()
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.name == name)
    }

    /// Registration-time checks.
    pub fn validate(&self) -> Result<(), ArgSpecError> {
        let total = self.args.len();
        let mut keys = HashSet::new();

        for (position, def) in self.args.iter().enumerate() {
            if def.remainder && !def.is_remainder(position, total) {
                return Err(ArgSpecError::RemainderNotLast {
                    key: def.key.clone(),
                });
            }
            if !keys.insert(def.key.as_str()) {
                return Err(ArgSpecError::DuplicateKey(def.key.clone()));
            }
            if let Some(default) = &def.default
                && !def.kind.accepts(default)
            {
                return Err(ArgSpecError::DefaultMismatch {
                    key: def.key.clone(),
                    kind: def.kind.label(),
                });
            }
        }

        let mut flags = HashSet::new();
        for flag in &self.flags {
            let valid = flag
                .name
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_lowercase())
                && flag.name.chars().all(|c| c.is_ascii_alphanumeric());
            if !valid {
                return Err(ArgSpecError::InvalidFlag(flag.name.clone()));
            }
            if !flags.insert(flag.name.as_str()) {
                return Err(ArgSpecError::DuplicateFlag(flag.name.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_and_remainder_rules() {
        let def = ArgumentDef::new("size", ArgKind::Text).default_value("256KB");
        assert!(def.is_optional());
        assert!(!ArgumentDef::new("x", ArgKind::Int).is_optional());

        let rest = ArgumentDef::new("rest", ArgKind::Text).remainder();
        assert!(rest.is_remainder(2, 3));
        assert!(!rest.is_remainder(1, 3));
    }

    #[test]
    fn test_required_count_ignores_defaults() {
        let spec = ArgSpec::new()
            .arg(("a", ArgKind::Text))
            .arg(ArgumentDef::new("b", ArgKind::Text).optional())
            .arg(ArgumentDef::new("c", ArgKind::Text).default_value("!"));
        assert_eq!(spec.required_count(), 1);
    }

    #[test]
    fn test_remainder_not_last_rejected() {
        let spec = ArgSpec::new()
            .arg(ArgumentDef::new("body", ArgKind::Text).remainder())
            .arg(("tail", ArgKind::Text));
        assert_eq!(
            spec.validate(),
            Err(ArgSpecError::RemainderNotLast { key: "body".into() })
        );
    }

    #[test]
    fn test_validate_rejects_bad_declarations() {
        let dup = ArgSpec::new()
            .arg(("a", ArgKind::Text))
            .arg(("a", ArgKind::Int));
        assert_eq!(dup.validate(), Err(ArgSpecError::DuplicateKey("a".into())));

        let mismatch = ArgSpec::new().arg(ArgumentDef::new("n", ArgKind::Int).default_value("x"));
        assert!(matches!(
            mismatch.validate(),
            Err(ArgSpecError::DefaultMismatch { .. })
        ));

        let kebab = ArgSpec::new().flag("no-cache", "skip cache");
        assert_eq!(
            kebab.validate(),
            Err(ArgSpecError::InvalidFlag("no-cache".into()))
        );

        let ok = ArgSpec::new()
            .arg(("a", ArgKind::Text))
            .arg(ArgumentDef::new("rest", ArgKind::Text).remainder())
            .flag("noCache", "skip cache");
        assert!(ok.validate().is_ok());
        assert!(ok.has_flag("noCache"));
    }
}
