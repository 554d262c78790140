//! Coerced argument values and the per-invocation argument bag.

use super::glyph::{Glyph, ParsedEmoji, ParsedEmote};
use crate::platform::{Channel, GuildEmote, Message, Role, User};
use std::collections::{HashMap, HashSet};
use std::fmt;
use url::Url;

/// One coerced argument value. Variant set is closed over [`super::ArgKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Url(Url),
    Channel(Channel),
    Message(Box<Message>),
    User(User),
    Role(Role),
    GuildEmote(GuildEmote),
    GuildEmotes(Vec<GuildEmote>),
    Glyph(Glyph),
    Glyphs(Vec<Glyph>),
}

impl ArgValue {
    /// Multi-value results with no entries count as a parse failure.
    pub fn is_empty_list(&self) -> bool {
        match self {
            ArgValue::GuildEmotes(v) => v.is_empty(),
            ArgValue::Glyphs(v) => v.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
            f.write_str(&parts.join(" "))
        }
        match self {
            ArgValue::Text(s) => f.write_str(s),
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::Int(n) => write!(f, "{n}"),
            ArgValue::Float(n) => write!(f, "{n}"),
            ArgValue::Url(u) => f.write_str(u.as_str()),
            ArgValue::Channel(c) => c.fmt(f),
            ArgValue::Message(m) => write!(f, "{}/{}", m.channel_id, m.id),
            ArgValue::User(u) => u.fmt(f),
            ArgValue::Role(r) => r.fmt(f),
            ArgValue::GuildEmote(e) => e.fmt(f),
            ArgValue::GuildEmotes(list) => join(f, list),
            ArgValue::Glyph(g) => g.fmt(f),
            ArgValue::Glyphs(list) => join(f, list),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Text(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Text(s)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        ArgValue::Int(n)
    }
}

impl From<f64> for ArgValue {
    fn from(n: f64) -> Self {
        ArgValue::Float(n)
    }
}

impl From<Glyph> for ArgValue {
    fn from(g: Glyph) -> Self {
        ArgValue::Glyph(g)
    }
}

/// Parsed arguments for one invocation.
///
/// Every declared key is present after a successful parse; a key maps to
/// `None` when an optional argument had neither input nor default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: HashMap<String, Option<ArgValue>>,
    flags: HashSet<String>,
}

impl ParsedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<ArgValue>) {
        self.values.insert(key.into(), value);
    }

    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.flags.insert(name.into());
    }

    /// `true` when a declared flag was passed.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    /// Whether `key` was declared and processed (even if it resolved to none).
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.values.get(key).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            ArgValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            ArgValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn url(&self, key: &str) -> Option<&Url> {
        match self.get(key)? {
            ArgValue::Url(u) => Some(u),
            _ => None,
        }
    }

    pub fn channel(&self, key: &str) -> Option<&Channel> {
        match self.get(key)? {
            ArgValue::Channel(c) => Some(c),
            _ => None,
        }
    }

    pub fn message(&self, key: &str) -> Option<&Message> {
        match self.get(key)? {
            ArgValue::Message(m) => Some(m.as_ref()),
            _ => None,
        }
    }

    pub fn user(&self, key: &str) -> Option<&User> {
        match self.get(key)? {
            ArgValue::User(u) => Some(u),
            _ => None,
        }
    }

    pub fn role(&self, key: &str) -> Option<&Role> {
        match self.get(key)? {
            ArgValue::Role(r) => Some(r),
            _ => None,
        }
    }

    pub fn guild_emotes(&self, key: &str) -> Option<&[GuildEmote]> {
        match self.get(key)? {
            ArgValue::GuildEmotes(list) => Some(list),
            ArgValue::GuildEmote(e) => Some(std::slice::from_ref(e)),
            _ => None,
        }
    }

    /// Single or multi glyph values, as a slice.
    pub fn glyphs(&self, key: &str) -> Option<&[Glyph]> {
        match self.get(key)? {
            ArgValue::Glyphs(list) => Some(list),
            ArgValue::Glyph(g) => Some(std::slice::from_ref(g)),
            _ => None,
        }
    }

    pub fn emote(&self, key: &str) -> Option<&ParsedEmote> {
        match self.get(key)? {
            ArgValue::Glyph(Glyph::Custom(e)) => Some(e),
            _ => None,
        }
    }

    pub fn emoji(&self, key: &str) -> Option<&ParsedEmoji> {
        match self.get(key)? {
            ArgValue::Glyph(Glyph::Unicode(e)) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let mut args = ParsedArgs::new();
        args.insert("size", Some("256KB".into()));
        args.insert("url", None);
        args.insert("n", Some(ArgValue::Int(4)));
        args.set_flag("noCache");

        assert_eq!(args.text("size"), Some("256KB"));
        assert!(args.contains("url"));
        assert!(args.get("url").is_none());
        assert_eq!(args.int("n"), Some(4));
        assert_eq!(args.text("n"), None);
        assert!(args.flag("noCache"));
        assert!(!args.flag("force"));
    }

    #[test]
    fn test_empty_list_detection() {
        assert!(ArgValue::Glyphs(Vec::new()).is_empty_list());
        assert!(!ArgValue::Text(String::new()).is_empty_list());
    }
}
