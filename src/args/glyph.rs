//! Custom emote and default emoji extraction.
//!
//! Both extractors scan free text, so `"look at <:wave:123> 👋"` yields two
//! glyphs. Custom emotes are matched by pattern, default emojis by a longest
//! match against the emoji table.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const EMOTE_CDN: &str = "https://cdn.discordapp.com/emojis";
const EMOJI_CDN: &str = "https://cdn.jsdelivr.net/gh/twitter/twemoji@latest/assets/svg";

/// Longest emoji sequence in bytes we try to match (ZWJ families).
const MAX_EMOJI_BYTES: usize = 64;

fn emote_regex() -> &'static Regex {
    static EMOTE: OnceLock<Regex> = OnceLock::new();
    EMOTE.get_or_init(|| Regex::new(r"<(a)?:(\w{2,32}):(\d{1,20})>").expect("emote pattern is valid"))
}

/// A `<:name:id>` or `<a:name:id>` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEmote {
    pub id: u64,
    pub name: String,
    pub animated: bool,
}

impl ParsedEmote {
    pub fn url(&self) -> String {
        let ext = if self.animated { "gif" } else { "png" };
        format!("{EMOTE_CDN}/{}.{ext}", self.id)
    }
}

impl fmt::Display for ParsedEmote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let anim = if self.animated { "a" } else { "" };
        write!(f, "<{}:{}:{}>", anim, self.name, self.id)
    }
}

/// A default unicode emoji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEmoji {
    pub raw: String,
    pub name: String,
}

impl ParsedEmoji {
    /// Code points as `U+XXXX`, space separated.
    pub fn codepoints(&self) -> String {
        self.raw
            .chars()
            .map(|c| format!("U+{:04X}", c as u32))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Twemoji asset URL. Variation selectors are dropped unless the sequence
    /// contains a zero width joiner.
    pub fn url(&self) -> String {
        let keep_vs = self.raw.contains('\u{200D}');
        let file = self
            .raw
            .chars()
            .filter(|c| keep_vs || *c != '\u{FE0F}')
            .map(|c| format!("{:x}", c as u32))
            .collect::<Vec<_>>()
            .join("-");
        format!("{EMOJI_CDN}/{file}.svg")
    }
}

impl fmt::Display for ParsedEmoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Either kind of emote-like token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Glyph {
    Custom(ParsedEmote),
    Unicode(ParsedEmoji),
}

impl Glyph {
    pub fn name(&self) -> &str {
        match self {
            Glyph::Custom(e) => &e.name,
            Glyph::Unicode(e) => &e.name,
        }
    }

    pub fn url(&self) -> String {
        match self {
            Glyph::Custom(e) => e.url(),
            Glyph::Unicode(e) => e.url(),
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Glyph::Custom(e) => e.fmt(f),
            Glyph::Unicode(e) => e.fmt(f),
        }
    }
}

fn emote_matches(text: &str) -> impl Iterator<Item = (usize, ParsedEmote)> + '_ {
    emote_regex().captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let id = caps.get(3)?.as_str().parse().ok()?;
        Some((
            whole.start(),
            ParsedEmote {
                id,
                name: caps.get(2)?.as_str().to_string(),
                animated: caps.get(1).is_some(),
            },
        ))
    })
}

/// Longest emoji starting at byte `start`, with its byte length.
fn emoji_at(text: &str, start: usize) -> Option<(usize, &'static emojis::Emoji)> {
    let rest = &text[start..];
    let limit = rest.len().min(MAX_EMOJI_BYTES);
    let mut ends: Vec<usize> = rest
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|end| *end <= limit)
        .collect();
    ends.reverse();
    ends.into_iter()
        .find_map(|end| emojis::get(&rest[..end]).map(|emoji| (end, emoji)))
}

fn emoji_matches(text: &str) -> Vec<(usize, ParsedEmoji)> {
    let mut found = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        if let Some((len, emoji)) = emoji_at(text, pos) {
            found.push((
                pos,
                ParsedEmoji {
                    raw: emoji.as_str().to_string(),
                    name: emoji.name().to_string(),
                },
            ));
            pos += len;
        } else {
            pos += text[pos..].chars().next().map_or(1, char::len_utf8);
        }
    }
    found
}

/// First custom emote in `text`.
pub fn parse_emote(text: &str) -> Option<ParsedEmote> {
    emote_matches(text).next().map(|(_, e)| e)
}

pub fn parse_emotes(text: &str) -> Vec<ParsedEmote> {
    emote_matches(text).map(|(_, e)| e).collect()
}

/// First default emoji in `text`.
pub fn parse_emoji(text: &str) -> Option<ParsedEmoji> {
    emoji_matches(text).into_iter().next().map(|(_, e)| e)
}

pub fn parse_emojis(text: &str) -> Vec<ParsedEmoji> {
    emoji_matches(text).into_iter().map(|(_, e)| e).collect()
}

/// A custom emote if present, else a default emoji.
pub fn parse_glyph(text: &str) -> Option<Glyph> {
    parse_emote(text)
        .map(Glyph::Custom)
        .or_else(|| parse_emoji(text).map(Glyph::Unicode))
}

/// Every glyph in `text`, in order of appearance.
pub fn parse_glyphs(text: &str) -> Vec<Glyph> {
    let mut all: Vec<(usize, Glyph)> = emote_matches(text)
        .map(|(pos, e)| (pos, Glyph::Custom(e)))
        .chain(
            emoji_matches(text)
                .into_iter()
                .map(|(pos, e)| (pos, Glyph::Unicode(e))),
        )
        .collect();
    all.sort_by_key(|(pos, _)| *pos);
    all.into_iter().map(|(_, g)| g).collect()
}
