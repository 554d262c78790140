//! Argument parsing engine.
//!
//! Turns the raw token list of an invocation into a [`ParsedArgs`] bag:
//!
//! 1. Flag extraction (only when the command declares flags).
//! 2. Required-count fast-fail, before any coercion or lookup.
//! 3. Per-definition coercion in declared order, with remainder capture,
//!    optional/default fallback and case-insensitive choices.
//!
//! Platform lookups are bounded by the configured resolve timeout. A timeout
//! or lookup failure is an ordinary parse failure.

use super::definition::{ArgKind, ArgSpec, ArgumentDef};
use super::glyph::{self, Glyph};
use super::primitives;
use super::value::{ArgValue, ParsedArgs};
use crate::error::ArgumentError;
use crate::platform::{EntityResolver, PlatformError, Scope};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Convert `--no-cache` style tokens to the declared camelCase flag name.
/// Returns `None` for tokens that are not flag-shaped.
pub fn flag_name(token: &str) -> Option<String> {
    let body = token.strip_prefix("--")?;
    if body.is_empty() {
        return None;
    }
    let mut name = String::with_capacity(body.len());
    let mut upper_next = false;
    for c in body.to_lowercase().chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            name.extend(c.to_uppercase());
            upper_next = false;
        } else {
            name.push(c);
        }
    }
    Some(name)
}

/// Split declared flags out of the token stream. Undeclared `--tokens` stay
/// positional.
pub fn extract_flags(spec: &ArgSpec, tokens: &[String]) -> (Vec<String>, HashSet<String>) {
    if spec.flags().is_empty() {
        return (tokens.to_vec(), HashSet::new());
    }
    let mut positional = Vec::with_capacity(tokens.len());
    let mut flags = HashSet::new();
    for token in tokens {
        match flag_name(token) {
            Some(name) if spec.has_flag(&name) => {
                flags.insert(name);
            }
            _ => positional.push(token.clone()),
        }
    }
    (positional, flags)
}

/// Parses tokens against an [`ArgSpec`].
#[derive(Debug, Clone, Copy)]
pub struct ArgParser {
    resolve_timeout: Duration,
}

impl ArgParser {
    pub fn new(resolve_timeout: Duration) -> Self {
        Self { resolve_timeout }
    }

    pub fn resolve_timeout(&self) -> Duration {
        self.resolve_timeout
    }

    pub async fn parse(
        &self,
        spec: &ArgSpec,
        tokens: &[String],
        resolver: &dyn EntityResolver,
        scope: &Scope,
    ) -> Result<ParsedArgs, ArgumentError> {
        let (positional, flags) = extract_flags(spec, tokens);

        let required = spec.required_count();
        if positional.len() < required {
            return Err(ArgumentError::TooFew {
                expected: required,
                received: positional.len(),
            });
        }

        let mut out = ParsedArgs::new();
        for flag in flags {
            out.set_flag(flag);
        }

        let defs = spec.args();
        let total = defs.len();
        for (index, def) in defs.iter().enumerate() {
            let raw = if def.is_remainder(index, total) {
                positional
                    .get(index..)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| rest.join(" "))
            } else {
                positional.get(index).cloned()
            };

            let Some(raw) = raw.filter(|r| !r.is_empty()) else {
                if def.is_optional() {
                    out.insert(def.key.clone(), def.default.clone());
                    continue;
                }
                return Err(ArgumentError::Missing {
                    expected: def.kind.label().to_string(),
                });
            };

            let value = self.parse_one(def, &raw, resolver, scope).await?;
            out.insert(def.key.clone(), Some(value));
        }

        Ok(out)
    }

    async fn parse_one(
        &self,
        def: &ArgumentDef,
        raw: &str,
        resolver: &dyn EntityResolver,
        scope: &Scope,
    ) -> Result<ArgValue, ArgumentError> {
        if def.kind.needs_guild() && !scope.is_guild() {
            return Err(ArgumentError::GuildRequired {
                expected: def.expected().to_string(),
            });
        }
        if def.kind == ArgKind::Text && raw.trim().is_empty() {
            return Err(ArgumentError::EmptyText);
        }

        let value = match self.coerce(def.kind, raw, resolver, scope).await {
            Some(value) if !value.is_empty_list() => value,
            _ => {
                let hint = if def.remainder {
                    "one or more arguments of type "
                } else {
                    ""
                };
                return Err(ArgumentError::Invalid {
                    raw: raw.to_string(),
                    expected: format!("{hint}{}", def.expected()),
                });
            }
        };

        if def.choices.is_empty() {
            return Ok(value);
        }

        let value = match value {
            ArgValue::Text(s) => ArgValue::Text(s.to_lowercase()),
            other => other,
        };
        let received = value.to_string().to_lowercase();
        if def
            .choices
            .iter()
            .any(|choice| choice.to_lowercase() == received)
        {
            Ok(value)
        } else {
            Err(ArgumentError::NotAChoice {
                choices: def.choices.clone(),
                received,
            })
        }
    }

    async fn coerce(
        &self,
        kind: ArgKind,
        raw: &str,
        resolver: &dyn EntityResolver,
        scope: &Scope,
    ) -> Option<ArgValue> {
        match kind {
            ArgKind::Text => primitives::parse_text(raw).map(ArgValue::Text),
            ArgKind::Bool => primitives::parse_bool(raw).map(ArgValue::Bool),
            ArgKind::Int => primitives::parse_int(raw).map(ArgValue::Int),
            ArgKind::Float => primitives::parse_float(raw).map(ArgValue::Float),
            ArgKind::Url => primitives::parse_url(raw).map(ArgValue::Url),
            ArgKind::Channel => {
                let id = primitives::channel_id(raw)?;
                self.lookup(resolver.channel(id))
                    .await
                    .map(ArgValue::Channel)
            }
            ArgKind::Message => {
                let (channel_id, id) = primitives::message_ref(raw, scope.channel_id())?;
                self.lookup(resolver.message(channel_id, id))
                    .await
                    .map(|m| ArgValue::Message(Box::new(m)))
            }
            ArgKind::User => {
                let id = primitives::user_id(raw)?;
                self.lookup(resolver.user(id)).await.map(ArgValue::User)
            }
            ArgKind::Role => {
                let guild_id = scope.guild_id()?;
                let id = primitives::role_id(raw)?;
                self.lookup(resolver.role(guild_id, id))
                    .await
                    .map(ArgValue::Role)
            }
            ArgKind::GuildEmote => {
                let guild_id = scope.guild_id()?;
                let parsed = glyph::parse_emote(raw)?;
                self.lookup(resolver.guild_emote(guild_id, parsed.id))
                    .await
                    .map(ArgValue::GuildEmote)
            }
            ArgKind::GuildEmotes => {
                let guild_id = scope.guild_id()?;
                let mut found = Vec::new();
                for parsed in glyph::parse_emotes(raw) {
                    if let Some(emote) = self.lookup(resolver.guild_emote(guild_id, parsed.id)).await
                    {
                        found.push(emote);
                    }
                }
                Some(ArgValue::GuildEmotes(found))
            }
            ArgKind::Emote => glyph::parse_emote(raw).map(|e| ArgValue::Glyph(Glyph::Custom(e))),
            ArgKind::Emotes => Some(ArgValue::Glyphs(
                glyph::parse_emotes(raw)
                    .into_iter()
                    .map(Glyph::Custom)
                    .collect(),
            )),
            ArgKind::Emoji => glyph::parse_emoji(raw).map(|e| ArgValue::Glyph(Glyph::Unicode(e))),
            ArgKind::Emojis => Some(ArgValue::Glyphs(
                glyph::parse_emojis(raw)
                    .into_iter()
                    .map(Glyph::Unicode)
                    .collect(),
            )),
            ArgKind::EmoteOrEmoji => glyph::parse_glyph(raw).map(ArgValue::Glyph),
            ArgKind::EmotesOrEmojis => Some(ArgValue::Glyphs(glyph::parse_glyphs(raw))),
        }
    }

    /// Run one platform lookup under the resolve timeout.
    async fn lookup<T, F>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = Result<Option<T>, PlatformError>>,
    {
        match tokio::time::timeout(self.resolve_timeout, fut).await {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                debug!(error = %e, "entity lookup failed");
                None
            }
            Err(_) => {
                debug!(
                    timeout_ms = self.resolve_timeout.as_millis() as u64,
                    "entity lookup timed out"
                );
                None
            }
        }
    }
}
