//! `emojiinfo <input>`: details on the first emote or emoji in the input.

use crate::args::{ArgKind, ArgumentDef, Glyph, ParsedArgs, ParsedEmoji, ParsedEmote};
use crate::error::{ArgumentError, CommandResult};
use crate::handlers::core::{CommandDescriptor, CommandHandler, Context};
use crate::platform::{GuildEmote, Snowflake};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

/// First millisecond of 2015, the platform's id epoch.
const SNOWFLAKE_EPOCH_MS: u64 = 1_420_070_400_000;

/// Creation time encoded in an id.
pub fn snowflake_created_at(id: Snowflake) -> Option<DateTime<Utc>> {
    let ms = (id >> 22).checked_add(SNOWFLAKE_EPOCH_MS)?;
    DateTime::from_timestamp_millis(i64::try_from(ms).ok()?)
}

fn format_date(id: Snowflake) -> String {
    snowflake_created_at(id)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn describe_emote(emote: &ParsedEmote, known: Option<&GuildEmote>) -> String {
    match known {
        Some(known) => format!(
            "**Info for {known}**\n<{}>\n\nName: `:{}:`\nID: {}\nAnimated: {}\nCreated At: {}",
            emote.url(),
            known.name,
            known.id,
            if known.animated { "yes" } else { "no" },
            format_date(known.id),
        ),
        None => format!(
            "**Info for :\u{200B}{}\u{200B}:**\n<{}>\n\nName: `:{}:`\nID: {}\nCreated At: {}\n\n\
             I do not have access to this emote, so I sadly can't provide more info.",
            emote.name,
            emote.url(),
            emote.name,
            emote.id,
            format_date(emote.id),
        ),
    }
}

pub fn describe_emoji(emoji: &ParsedEmoji) -> String {
    format!(
        "**Info for {}**\n<{}>\n\nName: `:{}:`\nRaw: `{}`\nUnicode: {}",
        emoji.raw,
        emoji.url(),
        emoji.name,
        emoji.raw,
        emoji.codepoints(),
    )
}

/// Handler for the `emojiinfo` command.
pub struct EmojiInfoHandler;

#[async_trait]
impl CommandHandler for EmojiInfoHandler {
    async fn handle(&self, ctx: &Context, args: &ParsedArgs) -> CommandResult {
        let Some(first) = args.glyphs("input").and_then(|g| g.first()) else {
            return Err(ArgumentError::custom("Please specify an emoji or a custom emote.").into());
        };

        let text = match first {
            Glyph::Custom(emote) => {
                let known = match ctx.scope.guild_id() {
                    Some(guild_id) => {
                        let lookup = ctx.platform.resolver.guild_emote(guild_id, emote.id);
                        match tokio::time::timeout(ctx.parser.resolve_timeout(), lookup).await {
                            Ok(Ok(found)) => found,
                            Ok(Err(e)) => {
                                debug!(error = %e, emote = emote.id, "Emote lookup failed");
                                None
                            }
                            Err(_) => None,
                        }
                    }
                    None => None,
                };
                describe_emote(emote, known.as_ref())
            }
            Glyph::Unicode(emoji) => describe_emoji(emoji),
        };

        ctx.reply(text).await?;
        Ok(())
    }
}

pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("emojiinfo", EmojiInfoHandler)
        .aliases(["emoteinfo", "ei"])
        .describe("Get Info on an emoji/emote")
        .arg(
            ArgumentDef::new("input", ArgKind::EmotesOrEmojis)
                .optional()
                .remainder()
                .describe("An emoji or custom emote"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::glyph::{parse_emoji, parse_emote};

    #[test]
    fn test_snowflake_timestamp() {
        let at = snowflake_created_at(175928847299117063).unwrap();
        assert_eq!(at.timestamp_millis(), 1462015105796);
        assert_eq!(snowflake_created_at(0).unwrap().timestamp_millis(), 1420070400000);
    }

    #[test]
    fn test_describe_unknown_emote() {
        let emote = parse_emote("<a:blobdance:123456789012345678>").unwrap();
        let text = describe_emote(&emote, None);
        assert!(text.contains("Name: `:blobdance:`"));
        assert!(text.contains("123456789012345678.gif"));
        assert!(text.contains("I do not have access"));
    }

    #[test]
    fn test_describe_emoji() {
        let emoji = parse_emoji("😀").unwrap();
        let text = describe_emoji(&emoji);
        assert!(text.contains("Unicode: U+1F600"));
        assert!(text.contains("1f600.svg"));
    }
}
