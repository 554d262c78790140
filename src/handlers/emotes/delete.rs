//! `delete <emotes...>`: remove server emotes, editing a progress line as it goes.

use crate::args::{ArgKind, ArgumentDef, ParsedArgs};
use crate::error::{CommandError, CommandResult};
use crate::handlers::core::{CommandDescriptor, CommandHandler, Context};
use crate::platform::Capability;
use async_trait::async_trait;
use tracing::{info, warn};

const LOADING: &str = "⏳";
const SUCCESS: &str = "✅";

/// Progress line after `index` (zero based) of `total` deletions, if one is due.
/// The first and last deletions are folded into the opening and closing lines.
pub fn progress_line(index: usize, total: usize) -> Option<String> {
    (index != 0 && index + 1 != total)
        .then(|| format!("{LOADING} Deleted {index}/{total} emotes"))
}

/// Handler for the `delete` command.
pub struct DeleteHandler;

#[async_trait]
impl CommandHandler for DeleteHandler {
    async fn handle(&self, ctx: &Context, args: &ParsedArgs) -> CommandResult {
        let emotes = args.guild_emotes("emotes").unwrap_or_default();
        let total = emotes.len();

        ctx.reply(format!("{LOADING} Deleting {total} emotes...")).await?;

        for (index, emote) in emotes.iter().enumerate() {
            if let Err(e) = ctx
                .platform
                .emotes
                .delete_emote(emote.guild_id, emote.id)
                .await
            {
                warn!(error = %e, emote = emote.id, "Emote delete failed");
                return Err(CommandError::rejected(format!(
                    "I'm sorry, I failed to delete {emote}"
                )));
            }
            if let Some(line) = progress_line(index, total) {
                ctx.edit(line).await?;
            }
        }

        info!(count = total, guild = ?ctx.scope.guild_id(), "Emotes deleted");
        ctx.edit(format!("{SUCCESS} All done! Deleted {total} emotes"))
            .await?;
        Ok(())
    }
}

pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("delete", DeleteHandler)
        .aliases(["del", "rm"])
        .describe("Delete one or more emotes")
        .guild_only()
        .user_permissions([Capability::ManageEmojis])
        .client_permissions([Capability::ManageEmojis])
        .arg(ArgumentDef::new("emotes", ArgKind::GuildEmotes).remainder())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_skips_first_and_last() {
        assert_eq!(progress_line(0, 3), None);
        assert_eq!(progress_line(1, 3).as_deref(), Some("⏳ Deleted 1/3 emotes"));
        assert_eq!(progress_line(2, 3), None);
        assert_eq!(progress_line(0, 1), None);
    }
}
