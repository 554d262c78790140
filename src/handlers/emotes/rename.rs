//! `rename <emote> <name>`.

use crate::args::{ArgKind, ArgumentDef, ParsedArgs};
use crate::error::{ArgumentError, CommandError, CommandResult};
use crate::handlers::core::{CommandDescriptor, CommandHandler, Context};
use crate::platform::Capability;
use async_trait::async_trait;
use tracing::{info, warn};

/// Handler for the `rename` command.
pub struct RenameHandler;

#[async_trait]
impl CommandHandler for RenameHandler {
    async fn handle(&self, ctx: &Context, args: &ParsedArgs) -> CommandResult {
        let Some(emote) = args.guild_emotes("emote").and_then(|e| e.first()) else {
            return Err(ArgumentError::Missing {
                expected: ArgKind::GuildEmote.label().into(),
            }
            .into());
        };
        let name = args.text("name").unwrap_or_default();

        if emote.name == name {
            return Err(CommandError::rejected(format!(
                "That emote is already called {name}."
            )));
        }

        let renamed = match ctx
            .platform
            .emotes
            .rename_emote(emote.guild_id, emote.id, name)
            .await
        {
            Ok(renamed) => renamed,
            Err(e) => {
                warn!(error = %e, emote = emote.id, "Emote rename failed");
                return Err(CommandError::rejected(format!(
                    "I'm sorry, something went wrong while renaming {emote}"
                )));
            }
        };

        info!(emote = emote.id, from = %emote.name, to = %renamed.name, "Emote renamed");
        ctx.reply(format!("Done! {renamed}")).await?;
        Ok(())
    }
}

pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("rename", RenameHandler)
        .describe("Rename an emote")
        .guild_only()
        .user_permissions([Capability::ManageEmojis])
        .client_permissions([Capability::ManageEmojis])
        .arg(("emote", ArgKind::GuildEmote))
        .arg(ArgumentDef::new("name", ArgKind::Text).describe("The new name"))
}
