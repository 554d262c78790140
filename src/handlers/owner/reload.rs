//! `reload`: re-run discovery and swap the command catalogue.

use crate::args::ParsedArgs;
use crate::error::{CommandError, CommandResult};
use crate::handlers::core::{CommandDescriptor, CommandHandler, Context};
use async_trait::async_trait;

/// Handler for the `reload` command.
pub struct ReloadHandler;

#[async_trait]
impl CommandHandler for ReloadHandler {
    async fn handle(&self, ctx: &Context, _args: &ParsedArgs) -> CommandResult {
        match ctx.registry.reload() {
            Ok(count) => {
                ctx.reply(format!(
                    "Successfully reloaded all commands! ({count} commands loaded)"
                ))
                .await?;
                Ok(())
            }
            Err(e) => Err(CommandError::rejected(format!(
                "Failed to reload commands:\n```\n{e}\n```"
            ))),
        }
    }
}

pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("reload", ReloadHandler)
        .describe("Reload all commands")
        .owner_only()
}
