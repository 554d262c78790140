//! `help [name]`: main menu, command detail or category listing.

use crate::args::{ArgKind, ArgumentDef, ParsedArgs};
use crate::error::{CommandError, CommandResult};
use crate::handlers::core::help::{category_help, command_help, main_menu};
use crate::handlers::core::{CommandDescriptor, CommandHandler, Context};
use async_trait::async_trait;

/// Handler for the `help` command.
pub struct HelpHandler;

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, ctx: &Context, args: &ParsedArgs) -> CommandResult {
        let is_owner = ctx.is_owner();
        let commands = ctx.registry.commands();

        let Some(name) = args.text("name") else {
            ctx.reply(main_menu(&commands, &ctx.prefix, &ctx.command_name, is_owner))
                .await?;
            return Ok(());
        };

        if let Some(text) = ctx
            .registry
            .find(name)
            .and_then(|cmd| command_help(&cmd, &ctx.prefix, is_owner))
        {
            ctx.reply(text).await?;
            return Ok(());
        }

        if let Some(text) = category_help(&commands, name, &ctx.prefix, &ctx.command_name, is_owner)
        {
            ctx.reply(text).await?;
            return Ok(());
        }

        Err(CommandError::rejected(format!(
            "Sorry, no command or category with name `{name}` found."
        )))
    }
}

pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("help", HelpHandler)
        .aliases(["h", "command"])
        .describe("Get help on command usage")
        .arg(
            ArgumentDef::new("name", ArgKind::Text)
                .optional()
                .describe("command name / category"),
        )
}
