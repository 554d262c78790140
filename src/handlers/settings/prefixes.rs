//! `prefixes`: list the prefixes valid for the caller.
//!
//! Three raw arguments are treated as `setprefix <scope> <action> <prefix>`.

use super::format_prefixes;
use crate::args::ParsedArgs;
use crate::error::CommandResult;
use crate::handlers::core::{CommandDescriptor, CommandHandler, Context};
use async_trait::async_trait;

/// Handler for the `prefixes` command.
pub struct PrefixesHandler;

#[async_trait]
impl CommandHandler for PrefixesHandler {
    async fn handle(&self, ctx: &Context, _args: &ParsedArgs) -> CommandResult {
        if ctx.raw_args.len() == 3
            && let Some(setprefix) = ctx.registry.find("setprefix")
        {
            return ctx.execute(&setprefix).await;
        }

        let mut out = format!(
            "**Prefixes**\nYou can change or add new prefixes with `{}setprefix`",
            ctx.prefix
        );
        if !ctx.prefixes.guild.is_empty() {
            out.push_str(&format!(
                "\n\n**Server**\n{}",
                format_prefixes(&ctx.prefixes.guild, "\n")
            ));
        }
        if !ctx.prefixes.user.is_empty() {
            out.push_str(&format!(
                "\n\n**Own**\n{}",
                format_prefixes(&ctx.prefixes.user, "\n")
            ));
        }
        if ctx.prefixes.all.is_empty() {
            out.push_str(&format!(
                "\n\n**Default**\n`{}`",
                ctx.config.bot.default_prefix
            ));
        }
        out.push_str("\n\nHint: In case you ever forget my prefix, just mention me!");

        ctx.reply(out).await?;
        Ok(())
    }
}

pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("prefixes", PrefixesHandler)
        .aliases(["prefix", "p"])
        .describe("Get a list of available prefixes")
}
