//! `ping`: round trip of one reply plus one edit.

use crate::args::ParsedArgs;
use crate::error::CommandResult;
use crate::handlers::core::{CommandDescriptor, CommandHandler, Context};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::time::Instant;

const RESPONSES: &[&str] = &[
    "Created emotes",
    "Downloaded emotes",
    "Pinged fbi.gov",
    "Patted catgirls",
    "Ate donuts",
    "Bought muffins",
    "Wrote a discord bot",
    "Did my homework",
];

/// Handler for the `ping` command.
pub struct PingHandler;

#[async_trait]
impl CommandHandler for PingHandler {
    async fn handle(&self, ctx: &Context, _args: &ParsedArgs) -> CommandResult {
        let start = Instant::now();
        ctx.reply("Pinging...").await?;
        let ms = start.elapsed().as_millis();

        let response = RESPONSES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("Pong");
        ctx.edit(format!("{response} in `{ms}ms`")).await?;
        Ok(())
    }
}

pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("ping", PingHandler)
        .aliases(["ms"])
        .describe("Ping!")
}
