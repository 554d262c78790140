//! Test-only commands.

#![allow(dead_code)]

use async_trait::async_trait;
use glyphbot::args::{ArgKind, ArgumentDef, ParsedArgs};
use glyphbot::error::{CommandError, CommandResult};
use glyphbot::handlers::core::CommandFactory;
use glyphbot::handlers::{CommandDescriptor, CommandHandler, Context};
use glyphbot::platform::Capability;

/// Every test command, registered under category `test`.
#[allow(dead_code)]
pub const ALL: &[CommandFactory] = &[echo, fail, boom, guarded, needsbot, serveronly];

pub struct Echo;

#[async_trait]
impl CommandHandler for Echo {
    async fn handle(&self, ctx: &Context, args: &ParsedArgs) -> CommandResult {
        let text = args.text("text").unwrap_or_default();
        let suffix = if args.flag("loud") { "!" } else { "" };
        ctx.reply(format!("{text}{suffix}")).await?;
        Ok(())
    }
}

pub fn echo() -> CommandDescriptor {
    CommandDescriptor::new("echo", Echo)
        .aliases(["say"])
        .describe("Repeat the input")
        .arg(ArgumentDef::new("text", ArgKind::Text).remainder())
        .flag("loud", "Add emphasis")
}

/// Fails with an unclassified error that mentions the harness secret.
pub struct Fail;

#[async_trait]
impl CommandHandler for Fail {
    async fn handle(&self, _ctx: &Context, _args: &ParsedArgs) -> CommandResult {
        Err(CommandError::Internal(anyhow::anyhow!(
            "database login failed with password {}",
            super::bot::SECRET
        )))
    }
}

pub fn fail() -> CommandDescriptor {
    CommandDescriptor::new("fail", Fail).describe("Always fails")
}

pub struct Boom;

#[async_trait]
impl CommandHandler for Boom {
    async fn handle(&self, _ctx: &Context, _args: &ParsedArgs) -> CommandResult {
        panic!("handler exploded");
    }
}

pub fn boom() -> CommandDescriptor {
    CommandDescriptor::new("boom", Boom).describe("Panics")
}

pub struct Okay;

#[async_trait]
impl CommandHandler for Okay {
    async fn handle(&self, ctx: &Context, _args: &ParsedArgs) -> CommandResult {
        ctx.reply("ok").await?;
        Ok(())
    }
}

pub fn guarded() -> CommandDescriptor {
    CommandDescriptor::new("guarded", Okay)
        .describe("Needs Manage Emojis")
        .user_permissions([Capability::ManageEmojis])
}

pub fn needsbot() -> CommandDescriptor {
    CommandDescriptor::new("needsbot", Okay)
        .describe("Bot needs Embed Links")
        .client_permissions([Capability::EmbedLinks])
}

pub fn serveronly() -> CommandDescriptor {
    CommandDescriptor::new("serveronly", Okay)
        .describe("Guild only")
        .guild_only()
}
