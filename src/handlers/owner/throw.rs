//! `throw [error]`: raise an unclassified fault to exercise error reporting.

use crate::args::{ArgKind, ArgumentDef, ParsedArgs};
use crate::error::{CommandError, CommandResult};
use crate::handlers::core::{CommandDescriptor, CommandHandler, Context};
use async_trait::async_trait;

/// Handler for the `throw` command.
pub struct ThrowHandler;

#[async_trait]
impl CommandHandler for ThrowHandler {
    async fn handle(&self, _ctx: &Context, args: &ParsedArgs) -> CommandResult {
        let message = args.text("error").unwrap_or("Method not implemented");
        Err(CommandError::Internal(anyhow::anyhow!("{message}")))
    }
}

pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("throw", ThrowHandler)
        .describe("Test command error handling")
        .arg(
            ArgumentDef::new("error", ArgKind::Text)
                .optional()
                .remainder(),
        )
        .owner_only()
}
