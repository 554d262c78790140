//! `stats [--metrics]`: command usage since startup.

use crate::args::ParsedArgs;
use crate::error::CommandResult;
use crate::handlers::core::report::truncate;
use crate::handlers::core::{CommandDescriptor, CommandHandler, Context};
use async_trait::async_trait;

/// Room left for the metrics dump after the usage table.
const MAX_METRICS_CHARS: usize = 1500;

/// Handler for the `stats` command.
pub struct StatsHandler;

#[async_trait]
impl CommandHandler for StatsHandler {
    async fn handle(&self, ctx: &Context, args: &ParsedArgs) -> CommandResult {
        let stats = ctx.registry.command_stats();
        let mut out = format!("**Command usage** ({} commands loaded)", ctx.registry.len());
        if stats.is_empty() {
            out.push_str("\nNo commands used yet.");
        }
        for (name, count) in &stats {
            out.push_str(&format!("\n`{name}`: {count}"));
        }

        if args.flag("metrics") {
            let metrics = crate::metrics::gather_metrics();
            out.push_str(&format!(
                "\n\n```\n{}\n```",
                truncate(metrics.trim_end(), MAX_METRICS_CHARS)
            ));
        }

        ctx.reply(out).await?;
        Ok(())
    }
}

pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("stats", StatsHandler)
        .describe("Show command usage counts")
        .flag("metrics", "Append the raw Prometheus metrics")
        .owner_only()
}
