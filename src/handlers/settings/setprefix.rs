//! `setprefix <server|user> <add|remove|set> [prefix]`.

use super::format_prefixes;
use crate::args::{ArgKind, ArgumentDef, ParsedArgs};
use crate::config::MAX_PREFIX_LEN;
use crate::error::{ArgumentError, CommandError, CommandResult};
use crate::handlers::core::{CommandDescriptor, CommandHandler, Context};
use crate::platform::{Actor, Capability, Scope};
use async_trait::async_trait;
use tracing::info;

/// Prefix list mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Remove,
    Set,
}

impl Action {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            "set" => Some(Self::Set),
            _ => None,
        }
    }
}

/// Apply `action` to `current`. Returns the new list and whether the default
/// had to be re-enabled because the list became empty.
pub fn apply(
    mut current: Vec<String>,
    action: Action,
    prefix: &str,
    default_prefix: &str,
) -> Result<(Vec<String>, bool), ArgumentError> {
    let exists = current.iter().any(|p| p == prefix);
    match action {
        Action::Add => {
            if exists {
                return Err(ArgumentError::custom("This prefix already exists"));
            }
            current.push(prefix.to_string());
        }
        Action::Remove => {
            if !exists {
                return Err(ArgumentError::custom("This prefix does not exist"));
            }
            current.retain(|p| p != prefix);
            if current.is_empty() {
                return Ok((vec![default_prefix.to_string()], true));
            }
        }
        Action::Set => current = vec![prefix.to_string()],
    }
    Ok((current, false))
}

/// Handler for the `setprefix` command.
pub struct SetPrefixHandler;

#[async_trait]
impl CommandHandler for SetPrefixHandler {
    async fn handle(&self, ctx: &Context, args: &ParsedArgs) -> CommandResult {
        let scope = args.text("scope").ok_or_else(|| ArgumentError::Missing {
            expected: "prefix scope".into(),
        })?;
        let action_raw = args.text("action").unwrap_or_default();
        let action = Action::parse(action_raw).ok_or_else(|| ArgumentError::NotAChoice {
            choices: vec!["add".into(), "remove".into(), "set".into()],
            received: action_raw.to_string(),
        })?;

        let default_prefix = &ctx.config.bot.default_prefix;
        let prefix = args
            .text("prefix")
            .map(str::to_lowercase)
            .unwrap_or_else(|| default_prefix.clone());
        if prefix.chars().count() > MAX_PREFIX_LEN {
            return Err(ArgumentError::custom(format!(
                "Prefixes can be at most {MAX_PREFIX_LEN} characters long"
            ))
            .into());
        }

        let settings = &ctx.platform.settings;
        let (current, target) = if scope == "server" {
            let Scope::Guild { guild_id, .. } = ctx.scope else {
                return Err(CommandError::rejected(format!(
                    "This command can only be used on a server. Perhaps you meant `{}{} user {action_raw} {prefix}`?",
                    ctx.prefix, ctx.command_name
                )));
            };
            let missing = ctx
                .platform
                .capabilities
                .missing_capabilities(
                    &[Capability::ManageGuild],
                    Actor::Caller(ctx.author_id()),
                    &ctx.scope,
                )
                .await?;
            if !missing.is_empty() {
                return Err(CommandError::caller_permission(missing));
            }
            (settings.guild_prefixes(guild_id).await?, Some(guild_id))
        } else {
            (settings.user_prefixes(ctx.author_id()).await?, None)
        };

        let current = match current {
            Some(list) if !list.is_empty() => list,
            _ => vec![default_prefix.clone()],
        };
        let (updated, reset) = apply(current, action, &prefix, default_prefix)?;

        match target {
            Some(guild_id) => settings.set_guild_prefixes(guild_id, updated.clone()).await?,
            None => settings.set_user_prefixes(ctx.author_id(), updated.clone()).await?,
        }
        info!(user = ctx.author_id(), scope = %scope, ?action, prefixes = ?updated, "Prefixes updated");

        let reply = if reset {
            format!(
                "Done. That was the last prefix, so I re-enabled the default prefix `{}`",
                updated[0]
            )
        } else {
            format!(
                "Done! Current {scope} prefixes: {}",
                format_prefixes(&updated, ", ")
            )
        };
        ctx.reply(reply).await?;
        Ok(())
    }
}

pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("setprefix", SetPrefixHandler)
        .aliases(["setp", "sp"])
        .describe("Change prefix")
        .arg(
            ArgumentDef::new("scope", ArgKind::Text)
                .choices(["server", "user"])
                .describe("prefix scope"),
        )
        .arg(ArgumentDef::new("action", ArgKind::Text).choices(["add", "remove", "set"]))
        .arg(
            ArgumentDef::new("prefix", ArgKind::Text)
                .optional()
                .describe("new prefix"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_add_rejects_existing() {
        let err = apply(list(&["!"]), Action::Add, "!", "!").unwrap_err();
        assert_eq!(err.to_string(), "This prefix already exists");
        let (updated, reset) = apply(list(&["!"]), Action::Add, "?", "!").unwrap();
        assert_eq!(updated, list(&["!", "?"]));
        assert!(!reset);
    }

    #[test]
    fn test_remove_last_reenables_default() {
        let (updated, reset) = apply(list(&["?"]), Action::Remove, "?", "!").unwrap();
        assert_eq!(updated, list(&["!"]));
        assert!(reset);
        let err = apply(list(&["?"]), Action::Remove, "x", "!").unwrap_err();
        assert_eq!(err.to_string(), "This prefix does not exist");
    }

    #[test]
    fn test_set_replaces() {
        let (updated, _) = apply(list(&["!", "?"]), Action::Set, "e!", "!").unwrap();
        assert_eq!(updated, list(&["e!"]));
    }
}
