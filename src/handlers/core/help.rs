//! Help text formatting.
//!
//! Owner-only commands never appear in output generated for non-owners.

use super::traits::CommandDescriptor;
use std::sync::Arc;

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn visible(cmd: &CommandDescriptor, is_owner: bool) -> bool {
    is_owner || !cmd.owner_only
}

/// `{prefix}{name} <required> [optional]`
pub fn format_usage(cmd: &CommandDescriptor, prefix: &str) -> String {
    let mut usage = format!("{prefix}{}", cmd.name);
    for def in cmd.args.args() {
        if def.is_optional() {
            usage.push_str(&format!(" [{}]", def.key));
        } else {
            usage.push_str(&format!(" <{}>", def.key));
        }
    }
    usage
}

/// `(key, description)` per argument. Choices are appended as `One of a|b`;
/// the type label is used when nothing else describes the argument.
pub fn arg_list(cmd: &CommandDescriptor) -> Vec<(String, String)> {
    cmd.args
        .args()
        .iter()
        .map(|def| {
            let mut text = def.description.clone().unwrap_or_default();
            if !def.choices.is_empty() {
                let choices = format!("One of {}", def.choices.join("|"));
                if text.is_empty() {
                    text = choices;
                } else {
                    text = format!("{text} ({choices})");
                }
            }
            if text.is_empty() {
                text = def.kind.label().to_string();
            }
            (def.key.clone(), text)
        })
        .collect()
}

/// Detail text for one command, or `None` if hidden from this caller.
pub fn command_help(cmd: &CommandDescriptor, prefix: &str, is_owner: bool) -> Option<String> {
    if !visible(cmd, is_owner) {
        return None;
    }

    let permissions = if cmd.user_permissions.is_empty() {
        "None".to_string()
    } else {
        let names: Vec<String> = cmd
            .user_permissions
            .iter()
            .map(|c| c.display_name())
            .collect();
        format!("`{}`", names.join("`, `"))
    };

    let mut out = format!(
        "**{}**\nGuild only: {}\nRequired Permissions: {permissions}\n",
        cmd.name,
        if cmd.guild_only { "yes" } else { "no" },
    );
    if !cmd.aliases.is_empty() {
        out.push_str(&format!("Aliases: `{}`\n", cmd.aliases.join("`, `")));
    }
    out.push_str(&format!(
        "\n**Description**\n{}\n\n**Usage**\n`{}`",
        cmd.description,
        format_usage(cmd, prefix)
    ));

    let args = arg_list(cmd);
    if !args.is_empty() {
        out.push_str("\n\n**Arguments**");
        for (key, text) in args {
            out.push_str(&format!("\n**{key}:** `{text}`"));
        }
    }
    if !cmd.args.flags().is_empty() {
        out.push_str("\n\n**Flags**");
        for flag in cmd.args.flags() {
            out.push_str(&format!("\n`--{}`: {}", flag.name, flag.description));
        }
    }
    Some(out)
}

/// Command list of one category, or `None` if nothing in it is visible.
pub fn category_help(
    commands: &[Arc<CommandDescriptor>],
    category: &str,
    prefix: &str,
    invoked_as: &str,
    is_owner: bool,
) -> Option<String> {
    let category = category.to_lowercase();
    let lines: Vec<String> = commands
        .iter()
        .filter(|c| c.category == category && visible(c, is_owner))
        .map(|c| format!("`{}`: {}", c.name, c.description))
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(format!(
        "**{}**\nUse `{prefix}{invoked_as} command` for more info on a command\n\n{}",
        title_case(&format!("{category} help")),
        lines.join("\n")
    ))
}

/// Overview of every visible category and its commands.
pub fn main_menu(
    commands: &[Arc<CommandDescriptor>],
    prefix: &str,
    invoked_as: &str,
    is_owner: bool,
) -> String {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for cmd in commands.iter().filter(|c| visible(c, is_owner)) {
        match groups.iter_mut().find(|(cat, _)| *cat == cmd.category) {
            Some((_, names)) => names.push(cmd.name.as_str()),
            None => groups.push((cmd.category.as_str(), vec![cmd.name.as_str()])),
        }
    }

    let mut out = format!(
        "**Help**\nUse `{prefix}{invoked_as} command / category` for more info on a command or category"
    );
    for (category, names) in groups {
        out.push_str(&format!("\n\n**{category}**\n`{}`", names.join("`,`")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{ArgKind, ArgumentDef, ParsedArgs};
    use crate::error::CommandResult;
    use crate::handlers::core::{CommandHandler, Context};
    use crate::platform::Capability;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn handle(&self, _ctx: &Context, _args: &ParsedArgs) -> CommandResult {
            Ok(())
        }
    }

    fn setprefix() -> CommandDescriptor {
        CommandDescriptor::new("setprefix", Noop)
            .category("settings")
            .describe("Change prefix")
            .arg(
                ArgumentDef::new("scope", ArgKind::Text)
                    .choices(["server", "user"])
                    .describe("prefix scope"),
            )
            .arg(ArgumentDef::new("action", ArgKind::Text).choices(["add", "remove", "set"]))
            .arg(ArgumentDef::new("prefix", ArgKind::Text).default_value("!"))
            .user_permissions([Capability::ManageGuild])
    }

    #[test]
    fn test_usage_line() {
        assert_eq!(
            format_usage(&setprefix(), "!"),
            "!setprefix <scope> <action> [prefix]"
        );
    }

    #[test]
    fn test_arg_list_descriptions() {
        let list = arg_list(&setprefix());
        assert_eq!(list[0].1, "prefix scope (One of server|user)");
        assert_eq!(list[1].1, "One of add|remove|set");
        assert_eq!(list[2].1, "text");
    }

    #[test]
    fn test_owner_only_hidden() {
        let secret = CommandDescriptor::new("throw", Noop).category("owner").owner_only();
        assert!(command_help(&secret, "!", false).is_none());
        assert!(command_help(&secret, "!", true).is_some());

        let cmds = vec![Arc::new(setprefix()), Arc::new(secret)];
        let menu = main_menu(&cmds, "!", "help", false);
        assert!(menu.contains("setprefix"));
        assert!(!menu.contains("throw"));
        assert!(category_help(&cmds, "owner", "!", "help", false).is_none());
        let owner = category_help(&cmds, "Owner", "!", "help", true).unwrap();
        assert!(owner.starts_with("**Owner Help**"));
    }

    #[test]
    fn test_command_help_lists_permissions() {
        let text = command_help(&setprefix(), "?", false).unwrap();
        assert!(text.contains("Required Permissions: `Manage Guild`"));
        assert!(text.contains("`?setprefix <scope> <action> [prefix]`"));
    }
}
