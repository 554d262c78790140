//! Command handlers.
//!
//! [`core`] holds the command model, registry and dispatch pipeline. The
//! remaining modules each hold one category of built-in commands; the module
//! name is the category every command in it is registered under.

pub mod core;
pub mod emotes;
pub mod misc;
pub mod owner;
pub mod settings;

pub use self::core::{
    CommandDescriptor, CommandHandler, CommandSource, Context, Dispatcher, Outcome, Registry,
    StaticSource,
};

/// Constructor table for every built-in command.
pub fn builtin_source() -> StaticSource {
    StaticSource::new()
        .group("misc", &[misc::help::command, misc::ping::command])
        .group("settings", &[settings::prefixes::command, settings::setprefix::command])
        .group(
            "emotes",
            &[
                emotes::emojiinfo::command,
                emotes::delete::command,
                emotes::rename::command,
            ],
        )
        .group(
            "owner",
            &[owner::reload::command, owner::throw::command, owner::stats::command],
        )
}
