//! Emote commands.

pub mod delete;
pub mod emojiinfo;
pub mod rename;

pub use delete::DeleteHandler;
pub use emojiinfo::EmojiInfoHandler;
pub use rename::RenameHandler;
