//! General purpose commands: `help`, `ping`.

pub mod help;
pub mod ping;

pub use help::HelpHandler;
pub use ping::PingHandler;
