//! Owner-only maintenance commands: `reload`, `throw`, `stats`.

pub mod reload;
pub mod stats;
pub mod throw;

pub use reload::ReloadHandler;
pub use stats::StatsHandler;
pub use throw::ThrowHandler;
