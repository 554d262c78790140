//! glyphbot - command framework for an emote-focused chat bot.
//!
//! Raw message text flows through [`handlers::Dispatcher`]: prefix resolution,
//! registry lookup, permission gating, typed argument parsing in [`args`] and
//! finally the command handler. Everything platform-specific sits behind the
//! traits in [`platform`].

pub mod args;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod platform;
pub mod telemetry;
