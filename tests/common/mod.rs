//! Integration test common infrastructure.
//!
//! Provides an in-memory bot with recording reply sink and reporter, plus a
//! handful of test-only commands for exercising the dispatch pipeline.

pub mod bot;
pub mod commands;

#[allow(unused_imports)]
pub use bot::{CHANNEL, GUILD, OWNER, SELF_ID, STRANGER, TestBot};
