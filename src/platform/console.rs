//! Console transport: replies go to stdout.

use super::{Message, PlatformError, ReplySink, SentMessage};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prints every reply and edit to stdout. Consent requests are declined.
pub struct ConsoleReplies {
    next_id: AtomicU64,
}

impl ConsoleReplies {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for ConsoleReplies {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplySink for ConsoleReplies {
    async fn reply(&self, to: &Message, content: &str) -> Result<SentMessage, PlatformError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        println!("[#{id}] {content}");
        Ok(SentMessage {
            id,
            channel_id: to.channel_id,
            content: content.to_string(),
        })
    }

    async fn edit(&self, sent: &SentMessage, content: &str) -> Result<SentMessage, PlatformError> {
        println!("[#{} edited] {content}", sent.id);
        Ok(SentMessage {
            content: content.to_string(),
            ..sent.clone()
        })
    }
}
