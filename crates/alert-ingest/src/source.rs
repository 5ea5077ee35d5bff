//! Abstracts the upstream chat API the poller requests messages from. The
//! development stand-in below is an in-memory, seedable substitute for a
//! real external client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::message::Message;

#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn get_messages(
        &self,
        team_id: &str,
        channel_id: &str,
        since: Option<DateTime<Utc>>,
        top: u32,
    ) -> Vec<Message>;
}

/// In-memory message source for local development and tests. Messages are
/// seeded per channel and returned in insertion order, capped at `top`.
#[derive(Default)]
pub struct DevMessageSource {
    channels: Mutex<std::collections::HashMap<String, Vec<Message>>>,
}

impl DevMessageSource {
    pub fn new() -> Self {
        DevMessageSource::default()
    }

    pub fn seed(&self, channel_id: &str, messages: Vec<Message>) {
        self.channels.lock().insert(channel_id.to_string(), messages);
    }
}

#[async_trait]
impl MessageSource for DevMessageSource {
    async fn get_messages(
        &self,
        _team_id: &str,
        channel_id: &str,
        _since: Option<DateTime<Utc>>,
        top: u32,
    ) -> Vec<Message> {
        self.channels
            .lock()
            .get(channel_id)
            .map(|messages| messages.iter().take(top as usize).cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::From;

    fn message(id: &str) -> Message {
        Message {
            id: id.to_string(),
            from: From::default(),
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn seeded_messages_are_returned_capped_at_top() {
        let source = DevMessageSource::new();
        source.seed("c1", vec![message("a"), message("b"), message("c")]);

        let messages = source.get_messages("team", "c1", None, 2).await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, "a");
        assert_eq!(messages[1].id, "b");
    }

    #[tokio::test]
    async fn unseeded_channel_returns_empty() {
        let source = DevMessageSource::new();
        assert!(source.get_messages("team", "unknown", None, 10).await.is_empty());
    }
}
