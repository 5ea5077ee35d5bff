//! Outbound notification port. The core pipeline only ever depends on this
//! trait; which downstream channel actually receives a card is a wiring
//! concern decided in the bootstrap binary.

use async_trait::async_trait;
use serde_json::Value;

/// Sends parsed cards onward to whichever chat channel operators watch.
/// Both operations are fire-and-forget from the core's perspective: the
/// returned boolean is only used for logging, never for control flow.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_to_forward(&self, card: &Value) -> bool;
    async fn send_to_incident(&self, card: &Value) -> bool;
}

/// Used when no webhook URL is configured (local development). Accepts
/// everything, sends nothing.
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn send_to_forward(&self, _card: &Value) -> bool {
        true
    }

    async fn send_to_incident(&self, _card: &Value) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_op_notifier_reports_success_without_sending() {
        let notifier = NoOpNotifier;
        assert!(notifier.send_to_forward(&serde_json::json!({})).await);
        assert!(notifier.send_to_incident(&serde_json::json!({})).await);
    }
}
