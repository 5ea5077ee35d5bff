//! Teams-webhook `Notifier`: posts the already-validated card JSON straight
//! through to a configured incoming-webhook URL. There are two webhook
//! endpoints — one per downstream channel — since the forward feed and the
//! incident feed are operationally distinct audiences.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::error;

use crate::notifier::Notifier;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TeamsWebhookNotifier {
    client: Client,
    forward_url: String,
    incident_url: String,
}

impl TeamsWebhookNotifier {
    pub fn new(forward_url: String, incident_url: String, verify_tls: bool) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .expect("reqwest client configuration is always valid");

        TeamsWebhookNotifier {
            client,
            forward_url,
            incident_url,
        }
    }

    async fn post(&self, url: &str, target: &str, card: &Value) -> bool {
        let response = match self.client.post(url).json(card).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, url = %url, "failed to reach Teams webhook");
                metrics::counter!("notifier.webhook_failures_total", "target" => target.to_string()).increment(1);
                return false;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, url = %url, "Teams webhook returned error");
            metrics::counter!("notifier.webhook_failures_total", "target" => target.to_string()).increment(1);
            return false;
        }

        metrics::counter!("notifier.webhook_successes_total", "target" => target.to_string()).increment(1);
        true
    }
}

#[async_trait]
impl Notifier for TeamsWebhookNotifier {
    async fn send_to_forward(&self, card: &Value) -> bool {
        self.post(&self.forward_url, "forward", card).await
    }

    async fn send_to_incident(&self, card: &Value) -> bool {
        self.post(&self.incident_url, "incident", card).await
    }
}
