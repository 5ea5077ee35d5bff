//! The two feed-specific handlers: raw error-feed alerts (feed-1) and
//! real-time monitoring reports (feed-2). Both re-parse the card the
//! poller already validated, enforcing "validate at the trust boundary"
//! uniformly for any future caller that skips the poller.

use std::sync::Arc;

use alert_common::Card;
use alert_detector::should_forward;
use alert_events::{MonitoringEvent, RawErrorEvent};
use alert_notify::Notifier;
use serde_json::Value;
use tracing::warn;

use crate::incident::IncidentService;

pub struct AlertHandler {
    notifier: Arc<dyn Notifier>,
    incident_service: Arc<IncidentService>,
}

impl AlertHandler {
    pub fn new(notifier: Arc<dyn Notifier>, incident_service: Arc<IncidentService>) -> Self {
        AlertHandler { notifier, incident_service }
    }

    /// Returns whether the payload was forwarded to the general error feed.
    /// The incident service is invoked unconditionally regardless of the
    /// forwarding outcome.
    pub async fn handle_raw(&self, payload: Value) -> bool {
        let card = match Card::from_value(payload.clone()) {
            Ok(card) => card,
            Err(e) => {
                warn!(error = %e, "invalid raw alert payload");
                return false;
            }
        };

        let event = RawErrorEvent::from_card(&card);

        let forwarded = if should_forward(&event) {
            self.notifier.send_to_forward(&payload).await;
            true
        } else {
            false
        };

        self.incident_service
            .handle_incident(event.classify(), event.timestamp(), &payload)
            .await;

        forwarded
    }
}

pub struct MonitoringHandler {
    incident_service: Arc<IncidentService>,
}

impl MonitoringHandler {
    pub fn new(incident_service: Arc<IncidentService>) -> Self {
        MonitoringHandler { incident_service }
    }

    /// Returns whether this report crossed an incident threshold.
    pub async fn handle_monitoring(&self, payload: Value) -> bool {
        let card = match Card::from_value(payload.clone()) {
            Ok(card) => card,
            Err(e) => {
                warn!(error = %e, "invalid monitoring payload");
                return false;
            }
        };

        let event = MonitoringEvent::from_card(&card);
        let kind = event.classify();
        if kind.is_none() {
            return false;
        }

        self.incident_service
            .handle_incident(kind, event.timestamp(), &payload)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_detector::AnomalyDetector;
    use alert_notify::NoOpNotifier;

    fn card_payload(facts: &[(&str, &str)]) -> Value {
        let facts_json: Vec<_> = facts
            .iter()
            .map(|(name, value)| serde_json::json!({ "name": name, "value": value }))
            .collect();
        serde_json::json!({ "sections": [ { "facts": facts_json } ] })
    }

    fn alert_handler() -> AlertHandler {
        let incident_service = Arc::new(IncidentService::new(
            Arc::new(AnomalyDetector::new()),
            Arc::new(NoOpNotifier),
        ));
        AlertHandler::new(Arc::new(NoOpNotifier), incident_service)
    }

    #[tokio::test]
    async fn whitelisted_failure_reason_forwards() {
        let handler = alert_handler();
        let payload = card_payload(&[("Error Detail", "Failure Reason: TIMEOUT")]);
        assert!(handler.handle_raw(payload).await);
    }

    #[tokio::test]
    async fn unknown_failure_reason_does_not_forward() {
        let handler = alert_handler();
        let payload = card_payload(&[("Error Detail", "Failure Reason: UNKNOWN_THING")]);
        assert!(!handler.handle_raw(payload).await);
    }

    #[tokio::test]
    async fn invalid_payload_returns_false_without_panicking() {
        let handler = alert_handler();
        assert!(!handler.handle_raw(serde_json::json!([1, 2, 3])).await);
    }

    #[tokio::test]
    async fn monitoring_handler_returns_false_for_unclassified_description() {
        let incident_service = Arc::new(IncidentService::new(
            Arc::new(AnomalyDetector::new()),
            Arc::new(NoOpNotifier),
        ));
        let handler = MonitoringHandler::new(incident_service);
        let payload = serde_json::json!({
            "title": "Monitoring",
            "sections": [ { "facts": [ { "name": "Description", "value": "all clear" } ] } ]
        });
        assert!(!handler.handle_monitoring(payload).await);
    }
}
