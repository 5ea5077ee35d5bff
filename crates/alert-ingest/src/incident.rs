//! Correlates classified events into incident alerts and, when the
//! detector crosses threshold, posts the original payload to the incident
//! channel.

use std::sync::Arc;

use alert_detector::AnomalyDetector;
use alert_events::IncidentKind;
use alert_notify::Notifier;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

pub struct IncidentService {
    detector: Arc<AnomalyDetector>,
    notifier: Arc<dyn Notifier>,
}

impl IncidentService {
    pub fn new(detector: Arc<AnomalyDetector>, notifier: Arc<dyn Notifier>) -> Self {
        IncidentService { detector, notifier }
    }

    /// `kind` is `None` when the originating event didn't classify into any
    /// tracked incident kind; in that case there is nothing to correlate.
    pub async fn handle_incident(
        &self,
        kind: Option<IncidentKind>,
        ts: DateTime<Utc>,
        payload: &Value,
    ) -> bool {
        let Some(kind) = kind else {
            return false;
        };

        if !self.detector.record(kind, ts) {
            return false;
        }

        self.notifier.send_to_incident(payload).await;
        info!(kind = kind.as_str(), "incident alert sent to incident channel");
        true
    }
}
