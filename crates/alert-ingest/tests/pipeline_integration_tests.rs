//! End-to-end integration tests for the ingestion pipeline:
//!
//! Poller → message parser → feed handler → incident service → detector → notifier
//!
//! These exercise the full wiring a service binary assembles, rather than
//! any single component in isolation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use alert_detector::AnomalyDetector;
use alert_ingest::handler::{AlertHandler, MonitoringHandler};
use alert_ingest::incident::IncidentService;
use alert_ingest::message::{Attachment, From, Message};
use alert_ingest::poller::{ChannelConfig, FeedType, Poller, PollerState};
use alert_ingest::source::DevMessageSource;
use alert_notify::Notifier;

/// Records every card handed to either outbound channel, for assertions.
#[derive(Default)]
struct RecordingNotifier {
    forward_count: AtomicUsize,
    incident_count: AtomicUsize,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_to_forward(&self, _card: &Value) -> bool {
        self.forward_count.fetch_add(1, Ordering::SeqCst);
        true
    }

    async fn send_to_incident(&self, _card: &Value) -> bool {
        self.incident_count.fetch_add(1, Ordering::SeqCst);
        true
    }
}

fn webhook_card(id: &str, content: Value) -> Message {
    Message {
        id: id.to_string(),
        from: From { application: Some(serde_json::json!({"displayName": "vt-error-feed"})) },
        attachments: vec![Attachment {
            content_type: "application/vnd.microsoft.teams.card.o365connector".to_string(),
            content: content.to_string(),
        }],
    }
}

fn raw_error_card(id: &str, time: &str, failure_reason: &str) -> Message {
    webhook_card(
        id,
        serde_json::json!({
            "sections": [ { "facts": [
                { "name": "Project", "value": "dubbing-api" },
                { "name": "Error Detail", "value": format!("Failure Reason: {failure_reason}") },
                { "name": "Time", "value": time },
            ] } ]
        }),
    )
}

fn monitoring_card(id: &str, time: &str, description: &str) -> Message {
    webhook_card(
        id,
        serde_json::json!({
            "title": "Monitoring",
            "sections": [ { "facts": [
                { "name": "Description", "value": description },
                { "name": "Time", "value": time },
            ] } ]
        }),
    )
}

#[tokio::test]
async fn raw_feed_forwards_and_triggers_incident_after_three_timeouts_in_window() {
    let notifier: Arc<RecordingNotifier> = Arc::new(RecordingNotifier::default());
    let detector = Arc::new(AnomalyDetector::new());
    let incident_service = Arc::new(IncidentService::new(detector, notifier.clone()));
    let alert_handler = AlertHandler::new(notifier.clone(), incident_service);

    let base = "2025-01-01T12:00:00Z";
    let plus_20 = "2025-01-01T12:20:00Z";
    let plus_40 = "2025-01-01T12:40:00Z";

    let card1 = serde_json::json!({
        "sections": [ { "facts": [
            { "name": "Error Detail", "value": "Failure Reason: TIMEOUT" },
            { "name": "Time", "value": base },
        ] } ]
    });
    let card2 = serde_json::json!({
        "sections": [ { "facts": [
            { "name": "Error Detail", "value": "Failure Reason: TIMEOUT" },
            { "name": "Time", "value": plus_20 },
        ] } ]
    });
    let card3 = serde_json::json!({
        "sections": [ { "facts": [
            { "name": "Error Detail", "value": "Failure Reason: TIMEOUT" },
            { "name": "Time", "value": plus_40 },
        ] } ]
    });

    assert!(alert_handler.handle_raw(card1).await, "TIMEOUT is whitelisted and always forwards");
    assert!(alert_handler.handle_raw(card2).await);
    assert!(alert_handler.handle_raw(card3).await);

    assert_eq!(notifier.forward_count.load(Ordering::SeqCst), 3);
    // third event crosses the 3-in-60-minutes window for TIMEOUT
    assert_eq!(notifier.incident_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn monitoring_feed_triggers_incident_after_three_matches_in_one_minute() {
    let notifier: Arc<RecordingNotifier> = Arc::new(RecordingNotifier::default());
    let detector = Arc::new(AnomalyDetector::new());
    let incident_service = Arc::new(IncidentService::new(detector, notifier.clone()));
    let monitoring_handler = MonitoringHandler::new(incident_service);

    let description = "영상 생성 실패 - 더빙/오디오 생성 실패";
    let times = ["2025-01-01T00:00:00Z", "2025-01-01T00:00:10Z", "2025-01-01T00:00:20Z"];

    let mut last = false;
    for time in times {
        let payload = serde_json::json!({
            "title": "Monitoring",
            "sections": [ { "facts": [
                { "name": "Description", "value": description },
                { "name": "Time", "value": time },
            ] } ]
        });
        last = monitoring_handler.handle_monitoring(payload).await;
    }

    assert!(last, "third same-minute event should cross the threshold");
    assert_eq!(notifier.incident_count.load(Ordering::SeqCst), 1);
    assert_eq!(notifier.forward_count.load(Ordering::SeqCst), 0, "monitoring feed never uses the forward channel");
}

#[tokio::test]
async fn unclassified_raw_error_is_dropped_with_no_notifier_calls() {
    let notifier: Arc<RecordingNotifier> = Arc::new(RecordingNotifier::default());
    let detector = Arc::new(AnomalyDetector::new());
    let incident_service = Arc::new(IncidentService::new(detector, notifier.clone()));
    let alert_handler = AlertHandler::new(notifier.clone(), incident_service);

    let payload = serde_json::json!({
        "sections": [ { "facts": [
            { "name": "Error Detail", "value": "Failure Reason: ENGINE_ERROR" },
            { "name": "Time", "value": "2025-01-01T00:00:00Z" },
        ] } ]
    });

    assert!(!alert_handler.handle_raw(payload).await);
    assert_eq!(notifier.forward_count.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.incident_count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn poller_drains_both_feeds_through_the_full_pipeline_with_dedup() {
    let notifier: Arc<RecordingNotifier> = Arc::new(RecordingNotifier::default());
    let detector = Arc::new(AnomalyDetector::new());
    let incident_service = Arc::new(IncidentService::new(detector, notifier.clone()));
    let alert_handler = Arc::new(AlertHandler::new(notifier.clone(), incident_service.clone()));
    let monitoring_handler = Arc::new(MonitoringHandler::new(incident_service));

    let source = Arc::new(DevMessageSource::new());
    source.seed(
        "feed1-channel",
        vec![raw_error_card("raw-1", "2025-01-01T00:00:00Z", "AUDIO_PIPELINE_FAILED")],
    );
    source.seed(
        "feed2-channel",
        vec![monitoring_card("mon-1", "2025-01-01T00:00:00Z", "all systems normal")],
    );

    let message_source: Arc<dyn alert_ingest::source::MessageSource> = source.clone();
    let poller = Arc::new(Poller::new(
        "team-1".to_string(),
        vec![
            ChannelConfig { feed_type: FeedType::Feed1, channel_id: "feed1-channel".to_string() },
            ChannelConfig { feed_type: FeedType::Feed2, channel_id: "feed2-channel".to_string() },
        ],
        message_source,
        alert_handler,
        monitoring_handler,
        10,
        Duration::from_millis(20),
        1000,
        500,
    ));

    poller.start().await;
    assert_eq!(poller.state().await, PollerState::Running);

    // let a couple of ticks run; the dev source keeps returning the same
    // seeded messages, so dedup must keep the handler call count at one.
    tokio::time::sleep(Duration::from_millis(80)).await;
    poller.stop().await;
    tokio::time::sleep(Duration::from_millis(40)).await;

    assert_eq!(notifier.forward_count.load(Ordering::SeqCst), 1, "raw card dispatched exactly once despite dedup");
    assert_eq!(notifier.incident_count.load(Ordering::SeqCst), 0, "unmatched monitoring description never alerts");
}
