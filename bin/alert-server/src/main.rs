//! Alert routing and incident-detection pipeline server.
//!
//! Bootstraps configuration, wires the notifier (Teams webhook in
//! production, no-op in development), constructs the correlation engine and
//! the two feed handlers, starts the poller, and exposes the admin HTTP
//! surface (`/health`, `/debug/reset`, `/metrics`).

use std::net::SocketAddr;
use std::sync::Arc;

use alert_config::{AppConfig, ConfigLoader, RunMode};
use alert_detector::AnomalyDetector;
use alert_ingest::handler::{AlertHandler, MonitoringHandler};
use alert_ingest::incident::IncidentService;
use alert_ingest::poller::{ChannelConfig, FeedType, Poller};
use alert_ingest::source::{DevMessageSource, MessageSource};
use alert_notify::{NoOpNotifier, Notifier, TeamsWebhookNotifier};
use axum::{routing::get, routing::post, Json, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    poller_running: bool,
}

#[derive(Serialize)]
struct ResetResponse {
    status: String,
}

struct AppState {
    detector: Arc<AnomalyDetector>,
    poller: Arc<Poller>,
    metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    alert_common::logging::init_logging("alert-server");

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("prometheus recorder installs exactly once at startup");

    info!("starting alert routing and incident-detection pipeline");

    let config = ConfigLoader::new().load()?;
    info!(
        team_id = %config.teams.team_id,
        feed1 = %config.teams.feed1_channel_id,
        feed2 = %config.teams.feed2_channel_id,
        mode = ?config.mode,
        "configuration loaded"
    );

    let notifier = build_notifier(&config);
    let detector = Arc::new(AnomalyDetector::new());
    let incident_service = Arc::new(IncidentService::new(detector.clone(), notifier.clone()));
    let alert_handler = Arc::new(AlertHandler::new(notifier.clone(), incident_service.clone()));
    let monitoring_handler = Arc::new(MonitoringHandler::new(incident_service));

    // The upstream chat API client is a dev stand-in until a real Graph
    // client lands; it's the only message source wired here today.
    let source: Arc<dyn MessageSource> = Arc::new(DevMessageSource::new());

    let channels = vec![
        ChannelConfig {
            feed_type: FeedType::Feed1,
            channel_id: config.teams.feed1_channel_id.clone(),
        },
        ChannelConfig {
            feed_type: FeedType::Feed2,
            channel_id: config.teams.feed2_channel_id.clone(),
        },
    ];

    let poller = Arc::new(Poller::new(
        config.teams.team_id.clone(),
        channels,
        source,
        alert_handler,
        monitoring_handler,
        config.poller.page_size,
        config.poller.interval,
        config.dedup.max_size,
        config.dedup.cleanup_size,
    ));
    poller.start().await;

    let state = Arc::new(AppState {
        detector,
        poller: poller.clone(),
        metrics_handle,
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/health/live", get(|| async { Json(serde_json::json!({"status": "ok"})) }))
        .route("/health/ready", get(|| async { Json(serde_json::json!({"status": "ok"})) }))
        .route("/debug/reset", post(debug_reset))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http.port));
    info!(?addr, "admin HTTP surface starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(poller))
        .await?;

    info!("alert server stopped");
    Ok(())
}

fn build_notifier(config: &AppConfig) -> Arc<dyn Notifier> {
    if config.mode == RunMode::Production
        && !config.teams.forward_webhook_url.is_empty()
        && !config.teams.incident_webhook_url.is_empty()
    {
        Arc::new(TeamsWebhookNotifier::new(
            config.teams.forward_webhook_url.clone(),
            config.teams.incident_webhook_url.clone(),
            config.notifier_tls_verify,
        ))
    } else {
        info!("no webhook URLs configured, using no-op notifier");
        Arc::new(NoOpNotifier)
    }
}

async fn health(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<HealthResponse> {
    let poller_running =
        state.poller.state().await == alert_ingest::poller::PollerState::Running;
    Json(HealthResponse {
        status: "ok".to_string(),
        poller_running,
    })
}

async fn metrics(axum::extract::State(state): axum::extract::State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}

async fn debug_reset(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<ResetResponse> {
    state.detector.reset_state();
    state.poller.request_dedup_reset().await;
    info!("detector and dedup state reset via /debug/reset");
    Json(ResetResponse {
        status: "reset".to_string(),
    })
}

async fn shutdown_signal(poller: Arc<Poller>) {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C handler");
    info!("shutdown signal received");
    poller.stop().await;
}
