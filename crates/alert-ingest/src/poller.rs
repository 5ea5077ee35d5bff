//! Single-threaded cooperative dispatch loop. Exactly one tokio task ever
//! mutates the dedup tracker and the per-channel checkpoints; the admin
//! surface's reset request reaches that state through a channel rather
//! than a lock, since nothing else may touch it directly.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};
use tokio::time::interval;
use tracing::{info, warn};

use crate::dedup::DedupTracker;
use crate::handler::{AlertHandler, MonitoringHandler};
use crate::parser::{is_card_attachment, is_webhook_origin, parse_card};
use crate::source::MessageSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Running,
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedType {
    Feed1,
    Feed2,
}

#[derive(Clone)]
pub struct ChannelConfig {
    pub feed_type: FeedType,
    pub channel_id: String,
}

pub struct Poller {
    team_id: String,
    channels: Arc<Vec<ChannelConfig>>,
    source: Arc<dyn MessageSource>,
    alert_handler: Arc<AlertHandler>,
    monitoring_handler: Arc<MonitoringHandler>,
    page_size: u32,
    poll_interval: Duration,
    dedup_max_size: usize,
    dedup_cleanup_size: usize,
    state: Arc<RwLock<PollerState>>,
    reset_tx: Arc<RwLock<Option<mpsc::UnboundedSender<()>>>>,
}

impl Poller {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        team_id: String,
        channels: Vec<ChannelConfig>,
        source: Arc<dyn MessageSource>,
        alert_handler: Arc<AlertHandler>,
        monitoring_handler: Arc<MonitoringHandler>,
        page_size: u32,
        poll_interval: Duration,
        dedup_max_size: usize,
        dedup_cleanup_size: usize,
    ) -> Self {
        Poller {
            team_id,
            channels: Arc::new(channels),
            source,
            alert_handler,
            monitoring_handler,
            page_size,
            poll_interval,
            dedup_max_size,
            dedup_cleanup_size,
            state: Arc::new(RwLock::new(PollerState::Idle)),
            reset_tx: Arc::new(RwLock::new(None)),
        }
    }

    /// Queues a request to clear dedup state on the next tick of the
    /// dispatch loop. Used by the admin `/debug/reset` handler, which runs
    /// on a different task and must not touch dedup state directly. A
    /// no-op while the poller isn't running.
    pub async fn request_dedup_reset(&self) {
        if let Some(tx) = self.reset_tx.read().await.as_ref() {
            let _ = tx.send(());
        }
    }

    pub async fn state(&self) -> PollerState {
        *self.state.read().await
    }

    pub async fn start(&self) {
        {
            let mut state = self.state.write().await;
            if *state == PollerState::Running {
                warn!("poller already running");
                return;
            }
            *state = PollerState::Running;
        }

        let (reset_tx, mut reset_rx) = mpsc::unbounded_channel();
        *self.reset_tx.write().await = Some(reset_tx);

        info!(team_id = %self.team_id, channels = self.channels.len(), "starting message poller");

        let team_id = self.team_id.clone();
        let channels = self.channels.clone();
        let source = self.source.clone();
        let alert_handler = self.alert_handler.clone();
        let monitoring_handler = self.monitoring_handler.clone();
        let page_size = self.page_size;
        let poll_interval = self.poll_interval;
        let dedup_max_size = self.dedup_max_size;
        let dedup_cleanup_size = self.dedup_cleanup_size;
        let state = self.state.clone();
        let reset_tx_slot = self.reset_tx.clone();

        tokio::spawn(async move {
            let now = Utc::now();
            let mut checkpoints: HashMap<String, DateTime<Utc>> =
                channels.iter().map(|c| (c.channel_id.clone(), now)).collect();

            let mut dedup = DedupTracker::new(dedup_max_size, dedup_cleanup_size);
            let mut tick = interval(poll_interval);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if *state.read().await != PollerState::Running {
                            break;
                        }
                        run_tick(
                            &team_id,
                            &channels,
                            &source,
                            &alert_handler,
                            &monitoring_handler,
                            page_size,
                            &mut checkpoints,
                            &mut dedup,
                        ).await;
                    }
                    Some(()) = reset_rx.recv() => {
                        dedup.clear();
                        info!("dedup state reset via admin request");
                    }
                }
            }

            *reset_tx_slot.write().await = None;
            *state.write().await = PollerState::Idle;
        });
    }

    pub async fn stop(&self) {
        let mut state = self.state.write().await;
        *state = PollerState::Stopping;
        info!("poller stop requested");
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_tick(
    team_id: &str,
    channels: &[ChannelConfig],
    source: &Arc<dyn MessageSource>,
    alert_handler: &Arc<AlertHandler>,
    monitoring_handler: &Arc<MonitoringHandler>,
    page_size: u32,
    checkpoints: &mut HashMap<String, DateTime<Utc>>,
    dedup: &mut DedupTracker,
) {
    for channel in channels {
        let since = checkpoints.get(&channel.channel_id).copied();
        let messages = source
            .get_messages(team_id, &channel.channel_id, since, page_size)
            .await;

        for message in messages {
            dispatch_message(channel.feed_type, &message, alert_handler, monitoring_handler, dedup).await;
        }

        checkpoints.insert(channel.channel_id.clone(), Utc::now());
    }
}

async fn dispatch_message(
    feed_type: FeedType,
    message: &crate::message::Message,
    alert_handler: &Arc<AlertHandler>,
    monitoring_handler: &Arc<MonitoringHandler>,
    dedup: &mut DedupTracker,
) {
    let feed_label = match feed_type {
        FeedType::Feed1 => "feed1",
        FeedType::Feed2 => "feed2",
    };
    metrics::counter!("poller.messages_seen_total", "feed" => feed_label).increment(1);

    if dedup.seen(&message.id) {
        metrics::counter!("poller.messages_deduped_total", "feed" => feed_label).increment(1);
        return;
    }

    if !is_webhook_origin(message) {
        return;
    }

    if !is_card_attachment(message) {
        return;
    }

    let Some(card) = parse_card(message) else {
        warn!(message_id = %message.id, "failed to parse card from webhook message");
        return;
    };

    let payload = card.as_object();
    match feed_type {
        FeedType::Feed1 => {
            alert_handler.handle_raw(payload).await;
        }
        FeedType::Feed2 => {
            monitoring_handler.handle_monitoring(payload).await;
        }
    }

    metrics::counter!("poller.messages_dispatched_total", "feed" => feed_label).increment(1);
    dedup.mark(&message.id);
}
