//! Per-kind sliding-window and same-minute correlation, with a cooldown
//! gate on the emitted alert. State is process-local and mutated from a
//! single dispatch loop in steady state, but the detector is still wrapped
//! in a lock because the admin surface's `/debug/reset` handler reaches it
//! from a different task.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::info;

use alert_events::{threshold_for, IncidentKind};

const MINUTE_BUCKET_RETENTION: Duration = Duration::from_secs(2 * 60 * 60);

fn minute_key(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

#[derive(Default)]
struct KindState {
    window: VecDeque<DateTime<Utc>>,
    minute_counts: HashMap<String, usize>,
    last_alert: Option<DateTime<Utc>>,
}

struct DetectorState {
    kinds: HashMap<IncidentKind, KindState>,
}

impl Default for DetectorState {
    fn default() -> Self {
        let mut kinds = HashMap::new();
        for kind in IncidentKind::ALL {
            kinds.insert(kind, KindState::default());
        }
        DetectorState { kinds }
    }
}

/// Correlates individual incident events into alert decisions. Shared via
/// `Arc` between the poller's dispatch loop and the admin HTTP surface.
pub struct AnomalyDetector {
    state: Mutex<DetectorState>,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        AnomalyDetector {
            state: Mutex::new(DetectorState::default()),
        }
    }

    /// Record one occurrence of `kind` at `ts` and decide whether it crosses
    /// the alert threshold. Returns `true` exactly when this call should
    /// result in a downstream notification.
    pub fn record(&self, kind: IncidentKind, ts: DateTime<Utc>) -> bool {
        metrics::counter!("detector.events_recorded_total", "kind" => kind.as_str()).increment(1);

        let threshold = threshold_for(kind);
        let mut state = self.state.lock();
        let kind_state = state.kinds.entry(kind).or_default();

        let mut triggered = false;

        if let Some(window) = threshold.window {
            if threshold.window_count > 0 {
                let cutoff = ts - chrono::Duration::from_std(window).unwrap_or_default();
                while matches!(kind_state.window.front(), Some(front) if *front <= cutoff) {
                    kind_state.window.pop_front();
                }
                kind_state.window.push_back(ts);
                if kind_state.window.len() >= threshold.window_count {
                    triggered = true;
                }
            }
        }

        if let Some(same_minute_count) = threshold.same_minute_count {
            let retain_cutoff = minute_key(
                ts - chrono::Duration::from_std(MINUTE_BUCKET_RETENTION).unwrap_or_default(),
            );
            kind_state
                .minute_counts
                .retain(|key, _| key.as_str() >= retain_cutoff.as_str());

            let key = minute_key(ts);
            let count = kind_state.minute_counts.entry(key).or_insert(0);
            *count += 1;
            if *count >= same_minute_count {
                triggered = true;
            }
        }

        if !triggered {
            return false;
        }

        let cooldown = chrono::Duration::from_std(threshold.cooldown).unwrap_or_default();
        if let Some(last) = kind_state.last_alert {
            if ts - last < cooldown {
                info!(kind = kind.as_str(), "incident threshold met but in cooldown window");
                return false;
            }
        }

        kind_state.last_alert = Some(ts);
        metrics::counter!("detector.alerts_triggered_total", "kind" => kind.as_str()).increment(1);
        info!(kind = kind.as_str(), timestamp = %ts, "incident threshold crossed, alerting");
        true
    }

    /// Clear all per-kind state. Used by tests and the `/debug/reset` admin
    /// endpoint.
    pub fn reset_state(&self) {
        *self.state.lock() = DetectorState::default();
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}
