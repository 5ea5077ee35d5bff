//! The closed set of incident categories the anomaly detector tracks
//! independently, plus the static per-kind threshold table it reads
//! (thresholds are data, not control flow — adding a kind here never
//! touches the detector's branch logic).

use std::time::Duration;

/// A failure category the correlation engine watches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentKind {
    Timeout,
    ApiError,
    LiveApiDbOverload,
    YtDownloadFail,
    YtExternalFail,
}

impl IncidentKind {
    /// All variants, in a stable order — used by the detector to size its
    /// per-kind state map up front.
    pub const ALL: [IncidentKind; 5] = [
        IncidentKind::Timeout,
        IncidentKind::ApiError,
        IncidentKind::LiveApiDbOverload,
        IncidentKind::YtDownloadFail,
        IncidentKind::YtExternalFail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentKind::Timeout => "TIMEOUT",
            IncidentKind::ApiError => "API_ERROR",
            IncidentKind::LiveApiDbOverload => "LIVE_API_DB_OVERLOAD",
            IncidentKind::YtDownloadFail => "YT_DOWNLOAD_FAIL",
            IncidentKind::YtExternalFail => "YT_EXTERNAL_FAIL",
        }
    }
}

/// Threshold configuration for a single [`IncidentKind`]. `window` and
/// `window_count` gate the sliding-window branch; `same_minute_count` gates
/// the same-minute branch. A kind may use either branch, or both.
#[derive(Debug, Clone, Copy)]
pub struct IncidentThreshold {
    pub window: Option<Duration>,
    pub window_count: usize,
    pub same_minute_count: Option<usize>,
    pub cooldown: Duration,
}

/// Static per-kind threshold table, matching the source system's
/// `INCIDENT_THRESHOLDS` dict exactly.
pub fn threshold_for(kind: IncidentKind) -> IncidentThreshold {
    match kind {
        IncidentKind::Timeout => IncidentThreshold {
            window: Some(Duration::from_secs(60 * 60)),
            window_count: 3,
            same_minute_count: None,
            cooldown: Duration::from_secs(10 * 60),
        },
        IncidentKind::ApiError => IncidentThreshold {
            window: Some(Duration::from_secs(5 * 60)),
            window_count: 5,
            same_minute_count: Some(3),
            cooldown: Duration::from_secs(5 * 60),
        },
        IncidentKind::LiveApiDbOverload => IncidentThreshold {
            window: None,
            window_count: 0,
            same_minute_count: Some(3),
            cooldown: Duration::from_secs(5 * 60),
        },
        IncidentKind::YtDownloadFail => IncidentThreshold {
            window: Some(Duration::from_secs(30 * 60)),
            window_count: 3,
            same_minute_count: None,
            cooldown: Duration::from_secs(10 * 60),
        },
        IncidentKind::YtExternalFail => IncidentThreshold {
            window: Some(Duration::from_secs(30 * 60)),
            window_count: 3,
            same_minute_count: None,
            cooldown: Duration::from_secs(10 * 60),
        },
    }
}
