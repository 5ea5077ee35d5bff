//! The feed-2 (real-time monitoring) domain event: a free-text title and
//! description, classified by Korean-language keyword match rather than a
//! structured failure-reason field.

use chrono::{DateTime, Utc};

use alert_common::Card;

use crate::incident_kind::IncidentKind;
use crate::timestamp::parse_event_time;

/// A parsed real-time monitoring report.
#[derive(Debug, Clone)]
pub struct MonitoringEvent {
    pub title: String,
    pub description: String,
    pub time: String,
}

impl MonitoringEvent {
    pub fn from_card(card: &Card) -> Self {
        MonitoringEvent {
            title: card.title.clone().unwrap_or_default(),
            description: card.get_fact("Description").unwrap_or("").to_string(),
            time: card.get_fact("Time").unwrap_or("").to_string(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        parse_event_time(&self.time)
    }

    /// Keyword match is case-insensitive and substring-based, matching the
    /// source system's three phrase checks exactly. The dubbing/audio
    /// generation phrase is checked first; the remaining two are an
    /// either-or into the same kind.
    pub fn classify(&self) -> Option<IncidentKind> {
        let description = self.description.to_lowercase();

        if description.contains("더빙/오디오 생성 실패") {
            Some(IncidentKind::LiveApiDbOverload)
        } else if description.contains("youtube url 다운로드 실패") {
            Some(IncidentKind::YtDownloadFail)
        } else if description.contains("외부 url 다운로드 실패")
            || description.contains("video 파일 업로드 실패")
        {
            Some(IncidentKind::YtExternalFail)
        } else {
            None
        }
    }
}
