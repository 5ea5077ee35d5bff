//! The feed-1 (live-api) domain event: a structured error report carried in
//! a card's facts.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use alert_common::Card;

use crate::incident_kind::IncidentKind;
use crate::timestamp::parse_event_time;

fn failure_reason_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Failure Reason:\s*([A-Z0-9_]+)").expect("valid regex"))
}

/// A parsed live-api error report.
#[derive(Debug, Clone)]
pub struct RawErrorEvent {
    pub project: String,
    pub error_message: String,
    pub error_detail: String,
    pub time: String,
    pub failure_reason: Option<String>,
    pub cause_or_stack_trace: Option<String>,
}

impl RawErrorEvent {
    /// Lift the event out of a card's facts. Every field defaults to an
    /// empty string when the fact is absent — we never fail parsing this
    /// model, only the card itself can fail upstream.
    pub fn from_card(card: &Card) -> Self {
        let error_detail = card.get_fact("Error Detail").unwrap_or("").to_string();
        let failure_reason = failure_reason_pattern()
            .captures(&error_detail)
            .map(|caps| caps[1].to_string());

        RawErrorEvent {
            project: card.get_fact("Project").unwrap_or("").to_string(),
            error_message: card.get_fact("Error Message").unwrap_or("").to_string(),
            error_detail,
            time: card.get_fact("Time").unwrap_or("").to_string(),
            failure_reason,
            cause_or_stack_trace: card.get_fact("Cause or Stack Trace").map(String::from),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        parse_event_time(&self.time)
    }

    /// Only `TIMEOUT` and `API_ERROR` failure reasons map to a tracked
    /// incident kind; anything else (including no failure reason at all)
    /// is not correlated.
    pub fn classify(&self) -> Option<IncidentKind> {
        match self.failure_reason.as_deref() {
            Some("TIMEOUT") => Some(IncidentKind::Timeout),
            Some("API_ERROR") => Some(IncidentKind::ApiError),
            _ => None,
        }
    }
}
