//! Decides whether a raw-feed error event should be forwarded to the
//! general error-feed channel, independent of whether it also crosses an
//! incident threshold.

use alert_events::RawErrorEvent;

const FORWARD_FAILURE_REASONS: [&str; 4] = [
    "AUDIO_PIPELINE_FAILED",
    "VIDEO_PIPELINE_FAILED",
    "TIMEOUT",
    "API_ERROR",
];

const SPECIAL_FORWARD_KEYWORDS: [&str; 2] = ["VIDEO_QUEUE_FULL", "VT5001"];

/// `true` iff the event's failure reason is on the forwarding whitelist, or
/// any special keyword appears as a substring of the combined message text.
pub fn should_forward(event: &RawErrorEvent) -> bool {
    if let Some(reason) = event.failure_reason.as_deref() {
        if FORWARD_FAILURE_REASONS.contains(&reason) {
            return true;
        }
    }

    let blob = format!(
        "{} {} {}",
        event.error_message,
        event.error_detail,
        event.cause_or_stack_trace.as_deref().unwrap_or("")
    );

    SPECIAL_FORWARD_KEYWORDS
        .iter()
        .any(|keyword| blob.contains(keyword))
}
