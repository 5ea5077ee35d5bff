//! Upstream timestamps arrive in a non-standard zoned shape, e.g.
//! `2025-12-09T20:10:51.796441041Z[Etc/UTC]`. We split at the first `Z`,
//! normalize the fractional component to exactly 6 digits (chrono wants
//! microsecond precision, not the 9-digit nanosecond precision the source
//! sometimes sends), and parse as UTC. Any failure — missing input,
//! unparseable text — falls back to "now in UTC" rather than propagating,
//! per the source system's `_parse_event_datetime`.

use chrono::{DateTime, NaiveDateTime, Utc};

pub fn parse_event_time(raw: &str) -> DateTime<Utc> {
    parse_event_time_inner(raw).unwrap_or_else(Utc::now)
}

fn parse_event_time_inner(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }

    let before_z = raw.split('Z').next()?;
    let normalized = match before_z.split_once('.') {
        Some((date_part, frac)) => {
            let mut frac = frac.to_string();
            frac.truncate(6.min(frac.len()));
            while frac.len() < 6 {
                frac.push('0');
            }
            format!("{date_part}.{frac}")
        }
        None => before_z.to_string(),
    };

    let naive = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;

    Some(DateTime::from_naive_utc_and_offset(naive, Utc))
}
