//! Domain event model for the alert-routing pipeline: the two feed-specific
//! event shapes ([`RawErrorEvent`], [`MonitoringEvent`]), the closed
//! [`IncidentKind`] taxonomy they classify into, and the timestamp parser
//! both event types share.

pub mod error_event;
pub mod incident_kind;
pub mod monitoring_event;
pub mod timestamp;

pub use error_event::RawErrorEvent;
pub use incident_kind::{threshold_for, IncidentKind, IncidentThreshold};
pub use monitoring_event::MonitoringEvent;
pub use timestamp::parse_event_time;
