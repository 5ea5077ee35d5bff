//! Ingestion pipeline: the upstream message source abstraction, structural
//! message parsing, deduplication, the two feed handlers, the incident
//! service that bridges handlers to the correlation engine, and the
//! per-tick poller that drives all of it.

pub mod dedup;
pub mod handler;
pub mod incident;
pub mod message;
pub mod parser;
pub mod poller;
pub mod source;

pub use dedup::DedupTracker;
pub use handler::{AlertHandler, MonitoringHandler};
pub use incident::IncidentService;
pub use message::Message;
pub use poller::{ChannelConfig, FeedType, Poller, PollerState};
pub use source::{DevMessageSource, MessageSource};
