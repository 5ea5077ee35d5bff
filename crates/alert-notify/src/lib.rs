//! Outbound notification: the [`Notifier`] port and its two implementations.

pub mod notifier;
pub mod teams;

pub use notifier::{NoOpNotifier, Notifier};
pub use teams::TeamsWebhookNotifier;
