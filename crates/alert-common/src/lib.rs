//! Shared types for the alert-routing pipeline: the [`Card`] wire model,
//! the domain error taxonomy, and structured logging setup. A
//! dependency-light leaf every other crate in the workspace depends on.

pub mod card;
pub mod error;
pub mod logging;

pub use card::{Card, Fact, Section};
pub use error::AlertError;
