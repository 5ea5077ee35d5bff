use thiserror::Error;

/// Domain-level error taxonomy shared across the ingestion pipeline.
///
/// Most of these are recovered locally by the component that produces them
/// (see each crate's doc comments for where); this enum exists so the
/// recovery sites can log a consistent `kind` field instead of matching on
/// ad-hoc strings.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("malformed card: {0}")]
    MalformedCard(String),

    #[error("required configuration missing: {0}")]
    ConfigurationMissing(String),
}
