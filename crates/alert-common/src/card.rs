//! Card model — a semi-structured record carrying an optional title, an
//! optional summary, and an ordered sequence of sections, each with an
//! ordered sequence of `(name, value)` facts.
//!
//! This mirrors the MessageCard shape the upstream chat API embeds as the
//! `content` of an O365-connector-card attachment (see `alert-ingest`'s
//! message parser). Unknown fields are tolerated and ignored; the struct is
//! immutable once constructed.

use serde::Deserialize;

use crate::error::AlertError;

/// A single `(name, value)` fact inside a [`Section`].
#[derive(Debug, Clone, Deserialize)]
pub struct Fact {
    pub name: String,
    pub value: String,
}

/// One section of a [`Card`]; we only care about the activity title and the
/// fact list, so everything else the upstream payload carries is dropped by
/// `serde`'s default "ignore unknown fields" behavior.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Section {
    #[serde(default, rename = "activityTitle")]
    pub activity_title: Option<String>,
    #[serde(default)]
    pub facts: Vec<Fact>,
}

/// A parsed alert card. Construct via [`Card::parse`] or [`Card::from_value`];
/// there is no public constructor that takes already-validated fields because
/// a `Card` is only ever meaningful as "what came off the wire."
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Card {
    /// Parse a card from a raw JSON string, as it arrives inside an
    /// attachment's `content` field.
    pub fn parse(raw: &str) -> Result<Card, AlertError> {
        serde_json::from_str(raw).map_err(|e| AlertError::MalformedCard(e.to_string()))
    }

    /// Parse a card from an already-decoded JSON value (the poller's trust
    /// boundary re-validation path hits this after the handler receives
    /// `card.as_object()`).
    pub fn from_value(value: serde_json::Value) -> Result<Card, AlertError> {
        serde_json::from_value(value).map_err(|e| AlertError::MalformedCard(e.to_string()))
    }

    /// Re-encode the card as a JSON object, for handlers that need to pass
    /// the validated structure back through another parse boundary (the
    /// poller hands `card.as_object()` to the per-feed handler, which
    /// re-parses it to enforce "validate at the trust boundary" uniformly).
    pub fn as_object(&self) -> serde_json::Value {
        serde_json::json!({
            "title": self.title,
            "summary": self.summary,
            "sections": self.sections.iter().map(|s| serde_json::json!({
                "activityTitle": s.activity_title,
                "facts": s.facts.iter().map(|f| serde_json::json!({
                    "name": f.name,
                    "value": f.value,
                })).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
        })
    }

    /// Scan sections in order, facts in order, and return the first value
    /// whose name exactly equals `name`. No normalization is performed here
    /// — HTML-tag stripping, if a consumer needs it for display, happens
    /// downstream.
    pub fn get_fact(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .flat_map(|section| section.facts.iter())
            .find(|fact| fact.name == name)
            .map(|fact| fact.value.as_str())
    }
}
