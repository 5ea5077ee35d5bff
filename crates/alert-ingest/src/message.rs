//! Wire shape of a single Teams channel message, as returned by the Graph
//! API message source. Only the fields the pipeline actually reads are
//! modeled; everything else is ignored by `serde`'s default behavior.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub from: From,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct From {
    #[serde(default)]
    pub application: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    #[serde(default, rename = "contentType")]
    pub content_type: String,
    #[serde(default)]
    pub content: String,
}
