//! Tag model and its request payloads.

use serde::{Deserialize, Serialize};

/// A tag as stored. The tag name is the store key and is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub related_tags: Vec<String>,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds of the last update
    pub updated_at: Option<i64>,
}

/// Request body for creating a tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTagRequest {
    pub related_tags: Vec<String>,
}

/// Request body for updating a tag.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTagRequest {
    #[serde(default)]
    pub related_tags: Option<Vec<String>>,
}

/// Body of `DELETE /tags`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTags {
    pub deleted_tags: Vec<String>,
}

/// Body of `DELETE /tags/{name}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTag {
    pub deleted_tag: String,
}
