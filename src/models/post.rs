//! Post model and its request payloads.

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

/// Calendar date bucket a post was created in, zero-padded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl Entry {
    /// Calendar decomposition of `at` in its own time zone.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self {
            year: format!("{:04}", at.year()),
            month: format!("{:02}", at.month()),
            day: format!("{:02}", at.day()),
        }
    }

    /// Exact string comparison; `"1"` does not match `"01"`.
    pub fn matches(&self, year: &str, month: &str, day: &str) -> bool {
        self.year == year && self.month == month && self.day == day
    }
}

/// A blog post as stored. The post id is the store key and is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub tags: Vec<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub is_draft: bool,
    /// Epoch milliseconds; also the post id
    pub created_at: i64,
    pub entry: Entry,
    /// Epoch milliseconds of the last update
    pub updated_at: Option<i64>,
}

impl Post {
    /// Every tag on the post is contained in `allowed`. Untagged posts always qualify.
    pub fn tags_within(&self, allowed: &[String]) -> bool {
        self.tags.iter().all(|tag| allowed.contains(tag))
    }
}

/// Request body for creating a new post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePostRequest {
    pub tags: Vec<String>,
    /// Required key; `null` is allowed
    #[serde(deserialize_with = "Option::deserialize")]
    pub title: Option<String>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub body: Option<String>,
    #[serde(default = "default_draft")]
    pub is_draft: bool,
}

fn default_draft() -> bool {
    true
}

/// Request body for a partial post update.
///
/// `title` and `body` distinguish "absent" (`None`) from an explicit
/// `null` (`Some(None)`), which clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub body: Option<Option<String>>,
    #[serde(default)]
    pub is_draft: Option<bool>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
