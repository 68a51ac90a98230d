//! Post-related state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing status of a post on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    #[serde(alias = "processing")]
    Pending,
    Completed,
    Error,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Completed => write!(f, "Completed"),
            Self::Error => write!(f, "Error"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// An ingested social-media post under analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post ID.
    #[serde(rename = "tweet_process_id", alias = "id")]
    pub id: String,
    /// Post text.
    #[serde(
        rename = "tweet_content",
        default,
        deserialize_with = "super::de::null_as_default"
    )]
    pub content: String,
    /// Author foreign key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    /// When the post was submitted for processing.
    #[serde(default, with = "super::timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
    /// When processing finished.
    #[serde(
        default,
        with = "super::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    /// Processing status.
    #[serde(default, deserialize_with = "super::de::null_as_default")]
    pub status: PostStatus,
    /// Processing error, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether the post was judged to move markets.
    #[serde(default, deserialize_with = "super::de::null_as_default")]
    pub market_effect: bool,
}

impl Post {
    /// Author foreign key, ignoring blank values.
    pub fn author_key(&self) -> Option<&str> {
        self.author_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Content shortened to `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> String {
        if self.content.chars().count() <= max_chars {
            self.content.clone()
        } else {
            let cut: String = self.content.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{cut}...")
        }
    }
}
