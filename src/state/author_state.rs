//! Author-related state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name used while an author is unknown or unavailable.
pub const PLACEHOLDER_NAME: &str = "Loading...";

/// The originator of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author ID.
    #[serde(alias = "author_id")]
    pub id: String,
    /// Display name.
    #[serde(alias = "display_name")]
    pub name: String,
    /// Source platform (twitter, bluesky, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Handle on the source platform.
    #[serde(default, alias = "username", skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    /// Background the model uses when judging posts.
    #[serde(rename = "author_context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(
        default,
        with = "super::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Author {
    /// Stand-in for an author that could not be resolved.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: PLACEHOLDER_NAME.to_string(),
            platform: None,
            platform_id: None,
            context: None,
            created_at: None,
        }
    }

    /// Whether this is the unresolved stand-in.
    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_NAME
    }

    /// Up to two uppercase initials, `?` when unknown.
    pub fn initials(&self) -> String {
        if self.is_placeholder() || self.name.trim().is_empty() {
            return "?".to_string();
        }
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }

    /// `@handle` when known, otherwise the display name.
    pub fn handle(&self) -> String {
        match self.platform_id.as_deref().filter(|h| !h.is_empty()) {
            Some(handle) => format!("@{}", handle.trim_start_matches('@')),
            None => self.name.clone(),
        }
    }
}
