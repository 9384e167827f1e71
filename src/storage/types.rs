use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors from the durable local storage file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access storage file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode storage file: {0}")]
    Encode(#[from] serde_json::Error),
}

// ============================================================================
// Article
// ============================================================================

/// Publisher of an article as reported by the news API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: Option<String>,
    pub name: String,
}

/// A normalized news article.
///
/// `url` is the identity key everywhere: saving, list keys, de-duplication.
/// Field names serialize in the upstream camelCase shape so the storage file
/// reads the same as an API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub source: Source,
    pub author: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub content: Option<String>,
}

// ============================================================================
// Settings
// ============================================================================

/// Card layout for the article list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }

    /// Number of card columns rendered for this mode.
    pub fn columns(self) -> usize {
        match self {
            Self::Grid => 2,
            Self::List => 1,
        }
    }
}

/// Display preferences persisted alongside saved articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub dark_mode: bool,
    /// One line per article instead of a card with description.
    pub compact_mode: bool,
    pub view_mode: ViewMode,
}
