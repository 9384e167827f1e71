//! The feed store: what the user is looking at, plus what they have saved.
//!
//! Holds the active [`Filter`] and owns the [`LocalStorage`] handle for saved
//! articles and settings. All mutation goes through methods here; the UI never
//! edits filter or saved state directly.

use crate::storage::{Article, LocalStorage, SavedSet, Settings, StorageError};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use std::fmt;

// ============================================================================
// Category
// ============================================================================

/// News categories in category-bar order.
///
/// `ForYou` is the sentinel for the saved list and never reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    ForYou,
    General,
    Business,
    Technology,
    Sports,
    Health,
    Science,
    Entertainment,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::ForYou,
        Category::General,
        Category::Business,
        Category::Technology,
        Category::Sports,
        Category::Health,
        Category::Science,
        Category::Entertainment,
    ];

    /// Upstream API value. `ForYou` has none.
    pub fn api_name(self) -> Option<&'static str> {
        match self {
            Self::ForYou => None,
            Self::General => Some("general"),
            Self::Business => Some("business"),
            Self::Technology => Some("technology"),
            Self::Sports => Some("sports"),
            Self::Health => Some("health"),
            Self::Science => Some("science"),
            Self::Entertainment => Some("entertainment"),
        }
    }

    /// Label shown in the category bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::ForYou => "For You",
            Self::General => "General",
            Self::Business => "Business",
            Self::Technology => "Technology",
            Self::Sports => "Sports",
            Self::Health => "Health",
            Self::Science => "Science",
            Self::Entertainment => "Entertainment",
        }
    }

    /// Parse an API name or label (case-insensitive). "for-you", "foryou",
    /// and "saved" all select the saved list.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "for you" | "for-you" | "foryou" | "saved" => Some(Self::ForYou),
            other => Self::ALL
                .into_iter()
                .find(|c| c.api_name() == Some(other)),
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Filter
// ============================================================================

/// The active category-or-search selection. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    Category(Category),
    Search(String),
}

impl Filter {
    /// True for the saved-list sentinel, which bypasses fetching.
    pub fn is_saved_list(&self) -> bool {
        matches!(self, Filter::Category(Category::ForYou))
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Filter::Category(c) => Some(*c),
            Filter::Search(_) => None,
        }
    }

    pub fn search_query(&self) -> Option<&str> {
        match self {
            Filter::Search(q) => Some(q),
            Filter::Category(_) => None,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Category(c) => write!(f, "{}", c),
            Filter::Search(q) => write!(f, "\"{}\"", q),
        }
    }
}

// ============================================================================
// FeedStore
// ============================================================================

pub struct FeedStore {
    filter: Filter,
    /// Category restored when an empty search is submitted.
    last_category: Category,
    storage: LocalStorage,
}

impl FeedStore {
    pub fn new(initial: Category, storage: LocalStorage) -> Self {
        Self {
            filter: Filter::Category(initial),
            last_category: initial,
            storage,
        }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Select a category, clearing any search query.
    ///
    /// Returns `true` if the filter changed.
    pub fn set_category(&mut self, category: Category) -> bool {
        self.last_category = category;
        self.replace(Filter::Category(category))
    }

    /// Select a search query, clearing the category.
    ///
    /// The query is trimmed and capped. An empty query restores the last
    /// selected category. Returns `true` if the filter changed.
    pub fn set_search_query(&mut self, query: &str) -> bool {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return self.replace(Filter::Category(self.last_category));
        }
        let capped: String = trimmed.chars().take(MAX_SEARCH_QUERY_LENGTH).collect();
        self.replace(Filter::Search(capped))
    }

    fn replace(&mut self, filter: Filter) -> bool {
        if self.filter == filter {
            return false;
        }
        tracing::debug!(from = %self.filter, to = %filter, "Filter changed");
        self.filter = filter;
        true
    }

    pub fn saved(&self) -> &SavedSet {
        self.storage.saved()
    }

    pub fn is_saved(&self, url: &str) -> bool {
        self.storage.saved().is_saved(url)
    }

    /// Toggle an article's saved state; persists synchronously.
    pub fn toggle_save(&mut self, article: &Article) -> Result<bool, StorageError> {
        self.storage.toggle_save(article)
    }

    pub fn settings(&self) -> Settings {
        self.storage.settings()
    }

    /// Apply a settings change and persist it.
    pub fn update_settings(
        &mut self,
        change: impl FnOnce(&mut Settings),
    ) -> Result<Settings, StorageError> {
        let mut settings = self.storage.settings();
        change(&mut settings);
        self.storage.update_settings(settings)?;
        Ok(settings)
    }
}
