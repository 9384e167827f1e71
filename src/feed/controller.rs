//! Paginated feed controller.
//!
//! A synchronous state machine that never performs I/O. Anything that needs
//! a network fetch returns a [`FetchTicket`]; the caller runs the fetch and
//! hands the outcome back through [`PaginatedFeed::complete`].
//!
//! Every filter change starts a new session. A ticket is honored only if it
//! is the ticket currently in flight for the current session, so responses
//! for superseded filters (or reloads) are discarded on arrival.

use super::cache::{CachedFeed, FeedCache};
use crate::news::{ErrorKind, NewsError, Page};
use crate::storage::Article;
use crate::store::Filter;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Filters remembered by the feed cache.
const CACHE_CAPACITY: usize = 16;

/// Identity of one issued page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    session: u64,
    filter: Filter,
    page: u32,
}

impl FetchTicket {
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn session(&self) -> u64 {
        self.session
    }
}

/// Outcome of handing a fetch result back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was merged into the feed (or recorded as its error).
    Applied,
    /// The ticket belongs to a superseded session; the result was dropped.
    Stale,
}

/// A fetch failure as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&NewsError> for FeedError {
    fn from(err: &NewsError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

pub struct PaginatedFeed {
    /// `None` while disabled (no filter yet, or the saved list is showing).
    filter: Option<Filter>,
    session: u64,
    articles: Arc<Vec<Article>>,
    pages_loaded: u32,
    next_page: Option<u32>,
    in_flight: Option<FetchTicket>,
    error: Option<FeedError>,
    cache: Option<FeedCache>,
}

impl PaginatedFeed {
    /// Create a disabled controller. A zero `cache_ttl` disables memoization.
    pub fn new(cache_ttl: Duration) -> Self {
        let cache = NonZeroUsize::new(CACHE_CAPACITY)
            .filter(|_| !cache_ttl.is_zero())
            .map(|capacity| FeedCache::new(capacity, cache_ttl));
        Self {
            filter: None,
            session: 0,
            articles: Arc::new(Vec::new()),
            pages_loaded: 0,
            next_page: None,
            in_flight: None,
            error: None,
            cache,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Point the controller at `filter`.
    ///
    /// A changed filter discards the feed and starts a new session: page 1 is
    /// requested unless a fresh cached feed can be restored. The saved-list
    /// sentinel disables the controller. Re-selecting the current filter is a
    /// no-op unless its feed is empty and idle.
    pub fn set_filter(&mut self, filter: &Filter, now: Instant) -> Option<FetchTicket> {
        if filter.is_saved_list() {
            if self.filter.is_some() {
                tracing::debug!("Saved list selected, disabling feed controller");
            }
            self.reset(None);
            return None;
        }

        if self.filter.as_ref() == Some(filter)
            && (self.pages_loaded > 0 || self.in_flight.is_some())
        {
            return None;
        }

        self.reset(Some(filter.clone()));

        if let Some(cached) = self
            .cache
            .as_mut()
            .and_then(|cache| cache.get(filter, now))
        {
            tracing::debug!(
                filter = %filter,
                pages = cached.pages_loaded,
                articles = cached.articles.len(),
                "Restored feed from cache"
            );
            self.articles = cached.articles;
            self.pages_loaded = cached.pages_loaded;
            self.next_page = cached.next_page;
            return None;
        }

        self.issue(1)
    }

    /// Request the next page, if there is one and nothing is in flight.
    ///
    /// Also refused while an error is showing: retries are user-initiated.
    pub fn fetch_next_page(&mut self) -> Option<FetchTicket> {
        if self.filter.is_none() || self.in_flight.is_some() || self.error.is_some() {
            return None;
        }
        let next = self.next_page?;
        self.issue(next)
    }

    /// Restart the current filter from page 1, bypassing the cache.
    pub fn reload(&mut self) -> Option<FetchTicket> {
        let filter = self.filter.clone()?;
        if let Some(cache) = self.cache.as_mut() {
            cache.invalidate(&filter);
        }
        tracing::debug!(filter = %filter, "Reloading feed");
        self.reset(Some(filter));
        self.issue(1)
    }

    /// Merge the outcome of a fetch issued by this controller.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Page, NewsError>,
        now: Instant,
    ) -> Completion {
        if self.in_flight.as_ref() != Some(ticket) {
            tracing::debug!(
                ticket_session = ticket.session,
                session = self.session,
                page = ticket.page,
                filter = %ticket.filter,
                "Discarding stale page response"
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                tracing::debug!(
                    filter = %ticket.filter,
                    page = ticket.page,
                    articles = page.articles.len(),
                    next = ?page.next_page,
                    "Page applied"
                );
                Arc::make_mut(&mut self.articles).extend(page.articles);
                self.pages_loaded = ticket.page;
                self.next_page = page.next_page;
                self.error = None;

                if let Some(cache) = self.cache.as_mut() {
                    cache.put(
                        ticket.filter.clone(),
                        CachedFeed {
                            articles: Arc::clone(&self.articles),
                            pages_loaded: self.pages_loaded,
                            next_page: self.next_page,
                        },
                        now,
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    filter = %ticket.filter,
                    page = ticket.page,
                    error = %e,
                    "Page fetch failed"
                );
                self.error = Some(FeedError::from(&e));
            }
        }

        Completion::Applied
    }

    /// Hide an upstream or network error. Configuration errors persist.
    ///
    /// Returns `true` if an error was cleared.
    pub fn dismiss_error(&mut self) -> bool {
        match &self.error {
            Some(e) if e.kind != ErrorKind::Configuration => {
                self.error = None;
                true
            }
            _ => false,
        }
    }

    /// Forget the current filter and anything in flight.
    ///
    /// The next `set_filter` starts a fresh session, even for the same filter.
    pub fn detach(&mut self) {
        tracing::debug!(session = self.session, "Detaching feed controller");
        self.reset(None);
    }

    fn reset(&mut self, filter: Option<Filter>) {
        self.session = self.session.wrapping_add(1);
        self.filter = filter;
        self.articles = Arc::new(Vec::new());
        self.pages_loaded = 0;
        self.next_page = None;
        self.in_flight = None;
        self.error = None;
    }

    fn issue(&mut self, page: u32) -> Option<FetchTicket> {
        let filter = self.filter.clone()?;
        let ticket = FetchTicket {
            session: self.session,
            filter,
            page,
        };
        tracing::debug!(
            session = ticket.session,
            filter = %ticket.filter,
            page,
            "Issuing page fetch"
        );
        self.in_flight = Some(ticket.clone());
        Some(ticket)
    }

    // ========================================================================
    // Observable state
    // ========================================================================

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.filter.is_some()
    }

    /// Flattened articles of every page loaded this session.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }

    /// First page in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|t| t.page == 1)
    }

    /// A later page in flight.
    pub fn is_fetching_next_page(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|t| t.page > 1)
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    pub fn error(&self) -> Option<&FeedError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Source;
    use crate::store::Category;
    use pretty_assertions::assert_eq;

    fn article(url: &str) -> Article {
        Article {
            source: Source {
                id: None,
                name: "Wire".to_string(),
            },
            author: None,
            title: url.to_string(),
            description: None,
            url: url.to_string(),
            url_to_image: None,
            published_at: None,
            content: None,
        }
    }

    fn page(urls: &[&str], next_page: Option<u32>) -> Page {
        Page {
            articles: urls.iter().map(|u| article(u)).collect(),
            next_page,
        }
    }

    fn urls(feed: &PaginatedFeed) -> Vec<&str> {
        feed.articles().iter().map(|a| a.url.as_str()).collect()
    }

    fn upstream(message: &str) -> NewsError {
        NewsError::Upstream {
            status: Some(500),
            message: message.to_string(),
        }
    }

    fn business() -> Filter {
        Filter::Category(Category::Business)
    }

    fn technology() -> Filter {
        Filter::Category(Category::Technology)
    }

    fn uncached() -> PaginatedFeed {
        PaginatedFeed::new(Duration::ZERO)
    }

    #[test]
    fn test_first_filter_issues_page_one() {
        let mut feed = uncached();
        assert!(!feed.is_enabled());

        let ticket = feed.set_filter(&business(), Instant::now()).unwrap();
        assert_eq!(ticket.page(), 1);
        assert_eq!(ticket.filter(), &business());
        assert!(feed.is_loading());
        assert!(!feed.is_fetching_next_page());
        assert!(feed.articles().is_empty());
    }

    #[test]
    fn test_page_one_success_makes_ready() {
        let mut feed = uncached();
        let now = Instant::now();
        let ticket = feed.set_filter(&business(), now).unwrap();

        let outcome = feed.complete(&ticket, Ok(page(&["a", "b"], Some(2))), now);

        assert_eq!(outcome, Completion::Applied);
        assert_eq!(urls(&feed), vec!["a", "b"]);
        assert!(!feed.is_loading());
        assert!(feed.has_next_page());
        assert_eq!(feed.pages_loaded(), 1);
    }

    #[test]
    fn test_next_page_appends_without_dedup() {
        let mut feed = uncached();
        let now = Instant::now();
        let first = feed.set_filter(&business(), now).unwrap();
        feed.complete(&first, Ok(page(&["a", "b"], Some(2))), now);

        let second = feed.fetch_next_page().unwrap();
        assert_eq!(second.page(), 2);
        assert!(feed.is_fetching_next_page());
        assert!(!feed.is_loading());

        feed.complete(&second, Ok(page(&["b", "c"], None)), now);
        assert_eq!(urls(&feed), vec!["a", "b", "b", "c"]);
        assert!(!feed.has_next_page());
        assert!(feed.fetch_next_page().is_none());
    }

    #[test]
    fn test_fetch_next_page_refused_while_in_flight() {
        let mut feed = uncached();
        let now = Instant::now();
        let first = feed.set_filter(&business(), now).unwrap();

        // Still loading page 1
        assert!(feed.fetch_next_page().is_none());

        feed.complete(&first, Ok(page(&["a"], Some(2))), now);
        assert!(feed.fetch_next_page().is_some());
        assert!(feed.fetch_next_page().is_none());
    }

    #[test]
    fn test_filter_change_empties_feed_immediately() {
        let mut feed = uncached();
        let now = Instant::now();
        let ticket = feed.set_filter(&business(), now).unwrap();
        feed.complete(&ticket, Ok(page(&["biz"], Some(2))), now);

        let ticket = feed.set_filter(&technology(), now).unwrap();
        assert!(feed.articles().is_empty());
        assert!(feed.is_loading());
        assert!(!feed.has_next_page());
        assert_eq!(ticket.filter(), &technology());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut feed = uncached();
        let now = Instant::now();
        let biz = feed.set_filter(&business(), now).unwrap();
        let tech = feed.set_filter(&technology(), now).unwrap();

        // Business arrives late
        assert_eq!(
            feed.complete(&biz, Ok(page(&["biz"], Some(2))), now),
            Completion::Stale
        );
        assert!(feed.articles().is_empty());
        assert!(feed.is_loading());

        assert_eq!(
            feed.complete(&tech, Ok(page(&["tech"], None)), now),
            Completion::Applied
        );
        assert_eq!(urls(&feed), vec!["tech"]);
    }

    #[test]
    fn test_stale_error_discarded() {
        let mut feed = uncached();
        let now = Instant::now();
        let biz = feed.set_filter(&business(), now).unwrap();
        let _tech = feed.set_filter(&technology(), now).unwrap();

        assert_eq!(
            feed.complete(&biz, Err(upstream("boom")), now),
            Completion::Stale
        );
        assert!(feed.error().is_none());
    }

    #[test]
    fn test_same_filter_after_round_trip_is_new_session() {
        let mut feed = uncached();
        let now = Instant::now();
        let first_biz = feed.set_filter(&business(), now).unwrap();
        feed.set_filter(&technology(), now);
        let second_biz = feed.set_filter(&business(), now).unwrap();

        assert_ne!(first_biz, second_biz);
        assert_eq!(
            feed.complete(&first_biz, Ok(page(&["old"], None)), now),
            Completion::Stale
        );
        assert_eq!(
            feed.complete(&second_biz, Ok(page(&["new"], None)), now),
            Completion::Applied
        );
        assert_eq!(urls(&feed), vec!["new"]);
    }

    #[test]
    fn test_reselecting_current_filter_is_noop() {
        let mut feed = uncached();
        let now = Instant::now();
        let ticket = feed.set_filter(&business(), now).unwrap();
        assert!(feed.set_filter(&business(), now).is_none());
        assert_eq!(
            feed.complete(&ticket, Ok(page(&["a"], None)), now),
            Completion::Applied
        );
        assert!(feed.set_filter(&business(), now).is_none());
        assert_eq!(urls(&feed), vec!["a"]);
    }

    #[test]
    fn test_page_one_failure_leaves_feed_empty() {
        let mut feed = uncached();
        let now = Instant::now();
        let ticket = feed.set_filter(&business(), now).unwrap();

        feed.complete(&ticket, Err(upstream("rate limited")), now);

        assert!(feed.articles().is_empty());
        assert!(!feed.is_loading());
        let error = feed.error().unwrap();
        assert_eq!(error.kind, ErrorKind::Upstream);
        assert_eq!(error.message, "rate limited");
    }

    #[test]
    fn test_later_page_failure_keeps_prior_pages() {
        let mut feed = uncached();
        let now = Instant::now();
        let first = feed.set_filter(&business(), now).unwrap();
        feed.complete(&first, Ok(page(&["a", "b"], Some(2))), now);
        let second = feed.fetch_next_page().unwrap();

        feed.complete(&second, Err(upstream("boom")), now);

        assert_eq!(urls(&feed), vec!["a", "b"]);
        assert!(!feed.is_fetching_next_page());
        assert!(feed.error().is_some());
        // No automatic retry while the error is showing
        assert!(feed.fetch_next_page().is_none());

        // Dismissing lets the user try again
        assert!(feed.dismiss_error());
        assert_eq!(feed.fetch_next_page().map(|t| t.page()), Some(2));
    }

    #[test]
    fn test_configuration_error_not_dismissable() {
        let mut feed = uncached();
        let now = Instant::now();
        let ticket = feed.set_filter(&business(), now).unwrap();
        feed.complete(&ticket, Err(NewsError::MissingApiKey), now);

        assert_eq!(feed.error().map(|e| e.kind), Some(ErrorKind::Configuration));
        assert!(!feed.dismiss_error());
        assert!(feed.error().is_some());
    }

    #[test]
    fn test_failed_filter_can_be_reselected() {
        let mut feed = uncached();
        let now = Instant::now();
        let ticket = feed.set_filter(&business(), now).unwrap();
        feed.complete(&ticket, Err(upstream("boom")), now);

        let retry = feed.set_filter(&business(), now).unwrap();
        assert_eq!(retry.page(), 1);
        assert!(feed.error().is_none());
    }

    #[test]
    fn test_saved_list_disables_controller() {
        let mut feed = uncached();
        let now = Instant::now();
        let biz = feed.set_filter(&business(), now).unwrap();

        assert!(feed
            .set_filter(&Filter::Category(Category::ForYou), now)
            .is_none());
        assert!(!feed.is_enabled());
        assert!(!feed.is_loading());
        assert!(feed.fetch_next_page().is_none());
        assert!(feed.reload().is_none());
        assert_eq!(
            feed.complete(&biz, Ok(page(&["a"], None)), now),
            Completion::Stale
        );
    }

    #[test]
    fn test_reload_restarts_and_invalidates_inflight() {
        let mut feed = uncached();
        let now = Instant::now();
        let first = feed.set_filter(&business(), now).unwrap();
        feed.complete(&first, Ok(page(&["a"], Some(2))), now);
        let second = feed.fetch_next_page().unwrap();

        let reloaded = feed.reload().unwrap();
        assert_eq!(reloaded.page(), 1);
        assert!(feed.articles().is_empty());
        assert_eq!(
            feed.complete(&second, Ok(page(&["late"], None)), now),
            Completion::Stale
        );
    }

    #[test]
    fn test_cache_restores_recent_filter() {
        let mut feed = PaginatedFeed::new(Duration::from_secs(300));
        let now = Instant::now();
        let biz = feed.set_filter(&business(), now).unwrap();
        feed.complete(&biz, Ok(page(&["a", "b"], Some(2))), now);
        let more = feed.fetch_next_page().unwrap();
        feed.complete(&more, Ok(page(&["c"], Some(3))), now);

        let tech = feed.set_filter(&technology(), now).unwrap();
        feed.complete(&tech, Ok(page(&["t"], None)), now);

        let later = now + Duration::from_secs(60);
        assert!(feed.set_filter(&business(), later).is_none());
        assert_eq!(urls(&feed), vec!["a", "b", "c"]);
        assert_eq!(feed.pages_loaded(), 2);
        assert_eq!(feed.fetch_next_page().map(|t| t.page()), Some(3));
    }

    #[test]
    fn test_cache_expires() {
        let mut feed = PaginatedFeed::new(Duration::from_secs(300));
        let now = Instant::now();
        let biz = feed.set_filter(&business(), now).unwrap();
        feed.complete(&biz, Ok(page(&["a"], None)), now);
        feed.set_filter(&technology(), now);

        let later = now + Duration::from_secs(301);
        let ticket = feed.set_filter(&business(), later).unwrap();
        assert_eq!(ticket.page(), 1);
        assert!(feed.articles().is_empty());
    }

    #[test]
    fn test_reload_bypasses_cache() {
        let mut feed = PaginatedFeed::new(Duration::from_secs(300));
        let now = Instant::now();
        let biz = feed.set_filter(&business(), now).unwrap();
        feed.complete(&biz, Ok(page(&["a"], None)), now);

        assert!(feed.reload().is_some());
        feed.set_filter(&technology(), now);
        assert!(feed.set_filter(&business(), now).is_some());
    }

    #[test]
    fn test_detach_orphans_inflight_ticket() {
        let mut feed = uncached();
        let now = Instant::now();
        let orphan = feed.set_filter(&business(), now).unwrap();

        feed.detach();
        assert!(!feed.is_enabled());
        assert!(!feed.is_loading());

        let fresh = feed.set_filter(&business(), now).unwrap();
        assert_ne!(fresh, orphan);
        assert_eq!(
            feed.complete(&orphan, Ok(page(&["old"], None)), now),
            Completion::Stale
        );
        assert_eq!(
            feed.complete(&fresh, Ok(page(&["new"], None)), now),
            Completion::Applied
        );
        assert_eq!(urls(&feed), vec!["new"]);
    }
}
