use crate::feed::{FetchTicket, PaginatedFeed, ScrollTrigger};
use crate::news::{NewsClient, NewsError, Page};
use crate::storage::{Article, Settings};
use crate::store::{Category, FeedStore, Filter};
use crate::theme::{ColorPalette, ThemeVariant};
use std::borrow::Cow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Rows of the settings panel, in display order.
pub const SETTINGS_ITEMS: [&str; 3] = ["Dark mode", "Compact mode", "View mode"];

// ============================================================================
// View and Event Types
// ============================================================================

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Browse,   // Header, category bar and article cards
    Reader,   // Full-screen article detail
    Settings, // Display preferences panel
}

/// Events from background tasks
pub enum AppEvent {
    /// A page fetch finished (successfully or not).
    ///
    /// Carries the ticket it was issued for so the feed controller can
    /// discard results belonging to a superseded filter.
    PageLoaded {
        ticket: FetchTicket,
        result: Result<Page, NewsError>,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked (e.g., "page_fetch")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub news: NewsClient,
    pub store: FeedStore,
    pub feed: PaginatedFeed,
    /// Keyed by (url of last article, pages loaded) so a page that filters
    /// down to nothing still re-arms the trigger.
    pub scroll: ScrollTrigger<(String, u32)>,

    // Theme
    pub theme_variant: ThemeVariant,
    pub palette: ColorPalette,

    // UI State
    pub view: View,
    pub selected: usize,
    /// First card row drawn; maintained by the card renderer.
    pub list_offset: usize,
    /// Whether the last card was on screen in the most recent frame.
    pub last_item_visible: bool,
    pub reader_scroll: usize,
    pub reader_visible_lines: usize,
    pub settings_selected: usize,
    pub show_help: bool,

    // Search
    pub search_mode: bool,
    pub search_input: String,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
    pub spinner_frame: usize,

    /// Page fetch tasks that may still be running. Superseded fetches are
    /// left to finish; the controller discards their results as stale.
    pub fetch_tasks: Vec<JoinHandle<()>>,
}

impl App {
    pub fn new(news: NewsClient, store: FeedStore, cache_ttl: Duration) -> Self {
        let theme_variant = ThemeVariant::from_dark_mode(store.settings().dark_mode);
        Self {
            news,
            store,
            feed: PaginatedFeed::new(cache_ttl),
            scroll: ScrollTrigger::new(),
            theme_variant,
            palette: theme_variant.palette(),
            view: View::Browse,
            selected: 0,
            list_offset: 0,
            last_item_visible: false,
            reader_scroll: 0,
            reader_visible_lines: 0,
            settings_selected: 0,
            show_help: false,
            search_mode: false,
            search_input: String::new(),
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            fetch_tasks: Vec::new(),
        }
    }

    // ========================================================================
    // Feed
    // ========================================================================

    /// Bring the feed controller in line with the store's filter.
    ///
    /// Called once at startup and after every filter change.
    pub fn sync_filter(&mut self) -> Option<FetchTicket> {
        let filter = self.store.filter().clone();
        self.scroll.reset();
        self.selected = 0;
        self.list_offset = 0;
        self.feed.set_filter(&filter, std::time::Instant::now())
    }

    pub fn set_category(&mut self, category: Category) -> Option<FetchTicket> {
        if !self.store.set_category(category) {
            return None;
        }
        self.sync_filter()
    }

    /// Submit the search box. An empty query returns to the last category.
    pub fn submit_search(&mut self, query: &str) -> Option<FetchTicket> {
        if !self.store.set_search_query(query) {
            return None;
        }
        self.sync_filter()
    }

    /// Drop the active search, returning to the last category.
    pub fn clear_search(&mut self) -> Option<FetchTicket> {
        if self.store.filter().search_query().is_none() {
            return None;
        }
        self.search_input.clear();
        self.submit_search("")
    }

    pub fn next_category(&mut self) -> Option<FetchTicket> {
        let current = self.current_category();
        self.set_category(current.next())
    }

    pub fn prev_category(&mut self) -> Option<FetchTicket> {
        let current = self.current_category();
        self.set_category(current.prev())
    }

    /// Category highlighted in the tab bar. During a search the tab cycle
    /// starts from General.
    pub fn current_category(&self) -> Category {
        self.store.filter().category().unwrap_or(Category::General)
    }

    pub fn reload(&mut self) -> Option<FetchTicket> {
        if !self.feed.is_enabled() {
            self.set_status("Saved articles are stored locally");
            return None;
        }
        self.scroll.reset();
        self.selected = 0;
        self.list_offset = 0;
        self.feed.reload()
    }

    /// Explicit "load more" request.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.feed.error().is_some() {
            self.set_status("Dismiss the error with [x] first");
            return None;
        }
        if !self.feed.has_next_page() {
            if self.feed.is_enabled() && self.feed.pages_loaded() > 0 {
                self.set_status("No more articles");
            }
            return None;
        }
        self.feed.fetch_next_page()
    }

    /// Feed the latest frame's visibility into the scroll trigger.
    ///
    /// Returns a ticket when the last card has just come into view and
    /// another page exists. Only the browse view shows the cards.
    pub fn poll_infinite_scroll(&mut self) -> Option<FetchTicket> {
        if !self.feed.is_enabled() || self.view != View::Browse {
            return None;
        }

        let last = self
            .feed
            .articles()
            .last()
            .map(|a| (a.url.clone(), self.feed.pages_loaded()));
        self.scroll.observe(last, self.feed.is_fetching_next_page());

        // Leave visibility unrecorded so the trigger fires once the error is gone
        if self.feed.error().is_some() || !self.feed.has_next_page() {
            return None;
        }

        if self.scroll.on_visibility(self.last_item_visible) {
            tracing::debug!(pages = self.feed.pages_loaded(), "Last card visible, loading more");
            return self.feed.fetch_next_page();
        }
        None
    }

    /// Articles currently on screen: the saved list under "For You",
    /// otherwise every loaded page.
    pub fn visible_articles(&self) -> &[Article] {
        if self.store.filter().is_saved_list() {
            self.store.saved().as_slice()
        } else {
            self.feed.articles()
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.visible_articles().get(self.selected)
    }

    pub fn is_saved_list(&self) -> bool {
        self.store.filter().is_saved_list()
    }

    // ========================================================================
    // Saved articles and settings
    // ========================================================================

    /// Toggle the selected article's saved state.
    pub fn toggle_save_selected(&mut self) {
        let Some(article) = self.selected_article().cloned() else {
            return;
        };
        match self.store.toggle_save(&article) {
            Ok(true) => self.set_status("Saved"),
            Ok(false) => self.set_status("Removed from saved"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist saved articles");
                self.set_status(format!("Could not save: {}", e));
            }
        }
        self.clamp_selection();
    }

    pub fn settings(&self) -> Settings {
        self.store.settings()
    }

    fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
        match self.store.update_settings(change) {
            Ok(settings) => {
                let variant = ThemeVariant::from_dark_mode(settings.dark_mode);
                if variant != self.theme_variant {
                    self.theme_variant = variant;
                    self.palette = variant.palette();
                }
                self.list_offset = 0;
                self.needs_redraw = true;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist settings");
                self.set_status(format!("Could not save settings: {}", e));
            }
        }
    }

    pub fn toggle_dark_mode(&mut self) {
        self.update_settings(|s| s.dark_mode = !s.dark_mode);
        let name = self.theme_variant.name();
        self.set_status(format!("Theme: {}", name));
    }

    pub fn toggle_compact_mode(&mut self) {
        self.update_settings(|s| s.compact_mode = !s.compact_mode);
    }

    pub fn toggle_view_mode(&mut self) {
        self.update_settings(|s| s.view_mode = s.view_mode.toggle());
    }

    /// Flip the setting under the settings-panel cursor.
    pub fn toggle_selected_setting(&mut self) {
        match self.settings_selected {
            0 => self.toggle_dark_mode(),
            1 => self.toggle_compact_mode(),
            _ => self.toggle_view_mode(),
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn nav_up(&mut self, step: usize) {
        self.selected = self.selected.saturating_sub(step);
    }

    pub fn nav_down(&mut self, step: usize) {
        let len = self.visible_articles().len();
        if len > 0 {
            self.selected = self.selected.saturating_add(step).min(len - 1);
        }
    }

    /// Keep the selection inside the visible list.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_articles().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn enter_reader(&mut self) -> bool {
        if self.selected_article().is_none() {
            return false;
        }
        self.view = View::Reader;
        self.reader_scroll = 0;
        true
    }

    pub fn exit_reader(&mut self) {
        self.view = View::Browse;
        self.reader_scroll = 0;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.reader_scroll = self.reader_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.reader_scroll = self.reader_scroll.saturating_add(lines).min(MAX_SCROLL);
    }

    /// Clamp reader scroll so the last line stays reachable.
    pub fn clamp_scroll(&mut self, content_lines: usize) {
        let max_scroll = content_lines.saturating_sub(self.reader_visible_lines);
        self.reader_scroll = self.reader_scroll.min(max_scroll).min(MAX_SCROLL);
    }

    /// Return to a clean browse state after the UI loop crashed.
    ///
    /// The feed controller is detached because a fetch may have been in
    /// flight when the loop died, and its result can no longer arrive.
    /// Such tasks run to completion against the dropped channel.
    pub fn recover(&mut self) {
        self.fetch_tasks.retain(|handle| !handle.is_finished());
        self.feed.detach();
        self.scroll.reset();
        self.view = View::Browse;
        self.show_help = false;
        self.search_mode = false;
        self.selected = 0;
        self.list_offset = 0;
        self.last_item_visible = false;
        self.needs_redraw = true;
    }

    // ========================================================================
    // Status line
    // ========================================================================

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Whether anything on screen is animating.
    pub fn is_busy(&self) -> bool {
        self.feed.is_loading() || self.feed.is_fetching_next_page()
    }

    /// Label shown above the cards for the active filter.
    pub fn filter_label(&self) -> Cow<'_, str> {
        match self.store.filter() {
            Filter::Category(c) => Cow::Borrowed(c.label()),
            Filter::Search(q) => Cow::Owned(format!("Results for \"{}\"", q)),
        }
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort outstanding fetches on drop so no task outlives the application.
impl Drop for App {
    fn drop(&mut self) {
        let mut aborted = 0usize;
        for handle in self.fetch_tasks.drain(..) {
            if !handle.is_finished() {
                handle.abort();
                aborted += 1;
            }
        }
        if aborted > 0 {
            tracing::debug!(count = aborted, "Aborted page fetch tasks on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::build_http_client;
    use crate::storage::{LocalStorage, Source};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn test_app(name: &str) -> (App, PathBuf) {
        let dir = std::env::temp_dir().join(format!("headlines_app_test_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let storage = LocalStorage::load(dir.join("storage.json"));
        let store = FeedStore::new(Category::General, storage);
        let http = build_http_client(Duration::from_secs(5)).unwrap();
        let news = NewsClient::new(http, None, "http://127.0.0.1:9", "us");
        (App::new(news, store, Duration::from_secs(300)), dir)
    }

    fn article(n: usize) -> Article {
        Article {
            source: Source {
                id: None,
                name: "Wire".to_string(),
            },
            author: None,
            title: format!("Story {}", n),
            description: None,
            url: format!("https://example.com/{}", n),
            url_to_image: None,
            published_at: None,
            content: None,
        }
    }

    fn page(range: std::ops::Range<usize>, page: u32, total: u64) -> Page {
        Page::new(range.map(article).collect(), page, total)
    }

    #[tokio::test]
    async fn test_startup_requests_first_page() {
        let (mut app, dir) = test_app("startup");
        let ticket = app.sync_filter().unwrap();
        assert_eq!(ticket.page(), 1);
        assert_eq!(ticket.filter(), &Filter::Category(Category::General));
        assert!(app.feed.is_loading());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_for_you_shows_saved_articles_without_fetching() {
        let (mut app, dir) = test_app("for_you");
        let ticket = app.sync_filter().unwrap();
        app.feed
            .complete(&ticket, Ok(page(0..3, 1, 3)), std::time::Instant::now());
        app.selected = 1;
        app.toggle_save_selected();

        assert!(app.set_category(Category::ForYou).is_none());
        assert!(app.is_saved_list());
        assert_eq!(app.visible_articles().len(), 1);
        assert_eq!(app.visible_articles()[0].url, "https://example.com/1");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_unsave_in_saved_list_clamps_selection() {
        let (mut app, dir) = test_app("unsave_clamp");
        let ticket = app.sync_filter().unwrap();
        app.feed
            .complete(&ticket, Ok(page(0..2, 1, 2)), std::time::Instant::now());
        app.toggle_save_selected();
        app.selected = 1;
        app.toggle_save_selected();

        app.set_category(Category::ForYou);
        app.selected = 1;
        app.toggle_save_selected();
        assert_eq!(app.visible_articles().len(), 1);
        assert_eq!(app.selected, 0);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_infinite_scroll_fires_once_per_page() {
        let (mut app, dir) = test_app("scroll");
        let ticket = app.sync_filter().unwrap();
        app.feed
            .complete(&ticket, Ok(page(0..12, 1, 30)), std::time::Instant::now());

        app.last_item_visible = false;
        assert!(app.poll_infinite_scroll().is_none());

        app.last_item_visible = true;
        let next = app.poll_infinite_scroll().unwrap();
        assert_eq!(next.page(), 2);
        // Still visible while page 2 is loading: nothing new
        assert!(app.poll_infinite_scroll().is_none());

        app.feed
            .complete(&next, Ok(page(12..24, 2, 30)), std::time::Instant::now());
        // New last card, already visible: fires again
        let third = app.poll_infinite_scroll().unwrap();
        assert_eq!(third.page(), 3);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_infinite_scroll_idle_while_reader_open() {
        let (mut app, dir) = test_app("scroll_reader");
        let ticket = app.sync_filter().unwrap();
        app.feed
            .complete(&ticket, Ok(page(0..12, 1, 60)), std::time::Instant::now());
        app.last_item_visible = true;
        let second = app.poll_infinite_scroll().unwrap();
        assert_eq!(second.page(), 2);

        app.view = View::Reader;
        app.feed
            .complete(&second, Ok(page(12..24, 2, 60)), std::time::Instant::now());
        assert!(app.poll_infinite_scroll().is_none());
        assert!(!app.feed.is_fetching_next_page());

        // Back on the grid with the last card on screen
        app.view = View::Browse;
        let third = app.poll_infinite_scroll().unwrap();
        assert_eq!(third.page(), 3);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_infinite_scroll_waits_for_error_dismissal() {
        let (mut app, dir) = test_app("scroll_error");
        let ticket = app.sync_filter().unwrap();
        app.feed
            .complete(&ticket, Ok(page(0..12, 1, 30)), std::time::Instant::now());
        app.last_item_visible = true;
        let next = app.poll_infinite_scroll().unwrap();
        app.feed.complete(
            &next,
            Err(NewsError::Upstream {
                status: Some(500),
                message: "boom".to_string(),
            }),
            std::time::Instant::now(),
        );

        assert!(app.poll_infinite_scroll().is_none());
        assert!(app.load_more().is_none());

        assert!(app.feed.dismiss_error());
        let retry = app.load_more().unwrap();
        assert_eq!(retry.page(), 2);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_search_then_clear_restores_category() {
        let (mut app, dir) = test_app("search_clear");
        app.set_category(Category::Sports);
        let ticket = app.submit_search("  rust  ").unwrap();
        assert_eq!(ticket.filter(), &Filter::Search("rust".to_string()));
        assert_eq!(app.filter_label(), "Results for \"rust\"");

        let ticket = app.clear_search().unwrap();
        assert_eq!(ticket.filter(), &Filter::Category(Category::Sports));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_category_cycle_wraps() {
        let (mut app, dir) = test_app("cycle");
        app.set_category(Category::Entertainment);
        app.next_category();
        assert_eq!(app.current_category(), Category::ForYou);
        app.prev_category();
        assert_eq!(app.current_category(), Category::Entertainment);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_dark_mode_toggle_swaps_palette_and_persists() {
        let (mut app, dir) = test_app("dark_mode");
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        app.toggle_dark_mode();
        assert_eq!(app.theme_variant, ThemeVariant::Dark);
        assert!(app.settings().dark_mode);

        let reloaded = LocalStorage::load(dir.join("storage.json"));
        assert!(reloaded.settings().dark_mode);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_reload_in_saved_list_is_noop() {
        let (mut app, dir) = test_app("reload_saved");
        app.set_category(Category::ForYou);
        assert!(app.reload().is_none());
        assert!(app.status_message.is_some());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_nav_clamps_to_list() {
        let (mut app, dir) = test_app("nav");
        app.nav_down(1);
        assert_eq!(app.selected, 0);

        let ticket = app.sync_filter().unwrap();
        app.feed
            .complete(&ticket, Ok(page(0..3, 1, 3)), std::time::Instant::now());
        app.nav_down(10);
        assert_eq!(app.selected, 2);
        app.nav_up(5);
        assert_eq!(app.selected, 0);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_recover_reissues_first_page() {
        let (mut app, dir) = test_app("recover");
        let ticket = app.sync_filter().unwrap();
        app.view = View::Reader;
        app.recover();
        assert_eq!(app.view, View::Browse);
        assert!(!app.feed.is_loading());

        let again = app.sync_filter().unwrap();
        assert_eq!(again.page(), 1);
        assert_ne!(again.session(), ticket.session());
        // The pre-crash ticket no longer applies
        assert_eq!(
            app.feed.complete(&ticket, Ok(page(0..1, 1, 1)), std::time::Instant::now()),
            crate::feed::Completion::Stale
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_expires_after_3_seconds() {
        let (mut app, dir) = test_app("status");
        app.set_status("hello");
        assert!(!app.clear_expired_status());
        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
        std::fs::remove_dir_all(&dir).ok();
    }
}
