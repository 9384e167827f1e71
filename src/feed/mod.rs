//! Feed synchronization: pagination, memoization and infinite scroll.
//!
//! - [`controller`] - Per-filter session state machine with stale-response guard
//! - [`cache`] - Bounded, time-limited memo of recently viewed feeds
//! - [`scroll`] - Edge-triggered "load more" detector
//!
//! # Example
//!
//! ```ignore
//! let mut feed = PaginatedFeed::new(Duration::from_secs(300));
//! if let Some(ticket) = feed.set_filter(store.filter(), Instant::now()) {
//!     let result = client.fetch_page(ticket.filter(), ticket.page()).await;
//!     feed.complete(&ticket, result, Instant::now());
//! }
//! ```

mod cache;
mod controller;
mod scroll;

pub use controller::{Completion, FeedError, FetchTicket, PaginatedFeed};
pub use scroll::ScrollTrigger;
