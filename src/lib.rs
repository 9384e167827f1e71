//! Terminal news reader for NewsAPI-compatible services.
//!
//! The library holds everything but argument parsing: the news client, the
//! paginated feed controller, the local store for saved articles and
//! settings, and the ratatui front end.

pub mod app;
pub mod config;
pub mod feed;
pub mod news;
pub mod storage;
pub mod store;
pub mod theme;
pub mod ui;
pub mod util;
