//! Terminal User Interface module.
//!
//! This module provides the TUI for the news reader, including:
//! - Main event loop (`run`)
//! - Input handling for browse, search, reader, and settings
//! - Rendering for the card grid, reader, and overlays
//! - Background page fetches and their completion events
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch
//! - `helpers` - Page fetch spawning and panic containment
//! - `header` - Title row, category tabs, and error banner
//! - `cards` - Article cards, skeletons, empty states, scroll window
//! - `reader` - Article detail view
//! - `settings` - Display settings panel
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod cards;
mod events;
mod header;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod reader;
mod render;
mod settings;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
