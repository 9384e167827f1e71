//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes and is
//! driven by the persisted `dark_mode` setting.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Variant matching the `dark_mode` setting.
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette - semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub header_title: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub search_box: Style,

    // -- Cards --
    pub card_border: Style,
    pub card_border_selected: Style,
    pub card_title: Style,
    pub card_description: Style,
    pub card_meta: Style,
    pub card_saved: Style,
    pub skeleton: Style,

    // -- Feed states --
    pub banner_error: Style,
    pub banner_hint: Style,
    pub end_of_results: Style,
    pub empty_heading: Style,
    pub empty_body: Style,
    pub loading_more: Style,

    // -- Reader --
    pub reader_heading: Style,
    pub reader_body: Style,
    pub reader_metadata: Style,
    pub reader_link: Style,

    // -- Settings panel --
    pub settings_selected: Style,
    pub settings_value: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            // Header
            header_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tab_active: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            search_box: Style::default().fg(Color::Yellow),

            // Cards
            card_border: Style::default().fg(Color::DarkGray),
            card_border_selected: Style::default().fg(Color::Cyan),
            card_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            card_description: Style::default().fg(Color::Gray),
            card_meta: Style::default().fg(Color::DarkGray),
            card_saved: Style::default().fg(Color::Yellow),
            skeleton: Style::default().fg(Color::DarkGray),

            // Feed states
            banner_error: Style::default().fg(Color::White).bg(Color::Red),
            banner_hint: Style::default().fg(Color::Gray),
            end_of_results: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            empty_heading: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            empty_body: Style::default().fg(Color::Gray),
            loading_more: Style::default().fg(Color::Cyan),

            // Reader
            reader_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default(),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            // Settings
            settings_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            settings_value: Style::default().fg(Color::Cyan),

            // Chrome
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default().fg(Color::Cyan),
        }
    }

    /// Light palette for light terminal backgrounds.
    fn light() -> Self {
        Self {
            // Header
            header_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tab_active: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            search_box: Style::default().fg(Color::Magenta),

            // Cards
            card_border: Style::default().fg(Color::Gray),
            card_border_selected: Style::default().fg(Color::Blue),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_description: Style::default().fg(Color::DarkGray),
            card_meta: Style::default().fg(Color::Gray),
            card_saved: Style::default().fg(Color::Magenta),
            skeleton: Style::default().fg(Color::Gray),

            // Feed states
            banner_error: Style::default().fg(Color::White).bg(Color::Red),
            banner_hint: Style::default().fg(Color::DarkGray),
            end_of_results: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            empty_heading: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            empty_body: Style::default().fg(Color::DarkGray),
            loading_more: Style::default().fg(Color::Blue),

            // Reader
            reader_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            // Settings
            settings_selected: Style::default().bg(Color::Blue).fg(Color::White),
            settings_value: Style::default().fg(Color::Blue),

            // Chrome
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
