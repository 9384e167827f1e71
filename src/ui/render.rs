//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! view based on application state.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{cards, header, help, reader, settings, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 50;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Main render dispatch function.
///
/// Routes to the appropriate view renderer based on current application state.
/// Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // EDGE-001: Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        app.last_item_visible = false;
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    match app.view {
        View::Browse => render_browse(f, app),
        View::Reader => {
            app.last_item_visible = false;
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(area);
            reader::render(f, app, chunks[0]);
            status::render(f, app, chunks[1]);
        }
        View::Settings => {
            render_browse(f, app);
            settings::render(f, app);
        }
    }

    if app.show_help {
        help::render(f, app);
    }
}

/// Render the browse view: title, tabs, error banner, filter label, cards, status.
fn render_browse(f: &mut Frame, app: &mut App) {
    let banner = header::banner_height(app.feed.error());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(banner),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    header::render_title(f, app, chunks[0]);
    header::render_tabs(f, app, chunks[1]);
    header::render_error_banner(f, app, chunks[2]);

    let count = app.visible_articles().len();
    let label = Line::from(vec![
        Span::styled(format!(" {}", app.filter_label()), app.palette.header_title),
        Span::styled(
            if count > 0 {
                format!("  ({} articles)", count)
            } else {
                String::new()
            },
            app.palette.card_meta,
        ),
    ]);
    f.render_widget(Paragraph::new(label), chunks[3]);

    cards::render(f, app, chunks[4]);
    status::render(f, app, chunks[5]);
}
