//! Article card grid.
//!
//! Besides drawing, the card renderer owns the scroll window: it decides
//! which card rows fit on screen and records whether the last card was
//! drawn, which is what the infinite-scroll trigger observes.

use crate::app::App;
use crate::storage::Article;
use crate::theme::ColorPalette;
use crate::util::{format_relative_time, strip_control_chars, truncate_to_width};
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Braille spinner, one frame per tick.
pub(super) const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const CARD_HEIGHT: u16 = 5;
const COMPACT_CARD_HEIGHT: u16 = 3;

/// Placeholder cards drawn while the first page loads.
const SKELETON_CARDS: usize = 6;

pub(super) const END_OF_RESULTS: &str = "You've reached the end of the results.";
pub(super) const LOADING_MORE: &str = "Loading more articles...";

/// Adjust the first visible card row so `selected` stays on screen.
///
/// Returns the new row offset and whether the last card falls inside the
/// window.
pub(super) fn scroll_window(
    total: usize,
    columns: usize,
    visible_rows: usize,
    selected: usize,
    offset: usize,
) -> (usize, bool) {
    if total == 0 {
        return (0, false);
    }
    let columns = columns.max(1);
    let visible_rows = visible_rows.max(1);
    let rows = total.div_ceil(columns);
    let selected_row = selected.min(total - 1) / columns;

    let mut offset = offset.min(rows - 1);
    if selected_row < offset {
        offset = selected_row;
    } else if selected_row >= offset + visible_rows {
        offset = selected_row + 1 - visible_rows;
    }

    let last_visible = rows - 1 < offset + visible_rows;
    (offset, last_visible)
}

/// Render the card grid (or list) plus its footer line.
pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    // EDGE-001: Layout may produce zero-sized rects during resizes
    if area.width < 4 || area.height < 2 {
        app.last_item_visible = false;
        return;
    }

    let settings = app.settings();
    let columns = settings.view_mode.columns();
    let card_height = if settings.compact_mode {
        COMPACT_CARD_HEIGHT
    } else {
        CARD_HEIGHT
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let (grid_area, footer_area) = (chunks[0], chunks[1]);

    if app.visible_articles().is_empty() {
        app.last_item_visible = false;
        app.list_offset = 0;
        if app.feed.is_loading() {
            render_skeletons(f, &app.palette, grid_area, columns, card_height);
        } else {
            render_empty_state(f, app, grid_area);
        }
        return;
    }

    let visible_rows = (grid_area.height / card_height).max(1) as usize;
    let total = app.visible_articles().len();
    let (offset, last_visible) =
        scroll_window(total, columns, visible_rows, app.selected, app.list_offset);
    app.list_offset = offset;
    app.last_item_visible = last_visible;

    let now = Utc::now();
    let row_constraints = vec![Constraint::Length(card_height); visible_rows];
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(grid_area);
    let col_constraints = vec![Constraint::Ratio(1, columns as u32); columns];

    let articles = app.visible_articles();
    for (row_idx, row_area) in row_areas.iter().enumerate() {
        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints.clone())
            .split(*row_area);
        for (col_idx, cell) in col_areas.iter().enumerate() {
            let idx = (offset + row_idx) * columns + col_idx;
            let Some(article) = articles.get(idx) else {
                break;
            };
            let card = Card {
                article,
                selected: idx == app.selected,
                saved: app.store.is_saved(&article.url),
                compact: settings.compact_mode,
            };
            card.render(f, &app.palette, *cell, now);
        }
    }

    render_footer(f, app, footer_area);
}

struct Card<'a> {
    article: &'a Article,
    selected: bool,
    saved: bool,
    compact: bool,
}

impl Card<'_> {
    fn render(&self, f: &mut Frame, palette: &ColorPalette, area: Rect, now: chrono::DateTime<Utc>) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let border = if self.selected {
            palette.card_border_selected
        } else {
            palette.card_border
        };

        let marker = if self.saved { "★ " } else { "" };
        let age = format_relative_time(self.article.published_at, now);
        let source = strip_control_chars(&self.article.source.name);
        let meta = if age.is_empty() {
            source.into_owned()
        } else {
            format!("{} · {}", source, age)
        };

        let title = strip_control_chars(&self.article.title);
        let mut lines = Vec::with_capacity(3);

        if self.compact {
            let title_width = inner_width.saturating_sub(meta.chars().count() + marker.len() + 1);
            lines.push(Line::from(vec![
                Span::styled(marker, palette.card_saved),
                Span::styled(
                    truncate_to_width(&title, title_width).into_owned(),
                    palette.card_title,
                ),
                Span::raw(" "),
                Span::styled(meta, palette.card_meta),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled(marker, palette.card_saved),
                Span::styled(
                    truncate_to_width(&title, inner_width.saturating_sub(2)).into_owned(),
                    palette.card_title,
                ),
            ]));
            let description = self
                .article
                .description
                .as_deref()
                .map(strip_control_chars)
                .unwrap_or_default();
            lines.push(Line::from(Span::styled(
                truncate_to_width(description.trim(), inner_width).into_owned(),
                palette.card_description,
            )));
            lines.push(Line::from(Span::styled(
                truncate_to_width(&meta, inner_width).into_owned(),
                palette.card_meta,
            )));
        }

        let block = Block::default().borders(Borders::ALL).border_style(border);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn render_skeletons(
    f: &mut Frame,
    palette: &ColorPalette,
    area: Rect,
    columns: usize,
    card_height: u16,
) {
    let rows = SKELETON_CARDS.div_ceil(columns);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(card_height); rows])
        .split(area);
    let col_constraints = vec![Constraint::Ratio(1, columns as u32); columns];

    for row_area in row_areas.iter() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints.clone())
            .split(*row_area);
        for cell in cells.iter() {
            let width = cell.width.saturating_sub(2) as usize;
            let bar = |pct: usize| Line::from(Span::styled("░".repeat(width * pct / 100), palette.skeleton));
            let lines = if card_height == COMPACT_CARD_HEIGHT {
                vec![bar(70)]
            } else {
                vec![bar(80), bar(100), bar(40)]
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(palette.card_border);
            f.render_widget(Paragraph::new(lines).block(block), *cell);
        }
    }
}

fn render_empty_state(f: &mut Frame, app: &App, area: Rect) {
    // Errors are shown by the banner
    if app.feed.error().is_some() {
        return;
    }

    let (heading, body) = if app.is_saved_list() {
        (
            "No Saved Articles Yet",
            "Press [s] on any article to keep it here for later.",
        )
    } else if app.feed.pages_loaded() > 0 {
        (
            "No Articles Found",
            "Try another category or a different search.",
        )
    } else {
        return;
    };

    let top = area.height.saturating_sub(3) / 2;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(heading, app.palette.empty_heading)),
        Line::from(""),
        Line::from(Span::styled(body, app.palette.empty_body)),
    ];
    let target = Rect {
        y: area.y + top.saturating_sub(1),
        height: area.height.saturating_sub(top.saturating_sub(1)),
        ..area
    };
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), target);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.feed.is_fetching_next_page() {
        let frame = SPINNER[app.spinner_frame % SPINNER.len()];
        Line::from(Span::styled(
            format!("{} {}", frame, LOADING_MORE),
            app.palette.loading_more,
        ))
    } else if app.feed.is_enabled() && !app.feed.has_next_page() && app.feed.pages_loaded() > 0 {
        Line::from(Span::styled(END_OF_RESULTS, app.palette.end_of_results))
    } else {
        return;
    };
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
