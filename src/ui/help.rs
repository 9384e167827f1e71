//! Help overlay: keybinding table grouped by view.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Browse",
        &[
            ("j/k, ↑/↓", "Move selection by row"),
            ("←/→", "Move selection by card"),
            ("Tab/l, S-Tab/h", "Next / previous category"),
            ("1-8", "Jump to category"),
            ("/", "Search"),
            ("Esc", "Clear search"),
            ("Enter", "Read article"),
            ("s", "Save / unsave"),
            ("o", "Open in browser"),
            ("r", "Reload feed"),
            ("n", "Load next page"),
            ("x", "Dismiss error"),
        ],
    ),
    (
        "Display",
        &[
            ("d", "Toggle dark mode"),
            ("c", "Toggle compact cards"),
            ("v", "Toggle grid / list"),
            (",", "Settings panel"),
        ],
    ),
    (
        "Reader",
        &[
            ("j/k, PgUp/PgDn", "Scroll"),
            ("Esc/b", "Back to feed"),
        ],
    ),
    ("General", &[("?", "Toggle help"), ("q, Ctrl-c", "Quit")]),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (section, bindings) in BINDINGS {
        rows.push(
            Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {} --", section),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(app.palette.reader_heading),
        );
        for (key, action) in *bindings {
            rows.push(Row::new(vec![format!("  {}", key), action.to_string()]));
        }
        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    rows.pop();

    let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.panel_border)
                .title(" Help (? to close) "),
        )
        .style(app.palette.reader_body);

    f.render_widget(table, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
