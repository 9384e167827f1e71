//! Display settings panel.

use crate::app::{App, SETTINGS_ITEMS};
use crate::storage::ViewMode;
use ratatui::{
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

use super::help::centered_rect;

pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(50, 40, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let settings = app.settings();
    let on_off = |b: bool| if b { "On" } else { "Off" };
    let values = [
        on_off(settings.dark_mode),
        on_off(settings.compact_mode),
        match settings.view_mode {
            ViewMode::Grid => "Grid",
            ViewMode::List => "List",
        },
    ];

    let rows: Vec<Row> = SETTINGS_ITEMS
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (label, value))| {
            let row = Row::new(vec![
                Line::from(format!("  {}", label)),
                Line::styled(value, app.palette.settings_value),
            ]);
            if i == app.settings_selected {
                row.style(app.palette.settings_selected)
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(rows, [Constraint::Min(16), Constraint::Length(6)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.palette.panel_border)
            .title(" Settings "),
    );
    f.render_widget(table, overlay);

    let hint_area = Rect {
        x: overlay.x + 1,
        y: overlay.y + overlay.height.saturating_sub(1),
        width: overlay.width.saturating_sub(2),
        height: 1,
    };
    f.render_widget(
        Paragraph::new(Line::styled(
            " Enter toggle · Esc close ",
            app.palette.banner_hint,
        )),
        hint_area,
    );
}
