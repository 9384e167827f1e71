use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

use super::cards::SPINNER;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // EDGE-001: Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(&**msg)
    } else if app.feed.is_loading() {
        Cow::Owned(format!(
            "{} Loading {}...",
            SPINNER[app.spinner_frame % SPINNER.len()],
            app.filter_label()
        ))
    } else {
        // Static keybinding hints - zero allocation
        match app.view {
            View::Browse => {
                if app.search_mode {
                    Cow::Borrowed("Type to search | ESC cancel | ENTER search")
                } else {
                    Cow::Borrowed(
                        "[1-8/Tab]category [/]search [s]ave [o]pen [r]eload [n]ext page [,]settings [?]help [q]uit",
                    )
                }
            }
            View::Reader => Cow::Borrowed("[Esc]back [j/k]scroll [s]ave [o]pen [q]uit"),
            View::Settings => Cow::Borrowed("[j/k]select [Enter]toggle [Esc]close"),
        }
    };

    let paragraph = Paragraph::new(text).style(app.palette.status_bar);
    f.render_widget(paragraph, area);
}
