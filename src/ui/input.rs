//! Keyboard input handling.
//!
//! Routes key presses by view: search box, browse, reader, settings, and
//! the help overlay, which captures every key while open.

use crate::app::{App, AppEvent, View, SETTINGS_ITEMS};
use crate::store::Category;
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{dispatch, open_selected_in_browser};
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if app.show_help {
        if matches!(code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Action::Continue;
    }

    if app.search_mode {
        handle_search_input(app, code, event_tx);
        return Action::Continue;
    }

    match app.view {
        View::Browse => handle_browse_input(app, code, event_tx),
        View::Reader => handle_reader_input(app, code),
        View::Settings => handle_settings_input(app, code),
    }
}

fn handle_search_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Esc => {
            app.search_mode = false;
        }
        KeyCode::Enter => {
            app.search_mode = false;
            let query = app.search_input.clone();
            let ticket = app.submit_search(&query);
            dispatch(app, ticket, event_tx);
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            if app.search_input.chars().count() < MAX_SEARCH_QUERY_LENGTH {
                app.search_input.push(c);
            } else {
                app.set_status(format!(
                    "Search query too long (max {} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
            }
        }
        _ => {}
    }
}

fn handle_browse_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    let columns = app.settings().view_mode.columns();

    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('?') => app.show_help = true,

        KeyCode::Char('j') | KeyCode::Down => app.nav_down(columns),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(columns),
        KeyCode::Right => app.nav_down(1),
        KeyCode::Left => app.nav_up(1),
        KeyCode::PageDown => app.nav_down(columns * 4),
        KeyCode::PageUp => app.nav_up(columns * 4),
        KeyCode::Char('g') | KeyCode::Home => app.selected = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.selected = app.visible_articles().len().saturating_sub(1);
        }

        KeyCode::Tab | KeyCode::Char('l') => {
            let ticket = app.next_category();
            dispatch(app, ticket, event_tx);
        }
        KeyCode::BackTab | KeyCode::Char('h') => {
            let ticket = app.prev_category();
            dispatch(app, ticket, event_tx);
        }
        KeyCode::Char(c @ '1'..='8') => {
            let index = c as usize - '1' as usize;
            if let Some(&category) = Category::ALL.get(index) {
                let ticket = app.set_category(category);
                dispatch(app, ticket, event_tx);
            }
        }

        KeyCode::Char('/') => {
            app.search_mode = true;
            app.search_input = app
                .store
                .filter()
                .search_query()
                .unwrap_or_default()
                .to_string();
        }
        KeyCode::Esc => {
            let ticket = app.clear_search();
            dispatch(app, ticket, event_tx);
        }

        KeyCode::Enter => {
            app.enter_reader();
        }
        KeyCode::Char('s') => app.toggle_save_selected(),
        KeyCode::Char('o') => open_selected_in_browser(app),
        KeyCode::Char('d') => app.toggle_dark_mode(),
        KeyCode::Char('v') => app.toggle_view_mode(),
        KeyCode::Char('c') => app.toggle_compact_mode(),
        KeyCode::Char(',') => {
            app.view = View::Settings;
            app.settings_selected = 0;
        }

        KeyCode::Char('r') => {
            let ticket = app.reload();
            dispatch(app, ticket, event_tx);
        }
        KeyCode::Char('n') => {
            let ticket = app.load_more();
            dispatch(app, ticket, event_tx);
        }
        KeyCode::Char('x') => {
            if !app.feed.dismiss_error() && app.feed.error().is_some() {
                app.set_status("Configuration errors cannot be dismissed");
            }
        }
        _ => {}
    }

    Action::Continue
}

fn handle_reader_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => app.exit_reader(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageDown | KeyCode::Char(' ') => {
            let page = app.reader_visible_lines.max(1);
            app.scroll_down(page);
        }
        KeyCode::PageUp => {
            let page = app.reader_visible_lines.max(1);
            app.scroll_up(page);
        }
        KeyCode::Char('s') => app.toggle_save_selected(),
        KeyCode::Char('o') => open_selected_in_browser(app),
        KeyCode::Char('d') => app.toggle_dark_mode(),
        _ => {}
    }
    Action::Continue
}

fn handle_settings_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Esc | KeyCode::Char(',') => app.view = View::Browse,
        KeyCode::Char('j') | KeyCode::Down => {
            app.settings_selected = (app.settings_selected + 1).min(SETTINGS_ITEMS.len() - 1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected_setting(),
        KeyCode::Char('d') => app.toggle_dark_mode(),
        _ => {}
    }
    Action::Continue
}
