use crate::app::App;
use crate::feed::FeedError;
use crate::news::ErrorKind;
use crate::store::{Category, Filter};
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the title row: app name plus the search box or active query.
pub fn render_title(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let mut spans = vec![Span::styled(" Headlines ", app.palette.header_title)];

    if app.search_mode {
        let room = (area.width as usize).saturating_sub(24);
        let shown = truncate_to_width(&app.search_input, room);
        spans.push(Span::styled(
            format!("  Search: {}▏", shown),
            app.palette.search_box,
        ));
    } else if let Some(query) = app.store.filter().search_query() {
        let room = (area.width as usize).saturating_sub(40);
        spans.push(Span::styled(
            format!("  Search: {}", truncate_to_width(query, room)),
            app.palette.search_box,
        ));
        spans.push(Span::styled("  [Esc] clear", app.palette.banner_hint));
    } else {
        spans.push(Span::styled("  [/] search", app.palette.banner_hint));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the category tabs, numbered for direct selection.
pub fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let active = match app.store.filter() {
        Filter::Category(c) => Some(*c),
        Filter::Search(_) => None,
    };

    let mut spans = Vec::with_capacity(Category::ALL.len() * 2);
    for (i, category) in Category::ALL.iter().enumerate() {
        let style = if Some(*category) == active {
            app.palette.tab_active
        } else {
            app.palette.tab_inactive
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, category.label()), style));
        spans.push(Span::raw(" "));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Height the error banner needs, zero when there is nothing to show.
pub fn banner_height(error: Option<&FeedError>) -> u16 {
    if error.is_some() {
        1
    } else {
        0
    }
}

/// Render the error banner. Configuration errors carry no dismiss hint.
pub fn render_error_banner(f: &mut Frame, app: &App, area: Rect) {
    let Some(error) = app.feed.error() else {
        return;
    };
    if area.width < 1 || area.height < 1 {
        return;
    }

    let hint = match error.kind {
        ErrorKind::Configuration => "",
        ErrorKind::Upstream | ErrorKind::Network => "  [x] dismiss  [r] retry",
    };
    let room = (area.width as usize).saturating_sub(hint.len() + 4);
    let text = format!(" ⚠ {}{}", truncate_to_width(&error.message, room), hint);

    f.render_widget(
        Paragraph::new(text).style(app.palette.banner_error),
        area,
    );
}
