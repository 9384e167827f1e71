use crate::app::App;
use crate::storage::Article;
use crate::theme::ColorPalette;
use crate::util::{display_width, format_relative_time, strip_control_chars};
use chrono::Utc;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the article reader view
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    // EDGE-001: Guard against zero-width/height areas
    if area.width < 3 || area.height < 3 {
        return;
    }

    // Area height minus 2 for borders
    app.reader_visible_lines = area.height.saturating_sub(2) as usize;

    let Some(article) = app.selected_article() else {
        let paragraph = Paragraph::new("No article selected")
            .block(Block::default().borders(Borders::ALL).title("Reader"));
        f.render_widget(paragraph, area);
        return;
    };

    let saved = app.store.is_saved(&article.url);
    let lines = article_lines(article, saved, &app.palette);
    let inner_width = area.width.saturating_sub(2) as usize;
    let total: usize = lines.iter().map(|l| wrapped_height(l, inner_width)).sum();

    // Clamp before drawing so a resize never renders past the end
    app.clamp_scroll(total);

    let title = if saved { " Reader ★ " } else { " Reader " };
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.panel_border)
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.reader_scroll as u16, 0));
    f.render_widget(paragraph, area);
}

/// Build the reader body for one article.
fn article_lines(article: &Article, saved: bool, palette: &ColorPalette) -> Vec<Line<'static>> {
    let mut meta = vec![strip_control_chars(&article.source.name).into_owned()];
    if let Some(author) = article.author.as_deref().filter(|a| !a.trim().is_empty()) {
        meta.push(strip_control_chars(author).into_owned());
    }
    let age = format_relative_time(article.published_at, Utc::now());
    if !age.is_empty() {
        meta.push(age);
    }
    if let Some(published) = article.published_at {
        meta.push(published.format("%Y-%m-%d %H:%M UTC").to_string());
    }

    let mut lines = vec![
        Line::from(Span::styled(
            strip_control_chars(&article.title).into_owned(),
            palette.reader_heading,
        )),
        Line::from(Span::styled(meta.join(" · "), palette.reader_metadata)),
        Line::from(""),
    ];

    if let Some(description) = article.description.as_deref() {
        for para in strip_control_chars(description).lines() {
            lines.push(Line::from(Span::styled(para.to_string(), palette.reader_body)));
        }
        lines.push(Line::from(""));
    }

    if let Some(content) = article.content.as_deref() {
        let body = strip_truncation_marker(&strip_control_chars(content)).to_string();
        for para in body.lines() {
            lines.push(Line::from(Span::styled(para.to_string(), palette.reader_body)));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(article.url.clone(), palette.reader_link)));
    lines.push(Line::from(""));
    let save_hint = if saved { "[s] unsave" } else { "[s] save" };
    lines.push(Line::from(Span::styled(
        format!("[o] open full article  {}  [Esc] back", save_hint),
        palette.reader_metadata,
    )));
    lines
}

/// Drop the upstream "… [+1234 chars]" suffix on preview content.
fn strip_truncation_marker(content: &str) -> &str {
    let trimmed = content.trim_end();
    if trimmed.ends_with(" chars]") {
        if let Some(pos) = trimmed.rfind("[+") {
            return trimmed[..pos].trim_end().trim_end_matches('…').trim_end();
        }
    }
    trimmed
}

/// Rows a line occupies once wrapped to `width` columns.
fn wrapped_height(line: &Line<'_>, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    let line_width: usize = line.spans.iter().map(|s| display_width(&s.content)).sum();
    line_width.div_ceil(width).max(1)
}
