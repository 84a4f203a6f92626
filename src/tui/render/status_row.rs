use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::nav::View;
use crate::util::unicode::display_width;

fn key_hint(view: &View) -> &'static str {
    match view {
        View::Login => "Tab next  Enter select  Esc quit",
        View::List => "\u{2191}\u{2193} move  Enter view  c create  d queries  q exit",
        View::Detail { .. } => "Enter save  Esc cancel",
        View::Create => "Tab next  Enter/^S save  Esc cancel",
        View::Query => "a all  b birthdays  \u{2190}\u{2192} month  \u{2191}\u{2193} scroll  Esc back",
    }
}

/// Left side of the status row: what the last sync did, on the List view
fn status_message(app: &App) -> Option<String> {
    if *app.view() != View::List {
        return None;
    }
    let cards = app.list.cards.len();
    let mut msg = format!("{} card{}", cards, if cards == 1 { "" } else { "s" });
    if let Some(report) = &app.last_sync {
        msg.push_str(&format!("  synced {} new", report.inserted));
        if report.bad_dates > 0 {
            msg.push_str(&format!(", {} bad dates", report.bad_dates));
        }
    }
    Some(msg)
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    if let Some(msg) = status_message(app) {
        spans.push(Span::styled(
            format!(" {}", msg),
            Style::default().fg(app.theme.green).bg(bg),
        ));
    }
    let hint = key_hint(app.view());
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
