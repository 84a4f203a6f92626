use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode;

pub fn render_list_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        " Available vCards:",
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ))];

    let cards = &app.list.cards;
    if cards.is_empty() {
        lines.push(Line::from(Span::styled(
            "   (no valid cards)",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
        return;
    }

    // Window that keeps the cursor visible
    let height = (area.height as usize).saturating_sub(1).max(1);
    let cursor = app.list.cursor.min(cards.len() - 1);
    let start = (cursor + 1).saturating_sub(height);

    for (i, name) in cards.iter().enumerate().skip(start).take(height) {
        let selected = i == cursor;
        let marker = if selected { " \u{25B8} " } else { "   " };
        let text = unicode::truncate_to_width(name, width.saturating_sub(3));
        let style = if selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        let pad = width.saturating_sub(3 + unicode::display_width(&text));
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(app.theme.highlight).bg(style.bg.unwrap_or(bg))),
            Span::styled(text, style),
            Span::styled(" ".repeat(pad), style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
