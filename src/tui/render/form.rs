//! Shared pieces for views with labelled inputs and buttons.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::field::TextField;
use crate::util::unicode;

/// Draw `label` then the field's text on one row. The label column is
/// `label_w` cells wide. Places the terminal cursor when focused.
pub fn render_input_row(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    label: &str,
    label_w: u16,
    field: &TextField,
    focused: bool,
) {
    if area.height == 0 {
        return;
    }
    let bg = app.theme.background;
    let label_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };

    let input_w = area.width.saturating_sub(label_w) as usize;
    let text = field.display_text();
    let shown = if unicode::display_width(&text) > input_w {
        unicode::truncate_to_width(&text, input_w)
    } else {
        unicode::pad_to_width(&text, input_w)
    };

    let line = Line::from(vec![
        Span::styled(
            unicode::pad_to_width(label, label_w as usize),
            label_style,
        ),
        Span::styled(
            shown,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.input_bg),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), Rect { height: 1, ..area });

    if focused {
        let col = (field.cursor_col() as u16).min(input_w.saturating_sub(1) as u16);
        frame.set_cursor_position((area.x + label_w + col, area.y));
    }
}

/// A row of `[ label ]` buttons; the one at `focused` is highlighted.
pub fn render_buttons(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    labels: &[&str],
    focused: Option<usize>,
) {
    let bg = app.theme.background;
    let mut spans = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("   ", Style::default().bg(bg)));
        }
        let style = if focused == Some(i) {
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        spans.push(Span::styled(format!("[ {} ]", label), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), Rect { height: 1, ..area });
}

/// `label` followed by a plain value, for read-only rows
pub fn value_line<'a>(app: &App, label: &str, value: String) -> Line<'a> {
    let bg = app.theme.background;
    Line::from(vec![
        Span::styled(
            format!("{} ", label),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
        Span::styled(value, Style::default().fg(app.theme.text_bright).bg(bg)),
    ])
}
