use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, Popup};
use crate::util::unicode::display_width;

/// Render a modal message box centered over `area`
pub fn render_popup(frame: &mut Frame, app: &App, popup: &Popup, area: Rect) {
    let popup_w: u16 = 48.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.red)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let hint_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut styled_lines: Vec<(String, Style)> = vec![
        (format!(" {}", popup.title), header_style),
        (String::new(), text_style),
    ];
    for s in wrap_text(" ", &popup.message, inner_w) {
        styled_lines.push((s, text_style));
    }
    styled_lines.push((String::new(), text_style));
    styled_lines.push((" Press Enter to continue.".into(), hint_style));

    // Dynamic height from content + 2 for borders
    let popup_h = ((styled_lines.len() as u16) + 2).min(area.height.saturating_sub(2));

    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let lines: Vec<Line> = styled_lines
        .into_iter()
        .map(|(text, style)| Line::from(Span::styled(text, style)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));

    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(bg)),
        overlay_area,
    );
}

/// Word-wrap `text` into lines at most `max_width` cells wide, each prefixed
/// with `indent`. A word wider than the line gets a line of its own.
fn wrap_text(indent: &str, text: &str, max_width: usize) -> Vec<String> {
    let indent_w = display_width(indent);
    let mut lines = Vec::new();
    let mut current = indent.to_string();
    let mut current_w = indent_w;

    for word in text.split_whitespace() {
        let word_w = display_width(word);
        let space = usize::from(current_w > indent_w);
        if current_w + space + word_w > max_width && current_w > indent_w {
            lines.push(std::mem::replace(&mut current, indent.to_string()));
            current_w = indent_w;
        }
        if current_w > indent_w {
            current.push(' ');
            current_w += 1;
        }
        current.push_str(word);
        current_w += word_w;
    }
    if current_w > indent_w || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text(" ", "Invalid file extension. Only .vcf files are allowed.", 24),
            vec![
                " Invalid file extension.",
                " Only .vcf files are",
                " allowed.",
            ]
        );
    }

    #[test]
    fn wide_text_wraps_by_cells() {
        assert_eq!(wrap_text("", "李雷 韩梅梅", 6), vec!["李雷", "韩梅梅"]);
    }

    #[test]
    fn empty_message_still_yields_a_line() {
        assert_eq!(wrap_text(" ", "", 10), vec![" "]);
    }

    #[test]
    fn centered_rect() {
        assert_eq!(
            centered_rect_fixed(10, 4, Rect::new(0, 0, 30, 10)),
            Rect::new(10, 3, 10, 4)
        );
    }
}
