use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Paragraph;

use super::form::{render_input_row, value_line};
use crate::tui::app::App;

const LABEL_W: u16 = 10;

/// Card summary with the contact name as the one editable row
pub fn render_detail_view(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };
    if area.height < 7 {
        return;
    }
    let inner = Rect::new(
        area.x + 1,
        area.y + 1,
        area.width.saturating_sub(2),
        area.height - 1,
    );
    let row = |offset: u16| Rect::new(inner.x, inner.y + offset, inner.width, 1);
    let bg = Style::default().bg(app.theme.background);

    frame.render_widget(
        Paragraph::new(value_line(app, "File:", detail.summary.file.clone())).style(bg),
        row(0),
    );
    render_input_row(
        frame,
        app,
        Rect::new(inner.x, inner.y + 2, inner.width.min(60), 1),
        "Contact:",
        LABEL_W,
        &detail.name,
        true,
    );
    let summary = &detail.summary;
    let rows = [
        value_line(app, "Birthday:", summary.birthday_label().to_string()),
        value_line(app, "Anniversary:", summary.anniversary_label().to_string()),
        value_line(app, "Other Properties:", summary.other_props.to_string()),
    ];
    for (i, line) in rows.into_iter().enumerate() {
        frame.render_widget(Paragraph::new(line).style(bg), row(4 + i as u16));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::nav::Action;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn shows_summary_fields() {
        let (_tmp, mut app) = logged_in_app(&[(
            "a.vcf",
            "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Alice\r\nBDAY:19900101T000000\r\nEMAIL:a@example.com\r\nEND:VCARD\r\n"
                .to_string(),
        )]);
        app.dispatch(Action::Open("a.vcf".into()));
        let output = render_to_string(TERM_W, 12, |frame, area| {
            render_detail_view(frame, &app, area);
        });
        assert!(output.contains("File: a.vcf"));
        assert!(output.contains("Contact:  Alice"));
        assert!(output.contains("Birthday: Date: 19900101, Time: 000000, UTC: false"));
        assert!(output.contains("Anniversary: None"));
        assert!(output.contains("Other Properties: 1"));
    }
}
