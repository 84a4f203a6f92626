use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::form::render_input_row;
use crate::tui::app::{App, CreateFocus};

const LABEL_W: u16 = 18;

pub fn render_create_view(frame: &mut Frame, app: &App, area: Rect) {
    if area.height < 6 {
        return;
    }
    let width = area.width.saturating_sub(2).min(70);
    let row = |offset: u16| Rect::new(area.x + 1, area.y + offset, width, 1);
    let form = &app.create;
    let filename_label = format!("Filename (.{}):", app.config.cards.extension);

    render_input_row(
        frame,
        app,
        row(1),
        &filename_label,
        LABEL_W,
        &form.filename,
        form.focus == CreateFocus::Filename,
    );
    render_input_row(
        frame,
        app,
        row(2),
        "Contact:",
        LABEL_W,
        &form.contact,
        form.focus == CreateFocus::Contact,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "A new card holds only the contact name; add details with other tools.",
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ))),
        row(4),
    );
}
