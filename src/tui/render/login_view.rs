use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::form::{render_buttons, render_input_row};
use crate::tui::app::{App, LoginFocus};

const LABEL_W: u16 = 16;
const FORM_W: u16 = 52;

pub fn render_login_view(frame: &mut Frame, app: &App, area: Rect) {
    let form = app.login.focus;
    let width = FORM_W.min(area.width.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let row = |offset: u16| Rect::new(x, area.y + offset, width, 1);
    if area.height < 8 {
        return;
    }

    let host = app.config.database.host.as_str();
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("Host: {}", if host.is_empty() { "localhost" } else { host }),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ))),
        row(1),
    );

    render_input_row(
        frame,
        app,
        row(3),
        "Username:",
        LABEL_W,
        &app.login.username,
        form == LoginFocus::Username,
    );
    render_input_row(
        frame,
        app,
        row(4),
        "Password:",
        LABEL_W,
        &app.login.password,
        form == LoginFocus::Password,
    );
    render_input_row(
        frame,
        app,
        row(5),
        "Database Name:",
        LABEL_W,
        &app.login.database,
        form == LoginFocus::Database,
    );

    let focused_button = match form {
        LoginFocus::Ok => Some(0),
        LoginFocus::Cancel => Some(1),
        _ => None,
    };
    render_buttons(
        frame,
        app,
        Rect::new(x + LABEL_W, area.y + 7, width.saturating_sub(LABEL_W), 1),
        &["OK", "Cancel"],
        focused_button,
    );
}
