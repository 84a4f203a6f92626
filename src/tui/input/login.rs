use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, LoginFocus};
use crate::tui::nav::Action;

pub(super) fn handle_login(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Down => app.login.focus = app.login.focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.login.focus = app.login.focus.prev(),
        KeyCode::Esc => app.dispatch(Action::Cancel),
        KeyCode::Enter => match app.login.focus {
            LoginFocus::Ok => app.submit_login(),
            LoginFocus::Cancel => app.dispatch(Action::Cancel),
            LoginFocus::Database => app.submit_login(),
            _ => app.login.focus = app.login.focus.next(),
        },
        _ => {
            if let Some(field) = app.login.focused_field_mut() {
                field.handle_key(key);
            }
        }
    }
}
