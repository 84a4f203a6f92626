use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, CreateFocus};
use crate::tui::nav::Action;

pub(super) fn handle_create(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.dispatch(Action::Cancel),
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => app.save_create(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.create.toggle_focus();
        }
        KeyCode::Enter => match app.create.focus {
            CreateFocus::Filename => app.create.focus = CreateFocus::Contact,
            CreateFocus::Contact => app.save_create(),
        },
        _ => {
            app.create.focused_field_mut().handle_key(key);
        }
    }
}
