use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;
use crate::tui::nav::Action;

pub(super) fn handle_detail(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.save_detail(),
        KeyCode::Esc => app.dispatch(Action::Cancel),
        _ => {
            if let Some(detail) = &mut app.detail {
                detail.name.handle_key(key);
            }
        }
    }
}
