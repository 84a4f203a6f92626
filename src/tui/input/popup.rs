use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

/// Enter or Esc acknowledges the popup; every other key is swallowed.
pub(super) fn handle_popup(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        app.dismiss_popup();
    }
}
