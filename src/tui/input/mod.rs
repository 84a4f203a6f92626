mod create;
mod detail;
mod list;
mod login;
mod popup;
mod query;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::App;
use super::nav::View;

/// Handle a key event in the current view
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // An open popup is modal
    if app.popup.is_some() {
        popup::handle_popup(app, key);
        return;
    }

    match app.view() {
        View::Login => login::handle_login(app, key),
        View::List => list::handle_list(app, key),
        View::Detail { .. } => detail::handle_detail(app, key),
        View::Create => create::handle_create(app, key),
        View::Query => query::handle_query(app, key),
    }
}
