use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, QueryKind};
use crate::tui::nav::Action;

pub(super) fn handle_query(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('a') => app.run_query(QueryKind::AllContacts),
        KeyCode::Char('b') => app.run_query(QueryKind::BornInMonth),
        KeyCode::Left => app.shift_query_month(false),
        KeyCode::Right => app.shift_query_month(true),
        KeyCode::Up => app.query.scroll = app.query.scroll.saturating_sub(1),
        KeyCode::Down => {
            let lines = app
                .query
                .results
                .as_deref()
                .map_or(0, |r| r.lines().count());
            if (app.query.scroll as usize) + 1 < lines {
                app.query.scroll += 1;
            }
        }
        KeyCode::Esc | KeyCode::Char('q') => app.dispatch(Action::Cancel),
        _ => {}
    }
}
