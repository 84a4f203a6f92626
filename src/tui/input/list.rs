use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;
use crate::tui::nav::Action;

pub(super) fn handle_list(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.list.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.list.move_down(),
        KeyCode::Home | KeyCode::Char('g') => app.list.cursor = 0,
        KeyCode::End | KeyCode::Char('G') => {
            app.list.cursor = app.list.cards.len().saturating_sub(1);
        }
        KeyCode::Enter | KeyCode::Char('v') => {
            if let Some(filename) = app.list.selected().map(str::to_string) {
                app.dispatch(Action::Open(filename));
            }
        }
        KeyCode::Char('c') => app.dispatch(Action::NewCard),
        KeyCode::Char('d') => app.dispatch(Action::Queries),
        KeyCode::Char('q') | KeyCode::Esc => app.dispatch(Action::Exit),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::super::handle_key;
    use super::super::test_keys::*;
    use crate::tui::nav::View;
    use crate::tui::render::test_helpers::*;
    use crossterm::event::KeyCode;

    #[test]
    fn enter_opens_selected_card() {
        let (_tmp, mut app) =
            logged_in_app(&[("a.vcf", card("Alice")), ("b.vcf", card("Bob"))]);
        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.list.cursor, 1);
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(
            app.view(),
            &View::Detail {
                filename: "b.vcf".into()
            }
        );
        assert_eq!(app.detail.as_ref().unwrap().summary.name, "Bob");
    }

    #[test]
    fn enter_on_empty_list_does_nothing() {
        let (_tmp, mut app) = logged_in_app(&[]);
        handle_key(&mut app, ch('v'));
        assert_eq!(app.view(), &View::List);
    }

    #[test]
    fn shortcut_keys_switch_views() {
        let (_tmp, mut app) = logged_in_app(&[]);
        handle_key(&mut app, ch('c'));
        assert_eq!(app.view(), &View::Create);
        handle_key(&mut app, key(KeyCode::Esc));
        handle_key(&mut app, ch('d'));
        assert_eq!(app.view(), &View::Query);
        handle_key(&mut app, key(KeyCode::Esc));
        handle_key(&mut app, ch('q'));
        assert!(app.should_quit);
    }
}
