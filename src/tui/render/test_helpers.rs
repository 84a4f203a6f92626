use std::fs;
use std::rc::Rc;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::card::fake::FakeLibrary;
use crate::card::store::card_template;
use crate::model::{AppConfig, CardsConfig, DatabaseConfig};
use crate::tui::app::App;
use crate::tui::nav::View;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Text of a minimal valid card.
pub fn card(name: &str) -> String {
    card_template(name)
}

/// Config rooted in `tmp`: cards under `cards/`, databases under `data/`.
pub fn test_config(tmp: &TempDir) -> AppConfig {
    AppConfig {
        cards: CardsConfig {
            dir: tmp.path().join("cards"),
            extension: "vcf".into(),
        },
        database: DatabaseConfig {
            host: "localhost".into(),
            data_dir: tmp.path().join("data"),
            create_if_missing: true,
        },
        ..Default::default()
    }
}

/// An App on the Login view with `cards` written to its card directory.
pub fn app_at_login(cards: &[(&str, String)]) -> (TempDir, App) {
    app_at_login_with(FakeLibrary::default(), cards)
}

pub fn app_at_login_with(library: FakeLibrary, cards: &[(&str, String)]) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    fs::create_dir_all(&config.cards.dir).unwrap();
    for (name, text) in cards {
        fs::write(config.cards.dir.join(name), text).unwrap();
    }
    let app = App::new(config, Rc::new(library));
    (tmp, app)
}

/// An App that has logged in and is showing the List view.
pub fn logged_in_app(cards: &[(&str, String)]) -> (TempDir, App) {
    logged_in_app_with(FakeLibrary::default(), cards)
}

pub fn logged_in_app_with(library: FakeLibrary, cards: &[(&str, String)]) -> (TempDir, App) {
    let (tmp, mut app) = app_at_login_with(library, cards);
    app.login.username.set("me");
    app.login.password.set("pw");
    app.login.database.set("book");
    app.submit_login();
    assert_eq!(app.view(), &View::List, "login failed: {:?}", app.popup);
    (tmp, app)
}
