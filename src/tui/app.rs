use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::card::CardLibrary;
use crate::db::Credentials;
use crate::model::{AppConfig, CardSummary};
use crate::ops::contact_ops::{self, FlowError};
use crate::ops::report;
use crate::ops::sync::SyncReport;
use crate::session::Session;

use super::field::TextField;
use super::input;
use super::nav::{Action, NavStack, Step, View};
use super::render;
use super::theme::Theme;

/// Month the birthday query starts on
pub const DEFAULT_QUERY_MONTH: u32 = 6;

/// Focusable widgets of the Login view, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Database,
    Ok,
    Cancel,
}

impl LoginFocus {
    const ORDER: [LoginFocus; 5] = [
        LoginFocus::Username,
        LoginFocus::Password,
        LoginFocus::Database,
        LoginFocus::Ok,
        LoginFocus::Cancel,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: TextField,
    pub password: TextField,
    pub database: TextField,
    pub focus: LoginFocus,
}

impl Default for LoginForm {
    fn default() -> Self {
        LoginForm {
            username: TextField::new(),
            password: TextField::masked(),
            database: TextField::new(),
            focus: LoginFocus::Username,
        }
    }
}

impl LoginForm {
    /// The input under focus, if focus is on an input rather than a button
    pub fn focused_field_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            LoginFocus::Username => Some(&mut self.username),
            LoginFocus::Password => Some(&mut self.password),
            LoginFocus::Database => Some(&mut self.database),
            LoginFocus::Ok | LoginFocus::Cancel => None,
        }
    }

    pub fn credentials(&self, host: &str) -> Credentials {
        Credentials {
            host: host.to_string(),
            username: self.username.value().to_string(),
            password: self.password.value().to_string(),
            database: self.database.value().to_string(),
        }
    }
}

/// List view: file names of valid cards and the selection
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub cards: Vec<String>,
    pub cursor: usize,
}

impl ListState {
    pub fn selected(&self) -> Option<&str> {
        self.cards.get(self.cursor).map(String::as_str)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.cards.len() {
            self.cursor += 1;
        }
    }
}

/// Detail view: what the library reported, plus the editable name
#[derive(Debug, Clone)]
pub struct DetailState {
    pub filename: String,
    pub summary: CardSummary,
    pub name: TextField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateFocus {
    Filename,
    Contact,
}

#[derive(Debug, Clone)]
pub struct CreateForm {
    pub filename: TextField,
    pub contact: TextField,
    pub focus: CreateFocus,
}

impl Default for CreateForm {
    fn default() -> Self {
        CreateForm {
            filename: TextField::new(),
            contact: TextField::new(),
            focus: CreateFocus::Filename,
        }
    }
}

impl CreateForm {
    pub fn focused_field_mut(&mut self) -> &mut TextField {
        match self.focus {
            CreateFocus::Filename => &mut self.filename,
            CreateFocus::Contact => &mut self.contact,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            CreateFocus::Filename => CreateFocus::Contact,
            CreateFocus::Contact => CreateFocus::Filename,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    AllContacts,
    BornInMonth,
}

/// Query view: selected month and the last result text
#[derive(Debug, Clone)]
pub struct QueryState {
    pub month: u32,
    pub last: Option<QueryKind>,
    pub results: Option<String>,
    pub scroll: u16,
}

impl Default for QueryState {
    fn default() -> Self {
        QueryState {
            month: DEFAULT_QUERY_MONTH,
            last: None,
            results: None,
            scroll: 0,
        }
    }
}

/// Modal message. Acknowledging it only marks it; it is removed at the
/// start of the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub message: String,
    pub dismiss_pending: bool,
}

/// Main application state
pub struct App {
    pub config: AppConfig,
    library: Rc<dyn CardLibrary>,
    pub nav: NavStack,
    /// Present between login and exit
    pub session: Option<Session>,
    pub theme: Theme,
    pub should_quit: bool,
    pub popup: Option<Popup>,
    pub login: LoginForm,
    pub list: ListState,
    pub detail: Option<DetailState>,
    pub create: CreateForm,
    pub query: QueryState,
    /// Outcome of the synchronization run at login
    pub last_sync: Option<SyncReport>,
}

impl App {
    pub fn new(config: AppConfig, library: Rc<dyn CardLibrary>) -> Self {
        let theme = Theme::from_config(&config.ui);
        App {
            config,
            library,
            nav: NavStack::new(),
            session: None,
            theme,
            should_quit: false,
            popup: None,
            login: LoginForm::default(),
            list: ListState::default(),
            detail: None,
            create: CreateForm::default(),
            query: QueryState::default(),
            last_sync: None,
        }
    }

    pub fn view(&self) -> &View {
        self.nav.current()
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.popup = Some(Popup {
            title: "Error".to_string(),
            message: message.into(),
            dismiss_pending: false,
        });
    }

    /// Acknowledge the popup; it goes away on the next tick.
    pub fn dismiss_popup(&mut self) {
        if let Some(popup) = &mut self.popup {
            popup.dismiss_pending = true;
        }
    }

    /// Start-of-frame housekeeping, run before drawing.
    pub fn tick(&mut self) {
        if self.popup.as_ref().is_some_and(|p| p.dismiss_pending) {
            self.popup = None;
        }
    }

    /// Move between views and run the entered view's setup.
    pub fn dispatch(&mut self, action: Action) {
        match self.nav.apply(action) {
            Step::Replace(view) => self.enter_view(view),
            Step::Terminate => self.shutdown(),
            Step::Stay => {}
        }
    }

    fn enter_view(&mut self, view: View) {
        match view {
            View::Login => self.login = LoginForm::default(),
            View::List => {
                self.detail = None;
                self.refresh_list();
            }
            View::Detail { filename } => self.open_detail(filename),
            View::Create => self.create = CreateForm::default(),
            View::Query => {
                self.query.results = None;
                self.query.last = None;
                self.query.scroll = 0;
            }
        }
    }

    /// Re-read the valid card names, keeping the cursor in range.
    pub fn refresh_list(&mut self) {
        self.list.cards = match &self.session {
            Some(session) => session.valid_card_names(),
            None => Vec::new(),
        };
        if self.list.cursor >= self.list.cards.len() {
            self.list.cursor = self.list.cards.len().saturating_sub(1);
        }
    }

    fn open_detail(&mut self, filename: String) {
        let Some(session) = &self.session else {
            return;
        };
        let result = session.store.read_summary(&filename);
        match result {
            Ok(summary) => {
                let mut name = TextField::new();
                name.set(&summary.name);
                self.detail = Some(DetailState {
                    filename,
                    summary,
                    name,
                });
            }
            Err(e) => {
                self.show_error(FlowError::from(e).to_string());
                self.nav.replace(View::List);
                self.enter_view(View::List);
            }
        }
    }

    pub fn submit_login(&mut self) {
        let creds = self.login.credentials(&self.config.database.host);
        match contact_ops::login(&self.config, Rc::clone(&self.library), &creds) {
            Ok((session, report)) => {
                self.session = Some(session);
                self.last_sync = Some(report);
                self.login.password.clear();
                self.dispatch(Action::LoginSucceeded);
            }
            Err(e) => {
                warn!("event=login module=tui status=error error={}", e);
                self.show_error(e.to_string());
            }
        }
    }

    pub fn save_detail(&mut self) {
        let result = match (&self.session, &self.detail) {
            (Some(session), Some(detail)) => {
                contact_ops::save_contact_name(session, &detail.filename, detail.name.value())
            }
            _ => return,
        };
        match result {
            Ok(_) => self.dispatch(Action::Saved),
            Err(e) => self.show_error(e.to_string()),
        }
    }

    pub fn save_create(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let result = contact_ops::create_contact(
            session,
            self.create.filename.value(),
            self.create.contact.value(),
        );
        match result {
            Ok(_) => self.dispatch(Action::Saved),
            Err(e) => self.show_error(e.to_string()),
        }
    }

    pub fn run_query(&mut self, kind: QueryKind) {
        let Some(session) = &self.session else {
            return;
        };
        let month = self.query.month;
        let text = match kind {
            QueryKind::AllContacts => session
                .repo
                .all_contacts()
                .map(|rows| report::contacts_report(&rows)),
            QueryKind::BornInMonth => session
                .repo
                .contacts_born_in_month(month)
                .map(|rows| report::birthdays_report(&rows, month)),
        };
        match text {
            Ok(text) => {
                self.query.results = Some(text);
                self.query.last = Some(kind);
                self.query.scroll = 0;
                self.dispatch(Action::RunQuery);
            }
            Err(e) => self.show_error(FlowError::from(e).to_string()),
        }
    }

    /// Step the birthday month forward or back, re-running a birthday query
    /// that is on screen.
    pub fn shift_query_month(&mut self, forward: bool) {
        self.query.month = if forward {
            report::next_month(self.query.month)
        } else {
            report::prev_month(self.query.month)
        };
        if self.query.last == Some(QueryKind::BornInMonth) {
            self.run_query(QueryKind::BornInMonth);
        }
    }

    /// Close the session (if any) and stop the event loop.
    pub fn shutdown(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
        if !self.should_quit {
            info!("event=app_exit module=tui status=ok");
        }
        self.should_quit = true;
    }
}

/// Run the TUI application
pub fn run(config: AppConfig, library: Rc<dyn CardLibrary>) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config, library);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // The connection is closed even when the loop bailed out on an error
    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::fake::FakeLibrary;
    use crate::tui::render::test_helpers::*;
    use std::fs;

    #[test]
    fn login_focus_cycles_both_ways() {
        assert_eq!(LoginFocus::Cancel.next(), LoginFocus::Username);
        assert_eq!(LoginFocus::Username.prev(), LoginFocus::Cancel);
        assert_eq!(LoginFocus::Password.next(), LoginFocus::Database);
    }

    #[test]
    fn popup_is_removed_on_the_tick_after_dismissal() {
        let (_tmp, mut app) = app_at_login(&[]);
        app.show_error("boom");
        app.tick();
        assert!(app.popup.is_some());

        app.dismiss_popup();
        assert!(app.popup.as_ref().unwrap().dismiss_pending);
        app.tick();
        assert!(app.popup.is_none());
    }

    #[test]
    fn empty_login_fields_show_popup_and_stay() {
        let (_tmp, mut app) = app_at_login(&[]);
        app.submit_login();
        assert_eq!(app.view(), &View::Login);
        assert_eq!(
            app.popup.as_ref().map(|p| p.message.as_str()),
            Some("All fields are required!")
        );
        assert!(app.session.is_none());
    }

    #[test]
    fn login_lists_only_valid_cards() {
        let (_tmp, app) = logged_in_app(&[
            ("b.vcf", "BEGIN:VCARD\r\nFN:Broken\r\n".to_string()),
            ("a.vcf", card("Alice")),
        ]);
        assert_eq!(app.view(), &View::List);
        assert_eq!(app.list.cards, vec!["a.vcf".to_string()]);
        assert_eq!(app.last_sync.as_ref().map(|r| r.inserted), Some(2));
    }

    #[test]
    fn unreadable_card_returns_to_list_with_popup() {
        let (tmp, mut app) = logged_in_app(&[("a.vcf", card("Alice"))]);
        fs::remove_file(tmp.path().join("cards").join("a.vcf")).unwrap();

        app.dispatch(Action::Open("a.vcf".into()));
        assert_eq!(app.view(), &View::List);
        assert!(app.detail.is_none());
        assert!(app.popup.is_some());
        assert!(app.list.cards.is_empty());
    }

    #[test]
    fn detail_save_renames_and_returns() {
        let (_tmp, mut app) = logged_in_app(&[("a.vcf", card("Alice"))]);
        app.dispatch(Action::Open("a.vcf".into()));
        let detail = app.detail.as_mut().unwrap();
        assert_eq!(detail.name.value(), "Alice");
        detail.name.set("Alicia");

        app.save_detail();
        assert_eq!(app.view(), &View::List);
        assert!(app.popup.is_none());
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.store.read_summary("a.vcf").unwrap().name, "Alicia");
    }

    #[test]
    fn failed_rename_stays_in_detail() {
        let (_tmp, mut app) =
            logged_in_app_with(FakeLibrary::failing_updates(), &[("a.vcf", card("Alice"))]);
        app.dispatch(Action::Open("a.vcf".into()));
        app.detail.as_mut().unwrap().name.set("Alicia");

        app.save_detail();
        assert!(matches!(app.view(), View::Detail { .. }));
        assert_eq!(
            app.popup.as_ref().map(|p| p.message.as_str()),
            Some("Failed to update name!")
        );
    }

    #[test]
    fn create_adds_card_to_list() {
        let (_tmp, mut app) = logged_in_app(&[]);
        app.dispatch(Action::NewCard);
        app.create.filename.set("zoe.vcf");
        app.create.contact.set("Zoe");
        app.save_create();

        assert_eq!(app.view(), &View::List);
        assert_eq!(app.list.cards, vec!["zoe.vcf".to_string()]);
    }

    #[test]
    fn queries_fill_results_in_place() {
        let (_tmp, mut app) = logged_in_app(&[(
            "a.vcf",
            "BEGIN:VCARD\r\nFN:Alice\r\nBDAY:19900612T000000\r\nEND:VCARD\r\n".to_string(),
        )]);
        app.dispatch(Action::Queries);

        app.run_query(QueryKind::BornInMonth);
        assert_eq!(app.view(), &View::Query);
        assert!(app.query.results.as_deref().unwrap().contains("Alice"));

        app.shift_query_month(true);
        assert_eq!(app.query.month, 7);
        assert_eq!(
            app.query.results.as_deref(),
            Some("No contacts found in July.")
        );

        app.run_query(QueryKind::AllContacts);
        assert!(app.query.results.as_deref().unwrap().contains("a.vcf"));
    }

    #[test]
    fn exit_closes_the_session() {
        let (_tmp, mut app) = logged_in_app(&[]);
        app.dispatch(Action::Exit);
        assert!(app.should_quit);
        assert!(app.session.is_none());
    }
}
