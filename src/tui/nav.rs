//! View states and the transitions between them.
//!
//! `reduce` is a pure function of the current view and an action. Side
//! effects (login, saving, queries) happen in the input handlers before the
//! action is dispatched; by the time an action reaches the reducer it has
//! already succeeded.

/// Which full-screen view is displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Login,
    List,
    Detail { filename: String },
    Create,
    Query,
}

impl View {
    /// Title shown in the frame header
    pub fn title(&self) -> String {
        match self {
            View::Login => "Database Login".to_string(),
            View::List => "vCard Manager".to_string(),
            View::Detail { filename } => format!("Viewing: {}", filename),
            View::Create => "Create New vCard".to_string(),
            View::Query => "Database Queries".to_string(),
        }
    }
}

/// Something the user did that may move between views
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoginSucceeded,
    Cancel,
    Open(String),
    NewCard,
    Queries,
    Exit,
    Saved,
    RunQuery,
}

/// What the navigator should do with an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Replace(View),
    Stay,
    Terminate,
}

/// Transition table. Pairs with no entry leave the view unchanged.
pub fn reduce(view: &View, action: Action) -> Step {
    match (view, action) {
        (View::Login, Action::LoginSucceeded) => Step::Replace(View::List),
        (View::Login, Action::Cancel) => Step::Terminate,

        (View::List, Action::Open(filename)) => Step::Replace(View::Detail { filename }),
        (View::List, Action::NewCard) => Step::Replace(View::Create),
        (View::List, Action::Queries) => Step::Replace(View::Query),
        (View::List, Action::Exit | Action::Cancel) => Step::Terminate,

        (View::Detail { .. }, Action::Saved | Action::Cancel) => Step::Replace(View::List),
        (View::Create, Action::Saved | Action::Cancel) => Step::Replace(View::List),

        (View::Query, Action::RunQuery) => Step::Stay,
        (View::Query, Action::Cancel) => Step::Replace(View::List),

        _ => Step::Stay,
    }
}

/// Stack of views. Transitions replace the top, so in practice it holds a
/// single view; it is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStack {
    views: Vec<View>,
    terminated: bool,
}

impl Default for NavStack {
    fn default() -> Self {
        NavStack {
            views: vec![View::Login],
            terminated: false,
        }
    }
}

impl NavStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &View {
        // views is never empty
        &self.views[self.views.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.views.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Put `view` in place of the current one.
    pub fn replace(&mut self, view: View) {
        let last = self.views.len() - 1;
        self.views[last] = view;
    }

    /// Run `action` through the reducer and apply the result. Returns the
    /// step taken so the caller can run enter/exit effects.
    pub fn apply(&mut self, action: Action) -> Step {
        if self.terminated {
            return Step::Stay;
        }
        let step = reduce(self.current(), action);
        match &step {
            Step::Replace(view) => self.replace(view.clone()),
            Step::Terminate => self.terminated = true,
            Step::Stay => {}
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(name: &str) -> View {
        View::Detail {
            filename: name.to_string(),
        }
    }

    #[test]
    fn login_transitions() {
        assert_eq!(
            reduce(&View::Login, Action::LoginSucceeded),
            Step::Replace(View::List)
        );
        assert_eq!(reduce(&View::Login, Action::Cancel), Step::Terminate);
        assert_eq!(reduce(&View::Login, Action::Saved), Step::Stay);
    }

    #[test]
    fn list_transitions() {
        assert_eq!(
            reduce(&View::List, Action::Open("a.vcf".into())),
            Step::Replace(detail("a.vcf"))
        );
        assert_eq!(
            reduce(&View::List, Action::NewCard),
            Step::Replace(View::Create)
        );
        assert_eq!(
            reduce(&View::List, Action::Queries),
            Step::Replace(View::Query)
        );
        assert_eq!(reduce(&View::List, Action::Exit), Step::Terminate);
    }

    #[test]
    fn editors_return_to_list() {
        for view in [detail("a.vcf"), View::Create] {
            assert_eq!(reduce(&view, Action::Saved), Step::Replace(View::List));
            assert_eq!(reduce(&view, Action::Cancel), Step::Replace(View::List));
            assert_eq!(reduce(&view, Action::Exit), Step::Stay);
        }
    }

    #[test]
    fn queries_stay_in_place() {
        assert_eq!(reduce(&View::Query, Action::RunQuery), Step::Stay);
        assert_eq!(
            reduce(&View::Query, Action::Cancel),
            Step::Replace(View::List)
        );
    }

    #[test]
    fn stack_replaces_rather_than_nests() {
        let mut nav = NavStack::new();
        assert_eq!(nav.current(), &View::Login);

        nav.apply(Action::LoginSucceeded);
        nav.apply(Action::Open("a.vcf".into()));
        assert_eq!(nav.current(), &detail("a.vcf"));
        assert_eq!(nav.depth(), 1);

        nav.apply(Action::Cancel);
        assert_eq!(nav.current(), &View::List);
    }

    #[test]
    fn terminate_keeps_last_view_and_ignores_further_actions() {
        let mut nav = NavStack::new();
        nav.apply(Action::LoginSucceeded);
        assert_eq!(nav.apply(Action::Exit), Step::Terminate);
        assert!(nav.is_terminated());
        assert_eq!(nav.current(), &View::List);
        assert_eq!(nav.apply(Action::Queries), Step::Stay);
        assert_eq!(nav.depth(), 1);
    }
}
