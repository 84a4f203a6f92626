pub mod create_view;
pub mod detail_view;
pub mod form;
pub mod list_view;
pub mod login_view;
pub mod popup;
pub mod query_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::App;
use super::nav::View;

/// Main render function: dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    match app.view() {
        View::Login => login_view::render_login_view(frame, app, chunks[1]),
        View::List => list_view::render_list_view(frame, app, chunks[1]),
        View::Detail { .. } => detail_view::render_detail_view(frame, app, chunks[1]),
        View::Create => create_view::render_create_view(frame, app, chunks[1]),
        View::Query => query_view::render_query_view(frame, app, chunks[1]),
    }

    status_row::render_status_row(frame, app, chunks[2]);

    // Popup (rendered on top of everything)
    if let Some(p) = &app.popup {
        popup::render_popup(frame, app, p, area);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let title = Line::from(vec![
        Span::styled(
            " vcm ",
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", app.view().title()),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    let separator = Line::from(Span::styled(
        "\u{2500}".repeat(area.width as usize),
        Style::default().fg(app.theme.dim).bg(bg),
    ));
    frame.render_widget(
        Paragraph::new(vec![title, separator]).style(Style::default().bg(bg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::nav::Action;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn header_shows_view_title() {
        let (_tmp, mut app) = logged_in_app(&[("a.vcf", card("Alice"))]);
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        assert!(output.lines().next().unwrap().contains("vCard Manager"));

        app.dispatch(Action::Open("a.vcf".into()));
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        assert!(output.lines().next().unwrap().contains("Viewing: a.vcf"));
    }

    #[test]
    fn popup_draws_over_the_view() {
        let (_tmp, mut app) = app_at_login(&[]);
        app.show_error("All fields are required!");
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        assert!(output.contains("All fields are required!"));

        app.dismiss_popup();
        app.tick();
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        assert!(!output.contains("All fields are required!"));
    }
}
