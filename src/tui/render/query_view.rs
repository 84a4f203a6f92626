use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ops::report::month_name;
use crate::tui::app::App;

/// Result pane plus the list of available queries
pub fn render_query_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // label
            Constraint::Min(3),    // results
            Constraint::Length(3), // query choices
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " Query Results:",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))),
        chunks[0],
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let results = match &app.query.results {
        Some(text) => Paragraph::new(text.as_str())
            .style(Style::default().fg(app.theme.text).bg(bg))
            .scroll((app.query.scroll, 0)),
        None => Paragraph::new(Span::styled(
            "Choose a query below.",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    };
    frame.render_widget(results.block(block), chunks[1]);

    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let choices = vec![
        Line::from(vec![
            Span::styled(" a ", key_style),
            Span::styled("Display all contacts", text_style),
        ]),
        Line::from(vec![
            Span::styled(" b ", key_style),
            Span::styled(
                format!("Find contacts born in {}", month_name(app.query.month)),
                text_style,
            ),
            Span::styled(
                "  (\u{2190}/\u{2192} change month)",
                Style::default().fg(app.theme.dim).bg(bg),
            ),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(choices).style(Style::default().bg(bg)),
        Rect {
            y: chunks[2].y + 1,
            height: chunks[2].height.saturating_sub(1),
            ..chunks[2]
        },
    );
}
