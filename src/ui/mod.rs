//! Terminal UI components
//!
//! One screen: logo and search box on top, the suggestion dropdown over the
//! result panel, and a status bar with key hints and backend liveness.

pub mod result;
pub mod search;
pub mod theme;

pub use result::{render_result, Avatar, CastCard, Poster, ResultView};
pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{App, BackendStatus, InputMode};

/// Main render function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Result
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(1)])
        .split(chunks[0]);

    draw_logo(frame, header[0]);
    search::draw_input(
        frame,
        header[1],
        &app.typeahead,
        app.input_mode == InputMode::Editing,
    );

    let view = render_result(app.detail.as_ref());
    result::draw_result(frame, chunks[1], view.as_ref(), &app.loading);
    draw_status_bar(frame, chunks[2], app);

    // Dropdown last so it floats over the result panel
    search::draw_suggestions(frame, header[1], &app.typeahead);
}

fn draw_logo(frame: &mut Frame, area: Rect) {
    let logo = Paragraph::new(Line::from(vec![
        Span::styled("MAR", Theme::title()),
        Span::styled("QUEE", Theme::secondary()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " SEARCH ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::ACCENT),
        ),
    };

    let backend = match &app.backend {
        BackendStatus::Unknown => Span::styled(format!(" {} ", app.backend_url), Theme::warning()),
        BackendStatus::Online(time) => Span::styled(format!(" ● online {} ", time), Theme::success()),
        BackendStatus::Offline(_) => Span::styled(" ● offline ", Theme::error()),
    };

    let mut spans = vec![mode_indicator, backend, Span::raw("│")];
    for (key, desc) in [
        ("↑↓", "move"),
        ("⏎", "open"),
        ("^S", "search"),
        ("^U", "clear"),
        ("^P", "ping"),
        ("^C", "quit"),
    ] {
        spans.push(Span::styled(format!(" {}", key), Theme::keybind()));
        spans.push(Span::styled(format!(":{}", desc), Theme::keybind_desc()));
    }

    let status = Paragraph::new(Line::from(spans)).style(Theme::status_bar());
    frame.render_widget(status, area);
}
