//! Result panel: a movie record turned into a display model, then drawn
//!
//! `render_result` is pure so the panel's content can be checked without a
//! terminal; `draw_result` lays the model out with ratatui.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::app::LoadingState;
use crate::models::{present_url, ActorRef, MovieDetail, DEFAULT_CHARACTER};
use crate::ui::Theme;

pub const IMDB_TITLE_BASE: &str = "https://www.imdb.com/title/";
pub const NO_POSTER: &str = "No poster";

/// Width of the poster column
const POSTER_WIDTH: u16 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poster {
    Url(String),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Photo(String),
    Initials(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastCard {
    pub name: String,
    pub role: String,
    pub avatar: Avatar,
}

/// Everything the result panel shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub poster: Poster,
    pub title: String,
    pub pills: Vec<String>,
    pub imdb_url: String,
    pub cast: Vec<CastCard>,
}

/// Display model for `detail`; `None` hides the panel
pub fn render_result(detail: Option<&MovieDetail>) -> Option<ResultView> {
    let detail = detail?;

    let poster = match present_url(detail.poster.clone()) {
        Some(url) => Poster::Url(url),
        None => Poster::Placeholder,
    };

    let mut pills = vec![format!("Year: {}", detail.year)];
    if let Some(genre) = non_empty(&detail.genre) {
        pills.push(genre.to_string());
    }
    if let Some(rated) = non_empty(&detail.rated) {
        pills.push(format!("Rated: {}", rated));
    }
    if let Some(runtime) = non_empty(&detail.runtime) {
        pills.push(runtime.to_string());
    }

    Some(ResultView {
        poster,
        title: detail.title.clone(),
        pills,
        imdb_url: format!("{}{}/", IMDB_TITLE_BASE, detail.imdb_id),
        cast: detail.actors.iter().map(cast_card).collect(),
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn cast_card(actor: &ActorRef) -> CastCard {
    let role = if actor.character.is_empty() {
        DEFAULT_CHARACTER.to_string()
    } else {
        actor.character.clone()
    };

    let avatar = match actor.photo.as_deref().filter(|p| !p.is_empty()) {
        Some(url) => Avatar::Photo(url.to_string()),
        None => Avatar::Initials(initials(&actor.name)),
    };

    CastCard {
        name: actor.name.clone(),
        role,
        avatar,
    }
}

/// First letter of the first two words, uppercased
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

// =============================================================================
// Drawing
// =============================================================================

/// Draw the panel for `view`, or a hint/status when there is nothing to show
pub fn draw_result(frame: &mut Frame, area: Rect, view: Option<&ResultView>, loading: &LoadingState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" NOW SHOWING ", Theme::title()));

    let Some(view) = view else {
        let (msg, style) = match loading {
            LoadingState::Loading(msg) => (msg.as_deref().unwrap_or("Loading..."), Theme::loading()),
            LoadingState::Error(msg) => (msg.as_str(), Theme::error()),
            LoadingState::Idle => ("Start typing a movie title", Theme::dimmed()),
        };
        let empty = Paragraph::new(msg)
            .style(style)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(POSTER_WIDTH), Constraint::Min(10)])
        .split(inner);

    draw_poster(frame, columns[0], &view.poster);
    draw_info(frame, columns[1], view);
}

fn draw_poster(frame: &mut Frame, area: Rect, poster: &Poster) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let body = match poster {
        Poster::Url(url) => Paragraph::new(url.as_str())
            .style(Theme::link())
            .wrap(Wrap { trim: true }),
        Poster::Placeholder => Paragraph::new(NO_POSTER)
            .style(Theme::dimmed())
            .alignment(Alignment::Center),
    };

    frame.render_widget(body.block(block), area);
}

fn draw_info(frame: &mut Frame, area: Rect, view: &ResultView) {
    let mut lines = vec![
        Line::from(Span::styled(view.title.clone(), Theme::title())),
        Line::from(""),
    ];

    let mut pills = Vec::new();
    for pill in &view.pills {
        if !pills.is_empty() {
            pills.push(Span::raw(" "));
        }
        pills.push(Span::styled(format!(" {} ", pill), Theme::pill()));
    }
    lines.push(Line::from(pills));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("View on IMDb: ", Theme::dimmed()),
        Span::styled(view.imdb_url.clone(), Theme::link()),
    ]));

    if !view.cast.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Top Cast", Theme::secondary())));
        for card in &view.cast {
            let avatar = match &card.avatar {
                Avatar::Photo(_) => " ◉ ".to_string(),
                Avatar::Initials(s) => format!(" {:<2}", s),
            };
            lines.push(Line::from(vec![
                Span::styled(avatar, Theme::avatar()),
                Span::raw(" "),
                Span::styled(card.name.clone(), Theme::accent()),
                Span::styled(format!("  {}", card.role), Theme::dimmed()),
            ]));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
