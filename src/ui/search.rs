//! Search input and the suggestion dropdown beneath it

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::Typeahead;
use crate::ui::Theme;

/// Most rows the dropdown grows to before it stops
const MAX_DROPDOWN_ROWS: u16 = 8;

/// Render the search box, with a cursor when focused
pub fn draw_input(frame: &mut Frame, area: Rect, typeahead: &Typeahead, focused: bool) {
    let border_style = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let input = typeahead.input();
    let line = if focused {
        let split = input
            .char_indices()
            .nth(typeahead.cursor())
            .map(|(i, _)| i)
            .unwrap_or(input.len());
        let (before, after) = input.split_at(split);
        Line::from(vec![
            Span::styled("⌕ ", Theme::dimmed()),
            Span::raw(before.to_string()),
            Span::styled("│", Theme::keybind()),
            Span::raw(after.to_string()),
        ])
    } else if input.is_empty() {
        Line::from(Span::styled("⌕ Press / to search...", Theme::dimmed()))
    } else {
        Line::from(format!("⌕ {}", input))
    };

    let search_box = Paragraph::new(line).style(Theme::input()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(" SEARCH ", Theme::title())),
    );
    frame.render_widget(search_box, area);
}

/// Area the dropdown occupies just below `anchor`, clipped to `bounds`
pub fn dropdown_area(anchor: Rect, bounds: Rect, rows: usize) -> Rect {
    let height = (rows as u16).min(MAX_DROPDOWN_ROWS) + 2;
    let y = anchor.y + anchor.height;
    let available = bounds.y + bounds.height - y.min(bounds.y + bounds.height);
    Rect {
        x: anchor.x,
        y,
        width: anchor.width,
        height: height.min(available),
    }
}

/// Overlay the suggestion list when it is shown
pub fn draw_suggestions(frame: &mut Frame, anchor: Rect, typeahead: &Typeahead) {
    if !typeahead.is_visible() || typeahead.suggestions().is_empty() {
        return;
    }

    let area = dropdown_area(anchor, frame.area(), typeahead.suggestions().len());
    if area.height < 3 {
        return;
    }

    let items: Vec<ListItem> = typeahead
        .suggestions()
        .iter()
        .map(|s| {
            ListItem::new(Line::from(vec![
                Span::raw(s.title.clone()),
                Span::styled(format!("  {}", s.year), Theme::year()),
            ]))
            .style(Theme::list_item())
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border_focused()),
        )
        .style(Theme::input())
        .highlight_style(Theme::list_item_selected())
        .highlight_symbol("▸ ");

    let mut state = ListState::default().with_selected(typeahead.active());

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}
