use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::theme::{self, BG_PANEL, PORTAL_GREEN, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::model::Collection;
use crate::state::SearchState;

pub struct SearchBarProps<'a> {
    pub collection: Collection,
    pub search: &'a SearchState,
    pub is_focused: bool,
}

/// Free-text search input. Each keystroke restarts the debounce window.
#[derive(Default)]
pub struct SearchBar;

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Enter => Some(Action::SearchSubmit),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(ch) => Some(Action::SearchInput(ch)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let placeholder = match props.collection {
            Collection::Episodes => "Name or code (S01E05, S02)",
            Collection::Characters | Collection::Locations => "Name",
        };
        let input = if props.search.query.is_empty() {
            Span::styled(placeholder, Style::default().fg(TEXT_DIM))
        } else {
            Span::styled(props.search.query.clone(), Style::default().fg(TEXT_MAIN))
        };
        let line = Line::from(vec![
            Span::styled("/", Style::default().fg(PORTAL_GREEN)),
            input,
            Span::styled("_", Style::default().fg(PORTAL_GREEN)),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(props.is_focused))
            .title(Span::styled(
                format!(" Search {} ", props.collection.plural()),
                theme::title_style(),
            ))
            .style(Style::default().bg(BG_PANEL));
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
