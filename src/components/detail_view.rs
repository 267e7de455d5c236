use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{SelectList, SelectListBehavior, SelectListProps};

use super::catalog_list::card_line;
use super::theme::{self, ACCENT_GOLD, BG_PANEL, PORTAL_GREEN, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::controller::{DetailController, DetailStatus};
use crate::model::{unknown_if_none, Collection, Entity};
use crate::route::Route;
use crate::surface::SHIMMER_TICKS;

/// Ghost rows shown while the primary record loads.
pub const INFO_GHOST_ROWS: usize = 6;
/// Ghost rows shown while related records load.
pub const RELATED_GHOST_ROWS: usize = 3;

pub struct DetailViewProps<'a> {
    pub detail: &'a DetailController,
    pub related_selected: usize,
    pub tick: u64,
    pub is_focused: bool,
}

pub struct DetailView {
    related: SelectList,
}

impl Default for DetailView {
    fn default() -> Self {
        Self {
            related: SelectList::new(),
        }
    }
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for DetailView {
    type Props<'a> = DetailViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let is_character = matches!(props.detail.primary, Some(Entity::Character(_)));
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Backspace | KeyCode::Esc | KeyCode::Char('h') => {
                    Some(Action::NavigateBack)
                }
                KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionMove(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionMove(1)),
                KeyCode::Enter => Some(Action::OpenSelected),
                KeyCode::Char('l') if is_character => Some(Action::LocationOpen),
                _ => None,
            },
            EventKind::Scroll { delta, .. } => Some(Action::SelectionMove(*delta as i16)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let detail = props.detail;
        if detail.status == DetailStatus::NotFound {
            render_not_found(frame, area, detail);
            return;
        }

        let chunks = Layout::vertical([
            Constraint::Length(INFO_GHOST_ROWS as u16 + 3),
            Constraint::Min(3),
        ])
        .split(area);
        let phase = (props.tick % SHIMMER_TICKS) as f32 / SHIMMER_TICKS as f32;

        let title = detail
            .primary
            .as_ref()
            .map(|entity| entity.name().to_string())
            .unwrap_or_else(|| "Loading...".to_string());
        let info_block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(false))
            .title(Span::styled(format!(" {title} "), theme::title_style()))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let info_area = info_block.inner(chunks[0]);
        frame.render_widget(info_block, chunks[0]);

        let info: Vec<Line> = match &detail.primary {
            Some(entity) => info_rows(entity),
            None => (0..INFO_GHOST_ROWS)
                .map(|row| theme::ghost_line(detail.collection, row, info_area.width, phase))
                .collect(),
        };
        frame.render_widget(Paragraph::new(info).wrap(Wrap { trim: true }), info_area);

        let related_title = related_title(detail.collection);
        let related_block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(props.is_focused))
            .title(Span::styled(format!(" {related_title} "), theme::title_style()))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let related_area = related_block.inner(chunks[1]);
        frame.render_widget(related_block, chunks[1]);

        if detail.primary.is_none() || detail.related_loading {
            let kind = detail.collection.related();
            let lines: Vec<Line> = (0..RELATED_GHOST_ROWS)
                .map(|row| theme::ghost_line(kind, row, related_area.width, phase))
                .collect();
            frame.render_widget(Paragraph::new(lines), related_area);
            return;
        }
        if detail.related.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    format!("No {} to show.", related_title.to_lowercase()),
                    Style::default().fg(TEXT_DIM),
                )),
                related_area,
            );
            return;
        }

        let items: Vec<Line<'static>> = detail.related.iter().map(card_line).collect();
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: props.related_selected.min(items.len().saturating_sub(1)),
            is_focused: props.is_focused,
            style: theme::list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::RelatedSelect,
            render_item: &|item| item.clone(),
        };
        self.related.render(frame, related_area, list_props);
    }
}

fn render_not_found(frame: &mut Frame, area: Rect, detail: &DetailController) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(true))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::styled(
            format!("{} not found", singular_title(detail.collection)),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::from(vec![
            Span::styled("Backspace", theme::title_style()),
            Span::styled(
                format!(" Back to {}", back_label(&detail.back)),
                Style::default().fg(TEXT_DIM),
            ),
        ]),
    ];
    let top = inner.height.saturating_sub(lines.len() as u16) / 2;
    let area = Rect {
        y: inner.y + top,
        height: (lines.len() as u16).min(inner.height),
        ..inner
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn info_rows(entity: &Entity) -> Vec<Line<'static>> {
    match entity {
        Entity::Character(character) => {
            let location = character
                .location
                .as_ref()
                .map(|link| link.name.as_str())
                .filter(|name| !name.is_empty());
            let mut location_row = info_row("Location", unknown_if_none(location));
            if character.location.as_ref().and_then(|link| link.id()).is_some() {
                location_row
                    .spans
                    .push(Span::styled("  [l] open", Style::default().fg(PORTAL_GREEN)));
            }
            vec![
                info_row("Gender", unknown_if_none(character.gender.as_deref())),
                info_row("Status", unknown_if_none(character.status.as_deref())),
                info_row("Specie", unknown_if_none(character.species.as_deref())),
                info_row(
                    "Origin",
                    unknown_if_none(
                        character
                            .origin
                            .as_ref()
                            .map(|link| link.name.as_str())
                            .filter(|name| !name.is_empty()),
                    ),
                ),
                info_row("Type", unknown_if_none(character.kind.as_deref())),
                location_row,
            ]
        }
        Entity::Location(location) => vec![
            info_row("Type", unknown_if_none(location.kind.as_deref())),
            info_row("Dimension", unknown_if_none(location.dimension.as_deref())),
        ],
        Entity::Episode(episode) => vec![
            info_row("Episode", unknown_if_none(episode.episode.as_deref())),
            info_row("Air date", unknown_if_none(episode.air_date.as_deref())),
        ],
    }
}

fn info_row(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(TEXT_DIM)),
        Span::styled(value.to_string(), Style::default().fg(ACCENT_GOLD)),
    ])
}

fn related_title(collection: Collection) -> &'static str {
    match collection {
        Collection::Characters => "Episodes",
        Collection::Locations => "Residents",
        Collection::Episodes => "Cast",
    }
}

fn singular_title(collection: Collection) -> &'static str {
    match collection {
        Collection::Characters => "Character",
        Collection::Locations => "Location",
        Collection::Episodes => "Episode",
    }
}

fn back_label(route: &Route) -> String {
    match route {
        Route::List(collection) => collection.plural().to_string(),
        Route::Detail { collection, .. } => collection.endpoint().to_string(),
    }
}
