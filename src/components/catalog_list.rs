use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{SelectList, SelectListBehavior, SelectListProps};

use super::theme::{self, ACCENT_GOLD, BG_PANEL, ERROR_RED, PORTAL_GREEN, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::filter;
use crate::model::Entity;
use crate::state::{ListPage, SearchState};
use crate::surface::SurfaceView;

pub struct CatalogListProps<'a> {
    pub page: &'a ListPage,
    pub search: &'a SearchState,
    pub is_focused: bool,
}

/// One collection list: filter header, cards and the load-more control.
pub struct CatalogList {
    list: SelectList,
}

impl Default for CatalogList {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl CatalogList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for CatalogList {
    type Props<'a> = CatalogListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let has_selects = !filter::select_options(props.page.collection()).is_empty();
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionMove(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionMove(1)),
                KeyCode::PageUp => Some(Action::SelectionMove(-10)),
                KeyCode::PageDown => Some(Action::SelectionMove(10)),
                KeyCode::Enter => Some(Action::OpenSelected),
                KeyCode::Char('m') => Some(Action::ListLoadMore),
                KeyCode::Char('r') => Some(Action::ListReload),
                KeyCode::Char('/') => Some(Action::SearchStart),
                KeyCode::Char('f') if has_selects => Some(Action::ModalOpen),
                KeyCode::Tab if has_selects => Some(Action::FilterFocusNext),
                KeyCode::Char('[') if has_selects => Some(Action::FilterCycle(-1)),
                KeyCode::Char(']') if has_selects => Some(Action::FilterCycle(1)),
                _ => None,
            },
            EventKind::Scroll { delta, .. } => Some(Action::SelectionMove(*delta as i16)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Length(5), // Title, search and filters
            Constraint::Min(3),    // Cards
            Constraint::Length(1), // Load more
        ])
        .split(area);

        render_header(frame, chunks[0], &props);

        let page = props.page;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(props.is_focused))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);

        if let Some(placeholder) = &page.surface.placeholder {
            let phase = page.surface.shimmer_phase();
            let rows = placeholder.count.min(inner.height as usize);
            let lines: Vec<Line> = (0..rows)
                .map(|row| theme::ghost_line(placeholder.kind, row, inner.width, phase))
                .collect();
            frame.render_widget(Paragraph::new(lines), inner);
        } else {
            match &page.surface.view {
                SurfaceView::Blank => {}
                SurfaceView::Items => {
                    let items: Vec<Line<'static>> = page
                        .shown()
                        .iter()
                        .enumerate()
                        .map(|(index, entity)| {
                            if page.surface.is_revealed(index) {
                                card_line(entity)
                            } else {
                                Line::default()
                            }
                        })
                        .collect();
                    let list_props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: page.selected.min(items.len().saturating_sub(1)),
                        is_focused: props.is_focused,
                        style: theme::list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::ListSelect,
                        render_item: &|item| item.clone(),
                    };
                    self.list.render(frame, inner, list_props);
                }
                SurfaceView::NoResults => {
                    let text = Text::from(vec![
                        Line::styled(
                            format!(
                                "No {} found matching your criteria.",
                                page.collection().plural()
                            ),
                            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
                        ),
                        Line::styled(
                            "Try adjusting your filters or search terms.",
                            Style::default().fg(TEXT_DIM),
                        ),
                    ]);
                    render_centered(frame, inner, text);
                }
                SurfaceView::Error(message) => {
                    let text = Text::from(vec![
                        Line::styled(
                            format!(
                                "Oops! Something went wrong while loading {}.",
                                page.collection().plural()
                            ),
                            Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
                        ),
                        Line::styled(message.clone(), Style::default().fg(TEXT_DIM)),
                        Line::default(),
                        Line::from(vec![
                            Span::styled("r", theme::title_style()),
                            Span::styled(" Try again", Style::default().fg(TEXT_MAIN)),
                        ]),
                    ]);
                    render_centered(frame, inner, text);
                }
            }
        }

        frame.render_widget(load_more_line(page), chunks[2]);
    }
}

fn render_header(frame: &mut Frame, area: Rect, props: &CatalogListProps<'_>) {
    let page = props.page;
    let collection = page.collection();
    let filters = &page.controller.filters;

    let mut title = vec![Span::styled(collection.title().to_uppercase(), theme::title_style())];
    if let Some(total) = page.controller.total {
        title.push(Span::styled(
            format!("  {total} found"),
            Style::default().fg(TEXT_DIM),
        ));
    }

    let search = if props.search.active {
        Span::styled(
            format!("/{}_", props.search.query),
            Style::default().fg(PORTAL_GREEN),
        )
    } else if page.applied_search.is_empty() {
        Span::styled("/ to search", Style::default().fg(TEXT_DIM))
    } else {
        Span::styled(
            format!("/{}", page.applied_search),
            Style::default().fg(TEXT_MAIN),
        )
    };

    let mut selects = vec![Span::raw("Search: "), search];
    for (index, (key, _)) in filter::select_options(collection).iter().enumerate() {
        let value = filters
            .get(*key)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or("All");
        let mut style = Style::default().fg(ACCENT_GOLD);
        if index == page.select_focus {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        selects.push(Span::raw(format!("  {}: ", key.label())));
        selects.push(Span::styled(value.to_string(), style));
    }

    let count = filters.active_count();
    let summary = Line::from(vec![
        Span::styled(
            format!("Filters ({count}): "),
            Style::default().fg(TEXT_DIM),
        ),
        Span::styled(filters.summary(), Style::default().fg(TEXT_MAIN)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(false))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    let paragraph = Paragraph::new(vec![Line::from(title), Line::from(selects), summary])
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_centered(frame: &mut Frame, area: Rect, text: Text<'static>) {
    let height = text.lines.len() as u16;
    let top = area.height.saturating_sub(height) / 2;
    let area = Rect {
        y: area.y + top,
        height: height.min(area.height),
        ..area
    };
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn load_more_line(page: &ListPage) -> Paragraph<'static> {
    let load_more = &page.surface.load_more;
    let line = if load_more.visible {
        let key = if load_more.loading { "" } else { "m " };
        Line::from(vec![
            Span::styled(key, theme::title_style()),
            Span::styled(load_more.label(), Style::default().fg(ACCENT_GOLD)),
        ])
    } else if page.surface.view == SurfaceView::Items && !page.controller.has_more {
        Line::styled(
            format!(
                "All {} {} loaded",
                page.shown().len(),
                page.collection().plural()
            ),
            Style::default().fg(TEXT_DIM),
        )
    } else {
        Line::default()
    };
    Paragraph::new(line).alignment(Alignment::Center)
}

/// Card text of one record.
pub fn card_line(entity: &Entity) -> Line<'static> {
    let name = Span::styled(
        entity.name().to_string(),
        Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
    );
    let dim = Style::default().fg(TEXT_DIM);
    match entity {
        Entity::Character(character) => Line::from(vec![
            name,
            Span::styled(
                format!(
                    "  {} - {}",
                    character.status.as_deref().unwrap_or("unknown"),
                    entity.subtitle()
                ),
                dim,
            ),
        ]),
        Entity::Location(_) => Line::from(vec![
            name,
            Span::styled(format!("  {}", entity.subtitle()), dim),
        ]),
        Entity::Episode(episode) => Line::from(vec![
            Span::styled(
                format!("{:<7}", episode.episode.as_deref().unwrap_or("")),
                Style::default().fg(PORTAL_GREEN),
            ),
            name,
            Span::styled(format!("  {}", entity.subtitle()), dim),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Collection, Location, Page, PageInfo};
    use tui_dispatch::testing::*;

    fn rendered(page: &ListPage) -> String {
        let mut render = RenderHarness::new(80, 24);
        let mut component = CatalogList::new();
        let search = SearchState::default();
        render.render_to_string_plain(|frame| {
            let props = CatalogListProps {
                page,
                search: &search,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        })
    }

    #[test]
    fn test_no_results_message() {
        let mut page = ListPage::new(Collection::Locations);
        let request = page.begin_fetch().unwrap();
        page.complete(request.generation, Page::empty());

        let output = rendered(&page);
        assert!(output.contains("No locations found matching your criteria."));
        assert!(output.contains("Try adjusting your filters or search terms."));
    }

    #[test]
    fn test_error_offers_retry() {
        let mut page = ListPage::new(Collection::Episodes);
        let request = page.begin_fetch().unwrap();
        page.fail(request.generation, "HTTP error! status: 500");

        let output = rendered(&page);
        assert!(output.contains("Oops! Something went wrong while loading episodes."));
        assert!(output.contains("Try again"));
    }

    #[test]
    fn test_load_more_shown_while_pages_remain() {
        let mut page = ListPage::new(Collection::Locations);
        let request = page.begin_fetch().unwrap();
        page.complete(
            request.generation,
            Page {
                info: PageInfo {
                    count: 126,
                    pages: 7,
                    next: Some("https://rickandmortyapi.com/api/location?page=2".into()),
                    prev: None,
                },
                results: vec![Entity::Location(Location {
                    id: 1,
                    name: "Earth (C-137)".into(),
                    kind: Some("Planet".into()),
                    dimension: Some("Dimension C-137".into()),
                    residents: Vec::new(),
                })],
            },
        );

        let output = rendered(&page);
        assert!(output.contains("Earth (C-137)"));
        assert!(output.contains("Load more"));
        assert!(output.contains("126 found"));
    }

    #[test]
    fn test_keys() {
        let mut component = CatalogList::new();
        let page = ListPage::new(Collection::Episodes);
        let search = SearchState::default();
        let mut press = |code: KeyCode| -> Vec<Action> {
            let event = EventKind::Key(code.into());
            let props = CatalogListProps {
                page: &page,
                search: &search,
                is_focused: true,
            };
            component.handle_event(&event, props).into_iter().collect()
        };

        press(KeyCode::Char('m')).assert_first(Action::ListLoadMore);
        press(KeyCode::Char('r')).assert_first(Action::ListReload);
        press(KeyCode::Char('/')).assert_first(Action::SearchStart);
        press(KeyCode::Enter).assert_first(Action::OpenSelected);
        // Episodes have no select filters.
        press(KeyCode::Char('f')).assert_empty();
        press(KeyCode::Char(']')).assert_empty();
    }
}
