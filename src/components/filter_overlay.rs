use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::theme::{self, ACCENT_GOLD, BG_HIGHLIGHT, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::filter;
use crate::model::Collection;
use crate::state::FilterModal;

pub struct FilterOverlayProps<'a> {
    pub collection: Collection,
    pub modal: &'a FilterModal,
    pub is_focused: bool,
}

/// Select filters for compact layouts. Edits a draft; Enter applies it.
pub struct FilterOverlay {
    modal: Modal,
}

impl Default for FilterOverlay {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl FilterOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(props: &FilterOverlayProps<'_>) -> Vec<Line<'static>> {
        filter::select_options(props.collection)
            .iter()
            .enumerate()
            .map(|(index, (key, _))| {
                let value = props
                    .modal
                    .draft
                    .get(*key)
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or("All");
                let mut row_style = Style::default().fg(TEXT_MAIN);
                if index == props.modal.row {
                    row_style = row_style.bg(BG_HIGHLIGHT).add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::styled(format!("{:<10}", key.label()), row_style),
                    Span::styled(format!("< {value} >"), row_style.fg(ACCENT_GOLD)),
                ])
            })
            .collect()
    }
}

impl Component<Action> for FilterOverlay {
    type Props<'a> = FilterOverlayProps<'a>;

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
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ModalMove(-1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ModalMove(1)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::ModalCycle(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::ModalCycle(1)),
            KeyCode::Char('c') => Some(Action::ModalReset),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::ModalClose),
            KeyCode::Enter => Some(Action::ModalApply),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 24 || area.height < 8 {
            return;
        }
        let rows = Self::rows(&props);
        let height = rows.len() as u16 + 6;
        let modal_area = centered_rect(56, height, area);
        let summary = props.modal.draft.summary();

        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(content_area);

            frame.render_widget(
                Paragraph::new(vec![
                    Line::styled("FILTERS", theme::title_style()),
                    Line::styled(summary.clone(), Style::default().fg(TEXT_DIM)),
                ]),
                chunks[0],
            );
            frame.render_widget(Paragraph::new(rows.clone()), chunks[1]);
            frame.render_widget(
                Paragraph::new(Line::styled(
                    "Enter apply  c reset  Esc close",
                    Style::default().fg(TEXT_DIM),
                )),
                chunks[2],
            );
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(BG_PANEL),
                        padding: Padding::all(1),
                        border: None,
                        fg: Some(TEXT_MAIN),
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::ModalClose,
                render_content: &mut render_content,
            },
        );
    }
}
