use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Borders,
    Frame,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use super::theme::{ACCENT_GOLD, BG_PANEL, ERROR_RED, PORTAL_GREEN, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::filter;
use crate::model::Collection;
use crate::state::AppState;

pub fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let (status, status_style) = match &state.message {
        Some(message) => (message.clone(), Style::default().fg(ERROR_RED)),
        None => (status_text(state), Style::default().fg(ACCENT_GOLD)),
    };
    let (left, center) = status_hints(state);
    let left_hints = to_hints(&left);
    let center_hints = to_hints(&center);
    let status_items = [StatusBarItem::span(Span::styled(status.as_str(), status_style))];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(PORTAL_GREEN)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(PORTAL_GREEN)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn to_hints(hints: &[(&'static str, &'static str)]) -> Vec<StatusBarHint<'static>> {
    hints
        .iter()
        .map(|&(key, label)| StatusBarHint::new(key, label))
        .collect()
}

fn status_text(state: &AppState) -> String {
    if state.is_detail() {
        if state.detail.is_loading() {
            return format!("Loading {}...", state.detail.collection.endpoint());
        }
        if state.detail.related_loading {
            return format!("Loading {}...", state.detail.collection.related().plural());
        }
        return String::new();
    }
    match state.current_list() {
        Some(list) if list.controller.is_loading() => {
            format!("Loading {}...", list.collection().plural())
        }
        _ => String::new(),
    }
}

type Hints = Vec<(&'static str, &'static str)>;

fn status_hints(state: &AppState) -> (Hints, Hints) {
    if state.modal.open {
        let left = vec![
            ("j/k", "Row"),
            ("h/l", "Change"),
            ("c", "Reset"),
            ("Enter", "Apply"),
        ];
        return (left, vec![("Esc", "Close")]);
    }
    if state.search.active {
        let left = vec![("Enter", "Apply"), ("Esc", "Cancel"), ("Bksp", "Delete")];
        return (left, Vec::new());
    }

    let center = vec![("1/2/3", "Sections"), ("q", "Quit")];
    if state.is_detail() {
        let mut left = vec![("Bksp", "Back"), ("j/k", "Move"), ("Enter", "Open")];
        if state.detail.collection == Collection::Characters {
            left.push(("l", "Location"));
        }
        return (left, center);
    }

    let mut left = vec![
        ("j/k", "Move"),
        ("Enter", "Open"),
        ("/", "Search"),
        ("m", "More"),
        ("r", "Reload"),
    ];
    if !filter::select_options(state.collection()).is_empty() {
        left.push(("Tab [ ]", "Filter"));
        left.push(("f", "All filters"));
    }
    (left, center)
}
