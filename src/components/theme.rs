use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use tui_dispatch_components::{BaseStyle, Padding, SelectListStyle, SelectionStyle};

use crate::model::Collection;

pub const BG_BASE: Color = Color::Rgb(14, 20, 24);
pub const BG_PANEL: Color = Color::Rgb(22, 34, 38);
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 92, 60);
pub const TEXT_MAIN: Color = Color::Rgb(230, 240, 232);
pub const TEXT_DIM: Color = Color::Rgb(150, 172, 160);
pub const PORTAL_GREEN: Color = Color::Rgb(151, 206, 76);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
pub const ERROR_RED: Color = Color::Rgb(224, 96, 88);
const GHOST_BASE: Color = Color::Rgb(44, 58, 62);
const GHOST_SHINE: Color = Color::Rgb(78, 98, 102);

pub fn title_style() -> Style {
    Style::default()
        .fg(PORTAL_GREEN)
        .add_modifier(Modifier::BOLD)
}

pub fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(PORTAL_GREEN)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}

pub fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

/// Placeholder row shaped like a card of `kind`, with a highlight band
/// sweeping across at `phase` (`0.0..1.0`).
pub fn ghost_line(kind: Collection, row: usize, width: u16, phase: f32) -> Line<'static> {
    let width = width.saturating_sub(2) as usize;
    if width == 0 {
        return Line::default();
    }
    // Segment widths as percentages of the row, varied per row.
    let jitter = (row * 7) % 15;
    let segments: &[usize] = match kind {
        Collection::Characters => &[30, 18],
        Collection::Locations => &[38, 14],
        Collection::Episodes => &[8, 34, 16],
    };
    let shine_at = (phase * width as f32) as usize;
    let mut spans = Vec::new();
    let mut column: usize = 0;
    for (index, percent) in segments.iter().enumerate() {
        let len = (width * (percent + if index == 0 { jitter } else { 0 }) / 100).max(2);
        for _ in 0..len.min(width - column) {
            let near = column.abs_diff(shine_at) <= 2;
            let color = if near { GHOST_SHINE } else { GHOST_BASE };
            spans.push(Span::styled("▒", Style::default().fg(color)));
            column += 1;
        }
        // Narrow rows end early rather than overflow.
        if width - column < 2 {
            break;
        }
        spans.push(Span::raw("  "));
        column += 2;
    }
    Line::from(spans)
}
