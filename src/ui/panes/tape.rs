//! Tape pane rendering
//!
//! Shows a window of cells centered on the pointer. Each cell is drawn as a
//! zero-padded three-digit value with its index underneath; the cell under
//! the pointer is highlighted.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::ops::Range;

/// Width of one cell slot: "│ 000 "
const CELL_WIDTH: usize = 6;

/// Data needed to render the tape pane
pub struct TapeRenderData<'a> {
    pub tape: &'a [u8],
    pub pointer: usize,
}

/// Range of cell indices to draw when `slots` cells fit on screen
pub fn visible_window(pointer: usize, len: usize, slots: usize) -> Range<usize> {
    let slots = slots.max(1);
    if len <= slots {
        return 0..len;
    }
    let start = pointer.saturating_sub(slots / 2).min(len - slots);
    start..start + slots
}

/// Render the tape pane
pub fn render_tape_pane(frame: &mut Frame, area: Rect, data: TapeRenderData) {
    let block = Block::default()
        .title(format!(" Tape ({} cells) ", data.tape.len()))
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(DEFAULT_THEME.border_focused)
                .add_modifier(Modifier::BOLD),
        );

    let content_width = area.width.saturating_sub(2) as usize;
    let slots = content_width.saturating_sub(1) / CELL_WIDTH;
    let window = visible_window(data.pointer, data.tape.len(), slots);

    let sep_style = Style::default().fg(DEFAULT_THEME.comment);
    let mut values = Vec::with_capacity(window.len() * 2 + 1);
    let mut indices = Vec::with_capacity(window.len() + 1);

    for i in window {
        let is_pointer = i == data.pointer;
        let value_style = if is_pointer {
            Style::default()
                .fg(DEFAULT_THEME.pointer)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_THEME.number)
        };
        let index_style = if is_pointer {
            Style::default().fg(DEFAULT_THEME.pointer)
        } else {
            Style::default().fg(DEFAULT_THEME.comment)
        };

        values.push(Span::styled("│ ", sep_style));
        values.push(Span::styled(format!("{:03} ", data.tape[i]), value_style));
        indices.push(Span::styled(format!("{:>5} ", i), index_style));
    }
    values.push(Span::styled("│", sep_style));

    let paragraph = Paragraph::new(vec![Line::from(values), Line::from(indices)]).block(block);
    frame.render_widget(paragraph, area);
}
