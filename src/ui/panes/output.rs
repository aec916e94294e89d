//! Program output pane rendering

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Output written by `.` so far, split into display lines
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    lines: Vec<String>,
    width: Option<usize>,
}

impl OutputBuffer {
    /// `width` wraps long lines; `None` keeps them whole
    pub fn new(width: Option<usize>) -> Self {
        OutputBuffer {
            lines: Vec::new(),
            width,
        }
    }

    /// Append one output byte
    pub fn push_byte(&mut self, byte: u8) {
        match byte {
            b'\n' => {
                if self.lines.is_empty() {
                    self.lines.push(String::new());
                }
                self.lines.push(String::new());
            }
            b'\r' => {}
            _ => {
                let needs_new_line = match (self.lines.last(), self.width) {
                    (None, _) => true,
                    (Some(last), Some(width)) => last.chars().count() >= width,
                    (Some(_), None) => false,
                };
                if needs_new_line {
                    self.lines.push(String::new());
                }
                let ch = if byte.is_ascii_graphic() || byte == b' ' {
                    byte as char
                } else {
                    // Keep the column count in step with the engine's tracking
                    '·'
                };
                if let Some(last) = self.lines.last_mut() {
                    last.push(ch);
                }
            }
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }
}

/// Render the program output pane, pinned to the most recent lines
pub fn render_output_pane(frame: &mut Frame, area: Rect, output: &OutputBuffer) {
    let block = Block::default()
        .title(" Output ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    if output.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let lines = output.lines();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1
    let skip = lines.len().saturating_sub(visible_height);

    let items: Vec<ListItem> = lines
        .iter()
        .skip(skip)
        .map(|line| ListItem::new(line.as_str()).style(Style::default().fg(DEFAULT_THEME.fg)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
