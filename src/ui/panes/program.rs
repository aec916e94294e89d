//! Program pane rendering
//!
//! Shows the filtered instruction stream wrapped to the pane width, with the
//! instruction about to execute highlighted. When the program does not fit,
//! the rows around the current instruction are shown.

use crate::parser::ast::{Instruction, Program};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Data needed to render the program pane
pub struct ProgramRenderData<'a> {
    pub program: &'a Program,
    pub pc: Option<usize>,
}

fn instruction_style(instruction: Instruction) -> Style {
    let color = match instruction {
        Instruction::Right | Instruction::Left => DEFAULT_THEME.primary,
        Instruction::Increment | Instruction::Decrement => DEFAULT_THEME.number,
        Instruction::Output | Instruction::Input => DEFAULT_THEME.success,
        Instruction::LoopStart | Instruction::LoopEnd => DEFAULT_THEME.fg,
    };
    Style::default().fg(color)
}

/// First row to draw so that `current_row` stays on screen, roughly centered
fn first_visible_row(current_row: usize, total_rows: usize, visible_rows: usize) -> usize {
    if total_rows <= visible_rows {
        return 0;
    }
    current_row
        .saturating_sub(visible_rows / 2)
        .min(total_rows - visible_rows)
}

/// Render the program pane
pub fn render_program_pane(frame: &mut Frame, area: Rect, data: ProgramRenderData) {
    let block = Block::default()
        .title(format!(" Program ({} instructions) ", data.program.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    if data.program.is_empty() {
        let paragraph = Paragraph::new("(empty program)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let width = (area.width.saturating_sub(2) as usize).max(1);
    let visible_rows = (area.height.saturating_sub(2) as usize).max(1);
    let instructions = data.program.instructions();
    let total_rows = instructions.len().div_ceil(width);
    let current_row = data.pc.map(|pc| pc / width).unwrap_or(0);
    let first_row = first_visible_row(current_row, total_rows, visible_rows);

    let lines: Vec<Line> = instructions
        .chunks(width)
        .enumerate()
        .skip(first_row)
        .take(visible_rows)
        .map(|(row, chunk)| {
            let spans: Vec<Span> = chunk
                .iter()
                .enumerate()
                .map(|(col, &instruction)| {
                    let index = row * width + col;
                    let style = if data.pc == Some(index) {
                        Style::default()
                            .fg(DEFAULT_THEME.instruction)
                            .bg(DEFAULT_THEME.current_line_bg)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    } else {
                        instruction_style(instruction)
                    };
                    Span::styled(instruction.as_char().to_string(), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
