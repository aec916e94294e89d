//! Status bar rendering with keybindings and state indicators

use crate::parser::ast::Instruction;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What the display is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Running,
    WaitingForInput,
    Stopping,
    Finished,
    Failed,
}

impl DisplayState {
    fn badge(self) -> (&'static str, Color) {
        match self {
            DisplayState::Running => (" ▶ RUNNING ", DEFAULT_THEME.primary),
            DisplayState::WaitingForInput => (" ⌨ INPUT ", DEFAULT_THEME.secondary),
            DisplayState::Stopping => (" ■ STOPPING ", DEFAULT_THEME.secondary),
            DisplayState::Finished => (" END ", DEFAULT_THEME.success),
            DisplayState::Failed => (" ERROR ", DEFAULT_THEME.error),
        }
    }

    fn is_done(self) -> bool {
        matches!(self, DisplayState::Finished | DisplayState::Failed)
    }
}

/// Data needed to render the status bar
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub step: u64,
    pub pc: usize,
    pub instruction: Option<Instruction>,
    pub pointer: usize,
    pub cell: u8,
    pub state: DisplayState,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let bar_style = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let sep_style = bar_style.fg(DEFAULT_THEME.comment);
    let (badge, badge_color) = data.state.badge();

    let instruction = data
        .instruction
        .map(|i| format!("'{}'", i))
        .unwrap_or_else(|| "-".to_string());

    let left_spans = vec![
        Span::styled(
            format!(" Step {} ", data.step),
            Style::default()
                .bg(badge_color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", sep_style),
        Span::styled(
            format!("pc {} {} ", data.pc, instruction),
            bar_style.fg(DEFAULT_THEME.instruction),
        ),
        Span::styled("| ", sep_style),
        Span::styled(
            format!("ptr {} = {:03} ", data.pointer, data.cell),
            bar_style.fg(DEFAULT_THEME.pointer),
        ),
        Span::styled("| ", sep_style),
        Span::styled(
            format!("{} ", data.message),
            bar_style.fg(if data.state == DisplayState::Failed {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.fg
            }),
        ),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar_style)
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar_style.fg(DEFAULT_THEME.fg);
    let key_hint = if data.state.is_done() {
        " q / ↵ "
    } else {
        " q / Esc "
    };
    let key_desc = if data.state.is_done() { " quit " } else { " stop " };

    let right_spans = vec![
        Span::styled(key_hint, key_style),
        Span::styled(key_desc, desc_style),
        Span::styled("│", sep_style),
        Span::styled(
            badge,
            Style::default()
                .bg(badge_color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar_style)
            .alignment(Alignment::Right),
        layout[1],
    );
}
