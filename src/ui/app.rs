//! Live tape display driven by the engine
//!
//! The engine calls back into the display twice over: as its
//! [`StepObserver`] ([`TapeDisplay`]) and as its [`ByteIo`] ([`DisplayIo`]).
//! Both halves share one [`Screen`] through [`SharedScreen`], since the
//! engine borrows them separately for the whole run.

use crate::interpreter::engine::{RunReport, StopHandle};
use crate::interpreter::io::ByteIo;
use crate::parser::ast::{Instruction, Program};
use crate::snapshot::{StepObserver, StepView};
use crate::ui::panes::{
    render_output_pane, render_program_pane, render_status_bar, render_tape_pane, DisplayState,
    OutputBuffer, ProgramRenderData, StatusRenderData, TapeRenderData,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

/// Everything the panes render from
struct ScreenState {
    program: Program,
    tape: Vec<u8>,
    pointer: usize,
    pc: Option<usize>,
    instruction: Option<Instruction>,
    step: u64,
    output: OutputBuffer,
    message: String,
    state: DisplayState,
}

impl ScreenState {
    fn record(&mut self, view: &StepView<'_>) {
        self.tape.clear();
        self.tape.extend_from_slice(view.tape);
        self.pointer = view.pointer;
        self.pc = Some(view.pc);
        self.instruction = Some(view.instruction);
        self.step = view.step;
    }

    /// Show a display problem on the status line; stderr belongs to the screen
    fn note_problem(&mut self, what: &str, err: &io::Error) {
        debug!("{}: {}", what, err);
        self.message = format!("{}: {}", what, err);
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(3),
                Constraint::Percentage(35),
                Constraint::Length(1),
            ])
            .split(frame.area());

        render_tape_pane(
            frame,
            chunks[0],
            TapeRenderData {
                tape: &self.tape,
                pointer: self.pointer,
            },
        );

        render_program_pane(
            frame,
            chunks[1],
            ProgramRenderData {
                program: &self.program,
                pc: self.pc,
            },
        );

        render_output_pane(frame, chunks[2], &self.output);

        render_status_bar(
            frame,
            chunks[3],
            StatusRenderData {
                message: &self.message,
                step: self.step,
                pc: self.pc.unwrap_or(self.program.len()),
                instruction: self.instruction,
                pointer: self.pointer,
                cell: self.tape.get(self.pointer).copied().unwrap_or(0),
                state: self.state,
            },
        );
    }
}

/// The terminal plus the state drawn on it
pub struct Screen<B: Backend> {
    terminal: Terminal<B>,
    state: ScreenState,
}

/// A [`Screen`] shared between the observer and the I/O halves
pub type SharedScreen<B> = Rc<RefCell<Screen<B>>>;

impl<B: Backend> Screen<B> {
    pub fn new(
        terminal: Terminal<B>,
        program: Program,
        memory_size: usize,
        output_width: Option<usize>,
    ) -> Self {
        Screen {
            terminal,
            state: ScreenState {
                program,
                tape: vec![0; memory_size],
                pointer: 0,
                pc: None,
                instruction: None,
                step: 0,
                output: OutputBuffer::new(output_width),
                message: String::from("Running..."),
                state: DisplayState::Running,
            },
        }
    }

    pub fn into_shared(self) -> SharedScreen<B> {
        Rc::new(RefCell::new(self))
    }

    pub fn draw(&mut self) -> io::Result<()> {
        let state = &self.state;
        self.terminal.draw(|f| state.render(f))?;
        Ok(())
    }

    /// Show the final tape of a run that did not fault
    pub fn record_report(&mut self, report: &RunReport) {
        self.state.tape.clone_from(&report.tape);
        self.state.pointer = report.pointer;
        self.state.step = report.steps;
        self.state.pc = None;
        self.state.instruction = None;
    }

    /// Draw the final frame and wait until the user dismisses it.
    pub fn finish(&mut self, message: &str, failed: bool) -> io::Result<()> {
        self.state.message = message.to_string();
        self.state.state = if failed {
            DisplayState::Failed
        } else {
            DisplayState::Finished
        };
        self.draw()?;

        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && (is_stop_key(&key, true) || key.code == KeyCode::Enter)
                {
                    return Ok(());
                }
            }
        }
    }
}

/// `Esc` and `Ctrl+C` always stop; plain `q` only when it is not input
fn is_stop_key(key: &KeyEvent, allow_q: bool) -> bool {
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Char('Q') => allow_q,
        _ => false,
    }
}

/// Step observer that redraws the screen and turns stop keys into cancellation
pub struct TapeDisplay<B: Backend> {
    screen: SharedScreen<B>,
    stop: StopHandle,
}

impl<B: Backend> TapeDisplay<B> {
    pub fn new(screen: SharedScreen<B>, stop: StopHandle) -> Self {
        TapeDisplay { screen, stop }
    }

    /// Drain pending key presses without blocking
    fn poll_keys(&mut self) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && is_stop_key(&key, true) {
                    self.stop.stop();
                    let mut screen = self.screen.borrow_mut();
                    screen.state.state = DisplayState::Stopping;
                    screen.state.message = String::from("Stopping...");
                }
            }
        }
        Ok(())
    }
}

impl<B: Backend> StepObserver for TapeDisplay<B> {
    fn on_step(&mut self, view: &StepView<'_>) {
        let polled = self.poll_keys();

        let mut screen = self.screen.borrow_mut();
        if let Err(e) = polled {
            screen.state.note_problem("Keyboard unavailable", &e);
        }
        screen.state.record(view);
        if let Err(e) = screen.draw() {
            // Shown by the next frame that does draw
            screen.state.note_problem("Redraw failed", &e);
        }
    }
}

/// Byte I/O through the display: key presses in, output pane out
pub struct DisplayIo<B: Backend> {
    screen: SharedScreen<B>,
    stop: StopHandle,
}

impl<B: Backend> DisplayIo<B> {
    pub fn new(screen: SharedScreen<B>, stop: StopHandle) -> Self {
        DisplayIo { screen, stop }
    }

    fn set_state(&self, state: DisplayState, message: &str) -> io::Result<()> {
        let mut screen = self.screen.borrow_mut();
        screen.state.state = state;
        screen.state.message = message.to_string();
        screen.draw()
    }
}

impl<B: Backend> ByteIo for DisplayIo<B> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.set_state(
            DisplayState::WaitingForInput,
            "Press a key to input a byte (Ctrl+D: end of input)",
        )?;

        let byte = loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_stop_key(&key, false) {
                self.stop.stop();
                break None;
            }
            match key.code {
                KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => break None,
                KeyCode::Char(c) => break Some(u8::try_from(c).unwrap_or(b'?')),
                KeyCode::Enter => break Some(b'\n'),
                KeyCode::Tab => break Some(b'\t'),
                _ => continue,
            }
        };

        if self.stop.is_stopped() {
            self.set_state(DisplayState::Stopping, "Stopping...")?;
        } else {
            self.set_state(DisplayState::Running, "Running...")?;
        }
        Ok(byte)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.screen.borrow_mut().state.output.push_byte(byte);
        Ok(())
    }
}
