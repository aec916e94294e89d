//! TUI pane rendering modules
//!
//! Each pane module exports a primary `render_*` function and the data
//! struct it renders from:
//!
//! - [`tape`]: The cell window around the pointer
//! - [`program`]: The instruction stream with the current instruction highlighted
//! - [`output`]: Bytes written by the program
//! - [`status`]: Status bar with step counters and keybindings

pub mod output;
pub mod program;
pub mod status;
pub mod tape;

pub use output::{render_output_pane, OutputBuffer};
pub use program::{render_program_pane, ProgramRenderData};
pub use status::{render_status_bar, DisplayState, StatusRenderData};
pub use tape::{render_tape_pane, TapeRenderData};
