//! Terminal tape display built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: the shared [`Screen`], the [`TapeDisplay`] step observer and
//!   the [`DisplayIo`] key-press input / output pane
//! - **[`panes`]**: stateless render functions for each visible pane (tape,
//!   program, output, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! Unlike a post-mortem viewer, the display is live: it is redrawn from inside
//! the engine's run loop, once per executed instruction.

pub mod app;
pub mod panes;
pub mod theme;

pub use app::{DisplayIo, Screen, SharedScreen, TapeDisplay};
