//! Tape machine execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: [`engine::Engine`], its configuration, run reports and stop handle
//! - [`jumps`]: Loop boundary resolution (scan or precomputed table)
//! - [`io`]: The byte I/O capability used by `,` and `.`
//! - [`errors`]: Configuration and runtime error types
//!
//! # Execution Model
//!
//! The engine interprets one instruction at a time on a single thread. Before
//! each instruction it polls the stop flag, hands a [`crate::snapshot::StepView`]
//! to the observer (display mode only), and sleeps for the configured step
//! delay. Any fault ends the run immediately.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod io;
pub mod jumps;

pub use engine::{Engine, EngineConfig, RunReport, RunStatus, StopHandle};
pub use errors::{ConfigurationError, ErrorKind, InterpreterError, RuntimeError};
pub use io::{BufferIo, ByteIo, StdIo};
pub use jumps::JumpMode;
