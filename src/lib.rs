//! # Introduction
//!
//! tapetty interprets the eight-instruction byte-tape language
//! (`> < + - . , [ ]`) and can show the tape live in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui) while the program runs.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → Program → Engine ⇄ (ByteIo, StepObserver) → RunReport
//! ```
//!
//! 1. [`parser`]: filters the source to the instruction alphabet and checks
//!    bracket balance, producing a [`parser::ast::Program`].
//! 2. [`interpreter`]: the [`interpreter::Engine`]: tape, pointer, program
//!    counter, scan-based loop resolution, cancellation and pacing.
//! 3. [`memory`]: the bounds-checked, wrapping byte [`memory::Tape`].
//! 4. [`snapshot`]: read-only [`snapshot::StepView`]s handed to step observers.
//! 5. [`ui`]: ratatui-based live display; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use tapetty::interpreter::{BufferIo, Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::new(2)).unwrap();
//! engine.load("++++++++[>++++++++<-]>.").unwrap();
//!
//! let mut io = BufferIo::new();
//! engine.run(&mut io, None).unwrap();
//! assert_eq!(io.output(), b"@");
//! ```

pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;
