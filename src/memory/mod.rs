//! Memory model for the interpreter
//!
//! The machine's only memory is the byte [`tape::Tape`]: a fixed number of
//! 8-bit cells chosen when the engine is configured, all starting at zero.
//!
//! # Cell Arithmetic
//!
//! Cells are unsigned bytes and never trap:
//! ```text
//! 255 + 1  →  0
//!   0 - 1  →  255
//! ```
//!
//! The pointer, in contrast, is strictly bounds-checked; see
//! [`tape::BoundsError`].

pub mod tape;

pub use tape::{BoundsError, Tape};
