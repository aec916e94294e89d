//! Program source loading and validation
//!
//! This module transforms program text into a validated [`ast::Program`]:
//! - [`lexer`]: Filtering (source text → located instructions)
//! - [`parse`]: Validation (instructions → program, or [`parse::SyntaxError`])
//! - [`ast`]: Instruction and program definitions
//!
//! # Source Format
//!
//! Only the eight characters `> < + - . , [ ]` carry meaning. Everything else,
//! including whitespace and newlines, is a comment and is discarded.

pub mod ast;
pub mod lexer;
pub mod parse;

pub use parse::{parse, Parser, SyntaxError, ValidationMode};
