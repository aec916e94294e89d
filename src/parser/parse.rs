//! Program validation
//!
//! This module provides the [`Parser`] that turns source text into a
//! [`Program`], along with the [`SyntaxError`] type.
//!
//! # Validation modes
//!
//! The default [`ValidationMode::BracketCount`] only compares how many `[`
//! and `]` the source holds. A program such as `][` passes this check; its
//! nesting problems surface at run time as
//! [`RuntimeError::UnmatchedBracket`](crate::interpreter::errors::RuntimeError::UnmatchedBracket).
//!
//! [`ValidationMode::Nesting`] is an opt-in, stricter mode that also rejects
//! programs whose brackets are not properly nested.

use crate::parser::ast::{Instruction, Program, SourceLocation};
use crate::parser::lexer::{Lexer, Token};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::debug;

/// How strictly the bracket structure is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Equal counts of `[` and `]`, in any order
    #[default]
    BracketCount,
    /// Every `]` closes an earlier `[` and every `[` is closed
    Nesting,
}

/// Validation failures reported before any execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// `[` and `]` occur a different number of times
    UnbalancedBrackets { open: usize, close: usize },

    /// A `]` with no open `[` before it (nesting mode only)
    UnmatchedClose {
        index: usize,
        location: SourceLocation,
    },
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::UnbalancedBrackets { open, close } => {
                write!(
                    f,
                    "[Analysis] Brackets are not balanced ({} '[' vs {} ']').",
                    open, close
                )
            }
            SyntaxError::UnmatchedClose { location, .. } => {
                write!(f, "[Analysis] Unmatched ']' at {}.", location)
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Validating loader for program source
pub struct Parser {
    tokens: Vec<Token>,
    mode: ValidationMode,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Parser {
            tokens: Lexer::new(source).tokenize(),
            mode: ValidationMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate the filtered instruction stream and build a [`Program`].
    pub fn parse(self) -> Result<Program, SyntaxError> {
        let mut tally: FxHashMap<Instruction, usize> = FxHashMap::default();
        for token in &self.tokens {
            *tally.entry(token.instruction).or_insert(0) += 1;
        }

        let open = tally.get(&Instruction::LoopStart).copied().unwrap_or(0);
        let close = tally.get(&Instruction::LoopEnd).copied().unwrap_or(0);
        if open != close {
            return Err(SyntaxError::UnbalancedBrackets { open, close });
        }

        if self.mode == ValidationMode::Nesting {
            check_nesting(&self.tokens)?;
        }

        debug!(
            instructions = self.tokens.len(),
            loops = open,
            mode = ?self.mode,
            "program validated"
        );

        let (instructions, locations) = self
            .tokens
            .into_iter()
            .map(|t| (t.instruction, t.location))
            .unzip();
        Ok(Program::new(instructions, locations))
    }
}

/// Parse `source` with the default bracket-count validation.
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    Parser::new(source).parse()
}

// Runs after the count check, so with no stray `]` every `[` is closed too.
fn check_nesting(tokens: &[Token]) -> Result<(), SyntaxError> {
    let mut depth = 0usize;

    for (index, token) in tokens.iter().enumerate() {
        match token.instruction {
            Instruction::LoopStart => depth += 1,
            Instruction::LoopEnd => {
                if depth == 0 {
                    return Err(SyntaxError::UnmatchedClose {
                        index,
                        location: token.location,
                    });
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    Ok(())
}
