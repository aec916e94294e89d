//! Error types for the interpreter
//!
//! This module defines [`ConfigurationError`] (rejected engine settings) and
//! [`RuntimeError`] (faults during execution). Together with
//! [`SyntaxError`] from the parser they are wrapped by [`InterpreterError`],
//! which front ends use to report "kind + message" uniformly.
//!
//! All errors are fatal to the operation that raised them: nothing is
//! retried, and execution never continues past a fault.

use crate::parser::ast::SourceLocation;
use crate::parser::parse::SyntaxError;
use std::fmt;
use std::path::PathBuf;

/// Invalid engine construction parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The tape must hold at least one cell
    InvalidMemorySize { size: i64 },

    /// Step delay below zero milliseconds
    NegativeStepDelay { delay_ms: i64 },

    /// Output column wrap width of zero
    InvalidOutputWidth,

    /// The program file could not be read
    UnreadableFile { path: PathBuf, message: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::InvalidMemorySize { size } => {
                write!(
                    f,
                    "[Config] Memory size must be greater than 0 (got {})",
                    size
                )
            }
            ConfigurationError::NegativeStepDelay { delay_ms } => {
                write!(
                    f,
                    "[Config] Step delay must not be negative (got {} ms)",
                    delay_ms
                )
            }
            ConfigurationError::InvalidOutputWidth => {
                write!(f, "[Config] Output width must be greater than 0")
            }
            ConfigurationError::UnreadableFile { path, message } => {
                write!(
                    f,
                    "[Config] Specified file could not be read: {} ({})",
                    path.display(),
                    message
                )
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Faults that halt a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// `>` would move the pointer past the last cell
    PointerOverflow {
        pc: usize,
        pointer: usize,
        memory_size: usize,
        location: Option<SourceLocation>,
    },

    /// `<` would move the pointer below cell 0
    PointerUnderflow {
        pc: usize,
        location: Option<SourceLocation>,
    },

    /// A taken loop jump found no matching bracket
    UnmatchedBracket {
        pc: usize,
        location: Option<SourceLocation>,
    },

    /// `run` was called before a program was loaded
    ProgramNotLoaded,

    /// Reading or writing a byte failed
    Io { pc: usize, message: String },
}

impl RuntimeError {
    /// Program counter of the faulting instruction, if the fault came from one
    pub fn pc(&self) -> Option<usize> {
        match self {
            RuntimeError::PointerOverflow { pc, .. } => Some(*pc),
            RuntimeError::PointerUnderflow { pc, .. } => Some(*pc),
            RuntimeError::UnmatchedBracket { pc, .. } => Some(*pc),
            RuntimeError::Io { pc, .. } => Some(*pc),
            RuntimeError::ProgramNotLoaded => None,
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::PointerOverflow { location, .. } => location.as_ref(),
            RuntimeError::PointerUnderflow { location, .. } => location.as_ref(),
            RuntimeError::UnmatchedBracket { location, .. } => location.as_ref(),
            RuntimeError::Io { .. } => None,
            RuntimeError::ProgramNotLoaded => None,
        }
    }
}

fn write_location(f: &mut fmt::Formatter<'_>, location: &Option<SourceLocation>) -> fmt::Result {
    match location {
        Some(loc) => write!(f, " at {}", loc),
        None => Ok(()),
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::PointerOverflow {
                pc,
                pointer,
                memory_size,
                location,
            } => {
                write!(
                    f,
                    "[Runtime] Memory pointer is out of bounds: cannot move right from cell {} of {} (instruction {}",
                    pointer, memory_size, pc
                )?;
                write_location(f, location)?;
                write!(f, ")")
            }
            RuntimeError::PointerUnderflow { pc, location } => {
                write!(
                    f,
                    "[Runtime] Memory pointer is out of bounds: cannot move left from cell 0 (instruction {}",
                    pc
                )?;
                write_location(f, location)?;
                write!(f, ")")
            }
            RuntimeError::UnmatchedBracket { pc, location } => {
                write!(f, "[Runtime] No matching bracket for instruction {}", pc)?;
                write_location(f, location)
            }
            RuntimeError::ProgramNotLoaded => {
                write!(f, "[Runtime] Program has not been loaded")
            }
            RuntimeError::Io { pc, message } => {
                write!(f, "[Runtime] I/O failed at instruction {}: {}", pc, message)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// What part of the interpreter a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Syntax,
    Runtime,
    /// The terminal display could not be set up or driven
    Display,
}

/// Any failure the interpreter can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpreterError {
    Configuration(ConfigurationError),
    Syntax(SyntaxError),
    Runtime(RuntimeError),
    Display { message: String },
}

impl InterpreterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InterpreterError::Configuration(_) => ErrorKind::Configuration,
            InterpreterError::Syntax(_) => ErrorKind::Syntax,
            InterpreterError::Runtime(_) => ErrorKind::Runtime,
            InterpreterError::Display { .. } => ErrorKind::Display,
        }
    }

    /// Wrap a terminal failure from the display front end
    pub fn display(err: std::io::Error) -> Self {
        InterpreterError::Display {
            message: err.to_string(),
        }
    }
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpreterError::Configuration(e) => e.fmt(f),
            InterpreterError::Syntax(e) => e.fmt(f),
            InterpreterError::Runtime(e) => e.fmt(f),
            InterpreterError::Display { message } => {
                write!(f, "[Display] Terminal display failed: {}", message)
            }
        }
    }
}

impl std::error::Error for InterpreterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InterpreterError::Configuration(e) => Some(e),
            InterpreterError::Syntax(e) => Some(e),
            InterpreterError::Runtime(e) => Some(e),
            InterpreterError::Display { .. } => None,
        }
    }
}

impl From<ConfigurationError> for InterpreterError {
    fn from(err: ConfigurationError) -> Self {
        InterpreterError::Configuration(err)
    }
}

impl From<SyntaxError> for InterpreterError {
    fn from(err: SyntaxError) -> Self {
        InterpreterError::Syntax(err)
    }
}

impl From<RuntimeError> for InterpreterError {
    fn from(err: RuntimeError) -> Self {
        InterpreterError::Runtime(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let config: InterpreterError = ConfigurationError::InvalidMemorySize { size: 0 }.into();
        let syntax: InterpreterError = SyntaxError::UnbalancedBrackets { open: 1, close: 0 }.into();
        let runtime: InterpreterError = RuntimeError::ProgramNotLoaded.into();

        assert_eq!(config.kind(), ErrorKind::Configuration);
        assert_eq!(syntax.kind(), ErrorKind::Syntax);
        assert_eq!(runtime.kind(), ErrorKind::Runtime);
    }

    #[test]
    fn test_messages_carry_kind_prefix() {
        let err = ConfigurationError::InvalidMemorySize { size: 0 };
        assert!(err.to_string().starts_with("[Config]"));

        let err = RuntimeError::PointerOverflow {
            pc: 3,
            pointer: 0,
            memory_size: 1,
            location: Some(SourceLocation::new(1, 4)),
        };
        assert_eq!(
            err.to_string(),
            "[Runtime] Memory pointer is out of bounds: cannot move right from cell 0 of 1 (instruction 3 at line 1, column 4)"
        );
        assert_eq!(err.pc(), Some(3));
        assert_eq!(err.location(), Some(&SourceLocation::new(1, 4)));
        assert_eq!(RuntimeError::ProgramNotLoaded.location(), None);
    }

    #[test]
    fn test_unreadable_file_message() {
        let err = ConfigurationError::UnreadableFile {
            path: PathBuf::from("missing.bf"),
            message: String::from("No such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "[Config] Specified file could not be read: missing.bf (No such file or directory)"
        );
    }

    #[test]
    fn test_display_failure() {
        let err = InterpreterError::display(std::io::Error::other("not a tty"));
        assert_eq!(err.kind(), ErrorKind::Display);
        assert_eq!(err.to_string(), "[Display] Terminal display failed: not a tty");
    }
}
