// Constants for the tape interpreter

/// Column at which the tracked output column wraps back to 0
pub const DEFAULT_OUTPUT_WIDTH: usize = 80;

/// Tape size used by front ends when none is given (the classic 30 000 cells)
pub const DEFAULT_MEMORY_SIZE: usize = 30_000;
