// Program representation for the tape interpreter

use std::fmt;

/// Source location information for error reporting and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The eight instructions of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Right,     // >
    Left,      // <
    Increment, // +
    Decrement, // -
    Output,    // .
    Input,     // ,
    LoopStart, // [
    LoopEnd,   // ]
}

impl Instruction {
    /// All instructions, in alphabet order
    pub const ALL: [Instruction; 8] = [
        Instruction::Right,
        Instruction::Left,
        Instruction::Increment,
        Instruction::Decrement,
        Instruction::Output,
        Instruction::Input,
        Instruction::LoopStart,
        Instruction::LoopEnd,
    ];

    /// Map a source character to an instruction.
    ///
    /// Returns `None` for every character outside the alphabet; those are
    /// comments as far as the language is concerned.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '>' => Some(Instruction::Right),
            '<' => Some(Instruction::Left),
            '+' => Some(Instruction::Increment),
            '-' => Some(Instruction::Decrement),
            '.' => Some(Instruction::Output),
            ',' => Some(Instruction::Input),
            '[' => Some(Instruction::LoopStart),
            ']' => Some(Instruction::LoopEnd),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Instruction::Right => '>',
            Instruction::Left => '<',
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::LoopStart => '[',
            Instruction::LoopEnd => ']',
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A validated, immutable instruction sequence.
///
/// Only the parser builds programs, so a `Program` always satisfies the
/// validation mode it was parsed with. `locations[i]` is where
/// `instructions[i]` appeared in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    instructions: Vec<Instruction>,
    locations: Vec<SourceLocation>,
}

impl Program {
    pub(crate) fn new(instructions: Vec<Instruction>, locations: Vec<SourceLocation>) -> Self {
        debug_assert_eq!(instructions.len(), locations.len());
        Program {
            instructions,
            locations,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn get(&self, index: usize) -> Option<Instruction> {
        self.instructions.get(index).copied()
    }

    /// Source location of the instruction at `index`
    pub fn location(&self, index: usize) -> Option<SourceLocation> {
        self.locations.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of occurrences of `instruction` in the program
    pub fn count(&self, instruction: Instruction) -> usize {
        self.instructions
            .iter()
            .filter(|&&i| i == instruction)
            .count()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            write!(f, "{}", instruction)?;
        }
        Ok(())
    }
}
