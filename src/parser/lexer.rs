//! Lexer for program source
//!
//! Filters raw source text down to the instruction alphabet. Every character
//! outside the alphabet is a comment and vanishes silently; the lexer never
//! fails. Each surviving instruction keeps the line and column it was found
//! at so later stages can point back into the source.

use super::ast::{Instruction, SourceLocation};

/// An instruction together with where it appeared in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub instruction: Instruction,
    pub location: SourceLocation,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        let mut location = self.current_location();
        while let Some(ch) = self.advance() {
            if let Some(instruction) = Instruction::from_char(ch) {
                tokens.push(Token {
                    instruction,
                    location,
                });
            }
            location = self.current_location();
        }

        tokens
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        if self.position >= self.input.len() {
            return None;
        }

        let ch = self.input[self.position];
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instructions(source: &str) -> Vec<Instruction> {
        Lexer::new(source)
            .tokenize()
            .into_iter()
            .map(|t| t.instruction)
            .collect()
    }

    #[test]
    fn test_all_symbols() {
        let tokens = instructions("><+-.,[]");
        assert_eq!(tokens, Instruction::ALL.to_vec());
    }

    #[test]
    fn test_comments_and_whitespace_vanish() {
        let tokens = instructions("add one: +\n  then print it .  # done");
        assert_eq!(tokens, vec![Instruction::Increment, Instruction::Output]);
    }

    #[test]
    fn test_empty_source() {
        assert!(instructions("").is_empty());
        assert!(instructions("no instructions here").is_empty());
    }

    #[test]
    fn test_locations() {
        let tokens = Lexer::new("a+\n  [x]").tokenize();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].location, SourceLocation::new(1, 2));
        assert_eq!(tokens[1].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[2].location, SourceLocation::new(2, 5));
    }

    #[test]
    fn test_trailing_text_and_blank_lines() {
        let tokens = Lexer::new("\n\n+x\r\n-\n").tokenize();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].location, SourceLocation::new(3, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(4, 1));
    }

    #[test]
    fn test_non_ascii_is_ignored() {
        let tokens = instructions("héllo → + wörld ←");
        assert_eq!(tokens, vec![Instruction::Increment]);
    }
}
