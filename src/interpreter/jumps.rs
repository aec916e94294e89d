//! Loop boundary resolution.
//!
//! The default strategy, [`JumpMode::Scan`], finds the partner of a bracket
//! at run time by walking the program with a nesting-depth counter, so a
//! taken jump costs time proportional to the loop body. [`JumpMode::Table`]
//! pairs every bracket once up front and answers in constant time.
//!
//! Both strategies agree on every bracket, including in programs that passed
//! the count-only check without being well nested: a bracket that has no
//! partner under one has no partner under the other.

use crate::parser::ast::{Instruction, Program};
use rustc_hash::FxHashMap;

/// How the engine finds matching brackets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpMode {
    /// Scan the program on every taken jump
    #[default]
    Scan,
    /// Precompute all bracket pairs before the run
    Table,
}

/// Find the `]` closing the `[` at `open`, scanning forward.
pub fn scan_forward(program: &[Instruction], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, instruction) in program.iter().enumerate().skip(open + 1) {
        match instruction {
            Instruction::LoopStart => depth += 1,
            Instruction::LoopEnd => {
                if depth == 0 {
                    return Some(offset);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Find the `[` opened by the `]` at `close`, scanning backward.
pub fn scan_backward(program: &[Instruction], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for index in (0..close).rev() {
        match program[index] {
            Instruction::LoopEnd => depth += 1,
            Instruction::LoopStart => {
                if depth == 0 {
                    return Some(index);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Precomputed bracket pairs, both directions
#[derive(Debug, Clone, Default)]
pub struct JumpTable {
    targets: FxHashMap<usize, usize>,
}

impl JumpTable {
    pub fn build(program: &Program) -> Self {
        let mut targets = FxHashMap::default();
        let mut open: Vec<usize> = Vec::new();

        for (index, instruction) in program.instructions().iter().enumerate() {
            match instruction {
                Instruction::LoopStart => open.push(index),
                Instruction::LoopEnd => {
                    // A stray `]` stays unpaired
                    if let Some(start) = open.pop() {
                        targets.insert(start, index);
                        targets.insert(index, start);
                    }
                }
                _ => {}
            }
        }

        JumpTable { targets }
    }

    /// Partner of the bracket at `index`
    pub fn target(&self, index: usize) -> Option<usize> {
        self.targets.get(&index).copied()
    }

    /// Number of bracket pairs
    pub fn pairs(&self) -> usize {
        self.targets.len() / 2
    }
}

/// Bracket matcher used for one run
pub(crate) enum JumpResolver {
    Scan,
    Table(JumpTable),
}

impl JumpResolver {
    pub(crate) fn new(mode: JumpMode, program: &Program) -> Self {
        match mode {
            JumpMode::Scan => JumpResolver::Scan,
            JumpMode::Table => JumpResolver::Table(JumpTable::build(program)),
        }
    }

    /// Partner of the `[` at `pc`
    pub(crate) fn loop_end(&self, program: &Program, pc: usize) -> Option<usize> {
        match self {
            JumpResolver::Scan => scan_forward(program.instructions(), pc),
            JumpResolver::Table(table) => table.target(pc),
        }
    }

    /// Partner of the `]` at `pc`
    pub(crate) fn loop_start(&self, program: &Program, pc: usize) -> Option<usize> {
        match self {
            JumpResolver::Scan => scan_backward(program.instructions(), pc),
            JumpResolver::Table(table) => table.target(pc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse;

    #[test]
    fn test_scan_simple_loop() {
        let program = parse("+[-]").unwrap();
        let code = program.instructions();

        assert_eq!(scan_forward(code, 1), Some(3));
        assert_eq!(scan_backward(code, 3), Some(1));
    }

    #[test]
    fn test_scan_nested_loops() {
        // 0 1 2 3 4 5 6 7
        // [ > [ - ] < - ]
        let program = parse("[>[-]<-]").unwrap();
        let code = program.instructions();

        assert_eq!(scan_forward(code, 0), Some(7));
        assert_eq!(scan_forward(code, 2), Some(4));
        assert_eq!(scan_backward(code, 7), Some(0));
        assert_eq!(scan_backward(code, 4), Some(2));
    }

    #[test]
    fn test_scan_adjacent_loops() {
        let program = parse("[][]").unwrap();
        let code = program.instructions();

        assert_eq!(scan_forward(code, 0), Some(1));
        assert_eq!(scan_forward(code, 2), Some(3));
        assert_eq!(scan_backward(code, 3), Some(2));
    }

    #[test]
    fn test_scan_misordered_brackets() {
        let program = parse("][").unwrap();
        let code = program.instructions();

        assert_eq!(scan_backward(code, 0), None);
        assert_eq!(scan_forward(code, 1), None);
    }

    #[test]
    fn test_table_matches_scan() {
        for source in ["[>[-]<-]", "[][]", "][", "[]][[]", "]][[", "+[[-]>]<"] {
            let program = parse(source).unwrap();
            let code = program.instructions();
            let table = JumpTable::build(&program);

            for (index, instruction) in code.iter().enumerate() {
                let scanned = match instruction {
                    Instruction::LoopStart => scan_forward(code, index),
                    Instruction::LoopEnd => scan_backward(code, index),
                    _ => continue,
                };
                assert_eq!(
                    table.target(index),
                    scanned,
                    "bracket {} in {:?}",
                    index,
                    source
                );
            }
        }
    }

    #[test]
    fn test_table_pairs() {
        let program = parse("[]][[]").unwrap();
        let table = JumpTable::build(&program);

        assert_eq!(table.pairs(), 2);
        assert_eq!(table.target(2), None);
        assert_eq!(table.target(3), None);
        assert_eq!(table.target(4), Some(5));
    }
}
