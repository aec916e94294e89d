//! The byte tape
//!
//! [`Tape`] is a fixed-length, zero-initialized run of 8-bit cells plus the
//! pointer into it. Cell arithmetic wraps modulo 256 in both directions.
//! Pointer moves are checked: the pointer never leaves `[0, len)`, and a move
//! that would take it out is refused with a [`BoundsError`] while the tape
//! stays unchanged.

use std::fmt;

/// A refused pointer move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsError {
    /// `>` on the last cell
    Overflow { pointer: usize, size: usize },
    /// `<` on cell 0
    Underflow,
}

impl fmt::Display for BoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundsError::Overflow { pointer, size } => {
                write!(f, "pointer {} cannot move right on a tape of {} cells", pointer, size)
            }
            BoundsError::Underflow => write!(f, "pointer 0 cannot move left"),
        }
    }
}

/// Fixed-size byte tape with a bounds-checked pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Tape {
    /// Allocate `size` zeroed cells with the pointer on cell 0.
    ///
    /// Callers validate `size >= 1` beforehand; see
    /// [`EngineConfig`](crate::interpreter::engine::EngineConfig).
    pub fn new(size: usize) -> Self {
        debug_assert!(size >= 1, "tape must hold at least one cell");
        Tape {
            cells: vec![0; size],
            pointer: 0,
        }
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Value of the cell under the pointer
    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn set_current(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(1);
    }

    pub fn move_right(&mut self) -> Result<(), BoundsError> {
        if self.pointer + 1 >= self.cells.len() {
            return Err(BoundsError::Overflow {
                pointer: self.pointer,
                size: self.cells.len(),
            });
        }
        self.pointer += 1;
        Ok(())
    }

    pub fn move_left(&mut self) -> Result<(), BoundsError> {
        if self.pointer == 0 {
            return Err(BoundsError::Underflow);
        }
        self.pointer -= 1;
        Ok(())
    }

    /// Consume the tape, returning its cells and the final pointer
    pub fn into_parts(self) -> (Vec<u8>, usize) {
        (self.cells, self.pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tape_is_zeroed() {
        let tape = Tape::new(4);
        assert_eq!(tape.cells(), &[0, 0, 0, 0]);
        assert_eq!(tape.pointer(), 0);
        assert_eq!(tape.len(), 4);
    }

    #[test]
    fn test_wrapping_arithmetic() {
        let mut tape = Tape::new(1);

        tape.decrement();
        assert_eq!(tape.current(), 255);

        tape.increment();
        assert_eq!(tape.current(), 0);

        tape.set_current(255);
        tape.increment();
        assert_eq!(tape.current(), 0);
    }

    #[test]
    fn test_pointer_bounds() {
        let mut tape = Tape::new(2);

        assert_eq!(tape.move_left(), Err(BoundsError::Underflow));
        assert!(tape.move_right().is_ok());
        assert_eq!(tape.pointer(), 1);
        assert_eq!(
            tape.move_right(),
            Err(BoundsError::Overflow { pointer: 1, size: 2 })
        );
        // A refused move leaves the pointer where it was
        assert_eq!(tape.pointer(), 1);
        assert!(tape.move_left().is_ok());
        assert_eq!(tape.pointer(), 0);
    }

    #[test]
    fn test_single_cell_tape_cannot_move() {
        let mut tape = Tape::new(1);
        assert!(tape.move_right().is_err());
        assert!(tape.move_left().is_err());
    }

    #[test]
    fn test_cells_are_independent() {
        let mut tape = Tape::new(3);
        tape.increment();
        tape.move_right().unwrap();
        tape.decrement();
        tape.move_right().unwrap();
        tape.set_current(b'A');

        let (cells, pointer) = tape.into_parts();
        assert_eq!(cells, vec![1, 255, 65]);
        assert_eq!(pointer, 2);
    }
}
