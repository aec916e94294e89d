// Step views handed to observers, and output column tracking

use crate::parser::ast::Instruction;

/// Read-only view of the machine right before an instruction is applied
#[derive(Debug, Clone, Copy)]
pub struct StepView<'a> {
    pub tape: &'a [u8],
    pub pointer: usize,
    /// Column the next output byte will land in
    pub output_column: usize,
    pub pc: usize,
    pub instruction: Instruction,
    /// 0-based count of instructions executed before this one
    pub step: u64,
}

impl StepView<'_> {
    /// Value of the cell under the pointer
    pub fn current_cell(&self) -> u8 {
        self.tape[self.pointer]
    }
}

/// Called once per executed instruction when display is enabled
pub trait StepObserver {
    fn on_step(&mut self, view: &StepView<'_>);
}

impl<F> StepObserver for F
where
    F: FnMut(&StepView<'_>),
{
    fn on_step(&mut self, view: &StepView<'_>) {
        self(view)
    }
}

/// Logical output column, for observers that render output themselves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    column: usize,
    width: Option<usize>,
}

impl OutputColumn {
    /// `width` of `None` never wraps
    pub fn new(width: Option<usize>) -> Self {
        OutputColumn { column: 0, width }
    }

    pub fn get(&self) -> usize {
        self.column
    }

    /// Account for one written byte
    pub fn advance(&mut self, byte: u8) {
        match byte {
            b'\n' | b'\r' => self.column = 0,
            _ => {
                self.column += 1;
                if self.width.is_some_and(|w| self.column >= w) {
                    self.column = 0;
                }
            }
        }
    }
}

impl Default for OutputColumn {
    fn default() -> Self {
        Self::new(None)
    }
}
