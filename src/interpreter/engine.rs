// Execution engine for the tape interpreter

use crate::interpreter::constants::{DEFAULT_MEMORY_SIZE, DEFAULT_OUTPUT_WIDTH};
use crate::interpreter::errors::{ConfigurationError, InterpreterError, RuntimeError};
use crate::interpreter::io::ByteIo;
use crate::interpreter::jumps::{JumpMode, JumpResolver};
use crate::memory::tape::{BoundsError, Tape};
use crate::parser::ast::{Instruction, Program};
use crate::parser::parse::{Parser, SyntaxError, ValidationMode};
use crate::snapshot::{OutputColumn, StepObserver, StepView};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Engine settings, validated by [`Engine::new`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of tape cells, at least 1
    pub memory_size: usize,

    /// Whether the step observer is invoked
    pub display: bool,

    /// Pause before each instruction, in milliseconds (0 = none)
    pub step_delay_ms: i64,

    pub jump_mode: JumpMode,

    /// Width at which the tracked output column wraps (`None` = never)
    pub output_width: Option<usize>,
}

impl EngineConfig {
    pub fn new(memory_size: usize) -> Self {
        EngineConfig {
            memory_size,
            display: false,
            step_delay_ms: 0,
            jump_mode: JumpMode::default(),
            output_width: Some(DEFAULT_OUTPUT_WIDTH),
        }
    }

    /// Build a config from a signed cell count, as given on the command line.
    ///
    /// Counts below 1 are refused here with the same error [`EngineConfig::validate`]
    /// gives for an empty tape.
    pub fn with_requested_memory(requested: i64) -> Result<Self, ConfigurationError> {
        match usize::try_from(requested) {
            Ok(size) if size >= 1 => Ok(EngineConfig::new(size)),
            _ => Err(ConfigurationError::InvalidMemorySize { size: requested }),
        }
    }

    pub fn display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    pub fn step_delay_ms(mut self, delay_ms: i64) -> Self {
        self.step_delay_ms = delay_ms;
        self
    }

    pub fn jump_mode(mut self, mode: JumpMode) -> Self {
        self.jump_mode = mode;
        self
    }

    pub fn output_width(mut self, width: Option<usize>) -> Self {
        self.output_width = width;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.memory_size < 1 {
            return Err(ConfigurationError::InvalidMemorySize { size: 0 });
        }
        if self.step_delay_ms < 0 {
            return Err(ConfigurationError::NegativeStepDelay {
                delay_ms: self.step_delay_ms,
            });
        }
        if self.output_width == Some(0) {
            return Err(ConfigurationError::InvalidOutputWidth);
        }
        Ok(())
    }

    fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms.max(0).unsigned_abs())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::new(DEFAULT_MEMORY_SIZE)
    }
}

/// Cross-thread handle that cancels the current run.
///
/// The flag is polled once per instruction; the instruction in flight when
/// [`StopHandle::stop`] is called still completes, nothing is rolled back.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request cancellation. Idempotent.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// How a run ended without a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The program counter passed the end of the program
    Completed,
    /// Cancellation was observed before the program finished
    Stopped,
}

/// Result of a run that did not fault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub status: RunStatus,
    /// Instructions executed
    pub steps: u64,
    /// Bytes written by `.`
    pub output_bytes: u64,
    /// Final tape contents
    pub tape: Vec<u8>,
    /// Final pointer position
    pub pointer: usize,
}

impl RunReport {
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/// The tape machine.
///
/// An engine owns its configuration, optionally a loaded program, and the
/// stop flag. Each run allocates a fresh tape; runs are sequential.
pub struct Engine {
    config: EngineConfig,
    program: Option<Program>,
    stop: StopHandle,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Engine {
            config,
            program: None,
            stop: StopHandle::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The program loaded with [`Engine::load`], if any
    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    /// Parse `source` with count-only validation and keep it for [`Engine::run`].
    ///
    /// On failure the previously loaded program, if any, is discarded.
    pub fn load(&mut self, source: &str) -> Result<(), SyntaxError> {
        self.load_with(source, ValidationMode::default())
    }

    pub fn load_with(&mut self, source: &str, mode: ValidationMode) -> Result<(), SyntaxError> {
        self.program = None;
        let program = Parser::new(source).with_mode(mode).parse()?;
        self.program = Some(program);
        Ok(())
    }

    /// Read a program file and load it like [`Engine::load_with`].
    pub fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        mode: ValidationMode,
    ) -> Result<(), InterpreterError> {
        let path = path.as_ref();
        self.program = None;
        let source = fs::read_to_string(path).map_err(|e| ConfigurationError::UnreadableFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.load_with(&source, mode)?;
        debug!(
            file = %path.display(),
            instructions = self.program.as_ref().map(|p| p.len()).unwrap_or(0),
            "program loaded"
        );
        Ok(())
    }

    /// A handle that can cancel runs of this engine from any thread
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Cancel the current run, if any
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Run the loaded program.
    pub fn run<I: ByteIo + ?Sized>(
        &mut self,
        io: &mut I,
        observer: Option<&mut dyn StepObserver>,
    ) -> Result<RunReport, RuntimeError> {
        let program = self.program.as_ref().ok_or(RuntimeError::ProgramNotLoaded)?;
        execute(&self.config, &self.stop, program, io, observer)
    }

    /// Run `program` instead of the loaded one.
    pub fn run_program<I: ByteIo + ?Sized>(
        &mut self,
        program: &Program,
        io: &mut I,
        observer: Option<&mut dyn StepObserver>,
    ) -> Result<RunReport, RuntimeError> {
        execute(&self.config, &self.stop, program, io, observer)
    }
}

fn execute<I: ByteIo + ?Sized>(
    config: &EngineConfig,
    stop: &StopHandle,
    program: &Program,
    io: &mut I,
    observer: Option<&mut dyn StepObserver>,
) -> Result<RunReport, RuntimeError> {
    stop.reset();

    let mut session = Session::new(config, program);
    let mut observer = if config.display { observer } else { None };
    let delay = config.step_delay();

    debug!(
        memory_size = config.memory_size,
        instructions = program.len(),
        jump_mode = ?config.jump_mode,
        "run started"
    );

    while let Some(instruction) = program.get(session.pc) {
        if stop.is_stopped() {
            info!(steps = session.steps, pc = session.pc, "run stopped");
            return Ok(session.finish(RunStatus::Stopped));
        }

        if let Some(observer) = observer.as_deref_mut() {
            if !stop.is_stopped() {
                observer.on_step(&session.view(instruction));
            }
        }

        if !delay.is_zero() {
            thread::sleep(delay);
        }

        session.execute(instruction, io)?;
    }

    debug!(
        steps = session.steps,
        output_bytes = session.output_bytes,
        "run completed"
    );
    Ok(session.finish(RunStatus::Completed))
}

/// State of one run; discarded when the run ends
struct Session<'p> {
    program: &'p Program,
    jumps: JumpResolver,
    tape: Tape,
    pc: usize,
    column: OutputColumn,
    steps: u64,
    output_bytes: u64,
}

impl<'p> Session<'p> {
    fn new(config: &EngineConfig, program: &'p Program) -> Self {
        Session {
            program,
            jumps: JumpResolver::new(config.jump_mode, program),
            tape: Tape::new(config.memory_size),
            pc: 0,
            column: OutputColumn::new(config.output_width),
            steps: 0,
            output_bytes: 0,
        }
    }

    fn view(&self, instruction: Instruction) -> StepView<'_> {
        StepView {
            tape: self.tape.cells(),
            pointer: self.tape.pointer(),
            output_column: self.column.get(),
            pc: self.pc,
            instruction,
            step: self.steps,
        }
    }

    /// Apply one instruction and advance the program counter
    fn execute<I: ByteIo + ?Sized>(
        &mut self,
        instruction: Instruction,
        io: &mut I,
    ) -> Result<(), RuntimeError> {
        match instruction {
            Instruction::Right | Instruction::Left => {
                let moved = if instruction == Instruction::Right {
                    self.tape.move_right()
                } else {
                    self.tape.move_left()
                };
                moved.map_err(|e| self.bounds_fault(e))?;
            }
            Instruction::Increment => self.tape.increment(),
            Instruction::Decrement => self.tape.decrement(),
            Instruction::Output => {
                let byte = self.tape.current();
                io.write_byte(byte).map_err(|e| self.io_fault(e))?;
                self.column.advance(byte);
                self.output_bytes += 1;
            }
            Instruction::Input => {
                // End of input reads as 0
                let byte = io.read_byte().map_err(|e| self.io_fault(e))?;
                self.tape.set_current(byte.unwrap_or(0));
            }
            Instruction::LoopStart => {
                if self.tape.current() == 0 {
                    let target = self
                        .jumps
                        .loop_end(self.program, self.pc)
                        .ok_or_else(|| self.unmatched())?;
                    trace!(from = self.pc, to = target, "skip loop");
                    self.pc = target;
                }
            }
            Instruction::LoopEnd => {
                if self.tape.current() != 0 {
                    let target = self
                        .jumps
                        .loop_start(self.program, self.pc)
                        .ok_or_else(|| self.unmatched())?;
                    trace!(from = self.pc, to = target, "repeat loop");
                    self.pc = target;
                }
            }
        }

        self.pc += 1;
        self.steps += 1;
        Ok(())
    }

    fn bounds_fault(&self, err: BoundsError) -> RuntimeError {
        let location = self.program.location(self.pc);
        match err {
            BoundsError::Overflow { pointer, size } => RuntimeError::PointerOverflow {
                pc: self.pc,
                pointer,
                memory_size: size,
                location,
            },
            BoundsError::Underflow => RuntimeError::PointerUnderflow {
                pc: self.pc,
                location,
            },
        }
    }

    fn io_fault(&self, err: std::io::Error) -> RuntimeError {
        RuntimeError::Io {
            pc: self.pc,
            message: err.to_string(),
        }
    }

    fn unmatched(&self) -> RuntimeError {
        RuntimeError::UnmatchedBracket {
            pc: self.pc,
            location: self.program.location(self.pc),
        }
    }

    fn finish(self, status: RunStatus) -> RunReport {
        let (tape, pointer) = self.tape.into_parts();
        RunReport {
            status,
            steps: self.steps,
            output_bytes: self.output_bytes,
            tape,
            pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::io::BufferIo;
    use crate::parser::ast::SourceLocation;
    use std::time::Instant;

    fn engine(memory_size: usize) -> Engine {
        Engine::new(EngineConfig::new(memory_size)).unwrap()
    }

    fn run_source(memory_size: usize, source: &str) -> Result<RunReport, RuntimeError> {
        let mut engine = engine(memory_size);
        engine.load(source).unwrap();
        engine.run(&mut BufferIo::new(), None)
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            Engine::new(EngineConfig::new(0)).err(),
            Some(ConfigurationError::InvalidMemorySize { size: 0 })
        );
        assert_eq!(
            Engine::new(EngineConfig::new(1).step_delay_ms(-1)).err(),
            Some(ConfigurationError::NegativeStepDelay { delay_ms: -1 })
        );
        assert_eq!(
            Engine::new(EngineConfig::new(1).output_width(Some(0))).err(),
            Some(ConfigurationError::InvalidOutputWidth)
        );
        assert!(Engine::new(EngineConfig::new(1).output_width(None)).is_ok());
        assert_eq!(EngineConfig::default().memory_size, 30_000);
    }

    #[test]
    fn test_requested_memory_below_one() {
        assert_eq!(
            EngineConfig::with_requested_memory(-1).err(),
            Some(ConfigurationError::InvalidMemorySize { size: -1 })
        );
        assert_eq!(
            EngineConfig::with_requested_memory(0).err(),
            Some(ConfigurationError::InvalidMemorySize { size: 0 })
        );
        assert_eq!(
            EngineConfig::with_requested_memory(16).map(|c| c.memory_size),
            Ok(16)
        );
    }

    #[test]
    fn test_load_missing_file() {
        let mut engine = engine(4);
        engine.load("+").unwrap();

        let err = engine
            .load_file("no/such/program.bf", ValidationMode::default())
            .unwrap_err();
        match err {
            InterpreterError::Configuration(ConfigurationError::UnreadableFile { path, .. }) => {
                assert_eq!(path, Path::new("no/such/program.bf"));
            }
            other => panic!("expected unreadable file, got {:?}", other),
        }
        assert!(engine.program().is_none());
    }

    #[test]
    fn test_run_without_program() {
        let mut engine = engine(8);
        let result = engine.run(&mut BufferIo::new(), None);
        assert_eq!(result, Err(RuntimeError::ProgramNotLoaded));
    }

    #[test]
    fn test_failed_load_discards_previous_program() {
        let mut engine = engine(8);
        engine.load("+").unwrap();
        assert!(engine.load("[").is_err());
        assert!(engine.program().is_none());
        assert_eq!(
            engine.run(&mut BufferIo::new(), None),
            Err(RuntimeError::ProgramNotLoaded)
        );
    }

    #[test]
    fn test_empty_program_completes() {
        let report = run_source(1, "just a comment").unwrap();
        assert!(report.is_completed());
        assert_eq!(report.steps, 0);
        assert_eq!(report.tape, vec![0]);
    }

    #[test]
    fn test_clear_loop() {
        let report = run_source(1, "+[-]").unwrap();
        assert_eq!(report.tape, vec![0]);
        // + [ - ] : the `]` falls through once the cell is zero
        assert_eq!(report.steps, 4);
    }

    #[test]
    fn test_skipped_loop() {
        let report = run_source(2, "[>+<]+").unwrap();
        assert_eq!(report.tape, vec![1, 0]);
        assert_eq!(report.steps, 2);
    }

    #[test]
    fn test_overflow_fault_location() {
        let err = run_source(2, "+>\n >").unwrap_err();
        assert_eq!(
            err,
            RuntimeError::PointerOverflow {
                pc: 2,
                pointer: 1,
                memory_size: 2,
                location: Some(SourceLocation::new(2, 2)),
            }
        );
    }

    #[test]
    fn test_underflow_fault() {
        let err = run_source(4, "<").unwrap_err();
        assert!(matches!(err, RuntimeError::PointerUnderflow { pc: 0, .. }));
    }

    #[test]
    fn test_misordered_brackets_fault_only_when_jump_is_taken() {
        // Cell is zero, so `]` falls through and `[` jumps forward into nothing
        let err = run_source(1, "][").unwrap_err();
        assert!(matches!(err, RuntimeError::UnmatchedBracket { pc: 1, .. }));

        // Cell is non-zero at `]`, backward scan finds nothing
        let err = run_source(1, "+][").unwrap_err();
        assert!(matches!(err, RuntimeError::UnmatchedBracket { pc: 1, .. }));

        // Zero at `]` and non-zero at `[`: no jump is ever taken
        let report = run_source(1, "]+[").unwrap();
        assert!(report.is_completed());
    }

    #[test]
    fn test_input_end_reads_zero() {
        let mut engine = engine(1);
        engine.load("+++,").unwrap();
        let report = engine.run(&mut BufferIo::new(), None).unwrap();
        assert_eq!(report.tape, vec![0]);
    }

    #[test]
    fn test_observer_only_fires_with_display() {
        let mut calls = 0;
        let mut observer = |_: &StepView<'_>| calls += 1;

        let mut engine = engine(1);
        engine.load("+++").unwrap();
        engine
            .run(&mut BufferIo::new(), Some(&mut observer))
            .unwrap();
        assert_eq!(calls, 0);

        let mut calls = 0;
        let mut observer = |_: &StepView<'_>| calls += 1;
        let mut engine = Engine::new(EngineConfig::new(1).display(true)).unwrap();
        engine.load("+++").unwrap();
        engine
            .run(&mut BufferIo::new(), Some(&mut observer))
            .unwrap();
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_observer_sees_state_before_each_instruction() {
        let mut seen = Vec::new();
        let mut observer = |v: &StepView<'_>| {
            seen.push((v.step, v.pc, v.instruction, v.pointer, v.current_cell(), v.output_column))
        };

        let mut engine = Engine::new(EngineConfig::new(2).display(true)).unwrap();
        engine.load("+.>").unwrap();
        engine
            .run(&mut BufferIo::new(), Some(&mut observer))
            .unwrap();

        assert_eq!(
            seen,
            vec![
                (0, 0, Instruction::Increment, 0, 0, 0),
                (1, 1, Instruction::Output, 0, 1, 0),
                (2, 2, Instruction::Right, 0, 1, 1),
            ]
        );
    }

    #[test]
    fn test_stop_from_observer() {
        let mut engine = Engine::new(EngineConfig::new(1).display(true)).unwrap();
        engine.load("+[]").unwrap(); // never terminates on its own
        let handle = engine.stop_handle();

        let mut calls = 0u64;
        let mut observer = |v: &StepView<'_>| {
            calls += 1;
            if v.step == 10 {
                handle.stop();
            }
        };

        let report = engine
            .run(&mut BufferIo::new(), Some(&mut observer))
            .unwrap();

        assert_eq!(report.status, RunStatus::Stopped);
        // The step that requested the stop still completes
        assert_eq!(report.steps, 11);
        assert_eq!(calls, 11);
    }

    #[test]
    fn test_stop_from_another_thread() {
        let mut engine = engine(1);
        engine.load("+[]").unwrap();
        let handle = engine.stop_handle();

        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.stop();
            handle.stop();
        });

        let report = engine.run(&mut BufferIo::new(), None).unwrap();
        stopper.join().unwrap();

        assert_eq!(report.status, RunStatus::Stopped);
        assert!(report.steps > 0);
    }

    #[test]
    fn test_stop_flag_is_cleared_for_next_run() {
        let mut engine = engine(1);
        engine.load("+++").unwrap();
        engine.stop();

        let report = engine.run(&mut BufferIo::new(), None).unwrap();
        assert!(report.is_completed());
        assert_eq!(report.tape, vec![3]);
    }

    #[test]
    fn test_sequential_runs_get_fresh_tape() {
        let mut engine = engine(2);
        engine.load("+>++").unwrap();

        let first = engine.run(&mut BufferIo::new(), None).unwrap();
        let second = engine.run(&mut BufferIo::new(), None).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.tape, vec![1, 2]);
    }

    #[test]
    fn test_step_delay_applies_once_per_instruction() {
        let mut engine = Engine::new(EngineConfig::new(1).step_delay_ms(5)).unwrap();
        engine.load("++++").unwrap();

        let start = Instant::now();
        let report = engine.run(&mut BufferIo::new(), None).unwrap();

        assert_eq!(report.steps, 4);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_run_program_ignores_loaded_program() {
        let mut engine = engine(1);
        engine.load("+").unwrap();
        let other = crate::parser::parse::parse("++").unwrap();

        let report = engine
            .run_program(&other, &mut BufferIo::new(), None)
            .unwrap();
        assert_eq!(report.tape, vec![2]);
    }
}
