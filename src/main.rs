// tapetty: byte-tape interpreter with live tape visualization

use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser as _;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tapetty::interpreter::{
    Engine, EngineConfig, InterpreterError, JumpMode, RunReport, RunStatus, StdIo,
};
use tapetty::parser::ValidationMode;
use tapetty::ui::{DisplayIo, Screen, TapeDisplay};

#[derive(clap::Parser, Debug)]
#[command(name = "tapetty")]
#[command(about = "Run a byte-tape program, optionally watching the tape as it runs")]
struct Cli {
    /// Program file
    #[arg(long)]
    file: PathBuf,

    /// Number of tape cells (bytes of memory)
    #[arg(long, allow_negative_numbers = true)]
    memory: i64,

    /// Show the tape while the program runs
    #[arg(long)]
    display: bool,

    /// Delay between steps, in milliseconds
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    delay: i64,

    /// Resolve loop jumps through a precomputed table instead of scanning
    #[arg(long)]
    jump_table: bool,

    /// Also reject programs whose brackets are not properly nested
    #[arg(long)]
    strict_nesting: bool,
}

/// Initialize logging on stderr. `RUST_LOG` overrides the default `warn` filter.
///
/// The display owns the terminal, so with `--display` log lines are dropped.
fn init_logging(display: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if display {
        builder.with_writer(io::sink).init();
    } else {
        builder.with_writer(io::stderr).init();
    }
}

/// Puts the terminal back the way it was, however the display ends
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

fn summary(report: &RunReport) -> String {
    match report.status {
        RunStatus::Completed => "[Runtime] Finished execution.".to_string(),
        RunStatus::Stopped => format!("[Runtime] Stopped after {} steps.", report.steps),
    }
}

fn run_headless(engine: &mut Engine) -> Result<(), InterpreterError> {
    let mut io = StdIo::stdio();
    let report = engine.run(&mut io, None)?;
    eprintln!("\n{}", summary(&report));
    Ok(())
}

fn run_with_display(engine: &mut Engine) -> Result<(), InterpreterError> {
    let program = engine.program().cloned().unwrap_or_default();
    let config = engine.config().clone();

    let guard = TerminalGuard::enter().map_err(InterpreterError::display)?;
    let terminal =
        Terminal::new(CrosstermBackend::new(io::stdout())).map_err(InterpreterError::display)?;
    let screen = Screen::new(terminal, program, config.memory_size, config.output_width)
        .into_shared();

    let mut display = TapeDisplay::new(Rc::clone(&screen), engine.stop_handle());
    let mut io = DisplayIo::new(Rc::clone(&screen), engine.stop_handle());
    let result = engine.run(&mut io, Some(&mut display));

    let (message, failed) = match &result {
        Ok(report) => {
            screen.borrow_mut().record_report(report);
            (summary(report), false)
        }
        Err(e) => (e.to_string(), true),
    };
    screen
        .borrow_mut()
        .finish(&message, failed)
        .map_err(InterpreterError::display)?;
    drop(guard);

    let report = result?;
    eprintln!("{}", summary(&report));
    Ok(())
}

fn engine_config(cli: &Cli) -> Result<EngineConfig, InterpreterError> {
    let jump_mode = if cli.jump_table {
        JumpMode::Table
    } else {
        JumpMode::Scan
    };
    let config = EngineConfig::with_requested_memory(cli.memory)?
        .display(cli.display)
        .step_delay_ms(cli.delay)
        .jump_mode(jump_mode);
    Ok(config)
}

fn run(cli: Cli) -> Result<(), InterpreterError> {
    let mut engine = Engine::new(engine_config(&cli)?)?;

    let mode = if cli.strict_nesting {
        ValidationMode::Nesting
    } else {
        ValidationMode::BracketCount
    };
    engine.load_file(&cli.file, mode)?;

    if cli.display {
        run_with_display(&mut engine)
    } else {
        run_headless(&mut engine)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.display);
    info!(file = %cli.file.display(), memory = cli.memory, "starting");

    if let Err(e) = run(cli) {
        debug!(kind = ?e.kind(), "run failed");
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;
    use tapetty::interpreter::{ConfigurationError, ErrorKind};

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["tapetty", "--file", "demos/hello.bf"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_negative_memory_reaches_validation() {
        let cli = cli(&["--memory", "-1"]);
        assert_eq!(cli.memory, -1);

        let err = engine_config(&cli).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(
            err,
            InterpreterError::Configuration(ConfigurationError::InvalidMemorySize { size: -1 })
        );
        assert!(err
            .to_string()
            .starts_with("[Config] Memory size must be greater than 0"));
    }

    #[test]
    fn test_negative_delay_reaches_validation() {
        let cli = cli(&["--memory", "8", "--delay", "-5"]);
        let config = engine_config(&cli).unwrap();
        let err = Engine::new(config).err().unwrap();
        assert_eq!(err, ConfigurationError::NegativeStepDelay { delay_ms: -5 });
    }

    #[test]
    fn test_flags_map_onto_config() {
        let cli = cli(&["--memory", "8", "--jump-table", "--display"]);
        let config = engine_config(&cli).unwrap();
        assert_eq!(config.memory_size, 8);
        assert_eq!(config.jump_mode, JumpMode::Table);
        assert!(config.display);
    }

    #[test]
    fn test_unreadable_file_is_a_config_error() {
        let argv = ["tapetty", "--file", "demos/missing.bf", "--memory", "8"];
        let err = run(Cli::try_parse_from(argv).unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err
            .to_string()
            .starts_with("[Config] Specified file could not be read: demos/missing.bf"));
    }
}
