//! psinterp command line interface
//!
//! ```bash
//! # Interactive session with dynamic scoping
//! psinterp
//!
//! # Interactive session with lexical scoping and debug logging
//! psinterp --lexical -v
//!
//! # Run a script line by line
//! psinterp program.ps
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use psinterp::{Config, Interpreter, Scoping};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(
    name = "psinterp",
    version = env!("CARGO_PKG_VERSION"),
    about = "A small PostScript-style stack language interpreter"
)]
struct Cli {
    /// Run code blocks against the dictionaries captured when they were read
    #[arg(long)]
    lexical: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Script to run instead of starting the interactive session
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = Config {
        scoping: if cli.lexical {
            Scoping::Lexical
        } else {
            Scoping::Dynamic
        },
    };
    let mut interp = Interpreter::with_config(config);
    info!(scoping = ?config.scoping, "interpreter ready");

    let result = match &cli.file {
        Some(path) => run_file(&mut interp, path),
        None => run_repl(&mut interp),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr. `RUST_LOG` applies unless `-v` is given.
fn setup_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_level(true);

    tracing_subscriber::registry()
        .with(formatter)
        .with(filter)
        .init();
}

/// `quit` in any letter case ends the session.
fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("quit")
}

fn run_line(interp: &mut Interpreter, line: &str) {
    interp.run_line(line);
    debug!(stack = %format_stack(interp), "operand stack");
}

/// Operand stack contents, bottom first, in `==` form
fn format_stack(interp: &Interpreter) -> String {
    interp
        .operands()
        .as_slice()
        .iter()
        .map(|value| value.literal().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn run_file(interp: &mut Interpreter, path: &Path) -> Result<(), Box<dyn Error>> {
    let source = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    for line in source.lines() {
        if is_quit(line) {
            break;
        }
        run_line(interp, line);
    }
    Ok(())
}

fn run_repl(interp: &mut Interpreter) -> Result<(), Box<dyn Error>> {
    let prompt = match interp.config().scoping {
        Scoping::Dynamic => "REPL> ",
        Scoping::Lexical => "lexical REPL> ",
    };
    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                if is_quit(&line) {
                    break;
                }
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match trimmed {
                    ":stack" => println!("{}", format_stack(interp)),
                    ":help" => print_help(),
                    _ => run_line(interp, &line),
                }
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn print_help() {
    println!("Enter tokens separated by whitespace, for example:");
    println!("  2 3 add =");
    println!("  /square {{ dup mul }} def 7 square =");
    println!("  1 1 3 {{ = }} for");
    println!("Commands:");
    println!("  :stack  - Show the operand stack, bottom first");
    println!("  :help   - Show this help message");
    println!("  quit    - Exit (Ctrl+D and Ctrl+C also exit)");
}
