//! funcalc command line
//!
//! Starts an interactive calculator session on stdin/stdout. Logs go to
//! stderr so they never interleave with matrix output.

use clap::Parser;
use funcalc::{banner, prompt_capacity, Calculator, Command, Config, Console, Mode};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "funcalc")]
#[command(about = "Matrix function calculator", long_about = None)]
struct Cli {
    /// Maximum number of operations in the catalogue (2-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(2..=100))]
    capacity: Option<u8>,

    /// Batch file to run before the interactive session starts
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Do not list the catalogue before each prompt
    #[arg(short, long)]
    quiet: bool,

    /// Log filter, e.g. `debug` or `funcalc=trace` (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let mut config = Config::from_env();
    if let Some(capacity) = cli.capacity {
        config = config.with_capacity(usize::from(capacity));
    }
    if cli.quiet {
        config = config.with_catalogue(false);
    }

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    let capacity = match config.capacity {
        Some(capacity) => capacity,
        None => prompt_capacity(&mut console)?,
    };
    write!(console.output, "{}", banner(capacity))?;
    info!(capacity, catalogue = config.show_catalogue, "session started");

    let mut calc = Calculator::new(capacity, config)?;
    if let Some(path) = cli.file {
        let command = Command::Read(path.to_string_lossy().into_owned());
        if let Err(err) = calc.execute(command, &mut console, &mut Mode::Interactive) {
            if !err.is_recoverable() {
                return Err(err.into());
            }
            writeln!(console.output, "Error: {}", err.message)?;
        }
    }

    if calc.is_running() {
        let end = calc.run(&mut console, Mode::Interactive)?;
        info!(?end, "session ended");
    }
    console.output.flush()?;
    Ok(())
}
