//! funcalc - Matrix Function Calculator
//!
//! Builds a catalogue of matrix operations from typed commands and evaluates
//! them on matrices entered at the console or read from batch files.

mod command;
mod config;
mod eval;
mod input;
mod render;
mod session;

pub use command::{Command, CommandMeta, COMMANDS};
pub use config::{Config, DEFAULT_MAX_READ_DEPTH};
pub use eval::Evaluator;
pub use input::{MatrixSource, TokenReader};
pub use render::{Renderer, PROMPT};
pub use session::{banner, prompt_capacity, Console, Mode, SessionEnd};

use funcalc_core::CalcError;
use funcalc_ops::{OpRef, Operation, OperationRegistry, ResizeOutcome};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use tracing::{debug, info, warn};

/// Main calculator engine
pub struct Calculator {
    registry: OperationRegistry,
    config: Config,
    evaluator: Evaluator,
    renderer: Renderer,
    running: bool,
}

impl Calculator {
    pub fn new(capacity: usize, config: Config) -> Result<Self, CalcError> {
        Ok(Self {
            registry: OperationRegistry::new(capacity)?,
            config,
            evaluator: Evaluator::new(),
            renderer: Renderer::new(),
            running: true,
        })
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Process command lines until the source ends, `exit` runs, or the
    /// operator abandons a batch file. Only fatal errors are returned.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        mut mode: Mode<'_>,
    ) -> Result<SessionEnd, CalcError> {
        let mut line_no = 0;
        loop {
            if !self.running {
                return Ok(SessionEnd::Exit);
            }
            if mode.is_interactive() && self.config.show_catalogue {
                write!(console.output, "{}", self.renderer.catalogue(&self.registry))?;
                console.output.flush()?;
            }

            let mut bytes = Vec::new();
            if mode.source(&mut console.input).read_until(b'\n', &mut bytes)? == 0 {
                return Ok(SessionEnd::EndOfInput);
            }
            line_no += 1;

            let (line, result) = match String::from_utf8(bytes) {
                Ok(line) => {
                    let result = match Command::parse(&line) {
                        Ok(Some(command)) => self.execute(command, console, &mut mode),
                        Ok(None) => Ok(()),
                        Err(err) => Err(err),
                    };
                    (line, result)
                }
                Err(err) => {
                    let line = String::from_utf8_lossy(err.as_bytes()).into_owned();
                    (line, Err(CalcError::invalid_text()))
                }
            };
            let Err(err) = result else {
                continue;
            };
            if !err.is_recoverable() {
                return Err(err);
            }

            let err = match &mode {
                Mode::Batch { path, .. } => err.at_line(*path, line_no),
                Mode::Interactive => err,
            }
            .in_command(line.trim());
            warn!(code = %err.code, line = line_no, "{}", err.message);
            writeln!(console.output, "Error: {}", err.message)?;
            if let Some(suggestion) = &err.suggestion {
                writeln!(console.output, "Hint: {}", suggestion)?;
            }

            if err.is_input() && !mode.is_interactive() {
                writeln!(console.output, "This line is invalid: {}", line.trim())?;
                if !console.confirm("Do you want to continue?")? {
                    return Ok(SessionEnd::Aborted);
                }
            }
        }
    }

    /// Run one command
    pub fn execute<R: BufRead, W: Write>(
        &mut self,
        command: Command,
        console: &mut Console<R, W>,
        mode: &mut Mode<'_>,
    ) -> Result<(), CalcError> {
        debug!(command = command.meta().name, ?command, "dispatch");
        match command {
            Command::Eval { index, order } => {
                let index = self.registry.resolve(index)?;
                let mut source = TokenReader::new(mode.source(&mut console.input));
                self.evaluator.evaluate(&self.registry, index, order, &mut source, &mut console.output)?;
            }
            Command::Scal(k) => {
                self.registry.append(Operation::Scalar(k))?;
            }
            Command::Add(a, b) => {
                let (a, b) = self.operands(a, b)?;
                self.registry.append(Operation::add(a, b)?)?;
            }
            Command::Sub(a, b) => {
                let (a, b) = self.operands(a, b)?;
                self.registry.append(Operation::sub(a, b)?)?;
            }
            Command::Comp(f, g) => {
                let (f, g) = self.operands(f, g)?;
                self.registry.append(Operation::comp(f, g)?)?;
            }
            Command::Iden => {
                self.registry.append(Operation::Identity)?;
            }
            Command::Tran => {
                self.registry.append(Operation::Transpose)?;
            }
            Command::Del(index) => {
                let index = self.registry.resolve(index)?;
                self.registry.remove(index)?;
            }
            Command::Resize(capacity) => self.resize(capacity, console)?,
            Command::Read(path) => self.read_file(&path, console, mode.depth())?,
            Command::Help => {
                write!(console.output, "{}", self.renderer.help())?;
            }
            Command::Exit => {
                writeln!(console.output, "Goodbye!")?;
                self.running = false;
            }
        }
        Ok(())
    }

    fn operands(&self, first: i64, second: i64) -> Result<(OpRef, OpRef), CalcError> {
        let first = self.registry.get(self.registry.resolve(first)?)?.clone();
        let second = self.registry.get(self.registry.resolve(second)?)?.clone();
        Ok((first, second))
    }

    fn resize<R: BufRead, W: Write>(
        &mut self,
        capacity: i64,
        console: &mut Console<R, W>,
    ) -> Result<(), CalcError> {
        let mut answer = Ok(true);
        let outcome = self.registry.resize(capacity, |excess| {
            answer = console.confirm(&format!(
                "Shrinking to {} deletes the last {} operations. Continue?",
                capacity, excess
            ));
            matches!(answer, Ok(true))
        })?;
        answer?;

        match outcome {
            ResizeOutcome::Resized => {
                writeln!(console.output, "Maximum number of operations set to {}", capacity)?;
            }
            ResizeOutcome::Truncated(n) => {
                writeln!(console.output, "Maximum number of operations set to {}, {} deleted", capacity, n)?;
            }
            ResizeOutcome::Declined => {
                writeln!(console.output, "Resize cancelled")?;
            }
        }
        Ok(())
    }

    fn read_file<R: BufRead, W: Write>(
        &mut self,
        path: &str,
        console: &mut Console<R, W>,
        depth: usize,
    ) -> Result<(), CalcError> {
        if depth >= self.config.max_read_depth {
            return Err(CalcError::read_depth(self.config.max_read_depth));
        }
        let file = File::open(path).map_err(|e| CalcError::file_not_found(path, e))?;
        let mut reader = BufReader::new(file);

        info!(path, depth = depth + 1, "reading batch file");
        let mode = Mode::Batch { path, reader: &mut reader, depth: depth + 1 };
        match self.run(console, mode)? {
            SessionEnd::EndOfInput => writeln!(console.output, "Finished reading {}", path)?,
            SessionEnd::Aborted => writeln!(console.output, "Stopped reading {}", path)?,
            SessionEnd::Exit => {}
        }
        Ok(())
    }
}
