//! Console and session mode

use funcalc_core::{CalcError, MAX_ORDER};
use funcalc_ops::{OperationRegistry, MAX_CAPACITY, MIN_CAPACITY};
use std::io::{self, BufRead, Write};

/// The operator's terminal: where confirmations are read and all output goes
pub struct Console<R, W> {
    pub input: R,
    pub output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Next line of operator input, or `None` at end of input.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; callers re-ask on an
    /// unrecognized answer anyway.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Ask a yes/no question until answered. End of input counts as "no".
    pub fn confirm(&mut self, question: &str) -> Result<bool, CalcError> {
        loop {
            write!(self.output, "{} (y/n): ", question)?;
            self.output.flush()?;
            let Some(answer) = self.read_line()? else {
                return Ok(false);
            };
            match answer.trim() {
                "y" | "Y" | "yes" => return Ok(true),
                "n" | "N" | "no" => return Ok(false),
                _ => continue,
            }
        }
    }
}

/// Where commands come from
pub enum Mode<'a> {
    /// Commands and matrices are typed on the console
    Interactive,
    /// Commands and matrices come from a file; the console is still used for
    /// confirmations
    Batch {
        path: &'a str,
        reader: &'a mut dyn BufRead,
        depth: usize,
    },
}

impl Mode<'_> {
    pub fn is_interactive(&self) -> bool {
        matches!(self, Mode::Interactive)
    }

    /// Nesting level of batch files; 0 when interactive
    pub fn depth(&self) -> usize {
        match self {
            Mode::Interactive => 0,
            Mode::Batch { depth, .. } => *depth,
        }
    }

    /// The reader commands and matrices are taken from
    pub(crate) fn source<'r>(&'r mut self, console: &'r mut dyn BufRead) -> &'r mut dyn BufRead {
        match self {
            Mode::Interactive => console,
            Mode::Batch { reader, .. } => &mut **reader,
        }
    }
}

/// Why a call to `Calculator::run` returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The source ran out of lines
    EndOfInput,
    /// `exit` was executed
    Exit,
    /// The operator chose not to continue a batch file after an error
    Aborted,
}

/// Ask the operator for the registry capacity until a valid one is entered
pub fn prompt_capacity<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<usize, CalcError> {
    loop {
        write!(
            console.output,
            "Enter the maximum number of operations (between {} and {}): ",
            MIN_CAPACITY, MAX_CAPACITY
        )?;
        console.output.flush()?;

        let Some(line) = console.read_line()? else {
            return Err(CalcError::io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before the number of operations was set",
            )));
        };
        let line = line.trim();
        let parsed = line.parse::<i64>()
            .map_err(|_| CalcError::not_a_number(line))
            .and_then(OperationRegistry::validate_capacity);
        match parsed {
            Ok(capacity) => return Ok(capacity),
            Err(err) => writeln!(console.output, "Error: {}", err.message)?,
        }
    }
}

/// One-line summary of the size limits, shown at startup
pub fn banner(capacity: usize) -> String {
    format!(
        "Matrix function calculator: up to {} operations on matrices up to {}x{}\n",
        capacity, MAX_ORDER, MAX_ORDER
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use funcalc_core::ErrorKind;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<String>, Vec<u8>> {
        Console::new(Cursor::new(input.to_string()), Vec::new())
    }

    fn output(console: &Console<Cursor<String>, Vec<u8>>) -> String {
        String::from_utf8(console.output.clone()).unwrap()
    }

    #[test]
    fn test_confirm_answers() {
        assert!(console("y\n").confirm("Go?").unwrap());
        assert!(!console("n\n").confirm("Go?").unwrap());
        assert!(!console("").confirm("Go?").unwrap());
    }

    #[test]
    fn test_confirm_reasks() {
        let mut c = console("maybe\nyes\n");
        assert!(c.confirm("Go?").unwrap());
        assert_eq!(output(&c).matches("Go? (y/n): ").count(), 2);
    }

    #[test]
    fn test_prompt_capacity_retries() {
        let mut c = console("abc\n1\n101\n12\n");
        assert_eq!(prompt_capacity(&mut c).unwrap(), 12);
        let out = output(&c);
        assert_eq!(out.matches("Error:").count(), 3);
        assert!(out.contains("between 2 and 100"));
    }

    #[test]
    fn test_confirm_reasks_on_invalid_utf8() {
        let mut c = Console::new(Cursor::new(b"\xff\ny\n".to_vec()), Vec::new());
        assert!(c.confirm("Go?").unwrap());
        let out = String::from_utf8(c.output).unwrap();
        assert_eq!(out.matches("Go? (y/n): ").count(), 2);
    }

    #[test]
    fn test_prompt_capacity_eof() {
        let mut c = console("0\n");
        let err = prompt_capacity(&mut c).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Fatal);
    }

    #[test]
    fn test_mode_source() {
        let mut file = Cursor::new("from file\n");
        let mut typed = Cursor::new("typed\n");
        let mut line = String::new();

        let mut mode = Mode::Batch { path: "f", reader: &mut file, depth: 1 };
        mode.source(&mut typed).read_line(&mut line).unwrap();
        assert_eq!(line, "from file\n");
        assert_eq!(mode.depth(), 1);

        line.clear();
        let mut mode = Mode::Interactive;
        mode.source(&mut typed).read_line(&mut line).unwrap();
        assert_eq!(line, "typed\n");
        assert!(mode.is_interactive());
    }

    #[test]
    fn test_banner() {
        assert!(banner(10).contains("up to 10 operations"));
    }
}
