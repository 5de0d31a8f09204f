//! Structured errors for the calculator session
//!
//! Recoverable errors never end a session. They are reported at the command
//! boundary and the loop moves on to the next line.

use crate::MatrixError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const NOT_A_NUMBER: &str = "NOT_A_NUMBER";
    pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";
    pub const INVALID_SIZE: &str = "INVALID_SIZE";
    pub const EXTRA_INPUT: &str = "EXTRA_INPUT";
    pub const MISSING_ARGUMENT: &str = "MISSING_ARGUMENT";
    pub const UNKNOWN_COMMAND: &str = "UNKNOWN_COMMAND";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const INVALID_CAPACITY: &str = "INVALID_CAPACITY";
    pub const NOT_UNARY: &str = "NOT_UNARY";
    pub const TOO_MANY_INPUTS: &str = "TOO_MANY_INPUTS";
    pub const TOO_COMPLEX: &str = "TOO_COMPLEX";
    pub const INVALID_TEXT: &str = "INVALID_TEXT";
    pub const CAPACITY: &str = "CAPACITY";
    pub const FILE_NOT_FOUND: &str = "FILE_NOT_FOUND";
    pub const READ_DEPTH: &str = "READ_DEPTH";
    pub const IO: &str = "IO";
}

/// Category of an error, which decides how the session reacts to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Malformed or out-of-range user input
    Input,
    /// The operation registry is full
    Capacity,
    /// A batch file could not be used
    Resource,
    /// The session cannot continue
    Fatal,
}

/// Context about where an error occurred
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Command line that caused the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Batch file the command came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Line number in the batch file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// Structured calculator error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    pub kind: ErrorKind,
}

impl CalcError {
    /// Create a new input error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
            kind: ErrorKind::Input,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set kind
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder: set the offending command line
    pub fn in_command(mut self, command: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.command = Some(command.into());
        self
    }

    /// Builder: set batch file position
    pub fn at_line(mut self, file: impl Into<String>, line: usize) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.file = Some(file.into());
        ctx.line = Some(line);
        self
    }

    /// Whether the session may carry on after reporting this error
    pub fn is_recoverable(&self) -> bool {
        self.kind != ErrorKind::Fatal
    }

    pub fn is_input(&self) -> bool {
        self.kind == ErrorKind::Input
    }

    // ========== Input Errors ==========

    pub fn not_a_number(token: &str) -> Self {
        Self::new(codes::NOT_A_NUMBER, format!("must enter numbers, not characters: '{}'", token))
    }

    pub fn out_of_range(index: i64, size: usize) -> Self {
        Self::new(codes::OUT_OF_RANGE,
            format!("operation #{} is out of range (catalogue has {} operations)", index, size))
            .with_suggestion(format!("Use an index between 0 and {}", size.saturating_sub(1)))
    }

    pub fn invalid_size(order: i64, max: usize) -> Self {
        Self::new(codes::INVALID_SIZE,
            format!("matrix size {} is invalid, it must be between 1 and {}", order, max))
    }

    pub fn extra_input(rest: &str) -> Self {
        Self::new(codes::EXTRA_INPUT, format!("too many arguments for this command: '{}'", rest))
    }

    pub fn missing_argument(command: &str, arg: &str) -> Self {
        Self::new(codes::MISSING_ARGUMENT, format!("{}: missing argument <{}>", command, arg))
            .with_suggestion("Use 'help' for the list of commands")
    }

    pub fn unknown_command(command: &str) -> Self {
        Self::new(codes::UNKNOWN_COMMAND, format!("command not found: '{}'", command))
            .with_suggestion("Use 'help' for the list of commands")
    }

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
    }

    pub fn invalid_capacity(capacity: i64, min: usize, max: usize) -> Self {
        Self::new(codes::INVALID_CAPACITY,
            format!("the number of operations must be between {} and {}, got {}", min, max, capacity))
    }

    pub fn not_unary(inputs: usize) -> Self {
        Self::new(codes::NOT_UNARY,
            format!("the outer operation of a composition must take one matrix, it takes {}", inputs))
    }

    pub fn too_many_inputs(inputs: usize, max: usize) -> Self {
        Self::new(codes::TOO_MANY_INPUTS,
            format!("the new operation would take {} matrices, the limit is {}", inputs, max))
    }

    pub fn too_complex(nodes: usize, max: usize) -> Self {
        Self::new(codes::TOO_COMPLEX,
            format!("the new operation would expand to {} terms, the limit is {}", nodes, max))
            .with_suggestion("Build it from smaller operations")
    }

    pub fn invalid_text() -> Self {
        Self::new(codes::INVALID_TEXT, "input line is not valid UTF-8 text")
    }

    // ========== Other Kinds ==========

    pub fn capacity_exceeded(capacity: usize) -> Self {
        Self::new(codes::CAPACITY,
            format!("cannot add more operations: maximum limit of {}", capacity))
            .with_suggestion("Delete an operation with 'del' or raise the limit with 'resize'")
            .with_kind(ErrorKind::Capacity)
    }

    pub fn file_not_found(path: &str, details: impl std::fmt::Display) -> Self {
        Self::new(codes::FILE_NOT_FOUND, format!("cannot open file '{}': {}", path, details))
            .with_kind(ErrorKind::Resource)
    }

    pub fn read_depth(max: usize) -> Self {
        Self::new(codes::READ_DEPTH, format!("batch files may only be nested {} levels deep", max))
            .with_kind(ErrorKind::Resource)
    }

    pub fn io(err: std::io::Error) -> Self {
        Self::new(codes::IO, format!("I/O error: {}", err))
            .with_kind(ErrorKind::Fatal)
    }
}

impl std::fmt::Display for CalcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for CalcError {}

impl From<MatrixError> for CalcError {
    fn from(err: MatrixError) -> Self {
        match err {
            MatrixError::InvalidOrder { order, max } => Self::invalid_size(order as i64, max),
            MatrixError::NotAnInteger(token) => Self::not_a_number(&token),
            other => Self::parse_error(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err)
    }
}
