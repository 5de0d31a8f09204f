//! funcalc Core - Fundamental types
//!
//! This crate provides the core types used throughout funcalc:
//! - `SquareMatrix`: Small square integer matrices (order 1 to 5)
//! - `CalcError`: Structured errors, classified by `ErrorKind`

mod matrix;
mod error;

pub use matrix::{SquareMatrix, MatrixError, MAX_ORDER};
pub use error::{CalcError, ErrorContext, ErrorKind, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{SquareMatrix, CalcError, ErrorKind, MAX_ORDER};
    pub use crate::error::codes;
}
