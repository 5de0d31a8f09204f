//! funcalc Operation Model
//!
//! Provides the operations that can be catalogued and evaluated:
//! - Primitives (identity, transpose, scalar multiply)
//! - Composites (addition, subtraction, composition) over shared operands
//! - The capacity-bounded registry that addresses them by index

mod operation;
mod registry;

pub use operation::{Operation, OpRef, MAX_INPUTS, MAX_NODES};
pub use registry::{OperationRegistry, ResizeOutcome, MIN_CAPACITY, MAX_CAPACITY};

/// Re-export core types for callers
pub mod prelude {
    pub use crate::{Operation, OpRef, OperationRegistry, ResizeOutcome};
    pub use funcalc_core::prelude::*;
}
