//! Operation evaluator
//!
//! Prompts for the inputs an operation needs, computes it and echoes the
//! expanded expression with its result.

use crate::input::MatrixSource;
use funcalc_core::{CalcError, SquareMatrix, MAX_ORDER};
use funcalc_ops::OperationRegistry;
use std::io::Write;
use tracing::debug;

/// Stateless evaluator; never mutates the registry
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate operation `index` on freshly read matrices of one `order`
    pub fn evaluate(
        &self,
        registry: &OperationRegistry,
        index: usize,
        order: usize,
        source: &mut dyn MatrixSource,
        out: &mut dyn Write,
    ) -> Result<SquareMatrix, CalcError> {
        if order == 0 || order > MAX_ORDER {
            return Err(CalcError::invalid_size(order as i64, MAX_ORDER));
        }
        let op = registry.get(index)?;
        let count = op.input_count();

        if count > 1 {
            writeln!(out, "\nPlease enter {} matrices:", count)?;
        }
        let mut inputs = Vec::with_capacity(count);
        for _ in 0..count {
            writeln!(out, "\nEnter a {0}x{0} matrix:", order)?;
            out.flush()?;
            inputs.push(source.read_matrix(order)?);
        }

        let result = op.compute(&inputs);
        debug!(index, op = op.name(), order, inputs = count, "evaluated");
        write!(out, "\n{} = \n{}", op.render(&inputs), result)?;
        Ok(result)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TokenReader;
    use funcalc_core::codes;
    use funcalc_ops::Operation;
    use std::io::Cursor;

    fn eval(registry: &OperationRegistry, index: usize, order: usize, input: &str) -> (Result<SquareMatrix, CalcError>, String) {
        let mut cursor = Cursor::new(input.to_string());
        let mut source = TokenReader::new(&mut cursor);
        let mut out = Vec::new();
        let result = Evaluator::new().evaluate(registry, index, order, &mut source, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_scalar_eval() {
        let mut reg = OperationRegistry::new(10).unwrap();
        reg.append(Operation::Scalar(3)).unwrap();
        let (result, out) = eval(&reg, 2, 2, "1 2\n3 4\n");
        assert_eq!(result.unwrap(), SquareMatrix::from_rows(vec![vec![3, 6], vec![9, 12]]).unwrap());
        assert!(out.contains("Enter a 2x2 matrix:"));
        assert!(!out.contains("Please enter"));
        assert!(out.ends_with("([[1, 2], [3, 4]] * 3) = \n3 6\n9 12\n"));
    }

    #[test]
    fn test_binary_eval_prompts_each_matrix() {
        let mut reg = OperationRegistry::new(10).unwrap();
        let sum = Operation::add(reg.get(0).unwrap().clone(), reg.get(1).unwrap().clone()).unwrap();
        reg.append(sum).unwrap();
        let (result, out) = eval(&reg, 2, 2, "1 2 3 4\n0 1 0 0\n");
        assert_eq!(result.unwrap(), SquareMatrix::from_rows(vec![vec![1, 2], vec![4, 4]]).unwrap());
        assert!(out.contains("Please enter 2 matrices:"));
        assert_eq!(out.matches("Enter a 2x2 matrix:").count(), 2);
        assert!(out.contains("([[1, 2], [3, 4]] + Transpose([[0, 1], [0, 0]])) = \n"));
    }

    #[test]
    fn test_order_too_large() {
        let reg = OperationRegistry::new(10).unwrap();
        let (result, out) = eval(&reg, 0, 6, "");
        assert_eq!(result.unwrap_err().code, codes::INVALID_SIZE);
        assert!(out.is_empty());
        assert_eq!(reg.size(), 2);
    }

    #[test]
    fn test_order_zero() {
        let reg = OperationRegistry::new(10).unwrap();
        let (result, _) = eval(&reg, 0, 0, "");
        assert_eq!(result.unwrap_err().code, codes::INVALID_SIZE);
    }

    #[test]
    fn test_index_out_of_range() {
        let reg = OperationRegistry::new(10).unwrap();
        let (result, _) = eval(&reg, 7, 2, "1 2 3 4");
        assert_eq!(result.unwrap_err().code, codes::OUT_OF_RANGE);
    }

    #[test]
    fn test_incomplete_matrix() {
        let reg = OperationRegistry::new(10).unwrap();
        let (result, _) = eval(&reg, 1, 3, "1 2 3\n4 5 6\n");
        assert!(result.unwrap_err().is_input());
    }
}
