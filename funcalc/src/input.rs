//! Matrix input

use funcalc_core::{CalcError, SquareMatrix};
use std::io::BufRead;
use tracing::debug;

/// Supplies input matrices on demand
pub trait MatrixSource {
    fn read_matrix(&mut self, order: usize) -> Result<SquareMatrix, CalcError>;
}

/// Reads whitespace separated integers from a line-oriented reader.
///
/// A matrix may span any number of lines. Tokens left over on the line that
/// completes a matrix are discarded.
pub struct TokenReader<'a> {
    reader: &'a mut dyn BufRead,
}

impl<'a> TokenReader<'a> {
    pub fn new(reader: &'a mut dyn BufRead) -> Self {
        Self { reader }
    }
}

impl MatrixSource for TokenReader<'_> {
    fn read_matrix(&mut self, order: usize) -> Result<SquareMatrix, CalcError> {
        let expected = order * order;
        let mut tokens: Vec<String> = Vec::with_capacity(expected);
        let mut bytes = Vec::new();

        while tokens.len() < expected {
            bytes.clear();
            if self.reader.read_until(b'\n', &mut bytes)? == 0 {
                break;
            }
            let line = std::str::from_utf8(&bytes).map_err(|_| CalcError::invalid_text())?;
            tokens.extend(line.split_whitespace().map(str::to_owned));
        }

        if tokens.len() > expected {
            debug!(discarded = tokens.len() - expected, "ignoring tokens after matrix");
        }
        Ok(SquareMatrix::from_tokens(order, &tokens)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funcalc_core::codes;
    use std::io::{BufRead, Cursor};

    #[test]
    fn test_reads_across_lines() {
        let mut input = Cursor::new("1 2\n3\n4\n");
        let mut reader = TokenReader::new(&mut input);
        let m = reader.read_matrix(2).unwrap();
        assert_eq!(m, SquareMatrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap());
    }

    #[test]
    fn test_consecutive_matrices() {
        let mut input = Cursor::new("1 0 0 1\n\n2 2\n2 2\n");
        let mut reader = TokenReader::new(&mut input);
        let a = reader.read_matrix(2).unwrap();
        let b = reader.read_matrix(2).unwrap();
        assert_eq!(a, SquareMatrix::identity(2).unwrap());
        assert_eq!(b.get(1, 1), Some(2));
    }

    #[test]
    fn test_discards_rest_of_line() {
        let mut input = Cursor::new("5 6 7\nnext line\n");
        {
            let mut reader = TokenReader::new(&mut input);
            assert_eq!(reader.read_matrix(1).unwrap().get(0, 0), Some(5));
        }
        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "next line\n");
    }

    #[test]
    fn test_end_of_input() {
        let mut input = Cursor::new("1 2 3");
        let mut reader = TokenReader::new(&mut input);
        let err = reader.read_matrix(2).unwrap_err();
        assert_eq!(err.code, codes::PARSE_ERROR);
        assert!(err.is_input());
    }

    #[test]
    fn test_invalid_utf8_is_input_error() {
        let mut input = Cursor::new(b"1 \xff\n3 4\n".to_vec());
        let mut reader = TokenReader::new(&mut input);
        let err = reader.read_matrix(2).unwrap_err();
        assert_eq!(err.code, codes::INVALID_TEXT);
        assert!(err.is_input());
    }

    #[test]
    fn test_not_an_integer() {
        let mut input = Cursor::new("1 two\n3 4\n");
        let mut reader = TokenReader::new(&mut input);
        assert_eq!(reader.read_matrix(2).unwrap_err().code, codes::NOT_A_NUMBER);
    }
}
