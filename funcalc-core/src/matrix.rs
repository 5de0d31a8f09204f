//! Square integer matrices
//!
//! Orders are limited to `1..=MAX_ORDER`. Arithmetic assumes both operands
//! share the same order; mixing orders is a caller bug and panics.

use std::fmt;
use std::ops::{Add, Sub};
use thiserror::Error;

/// Largest supported matrix order
pub const MAX_ORDER: usize = 5;

/// Error type for matrix construction and parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("matrix order {order} is outside 1..={max}")]
    InvalidOrder { order: usize, max: usize },

    #[error("expected {expected} numbers, input ended after {got}")]
    UnexpectedEnd { expected: usize, got: usize },

    #[error("'{0}' is not an integer")]
    NotAnInteger(String),

    #[error("index ({row}, {col}) out of bounds for a {order}x{order} matrix")]
    OutOfBounds { row: usize, col: usize, order: usize },

    #[error("rows do not form a square matrix")]
    NotSquare,
}

/// An `n`x`n` matrix of `i64`, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareMatrix {
    order: usize,
    data: Vec<i64>,
}

impl SquareMatrix {
    /// Zero-filled matrix of the given order
    pub fn new(order: usize) -> Result<Self, MatrixError> {
        check_order(order)?;
        Ok(Self { order, data: vec![0; order * order] })
    }

    /// Build from nested rows
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, MatrixError> {
        let order = rows.len();
        check_order(order)?;
        if rows.iter().any(|row| row.len() != order) {
            return Err(MatrixError::NotSquare);
        }
        Ok(Self { order, data: rows.into_iter().flatten().collect() })
    }

    /// Read `order * order` integers in row-major order
    pub fn from_tokens<I, S>(order: usize, tokens: I) -> Result<Self, MatrixError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        check_order(order)?;
        let expected = order * order;
        let mut data = Vec::with_capacity(expected);
        for token in tokens.into_iter().take(expected) {
            let token = token.as_ref();
            let value = token.parse::<i64>()
                .map_err(|_| MatrixError::NotAnInteger(token.to_string()))?;
            data.push(value);
        }
        if data.len() < expected {
            return Err(MatrixError::UnexpectedEnd { expected, got: data.len() });
        }
        Ok(Self { order, data })
    }

    /// Identity matrix of the given order
    pub fn identity(order: usize) -> Result<Self, MatrixError> {
        let mut m = Self::new(order)?;
        for i in 0..order {
            m.data[i * order + i] = 1;
        }
        Ok(m)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Get element at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.order && col < self.order {
            Some(self.data[row * self.order + col])
        } else {
            None
        }
    }

    /// Set element at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: i64) -> Result<(), MatrixError> {
        if row >= self.order || col >= self.order {
            return Err(MatrixError::OutOfBounds { row, col, order: self.order });
        }
        self.data[row * self.order + col] = value;
        Ok(())
    }

    /// Iterate over rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[i64]> {
        self.data.chunks(self.order)
    }

    pub fn transpose(&self) -> Self {
        let n = self.order;
        let mut data = vec![0; n * n];
        for i in 0..n {
            for j in 0..n {
                data[j * n + i] = self.data[i * n + j];
            }
        }
        Self { order: n, data }
    }

    pub fn scale(&self, k: i64) -> Self {
        Self {
            order: self.order,
            data: self.data.iter().map(|x| x.wrapping_mul(k)).collect(),
        }
    }

    /// Element-wise sum
    ///
    /// # Panics
    ///
    /// If the orders differ.
    pub fn add(&self, other: &Self) -> Self {
        self.zip_with(other, i64::wrapping_add)
    }

    /// Element-wise difference
    ///
    /// # Panics
    ///
    /// If the orders differ.
    pub fn sub(&self, other: &Self) -> Self {
        self.zip_with(other, i64::wrapping_sub)
    }

    /// # Panics
    ///
    /// If `self` and `other` have different orders.
    fn zip_with(&self, other: &Self, f: impl Fn(i64, i64) -> i64) -> Self {
        assert_eq!(self.order, other.order, "cannot combine matrices of different orders");
        Self {
            order: self.order,
            data: self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect(),
        }
    }

    /// Single-line form used inside rendered expressions: `[[1, 2], [3, 4]]`
    pub fn to_inline_string(&self) -> String {
        let rows: Vec<String> = self.rows()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(|x| x.to_string()).collect();
                format!("[{}]", cells.join(", "))
            })
            .collect();
        format!("[{}]", rows.join(", "))
    }
}

fn check_order(order: usize) -> Result<(), MatrixError> {
    if order == 0 || order > MAX_ORDER {
        return Err(MatrixError::InvalidOrder { order, max: MAX_ORDER });
    }
    Ok(())
}

impl Add for &SquareMatrix {
    type Output = SquareMatrix;

    fn add(self, rhs: Self) -> SquareMatrix {
        SquareMatrix::add(self, rhs)
    }
}

impl Sub for &SquareMatrix {
    type Output = SquareMatrix;

    fn sub(self, rhs: Self) -> SquareMatrix {
        SquareMatrix::sub(self, rhs)
    }
}

impl fmt::Display for SquareMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let cells: Vec<String> = row.iter().map(|x| x.to_string()).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}
