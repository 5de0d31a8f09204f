//! Operation Registry

use crate::{OpRef, Operation};
use funcalc_core::CalcError;
use std::rc::Rc;
use tracing::info;

/// Smallest capacity an operator may configure
pub const MIN_CAPACITY: usize = 2;

/// Largest capacity an operator may configure
pub const MAX_CAPACITY: usize = 100;

/// What a call to [`OperationRegistry::resize`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Capacity changed, no entries were removed
    Resized,
    /// Capacity changed and this many trailing entries were dropped
    Truncated(usize),
    /// Truncation was refused; nothing changed
    Declined,
}

/// Ordered, index-addressed catalogue of operations
#[derive(Debug)]
pub struct OperationRegistry {
    operations: Vec<OpRef>,
    capacity: usize,
}

impl OperationRegistry {
    /// Create a registry seeded with `Identity` and `Transpose`
    pub fn new(capacity: usize) -> Result<Self, CalcError> {
        Self::validate_capacity(capacity as i64)?;
        Ok(Self {
            operations: vec![Rc::new(Operation::Identity), Rc::new(Operation::Transpose)],
            capacity,
        })
    }

    pub fn size(&self) -> usize {
        self.operations.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.operations.len() >= self.capacity
    }

    /// Append an operation, returning its index
    pub fn append(&mut self, op: Operation) -> Result<usize, CalcError> {
        if self.is_full() {
            return Err(CalcError::capacity_exceeded(self.capacity));
        }
        let index = self.operations.len();
        info!(index, op = op.name(), "operation added");
        self.operations.push(Rc::new(op));
        Ok(index)
    }

    pub fn get(&self, index: usize) -> Result<&OpRef, CalcError> {
        self.operations.get(index)
            .ok_or_else(|| CalcError::out_of_range(index as i64, self.size()))
    }

    /// Validate a user-supplied index
    pub fn resolve(&self, raw: i64) -> Result<usize, CalcError> {
        match usize::try_from(raw) {
            Ok(index) if index < self.size() => Ok(index),
            _ => Err(CalcError::out_of_range(raw, self.size())),
        }
    }

    /// Remove the entry at `index`; later entries shift down by one.
    ///
    /// Composites that captured the removed handle keep it alive.
    pub fn remove(&mut self, index: usize) -> Result<OpRef, CalcError> {
        if index >= self.size() {
            return Err(CalcError::out_of_range(index as i64, self.size()));
        }
        let removed = self.operations.remove(index);
        info!(index, op = removed.name(), "operation deleted");
        Ok(removed)
    }

    /// Change the capacity. Shrinking below the current size drops the most
    /// recently appended entries, but only if `confirm` agrees; it receives the
    /// number of entries that would be lost.
    pub fn resize(
        &mut self,
        new_capacity: i64,
        confirm: impl FnOnce(usize) -> bool,
    ) -> Result<ResizeOutcome, CalcError> {
        let new_capacity = Self::validate_capacity(new_capacity)?;
        let size = self.size();
        if new_capacity >= size {
            self.capacity = new_capacity;
            info!(capacity = new_capacity, "capacity changed");
            return Ok(ResizeOutcome::Resized);
        }

        let excess = size - new_capacity;
        if !confirm(excess) {
            return Ok(ResizeOutcome::Declined);
        }
        self.operations.truncate(new_capacity);
        self.capacity = new_capacity;
        info!(capacity = new_capacity, dropped = excess, "capacity changed, catalogue truncated");
        Ok(ResizeOutcome::Truncated(excess))
    }

    /// Check an operator-supplied capacity against `MIN_CAPACITY..=MAX_CAPACITY`
    pub fn validate_capacity(capacity: i64) -> Result<usize, CalcError> {
        match usize::try_from(capacity) {
            Ok(c) if (MIN_CAPACITY..=MAX_CAPACITY).contains(&c) => Ok(c),
            _ => Err(CalcError::invalid_capacity(capacity, MIN_CAPACITY, MAX_CAPACITY)),
        }
    }

    /// Entries with their current indices
    pub fn iter(&self) -> impl Iterator<Item = (usize, &OpRef)> {
        self.operations.iter().enumerate()
    }
}
