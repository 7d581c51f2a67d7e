mod config;
mod error;


pub use config::AccumulatorConfig;
pub use error::AccumulatorError;

use std::num::NonZeroUsize;
use tracing::{debug, trace};

/// Capacity used when no explicit value is configured
pub const DEFAULT_CAPACITY: usize = 100;

/// Groups items into fixed-size batches in insertion order.
///
/// Every batch except the last holds exactly `capacity` items; the last one
/// holds between 1 and `capacity`. Held batches are never lent out: the only
/// way to reach them is [`Accumulator::extract`], which hands over ownership
/// and leaves a fresh empty sequence behind.
///
/// Not synchronized. Concurrent producers need an external lock or a
/// single-writer channel in front of it.
#[derive(Debug)]
pub struct Accumulator<T> {
    capacity: NonZeroUsize,
    batches: Vec<Vec<T>>,
}

impl<T> Accumulator<T> {
    /// Create an accumulator, rejecting a zero capacity
    pub fn new(capacity: usize) -> Result<Self, AccumulatorError> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            AccumulatorError::InvalidArgument(format!(
                "capacity must be a natural number (>= 1), got {}",
                capacity
            ))
        })?;

        Ok(Self::with_capacity(capacity))
    }

    /// Create an accumulator from an already validated capacity
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        debug!(capacity = capacity.get(), "accumulator created");
        Self {
            capacity,
            batches: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Append an item, starting a new batch when the last one is full
    pub fn add(&mut self, item: T) {
        match self.batches.last_mut() {
            Some(last) if last.len() < self.capacity.get() => last.push(item),
            _ => {
                trace!(batch = self.batches.len(), "starting new batch");
                self.batches.push(vec![item]);
            }
        }
    }

    /// Take every held batch and reset to empty.
    ///
    /// Moves the internal vector out; item contents are never copied.
    pub fn extract(&mut self) -> Vec<Vec<T>> {
        let batches = std::mem::take(&mut self.batches);
        debug!(
            batches = batches.len(),
            items = count_items(&batches, self.capacity.get()),
            "batches extracted"
        );
        batches
    }

    pub fn batches_count(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Total items held, derived from the batch count and the last batch
    pub fn accumulated_items_count(&self) -> usize {
        count_items(&self.batches, self.capacity.get())
    }
}

impl<T> Extend<T> for Accumulator<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

// Relies on every batch but the last being full.
fn count_items<T>(batches: &[Vec<T>], capacity: usize) -> usize {
    match batches.last() {
        Some(last) => (batches.len() - 1) * capacity + last.len(),
        None => 0,
    }
}
