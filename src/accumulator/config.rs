// config.rs - construction parameters loaded from JSON
use super::{Accumulator, AccumulatorError, DEFAULT_CAPACITY};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccumulatorConfig {
    /// Maximum number of items per batch
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl AccumulatorConfig {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Build an accumulator, validating the capacity
    pub fn build<T>(&self) -> Result<Accumulator<T>, AccumulatorError> {
        Accumulator::new(self.capacity)
    }
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
