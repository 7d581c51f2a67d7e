// Public API exports
pub mod accumulator;

// Re-export main types for convenience
pub use accumulator::{Accumulator, AccumulatorConfig, AccumulatorError, DEFAULT_CAPACITY};
