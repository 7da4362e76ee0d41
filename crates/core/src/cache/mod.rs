//! Derived-value cache and invalidation machinery.

mod compute_cache;
mod generation;

// Re-export the public interface
pub use compute_cache::ComputeCache;
pub use generation::{GenerationClock, GenerationStamp};
