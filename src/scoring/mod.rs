//! Confidence scoring and progress aggregation.
//!
//! Both functions are deterministic, total, and side-effect-free: they
//! can be invoked concurrently from any number of callers without
//! coordination.

mod confidence;
mod progress;

pub use confidence::confidence;
pub use progress::{progress, progress_at};
