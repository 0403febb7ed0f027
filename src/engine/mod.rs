//! Processing engine
//!
//! Applies chains to whole in-memory buffers and writes the results.

mod orchestrator;

pub use orchestrator::{normalize_peak, process, timestamped_filename, Orchestrator};
