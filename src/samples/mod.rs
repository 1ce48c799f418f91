//! Sample Registry Domain
//!
//! Per-sample metadata with load-time loop repair, and zero-copy views of the
//! sample PCM inside the loaded module buffer.

pub mod registry;
pub mod sample;

pub use registry::{SampleRegistry, SAMPLE_COUNT};
pub use sample::{Sample, SampleData, SampleHeader, MAX_VOLUME};
