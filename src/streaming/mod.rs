//! Double-Buffered Sample Streaming
//!
//! Each voice owns two fixed-size buffers in tile memory. The hardware plays
//! one while the player copies the next chunk of the sample into the other;
//! the "buffer consumed" interrupt drives the refill.

pub mod double_buffer;
pub mod engine;

pub use double_buffer::{BufferRole, DoubleBuffer};
pub use engine::{LoadedChunk, StreamStatus, VoiceStream, FIRST_SAMPLE_WORD};
