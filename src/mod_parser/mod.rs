//! MOD Format Parsing
//!
//! Zero-copy parser for 4-channel, 31-sample ProTracker modules:
//! - Fixed header (song name, sample headers, position table, signature)
//! - Pattern table (`max(positions) + 1` patterns of 1024 bytes)
//! - Sample PCM, back to back in sample order

pub mod header;
pub mod module;
pub mod note;

pub use header::{ModHeader, HEADER_SIZE, POSITION_COUNT, SUPPORTED_SIGNATURES};
pub use module::{Module, ModuleSummary, Pattern, Row, CHANNELS, PATTERN_SIZE, ROWS_PER_PATTERN};
pub use note::{note_name, Note};
