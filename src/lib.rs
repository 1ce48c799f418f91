//! ProTracker MOD replayer for Xosera
//!
//! A real-time module ("tracker") playback engine that sequences 4-channel
//! ProTracker songs and streams their samples into the four DMA audio voices
//! of the Xosera video/audio chip. The engine is driven entirely by two
//! external events: a fixed-rate tick (pattern sequencing and effects) and a
//! per-voice "buffer consumed" event (sample streaming).
//!
//! # Features
//! - Zero-copy MOD parsing (`M.K.`, `M!K!`, `4CHN`, `FLT4`)
//! - Sample loop repair at load time
//! - Immediate and temporal (multi-tick) effects
//! - Double-buffered sample streaming with loop support
//! - Allocation-free tick and service paths
//!
//! # Quick start
//! ```no_run
//! use ptmod::replayer::Player;
//! use ptmod::xosera::{ChannelMask, MemoryBus};
//! use ptmod::{load_file, ManualEvents, Module, PlayerConfig};
//!
//! let data = load_file("song.mod").unwrap();
//! let module = Module::parse(&data).unwrap();
//! let mut player = Player::play(
//!     &module,
//!     MemoryBus::new(),
//!     ManualEvents::default(),
//!     PlayerConfig::pal(),
//! )
//! .unwrap();
//!
//! // From the timer interrupt:
//! player.time_step();
//! // From the audio interrupt:
//! player.service_samples(ChannelMask::all());
//! ```

#![warn(missing_docs)]

pub mod config; // Player Configuration
pub mod events; // Interrupt Source Registration
pub mod loader; // Module File I/O
pub mod mod_parser; // MOD Format Parsing
pub mod replayer; // Pattern Scheduler & Effects
pub mod samples; // Sample Registry
pub mod streaming; // Double-Buffered Sample Streaming
pub mod xosera; // Hardware Channel Abstraction

/// Error types for MOD parsing and playback
#[derive(thiserror::Error, Debug)]
pub enum PtModError {
    /// Error while parsing the module file
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid player configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Interrupt installation or register bus failure
    #[error("Hardware error: {0}")]
    Hardware(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for PtModError {
    /// Converts a String into `PtModError::Other`.
    ///
    /// Prefer the specific variants (`Parse`, `Config`, `Hardware`) where the
    /// failure has a known category.
    fn from(msg: String) -> Self {
        PtModError::Other(msg)
    }
}

impl From<&str> for PtModError {
    fn from(msg: &str) -> Self {
        PtModError::Other(msg.to_string())
    }
}

/// Result type for parser and player operations
pub type Result<T> = std::result::Result<T, PtModError>;

// Public API exports
pub use config::{PlayerConfig, VideoTiming};
pub use events::{InterruptHooks, ManualEvents};
pub use loader::{load_file, ModFileLoader};
pub use mod_parser::{note_name, Module, ModuleSummary, Note, Pattern};
pub use replayer::{PlaybackState, Player, SharedPlayer};
pub use samples::Sample;
pub use xosera::{AudioChannels, ChannelMask, MemoryBus, XoseraBus};
