//! Pattern Scheduler & Effects
//!
//! The tick state machine that walks the song and drives the channels.
//!
//! Every tick the countdown is decremented. When it reaches zero the next
//! division is played: each channel's temporal effect is cleared, its note is
//! started (or deferred by `EDx`), and its effect applied. After that, on
//! every tick, each channel's temporal effect is stepped once.

pub mod channel;
pub mod cursor;
pub mod effects;
pub mod player;
pub mod shared;

pub use channel::Channel;
pub use cursor::PlaybackCursor;
pub use effects::{decode_effect, Effect, ImmediateEffect, TemporalEffect, EFFECT_TABLE};
pub use player::Player;
pub use shared::SharedPlayer;

/// Playback state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not playing; tick and service calls are ignored
    Stopped,
    /// Playing
    Playing,
}
