//! Player configuration
//!
//! Memory layout of the per-voice sample buffers and the video timing that
//! determines both the period conversion and the nominal tick rate.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::xosera::regs::XR_TILE_ADDR;
use crate::xosera::VOICE_COUNT;
use crate::{PtModError, Result};

/// Default ticks per division
pub const DEFAULT_SPEED: u8 = 6;

/// Default buffer length in words (128 8-bit samples)
pub const DEFAULT_BUFFER_WORDS: u16 = 0x0040;

/// Default start of the sample buffers (after the default font in tile memory)
pub const DEFAULT_BUFFER_BASE: u16 = XR_TILE_ADDR + 0x0800;

/// Default silence buffer (start of tile memory)
pub const DEFAULT_SILENCE_ADDR: u16 = XR_TILE_ADDR;

/// Video timing of the host machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoTiming {
    /// 50 Hz, PAL Amiga clock
    #[default]
    Pal,
    /// 60 Hz, NTSC Amiga clock
    Ntsc,
}

impl VideoTiming {
    /// Tick (vertical blank) rate in Hz
    pub fn tick_rate_hz(&self) -> u32 {
        match self {
            VideoTiming::Pal => 50,
            VideoTiming::Ntsc => 60,
        }
    }
}

/// Configuration for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Video timing (period conversion and tick rate)
    pub timing: VideoTiming,

    /// Ticks per division at song start
    pub default_speed: u8,

    /// Length of each voice buffer in words
    /// Each voice uses two buffers (A and B), so 8 buffers are laid out
    /// back to back from `buffer_base`.
    pub buffer_words: u16,

    /// Tile-memory address of voice 0's buffer A
    pub buffer_base: u16,

    /// Tile-memory address of the silence buffer
    pub silence_addr: u16,
}

impl PlayerConfig {
    /// Configuration for PAL machines
    pub fn pal() -> Self {
        PlayerConfig {
            timing: VideoTiming::Pal,
            default_speed: DEFAULT_SPEED,
            buffer_words: DEFAULT_BUFFER_WORDS,
            buffer_base: DEFAULT_BUFFER_BASE,
            silence_addr: DEFAULT_SILENCE_ADDR,
        }
    }

    /// Configuration for NTSC machines
    pub fn ntsc() -> Self {
        PlayerConfig {
            timing: VideoTiming::Ntsc,
            ..Self::pal()
        }
    }

    /// Parse a configuration from JSON (missing fields take PAL defaults)
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PlayerConfig = serde_json::from_str(json)
            .map_err(|e| PtModError::Config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the buffer layout fits in XR memory and the speed is usable
    pub fn validate(&self) -> Result<()> {
        if self.default_speed == 0 {
            return Err(PtModError::Config("default_speed must be at least 1".into()));
        }
        if self.buffer_words == 0 || self.buffer_words > 0x8000 {
            return Err(PtModError::Config(format!(
                "buffer_words {} out of range 1..=32768",
                self.buffer_words
            )));
        }

        let end = u32::from(self.buffer_base)
            + u32::from(self.buffer_words) * (2 * VOICE_COUNT as u32);
        if end > 0x1_0000 {
            return Err(PtModError::Config(format!(
                "Sample buffers at 0x{:04x} ({} words each) overflow XR memory",
                self.buffer_base, self.buffer_words
            )));
        }

        let silence = u32::from(self.silence_addr);
        if silence >= u32::from(self.buffer_base) && silence < end {
            return Err(PtModError::Config(format!(
                "Silence address 0x{:04x} overlaps the sample buffers",
                self.silence_addr
            )));
        }

        Ok(())
    }

    /// Addresses of buffer A and buffer B for a voice
    pub fn voice_buffers(&self, voice: u8) -> (u16, u16) {
        let stride = self.buffer_words.wrapping_mul(2);
        let a = self
            .buffer_base
            .wrapping_add(stride.wrapping_mul(u16::from(voice)));
        (a, a.wrapping_add(self.buffer_words))
    }

    /// Nominal interval between tick events
    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.timing.tick_rate_hz()))
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::pal()
    }
}
