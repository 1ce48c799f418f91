//! Xosera Audio Hardware
//!
//! Register-level access to the four Xosera DMA audio voices. The engine never
//! touches hardware directly: every register and tile-memory write goes
//! through the [`XoseraBus`] trait, which the host implements for the real
//! chip (or [`MemoryBus`] for tests and simulation).
//!
//! ## Voice registers
//!
//! Each voice `n` has four XR registers:
//! - `AUDn_VOL` (`0x20 + 4n`): 8-bit left + 8-bit right volume (0x80 = 100%)
//! - `AUDn_PERIOD` (`0x21 + 4n`): 15-bit period, bit 15 forces a restart
//! - `AUDn_LENGTH` (`0x22 + 4n`): sample length in words minus one, bit 15 selects tile memory
//! - `AUDn_START` (`0x23 + 4n`): sample start address; writing it arms the voice

pub mod channels;
pub mod memory_bus;
pub mod period;
pub mod regs;

pub use channels::AudioChannels;
pub use memory_bus::MemoryBus;
pub use period::{xosera_period, SILENCE_PERIOD};

use bitflags::bitflags;

/// Number of hardware audio voices
pub const VOICE_COUNT: usize = 4;

/// Register bus to the Xosera chip
///
/// Mirrors the three primitive operations the player needs: XR register
/// writes, and sequential writes into XR memory through the write-address
/// and data ports (used to fill sample buffers in tile memory).
pub trait XoseraBus {
    /// Write a 16-bit value to an XR register
    fn xreg_write(&mut self, reg: u16, value: u16);

    /// Set the XR memory write address for subsequent data writes
    fn set_write_xaddr(&mut self, addr: u16);

    /// Write a word to XR memory at the current write address (auto-increments)
    fn write_xdata(&mut self, word: u16);
}

impl<T: XoseraBus + ?Sized> XoseraBus for &mut T {
    fn xreg_write(&mut self, reg: u16, value: u16) {
        (**self).xreg_write(reg, value)
    }

    fn set_write_xaddr(&mut self, addr: u16) {
        (**self).set_write_xaddr(addr)
    }

    fn write_xdata(&mut self, word: u16) {
        (**self).write_xdata(word)
    }
}

bitflags! {
    /// Set of audio voices, as signalled by the audio "buffer ready" interrupt
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChannelMask: u8 {
        /// Voice 0
        const CH0 = 0x01;
        /// Voice 1
        const CH1 = 0x02;
        /// Voice 2
        const CH2 = 0x04;
        /// Voice 3
        const CH3 = 0x08;
    }
}

impl ChannelMask {
    /// Create a mask from a raw interrupt status value (unknown bits are dropped)
    pub fn from_register(value: u8) -> Self {
        ChannelMask::from_bits_truncate(value)
    }

    /// Mask containing a single voice
    ///
    /// Voices outside 0–3 give an empty mask.
    pub fn voice(voice: usize) -> Self {
        if voice < VOICE_COUNT {
            ChannelMask::from_bits_truncate(1 << voice)
        } else {
            ChannelMask::empty()
        }
    }

    /// Check whether a voice is in the mask
    pub fn has_voice(&self, voice: usize) -> bool {
        !ChannelMask::voice(voice).is_empty() && self.contains(ChannelMask::voice(voice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_mask_from_register() {
        let mask = ChannelMask::from_register(0xF5);
        assert_eq!(mask, ChannelMask::CH0 | ChannelMask::CH2);
    }

    #[test]
    fn test_channel_mask_voice() {
        assert_eq!(ChannelMask::voice(3), ChannelMask::CH3);
        assert!(ChannelMask::voice(4).is_empty());
        assert!(ChannelMask::all().has_voice(1));
        assert!(!ChannelMask::CH0.has_voice(1));
        assert!(!ChannelMask::all().has_voice(7));
    }
}
