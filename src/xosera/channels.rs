//! Per-voice register setters
//!
//! Voice DMA reads registers while the player updates them, so related
//! registers are written back to back in a fixed order: volume, period,
//! length, then start. Writing the start address arms the voice, so it always
//! comes last.

use super::regs::{self, VoiceRegs};
use super::XoseraBus;

/// The four Xosera audio voices behind a register bus
#[derive(Debug)]
pub struct AudioChannels<B: XoseraBus> {
    bus: B,
}

impl<B: XoseraBus> AudioChannels<B> {
    /// Wrap a register bus
    pub fn new(bus: B) -> Self {
        AudioChannels { bus }
    }

    /// Borrow the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the underlying bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Release the underlying bus
    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Enable or disable audio output for all voices
    pub fn set_audio_enabled(&mut self, enabled: bool) {
        let value = if enabled { regs::AUD_CTRL_AUD_EN } else { 0 };
        self.bus.xreg_write(regs::XR_AUD_CTRL, value);
    }

    /// Set a voice's raw period register (bit 15 forces a restart)
    pub fn set_period(&mut self, voice: u8, period: u16) {
        self.bus.xreg_write(VoiceRegs::of(voice).period, period);
    }

    /// Set a voice's volume (0–64, clamped) on both stereo sides
    pub fn set_volume(&mut self, voice: u8, volume: u8) {
        self.bus
            .xreg_write(VoiceRegs::of(voice).vol, regs::stereo_volume(volume));
    }

    /// Set a voice's tile-memory start address
    pub fn set_start_address(&mut self, voice: u8, start: u16) {
        self.bus.xreg_write(VoiceRegs::of(voice).start, start);
    }

    /// Set a voice's tile-memory buffer length in words
    pub fn set_length(&mut self, voice: u8, words: u16) {
        self.bus
            .xreg_write(VoiceRegs::of(voice).length, regs::tile_length(words));
    }

    /// Program the next buffer of a voice
    pub fn set_start_length(&mut self, voice: u8, start: u16, words: u16) {
        let r = VoiceRegs::of(voice);
        self.bus.xreg_write(r.length, regs::tile_length(words));
        self.bus.xreg_write(r.start, start);
    }

    /// Program period and next buffer of a voice in one write window
    pub fn set_period_start_length(&mut self, voice: u8, period: u16, start: u16, words: u16) {
        let r = VoiceRegs::of(voice);
        self.bus.xreg_write(r.period, period);
        self.bus.xreg_write(r.length, regs::tile_length(words));
        self.bus.xreg_write(r.start, start);
    }

    /// Program volume, period and next buffer of a voice in one write window
    pub fn set_volume_period_start_length(
        &mut self,
        voice: u8,
        volume: u8,
        period: u16,
        start: u16,
        words: u16,
    ) {
        let r = VoiceRegs::of(voice);
        self.bus.xreg_write(r.vol, regs::stereo_volume(volume));
        self.bus.xreg_write(r.period, period);
        self.bus.xreg_write(r.length, regs::tile_length(words));
        self.bus.xreg_write(r.start, start);
    }

    /// Copy sample words into tile memory starting at `addr`
    pub fn upload(&mut self, addr: u16, words: impl Iterator<Item = u16>) {
        self.bus.set_write_xaddr(addr);
        for word in words {
            self.bus.write_xdata(word);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xosera::MemoryBus;

    #[test]
    fn test_combined_write_order() {
        let mut audio = AudioChannels::new(MemoryBus::new());
        audio.set_volume_period_start_length(1, 64, 0x8123, 0xA840, 64);

        let writes = audio.bus().register_writes();
        assert_eq!(
            writes,
            &[(0x24, 0x8080), (0x25, 0x8123), (0x26, 0x803F), (0x27, 0xA840)]
        );
    }

    #[test]
    fn test_period_start_length_leaves_volume() {
        let mut audio = AudioChannels::new(MemoryBus::new());
        audio.set_volume(0, 20);
        audio.set_period_start_length(0, 3018, 0xA800, 32);

        assert_eq!(audio.bus().voice_volume(0), 20);
        assert_eq!(audio.bus().xreg(0x21), 3018);
        assert_eq!(audio.bus().xreg(0x22), 0x801F);
        assert_eq!(audio.bus().xreg(0x23), 0xA800);
    }

    #[test]
    fn test_upload() {
        let mut audio = AudioChannels::new(MemoryBus::new());
        audio.upload(0xA800, [1u16, 2, 3].into_iter());
        assert_eq!(audio.bus().xmem_range(0xA800, 3), &[1, 2, 3]);
    }

    #[test]
    fn test_single_register_setters() {
        let mut audio = AudioChannels::new(MemoryBus::new());
        audio.set_period(2, 0x8BCA);
        audio.set_start_address(3, 0xA8C0);
        audio.set_length(1, 64);
        audio.set_volume(0, 32);

        assert_eq!(
            audio.bus().register_writes(),
            &[(0x29, 0x8BCA), (0x2F, 0xA8C0), (0x26, 0x803F), (0x20, 0x4040)]
        );
        assert_eq!(audio.bus().voice_length_words(1), 64);
    }

    #[test]
    fn test_start_length_writes_length_first() {
        let mut audio = AudioChannels::new(MemoryBus::new());
        audio.set_start_length(3, 0xA000, 1);

        assert_eq!(audio.bus().register_writes(), &[(0x2E, 0x8000), (0x2F, 0xA000)]);
        assert_eq!(audio.bus().voice_length_words(3), 1);
    }
}
