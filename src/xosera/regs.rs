//! Xosera XR register map and value encodings for the audio voices

/// Audio control register (bit 0 enables audio output)
pub const XR_AUD_CTRL: u16 = 0x02;

/// Audio enable flag for [`XR_AUD_CTRL`]
pub const AUD_CTRL_AUD_EN: u16 = 0x0001;

/// Voice 0 volume register; voice `n` is at `XR_AUD0_VOL + 4 * n`
pub const XR_AUD0_VOL: u16 = 0x20;
/// Voice 0 period register
pub const XR_AUD0_PERIOD: u16 = 0x21;
/// Voice 0 length register
pub const XR_AUD0_LENGTH: u16 = 0x22;
/// Voice 0 start address register
pub const XR_AUD0_START: u16 = 0x23;

/// Stride between consecutive voices' register blocks
pub const AUD_REG_STRIDE: u16 = 4;

/// Period bit forcing the voice to restart immediately
pub const PERIOD_FORCE_RESTART: u16 = 0x8000;

/// Length bit selecting tile memory (rather than VRAM) as the sample source
pub const LENGTH_TILE_MEM: u16 = 0x8000;

/// Start of XR tile memory
pub const XR_TILE_ADDR: u16 = 0xA000;

/// Register addresses for one voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceRegs {
    /// Volume register
    pub vol: u16,
    /// Period register
    pub period: u16,
    /// Length register
    pub length: u16,
    /// Start address register
    pub start: u16,
}

impl VoiceRegs {
    /// Register block of voice `voice` (0–3)
    pub const fn of(voice: u8) -> Self {
        let base = (voice as u16 & 0x03) * AUD_REG_STRIDE;
        VoiceRegs {
            vol: XR_AUD0_VOL + base,
            period: XR_AUD0_PERIOD + base,
            length: XR_AUD0_LENGTH + base,
            start: XR_AUD0_START + base,
        }
    }
}

/// Encode a 0–64 volume as the 8-bit left + 8-bit right register value
///
/// Volumes above 64 are clamped; 64 maps to 0x80 (100%) on both sides.
pub const fn stereo_volume(volume: u8) -> u16 {
    let v = if volume > 64 { 64 } else { volume } as u16;
    (v << 9) | (v << 1)
}

/// Decode the left-channel 0–64 volume from a volume register value
pub const fn volume_from_register(value: u16) -> u8 {
    (value >> 9) as u8
}

/// Encode a tile-memory buffer length in words (minimum one word)
pub const fn tile_length(words: u16) -> u16 {
    let words = if words == 0 { 1 } else { words };
    ((words - 1) & !LENGTH_TILE_MEM) | LENGTH_TILE_MEM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_regs() {
        let regs = VoiceRegs::of(2);
        assert_eq!(regs.vol, 0x28);
        assert_eq!(regs.period, 0x29);
        assert_eq!(regs.length, 0x2A);
        assert_eq!(regs.start, 0x2B);
    }

    #[test]
    fn test_stereo_volume() {
        assert_eq!(stereo_volume(64), 0x8080);
        assert_eq!(stereo_volume(0), 0x0000);
        assert_eq!(stereo_volume(200), 0x8080);
        assert_eq!(volume_from_register(stereo_volume(37)), 37);
    }

    #[test]
    fn test_tile_length() {
        assert_eq!(tile_length(64), 0x803F);
        assert_eq!(tile_length(1), 0x8000);
        assert_eq!(tile_length(0), 0x8000);
    }
}
