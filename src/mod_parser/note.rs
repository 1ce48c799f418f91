//! Pattern note cells
//!
//! Each cell is a big-endian 32-bit word:
//!
//! ```text
//!  byte 0    byte 1    byte 2    byte 3
//! ssss pppp pppp pppp  ssss eeee eeee eeee
//! ```
//!
//! where `s` is the sample number (high nibble in byte 0, low nibble in
//! byte 2), `p` the 12-bit Amiga period and `e` the 12-bit effect.

/// One channel's cell in a pattern row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Note {
    /// Sample number (1–31), 0 = keep current sample
    pub sample: u8,
    /// Amiga period, 0 = no pitch change
    pub period: u16,
    /// 12-bit effect command and parameters
    pub effect: u16,
}

impl Note {
    /// A cell with no sample, no period and no effect
    pub const EMPTY: Note = Note {
        sample: 0,
        period: 0,
        effect: 0,
    };

    /// Create a note (fields are masked to their bit widths)
    pub const fn new(sample: u8, period: u16, effect: u16) -> Self {
        Note {
            sample: sample & 0x1F,
            period: period & 0x0FFF,
            effect: effect & 0x0FFF,
        }
    }

    /// Decode a packed note word
    pub const fn from_word(word: u32) -> Self {
        Note {
            sample: (((word & 0xF000_0000) >> 24) | ((word & 0x0000_F000) >> 12)) as u8,
            period: ((word & 0x0FFF_0000) >> 16) as u16,
            effect: (word & 0x0000_0FFF) as u16,
        }
    }

    /// Decode a note from its four file bytes
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Note::from_word(u32::from_be_bytes(bytes))
    }

    /// Pack into a note word
    pub const fn to_word(&self) -> u32 {
        let sample = self.sample as u32;
        ((sample & 0x10) << 24)
            | ((self.period as u32 & 0x0FFF) << 16)
            | ((sample & 0x0F) << 12)
            | (self.effect as u32 & 0x0FFF)
    }

    /// Pack into four file bytes
    pub fn to_bytes(&self) -> [u8; 4] {
        self.to_word().to_be_bytes()
    }

    /// Whether the cell does nothing
    pub fn is_empty(&self) -> bool {
        *self == Note::EMPTY
    }
}

/// Human-readable name of an Amiga period in octaves 1–3
///
/// Returns `---` for period 0 and `???` for periods outside the standard table.
pub fn note_name(period: u16) -> &'static str {
    match period {
        0 => "---",

        856 => "C-1",
        808 => "C#1",
        762 => "D-1",
        720 => "D#1",
        678 => "E-1",
        640 => "F-1",
        604 => "F#1",
        570 => "G-1",
        538 => "G#1",
        508 => "A-1",
        480 => "A#1",
        453 => "B-1",

        428 => "C-2",
        404 => "C#2",
        381 => "D-2",
        360 => "D#2",
        339 => "E-2",
        320 => "F-2",
        302 => "F#2",
        285 => "G-2",
        269 => "G#2",
        254 => "A-2",
        240 => "A#2",
        226 => "B-2",

        214 => "C-3",
        202 => "C#3",
        190 => "D-3",
        180 => "D#3",
        170 => "E-3",
        160 => "F-3",
        151 => "F#3",
        143 => "G-3",
        135 => "G#3",
        127 => "A-3",
        120 => "A#3",
        113 => "B-3",

        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_note_word() {
        // Sample 0x1A, period 428 (0x1AC), effect C20
        let note = Note::from_bytes([0x11, 0xAC, 0xAC, 0x20]);
        assert_eq!(note.sample, 0x1A);
        assert_eq!(note.period, 428);
        assert_eq!(note.effect, 0xC20);
    }

    #[test]
    fn test_pack_matches_file_layout() {
        let note = Note::new(1, 428, 0);
        assert_eq!(note.to_bytes(), [0x01, 0xAC, 0x10, 0x00]);
        assert_eq!(Note::from_bytes(note.to_bytes()), note);
    }

    #[test]
    fn test_note_name() {
        assert_eq!(note_name(0), "---");
        assert_eq!(note_name(428), "C-2");
        assert_eq!(note_name(113), "B-3");
        assert_eq!(note_name(429), "???");
    }

    #[test]
    fn test_empty_note() {
        assert!(Note::from_word(0).is_empty());
        assert!(!Note::new(0, 0, 0xF06).is_empty());
    }
}
