//! Sample metadata and PCM views

use log::debug;

/// Highest volume a sample or channel can have
pub const MAX_VOLUME: u8 = 64;

/// Sample header exactly as stored in the module (values in words)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleHeader {
    /// Sample name (22 bytes, trailing NULs stripped)
    pub name: String,
    /// Length in words
    pub length: u16,
    /// Signed finetune (-8..=7)
    pub finetune: i8,
    /// Default volume
    pub volume: u8,
    /// Loop start in words
    pub repeat_point: u16,
    /// Loop length in words
    pub repeat_length: u16,
}

impl SampleHeader {
    /// Repair an inconsistent loop so that `repeat_point + repeat_length <= length`
    ///
    /// The loop start is pulled back first; if the loop is still too long its
    /// length is shortened, down to 0 (loop disabled). Returns whether
    /// anything changed.
    pub fn fix_loop(&mut self) -> bool {
        let end = u32::from(self.repeat_point) + u32::from(self.repeat_length);
        let length = u32::from(self.length);
        if end <= length {
            return false;
        }

        let mut excess = end - length;
        let shift = excess.min(u32::from(self.repeat_point));
        self.repeat_point -= shift as u16;
        excess -= shift;

        if excess > 0 {
            let cut = excess.min(u32::from(self.repeat_length));
            self.repeat_length -= cut as u16;
        }

        debug!(
            "Repaired loop of sample '{}': start {} length {} (sample length {})",
            self.name, self.repeat_point, self.repeat_length, self.length
        );
        true
    }
}

/// Non-owning view of a sample's PCM data as big-endian words
///
/// Word 0 of every ProTracker sample holds loop information rather than
/// audio, which is why playback starts at word 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleData<'a> {
    bytes: &'a [u8],
}

impl<'a> SampleData<'a> {
    /// Wrap raw PCM bytes (a trailing odd byte is ignored)
    pub fn new(bytes: &'a [u8]) -> Self {
        SampleData {
            bytes: &bytes[..bytes.len() & !1],
        }
    }

    /// Number of whole words in the view
    pub fn len_words(&self) -> usize {
        self.bytes.len() / 2
    }

    /// Whether the view is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Word at `index` (0 if out of range)
    #[inline]
    pub fn word(&self, index: usize) -> u16 {
        match self.bytes.get(index * 2..index * 2 + 2) {
            Some(pair) => u16::from_be_bytes([pair[0], pair[1]]),
            None => 0,
        }
    }

    /// Iterate words in `start..end` (clamped to the view)
    pub fn words(&self, start: usize, end: usize) -> impl Iterator<Item = u16> + 'a {
        let end = end.min(self.len_words());
        let start = start.min(end);
        let bytes: &'a [u8] = self.bytes;
        bytes[start * 2..end * 2]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
    }

    /// Raw PCM bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// A sample ready for playback: repaired metadata plus its PCM view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample<'a> {
    /// Sample name
    pub name: String,
    /// Playable length in words (shortened if the file was truncated)
    pub length: u16,
    /// Signed finetune (-8..=7)
    pub finetune: i8,
    /// Default volume (0–64)
    pub volume: u8,
    /// Loop start in words
    pub loop_start: u16,
    /// Loop length in words (0 or 1 = no loop)
    pub loop_length: u16,
    /// PCM words
    pub data: SampleData<'a>,
}

impl<'a> Sample<'a> {
    /// Build a playable sample from its header and PCM bytes
    ///
    /// The length is capped to the available data and the loop is repaired
    /// against that length.
    pub fn from_header(header: &SampleHeader, data: SampleData<'a>) -> Self {
        let available = data.len_words().min(u16::MAX as usize) as u16;
        let mut fixed = SampleHeader {
            length: header.length.min(available),
            volume: header.volume.min(MAX_VOLUME),
            ..header.clone()
        };
        fixed.fix_loop();

        Sample {
            name: fixed.name,
            length: fixed.length,
            finetune: fixed.finetune,
            volume: fixed.volume,
            loop_start: fixed.repeat_point,
            loop_length: fixed.repeat_length,
            data,
        }
    }

    /// Whether the sample repeats once played through
    pub fn has_loop(&self) -> bool {
        self.loop_length > 1
    }
}
