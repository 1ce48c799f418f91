//! Parsed module view
//!
//! [`Module`] borrows the loaded file buffer: patterns and sample PCM are read
//! in place, only the header metadata is decoded into owned values.

use log::debug;

use super::header::{ModHeader, HEADER_SIZE, POSITION_COUNT};
use super::note::Note;
use crate::samples::{Sample, SampleRegistry};
use crate::{PtModError, Result};

/// Rows per pattern
pub const ROWS_PER_PATTERN: usize = 64;

/// Channels per row
pub const CHANNELS: usize = 4;

/// Bytes per note cell
const NOTE_SIZE: usize = 4;

/// Bytes per pattern (64 rows × 4 channels × 4 bytes)
pub const PATTERN_SIZE: usize = ROWS_PER_PATTERN * CHANNELS * NOTE_SIZE;

/// One division: the notes of all four channels
pub type Row = [Note; CHANNELS];

/// View of one 64-row pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern<'a> {
    bytes: &'a [u8],
}

impl<'a> Pattern<'a> {
    /// Note at `row` (0–63) for `channel` (0–3); out-of-range cells are empty
    pub fn note(&self, row: usize, channel: usize) -> Note {
        if row >= ROWS_PER_PATTERN || channel >= CHANNELS {
            return Note::EMPTY;
        }
        let offset = (row * CHANNELS + channel) * NOTE_SIZE;
        let cell = &self.bytes[offset..offset + NOTE_SIZE];
        Note::from_bytes([cell[0], cell[1], cell[2], cell[3]])
    }

    /// Copy of all four notes of a row
    pub fn row(&self, row: usize) -> Row {
        [
            self.note(row, 0),
            self.note(row, 1),
            self.note(row, 2),
            self.note(row, 3),
        ]
    }
}

/// Short description of a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSummary {
    /// Song name
    pub name: String,
    /// Format signature
    pub signature: String,
    /// Number of valid positions
    pub song_length: u8,
    /// Number of stored patterns
    pub pattern_count: usize,
    /// Samples with playable data
    pub used_samples: usize,
    /// Total sample data in words
    pub sample_words: usize,
}

/// A parsed ProTracker module
#[derive(Debug, Clone)]
pub struct Module<'a> {
    header: ModHeader,
    pattern_count: usize,
    pattern_data: &'a [u8],
    samples: SampleRegistry<'a>,
}

impl<'a> Module<'a> {
    /// Parse a module from the complete file contents
    ///
    /// Fails on a short buffer, an unknown signature, an invalid song length
    /// or missing pattern data. Sample loops are repaired silently.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let header = ModHeader::parse(data)?;

        if !header.has_supported_signature() {
            return Err(PtModError::Parse(format!(
                "Unsupported module signature '{}' (expected M.K., M!K!, 4CHN or FLT4)",
                header.signature_str()
            )));
        }

        if header.song_length == 0 || usize::from(header.song_length) > POSITION_COUNT {
            return Err(PtModError::Parse(format!(
                "Invalid song length {}",
                header.song_length
            )));
        }

        let pattern_count = header.pattern_count();
        let patterns_end = HEADER_SIZE + pattern_count * PATTERN_SIZE;
        if data.len() < patterns_end {
            return Err(PtModError::Parse(format!(
                "Pattern data truncated: {} patterns need {} bytes, file has {}",
                pattern_count,
                patterns_end,
                data.len()
            )));
        }

        let pattern_data = &data[HEADER_SIZE..patterns_end];
        let samples = SampleRegistry::build(&header.samples, &data[patterns_end..]);

        debug!(
            "Parsed module '{}' ({}): {} positions, {} patterns",
            header.name,
            header.signature_str(),
            header.song_length,
            pattern_count
        );

        Ok(Module {
            header,
            pattern_count,
            pattern_data,
            samples,
        })
    }

    /// Song name
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Format signature
    pub fn signature(&self) -> String {
        self.header.signature_str()
    }

    /// Number of valid positions (1–128)
    pub fn song_length(&self) -> u8 {
        self.header.song_length
    }

    /// Pattern numbers of the valid positions, in play order
    pub fn positions(&self) -> &[u8] {
        &self.header.positions[..usize::from(self.header.song_length)]
    }

    /// Pattern number at a song position (any of the 128 table entries)
    pub fn pattern_at(&self, position: u8) -> u8 {
        self.header
            .positions
            .get(usize::from(position))
            .copied()
            .unwrap_or(0)
    }

    /// Number of patterns stored in the file
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Pattern by number
    pub fn pattern(&self, number: u8) -> Option<Pattern<'a>> {
        let index = usize::from(number);
        if index >= self.pattern_count {
            return None;
        }
        let start = index * PATTERN_SIZE;
        Some(Pattern {
            bytes: &self.pattern_data[start..start + PATTERN_SIZE],
        })
    }

    /// The sample registry
    pub fn samples(&self) -> &SampleRegistry<'a> {
        &self.samples
    }

    /// Sample by 1-based number
    pub fn sample(&self, number: u8) -> Option<&Sample<'a>> {
        self.samples.by_number(number)
    }

    /// Summary for display
    pub fn summary(&self) -> ModuleSummary {
        let used: Vec<&Sample> = self.samples.iter().filter(|s| s.length > 0).collect();
        ModuleSummary {
            name: self.header.name.clone(),
            signature: self.header.signature_str(),
            song_length: self.header.song_length,
            pattern_count: self.pattern_count,
            used_samples: used.len(),
            sample_words: used.iter().map(|s| usize::from(s.length)).sum(),
        }
    }
}
