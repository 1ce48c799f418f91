//! MOD file header
//!
//! Fixed 1084-byte header:
//! - 20 bytes: song name
//! - 31 × 30 bytes: sample headers
//! - 1 byte: song length (number of valid positions)
//! - 1 byte: reserved (usually 127)
//! - 128 bytes: position table (pattern numbers)
//! - 4 bytes: format signature

use nom::bytes::complete::take;
use nom::multi::count;
use nom::number::complete::{be_u16, be_u8};
use nom::IResult;

use crate::samples::{SampleHeader, SAMPLE_COUNT};
use crate::{PtModError, Result};

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 1084;

/// Number of entries in the position table
pub const POSITION_COUNT: usize = 128;

/// Signatures of 4-channel, 31-sample modules
pub const SUPPORTED_SIGNATURES: [&[u8; 4]; 4] = [b"M.K.", b"M!K!", b"4CHN", b"FLT4"];

/// Decoded MOD header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModHeader {
    /// Song name
    pub name: String,
    /// Sample headers (31 entries), before loop repair
    pub samples: Vec<SampleHeader>,
    /// Number of valid positions
    pub song_length: u8,
    /// Reserved byte (restart position in some trackers)
    pub reserved: u8,
    /// Position table
    pub positions: [u8; POSITION_COUNT],
    /// Format signature
    pub signature: [u8; 4],
}

impl ModHeader {
    /// Decode the header from the start of a module buffer
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(PtModError::Parse(format!(
                "Module too small for header: {} bytes (need {})",
                data.len(),
                HEADER_SIZE
            )));
        }

        let (_, header) = mod_header(data)
            .map_err(|_| PtModError::Parse("Malformed module header".into()))?;
        Ok(header)
    }

    /// Whether the signature names a supported 4-channel format
    pub fn has_supported_signature(&self) -> bool {
        SUPPORTED_SIGNATURES
            .iter()
            .any(|sig| **sig == self.signature)
    }

    /// Signature as text (non-printable bytes shown as '.')
    pub fn signature_str(&self) -> String {
        self.signature
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect()
    }

    /// Number of patterns stored in the file: highest position entry + 1
    ///
    /// All 128 entries count, not just the first `song_length`.
    pub fn pattern_count(&self) -> usize {
        usize::from(self.positions.iter().copied().max().unwrap_or(0)) + 1
    }
}

/// Decode a fixed-width, NUL-padded name
fn decode_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes[..end]
        .iter()
        .map(|&b| b as char)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Sign-extend the low nibble (high nibble is reserved)
fn decode_finetune(byte: u8) -> i8 {
    ((byte << 4) as i8) >> 4
}

fn sample_header(input: &[u8]) -> IResult<&[u8], SampleHeader> {
    let (input, name) = take(22usize)(input)?;
    let (input, length) = be_u16(input)?;
    let (input, finetune) = be_u8(input)?;
    let (input, volume) = be_u8(input)?;
    let (input, repeat_point) = be_u16(input)?;
    let (input, repeat_length) = be_u16(input)?;

    Ok((
        input,
        SampleHeader {
            name: decode_name(name),
            length,
            finetune: decode_finetune(finetune),
            volume,
            repeat_point,
            repeat_length,
        },
    ))
}

fn mod_header(input: &[u8]) -> IResult<&[u8], ModHeader> {
    let (input, name) = take(20usize)(input)?;
    let (input, samples) = count(sample_header, SAMPLE_COUNT)(input)?;
    let (input, song_length) = be_u8(input)?;
    let (input, reserved) = be_u8(input)?;
    let (input, position_bytes) = take(POSITION_COUNT)(input)?;
    let (input, signature_bytes) = take(4usize)(input)?;

    let mut positions = [0u8; POSITION_COUNT];
    positions.copy_from_slice(position_bytes);
    let mut signature = [0u8; 4];
    signature.copy_from_slice(signature_bytes);

    Ok((
        input,
        ModHeader {
            name: decode_name(name),
            samples,
            song_length,
            reserved,
            positions,
            signature,
        },
    ))
}
