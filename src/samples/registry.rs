//! Sample Registry
//!
//! The 31 sample slots of a module, laid over the PCM area that follows the
//! pattern table. Samples are stored back to back in slot order, each
//! `length * 2` bytes long.

use log::{debug, warn};

use super::sample::{Sample, SampleData, SampleHeader};

/// Number of sample slots in a 31-instrument module
pub const SAMPLE_COUNT: usize = 31;

/// All samples of a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRegistry<'a> {
    samples: Vec<Sample<'a>>,
}

impl<'a> SampleRegistry<'a> {
    /// Lay the sample headers over the PCM area
    ///
    /// Samples running past the end of `pcm` are shortened to the data present.
    pub fn build(headers: &[SampleHeader], pcm: &'a [u8]) -> Self {
        let mut offset = 0usize;
        let mut samples = Vec::with_capacity(SAMPLE_COUNT);

        for (index, header) in headers.iter().take(SAMPLE_COUNT).enumerate() {
            let wanted = usize::from(header.length) * 2;
            let start = offset.min(pcm.len());
            let end = (offset + wanted).min(pcm.len());
            if end - start < wanted {
                warn!(
                    "Sample {} '{}' truncated: {} of {} bytes present",
                    index + 1,
                    header.name,
                    end - start,
                    wanted
                );
            }

            let sample = Sample::from_header(header, SampleData::new(&pcm[start..end]));
            if sample.length > 0 {
                debug!(
                    "Sample {:2} '{}': {} words, vol {}, loop {}+{}, finetune {}",
                    index + 1,
                    sample.name,
                    sample.length,
                    sample.volume,
                    sample.loop_start,
                    sample.loop_length,
                    sample.finetune
                );
            }
            samples.push(sample);
            offset += wanted;
        }

        while samples.len() < SAMPLE_COUNT {
            samples.push(Sample::from_header(&SampleHeader::default(), SampleData::default()));
        }

        SampleRegistry { samples }
    }

    /// Sample by 1-based sample number as used in pattern notes
    pub fn by_number(&self, number: u8) -> Option<&Sample<'a>> {
        usize::from(number)
            .checked_sub(1)
            .and_then(|index| self.samples.get(index))
    }

    /// Sample by 0-based slot index
    pub fn get(&self, index: usize) -> Option<&Sample<'a>> {
        self.samples.get(index)
    }

    /// Iterate all 31 samples in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Sample<'a>> {
        self.samples.iter()
    }

    /// Number of slots (always 31)
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a registry has 31 slots
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
