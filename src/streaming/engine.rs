//! Chunk loader for one voice
//!
//! A voice plays one buffer while the other is refilled. When the hardware
//! reports a buffer consumed, [`VoiceStream::channel_ready`] copies the next
//! chunk of sample words into the idle buffer and queues it. Note starts go
//! through [`VoiceStream::trigger`], which also restarts the voice with a new
//! period and volume.

use log::trace;

use super::double_buffer::{BufferRole, DoubleBuffer};
use crate::samples::Sample;
use crate::xosera::regs::PERIOD_FORCE_RESTART;
use crate::xosera::{AudioChannels, XoseraBus, SILENCE_PERIOD};

/// First playable word of a sample; word 0 holds loop information
pub const FIRST_SAMPLE_WORD: u16 = 1;

/// A chunk copied into one of the voice buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedChunk {
    /// Buffer the chunk was written to
    pub buffer: BufferRole,
    /// Tile-memory address of that buffer
    pub addr: u16,
    /// First sample word copied
    pub first_word: u16,
    /// Number of words copied
    pub words: u16,
}

/// Outcome of servicing or triggering a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// A chunk was queued
    Streaming(LoadedChunk),
    /// The voice was programmed with silence
    Silent,
}

/// Streaming state of one voice: current sample, read cursor and buffers
#[derive(Debug, Clone)]
pub struct VoiceStream<'m> {
    voice: u8,
    sample: Option<&'m Sample<'m>>,
    cursor: u16,
    looping: bool,
    buffers: DoubleBuffer,
    silence_addr: u16,
}

impl<'m> VoiceStream<'m> {
    /// Create an idle stream for `voice`
    pub fn new(voice: u8, buffers: DoubleBuffer, silence_addr: u16) -> Self {
        VoiceStream {
            voice,
            sample: None,
            cursor: FIRST_SAMPLE_WORD,
            looping: false,
            buffers,
            silence_addr,
        }
    }

    /// Hardware voice index
    pub fn voice(&self) -> u8 {
        self.voice
    }

    /// Sample being streamed, if any
    pub fn sample(&self) -> Option<&'m Sample<'m>> {
        self.sample
    }

    /// Next sample word to be copied
    pub fn cursor(&self) -> u16 {
        self.cursor
    }

    /// Whether the stream has wrapped into the sample loop
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Whether the voice is idle
    pub fn is_silent(&self) -> bool {
        self.sample.is_none()
    }

    /// The voice's buffer pair
    pub fn buffers(&self) -> &DoubleBuffer {
        &self.buffers
    }

    /// Point the stream at the start of a sample
    pub fn start(&mut self, sample: &'m Sample<'m>) {
        self.sample = Some(sample);
        self.cursor = FIRST_SAMPLE_WORD;
        self.looping = false;
    }

    /// Drop the current sample and reset to the idle state
    pub fn reset(&mut self) {
        self.sample = None;
        self.cursor = FIRST_SAMPLE_WORD;
        self.looping = false;
        self.buffers.reset();
    }

    /// Range of sample words for the next chunk, wrapping into the loop
    ///
    /// Chunks always run up to the sample end. Returns `None` once a sample
    /// without a loop is exhausted.
    fn next_chunk_range(&mut self) -> Option<(u16, u16)> {
        let sample = self.sample?;
        let end = sample.length;

        if self.cursor >= end {
            if !sample.has_loop() {
                return None;
            }
            self.cursor = sample.loop_start.max(FIRST_SAMPLE_WORD);
            self.looping = true;
            trace!(
                "voice {}: loop (start {:#06x}, length {:#06x})",
                self.voice,
                sample.loop_start,
                sample.loop_length
            );
        }

        let words = end.saturating_sub(self.cursor).min(self.buffers.words());
        if words == 0 {
            return None;
        }
        Some((self.cursor, self.cursor + words))
    }

    /// Copy the next chunk into the idle buffer and flip the buffer roles
    pub fn load_next_chunk<B: XoseraBus>(
        &mut self,
        audio: &mut AudioChannels<B>,
    ) -> Option<LoadedChunk> {
        let sample = self.sample?;
        let (start, end) = self.next_chunk_range()?;

        let buffer = self.buffers.idle();
        let addr = self.buffers.idle_addr();
        audio.upload(addr, sample.data.words(start.into(), end.into()));
        self.buffers.flip();
        self.cursor = end;

        let chunk = LoadedChunk {
            buffer,
            addr,
            first_word: start,
            words: end - start,
        };
        trace!(
            "voice {}: loaded words {:#06x}..{:#06x} into {:?} at {:#06x}",
            self.voice,
            start,
            end,
            buffer,
            addr
        );
        Some(chunk)
    }

    /// Program the silence buffer and mark the voice idle
    pub fn start_silence<B: XoseraBus>(&mut self, audio: &mut AudioChannels<B>) {
        audio.set_volume(self.voice, 0);
        audio.set_period(self.voice, SILENCE_PERIOD);
        audio.set_start_length(self.voice, self.silence_addr, 1);
        self.sample = None;
    }

    /// Handle a "buffer consumed" event: queue the next chunk behind the playing one
    pub fn channel_ready<B: XoseraBus>(
        &mut self,
        audio: &mut AudioChannels<B>,
        period: u16,
    ) -> StreamStatus {
        match self.load_next_chunk(audio) {
            Some(chunk) => {
                audio.set_period_start_length(self.voice, period, chunk.addr, chunk.words);
                StreamStatus::Streaming(chunk)
            }
            None => {
                self.start_silence(audio);
                StreamStatus::Silent
            }
        }
    }

    /// Start the current sample from the cursor, restarting the voice
    pub fn trigger<B: XoseraBus>(
        &mut self,
        audio: &mut AudioChannels<B>,
        period: u16,
        volume: u8,
    ) -> StreamStatus {
        match self.load_next_chunk(audio) {
            Some(chunk) => {
                audio.set_volume_period_start_length(
                    self.voice,
                    volume,
                    period | PERIOD_FORCE_RESTART,
                    chunk.addr,
                    chunk.words,
                );
                StreamStatus::Streaming(chunk)
            }
            None => {
                self.start_silence(audio);
                StreamStatus::Silent
            }
        }
    }
}
