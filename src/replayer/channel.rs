//! Runtime state of one song channel

use super::effects::TemporalEffect;
use crate::samples::{Sample, MAX_VOLUME};
use crate::streaming::{DoubleBuffer, StreamStatus, VoiceStream};
use crate::xosera::{AudioChannels, XoseraBus, SILENCE_PERIOD};

/// One of the four song channels, bound to the hardware voice of the same index
#[derive(Debug, Clone)]
pub struct Channel<'m> {
    stream: VoiceStream<'m>,
    period: u16,
    volume: u8,
    effect: Option<TemporalEffect>,
}

impl<'m> Channel<'m> {
    /// Channel in the silence state
    pub fn new(voice: u8, buffers: DoubleBuffer, silence_addr: u16) -> Self {
        Channel {
            stream: VoiceStream::new(voice, buffers, silence_addr),
            period: SILENCE_PERIOD,
            volume: MAX_VOLUME,
            effect: None,
        }
    }

    /// Hardware voice index
    pub fn voice(&self) -> u8 {
        self.stream.voice()
    }

    /// Current hardware period
    pub fn period(&self) -> u16 {
        self.period
    }

    /// Current volume (0–64)
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Active temporal effect
    pub fn effect(&self) -> Option<TemporalEffect> {
        self.effect
    }

    /// Sample streaming state
    pub fn stream(&self) -> &VoiceStream<'m> {
        &self.stream
    }

    /// Whether the channel has no sample to play
    pub fn is_silent(&self) -> bool {
        self.stream.is_silent()
    }

    /// Set the volume, clamped to 0–64, and write it to the voice
    pub fn set_volume<B: XoseraBus>(&mut self, audio: &mut AudioChannels<B>, volume: i32) {
        self.volume = volume.clamp(0, i32::from(MAX_VOLUME)) as u8;
        audio.set_volume(self.voice(), self.volume);
    }

    /// Replace the active temporal effect
    pub fn set_effect(&mut self, effect: TemporalEffect) {
        self.effect = Some(effect);
    }

    /// Drop the active temporal effect
    pub fn clear_effect(&mut self) {
        self.effect = None;
    }

    /// Select a sample and rewind to its start
    ///
    /// The volume resets to the sample's default. A `period` of `None` keeps
    /// the current pitch.
    pub fn start_sample(&mut self, sample: &'m Sample<'m>, period: Option<u16>) {
        self.stream.start(sample);
        self.volume = sample.volume;
        if let Some(period) = period {
            self.period = period;
        }
    }

    /// Restart the voice with the current sample, period and volume
    pub fn trigger<B: XoseraBus>(&mut self, audio: &mut AudioChannels<B>) -> StreamStatus {
        let status = self.stream.trigger(audio, self.period, self.volume);
        if status == StreamStatus::Silent {
            self.volume = 0;
        }
        status
    }

    /// Queue the next chunk after the voice consumed a buffer
    pub fn service<B: XoseraBus>(&mut self, audio: &mut AudioChannels<B>) -> StreamStatus {
        let status = self.stream.channel_ready(audio, self.period);
        if status == StreamStatus::Silent {
            self.volume = 0;
        }
        status
    }

    /// Program silence into the voice and return to the initial state
    pub fn silence<B: XoseraBus>(&mut self, audio: &mut AudioChannels<B>) {
        self.stream.start_silence(audio);
        self.stream.reset();
        self.period = SILENCE_PERIOD;
        self.volume = 0;
        self.effect = None;
    }
}
