//! Playback session
//!
//! [`Player`] owns every piece of mutable playback state: the cursor, the four
//! channels and the hardware voices. Hosts call [`Player::time_step`] from the
//! timer interrupt and [`Player::service_samples`] from the audio interrupt.
//! Neither returns an error and neither allocates.

use log::{info, trace};

use super::channel::Channel;
use super::cursor::PlaybackCursor;
use super::effects::{apply_effect, decode_effect, step_effect, Effect, TemporalEffect};
use super::PlaybackState;
use crate::config::PlayerConfig;
use crate::events::InterruptHooks;
use crate::mod_parser::{Module, Note, Row};
use crate::streaming::DoubleBuffer;
use crate::xosera::{xosera_period, AudioChannels, ChannelMask, XoseraBus, VOICE_COUNT};
use crate::Result;

/// A playback session for one module
pub struct Player<'m, B: XoseraBus, I: InterruptHooks> {
    module: &'m Module<'m>,
    audio: AudioChannels<B>,
    hooks: I,
    config: PlayerConfig,
    cursor: PlaybackCursor,
    channels: [Channel<'m>; VOICE_COUNT],
    state: PlaybackState,
    divisions: u64,
}

impl<'m, B: XoseraBus, I: InterruptHooks> Player<'m, B, I> {
    /// Start playing a module
    ///
    /// Silences all voices, enables audio, plays the first division and then
    /// installs the interrupt hooks. If installation fails the voices are
    /// silenced again and the error is returned.
    pub fn play(module: &'m Module<'m>, bus: B, hooks: I, config: PlayerConfig) -> Result<Self> {
        config.validate()?;

        let channels = std::array::from_fn(|voice| {
            let voice = voice as u8;
            let (a, b) = config.voice_buffers(voice);
            Channel::new(
                voice,
                DoubleBuffer::new(a, b, config.buffer_words),
                config.silence_addr,
            )
        });

        let mut player = Player {
            module,
            audio: AudioChannels::new(bus),
            hooks,
            config,
            cursor: PlaybackCursor::new(
                module.song_length(),
                module.pattern_at(0),
                config.default_speed,
            ),
            channels,
            state: PlaybackState::Playing,
            divisions: 0,
        };

        for channel in player.channels.iter_mut() {
            channel.silence(&mut player.audio);
        }
        player.audio.set_audio_enabled(true);

        // first division plays right away
        player.time_step();

        if let Err(e) = player.hooks.install() {
            player.silence_all();
            player.state = PlaybackState::Stopped;
            return Err(e);
        }

        info!(
            "Playing '{}' ({} positions, speed {}, {:?})",
            module.name(),
            module.song_length(),
            config.default_speed,
            config.timing
        );
        Ok(player)
    }

    /// Advance playback by one tick
    pub fn time_step(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }

        if self.cursor.tick() {
            self.play_division();
            self.cursor.restart_countdown();
        }

        for voice in 0..VOICE_COUNT {
            let due = step_effect(
                &mut self.channels[voice],
                &mut self.audio,
                &mut self.cursor,
            );
            if let Some(note) = due {
                trace!("voice {}: delayed note due", voice);
                self.start_note(voice, note);
            }
        }
    }

    /// Refill the voices in `ready` after their buffers were consumed
    ///
    /// Voices are serviced from 3 down to 0. Returns the voices serviced,
    /// which is empty once playback has stopped.
    pub fn service_samples(&mut self, ready: ChannelMask) -> ChannelMask {
        let mut serviced = ChannelMask::empty();
        if self.state != PlaybackState::Playing {
            return serviced;
        }

        for voice in (0..VOICE_COUNT).rev() {
            if ready.has_voice(voice) {
                self.channels[voice].service(&mut self.audio);
                serviced |= ChannelMask::voice(voice);
            }
        }
        serviced
    }

    /// Stop playback
    ///
    /// The interrupt hooks are removed before the voices are silenced, so no
    /// event can reach a channel afterwards.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        self.hooks.remove();
        self.silence_all();
        self.state = PlaybackState::Stopped;
        info!("Stopped after {} divisions", self.divisions);
    }

    /// Stop playback and hand back the bus and hooks
    pub fn into_parts(mut self) -> (B, I) {
        self.stop();
        (self.audio.into_bus(), self.hooks)
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Song position, row and timing
    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    /// Runtime state of a channel
    pub fn channel(&self, voice: usize) -> Option<&Channel<'m>> {
        self.channels.get(voice)
    }

    /// All four channels
    pub fn channels(&self) -> &[Channel<'m>; VOICE_COUNT] {
        &self.channels
    }

    /// The module being played
    pub fn module(&self) -> &'m Module<'m> {
        self.module
    }

    /// Session configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// The register bus
    pub fn bus(&self) -> &B {
        self.audio.bus()
    }

    /// The interrupt hooks
    pub fn hooks(&self) -> &I {
        &self.hooks
    }

    /// Number of divisions played so far
    pub fn divisions(&self) -> u64 {
        self.divisions
    }

    /// Notes of the current division
    pub fn current_row(&self) -> Option<Row> {
        let row = self.cursor.row()?;
        let pattern = self.module.pattern(self.cursor.pattern())?;
        Some(pattern.row(usize::from(row)))
    }

    fn silence_all(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.silence(&mut self.audio);
        }
        self.audio.set_audio_enabled(false);
    }

    fn play_division(&mut self) {
        self.cursor.advance(self.module.positions());
        self.divisions += 1;

        let row = self.current_row().unwrap_or([Note::EMPTY; VOICE_COUNT]);
        trace!(
            "division {:02x}:{:02x} (position {})",
            self.cursor.pattern(),
            self.cursor.row().unwrap_or(0),
            self.cursor.position()
        );

        for (voice, note) in row.iter().enumerate() {
            self.play_note(voice, *note);
        }
    }

    fn play_note(&mut self, voice: usize, note: Note) {
        self.channels[voice].clear_effect();
        let effect = decode_effect(note.effect, self.cursor.speed());

        if let Effect::Temporal(TemporalEffect::DelaySample {
            ticks_remaining, ..
        }) = effect
        {
            if note.sample > 0 {
                trace!("voice {}: delay note by {} ticks", voice, ticks_remaining);
                self.channels[voice].set_effect(TemporalEffect::DelaySample {
                    ticks_remaining,
                    pending: note,
                });
            }
            return;
        }

        if note.sample > 0 {
            self.start_note(voice, note);
        }
        apply_effect(
            effect,
            &mut self.channels[voice],
            &mut self.audio,
            &mut self.cursor,
        );
    }

    fn start_note(&mut self, voice: usize, note: Note) {
        let module = self.module;
        let Some(sample) = module.sample(note.sample) else {
            return;
        };

        let period = match note.period {
            0 => None,
            period => Some(xosera_period(period, self.config.timing)),
        };

        let channel = &mut self.channels[voice];
        channel.start_sample(sample, period);
        channel.trigger(&mut self.audio);
    }
}
