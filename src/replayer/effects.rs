//! ProTracker effect decoder and processor
//!
//! The 12-bit effect of a note is decoded through [`EFFECT_TABLE`] into an
//! [`Effect`]. Immediate effects act once, on the division that carries them.
//! Temporal effects are installed on the channel and stepped once per tick:
//!
//! ```text
//! Cxx  set volume                 immediate
//! Axy  volume slide (x up/y down) temporal
//! EAx  fine volume up             immediate
//! EBx  fine volume down           immediate
//! ECx  cut sample after x ticks   temporal
//! EDx  delay sample by x ticks    temporal
//! EEx  delay pattern x divisions  temporal
//! Bxx  position jump              immediate
//! Dxy  pattern break to row x*10+y immediate
//! Fxx  set speed                  immediate
//! ```
//!
//! Anything else decodes to [`Effect::None`].

use log::trace;

use super::channel::Channel;
use super::cursor::PlaybackCursor;
use crate::mod_parser::Note;
use crate::samples::MAX_VOLUME;
use crate::xosera::{AudioChannels, XoseraBus};

/// Effect that acts once, on the division that carries it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmediateEffect {
    /// Set channel volume
    SetVolume(u8),
    /// Raise volume once
    FineVolumeUp(u8),
    /// Lower volume once
    FineVolumeDown(u8),
    /// Continue at a song position from the next division
    PositionJump(u8),
    /// Continue at a row of the next position from the next division
    PatternBreak {
        /// Target row (decimal encoded in the parameter)
        row: u8,
    },
    /// Set ticks per division
    SetSpeed(u8),
}

/// Effect spread over the ticks following its division
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalEffect {
    /// Slide volume every tick
    VolumeSlide {
        /// Amount added per tick (takes precedence)
        up: u8,
        /// Amount subtracted per tick
        down: u8,
    },
    /// Silence the channel once the count runs out
    CutSample {
        /// Ticks left before the cut
        ticks_remaining: u8,
    },
    /// Start a note once the count runs out
    DelaySample {
        /// Ticks left before the note starts
        ticks_remaining: u8,
        /// The delayed note
        pending: Note,
    },
    /// Hold the current division for extra divisions
    DelayPattern {
        /// Extra divisions requested
        divisions: u8,
        /// Extra ticks still to add
        ticks_remaining: u16,
    },
}

/// A decoded note effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// No effect (or an unsupported one)
    None,
    /// Applied immediately
    Immediate(ImmediateEffect),
    /// Installed on the channel
    Temporal(TemporalEffect),
}

/// Builds an [`Effect`] from the low 8 bits of the effect and the current speed
pub type EffectDecoder = fn(param: u8, speed: u8) -> Effect;

/// Effect codes as `(mask, code, decoder)`, matched in order
pub const EFFECT_TABLE: &[(u16, u16, EffectDecoder)] = &[
    (0xF00, 0xA00, volume_slide),
    (0xF00, 0xB00, position_jump),
    (0xF00, 0xC00, set_volume),
    (0xF00, 0xD00, pattern_break),
    (0xFF0, 0xEA0, fine_volume_up),
    (0xFF0, 0xEB0, fine_volume_down),
    (0xFF0, 0xEC0, cut_sample),
    (0xFF0, 0xED0, delay_sample),
    (0xFF0, 0xEE0, delay_pattern),
    (0xF00, 0xF00, set_speed),
];

fn volume_slide(param: u8, _speed: u8) -> Effect {
    Effect::Temporal(TemporalEffect::VolumeSlide {
        up: param >> 4,
        down: param & 0x0F,
    })
}

fn position_jump(param: u8, _speed: u8) -> Effect {
    Effect::Immediate(ImmediateEffect::PositionJump(param))
}

fn set_volume(param: u8, _speed: u8) -> Effect {
    Effect::Immediate(ImmediateEffect::SetVolume(param.min(MAX_VOLUME)))
}

fn pattern_break(param: u8, _speed: u8) -> Effect {
    let row = (param >> 4) * 10 + (param & 0x0F);
    Effect::Immediate(ImmediateEffect::PatternBreak { row })
}

fn fine_volume_up(param: u8, _speed: u8) -> Effect {
    Effect::Immediate(ImmediateEffect::FineVolumeUp(param & 0x0F))
}

fn fine_volume_down(param: u8, _speed: u8) -> Effect {
    Effect::Immediate(ImmediateEffect::FineVolumeDown(param & 0x0F))
}

fn cut_sample(param: u8, _speed: u8) -> Effect {
    Effect::Temporal(TemporalEffect::CutSample {
        ticks_remaining: param & 0x0F,
    })
}

fn delay_sample(param: u8, _speed: u8) -> Effect {
    Effect::Temporal(TemporalEffect::DelaySample {
        ticks_remaining: param & 0x0F,
        pending: Note::EMPTY,
    })
}

fn delay_pattern(param: u8, speed: u8) -> Effect {
    let divisions = param & 0x0F;
    if divisions == 0 {
        return Effect::None;
    }
    Effect::Temporal(TemporalEffect::DelayPattern {
        divisions,
        ticks_remaining: u16::from(divisions) * u16::from(speed.max(1)),
    })
}

fn set_speed(param: u8, _speed: u8) -> Effect {
    Effect::Immediate(ImmediateEffect::SetSpeed(param.max(1)))
}

/// Decode a 12-bit note effect at the given speed
pub fn decode_effect(effect: u16, speed: u8) -> Effect {
    let effect = effect & 0x0FFF;
    EFFECT_TABLE
        .iter()
        .find(|(mask, code, _)| effect & mask == *code)
        .map(|(_, _, decoder)| decoder((effect & 0xFF) as u8, speed))
        .unwrap_or(Effect::None)
}

/// Apply a decoded effect to a channel on its division
///
/// Temporal effects replace whatever the channel had installed.
pub fn apply_effect<B: XoseraBus>(
    effect: Effect,
    channel: &mut Channel<'_>,
    audio: &mut AudioChannels<B>,
    cursor: &mut PlaybackCursor,
) {
    match effect {
        Effect::None => {}
        Effect::Immediate(immediate) => apply_immediate(immediate, channel, audio, cursor),
        Effect::Temporal(temporal) => {
            trace!("voice {}: install {:?}", channel.voice(), temporal);
            channel.set_effect(temporal);
        }
    }
}

fn apply_immediate<B: XoseraBus>(
    effect: ImmediateEffect,
    channel: &mut Channel<'_>,
    audio: &mut AudioChannels<B>,
    cursor: &mut PlaybackCursor,
) {
    match effect {
        ImmediateEffect::SetVolume(volume) => channel.set_volume(audio, volume.into()),
        ImmediateEffect::FineVolumeUp(amount) => {
            let volume = i32::from(channel.volume()) + i32::from(amount);
            channel.set_volume(audio, volume);
        }
        ImmediateEffect::FineVolumeDown(amount) => {
            let volume = i32::from(channel.volume()) - i32::from(amount);
            channel.set_volume(audio, volume);
        }
        ImmediateEffect::PositionJump(position) => cursor.jump_to(position),
        ImmediateEffect::PatternBreak { row } => cursor.break_to(row),
        ImmediateEffect::SetSpeed(speed) => {
            trace!("speed {} -> {}", cursor.speed(), speed);
            cursor.set_speed(speed);
        }
    }
}

/// Advance a channel's temporal effect by one tick
///
/// Returns the pending note when a delayed sample is due; the caller starts it.
pub fn step_effect<B: XoseraBus>(
    channel: &mut Channel<'_>,
    audio: &mut AudioChannels<B>,
    cursor: &mut PlaybackCursor,
) -> Option<Note> {
    let effect = channel.effect()?;

    match effect {
        TemporalEffect::VolumeSlide { up, down } => {
            let volume = i32::from(channel.volume());
            let max = i32::from(MAX_VOLUME);
            if up > 0 {
                let next = volume + i32::from(up);
                channel.set_volume(audio, next);
                if next >= max {
                    channel.clear_effect();
                }
            } else if down > 0 {
                let next = volume - i32::from(down);
                channel.set_volume(audio, next);
                if next <= 0 {
                    channel.clear_effect();
                }
            }
            None
        }
        TemporalEffect::CutSample { ticks_remaining } => {
            if ticks_remaining == 0 {
                trace!("voice {}: cut", channel.voice());
                channel.set_volume(audio, 0);
                channel.clear_effect();
            } else {
                channel.set_effect(TemporalEffect::CutSample {
                    ticks_remaining: ticks_remaining - 1,
                });
            }
            None
        }
        TemporalEffect::DelaySample {
            ticks_remaining,
            pending,
        } => {
            if ticks_remaining == 0 {
                channel.clear_effect();
                Some(pending)
            } else {
                channel.set_effect(TemporalEffect::DelaySample {
                    ticks_remaining: ticks_remaining - 1,
                    pending,
                });
                None
            }
        }
        TemporalEffect::DelayPattern {
            divisions,
            ticks_remaining,
        } => {
            cursor.extend();
            let ticks_remaining = ticks_remaining.saturating_sub(1);
            if ticks_remaining == 0 {
                channel.clear_effect();
            } else {
                channel.set_effect(TemporalEffect::DelayPattern {
                    divisions,
                    ticks_remaining,
                });
            }
            None
        }
    }
}
