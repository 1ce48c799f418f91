//! End-to-end playback behaviour against the in-memory register file

use std::cell::RefCell;
use std::rc::Rc;

use ptmod::mod_parser::{HEADER_SIZE, PATTERN_SIZE};
use ptmod::xosera::{xosera_period, SILENCE_PERIOD};
use ptmod::{
    ChannelMask, InterruptHooks, ManualEvents, MemoryBus, Module, Note, PlaybackState, Player,
    PlayerConfig, VideoTiming, XoseraBus,
};

/// Builds minimal M.K. modules
struct SongBuilder {
    positions: Vec<u8>,
    samples: Vec<(u16, u8, u16, u16)>,
    notes: Vec<(usize, usize, usize, Note)>,
}

impl SongBuilder {
    fn new(positions: &[u8]) -> Self {
        SongBuilder {
            positions: positions.to_vec(),
            samples: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Add a sample: length in words, volume, loop start, loop length
    fn sample(mut self, length: u16, volume: u8, loop_start: u16, loop_length: u16) -> Self {
        self.samples.push((length, volume, loop_start, loop_length));
        self
    }

    fn note(mut self, pattern: usize, row: usize, channel: usize, note: Note) -> Self {
        self.notes.push((pattern, row, channel, note));
        self
    }

    fn build(&self) -> Vec<u8> {
        let pattern_count = usize::from(self.positions.iter().copied().max().unwrap_or(0)) + 1;
        let mut data = vec![0u8; HEADER_SIZE + pattern_count * PATTERN_SIZE];
        data[..4].copy_from_slice(b"test");

        for (i, &(length, volume, loop_start, loop_length)) in self.samples.iter().enumerate() {
            let at = 20 + i * 30;
            data[at + 22..at + 24].copy_from_slice(&length.to_be_bytes());
            data[at + 25] = volume;
            data[at + 26..at + 28].copy_from_slice(&loop_start.to_be_bytes());
            data[at + 28..at + 30].copy_from_slice(&loop_length.to_be_bytes());
        }

        data[950] = self.positions.len() as u8;
        data[951] = 127;
        data[952..952 + self.positions.len()].copy_from_slice(&self.positions);
        data[1080..1084].copy_from_slice(b"M.K.");

        for &(pattern, row, channel, note) in &self.notes {
            let at = HEADER_SIZE + pattern * PATTERN_SIZE + (row * 4 + channel) * 4;
            data[at..at + 4].copy_from_slice(&note.to_bytes());
        }

        // PCM word i holds the value i
        for &(length, ..) in &self.samples {
            data.extend((0..length).flat_map(|w| w.to_be_bytes()));
        }
        data
    }
}

fn start<'m>(module: &'m Module<'m>) -> Player<'m, MemoryBus, ManualEvents> {
    Player::play(
        module,
        MemoryBus::new(),
        ManualEvents::default(),
        PlayerConfig::pal(),
    )
    .unwrap()
}

#[test]
fn test_one_note_song_end_to_end() {
    let data = SongBuilder::new(&[0])
        .sample(200, 40, 0, 0)
        .note(0, 0, 0, Note::new(1, 428, 0))
        .build();
    let module = Module::parse(&data).unwrap();
    let config = PlayerConfig::pal();
    let (buffer_a, buffer_b) = config.voice_buffers(0);
    // play() runs the first division itself, so the note's trigger has
    // already filled buffer A with words 1..=64 before any ready event
    let mut player = start(&module);

    let bus = player.bus();
    assert_eq!(bus.voice_period(0) & 0x7FFF, xosera_period(428, VideoTiming::Pal));
    assert_eq!(bus.voice_period(0) & 0x7FFF, 3018);
    assert_eq!(bus.voice_volume(0), 40);
    assert_eq!(bus.voice_start(0), buffer_a);
    assert_eq!(bus.voice_length_words(0), 64);
    let expected_a: Vec<u16> = (1..=64).collect();
    assert_eq!(bus.xmem_range(buffer_a, 64), expected_a.as_slice());

    // hardware latched buffer A, so the first ready event fills buffer B
    assert_eq!(player.service_samples(ChannelMask::CH0), ChannelMask::CH0);
    let bus = player.bus();
    assert_eq!(bus.voice_start(0), buffer_b);
    assert_eq!(bus.voice_period(0), 3018);
    let expected_b: Vec<u16> = (65..=128).collect();
    assert_eq!(bus.xmem_range(buffer_b, 64), expected_b.as_slice());
}

#[test]
fn test_one_division_per_speed_ticks() {
    let data = SongBuilder::new(&[0, 0]).build();
    let module = Module::parse(&data).unwrap();
    let mut player = start(&module);

    for _ in 0..20 {
        let before = player.divisions();
        for tick in 0..6 {
            player.time_step();
            let expected = if tick < 5 { before } else { before + 1 };
            assert_eq!(player.divisions(), expected);
        }
    }
    assert_eq!(player.cursor().row(), Some(20));
}

#[test]
fn test_song_wraps_to_first_position() {
    let data = SongBuilder::new(&[0, 1]).build();
    let module = Module::parse(&data).unwrap();
    let mut player = start(&module);

    for _ in 0..64 * 6 {
        player.time_step();
    }
    assert_eq!(player.cursor().position(), 1);
    assert_eq!(player.cursor().pattern(), 1);
    for _ in 0..64 * 6 {
        player.time_step();
    }
    assert_eq!(player.cursor().position(), 0);
    assert_eq!(player.cursor().row(), Some(0));
}

#[test]
fn test_pattern_break_waits_for_row_boundary() {
    let data = SongBuilder::new(&[0, 1])
        .sample(100, 30, 0, 0)
        .note(0, 0, 0, Note::new(0, 0, 0xD10))
        .note(0, 0, 1, Note::new(1, 428, 0))
        .build();
    let module = Module::parse(&data).unwrap();
    let mut player = start(&module);

    // rest of the row still played
    assert_eq!((player.cursor().position(), player.cursor().row()), (0, Some(0)));
    assert!(!player.channel(1).unwrap().is_silent());

    for _ in 0..5 {
        player.time_step();
        assert_eq!(player.cursor().row(), Some(0));
    }
    player.time_step();
    assert_eq!((player.cursor().position(), player.cursor().row()), (1, Some(10)));
    assert_eq!(player.cursor().pattern(), 1);
}

#[test]
fn test_position_jump_with_break() {
    let data = SongBuilder::new(&[0, 1, 2])
        .note(0, 0, 3, Note::new(0, 0, 0xB02))
        .note(0, 0, 0, Note::new(0, 0, 0xD05))
        .build();
    let module = Module::parse(&data).unwrap();
    let mut player = start(&module);

    for _ in 0..6 {
        player.time_step();
    }
    assert_eq!((player.cursor().position(), player.cursor().row()), (2, Some(5)));
}

#[test]
fn test_set_speed_changes_row_rate() {
    let data = SongBuilder::new(&[0])
        .note(0, 0, 2, Note::new(0, 0, 0xF03))
        .build();
    let module = Module::parse(&data).unwrap();
    let mut player = start(&module);

    assert_eq!(player.cursor().speed(), 3);
    for _ in 0..9 {
        player.time_step();
    }
    assert_eq!(player.cursor().row(), Some(3));
}

#[test]
fn test_pattern_delay_stretches_division() {
    let data = SongBuilder::new(&[0])
        .note(0, 0, 0, Note::new(0, 0, 0xEE1))
        .build();
    let module = Module::parse(&data).unwrap();
    let mut player = start(&module);

    for _ in 0..11 {
        player.time_step();
    }
    assert_eq!(player.cursor().row(), Some(0));
    player.time_step();
    assert_eq!(player.cursor().row(), Some(1));
}

#[test]
fn test_other_channels_keep_stepping_during_pattern_delay() {
    let data = SongBuilder::new(&[0])
        .sample(100, 10, 0, 0)
        .note(0, 0, 0, Note::new(0, 0, 0xEE1))
        .note(0, 0, 1, Note::new(1, 428, 0xA10))
        .build();
    let module = Module::parse(&data).unwrap();
    let mut player = start(&module);

    // division tick counts as the first slide step
    assert_eq!(player.channel(1).unwrap().volume(), 11);
    for _ in 0..8 {
        player.time_step();
    }
    assert_eq!(player.cursor().row(), Some(0));
    assert_eq!(player.channel(1).unwrap().volume(), 19);
}

#[test]
fn test_set_volume_is_clamped() {
    let data = SongBuilder::new(&[0])
        .sample(100, 10, 0, 0)
        .note(0, 0, 0, Note::new(1, 428, 0xC7F))
        .build();
    let module = Module::parse(&data).unwrap();
    let player = start(&module);

    assert_eq!(player.channel(0).unwrap().volume(), 64);
    assert_eq!(player.bus().voice_volume(0), 64);
}

#[test]
fn test_cut_sample_silences_volume() {
    let data = SongBuilder::new(&[0])
        .sample(100, 50, 0, 0)
        .note(0, 0, 0, Note::new(1, 428, 0xEC2))
        .build();
    let module = Module::parse(&data).unwrap();
    let mut player = start(&module);

    player.time_step();
    assert_eq!(player.bus().voice_volume(0), 50);
    player.time_step();
    assert_eq!(player.bus().voice_volume(0), 0);
}

#[test]
fn test_chunk_loads_alternate_buffers() {
    let data = SongBuilder::new(&[0])
        .sample(1000, 64, 0, 1000)
        .note(0, 0, 2, Note::new(1, 214, 0))
        .build();
    let module = Module::parse(&data).unwrap();
    let (buffer_a, buffer_b) = PlayerConfig::pal().voice_buffers(2);
    let mut player = start(&module);

    let mut starts = vec![player.bus().voice_start(2)];
    for _ in 0..7 {
        player.service_samples(ChannelMask::CH2);
        starts.push(player.bus().voice_start(2));
    }
    let expected: Vec<u16> = (0..8)
        .map(|i| if i % 2 == 0 { buffer_a } else { buffer_b })
        .collect();
    assert_eq!(starts, expected);
}

#[test]
fn test_exhausted_sample_switches_to_silence() {
    let data = SongBuilder::new(&[0])
        .sample(100, 64, 0, 0)
        .note(0, 0, 0, Note::new(1, 428, 0))
        .build();
    let module = Module::parse(&data).unwrap();
    let config = PlayerConfig::pal();
    let mut player = start(&module);

    assert_eq!(player.bus().voice_length_words(0), 64);
    player.service_samples(ChannelMask::CH0);
    assert_eq!(player.bus().voice_length_words(0), 35);
    assert_eq!(player.channel(0).unwrap().stream().cursor(), 100);

    player.service_samples(ChannelMask::CH0);
    let bus = player.bus();
    assert_eq!(bus.voice_period(0), SILENCE_PERIOD);
    assert_eq!(bus.voice_volume(0), 0);
    assert_eq!(bus.voice_start(0), config.silence_addr);
    assert_eq!(bus.voice_length_words(0), 1);
    assert!(player.channel(0).unwrap().is_silent());
}

#[test]
fn test_looping_sample_keeps_streaming() {
    let data = SongBuilder::new(&[0])
        .sample(100, 64, 20, 80)
        .note(0, 0, 0, Note::new(1, 428, 0))
        .build();
    let module = Module::parse(&data).unwrap();
    let mut player = start(&module);

    for _ in 0..50 {
        player.service_samples(ChannelMask::CH0);
        assert_ne!(player.bus().voice_period(0), SILENCE_PERIOD);
    }
    assert!(player.channel(0).unwrap().stream().is_looping());
}

#[test]
fn test_repaired_loop_stays_inside_sample() {
    let data = SongBuilder::new(&[0]).sample(100, 64, 90, 50).build();
    let module = Module::parse(&data).unwrap();
    let sample = module.sample(1).unwrap();
    assert!(sample.loop_start + sample.loop_length <= sample.length);
    assert_eq!((sample.loop_start, sample.loop_length), (50, 50));
}

#[test]
fn test_pattern_count_from_positions() {
    for k in [0u8, 3, 9] {
        let data = SongBuilder::new(&[0, k]).build();
        let module = Module::parse(&data).unwrap();
        assert_eq!(module.pattern_count(), usize::from(k) + 1);
    }
}

#[test]
fn test_sessions_are_independent() {
    let data = SongBuilder::new(&[0]).build();
    let module = Module::parse(&data).unwrap();
    let mut first = start(&module);
    let second = start(&module);

    for _ in 0..12 {
        first.time_step();
    }
    assert_eq!(first.cursor().row(), Some(2));
    assert_eq!(second.cursor().row(), Some(0));
}

/// Shared record of hook calls and register writes, in order
type EventLog = Rc<RefCell<Vec<&'static str>>>;

struct RecordingBus {
    inner: MemoryBus,
    log: EventLog,
}

impl XoseraBus for RecordingBus {
    fn xreg_write(&mut self, reg: u16, value: u16) {
        self.log.borrow_mut().push("write");
        self.inner.xreg_write(reg, value);
    }

    fn set_write_xaddr(&mut self, addr: u16) {
        self.inner.set_write_xaddr(addr);
    }

    fn write_xdata(&mut self, word: u16) {
        self.inner.write_xdata(word);
    }
}

struct RecordingHooks {
    log: EventLog,
}

impl InterruptHooks for RecordingHooks {
    fn install(&mut self) -> ptmod::Result<()> {
        self.log.borrow_mut().push("install");
        Ok(())
    }

    fn remove(&mut self) {
        self.log.borrow_mut().push("remove");
    }
}

#[test]
fn test_stop_removes_hooks_before_silencing() {
    let data = SongBuilder::new(&[0])
        .sample(100, 64, 0, 0)
        .note(0, 0, 0, Note::new(1, 428, 0))
        .build();
    let module = Module::parse(&data).unwrap();
    let log = EventLog::default();
    let bus = RecordingBus {
        inner: MemoryBus::new(),
        log: Rc::clone(&log),
    };
    let hooks = RecordingHooks {
        log: Rc::clone(&log),
    };

    let mut player = Player::play(&module, bus, hooks, PlayerConfig::pal()).unwrap();
    assert_eq!(log.borrow().last(), Some(&"install"));

    log.borrow_mut().clear();
    player.stop();
    assert_eq!(player.state(), PlaybackState::Stopped);

    let events = log.borrow();
    assert_eq!(events.first(), Some(&"remove"));
    assert!(events[1..].iter().all(|e| *e == "write"));
    assert!(events.len() > 1);

    let (bus, _) = player.into_parts();
    for voice in 0..4 {
        assert_eq!(bus.inner.voice_period(voice), SILENCE_PERIOD);
        assert_eq!(bus.inner.voice_volume(voice), 0);
    }
    assert!(!bus.inner.audio_enabled());
}
