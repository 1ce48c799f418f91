//! Command-line module player
//!
//! Plays a module against an in-memory Xosera register file. Buffer-consumed
//! events are timed from the period and length programmed into each voice, so
//! the player sees the same event pattern it would on hardware.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use ptmod::xosera::VOICE_COUNT;
use ptmod::{
    note_name, ChannelMask, InterruptHooks, ManualEvents, MemoryBus, ModFileLoader, Module, Note,
    Player, PlayerConfig, SharedPlayer, VideoTiming, XoseraBus,
};

/// Xosera pixel clock; a voice outputs one byte every `period` clocks
const XOSERA_CLOCK_HZ: u64 = 25_125_000;

/// Audio interrupt polls per tick in realtime mode
const AUDIO_POLLS_PER_TICK: u32 = 4;

#[derive(Parser)]
#[command(name = "ptmod")]
#[command(about = "Play a ProTracker module on a simulated Xosera")]
struct Args {
    /// Module file
    file: PathBuf,

    /// Number of ticks to play
    #[arg(short, long, default_value_t = 3000)]
    ticks: u32,

    /// Use NTSC timing (60 Hz ticks, NTSC period conversion)
    #[arg(long)]
    ntsc: bool,

    /// Player configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every division as it is played
    #[arg(long)]
    trace: bool,

    /// Run at the real tick rate with separate timer and audio threads
    #[arg(long)]
    realtime: bool,
}

/// Time left on the buffer each voice is playing, in pixel clocks
#[derive(Default)]
struct VoiceClocks {
    remaining: [u64; VOICE_COUNT],
    events: u64,
}

impl VoiceClocks {
    /// Clocks needed to play the buffer currently programmed into a voice
    fn buffer_clocks(bus: &MemoryBus, voice: u8) -> u64 {
        let period = u64::from(bus.voice_period(voice) & 0x7FFF).max(1);
        2 * u64::from(bus.voice_length_words(voice)) * period
    }

    /// Let `clocks` pass, raising a ready event whenever a voice runs dry
    fn advance<I: InterruptHooks>(&mut self, player: &mut Player<'_, MemoryBus, I>, clocks: u64) {
        for voice in 0..VOICE_COUNT {
            let mut budget = clocks;
            while self.remaining[voice] <= budget {
                budget -= self.remaining[voice];
                // the queued buffer starts playing as the event fires
                let playing = Self::buffer_clocks(player.bus(), voice as u8);
                player.service_samples(ChannelMask::voice(voice));
                self.remaining[voice] = playing;
                self.events += 1;
            }
            self.remaining[voice] -= budget;
        }
    }
}

fn format_note(note: &Note) -> String {
    let sample = match note.sample {
        0 => "..".to_string(),
        n => format!("{:02}", n),
    };
    format!("{} {} {:03X}", note_name(note.period), sample, note.effect)
}

fn print_division<B: XoseraBus, I: InterruptHooks>(player: &Player<'_, B, I>) {
    let Some(row) = player.current_row() else {
        return;
    };
    let cursor = player.cursor();
    let cells: Vec<String> = row.iter().map(format_note).collect();
    println!(
        "{:03} {:02X}:{:02} | {}",
        cursor.position(),
        cursor.pattern(),
        cursor.row().unwrap_or(0),
        cells.join(" | ")
    );
}

fn print_summary(module: &Module<'_>) {
    let summary = module.summary();
    println!("Module:    {}", summary.name);
    println!("Format:    {}", summary.signature);
    println!("Positions: {}", summary.song_length);
    println!("Patterns:  {}", summary.pattern_count);
    println!(
        "Samples:   {} ({} words)\n",
        summary.used_samples, summary.sample_words
    );

    println!(" #  {:<22}  {:>6}  {:>3}  {:>4}  Loop", "Name", "Length", "Vol", "Fine");
    for (index, sample) in module.samples().iter().enumerate() {
        if sample.length == 0 {
            continue;
        }
        let looped = if sample.has_loop() {
            format!("{:04X}+{:04X}", sample.loop_start, sample.loop_length)
        } else {
            "-".to_string()
        };
        println!(
            "{:2}  {:<22}  {:>6}  {:>3}  {:>4}  {}",
            index + 1,
            sample.name,
            sample.length,
            sample.volume,
            sample.finetune,
            looped
        );
    }
    println!();
}

fn print_report<I: InterruptHooks>(player: &Player<'_, MemoryBus, I>, events: u64) {
    let cursor = player.cursor();
    println!("\n=== Playback Statistics ===");
    println!("Divisions played:  {}", player.divisions());
    println!(
        "Final position:    {} (pattern {}, row {})",
        cursor.position(),
        cursor.pattern(),
        cursor.row().unwrap_or(0)
    );
    println!("Speed:             {}", cursor.speed());
    println!("Ready events:      {}", events);
}

fn run_simulation(module: &Module<'_>, config: PlayerConfig, args: &Args) -> Result<()> {
    let mut player = Player::play(
        module,
        MemoryBus::without_log(),
        ManualEvents::default(),
        config,
    )?;
    let clocks_per_tick = XOSERA_CLOCK_HZ / u64::from(config.timing.tick_rate_hz());
    let mut clocks = VoiceClocks::default();

    if args.trace {
        print_division(&player);
    }
    for _ in 0..args.ticks {
        let before = player.divisions();
        player.time_step();
        if args.trace && player.divisions() != before {
            print_division(&player);
        }
        clocks.advance(&mut player, clocks_per_tick);
    }

    print_report(&player, clocks.events);
    player.stop();
    Ok(())
}

fn run_realtime(module: &Module<'_>, config: PlayerConfig, args: &Args) -> Result<()> {
    let player = Player::play(
        module,
        MemoryBus::without_log(),
        ManualEvents::default(),
        config,
    )?;
    let shared = SharedPlayer::new(player);
    let interval = config.tick_interval();
    let clocks_per_poll = XOSERA_CLOCK_HZ
        / u64::from(config.timing.tick_rate_hz())
        / u64::from(AUDIO_POLLS_PER_TICK);
    let ticks = args.ticks;
    let trace = args.trace;
    let done = AtomicBool::new(false);
    let mut clocks = VoiceClocks::default();

    println!(
        "Playing {} ticks in real time ({:.1} s)\n",
        ticks,
        (interval * ticks).as_secs_f32()
    );

    std::thread::scope(|scope| {
        let timer = shared.clone();
        let done = &done;
        scope.spawn(move || {
            let start = Instant::now();
            for tick in 1..=ticks {
                let before = timer.with(|p| p.divisions());
                timer.tick();
                if trace {
                    timer.with(|p| {
                        if p.divisions() != before {
                            print_division(p);
                        }
                    });
                }
                let deadline = start + interval * tick;
                if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
                    std::thread::sleep(wait);
                }
            }
            done.store(true, Ordering::Release);
        });

        let poll = interval / AUDIO_POLLS_PER_TICK;
        while !done.load(Ordering::Acquire) {
            std::thread::sleep(poll);
            shared.with(|p| clocks.advance(p, clocks_per_poll));
        }
    });

    shared.with(|p| print_report(p, clocks.events));
    shared.stop();
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let data = ModFileLoader::load(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let module = Module::parse(&data).context("Failed to parse module")?;

    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            PlayerConfig::from_json(&json)?
        }
        None => PlayerConfig::pal(),
    };
    if args.ntsc {
        config.timing = VideoTiming::Ntsc;
    }

    print_summary(&module);

    if args.realtime {
        run_realtime(&module, config, &args)
    } else {
        run_simulation(&module, config, &args)
    }
}
