//! Amiga to Xosera period conversion
//!
//! MOD periods count Amiga Paula clock ticks (~3.5 MHz, half the Amiga CPU
//! clock). Xosera voices count ticks of the video pixel clock, so a period is
//! scaled by the ratio of the two clocks. Lower period = higher pitch on both.

use crate::config::VideoTiming;

/// Period used while a voice plays silence (slowest practical rate)
pub const SILENCE_PERIOD: u16 = 50_000;

/// PAL ratio (25 MHz / half PAL Amiga clock), scaled by 10^6
const PAL_RATIO_MICRO: u64 = 7_052_186;

/// NTSC ratio (25 MHz / half NTSC Amiga clock), scaled by 10^6
const NTSC_RATIO_MICRO: u64 = 6_983_240;

/// Convert a 12-bit Amiga period into a Xosera voice period
///
/// The result is truncated and always leaves bit 15 (force restart) clear.
/// A zero period ("no change") converts to zero.
pub fn xosera_period(amiga_period: u16, timing: VideoTiming) -> u16 {
    let ratio = match timing {
        VideoTiming::Pal => PAL_RATIO_MICRO,
        VideoTiming::Ntsc => NTSC_RATIO_MICRO,
    };
    let scaled = u64::from(amiga_period & 0x0FFF) * ratio / 1_000_000;
    scaled.min(0x7FFF) as u16
}
