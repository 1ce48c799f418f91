//! In-memory Xosera register file
//!
//! A [`XoseraBus`] implementation backed by plain arrays instead of hardware.
//! Records every register write so tests (and the simulator CLI) can inspect
//! exactly what the player programmed into each voice.

use super::regs::{self, VoiceRegs};
use super::XoseraBus;

/// Number of XR registers modelled
const XREG_COUNT: usize = 0x40;

/// Size of XR memory in words
const XMEM_WORDS: usize = 0x1_0000;

/// Register file and XR memory held in RAM
#[derive(Debug, Clone)]
pub struct MemoryBus {
    xregs: [u16; XREG_COUNT],
    xmem: Vec<u16>,
    write_addr: u16,
    log_writes: bool,
    writes: Vec<(u16, u16)>,
    data_writes: usize,
}

impl MemoryBus {
    /// Create a bus that records register writes
    pub fn new() -> Self {
        MemoryBus {
            xregs: [0; XREG_COUNT],
            xmem: vec![0; XMEM_WORDS],
            write_addr: 0,
            log_writes: true,
            writes: Vec::new(),
            data_writes: 0,
        }
    }

    /// Create a bus that keeps register state but no write log
    ///
    /// Use for long simulations where the log would grow without bound.
    pub fn without_log() -> Self {
        MemoryBus {
            log_writes: false,
            ..Self::new()
        }
    }

    /// Current value of an XR register (0 for unmodelled registers)
    pub fn xreg(&self, reg: u16) -> u16 {
        self.xregs.get(reg as usize).copied().unwrap_or(0)
    }

    /// All register writes as `(register, value)` pairs, oldest first
    pub fn register_writes(&self) -> &[(u16, u16)] {
        &self.writes
    }

    /// Number of words written through the data port
    pub fn data_writes(&self) -> usize {
        self.data_writes
    }

    /// Forget recorded register writes
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.data_writes = 0;
    }

    /// Slice of XR memory
    pub fn xmem_range(&self, addr: u16, len: usize) -> &[u16] {
        let start = addr as usize;
        let end = (start + len).min(XMEM_WORDS);
        &self.xmem[start..end]
    }

    /// Volume (0–64) last programmed into a voice
    pub fn voice_volume(&self, voice: u8) -> u8 {
        regs::volume_from_register(self.xreg(VoiceRegs::of(voice).vol))
    }

    /// Raw period register of a voice (including the restart bit)
    pub fn voice_period(&self, voice: u8) -> u16 {
        self.xreg(VoiceRegs::of(voice).period)
    }

    /// Start address register of a voice
    pub fn voice_start(&self, voice: u8) -> u16 {
        self.xreg(VoiceRegs::of(voice).start)
    }

    /// Buffer length of a voice in words
    pub fn voice_length_words(&self, voice: u8) -> u16 {
        (self.xreg(VoiceRegs::of(voice).length) & !regs::LENGTH_TILE_MEM) + 1
    }

    /// Whether audio output is enabled
    pub fn audio_enabled(&self) -> bool {
        self.xreg(regs::XR_AUD_CTRL) & regs::AUD_CTRL_AUD_EN != 0
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl XoseraBus for MemoryBus {
    fn xreg_write(&mut self, reg: u16, value: u16) {
        if let Some(slot) = self.xregs.get_mut(reg as usize) {
            *slot = value;
        }
        if self.log_writes {
            self.writes.push((reg, value));
        }
    }

    fn set_write_xaddr(&mut self, addr: u16) {
        self.write_addr = addr;
    }

    fn write_xdata(&mut self, word: u16) {
        self.xmem[self.write_addr as usize] = word;
        self.write_addr = self.write_addr.wrapping_add(1);
        self.data_writes += 1;
    }
}
