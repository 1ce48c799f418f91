//! Per-voice A/B buffer pair in tile memory

/// One of the two buffers of a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRole {
    /// First buffer
    A,
    /// Second buffer
    B,
}

impl BufferRole {
    /// The other buffer
    pub fn other(self) -> Self {
        match self {
            BufferRole::A => BufferRole::B,
            BufferRole::B => BufferRole::A,
        }
    }
}

/// Two fixed-size hardware buffers; one is played while the other is refilled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleBuffer {
    a: u16,
    b: u16,
    words: u16,
    idle: BufferRole,
}

impl DoubleBuffer {
    /// Create a buffer pair; buffer A is filled first
    pub fn new(a: u16, b: u16, words: u16) -> Self {
        DoubleBuffer {
            a,
            b,
            words,
            idle: BufferRole::A,
        }
    }

    /// Buffer capacity in words
    pub fn words(&self) -> u16 {
        self.words
    }

    /// Tile-memory address of a buffer
    pub fn addr(&self, role: BufferRole) -> u16 {
        match role {
            BufferRole::A => self.a,
            BufferRole::B => self.b,
        }
    }

    /// The buffer the next chunk goes into
    pub fn idle(&self) -> BufferRole {
        self.idle
    }

    /// Address of the idle buffer
    pub fn idle_addr(&self) -> u16 {
        self.addr(self.idle)
    }

    /// Swap idle and active roles after a chunk load
    pub fn flip(&mut self) {
        self.idle = self.idle.other();
    }

    /// Make buffer A the next target again
    pub fn reset(&mut self) {
        self.idle = BufferRole::A;
    }
}
