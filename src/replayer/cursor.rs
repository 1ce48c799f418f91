//! Song position and tick timing

use crate::mod_parser::ROWS_PER_PATTERN;

/// Highest row a pattern break can target
const LAST_ROW: u8 = (ROWS_PER_PATTERN - 1) as u8;

/// Where the song is and when the next division is due
///
/// Position Jump and Pattern Break only record a target here; the target is
/// taken on the next division, so a jump never re-runs the current division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackCursor {
    song_length: u8,
    position: u8,
    pattern: u8,
    row: Option<u8>,
    speed: u8,
    countdown: u16,
    jump_position: Option<u8>,
    break_row: Option<u8>,
}

impl PlaybackCursor {
    /// Cursor before the first division of a song
    ///
    /// The countdown starts at 1 so the first tick plays row 0.
    pub fn new(song_length: u8, first_pattern: u8, speed: u8) -> Self {
        PlaybackCursor {
            song_length: song_length.max(1),
            position: 0,
            pattern: first_pattern,
            row: None,
            speed: speed.max(1),
            countdown: 1,
            jump_position: None,
            break_row: None,
        }
    }

    /// Current song position
    pub fn position(&self) -> u8 {
        self.position
    }

    /// Pattern number at the current position
    pub fn pattern(&self) -> u8 {
        self.pattern
    }

    /// Current row (`None` before the first division)
    pub fn row(&self) -> Option<u8> {
        self.row
    }

    /// Ticks per division
    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Ticks left until the next division
    pub fn countdown(&self) -> u16 {
        self.countdown
    }

    /// Pending jump target as `(position, row)`, if any
    pub fn pending_jump(&self) -> Option<(Option<u8>, Option<u8>)> {
        if self.jump_position.is_none() && self.break_row.is_none() {
            None
        } else {
            Some((self.jump_position, self.break_row))
        }
    }

    /// Count down one tick; returns whether a new division is due
    pub fn tick(&mut self) -> bool {
        self.countdown = self.countdown.saturating_sub(1);
        self.countdown == 0
    }

    /// Start counting the next division from the current speed
    pub fn restart_countdown(&mut self) {
        self.countdown = u16::from(self.speed);
    }

    /// Stretch the current division by one tick
    pub fn extend(&mut self) {
        self.countdown = self.countdown.saturating_add(1);
    }

    /// Set ticks per division (0 is treated as 1)
    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.max(1);
    }

    /// Jump to `position` at the next division (clamped to the song)
    pub fn jump_to(&mut self, position: u8) {
        self.jump_position = Some(position.min(self.song_length.saturating_sub(1)));
    }

    /// Continue from `row` of the next position at the next division
    pub fn break_to(&mut self, row: u8) {
        self.break_row = Some(row.min(LAST_ROW));
    }

    fn next_position(&self) -> u8 {
        let next = self.position.saturating_add(1);
        if next >= self.song_length {
            0
        } else {
            next
        }
    }

    /// Move to the next division and resolve its pattern from `positions`
    pub fn advance(&mut self, positions: &[u8]) {
        let jump = self.jump_position.take();
        let brk = self.break_row.take();

        if jump.is_some() || brk.is_some() {
            self.position = jump.unwrap_or_else(|| self.next_position());
            self.row = Some(brk.unwrap_or(0));
        } else {
            match self.row {
                None => self.row = Some(0),
                Some(row) if row >= LAST_ROW => {
                    self.position = self.next_position();
                    self.row = Some(0);
                }
                Some(row) => self.row = Some(row + 1),
            }
        }

        self.pattern = positions
            .get(usize::from(self.position))
            .copied()
            .unwrap_or(0);
    }
}
