//! Interrupt source registration
//!
//! The player is driven by two interrupts: a fixed-rate timer that calls
//! [`Player::time_step`](crate::Player::time_step) and the audio "buffer
//! consumed" interrupt that calls
//! [`Player::service_samples`](crate::Player::service_samples). How those
//! handlers get installed is up to the host; the player only asks for them to
//! be installed when playback starts and removed when it stops.

use crate::Result;

/// Host hooks that connect the tick and audio-ready interrupts to a player
pub trait InterruptHooks {
    /// Install both interrupt handlers
    ///
    /// Called once, after playback state is fully initialised.
    fn install(&mut self) -> Result<()>;

    /// Remove both interrupt handlers
    ///
    /// Called before the voices are silenced on stop; after it returns no
    /// further tick or service calls may arrive.
    fn remove(&mut self);
}

impl<T: InterruptHooks + ?Sized> InterruptHooks for &mut T {
    fn install(&mut self) -> Result<()> {
        (**self).install()
    }

    fn remove(&mut self) {
        (**self).remove()
    }
}

/// Hooks for hosts that deliver events by calling the player directly
///
/// Nothing is installed; the hooks only track whether the player considers
/// its event sources live. Used by tests and the simulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualEvents {
    installed: bool,
    installs: u32,
    removals: u32,
}

impl ManualEvents {
    /// Whether event sources are currently installed
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Number of install calls
    pub fn installs(&self) -> u32 {
        self.installs
    }

    /// Number of remove calls
    pub fn removals(&self) -> u32 {
        self.removals
    }
}

impl InterruptHooks for ManualEvents {
    fn install(&mut self) -> Result<()> {
        self.installed = true;
        self.installs += 1;
        Ok(())
    }

    fn remove(&mut self) {
        self.installed = false;
        self.removals += 1;
    }
}
