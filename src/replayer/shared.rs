//! Thread-safe player handle
//!
//! On the target machine both interrupts run on one CPU and never overlap.
//! Hosts that simulate them with threads share the player through this
//! handle so tick and service calls are serialized.

use parking_lot::Mutex;
use std::sync::Arc;

use super::player::Player;
use super::PlaybackState;
use crate::events::InterruptHooks;
use crate::xosera::{ChannelMask, XoseraBus};

/// Cloneable handle to a [`Player`] behind a mutex
pub struct SharedPlayer<'m, B: XoseraBus, I: InterruptHooks> {
    inner: Arc<Mutex<Player<'m, B, I>>>,
}

impl<'m, B: XoseraBus, I: InterruptHooks> Clone for SharedPlayer<'m, B, I> {
    fn clone(&self) -> Self {
        SharedPlayer {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<'m, B: XoseraBus, I: InterruptHooks> SharedPlayer<'m, B, I> {
    /// Share a running player
    pub fn new(player: Player<'m, B, I>) -> Self {
        SharedPlayer {
            inner: Arc::new(Mutex::new(player)),
        }
    }

    /// Timer interrupt entry point
    pub fn tick(&self) {
        self.inner.lock().time_step();
    }

    /// Audio interrupt entry point
    pub fn service(&self, ready: ChannelMask) -> ChannelMask {
        self.inner.lock().service_samples(ready)
    }

    /// Stop playback
    pub fn stop(&self) {
        self.inner.lock().stop();
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.inner.lock().state()
    }

    /// Run a closure with exclusive access to the player
    pub fn with<R>(&self, f: impl FnOnce(&mut Player<'m, B, I>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Take the player back once every other handle is gone
    pub fn into_inner(self) -> Option<Player<'m, B, I>> {
        Arc::try_unwrap(self.inner).ok().map(Mutex::into_inner)
    }
}
