//! Sequence Player - timed frame advance
//!
//! Tracks which frame of a timed sequence is live:
//! - starts at frame 0
//! - a frame with a non-zero hold that is not last arms one timer
//! - on fire the index moves forward by exactly one and the next timer arms
//! - a zero hold, or the last frame, holds forever
//!
//! No looping, no going back, no skipping. Re-activation is modelled by
//! building a fresh player, which drops the pending timer with the old one.

use std::time::Duration;

use super::timer::OneShot;

#[derive(Debug, Clone, PartialEq)]
pub struct SequencePlayer {
    holds: Vec<Duration>,
    index: usize,
    timer: Option<OneShot>,
}

impl SequencePlayer {
    /// Start a player at `now`. An empty sequence has nothing to play.
    pub fn new(holds: Vec<Duration>, now: Duration) -> Option<Self> {
        if holds.is_empty() {
            return None;
        }
        let mut player = Self {
            holds,
            index: 0,
            timer: None,
        };
        player.arm(now);
        Some(player)
    }

    /// Index of the live frame.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.holds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holds.is_empty()
    }

    /// True once the player has reached a frame it will never leave.
    pub fn is_holding(&self) -> bool {
        self.timer.is_none()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timer.map(|timer| timer.due())
    }

    /// Advance one frame if the pending timer is due at `at`.
    pub fn fire(&mut self, at: Duration) -> bool {
        match self.timer {
            Some(timer) if timer.is_due(at) => {
                self.index += 1;
                self.arm(timer.due());
                tracing::trace!(index = self.index, "sequence frame advanced");
                true
            }
            _ => false,
        }
    }

    /// Fire every timer due up to `now`. Returns how many frames advanced.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        let mut advanced = 0;
        while let Some(due) = self.next_deadline().filter(|due| *due <= now) {
            if !self.fire(due) {
                break;
            }
            advanced += 1;
        }
        advanced
    }

    fn arm(&mut self, now: Duration) {
        let is_last = self.index + 1 >= self.holds.len();
        let hold = self.holds[self.index];
        // A hold that runs past the end of representable time never ends.
        self.timer = if is_last || hold.is_zero() {
            None
        } else {
            OneShot::checked_after(now, hold)
        };
    }
}
