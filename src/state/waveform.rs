//! Waveform Module - playback phase for an animated waveform
//!
//! While a waveform is playing its phase offset advances with the clock:
//! `delta_seconds * frequency * waveform_speed` radians, wrapped to `[0, 2π)`.
//! A stopped waveform always reports phase zero.

use std::f64::consts::TAU;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::types::WaveformState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformClock {
    phase: f64,
    last: Duration,
}

impl WaveformClock {
    pub fn new(now: Duration) -> Self {
        Self { phase: 0.0, last: now }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Move the phase forward to `now`.
    pub fn advance_to(&mut self, state: &WaveformState, now: Duration, config: &EngineConfig) {
        let delta = now.saturating_sub(self.last);
        self.last = now;

        if !state.is_playing() || !state.is_well_formed() {
            self.phase = 0.0;
            return;
        }
        let step = delta.as_secs_f64() * state.frequency * config.waveform_speed;
        self.phase = (self.phase + step).rem_euclid(TAU);
    }
}
