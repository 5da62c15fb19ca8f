//! Engine configuration - timings, tolerances, viewport geometry
//!
//! Every constant the state machines depend on lives here so hosts can tune
//! pacing without touching machine code. `EngineConfig::default()` matches
//! the values lessons are authored against.

use std::time::Duration;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Pause after a correct action before the interaction chain moves on.
pub const SETTLE_DELAY: Duration = Duration::from_millis(800);

/// How long a missed point-pick message stays visible.
pub const MISS_MESSAGE_WINDOW: Duration = Duration::from_millis(2000);

/// Cycling word advance interval.
pub const CYCLE_INTERVAL: Duration = Duration::from_millis(1500);

/// Flashing word toggle interval.
pub const FLASH_INTERVAL: Duration = Duration::from_millis(400);

/// Hold time for an algebra inner frame that does not declare one.
pub const DEFAULT_ALGEBRA_FRAME: Duration = Duration::from_millis(2000);

/// Pick-point tolerance when the target does not declare one.
pub const DEFAULT_PICK_TOLERANCE: f64 = 0.5;

/// How close (in math units) the pointer must be for hover snapping.
pub const HOVER_PROXIMITY: f64 = 0.4;

/// Max distance from an integer for a function value to count as integral.
pub const INTEGER_EPSILON: f64 = 0.001;

pub const MISS_MESSAGE: &str = "Not quite! Try again.";
pub const FILL_INPUT_SUCCESS: &str = "Correct!";

// =============================================================================
// VIEWPORT
// =============================================================================

/// Device-space box a cartesian plane is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
            padding: 40.0,
        }
    }
}

// =============================================================================
// ACTIVATION BAND
// =============================================================================

/// Region of the viewport in which prose steps become active.
///
/// Margins are fractions of the viewport height measured from the top and
/// bottom edges. A step enters when the visible share of
/// `min(step height, band height)` inside the band reaches `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationBand {
    pub top_margin: f64,
    pub bottom_margin: f64,
    pub threshold: f64,
}

impl Default for ActivationBand {
    fn default() -> Self {
        Self {
            top_margin: 0.1,
            bottom_margin: 0.5,
            threshold: 0.5,
        }
    }
}

impl ActivationBand {
    /// Band bounds `(top, bottom)` in document coordinates.
    pub fn bounds(&self, scroll_top: f64, viewport_height: f64) -> (f64, f64) {
        (
            scroll_top + viewport_height * self.top_margin,
            scroll_top + viewport_height * (1.0 - self.bottom_margin),
        )
    }
}

// =============================================================================
// ENGINE CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub settle_delay: Duration,
    pub miss_message_window: Duration,
    pub cycle_interval: Duration,
    pub flash_interval: Duration,
    pub default_algebra_frame: Duration,
    pub default_pick_tolerance: f64,
    pub hover_proximity: f64,
    pub integer_epsilon: f64,
    /// Radians of waveform phase per second per hertz.
    pub waveform_speed: f64,
    pub miss_message: String,
    pub fill_input_success: String,
    pub viewport: Viewport,
    pub activation: ActivationBand,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay: SETTLE_DELAY,
            miss_message_window: MISS_MESSAGE_WINDOW,
            cycle_interval: CYCLE_INTERVAL,
            flash_interval: FLASH_INTERVAL,
            default_algebra_frame: DEFAULT_ALGEBRA_FRAME,
            default_pick_tolerance: DEFAULT_PICK_TOLERANCE,
            hover_proximity: HOVER_PROXIMITY,
            integer_epsilon: INTEGER_EPSILON,
            waveform_speed: 2.0,
            miss_message: MISS_MESSAGE.to_string(),
            fill_input_success: FILL_INPUT_SUCCESS.to_string(),
            viewport: Viewport::default(),
            activation: ActivationBand::default(),
        }
    }
}
