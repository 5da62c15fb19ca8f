//! Cartesian Module - point picking and hover snapping on a coordinate plane
//!
//! Two independent pieces:
//! - [`CartesianMachine`] runs the optional pick-point interaction. A click
//!   within tolerance of the target solves it for good. A miss shows a
//!   transient message and changes nothing else.
//! - [`hover_snap`] is a read-only affordance. It snaps the pointer to the
//!   nearest integer-x grid point whose function value is integral too.
//!
//! Device coordinates go through [`Projection`], whose inverse is computed
//! from the same scale and offset as the forward map.
//!
//! # Example
//!
//! ```ignore
//! use scrolly_engine::state::cartesian::{CartesianMachine, PickOutcome};
//! use scrolly_engine::types::Point;
//!
//! let mut machine = CartesianMachine::new();
//! let outcome = machine.click(&state, Point::new(1.3, 3.2), now, &config);
//! assert_eq!(outcome, PickOutcome::Hit);
//! ```

use std::time::Duration;

use crate::config::{EngineConfig, Viewport};
use crate::types::{CartesianState, Plot, Point};

use super::timer::OneShot;

// =============================================================================
// PROJECTION
// =============================================================================

/// A position in viewport (device) space. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

impl DevicePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Affine map between math space and device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    scale_x: f64,
    offset_x: f64,
    scale_y: f64,
    offset_y: f64,
}

impl Projection {
    /// Build the map for a domain and range drawn into `viewport`.
    ///
    /// Returns `None` for empty or inverted axes, or a viewport with no room
    /// inside its padding.
    pub fn new(domain: (f64, f64), range: (f64, f64), viewport: &Viewport) -> Option<Self> {
        let inner_w = viewport.width - 2.0 * viewport.padding;
        let inner_h = viewport.height - 2.0 * viewport.padding;
        if !(domain.0 < domain.1 && range.0 < range.1 && inner_w > 0.0 && inner_h > 0.0) {
            return None;
        }

        let scale_x = inner_w / (domain.1 - domain.0);
        let scale_y = inner_h / (range.1 - range.0);
        Some(Self {
            scale_x,
            offset_x: viewport.padding - domain.0 * scale_x,
            scale_y,
            offset_y: viewport.height - viewport.padding + range.0 * scale_y,
        })
    }

    pub fn for_state(state: &CartesianState, viewport: &Viewport) -> Option<Self> {
        Self::new(state.domain, state.range, viewport)
    }

    pub fn to_device(&self, point: Point) -> DevicePoint {
        DevicePoint::new(
            self.offset_x + point.x * self.scale_x,
            self.offset_y - point.y * self.scale_y,
        )
    }

    pub fn to_math(&self, device: DevicePoint) -> Point {
        Point::new(
            (device.x - self.offset_x) / self.scale_x,
            (self.offset_y - device.y) / self.scale_y,
        )
    }
}

// =============================================================================
// HOVER SNAP
// =============================================================================

/// A snapped grid point and the plot it lies on.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverPoint {
    pub point: Point,
    pub plot_index: usize,
    pub color: String,
}

/// Snap `at` to an integer point on one of `plots`.
///
/// The pointer must be within `hover_proximity` of an integer x inside the
/// domain and of the plot's value there, and that value must be integral
/// within `integer_epsilon`. First match in plot order wins.
pub fn hover_snap(
    plots: &[Plot],
    domain: (f64, f64),
    at: Point,
    config: &EngineConfig,
) -> Option<HoverPoint> {
    let snap_x = at.x.round();
    if (at.x - snap_x).abs() > config.hover_proximity || snap_x < domain.0 || snap_x > domain.1 {
        return None;
    }

    plots.iter().enumerate().find_map(|(plot_index, plot)| {
        let y = plot.eval(snap_x);
        let integral = (y - y.round()).abs() < config.integer_epsilon;
        if y.is_finite() && integral && (at.y - y).abs() <= config.hover_proximity {
            Some(HoverPoint {
                point: Point::new(snap_x, y.round()),
                plot_index,
                color: plot.color.clone(),
            })
        } else {
            None
        }
    })
}

// =============================================================================
// PICK-POINT MACHINE
// =============================================================================

/// Result of a click on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// No open interaction to click on.
    Ignored,
    Hit,
    Miss,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartesianMachine {
    solved: bool,
    miss: Option<OneShot>,
    hover: Option<HoverPoint>,
}

impl CartesianMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn is_missing(&self) -> bool {
        self.miss.is_some()
    }

    pub fn hover(&self) -> Option<&HoverPoint> {
        self.hover.as_ref()
    }

    /// Message to show: the success text once solved, the miss text while its
    /// window is open.
    pub fn feedback<'a>(&self, state: &'a CartesianState, config: &'a EngineConfig) -> Option<&'a str> {
        let interaction = state.interaction.as_ref()?;
        if self.solved {
            Some(&interaction.success_message)
        } else if self.miss.is_some() {
            Some(&config.miss_message)
        } else {
            None
        }
    }

    /// Handle a click already mapped into math space.
    pub fn click(
        &mut self,
        state: &CartesianState,
        at: Point,
        now: Duration,
        config: &EngineConfig,
    ) -> PickOutcome {
        let Some(interaction) = state.interaction.as_ref() else {
            return PickOutcome::Ignored;
        };
        if self.solved {
            return PickOutcome::Ignored;
        }

        let target = interaction.target;
        let distance = at.distance(target.point());
        if distance <= target.tolerance_or(config.default_pick_tolerance) {
            self.solved = true;
            self.miss = None;
            self.hover = None;
            tracing::debug!(x = at.x, y = at.y, "point pick solved");
            PickOutcome::Hit
        } else {
            // A newer miss replaces the older window entirely.
            self.miss = Some(OneShot::after(now, config.miss_message_window));
            tracing::trace!(x = at.x, y = at.y, distance, "point pick missed");
            PickOutcome::Miss
        }
    }

    /// Track the pointer for hover snapping. Returns true if the hover changed.
    pub fn pointer_move(&mut self, state: &CartesianState, at: Point, config: &EngineConfig) -> bool {
        let next = if state.show_hover_coordinates && !self.solved {
            hover_snap(&state.plots, state.domain, at, config)
        } else {
            None
        };
        let changed = next != self.hover;
        self.hover = next;
        changed
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.hover.take().is_some()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.miss.map(|timer| timer.due())
    }

    pub fn fire(&mut self, at: Duration) {
        if self.miss.is_some_and(|timer| timer.is_due(at)) {
            self.miss = None;
            tracing::trace!("miss message cleared");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PickPointInteraction, PickTarget};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn setup(tolerance: Option<f64>) -> (CartesianState, EngineConfig) {
        let state = CartesianState::new(vec![
            Plot::new("#2563eb", |x| 2.0 * x + 1.0),
            Plot::new("#dc2626", |x| -x + 4.0),
        ])
        .with_domain(-2.0, 6.0)
        .with_range(-2.0, 6.0)
        .with_hover_coordinates()
        .with_interaction(PickPointInteraction::new(
            PickTarget { x: 1.0, y: 3.0, tolerance },
            "That's the solution!",
        ));
        (state, EngineConfig::default())
    }

    #[test]
    fn test_projection_round_trip() {
        let viewport = Viewport::default();
        let projection = Projection::new((-2.0, 6.0), (-2.0, 6.0), &viewport).unwrap();

        let device = projection.to_device(Point::new(1.0, 3.0));
        let back = projection.to_math(device);
        assert!((back.x - 1.0).abs() < 1e-9);
        assert!((back.y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_projection_corners() {
        let viewport = Viewport::default();
        let projection = Projection::new((-10.0, 10.0), (-10.0, 10.0), &viewport).unwrap();

        assert_eq!(projection.to_device(Point::new(-10.0, -10.0)), DevicePoint::new(40.0, 560.0));
        assert_eq!(projection.to_device(Point::new(10.0, 10.0)), DevicePoint::new(560.0, 40.0));
        assert_eq!(projection.to_device(Point::new(0.0, 0.0)), DevicePoint::new(300.0, 300.0));
    }

    #[test]
    fn test_projection_degenerate() {
        let viewport = Viewport::default();
        assert!(Projection::new((1.0, 1.0), (0.0, 1.0), &viewport).is_none());
        assert!(Projection::new((0.0, 1.0), (2.0, -2.0), &viewport).is_none());
    }

    #[test]
    fn test_click_hit_and_miss() {
        let (state, config) = setup(Some(0.6));

        let mut machine = CartesianMachine::new();
        assert_eq!(machine.click(&state, Point::new(2.0, 3.0), ms(0), &config), PickOutcome::Miss);
        assert!(!machine.is_solved());
        assert_eq!(machine.feedback(&state, &config), Some("Not quite! Try again."));

        assert_eq!(machine.click(&state, Point::new(1.3, 3.2), ms(10), &config), PickOutcome::Hit);
        assert!(machine.is_solved());
        assert_eq!(machine.feedback(&state, &config), Some("That's the solution!"));
    }

    #[test]
    fn test_tolerance_boundary_inclusive() {
        let (state, config) = setup(Some(0.5));

        let mut machine = CartesianMachine::new();
        assert_eq!(machine.click(&state, Point::new(1.5, 3.0), ms(0), &config), PickOutcome::Hit);

        let mut machine = CartesianMachine::new();
        let just_over = 0.5 + 1e-9;
        assert_eq!(
            machine.click(&state, Point::new(1.0 + just_over, 3.0), ms(0), &config),
            PickOutcome::Miss
        );
    }

    #[test]
    fn test_default_tolerance() {
        let (state, config) = setup(None);
        let mut machine = CartesianMachine::new();
        assert_eq!(machine.click(&state, Point::new(1.4, 3.0), ms(0), &config), PickOutcome::Hit);
    }

    #[test]
    fn test_zero_tolerance_uses_default() {
        let (state, config) = setup(Some(0.0));
        let mut machine = CartesianMachine::new();
        assert_eq!(machine.click(&state, Point::new(1.2, 3.0), ms(0), &config), PickOutcome::Hit);

        let (state, config) = setup(Some(f64::NAN));
        let mut machine = CartesianMachine::new();
        assert_eq!(machine.click(&state, Point::new(1.6, 3.0), ms(0), &config), PickOutcome::Miss);
        assert_eq!(machine.click(&state, Point::new(1.4, 3.0), ms(0), &config), PickOutcome::Hit);
    }

    #[test]
    fn test_solved_ignores_clicks() {
        let (state, config) = setup(Some(0.6));
        let mut machine = CartesianMachine::new();
        machine.click(&state, Point::new(1.0, 3.0), ms(0), &config);

        assert_eq!(machine.click(&state, Point::new(5.0, 5.0), ms(10), &config), PickOutcome::Ignored);
        assert!(machine.is_solved());
        assert_eq!(machine.next_deadline(), None);
    }

    #[test]
    fn test_miss_window_clears() {
        let (state, config) = setup(Some(0.6));
        let mut machine = CartesianMachine::new();
        machine.click(&state, Point::new(4.0, 4.0), ms(0), &config);
        assert_eq!(machine.next_deadline(), Some(ms(2000)));

        machine.fire(ms(1999));
        assert!(machine.is_missing());
        machine.fire(ms(2000));
        assert!(!machine.is_missing());
        assert_eq!(machine.feedback(&state, &config), None);
    }

    #[test]
    fn test_second_miss_restarts_window() {
        let (state, config) = setup(Some(0.6));
        let mut machine = CartesianMachine::new();
        machine.click(&state, Point::new(4.0, 4.0), ms(0), &config);
        machine.click(&state, Point::new(4.0, 4.0), ms(1500), &config);

        machine.fire(ms(2000));
        assert!(machine.is_missing());
        assert_eq!(machine.next_deadline(), Some(ms(3500)));
    }

    #[test]
    fn test_no_interaction_ignores_click() {
        let state = CartesianState::new(vec![Plot::new("#000", |x| x)]);
        let config = EngineConfig::default();
        let mut machine = CartesianMachine::new();
        assert_eq!(machine.click(&state, Point::new(0.0, 0.0), ms(0), &config), PickOutcome::Ignored);
    }

    #[test]
    fn test_hover_snaps_to_integer_point() {
        let (state, config) = setup(None);

        let snapped = hover_snap(&state.plots, state.domain, Point::new(1.2, 3.1), &config).unwrap();
        assert_eq!(snapped.point, Point::new(1.0, 3.0));
        // Both lines pass through (1, 3); plot order wins
        assert_eq!(snapped.plot_index, 0);
    }

    #[test]
    fn test_hover_rejects_far_pointer() {
        let (state, config) = setup(None);
        assert!(hover_snap(&state.plots, state.domain, Point::new(1.5, 3.0), &config).is_none());
        assert!(hover_snap(&state.plots, state.domain, Point::new(1.0, 2.5), &config).is_none());
    }

    #[test]
    fn test_hover_requires_integral_value() {
        let plots = vec![Plot::new("#000", |x| x * 0.5)];
        let config = EngineConfig::default();
        assert!(hover_snap(&plots, (-10.0, 10.0), Point::new(1.0, 0.5), &config).is_none());
        assert!(hover_snap(&plots, (-10.0, 10.0), Point::new(2.0, 1.0), &config).is_some());
    }

    #[test]
    fn test_hover_outside_domain() {
        let (state, config) = setup(None);
        assert!(hover_snap(&state.plots, state.domain, Point::new(7.0, 15.0), &config).is_none());
    }

    #[test]
    fn test_hover_gated_and_cleared() {
        let (mut state, config) = setup(Some(0.6));
        let mut machine = CartesianMachine::new();

        assert!(machine.pointer_move(&state, Point::new(2.1, 2.0), &config));
        assert_eq!(machine.hover().map(|h| h.point), Some(Point::new(2.0, 2.0)));
        assert!(machine.pointer_leave());
        assert!(machine.hover().is_none());

        state.show_hover_coordinates = false;
        assert!(!machine.pointer_move(&state, Point::new(2.1, 2.0), &config));
        assert!(machine.hover().is_none());
    }

    #[test]
    fn test_hover_suppressed_once_solved() {
        let (state, config) = setup(Some(0.6));
        let mut machine = CartesianMachine::new();
        machine.click(&state, Point::new(1.0, 3.0), ms(0), &config);

        machine.pointer_move(&state, Point::new(2.0, 2.0), &config);
        assert!(machine.hover().is_none());
    }
}
