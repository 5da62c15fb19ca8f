//! Scroll Module - step activation from scroll position
//!
//! Each prose step registers its vertical extent. As the host reports scroll
//! position, a step *enters* when enough of it is inside the activation band
//! (a strip of the viewport between two margins). The most recently entered
//! step becomes active. Leaving the band never deactivates a step: only
//! another step's entry moves activity on.
//!
//! The active step id is published on a `spark_signals` signal so the lesson
//! engine can react to it without polling.
//!
//! # Example
//!
//! ```ignore
//! use scrolly_engine::state::scroll::{StepActivation, StepRegion};
//!
//! let mut activation = StepActivation::new(Some("intro".into()), band);
//! activation.register(StepRegion::new("intro", 0.0, 600.0));
//! activation.register(StepRegion::new("graph", 600.0, 600.0));
//!
//! let entered = activation.on_scroll(500.0, 800.0);
//! assert_eq!(entered, vec!["graph".to_string()]);
//! assert_eq!(activation.active_step().as_deref(), Some("graph"));
//! ```

use std::collections::HashSet;

use spark_signals::{signal, Signal};

use crate::config::ActivationBand;

// =============================================================================
// TYPES
// =============================================================================

/// Vertical extent of one step in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRegion {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl StepRegion {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Share of a region inside the band, relative to the smaller of the two.
///
/// Using the smaller extent lets a step taller than the band still reach 1.0.
pub fn visible_ratio(region: &StepRegion, band_top: f64, band_bottom: f64) -> f64 {
    let band_height = band_bottom - band_top;
    let basis = region.height.min(band_height);
    if basis <= 0.0 {
        return 0.0;
    }
    let overlap = region.bottom().min(band_bottom) - region.top.max(band_top);
    (overlap.max(0.0) / basis).min(1.0)
}

// =============================================================================
// STEP ACTIVATION
// =============================================================================

pub struct StepActivation {
    regions: Vec<StepRegion>,
    intersecting: HashSet<String>,
    band: ActivationBand,
    active: Signal<Option<String>>,
    last_scroll_top: Option<f64>,
}

impl StepActivation {
    pub fn new(initial: Option<String>, band: ActivationBand) -> Self {
        Self {
            regions: Vec::new(),
            intersecting: HashSet::new(),
            band,
            active: signal(initial),
            last_scroll_top: None,
        }
    }

    /// Register or move a step's region.
    pub fn register(&mut self, region: StepRegion) {
        match self.regions.iter_mut().find(|r| r.id == region.id) {
            Some(existing) => *existing = region,
            None => self.regions.push(region),
        }
    }

    pub fn regions(&self) -> &[StepRegion] {
        &self.regions
    }

    /// Signal carrying the active step id. Clones observe the same value.
    pub fn active_signal(&self) -> Signal<Option<String>> {
        self.active.clone()
    }

    pub fn active_step(&self) -> Option<String> {
        self.active.get()
    }

    /// A step entered the band: it becomes the active step.
    pub fn notify_entered(&mut self, id: &str) {
        self.intersecting.insert(id.to_string());
        if self.active.get().as_deref() == Some(id) {
            return;
        }
        tracing::debug!(step = id, "step entered");
        self.active.set(Some(id.to_string()));
    }

    /// A step left the band. Activity stays where it is.
    pub fn notify_exited(&mut self, id: &str) {
        self.intersecting.remove(id);
    }

    /// True while the step is inside the band.
    pub fn is_intersecting(&self, id: &str) -> bool {
        self.intersecting.contains(id)
    }

    /// Recompute intersections for a new scroll position.
    ///
    /// Returns the steps that entered, in scroll direction order; the last
    /// of them ends up active.
    pub fn on_scroll(&mut self, scroll_top: f64, viewport_height: f64) -> Vec<String> {
        let (band_top, band_bottom) = self.band.bounds(scroll_top, viewport_height);
        let scrolling_up = self.last_scroll_top.is_some_and(|last| scroll_top < last);
        self.last_scroll_top = Some(scroll_top);

        let mut now_inside: Vec<&StepRegion> = self
            .regions
            .iter()
            .filter(|region| visible_ratio(region, band_top, band_bottom) >= self.band.threshold)
            .collect();
        now_inside.sort_by(|a, b| a.top.total_cmp(&b.top));
        if scrolling_up {
            now_inside.reverse();
        }

        let inside: HashSet<String> = now_inside.iter().map(|r| r.id.clone()).collect();
        let entered: Vec<String> = now_inside
            .iter()
            .filter(|region| !self.intersecting.contains(&region.id))
            .map(|region| region.id.clone())
            .collect();
        let exited: Vec<String> = self
            .intersecting
            .iter()
            .filter(|id| !inside.contains(*id))
            .cloned()
            .collect();

        for id in &exited {
            self.notify_exited(id);
        }
        for id in &entered {
            self.notify_entered(id);
        }
        entered
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> StepActivation {
        let mut activation = StepActivation::new(Some("a".into()), ActivationBand::default());
        activation.register(StepRegion::new("a", 0.0, 400.0));
        activation.register(StepRegion::new("b", 400.0, 400.0));
        activation.register(StepRegion::new("c", 800.0, 400.0));
        activation
    }

    #[test]
    fn test_visible_ratio() {
        let region = StepRegion::new("a", 100.0, 200.0);
        assert_eq!(visible_ratio(&region, 0.0, 1000.0), 1.0);
        assert_eq!(visible_ratio(&region, 200.0, 1000.0), 0.5);
        assert_eq!(visible_ratio(&region, 400.0, 1000.0), 0.0);

        // Taller than the band: measured against the band
        let tall = StepRegion::new("t", 0.0, 5000.0);
        assert_eq!(visible_ratio(&tall, 100.0, 300.0), 1.0);
    }

    #[test]
    fn test_scroll_down_activates_next() {
        let mut activation = setup();
        // Band at 80..400 for a 800px viewport at the top
        activation.on_scroll(0.0, 800.0);
        assert_eq!(activation.active_step().as_deref(), Some("a"));

        // Band 480..800
        let entered = activation.on_scroll(400.0, 800.0);
        assert_eq!(entered, vec!["b".to_string()]);
        assert_eq!(activation.active_step().as_deref(), Some("b"));
    }

    #[test]
    fn test_exit_keeps_activity() {
        let mut activation = setup();
        activation.on_scroll(400.0, 800.0);
        assert_eq!(activation.active_step().as_deref(), Some("b"));

        // Scroll far past everything: nothing intersects, b stays active
        let entered = activation.on_scroll(5000.0, 800.0);
        assert!(entered.is_empty());
        assert!(!activation.is_intersecting("b"));
        assert_eq!(activation.active_step().as_deref(), Some("b"));
    }

    #[test]
    fn test_multiple_entries_follow_direction() {
        let mut activation = StepActivation::new(None, ActivationBand::default());
        activation.register(StepRegion::new("a", 0.0, 100.0));
        activation.register(StepRegion::new("b", 100.0, 100.0));

        // Band 0..400 covers both steps
        activation.on_scroll(-1000.0, 1000.0);
        let entered = activation.on_scroll(-100.0, 1000.0);
        assert_eq!(entered, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(activation.active_step().as_deref(), Some("b"));

        activation.on_scroll(5000.0, 1000.0);
        let entered = activation.on_scroll(-100.0, 1000.0);
        assert_eq!(entered, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(activation.active_step().as_deref(), Some("a"));
    }

    #[test]
    fn test_signal_shared() {
        let mut activation = setup();
        let active = activation.active_signal();
        activation.notify_entered("c");
        assert_eq!(active.get().as_deref(), Some("c"));
    }

    #[test]
    fn test_register_replaces_region() {
        let mut activation = setup();
        activation.register(StepRegion::new("b", 1000.0, 50.0));
        assert_eq!(activation.regions().len(), 3);
        assert_eq!(activation.regions()[1].top, 1000.0);
    }
}
