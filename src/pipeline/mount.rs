//! Mount API - lesson lifecycle and the active-step effect.
//!
//! Mounting a lesson wires three things together:
//!
//! ```text
//! StepActivation ──activeStepId signal──> effect ──> VisualStage.activate()
//! ```
//!
//! The effect looks up the active step, hands its visual state to the stage
//! (a no-op when the same `Rc` is already live) and switches the panel to
//! the quiz for the reserved quiz id. Exiting stops the effect and drops
//! every live timer.
//!
//! # Example
//!
//! ```ignore
//! use scrolly_engine::pipeline::mount::LessonEngine;
//!
//! let mut engine = LessonEngine::mount(lesson, EngineConfig::default())?;
//!
//! engine.enter_step("graph");
//! engine.advance(Duration::from_millis(16));
//! let text = engine.render(&TextRenderer::new());
//!
//! engine.exit();
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use spark_signals::{effect, flush_sync};

use crate::config::EngineConfig;
use crate::engine::validate_lesson;
use crate::error::Result;
use crate::renderer::{Panel, Renderer};
use crate::state::scroll::{StepActivation, StepRegion};
use crate::state::timer::Clock;
use crate::types::{LessonDefinition, LessonStep, VisualKind, QUIZ_STEP_ID};

use super::dispatcher::{VisualEvent, VisualStage};

// =============================================================================
// Mounted State
// =============================================================================

/// State the active-step effect writes into.
#[derive(Debug)]
struct Mount {
    stage: VisualStage,
    quiz: bool,
}

/// Point the stage at whatever `active` names.
///
/// Unknown or missing ids fall back to the first step.
fn apply_active(lesson: &LessonDefinition, mount: &mut Mount, active: Option<&str>, now: Duration) {
    if active == Some(QUIZ_STEP_ID) {
        if !mount.quiz {
            mount.quiz = true;
            mount.stage.clear();
            tracing::debug!(lesson = %lesson.id, "quiz shown");
        }
        return;
    }
    mount.quiz = false;

    let step = active
        .and_then(|id| lesson.step(id))
        .or_else(|| lesson.first_step());
    match step {
        Some(step) => {
            if mount.stage.activate(&step.visual_state, now) {
                tracing::debug!(lesson = %lesson.id, step = %step.id, "step activated");
            }
        }
        None => mount.stage.clear(),
    }
}

// =============================================================================
// Lesson Engine
// =============================================================================

/// A mounted lesson.
///
/// Holds:
/// - the active-step effect's stop function
/// - the shared clock every timer is measured against
/// - step activation (scroll sync) and the visual stage
pub struct LessonEngine {
    lesson: Rc<LessonDefinition>,
    clock: Clock,
    activation: StepActivation,
    mount: Rc<RefCell<Mount>>,
    stop_effect: Option<Box<dyn FnOnce()>>,
}

impl LessonEngine {
    /// Mount a lesson. The first step starts active.
    pub fn mount(lesson: Rc<LessonDefinition>, config: EngineConfig) -> Result<Self> {
        validate_lesson(&lesson)?;

        let clock = Clock::new();
        let first = lesson.first_step().map(|step| step.id.clone());
        let activation = StepActivation::new(first, config.activation);
        let mount = Rc::new(RefCell::new(Mount {
            stage: VisualStage::new(config),
            quiz: false,
        }));

        // The ONE activation effect
        let active = activation.active_signal();
        let lesson_fx = Rc::clone(&lesson);
        let mount_fx = Rc::clone(&mount);
        let clock_fx = clock.clone();
        let stop_fn = effect(move || {
            let id = active.get();
            apply_active(&lesson_fx, &mut mount_fx.borrow_mut(), id.as_deref(), clock_fx.now());
        });
        flush_sync();

        tracing::debug!(lesson = %lesson.id, steps = lesson.steps.len(), "lesson mounted");

        Ok(Self {
            lesson,
            clock,
            activation,
            mount,
            stop_effect: Some(Box::new(stop_fn)),
        })
    }

    pub fn lesson(&self) -> &LessonDefinition {
        &self.lesson
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    // =========================================================================
    // Step activation
    // =========================================================================

    /// Raw active step id as last published.
    pub fn active_step_id(&self) -> Option<String> {
        self.activation.active_step()
    }

    /// Step whose visual is live. `None` while the quiz is shown.
    pub fn current_step(&self) -> Option<&LessonStep> {
        let active = self.activation.active_step();
        if active.as_deref() == Some(QUIZ_STEP_ID) {
            return None;
        }
        active
            .and_then(|id| self.lesson.step(&id))
            .or_else(|| self.lesson.first_step())
    }

    pub fn is_quiz(&self) -> bool {
        self.mount.borrow().quiz
    }

    /// A step entered the activation band.
    pub fn enter_step(&mut self, id: &str) {
        self.activation.notify_entered(id);
        flush_sync();
    }

    /// A step left the activation band. The active step does not change.
    pub fn exit_step(&mut self, id: &str) {
        self.activation.notify_exited(id);
    }

    pub fn register_step(&mut self, region: StepRegion) {
        self.activation.register(region);
    }

    /// Report a scroll position. Returns the steps that entered.
    pub fn scroll_to(&mut self, scroll_top: f64, viewport_height: f64) -> Vec<String> {
        let entered = self.activation.on_scroll(scroll_top, viewport_height);
        flush_sync();
        entered
    }

    // =========================================================================
    // Time and input
    // =========================================================================

    /// Move the clock forward and fire every timer that came due.
    pub fn advance(&mut self, delta: Duration) -> Duration {
        let now = self.clock.advance(delta);
        self.mount.borrow_mut().stage.advance_to(now);
        now
    }

    /// Deliver a learner event to the live visual.
    pub fn handle(&mut self, event: VisualEvent) -> bool {
        let now = self.clock.now();
        let mut mount = self.mount.borrow_mut();
        if mount.quiz {
            return false;
        }
        mount.stage.handle(event, now)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.mount.borrow().stage.next_deadline()
    }

    pub fn has_pending_timers(&self) -> bool {
        self.mount.borrow().stage.has_pending_timers()
    }

    pub fn frame_index(&self) -> Option<usize> {
        self.mount.borrow().stage.frame_index()
    }

    pub fn visual_kind(&self) -> Option<VisualKind> {
        self.mount.borrow().stage.kind()
    }

    /// Read and reset the one-shot celebration flag.
    pub fn take_celebrate(&mut self) -> bool {
        self.mount.borrow_mut().stage.take_celebrate()
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Borrow the resolved panel for the duration of `f`.
    pub fn with_panel<R>(&self, f: impl FnOnce(&Panel<'_>) -> R) -> R {
        let mount = self.mount.borrow();
        let panel = if mount.quiz {
            Panel::Quiz(&self.lesson.quiz)
        } else {
            let resolved = mount.stage.resolve();
            if resolved.is_nothing() {
                Panel::Empty
            } else {
                Panel::Visual(resolved)
            }
        };
        f(&panel)
    }

    pub fn render<R: Renderer>(&self, renderer: &R) -> R::Output {
        self.with_panel(|panel| renderer.render(panel))
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Stop the activation effect and drop all live state.
    pub fn exit(mut self) {
        self.shutdown();
        tracing::debug!(lesson = %self.lesson.id, "lesson exited");
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
        self.mount.borrow_mut().stage.teardown();
    }
}

impl Drop for LessonEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Tests
// =============================================================================
