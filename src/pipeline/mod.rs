//! Lesson Pipeline
//!
//! Connects scroll-driven step activation to the live visual.
//!
//! # Pipeline Architecture
//!
//! ```text
//! scroll / enter → activeStepId signal → activation effect → VisualStage → Panel → Renderer
//! ```
//!
//! ## Data Flow
//!
//! 1. **StepActivation** - publishes the most recently entered step id
//! 2. **activation effect** - looks up the step and mounts its visual state
//! 3. **VisualStage** - owns live machines and timers, resolves one frame
//! 4. **Renderer** - pure function of the resolved panel
//!
//! ## Key Design Principles
//!
//! - **Identity resets**: a new `Rc<AnyVisualState>` rebuilds live state, the same one never does
//! - **Teardown before arm**: old timers are dropped before new ones exist
//! - **Virtual time**: timers only fire when the host advances the clock

pub mod dispatcher;
pub mod mount;

// Re-exports
pub use dispatcher::{
    AlgebraView, CartesianView, ResolvedVisual, SatView, VisualEvent, VisualStage, WaveformView,
};
pub use mount::LessonEngine;
