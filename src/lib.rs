//! # scrolly-engine
//!
//! Scrollytelling lesson engine.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! active step signal and the activation effect.
//!
//! ## Architecture
//!
//! A lesson is an ordered list of steps. Each step carries prose and one
//! declarative visual state. Scrolling (or explicit entry) activates a step,
//! the activation effect mounts its visual state, and the mounted stage owns
//! every live machine and timer for that visual:
//!
//! ```text
//! StepActivation → activeStepId signal → VisualStage → ResolvedVisual → Renderer
//! ```
//!
//! Time is virtual. Nothing fires until the host advances the engine clock.
//!
//! ## Modules
//!
//! - [`types`] - Lesson, step and visual state data
//! - [`config`] - Engine constants (delays, tolerances, activation band)
//! - [`state`] - Live machines: sequence, algebra, cartesian, SAT, waveform, scroll
//! - [`pipeline`] - Visual dispatcher and the mounted lesson engine
//! - [`engine`] - Lesson catalog and validation
//! - [`renderer`] - Renderer trait and the plain-text renderer
//! - [`lessons`] - Built-in lessons
//!
//! ```ignore
//! use scrolly_engine::{lessons, EngineConfig, Panel, Renderer, TextRenderer};
//! use std::time::Duration;
//!
//! let catalog = lessons::catalog()?;
//! let mut engine = catalog.open("sat-strategy", EngineConfig::default())?;
//! engine.enter_step("cover-up-strategy");
//! engine.advance(Duration::from_millis(1500));
//! println!("{}", engine.render(&TextRenderer::new()));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod lessons;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{ActivationBand, EngineConfig, Viewport};
pub use error::{LessonError, Result};

pub use engine::{validate_lesson, LessonCatalog};

pub use pipeline::{
    AlgebraView, CartesianView, LessonEngine, ResolvedVisual, SatView, VisualEvent, VisualStage,
    WaveformView,
};

pub use renderer::{Panel, Renderer, TextRenderer};

pub use state::{
    AlgebraMachine, AlgebraPhase, CartesianMachine, Clock, DevicePoint, HoverPoint, InputMemory,
    KeyAction, KeyState, KeyboardEvent, Modifiers, PickOutcome, Projection, SatMachine,
    SequencePlayer, StepActivation, StepRegion, WaveformClock,
};
