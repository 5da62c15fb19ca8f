//! State Module - Runtime state machines
//!
//! Everything here is live state built from a declarative visual state and
//! thrown away with it:
//!
//! - **Timer** - Virtual clock, one-shot and interval timers, blink phase
//! - **Sequence** - Timed frame advance for sequences
//! - **Algebra** - Drag-drop, command, choice and fill-input chains
//! - **Cartesian** - Point picking, hover snapping, device projection
//! - **Word Context** - Cycling/flashing words, choice disclosure, input memory
//! - **Waveform** - Playback phase
//! - **Keyboard** - Key events for command entry
//! - **Scroll** - Step activation from scroll position

pub mod algebra;
pub mod cartesian;
pub mod keyboard;
pub mod scroll;
pub mod sequence;
pub mod timer;
pub mod waveform;
pub mod word_context;

pub use algebra::{AlgebraMachine, AlgebraPhase};
pub use cartesian::{hover_snap, CartesianMachine, DevicePoint, HoverPoint, PickOutcome, Projection};
pub use keyboard::{KeyAction, KeyState, KeyboardEvent, Modifiers};
pub use scroll::{visible_ratio, StepActivation, StepRegion};
pub use sequence::SequencePlayer;
pub use timer::{earliest, Blink, Clock, Interval, OneShot};
pub use waveform::WaveformClock;
pub use word_context::{InputMemory, SatMachine};
