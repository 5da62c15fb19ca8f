//! Visual Dispatcher - resolves the active visual state and owns its live state
//!
//! A [`VisualStage`] holds at most one mounted visual. Mounting is keyed on
//! the *identity* of the `Rc<AnyVisualState>`: handing the stage the same
//! `Rc` again changes nothing, a different one drops every live machine and
//! timer before the new ones are armed.
//!
//! ```text
//! Rc<AnyVisualState> --activate--> MountedVisual
//!                                    ├── SequencePlayer (sequences only)
//!                                    └── FrameMachine   (one per live frame)
//! ```
//!
//! When a sequence advances, the frame machine is rebuilt for the new frame.
//! Only [`InputMemory`] outlives frames; it lives as long as the stage.
//!
//! [`VisualStage::resolve`] collapses everything to one [`ResolvedVisual`]
//! for the renderer. Mis-shaped states resolve to `Nothing`.

use std::rc::Rc;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::state::algebra::{AlgebraMachine, AlgebraPhase};
use crate::state::cartesian::{CartesianMachine, DevicePoint, HoverPoint, PickOutcome, Projection};
use crate::state::keyboard::KeyboardEvent;
use crate::state::sequence::SequencePlayer;
use crate::state::timer::earliest;
use crate::state::waveform::WaveformClock;
use crate::state::word_context::{InputMemory, SatMachine};
use crate::types::{
    AlgebraState, AlgebraTerm, AnyVisualState, CartesianState, ChoicesState, EquationLine,
    InteractionSpec, Point, SatChoice, SatState, TextSegment, VisualKind, VisualState,
    WaveformState,
};

// =============================================================================
// EVENTS
// =============================================================================

/// Learner input routed to the live visual.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualEvent {
    /// Pointer moved over the plane, in device coordinates.
    PointerMove(DevicePoint),
    /// Pointer moved over the plane, already in math coordinates.
    HoverAt(Point),
    PointerLeave,
    /// Click on the plane, in device coordinates.
    Click(DevicePoint),
    /// Click on the plane, already in math coordinates.
    PickAt(Point),
    DragStart(String),
    DragEnd,
    Drop { target: String, item: String },
    /// Replace the command buffer.
    CommandChanged(String),
    SubmitCommand,
    Key(KeyboardEvent),
    /// Text typed into an algebra input term.
    FillInput { id: String, value: String },
    /// Text typed into the word-in-context field.
    WordInput(String),
    /// Choice picked in an algebra or word-in-context visual.
    SelectChoice(String),
}

// =============================================================================
// FRAME MACHINE
// =============================================================================

/// Live state for one concrete frame.
#[derive(Debug, Clone)]
enum FrameMachine {
    Waveform(WaveformClock),
    Cartesian(CartesianMachine),
    Algebra(AlgebraMachine),
    Sat(SatMachine),
}

impl FrameMachine {
    fn build(state: &VisualState, now: Duration, config: &EngineConfig) -> Self {
        match state {
            VisualState::Waveform(_) => FrameMachine::Waveform(WaveformClock::new(now)),
            VisualState::Cartesian(_) => FrameMachine::Cartesian(CartesianMachine::new()),
            VisualState::Algebra(algebra) => FrameMachine::Algebra(AlgebraMachine::new(algebra, now, config)),
            VisualState::Sat(sat) => FrameMachine::Sat(SatMachine::new(sat, now, config)),
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        match self {
            FrameMachine::Waveform(_) => None,
            FrameMachine::Cartesian(machine) => machine.next_deadline(),
            FrameMachine::Algebra(machine) => machine.next_deadline(),
            FrameMachine::Sat(machine) => machine.next_deadline(),
        }
    }

    fn fire(&mut self, state: &VisualState, at: Duration) {
        match (self, state) {
            (FrameMachine::Cartesian(machine), _) => machine.fire(at),
            (FrameMachine::Algebra(machine), VisualState::Algebra(algebra)) => machine.fire(algebra, at),
            (FrameMachine::Sat(machine), _) => machine.fire(at),
            _ => {}
        }
    }
}

// =============================================================================
// MOUNTED VISUAL
// =============================================================================

#[derive(Debug)]
struct MountedVisual {
    source: Rc<AnyVisualState>,
    player: Option<SequencePlayer>,
    machine: Option<FrameMachine>,
}

/// Concrete state for the live frame, if there is one.
fn frame_state<'a>(source: &'a AnyVisualState, player: Option<&SequencePlayer>) -> Option<&'a VisualState> {
    match source {
        AnyVisualState::Single(state) => Some(state),
        AnyVisualState::Sequence(sequence) => {
            let index = player?.index();
            sequence.frames.get(index).map(|frame| &frame.state)
        }
    }
}

impl MountedVisual {
    fn new(source: Rc<AnyVisualState>, now: Duration, config: &EngineConfig) -> Self {
        let player = match &*source {
            AnyVisualState::Sequence(sequence) => SequencePlayer::new(sequence.durations(), now),
            AnyVisualState::Single(_) => None,
        };
        let mut mounted = Self {
            source,
            player,
            machine: None,
        };
        mounted.rebuild(now, config);
        mounted
    }

    fn state(&self) -> Option<&VisualState> {
        frame_state(&self.source, self.player.as_ref())
    }

    fn rebuild(&mut self, now: Duration, config: &EngineConfig) {
        self.machine = frame_state(&self.source, self.player.as_ref())
            .map(|state| FrameMachine::build(state, now, config));
    }

    fn next_deadline(&self) -> Option<Duration> {
        earliest(
            self.player.as_ref().and_then(SequencePlayer::next_deadline),
            self.machine.as_ref().and_then(FrameMachine::next_deadline),
        )
    }

    fn fire(&mut self, at: Duration, config: &EngineConfig) {
        // A frame change drops the old frame's machine before arming the new one.
        if self.player.as_mut().is_some_and(|player| player.fire(at)) {
            self.rebuild(at, config);
            return;
        }
        let state = frame_state(&self.source, self.player.as_ref());
        if let (Some(machine), Some(state)) = (self.machine.as_mut(), state) {
            machine.fire(state, at);
        }
    }
}

// =============================================================================
// VISUAL STAGE
// =============================================================================

#[derive(Debug)]
pub struct VisualStage {
    config: EngineConfig,
    mounted: Option<MountedVisual>,
    memory: InputMemory,
}

impl VisualStage {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            mounted: None,
            memory: InputMemory::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn memory(&self) -> &InputMemory {
        &self.memory
    }

    /// Mount `source` unless it is already the mounted visual.
    ///
    /// Returns true when live state was rebuilt.
    pub fn activate(&mut self, source: &Rc<AnyVisualState>, now: Duration) -> bool {
        if self.is_active(source) {
            return false;
        }
        // Old timers go with the old machine before new ones are armed.
        self.mounted = None;
        let mounted = MountedVisual::new(Rc::clone(source), now, &self.config);
        tracing::debug!(
            kind = mounted.state().map(|state| state.kind().as_str()).unwrap_or("none"),
            sequence = mounted.player.is_some(),
            "visual activated"
        );
        self.mounted = Some(mounted);
        true
    }

    pub fn is_active(&self, source: &Rc<AnyVisualState>) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|mounted| Rc::ptr_eq(&mounted.source, source))
    }

    pub fn active_source(&self) -> Option<&Rc<AnyVisualState>> {
        self.mounted.as_ref().map(|mounted| &mounted.source)
    }

    /// Unmount the visual. Persisted input survives.
    pub fn clear(&mut self) {
        if self.mounted.take().is_some() {
            tracing::debug!("visual cleared");
        }
    }

    /// Unmount the visual and forget persisted input.
    pub fn teardown(&mut self) {
        self.mounted = None;
        self.memory.clear();
    }

    /// Kind of the live frame.
    pub fn kind(&self) -> Option<VisualKind> {
        self.mounted.as_ref()?.state().map(VisualState::kind)
    }

    /// Index of the live sequence frame, for sequences.
    pub fn frame_index(&self) -> Option<usize> {
        self.mounted.as_ref()?.player.as_ref().map(SequencePlayer::index)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.mounted.as_ref()?.next_deadline()
    }

    pub fn has_pending_timers(&self) -> bool {
        self.next_deadline().is_some()
    }

    /// Fire every timer due up to `now`, earliest first.
    pub fn advance_to(&mut self, now: Duration) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        while let Some(due) = mounted.next_deadline().filter(|due| *due <= now) {
            tracing::trace!(due_ms = due.as_millis() as u64, "timer fired");
            mounted.fire(due, &self.config);
        }

        let state = frame_state(&mounted.source, mounted.player.as_ref());
        if let (Some(FrameMachine::Waveform(clock)), Some(VisualState::Waveform(waveform))) =
            (mounted.machine.as_mut(), state)
        {
            clock.advance_to(waveform, now, &self.config);
        }
    }

    /// Read and reset the word-in-context celebration flag.
    pub fn take_celebrate(&mut self) -> bool {
        match self.mounted.as_mut().and_then(|mounted| mounted.machine.as_mut()) {
            Some(FrameMachine::Sat(machine)) => machine.take_celebrate(),
            _ => false,
        }
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Route an event to the live machine. Returns true if it was consumed.
    pub fn handle(&mut self, event: VisualEvent, now: Duration) -> bool {
        let Some(mounted) = self.mounted.as_mut() else {
            return false;
        };
        let config = &self.config;
        let state = frame_state(&mounted.source, mounted.player.as_ref());
        let (Some(machine), Some(state)) = (mounted.machine.as_mut(), state) else {
            return false;
        };

        match (machine, state) {
            (FrameMachine::Cartesian(machine), VisualState::Cartesian(cartesian)) => {
                handle_cartesian(machine, cartesian, event, now, config)
            }
            (FrameMachine::Algebra(machine), VisualState::Algebra(algebra)) => {
                handle_algebra(machine, algebra, event, now, config)
            }
            (FrameMachine::Sat(machine), VisualState::Sat(sat)) => match event {
                VisualEvent::WordInput(value) => machine.input(sat, &mut self.memory, &value),
                VisualEvent::SelectChoice(id) => machine.select_choice(sat, &id),
                _ => false,
            },
            _ => false,
        }
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    /// Collapse the mounted visual to the one concrete frame to draw.
    pub fn resolve(&self) -> ResolvedVisual<'_> {
        let Some(mounted) = self.mounted.as_ref() else {
            return ResolvedVisual::Nothing;
        };
        let (Some(machine), Some(state)) = (mounted.machine.as_ref(), mounted.state()) else {
            return ResolvedVisual::Nothing;
        };

        match (machine, state) {
            (FrameMachine::Waveform(clock), VisualState::Waveform(waveform)) => {
                if !waveform.is_well_formed() {
                    return ResolvedVisual::Nothing;
                }
                ResolvedVisual::Waveform(WaveformView {
                    state: waveform,
                    amplitude: waveform.clamped_amplitude(),
                    phase: clock.phase(),
                })
            }
            (FrameMachine::Cartesian(machine), VisualState::Cartesian(cartesian)) => {
                let projection = Projection::for_state(cartesian, &self.config.viewport);
                match projection {
                    Some(projection) if cartesian.is_renderable() => ResolvedVisual::Cartesian(CartesianView {
                        state: cartesian,
                        projection,
                        hover: machine.hover(),
                        solved: machine.is_solved(),
                        feedback: machine.feedback(cartesian, &self.config),
                    }),
                    _ => ResolvedVisual::Nothing,
                }
            }
            (FrameMachine::Algebra(machine), VisualState::Algebra(algebra)) => {
                ResolvedVisual::Algebra(AlgebraView {
                    state: algebra,
                    machine,
                    success_text: &self.config.fill_input_success,
                })
            }
            (FrameMachine::Sat(machine), VisualState::Sat(sat)) => ResolvedVisual::Sat(SatView {
                state: sat,
                machine,
                input_value: sat
                    .input_placeholder()
                    .map(|placeholder| self.memory.get(placeholder))
                    .unwrap_or(""),
            }),
            _ => ResolvedVisual::Nothing,
        }
    }
}

fn handle_cartesian(
    machine: &mut CartesianMachine,
    state: &CartesianState,
    event: VisualEvent,
    now: Duration,
    config: &EngineConfig,
) -> bool {
    let to_math = |device: DevicePoint| Projection::for_state(state, &config.viewport).map(|p| p.to_math(device));
    match event {
        VisualEvent::PointerMove(device) => match to_math(device) {
            Some(at) => machine.pointer_move(state, at, config),
            None => false,
        },
        VisualEvent::HoverAt(at) => machine.pointer_move(state, at, config),
        VisualEvent::PointerLeave => machine.pointer_leave(),
        VisualEvent::Click(device) => match to_math(device) {
            Some(at) => machine.click(state, at, now, config) != PickOutcome::Ignored,
            None => false,
        },
        VisualEvent::PickAt(at) => machine.click(state, at, now, config) != PickOutcome::Ignored,
        _ => false,
    }
}

fn handle_algebra(
    machine: &mut AlgebraMachine,
    state: &AlgebraState,
    event: VisualEvent,
    now: Duration,
    config: &EngineConfig,
) -> bool {
    match event {
        VisualEvent::DragStart(item) => machine.drag_start(state, &item),
        VisualEvent::DragEnd => machine.drag_end(),
        VisualEvent::Drop { target, item } => machine.drop(state, &target, &item, now, config),
        VisualEvent::CommandChanged(text) => machine.set_command(state, &text),
        VisualEvent::SubmitCommand => machine.submit_command(state, now, config),
        VisualEvent::Key(key) => machine.key(state, &key, now, config),
        VisualEvent::FillInput { id, value } => machine.input(state, &id, &value, now, config),
        VisualEvent::SelectChoice(id) => machine.select_choice(state, &id),
        _ => false,
    }
}

// =============================================================================
// RESOLVED VIEWS
// =============================================================================

/// Exactly one concrete frame, with the live state a renderer needs.
#[derive(Debug)]
pub enum ResolvedVisual<'a> {
    Nothing,
    Waveform(WaveformView<'a>),
    Cartesian(CartesianView<'a>),
    Algebra(AlgebraView<'a>),
    Sat(SatView<'a>),
}

impl ResolvedVisual<'_> {
    pub fn kind(&self) -> Option<VisualKind> {
        match self {
            ResolvedVisual::Nothing => None,
            ResolvedVisual::Waveform(_) => Some(VisualKind::Waveform),
            ResolvedVisual::Cartesian(_) => Some(VisualKind::Cartesian),
            ResolvedVisual::Algebra(_) => Some(VisualKind::Algebra),
            ResolvedVisual::Sat(_) => Some(VisualKind::Sat),
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, ResolvedVisual::Nothing)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WaveformView<'a> {
    pub state: &'a WaveformState,
    pub amplitude: f64,
    pub phase: f64,
}

#[derive(Debug, Clone)]
pub struct CartesianView<'a> {
    pub state: &'a CartesianState,
    pub projection: Projection,
    pub hover: Option<&'a HoverPoint>,
    pub solved: bool,
    pub feedback: Option<&'a str>,
}

impl CartesianView<'_> {
    /// Persistent marker drawn on the target once the pick is solved.
    pub fn success_marker(&self) -> Option<Point> {
        if !self.solved {
            return None;
        }
        self.state.interaction.as_ref().map(|interaction| interaction.target.point())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AlgebraView<'a> {
    pub state: &'a AlgebraState,
    pub machine: &'a AlgebraMachine,
    success_text: &'a str,
}

impl<'a> AlgebraView<'a> {
    pub fn equations(&self) -> &'a [EquationLine] {
        self.machine.equations(self.state)
    }

    pub fn annotation(&self) -> Option<&'a str> {
        self.machine.annotation(self.state)
    }

    pub fn interaction(&self) -> Option<&'a InteractionSpec> {
        self.machine.interaction(self.state)
    }

    pub fn phase(&self) -> AlgebraPhase {
        self.machine.phase()
    }

    /// Drop affordance for one term.
    pub fn is_accepting(&self, term: &AlgebraTerm) -> bool {
        self.machine.is_accepting(term)
    }

    pub fn can_drag(&self) -> bool {
        self.machine.can_drag(self.state)
    }

    /// Message shown once a fill-input node is solved. It stays through
    /// `Terminal`, after the input terms are gone from the displayed lines.
    pub fn fill_input_message(&self) -> Option<&'a str> {
        self.machine.fill_solved().then_some(self.success_text)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SatView<'a> {
    pub state: &'a SatState,
    pub machine: &'a SatMachine,
    /// Persisted text for the state's input placeholder.
    pub input_value: &'a str,
}

impl<'a> SatView<'a> {
    pub fn segments(&self) -> Vec<TextSegment<'a>> {
        self.state.segments()
    }

    pub fn cycling_word(&self) -> Option<&'a str> {
        self.machine.cycling_word(self.state)
    }

    pub fn flash_visible(&self) -> bool {
        self.machine.flash_visible()
    }

    pub fn choices_state(&self) -> ChoicesState {
        self.machine.choices_state()
    }

    /// Choices on screen, empty while still hidden.
    pub fn visible_choices(&self) -> &'a [SatChoice] {
        if self.machine.choices_visible() {
            &self.state.choices
        } else {
            &[]
        }
    }

    pub fn selected(&self) -> Option<&'a str> {
        self.machine.selected()
    }

    pub fn show_feedback(&self, choice_id: &str) -> bool {
        self.machine.show_feedback(choice_id)
    }

    pub fn is_warning(&self, choice_id: &str) -> bool {
        self.state.warning_choice.as_deref() == Some(choice_id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
