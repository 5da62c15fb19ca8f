//! Core types for scrolly-engine.
//!
//! Lessons, steps, and the declarative visual states a step shows.
//! These are pure data: nothing here owns a timer or mutable interaction
//! state. Live state is built from these values by [`crate::state`] and
//! thrown away when the active visual changes.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

// =============================================================================
// Lessons
// =============================================================================

/// Step id that hands the visual panel over to the lesson quiz.
pub const QUIZ_STEP_ID: &str = "quiz";

/// A complete scroll-driven lesson.
#[derive(Debug, Clone)]
pub struct LessonDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub steps: Vec<LessonStep>,
    pub quiz: QuizQuestion,
}

impl LessonDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        quiz: QuizQuestion,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            steps: Vec::new(),
            quiz,
        }
    }

    /// Append a step (builder style).
    pub fn with_step(mut self, step: LessonStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Find a step by id.
    pub fn step(&self, id: &str) -> Option<&LessonStep> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn first_step(&self) -> Option<&LessonStep> {
        self.steps.first()
    }
}

/// One scroll-addressable unit of prose paired with a visual state.
///
/// The visual state is reference counted: the engine resets live state when
/// the active `Rc` changes identity, not when its contents compare unequal.
#[derive(Debug, Clone)]
pub struct LessonStep {
    pub id: String,
    /// Opaque prose handed to the host as-is.
    pub content: String,
    pub visual_state: Rc<AnyVisualState>,
}

impl LessonStep {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        visual_state: impl Into<AnyVisualState>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            visual_state: Rc::new(visual_state.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<QuizOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizOption {
    pub id: u32,
    pub text: String,
    pub correct: bool,
    pub explanation: Option<String>,
}

impl QuizOption {
    pub fn new(id: u32, text: impl Into<String>, correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            correct,
            explanation: None,
        }
    }

    pub fn explained(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

// =============================================================================
// Visual State
// =============================================================================

/// Anything a step can show: one concrete state or a timed sequence of them.
#[derive(Debug, Clone)]
pub enum AnyVisualState {
    Single(VisualState),
    Sequence(SequenceState),
}

/// A concrete, non-sequence visual state.
#[derive(Debug, Clone)]
pub enum VisualState {
    Waveform(WaveformState),
    Cartesian(CartesianState),
    Algebra(AlgebraState),
    Sat(SatState),
}

/// Discriminant of [`VisualState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    Waveform,
    Cartesian,
    Algebra,
    Sat,
}

impl VisualKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VisualKind::Waveform => "waveform",
            VisualKind::Cartesian => "cartesian",
            VisualKind::Algebra => "algebra",
            VisualKind::Sat => "sat",
        }
    }
}

impl fmt::Display for VisualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl VisualState {
    pub fn kind(&self) -> VisualKind {
        match self {
            VisualState::Waveform(_) => VisualKind::Waveform,
            VisualState::Cartesian(_) => VisualKind::Cartesian,
            VisualState::Algebra(_) => VisualKind::Algebra,
            VisualState::Sat(_) => VisualKind::Sat,
        }
    }
}

impl From<VisualState> for AnyVisualState {
    fn from(state: VisualState) -> Self {
        AnyVisualState::Single(state)
    }
}

impl From<SequenceState> for AnyVisualState {
    fn from(state: SequenceState) -> Self {
        AnyVisualState::Sequence(state)
    }
}

macro_rules! impl_visual_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for VisualState {
                fn from(state: $ty) -> Self {
                    VisualState::$variant(state)
                }
            }

            impl From<$ty> for AnyVisualState {
                fn from(state: $ty) -> Self {
                    AnyVisualState::Single(VisualState::$variant(state))
                }
            }
        )*
    };
}

impl_visual_from! {
    WaveformState => Waveform,
    CartesianState => Cartesian,
    AlgebraState => Algebra,
    SatState => Sat,
}

// =============================================================================
// Sequence
// =============================================================================

/// A timed, ordered list of concrete states played back automatically.
///
/// An empty sequence is legal to build and renders nothing.
#[derive(Debug, Clone, Default)]
pub struct SequenceState {
    pub frames: Vec<SequenceFrame>,
}

impl SequenceState {
    pub fn new(frames: Vec<SequenceFrame>) -> Self {
        Self { frames }
    }

    pub fn durations(&self) -> Vec<Duration> {
        self.frames.iter().map(|frame| frame.duration).collect()
    }
}

/// One frame of a [`SequenceState`]. A zero duration holds forever.
#[derive(Debug, Clone)]
pub struct SequenceFrame {
    pub duration: Duration,
    pub state: VisualState,
}

impl SequenceFrame {
    pub fn new(duration: Duration, state: impl Into<VisualState>) -> Self {
        Self {
            duration,
            state: state.into(),
        }
    }

    /// Frame held for `ms` milliseconds.
    pub fn millis(ms: u64, state: impl Into<VisualState>) -> Self {
        Self::new(Duration::from_millis(ms), state)
    }
}

// =============================================================================
// Waveform
// =============================================================================

bitflags::bitflags! {
    /// Waveform display toggles.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WaveformFlags: u8 {
        const SHOW_TIME_AXIS = 1 << 0;
        const SHOW_DISPLACEMENT_AXIS = 1 << 1;
        const HIGHLIGHT_POINT = 1 << 2;
        const PLAYING = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformState {
    /// Normalized amplitude in `[0, 1]`.
    pub amplitude: f64,
    /// Cycles across the visible window, strictly positive.
    pub frequency: f64,
    pub flags: WaveformFlags,
}

impl WaveformState {
    pub fn new(amplitude: f64, frequency: f64) -> Self {
        Self {
            amplitude,
            frequency,
            flags: WaveformFlags::empty(),
        }
    }

    pub fn with_flags(mut self, flags: WaveformFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.flags.contains(WaveformFlags::PLAYING)
    }

    /// Frequency must be finite and positive, amplitude finite.
    pub fn is_well_formed(&self) -> bool {
        self.frequency.is_finite() && self.frequency > 0.0 && self.amplitude.is_finite()
    }

    pub fn clamped_amplitude(&self) -> f64 {
        self.amplitude.clamp(0.0, 1.0)
    }
}

// =============================================================================
// Cartesian
// =============================================================================

/// A point in math space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A plotted function `y = f(x)`.
#[derive(Clone)]
pub struct Plot {
    pub function: Rc<dyn Fn(f64) -> f64>,
    pub color: String,
    pub label: Option<String>,
    /// X coordinate the label is anchored at.
    pub label_x: Option<f64>,
    pub width: Option<f64>,
}

impl Plot {
    pub fn new(color: impl Into<String>, function: impl Fn(f64) -> f64 + 'static) -> Self {
        Self {
            function: Rc::new(function),
            color: color.into(),
            label: None,
            label_x: None,
            width: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>, label_x: f64) -> Self {
        self.label = Some(label.into());
        self.label_x = Some(label_x);
        self
    }

    pub fn eval(&self, x: f64) -> f64 {
        (self.function)(x)
    }
}

impl fmt::Debug for Plot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plot")
            .field("color", &self.color)
            .field("label", &self.label)
            .field("label_x", &self.label_x)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightPoint {
    pub at: Point,
    pub label: Option<String>,
    pub color: Option<String>,
    pub pulse: bool,
}

impl HighlightPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            at: Point::new(x, y),
            label: None,
            color: None,
            pulse: false,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Rise-over-run marker drawn at `x` on one plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeMarker {
    pub x: f64,
    pub plot_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickTarget {
    pub x: f64,
    pub y: f64,
    pub tolerance: Option<f64>,
}

impl PickTarget {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Tolerance to use for a click. Zero, negative or NaN falls back to `default`.
    pub fn tolerance_or(&self, default: f64) -> f64 {
        self.tolerance.filter(|t| *t > 0.0).unwrap_or(default)
    }
}

/// "Click the point" interaction overlaid on a cartesian plane.
#[derive(Debug, Clone, PartialEq)]
pub struct PickPointInteraction {
    pub target: PickTarget,
    pub success_message: String,
}

impl PickPointInteraction {
    pub fn new(target: PickTarget, success_message: impl Into<String>) -> Self {
        Self {
            target,
            success_message: success_message.into(),
        }
    }
}

/// Default visible interval for both axes.
pub const DEFAULT_AXIS: (f64, f64) = (-10.0, 10.0);

#[derive(Debug, Clone)]
pub struct CartesianState {
    pub plots: Vec<Plot>,
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub highlight_points: Vec<HighlightPoint>,
    pub show_slope_at: Option<SlopeMarker>,
    pub intro_animation: bool,
    pub show_hover_coordinates: bool,
    pub interaction: Option<PickPointInteraction>,
}

impl CartesianState {
    pub fn new(plots: Vec<Plot>) -> Self {
        Self {
            plots,
            domain: DEFAULT_AXIS,
            range: DEFAULT_AXIS,
            highlight_points: Vec::new(),
            show_slope_at: None,
            intro_animation: false,
            show_hover_coordinates: false,
            interaction: None,
        }
    }

    pub fn with_domain(mut self, lo: f64, hi: f64) -> Self {
        self.domain = (lo, hi);
        self
    }

    pub fn with_range(mut self, lo: f64, hi: f64) -> Self {
        self.range = (lo, hi);
        self
    }

    pub fn with_interaction(mut self, interaction: PickPointInteraction) -> Self {
        self.interaction = Some(interaction);
        self
    }

    pub fn with_highlight(mut self, point: HighlightPoint) -> Self {
        self.highlight_points.push(point);
        self
    }

    pub fn with_hover_coordinates(mut self) -> Self {
        self.show_hover_coordinates = true;
        self
    }

    /// Needs at least one plot and non-degenerate axes.
    pub fn is_renderable(&self) -> bool {
        !self.plots.is_empty() && self.domain.0 < self.domain.1 && self.range.0 < self.range.1
    }
}

// =============================================================================
// Algebra
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermAnimation {
    Pulse,
    FadeOut,
    SlideOutLeft,
    SlideInTop,
    FlyIn,
}

/// One token of an equation line.
#[derive(Debug, Clone, PartialEq)]
pub enum AlgebraTerm {
    Text {
        value: String,
        animation: Option<TermAnimation>,
    },
    Highlight {
        value: String,
        color: Option<String>,
        animation: Option<TermAnimation>,
    },
    Draggable {
        id: String,
        value: String,
        color: Option<String>,
    },
    DropTarget {
        id: String,
        /// Shown until something is dropped.
        placeholder: String,
        accepts: Vec<String>,
    },
    Input {
        id: String,
        correct_value: String,
        placeholder: Option<String>,
    },
}

impl AlgebraTerm {
    pub fn text(value: impl Into<String>) -> Self {
        AlgebraTerm::Text {
            value: value.into(),
            animation: None,
        }
    }

    pub fn highlight(value: impl Into<String>, color: impl Into<String>) -> Self {
        AlgebraTerm::Highlight {
            value: value.into(),
            color: Some(color.into()),
            animation: None,
        }
    }

    pub fn draggable(id: impl Into<String>, value: impl Into<String>) -> Self {
        AlgebraTerm::Draggable {
            id: id.into(),
            value: value.into(),
            color: None,
        }
    }

    pub fn drop_target(
        id: impl Into<String>,
        placeholder: impl Into<String>,
        accepts: &[&str],
    ) -> Self {
        AlgebraTerm::DropTarget {
            id: id.into(),
            placeholder: placeholder.into(),
            accepts: accepts.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn input(id: impl Into<String>, correct_value: impl Into<String>) -> Self {
        AlgebraTerm::Input {
            id: id.into(),
            correct_value: correct_value.into(),
            placeholder: None,
        }
    }

    /// Attach an animation tag to text or highlight terms; others are unchanged.
    pub fn animated(mut self, tag: TermAnimation) -> Self {
        match &mut self {
            AlgebraTerm::Text { animation, .. } | AlgebraTerm::Highlight { animation, .. } => {
                *animation = Some(tag);
            }
            _ => {}
        }
        self
    }

    /// True for a drop target whose accepted set contains `item`.
    pub fn accepts(&self, item: &str) -> bool {
        match self {
            AlgebraTerm::DropTarget { accepts, .. } => accepts.iter().any(|a| a == item),
            _ => false,
        }
    }
}

pub type EquationLine = Vec<AlgebraTerm>;

/// Inner auto-advancing frame of an [`AlgebraState`].
#[derive(Debug, Clone, PartialEq)]
pub struct AlgebraFrame {
    pub equations: Vec<EquationLine>,
    pub annotation: Option<String>,
    /// `None` falls back to the configured default hold.
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlgebraChoice {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
    pub feedback: Option<String>,
}

impl AlgebraChoice {
    pub fn new(id: impl Into<String>, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_correct,
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionKind {
    DragDrop,
    Choice(Vec<AlgebraChoice>),
    FillInput,
    CommandInput {
        correct_command: String,
        prompt: Option<String>,
    },
}

/// One node of an interaction chain.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSpec {
    pub kind: InteractionKind,
    pub title: Option<String>,
    /// Equations revealed once this node is solved.
    pub solved_equations: Option<Vec<EquationLine>>,
    pub success_annotation: Option<String>,
}

impl InteractionSpec {
    pub fn new(kind: InteractionKind) -> Self {
        Self {
            kind,
            title: None,
            solved_equations: None,
            success_annotation: None,
        }
    }

    pub fn drag_drop() -> Self {
        Self::new(InteractionKind::DragDrop)
    }

    pub fn fill_input() -> Self {
        Self::new(InteractionKind::FillInput)
    }

    pub fn choice(choices: Vec<AlgebraChoice>) -> Self {
        Self::new(InteractionKind::Choice(choices))
    }

    pub fn command(correct_command: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(InteractionKind::CommandInput {
            correct_command: correct_command.into(),
            prompt: Some(prompt.into()),
        })
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn solved(mut self, equations: Vec<EquationLine>) -> Self {
        self.solved_equations = Some(equations);
        self
    }

    pub fn success(mut self, annotation: impl Into<String>) -> Self {
        self.success_annotation = Some(annotation.into());
        self
    }
}

/// Ordered interaction nodes. Solving node `k` activates node `k + 1`.
///
/// Never empty: construction requires the first node.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionChain {
    steps: Vec<InteractionSpec>,
}

impl InteractionChain {
    pub fn new(first: InteractionSpec) -> Self {
        Self { steps: vec![first] }
    }

    /// Append the next node (builder style).
    pub fn then(mut self, next: InteractionSpec) -> Self {
        self.steps.push(next);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&InteractionSpec> {
        self.steps.get(index)
    }

    pub fn has_next(&self, index: usize) -> bool {
        index + 1 < self.steps.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractionSpec> {
        self.steps.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlgebraState {
    pub rich_equations: Vec<EquationLine>,
    pub annotation: Option<String>,
    pub sequence: Vec<AlgebraFrame>,
    pub interaction: Option<InteractionChain>,
}

impl AlgebraState {
    pub fn new(rich_equations: Vec<EquationLine>) -> Self {
        Self {
            rich_equations,
            ..Self::default()
        }
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_interaction(mut self, chain: InteractionChain) -> Self {
        self.interaction = Some(chain);
        self
    }

    pub fn with_sequence(mut self, frames: Vec<AlgebraFrame>) -> Self {
        self.sequence = frames;
        self
    }
}

// =============================================================================
// Word in Context (SAT)
// =============================================================================

/// Externally driven disclosure stage of the answer choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChoicesState {
    #[default]
    Initial,
    Revealed,
    FadingOut,
    Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SatLayout {
    #[default]
    Standard,
    Stacked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SatChoice {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
    pub feedback: Option<String>,
}

impl SatChoice {
    pub fn new(id: impl Into<String>, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_correct,
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// How the key word of the passage is presented. Exactly one applies.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WordEmphasis {
    #[default]
    Plain,
    /// `target` is replaced by a slot cycling through `words`.
    Cycling { target: String, words: Vec<String> },
    /// `placeholder` is replaced by a free-text field.
    Input {
        placeholder: String,
        instruction: Option<String>,
        /// Show the persisted value read-only instead of an editable field.
        as_static: bool,
    },
    Flashing(String),
    Obscured(String),
    Highlighted { word: String, first_only: bool },
}

impl WordEmphasis {
    /// The word this emphasis wraps, if any.
    pub fn word(&self) -> Option<&str> {
        match self {
            WordEmphasis::Plain => None,
            WordEmphasis::Cycling { target, .. } => Some(target),
            WordEmphasis::Input { placeholder, .. } => Some(placeholder),
            WordEmphasis::Flashing(word) | WordEmphasis::Obscured(word) => Some(word),
            WordEmphasis::Highlighted { word, .. } => Some(word),
        }
    }
}

/// A run of passage text, emphasized or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSegment<'a> {
    Plain(&'a str),
    Emphasized(&'a str),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SatState {
    pub text: String,
    pub emphasis: WordEmphasis,
    pub choices: Vec<SatChoice>,
    pub choices_state: ChoicesState,
    /// Choice flagged as the tempting wrong answer.
    pub warning_choice: Option<String>,
    pub layout: SatLayout,
    pub reveal_choices_on_input: bool,
    pub fade_second_line: bool,
    pub show_confetti: bool,
}

impl SatState {
    pub fn new(text: impl Into<String>, emphasis: WordEmphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
            ..Self::default()
        }
    }

    pub fn with_choices(mut self, choices: Vec<SatChoice>, state: ChoicesState) -> Self {
        self.choices = choices;
        self.choices_state = state;
        self
    }

    pub fn choice(&self, id: &str) -> Option<&SatChoice> {
        self.choices.iter().find(|choice| choice.id == id)
    }

    pub fn input_placeholder(&self) -> Option<&str> {
        match &self.emphasis {
            WordEmphasis::Input { placeholder, .. } => Some(placeholder),
            _ => None,
        }
    }

    /// Text the emphasis applies to: the first line when the second fades.
    pub fn working_text(&self) -> &str {
        if self.fade_second_line {
            if let Some((first, _)) = self.text.split_once('\n') {
                return first;
            }
        }
        &self.text
    }

    /// The faded second line, if the text has one and fading is on.
    pub fn second_line(&self) -> Option<&str> {
        if !self.fade_second_line {
            return None;
        }
        self.text
            .split_once('\n')
            .map(|(_, rest)| rest.split('\n').next().unwrap_or(rest))
    }

    /// Split the working text around the emphasized word.
    ///
    /// Only the first occurrence is wrapped, except for highlights that are
    /// not `first_only`. A word missing from the text leaves it plain.
    pub fn segments(&self) -> Vec<TextSegment<'_>> {
        let text = self.working_text();
        let Some(word) = self.emphasis.word().filter(|w| !w.is_empty()) else {
            return vec![TextSegment::Plain(text)];
        };

        let wrap_all = matches!(
            self.emphasis,
            WordEmphasis::Highlighted {
                first_only: false,
                ..
            }
        );

        let mut segments = Vec::new();
        let mut rest = text;
        while let Some(pos) = rest.find(word) {
            if pos > 0 {
                segments.push(TextSegment::Plain(&rest[..pos]));
            }
            segments.push(TextSegment::Emphasized(&rest[pos..pos + word.len()]));
            rest = &rest[pos + word.len()..];
            if !wrap_all {
                break;
            }
        }
        if !rest.is_empty() || segments.is_empty() {
            segments.push(TextSegment::Plain(rest));
        }
        segments
    }
}

// =============================================================================
// Tests
// =============================================================================
