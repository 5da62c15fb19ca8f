//! Algebra Module - guided derivation state machine
//!
//! Drives an [`AlgebraState`]'s interaction chain:
//!
//! ```text
//! Idle(k) --correct action--> Solved(k) --settle delay--> Idle(k + 1)
//!                                                    \--> Terminal   (no k + 1)
//! ```
//!
//! - **drag-drop**: a drop solves only when the target accepts the dragged id
//! - **command-input**: submission compares trimmed, lower-cased text
//! - **fill-input**: solves once every input term on screen is correct
//! - **choice**: selection only, never solves
//!
//! The chain is an arena (`InteractionChain`) plus a cursor, so moving on is
//! an index bump and a buffer wipe. Solving node `k` snapshots its solved
//! equations into the displayed lines before node `k + 1` takes over.
//!
//! The machine also plays the state's own inner frame sequence, using the
//! same rules as [`SequencePlayer`].

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::config::EngineConfig;
use crate::types::{AlgebraFrame, AlgebraState, AlgebraTerm, EquationLine, InteractionKind, InteractionSpec};

use super::keyboard::{KeyAction, KeyboardEvent};
use super::sequence::SequencePlayer;
use super::timer::{earliest, OneShot};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgebraPhase {
    /// Waiting for the learner on the node under the cursor.
    Idle,
    /// Correct action taken; the chain moves on when `settle` fires.
    Solved { settle: OneShot },
    /// Last node solved. Nothing else will happen.
    Terminal,
}

#[derive(Debug, Clone)]
pub struct AlgebraMachine {
    cursor: usize,
    phase: AlgebraPhase,
    frames: Option<SequencePlayer>,
    revealed: Option<Vec<EquationLine>>,
    revealed_annotation: Option<String>,
    dragged: Option<String>,
    command: String,
    command_error: bool,
    selected_choice: Option<String>,
    inputs: HashMap<String, String>,
    correct_inputs: HashSet<String>,
    /// The current node was solved by filling in every input.
    fill_solved: bool,
}

/// Lower-cased, trimmed form used to compare commands.
fn normalize_command(text: &str) -> String {
    text.trim().to_lowercase()
}

impl AlgebraMachine {
    pub fn new(state: &AlgebraState, now: Duration, config: &EngineConfig) -> Self {
        let holds = state
            .sequence
            .iter()
            .map(|frame| frame.duration.unwrap_or(config.default_algebra_frame))
            .collect();

        Self {
            cursor: 0,
            phase: AlgebraPhase::Idle,
            frames: SequencePlayer::new(holds, now),
            revealed: None,
            revealed_annotation: None,
            dragged: None,
            command: String::new(),
            command_error: false,
            selected_choice: None,
            inputs: HashMap::new(),
            correct_inputs: HashSet::new(),
            fill_solved: false,
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn phase(&self) -> AlgebraPhase {
        self.phase
    }

    /// Index of the active node in the interaction chain.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == AlgebraPhase::Terminal
    }

    /// Solved or terminal: learner input is locked.
    pub fn is_solved(&self) -> bool {
        self.phase != AlgebraPhase::Idle
    }

    /// Node under the cursor.
    pub fn interaction<'a>(&self, state: &'a AlgebraState) -> Option<&'a InteractionSpec> {
        state.interaction.as_ref()?.get(self.cursor)
    }

    fn current_frame<'a>(&self, state: &'a AlgebraState) -> Option<&'a AlgebraFrame> {
        let player = self.frames.as_ref()?;
        state.sequence.get(player.index())
    }

    /// Index of the live inner frame, when the state has a sequence.
    pub fn frame_index(&self) -> Option<usize> {
        self.frames.as_ref().map(|player| player.index())
    }

    /// Lines to show: revealed solution, else inner frame, else the state's own.
    pub fn equations<'a>(&'a self, state: &'a AlgebraState) -> &'a [EquationLine] {
        if let Some(lines) = &self.revealed {
            return lines;
        }
        if let Some(frame) = self.current_frame(state) {
            return &frame.equations;
        }
        &state.rich_equations
    }

    pub fn annotation<'a>(&'a self, state: &'a AlgebraState) -> Option<&'a str> {
        if let Some(annotation) = &self.revealed_annotation {
            return Some(annotation);
        }
        if let Some(frame) = self.current_frame(state) {
            return frame.annotation.as_deref();
        }
        state.annotation.as_deref()
    }

    /// Item currently being dragged.
    pub fn dragged(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    /// Draggables are live only while a drag-drop node is waiting.
    pub fn can_drag(&self, state: &AlgebraState) -> bool {
        self.phase == AlgebraPhase::Idle
            && matches!(
                self.interaction(state).map(|spec| &spec.kind),
                Some(InteractionKind::DragDrop)
            )
    }

    /// Drop affordance: lit only for targets that accept the in-flight item.
    pub fn is_accepting(&self, term: &AlgebraTerm) -> bool {
        self.phase == AlgebraPhase::Idle
            && self.dragged.as_deref().is_some_and(|item| term.accepts(item))
    }

    /// Ids of every displayed drop target whose affordance is lit.
    pub fn accepting_targets<'a>(&'a self, state: &'a AlgebraState) -> Vec<&'a str> {
        let mut targets = Vec::new();
        for term in self.equations_for(state) {
            if let AlgebraTerm::DropTarget { id, .. } = term {
                if self.is_accepting(term) {
                    targets.push(id.as_str());
                }
            }
        }
        targets
    }

    pub fn command_buffer(&self) -> &str {
        &self.command
    }

    pub fn command_error(&self) -> bool {
        self.command_error
    }

    pub fn selected_choice(&self) -> Option<&str> {
        self.selected_choice.as_deref()
    }

    pub fn input_value(&self, id: &str) -> Option<&str> {
        self.inputs.get(id).map(String::as_str)
    }

    /// True from a fill-input solve until the chain moves to another node.
    pub fn fill_solved(&self) -> bool {
        self.fill_solved
    }

    pub fn is_input_correct(&self, id: &str) -> bool {
        self.correct_inputs.contains(id)
    }

    /// True when there is nothing live: no buffers, no drag, no selection.
    pub fn buffers_empty(&self) -> bool {
        self.dragged.is_none()
            && self.command.is_empty()
            && !self.command_error
            && self.selected_choice.is_none()
            && self.inputs.is_empty()
            && self.correct_inputs.is_empty()
            && !self.fill_solved
    }

    /// True when every input term on screen holds its correct value.
    pub fn inputs_complete(&self, state: &AlgebraState) -> bool {
        let mut any = false;
        for term in self.equations_for(state) {
            if let AlgebraTerm::Input { id, .. } = term {
                any = true;
                if !self.correct_inputs.contains(id) {
                    return false;
                }
            }
        }
        any
    }

    fn equations_for<'a>(&'a self, state: &'a AlgebraState) -> impl Iterator<Item = &'a AlgebraTerm> {
        self.equations(state).iter().flatten()
    }

    fn active_kind<'a>(&self, state: &'a AlgebraState) -> Option<&'a InteractionKind> {
        if self.phase != AlgebraPhase::Idle {
            return None;
        }
        self.interaction(state).map(|spec| &spec.kind)
    }

    // =========================================================================
    // DRAG AND DROP
    // =========================================================================

    pub fn drag_start(&mut self, state: &AlgebraState, item: &str) -> bool {
        if !self.can_drag(state) {
            return false;
        }
        let exists = self
            .equations_for(state)
            .any(|term| matches!(term, AlgebraTerm::Draggable { id, .. } if id == item));
        if !exists {
            return false;
        }
        self.dragged = Some(item.to_string());
        true
    }

    pub fn drag_end(&mut self) -> bool {
        self.dragged.take().is_some()
    }

    /// Drop `item` on `target`. Rejected drops change nothing.
    pub fn drop(
        &mut self,
        state: &AlgebraState,
        target: &str,
        item: &str,
        now: Duration,
        config: &EngineConfig,
    ) -> bool {
        if !self.can_drag(state) {
            return false;
        }
        let accepted = self.equations_for(state).any(|term| {
            matches!(term, AlgebraTerm::DropTarget { id, .. } if id == target) && term.accepts(item)
        });
        if !accepted {
            tracing::trace!(target, item, "drop rejected");
            return false;
        }
        self.dragged = None;
        self.solve(now, config);
        true
    }

    // =========================================================================
    // COMMAND INPUT
    // =========================================================================

    fn command_active(&self, state: &AlgebraState) -> bool {
        matches!(self.active_kind(state), Some(InteractionKind::CommandInput { .. }))
    }

    /// Replace the command buffer. Clears the error flag.
    pub fn set_command(&mut self, state: &AlgebraState, text: &str) -> bool {
        if !self.command_active(state) {
            return false;
        }
        self.command = text.to_string();
        self.command_error = false;
        true
    }

    /// Check the buffer against the node's command.
    ///
    /// A mismatch raises the error flag and keeps the buffer for editing.
    pub fn submit_command(&mut self, state: &AlgebraState, now: Duration, config: &EngineConfig) -> bool {
        let Some(InteractionKind::CommandInput { correct_command, .. }) = self.active_kind(state) else {
            return false;
        };
        if normalize_command(&self.command) == normalize_command(correct_command) {
            self.command_error = false;
            self.solve(now, config);
        } else {
            tracing::trace!(command = %self.command, "command rejected");
            self.command_error = true;
        }
        true
    }

    pub fn key(
        &mut self,
        state: &AlgebraState,
        event: &KeyboardEvent,
        now: Duration,
        config: &EngineConfig,
    ) -> bool {
        if !self.command_active(state) {
            return false;
        }
        match event.action() {
            KeyAction::Insert(c) => {
                self.command.push(c);
                self.command_error = false;
                true
            }
            KeyAction::Delete => {
                self.command.pop();
                self.command_error = false;
                true
            }
            KeyAction::Submit => self.submit_command(state, now, config),
            KeyAction::Ignore => false,
        }
    }

    // =========================================================================
    // CHOICE AND FILL INPUT
    // =========================================================================

    /// Select an option. Re-selecting another is allowed; there is no un-select.
    pub fn select_choice(&mut self, state: &AlgebraState, id: &str) -> bool {
        let Some(InteractionKind::Choice(choices)) = self.active_kind(state) else {
            return false;
        };
        if !choices.iter().any(|choice| choice.id == id) {
            return false;
        }
        self.selected_choice = Some(id.to_string());
        true
    }

    /// Type into an input term. An exact match locks the input as correct.
    pub fn input(
        &mut self,
        state: &AlgebraState,
        id: &str,
        value: &str,
        now: Duration,
        config: &EngineConfig,
    ) -> bool {
        if self.phase != AlgebraPhase::Idle || self.correct_inputs.contains(id) {
            return false;
        }
        let correct = self.equations_for(state).find_map(|term| match term {
            AlgebraTerm::Input { id: term_id, correct_value, .. } if term_id == id => {
                Some(correct_value.clone())
            }
            _ => None,
        });
        let Some(correct) = correct else {
            return false;
        };

        self.inputs.insert(id.to_string(), value.to_string());
        if value == correct {
            self.correct_inputs.insert(id.to_string());
        }

        let fill_node = matches!(self.active_kind(state), Some(InteractionKind::FillInput));
        if fill_node && self.inputs_complete(state) {
            self.fill_solved = true;
            self.solve(now, config);
        }
        true
    }

    // =========================================================================
    // TIME
    // =========================================================================

    pub fn next_deadline(&self) -> Option<Duration> {
        let settle = match self.phase {
            AlgebraPhase::Solved { settle } => Some(settle.due()),
            _ => None,
        };
        earliest(self.frames.as_ref().and_then(SequencePlayer::next_deadline), settle)
    }

    /// Fire whatever is due at `at`.
    pub fn fire(&mut self, state: &AlgebraState, at: Duration) {
        if let Some(frames) = self.frames.as_mut() {
            frames.fire(at);
        }
        if let AlgebraPhase::Solved { settle } = self.phase {
            if settle.is_due(at) {
                self.settle(state);
            }
        }
    }

    fn solve(&mut self, now: Duration, config: &EngineConfig) {
        self.phase = AlgebraPhase::Solved {
            settle: OneShot::after(now, config.settle_delay),
        };
        tracing::debug!(cursor = self.cursor, "algebra interaction solved");
    }

    fn settle(&mut self, state: &AlgebraState) {
        let Some(chain) = state.interaction.as_ref() else {
            self.phase = AlgebraPhase::Terminal;
            return;
        };

        if let Some(spec) = chain.get(self.cursor) {
            if let Some(lines) = &spec.solved_equations {
                self.revealed = Some(lines.clone());
            }
            if let Some(annotation) = &spec.success_annotation {
                self.revealed_annotation = Some(annotation.clone());
            }
        }

        if chain.has_next(self.cursor) {
            self.cursor += 1;
            self.clear_buffers();
            self.phase = AlgebraPhase::Idle;
            tracing::debug!(cursor = self.cursor, "algebra chain advanced");
        } else {
            self.phase = AlgebraPhase::Terminal;
            tracing::debug!(cursor = self.cursor, "algebra chain terminal");
        }
    }

    fn clear_buffers(&mut self) {
        self.dragged = None;
        self.command.clear();
        self.command_error = false;
        self.selected_choice = None;
        self.inputs.clear();
        self.correct_inputs.clear();
        self.fill_solved = false;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlgebraChoice, InteractionChain};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn command_chain() -> AlgebraState {
        AlgebraState::new(vec![vec![AlgebraTerm::text("2x + 1 = -x + 4")]]).with_interaction(
            InteractionChain::new(
                InteractionSpec::command("+x", "group the x terms")
                    .solved(vec![vec![AlgebraTerm::text("3x + 1 = 4")]])
                    .success("Added x to both sides!"),
            )
            .then(
                InteractionSpec::command("-1", "isolate 3x")
                    .solved(vec![vec![AlgebraTerm::text("3x = 3")]])
                    .success("Subtracted 1 from both sides!"),
            )
            .then(
                InteractionSpec::command("/3", "find x")
                    .solved(vec![vec![AlgebraTerm::highlight("x = 1", "#bbf7d0")]])
                    .success("Solved for x!"),
            ),
        )
    }

    fn drag_state() -> AlgebraState {
        AlgebraState::new(vec![
            vec![
                AlgebraTerm::drop_target("target-1", "y", &["expr-2"]),
                AlgebraTerm::text(" = "),
                AlgebraTerm::draggable("expr-1", "2x + 1"),
            ],
            vec![
                AlgebraTerm::drop_target("target-2", "y", &["expr-1"]),
                AlgebraTerm::text(" = "),
                AlgebraTerm::draggable("expr-2", "-x + 4"),
            ],
        ])
        .with_interaction(InteractionChain::new(
            InteractionSpec::drag_drop()
                .solved(vec![vec![AlgebraTerm::text("2x + 1 = -x + 4")]])
                .success("Combined!"),
        ))
    }

    fn submit(machine: &mut AlgebraMachine, state: &AlgebraState, text: &str, now: Duration) {
        let config = EngineConfig::default();
        machine.set_command(state, text);
        machine.submit_command(state, now, &config);
    }

    fn settle_all(machine: &mut AlgebraMachine, state: &AlgebraState, now: Duration) {
        while let Some(due) = machine.next_deadline().filter(|due| *due <= now) {
            machine.fire(state, due);
        }
    }

    #[test]
    fn test_command_chain_reaches_terminal() {
        let config = EngineConfig::default();
        let state = command_chain();
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        submit(&mut machine, &state, "+x", ms(0));
        settle_all(&mut machine, &state, ms(800));
        assert_eq!(machine.cursor(), 1);
        assert_eq!(machine.equations(&state), &[vec![AlgebraTerm::text("3x + 1 = 4")]]);

        submit(&mut machine, &state, "-1", ms(1000));
        settle_all(&mut machine, &state, ms(1800));
        assert_eq!(machine.cursor(), 2);

        submit(&mut machine, &state, "/3", ms(2000));
        settle_all(&mut machine, &state, ms(2800));
        assert!(machine.is_terminal());
        assert_eq!(machine.annotation(&state), Some("Solved for x!"));
        assert_eq!(machine.next_deadline(), None);
    }

    #[test]
    fn test_wrong_command_sets_error() {
        let config = EngineConfig::default();
        let state = command_chain();
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        submit(&mut machine, &state, "/3", ms(0));
        assert_eq!(machine.cursor(), 0);
        assert_eq!(machine.phase(), AlgebraPhase::Idle);
        assert!(machine.command_error());
        assert_eq!(machine.command_buffer(), "/3");
        assert_eq!(machine.next_deadline(), None);
    }

    #[test]
    fn test_error_cleared_on_keystroke() {
        let config = EngineConfig::default();
        let state = command_chain();
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        submit(&mut machine, &state, "x", ms(0));
        assert!(machine.command_error());

        machine.key(&state, &KeyboardEvent::new("Backspace"), ms(10), &config);
        assert!(!machine.command_error());
        assert_eq!(machine.command_buffer(), "");
    }

    #[test]
    fn test_command_trimmed_and_case_insensitive() {
        let config = EngineConfig::default();
        let state = AlgebraState::default().with_interaction(InteractionChain::new(
            InteractionSpec::command("+5", "add five"),
        ));
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        submit(&mut machine, &state, " +5 ", ms(0));
        assert!(matches!(machine.phase(), AlgebraPhase::Solved { .. }));

        let state = AlgebraState::default().with_interaction(InteractionChain::new(
            InteractionSpec::command("/X", "divide"),
        ));
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);
        submit(&mut machine, &state, "/x", ms(0));
        assert!(machine.is_solved());
    }

    #[test]
    fn test_typing_via_keys_then_enter() {
        let config = EngineConfig::default();
        let state = command_chain();
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        for key in ["+", "x", "Enter"] {
            machine.key(&state, &KeyboardEvent::new(key), ms(0), &config);
        }
        assert!(machine.is_solved());
    }

    #[test]
    fn test_settle_delay_not_skipped() {
        let config = EngineConfig::default();
        let state = command_chain();
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        submit(&mut machine, &state, "+x", ms(100));
        settle_all(&mut machine, &state, ms(899));
        assert_eq!(machine.cursor(), 0);
        assert!(machine.is_solved());

        // Input is locked while settling
        assert!(!machine.set_command(&state, "-1"));

        settle_all(&mut machine, &state, ms(900));
        assert_eq!(machine.cursor(), 1);
        assert!(machine.buffers_empty());
    }

    #[test]
    fn test_drop_accepted() {
        let config = EngineConfig::default();
        let state = drag_state();
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        assert!(machine.drag_start(&state, "expr-2"));
        assert!(machine.drop(&state, "target-1", "expr-2", ms(0), &config));
        assert!(machine.is_solved());
        assert_eq!(machine.dragged(), None);

        settle_all(&mut machine, &state, ms(800));
        assert!(machine.is_terminal());
        assert_eq!(machine.annotation(&state), Some("Combined!"));
    }

    #[test]
    fn test_drop_rejected_is_noop() {
        let config = EngineConfig::default();
        let state = drag_state();
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        machine.drag_start(&state, "expr-1");
        assert!(!machine.drop(&state, "target-1", "expr-1", ms(0), &config));
        assert_eq!(machine.phase(), AlgebraPhase::Idle);
        assert_eq!(machine.next_deadline(), None);
    }

    #[test]
    fn test_affordance_only_for_accepting_targets() {
        let config = EngineConfig::default();
        let state = drag_state();
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        assert!(machine.accepting_targets(&state).is_empty());

        machine.drag_start(&state, "expr-1");
        assert_eq!(machine.accepting_targets(&state), vec!["target-2"]);

        machine.drag_end();
        assert!(machine.accepting_targets(&state).is_empty());
    }

    #[test]
    fn test_unknown_draggable_ignored() {
        let config = EngineConfig::default();
        let state = drag_state();
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        assert!(!machine.drag_start(&state, "expr-9"));
        assert_eq!(machine.dragged(), None);
    }

    #[test]
    fn test_choice_selection() {
        let config = EngineConfig::default();
        let state = AlgebraState::default().with_interaction(InteractionChain::new(
            InteractionSpec::choice(vec![
                AlgebraChoice::new("a", "x = 1", true).with_feedback("Yes"),
                AlgebraChoice::new("b", "x = 2", false),
            ]),
        ));
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        assert!(machine.select_choice(&state, "b"));
        assert_eq!(machine.selected_choice(), Some("b"));
        assert!(machine.select_choice(&state, "a"));
        assert_eq!(machine.selected_choice(), Some("a"));
        assert!(!machine.select_choice(&state, "z"));

        // Choices never gate progression
        assert_eq!(machine.phase(), AlgebraPhase::Idle);
        assert_eq!(machine.next_deadline(), None);
    }

    #[test]
    fn test_fill_input_solves_when_complete() {
        let config = EngineConfig::default();
        let state = AlgebraState::new(vec![vec![
            AlgebraTerm::text("3x = "),
            AlgebraTerm::input("rhs", "3"),
        ]])
        .with_interaction(InteractionChain::new(InteractionSpec::fill_input().success("Nice")));
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        assert!(machine.input(&state, "rhs", "4", ms(0), &config));
        assert!(!machine.is_input_correct("rhs"));
        assert_eq!(machine.phase(), AlgebraPhase::Idle);

        assert!(machine.input(&state, "rhs", "3", ms(0), &config));
        assert!(machine.is_input_correct("rhs"));
        assert!(machine.is_solved());
        assert!(machine.fill_solved());
    }

    #[test]
    fn test_fill_solved_survives_terminal() {
        let config = EngineConfig::default();
        let state = AlgebraState::new(vec![vec![
            AlgebraTerm::text("3x = "),
            AlgebraTerm::input("rhs", "3"),
        ]])
        .with_interaction(InteractionChain::new(
            InteractionSpec::fill_input().solved(vec![vec![AlgebraTerm::text("x = 1")]]),
        ));
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);
        machine.input(&state, "rhs", "3", ms(0), &config);

        settle_all(&mut machine, &state, ms(800));
        assert!(machine.is_terminal());
        assert!(!machine.inputs_complete(&state));
        assert!(machine.fill_solved());
    }

    #[test]
    fn test_fill_solved_cleared_on_next_node() {
        let config = EngineConfig::default();
        let state = AlgebraState::new(vec![vec![AlgebraTerm::input("rhs", "3")]]).with_interaction(
            InteractionChain::new(InteractionSpec::fill_input())
                .then(InteractionSpec::command("/3", "divide")),
        );
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);
        machine.input(&state, "rhs", "3", ms(0), &config);

        settle_all(&mut machine, &state, ms(800));
        assert_eq!(machine.cursor(), 1);
        assert!(!machine.fill_solved());
    }

    #[test]
    fn test_inner_sequence_default_hold() {
        let config = EngineConfig::default();
        let frame = |text: &str, duration: Option<Duration>| AlgebraFrame {
            equations: vec![vec![AlgebraTerm::text(text)]],
            annotation: None,
            duration,
        };
        let state = AlgebraState::default().with_sequence(vec![
            frame("x = 1", None),
            frame("y = 2(1) + 1", Some(ms(500))),
            frame("y = 3", None),
        ]);
        let mut machine = AlgebraMachine::new(&state, ms(0), &config);

        assert_eq!(machine.frame_index(), Some(0));
        assert_eq!(machine.next_deadline(), Some(ms(2000)));

        settle_all(&mut machine, &state, ms(2500));
        assert_eq!(machine.frame_index(), Some(2));
        assert_eq!(machine.equations(&state), &[vec![AlgebraTerm::text("y = 3")]]);
    }
}
