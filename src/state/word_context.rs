//! Word-in-Context Module - cycling and flashing words, staged choice disclosure
//!
//! A [`SatMachine`] is built from one [`SatState`] and owns its timers:
//! - a cycling word steps through its list every cycle interval, wrapping
//! - a flashing word toggles visibility every flash interval
//!
//! The choices' disclosure stage starts from the state's `choices_state` and
//! is normally driven by the author from step to step. Locally, the first
//! non-empty input can flip `Initial` to `Revealed` when the state asks for it.
//!
//! Typed input is kept in [`InputMemory`], keyed by the placeholder label and
//! shared by every step of the mounted lesson, so a later step can show what
//! the learner typed earlier.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::types::{ChoicesState, SatState, WordEmphasis};

use super::timer::{earliest, Blink, Interval};

// =============================================================================
// INPUT MEMORY
// =============================================================================

/// Learner input keyed by placeholder label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputMemory {
    values: HashMap<String, String>,
}

impl InputMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value, or the empty string.
    pub fn get(&self, placeholder: &str) -> &str {
        self.values.get(placeholder).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, placeholder: &str, value: &str) {
        self.values.insert(placeholder.to_string(), value.to_string());
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// =============================================================================
// MACHINE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Cycle {
    interval: Interval,
    index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SatMachine {
    cycle: Option<Cycle>,
    blink: Option<Blink>,
    choices_state: ChoicesState,
    selected: Option<String>,
    celebrate: bool,
}

impl SatMachine {
    pub fn new(state: &SatState, now: Duration, config: &EngineConfig) -> Self {
        let cycle = match &state.emphasis {
            WordEmphasis::Cycling { words, .. } if !words.is_empty() => {
                Interval::every(now, config.cycle_interval).map(|interval| Cycle { interval, index: 0 })
            }
            _ => None,
        };
        let blink = match &state.emphasis {
            WordEmphasis::Flashing(_) => Blink::new(now, config.flash_interval),
            _ => None,
        };

        Self {
            cycle,
            blink,
            choices_state: state.choices_state,
            selected: None,
            celebrate: state.show_confetti,
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Word currently shown in the cycling slot.
    pub fn cycling_word<'a>(&self, state: &'a SatState) -> Option<&'a str> {
        let WordEmphasis::Cycling { words, .. } = &state.emphasis else {
            return None;
        };
        if words.is_empty() {
            return None;
        }
        let index = self.cycle.as_ref().map_or(0, |cycle| cycle.index);
        Some(&words[index % words.len()])
    }

    /// Visibility phase of the flashing word. Always visible otherwise.
    pub fn flash_visible(&self) -> bool {
        self.blink.is_none_or(|blink| blink.visible())
    }

    pub fn choices_state(&self) -> ChoicesState {
        self.choices_state
    }

    pub fn choices_visible(&self) -> bool {
        self.choices_state != ChoicesState::Initial
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Feedback is shown for every choice in `Feedback`, and for the
    /// selected one in `Revealed`.
    pub fn show_feedback(&self, choice_id: &str) -> bool {
        match self.choices_state {
            ChoicesState::Feedback => true,
            ChoicesState::Revealed => self.selected.as_deref() == Some(choice_id),
            _ => false,
        }
    }

    pub fn celebrating(&self) -> bool {
        self.celebrate
    }

    /// Read and reset the celebration flag.
    pub fn take_celebrate(&mut self) -> bool {
        std::mem::take(&mut self.celebrate)
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Store typed text for the state's input placeholder.
    pub fn input(&mut self, state: &SatState, memory: &mut InputMemory, value: &str) -> bool {
        let WordEmphasis::Input { placeholder, as_static, .. } = &state.emphasis else {
            return false;
        };
        if *as_static {
            return false;
        }

        memory.set(placeholder, value);
        if state.reveal_choices_on_input
            && self.choices_state == ChoicesState::Initial
            && !value.is_empty()
        {
            self.choices_state = ChoicesState::Revealed;
            tracing::debug!(placeholder = %placeholder, "choices revealed by input");
        }
        true
    }

    /// Select a choice. Only accepted while the choices are visible.
    pub fn select_choice(&mut self, state: &SatState, id: &str) -> bool {
        if !self.choices_visible() {
            return false;
        }
        let Some(choice) = state.choice(id) else {
            return false;
        };
        self.selected = Some(choice.id.clone());
        if choice.is_correct {
            self.celebrate = true;
        }
        true
    }

    // =========================================================================
    // TIME
    // =========================================================================

    pub fn next_deadline(&self) -> Option<Duration> {
        earliest(
            self.cycle.as_ref().and_then(|cycle| cycle.interval.next_due()),
            self.blink.and_then(|blink| blink.next_deadline()),
        )
    }

    pub fn fire(&mut self, at: Duration) {
        if let Some(cycle) = self.cycle.as_mut() {
            if cycle.interval.fire(at) {
                cycle.index += 1;
                tracing::trace!(index = cycle.index, "cycling word advanced");
            }
        }
        if let Some(blink) = self.blink.as_mut() {
            blink.fire(at);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
