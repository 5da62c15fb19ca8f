//! Keyboard Module - key events for text-entry interactions
//!
//! Hosts translate their native key events into [`KeyboardEvent`] and pass
//! them to the visual stage. Only command-style text entry consumes them:
//! printable characters append, Backspace deletes, Enter submits.
//!
//! # Example
//!
//! ```ignore
//! use scrolly_engine::state::keyboard::{KeyboardEvent, KeyAction};
//!
//! assert_eq!(KeyboardEvent::new("Enter").action(), KeyAction::Submit);
//! assert_eq!(KeyboardEvent::new("x").action(), KeyAction::Insert('x'));
//! ```

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    /// Ctrl, Alt or Meta held: the key is a shortcut, not text.
    pub fn is_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "Backspace")
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

/// What a key does to a text buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Insert(char),
    Delete,
    Submit,
    Ignore,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }

    /// Map the event onto a text-buffer action.
    ///
    /// Repeats behave like presses; releases and shortcuts are ignored.
    pub fn action(&self) -> KeyAction {
        if self.state == KeyState::Release || self.modifiers.is_command() {
            return KeyAction::Ignore;
        }
        match self.key.as_str() {
            "Enter" => KeyAction::Submit,
            "Backspace" => KeyAction::Delete,
            key => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => KeyAction::Insert(c),
                    _ => KeyAction::Ignore,
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_submits() {
        assert_eq!(KeyboardEvent::new("Enter").action(), KeyAction::Submit);
    }

    #[test]
    fn test_backspace_deletes() {
        assert_eq!(KeyboardEvent::new("Backspace").action(), KeyAction::Delete);
    }

    #[test]
    fn test_printable_inserts() {
        assert_eq!(KeyboardEvent::new("+").action(), KeyAction::Insert('+'));
        assert_eq!(KeyboardEvent::new("X").action(), KeyAction::Insert('X'));
        assert_eq!(KeyboardEvent::new(" ").action(), KeyAction::Insert(' '));
    }

    #[test]
    fn test_named_keys_ignored() {
        assert_eq!(KeyboardEvent::new("ArrowUp").action(), KeyAction::Ignore);
        assert_eq!(KeyboardEvent::new("Tab").action(), KeyAction::Ignore);
    }

    #[test]
    fn test_release_ignored() {
        let event = KeyboardEvent {
            key: "a".to_string(),
            modifiers: Modifiers::default(),
            state: KeyState::Release,
        };
        assert_eq!(event.action(), KeyAction::Ignore);
    }

    #[test]
    fn test_repeat_inserts_like_press() {
        let pressed = KeyboardEvent::new("x");
        assert!(pressed.is_press());

        let repeated = KeyboardEvent {
            state: KeyState::Repeat,
            ..KeyboardEvent::new("x")
        };
        assert!(!repeated.is_press());
        assert_eq!(repeated.action(), KeyAction::Insert('x'));
    }

    #[test]
    fn test_shortcut_ignored() {
        let event = KeyboardEvent::with_modifiers("c", Modifiers::ctrl());
        assert_eq!(event.action(), KeyAction::Ignore);

        let shifted = KeyboardEvent::with_modifiers("C", Modifiers::shift());
        assert_eq!(shifted.action(), KeyAction::Insert('C'));
    }
}
