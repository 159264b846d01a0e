//! The event object handed to listeners.
//!
//! Events are deliberately small: a target with a `value` (and a checked
//! flag for checkbox-style inputs) plus the key that triggered keyboard
//! dispatch. Collaborators that need more context close over it instead.

/// The element state observed at dispatch time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventTarget {
    pub value: String,
    pub checked: bool,
}

/// Which key triggered a keyboard event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Enter,
    Escape,
    Other(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    pub target: EventTarget,
    pub key: Option<KeyCode>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain activation event (click, change, blur, ...).
    pub fn simple() -> Self {
        Self::default()
    }

    /// An input-style event carrying the target's current value.
    pub fn input(value: impl Into<String>) -> Self {
        Self {
            target: EventTarget {
                value: value.into(),
                checked: false,
            },
            key: None,
        }
    }

    /// A keyboard event with the target's current value.
    pub fn keydown(key: KeyCode, value: impl Into<String>) -> Self {
        Self {
            target: EventTarget {
                value: value.into(),
                checked: false,
            },
            key: Some(key),
        }
    }

    pub fn value(&self) -> &str {
        &self.target.value
    }

    pub fn is_key(&self, key: &KeyCode) -> bool {
        self.key.as_ref() == Some(key)
    }
}
