use crate::action::{Action, KeyBindings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Movement intent for one frame. All flags default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputFlags {
    /// Whether any flag is set.
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.jump
    }
}

/// Result of feeding one key event to `InputState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Pressed(Action),
    Released(Action),
    /// Press of a key that is already held, or release of one that is not.
    Repeat,
    /// Movement press dropped because the scene is paused.
    Ignored,
    Unbound,
    /// The caller should flip the scheduler's run state.
    TogglePause,
}

/// Tracks held keys and the pending one-shot jump.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    bindings: KeyBindings,
    held: BTreeSet<String>,
    jump_armed: bool,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: BTreeSet::new(),
            jump_armed: false,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Handle a key press.
    pub fn key_down(&mut self, code: &str, paused: bool) -> KeyOutcome {
        let Some(action) = self.bindings.action(code) else {
            return KeyOutcome::Unbound;
        };
        if action != Action::TogglePause && paused {
            return KeyOutcome::Ignored;
        }
        if !self.held.insert(code.to_string()) {
            return KeyOutcome::Repeat;
        }
        match action {
            Action::TogglePause => {
                tracing::debug!(code, "pause toggle requested");
                KeyOutcome::TogglePause
            }
            Action::Jump => {
                self.jump_armed = true;
                KeyOutcome::Pressed(action)
            }
            _ => KeyOutcome::Pressed(action),
        }
    }

    /// Handle a key release. Releases are honored while paused so a key let
    /// go during a pause does not stay stuck down afterwards.
    pub fn key_up(&mut self, code: &str) -> KeyOutcome {
        let Some(action) = self.bindings.action(code) else {
            return KeyOutcome::Unbound;
        };
        if self.held.remove(code) {
            KeyOutcome::Released(action)
        } else {
            KeyOutcome::Repeat
        }
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.jump_armed = false;
    }

    fn is_held(&self, action: Action) -> bool {
        self.bindings
            .keys_for(action)
            .any(|code| self.held.contains(code))
    }

    /// Current flags without consuming the pending jump.
    pub fn flags(&self) -> InputFlags {
        InputFlags {
            forward: self.is_held(Action::Forward),
            backward: self.is_held(Action::Backward),
            left: self.is_held(Action::Left),
            right: self.is_held(Action::Right),
            jump: self.jump_armed,
        }
    }

    /// Current flags; the pending jump is consumed.
    pub fn take_flags(&mut self) -> InputFlags {
        let flags = self.flags();
        self.jump_armed = false;
        flags
    }
}
