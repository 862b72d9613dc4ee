use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named action that a key can be bound to.
///
/// Systems consume actions (via `InputFlags`), never raw key codes, so the
/// bindings can change without touching game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    /// Flip the scheduler between running and paused.
    TogglePause,
}

/// Maps DOM-style key codes (`"KeyW"`, `"Space"`, `"Escape"`) to actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    map: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind("KeyW", Action::Forward);
        bindings.bind("KeyS", Action::Backward);
        bindings.bind("KeyA", Action::Left);
        bindings.bind("KeyD", Action::Right);
        bindings.bind("Space", Action::Jump);
        bindings.bind("Escape", Action::TogglePause);
        bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Bind `code` to `action`, replacing any earlier binding for that key.
    pub fn bind(&mut self, code: impl Into<String>, action: Action) {
        self.map.insert(code.into(), action);
    }

    pub fn action(&self, code: &str) -> Option<Action> {
        self.map.get(code).copied()
    }

    /// Keys bound to `action`, in code order.
    pub fn keys_for(&self, action: Action) -> impl Iterator<Item = &str> + '_ {
        self.map
            .iter()
            .filter(move |(_, a)| **a == action)
            .map(|(code, _)| code.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Action)> + '_ {
        self.map.iter().map(|(code, action)| (code.as_str(), *action))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_are_wasd_space_escape() {
        let b = KeyBindings::default();
        assert_eq!(b.action("KeyW"), Some(Action::Forward));
        assert_eq!(b.action("KeyS"), Some(Action::Backward));
        assert_eq!(b.action("KeyA"), Some(Action::Left));
        assert_eq!(b.action("KeyD"), Some(Action::Right));
        assert_eq!(b.action("Space"), Some(Action::Jump));
        assert_eq!(b.action("Escape"), Some(Action::TogglePause));
        assert_eq!(b.action("KeyQ"), None);
        assert_eq!(b.len(), 6);
    }

    #[test]
    fn rebinding_replaces() {
        let mut b = KeyBindings::default();
        b.bind("ArrowUp", Action::Forward);
        b.bind("KeyW", Action::Jump);
        let forward: Vec<_> = b.keys_for(Action::Forward).collect();
        assert_eq!(forward, vec!["ArrowUp"]);
        assert_eq!(b.action("KeyW"), Some(Action::Jump));
    }

    #[test]
    fn bindings_deserialize_from_map() {
        let yaml = "KeyI: Forward\nKeyK: Backward\nKeyP: TogglePause\n";
        let b: KeyBindings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(b.action("KeyI"), Some(Action::Forward));
        assert_eq!(b.action("KeyP"), Some(Action::TogglePause));
        assert_eq!(b.action("KeyW"), None);
    }
}
