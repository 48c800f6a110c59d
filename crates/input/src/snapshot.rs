use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Pointer buttons the controllers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Keyboard keys the controllers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    A,
    D,
    W,
    S,
}

/// Immutable view of input state for a single frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Pointer position in screen pixels, origin top-left.
    pub pointer_position: Vec2,
    /// Pointer movement since the previous frame, y grows upward.
    pub pointer_delta: Vec2,
    /// Vertical scroll this frame; positive scrolls away from the user.
    pub scroll: f32,
    buttons_held: BTreeSet<PointerButton>,
    buttons_pressed: BTreeSet<PointerButton>,
    keys_held: BTreeSet<Key>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, button: PointerButton) -> bool {
        self.buttons_held.contains(&button)
    }

    /// True only on the frame the button went down.
    pub fn was_pressed(&self, button: PointerButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.keys_held.contains(&key)
    }

    /// True if any of `keys` is held.
    pub fn any_key_held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.keys_held.contains(k))
    }

    pub fn with_pointer_at(mut self, position: Vec2) -> Self {
        self.pointer_position = position;
        self
    }

    pub fn with_pointer_delta(mut self, delta: Vec2) -> Self {
        self.pointer_delta = delta;
        self
    }

    pub fn with_scroll(mut self, scroll: f32) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_held(mut self, button: PointerButton) -> Self {
        self.buttons_held.insert(button);
        self
    }

    /// Marks the button as pressed this frame (and therefore held).
    pub fn with_pressed(mut self, button: PointerButton) -> Self {
        self.buttons_pressed.insert(button);
        self.buttons_held.insert(button);
        self
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.keys_held.insert(key);
        self
    }

    pub(crate) fn from_parts(
        pointer_position: Vec2,
        pointer_delta: Vec2,
        scroll: f32,
        buttons_held: BTreeSet<PointerButton>,
        buttons_pressed: BTreeSet<PointerButton>,
        keys_held: BTreeSet<Key>,
    ) -> Self {
        Self {
            pointer_position,
            pointer_delta,
            scroll,
            buttons_held,
            buttons_pressed,
            keys_held,
        }
    }
}
