use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::snapshot::{InputSnapshot, Key, PointerButton};

/// A raw device event as delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawInput {
    /// Absolute pointer position in screen pixels, origin top-left.
    PointerMoved { x: f32, y: f32 },
    Button { button: PointerButton, pressed: bool },
    Key { key: Key, pressed: bool },
    /// Scroll wheel lines; positive scrolls away from the user.
    Scroll { lines: f32 },
}

/// Accumulates [`RawInput`] events between frames.
///
/// Call [`InputCollector::snapshot`] once per frame after feeding all events,
/// then [`InputCollector::end_frame`] to reset the per-frame accumulators.
#[derive(Debug, Default)]
pub struct InputCollector {
    pointer_position: Vec2,
    pointer_delta: Vec2,
    scroll: f32,
    buttons_held: BTreeSet<PointerButton>,
    buttons_pressed: BTreeSet<PointerButton>,
    keys_held: BTreeSet<Key>,
    has_pointer: bool,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, event: RawInput) {
        match event {
            RawInput::PointerMoved { x, y } => {
                let position = Vec2::new(x, y);
                if self.has_pointer {
                    let d = position - self.pointer_position;
                    // Screen y grows downward; deltas report upward motion as positive.
                    self.pointer_delta += Vec2::new(d.x, -d.y);
                }
                self.pointer_position = position;
                self.has_pointer = true;
            }
            RawInput::Button { button, pressed } => {
                if pressed {
                    if self.buttons_held.insert(button) {
                        self.buttons_pressed.insert(button);
                    }
                } else {
                    self.buttons_held.remove(&button);
                }
            }
            RawInput::Key { key, pressed } => {
                if pressed {
                    self.keys_held.insert(key);
                } else {
                    self.keys_held.remove(&key);
                }
            }
            RawInput::Scroll { lines } => {
                self.scroll += lines;
            }
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::from_parts(
            self.pointer_position,
            self.pointer_delta,
            self.scroll,
            self.buttons_held.clone(),
            self.buttons_pressed.clone(),
            self.keys_held.clone(),
        )
    }

    pub fn end_frame(&mut self) {
        self.pointer_delta = Vec2::ZERO;
        self.scroll = 0.0;
        self.buttons_pressed.clear();
        tracing::trace!(held = self.buttons_held.len(), "input frame closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_for_one_frame() {
        let mut c = InputCollector::new();
        c.process(RawInput::Button {
            button: PointerButton::Primary,
            pressed: true,
        });
        let first = c.snapshot();
        assert!(first.was_pressed(PointerButton::Primary));
        c.end_frame();

        let second = c.snapshot();
        assert!(!second.was_pressed(PointerButton::Primary));
        assert!(second.is_held(PointerButton::Primary));
    }

    #[test]
    fn repeated_press_while_held_is_not_a_new_press() {
        let mut c = InputCollector::new();
        let down = RawInput::Button {
            button: PointerButton::Primary,
            pressed: true,
        };
        c.process(down);
        c.end_frame();
        c.process(down);
        assert!(!c.snapshot().was_pressed(PointerButton::Primary));
    }

    #[test]
    fn release_clears_held() {
        let mut c = InputCollector::new();
        c.process(RawInput::Button {
            button: PointerButton::Middle,
            pressed: true,
        });
        c.process(RawInput::Button {
            button: PointerButton::Middle,
            pressed: false,
        });
        let s = c.snapshot();
        assert!(!s.is_held(PointerButton::Middle));
        // The press still happened this frame.
        assert!(s.was_pressed(PointerButton::Middle));
    }

    #[test]
    fn pointer_delta_accumulates_and_flips_y() {
        let mut c = InputCollector::new();
        c.process(RawInput::PointerMoved { x: 100.0, y: 100.0 });
        // First sample only establishes the position.
        assert_eq!(c.snapshot().pointer_delta, Vec2::ZERO);
        c.process(RawInput::PointerMoved { x: 110.0, y: 95.0 });
        c.process(RawInput::PointerMoved { x: 115.0, y: 90.0 });
        let s = c.snapshot();
        assert_eq!(s.pointer_delta, Vec2::new(15.0, 10.0));
        assert_eq!(s.pointer_position, Vec2::new(115.0, 90.0));

        c.end_frame();
        assert_eq!(c.snapshot().pointer_delta, Vec2::ZERO);
        assert_eq!(c.snapshot().pointer_position, Vec2::new(115.0, 90.0));
    }

    #[test]
    fn scroll_resets_each_frame() {
        let mut c = InputCollector::new();
        c.process(RawInput::Scroll { lines: 1.0 });
        c.process(RawInput::Scroll { lines: 2.0 });
        assert_eq!(c.snapshot().scroll, 3.0);
        c.end_frame();
        assert_eq!(c.snapshot().scroll, 0.0);
    }

    #[test]
    fn keys_track_held_state() {
        let mut c = InputCollector::new();
        c.process(RawInput::Key {
            key: Key::W,
            pressed: true,
        });
        c.end_frame();
        assert!(c.snapshot().is_key_held(Key::W));
        c.process(RawInput::Key {
            key: Key::W,
            pressed: false,
        });
        assert!(!c.snapshot().is_key_held(Key::W));
    }
}
