use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::math::Vec2;

/// Logical keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    ZoomIn,
    ZoomOut,
    Talk,
}

impl Key {
    /// Map a physical winit key to a logical key, if it is bound.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW => Some(Key::Up),
            KeyCode::KeyS => Some(Key::Down),
            KeyCode::KeyA => Some(Key::Left),
            KeyCode::KeyD => Some(Key::Right),
            KeyCode::Equal | KeyCode::NumpadAdd => Some(Key::ZoomIn),
            KeyCode::Minus | KeyCode::NumpadSubtract => Some(Key::ZoomOut),
            KeyCode::Space => Some(Key::Talk),
            _ => None,
        }
    }
}

/// Read-only view of input that systems consume during a tick.
///
/// Key state is maintained by an event collaborator outside tick boundaries
/// and only read here.
pub trait InputDevice {
    /// Returns true while the key is held.
    fn is_down(&self, key: Key) -> bool;

    /// Returns true only on the frame the key went down.
    fn was_pressed(&self, key: Key) -> bool;

    /// Last known pointer position in screen pixels.
    fn pointer(&self) -> Vec2;
}

/// Tracks keyboard and pointer state across frames.
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<Key>,
    keys_pressed: HashSet<Key>,
    pointer: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame pressed flags.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Handle a keyboard input event from winit.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.handle_key_code(code, event.state);
        }
    }

    /// Handle a physical key transition. Unbound keys are ignored.
    pub fn handle_key_code(&mut self, code: KeyCode, state: ElementState) {
        let Some(key) = Key::from_key_code(code) else {
            return;
        };
        match state {
            ElementState::Pressed => self.press(key),
            ElementState::Released => self.release(key),
        }
    }

    pub fn press(&mut self, key: Key) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.keys_down.remove(&key);
    }

    /// Handle pointer movement from winit.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        self.pointer = Vec2::new(x as f32, y as f32);
    }
}

impl InputDevice for InputState {
    fn is_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    fn was_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    fn pointer(&self) -> Vec2 {
        self.pointer
    }
}

/// One-dimensional axis built from keys checked in order.
///
/// Each held key overwrites the axis value, so when opposing keys are both
/// held the one listed last wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisBinding {
    pub steps: Vec<(Key, f32)>,
}

impl AxisBinding {
    pub fn new(steps: Vec<(Key, f32)>) -> Self {
        Self { steps }
    }

    /// Current axis value in [-1.0, 1.0].
    pub fn value(&self, input: &dyn InputDevice) -> f32 {
        let mut value = 0.0;
        for &(key, sign) in &self.steps {
            if input.is_down(key) {
                value = sign;
            }
        }
        clamp_axis(value)
    }
}

/// Movement bindings for both axes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub horizontal: AxisBinding,
    pub vertical: AxisBinding,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            horizontal: AxisBinding::new(vec![(Key::Right, 1.0), (Key::Left, -1.0)]),
            vertical: AxisBinding::new(vec![(Key::Up, -1.0), (Key::Down, 1.0)]),
        }
    }
}

impl KeyBindings {
    /// Sample the movement intent for this tick.
    pub fn sample_intent(&self, input: &dyn InputDevice) -> Vec2 {
        Vec2::new(self.horizontal.value(input), self.vertical.value(input))
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_keys_yields_zero_intent() {
        let input = InputState::new();
        assert_eq!(KeyBindings::default().sample_intent(&input), Vec2::ZERO);
    }

    #[test]
    fn opposing_keys_resolve_last_write_wins() {
        let mut input = InputState::new();
        input.press(Key::Up);
        input.press(Key::Down);
        input.press(Key::Left);
        input.press(Key::Right);

        let intent = KeyBindings::default().sample_intent(&input);
        assert_eq!(intent, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn out_of_range_bindings_are_clamped() {
        let mut input = InputState::new();
        input.press(Key::Right);
        let bindings = KeyBindings {
            horizontal: AxisBinding::new(vec![(Key::Right, 5.0)]),
            vertical: AxisBinding::new(vec![(Key::Right, f32::NAN)]),
        };

        assert_eq!(bindings.sample_intent(&input), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn pressed_flag_lasts_one_frame() {
        let mut input = InputState::new();
        input.handle_key_code(KeyCode::Equal, ElementState::Pressed);
        assert!(input.was_pressed(Key::ZoomIn));
        assert!(input.is_down(Key::ZoomIn));

        input.begin_frame();
        assert!(!input.was_pressed(Key::ZoomIn));
        assert!(input.is_down(Key::ZoomIn));

        input.handle_key_code(KeyCode::Equal, ElementState::Released);
        assert!(!input.is_down(Key::ZoomIn));
        assert!(!input.was_pressed(Key::ZoomIn));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut input = InputState::new();
        input.handle_key_code(KeyCode::KeyQ, ElementState::Pressed);
        assert_eq!(KeyBindings::default().sample_intent(&input), Vec2::ZERO);
    }
}
