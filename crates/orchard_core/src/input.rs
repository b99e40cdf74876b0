//! Keyboard sampling.
//!
//! Movement reads level state: a `DirectionalInput` sampled from the held keys
//! once per fixed step. Host toggles (debug overlay, quit) read the press
//! edges, which live until the host calls `end_frame()`.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    W,
    A,
    S,
    D,
    Escape,
    F4,
}

/// The four directional press-states read by one simulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionalInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionalInput {
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub const RIGHT: Self = Self {
        right: true,
        ..Self::NONE
    };

    pub fn is_idle(self) -> bool {
        self == Self::NONE
    }
}

/// Polled once per fixed step for the current direction state.
pub trait InputSampler {
    fn sample(&self) -> DirectionalInput;
}

impl InputSampler for DirectionalInput {
    fn sample(&self) -> DirectionalInput {
        *self
    }
}

/// Keyboard state fed by host key events.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a transition. OS key repeat for an already-held key and a
    /// release for a key never pressed are both ignored.
    pub fn set_key(&mut self, key: Key, down: bool) {
        let changed = if down {
            self.held.insert(key)
        } else {
            self.held.remove(&key)
        };
        if !changed {
            return;
        }
        let edges = if down {
            &mut self.pressed
        } else {
            &mut self.released
        };
        edges.insert(key);
    }

    pub fn key_down(&mut self, key: Key) {
        self.set_key(key, true);
    }

    pub fn key_up(&mut self, key: Key) {
        self.set_key(key, false);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    /// Drops this frame's edges; held keys carry over.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

impl InputSampler for InputState {
    // Arrow keys and WASD steer the same way.
    fn sample(&self) -> DirectionalInput {
        DirectionalInput {
            up: self.is_held(Key::Up) || self.is_held(Key::W),
            down: self.is_held(Key::Down) || self.is_held(Key::S),
            left: self.is_held(Key::Left) || self.is_held(Key::A),
            right: self.is_held(Key::Right) || self.is_held(Key::D),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        assert!(input.is_held(Key::A));
        assert!(input.is_just_pressed(Key::A));
    }

    #[test]
    fn test_repeat_press_after_end_frame_is_not_a_new_edge() {
        let mut input = InputState::new();
        input.set_key(Key::F4, true);
        input.end_frame();
        input.set_key(Key::F4, true);
        assert!(input.is_held(Key::F4));
        assert!(!input.is_just_pressed(Key::F4));
    }

    #[test]
    fn test_key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_up(Key::A);
        assert!(!input.is_held(Key::A));
        assert!(input.is_just_released(Key::A));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::F4);
        assert!(!input.is_just_released(Key::F4));
        assert!(!input.is_held(Key::F4));
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.key_down(Key::F4);
        input.key_down(Key::D);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::F4));
        assert!(!input.is_just_pressed(Key::D));
        // Held state should persist across frames.
        assert!(input.is_held(Key::D));
    }

    #[test]
    fn test_sample_maps_arrows_and_wasd() {
        let mut input = InputState::new();
        assert!(input.sample().is_idle());

        input.key_down(Key::Right);
        input.key_down(Key::W);
        assert_eq!(
            input.sample(),
            DirectionalInput {
                up: true,
                right: true,
                ..DirectionalInput::NONE
            }
        );

        input.key_up(Key::Right);
        input.key_down(Key::A);
        let sampled = input.sample();
        assert!(sampled.left && sampled.up);
        assert!(!sampled.right && !sampled.down);
    }

    #[test]
    fn test_opposite_keys_are_both_reported() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::D);
        let sampled = input.sample();
        assert!(sampled.left && sampled.right);
    }
}
