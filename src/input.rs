use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::grid::Dir;

/// Logical keys the game understands. Hosts map their raw key codes onto
/// these; anything else is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Confirm,
}

impl Key {
    /// WASD for movement, space or F for fire.
    pub fn from_char(c: char) -> Option<Key> {
        match c.to_ascii_lowercase() {
            'w' => Some(Key::Up),
            's' => Some(Key::Down),
            'a' => Some(Key::Left),
            'd' => Some(Key::Right),
            ' ' | 'f' => Some(Key::Fire),
            _ => None,
        }
    }
}

/// Which keys are held at the start of a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl InputState {
    pub fn set(&mut self, key: Key, held: bool) {
        match key {
            Key::Up => self.up = held,
            Key::Down => self.down = held,
            Key::Left => self.left = held,
            Key::Right => self.right = held,
            Key::Fire => self.fire = held,
            Key::Confirm => {}
        }
    }

    pub fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.set(key, false);
    }

    /// The movement request, resolved up > down > left > right.
    pub fn direction(&self) -> Option<Dir> {
        if self.up {
            Some(Dir::Up)
        } else if self.down {
            Some(Dir::Down)
        } else if self.left {
            Some(Dir::Left)
        } else if self.right {
            Some(Dir::Right)
        } else {
            None
        }
    }
}

/// Turns a stream of key events into held-key snapshots.
///
/// Terminals with keyboard enhancement report releases and a key is held
/// until released. Classic terminals only repeat presses, so a key also
/// counts as released once `hold` has passed since its last press.
#[derive(Debug, Default)]
pub struct HeldKeys {
    last_seen: HashMap<Key, Instant>,
}

impl HeldKeys {
    pub fn press(&mut self, key: Key, now: Instant) {
        self.last_seen.insert(key, now);
    }

    pub fn release(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    pub fn snapshot(&self, now: Instant, hold: Duration) -> InputState {
        let mut input = InputState::default();
        for (&key, &seen) in &self.last_seen {
            if now.saturating_duration_since(seen) <= hold {
                input.press(key);
            }
        }
        input
    }
}
