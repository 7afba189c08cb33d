use std::collections::HashSet;
use std::str::FromStr;

use thiserror::Error;

/// Keys the simulation reacts to. The windowing layer maps its own key codes
/// onto these before each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
}

/// Keyboard snapshot for one tick: keys currently held, and keys that went
/// down since the previous snapshot.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from the keys currently down, diffing against the
    /// previous snapshot to derive just-pressed keys.
    pub fn next(&self, down: impl IntoIterator<Item = Key>) -> Self {
        let held: HashSet<Key> = down.into_iter().collect();
        let pressed = held.difference(&self.held).copied().collect();
        Self { held, pressed }
    }

    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
        self.pressed.remove(&key);
    }

    /// Forget just-pressed edges; call after the tick consumed them.
    pub fn end_tick(&mut self) {
        self.pressed.clear();
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// -1, 0 or +1 from the left/right keys.
    pub fn horizontal_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_key_held(Key::Left) {
            axis -= 1.0;
        }
        if self.is_key_held(Key::Right) {
            axis += 1.0;
        }
        axis
    }

    pub fn jump_requested(&self) -> bool {
        self.is_key_held(Key::Space) || self.is_key_held(Key::Up)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("segment '{0}' is not of the form KEYS:TICKS")]
    Malformed(String),
    #[error("unknown key '{0}' (expected L, R, U, D, J or -)")]
    UnknownKey(char),
    #[error("bad tick count in '{0}'")]
    BadCount(String),
}

/// Canned key presses for headless runs, written as comma-separated
/// `KEYS:TICKS` segments, e.g. `R:40,RJ:5,-:20`. `-` means no keys.
/// After the last segment the script repeats from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputScript {
    segments: Vec<(Vec<Key>, u32)>,
}

impl InputScript {
    /// Keys held on tick `tick` (0-based).
    pub fn keys_at(&self, tick: u64) -> &[Key] {
        let period: u64 = self.segments.iter().map(|(_, n)| u64::from(*n)).sum();
        if period == 0 {
            return &[];
        }
        let mut t = tick % period;
        for (keys, n) in &self.segments {
            if t < u64::from(*n) {
                return keys;
            }
            t -= u64::from(*n);
        }
        &[]
    }
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        for segment in s.split(',').map(str::trim).filter(|seg| !seg.is_empty()) {
            let (keys, count) = segment
                .split_once(':')
                .ok_or_else(|| ScriptError::Malformed(segment.to_string()))?;
            let count: u32 = count
                .trim()
                .parse()
                .map_err(|_| ScriptError::BadCount(segment.to_string()))?;
            let keys = keys
                .trim()
                .chars()
                .filter(|c| *c != '-')
                .map(|c| match c.to_ascii_uppercase() {
                    'L' => Ok(Key::Left),
                    'R' => Ok(Key::Right),
                    'U' => Ok(Key::Up),
                    'D' => Ok(Key::Down),
                    'J' => Ok(Key::Space),
                    other => Err(ScriptError::UnknownKey(other)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            segments.push((keys, count));
        }
        Ok(Self { segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_derives_just_pressed_edges() {
        let first = InputState::new().next([Key::Right]);
        assert!(first.is_key_just_pressed(Key::Right));
        let second = first.next([Key::Right, Key::Space]);
        assert!(second.is_key_held(Key::Right));
        assert!(!second.is_key_just_pressed(Key::Right));
        assert!(second.is_key_just_pressed(Key::Space));
    }

    #[test]
    fn opposite_directions_cancel() {
        let mut input = InputState::new();
        input.press(Key::Left);
        assert_eq!(input.horizontal_axis(), -1.0);
        input.press(Key::Right);
        assert_eq!(input.horizontal_axis(), 0.0);
        input.release(Key::Left);
        input.end_tick();
        assert_eq!(input.horizontal_axis(), 1.0);
        assert!(!input.is_key_just_pressed(Key::Right));
    }

    #[test]
    fn script_cycles_through_segments() {
        let script: InputScript = "R:2, RJ:1, -:1".parse().unwrap();
        assert_eq!(script.keys_at(0), &[Key::Right]);
        assert_eq!(script.keys_at(2), &[Key::Right, Key::Space]);
        assert!(script.keys_at(3).is_empty());
        assert_eq!(script.keys_at(4), &[Key::Right]);
    }

    #[test]
    fn script_rejects_garbage() {
        assert_eq!("R".parse::<InputScript>(), Err(ScriptError::Malformed("R".into())));
        assert_eq!("X:3".parse::<InputScript>(), Err(ScriptError::UnknownKey('X')));
        assert_eq!("R:x".parse::<InputScript>(), Err(ScriptError::BadCount("R:x".into())));
        assert!("".parse::<InputScript>().unwrap().keys_at(7).is_empty());
    }
}
