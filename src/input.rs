//! Movement input: held keys unioned with an on-screen joystick
//!
//! A nonzero joystick vector overrides the keyboard for that frame.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// The four movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Up,
    Down,
    Left,
    Right,
}

impl MoveKey {
    /// Map a key name (WASD or arrows, any case) to a direction
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "w" | "arrowup" => Some(MoveKey::Up),
            "s" | "arrowdown" => Some(MoveKey::Down),
            "a" | "arrowleft" => Some(MoveKey::Left),
            "d" | "arrowright" => Some(MoveKey::Right),
            _ => None,
        }
    }
}

/// Current input as seen by the frame driver
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<MoveKey>,
    joystick: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for keys that don't move the monster
    pub fn key_down(&mut self, name: &str) -> bool {
        match MoveKey::from_key_name(name) {
            Some(key) => {
                self.held.insert(key);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, name: &str) {
        if let Some(key) = MoveKey::from_key_name(name) {
            self.held.remove(&key);
        }
    }

    /// Set the joystick vector; each axis is clamped to [-1, 1] and
    /// non-finite axes read as centred
    pub fn set_joystick(&mut self, x: f32, y: f32) {
        self.joystick = Vec2::new(joystick_axis(x), joystick_axis(y));
    }

    pub fn release_all(&mut self) {
        self.held.clear();
        self.joystick = Vec2::ZERO;
    }

    /// Raw intent for this frame (not yet rescaled)
    pub fn intent(&self) -> Vec2 {
        if self.joystick != Vec2::ZERO {
            return self.joystick;
        }

        let mut dir = Vec2::ZERO;
        if self.held.contains(&MoveKey::Up) {
            dir.y -= 1.0;
        }
        if self.held.contains(&MoveKey::Down) {
            dir.y += 1.0;
        }
        if self.held.contains(&MoveKey::Left) {
            dir.x -= 1.0;
        }
        if self.held.contains(&MoveKey::Right) {
            dir.x += 1.0;
        }
        dir
    }

    pub fn to_tick_input(&self) -> TickInput {
        TickInput {
            intent: self.intent(),
        }
    }
}

fn joystick_axis(value: f32) -> f32 {
    if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 }
}
