//! Smoothed follow camera and screen shake

use glam::Vec2;

use super::state::{Camera, GameState};
use crate::consts::*;

impl Camera {
    /// Where the camera wants to be: monster centred in the view, pushed
    /// ahead in the direction of travel
    pub fn target(monster_pos: Vec2, view_size: Vec2, intent: Vec2) -> Vec2 {
        monster_pos - view_size / 2.0 + intent * CAMERA_LEAD
    }

    /// Move a fixed fraction of the way toward `target` on each axis
    pub fn follow(&mut self, target: Vec2) {
        self.pos += (target - self.pos) * CAMERA_SMOOTHING;
    }
}

pub fn update_camera(state: &mut GameState, intent: Vec2) {
    let view = Vec2::new(state.viewport.width, state.viewport.height);
    let target = Camera::target(state.monster.pos, view, intent);
    state.camera.follow(target);
}

/// Exponential shake decay that snaps to zero once imperceptible
pub fn decay_shake(shake: f32) -> f32 {
    let next = shake * SHAKE_DECAY;
    if next < SHAKE_CUTOFF { 0.0 } else { next }
}
