//! One simulation frame
//!
//! Systems run in a fixed order so replays are deterministic:
//! monster movement, walls, props, projectiles, humans, particles,
//! camera, and finally the escape check.

use std::mem;

use glam::Vec2;

use super::camera::{decay_shake, update_camera};
use super::human::step_human;
use super::monster::{consume_human, resolve_props, resolve_walls};
use super::particles::update_particles;
use super::projectile::update_projectiles;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::ESCAPE_MARGIN;

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Movement intent; lengths above 1 are rescaled, below 1 move slower
    pub intent: Vec2,
}

/// Advance the game state by one frame. Does nothing outside `Playing`.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.events.clear();
    state.frame += 1;

    state.screen_shake = decay_shake(state.screen_shake);
    state.eat_flash = state.eat_flash.saturating_sub(1);
    state.hurt_flash = state.hurt_flash.saturating_sub(1);

    state.monster.apply_intent(input.intent);

    resolve_walls(state);
    resolve_props(state);
    update_projectiles(state);
    update_humans(state);
    update_particles(&mut state.particles);
    update_camera(state, input.intent);

    check_escape(state);
}

/// Eat anything in reach, then run AI for everyone else
fn update_humans(state: &mut GameState) {
    let mut humans = mem::take(&mut state.humans);

    humans.retain_mut(|human| {
        if state.monster.can_eat(human.pos, human.radius) {
            consume_human(state, human.id, human.pos);
            return false;
        }

        let target = state.monster.pos;
        if let Some(shot) = step_human(human, target, &state.walls, &mut state.rng) {
            let id = state.next_entity_id();
            state.stats.shots_fired += 1;
            state.push_event(GameEvent::ProjectileFired { shooter: human.id });
            state.projectiles.push(shot.into_projectile(id));
        }
        true
    });

    state.humans = humans;
}

/// Victory once the monster is clear of the outermost ring
fn check_escape(state: &mut GameState) {
    let escape_radius = state.world.world_radius() + ESCAPE_MARGIN;
    if state.monster.pos.distance(state.world_center) > escape_radius {
        state.finish(GamePhase::Victory);
    }
}
