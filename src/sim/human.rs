//! Human behavior
//!
//! Every frame a human, in priority order:
//! 1. stays down if tripped (nothing else happens until the timer runs out)
//! 2. fires at the monster if armed, in range and off cooldown
//! 3. picks a behavior from its distance to the monster:
//!    kite (armed, too close) > flee > cower/shiver > idle wander
//!
//! Being eaten is checked by the caller before any of this.

use glam::Vec2;
use rand::Rng;

use super::collision::push_out_of_rect;
use super::state::{Human, HumanKind, HumanState, Projectile, Wall};
use crate::consts::*;
use crate::{heading_of, polar_to_cartesian};

/// A projectile a human wants to spawn this frame
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub color: u32,
}

impl Shot {
    pub fn into_projectile(self, id: u32) -> Projectile {
        Projectile {
            id,
            pos: self.pos,
            vel: self.vel,
            damage: self.damage,
            color: self.color,
        }
    }
}

/// Run one frame of AI for `human` against a monster at `target`.
/// Returns the shot fired this frame, if any.
pub fn step_human<R: Rng>(human: &mut Human, target: Vec2, walls: &[Wall], rng: &mut R) -> Option<Shot> {
    if human.state == HumanState::Trip {
        human.state_timer -= 1.0;
        if human.state_timer <= 0.0 {
            human.state = HumanState::Run;
            human.panic = true;
        }
        return None;
    }

    let dist = human.pos.distance(target);
    let shot = try_fire(human, target, dist, rng);

    if choose_behavior(human, target, dist, rng) {
        human.pos += human.vel;
        if human.vel != Vec2::ZERO {
            human.direction = human.vel.y.atan2(human.vel.x);
        }
        for wall in walls {
            push_out_of_rect(&mut human.pos, human.radius, &wall.rect);
        }
    }

    shot
}

/// Count down the weapon and shoot when ready. Shivering humans are
/// too scared to pull the trigger (or reload).
fn try_fire<R: Rng>(human: &mut Human, target: Vec2, dist: f32, rng: &mut R) -> Option<Shot> {
    if !human.can_shoot || human.state == HumanState::Shiver {
        return None;
    }

    human.attack_cooldown -= 1.0;
    if dist >= human.attack_range || human.attack_cooldown > 0.0 {
        return None;
    }

    let weapon = human.kind.weapon()?;
    let aim = heading_of(human.pos, target);
    let spread = (rng.random::<f32>() - 0.5) * PROJECTILE_SPREAD;
    human.direction = aim;
    human.attack_cooldown = human.max_cooldown;

    Some(Shot {
        pos: human.pos,
        vel: polar_to_cartesian(PROJECTILE_SPEED, aim + spread),
        damage: weapon.damage,
        color: weapon.color,
    })
}

/// Set state and velocity by distance band. Returns false when the human
/// tripped this frame and must not move.
fn choose_behavior<R: Rng>(human: &mut Human, target: Vec2, dist: f32, rng: &mut R) -> bool {
    let away = heading_of(target, human.pos);

    if human.can_shoot && dist < human.attack_range - KITE_MARGIN {
        human.state = HumanState::Run;
        human.vel = polar_to_cartesian(human.speed * KITE_SPEED_FACTOR, away);
    } else if dist < FLEE_DISTANCE {
        human.state = HumanState::Run;
        human.panic = true;

        if human.kind == HumanKind::Scientist && rng.random::<f32>() < TRIP_CHANCE {
            human.state = HumanState::Trip;
            human.state_timer = TRIP_BASE_FRAMES + rng.random::<f32>() * TRIP_RANDOM_FRAMES;
            human.vel = Vec2::ZERO;
            return false;
        }

        human.vel = polar_to_cartesian(human.speed, away);
    } else if dist < NERVOUS_DISTANCE {
        if rng.random::<f32>() < SHIVER_CHANCE {
            human.state = HumanState::Shiver;
        } else if human.state != HumanState::Shiver {
            human.state = HumanState::Cower;
        }
        human.vel = Vec2::ZERO;
    } else {
        human.state = HumanState::Idle;
        if rng.random::<f32>() < WANDER_CHANCE {
            let heading = rng.random::<f32>() * std::f32::consts::TAU;
            human.vel = polar_to_cartesian(WANDER_SPEED, heading);
        } else if rng.random::<f32>() < STOP_CHANCE {
            human.vel = Vec2::ZERO;
        }
    }

    true
}
