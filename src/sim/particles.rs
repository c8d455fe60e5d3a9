//! Cosmetic debris: blood, sparks, rubble
//!
//! Particles fly on the ground plane while a separate height axis gives
//! them a little ballistic arc. Nothing collides with them.

use rand::Rng;

use super::state::{GameState, Particle};
use crate::consts::*;
use crate::polar_to_cartesian;

/// Emit `count` particles at `pos`, starting `z` above the ground.
/// Bursts are truncated once the particle cap is reached.
pub fn spawn_burst(state: &mut GameState, pos: glam::Vec2, z: f32, color: u32, count: usize, speed_mult: f32) {
    for _ in 0..count {
        if state.particles.len() >= state.max_particles {
            break;
        }
        let rng = &mut state.rng;
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = (rng.random::<f32>() * 4.0 + 2.0) * speed_mult;
        let z = z + rng.random::<f32>() * 20.0;
        let vz = rng.random::<f32>() * 8.0 + 4.0;
        let size = rng.random::<f32>() * 4.0 + 2.0;

        state.particles.push(Particle {
            pos,
            z,
            vel: polar_to_cartesian(speed, angle),
            vz,
            life: 1.0,
            max_life: 1.0,
            color,
            size,
        });
    }
}

/// Advance one particle; returns false once it has faded out
pub fn step_particle(p: &mut Particle) -> bool {
    p.pos += p.vel;
    p.z += p.vz;
    p.vz -= PARTICLE_GRAVITY;
    if p.z <= 0.0 {
        p.z = 0.0;
        p.vz *= PARTICLE_BOUNCE;
        p.vel *= PARTICLE_FRICTION;
    }
    p.life -= PARTICLE_DECAY;
    p.life > 0.0
}

pub fn update_particles(particles: &mut Vec<Particle>) {
    particles.retain_mut(step_particle);
}
