//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` per displayed frame
//! - Seeded RNG only (owned by `GameState`)
//! - Stable iteration order (entities keep spawn order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod human;
pub mod monster;
pub mod particles;
pub mod projectile;
pub mod rect;
pub mod state;
pub mod tick;
pub mod worldgen;

#[cfg(test)]
pub(crate) mod testing;

pub use collision::{CollisionResult, circle_rect_collision, push_out_of_rect};
pub use rect::Rect;
pub use state::{
    Camera, GameEvent, GamePhase, GameState, Human, HumanKind, HumanState, Monster, Particle,
    Projectile, Prop, PropKind, Stats, Wall,
};
pub use tick::{TickInput, tick};
pub use worldgen::generate_world;
