//! Lab Breach - a growing monster escapes a ringed laboratory
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world generation, AI, collisions, game state)
//! - `input`: Keyboard/joystick union into a per-frame movement intent
//! - `driver`: Frame driver (update then draw), session cancellation, UI callbacks
//! - `renderer`: Read-only frame snapshots and depth-sorted draw lists
//! - `narration`: Best-effort async flavor text, never awaited by a frame
//! - `settings`: Configuration and world generation parameters

pub mod driver;
pub mod input;
pub mod narration;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::{FrameDriver, FrameScheduler, ManualScheduler, SessionId, StatsUpdate};
pub use input::InputState;
pub use settings::{QualityPreset, Settings, Viewport, WorldConfig};

use glam::Vec2;

/// Game configuration constants (all rates are per frame)
pub mod consts {
    /// Monster defaults
    pub const INITIAL_MONSTER_SIZE: f32 = 25.0;
    pub const MONSTER_VISUAL_HEIGHT: f32 = 50.0;
    pub const MONSTER_SPEED: f32 = 7.5;
    pub const MONSTER_DAMAGE: f32 = 100.0;
    pub const MONSTER_BASE_HP: f32 = 100.0;
    pub const FIRST_LEVEL_EXP: u32 = 5;
    pub const LEVEL_EXP_MULTIPLIER: f32 = 1.5;

    /// Growth per human eaten
    pub const GROWTH_PER_HUMAN: f32 = 2.5;
    pub const HEIGHT_GROWTH_PER_HUMAN: f32 = 0.5;
    /// Extra reach added to both radii when testing for a bite
    pub const EAT_REACH: f32 = 15.0;

    /// Projectile hits never shrink the monster below these floors
    pub const MIN_MONSTER_RADIUS: f32 = 10.0;
    pub const MIN_MONSTER_VISUAL_HEIGHT: f32 = 20.0;
    pub const HIT_HEIGHT_LOSS_FACTOR: f32 = 0.2;
    /// At or below this radius the run is lost
    pub const DEATH_RADIUS: f32 = 12.0;

    /// Flash timers (frames)
    pub const EAT_FLASH_FRAMES: u32 = 6;
    pub const HURT_FLASH_FRAMES: u32 = 5;

    /// Humans
    pub const HUMAN_SIZE: f32 = 16.0;
    pub const HUMAN_HEIGHT: f32 = 45.0;
    pub const HUMAN_SPEED: f32 = 3.0;
    pub const FLEE_DISTANCE: f32 = 500.0;
    pub const NERVOUS_DISTANCE: f32 = 700.0;
    /// Armed humans back off when closer than (range - KITE_MARGIN)
    pub const KITE_MARGIN: f32 = 150.0;
    pub const KITE_SPEED_FACTOR: f32 = 0.6;
    pub const TRIP_CHANCE: f32 = 0.003;
    pub const TRIP_BASE_FRAMES: f32 = 40.0;
    pub const TRIP_RANDOM_FRAMES: f32 = 40.0;
    pub const SHIVER_CHANCE: f32 = 0.05;
    pub const WANDER_CHANCE: f32 = 0.02;
    pub const STOP_CHANCE: f32 = 0.02;
    pub const WANDER_SPEED: f32 = 0.5;

    /// Combat
    pub const PROJECTILE_SPEED: f32 = 14.0;
    pub const PROJECTILE_SPREAD: f32 = 0.1;
    pub const DAMAGE_SOLDIER: f32 = 1.5;
    pub const DAMAGE_ELITE: f32 = 3.0;
    pub const RANGE_SOLDIER: f32 = 400.0;
    pub const RANGE_ELITE: f32 = 500.0;
    pub const COOLDOWN_SOLDIER: f32 = 90.0;
    pub const COOLDOWN_ELITE: f32 = 45.0;
    /// Projectiles further than this from the camera centre are dropped
    pub const PROJECTILE_CULL_RADIUS: f32 = 1000.0;

    /// Win once the monster is this far past the outermost ring
    pub const ESCAPE_MARGIN: f32 = 150.0;

    /// Camera
    pub const CAMERA_SMOOTHING: f32 = 0.1;
    pub const CAMERA_LEAD: f32 = 150.0;

    /// Screen shake
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const SHAKE_CUTOFF: f32 = 0.5;
    pub const SHAKE_WALL_GRIND: f32 = 2.0;
    pub const SHAKE_WALL_BREAK: f32 = 10.0;
    pub const SHAKE_PROP: f32 = 5.0;
    pub const SHAKE_EAT: f32 = 4.0;
    pub const SHAKE_HIT: f32 = 8.0;

    /// Particles
    pub const PARTICLE_GRAVITY: f32 = 0.8;
    pub const PARTICLE_BOUNCE: f32 = -0.5;
    pub const PARTICLE_FRICTION: f32 = 0.8;
    pub const PARTICLE_DECAY: f32 = 0.02;
    /// Chance per frame of contact that a grinding wall throws chips
    pub const WALL_CHIP_CHANCE: f32 = 0.2;
}

/// Packed `0xRRGGBB` colors used by entities and particle bursts
pub mod palette {
    pub const MONSTER: u32 = 0x7c3aed;
    pub const SCIENTIST_COAT: u32 = 0xe2e8f0;
    pub const GUARD_UNIFORM: u32 = 0x1e3a8a;
    pub const SOLDIER_UNIFORM: u32 = 0x15803d;
    pub const ELITE_UNIFORM: u32 = 0x0f172a;
    pub const PROJECTILE: u32 = 0xfacc15;
    pub const PROJECTILE_ELITE: u32 = 0xf97316;
    pub const WALL_BASE: u32 = 0x334155;
    pub const WALL_BROKEN: u32 = 0x1e293b;
    pub const CRYO_LIQUID: u32 = 0x06b6d4;
    pub const BLOOD: u32 = 0xdc2626;
    pub const SPARK: u32 = 0xfcd34d;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Angle of the vector pointing from `from` to `to`
#[inline]
pub fn heading_of(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
