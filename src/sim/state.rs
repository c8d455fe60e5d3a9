//! Game state and core simulation types
//!
//! `GameState` owns every live entity collection. Renderers and UI only
//! ever see it through shared references.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::worldgen::generate_world;
use crate::consts::*;
use crate::palette;
use crate::settings::{Settings, Viewport, WorldConfig};

/// Session phase as seen by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no session running
    Menu,
    /// Active gameplay
    Playing,
    /// Monster escaped past the outer ring
    Victory,
    /// Monster shrank to the death threshold
    Defeat,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Defeat)
    }
}

/// The player-controlled monster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision radius; doubles as size and health
    pub radius: f32,
    pub visual_height: f32,
    /// Carried for display only; radius decides death
    pub hp: f32,
    pub max_hp: f32,
    pub level: u32,
    pub exp: u32,
    pub next_level_exp: u32,
    /// Wall damage dealt per frame of contact
    pub damage: f32,
}

impl Monster {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: INITIAL_MONSTER_SIZE,
            visual_height: MONSTER_VISUAL_HEIGHT,
            hp: MONSTER_BASE_HP,
            max_hp: MONSTER_BASE_HP,
            level: 1,
            exp: 0,
            next_level_exp: FIRST_LEVEL_EXP,
            damage: MONSTER_DAMAGE,
        }
    }
}

/// Human archetypes, from harmless to lethal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HumanKind {
    Scientist,
    Guard,
    Soldier,
    Elite,
}

/// Firing characteristics of an armed archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub range: f32,
    pub cooldown: f32,
    pub damage: f32,
    pub color: u32,
}

impl HumanKind {
    pub fn color(&self) -> u32 {
        match self {
            HumanKind::Scientist => palette::SCIENTIST_COAT,
            HumanKind::Guard => palette::GUARD_UNIFORM,
            HumanKind::Soldier => palette::SOLDIER_UNIFORM,
            HumanKind::Elite => palette::ELITE_UNIFORM,
        }
    }

    /// Weapon stats, `None` for unarmed archetypes
    pub fn weapon(&self) -> Option<Weapon> {
        match self {
            HumanKind::Scientist | HumanKind::Guard => None,
            HumanKind::Soldier => Some(Weapon {
                range: RANGE_SOLDIER,
                cooldown: COOLDOWN_SOLDIER,
                damage: DAMAGE_SOLDIER,
                color: palette::PROJECTILE,
            }),
            HumanKind::Elite => Some(Weapon {
                range: RANGE_ELITE,
                cooldown: COOLDOWN_ELITE,
                damage: DAMAGE_ELITE,
                color: palette::PROJECTILE_ELITE,
            }),
        }
    }
}

/// Behavioral state of a human
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HumanState {
    #[default]
    Idle,
    /// Fleeing, or kiting for armed humans
    Run,
    /// Fell over; helpless until `state_timer` runs out
    Trip,
    /// Ducking in place
    Cower,
    /// Frozen with fear
    Shiver,
}

/// A lab inhabitant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Human {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub visual_height: f32,
    pub color: u32,
    pub kind: HumanKind,
    pub state: HumanState,
    /// Frames left in `Trip`; meaningless in other states
    pub state_timer: f32,
    pub panic: bool,
    pub speed: f32,
    /// Facing (radians)
    pub direction: f32,
    /// Walk-cycle phase offset for rendering
    pub anim_offset: f32,

    // Combat (only meaningful when can_shoot)
    pub can_shoot: bool,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub max_cooldown: f32,
}

impl Human {
    /// A human of the given archetype, standing still and calm
    pub fn new(id: u32, kind: HumanKind, pos: Vec2) -> Self {
        let weapon = kind.weapon();
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: HUMAN_SIZE,
            visual_height: HUMAN_HEIGHT,
            color: kind.color(),
            kind,
            state: HumanState::Idle,
            state_timer: 0.0,
            panic: false,
            speed: HUMAN_SPEED,
            direction: 0.0,
            anim_offset: 0.0,
            can_shoot: weapon.is_some(),
            attack_range: weapon.map_or(0.0, |w| w.range),
            attack_cooldown: 0.0,
            max_cooldown: weapon.map_or(0.0, |w| w.cooldown),
        }
    }
}

/// A destructible wall segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: u32,
    pub rect: Rect,
    pub visual_height: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub breakable: bool,
    /// Monster radius needed to damage this wall instead of bouncing off
    pub required_size: f32,
    /// Ring this segment belongs to (0 = center room)
    pub ring: u32,
}

/// Decorative prop types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropKind {
    ServerRack,
    CryoTank,
}

impl PropKind {
    /// Footprint (width, depth) and visual height
    pub fn dimensions(&self) -> (Vec2, f32) {
        match self {
            PropKind::ServerRack => (Vec2::new(50.0, 30.0), 70.0),
            PropKind::CryoTank => (Vec2::new(40.0, 40.0), 80.0),
        }
    }

    /// Color of the debris when smashed
    pub fn debris_color(&self) -> u32 {
        match self {
            PropKind::ServerRack => palette::SPARK,
            PropKind::CryoTank => palette::CRYO_LIQUID,
        }
    }
}

/// A one-hit decoration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prop {
    pub id: u32,
    pub kind: PropKind,
    pub rect: Rect,
    pub visual_height: f32,
    pub hp: u8,
    pub dead: bool,
}

impl Prop {
    pub fn new(id: u32, kind: PropKind, pos: Vec2) -> Self {
        let (size, visual_height) = kind.dimensions();
        Self {
            id,
            kind,
            rect: Rect { pos, size },
            visual_height,
            hp: 1,
            dead: false,
        }
    }
}

/// A bullet fired by an armed human
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub color: u32,
}

/// A particle for visual effects (never affects gameplay)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Height above the ground
    pub z: f32,
    pub vel: Vec2,
    pub vz: f32,
    pub life: f32,
    pub max_life: f32,
    pub color: u32,
    pub size: f32,
}

/// Top-left corner of the view in world space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
}

/// Running totals for the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub humans_eaten: u32,
    pub walls_broken: u32,
    pub props_smashed: u32,
    pub shots_fired: u32,
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    HumanEaten { id: u32, pos: Vec2 },
    WallDamaged { id: u32, hp: f32 },
    WallBroken { id: u32, ring: u32 },
    PropSmashed { id: u32, kind: PropKind },
    ProjectileFired { shooter: u32 },
    MonsterHit { damage: f32, radius: f32 },
    LevelUp { level: u32 },
    /// Size or eaten count changed; forwarded to the stats display
    StatsChanged { size: f32, eaten: u32 },
    PhaseChanged(GamePhase),
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Source of every random decision in the simulation
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation frame counter
    pub frame: u64,
    pub world: WorldConfig,
    pub viewport: Viewport,
    /// Center of the ring layout; the monster starts here
    pub world_center: Vec2,

    pub monster: Monster,
    pub humans: Vec<Human>,
    pub walls: Vec<Wall>,
    pub props: Vec<Prop>,
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub max_particles: usize,

    pub camera: Camera,
    pub screen_shake: f32,
    pub shake_enabled: bool,
    /// Frames left on the "just ate" flash
    pub eat_flash: u32,
    /// Frames left on the "just got shot" flash
    pub hurt_flash: u32,

    pub stats: Stats,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// An empty lab: monster at the center, no walls, humans or props
    pub fn empty(seed: u64, settings: &Settings) -> Self {
        let world = settings.world.clone();
        let half = world.world_size() / 2.0;
        let world_center = Vec2::new(half, half);
        let viewport = settings.viewport;

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            frame: 0,
            world,
            viewport,
            world_center,
            monster: Monster::new(world_center),
            humans: Vec::new(),
            walls: Vec::new(),
            props: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            max_particles: settings.max_particles(),
            camera: Camera {
                pos: world_center - Vec2::new(viewport.width, viewport.height) / 2.0,
            },
            screen_shake: 0.0,
            shake_enabled: settings.effective_screen_shake(),
            eat_flash: 0,
            hurt_flash: 0,
            stats: Stats::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// A fresh, fully populated lab
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let mut state = Self::empty(seed, settings);
        generate_world(&mut state);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Visual center of the camera view
    pub fn camera_center(&self) -> Vec2 {
        self.camera.pos + Vec2::new(self.viewport.width, self.viewport.height) / 2.0
    }

    /// Raise screen shake to at least `amount`
    pub fn shake_at_least(&mut self, amount: f32) {
        if self.shake_enabled {
            self.screen_shake = self.screen_shake.max(amount);
        }
    }

    /// Set screen shake to exactly `amount`
    pub fn shake(&mut self, amount: f32) {
        if self.shake_enabled {
            self.screen_shake = amount;
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Current `{size, eaten}` pair for the stats display
    pub fn stats_event(&self) -> GameEvent {
        GameEvent::StatsChanged {
            size: self.monster.radius,
            eaten: self.stats.humans_eaten,
        }
    }

    /// Move to a terminal phase. Only the first transition sticks.
    pub fn finish(&mut self, phase: GamePhase) -> bool {
        if self.phase != GamePhase::Playing || phase == GamePhase::Playing {
            return false;
        }
        log::info!(
            "Session ended: {:?} at frame {} (radius {:.1}, eaten {})",
            phase,
            self.frame,
            self.monster.radius,
            self.stats.humans_eaten
        );
        self.phase = phase;
        self.events.push(GameEvent::PhaseChanged(phase));
        true
    }
}
