//! Read-only per-frame snapshot and draw ordering

use glam::Vec2;
use rand::Rng;

use crate::sim::{GamePhase, GameState, Human, Monster, Particle, Projectile, Prop, Wall};

/// Everything a renderer may look at for one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub frame: u64,
    pub phase: GamePhase,
    /// Top-left corner of the view in world space
    pub camera: Vec2,
    pub view_size: Vec2,
    pub screen_shake: f32,
    pub eat_flash: u32,
    pub hurt_flash: u32,
    pub monster: &'a Monster,
    pub humans: &'a [Human],
    pub walls: &'a [Wall],
    pub props: &'a [Prop],
    pub projectiles: &'a [Projectile],
    pub particles: &'a [Particle],
}

impl<'a> RenderFrame<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        Self {
            frame: state.frame,
            phase: state.phase,
            camera: state.camera.pos,
            view_size: Vec2::new(state.viewport.width, state.viewport.height),
            screen_shake: state.screen_shake,
            eat_flash: state.eat_flash,
            hurt_flash: state.hurt_flash,
            monster: &state.monster,
            humans: &state.humans,
            walls: &state.walls,
            props: &state.props,
            projectiles: &state.projectiles,
            particles: &state.particles,
        }
    }

    /// Walls, props, humans, the monster and particles ordered back to front.
    /// Projectiles are not included; draw them on top afterwards.
    pub fn depth_sorted(&self) -> Vec<RenderItem<'a>> {
        let mut items = Vec::with_capacity(
            self.walls.len() + self.props.len() + self.humans.len() + self.particles.len() + 1,
        );
        items.extend(self.walls.iter().map(RenderItem::Wall));
        items.extend(self.humans.iter().map(RenderItem::Human));
        items.extend(self.props.iter().filter(|p| !p.dead).map(RenderItem::Prop));
        items.push(RenderItem::Monster(self.monster));
        items.extend(self.particles.iter().map(RenderItem::Particle));

        // Stable sort keeps insertion order for equal keys
        items.sort_by(|a, b| a.sort_key().total_cmp(&b.sort_key()));
        items
    }

    /// World-space origin of the view after shake is applied
    pub fn view_origin(&self, shake_offset: Vec2) -> Vec2 {
        self.camera.floor() - shake_offset
    }

    pub fn is_visible(&self, pos: Vec2, margin: f32) -> bool {
        let min = self.camera - Vec2::splat(margin);
        let max = self.camera + self.view_size + Vec2::splat(margin);
        pos.cmpge(min).all() && pos.cmple(max).all()
    }
}

/// One drawable entity in the sorted list
#[derive(Debug, Clone, Copy)]
pub enum RenderItem<'a> {
    Wall(&'a Wall),
    Prop(&'a Prop),
    Human(&'a Human),
    Monster(&'a Monster),
    Particle(&'a Particle),
}

impl RenderItem<'_> {
    /// Ground-contact y: bottom edge for boxes, position for everything else
    pub fn sort_key(&self) -> f32 {
        match self {
            RenderItem::Wall(w) => w.rect.bottom(),
            RenderItem::Prop(p) => p.rect.bottom(),
            RenderItem::Human(h) => h.pos.y,
            RenderItem::Monster(m) => m.pos.y,
            RenderItem::Particle(p) => p.pos.y,
        }
    }
}

/// Random per-axis camera jitter of up to half the shake magnitude
pub fn shake_offset<R: Rng>(shake: f32, rng: &mut R) -> Vec2 {
    if shake <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (rng.random::<f32>() - 0.5) * shake,
        (rng.random::<f32>() - 0.5) * shake,
    )
}

/// Display level painted on a wall, derived from the size it needs
pub fn wall_level_label(wall: &Wall) -> u32 {
    (wall.required_size / 10.0).floor() as u32
}
