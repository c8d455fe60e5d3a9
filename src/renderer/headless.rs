//! Renderer that walks the draw list without a screen

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::frame::{RenderFrame, RenderItem, shake_offset};
use super::Renderer;

/// Counts what would be drawn and logs a summary every `log_every` frames
pub struct LogRenderer {
    /// Jitter has its own RNG so drawing never perturbs the simulation
    rng: Pcg32,
    log_every: u64,
    pub frames_drawn: u64,
    pub last_origin: Vec2,
    /// Entities inside the view on the last frame (sorted list + projectiles)
    pub last_visible: usize,
}

/// Extra border so large walls partially in view are still counted
const CULL_MARGIN: f32 = 200.0;

impl LogRenderer {
    pub fn new(seed: u64, log_every: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            log_every: log_every.max(1),
            frames_drawn: 0,
            last_origin: Vec2::ZERO,
            last_visible: 0,
        }
    }

    fn item_pos(item: &RenderItem<'_>) -> Vec2 {
        match item {
            RenderItem::Wall(w) => w.rect.center(),
            RenderItem::Prop(p) => p.rect.center(),
            RenderItem::Human(h) => h.pos,
            RenderItem::Monster(m) => m.pos,
            RenderItem::Particle(p) => p.pos,
        }
    }
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(0, 60)
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, frame: &RenderFrame<'_>) {
        let jitter = shake_offset(frame.screen_shake, &mut self.rng);
        self.last_origin = frame.view_origin(jitter);

        let sorted = frame.depth_sorted();
        let visible_items = sorted
            .iter()
            .filter(|item| frame.is_visible(Self::item_pos(item), CULL_MARGIN))
            .count();
        let visible_shots = frame
            .projectiles
            .iter()
            .filter(|p| frame.is_visible(p.pos, CULL_MARGIN))
            .count();
        self.last_visible = visible_items + visible_shots;
        self.frames_drawn += 1;

        if frame.frame % self.log_every == 0 {
            log::debug!(
                "frame {} {:?}: {} visible, {} walls, {} humans, radius {:.1}, shake {:.1}",
                frame.frame,
                frame.phase,
                self.last_visible,
                frame.walls.len(),
                frame.humans.len(),
                frame.monster.radius,
                frame.screen_shake
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{GameState, Human, HumanKind};

    #[test]
    fn test_counts_only_visible_entities() {
        let mut state = GameState::empty(3, &Settings::default());
        let p = state.monster.pos;
        state.humans.push(Human::new(1, HumanKind::Scientist, p + Vec2::new(100.0, 0.0)));
        state.humans.push(Human::new(2, HumanKind::Scientist, p + Vec2::new(2000.0, 0.0)));

        let mut renderer = LogRenderer::default();
        renderer.draw(&RenderFrame::capture(&state));

        // monster + the near human
        assert_eq!(renderer.last_visible, 2);
        assert_eq!(renderer.frames_drawn, 1);
        assert_eq!(renderer.last_origin, state.camera.pos.floor());
    }

    #[test]
    fn test_shake_moves_origin() {
        let mut state = GameState::empty(3, &Settings::default());
        state.screen_shake = 10.0;
        let mut renderer = LogRenderer::default();
        renderer.draw(&RenderFrame::capture(&state));
        let delta = renderer.last_origin - state.camera.pos.floor();
        assert!(delta.x.abs() <= 5.0 && delta.y.abs() <= 5.0);
    }
}
