//! Bullets fired by armed humans

use super::collision::point_in_circle;
use super::monster::hit_monster;
use super::particles::spawn_burst;
use super::state::GameState;
use crate::consts::PROJECTILE_CULL_RADIUS;
use crate::palette;

/// Advance every projectile and resolve it: walls first, then the monster,
/// then off-screen culling around the camera centre
pub fn update_projectiles(state: &mut GameState) {
    let mut projectiles = std::mem::take(&mut state.projectiles);
    let view_center = state.camera_center();

    projectiles.retain_mut(|p| {
        p.pos += p.vel;

        if state.walls.iter().any(|w| w.rect.contains_point(p.pos)) {
            spawn_burst(state, p.pos, 20.0, palette::SPARK, 3, 1.0);
            return false;
        }

        if point_in_circle(p.pos, state.monster.pos, state.monster.radius) {
            hit_monster(state, p.pos, p.damage);
            return false;
        }

        p.pos.distance(view_center) <= PROJECTILE_CULL_RADIUS
    });

    state.projectiles = projectiles;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::rect::Rect;
    use crate::sim::state::{GameEvent, Projectile, Wall};
    use glam::Vec2;

    fn arena() -> GameState {
        GameState::empty(2, &Settings::default())
    }

    fn bullet(pos: Vec2, vel: Vec2) -> Projectile {
        Projectile {
            id: 1,
            pos,
            vel,
            damage: 1.5,
            color: palette::PROJECTILE,
        }
    }

    #[test]
    fn test_bullet_stops_at_wall() {
        let mut state = arena();
        let origin = state.monster.pos + Vec2::new(300.0, 0.0);
        state.walls.push(Wall {
            id: 3,
            rect: Rect::new(origin.x - 20.0, origin.y - 50.0, 40.0, 100.0),
            visual_height: 100.0,
            hp: 60.0,
            max_hp: 60.0,
            breakable: true,
            required_size: 40.0,
            ring: 0,
        });
        state.projectiles.push(bullet(origin + Vec2::new(14.0, 0.0), Vec2::new(-14.0, 0.0)));

        update_projectiles(&mut state);

        assert!(state.projectiles.is_empty());
        assert_eq!(state.particles.len(), 3);
        assert_eq!(state.monster.radius, 25.0);
        assert_eq!(state.walls[0].hp, 60.0);
    }

    #[test]
    fn test_bullet_hits_monster() {
        let mut state = arena();
        let start = state.monster.pos + Vec2::new(30.0, 0.0);
        state.projectiles.push(bullet(start, Vec2::new(-14.0, 0.0)));

        update_projectiles(&mut state);

        assert!(state.projectiles.is_empty());
        assert_eq!(state.monster.radius, 23.5);
        assert_eq!(state.screen_shake, crate::consts::SHAKE_HIT);
        assert!(state
            .events
            .contains(&GameEvent::StatsChanged { size: 23.5, eaten: 0 }));
    }

    #[test]
    fn test_bullet_culled_far_from_camera() {
        let mut state = arena();
        let center = state.camera_center();
        state.projectiles.push(bullet(center + Vec2::new(995.0, 0.0), Vec2::new(14.0, 0.0)));
        state.projectiles.push(bullet(center + Vec2::new(500.0, 0.0), Vec2::new(14.0, 0.0)));

        update_projectiles(&mut state);

        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos.x, center.x + 514.0);
    }
}
