//! Player-driven monster: movement, breaking things, eating, getting shot

use glam::Vec2;
use rand::Rng;

use super::collision::{circle_rect_collision, circles_overlap, push_out_of_rect};
use super::particles::spawn_burst;
use super::state::{GameEvent, GamePhase, GameState, Monster};
use crate::consts::*;
use crate::palette;

impl Monster {
    /// Move by `intent` (any length). Intents longer than 1 are rescaled to
    /// unit length; shorter ones move proportionally slower.
    pub fn apply_intent(&mut self, intent: Vec2) {
        let len = intent.length();
        let dir = if len > 1.0 { intent / len } else { intent };
        self.vel = dir * MONSTER_SPEED;
        self.pos += self.vel;
    }

    /// Grow from eating one human. Returns the new level on level-up.
    pub fn eat(&mut self) -> Option<u32> {
        self.radius += GROWTH_PER_HUMAN;
        self.visual_height += HEIGHT_GROWTH_PER_HUMAN;
        self.exp += 1;
        if self.exp >= self.next_level_exp {
            self.level += 1;
            self.next_level_exp = (self.next_level_exp as f32 * LEVEL_EXP_MULTIPLIER).floor() as u32;
            Some(self.level)
        } else {
            None
        }
    }

    /// Shrink from a projectile hit, never below the size floors
    pub fn take_hit(&mut self, damage: f32) {
        self.radius = (self.radius - damage).max(MIN_MONSTER_RADIUS);
        self.visual_height =
            (self.visual_height - damage * HIT_HEIGHT_LOSS_FACTOR).max(MIN_MONSTER_VISUAL_HEIGHT);
    }

    pub fn is_dead(&self) -> bool {
        self.radius <= DEATH_RADIUS
    }

    /// Whether a human at `pos` with `radius` is within biting reach
    pub fn can_eat(&self, pos: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.radius + EAT_REACH, pos, radius)
    }
}

/// Resolve the monster against every wall: too small means pushed out,
/// big enough means the wall takes damage for each frame of contact
pub fn resolve_walls(state: &mut GameState) {
    let mut walls = std::mem::take(&mut state.walls);

    walls.retain_mut(|wall| {
        let contact = circle_rect_collision(state.monster.pos, state.monster.radius, &wall.rect);
        if !contact.hit {
            return true;
        }

        if !wall.breakable || state.monster.radius < wall.required_size {
            push_out_of_rect(&mut state.monster.pos, state.monster.radius, &wall.rect);
            return true;
        }

        wall.hp -= state.monster.damage;
        state.shake_at_least(SHAKE_WALL_GRIND);
        if state.rng.random::<f32>() < WALL_CHIP_CHANCE {
            spawn_burst(state, contact.point, 20.0, palette::WALL_BROKEN, 3, 1.0);
        }

        if wall.hp > 0.0 {
            state.push_event(GameEvent::WallDamaged { id: wall.id, hp: wall.hp });
            return true;
        }

        state.stats.walls_broken += 1;
        spawn_burst(state, wall.rect.center(), 0.0, palette::WALL_BASE, 15, 1.0);
        state.shake(SHAKE_WALL_BREAK);
        state.push_event(GameEvent::WallBroken { id: wall.id, ring: wall.ring });
        log::debug!("Wall {} (ring {}) broken", wall.id, wall.ring);
        false
    });

    state.walls = walls;
}

/// Smash every prop the monster touches (always one hit)
pub fn resolve_props(state: &mut GameState) {
    let mut props = std::mem::take(&mut state.props);

    props.retain_mut(|prop| {
        if !circle_rect_collision(state.monster.pos, state.monster.radius, &prop.rect).hit {
            return true;
        }
        prop.hp = 0;
        prop.dead = true;
        state.stats.props_smashed += 1;
        spawn_burst(state, prop.rect.center(), 20.0, prop.kind.debris_color(), 12, 1.5);
        state.shake(SHAKE_PROP);
        state.push_event(GameEvent::PropSmashed { id: prop.id, kind: prop.kind });
        false
    });

    state.props = props;
}

/// Monster eats the human `id` standing at `pos`
pub fn consume_human(state: &mut GameState, id: u32, pos: Vec2) {
    spawn_burst(state, pos, 20.0, palette::BLOOD, 15, 1.0);
    state.stats.humans_eaten += 1;
    state.eat_flash = EAT_FLASH_FRAMES;
    state.shake(SHAKE_EAT);
    state.push_event(GameEvent::HumanEaten { id, pos });

    if let Some(level) = state.monster.eat() {
        log::debug!("Monster reached level {level}");
        state.push_event(GameEvent::LevelUp { level });
    }
    let stats = state.stats_event();
    state.push_event(stats);
}

/// Apply a projectile hit at `pos`; triggers defeat at the death threshold
pub fn hit_monster(state: &mut GameState, pos: Vec2, damage: f32) {
    spawn_burst(state, pos, 20.0, palette::MONSTER, 5, 1.0);
    state.monster.take_hit(damage);
    state.hurt_flash = HURT_FLASH_FRAMES;
    state.shake(SHAKE_HIT);
    state.push_event(GameEvent::MonsterHit {
        damage,
        radius: state.monster.radius,
    });
    let stats = state.stats_event();
    state.push_event(stats);

    if state.monster.is_dead() {
        state.finish(GamePhase::Defeat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::rect::Rect;
    use crate::sim::state::{Prop, PropKind, Wall};
    use proptest::prelude::*;

    fn arena() -> GameState {
        GameState::empty(1, &Settings::default())
    }

    fn wall_touching(state: &GameState, required_size: f32, hp: f32) -> Wall {
        // Wall whose left edge is 10 units right of the monster center
        let p = state.monster.pos;
        Wall {
            id: 900,
            rect: Rect::new(p.x + 10.0, p.y - 50.0, 40.0, 100.0),
            visual_height: 100.0,
            hp,
            max_hp: hp,
            breakable: true,
            required_size,
            ring: 0,
        }
    }

    #[test]
    fn test_small_monster_is_pushed_back() {
        let mut state = arena();
        let start = state.monster.pos;
        let wall = wall_touching(&state, 40.0, 60.0);
        state.walls.push(wall);

        resolve_walls(&mut state);

        assert_eq!(state.walls.len(), 1);
        assert_eq!(state.walls[0].hp, 60.0);
        // Pushed left by the 15 units of overlap
        assert!((state.monster.pos.x - (start.x - 15.0)).abs() < 1e-3);
        assert_eq!(state.monster.pos.y, start.y);
        assert_eq!(state.monster.vel, Vec2::ZERO);
        assert_eq!(state.stats.walls_broken, 0);
    }

    #[test]
    fn test_big_monster_breaks_wall_in_one_frame() {
        let mut state = arena();
        state.monster.radius = 45.0;
        let wall = wall_touching(&state, 40.0, 60.0);
        state.walls.push(wall);

        resolve_walls(&mut state);

        assert!(state.walls.is_empty());
        assert_eq!(state.stats.walls_broken, 1);
        assert!(state.particles.len() >= 15);
        assert_eq!(state.screen_shake, SHAKE_WALL_BREAK);
        assert!(state
            .events
            .contains(&GameEvent::WallBroken { id: 900, ring: 0 }));
    }

    #[test]
    fn test_tough_wall_wears_down_over_frames() {
        let mut state = arena();
        state.monster.radius = 45.0;
        let wall = wall_touching(&state, 40.0, 250.0);
        state.walls.push(wall);

        resolve_walls(&mut state);
        assert_eq!(state.walls[0].hp, 150.0);
        resolve_walls(&mut state);
        assert_eq!(state.walls[0].hp, 50.0);
        resolve_walls(&mut state);
        assert!(state.walls.is_empty());
        assert_eq!(state.stats.walls_broken, 1);
    }

    #[test]
    fn test_unbreakable_wall_always_blocks() {
        let mut state = arena();
        state.monster.radius = 200.0;
        let mut wall = wall_touching(&state, 40.0, 60.0);
        wall.breakable = false;
        state.walls.push(wall);
        resolve_walls(&mut state);
        assert_eq!(state.walls[0].hp, 60.0);
    }

    #[test]
    fn test_prop_smashed_on_touch() {
        let mut state = arena();
        let p = state.monster.pos;
        state.props.push(Prop::new(5, PropKind::CryoTank, p + Vec2::new(20.0, -10.0)));
        state.props.push(Prop::new(6, PropKind::ServerRack, p + Vec2::new(500.0, 0.0)));

        resolve_props(&mut state);

        assert_eq!(state.props.len(), 1);
        assert_eq!(state.props[0].id, 6);
        assert_eq!(state.stats.props_smashed, 1);
        assert_eq!(state.particles.len(), 12);
        assert_eq!(state.screen_shake, SHAKE_PROP);
    }

    #[test]
    fn test_eating_two_humans() {
        let mut state = arena();
        consume_human(&mut state, 1, Vec2::ZERO);
        consume_human(&mut state, 2, Vec2::ZERO);
        assert_eq!(state.monster.radius, 30.0);
        assert_eq!(state.monster.exp, 2);
        assert_eq!(state.monster.level, 1);
        assert_eq!(state.stats.humans_eaten, 2);
        assert_eq!(state.eat_flash, EAT_FLASH_FRAMES);
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::StatsChanged { size: 30.0, eaten: 2 })
        );
    }

    #[test]
    fn test_level_threshold_scales_floored() {
        let mut m = Monster::new(Vec2::ZERO);
        let mut levels = Vec::new();
        for _ in 0..12 {
            if let Some(level) = m.eat() {
                levels.push((level, m.next_level_exp));
            }
        }
        // 5 -> 7 (7.5 floored) -> 10 (10.5 floored) -> 15
        assert_eq!(levels, vec![(2, 7), (3, 10), (4, 15)]);
    }

    #[test]
    fn test_hit_shrinks_and_floors() {
        let mut m = Monster::new(Vec2::ZERO);
        m.take_hit(3.0);
        assert_eq!(m.radius, 22.0);
        assert!((m.visual_height - 49.4).abs() < 1e-4);
        m.take_hit(100.0);
        assert_eq!(m.radius, MIN_MONSTER_RADIUS);
        // Height loses only a fifth of the damage: 49.4 - 20 = 29.4
        assert!((m.visual_height - 29.4).abs() < 1e-4);
        m.take_hit(100.0);
        assert_eq!(m.radius, MIN_MONSTER_RADIUS);
        assert_eq!(m.visual_height, MIN_MONSTER_VISUAL_HEIGHT);
    }

    #[test]
    fn test_fatal_hit_triggers_defeat_once() {
        let mut state = arena();
        state.monster.radius = 13.0;
        let at = state.monster.pos;
        hit_monster(&mut state, at, 1.5);
        assert_eq!(state.phase, GamePhase::Defeat);
        hit_monster(&mut state, at, 1.5);
        let defeats = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::PhaseChanged(GamePhase::Defeat))
            .count();
        assert_eq!(defeats, 1);
        assert_eq!(state.hurt_flash, HURT_FLASH_FRAMES);
    }

    #[test]
    fn test_diagonal_keys_not_faster() {
        let mut m = Monster::new(Vec2::ZERO);
        m.apply_intent(Vec2::new(1.0, 1.0));
        assert!((m.pos.length() - MONSTER_SPEED).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_base(x in -3.0f32..3.0, y in -3.0f32..3.0) {
            let mut m = Monster::new(Vec2::ZERO);
            m.apply_intent(Vec2::new(x, y));
            let len = Vec2::new(x, y).length();
            let moved = m.pos.length();
            prop_assert!(moved <= MONSTER_SPEED + 1e-3);
            if len <= 1.0 {
                prop_assert!((moved - len * MONSTER_SPEED).abs() < 1e-3);
            }
        }

        #[test]
        fn prop_wall_hp_never_increases(radius in 20.0f32..80.0, frames in 1usize..6) {
            let mut state = arena();
            state.monster.radius = radius;
            let wall = wall_touching(&state, 40.0, 400.0);
            state.walls.push(wall);
            let mut last = 400.0;
            for _ in 0..frames {
                resolve_walls(&mut state);
                match state.walls.first() {
                    Some(w) => {
                        prop_assert!(w.hp <= last);
                        prop_assert!(w.hp > 0.0);
                        last = w.hp;
                    }
                    None => break,
                }
            }
        }
    }
}
