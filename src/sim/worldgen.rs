//! Concentric ring laboratory generation
//!
//! Ring 0 is the square center room. Each further ring wraps the previous
//! one and has tougher walls, more people, and a larger share of armed
//! guards. Walls are cut into short segments so they break piecewise.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use super::state::{GameState, Human, HumanKind, Prop, PropKind, Wall};
use crate::settings::WorldConfig;

/// Monster radius needed to damage walls of ring `ring`
pub fn required_size_for_ring(ring: u32) -> f32 {
    crate::consts::INITIAL_MONSTER_SIZE + 15.0 + ring as f32 * 20.0
}

/// Hit points of a wall segment in ring `ring`
pub fn wall_hp_for_ring(ring: u32) -> f32 {
    60.0 + ring as f32 * 60.0
}

/// Populate `state` with walls, humans and props. Any previous content is
/// replaced.
pub fn generate_world(state: &mut GameState) {
    state.walls.clear();
    state.humans.clear();
    state.props.clear();
    state.projectiles.clear();
    state.particles.clear();

    let world = state.world.clone();
    let center = state.world_center;
    let mut skipped = 0u32;

    for ring in 0..world.ring_count {
        generate_ring_walls(state, &world, ring);

        let humans = world.humans_base + ring * world.humans_per_ring;
        for _ in 0..humans {
            match safe_position(&mut state.rng, &world, center, ring, world.human_padding) {
                Some(pos) => {
                    let id = state.next_entity_id();
                    let kind = roll_human_kind(&mut state.rng, ring);
                    let human = spawn_human(&mut state.rng, id, kind, pos);
                    state.humans.push(human);
                }
                None => skipped += 1,
            }
        }

        let props = world.props_base + ring * world.props_per_ring;
        for _ in 0..props {
            match safe_position(&mut state.rng, &world, center, ring, world.prop_padding) {
                Some(pos) => {
                    let id = state.next_entity_id();
                    let kind = if state.rng.random::<f32>() > 0.5 {
                        PropKind::ServerRack
                    } else {
                        PropKind::CryoTank
                    };
                    state.props.push(Prop::new(id, kind, pos));
                }
                None => skipped += 1,
            }
        }
    }

    log::info!(
        "Generated lab: rings={}, walls={}, humans={}, props={}, skipped={}",
        world.ring_count,
        state.walls.len(),
        state.humans.len(),
        state.props.len(),
        skipped
    );
}

/// Four sides of one ring, each split into fixed-length segments
fn generate_ring_walls(state: &mut GameState, world: &WorldConfig, ring: u32) {
    let size = world.ring_size(ring);
    let left = state.world_center.x - size / 2.0;
    let top = state.world_center.y - size / 2.0;
    let right = left + size;
    let bottom = top + size;

    let seg = world.wall_segment_size;
    let thick = world.wall_thickness;
    let hp = wall_hp_for_ring(ring);
    let required_size = required_size_for_ring(ring);

    let make_wall = |id: u32, rect: Rect| Wall {
        id,
        rect,
        visual_height: world.wall_visual_height,
        hp,
        max_hp: hp,
        breakable: true,
        required_size,
        ring,
    };

    // Top and bottom run the full width
    let across = (size / seg).ceil() as u32;
    for s in 0..across {
        let x = left + s as f32 * seg;
        let id = state.next_entity_id();
        state.walls.push(make_wall(id, Rect::new(x, top, seg, thick)));
        let id = state.next_entity_id();
        state.walls.push(make_wall(id, Rect::new(x, bottom - thick, seg, thick)));
    }

    // Left and right fill in between the top and bottom runs
    let down = ((size - thick * 2.0) / seg).ceil() as u32;
    for s in 0..down {
        let y = top + thick + s as f32 * seg;
        let id = state.next_entity_id();
        state.walls.push(make_wall(id, Rect::new(left, y, thick, seg)));
        let id = state.next_entity_id();
        state.walls.push(make_wall(id, Rect::new(right - thick, y, thick, seg)));
    }
}

/// Whether `pos` sits inside ring `ring` (outside the inner footprint and
/// inside the outer one), with `padding` kept clear of both boundaries.
/// The ring's own walls are inset from its outer edge, so their thickness
/// is kept clear too.
pub fn is_safe_position(world: &WorldConfig, center: Vec2, ring: u32, padding: f32, pos: Vec2) -> bool {
    let d = (pos - center).abs();
    let outer = world.ring_size(ring) / 2.0 - world.wall_thickness - padding;

    if ring == 0 {
        return d.x < outer && d.y < outer;
    }

    let inner = world.ring_size(ring - 1) / 2.0 + padding;
    let outside_inner = d.x > inner || d.y > inner;
    outside_inner && d.x < outer && d.y < outer
}

/// Random spot inside ring `ring`, or `None` after the attempt cap
fn safe_position<R: Rng>(
    rng: &mut R,
    world: &WorldConfig,
    center: Vec2,
    ring: u32,
    padding: f32,
) -> Option<Vec2> {
    let size = world.ring_size(ring);
    let origin = center - Vec2::splat(size / 2.0);

    for _ in 0..world.placement_attempts {
        let pos = origin + Vec2::new(rng.random::<f32>(), rng.random::<f32>()) * size;
        if is_safe_position(world, center, ring, padding, pos) {
            return Some(pos);
        }
    }
    None
}

/// Archetype odds shift outward: inner rings are unarmed, outer rings
/// are mostly soldiers and elites
pub fn roll_human_kind<R: Rng>(rng: &mut R, ring: u32) -> HumanKind {
    let roll = rng.random::<f32>();
    match ring {
        0 | 1 => {
            if roll > 0.7 {
                HumanKind::Guard
            } else {
                HumanKind::Scientist
            }
        }
        2 => {
            if roll > 0.6 {
                HumanKind::Soldier
            } else if roll > 0.4 {
                HumanKind::Guard
            } else {
                HumanKind::Scientist
            }
        }
        _ => {
            if roll > 0.7 {
                HumanKind::Elite
            } else if roll > 0.4 {
                HumanKind::Soldier
            } else {
                HumanKind::Scientist
            }
        }
    }
}

fn spawn_human<R: Rng>(rng: &mut R, id: u32, kind: HumanKind, pos: Vec2) -> Human {
    let mut human = Human::new(id, kind, pos);
    human.anim_offset = rng.random::<f32>() * 10.0;
    human.speed += rng.random::<f32>();
    human.direction = rng.random::<f32>() * std::f32::consts::TAU;
    human.attack_cooldown = rng.random::<f32>() * human.max_cooldown;
    human
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn lab(seed: u64) -> GameState {
        GameState::new(seed, &Settings::default())
    }

    #[test]
    fn test_wall_scaling_is_linear() {
        assert_eq!(required_size_for_ring(0), 40.0);
        assert_eq!(required_size_for_ring(4), 120.0);
        assert_eq!(wall_hp_for_ring(0), 60.0);
        assert_eq!(wall_hp_for_ring(2), 180.0);
    }

    #[test]
    fn test_wall_count_per_ring() {
        let state = lab(7);
        let world = WorldConfig::default();
        for ring in 0..world.ring_count {
            let size = world.ring_size(ring);
            let across = (size / 100.0).ceil() as usize;
            let down = ((size - 80.0) / 100.0).ceil() as usize;
            let count = state.walls.iter().filter(|w| w.ring == ring).count();
            assert_eq!(count, 2 * across + 2 * down, "ring {ring}");
        }
        assert!(state.walls.iter().all(|w| w.hp == w.max_hp && w.breakable));
    }

    #[test]
    fn test_population_stays_in_its_ring() {
        let state = lab(42);
        let world = WorldConfig::default();
        for prop in &state.props {
            let hits = (0..world.ring_count)
                .filter(|&r| is_safe_position(&world, state.world_center, r, 60.0, prop.rect.pos))
                .count();
            assert_eq!(hits, 1);
        }
        // Humans never start inside a wall
        for human in &state.humans {
            for wall in &state.walls {
                let hit = crate::sim::collision::circle_rect_collision(human.pos, human.radius, &wall.rect);
                assert!(!hit.hit, "human {} spawned inside wall {}", human.id, wall.id);
            }
        }
    }

    #[test]
    fn test_inner_rings_are_unarmed() {
        let state = lab(3);
        let world = WorldConfig::default();
        for human in &state.humans {
            let inner_two = is_safe_position(&world, state.world_center, 0, 30.0, human.pos)
                || is_safe_position(&world, state.world_center, 1, 30.0, human.pos);
            if inner_two {
                assert!(!human.can_shoot);
            }
        }
        assert!(state.humans.iter().any(|h| h.kind == HumanKind::Elite));
    }

    #[test]
    fn test_safe_position_bands() {
        let world = WorldConfig::default();
        let c = Vec2::new(2550.0, 2550.0);
        // Center room
        assert!(is_safe_position(&world, c, 0, 30.0, c));
        assert!(!is_safe_position(&world, c, 0, 30.0, c + Vec2::new(280.0, 0.0)));
        // Ring 1 spans 300..750 from center on at least one axis
        assert!(!is_safe_position(&world, c, 1, 30.0, c + Vec2::new(100.0, 100.0)));
        assert!(is_safe_position(&world, c, 1, 30.0, c + Vec2::new(500.0, 0.0)));
        assert!(!is_safe_position(&world, c, 1, 30.0, c + Vec2::new(740.0, 0.0)));
    }

    #[test]
    fn test_impossible_padding_skips_silently() {
        let settings = Settings {
            world: WorldConfig {
                ring_count: 1,
                human_padding: 400.0,
                prop_padding: 400.0,
                ..WorldConfig::default()
            },
            ..Settings::default()
        };
        let state = GameState::new(5, &settings);
        assert!(state.humans.is_empty());
        assert!(state.props.is_empty());
        assert!(!state.walls.is_empty());
    }

    #[test]
    fn test_regeneration_is_structurally_stable() {
        let mut state = lab(11);
        let walls = state.walls.len();
        state.walls.pop();
        generate_world(&mut state);
        assert_eq!(state.walls.len(), walls);
    }

    #[test]
    fn test_same_seed_same_lab() {
        let a = lab(99);
        let b = lab(99);
        assert_eq!(a.humans.len(), b.humans.len());
        assert_eq!(a.props.len(), b.props.len());
        for (ha, hb) in a.humans.iter().zip(&b.humans) {
            assert_eq!(ha.pos, hb.pos);
            assert_eq!(ha.kind, hb.kind);
        }
    }
}
