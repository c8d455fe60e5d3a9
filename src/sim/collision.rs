//! Collision detection and response
//!
//! Everything in the lab is either a circle (monster, humans) or an
//! axis-aligned rectangle (walls, props). Projectiles are points.

use glam::Vec2;

use super::rect::Rect;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the rectangle to the circle center
    pub point: Vec2,
    /// Unit vector from the contact point toward the circle center
    /// (zero when the center is inside the rectangle)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a circle against a rectangle using the closest-point test
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let closest = rect.closest_point(center);
    let offset = center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 0.0 { offset / dist } else { Vec2::ZERO };

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: radius - dist,
    }
}

/// Push a circle out of a rectangle along the contact normal by exactly the
/// penetration depth. Returns whether the circle was touching.
///
/// A center that is already inside the rectangle has no defined normal and
/// is left where it is.
pub fn push_out_of_rect(center: &mut Vec2, radius: f32, rect: &Rect) -> bool {
    let result = circle_rect_collision(*center, radius, rect);
    if result.hit {
        *center += result.normal * result.penetration;
    }
    result.hit
}

/// Circle-vs-circle overlap (strict)
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Point strictly inside a circle
#[inline]
pub fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance(center) < radius
}
