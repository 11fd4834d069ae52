//! Collision kernel
//!
//! Pure geometry: Separating Axis Theorem for convex polygons and the
//! circle containment test used by tower areas. No state, no logging.

use glam::Vec2;

use super::hitbox::Hitbox;

/// Distance between two projected intervals; positive when they are apart
#[inline]
pub fn interval_gap(min_a: f32, max_a: f32, min_b: f32, max_b: f32) -> f32 {
    if min_b > max_a { min_b - max_a } else { min_a - max_b }
}

/// Project a point set onto an axis, returning (min, max)
fn project(points: &[Vec2], axis: Vec2) -> (f32, f32) {
    points
        .iter()
        .map(|p| p.dot(axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        })
}

/// Check the axes perpendicular to `edges_a` for a separating axis.
///
/// Returns true when both point sets overlap on every axis, i.e. none of
/// `edges_a` separates the shapes.
pub fn sat_overlap(edges_a: &[Vec2], points_a: &[Vec2], points_b: &[Vec2]) -> bool {
    for edge in edges_a {
        let axis = Vec2::new(-edge.y, edge.x).normalize_or_zero();
        if axis == Vec2::ZERO {
            continue;
        }
        let (min_a, max_a) = project(points_a, axis);
        let (min_b, max_b) = project(points_b, axis);
        if interval_gap(min_a, max_a, min_b, max_b) > 0.0 {
            return false;
        }
    }
    true
}

/// Intersection test for two convex polygons.
///
/// Both edge sets are tried: two rotated rectangles can overlap on all of one
/// shape's axes and still be separated by an axis of the other.
pub fn polygons_intersect(a: &Hitbox, b: &Hitbox) -> bool {
    sat_overlap(&a.edges, &a.points, &b.points) && sat_overlap(&b.edges, &b.points, &a.points)
}

/// Whether `point` lies inside (or on) the circle
#[inline]
pub fn circle_contains(center: Vec2, radius: f32, point: Vec2) -> bool {
    center.distance(point) <= radius
}
