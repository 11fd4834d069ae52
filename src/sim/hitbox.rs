//! Oriented rectangle hitboxes
//!
//! A hitbox is a closed convex polygon: four corners in winding order and the
//! four edge vectors between consecutive corners (the last edge closes the
//! polygon).

use glam::Vec2;

use crate::rotate_deg;

/// Axis-aligned corner signs, in winding order
const CORNER_SIGNS: [Vec2; 4] = [
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 1.0),
];

/// Oriented rectangle polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub points: [Vec2; 4],
    pub edges: [Vec2; 4],
}

impl Hitbox {
    /// Build the polygon of a rectangle centred on `center` with the given
    /// half extents, turned to the screen heading `angle` (degrees).
    ///
    /// Corners are rotated around the centre by `-angle`.
    pub fn build(center: Vec2, half_extents: Vec2, angle: f32) -> Self {
        let points = CORNER_SIGNS.map(|sign| center + rotate_deg(sign * half_extents, -angle));
        let edges = std::array::from_fn(|i| points[(i + 1) % 4] - points[i]);
        Self { points, edges }
    }

    /// Polygon centroid
    pub fn center(&self) -> Vec2 {
        self.points.iter().copied().sum::<Vec2>() / 4.0
    }

    /// Point-in-polygon test for a convex polygon (edges share one winding)
    pub fn contains_point(&self, point: Vec2) -> bool {
        let mut sign = 0.0_f32;
        for (corner, edge) in self.points.iter().zip(self.edges.iter()) {
            let cross = edge.perp_dot(point - *corner);
            if cross == 0.0 {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_axis_aligned_hitbox() {
        let hitbox = Hitbox::build(Vec2::new(10.0, 10.0), Vec2::new(5.0, 2.0), 0.0);
        assert!(approx(hitbox.points[0], Vec2::new(5.0, 8.0)));
        assert!(approx(hitbox.points[2], Vec2::new(15.0, 12.0)));
        assert!(approx(hitbox.edges[0], Vec2::new(10.0, 0.0)));
        assert!(approx(hitbox.edges[3], Vec2::new(0.0, -4.0)));
    }

    #[test]
    fn test_edges_close_polygon() {
        let hitbox = Hitbox::build(Vec2::new(3.0, -7.0), Vec2::new(10.0, 10.0), 37.0);
        let sum: Vec2 = hitbox.edges.iter().copied().sum();
        assert!(sum.length() < 1e-4);
        assert!(approx(hitbox.center(), Vec2::new(3.0, -7.0)));
    }

    #[test]
    fn test_rotation_keeps_extent() {
        let hitbox = Hitbox::build(Vec2::ZERO, Vec2::new(10.0, 10.0), 45.0);
        for point in hitbox.points {
            assert!((point.length() - 200.0_f32.sqrt()).abs() < 1e-3);
        }
        // A 45 degree square puts its corners on the axes
        assert!(hitbox.points.iter().any(|p| p.x.abs() < 1e-3));
    }

    #[test]
    fn test_contains_point() {
        let hitbox = Hitbox::build(Vec2::new(50.0, 50.0), Vec2::new(10.0, 10.0), 30.0);
        assert!(hitbox.contains_point(Vec2::new(50.0, 50.0)));
        assert!(hitbox.contains_point(Vec2::new(55.0, 52.0)));
        assert!(!hitbox.contains_point(Vec2::new(70.0, 50.0)));
    }
}
