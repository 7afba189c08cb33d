//! Collision shapes and separating-axis intersection tests.
//!
//! Every intersection query returns the minimum translation vector (MTV):
//! the shortest displacement that moves `self` out of `other`.

use glam::Vec2;

/// Axis-aligned extent of a shape in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }
        if min.x > max.x {
            return Self {
                min: Vec2::ZERO,
                max: Vec2::ZERO,
            };
        }
        Self { min, max }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn from_top_left(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            min: self.min,
            max: self.min + self.size,
        }
    }

    /// Corners in clockwise screen order starting at the top-left.
    fn corners(&self) -> [Vec2; 4] {
        let max = self.min + self.size;
        [
            self.min,
            Vec2::new(max.x, self.min.y),
            max,
            Vec2::new(self.min.x, max.y),
        ]
    }
}

/// Convex polygon stored as local vertices around `position`, which is kept at
/// the center of the polygon's bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    pub position: Vec2,
    points: Vec<Vec2>,
}

impl ConvexPolygon {
    /// Build from vertices relative to `position`. The reference point is
    /// re-based onto the bounding-box center so re-centering stays consistent.
    pub fn new(position: Vec2, points: Vec<Vec2>) -> Self {
        let local = Bounds::from_points(points.iter().copied());
        let offset = local.center();
        Self {
            position: position + offset,
            points: points.into_iter().map(|p| p - offset).collect(),
        }
    }

    /// Build from vertices expressed relative to a top-left anchor.
    pub fn from_top_left(x: f32, y: f32, points: Vec<Vec2>) -> Self {
        Self::new(Vec2::new(x, y), points)
    }

    pub fn local_points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn world_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(move |p| *p + self.position)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(self.world_points())
    }
}

/// Collision shape in world space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Polygon(ConvexPolygon),
}

impl Shape {
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Shape::Rect(Rect::from_top_left(x, y, width, height))
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Rect(rect) => rect.bounds(),
            Shape::Polygon(poly) => poly.bounds(),
        }
    }

    /// Re-center the shape on `center`.
    pub fn set_position(&mut self, center: Vec2) {
        match self {
            Shape::Rect(rect) => rect.min = center - rect.size * 0.5,
            Shape::Polygon(poly) => poly.position = center,
        }
    }

    /// Place the shape so its bounding box starts at `top_left`.
    pub fn set_top_left(&mut self, top_left: Vec2) {
        match self {
            Shape::Rect(rect) => rect.min = top_left,
            Shape::Polygon(_) => {
                let half = self.bounds().size() * 0.5;
                self.set_position(top_left + half);
            }
        }
    }

    fn vertices(&self) -> Vec<Vec2> {
        match self {
            Shape::Rect(rect) => rect.corners().to_vec(),
            Shape::Polygon(poly) => poly.world_points().collect(),
        }
    }

    /// MTV that separates `self` from `other`, or `None` when they do not
    /// overlap. Shapes that merely touch (zero overlap) do not intersect.
    ///
    /// Candidate axes are the edge normals of `self` in vertex order followed
    /// by those of `other`; the first axis with strictly smallest overlap wins.
    /// For rectangles this tests the vertical axis before the horizontal one.
    pub fn intersection(&self, other: &Shape) -> Option<Vec2> {
        let a = self.vertices();
        let b = other.vertices();
        if a.len() < 2 || b.len() < 2 {
            return None;
        }
        let center_delta = self.bounds().center() - other.bounds().center();

        let mut best: Option<(f32, Vec2)> = None;
        for axis in edge_normals(&a).chain(edge_normals(&b)) {
            let (min_a, max_a) = project(&a, axis);
            let (min_b, max_b) = project(&b, axis);

            // Distance `self` must travel along +axis / -axis to clear `other`.
            let push_pos = max_b - min_a;
            let push_neg = max_a - min_b;
            if push_pos <= 0.0 || push_neg <= 0.0 {
                return None;
            }

            let candidate = if push_pos < push_neg
                || (push_pos == push_neg && center_delta.dot(axis) >= 0.0)
            {
                (push_pos, axis)
            } else {
                (push_neg, -axis)
            };

            match best {
                Some((depth, _)) if depth <= candidate.0 => {}
                _ => best = Some(candidate),
            }
        }

        best.map(|(depth, axis)| axis * depth)
    }

    pub fn intersects(&self, other: &Shape) -> bool {
        self.intersection(other).is_some()
    }
}

fn edge_normals(points: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = if points.len() < 2 { 0 } else { points.len() };
    (0..n).filter_map(move |i| {
        let edge = points[(i + 1) % points.len()] - points[i];
        let normal = Vec2::new(edge.y, -edge.x);
        (normal.length_squared() > 0.0).then(|| normal.normalize())
    })
}

fn project(points: &[Vec2], axis: Vec2) -> (f32, f32) {
    points
        .iter()
        .map(|p| p.dot(axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn rect_bounds_and_recenter() {
        let mut shape = Shape::rect(10.0, 20.0, 16.0, 8.0);
        let bounds = shape.bounds();
        assert_eq!(bounds.width(), 16.0);
        assert_eq!(bounds.height(), 8.0);
        shape.set_position(Vec2::new(0.0, 0.0));
        assert_eq!(shape.bounds().min, Vec2::new(-8.0, -4.0));
        shape.set_top_left(Vec2::new(1.0, 2.0));
        assert_eq!(shape.bounds().min, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn rect_landing_resolves_upward() {
        // Player bottom sinks 2px into a floor.
        let player = Shape::rect(0.0, 0.0, 10.0, 10.0);
        let floor = Shape::rect(-20.0, 8.0, 50.0, 10.0);
        let mtv = player.intersection(&floor).unwrap();
        assert!(close(mtv, Vec2::new(0.0, -2.0)));
        // Symmetric query pushes the floor down.
        assert!(close(floor.intersection(&player).unwrap(), Vec2::new(0.0, 2.0)));
    }

    #[test]
    fn rect_side_hit_resolves_horizontally() {
        let player = Shape::rect(0.0, 0.0, 10.0, 10.0);
        let wall = Shape::rect(9.0, -20.0, 5.0, 50.0);
        assert!(close(player.intersection(&wall).unwrap(), Vec2::new(-1.0, 0.0)));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Shape::rect(0.0, 0.0, 10.0, 10.0);
        let b = Shape::rect(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersection(&b).is_none());
        assert!(!a.intersects(&Shape::rect(0.0, 30.0, 5.0, 5.0)));
    }

    #[test]
    fn equal_penetration_prefers_vertical_axis() {
        let a = Shape::rect(0.0, 0.0, 10.0, 10.0);
        let b = Shape::rect(8.0, 8.0, 10.0, 10.0);
        let mtv = a.intersection(&b).unwrap();
        assert!(close(mtv, Vec2::new(0.0, -2.0)));
    }

    #[test]
    fn polygon_recenters_on_bounding_box() {
        // Right triangle rising to the right, 40x30, anchored at (100, 50).
        let poly = ConvexPolygon::from_top_left(
            100.0,
            50.0,
            vec![Vec2::new(0.0, 30.0), Vec2::new(40.0, 0.0), Vec2::new(40.0, 30.0)],
        );
        assert!(close(poly.position, Vec2::new(120.0, 65.0)));
        let bounds = poly.bounds();
        assert!(close(bounds.min, Vec2::new(100.0, 50.0)));
        assert!(close(bounds.max, Vec2::new(140.0, 80.0)));
    }

    #[test]
    fn box_on_slope_is_pushed_along_slope_normal() {
        let slope = Shape::Polygon(ConvexPolygon::from_top_left(
            0.0,
            0.0,
            vec![Vec2::new(0.0, 40.0), Vec2::new(40.0, 0.0), Vec2::new(40.0, 40.0)],
        ));
        let crate_box = Shape::rect(16.0, 14.0, 6.0, 6.0);
        let mtv = crate_box.intersection(&slope).unwrap();
        // Out along the diagonal face: up and to the left.
        assert!(mtv.x < 0.0 && mtv.y < 0.0);
        assert!((mtv.x - mtv.y).abs() < 1e-4);
    }

    #[test]
    fn degenerate_polygon_never_intersects() {
        let dot = Shape::Polygon(ConvexPolygon::new(Vec2::ZERO, vec![Vec2::ZERO]));
        let rect = Shape::rect(-5.0, -5.0, 10.0, 10.0);
        assert!(rect.intersection(&dot).is_none());
    }

    proptest! {
        #[test]
        fn applying_mtv_separates_rects(
            ax in -50.0f32..50.0, ay in -50.0f32..50.0,
            aw in 1.0f32..30.0, ah in 1.0f32..30.0,
            bx in -50.0f32..50.0, by in -50.0f32..50.0,
            bw in 1.0f32..30.0, bh in 1.0f32..30.0,
        ) {
            let a = Shape::rect(ax, ay, aw, ah);
            let b = Shape::rect(bx, by, bw, bh);
            if let Some(mtv) = a.intersection(&b) {
                let mut moved = a.clone();
                moved.set_top_left(Vec2::new(ax, ay) + mtv + mtv.normalize() * 0.01);
                prop_assert!(moved.intersection(&b).is_none());
                // Never longer than the smaller extent pair along an axis.
                prop_assert!(mtv.length() <= (aw + bw).max(ah + bh));
            }
        }
    }
}
