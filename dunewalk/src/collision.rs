//! Static obstacle set and the queries movement runs against it.
//!
//! All containment tests are strict: a point lying exactly on an edge is
//! outside. Rectangles are centre-anchored (see [`Rect`]).

use serde::{Deserialize, Serialize};

use crate::error::{DuneError, DuneResult};
use crate::math::{Rect, Vec2};

/// Index of a collider inside a [`CollisionWorld`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderId(usize);

impl ColliderId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// How [`cast_ray`] walks from its origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RayMode {
    /// Step each axis independently over `1..max_length`. A diagonal
    /// direction scans a square region ahead of the origin rather than a line.
    #[default]
    Sweep,
    /// Step along the normalised direction at unit intervals.
    Line,
}

/// True iff `point` is strictly inside `rect`.
pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    if rect.is_degenerate() {
        return false;
    }
    let min = rect.min();
    let max = rect.max();
    point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y
}

/// True iff any corner of either rectangle is strictly inside the other.
///
/// This misses overlaps where neither rectangle has a corner inside the
/// other, e.g. a tall thin rect crossing a wide flat one.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.corners().iter().any(|&c| point_in_rect(c, b))
        || b.corners().iter().any(|&c| point_in_rect(c, a))
}

/// Returns true if a ray from `origin` along `direction` touches `target`
/// within `max_length` unit steps.
///
/// NaN direction components are treated as zero.
pub fn cast_ray(origin: Vec2, direction: Vec2, max_length: u32, target: &Rect, mode: RayMode) -> bool {
    cast_ray_spaced(origin, direction, max_length, 1.0, target, mode)
}

/// [`cast_ray`] with probes `spacing` units apart instead of one.
///
/// Movement uses `1 / zoom` so the lookahead covers the same screen distance
/// at every zoom level. A non-positive or non-finite spacing falls back to 1.
pub fn cast_ray_spaced(
    origin: Vec2,
    direction: Vec2,
    max_length: u32,
    spacing: f32,
    target: &Rect,
    mode: RayMode,
) -> bool {
    if target.is_degenerate() {
        return false;
    }
    let spacing = if spacing.is_finite() && spacing > 0.0 { spacing } else { 1.0 };
    let dir = direction.sanitized();
    match mode {
        RayMode::Sweep => {
            let step = dir * spacing;
            for i in 1..max_length {
                for j in 1..max_length {
                    let probe = Vec2::new(origin.x + i as f32 * step.x, origin.y + j as f32 * step.y);
                    if point_in_rect(probe, target) {
                        return true;
                    }
                }
            }
            false
        }
        RayMode::Line => {
            let step = dir.normalized() * spacing;
            if step.is_zero() {
                return false;
            }
            (1..max_length).any(|t| point_in_rect(origin + step * t as f32, target))
        }
    }
}

/// Ordered set of static axis-aligned obstacles.
///
/// Built once from layout data and then frozen; the only later mutation is
/// [`CollisionWorld::relocate`].
#[derive(Clone, Debug, Default)]
pub struct CollisionWorld {
    colliders: Vec<Rect>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a world from a list of rectangles, rejecting degenerate ones.
    pub fn from_rects<I>(rects: I) -> DuneResult<Self>
    where
        I: IntoIterator<Item = Rect>,
    {
        let mut world = Self::new();
        for rect in rects {
            world.add(rect)?;
        }
        Ok(world)
    }

    /// Append a collider. Zero, negative or non-finite sizes are a layout error.
    pub fn add(&mut self, rect: Rect) -> DuneResult<ColliderId> {
        let index = self.colliders.len();
        if rect.is_degenerate() {
            return Err(DuneError::DegenerateRectangle {
                index,
                width: rect.width,
                height: rect.height,
            });
        }
        self.colliders.push(rect);
        Ok(ColliderId(index))
    }

    pub fn get(&self, id: ColliderId) -> Option<&Rect> {
        self.colliders.get(id.0)
    }

    /// Move a collider's centre. Returns false if the id is unknown.
    pub fn relocate(&mut self, id: ColliderId, center: Vec2) -> bool {
        match self.colliders.get_mut(id.0) {
            Some(rect) => {
                *rect = rect.with_center(center);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &Rect)> {
        self.colliders
            .iter()
            .enumerate()
            .map(|(i, rect)| (ColliderId(i), rect))
    }

    /// First collider strictly containing `point`.
    pub fn contains_point(&self, point: Vec2) -> Option<ColliderId> {
        self.iter()
            .find(|(_, rect)| point_in_rect(point, rect))
            .map(|(id, _)| id)
    }

    /// First collider hit by a ray, in insertion order.
    pub fn blocks_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_length: u32,
        mode: RayMode,
    ) -> Option<ColliderId> {
        self.blocks_ray_spaced(origin, direction, max_length, 1.0, mode)
    }

    /// [`CollisionWorld::blocks_ray`] with probes `spacing` units apart.
    pub fn blocks_ray_spaced(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_length: u32,
        spacing: f32,
        mode: RayMode,
    ) -> Option<ColliderId> {
        self.iter()
            .find(|(_, rect)| cast_ray_spaced(origin, direction, max_length, spacing, rect, mode))
            .map(|(id, _)| id)
    }

    /// First collider overlapping `rect` under the corner test.
    pub fn overlapping(&self, rect: &Rect) -> Option<ColliderId> {
        self.iter()
            .find(|(_, other)| rects_overlap(rect, other))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Rect {
        Rect::from_top_left(Vec2::ZERO, 10.0, 10.0)
    }

    #[test]
    fn interior_points_are_contained() {
        let r = unit_box();
        assert!(point_in_rect(Vec2::new(5.0, 5.0), &r));
        assert!(point_in_rect(Vec2::new(0.001, 9.999), &r));
    }

    #[test]
    fn boundary_and_outside_points_are_not_contained() {
        let r = unit_box();
        for p in [
            Vec2::new(0.0, 5.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, 10.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-1.0, 5.0),
            Vec2::new(5.0, 11.0),
        ] {
            assert!(!point_in_rect(p, &r), "{p:?} should be outside");
        }
    }

    #[test]
    fn degenerate_rect_contains_nothing() {
        let r = Rect::new(5.0, 5.0, 0.0, 10.0);
        assert!(!point_in_rect(Vec2::new(5.0, 5.0), &r));
        assert!(!cast_ray(Vec2::ZERO, Vec2::new(1.0, 1.0), 20, &r, RayMode::Sweep));
    }

    #[test]
    fn corner_overlap_is_detected() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(6.0, 6.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &b));
        assert!(rects_overlap(&b, &a));
    }

    #[test]
    fn containment_without_corner_contact_counts_via_inner_corners() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rects_overlap(&outer, &inner));
    }

    #[test]
    fn cross_shaped_intersection_is_not_reported() {
        let tall = Rect::new(0.0, 0.0, 10.0, 100.0);
        let wide = Rect::new(0.0, 0.0, 100.0, 10.0);
        assert!(!rects_overlap(&tall, &wide));
    }

    #[test]
    fn edge_touching_rects_do_not_overlap() {
        let a = Rect::from_top_left(Vec2::ZERO, 10.0, 10.0);
        let b = Rect::from_top_left(Vec2::new(10.0, 0.0), 10.0, 10.0);
        assert!(!rects_overlap(&a, &b));
    }

    #[test]
    fn sweep_ray_hits_rect_ahead() {
        let target = Rect::new(10.0, 0.0, 20.0, 20.0);
        assert!(cast_ray(Vec2::ZERO, Vec2::new(1.0, 0.0), 20, &target, RayMode::Sweep));
        assert!(!cast_ray(Vec2::ZERO, Vec2::new(-1.0, 0.0), 20, &target, RayMode::Sweep));
    }

    #[test]
    fn sweep_ray_covers_a_square_for_diagonals() {
        // Off the diagonal line, but inside the swept square.
        let target = Rect::new(15.0, 3.0, 4.0, 4.0);
        assert!(cast_ray(Vec2::ZERO, Vec2::new(1.0, 1.0), 20, &target, RayMode::Sweep));
        assert!(!cast_ray(Vec2::ZERO, Vec2::new(1.0, 1.0), 20, &target, RayMode::Line));
    }

    #[test]
    fn line_ray_respects_length() {
        let target = Rect::new(30.0, 0.0, 10.0, 10.0);
        assert!(!cast_ray(Vec2::ZERO, Vec2::new(1.0, 0.0), 20, &target, RayMode::Line));
        assert!(cast_ray(Vec2::ZERO, Vec2::new(1.0, 0.0), 30, &target, RayMode::Line));
    }

    #[test]
    fn spaced_ray_reaches_further() {
        let target = Rect::new(150.0, 0.0, 20.0, 20.0);
        assert!(!cast_ray(Vec2::ZERO, Vec2::new(1.0, 0.0), 20, &target, RayMode::Sweep));
        assert!(cast_ray_spaced(Vec2::ZERO, Vec2::new(1.0, 0.0), 20, 10.0, &target, RayMode::Sweep));
        assert!(cast_ray_spaced(Vec2::ZERO, Vec2::new(1.0, 0.0), 20, 10.0, &target, RayMode::Line));
        // Bad spacing behaves like unit steps.
        assert!(!cast_ray_spaced(Vec2::ZERO, Vec2::new(1.0, 0.0), 20, f32::NAN, &target, RayMode::Line));
    }

    #[test]
    fn nan_direction_is_coerced_to_zero() {
        let target = Rect::new(10.0, 0.0, 20.0, 20.0);
        // y becomes 0, x still points at the target.
        assert!(cast_ray(Vec2::ZERO, Vec2::new(1.0, f32::NAN), 20, &target, RayMode::Sweep));
        // Both zero: the probe never leaves the origin, which sits on the edge.
        assert!(!cast_ray(Vec2::ZERO, Vec2::new(f32::NAN, f32::NAN), 20, &target, RayMode::Sweep));
        assert!(!cast_ray(Vec2::ZERO, Vec2::new(f32::NAN, f32::NAN), 20, &target, RayMode::Line));
    }

    #[test]
    fn world_rejects_degenerate_colliders() {
        let err = CollisionWorld::from_rects([
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 0.0, -4.0, 10.0),
        ])
        .expect_err("negative width should be rejected");
        match err {
            DuneError::DegenerateRectangle { index, width, .. } => {
                assert_eq!(index, 1);
                assert_eq!(width, -4.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn relocate_moves_collider_out_of_the_way() {
        let mut world = CollisionWorld::new();
        let id = world.add(Rect::new(50.0, 50.0, 10.0, 10.0)).expect("valid rect");
        assert_eq!(world.contains_point(Vec2::new(50.0, 50.0)), Some(id));

        assert!(world.relocate(id, Vec2::ZERO));
        assert_eq!(world.contains_point(Vec2::new(50.0, 50.0)), None);
        assert_eq!(world.get(id).map(|r| r.width), Some(10.0));
    }

    #[test]
    fn empty_world_blocks_nothing() {
        let world = CollisionWorld::new();
        assert!(world.is_empty());
        assert_eq!(world.blocks_ray(Vec2::ZERO, Vec2::new(1.0, 0.0), 20, RayMode::Sweep), None);
        assert_eq!(world.overlapping(&Rect::new(0.0, 0.0, 5.0, 5.0)), None);
    }
}
