//! Per-tick player movement against the collision world.

use crate::collision::{ColliderId, CollisionWorld, RayMode};
use crate::config::GameConfig;
use crate::math::{Rect, Vec2};

/// Result of resolving one tick of movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Screen-space displacement that was permitted. Zero when blocked.
    pub displacement: Vec2,
    /// Collider whose ray check cancelled the move, if any.
    pub blocked_by: Option<ColliderId>,
}

impl MoveOutcome {
    pub const STILL: Self = Self {
        displacement: Vec2::ZERO,
        blocked_by: None,
    };

    pub fn is_blocked(&self) -> bool {
        self.blocked_by.is_some()
    }
}

/// Turns an intent vector into a permitted displacement.
///
/// Blocking is all-or-nothing: any obstacle within lookahead along the
/// intent cancels the whole move, there is no sliding along walls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementResolver {
    pub speed: f32,
    pub lookahead: u32,
    pub ray_mode: RayMode,
    pub normalize_diagonal: bool,
}

impl MovementResolver {
    pub fn new(speed: f32, lookahead: u32) -> Self {
        Self {
            speed,
            lookahead,
            ray_mode: RayMode::default(),
            normalize_diagonal: true,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            speed: config.move_speed,
            lookahead: config.lookahead,
            ray_mode: config.ray_mode,
            normalize_diagonal: config.normalize_diagonal,
        }
    }

    #[must_use]
    pub fn with_ray_mode(mut self, mode: RayMode) -> Self {
        self.ray_mode = mode;
        self
    }

    #[must_use]
    pub fn with_diagonal_normalization(mut self, enabled: bool) -> Self {
        self.normalize_diagonal = enabled;
        self
    }

    /// Unobstructed displacement for `intent`.
    pub fn displacement(&self, intent: Vec2) -> Vec2 {
        let intent = intent.sanitized();
        let raw = intent * self.speed;
        if self.normalize_diagonal && intent.manhattan_length() > 1.0 {
            // Cap the combined step at what a single axis would move.
            let len = intent.length();
            let cap = intent.x.abs().max(intent.y.abs());
            return raw * (cap / len);
        }
        raw
    }

    /// Resolve one tick at zoom 1. `player_box` must already be synced to the player's position.
    pub fn resolve(&self, intent: Vec2, player_box: &Rect, world: &CollisionWorld) -> MoveOutcome {
        self.resolve_at_zoom(intent, player_box, world, 1.0)
    }

    /// Resolve one tick while the world is drawn at `zoom`.
    ///
    /// Speed and lookahead are screen distances, so both shrink to
    /// `1 / zoom` world units per step. A move whose end point lands inside
    /// a collider is rejected as well.
    pub fn resolve_at_zoom(&self, intent: Vec2, player_box: &Rect, world: &CollisionWorld, zoom: f32) -> MoveOutcome {
        let intent = intent.sanitized();
        if intent.is_zero() {
            return MoveOutcome::STILL;
        }
        let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        let origin = player_box.center();
        let displacement = self.displacement(intent);

        let blocked = world
            .blocks_ray_spaced(origin, intent, self.lookahead, 1.0 / zoom, self.ray_mode)
            .or_else(|| world.contains_point(origin + displacement / zoom));
        if let Some(id) = blocked {
            log::debug!("movement blocked by collider #{}", id.index());
            return MoveOutcome {
                displacement: Vec2::ZERO,
                blocked_by: Some(id),
            };
        }

        MoveOutcome {
            displacement,
            blocked_by: None,
        }
    }
}

/// Apply a permitted displacement.
///
/// The world is pushed the opposite way in screen space, and the player walks
/// by the same amount converted back to world units so it stays centred.
pub fn apply_displacement(displacement: Vec2, world_offset: &mut Vec2, player_position: &mut Vec2, zoom: f32) {
    let last = *world_offset;
    *world_offset -= displacement;
    let delta = last - *world_offset;
    if zoom > 0.0 {
        *player_position += delta / zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_box_at(p: Vec2) -> Rect {
        Rect::centered(p, 16.0, 16.0)
    }

    #[test]
    fn obstacle_ahead_cancels_the_move() {
        let world = CollisionWorld::from_rects([Rect::new(10.0, 0.0, 20.0, 20.0)]).expect("valid");
        let resolver = MovementResolver::new(3.0, 20);

        let outcome = resolver.resolve(Vec2::new(1.0, 0.0), &player_box_at(Vec2::ZERO), &world);
        assert_eq!(outcome.displacement, Vec2::ZERO);
        assert!(outcome.is_blocked());
    }

    #[test]
    fn empty_world_permits_full_displacement() {
        let world = CollisionWorld::new();
        let resolver = MovementResolver::new(3.0, 20);

        let outcome = resolver.resolve(Vec2::new(1.0, 0.0), &player_box_at(Vec2::ZERO), &world);
        assert_eq!(outcome, MoveOutcome {
            displacement: Vec2::new(3.0, 0.0),
            blocked_by: None,
        });

        let outcome = resolver.resolve(Vec2::new(0.0, -1.0), &player_box_at(Vec2::ZERO), &world);
        assert_eq!(outcome.displacement, Vec2::new(0.0, -3.0));
    }

    #[test]
    fn obstacle_behind_does_not_block() {
        let world = CollisionWorld::from_rects([Rect::new(10.0, 0.0, 20.0, 20.0)]).expect("valid");
        let resolver = MovementResolver::new(3.0, 20);

        let outcome = resolver.resolve(Vec2::new(-1.0, 0.0), &player_box_at(Vec2::ZERO), &world);
        assert_eq!(outcome.displacement, Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn obstacle_beyond_lookahead_does_not_block() {
        let world = CollisionWorld::from_rects([Rect::new(60.0, 0.0, 20.0, 20.0)]).expect("valid");
        let resolver = MovementResolver::new(3.0, 20);

        let outcome = resolver.resolve(Vec2::new(1.0, 0.0), &player_box_at(Vec2::ZERO), &world);
        assert!(!outcome.is_blocked());
    }

    #[test]
    fn diagonal_speed_is_capped_to_single_axis() {
        let resolver = MovementResolver::new(3.0, 20);
        let d = resolver.displacement(Vec2::new(1.0, 1.0));
        assert!(d.length() <= 3.0 + 1e-5, "diagonal magnitude {}", d.length());
        assert!((d.length() - 3.0).abs() < 1e-5);
        assert!((d.x - d.y).abs() < 1e-6);

        let d = resolver.displacement(Vec2::new(-1.0, 1.0));
        assert!((d.length() - 3.0).abs() < 1e-5);
        assert!(d.x < 0.0 && d.y > 0.0);
    }

    #[test]
    fn diagonal_normalization_can_be_disabled() {
        let resolver = MovementResolver::new(3.0, 20).with_diagonal_normalization(false);
        let d = resolver.displacement(Vec2::new(1.0, 1.0));
        assert!((d.length() - 3.0 * 2f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn zero_intent_stays_still() {
        let world = CollisionWorld::from_rects([Rect::new(0.0, 0.0, 20.0, 20.0)]).expect("valid");
        let resolver = MovementResolver::new(3.0, 20);
        assert_eq!(
            resolver.resolve(Vec2::ZERO, &player_box_at(Vec2::ZERO), &world),
            MoveOutcome::STILL
        );
    }

    #[test]
    fn end_point_inside_a_collider_is_rejected() {
        // A lookahead of 1 casts no probes, so only the end check can block.
        let world = CollisionWorld::from_rects([Rect::new(3.0, 0.0, 2.0, 2.0)]).expect("valid");
        let resolver = MovementResolver::new(3.0, 1);

        let outcome = resolver.resolve(Vec2::new(1.0, 0.0), &player_box_at(Vec2::ZERO), &world);
        assert_eq!(outcome.blocked_by, world.contains_point(Vec2::new(3.0, 0.0)));
        assert_eq!(outcome.displacement, Vec2::ZERO);
    }

    #[test]
    fn lookahead_scales_with_zoom() {
        // At zoom 0.1 one step is 30 world units; the wall 60 units away must still block.
        let world = CollisionWorld::from_rects([Rect::new(60.0, 0.0, 48.0, 48.0)]).expect("valid");
        let resolver = MovementResolver::new(3.0, 20);
        let player = player_box_at(Vec2::ZERO);

        assert!(!resolver.resolve(Vec2::new(1.0, 0.0), &player, &world).is_blocked());
        assert!(resolver.resolve_at_zoom(Vec2::new(1.0, 0.0), &player, &world, 0.1).is_blocked());
        // Zoomed in, the same screen lookahead covers less of the world.
        let near = CollisionWorld::from_rects([Rect::new(24.0, 0.0, 20.0, 20.0)]).expect("valid");
        assert!(resolver.resolve(Vec2::new(1.0, 0.0), &player, &near).is_blocked());
        assert!(!resolver.resolve_at_zoom(Vec2::new(1.0, 0.0), &player, &near, 2.0).is_blocked());
    }

    #[test]
    fn applying_displacement_moves_world_opposite_and_player_by_zoom() {
        let mut offset = Vec2::new(512.0, 384.0);
        let mut player = Vec2::new(1000.0, 1000.0);
        apply_displacement(Vec2::new(3.0, 0.0), &mut offset, &mut player, 2.0);

        assert_eq!(offset, Vec2::new(509.0, 384.0));
        assert_eq!(player, Vec2::new(1001.5, 1000.0));
    }
}
