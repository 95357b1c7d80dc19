//! Pointer-led camera offset and world zoom.

use glam::{Mat4, Vec3};

use crate::math::Vec2;

/// Camera state recomputed every tick.
///
/// The offset is derived purely from the pointer and the screen centre; it
/// carries no velocity or easing state between ticks. Zoom is the world
/// scale and only changes on zoom input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraModel {
    pub offset: Vec2,
    pub zoom: f32,
    /// Interpolation factor, applied once per tick regardless of elapsed time.
    pub lerp: f32,
    pub min_zoom: f32,
}

impl CameraModel {
    pub fn new(zoom: f32, lerp: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom,
            lerp,
            min_zoom: 0.1,
        }
    }

    #[must_use]
    pub fn with_min_zoom(mut self, min_zoom: f32) -> Self {
        self.min_zoom = min_zoom;
        self.zoom = self.zoom.max(min_zoom);
        self
    }

    /// Recompute the offset so the view leans toward the pointer.
    pub fn update(&mut self, pointer: Vec2, screen_center: Vec2) {
        let pointer = pointer.sanitized();
        let focus = pointer.lerp(screen_center, self.lerp);
        self.offset = screen_center - focus;
        log::trace!("camera offset {:?} (pointer {:?})", self.offset, pointer);
    }

    /// Change zoom by `delta`, never going below the minimum.
    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta).max(self.min_zoom);
    }

    /// Map a world-space point to screen space.
    ///
    /// `world_offset` is the screen position of the world origin before the
    /// camera offset is added.
    pub fn world_to_screen(&self, world_pos: Vec2, world_offset: Vec2) -> Vec2 {
        world_pos * self.zoom + world_offset + self.offset
    }

    /// Inverse of [`CameraModel::world_to_screen`].
    pub fn screen_to_world(&self, screen_pos: Vec2, world_offset: Vec2) -> Vec2 {
        (screen_pos - world_offset - self.offset) / self.zoom
    }

    /// Orthographic view-projection for a host renderer.
    pub fn view_projection(&self, world_offset: Vec2, width: u32, height: u32) -> Mat4 {
        let projection = Mat4::orthographic_rh_gl(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);
        let screen_shift = (world_offset + self.offset).to_glam();
        let translation = Mat4::from_translation(Vec3::new(screen_shift.x, screen_shift.y, 0.0));
        let zoom = Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0));

        projection * translation * zoom
    }
}

impl Default for CameraModel {
    fn default() -> Self {
        Self::new(1.0, 0.5)
    }
}
