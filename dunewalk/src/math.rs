use glam::Vec2 as GlamVec2;
use serde::{Deserialize, Serialize};

/// 2D vector type used throughout Dunewalk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len == 0.0 {
            Self::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    pub fn to_glam(&self) -> GlamVec2 {
        GlamVec2::new(self.x, self.y)
    }

    /// Sum of the absolute components.
    pub fn manhattan_length(&self) -> f32 {
        self.x.abs() + self.y.abs()
    }

    /// Manhattan distance between two points.
    pub fn manhattan_distance(self, rhs: Self) -> f32 {
        (self - rhs).manhattan_length()
    }

    /// Linearly interpolates between two vectors.
    pub fn lerp(self, rhs: Self, t: f32) -> Self {
        Self::new(
            self.x + (rhs.x - self.x) * t,
            self.y + (rhs.y - self.y) * t,
        )
    }

    /// Replaces NaN components with zero.
    pub fn sanitized(self) -> Self {
        Self::new(
            if self.x.is_nan() { 0.0 } else { self.x },
            if self.y.is_nan() { 0.0 } else { self.y },
        )
    }

    /// Returns true if both components are zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from(value: (f32, f32)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

impl From<Vec2> for GlamVec2 {
    fn from(value: Vec2) -> Self {
        value.to_glam()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<f32> for Vec2 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle.
///
/// `x`/`y` is the **centre** of the rectangle. Layout data authored with a
/// top-left origin goes through [`Rect::from_top_left`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from its top-left corner and size.
    pub fn from_top_left(top_left: Vec2, width: f32, height: f32) -> Self {
        Self::new(
            top_left.x + width / 2.0,
            top_left.y + height / 2.0,
            width,
            height,
        )
    }

    /// Build a rectangle centred on `center`.
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x, center.y, width, height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Top-left corner.
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x - self.width / 2.0, self.y - self.height / 2.0)
    }

    /// Bottom-right corner.
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners in top-left, top-right, bottom-right, bottom-left order.
    pub fn corners(&self) -> [Vec2; 4] {
        let min = self.min();
        let max = self.max();
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ]
    }

    /// A rectangle with non-positive or non-finite extent. Never contains anything.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Move the centre to `center`, keeping the size.
    pub fn with_center(mut self, center: Vec2) -> Self {
        self.x = center.x;
        self.y = center.y;
        self
    }

    /// Scale the size around the centre.
    pub fn scaled(mut self, factor: f32) -> Self {
        self.width *= factor;
        self.height *= factor;
        self
    }
}
