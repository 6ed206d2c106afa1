use serde::{Deserialize, Serialize};

use crate::*;

/// Single pixel axis used for mask width, height, and positions.
pub type Px = u32;

/// Two-dimensional pixel extent or position `(x, y)`.
pub type Px2 = (Px, Px);

/// Point in world space, y pointing up.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned world-space rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Builds bounds from two corners in any order, rejecting degenerate rectangles.
    pub fn new(a: Vec2, b: Vec2) -> Result<Self> {
        let min = Vec2::new(a.x.min(b.x), a.y.min(b.y));
        let max = Vec2::new(a.x.max(b.x), a.y.max(b.y));
        // also catches NaN, for which every comparison is false
        if !(max.x - min.x > 0.0 && max.y - min.y > 0.0) {
            return Err(GameError::InvalidGeometry);
        }
        Ok(Self { min, max })
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Result<Self> {
        let half = Vec2::new(size.x / 2.0, size.y / 2.0);
        Self::new(
            Vec2::new(center.x - half.x, center.y - half.y),
            Vec2::new(center.x + half.x, center.y + half.y),
        )
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.max.x - self.min.x, self.max.y - self.min.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Position of `point` relative to these bounds, `(0, 0)` at `min` and `(1, 1)` at `max`.
    pub fn normalize(&self, point: Vec2) -> Vec2 {
        let size = self.size();
        Vec2::new(
            (point.x - self.min.x) / size.x,
            (point.y - self.min.y) / size.y,
        )
    }
}

/// Pixel-space rectangle inside a mask, `(x, y)` is the corner closest to the origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: Px,
    pub y: Px,
    pub width: Px,
    pub height: Px,
}

impl PixelRect {
    pub const fn new(x: Px, y: Px, width: Px, height: Px) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Maps the part of `cell` that lies over `surface` onto a `texture`-sized pixel grid.
    ///
    /// The result always covers at least one pixel and never leaves the texture, so sampling it
    /// cannot divide by zero.
    pub fn project(cell: &Bounds, surface: &Bounds, texture: Px2) -> Self {
        let (width, height) = texture;
        let origin = surface.normalize(cell.min);
        let surface_size = surface.size();
        let cell_size = cell.size();

        let start_x = clamp_floor(origin.x * width as f32, 0, width.saturating_sub(1));
        let start_y = clamp_floor(origin.y * height as f32, 0, height.saturating_sub(1));
        let span_x = clamp_floor(
            cell_size.x / surface_size.x * width as f32,
            1,
            width.saturating_sub(start_x).max(1),
        );
        let span_y = clamp_floor(
            cell_size.y / surface_size.y * height as f32,
            1,
            height.saturating_sub(start_y).max(1),
        );

        Self::new(start_x, start_y, span_x, span_y)
    }
}

fn clamp_floor(value: f32, min: Px, max: Px) -> Px {
    let floored = value.floor();
    if floored.is_nan() || floored <= min as f32 {
        min
    } else if floored >= max as f32 {
        max
    } else {
        floored as Px
    }
}
