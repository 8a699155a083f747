//! Integer and fractional rectangles in logical pixels.

use glam::{DVec2, IVec2};
use serde::Serialize;

/// Rectangle in integer logical pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rectangle {
    pub loc: IVec2,
    pub size: IVec2,
}

impl Rectangle {
    pub const fn new(loc: IVec2, size: IVec2) -> Self {
        Self { loc, size }
    }

    pub const fn from_size(size: IVec2) -> Self {
        Self {
            loc: IVec2::ZERO,
            size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    /// Whether `point` is inside, with the right and bottom edges excluded.
    pub fn contains(&self, point: DVec2) -> bool {
        let loc = self.loc.as_dvec2();
        let end = loc + self.size.as_dvec2();
        loc.x <= point.x && point.x < end.x && loc.y <= point.y && point.y < end.y
    }

    pub fn to_f64(self) -> RectangleF {
        RectangleF {
            loc: self.loc.as_dvec2(),
            size: self.size.as_dvec2(),
        }
    }
}

/// Rectangle in fractional logical pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct RectangleF {
    pub loc: DVec2,
    pub size: DVec2,
}

impl RectangleF {
    pub const fn new(loc: DVec2, size: DVec2) -> Self {
        Self { loc, size }
    }

    /// Builds a rectangle from its left and right edges.
    pub fn from_x_span(x1: f64, x2: f64, y: f64, height: f64) -> Self {
        Self {
            loc: DVec2::new(x1, y),
            size: DVec2::new(x2 - x1, height),
        }
    }

    /// Grows the rectangle by `amount` on every side.
    pub fn expanded(self, amount: f64) -> Self {
        Self {
            loc: self.loc - DVec2::splat(amount),
            size: self.size + DVec2::splat(amount * 2.),
        }
    }

    pub fn right(&self) -> f64 {
        self.loc.x + self.size.x
    }
}
