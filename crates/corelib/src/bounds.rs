//! Axis-aligned bounding box with cached midpoint and size.

use crate::vector::Vec3f;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3f,
    pub max: Vec3f,
    pub mid: Vec3f,
    pub size: Vec3f,
}

impl BoundingBox {
    /// "No bounds": `min` is +inf and `max` is -inf, so `min <= max` fails on every axis.
    pub const EMPTY: Self = Self {
        min: Vec3f::splat(f32::INFINITY),
        max: Vec3f::splat(f32::NEG_INFINITY),
        mid: Vec3f::splat(0.0),
        size: Vec3f::splat(0.0),
    };

    pub fn from_min_max(min: Vec3f, max: Vec3f) -> Self {
        Self {
            min,
            max,
            mid: (min + max) * 0.5,
            size: max - min,
        }
    }

    /// Tight box around `points`; [`BoundingBox::EMPTY`] when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3f>) -> Self {
        let mut iter = points.into_iter().peekable();
        if iter.peek().is_none() {
            return Self::EMPTY;
        }
        let (min, max) = iter.fold(
            (Self::EMPTY.min, Self::EMPTY.max),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        Self::from_min_max(min, max)
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Largest of the three extents.
    pub fn largest_extent(&self) -> f32 {
        self.size.max_element()
    }

    /// Moves the box by `offset`. An empty box stays [`BoundingBox::EMPTY`].
    pub fn translate(&mut self, offset: Vec3f) {
        if self.is_empty() {
            return;
        }
        self.min += offset;
        self.max += offset;
        self.mid += offset;
    }

    /// Scales every field about the origin. An empty box stays [`BoundingBox::EMPTY`].
    pub fn scale(&mut self, factor: f32) {
        if self.is_empty() {
            return;
        }
        self.min *= factor;
        self.max *= factor;
        self.mid *= factor;
        self.size *= factor;
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}
