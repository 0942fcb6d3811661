//! Axis-aligned bounding box in world XY

use super::Vector2;
use std::fmt;

/// 2D axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2D {
    /// Minimum point (lower-left corner)
    pub min: Vector2,
    /// Maximum point (upper-right corner)
    pub max: Vector2,
}

impl BoundingBox2D {
    /// Create a new bounding box from min and max points
    pub fn new(min: Vector2, max: Vector2) -> Self {
        BoundingBox2D { min, max }
    }

    /// Create a box from raw coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox2D::new(Vector2::new(min_x, min_y), Vector2::new(max_x, max_y))
    }

    /// Create a zero-size box at a single point
    pub fn from_point(point: Vector2) -> Self {
        BoundingBox2D {
            min: point,
            max: point,
        }
    }

    /// Box of a circle (or any shape bounded by one)
    pub fn around(center: Vector2, radius: f64) -> Self {
        let r = radius.abs();
        BoundingBox2D::from_coords(center.x - r, center.y - r, center.x + r, center.y + r)
    }

    /// Create a bounding box that contains all given points
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector2>,
    {
        let mut iter = points.into_iter();
        let mut bbox = BoundingBox2D::from_point(iter.next()?);
        for point in iter {
            bbox.expand_to_include(point);
        }
        Some(bbox)
    }

    /// Get the width of the bounding box
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Get the height of the bounding box
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Get the center point of the bounding box
    pub fn center(&self) -> Vector2 {
        self.min.midpoint(&self.max)
    }

    /// The four corners, counter-clockwise from `min`
    pub fn corners(&self) -> [Vector2; 4] {
        [
            self.min,
            Vector2::new(self.max.x, self.min.y),
            self.max,
            Vector2::new(self.min.x, self.max.y),
        ]
    }

    /// Check if this bounding box contains a point (edges inclusive)
    pub fn contains(&self, point: Vector2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check whether two boxes overlap (touching counts)
    pub fn intersects(&self, other: &BoundingBox2D) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Expand the bounding box to include another point
    pub fn expand_to_include(&mut self, point: Vector2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Merge with another bounding box
    pub fn merge(&self, other: &BoundingBox2D) -> BoundingBox2D {
        BoundingBox2D {
            min: Vector2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vector2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grow every side by `margin`
    pub fn inflate(&self, margin: f64) -> BoundingBox2D {
        BoundingBox2D::from_coords(
            self.min.x - margin,
            self.min.y - margin,
            self.max.x + margin,
            self.max.y + margin,
        )
    }

    /// Shift by `offset`
    pub fn translate(&self, offset: Vector2) -> BoundingBox2D {
        BoundingBox2D::new(self.min + offset, self.max + offset)
    }

    /// Euclidean distance from a point to the box; zero inside
    pub fn distance_to_point(&self, point: Vector2) -> f64 {
        let dx = (self.min.x - point.x).max(0.0).max(point.x - self.max.x);
        let dy = (self.min.y - point.y).max(0.0).max(point.y - self.max.y);
        dx.hypot(dy)
    }
}

/// Union of two optional boxes
pub fn merge_optional(a: Option<BoundingBox2D>, b: Option<BoundingBox2D>) -> Option<BoundingBox2D> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(&b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

impl fmt::Display for BoundingBox2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox2D[{} -> {}]", self.min, self.max)
    }
}
