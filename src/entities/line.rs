//! Line entity

use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Vector3};

/// A line entity defined by two endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Common entity data
    pub common: EntityCommon,
    /// Start point of the line
    pub start: Vector3,
    /// End point of the line
    pub end: Vector3,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
}

impl Line {
    /// Create a new line from origin to origin
    pub fn new() -> Self {
        Line {
            common: EntityCommon::new(),
            start: Vector3::ZERO,
            end: Vector3::ZERO,
            thickness: 0.0,
        }
    }

    /// Create a new line between two points
    pub fn from_points(start: Vector3, end: Vector3) -> Self {
        Line {
            start,
            end,
            ..Self::new()
        }
    }

    /// Create a new line from coordinates
    pub fn from_coords(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> Self {
        Line::from_points(Vector3::new(x1, y1, z1), Vector3::new(x2, y2, z2))
    }

    /// Get the length of the line
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Get the midpoint of the line
    pub fn midpoint(&self) -> Vector3 {
        (self.start + self.end) * 0.5
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Line {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        BoundingBox2D::from_points([self.start.xy(), self.end.xy()])
    }

    fn entity_type(&self) -> &'static str {
        "LINE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_creation() {
        let line = Line::new();
        assert_eq!(line.start, Vector3::ZERO);
        assert_eq!(line.end, Vector3::ZERO);
        assert_eq!(line.thickness, 0.0);
    }

    #[test]
    fn test_line_length_and_midpoint() {
        let line = Line::from_coords(0.0, 0.0, 0.0, 3.0, 4.0, 0.0);
        assert_eq!(line.length(), 5.0);
        assert_eq!(line.midpoint(), Vector3::new(1.5, 2.0, 0.0));
    }

    #[test]
    fn test_line_bounding_box() {
        let line = Line::from_coords(10.0, 5.0, 0.0, -2.0, 8.0, 0.0);
        let bbox = line.bounding_box().unwrap();
        assert_eq!((bbox.min.x, bbox.min.y), (-2.0, 5.0));
        assert_eq!((bbox.max.x, bbox.max.y), (10.0, 8.0));
    }
}
