//! Point entity

use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Vector3};

/// A point entity
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Common entity data
    pub common: EntityCommon,
    /// Location of the point
    pub location: Vector3,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
    /// Angle of the X axis for point display, degrees
    pub angle: f64,
}

impl Point {
    /// Create a new point at the origin
    pub fn new() -> Self {
        Point {
            common: EntityCommon::new(),
            location: Vector3::ZERO,
            thickness: 0.0,
            angle: 0.0,
        }
    }

    /// Create a new point at a specific location
    pub fn at(location: Vector3) -> Self {
        Point {
            location,
            ..Self::new()
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Point {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        Some(BoundingBox2D::from_point(self.location.xy()))
    }

    fn entity_type(&self) -> &'static str {
        "POINT"
    }
}
