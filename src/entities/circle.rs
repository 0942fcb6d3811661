//! Circle entity

use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Vector2, Vector3};

/// A circle entity
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Common entity data
    pub common: EntityCommon,
    /// Center point, in OCS
    pub center: Vector3,
    /// Radius
    pub radius: f64,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
}

impl Circle {
    /// Create a new unit circle at the origin
    pub fn new() -> Self {
        Circle {
            common: EntityCommon::new(),
            center: Vector3::ZERO,
            radius: 1.0,
            thickness: 0.0,
        }
    }

    /// Create a circle from center and radius
    pub fn from_center_radius(center: Vector3, radius: f64) -> Self {
        Circle {
            center,
            radius,
            ..Self::new()
        }
    }

    /// Center projected to world XY
    pub fn world_center(&self) -> Vector2 {
        self.common.ocs().to_world(self.center).xy()
    }

    /// Get the circumference of the circle
    pub fn circumference(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.radius
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Circle {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        Some(BoundingBox2D::around(self.world_center(), self.radius))
    }

    fn entity_type(&self) -> &'static str {
        "CIRCLE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_defaults() {
        let circle = Circle::new();
        assert_eq!(circle.radius, 1.0);
        assert_eq!(circle.center, Vector3::ZERO);
    }

    #[test]
    fn test_circle_bounding_box() {
        let circle = Circle::from_center_radius(Vector3::new(5.0, 5.0, 0.0), 2.0);
        assert_eq!(
            circle.bounding_box(),
            Some(BoundingBox2D::from_coords(3.0, 3.0, 7.0, 7.0))
        );
    }

    #[test]
    fn test_mirrored_extrusion_flips_center() {
        let mut circle = Circle::from_center_radius(Vector3::new(5.0, 1.0, 0.0), 1.0);
        circle.common.extrusion = Vector3::new(0.0, 0.0, -1.0);
        let c = circle.world_center();
        assert!((c.x + 5.0).abs() < 1e-12);
        assert!((c.y - 1.0).abs() < 1e-12);
    }
}
