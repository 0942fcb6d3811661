//! Arc entity

use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Vector2, Vector3};

/// A circular arc entity
///
/// Angles are stored in degrees, counter-clockwise in the OCS.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    /// Common entity data
    pub common: EntityCommon,
    /// Center point, in OCS
    pub center: Vector3,
    /// Radius
    pub radius: f64,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
    /// Start angle in degrees
    pub start_angle: f64,
    /// End angle in degrees
    pub end_angle: f64,
}

impl Arc {
    /// Create a new arc covering the full unit circle
    pub fn new() -> Self {
        Arc {
            common: EntityCommon::new(),
            center: Vector3::ZERO,
            radius: 1.0,
            thickness: 0.0,
            start_angle: 0.0,
            end_angle: 360.0,
        }
    }

    /// Counter-clockwise sweep from start to end angle, degrees in (0, 360]
    pub fn sweep(&self) -> f64 {
        let sweep = (self.end_angle - self.start_angle).rem_euclid(360.0);
        if sweep == 0.0 {
            360.0
        } else {
            sweep
        }
    }

    fn ocs_point_at(&self, degrees: f64) -> Vector3 {
        let a = degrees.to_radians();
        Vector3::new(
            self.center.x + self.radius * a.cos(),
            self.center.y + self.radius * a.sin(),
            self.center.z,
        )
    }

    fn world_point_at(&self, degrees: f64) -> Vector2 {
        self.common.ocs().to_world(self.ocs_point_at(degrees)).xy()
    }

    /// Center projected to world XY
    pub fn world_center(&self) -> Vector2 {
        self.common.ocs().to_world(self.center).xy()
    }

    /// Start point in world XY
    pub fn start_point(&self) -> Vector2 {
        self.world_point_at(self.start_angle)
    }

    /// End point in world XY
    pub fn end_point(&self) -> Vector2 {
        self.world_point_at(self.end_angle)
    }

    /// Point halfway along the arc in world XY
    pub fn mid_point(&self) -> Vector2 {
        self.world_point_at(self.start_angle + self.sweep() / 2.0)
    }

    /// Whether a world XY direction angle (radians, seen from the center)
    /// falls on the arc
    pub fn contains_world_angle(&self, angle: f64) -> bool {
        let ocs = self.common.ocs();
        let start = self.start_point() - self.world_center();
        let end = self.end_point() - self.world_center();
        let start_angle = start.y.atan2(start.x);
        let end_angle = end.y.atan2(end.x);
        let sweep = self.sweep().to_radians();
        // A mirrored OCS reverses the direction of travel in world XY
        let mirrored = ocs.x_axis().cross(&ocs.y_axis()).z < 0.0;
        if mirrored {
            crate::geometry::angle_in_sweep(angle, end_angle, sweep)
        } else {
            crate::geometry::angle_in_sweep(angle, start_angle, sweep)
        }
    }
}

impl Default for Arc {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Arc {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    /// The full circle, which always encloses the arc
    fn bounding_box(&self) -> Option<BoundingBox2D> {
        Some(BoundingBox2D::around(self.world_center(), self.radius))
    }

    fn entity_type(&self) -> &'static str {
        "ARC"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn quarter() -> Arc {
        Arc {
            center: Vector3::new(0.0, 0.0, 0.0),
            radius: 10.0,
            start_angle: 0.0,
            end_angle: 90.0,
            ..Arc::new()
        }
    }

    #[test]
    fn test_arc_defaults() {
        let arc = Arc::new();
        assert_eq!(arc.start_angle, 0.0);
        assert_eq!(arc.end_angle, 360.0);
        assert_eq!(arc.sweep(), 360.0);
    }

    #[test]
    fn test_sweep_wraps() {
        let arc = Arc {
            start_angle: 350.0,
            end_angle: 10.0,
            ..Arc::new()
        };
        assert!((arc.sweep() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_endpoints() {
        let arc = quarter();
        assert!((arc.start_point() - Vector2::new(10.0, 0.0)).length() < 1e-9);
        assert!((arc.end_point() - Vector2::new(0.0, 10.0)).length() < 1e-9);
        let mid = arc.mid_point();
        assert!((mid.x - mid.y).abs() < 1e-9);
    }

    #[test]
    fn test_contains_world_angle() {
        let arc = quarter();
        assert!(arc.contains_world_angle(PI / 4.0));
        assert!(!arc.contains_world_angle(PI));
    }

    #[test]
    fn test_mirrored_arc_contains_reflected_angles() {
        let mut arc = quarter();
        arc.common.extrusion = Vector3::new(0.0, 0.0, -1.0);
        // OCS quadrant I lands in world quadrant II
        assert!(arc.contains_world_angle(3.0 * PI / 4.0));
        assert!(!arc.contains_world_angle(PI / 4.0));
    }

    #[test]
    fn test_bounding_box_is_full_circle() {
        let arc = quarter();
        assert_eq!(
            arc.bounding_box(),
            Some(BoundingBox2D::from_coords(-10.0, -10.0, 10.0, 10.0))
        );
    }
}
