//! Ellipse entity

use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Vector2, Vector3};
use std::f64::consts::TAU;

/// An ellipse or elliptical arc, in world coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    /// Common entity data
    pub common: EntityCommon,
    /// Center point of the ellipse
    pub center: Vector3,
    /// Major axis endpoint (relative to center)
    pub major_axis: Vector3,
    /// Ratio of minor axis to major axis
    pub minor_axis_ratio: f64,
    /// Start parameter, radians
    pub start_parameter: f64,
    /// End parameter, radians
    pub end_parameter: f64,
}

impl Ellipse {
    /// Create a new circle-shaped ellipse at the origin
    pub fn new() -> Self {
        Ellipse {
            common: EntityCommon::new(),
            center: Vector3::ZERO,
            major_axis: Vector3::UNIT_X,
            minor_axis_ratio: 1.0,
            start_parameter: 0.0,
            end_parameter: TAU,
        }
    }

    /// Create a new ellipse with center, major axis, and ratio
    pub fn from_center_axes(center: Vector3, major_axis: Vector3, minor_axis_ratio: f64) -> Self {
        Ellipse {
            center,
            major_axis,
            minor_axis_ratio,
            ..Self::new()
        }
    }

    /// Get the major axis length
    pub fn major_axis_length(&self) -> f64 {
        self.major_axis.length()
    }

    /// Get the minor axis length
    pub fn minor_axis_length(&self) -> f64 {
        self.major_axis_length() * self.minor_axis_ratio
    }

    /// Minor axis vector, perpendicular to the major axis in the ellipse plane
    pub fn minor_axis(&self) -> Vector3 {
        self.common
            .extrusion
            .normalize()
            .cross(&self.major_axis)
            * self.minor_axis_ratio
    }

    /// Check if this is a full ellipse
    pub fn is_full(&self) -> bool {
        (self.end_parameter - self.start_parameter).abs() >= TAU - 1e-10
    }

    /// Counter-clockwise parameter span from start to end
    pub fn parameter_span(&self) -> f64 {
        if self.is_full() {
            return TAU;
        }
        let span = (self.end_parameter - self.start_parameter).rem_euclid(TAU);
        if span == 0.0 {
            TAU
        } else {
            span
        }
    }

    /// Point on the curve at parameter `t`, in world XY
    pub fn point_at(&self, t: f64) -> Vector2 {
        let p = self.center + self.major_axis * t.cos() + self.minor_axis() * t.sin();
        p.xy()
    }

    /// Start point in world XY
    pub fn start_point(&self) -> Vector2 {
        self.point_at(self.start_parameter)
    }

    /// End point in world XY
    pub fn end_point(&self) -> Vector2 {
        self.point_at(self.start_parameter + self.parameter_span())
    }

    /// Point halfway along the parameter range, in world XY
    pub fn mid_point(&self) -> Vector2 {
        self.point_at(self.start_parameter + self.parameter_span() / 2.0)
    }
}

impl Default for Ellipse {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Ellipse {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    /// Envelope of the full ellipse, also used for partial arcs
    fn bounding_box(&self) -> Option<BoundingBox2D> {
        let major = self.major_axis;
        let minor = self.minor_axis();
        let half_x = major.x.hypot(minor.x);
        let half_y = major.y.hypot(minor.y);
        let c = self.center.xy();
        Some(BoundingBox2D::from_coords(
            c.x - half_x,
            c.y - half_y,
            c.x + half_x,
            c.y + half_y,
        ))
    }

    fn entity_type(&self) -> &'static str {
        "ELLIPSE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipse_defaults() {
        let ellipse = Ellipse::new();
        assert_eq!(ellipse.minor_axis_ratio, 1.0);
        assert_eq!(ellipse.start_parameter, 0.0);
        assert_eq!(ellipse.end_parameter, TAU);
        assert!(ellipse.is_full());
    }

    #[test]
    fn test_axis_aligned_envelope() {
        let ellipse =
            Ellipse::from_center_axes(Vector3::new(1.0, 2.0, 0.0), Vector3::new(4.0, 0.0, 0.0), 0.5);
        let bbox = ellipse.bounding_box().unwrap();
        assert!((bbox.min.x + 3.0).abs() < 1e-12);
        assert!((bbox.max.x - 5.0).abs() < 1e-12);
        assert!((bbox.min.y - 0.0).abs() < 1e-12);
        assert!((bbox.max.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotated_envelope() {
        let d = std::f64::consts::FRAC_1_SQRT_2 * 2.0;
        let ellipse =
            Ellipse::from_center_axes(Vector3::ZERO, Vector3::new(d, d, 0.0), 0.5);
        let bbox = ellipse.bounding_box().unwrap();
        // sqrt(2 + 0.5)
        assert!((bbox.max.x - 2.5f64.sqrt()).abs() < 1e-12);
        assert!((bbox.max.y - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_quarter_arc_points() {
        let ellipse = Ellipse {
            end_parameter: std::f64::consts::FRAC_PI_2,
            ..Ellipse::from_center_axes(Vector3::ZERO, Vector3::new(2.0, 0.0, 0.0), 0.5)
        };
        assert!((ellipse.start_point() - Vector2::new(2.0, 0.0)).length() < 1e-12);
        assert!((ellipse.end_point() - Vector2::new(0.0, 1.0)).length() < 1e-12);
    }
}
