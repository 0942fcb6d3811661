//! Spline entity

use super::{Entity, EntityCommon};
use crate::geometry::sample_spline;
use crate::types::{BoundingBox2D, Vector2, Vector3};
use bitflags::bitflags;

bitflags! {
    /// Spline flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SplineFlags: i16 {
        /// Closed spline
        const CLOSED = 1;
        /// Periodic spline
        const PERIODIC = 2;
        /// Rational spline
        const RATIONAL = 4;
        /// Planar spline
        const PLANAR = 8;
        /// Linear (planar bit is also set)
        const LINEAR = 16;
    }
}

/// A spline given by a control polygon, fit points, or both
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    /// Common entity data
    pub common: EntityCommon,
    /// Raw flags
    pub flags: SplineFlags,
    /// Degree of the spline curve
    pub degree: i32,
    /// Knot count declared in the file
    pub declared_knot_count: i32,
    /// Control point count declared in the file
    pub declared_control_point_count: i32,
    /// Fit point count declared in the file
    pub declared_fit_point_count: i32,
    /// Knot values
    pub knots: Vec<f64>,
    /// Weights of the control points
    pub weights: Vec<f64>,
    /// Control points
    pub control_points: Vec<Vector3>,
    /// Fit points
    pub fit_points: Vec<Vector3>,
    /// Start tangent, when given
    pub start_tangent: Option<Vector3>,
    /// End tangent, when given
    pub end_tangent: Option<Vector3>,
    /// Knot tolerance
    pub knot_tolerance: f64,
    /// Control point tolerance
    pub control_point_tolerance: f64,
    /// Fit tolerance
    pub fit_tolerance: f64,
}

impl Spline {
    /// Create a new empty cubic spline
    pub fn new() -> Self {
        Spline {
            common: EntityCommon::new(),
            flags: SplineFlags::empty(),
            degree: 3,
            declared_knot_count: 0,
            declared_control_point_count: 0,
            declared_fit_point_count: 0,
            knots: Vec::new(),
            weights: Vec::new(),
            control_points: Vec::new(),
            fit_points: Vec::new(),
            start_tangent: None,
            end_tangent: None,
            knot_tolerance: 1e-10,
            control_point_tolerance: 1e-10,
            fit_tolerance: 1e-10,
        }
    }

    /// Is the spline closed?
    pub fn is_closed(&self) -> bool {
        self.flags.contains(SplineFlags::CLOSED)
    }

    /// Is the spline rational?
    pub fn is_rational(&self) -> bool {
        self.flags.contains(SplineFlags::RATIONAL)
    }

    /// Sample the curve in world XY
    pub fn sample_points(&self, segments: usize) -> Vec<Vector2> {
        sample_spline(
            self.degree.max(1) as usize,
            &self.control_points,
            &self.knots,
            &self.weights,
            &self.fit_points,
            segments,
        )
        .into_iter()
        .map(|p| p.xy())
        .collect()
    }

    /// First point of the curve definition
    pub fn start_point(&self) -> Option<Vector2> {
        self.sample_points(1).first().copied()
    }

    /// Last point of the curve definition
    pub fn end_point(&self) -> Option<Vector2> {
        self.sample_points(1).last().copied()
    }
}

impl Default for Spline {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Spline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    /// Box of the control polygon (which encloses the curve), else of the fit points
    fn bounding_box(&self) -> Option<BoundingBox2D> {
        let points = if self.control_points.is_empty() {
            &self.fit_points
        } else {
            &self.control_points
        };
        BoundingBox2D::from_points(points.iter().map(|p| p.xy()))
    }

    fn entity_type(&self) -> &'static str {
        "SPLINE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spline_defaults() {
        let spline = Spline::new();
        assert_eq!(spline.degree, 3);
        assert!(spline.bounding_box().is_none());
        assert!(spline.sample_points(8).is_empty());
    }

    #[test]
    fn test_box_falls_back_to_fit_points() {
        let mut spline = Spline::new();
        spline.fit_points = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(4.0, 2.0, 0.0)];
        assert_eq!(
            spline.bounding_box(),
            Some(BoundingBox2D::from_coords(0.0, 0.0, 4.0, 2.0))
        );
    }

    #[test]
    fn test_box_prefers_control_points() {
        let mut spline = Spline::new();
        spline.control_points = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 0.0)];
        spline.fit_points = vec![Vector3::new(10.0, 10.0, 0.0)];
        assert_eq!(
            spline.bounding_box(),
            Some(BoundingBox2D::from_coords(0.0, 0.0, 1.0, 1.0))
        );
    }

    #[test]
    fn test_clamped_endpoints() {
        let mut spline = Spline::new();
        spline.control_points = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 2.0, 0.0),
            Vector3::new(3.0, 2.0, 0.0),
            Vector3::new(4.0, 0.0, 0.0),
        ];
        spline.knots = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let start = spline.start_point().unwrap();
        let end = spline.end_point().unwrap();
        assert!(start.length() < 1e-9);
        assert!((end - Vector2::new(4.0, 0.0)).length() < 1e-9);
    }
}
