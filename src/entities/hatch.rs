//! Hatch entity and boundary path types

use crate::entities::{Entity, EntityCommon};
use crate::geometry::polyline_extents;
use crate::types::{BoundingBox2D, Vector2, Vector3};
use bitflags::bitflags;

/// Hatch pattern type (group code 76)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HatchPatternType {
    /// User-defined pattern
    UserDefined,
    /// Predefined pattern
    #[default]
    Predefined,
    /// Custom pattern
    Custom,
}

impl HatchPatternType {
    /// Create from the raw code value
    pub fn from_value(value: i16) -> Self {
        match value {
            0 => HatchPatternType::UserDefined,
            2 => HatchPatternType::Custom,
            _ => HatchPatternType::Predefined,
        }
    }
}

/// Hatch style (group code 75)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HatchStyleType {
    /// Hatch "odd parity" area
    #[default]
    Normal,
    /// Hatch outermost area only
    Outer,
    /// Hatch through entire area
    Ignore,
}

impl HatchStyleType {
    /// Create from the raw code value
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => HatchStyleType::Outer,
            2 => HatchStyleType::Ignore,
            _ => HatchStyleType::Normal,
        }
    }
}

bitflags! {
    /// Boundary path flags (group code 92)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BoundaryPathFlags: i32 {
        const EXTERNAL = 1;
        /// Path is a single polyline rather than a list of edges
        const POLYLINE = 2;
        const DERIVED = 4;
        const TEXTBOX = 8;
        const OUTERMOST = 16;
        const NOT_CLOSED = 32;
        const SELF_INTERSECTING = 64;
        const TEXT_ISLAND = 128;
        const DUPLICATE = 256;
    }
}

/// Line edge in a boundary path
#[derive(Debug, Clone, PartialEq)]
pub struct LineEdge {
    /// Start point (in OCS)
    pub start: Vector2,
    /// End point (in OCS)
    pub end: Vector2,
}

/// Circular arc edge in a boundary path
#[derive(Debug, Clone, PartialEq)]
pub struct CircularArcEdge {
    /// Center point (in OCS)
    pub center: Vector2,
    /// Radius
    pub radius: f64,
    /// Start angle in degrees
    pub start_angle: f64,
    /// End angle in degrees
    pub end_angle: f64,
    /// Counter-clockwise flag
    pub counter_clockwise: bool,
}

/// Elliptic arc edge in a boundary path
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticArcEdge {
    /// Center point (in OCS)
    pub center: Vector2,
    /// Endpoint of major axis relative to center (in OCS)
    pub major_axis_endpoint: Vector2,
    /// Ratio of minor axis to major axis
    pub minor_axis_ratio: f64,
    /// Start angle in degrees
    pub start_angle: f64,
    /// End angle in degrees
    pub end_angle: f64,
    /// Counter-clockwise flag
    pub counter_clockwise: bool,
}

impl EllipticArcEdge {
    fn envelope(&self) -> BoundingBox2D {
        let major = self.major_axis_endpoint;
        let minor = major.perp() * self.minor_axis_ratio;
        let half_x = major.x.hypot(minor.x);
        let half_y = major.y.hypot(minor.y);
        BoundingBox2D::from_coords(
            self.center.x - half_x,
            self.center.y - half_y,
            self.center.x + half_x,
            self.center.y + half_y,
        )
    }
}

/// Spline edge in a boundary path
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplineEdge {
    /// Degree of the spline
    pub degree: i32,
    /// Rational flag
    pub rational: bool,
    /// Periodic flag
    pub periodic: bool,
    /// Knot values
    pub knots: Vec<f64>,
    /// Control points
    pub control_points: Vec<Vector2>,
    /// Control point weights
    pub weights: Vec<f64>,
    /// Fit points
    pub fit_points: Vec<Vector2>,
    /// Start tangent
    pub start_tangent: Option<Vector2>,
    /// End tangent
    pub end_tangent: Option<Vector2>,
}

/// A typed edge of a boundary path
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeType {
    /// Straight line
    Line(LineEdge),
    /// Circular arc
    CircularArc(CircularArcEdge),
    /// Elliptic arc
    EllipticArc(EllipticArcEdge),
    /// Spline
    Spline(SplineEdge),
}

impl EdgeType {
    /// Box of the edge in OCS; arcs and ellipses use their full curve
    fn local_extents(&self) -> Option<BoundingBox2D> {
        match self {
            EdgeType::Line(e) => BoundingBox2D::from_points([e.start, e.end]),
            EdgeType::CircularArc(e) => Some(BoundingBox2D::around(e.center, e.radius)),
            EdgeType::EllipticArc(e) => Some(e.envelope()),
            EdgeType::Spline(e) => {
                let points = if e.control_points.is_empty() {
                    &e.fit_points
                } else {
                    &e.control_points
                };
                BoundingBox2D::from_points(points.iter().copied())
            }
        }
    }
}

/// Polyline form of a boundary path
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolylinePath {
    /// Whether bulges were given
    pub has_bulge: bool,
    /// Closed flag
    pub is_closed: bool,
    /// Vertices as (X, Y, bulge)
    pub vertices: Vec<Vector3>,
}

/// One boundary loop of a hatch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryPath {
    /// Raw flags
    pub flags: BoundaryPathFlags,
    /// Polyline data when the POLYLINE flag is set
    pub polyline: Option<PolylinePath>,
    /// Edges otherwise
    pub edges: Vec<EdgeType>,
}

impl BoundaryPath {
    /// Whether the path is stored as a polyline
    pub fn is_polyline(&self) -> bool {
        self.flags.contains(BoundaryPathFlags::POLYLINE)
    }

    /// Box of the path in OCS
    pub fn local_extents(&self) -> Option<BoundingBox2D> {
        let mut bbox = match &self.polyline {
            Some(pl) => {
                let chain: Vec<(Vector2, f64)> =
                    pl.vertices.iter().map(|v| (v.xy(), v.z)).collect();
                polyline_extents(&chain, pl.is_closed)
            }
            None => None,
        };
        for edge in &self.edges {
            bbox = crate::types::bounds::merge_optional(bbox, edge.local_extents());
        }
        bbox
    }
}

/// A filled or patterned area
#[derive(Debug, Clone, PartialEq)]
pub struct Hatch {
    /// Common entity data
    pub common: EntityCommon,
    /// Pattern name
    pub pattern_name: String,
    /// Solid fill flag
    pub is_solid: bool,
    /// Associativity flag
    pub is_associative: bool,
    /// Elevation point; only Z is meaningful
    pub elevation: Vector3,
    /// Boundary loops
    pub paths: Vec<BoundaryPath>,
    /// Hatch style
    pub style: HatchStyleType,
    /// Pattern type
    pub pattern_type: HatchPatternType,
    /// Pattern angle in degrees
    pub pattern_angle: f64,
    /// Pattern scale
    pub pattern_scale: f64,
    /// Seed points (in OCS)
    pub seed_points: Vec<Vector2>,
}

impl Hatch {
    /// Create a new hatch with no boundary
    pub fn new() -> Self {
        Hatch {
            common: EntityCommon::new(),
            pattern_name: "SOLID".to_string(),
            is_solid: false,
            is_associative: false,
            elevation: Vector3::ZERO,
            paths: Vec::new(),
            style: HatchStyleType::Normal,
            pattern_type: HatchPatternType::Predefined,
            pattern_angle: 0.0,
            pattern_scale: 1.0,
            seed_points: Vec::new(),
        }
    }
}

impl Default for Hatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Hatch {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        let local = self
            .paths
            .iter()
            .fold(None, |acc, path| crate::types::bounds::merge_optional(acc, path.local_extents()))?;
        let ocs = self.common.ocs();
        if ocs.is_world() {
            return Some(local);
        }
        BoundingBox2D::from_points(
            local
                .corners()
                .into_iter()
                .map(|c| ocs.to_world_xy(c, self.elevation.z)),
        )
    }

    fn entity_type(&self) -> &'static str {
        "HATCH"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_path() -> BoundaryPath {
        BoundaryPath {
            flags: BoundaryPathFlags::POLYLINE | BoundaryPathFlags::EXTERNAL,
            polyline: Some(PolylinePath {
                has_bulge: false,
                is_closed: true,
                vertices: vec![
                    Vector3::new(0.0, 0.0, 0.0),
                    Vector3::new(4.0, 0.0, 0.0),
                    Vector3::new(4.0, 4.0, 0.0),
                    Vector3::new(0.0, 4.0, 0.0),
                ],
            }),
            edges: Vec::new(),
        }
    }

    #[test]
    fn test_empty_hatch_has_no_box() {
        assert!(Hatch::new().bounding_box().is_none());
    }

    #[test]
    fn test_polyline_path_box() {
        let mut hatch = Hatch::new();
        hatch.paths.push(square_path());
        assert_eq!(
            hatch.bounding_box(),
            Some(BoundingBox2D::from_coords(0.0, 0.0, 4.0, 4.0))
        );
    }

    #[test]
    fn test_edge_path_box_unions_edges() {
        let mut hatch = Hatch::new();
        hatch.paths.push(square_path());
        hatch.paths.push(BoundaryPath {
            flags: BoundaryPathFlags::empty(),
            polyline: None,
            edges: vec![
                EdgeType::Line(LineEdge {
                    start: Vector2::new(10.0, 0.0),
                    end: Vector2::new(12.0, 0.0),
                }),
                EdgeType::CircularArc(CircularArcEdge {
                    center: Vector2::new(11.0, 0.0),
                    radius: 1.0,
                    start_angle: 0.0,
                    end_angle: 180.0,
                    counter_clockwise: true,
                }),
            ],
        });
        let bbox = hatch.bounding_box().unwrap();
        assert_eq!(bbox.max.x, 12.0);
        assert_eq!(bbox.min.y, -1.0);
    }

    #[test]
    fn test_mirrored_ocs() {
        let mut hatch = Hatch::new();
        hatch.paths.push(square_path());
        hatch.common.extrusion = Vector3::new(0.0, 0.0, -1.0);
        let bbox = hatch.bounding_box().unwrap();
        assert!((bbox.min.x + 4.0).abs() < 1e-12);
        assert!(bbox.max.x.abs() < 1e-12);
    }
}
