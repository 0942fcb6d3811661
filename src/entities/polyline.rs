//! Heavy polyline entity (POLYLINE followed by VERTEX records)

use super::{Entity, EntityCommon};
use crate::geometry::{polyline_extents, polyline_segments, BulgeArc};
use crate::types::{BoundingBox2D, Vector2, Vector3};
use bitflags::bitflags;

bitflags! {
    /// Polyline flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PolylineFlags: i16 {
        /// Closed polyline (or mesh closed in M direction)
        const CLOSED = 1;
        /// Curve-fit vertices added
        const CURVE_FIT = 2;
        /// Spline-fit vertices added
        const SPLINE_FIT = 4;
        /// 3D polyline
        const POLYLINE_3D = 8;
        /// 3D polygon mesh
        const POLYGON_MESH = 16;
        /// Polygon mesh closed in N direction
        const CLOSED_N = 32;
        /// Polyface mesh
        const POLYFACE_MESH = 64;
        /// Line type pattern generated continuously around vertices
        const LINETYPE_CONTINUOUS = 128;
    }
}

bitflags! {
    /// Vertex flags (group code 70 on VERTEX)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VertexFlags: i16 {
        /// Extra vertex created by curve fitting
        const EXTRA_VERTEX = 1;
        /// Curve-fit tangent defined
        const CURVE_FIT_TANGENT = 2;
        /// Spline vertex created by spline fitting
        const SPLINE_VERTEX = 8;
        /// Spline frame control point
        const SPLINE_CONTROL = 16;
        /// 3D polyline vertex
        const POLYLINE_3D = 32;
        /// 3D polygon mesh vertex
        const POLYGON_MESH = 64;
        /// Polyface mesh vertex
        const POLYFACE_FACE = 128;
    }
}

/// A VERTEX record of a heavy polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Location; OCS for 2D polylines, WCS otherwise
    pub location: Vector3,
    /// Starting width
    pub start_width: f64,
    /// Ending width
    pub end_width: f64,
    /// Bulge of the segment starting at this vertex
    pub bulge: f64,
    /// Raw flags
    pub flags: VertexFlags,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(location: Vector3) -> Self {
        Vertex {
            location,
            start_width: 0.0,
            end_width: 0.0,
            bulge: 0.0,
            flags: VertexFlags::empty(),
        }
    }

    /// Whether the record is a polyface face definition rather than a position
    pub fn is_face_record(&self) -> bool {
        self.flags.contains(VertexFlags::POLYFACE_FACE)
            && !self.flags.contains(VertexFlags::POLYGON_MESH)
    }
}

/// A heavy polyline: 2D, 3D, polygon mesh or polyface mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Common entity data
    pub common: EntityCommon,
    /// Raw flags
    pub flags: PolylineFlags,
    /// Default starting width
    pub start_width: f64,
    /// Default ending width
    pub end_width: f64,
    /// Elevation point; only Z is meaningful
    pub elevation: Vector3,
    /// Vertices in file order
    pub vertices: Vec<Vertex>,
}

impl Polyline {
    /// Create a new empty polyline
    pub fn new() -> Self {
        Polyline {
            common: EntityCommon::new(),
            flags: PolylineFlags::empty(),
            start_width: 0.0,
            end_width: 0.0,
            elevation: Vector3::ZERO,
            vertices: Vec::new(),
        }
    }

    /// Is the polyline closed?
    pub fn is_closed(&self) -> bool {
        self.flags.contains(PolylineFlags::CLOSED)
    }

    /// Whether the polyline lives in world space (3D polyline or mesh)
    pub fn is_3d(&self) -> bool {
        self.flags.intersects(
            PolylineFlags::POLYLINE_3D | PolylineFlags::POLYGON_MESH | PolylineFlags::POLYFACE_MESH,
        )
    }

    /// Positional vertices mapped to world XY with their bulges
    ///
    /// Polyface face records are skipped. Bulges only apply to 2D polylines.
    pub fn world_vertices(&self) -> Vec<(Vector2, f64)> {
        let positions = self.vertices.iter().filter(|v| !v.is_face_record());
        if self.is_3d() {
            return positions.map(|v| (v.location.xy(), 0.0)).collect();
        }
        let ocs = self.common.ocs();
        let mirrored = ocs.x_axis().cross(&ocs.y_axis()).z < 0.0;
        positions
            .map(|v| {
                let bulge = if mirrored { -v.bulge } else { v.bulge };
                (ocs.to_world_xy(v.location.xy(), self.elevation.z), bulge)
            })
            .collect()
    }

    /// Straight and arc segments in world XY
    ///
    /// Meshes have no meaningful chain, so they yield no segments.
    pub fn segments(&self) -> Vec<BulgeArc> {
        if self
            .flags
            .intersects(PolylineFlags::POLYGON_MESH | PolylineFlags::POLYFACE_MESH)
        {
            return Vec::new();
        }
        polyline_segments(&self.world_vertices(), self.is_closed())
    }
}

impl Default for Polyline {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Polyline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        polyline_extents(&self.world_vertices(), self.is_closed() && !self.is_3d())
    }

    fn entity_type(&self) -> &'static str {
        "POLYLINE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let mut pline = Polyline::new();
        pline.flags = PolylineFlags::from_bits_retain(9);
        assert!(pline.is_closed());
        assert!(pline.is_3d());
    }

    #[test]
    fn test_face_records_ignored() {
        let mut pline = Polyline::new();
        pline.flags = PolylineFlags::POLYFACE_MESH;
        let mut v = Vertex::new(Vector3::new(1.0, 1.0, 0.0));
        v.flags = VertexFlags::POLYGON_MESH | VertexFlags::POLYFACE_FACE;
        pline.vertices.push(v);
        let mut face = Vertex::new(Vector3::new(100.0, 100.0, 0.0));
        face.flags = VertexFlags::POLYFACE_FACE;
        pline.vertices.push(face);
        let bbox = pline.bounding_box().unwrap();
        assert_eq!(bbox.max, Vector2::new(1.0, 1.0));
        assert!(pline.segments().is_empty());
    }

    #[test]
    fn test_2d_bulges() {
        let mut pline = Polyline::new();
        let mut first = Vertex::new(Vector3::new(0.0, 0.0, 0.0));
        first.bulge = 1.0;
        pline.vertices.push(first);
        pline.vertices.push(Vertex::new(Vector3::new(2.0, 0.0, 0.0)));
        assert_eq!(pline.segments().len(), 1);
        let bbox = pline.bounding_box().unwrap();
        assert!((bbox.min.y + 1.0).abs() < 1e-9);
    }
}
