//! Lightweight polyline entity (2D polyline with bulges)

use super::{Entity, EntityCommon};
use crate::geometry::{polyline_extents, polyline_segments, BulgeArc};
use crate::types::{BoundingBox2D, Vector2};
use bitflags::bitflags;

bitflags! {
    /// Lightweight polyline flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LwPolylineFlags: i16 {
        /// Closed polyline
        const CLOSED = 1;
        /// Line type pattern generated continuously around vertices
        const PLINEGEN = 128;
    }
}

/// A vertex in a lightweight polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LwVertex {
    /// Location of the vertex, in OCS
    pub location: Vector2,
    /// Bulge of the segment starting at this vertex
    pub bulge: f64,
    /// Starting width at this vertex
    pub start_width: f64,
    /// Ending width at this vertex
    pub end_width: f64,
}

impl LwVertex {
    /// Create a new vertex
    pub fn new(location: Vector2) -> Self {
        LwVertex {
            location,
            bulge: 0.0,
            start_width: 0.0,
            end_width: 0.0,
        }
    }

    /// Create a vertex with a bulge
    pub fn with_bulge(location: Vector2, bulge: f64) -> Self {
        LwVertex {
            bulge,
            ..LwVertex::new(location)
        }
    }
}

/// A lightweight (2D) polyline entity
#[derive(Debug, Clone, PartialEq)]
pub struct LwPolyline {
    /// Common entity data
    pub common: EntityCommon,
    /// Vertices of the polyline
    pub vertices: Vec<LwVertex>,
    /// Raw flags
    pub flags: LwPolylineFlags,
    /// Constant width
    pub constant_width: f64,
    /// Elevation of the OCS plane
    pub elevation: f64,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
}

impl LwPolyline {
    /// Create a new empty lightweight polyline
    pub fn new() -> Self {
        LwPolyline {
            common: EntityCommon::new(),
            vertices: Vec::new(),
            flags: LwPolylineFlags::empty(),
            constant_width: 0.0,
            elevation: 0.0,
            thickness: 0.0,
        }
    }

    /// Create a polyline from a list of 2D points
    pub fn from_points(points: Vec<Vector2>) -> Self {
        LwPolyline {
            vertices: points.into_iter().map(LwVertex::new).collect(),
            ..Self::new()
        }
    }

    /// Is the polyline closed?
    pub fn is_closed(&self) -> bool {
        self.flags.contains(LwPolylineFlags::CLOSED)
    }

    /// Vertices and bulges mapped to world XY
    ///
    /// A mirrored OCS reverses the turning direction, so bulges flip sign.
    pub fn world_vertices(&self) -> Vec<(Vector2, f64)> {
        let ocs = self.common.ocs();
        let mirrored = ocs.x_axis().cross(&ocs.y_axis()).z < 0.0;
        self.vertices
            .iter()
            .map(|v| {
                let bulge = if mirrored { -v.bulge } else { v.bulge };
                (ocs.to_world_xy(v.location, self.elevation), bulge)
            })
            .collect()
    }

    /// Straight and arc segments in world XY
    pub fn segments(&self) -> Vec<BulgeArc> {
        polyline_segments(&self.world_vertices(), self.is_closed())
    }
}

impl Default for LwPolyline {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for LwPolyline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        polyline_extents(&self.world_vertices(), self.is_closed())
    }

    fn entity_type(&self) -> &'static str {
        "LWPOLYLINE"
    }
}
