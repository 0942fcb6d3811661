//! Object coordinate systems
//!
//! Planar entities (circles, arcs, lightweight polylines, text, hatches,
//! block references) store their coordinates relative to a plane defined only
//! by the extrusion vector N. The in-plane axes are recovered with the
//! Arbitrary Axis Algorithm.

use crate::types::{Vector2, Vector3};
use nalgebra::{Matrix3, Vector3 as NVector3};

/// Threshold below which N is considered close to the world Z axis
const ARBITRARY_AXIS_LIMIT: f64 = 1.0 / 64.0;

/// Object coordinate system derived from an extrusion direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ocs {
    /// Columns are the OCS X, Y and Z axes in world coordinates;
    /// `None` for the world system itself
    basis: Option<Matrix3<f64>>,
}

impl Ocs {
    /// The world coordinate system
    pub const WORLD: Ocs = Ocs { basis: None };

    /// Derive the coordinate system for an extrusion vector
    ///
    /// Exactly (0, 0, 1) and zero-length vectors map to the world system.
    pub fn from_extrusion(extrusion: Vector3) -> Self {
        if extrusion == Vector3::UNIT_Z {
            return Ocs::WORLD;
        }
        let n = NVector3::new(extrusion.x, extrusion.y, extrusion.z);
        let Some(n) = n.try_normalize(f64::EPSILON) else {
            return Ocs::WORLD;
        };

        let ax = if n.x.abs() < ARBITRARY_AXIS_LIMIT && n.y.abs() < ARBITRARY_AXIS_LIMIT {
            NVector3::y().cross(&n)
        } else {
            NVector3::z().cross(&n)
        }
        .normalize();
        let ay = n.cross(&ax).normalize();

        Ocs {
            basis: Some(Matrix3::from_columns(&[ax, ay, n])),
        }
    }

    /// Whether this is the world coordinate system
    pub fn is_world(&self) -> bool {
        self.basis.is_none()
    }

    /// OCS X axis in world coordinates
    pub fn x_axis(&self) -> Vector3 {
        self.column(0).unwrap_or(Vector3::UNIT_X)
    }

    /// OCS Y axis in world coordinates
    pub fn y_axis(&self) -> Vector3 {
        self.column(1).unwrap_or(Vector3::UNIT_Y)
    }

    fn column(&self, index: usize) -> Option<Vector3> {
        self.basis.map(|m| {
            let c = m.column(index);
            Vector3::new(c[0], c[1], c[2])
        })
    }

    /// Map an OCS point to world coordinates
    pub fn to_world(&self, point: Vector3) -> Vector3 {
        match &self.basis {
            None => point,
            Some(m) => {
                let w = m * NVector3::new(point.x, point.y, point.z);
                Vector3::new(w.x, w.y, w.z)
            }
        }
    }

    /// Map a planar OCS point at `elevation` to its world XY projection
    pub fn to_world_xy(&self, point: Vector2, elevation: f64) -> Vector2 {
        match self.basis {
            None => point,
            Some(_) => self.to_world(Vector3::new(point.x, point.y, elevation)).xy(),
        }
    }

    /// Map an OCS angle (radians, measured from the OCS X axis) to the
    /// corresponding angle of the projected direction in world XY
    pub fn angle_to_world(&self, angle: f64) -> f64 {
        if self.is_world() {
            return angle;
        }
        let dir = self.to_world(Vector3::new(angle.cos(), angle.sin(), 0.0));
        dir.y.atan2(dir.x)
    }
}

impl Default for Ocs {
    fn default() -> Self {
        Ocs::WORLD
    }
}
