//! Geometry helpers needed to interpret stored entity parameters
//!
//! - [`bulge`] converts polyline bulge factors to circular arcs
//! - [`spline`] evaluates rational B-splines and fit-point curves
//! - [`ocs`] recovers object coordinate systems from extrusion vectors

pub mod bulge;
pub mod ocs;
pub mod spline;

pub use bulge::{bulge_to_arc, polyline_extents, polyline_segments, BulgeArc};
pub use ocs::Ocs;
pub use spline::{catmull_rom, evaluate_nurbs, sample_nurbs, sample_spline};

/// Length below which two points are treated as coincident
pub const EPSILON: f64 = 1e-10;

use std::f64::consts::TAU;

/// Normalize an angle in radians into `[0, 2π)`
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Whether `angle` lies on the counter-clockwise sweep that starts at
/// `start` and covers `sweep` radians
pub fn angle_in_sweep(angle: f64, start: f64, sweep: f64) -> bool {
    if sweep >= TAU {
        return true;
    }
    normalize_angle(angle - start) <= sweep + EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_angle_in_sweep_wraps() {
        // 350° .. 10° contains 0°
        let start = 350f64.to_radians();
        let sweep = 20f64.to_radians();
        assert!(angle_in_sweep(0.0, start, sweep));
        assert!(!angle_in_sweep(PI, start, sweep));
    }
}
