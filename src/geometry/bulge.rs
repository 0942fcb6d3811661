//! Polyline bulge to circular arc conversion
//!
//! A bulge is `tan(θ/4)` where θ is the included angle of the arc between two
//! consecutive vertices. Positive bulges run counter-clockwise from the first
//! vertex to the second, negative bulges clockwise.

use super::{angle_in_sweep, EPSILON};
use crate::types::{BoundingBox2D, Vector2};
use std::f64::consts::FRAC_PI_2;

/// Arc recovered from a bulged polyline segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulgeArc {
    /// Segment start point
    pub start: Vector2,
    /// Segment end point
    pub end: Vector2,
    /// Arc center; the chord midpoint for straight segments
    pub center: Vector2,
    /// Arc radius; 0 means the segment is straight
    pub radius: f64,
    /// Angle of `start` seen from the center, radians
    pub start_angle: f64,
    /// Angle of `end` seen from the center, radians
    pub end_angle: f64,
    /// Included angle, radians, always positive
    pub sweep: f64,
    /// Direction of travel from `start` to `end`
    pub counter_clockwise: bool,
}

impl BulgeArc {
    /// Whether the segment degenerated to a straight line
    pub fn is_straight(&self) -> bool {
        self.radius <= 0.0
    }

    /// Point halfway along the arc (or chord)
    pub fn midpoint(&self) -> Vector2 {
        if self.is_straight() {
            return self.start.midpoint(&self.end);
        }
        let mid_angle = if self.counter_clockwise {
            self.start_angle + self.sweep / 2.0
        } else {
            self.start_angle - self.sweep / 2.0
        };
        self.center + Vector2::new(mid_angle.cos(), mid_angle.sin()) * self.radius
    }

    /// Exact axis-aligned extents of the arc
    pub fn extents(&self) -> BoundingBox2D {
        let mut bbox = BoundingBox2D::from_point(self.start);
        bbox.expand_to_include(self.end);
        if self.is_straight() {
            return bbox;
        }
        // Normalize to a counter-clockwise sweep
        let ccw_start = if self.counter_clockwise {
            self.start_angle
        } else {
            self.end_angle
        };
        for quadrant in 0..4 {
            let angle = quadrant as f64 * FRAC_PI_2;
            if angle_in_sweep(angle, ccw_start, self.sweep) {
                bbox.expand_to_include(
                    self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius,
                );
            }
        }
        bbox
    }
}

/// Convert a bulged segment into its arc parameters
///
/// Coincident points or a zero bulge yield a straight segment with radius 0
/// instead of a division by zero.
pub fn bulge_to_arc(start: Vector2, end: Vector2, bulge: f64) -> BulgeArc {
    let chord_vec = end - start;
    let chord = chord_vec.length();
    let midpoint = start.midpoint(&end);

    if chord < EPSILON || bulge.abs() < EPSILON {
        return BulgeArc {
            start,
            end,
            center: midpoint,
            radius: 0.0,
            start_angle: 0.0,
            end_angle: 0.0,
            sweep: 0.0,
            counter_clockwise: bulge >= 0.0,
        };
    }

    let half_chord = chord / 2.0;
    let sagitta = bulge.abs() * half_chord;
    let radius = (half_chord * half_chord + sagitta * sagitta) / (2.0 * sagitta);

    // Left-hand normal of the travel direction; the center sits on the left
    // for counter-clockwise arcs under a half turn.
    let left = chord_vec.perp() * (1.0 / chord);
    let offset = (radius - sagitta) * bulge.signum();
    let center = midpoint + left * offset;

    let start_angle = (start.y - center.y).atan2(start.x - center.x);
    let end_angle = (end.y - center.y).atan2(end.x - center.x);

    BulgeArc {
        start,
        end,
        center,
        radius,
        start_angle,
        end_angle,
        sweep: 4.0 * bulge.abs().atan(),
        counter_clockwise: bulge > 0.0,
    }
}

/// Split a bulged vertex chain into segments
///
/// Each item is a vertex location and the bulge of the segment that starts
/// there. A closed chain gets a final segment back to the first vertex.
pub fn polyline_segments(vertices: &[(Vector2, f64)], closed: bool) -> Vec<BulgeArc> {
    let mut segments: Vec<BulgeArc> = vertices
        .windows(2)
        .map(|pair| bulge_to_arc(pair[0].0, pair[1].0, pair[0].1))
        .collect();
    if closed && vertices.len() >= 2 {
        if let (Some(last), Some(first)) = (vertices.last(), vertices.first()) {
            segments.push(bulge_to_arc(last.0, first.0, last.1));
        }
    }
    segments
}

/// Extents of a bulged vertex chain, including arc bulges
pub fn polyline_extents(vertices: &[(Vector2, f64)], closed: bool) -> Option<BoundingBox2D> {
    let mut bbox = BoundingBox2D::from_points(vertices.iter().map(|v| v.0))?;
    for segment in polyline_segments(vertices, closed) {
        bbox = bbox.merge(&segment.extents());
    }
    Some(bbox)
}
