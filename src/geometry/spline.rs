//! Spline evaluation
//!
//! Control-point splines are evaluated as (rational) B-splines with De Boor's
//! algorithm. Splines that only carry fit points are approximated with a
//! Catmull-Rom curve through those points.

use super::EPSILON;
use crate::types::Vector3;

/// Build a clamped uniform knot vector for `count` control points
pub fn clamped_uniform_knots(count: usize, degree: usize) -> Vec<f64> {
    let spans = count.saturating_sub(degree).max(1);
    let mut knots = Vec::with_capacity(count + degree + 1);
    knots.extend(std::iter::repeat(0.0).take(degree + 1));
    for i in 1..spans {
        knots.push(i as f64 / spans as f64);
    }
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}

/// Evaluate a B-spline at parameter `t`
///
/// Weights are used only when there is one per control point. A knot vector
/// of the wrong length is replaced by a clamped uniform one. `t` is clamped
/// into the valid parameter domain. Returns `None` without control points.
pub fn evaluate_nurbs(
    degree: usize,
    control_points: &[Vector3],
    knots: &[f64],
    weights: &[f64],
    t: f64,
) -> Option<Vector3> {
    let n = control_points.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(control_points[0]);
    }
    let p = degree.clamp(1, n - 1);

    let generated;
    let knots = if knots.len() == n + p + 1 {
        knots
    } else {
        generated = clamped_uniform_knots(n, p);
        &generated[..]
    };
    let rational = weights.len() == n;

    let t_min = knots[p];
    let t_max = knots[n];
    let t = if t_max > t_min {
        t.clamp(t_min, t_max)
    } else {
        t_min
    };

    // Span index k with knots[k] <= t < knots[k + 1], restricted to [p, n - 1]
    let mut k = p;
    while k < n - 1 && knots[k + 1] <= t {
        k += 1;
    }

    // Homogeneous coordinates [x·w, y·w, z·w, w]
    let mut d: Vec<[f64; 4]> = (0..=p)
        .map(|j| {
            let point = control_points[j + k - p];
            let w = if rational { weights[j + k - p] } else { 1.0 };
            [point.x * w, point.y * w, point.z * w, w]
        })
        .collect();

    for r in 1..=p {
        for j in (r..=p).rev() {
            let i = j + k - p;
            let denom = knots[i + p - r + 1] - knots[i];
            if denom.abs() < EPSILON {
                continue;
            }
            let alpha = (t - knots[i]) / denom;
            let prev = d[j - 1];
            let cur = &mut d[j];
            for c in 0..4 {
                cur[c] = (1.0 - alpha) * prev[c] + alpha * cur[c];
            }
        }
    }

    let [x, y, z, w] = d[p];
    if w.abs() < EPSILON {
        return Some(Vector3::new(x, y, z));
    }
    Some(Vector3::new(x / w, y / w, z / w))
}

/// Sample a B-spline at `segments + 1` evenly spaced parameters
pub fn sample_nurbs(
    degree: usize,
    control_points: &[Vector3],
    knots: &[f64],
    weights: &[f64],
    segments: usize,
) -> Vec<Vector3> {
    let n = control_points.len();
    if n < 2 {
        return control_points.to_vec();
    }
    let p = degree.clamp(1, n - 1);
    let (t_min, t_max) = if knots.len() == n + p + 1 {
        (knots[p], knots[n])
    } else {
        (0.0, 1.0)
    };
    let segments = segments.max(1);
    (0..=segments)
        .filter_map(|i| {
            let t = t_min + (t_max - t_min) * i as f64 / segments as f64;
            evaluate_nurbs(degree, control_points, knots, weights, t)
        })
        .collect()
}

/// Interpolate through fit points with a uniform Catmull-Rom curve
///
/// The virtual neighbours before the first and after the last point are the
/// end points themselves.
pub fn catmull_rom(points: &[Vector3], segments_per_span: usize) -> Vec<Vector3> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let segments = segments_per_span.max(1);
    let last = points.len() - 1;
    let mut out = Vec::with_capacity(last * segments + 1);

    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];
        for s in 0..segments {
            let t = s as f64 / segments as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let point = (p1 * 2.0
                + (p2 - p0) * t
                + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
                + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
                * 0.5;
            out.push(point);
        }
    }
    out.push(points[last]);
    out
}

/// Sample a spline from whatever definition it carries
///
/// A control polygon wins over fit points. Returns an empty vector when
/// neither is present.
pub fn sample_spline(
    degree: usize,
    control_points: &[Vector3],
    knots: &[f64],
    weights: &[f64],
    fit_points: &[Vector3],
    segments: usize,
) -> Vec<Vector3> {
    if !control_points.is_empty() {
        sample_nurbs(degree, control_points, knots, weights, segments)
    } else {
        let spans = fit_points.len().saturating_sub(1).max(1);
        catmull_rom(fit_points, (segments / spans).max(4))
    }
}
