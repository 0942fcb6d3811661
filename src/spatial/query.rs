//! Picking and snapping against a [`SpatialIndex`]

use super::SpatialIndex;
use crate::document::CadDocument;
use crate::entities::{Arc, Ellipse, EntityType};
use crate::geometry::{angle_in_sweep, BulgeArc, EPSILON};
use crate::types::{BoundingBox2D, Vector2};
use ahash::AHashSet;
use bitflags::bitflags;

/// Samples used to approximate a spline for distance tests
const SPLINE_SAMPLES: usize = 64;

bitflags! {
    /// Requested snap point categories
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SnapKinds: u8 {
        /// Segment, arc, curve and polyline vertex endpoints, and POINT locations
        const ENDPOINT = 0b001;
        /// Segment and arc midpoints
        const MIDPOINT = 0b010;
        /// Circle, arc and ellipse centers
        const CENTER = 0b100;
    }
}

/// Category of one snap point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapKind {
    Endpoint,
    Midpoint,
    Center,
}

impl SnapKind {
    /// The flag that requests this kind
    pub fn flag(self) -> SnapKinds {
        match self {
            SnapKind::Endpoint => SnapKinds::ENDPOINT,
            SnapKind::Midpoint => SnapKinds::MIDPOINT,
            SnapKind::Center => SnapKinds::CENTER,
        }
    }
}

/// A snap candidate near the query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    /// Location in world XY
    pub point: Vector2,
    /// What kind of feature the point is
    pub kind: SnapKind,
    /// Index of the entity in [`CadDocument::entities`]
    pub entity: usize,
    /// Distance from the query point
    pub distance: f64,
}

/// Upper-case names of the document's visible layers
///
/// This is the form `visible_layers` takes in [`hit_test`] and [`find_snaps`].
pub fn visible_layer_names(doc: &CadDocument) -> AHashSet<String> {
    doc.layers
        .iter()
        .filter(|l| l.is_visible())
        .map(|l| l.name.to_uppercase())
        .collect()
}

/// Index of the entity closest to `point`, if any lies strictly within `tolerance`
///
/// Invisible entities are ignored. When `visible_layers` is given, entities
/// whose layer is not in it are ignored too; otherwise the document's own
/// layer visibility applies. On equal distance the later entity wins.
pub fn hit_test(
    doc: &CadDocument,
    index: &SpatialIndex,
    point: Vector2,
    tolerance: f64,
    visible_layers: Option<&AHashSet<String>>,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for i in candidates(doc, index, point, tolerance, visible_layers) {
        let Some(entity) = doc.entities.get(i) else {
            continue;
        };
        let distance = match entity_distance(entity, point) {
            Some(d) => d,
            None => match index.bbox(i) {
                Some(bbox) => bbox.distance_to_point(point),
                None => continue,
            },
        };
        if distance >= tolerance {
            continue;
        }
        // Candidates ascend, so `<=` hands ties to the higher index
        if best.map_or(true, |(_, d)| distance <= d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

/// Snap points of the requested kinds within `tolerance` of `point`,
/// nearest first
pub fn find_snaps(
    doc: &CadDocument,
    index: &SpatialIndex,
    point: Vector2,
    tolerance: f64,
    kinds: SnapKinds,
    visible_layers: Option<&AHashSet<String>>,
) -> Vec<SnapPoint> {
    let mut snaps = Vec::new();
    for i in candidates(doc, index, point, tolerance, visible_layers) {
        let Some(entity) = doc.entities.get(i) else {
            continue;
        };
        for (kind, location) in snap_candidates(entity) {
            if !kinds.contains(kind.flag()) {
                continue;
            }
            let distance = location.distance(&point);
            if distance <= tolerance {
                snaps.push(SnapPoint {
                    point: location,
                    kind,
                    entity: i,
                    distance,
                });
            }
        }
    }
    snaps.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    snaps
}

/// Indexed entities near `point` that are shown, ascending
fn candidates(
    doc: &CadDocument,
    index: &SpatialIndex,
    point: Vector2,
    tolerance: f64,
    visible_layers: Option<&AHashSet<String>>,
) -> Vec<usize> {
    let area = BoundingBox2D::from_point(point).inflate(tolerance.max(0.0));
    let mut found = index.search(&area);
    found.retain(|&i| {
        doc.entities.get(i).is_some_and(|entity| {
            let common = entity.common();
            !common.invisible
                && match visible_layers {
                    Some(names) => names.contains(&common.layer.to_uppercase()),
                    None => doc.is_layer_visible(&common.layer),
                }
        })
    });
    found
}

/// Exact distance from `point` to the entity's geometry
///
/// `None` means the caller should fall back to the entity's box.
fn entity_distance(entity: &EntityType, point: Vector2) -> Option<f64> {
    match entity {
        EntityType::Point(p) => Some(p.location.xy().distance(&point)),
        EntityType::Line(line) => Some(segment_distance(point, line.start.xy(), line.end.xy())),
        EntityType::Circle(circle) => {
            Some((circle.world_center().distance(&point) - circle.radius.abs()).abs())
        }
        EntityType::Arc(arc) => Some(arc_distance(arc, point)),
        EntityType::Ellipse(ellipse) => ellipse_distance(ellipse, point),
        EntityType::LwPolyline(pl) => chain_distance(&pl.segments(), &pl.world_vertices(), point),
        EntityType::Polyline(pl) => chain_distance(&pl.segments(), &pl.world_vertices(), point),
        EntityType::Spline(spline) => {
            let samples = spline.sample_points(SPLINE_SAMPLES);
            match samples.as_slice() {
                [] => None,
                [only] => Some(only.distance(&point)),
                _ => samples
                    .windows(2)
                    .map(|w| segment_distance(point, w[0], w[1]))
                    .reduce(f64::min),
            }
        }
        // Text, MText and the rest are measured against their box
        _ => None,
    }
}

fn segment_distance(point: Vector2, a: Vector2, b: Vector2) -> f64 {
    let v = b - a;
    let w = point - a;
    let c1 = w.dot(&v);
    if c1 <= 0.0 {
        return point.distance(&a);
    }
    let c2 = v.dot(&v);
    if c2 <= c1 {
        return point.distance(&b);
    }
    point.distance(&(a + v * (c1 / c2)))
}

fn arc_distance(arc: &Arc, point: Vector2) -> f64 {
    let center = arc.world_center();
    let offset = point - center;
    if arc.contains_world_angle(offset.y.atan2(offset.x)) {
        (offset.length() - arc.radius.abs()).abs()
    } else {
        point
            .distance(&arc.start_point())
            .min(point.distance(&arc.end_point()))
    }
}

fn bulge_segment_distance(segment: &BulgeArc, point: Vector2) -> f64 {
    if segment.is_straight() {
        return segment_distance(point, segment.start, segment.end);
    }
    let offset = point - segment.center;
    let ccw_start = if segment.counter_clockwise {
        segment.start_angle
    } else {
        segment.end_angle
    };
    if angle_in_sweep(offset.y.atan2(offset.x), ccw_start, segment.sweep) {
        (offset.length() - segment.radius).abs()
    } else {
        point
            .distance(&segment.start)
            .min(point.distance(&segment.end))
    }
}

fn chain_distance(segments: &[BulgeArc], vertices: &[(Vector2, f64)], point: Vector2) -> Option<f64> {
    if segments.is_empty() {
        return vertices
            .iter()
            .map(|(v, _)| v.distance(&point))
            .reduce(f64::min);
    }
    segments
        .iter()
        .map(|s| bulge_segment_distance(s, point))
        .reduce(f64::min)
}

/// Distance via the ellipse's own frame
///
/// The point is expressed in major/minor axis units; the curve point with the
/// same eccentric angle approximates the nearest point.
fn ellipse_distance(ellipse: &Ellipse, point: Vector2) -> Option<f64> {
    let major = ellipse.major_axis.xy();
    let minor = ellipse.minor_axis().xy();
    let det = major.cross(&minor);
    if det.abs() < EPSILON {
        return None;
    }
    let d = point - ellipse.center.xy();
    let u = d.cross(&minor) / det;
    let v = major.cross(&d) / det;
    let t = v.atan2(u);

    if ellipse.is_full() || angle_in_sweep(t, ellipse.start_parameter, ellipse.parameter_span()) {
        Some(ellipse.point_at(t).distance(&point))
    } else {
        Some(
            point
                .distance(&ellipse.start_point())
                .min(point.distance(&ellipse.end_point())),
        )
    }
}

/// Every snap point an entity offers
fn snap_candidates(entity: &EntityType) -> Vec<(SnapKind, Vector2)> {
    use SnapKind::*;
    match entity {
        EntityType::Point(p) => vec![(Endpoint, p.location.xy())],
        EntityType::Line(line) => vec![
            (Endpoint, line.start.xy()),
            (Endpoint, line.end.xy()),
            (Midpoint, line.midpoint().xy()),
        ],
        EntityType::Circle(circle) => vec![(Center, circle.world_center())],
        EntityType::Arc(arc) => vec![
            (Endpoint, arc.start_point()),
            (Endpoint, arc.end_point()),
            (Midpoint, arc.mid_point()),
            (Center, arc.world_center()),
        ],
        EntityType::Ellipse(ellipse) => {
            let mut points = vec![(Center, ellipse.center.xy())];
            if !ellipse.is_full() {
                points.push((Endpoint, ellipse.start_point()));
                points.push((Endpoint, ellipse.end_point()));
                points.push((Midpoint, ellipse.mid_point()));
            }
            points
        }
        EntityType::LwPolyline(pl) => chain_snaps(&pl.segments(), &pl.world_vertices()),
        EntityType::Polyline(pl) => chain_snaps(&pl.segments(), &pl.world_vertices()),
        EntityType::Spline(spline) => spline
            .start_point()
            .into_iter()
            .chain(spline.end_point())
            .map(|p| (Endpoint, p))
            .collect(),
        _ => Vec::new(),
    }
}

fn chain_snaps(segments: &[BulgeArc], vertices: &[(Vector2, f64)]) -> Vec<(SnapKind, Vector2)> {
    let mut points: Vec<(SnapKind, Vector2)> =
        vertices.iter().map(|(v, _)| (SnapKind::Endpoint, *v)).collect();
    for segment in segments {
        points.push((SnapKind::Midpoint, segment.midpoint()));
        if !segment.is_straight() {
            points.push((SnapKind::Center, segment.center));
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Circle, Line, LwPolyline, LwVertex, Text};
    use crate::spatial::BoundsMode;
    use crate::tables::Layer;
    use crate::types::Vector3;

    fn doc_with(entities: Vec<EntityType>) -> (CadDocument, SpatialIndex) {
        let mut doc = CadDocument::new();
        doc.entities = entities;
        doc.finalize_layers();
        let index = SpatialIndex::build(&doc, BoundsMode::ResolveInserts);
        (doc, index)
    }

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> EntityType {
        EntityType::Line(Line::from_coords(x1, y1, 0.0, x2, y2, 0.0))
    }

    #[test]
    fn test_segment_distance() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(10.0, 0.0);
        assert_eq!(segment_distance(Vector2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(segment_distance(Vector2::new(-3.0, 4.0), a, b), 5.0);
        assert_eq!(segment_distance(Vector2::new(13.0, 4.0), a, b), 5.0);
        assert_eq!(segment_distance(Vector2::new(1.0, 1.0), a, a), 2f64.sqrt());
    }

    #[test]
    fn test_arc_uses_endpoints_off_sweep() {
        let mut arc = Arc::new();
        arc.radius = 1.0;
        arc.start_angle = 0.0;
        arc.end_angle = 90.0;
        assert!((arc_distance(&arc, Vector2::new(0.0, 2.0)) - 1.0).abs() < 1e-12);
        // Opposite side: nearest is an endpoint, not the circle
        let d = arc_distance(&arc, Vector2::new(-1.0, 0.0));
        assert!((d - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_ellipse_distance_on_axes() {
        let ellipse = Ellipse::from_center_axes(Vector3::ZERO, Vector3::new(4.0, 0.0, 0.0), 0.5);
        assert!((ellipse_distance(&ellipse, Vector2::new(5.0, 0.0)).unwrap() - 1.0).abs() < 1e-12);
        assert!((ellipse_distance(&ellipse, Vector2::new(0.0, 3.0)).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hit_picks_closest() {
        let (doc, index) = doc_with(vec![line(0.0, 0.0, 10.0, 0.0), line(0.0, 1.0, 10.0, 1.0)]);
        assert_eq!(hit_test(&doc, &index, Vector2::new(5.0, 0.8), 0.5, None), Some(1));
        assert_eq!(hit_test(&doc, &index, Vector2::new(5.0, 0.1), 0.5, None), Some(0));
        assert_eq!(hit_test(&doc, &index, Vector2::new(5.0, 5.0), 0.5, None), None);
    }

    #[test]
    fn test_hit_tolerance_is_strict() {
        let (doc, index) = doc_with(vec![line(0.0, 0.0, 10.0, 0.0)]);
        assert_eq!(hit_test(&doc, &index, Vector2::new(5.0, 0.5), 0.5, None), None);
        assert_eq!(hit_test(&doc, &index, Vector2::new(5.0, 0.49), 0.5, None), Some(0));
    }

    #[test]
    fn test_hit_ignores_invisible_and_hidden_layers() {
        let mut hidden = Line::from_coords(0.0, 0.0, 0.0, 10.0, 0.0, 0.0);
        hidden.common.layer = "OFF".to_string();
        let mut invisible = Line::from_coords(0.0, 0.0, 0.0, 10.0, 0.0, 0.0);
        invisible.common.invisible = true;

        let mut doc = CadDocument::new();
        doc.layers.insert(Layer::with_color("OFF", -1));
        doc.entities = vec![
            line(0.0, 0.3, 10.0, 0.3),
            EntityType::Line(hidden),
            EntityType::Line(invisible),
        ];
        doc.finalize_layers();
        let index = SpatialIndex::build(&doc, BoundsMode::EntityOnly);

        let p = Vector2::new(5.0, 0.0);
        assert_eq!(hit_test(&doc, &index, p, 1.0, None), Some(0));

        let mut layers = visible_layer_names(&doc);
        assert!(!layers.contains("OFF"));
        layers.insert("OFF".to_string());
        assert_eq!(hit_test(&doc, &index, p, 1.0, Some(&layers)), Some(1));
    }

    #[test]
    fn test_hit_text_uses_box() {
        let text = Text::with_value("ABCD", Vector3::ZERO);
        let (doc, index) = doc_with(vec![EntityType::Text(text)]);
        assert_eq!(hit_test(&doc, &index, Vector2::new(0.5, 0.5), 0.1, None), Some(0));
    }

    #[test]
    fn test_hit_polyline_bulge() {
        // Half circle of radius 1 from (1,0) to (-1,0) through (0,1)
        let mut pl = LwPolyline::new();
        pl.vertices = vec![
            LwVertex::with_bulge(Vector2::new(1.0, 0.0), 1.0),
            LwVertex::new(Vector2::new(-1.0, 0.0)),
        ];
        let (doc, index) = doc_with(vec![EntityType::LwPolyline(pl)]);
        assert_eq!(hit_test(&doc, &index, Vector2::new(0.0, 1.05), 0.1, None), Some(0));
        assert_eq!(hit_test(&doc, &index, Vector2::new(0.0, 0.5), 0.1, None), None);
    }

    #[test]
    fn test_snaps_sorted_and_filtered() {
        let circle = Circle::from_center_radius(Vector3::new(5.2, 0.0, 0.0), 3.0);
        let (doc, index) = doc_with(vec![line(0.0, 0.0, 10.0, 0.0), EntityType::Circle(circle)]);
        let p = Vector2::new(5.0, 0.1);

        let snaps = find_snaps(&doc, &index, p, 1.0, SnapKinds::all(), None);
        let kinds: Vec<SnapKind> = snaps.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SnapKind::Midpoint, SnapKind::Center]);
        assert!(snaps.windows(2).all(|w| w[0].distance <= w[1].distance));

        let centers = find_snaps(&doc, &index, p, 1.0, SnapKinds::CENTER, None);
        assert_eq!(centers.len(), 1);
        assert_eq!(centers[0].entity, 1);

        let endpoints = find_snaps(&doc, &index, Vector2::new(0.1, 0.0), 0.5, SnapKinds::ENDPOINT, None);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].point, Vector2::ZERO);
    }
}
