//! Per-kind entity parsers
//!
//! Each parser gets the pairs of one entity record, from just after its
//! `0/<TYPE>` tag up to (not including) the next code 0 pair. Parsers start
//! from the entity's defaults and overwrite fields in a single ordered scan;
//! malformed values leave the default in place.

use super::tokenizer::{DxfCodePair, PairReader};
use crate::entities::*;
use crate::types::{Color, LineWeight, Vector2, Vector3};

/// Entity type tags this reader interprets
pub const SUPPORTED_ENTITY_TYPES: [&str; 13] = [
    "POINT",
    "LINE",
    "CIRCLE",
    "ARC",
    "ELLIPSE",
    "LWPOLYLINE",
    "POLYLINE",
    "SPLINE",
    "TEXT",
    "MTEXT",
    "INSERT",
    "DIMENSION",
    "HATCH",
];

/// Parse one entity record
///
/// Returns `None` for type tags outside [`SUPPORTED_ENTITY_TYPES`]. POLYLINE
/// and INSERT come back without their VERTEX/ATTRIB children; attaching those
/// is the section reader's job.
pub fn read_entity(type_name: &str, run: &[DxfCodePair]) -> Option<EntityType> {
    let entity = match type_name {
        "POINT" => EntityType::Point(read_point(run)),
        "LINE" => EntityType::Line(read_line(run)),
        "CIRCLE" => EntityType::Circle(read_circle(run)),
        "ARC" => EntityType::Arc(read_arc(run)),
        "ELLIPSE" => EntityType::Ellipse(read_ellipse(run)),
        "LWPOLYLINE" => EntityType::LwPolyline(read_lwpolyline(run)),
        "POLYLINE" => EntityType::Polyline(read_polyline(run)),
        "SPLINE" => EntityType::Spline(read_spline(run)),
        "TEXT" => EntityType::Text(read_text(run)),
        "MTEXT" => EntityType::MText(read_mtext(run)),
        "INSERT" => EntityType::Insert(read_insert(run)),
        "DIMENSION" => EntityType::Dimension(read_dimension(run)),
        "HATCH" => EntityType::Hatch(read_hatch(run)),
        _ => return None,
    };
    Some(entity)
}

/// Apply a shared base attribute; returns `false` if `pair` is not one
fn read_common(common: &mut EntityCommon, pair: &DxfCodePair) -> bool {
    match pair.code {
        5 => common.handle = pair.as_handle(),
        6 => common.line_type = pair.value.clone(),
        8 => common.layer = pair.value.clone(),
        48 => {
            if let Some(scale) = pair.as_double() {
                common.line_type_scale = scale;
            }
        }
        60 => {
            if let Some(flag) = pair.as_i16() {
                common.invisible = flag == 1;
            }
        }
        62 => {
            if let Some(index) = pair.as_i16() {
                common.color = Color::from_index(index);
            }
        }
        370 => {
            if let Some(lw) = pair.as_i16() {
                common.line_weight = LineWeight::from_raw(lw);
            }
        }
        420 => {
            if let Some(rgb) = pair.as_i32() {
                common.true_color = Some(rgb as u32 & 0x00FF_FFFF);
            }
        }
        210 | 220 | 230 => return read_coordinate(&mut common.extrusion, pair, 210),
        _ => return false,
    }
    true
}

/// Set the X, Y or Z of `point` from a `base`/`base + 10`/`base + 20` code
fn read_coordinate(point: &mut Vector3, pair: &DxfCodePair, base: i32) -> bool {
    let Some(value) = pair.as_double() else {
        return pair.code == base || pair.code == base + 10 || pair.code == base + 20;
    };
    match pair.code - base {
        0 => point.x = value,
        10 => point.y = value,
        20 => point.z = value,
        _ => return false,
    }
    true
}

/// Like [`read_coordinate`] for a point that exists only once its X code
/// has been seen
fn read_optional_coordinate(point: &mut Option<Vector3>, pair: &DxfCodePair, base: i32) {
    if pair.code == base {
        let mut p = Vector3::ZERO;
        read_coordinate(&mut p, pair, base);
        *point = Some(p);
    } else if let Some(p) = point.as_mut() {
        read_coordinate(p, pair, base);
    }
}

pub(crate) fn read_point(run: &[DxfCodePair]) -> Point {
    let mut point = Point::new();
    for pair in run {
        match pair.code {
            10 | 20 | 30 => {
                read_coordinate(&mut point.location, pair, 10);
            }
            39 => {
                if let Some(v) = pair.as_double() {
                    point.thickness = v;
                }
            }
            50 => {
                if let Some(v) = pair.as_double() {
                    point.angle = v;
                }
            }
            _ => {
                read_common(&mut point.common, pair);
            }
        }
    }
    point
}

pub(crate) fn read_line(run: &[DxfCodePair]) -> Line {
    let mut line = Line::new();
    for pair in run {
        match pair.code {
            10 | 20 | 30 => {
                read_coordinate(&mut line.start, pair, 10);
            }
            11 | 21 | 31 => {
                read_coordinate(&mut line.end, pair, 11);
            }
            39 => {
                if let Some(v) = pair.as_double() {
                    line.thickness = v;
                }
            }
            _ => {
                read_common(&mut line.common, pair);
            }
        }
    }
    line
}

pub(crate) fn read_circle(run: &[DxfCodePair]) -> Circle {
    let mut circle = Circle::new();
    for pair in run {
        match pair.code {
            10 | 20 | 30 => {
                read_coordinate(&mut circle.center, pair, 10);
            }
            40 => {
                if let Some(v) = pair.as_double() {
                    circle.radius = v;
                }
            }
            39 => {
                if let Some(v) = pair.as_double() {
                    circle.thickness = v;
                }
            }
            _ => {
                read_common(&mut circle.common, pair);
            }
        }
    }
    circle
}

pub(crate) fn read_arc(run: &[DxfCodePair]) -> Arc {
    let mut arc = Arc::new();
    for pair in run {
        match pair.code {
            10 | 20 | 30 => {
                read_coordinate(&mut arc.center, pair, 10);
            }
            40 => {
                if let Some(v) = pair.as_double() {
                    arc.radius = v;
                }
            }
            39 => {
                if let Some(v) = pair.as_double() {
                    arc.thickness = v;
                }
            }
            50 => {
                if let Some(v) = pair.as_double() {
                    arc.start_angle = v;
                }
            }
            51 => {
                if let Some(v) = pair.as_double() {
                    arc.end_angle = v;
                }
            }
            _ => {
                read_common(&mut arc.common, pair);
            }
        }
    }
    arc
}

pub(crate) fn read_ellipse(run: &[DxfCodePair]) -> Ellipse {
    let mut ellipse = Ellipse::new();
    for pair in run {
        match pair.code {
            10 | 20 | 30 => {
                read_coordinate(&mut ellipse.center, pair, 10);
            }
            11 | 21 | 31 => {
                read_coordinate(&mut ellipse.major_axis, pair, 11);
            }
            40 => {
                if let Some(v) = pair.as_double() {
                    ellipse.minor_axis_ratio = v;
                }
            }
            41 => {
                if let Some(v) = pair.as_double() {
                    ellipse.start_parameter = v;
                }
            }
            42 => {
                if let Some(v) = pair.as_double() {
                    ellipse.end_parameter = v;
                }
            }
            _ => {
                read_common(&mut ellipse.common, pair);
            }
        }
    }
    ellipse
}

pub(crate) fn read_lwpolyline(run: &[DxfCodePair]) -> LwPolyline {
    let mut pline = LwPolyline::new();
    for pair in run {
        match pair.code {
            // Every X starts a vertex; the other per-vertex codes patch the
            // latest one and are dropped before the first X
            10 => {
                let x = pair.as_double().unwrap_or(0.0);
                pline.vertices.push(LwVertex::new(Vector2::new(x, 0.0)));
            }
            20 | 40 | 41 | 42 => {
                let (Some(vertex), Some(v)) = (pline.vertices.last_mut(), pair.as_double()) else {
                    continue;
                };
                match pair.code {
                    20 => vertex.location.y = v,
                    40 => vertex.start_width = v,
                    41 => vertex.end_width = v,
                    _ => vertex.bulge = v,
                }
            }
            70 => {
                if let Some(flags) = pair.as_i16() {
                    pline.flags = LwPolylineFlags::from_bits_retain(flags);
                }
            }
            43 => {
                if let Some(v) = pair.as_double() {
                    pline.constant_width = v;
                }
            }
            38 => {
                if let Some(v) = pair.as_double() {
                    pline.elevation = v;
                }
            }
            39 => {
                if let Some(v) = pair.as_double() {
                    pline.thickness = v;
                }
            }
            _ => {
                read_common(&mut pline.common, pair);
            }
        }
    }
    pline
}

pub(crate) fn read_polyline(run: &[DxfCodePair]) -> Polyline {
    let mut pline = Polyline::new();
    for pair in run {
        match pair.code {
            10 | 20 | 30 => {
                read_coordinate(&mut pline.elevation, pair, 10);
            }
            70 => {
                if let Some(flags) = pair.as_i16() {
                    pline.flags = PolylineFlags::from_bits_retain(flags);
                }
            }
            40 => {
                if let Some(v) = pair.as_double() {
                    pline.start_width = v;
                }
            }
            41 => {
                if let Some(v) = pair.as_double() {
                    pline.end_width = v;
                }
            }
            _ => {
                read_common(&mut pline.common, pair);
            }
        }
    }
    pline
}

/// Parse a VERTEX record that follows a POLYLINE
pub fn read_vertex(run: &[DxfCodePair]) -> Vertex {
    let mut vertex = Vertex::new(Vector3::ZERO);
    for pair in run {
        match pair.code {
            10 | 20 | 30 => {
                read_coordinate(&mut vertex.location, pair, 10);
            }
            40 => {
                if let Some(v) = pair.as_double() {
                    vertex.start_width = v;
                }
            }
            41 => {
                if let Some(v) = pair.as_double() {
                    vertex.end_width = v;
                }
            }
            42 => {
                if let Some(v) = pair.as_double() {
                    vertex.bulge = v;
                }
            }
            70 => {
                if let Some(flags) = pair.as_i16() {
                    vertex.flags = VertexFlags::from_bits_retain(flags);
                }
            }
            _ => {}
        }
    }
    vertex
}

pub(crate) fn read_spline(run: &[DxfCodePair]) -> Spline {
    let mut spline = Spline::new();
    for pair in run {
        match pair.code {
            70 => {
                if let Some(flags) = pair.as_i16() {
                    spline.flags = SplineFlags::from_bits_retain(flags);
                }
            }
            71 => {
                if let Some(v) = pair.as_i32() {
                    spline.degree = v;
                }
            }
            72 => spline.declared_knot_count = pair.as_i32().unwrap_or(0),
            73 => spline.declared_control_point_count = pair.as_i32().unwrap_or(0),
            74 => spline.declared_fit_point_count = pair.as_i32().unwrap_or(0),
            40 => {
                if let Some(v) = pair.as_double() {
                    spline.knots.push(v);
                }
            }
            41 => {
                if let Some(v) = pair.as_double() {
                    spline.weights.push(v);
                }
            }
            10 => {
                let x = pair.as_double().unwrap_or(0.0);
                spline.control_points.push(Vector3::new(x, 0.0, 0.0));
            }
            20 | 30 => {
                if let Some(p) = spline.control_points.last_mut() {
                    read_coordinate(p, pair, 10);
                }
            }
            11 => {
                let x = pair.as_double().unwrap_or(0.0);
                spline.fit_points.push(Vector3::new(x, 0.0, 0.0));
            }
            21 | 31 => {
                if let Some(p) = spline.fit_points.last_mut() {
                    read_coordinate(p, pair, 11);
                }
            }
            12 | 22 | 32 => read_optional_coordinate(&mut spline.start_tangent, pair, 12),
            13 | 23 | 33 => read_optional_coordinate(&mut spline.end_tangent, pair, 13),
            42 => {
                if let Some(v) = pair.as_double() {
                    spline.knot_tolerance = v;
                }
            }
            43 => {
                if let Some(v) = pair.as_double() {
                    spline.control_point_tolerance = v;
                }
            }
            44 => {
                if let Some(v) = pair.as_double() {
                    spline.fit_tolerance = v;
                }
            }
            _ => {
                read_common(&mut spline.common, pair);
            }
        }
    }
    spline
}

pub(crate) fn read_text(run: &[DxfCodePair]) -> Text {
    let mut text = Text::new();
    for pair in run {
        match pair.code {
            10 | 20 | 30 => {
                read_coordinate(&mut text.insertion_point, pair, 10);
            }
            11 | 21 | 31 => read_optional_coordinate(&mut text.alignment_point, pair, 11),
            1 => text.value = pair.value.clone(),
            7 => text.style = pair.value.clone(),
            40 => {
                if let Some(v) = pair.as_double() {
                    text.height = v;
                }
            }
            41 => {
                if let Some(v) = pair.as_double() {
                    text.width_factor = v;
                }
            }
            50 => {
                if let Some(v) = pair.as_double() {
                    text.rotation = v;
                }
            }
            51 => {
                if let Some(v) = pair.as_double() {
                    text.oblique_angle = v;
                }
            }
            71 => text.generation_flags = pair.as_i16().unwrap_or(0),
            72 => {
                if let Some(v) = pair.as_i16() {
                    text.horizontal_alignment = TextHorizontalAlignment::from_value(v);
                }
            }
            73 => {
                if let Some(v) = pair.as_i16() {
                    text.vertical_alignment = TextVerticalAlignment::from_value(v);
                }
            }
            _ => {
                read_common(&mut text.common, pair);
            }
        }
    }
    text
}

pub(crate) fn read_mtext(run: &[DxfCodePair]) -> MText {
    let mut mtext = MText::new();
    for pair in run {
        match pair.code {
            10 | 20 | 30 => {
                read_coordinate(&mut mtext.insertion_point, pair, 10);
            }
            11 | 21 | 31 => read_optional_coordinate(&mut mtext.x_axis_direction, pair, 11),
            // Long values are split into 250-character 3 chunks ahead of the final 1
            1 | 3 => mtext.value.push_str(&pair.value),
            7 => mtext.style = pair.value.clone(),
            40 => {
                if let Some(v) = pair.as_double() {
                    mtext.height = v;
                }
            }
            41 => {
                if let Some(v) = pair.as_double() {
                    mtext.rectangle_width = v;
                }
            }
            44 => {
                if let Some(v) = pair.as_double() {
                    mtext.line_spacing_factor = v;
                }
            }
            50 => {
                if let Some(v) = pair.as_double() {
                    mtext.rotation = v;
                }
            }
            71 => {
                if let Some(v) = pair.as_i16() {
                    mtext.attachment_point = AttachmentPoint::from_value(v);
                }
            }
            72 => {
                if let Some(v) = pair.as_i16() {
                    mtext.drawing_direction = DrawingDirection::from_value(v);
                }
            }
            90 => mtext.background.flags = pair.as_i32().unwrap_or(0),
            63 => mtext.background.color = pair.as_i16().map(Color::from_index),
            421 => mtext.background.true_color = pair.as_i32().map(|v| v as u32 & 0x00FF_FFFF),
            45 => mtext.background.scale = pair.as_double(),
            441 => mtext.background.transparency = pair.as_i32(),
            _ => {
                read_common(&mut mtext.common, pair);
            }
        }
    }
    mtext
}

pub(crate) fn read_insert(run: &[DxfCodePair]) -> Insert {
    let mut insert = Insert::new("", Vector3::ZERO);
    for pair in run {
        match pair.code {
            2 => insert.block_name = pair.value.clone(),
            10 | 20 | 30 => {
                read_coordinate(&mut insert.insert_point, pair, 10);
            }
            41 => {
                if let Some(v) = pair.as_double() {
                    insert.x_scale = v;
                }
            }
            42 => {
                if let Some(v) = pair.as_double() {
                    insert.y_scale = v;
                }
            }
            43 => {
                if let Some(v) = pair.as_double() {
                    insert.z_scale = v;
                }
            }
            50 => {
                if let Some(v) = pair.as_double() {
                    insert.rotation = v;
                }
            }
            70 => {
                if let Some(v) = pair.as_i16() {
                    insert.column_count = v;
                }
            }
            71 => {
                if let Some(v) = pair.as_i16() {
                    insert.row_count = v;
                }
            }
            44 => {
                if let Some(v) = pair.as_double() {
                    insert.column_spacing = v;
                }
            }
            45 => {
                if let Some(v) = pair.as_double() {
                    insert.row_spacing = v;
                }
            }
            66 => insert.has_attributes = pair.as_bool().unwrap_or(false),
            _ => {
                read_common(&mut insert.common, pair);
            }
        }
    }
    insert
}

/// Parse an ATTRIB record that follows an INSERT
pub fn read_attribute(run: &[DxfCodePair]) -> Attribute {
    let mut attribute = Attribute::new();
    for pair in run {
        match pair.code {
            // An embedded MTEXT object reuses the codes below
            101 => break,
            2 => attribute.tag = pair.value.clone(),
            1 => attribute.value = pair.value.clone(),
            7 => attribute.style = pair.value.clone(),
            10 | 20 | 30 => {
                read_coordinate(&mut attribute.insertion_point, pair, 10);
            }
            40 => {
                if let Some(v) = pair.as_double() {
                    attribute.height = v;
                }
            }
            50 => {
                if let Some(v) = pair.as_double() {
                    attribute.rotation = v;
                }
            }
            70 => attribute.flags = pair.as_i16().unwrap_or(0),
            _ => {
                read_common(&mut attribute.common, pair);
            }
        }
    }
    attribute
}

pub(crate) fn read_dimension(run: &[DxfCodePair]) -> Dimension {
    let mut dim = Dimension::new();
    for pair in run {
        match pair.code {
            2 => dim.block_name = pair.value.clone(),
            3 => dim.style = pair.value.clone(),
            1 => dim.text = pair.value.clone(),
            70 => dim.flags = pair.as_i16().unwrap_or(0),
            71 => dim.attachment_point = pair.as_i16().unwrap_or(0),
            42 => dim.measurement = pair.as_double(),
            53 => {
                if let Some(v) = pair.as_double() {
                    dim.text_rotation = v;
                }
            }
            10 | 20 | 30 => {
                read_coordinate(&mut dim.definition_point, pair, 10);
            }
            11 | 21 | 31 => {
                read_coordinate(&mut dim.text_midpoint, pair, 11);
            }
            12 | 22 | 32 => read_optional_coordinate(&mut dim.insertion_point, pair, 12),
            13 | 23 | 33 => read_optional_coordinate(&mut dim.first_point, pair, 13),
            14 | 24 | 34 => read_optional_coordinate(&mut dim.second_point, pair, 14),
            15 | 25 | 35 => read_optional_coordinate(&mut dim.arc_point, pair, 15),
            16 | 26 | 36 => read_optional_coordinate(&mut dim.arc_location, pair, 16),
            _ => {
                read_common(&mut dim.common, pair);
            }
        }
    }
    dim
}

pub(crate) fn read_hatch(run: &[DxfCodePair]) -> Hatch {
    let mut hatch = Hatch::new();
    let mut reader = PairReader::new(run);

    while let Some(pair) = reader.read_pair() {
        match pair.code {
            2 => hatch.pattern_name = pair.value.clone(),
            70 => hatch.is_solid = pair.as_i16() == Some(1),
            71 => hatch.is_associative = pair.as_i16() == Some(1),
            10 | 20 | 30 => {
                read_coordinate(&mut hatch.elevation, pair, 10);
            }
            91 => {
                let count = pair.as_i32().unwrap_or(0).max(0);
                for _ in 0..count {
                    if !reader.peek().is_some_and(|p| p.code == 92) {
                        break;
                    }
                    hatch.paths.push(read_boundary_path(&mut reader));
                }
            }
            75 => {
                if let Some(v) = pair.as_i16() {
                    hatch.style = HatchStyleType::from_value(v);
                }
            }
            76 => {
                if let Some(v) = pair.as_i16() {
                    hatch.pattern_type = HatchPatternType::from_value(v);
                }
            }
            52 => {
                if let Some(v) = pair.as_double() {
                    hatch.pattern_angle = v;
                }
            }
            41 => {
                if let Some(v) = pair.as_double() {
                    hatch.pattern_scale = v;
                }
            }
            98 => {
                let count = pair.as_i32().unwrap_or(0).max(0) as usize;
                read_seed_points(&mut reader, count, &mut hatch.seed_points);
            }
            _ => {
                read_common(&mut hatch.common, pair);
            }
        }
    }
    hatch
}

fn read_seed_points(reader: &mut PairReader<'_>, count: usize, seeds: &mut Vec<Vector2>) {
    while let Some(pair) = reader.peek() {
        match pair.code {
            10 if seeds.len() < count => {
                seeds.push(Vector2::new(pair.as_double().unwrap_or(0.0), 0.0));
            }
            20 => {
                if let (Some(seed), Some(y)) = (seeds.last_mut(), pair.as_double()) {
                    seed.y = y;
                }
            }
            _ => break,
        }
        reader.read_pair();
    }
}

/// Read one boundary path starting at its 92 flags pair
fn read_boundary_path(reader: &mut PairReader<'_>) -> BoundaryPath {
    let mut path = BoundaryPath::default();
    if let Some(pair) = reader.read_pair() {
        path.flags = BoundaryPathFlags::from_bits_retain(pair.as_i32().unwrap_or(0));
    }

    if path.flags.contains(BoundaryPathFlags::POLYLINE) {
        path.polyline = Some(read_polyline_path(reader));
    } else {
        let mut edge_count = 0;
        if reader.peek().is_some_and(|p| p.code == 93) {
            edge_count = reader.read_pair().and_then(DxfCodePair::as_i32).unwrap_or(0);
        }
        for _ in 0..edge_count.max(0) {
            let Some(edge_type) = reader
                .peek()
                .filter(|p| p.code == 72)
                .and_then(DxfCodePair::as_i16)
            else {
                break;
            };
            reader.read_pair();
            if let Some(edge) = read_edge(reader, edge_type) {
                path.edges.push(edge);
            }
        }
    }

    // Source object references close the path
    if reader.peek().is_some_and(|p| p.code == 97) {
        let count = reader.read_pair().and_then(DxfCodePair::as_i32).unwrap_or(0);
        for _ in 0..count.max(0) {
            if !reader.peek().is_some_and(|p| p.code == 330) {
                break;
            }
            reader.read_pair();
        }
    }
    path
}

fn read_polyline_path(reader: &mut PairReader<'_>) -> PolylinePath {
    let mut pline = PolylinePath::default();
    let mut count = 0usize;
    while let Some(pair) = reader.peek() {
        match pair.code {
            72 => pline.has_bulge = pair.as_bool().unwrap_or(false),
            73 => pline.is_closed = pair.as_bool().unwrap_or(false),
            93 => count = pair.as_i32().unwrap_or(0).max(0) as usize,
            _ => break,
        }
        reader.read_pair();
    }
    // Vertices are stored as (x, y, bulge)
    while let Some(pair) = reader.peek() {
        match pair.code {
            10 if pline.vertices.len() < count => {
                let x = pair.as_double().unwrap_or(0.0);
                pline.vertices.push(Vector3::new(x, 0.0, 0.0));
            }
            20 | 42 => {
                if let (Some(vertex), Some(v)) = (pline.vertices.last_mut(), pair.as_double()) {
                    if pair.code == 20 {
                        vertex.y = v;
                    } else {
                        vertex.z = v;
                    }
                }
            }
            _ => break,
        }
        reader.read_pair();
    }
    pline
}

fn read_edge(reader: &mut PairReader<'_>, edge_type: i16) -> Option<EdgeType> {
    match edge_type {
        1 => {
            let mut start = Vector3::ZERO;
            let mut end = Vector3::ZERO;
            while let Some(pair) = reader.peek() {
                match pair.code {
                    10 | 20 => read_coordinate(&mut start, pair, 10),
                    11 | 21 => read_coordinate(&mut end, pair, 11),
                    _ => break,
                };
                reader.read_pair();
            }
            Some(EdgeType::Line(LineEdge {
                start: start.xy(),
                end: end.xy(),
            }))
        }
        2 => {
            let mut center = Vector3::ZERO;
            let mut edge = CircularArcEdge {
                center: Vector2::ZERO,
                radius: 0.0,
                start_angle: 0.0,
                end_angle: 360.0,
                counter_clockwise: true,
            };
            while let Some(pair) = reader.peek() {
                match pair.code {
                    10 | 20 => {
                        read_coordinate(&mut center, pair, 10);
                    }
                    40 => edge.radius = pair.as_double().unwrap_or(edge.radius),
                    50 => edge.start_angle = pair.as_double().unwrap_or(edge.start_angle),
                    51 => edge.end_angle = pair.as_double().unwrap_or(edge.end_angle),
                    73 => edge.counter_clockwise = pair.as_bool().unwrap_or(true),
                    _ => break,
                }
                reader.read_pair();
            }
            edge.center = center.xy();
            Some(EdgeType::CircularArc(edge))
        }
        3 => {
            let mut center = Vector3::ZERO;
            let mut major = Vector3::UNIT_X;
            let mut edge = EllipticArcEdge {
                center: Vector2::ZERO,
                major_axis_endpoint: Vector2::new(1.0, 0.0),
                minor_axis_ratio: 1.0,
                start_angle: 0.0,
                end_angle: 360.0,
                counter_clockwise: true,
            };
            while let Some(pair) = reader.peek() {
                match pair.code {
                    10 | 20 => {
                        read_coordinate(&mut center, pair, 10);
                    }
                    11 | 21 => {
                        read_coordinate(&mut major, pair, 11);
                    }
                    40 => edge.minor_axis_ratio = pair.as_double().unwrap_or(1.0),
                    50 => edge.start_angle = pair.as_double().unwrap_or(edge.start_angle),
                    51 => edge.end_angle = pair.as_double().unwrap_or(edge.end_angle),
                    73 => edge.counter_clockwise = pair.as_bool().unwrap_or(true),
                    _ => break,
                }
                reader.read_pair();
            }
            edge.center = center.xy();
            edge.major_axis_endpoint = major.xy();
            Some(EdgeType::EllipticArc(edge))
        }
        4 => Some(EdgeType::Spline(read_spline_edge(reader))),
        other => {
            tracing::trace!(edge_type = other, "unknown hatch edge type");
            None
        }
    }
}

fn read_spline_edge(reader: &mut PairReader<'_>) -> SplineEdge {
    let mut edge = SplineEdge {
        degree: 3,
        ..SplineEdge::default()
    };
    let mut start_tangent: Option<Vector3> = None;
    let mut end_tangent: Option<Vector3> = None;

    while let Some(pair) = reader.peek() {
        match pair.code {
            94 => edge.degree = pair.as_i32().unwrap_or(3),
            73 => edge.rational = pair.as_bool().unwrap_or(false),
            74 => edge.periodic = pair.as_bool().unwrap_or(false),
            95 | 96 => {}
            40 => {
                if let Some(v) = pair.as_double() {
                    edge.knots.push(v);
                }
            }
            10 => {
                let x = pair.as_double().unwrap_or(0.0);
                edge.control_points.push(Vector2::new(x, 0.0));
            }
            20 => {
                if let (Some(p), Some(y)) = (edge.control_points.last_mut(), pair.as_double()) {
                    p.y = y;
                }
            }
            42 => {
                if let Some(v) = pair.as_double() {
                    edge.weights.push(v);
                }
            }
            11 => {
                let x = pair.as_double().unwrap_or(0.0);
                edge.fit_points.push(Vector2::new(x, 0.0));
            }
            21 => {
                if let (Some(p), Some(y)) = (edge.fit_points.last_mut(), pair.as_double()) {
                    p.y = y;
                }
            }
            12 | 22 => read_optional_coordinate(&mut start_tangent, pair, 12),
            13 | 23 => read_optional_coordinate(&mut end_tangent, pair, 13),
            97 => {
                // 97 is shared by the fit point count and the path's source
                // object count that follows the last edge
                if !is_fit_point_count(reader) {
                    break;
                }
            }
            _ => break,
        }
        reader.read_pair();
    }

    edge.start_tangent = start_tangent.map(|t| t.xy());
    edge.end_tangent = end_tangent.map(|t| t.xy());
    edge
}

/// Whether the 97 pair under the cursor is a spline edge fit point count
fn is_fit_point_count(reader: &PairReader<'_>) -> bool {
    let Some(count) = reader.peek().and_then(DxfCodePair::as_i32) else {
        return false;
    };
    let mut ahead = reader.clone();
    ahead.read_pair();
    let next = ahead.peek().map(|p| p.code);
    if count > 0 {
        next == Some(11)
    } else {
        matches!(next, Some(12) | Some(13) | Some(97))
    }
}
