//! DXF section readers
//!
//! Each reader starts just past the `2/<NAME>` pair of its section and
//! returns the index just past the section's terminator.

use super::entity_reader::{read_attribute, read_entity, read_insert, read_polyline, read_vertex};
use super::tokenizer::{DxfCodePair, PairReader};
use crate::document::{CadDocument, HeaderValue, HeaderVariables};
use crate::entities::{is_layout_block_name, Block, BlockFlags, EntityType, Insert, Polyline};
use crate::error::{DxfError, Result};
use crate::notification::{NotificationCollection, NotificationType};
use crate::tables::{Layer, LayerFlags, LineType, LineTypeElement, TextStyle, TextStyleFlags};
use crate::types::{DxfVersion, LineWeight, Vector3};
use ahash::AHashSet;

/// Section reader for parsing DXF sections
pub struct SectionReader<'r, 'a> {
    reader: &'r mut PairReader<'a>,
    /// Unknown entity types already reported in this section
    reported: AHashSet<String>,
}

impl<'r, 'a> SectionReader<'r, 'a> {
    /// Create a new section reader
    pub fn new(reader: &'r mut PairReader<'a>) -> Self {
        Self {
            reader,
            reported: AHashSet::new(),
        }
    }

    /// Skip the current section
    pub fn skip_section(&mut self) -> usize {
        self.reader.skip_past("ENDSEC");
        self.reader.position()
    }

    /// Read the HEADER section
    pub fn read_header(&mut self, document: &mut CadDocument) -> Result<usize> {
        while let Some(pair) = self.reader.read_pair() {
            if pair.is_marker("ENDSEC") {
                break;
            }
            if pair.code != 9 {
                continue;
            }

            let name = pair.value.trim();
            let values = self.reader.read_while(|p| p.code != 9 && p.code != 0);
            if values.is_empty() {
                continue;
            }
            apply_header_variable(&mut document.header, name, values);
        }
        Ok(self.reader.position())
    }

    /// Read the TABLES section
    pub fn read_tables(&mut self, document: &mut CadDocument) -> Result<usize> {
        while let Some(pair) = self.reader.read_pair() {
            if pair.is_marker("ENDSEC") {
                break;
            }
            if !pair.is_marker("TABLE") {
                continue;
            }

            let header = self.reader.read_run();
            let Some(name) = header.iter().find(|p| p.code == 2) else {
                return Err(DxfError::section("TABLES", "TABLE without a table name"));
            };
            let name = name.value.trim().to_ascii_uppercase();
            tracing::trace!(table = %name, "reading table");

            match name.as_str() {
                "LAYER" => self.read_table_entries("LAYER", |run| {
                    let layer = read_layer_entry(run);
                    if !layer.name.is_empty() {
                        document.layers.insert(layer);
                    }
                }),
                "LTYPE" => self.read_table_entries("LTYPE", |run| {
                    let line_type = read_linetype_entry(run);
                    if !line_type.name.is_empty() {
                        document.line_types.insert(line_type);
                    }
                }),
                "STYLE" => self.read_table_entries("STYLE", |run| {
                    let style = read_textstyle_entry(run);
                    if !style.name.is_empty() {
                        document.text_styles.insert(style);
                    }
                }),
                _ => self.read_table_entries("", |_| {}),
            }
        }
        Ok(self.reader.position())
    }

    /// Feed each `entry_type` record up to ENDTAB to `apply`
    ///
    /// A missing ENDTAB stops at ENDSEC, which is left for the caller.
    fn read_table_entries(&mut self, entry_type: &str, mut apply: impl FnMut(&[DxfCodePair])) {
        while let Some(pair) = self.reader.read_pair() {
            if pair.is_marker("ENDTAB") {
                self.reader.read_run();
                break;
            }
            if pair.is_marker("ENDSEC") {
                self.reader.push_back();
                break;
            }
            if pair.code != 0 {
                continue;
            }
            let run = self.reader.read_run();
            if pair.is_marker(entry_type) {
                apply(run);
            }
        }
    }

    /// Read the BLOCKS section
    pub fn read_blocks(&mut self, document: &mut CadDocument) -> Result<usize> {
        while let Some(pair) = self.reader.read_pair() {
            if pair.is_marker("ENDSEC") {
                break;
            }
            if !pair.is_marker("BLOCK") {
                continue;
            }

            let mut block = read_block_header(self.reader.read_run());
            self.read_entity_list("ENDBLK", &mut block.entities, &mut document.notifications);
            // ENDBLK's own attributes
            self.reader.read_run();

            if block.name.is_empty() {
                return Err(DxfError::section("BLOCKS", "BLOCK without a name"));
            }
            if is_layout_block_name(&block.name) {
                tracing::trace!(block = %block.name, "discarding layout block");
                continue;
            }
            document.add_block(block);
        }
        Ok(self.reader.position())
    }

    /// Read the ENTITIES section
    pub fn read_entities(&mut self, document: &mut CadDocument) -> Result<usize> {
        self.read_entity_list("ENDSEC", &mut document.entities, &mut document.notifications);
        Ok(self.reader.position())
    }

    /// Read entity records until `terminator` (consumed) or the end of the
    /// enclosing section (left unread)
    fn read_entity_list(
        &mut self,
        terminator: &str,
        entities: &mut Vec<EntityType>,
        notifications: &mut NotificationCollection,
    ) {
        while let Some(pair) = self.reader.read_pair() {
            if pair.code != 0 {
                continue;
            }
            let type_name = pair.value.trim();
            if type_name == terminator {
                return;
            }
            if type_name == "ENDSEC" || type_name == "EOF" {
                self.reader.push_back();
                return;
            }

            let run = self.reader.read_run();
            match type_name {
                "POLYLINE" => {
                    let mut pline = read_polyline(run);
                    self.read_vertices(&mut pline);
                    entities.push(EntityType::Polyline(pline));
                }
                "INSERT" => {
                    let mut insert = read_insert(run);
                    if insert.has_attributes {
                        self.read_attributes(&mut insert);
                    }
                    entities.push(EntityType::Insert(insert));
                }
                "VERTEX" | "ATTRIB" | "SEQEND" => {
                    tracing::trace!(entity = type_name, "skipping orphan sub-entity");
                }
                _ => match read_entity(type_name, run) {
                    Some(entity) => entities.push(entity),
                    None => {
                        tracing::trace!(entity = type_name, "skipping unsupported entity");
                        if self.reported.insert(type_name.to_string()) {
                            notifications.notify(
                                NotificationType::NotImplemented,
                                format!("Entity type {type_name} is not supported"),
                            );
                        }
                    }
                },
            }
        }
    }

    /// Attach VERTEX records up to SEQEND
    fn read_vertices(&mut self, pline: &mut Polyline) {
        while let Some(pair) = self.reader.peek() {
            if pair.is_marker("VERTEX") {
                self.reader.read_pair();
                pline.vertices.push(read_vertex(self.reader.read_run()));
            } else {
                if pair.is_marker("SEQEND") {
                    self.reader.read_pair();
                    self.reader.read_run();
                }
                break;
            }
        }
    }

    /// Attach ATTRIB records up to SEQEND
    fn read_attributes(&mut self, insert: &mut Insert) {
        while let Some(pair) = self.reader.peek() {
            if pair.is_marker("ATTRIB") {
                self.reader.read_pair();
                insert.attributes.push(read_attribute(self.reader.read_run()));
            } else {
                if pair.is_marker("SEQEND") {
                    self.reader.read_pair();
                    self.reader.read_run();
                }
                break;
            }
        }
    }
}

fn apply_header_variable(header: &mut HeaderVariables, name: &str, values: &[DxfCodePair]) {
    let first = &values[0];
    match name {
        "$ACADVER" => {
            header.version_string = first.value.trim().to_string();
            header.version = DxfVersion::from_version_string(&header.version_string);
        }
        "$DWGCODEPAGE" => header.code_page = first.value.trim().to_string(),
        "$EXTMIN" => header.extents_min = header_point(values),
        "$EXTMAX" => header.extents_max = header_point(values),
        "$INSUNITS" => header.insertion_units = first.as_i16().unwrap_or(0),
        "$MEASUREMENT" => header.measurement = first.as_i16().unwrap_or(0),
        "$LTSCALE" => header.linetype_scale = first.as_double().unwrap_or(1.0),
        "$HANDSEED" => header.handle_seed = first.as_handle(),
        _ => {
            if let Some(value) = header_value(values) {
                header.variables.insert(name.to_string(), value);
            }
        }
    }
}

/// Point from a 10/20/30-style run; Z defaults to 0
fn header_point(values: &[DxfCodePair]) -> Option<Vector3> {
    let base = values[0].code;
    let coordinate = |offset: i32| {
        values
            .iter()
            .find(|p| p.code == base + offset)
            .and_then(DxfCodePair::as_double)
    };
    Some(Vector3::new(
        coordinate(0)?,
        coordinate(10)?,
        coordinate(20).unwrap_or(0.0),
    ))
}

/// Typed value of a header variable, chosen from its group code
fn header_value(values: &[DxfCodePair]) -> Option<HeaderValue> {
    let first = &values[0];
    match first.code {
        10..=18 => header_point(values).map(HeaderValue::Point),
        40..=59 | 140..=149 | 1010..=1059 => first.as_double().map(HeaderValue::Real),
        60..=99 | 170..=179 | 270..=299 | 370..=389 | 400..=409 | 1060..=1071 => {
            first.as_i64().map(HeaderValue::Integer)
        }
        _ => Some(HeaderValue::Text(first.value.clone())),
    }
}

fn read_block_header(run: &[DxfCodePair]) -> Block {
    let mut block = Block::new("", Vector3::ZERO);
    let mut fallback_name = String::new();
    for pair in run {
        match pair.code {
            2 => block.name = pair.value.trim().to_string(),
            3 => fallback_name = pair.value.trim().to_string(),
            5 => block.handle = pair.as_handle(),
            8 => block.layer = pair.value.clone(),
            10 => block.base_point.x = pair.as_double().unwrap_or(0.0),
            20 => block.base_point.y = pair.as_double().unwrap_or(0.0),
            30 => block.base_point.z = pair.as_double().unwrap_or(0.0),
            70 => {
                if let Some(flags) = pair.as_i16() {
                    block.flags = BlockFlags::from_bits_retain(flags);
                }
            }
            4 => block.description = pair.value.clone(),
            1 => block.xref_path = pair.value.clone(),
            _ => {}
        }
    }
    if block.name.is_empty() {
        block.name = fallback_name;
    }
    block
}

fn read_layer_entry(run: &[DxfCodePair]) -> Layer {
    let mut layer = Layer::new("");
    for pair in run {
        match pair.code {
            2 => layer.name = pair.value.trim().to_string(),
            5 => layer.handle = pair.as_handle(),
            6 => layer.line_type = pair.value.clone(),
            // Stored raw; the sign is folded into is_off when reading finishes
            62 => layer.color = pair.as_i16().unwrap_or(7),
            70 => {
                if let Some(flags) = pair.as_i16() {
                    layer.flags = LayerFlags::from_bits_retain(flags);
                }
            }
            290 => layer.is_plottable = pair.as_bool().unwrap_or(true),
            370 => {
                if let Some(lw) = pair.as_i16() {
                    layer.line_weight = LineWeight::from_raw(lw);
                }
            }
            420 => layer.true_color = pair.as_i32().map(|rgb| rgb as u32 & 0x00FF_FFFF),
            _ => {}
        }
    }
    layer
}

fn read_linetype_entry(run: &[DxfCodePair]) -> LineType {
    let mut line_type = LineType::new("");
    for pair in run {
        match pair.code {
            2 => line_type.name = pair.value.trim().to_string(),
            3 => line_type.description = pair.value.clone(),
            5 => line_type.handle = pair.as_handle(),
            73 => {
                if let Some(count) = pair.as_i16() {
                    line_type.elements.reserve(count.max(0) as usize);
                }
            }
            40 => {
                if let Some(length) = pair.as_double() {
                    line_type.pattern_length = length;
                }
            }
            49 => {
                if let Some(length) = pair.as_double() {
                    line_type.elements.push(LineTypeElement { length });
                }
            }
            _ => {}
        }
    }
    line_type
}

fn read_textstyle_entry(run: &[DxfCodePair]) -> TextStyle {
    let mut style = TextStyle::new("");
    for pair in run {
        match pair.code {
            2 => style.name = pair.value.trim().to_string(),
            3 => style.font_file = pair.value.clone(),
            4 => style.big_font_file = pair.value.clone(),
            5 => style.handle = pair.as_handle(),
            70 => {
                if let Some(flags) = pair.as_i16() {
                    style.flags = TextStyleFlags::from_bits_retain(flags);
                }
            }
            40 => {
                if let Some(height) = pair.as_double() {
                    style.height = height;
                }
            }
            41 => {
                if let Some(width) = pair.as_double() {
                    style.width_factor = width;
                }
            }
            50 => {
                if let Some(angle) = pair.as_double() {
                    style.oblique_angle = angle;
                }
            }
            _ => {}
        }
    }
    style
}
