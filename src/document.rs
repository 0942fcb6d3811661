//! CAD document structure

use crate::entities::{Block, EntityType};
use crate::notification::NotificationCollection;
use crate::tables::{Layer, LineType, Table, TextStyle};
use crate::types::{aci_to_rgb, Color, DxfVersion, Handle, LineWeight, Vector3};
use indexmap::IndexMap;

/// Value of a header variable that has no typed field
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    /// String value (group codes 1-9 and the like)
    Text(String),
    /// Integer value (group codes 60-99, 170-179, 270-289, 370-389)
    Integer(i64),
    /// Real value (group codes 40-59, 140-149)
    Real(f64),
    /// Point value (group codes 10-18 with their Y and Z companions)
    Point(Vector3),
}

/// Drawing settings from the HEADER section
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderVariables {
    /// $ACADVER as written
    pub version_string: String,
    /// $ACADVER parsed
    pub version: DxfVersion,
    /// $DWGCODEPAGE, e.g. `ANSI_1252`
    pub code_page: String,
    /// $EXTMIN
    pub extents_min: Option<Vector3>,
    /// $EXTMAX
    pub extents_max: Option<Vector3>,
    /// $INSUNITS - Insertion units (0=Unitless, 1=Inches, 4=Millimeters, ...)
    pub insertion_units: i16,
    /// $MEASUREMENT - 0 imperial, 1 metric
    pub measurement: i16,
    /// $LTSCALE - Global linetype scale
    pub linetype_scale: f64,
    /// $HANDSEED - Next available handle
    pub handle_seed: Option<Handle>,
    /// Every other variable, keyed by name including the `$`, in file order
    pub variables: IndexMap<String, HeaderValue>,
}

impl HeaderVariables {
    /// Create header variables with defaults
    pub fn new() -> Self {
        HeaderVariables {
            version_string: String::new(),
            version: DxfVersion::Unknown,
            code_page: String::new(),
            extents_min: None,
            extents_max: None,
            insertion_units: 0,
            measurement: 0,
            linetype_scale: 1.0,
            handle_seed: None,
            variables: IndexMap::new(),
        }
    }

    /// Look up a variable without a typed field
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.variables.get(name)
    }
}

impl Default for HeaderVariables {
    fn default() -> Self {
        Self::new()
    }
}

/// A drawing read from a DXF file
///
/// Top-level entities are kept in file order; an entity's index in
/// [`CadDocument::entities`] is its identity for queries.
#[derive(Debug, Clone, PartialEq)]
pub struct CadDocument {
    /// Header variables
    pub header: HeaderVariables,
    /// Layer table
    pub layers: Table<Layer>,
    /// Line type table
    pub line_types: Table<LineType>,
    /// Text style table
    pub text_styles: Table<TextStyle>,
    /// Block definitions keyed by upper-case name
    pub blocks: IndexMap<String, Block>,
    /// Top-level entities in file order
    pub entities: Vec<EntityType>,
    /// Diagnostics collected while reading
    pub notifications: NotificationCollection,
}

impl CadDocument {
    /// Create an empty document
    ///
    /// The default layer `"0"` is added when reading completes, see
    /// [`CadDocument::finalize_layers`].
    pub fn new() -> Self {
        CadDocument {
            header: HeaderVariables::new(),
            layers: Table::new(),
            line_types: Table::new(),
            text_styles: Table::new(),
            blocks: IndexMap::new(),
            entities: Vec::new(),
            notifications: NotificationCollection::new(),
        }
    }

    /// Get a block by name (case-insensitive)
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(&name.to_uppercase())
    }

    /// Add a block, replacing any block with the same name
    pub fn add_block(&mut self, block: Block) -> Option<Block> {
        self.blocks.insert(block.name.to_uppercase(), block)
    }

    /// Iterate over top-level entities
    pub fn entities(&self) -> impl Iterator<Item = &EntityType> {
        self.entities.iter()
    }

    /// Number of top-level entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Guarantee the default layer and compute derived layer state
    ///
    /// An existing layer `"0"` is never overwritten. Running this more than
    /// once gives the same result.
    pub fn finalize_layers(&mut self) {
        if !self.layers.contains("0") {
            self.layers.insert(Layer::layer_0());
        }
        for layer in self.layers.iter_mut() {
            layer.apply_derived_state();
        }
    }

    /// Whether entities on `layer` are displayed
    ///
    /// Unknown layers count as visible.
    pub fn is_layer_visible(&self, layer: &str) -> bool {
        self.layers.get(layer).map_or(true, Layer::is_visible)
    }

    /// Resolve the display color of an entity as `0xRRGGBB`
    ///
    /// Precedence: true color, then an explicit ACI index, then the parent
    /// insert's color for BYBLOCK, then the layer color for BYLAYER, then
    /// `default_color`.
    pub fn resolve_entity_color(
        &self,
        entity: &EntityType,
        parent_color: Option<u32>,
        default_color: u32,
    ) -> u32 {
        let common = entity.common();
        if let Some(rgb) = common.true_color {
            return rgb;
        }
        match common.color {
            Color::Index(index) => aci_to_rgb(index),
            Color::ByBlock => parent_color.unwrap_or(default_color),
            Color::ByLayer => match self.layers.get(&common.layer) {
                Some(layer) => match (layer.true_color, layer.aci()) {
                    (Some(rgb), _) => rgb,
                    (None, Color::Index(index)) => aci_to_rgb(index),
                    _ => default_color,
                },
                None => default_color,
            },
        }
    }

    /// Resolve the drawn line weight of an entity
    ///
    /// BYLAYER follows the entity's layer, BYBLOCK the parent insert's weight.
    pub fn resolve_entity_line_weight(
        &self,
        entity: &EntityType,
        parent_weight: Option<LineWeight>,
    ) -> LineWeight {
        let common = entity.common();
        let layer_weight = self
            .layers
            .get(&common.layer)
            .map_or(LineWeight::Default, |layer| layer.line_weight);
        common.line_weight.resolve(layer_weight, parent_weight)
    }
}

impl Default for CadDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Line;

    fn line_on(layer: &str, color: Color) -> EntityType {
        let mut line = Line::new();
        line.common.layer = layer.to_string();
        line.common.color = color;
        EntityType::Line(line)
    }

    #[test]
    fn test_finalize_adds_default_layer() {
        let mut doc = CadDocument::new();
        doc.finalize_layers();
        let layer = doc.layers.get("0").unwrap();
        assert_eq!(layer.color, 7);
        assert_eq!(doc.layers.len(), 1);
    }

    #[test]
    fn test_finalize_keeps_existing_layer_0() {
        let mut doc = CadDocument::new();
        doc.layers.insert(Layer::with_color("0", 3));
        doc.finalize_layers();
        assert_eq!(doc.layers.get("0").unwrap().color, 3);
    }

    #[test]
    fn test_block_lookup_ignores_case() {
        let mut doc = CadDocument::new();
        doc.add_block(Block::new("Door", Vector3::ZERO));
        assert!(doc.block("DOOR").is_some());
        assert!(doc.block("door").is_some());
    }

    #[test]
    fn test_color_precedence() {
        let mut doc = CadDocument::new();
        doc.layers.insert(Layer::with_color("RED", 1));
        doc.finalize_layers();

        let mut true_colored = line_on("RED", Color::Index(3));
        if let EntityType::Line(line) = &mut true_colored {
            line.common.true_color = Some(0x123456);
        }
        assert_eq!(doc.resolve_entity_color(&true_colored, None, 0), 0x123456);
        assert_eq!(doc.resolve_entity_color(&line_on("RED", Color::Index(3)), None, 0), 0x00FF00);
        assert_eq!(doc.resolve_entity_color(&line_on("RED", Color::ByLayer), None, 0), 0xFF0000);
        assert_eq!(
            doc.resolve_entity_color(&line_on("RED", Color::ByBlock), Some(0xABCDEF), 0),
            0xABCDEF
        );
        assert_eq!(doc.resolve_entity_color(&line_on("RED", Color::ByBlock), None, 0x111111), 0x111111);
        assert_eq!(doc.resolve_entity_color(&line_on("MISSING", Color::ByLayer), None, 0x222222), 0x222222);
    }

    #[test]
    fn test_line_weight_inheritance() {
        let mut doc = CadDocument::new();
        let mut thick = Layer::new("THICK");
        thick.line_weight = LineWeight::Hundredths(70);
        doc.layers.insert(thick);

        let entity = line_on("THICK", Color::ByLayer);
        assert_eq!(doc.resolve_entity_line_weight(&entity, None), LineWeight::Hundredths(70));
        let orphan = line_on("NOWHERE", Color::ByLayer);
        assert_eq!(doc.resolve_entity_line_weight(&orphan, None), LineWeight::Default);
    }

    #[test]
    fn test_layer_visibility() {
        let mut doc = CadDocument::new();
        doc.layers.insert(Layer::with_color("OFF", -2));
        doc.finalize_layers();
        assert!(!doc.is_layer_visible("OFF"));
        assert!(doc.is_layer_visible("0"));
        assert!(doc.is_layer_visible("NOT_DEFINED"));
    }
}
