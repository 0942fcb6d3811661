//! CAD entity types and traits

use crate::geometry::Ocs;
use crate::types::{BoundingBox2D, Color, Handle, LineWeight, Vector3};

pub mod arc;
pub mod block;
pub mod circle;
pub mod dimension;
pub mod ellipse;
pub mod hatch;
pub mod insert;
pub mod line;
pub mod lwpolyline;
pub mod mtext;
pub mod point;
pub mod polyline;
pub mod spline;
pub mod text;

pub use arc::Arc;
pub use block::{is_layout_block_name, Block, BlockFlags};
pub use circle::Circle;
pub use dimension::{Dimension, DimensionType};
pub use ellipse::Ellipse;
pub use hatch::{
    BoundaryPath, BoundaryPathFlags, CircularArcEdge, EdgeType, EllipticArcEdge, Hatch,
    HatchPatternType, HatchStyleType, LineEdge, PolylinePath, SplineEdge,
};
pub use insert::{Attribute, Insert};
pub use line::Line;
pub use lwpolyline::{LwPolyline, LwPolylineFlags, LwVertex};
pub use mtext::{AttachmentPoint, BackgroundFill, DrawingDirection, MText};
pub use point::Point;
pub use polyline::{Polyline, PolylineFlags, Vertex, VertexFlags};
pub use spline::{Spline, SplineFlags};
pub use text::{Text, TextHorizontalAlignment, TextVerticalAlignment};

/// Base trait for all CAD entities
pub trait Entity {
    /// Shared attributes
    fn common(&self) -> &EntityCommon;

    /// Mutable shared attributes
    fn common_mut(&mut self) -> &mut EntityCommon;

    /// Axis-aligned world-space box of the entity's own geometry
    ///
    /// Block references report a zero-size box at their insertion point;
    /// resolving the referenced block is the job of [`crate::extents`].
    fn bounding_box(&self) -> Option<BoundingBox2D>;

    /// Get the entity type name as written in the file
    fn entity_type(&self) -> &'static str;

    /// Get the entity's handle, if the file gave one
    fn handle(&self) -> Option<Handle> {
        self.common().handle
    }

    /// Get the entity's layer name
    fn layer(&self) -> &str {
        &self.common().layer
    }

    /// Get the entity's color index
    fn color(&self) -> Color {
        self.common().color
    }

    /// Get the entity's line weight
    fn line_weight(&self) -> LineWeight {
        self.common().line_weight
    }

    /// Check if the entity is invisible
    fn is_invisible(&self) -> bool {
        self.common().invisible
    }
}

/// Common entity data shared by all entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Handle (group code 5)
    pub handle: Option<Handle>,
    /// Layer name
    pub layer: String,
    /// Color index
    pub color: Color,
    /// 24-bit true color, overrides `color` when present
    pub true_color: Option<u32>,
    /// Line type name
    pub line_type: String,
    /// Line type scale
    pub line_type_scale: f64,
    /// Line weight
    pub line_weight: LineWeight,
    /// Visibility flag
    pub invisible: bool,
    /// Extrusion direction; defines the OCS of planar entities
    pub extrusion: Vector3,
}

impl EntityCommon {
    /// Create new common entity data with defaults
    pub fn new() -> Self {
        EntityCommon {
            handle: None,
            layer: "0".to_string(),
            color: Color::ByLayer,
            true_color: None,
            line_type: "BYLAYER".to_string(),
            line_type_scale: 1.0,
            line_weight: LineWeight::ByLayer,
            invisible: false,
            extrusion: Vector3::UNIT_Z,
        }
    }

    /// Create with a specific layer
    pub fn with_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }

    /// Object coordinate system of the entity
    pub fn ocs(&self) -> Ocs {
        Ocs::from_extrusion(self.extrusion)
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// The entity kinds a drawing is read into
#[derive(Debug, Clone, PartialEq)]
pub enum EntityType {
    /// Point entity
    Point(Point),
    /// Line entity
    Line(Line),
    /// Circle entity
    Circle(Circle),
    /// Arc entity
    Arc(Arc),
    /// Ellipse entity
    Ellipse(Ellipse),
    /// Lightweight polyline entity
    LwPolyline(LwPolyline),
    /// Heavy polyline entity with its vertices
    Polyline(Polyline),
    /// Spline entity
    Spline(Spline),
    /// Text entity
    Text(Text),
    /// Multi-line text entity
    MText(MText),
    /// Insert entity (block reference)
    Insert(Insert),
    /// Dimension entity
    Dimension(Dimension),
    /// Hatch entity
    Hatch(Hatch),
}

impl EntityType {
    /// Get a reference to the entity trait object
    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            EntityType::Point(e) => e,
            EntityType::Line(e) => e,
            EntityType::Circle(e) => e,
            EntityType::Arc(e) => e,
            EntityType::Ellipse(e) => e,
            EntityType::LwPolyline(e) => e,
            EntityType::Polyline(e) => e,
            EntityType::Spline(e) => e,
            EntityType::Text(e) => e,
            EntityType::MText(e) => e,
            EntityType::Insert(e) => e,
            EntityType::Dimension(e) => e,
            EntityType::Hatch(e) => e,
        }
    }

    /// Get a mutable reference to the entity trait object
    pub fn as_entity_mut(&mut self) -> &mut dyn Entity {
        match self {
            EntityType::Point(e) => e,
            EntityType::Line(e) => e,
            EntityType::Circle(e) => e,
            EntityType::Arc(e) => e,
            EntityType::Ellipse(e) => e,
            EntityType::LwPolyline(e) => e,
            EntityType::Polyline(e) => e,
            EntityType::Spline(e) => e,
            EntityType::Text(e) => e,
            EntityType::MText(e) => e,
            EntityType::Insert(e) => e,
            EntityType::Dimension(e) => e,
            EntityType::Hatch(e) => e,
        }
    }

    /// Shared attributes of the wrapped entity
    pub fn common(&self) -> &EntityCommon {
        self.as_entity().common()
    }

    /// Entity type name as written in the file
    pub fn entity_type(&self) -> &'static str {
        self.as_entity().entity_type()
    }

    /// Box of the entity's own geometry, see [`Entity::bounding_box`]
    pub fn bounding_box(&self) -> Option<BoundingBox2D> {
        self.as_entity().bounding_box()
    }
}
