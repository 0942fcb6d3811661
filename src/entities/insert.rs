//! Insert entity (block reference) and its attributes

use crate::entities::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Vector2, Vector3};

/// An ATTRIB record attached to an insert
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Common entity data
    pub common: EntityCommon,
    /// Attribute tag
    pub tag: String,
    /// Attribute value
    pub value: String,
    /// Text insertion point
    pub insertion_point: Vector3,
    /// Text height
    pub height: f64,
    /// Rotation angle in degrees
    pub rotation: f64,
    /// Text style name
    pub style: String,
    /// Attribute flags (1 invisible, 2 constant, 4 verify, 8 preset)
    pub flags: i16,
}

impl Attribute {
    /// Create an empty attribute
    pub fn new() -> Self {
        Attribute {
            common: EntityCommon::new(),
            tag: String::new(),
            value: String::new(),
            insertion_point: Vector3::ZERO,
            height: 1.0,
            rotation: 0.0,
            style: "STANDARD".to_string(),
            flags: 0,
        }
    }

    /// Whether the attribute is flagged invisible
    pub fn is_invisible(&self) -> bool {
        self.flags & 1 != 0
    }
}

impl Default for Attribute {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert entity - a reference to a block definition
///
/// An insert places an instance of a block at a specified location with
/// optional scaling and rotation. A column or row count above one makes it
/// a rectangular array (MINSERT).
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Common entity data
    pub common: EntityCommon,
    /// Referenced block name
    pub block_name: String,
    /// Insertion point, in OCS
    pub insert_point: Vector3,
    /// X scale factor
    pub x_scale: f64,
    /// Y scale factor
    pub y_scale: f64,
    /// Z scale factor
    pub z_scale: f64,
    /// Rotation angle in degrees
    pub rotation: f64,
    /// Column count
    pub column_count: i16,
    /// Row count
    pub row_count: i16,
    /// Column spacing
    pub column_spacing: f64,
    /// Row spacing
    pub row_spacing: f64,
    /// Attributes-follow flag (group code 66)
    pub has_attributes: bool,
    /// Attached attributes in file order
    pub attributes: Vec<Attribute>,
}

impl Insert {
    /// Create a new insert entity
    pub fn new(block_name: impl Into<String>, insert_point: Vector3) -> Self {
        Self {
            common: EntityCommon::default(),
            block_name: block_name.into(),
            insert_point,
            x_scale: 1.0,
            y_scale: 1.0,
            z_scale: 1.0,
            rotation: 0.0,
            column_count: 1,
            row_count: 1,
            column_spacing: 0.0,
            row_spacing: 0.0,
            has_attributes: false,
            attributes: Vec::new(),
        }
    }

    /// Builder: Set the scale factors
    pub fn with_scale(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x_scale = x;
        self.y_scale = y;
        self.z_scale = z;
        self
    }

    /// Builder: Set the rotation in degrees
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Builder: Make this a rectangular array
    pub fn with_array(mut self, columns: i16, rows: i16, column_spacing: f64, row_spacing: f64) -> Self {
        self.column_count = columns;
        self.row_count = rows;
        self.column_spacing = column_spacing;
        self.row_spacing = row_spacing;
        self
    }

    /// Whether the insert places more than one copy
    pub fn is_array(&self) -> bool {
        self.column_count > 1 || self.row_count > 1
    }

    /// Insertion point projected to world XY
    pub fn world_insert_point(&self) -> Vector2 {
        self.common.ocs().to_world(self.insert_point).xy()
    }
}

impl Default for Insert {
    fn default() -> Self {
        Self::new("", Vector3::ZERO)
    }
}

impl Entity for Insert {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    /// Zero-size box at the insertion point
    fn bounding_box(&self) -> Option<BoundingBox2D> {
        Some(BoundingBox2D::from_point(self.world_insert_point()))
    }

    fn entity_type(&self) -> &'static str {
        "INSERT"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_defaults() {
        let insert = Insert::default();
        assert_eq!((insert.x_scale, insert.y_scale, insert.z_scale), (1.0, 1.0, 1.0));
        assert_eq!((insert.column_count, insert.row_count), (1, 1));
        assert!(!insert.is_array());
        assert!(insert.attributes.is_empty());
    }

    #[test]
    fn test_builder() {
        let insert = Insert::new("DOOR", Vector3::new(1.0, 2.0, 0.0))
            .with_scale(2.0, 3.0, 1.0)
            .with_rotation(90.0)
            .with_array(2, 3, 10.0, 20.0);
        assert_eq!(insert.block_name, "DOOR");
        assert!(insert.is_array());
        assert_eq!(insert.rotation, 90.0);
        assert_eq!((insert.column_spacing, insert.row_spacing), (10.0, 20.0));
    }

    #[test]
    fn test_own_box_is_insertion_point() {
        let insert = Insert::new("A", Vector3::new(5.0, 6.0, 0.0));
        assert_eq!(
            insert.bounding_box(),
            Some(BoundingBox2D::from_coords(5.0, 6.0, 5.0, 6.0))
        );
    }

    #[test]
    fn test_attribute_invisible_flag() {
        let mut attribute = Attribute::new();
        assert!(!attribute.is_invisible());
        attribute.flags = 1;
        assert!(attribute.is_invisible());
    }
}
