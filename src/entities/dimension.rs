//! Dimension entity

use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Vector3};

/// Dimension kind, from the low bits of group code 70
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DimensionType {
    /// Rotated, horizontal or vertical
    #[default]
    Linear,
    /// Aligned
    Aligned,
    /// Angular from two lines
    Angular,
    /// Diameter
    Diameter,
    /// Radius
    Radius,
    /// Angular from three points
    Angular3Point,
    /// Ordinate
    Ordinate,
}

impl DimensionType {
    /// Decode the kind from the raw flag value
    pub fn from_flags(flags: i16) -> Self {
        match flags & 0x0F {
            1 => DimensionType::Aligned,
            2 => DimensionType::Angular,
            3 => DimensionType::Diameter,
            4 => DimensionType::Radius,
            5 => DimensionType::Angular3Point,
            6 => DimensionType::Ordinate,
            _ => DimensionType::Linear,
        }
    }
}

/// A dimension; its graphics live in the referenced anonymous block
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    /// Common entity data
    pub common: EntityCommon,
    /// Name of the block holding the dimension graphics
    pub block_name: String,
    /// Dimension style name
    pub style: String,
    /// Text override; empty means the measurement is shown
    pub text: String,
    /// Raw type flags
    pub flags: i16,
    /// Text attachment point
    pub attachment_point: i16,
    /// Measured value
    pub measurement: Option<f64>,
    /// Text rotation in degrees
    pub text_rotation: f64,
    /// Definition point (group 10)
    pub definition_point: Vector3,
    /// Text midpoint (group 11)
    pub text_midpoint: Vector3,
    /// Clone insertion point (group 12)
    pub insertion_point: Option<Vector3>,
    /// First extension line point (group 13)
    pub first_point: Option<Vector3>,
    /// Second extension line point (group 14)
    pub second_point: Option<Vector3>,
    /// Arc or leader point (group 15)
    pub arc_point: Option<Vector3>,
    /// Dimension arc location (group 16)
    pub arc_location: Option<Vector3>,
}

impl Dimension {
    /// Create a new dimension
    pub fn new() -> Self {
        Dimension {
            common: EntityCommon::new(),
            block_name: String::new(),
            style: "STANDARD".to_string(),
            text: String::new(),
            flags: 0,
            attachment_point: 0,
            measurement: None,
            text_rotation: 0.0,
            definition_point: Vector3::ZERO,
            text_midpoint: Vector3::ZERO,
            insertion_point: None,
            first_point: None,
            second_point: None,
            arc_point: None,
            arc_location: None,
        }
    }

    /// Dimension kind
    pub fn dimension_type(&self) -> DimensionType {
        DimensionType::from_flags(self.flags)
    }

    /// Every point the file defined, in group-code order
    pub fn defined_points(&self) -> Vec<Vector3> {
        let mut points = vec![self.definition_point, self.text_midpoint];
        points.extend(
            [
                self.insertion_point,
                self.first_point,
                self.second_point,
                self.arc_point,
                self.arc_location,
            ]
            .into_iter()
            .flatten(),
        );
        points
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Dimension {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        BoundingBox2D::from_points(self.defined_points().into_iter().map(|p| p.xy()))
    }

    fn entity_type(&self) -> &'static str {
        "DIMENSION"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_flags() {
        assert_eq!(DimensionType::from_flags(32), DimensionType::Linear);
        assert_eq!(DimensionType::from_flags(33), DimensionType::Aligned);
        assert_eq!(DimensionType::from_flags(160 | 4), DimensionType::Radius);
    }

    #[test]
    fn test_box_only_uses_present_points() {
        let mut dim = Dimension::new();
        dim.definition_point = Vector3::new(10.0, 0.0, 0.0);
        dim.text_midpoint = Vector3::new(5.0, 2.0, 0.0);
        assert_eq!(
            dim.bounding_box(),
            Some(BoundingBox2D::from_coords(5.0, 0.0, 10.0, 2.0))
        );
        dim.first_point = Some(Vector3::new(-1.0, -1.0, 0.0));
        assert_eq!(
            dim.bounding_box(),
            Some(BoundingBox2D::from_coords(-1.0, -1.0, 10.0, 2.0))
        );
    }
}
