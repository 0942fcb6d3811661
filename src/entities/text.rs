//! Text entity

use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Vector2, Vector3};

/// Average glyph advance as a fraction of the text height
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// Text horizontal alignment (group code 72)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextHorizontalAlignment {
    /// Left aligned
    #[default]
    Left,
    /// Center aligned
    Center,
    /// Right aligned
    Right,
    /// Aligned (fit between two points)
    Aligned,
    /// Middle (centered horizontally and vertically)
    Middle,
    /// Fit (fit between two points, adjust width)
    Fit,
}

impl TextHorizontalAlignment {
    /// Create from the raw code value; unknown values are left aligned
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => TextHorizontalAlignment::Center,
            2 => TextHorizontalAlignment::Right,
            3 => TextHorizontalAlignment::Aligned,
            4 => TextHorizontalAlignment::Middle,
            5 => TextHorizontalAlignment::Fit,
            _ => TextHorizontalAlignment::Left,
        }
    }
}

/// Text vertical alignment (group code 73)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVerticalAlignment {
    /// Baseline
    #[default]
    Baseline,
    /// Bottom
    Bottom,
    /// Middle
    Middle,
    /// Top
    Top,
}

impl TextVerticalAlignment {
    /// Create from the raw code value; unknown values sit on the baseline
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => TextVerticalAlignment::Bottom,
            2 => TextVerticalAlignment::Middle,
            3 => TextVerticalAlignment::Top,
            _ => TextVerticalAlignment::Baseline,
        }
    }
}

/// A single-line text entity
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Common entity data
    pub common: EntityCommon,
    /// Text content
    pub value: String,
    /// Insertion point (first alignment point), in OCS
    pub insertion_point: Vector3,
    /// Second alignment point, in OCS
    pub alignment_point: Option<Vector3>,
    /// Text height
    pub height: f64,
    /// Rotation angle in degrees
    pub rotation: f64,
    /// Width scale factor
    pub width_factor: f64,
    /// Oblique angle in degrees
    pub oblique_angle: f64,
    /// Text style name
    pub style: String,
    /// Text generation flags (2 = backward, 4 = upside down)
    pub generation_flags: i16,
    /// Horizontal alignment
    pub horizontal_alignment: TextHorizontalAlignment,
    /// Vertical alignment
    pub vertical_alignment: TextVerticalAlignment,
}

impl Text {
    /// Create a new text entity
    pub fn new() -> Self {
        Text {
            common: EntityCommon::new(),
            value: String::new(),
            insertion_point: Vector3::ZERO,
            alignment_point: None,
            height: 1.0,
            rotation: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            style: "STANDARD".to_string(),
            generation_flags: 0,
            horizontal_alignment: TextHorizontalAlignment::Left,
            vertical_alignment: TextVerticalAlignment::Baseline,
        }
    }

    /// Create a text entity with content at a location
    pub fn with_value(value: impl Into<String>, insertion_point: Vector3) -> Self {
        Text {
            value: value.into(),
            insertion_point,
            ..Self::new()
        }
    }

    /// Estimated advance width of the text
    pub fn estimated_width(&self) -> f64 {
        self.value.chars().count() as f64 * self.height * CHAR_WIDTH_FACTOR * self.width_factor
    }

    /// Corners of the estimated text rectangle in world XY
    ///
    /// Returns `None` for empty text.
    pub fn frame(&self) -> Option<[Vector2; 4]> {
        if self.value.is_empty() {
            return None;
        }
        let ocs = self.common.ocs();
        let mut width = self.estimated_width();
        let mut rotation = self.rotation.to_radians();
        let height = self.height;

        let aligned = matches!(
            self.horizontal_alignment,
            TextHorizontalAlignment::Aligned | TextHorizontalAlignment::Fit
        );
        let anchor_ocs = match self.alignment_point {
            Some(p)
                if !aligned
                    && (self.horizontal_alignment != TextHorizontalAlignment::Left
                        || self.vertical_alignment != TextVerticalAlignment::Baseline) =>
            {
                p
            }
            _ => self.insertion_point,
        };

        // Aligned and fit text spans the two alignment points exactly
        if aligned {
            if let Some(end) = self.alignment_point {
                let span = end.xy() - self.insertion_point.xy();
                if span.length() > 0.0 {
                    width = span.length();
                    rotation = span.y.atan2(span.x);
                }
            }
        }

        let dx = match self.horizontal_alignment {
            TextHorizontalAlignment::Center | TextHorizontalAlignment::Middle => -width / 2.0,
            TextHorizontalAlignment::Right => -width,
            _ => 0.0,
        };
        let dy = match (self.horizontal_alignment, self.vertical_alignment) {
            (TextHorizontalAlignment::Middle, _) | (_, TextVerticalAlignment::Middle) => {
                -height / 2.0
            }
            (_, TextVerticalAlignment::Top) => -height,
            _ => 0.0,
        };

        let anchor = ocs.to_world(anchor_ocs).xy();
        let rotation = ocs.angle_to_world(rotation);
        Some(rotated_rect(anchor, dx, dy, width, height, rotation))
    }
}

/// Corners of a `width` × `height` rectangle whose lower-left corner sits at
/// `(dx, dy)` relative to `anchor`, rotated about the anchor
pub(crate) fn rotated_rect(
    anchor: Vector2,
    dx: f64,
    dy: f64,
    width: f64,
    height: f64,
    rotation: f64,
) -> [Vector2; 4] {
    [
        Vector2::new(dx, dy),
        Vector2::new(dx + width, dy),
        Vector2::new(dx + width, dy + height),
        Vector2::new(dx, dy + height),
    ]
    .map(|corner| anchor + corner.rotate(rotation))
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Text {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    /// Empty text collapses to its insertion point
    fn bounding_box(&self) -> Option<BoundingBox2D> {
        match self.frame() {
            Some(frame) => BoundingBox2D::from_points(frame),
            None => Some(BoundingBox2D::from_point(
                self.common.ocs().to_world(self.insertion_point).xy(),
            )),
        }
    }

    fn entity_type(&self) -> &'static str {
        "TEXT"
    }
}
