//! Multi-line text entity

use super::text::{rotated_rect, CHAR_WIDTH_FACTOR};
use super::{Entity, EntityCommon};
use crate::types::{BoundingBox2D, Color, Vector2, Vector3};

/// Distance between baselines as a multiple of the text height
const LINE_PITCH: f64 = 5.0 / 3.0;

/// Attachment point for MText (group code 71)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentPoint {
    /// Top left
    #[default]
    TopLeft = 1,
    /// Top center
    TopCenter = 2,
    /// Top right
    TopRight = 3,
    /// Middle left
    MiddleLeft = 4,
    /// Middle center
    MiddleCenter = 5,
    /// Middle right
    MiddleRight = 6,
    /// Bottom left
    BottomLeft = 7,
    /// Bottom center
    BottomCenter = 8,
    /// Bottom right
    BottomRight = 9,
}

impl AttachmentPoint {
    /// Create from the raw code value; out-of-range values attach top left
    pub fn from_value(value: i16) -> Self {
        match value {
            2 => AttachmentPoint::TopCenter,
            3 => AttachmentPoint::TopRight,
            4 => AttachmentPoint::MiddleLeft,
            5 => AttachmentPoint::MiddleCenter,
            6 => AttachmentPoint::MiddleRight,
            7 => AttachmentPoint::BottomLeft,
            8 => AttachmentPoint::BottomCenter,
            9 => AttachmentPoint::BottomRight,
            _ => AttachmentPoint::TopLeft,
        }
    }

    /// Column (0 left, 1 center, 2 right) and row (0 top, 1 middle, 2 bottom)
    fn grid(self) -> (u8, u8) {
        let index = self as u8 - 1;
        (index % 3, index / 3)
    }
}

/// Drawing direction for MText (group code 72)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingDirection {
    /// Left to right
    #[default]
    LeftToRight,
    /// Top to bottom
    TopToBottom,
    /// By style
    ByStyle,
}

impl DrawingDirection {
    /// Create from the raw code value
    pub fn from_value(value: i16) -> Self {
        match value {
            3 => DrawingDirection::TopToBottom,
            5 => DrawingDirection::ByStyle,
            _ => DrawingDirection::LeftToRight,
        }
    }
}

/// Background fill settings; read and kept, never drawn
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackgroundFill {
    /// Fill flags (group code 90)
    pub flags: i32,
    /// Fill color (group code 63)
    pub color: Option<Color>,
    /// Fill true color (group code 421)
    pub true_color: Option<u32>,
    /// Fill box scale (group code 45)
    pub scale: Option<f64>,
    /// Fill transparency (group code 441)
    pub transparency: Option<i32>,
}

/// A multi-line text entity
#[derive(Debug, Clone, PartialEq)]
pub struct MText {
    /// Common entity data
    pub common: EntityCommon,
    /// Text content, including inline formatting codes
    pub value: String,
    /// Insertion point, in world coordinates
    pub insertion_point: Vector3,
    /// Nominal text height
    pub height: f64,
    /// Reference rectangle width
    pub rectangle_width: f64,
    /// Rotation angle in degrees
    pub rotation: f64,
    /// Explicit X axis direction; overrides `rotation` when present
    pub x_axis_direction: Option<Vector3>,
    /// Text style name
    pub style: String,
    /// Attachment point
    pub attachment_point: AttachmentPoint,
    /// Drawing direction
    pub drawing_direction: DrawingDirection,
    /// Line spacing factor
    pub line_spacing_factor: f64,
    /// Background fill
    pub background: BackgroundFill,
}

impl MText {
    /// Create a new multi-line text entity
    pub fn new() -> Self {
        MText {
            common: EntityCommon::new(),
            value: String::new(),
            insertion_point: Vector3::ZERO,
            height: 1.0,
            rectangle_width: 0.0,
            rotation: 0.0,
            x_axis_direction: None,
            style: "STANDARD".to_string(),
            attachment_point: AttachmentPoint::TopLeft,
            drawing_direction: DrawingDirection::LeftToRight,
            line_spacing_factor: 1.0,
            background: BackgroundFill::default(),
        }
    }

    /// Text with inline formatting removed, paragraphs split into lines
    pub fn plain_text(&self) -> String {
        strip_formatting(&self.value)
    }

    /// Rotation in radians, honoring an explicit X axis direction
    pub fn rotation_radians(&self) -> f64 {
        match self.x_axis_direction {
            Some(dir) if dir.x != 0.0 || dir.y != 0.0 => dir.y.atan2(dir.x),
            _ => self.rotation.to_radians(),
        }
    }

    /// Corners of the estimated text rectangle in world XY
    pub fn frame(&self) -> Option<[Vector2; 4]> {
        let plain = self.plain_text();
        let lines: Vec<&str> = plain.lines().collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if longest == 0 {
            return None;
        }

        let width = longest as f64 * self.height * CHAR_WIDTH_FACTOR;
        let height = self.height
            * (1.0 + (lines.len() - 1) as f64 * LINE_PITCH * self.line_spacing_factor);

        let (column, row) = self.attachment_point.grid();
        let dx = -(column as f64) * width / 2.0;
        let dy = -height + row as f64 * height / 2.0;

        Some(rotated_rect(
            self.insertion_point.xy(),
            dx,
            dy,
            width,
            height,
            self.rotation_radians(),
        ))
    }
}

impl Default for MText {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for MText {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn bounding_box(&self) -> Option<BoundingBox2D> {
        self.frame()
            .map_or(Some(BoundingBox2D::from_point(self.insertion_point.xy())), BoundingBox2D::from_points)
    }

    fn entity_type(&self) -> &'static str {
        "MTEXT"
    }
}

/// Remove MTEXT inline formatting
///
/// `\P` becomes a line break, stacked fractions `\Sa^b;` become `a/b`, and
/// property codes such as `\H2.5;` or `\fArial|b0;` are dropped along with
/// grouping braces.
pub fn strip_formatting(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('P') | Some('X') => out.push('\n'),
                Some('~') => out.push(' '),
                Some(esc @ ('\\' | '{' | '}')) => out.push(esc),
                Some('S') => {
                    for s in chars.by_ref() {
                        match s {
                            ';' => break,
                            '^' | '#' => out.push('/'),
                            other => out.push(other),
                        }
                    }
                }
                Some('A' | 'C' | 'c' | 'F' | 'f' | 'H' | 'h' | 'Q' | 'q' | 'T' | 't' | 'W'
                | 'w' | 'p') => {
                    for s in chars.by_ref() {
                        if s == ';' {
                            break;
                        }
                    }
                }
                // Toggles such as \L \O \K carry no argument
                Some(_) | None => {}
            },
            '{' | '}' => {}
            '%' if chars.peek() == Some(&'%') => {
                chars.next();
                match chars.next() {
                    Some('c' | 'C') => out.push('\u{2300}'),
                    Some('d' | 'D') => out.push('\u{00B0}'),
                    Some('p' | 'P') => out.push('\u{00B1}'),
                    Some('%') => out.push('%'),
                    Some(other) => {
                        out.push_str("%%");
                        out.push(other);
                    }
                    None => out.push_str("%%"),
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mtext_defaults() {
        let mtext = MText::new();
        assert_eq!(mtext.attachment_point, AttachmentPoint::TopLeft);
        assert!(mtext.frame().is_none());
    }

    #[test]
    fn test_strip_formatting() {
        assert_eq!(strip_formatting("{\\fArial|b1;Bold}\\Ptext"), "Bold\ntext");
        assert_eq!(strip_formatting("\\H2.5;big\\~x"), "big x");
        assert_eq!(strip_formatting("1\\S1^2;"), "11/2");
        assert_eq!(strip_formatting("50%%d"), "50\u{00B0}");
        assert_eq!(strip_formatting("a\\\\b"), "a\\b");
    }

    #[test]
    fn test_top_left_box_hangs_below_insertion() {
        let mut mtext = MText::new();
        mtext.value = "ABCDE".to_string();
        mtext.height = 2.0;
        mtext.insertion_point = Vector3::new(0.0, 10.0, 0.0);
        let bbox = mtext.bounding_box().unwrap();
        assert!((bbox.max.y - 10.0).abs() < 1e-12);
        assert!((bbox.min.y - 8.0).abs() < 1e-12);
        assert!((bbox.max.x - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_box_is_insertion_point() {
        let mut mtext = MText::new();
        mtext.insertion_point = Vector3::new(1.0, 2.0, 0.0);
        assert!(mtext.frame().is_none());
        assert_eq!(
            mtext.bounding_box(),
            Some(BoundingBox2D::from_coords(1.0, 2.0, 1.0, 2.0))
        );
    }

    #[test]
    fn test_middle_center_attachment() {
        let mut mtext = MText::new();
        mtext.value = "ABCD".to_string();
        mtext.attachment_point = AttachmentPoint::from_value(5);
        let bbox = mtext.bounding_box().unwrap();
        assert!(bbox.center().length() < 1e-12);
    }

    #[test]
    fn test_multiple_paragraphs_grow_height() {
        let mut mtext = MText::new();
        mtext.value = "A\\PB".to_string();
        let bbox = mtext.bounding_box().unwrap();
        assert!((bbox.height() - (1.0 + LINE_PITCH)).abs() < 1e-12);
    }

    #[test]
    fn test_x_axis_direction_overrides_rotation() {
        let mut mtext = MText::new();
        mtext.rotation = 45.0;
        mtext.x_axis_direction = Some(Vector3::new(0.0, 1.0, 0.0));
        assert!((mtext.rotation_radians() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
