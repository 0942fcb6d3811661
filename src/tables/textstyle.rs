//! Text style table entry

use super::TableEntry;
use crate::types::Handle;
use bitflags::bitflags;

bitflags! {
    /// Text style flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextStyleFlags: i16 {
        /// Style describes a shape file
        const SHAPE_FILE = 1;
        /// Vertical text
        const VERTICAL = 4;
        /// Style depends on an external reference
        const XREF_DEPENDENT = 16;
        /// External reference was resolved
        const XREF_RESOLVED = 32;
        /// Style was referenced when last edited
        const REFERENCED = 64;
    }
}

/// A text style table entry
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Handle
    pub handle: Option<Handle>,
    /// Style name
    pub name: String,
    /// Raw flags
    pub flags: TextStyleFlags,
    /// Fixed text height (0 = variable)
    pub height: f64,
    /// Width factor
    pub width_factor: f64,
    /// Oblique angle in degrees
    pub oblique_angle: f64,
    /// Primary font file name
    pub font_file: String,
    /// Big font file name
    pub big_font_file: String,
}

impl TextStyle {
    /// Create a new text style
    pub fn new(name: impl Into<String>) -> Self {
        TextStyle {
            handle: None,
            name: name.into(),
            flags: TextStyleFlags::empty(),
            height: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            font_file: String::new(),
            big_font_file: String::new(),
        }
    }

    /// Whether text using this style may choose its own height
    pub fn has_variable_height(&self) -> bool {
        self.height == 0.0
    }
}

impl TableEntry for TextStyle {
    fn handle(&self) -> Option<Handle> {
        self.handle
    }

    fn name(&self) -> &str {
        &self.name
    }
}
