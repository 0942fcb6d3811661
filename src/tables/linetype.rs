//! Line type table entry

use super::TableEntry;
use crate::types::Handle;

/// One dash, gap or dot of a pattern (group code 49)
///
/// Positive lengths draw, negative lengths skip, zero is a dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTypeElement {
    pub length: f64,
}

/// A line type table entry
#[derive(Debug, Clone, PartialEq)]
pub struct LineType {
    pub handle: Option<Handle>,
    pub name: String,
    pub description: String,
    /// Pattern in file order
    pub elements: Vec<LineTypeElement>,
    /// Total pattern length as written (group code 40)
    pub pattern_length: f64,
}

impl LineType {
    pub fn new(name: impl Into<String>) -> Self {
        LineType {
            handle: None,
            name: name.into(),
            description: String::new(),
            elements: Vec::new(),
            pattern_length: 0.0,
        }
    }

    /// No gaps anywhere in the pattern
    pub fn is_continuous(&self) -> bool {
        self.elements.iter().all(|e| e.length > 0.0)
    }

    /// Dash/gap lengths for drawing at `scale`, as `(on, length)` runs
    ///
    /// Dots come out as zero-length "on" runs. A continuous line type yields
    /// an empty pattern.
    pub fn dash_pattern(&self, scale: f64) -> Vec<(bool, f64)> {
        if self.is_continuous() {
            return Vec::new();
        }
        self.elements
            .iter()
            .map(|e| (e.length >= 0.0, e.length.abs() * scale))
            .collect()
    }

    /// Pattern length from the elements, for files that omit code 40
    pub fn measured_length(&self) -> f64 {
        self.elements.iter().map(|e| e.length.abs()).sum()
    }
}

impl TableEntry for LineType {
    fn handle(&self) -> Option<Handle> {
        self.handle
    }

    fn name(&self) -> &str {
        &self.name
    }
}
