//! Layer table entry

use super::TableEntry;
use crate::types::{Color, Handle, LineWeight};
use bitflags::bitflags;

bitflags! {
    /// Layer table flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayerFlags: i16 {
        /// Layer is frozen
        const FROZEN = 1;
        /// Layer is frozen by default in new viewports
        const FROZEN_IN_NEW_VIEWPORTS = 2;
        /// Layer is locked
        const LOCKED = 4;
        /// Layer depends on an external reference
        const XREF_DEPENDENT = 16;
        /// External reference was resolved
        const XREF_RESOLVED = 32;
        /// Layer was referenced by an entity when last edited
        const REFERENCED = 64;
    }
}

/// Visibility state derived from a layer's raw color and flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerState {
    /// Layer is off (raw color was negative)
    pub off: bool,
    /// Layer is frozen
    pub frozen: bool,
    /// Layer is locked
    pub locked: bool,
    /// Color with the off-sign removed
    pub color: i16,
}

impl LayerState {
    /// Derive the state from the values stored in the file
    pub fn derive(raw_color: i16, flags: LayerFlags) -> Self {
        LayerState {
            off: raw_color < 0,
            frozen: flags.contains(LayerFlags::FROZEN),
            locked: flags.contains(LayerFlags::LOCKED),
            color: raw_color.saturating_abs(),
        }
    }
}

/// A layer table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Handle
    pub handle: Option<Handle>,
    /// Layer name
    pub name: String,
    /// ACI color; negative in the file when the layer is off
    pub color: i16,
    /// Line type name
    pub line_type: String,
    /// Raw flags
    pub flags: LayerFlags,
    /// Line weight
    pub line_weight: LineWeight,
    /// 24-bit true color
    pub true_color: Option<u32>,
    /// Is this layer plottable?
    pub is_plottable: bool,
    /// Layer is off; derived once reading completes
    pub is_off: bool,
    /// Layer is frozen; derived once reading completes
    pub is_frozen: bool,
    /// Layer is locked; derived once reading completes
    pub is_locked: bool,
}

impl Layer {
    /// Create a new layer with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            handle: None,
            name: name.into(),
            color: 7,
            line_type: "CONTINUOUS".to_string(),
            flags: LayerFlags::empty(),
            line_weight: LineWeight::Default,
            true_color: None,
            is_plottable: true,
            is_off: false,
            is_frozen: false,
            is_locked: false,
        }
    }

    /// Create the standard "0" layer
    pub fn layer_0() -> Self {
        Self::new("0")
    }

    /// Create a layer with a specific color
    pub fn with_color(name: impl Into<String>, color: i16) -> Self {
        Layer {
            color,
            ..Self::new(name)
        }
    }

    /// Compute the derived state and drop the off-sign from the color
    pub fn apply_derived_state(&mut self) {
        let state = LayerState::derive(self.color, self.flags);
        // A second pass sees the normalized color
        self.is_off = self.is_off || state.off;
        self.is_frozen = state.frozen;
        self.is_locked = state.locked;
        self.color = state.color;
    }

    /// Whether entities on this layer are displayed
    pub fn is_visible(&self) -> bool {
        !self.is_off && !self.is_frozen
    }

    /// Color as an ACI reference
    pub fn aci(&self) -> Color {
        Color::from_index(self.color)
    }
}

impl TableEntry for Layer {
    fn handle(&self) -> Option<Handle> {
        self.handle
    }

    fn name(&self) -> &str {
        &self.name
    }
}
