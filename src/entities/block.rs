//! Block definitions from the BLOCKS section

use crate::entities::EntityType;
use crate::types::{Handle, Vector3};
use bitflags::bitflags;

bitflags! {
    /// Block-type flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BlockFlags: i16 {
        /// Anonymous block generated by hatching or dimensioning
        const ANONYMOUS = 1;
        /// Block has attribute definitions
        const HAS_ATTRIBUTES = 2;
        /// External reference
        const XREF = 4;
        /// Overlaid external reference
        const XREF_OVERLAY = 8;
        /// Externally dependent
        const EXTERNALLY_DEPENDENT = 16;
        /// Resolved external reference
        const RESOLVED = 32;
        /// Referenced external reference
        const REFERENCED = 64;
    }
}

/// A named, reusable group of entities
///
/// Inserts place the block so that its base point lands on the insertion
/// point.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block name
    pub name: String,
    /// Handle of the BLOCK record
    pub handle: Option<Handle>,
    /// Layer of the BLOCK record
    pub layer: String,
    /// Base point
    pub base_point: Vector3,
    /// Raw flags
    pub flags: BlockFlags,
    /// Block description
    pub description: String,
    /// X-ref path name
    pub xref_path: String,
    /// Entities of the block body in file order
    pub entities: Vec<EntityType>,
}

impl Block {
    /// Create a new empty block
    pub fn new(name: impl Into<String>, base_point: Vector3) -> Self {
        Self {
            name: name.into(),
            handle: None,
            layer: "0".to_string(),
            base_point,
            flags: BlockFlags::empty(),
            description: String::new(),
            xref_path: String::new(),
            entities: Vec::new(),
        }
    }

    /// Whether this is one of the layout blocks that mirror model or paper space
    pub fn is_layout_block(&self) -> bool {
        is_layout_block_name(&self.name)
    }
}

/// Whether a block name designates a model or paper space layout block
pub fn is_layout_block_name(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    ["*MODEL_SPACE", "*PAPER_SPACE", "$MODEL_SPACE", "$PAPER_SPACE"]
        .iter()
        .any(|prefix| upper.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_block_names() {
        assert!(is_layout_block_name("*Model_Space"));
        assert!(is_layout_block_name("*PAPER_SPACE0"));
        assert!(is_layout_block_name("$model_space"));
        assert!(!is_layout_block_name("DOOR"));
        assert!(!is_layout_block_name("*D12"));
    }

    #[test]
    fn test_new_block() {
        let block = Block::new("DOOR", Vector3::new(1.0, 0.0, 0.0));
        assert!(block.entities.is_empty());
        assert!(!block.is_layout_block());
        assert_eq!(block.layer, "0");
    }
}
