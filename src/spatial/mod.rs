//! Spatial index over a document's top-level entities
//!
//! [`SpatialIndex`] keeps one box per entity (indexed like
//! [`CadDocument::entities`]) and a packed R-tree over the boxes that exist.
//! The [`query`] functions use it to pick and snap.

pub mod query;
pub mod rtree;

pub use query::{find_snaps, hit_test, visible_layer_names, SnapKind, SnapKinds, SnapPoint};
pub use rtree::PackedRTree;

use crate::document::CadDocument;
use crate::entities::EntityType;
use crate::extents::{entity_bbox, resolved_entity_bbox, BlockBoundsCache};
use crate::types::BoundingBox2D;

/// How entity boxes are computed when building the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsMode {
    /// Each entity's own geometry; INSERTs are a point
    EntityOnly,
    /// INSERTs cover their referenced block contents
    #[default]
    ResolveInserts,
}

/// Entity boxes plus an R-tree over them
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    boxes: Vec<Option<BoundingBox2D>>,
    tree: PackedRTree,
}

impl SpatialIndex {
    /// Index the document's top-level entities
    pub fn build(doc: &CadDocument, mode: BoundsMode) -> Self {
        let boxes = match mode {
            BoundsMode::EntityOnly => doc.entities.iter().map(entity_bbox).collect(),
            BoundsMode::ResolveInserts => {
                let mut cache = BlockBoundsCache::new();
                doc.entities
                    .iter()
                    .map(|e| resolved_entity_bbox(e, doc, &mut cache))
                    .collect()
            }
        };
        let index = Self::from_boxes(boxes);
        tracing::debug!(
            entities = doc.entities.len(),
            indexed = index.len(),
            height = index.tree.height(),
            ?mode,
            "spatial index built"
        );
        index
    }

    /// Index bare entities; INSERTs count as their insertion point
    pub fn build_from_entities(entities: &[EntityType]) -> Self {
        Self::from_boxes(entities.iter().map(entity_bbox).collect())
    }

    /// Index precomputed boxes, one per entity
    pub fn from_boxes(boxes: Vec<Option<BoundingBox2D>>) -> Self {
        let items = boxes
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.map(|b| (i, b)))
            .collect();
        Self {
            tree: PackedRTree::bulk_load(items),
            boxes,
        }
    }

    /// Box of every entity by index; `None` for entities without geometry
    pub fn boxes(&self) -> &[Option<BoundingBox2D>] {
        &self.boxes
    }

    /// Box of one entity
    pub fn bbox(&self, index: usize) -> Option<BoundingBox2D> {
        self.boxes.get(index).copied().flatten()
    }

    /// Number of entities with a box
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check if no entity has a box
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Indices of entities whose box intersects `area`, ascending
    pub fn search(&self, area: &BoundingBox2D) -> Vec<usize> {
        self.tree.search(area)
    }
}
