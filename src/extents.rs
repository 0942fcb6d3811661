//! Bounding boxes of entities, block definitions and block references
//!
//! Block boxes are memoized per document in a [`BlockBoundsCache`]. Before a
//! block's contents are measured its cache slot is set to `None`, so an INSERT
//! that leads back into a block still being measured contributes nothing
//! instead of recursing forever.

use crate::document::CadDocument;
use crate::entities::{EntityType, Insert};
use crate::types::bounds::merge_optional;
use crate::types::{BoundingBox2D, Vector2};
use ahash::AHashMap;

/// Nesting depth at which block references stop being expanded
pub const MAX_BLOCK_DEPTH: usize = 100;

/// Rotations smaller than this (radians) are treated as zero
const ROTATION_EPSILON: f64 = 1e-10;

/// Memoized block content boxes, keyed by upper-case block name
#[derive(Debug, Clone, Default)]
pub struct BlockBoundsCache {
    entries: AHashMap<String, Option<BoundingBox2D>>,
}

impl BlockBoundsCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached box of a block; `Some(None)` means measured (or in progress) and empty
    pub fn get(&self, name: &str) -> Option<Option<BoundingBox2D>> {
        self.entries.get(&name.to_uppercase()).copied()
    }

    /// Number of blocks measured so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been measured
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every cached box
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Box of an entity's own geometry in world XY
///
/// INSERT yields a zero-size box at its insertion point; use
/// [`resolved_entity_bbox`] to include the referenced block.
pub fn entity_bbox(entity: &EntityType) -> Option<BoundingBox2D> {
    entity.bounding_box()
}

/// Box of a block's contents in block coordinates
///
/// Nested INSERTs are resolved. Missing or empty blocks, and blocks reached
/// through a reference cycle or past [`MAX_BLOCK_DEPTH`], yield `None`.
pub fn block_contents_bbox(
    name: &str,
    doc: &CadDocument,
    cache: &mut BlockBoundsCache,
    depth: usize,
) -> Option<BoundingBox2D> {
    let key = name.to_uppercase();
    if let Some(cached) = cache.entries.get(&key) {
        return *cached;
    }
    if depth > MAX_BLOCK_DEPTH {
        tracing::trace!(block = name, depth, "block nesting too deep");
        return None;
    }
    let block = doc.blocks.get(&key)?;

    // Provisional entry, seen by any reference back into this block
    cache.entries.insert(key.clone(), None);

    let mut bbox = None;
    for entity in &block.entities {
        let entity_box = match entity {
            EntityType::Insert(insert) => insert_bbox(insert, doc, cache, depth + 1),
            other => entity_bbox(other),
        };
        bbox = merge_optional(bbox, entity_box);
    }

    cache.entries.insert(key, bbox);
    bbox
}

/// World box of a block reference, including every MINSERT copy
///
/// The reference is placed in its own OCS first (base offset, scale, grid
/// offset, rotation, insertion point) and the resulting corners are then
/// mapped to world XY.
pub fn insert_bbox(
    insert: &Insert,
    doc: &CadDocument,
    cache: &mut BlockBoundsCache,
    depth: usize,
) -> Option<BoundingBox2D> {
    let contents = block_contents_bbox(&insert.block_name, doc, cache, depth)?;
    let base = doc
        .block(&insert.block_name)
        .map_or(Vector2::ZERO, |b| b.base_point.xy());

    let local = scale_box(contents.translate(-base), insert.x_scale, insert.y_scale);
    let origin = insert.insert_point.xy();
    let rotation = insert.rotation.to_radians();

    // Placement is affine, so the four corner cells bound the whole grid
    let span_x = f64::from(insert.column_count.max(1) - 1) * insert.column_spacing;
    let span_y = f64::from(insert.row_count.max(1) - 1) * insert.row_spacing;
    let placed = [(0.0, 0.0), (span_x, 0.0), (0.0, span_y), (span_x, span_y)]
        .into_iter()
        .map(|(dx, dy)| place_box(&local.translate(Vector2::new(dx, dy)), origin, rotation))
        .reduce(|a, b| a.merge(&b))?;

    let ocs = insert.common.ocs();
    if ocs.is_world() {
        return Some(placed);
    }
    let elevation = insert.insert_point.z;
    Some(envelope(placed.corners().map(|c| ocs.to_world_xy(c, elevation))))
}

/// World box of any entity, resolving INSERTs through their blocks
pub fn resolved_entity_bbox(
    entity: &EntityType,
    doc: &CadDocument,
    cache: &mut BlockBoundsCache,
) -> Option<BoundingBox2D> {
    match entity {
        EntityType::Insert(insert) => insert_bbox(insert, doc, cache, 0),
        other => entity_bbox(other),
    }
}

/// Union of the resolved boxes of all top-level entities
pub fn document_extents(doc: &CadDocument, cache: &mut BlockBoundsCache) -> Option<BoundingBox2D> {
    doc.entities
        .iter()
        .fold(None, |acc, e| merge_optional(acc, resolved_entity_bbox(e, doc, cache)))
}

fn scale_box(bbox: BoundingBox2D, sx: f64, sy: f64) -> BoundingBox2D {
    let (x0, x1) = (bbox.min.x * sx, bbox.max.x * sx);
    let (y0, y1) = (bbox.min.y * sy, bbox.max.y * sy);
    BoundingBox2D::from_coords(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

/// Rotate a local box about the origin, then move it to `origin`
fn place_box(local: &BoundingBox2D, origin: Vector2, rotation: f64) -> BoundingBox2D {
    if rotation.abs() < ROTATION_EPSILON {
        return local.translate(origin);
    }
    envelope(local.corners().map(|c| c.rotate(rotation) + origin))
}

fn envelope(corners: [Vector2; 4]) -> BoundingBox2D {
    let mut bbox = BoundingBox2D::from_point(corners[0]);
    for corner in &corners[1..] {
        bbox.expand_to_include(*corner);
    }
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Block, Circle, Line};
    use crate::types::Vector3;

    fn doc_with_block(name: &str, base: Vector3, entities: Vec<EntityType>) -> CadDocument {
        let mut doc = CadDocument::new();
        let mut block = Block::new(name, base);
        block.entities = entities;
        doc.add_block(block);
        doc
    }

    fn unit_square_block() -> CadDocument {
        doc_with_block(
            "SQ",
            Vector3::ZERO,
            vec![
                EntityType::Line(Line::from_coords(0.0, 0.0, 0.0, 1.0, 0.0, 0.0)),
                EntityType::Line(Line::from_coords(1.0, 0.0, 0.0, 1.0, 1.0, 0.0)),
            ],
        )
    }

    #[test]
    fn test_block_contents_cached() {
        let doc = unit_square_block();
        let mut cache = BlockBoundsCache::new();
        let bbox = block_contents_bbox("sq", &doc, &mut cache, 0).unwrap();
        assert_eq!(bbox, BoundingBox2D::from_coords(0.0, 0.0, 1.0, 1.0));
        assert_eq!(cache.get("SQ"), Some(Some(bbox)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_and_empty_blocks() {
        let mut doc = unit_square_block();
        doc.add_block(Block::new("EMPTY", Vector3::ZERO));
        let mut cache = BlockBoundsCache::new();
        assert!(block_contents_bbox("NOPE", &doc, &mut cache, 0).is_none());
        assert!(block_contents_bbox("EMPTY", &doc, &mut cache, 0).is_none());
        let insert = Insert::new("NOPE", Vector3::new(5.0, 5.0, 0.0));
        assert!(insert_bbox(&insert, &doc, &mut cache, 0).is_none());
    }

    #[test]
    fn test_insert_translate_and_base_point() {
        let doc = doc_with_block(
            "B",
            Vector3::new(10.0, 10.0, 0.0),
            vec![EntityType::Circle(Circle::from_center_radius(
                Vector3::new(10.0, 10.0, 0.0),
                2.0,
            ))],
        );
        let mut cache = BlockBoundsCache::new();
        let insert = Insert::new("B", Vector3::new(100.0, 0.0, 0.0));
        let bbox = insert_bbox(&insert, &doc, &mut cache, 0).unwrap();
        assert_eq!(bbox, BoundingBox2D::from_coords(98.0, -2.0, 102.0, 2.0));
    }

    #[test]
    fn test_negative_scale_swaps_extents() {
        let doc = unit_square_block();
        let mut cache = BlockBoundsCache::new();
        let insert = Insert::new("SQ", Vector3::ZERO).with_scale(-2.0, 1.0, 1.0);
        let bbox = insert_bbox(&insert, &doc, &mut cache, 0).unwrap();
        assert_eq!(bbox, BoundingBox2D::from_coords(-2.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_minsert_grid_follows_rotation() {
        let doc = unit_square_block();
        let mut cache = BlockBoundsCache::new();
        let insert = Insert::new("SQ", Vector3::ZERO)
            .with_rotation(90.0)
            .with_array(3, 1, 10.0, 0.0);
        let bbox = insert_bbox(&insert, &doc, &mut cache, 0).unwrap();
        // Columns run along world +Y after a quarter turn
        assert!((bbox.min.x - -1.0).abs() < 1e-9);
        assert!((bbox.max.x - 0.0).abs() < 1e-9);
        assert!((bbox.min.y - 0.0).abs() < 1e-9);
        assert!((bbox.max.y - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_minsert_diagonal_grid_uses_corner_cells() {
        let doc = unit_square_block();
        let mut cache = BlockBoundsCache::new();
        let insert = Insert::new("SQ", Vector3::ZERO)
            .with_rotation(45.0)
            .with_array(2, 2, 10.0, 10.0);
        let bbox = insert_bbox(&insert, &doc, &mut cache, 0).unwrap();
        // The (column 0, row 1) cell reaches furthest toward -X
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((bbox.min.x - -11.0 * h).abs() < 1e-9);
        assert!((bbox.max.x - 11.0 * h).abs() < 1e-9);
        assert!((bbox.min.y - 0.0).abs() < 1e-9);
        assert!((bbox.max.y - 22.0 * h).abs() < 1e-9);
    }

    #[test]
    fn test_minsert_full_range_grid() {
        let doc = unit_square_block();
        let mut cache = BlockBoundsCache::new();
        let insert = Insert::new("SQ", Vector3::ZERO).with_array(i16::MAX, i16::MAX, 2.0, 3.0);
        let bbox = insert_bbox(&insert, &doc, &mut cache, 0).unwrap();
        assert_eq!(
            bbox,
            BoundingBox2D::from_coords(0.0, 0.0, 32766.0 * 2.0 + 1.0, 32766.0 * 3.0 + 1.0)
        );
    }

    #[test]
    fn test_insert_with_flipped_extrusion_mirrors_x() {
        let doc = doc_with_block(
            "DIAG",
            Vector3::ZERO,
            vec![EntityType::Line(Line::from_coords(0.0, 0.0, 0.0, 1.0, 1.0, 0.0))],
        );
        let mut cache = BlockBoundsCache::new();
        let mut insert = Insert::new("DIAG", Vector3::new(10.0, 0.0, 0.0));
        insert.common.extrusion = Vector3::new(0.0, 0.0, -1.0);
        let bbox = insert_bbox(&insert, &doc, &mut cache, 0).unwrap();
        assert!((bbox.min.x - -11.0).abs() < 1e-9);
        assert!((bbox.max.x - -10.0).abs() < 1e-9);
        assert!((bbox.min.y - 0.0).abs() < 1e-9);
        assert!((bbox.max.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_reference_terminates() {
        let doc = doc_with_block(
            "LOOP",
            Vector3::ZERO,
            vec![
                EntityType::Line(Line::from_coords(0.0, 0.0, 0.0, 2.0, 2.0, 0.0)),
                EntityType::Insert(Insert::new("LOOP", Vector3::new(50.0, 50.0, 0.0))),
            ],
        );
        let mut cache = BlockBoundsCache::new();
        let bbox = block_contents_bbox("LOOP", &doc, &mut cache, 0).unwrap();
        assert_eq!(bbox, BoundingBox2D::from_coords(0.0, 0.0, 2.0, 2.0));
    }

    #[test]
    fn test_resolved_entity_bbox() {
        let doc = unit_square_block();
        let mut cache = BlockBoundsCache::new();
        let insert = EntityType::Insert(Insert::new("SQ", Vector3::new(3.0, 4.0, 0.0)));
        assert_eq!(
            entity_bbox(&insert),
            Some(BoundingBox2D::from_coords(3.0, 4.0, 3.0, 4.0))
        );
        assert_eq!(
            resolved_entity_bbox(&insert, &doc, &mut cache),
            Some(BoundingBox2D::from_coords(3.0, 4.0, 4.0, 5.0))
        );
    }
}
