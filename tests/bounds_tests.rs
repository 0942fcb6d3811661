//! Block reference bounding boxes read from DXF text

mod common;

use acadview::extents::{block_contents_bbox, document_extents, resolved_entity_bbox, BlockBoundsCache};
use acadview::{BoundingBox2D, EntityType};
use common::{approx, read, DxfBuilder};

fn assert_box(actual: Option<BoundingBox2D>, expected: (f64, f64, f64, f64)) {
    let bbox = actual.expect("box should exist");
    let tol = 1e-5;
    assert!(
        approx(bbox.min.x, expected.0, tol)
            && approx(bbox.min.y, expected.1, tol)
            && approx(bbox.max.x, expected.2, tol)
            && approx(bbox.max.y, expected.3, tol),
        "got {bbox}, expected {expected:?}"
    );
}

#[test]
fn test_insert_places_block_box() {
    let text = DxfBuilder::new()
        .begin_section("BLOCKS")
        .begin_block("PANEL", (0.0, 0.0))
        .line("0", (0.0, 0.0), (100.0, 50.0))
        .end_block()
        .end_section()
        .begin_section("ENTITIES")
        .pairs(&[(0, "INSERT"), (2, "PANEL"), (10, "200"), (20, "300")])
        .end_section()
        .eof()
        .build();
    let doc = read(&text);
    let mut cache = BlockBoundsCache::new();

    assert_eq!(
        block_contents_bbox("PANEL", &doc, &mut cache, 0),
        Some(BoundingBox2D::from_coords(0.0, 0.0, 100.0, 50.0))
    );
    assert_eq!(
        resolved_entity_bbox(&doc.entities[0], &doc, &mut cache),
        Some(BoundingBox2D::from_coords(200.0, 300.0, 300.0, 350.0))
    );
}

#[test]
fn test_scale_and_rotation() {
    let text = DxfBuilder::new()
        .begin_section("BLOCKS")
        .begin_block("SEG", (0.0, 0.0))
        .line("0", (0.0, 0.0), (1.0, 0.0))
        .end_block()
        .begin_block("RECT", (0.0, 0.0))
        .line("0", (0.0, 0.0), (4.0, 1.0))
        .end_block()
        .end_section()
        .begin_section("ENTITIES")
        .insert("RECT", (0.0, 0.0), (2.0, 3.0), 0.0)
        .insert("SEG", (0.0, 0.0), (1.0, 1.0), 90.0)
        .end_section()
        .eof()
        .build();
    let doc = read(&text);
    let mut cache = BlockBoundsCache::new();

    assert_box(resolved_entity_bbox(&doc.entities[0], &doc, &mut cache), (0.0, 0.0, 8.0, 3.0));
    // A horizontal unit segment turned a quarter becomes vertical
    assert_box(resolved_entity_bbox(&doc.entities[1], &doc, &mut cache), (0.0, 0.0, 0.0, 1.0));
}

#[test]
fn test_nested_blocks() {
    let text = DxfBuilder::new()
        .begin_section("BLOCKS")
        .begin_block("INNER", (0.0, 0.0))
        .circle("0", (0.0, 0.0), 1.0)
        .end_block()
        .begin_block("OUTER", (0.0, 0.0))
        .insert("INNER", (10.0, 0.0), (2.0, 2.0), 0.0)
        .end_block()
        .end_section()
        .begin_section("ENTITIES")
        .insert("OUTER", (0.0, 100.0), (1.0, 1.0), 0.0)
        .end_section()
        .eof()
        .build();
    let doc = read(&text);
    let mut cache = BlockBoundsCache::new();

    assert_box(resolved_entity_bbox(&doc.entities[0], &doc, &mut cache), (8.0, 98.0, 12.0, 102.0));
    assert_eq!(cache.len(), 2);
    assert_box(document_extents(&doc, &mut cache), (8.0, 98.0, 12.0, 102.0));
}

#[test]
fn test_mutual_recursion_terminates_empty() {
    let text = DxfBuilder::new()
        .begin_section("BLOCKS")
        .begin_block("A", (0.0, 0.0))
        .insert("B", (1.0, 1.0), (1.0, 1.0), 0.0)
        .end_block()
        .begin_block("B", (0.0, 0.0))
        .insert("A", (1.0, 1.0), (1.0, 1.0), 0.0)
        .end_block()
        .end_section()
        .eof()
        .build();
    let doc = read(&text);

    let mut cache = BlockBoundsCache::new();
    assert_eq!(block_contents_bbox("A", &doc, &mut cache, 0), None);
    let mut cache = BlockBoundsCache::new();
    assert_eq!(block_contents_bbox("B", &doc, &mut cache, 0), None);
    assert!(matches!(doc.block("A").unwrap().entities[0], EntityType::Insert(_)));
}

#[test]
fn test_array_insert_from_text() {
    let text = DxfBuilder::new()
        .begin_section("BLOCKS")
        .begin_block("CELL", (0.0, 0.0))
        .line("0", (0.0, 0.0), (2.0, 1.0))
        .end_block()
        .end_section()
        .begin_section("ENTITIES")
        .insert("CELL", (100.0, 0.0), (1.0, 1.0), 0.0)
        .pairs(&[(70, "4"), (71, "3"), (44, "5.0"), (45, "10.0")])
        .insert("CELL", (0.0, 0.0), (1.0, 1.0), 0.0)
        .pairs(&[(70, "32767"), (71, "32767"), (44, "1.0"), (45, "1.0")])
        .end_section()
        .eof()
        .build();
    let doc = read(&text);
    let mut cache = BlockBoundsCache::new();

    assert_box(resolved_entity_bbox(&doc.entities[0], &doc, &mut cache), (100.0, 0.0, 117.0, 21.0));
    assert_box(resolved_entity_bbox(&doc.entities[1], &doc, &mut cache), (0.0, 0.0, 32768.0, 32767.0));
}

#[test]
fn test_flipped_extrusion_mirrors_reference() {
    let text = DxfBuilder::new()
        .begin_section("BLOCKS")
        .begin_block("DIAG", (0.0, 0.0))
        .line("0", (0.0, 0.0), (1.0, 1.0))
        .end_block()
        .end_section()
        .begin_section("ENTITIES")
        .insert("DIAG", (10.0, 0.0), (1.0, 1.0), 0.0)
        .pairs(&[(210, "0.0"), (220, "0.0"), (230, "-1.0")])
        .end_section()
        .eof()
        .build();
    let doc = read(&text);
    let mut cache = BlockBoundsCache::new();

    assert_box(resolved_entity_bbox(&doc.entities[0], &doc, &mut cache), (-11.0, 0.0, -10.0, 1.0));
}
