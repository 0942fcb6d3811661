use acadview::spatial::{hit_test, BoundsMode, SpatialIndex};
use acadview::{CadDocument, Circle, EntityType, Line, Vector2, Vector3};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// A grid of lines and circles, `side * side` cells
fn grid_document(side: usize) -> CadDocument {
    let mut doc = CadDocument::new();
    for row in 0..side {
        for col in 0..side {
            let x = col as f64 * 10.0;
            let y = row as f64 * 10.0;
            let entity = if (row + col) % 2 == 0 {
                EntityType::Line(Line::from_coords(x, y, 0.0, x + 8.0, y + 8.0, 0.0))
            } else {
                EntityType::Circle(Circle::from_center_radius(Vector3::new(x + 4.0, y + 4.0, 0.0), 3.0))
            };
            doc.entities.push(entity);
        }
    }
    doc.finalize_layers();
    doc
}

fn bench_spatial_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_index");

    for side in [32usize, 100, 300] {
        let doc = grid_document(side);
        let name = format!("{}_entities", side * side);

        group.bench_with_input(BenchmarkId::new("build", &name), &doc, |b, doc| {
            b.iter(|| black_box(SpatialIndex::build(doc, BoundsMode::ResolveInserts).len()))
        });

        let index = SpatialIndex::build(&doc, BoundsMode::ResolveInserts);
        let probes: Vec<Vector2> = (0..64)
            .map(|i| {
                let t = i as f64 / 64.0 * side as f64 * 10.0;
                Vector2::new(t, t * 0.5)
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("hit_test", &name), &probes, |b, probes| {
            b.iter(|| {
                for p in probes {
                    black_box(hit_test(&doc, &index, *p, 1.0, None));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_spatial_index);
criterion_main!(benches);
