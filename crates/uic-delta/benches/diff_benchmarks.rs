use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use uic_delta::{apply_delta, diff_ir};
use uic_ir::{Ir, IrMetadata, Node, NodeKind, PropValue, SourceLanguage};

fn flat_view_with_n_children(n: usize, text_prefix: &str) -> Ir {
    let mut ir = Ir::new(
        semver::Version::new(1, 0, 0),
        IrMetadata::new(SourceLanguage::JsxTs, "Bench.tsx", "2026-01-01T00:00:00Z"),
    );
    let mut root = Node::new("root", NodeKind::View);
    for i in 0..n {
        let mut child = Node::new(format!("text-{i}"), NodeKind::Text);
        child
            .props
            .insert("content".to_string(), PropValue::Str(format!("{text_prefix}-{i}")));
        let child_id = ir.insert_node(child);
        root.children.push(child_id);
    }
    let root_id = ir.insert_node(root);
    ir.roots.push(root_id);
    ir
}

fn benchmark_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_ir");

    for size in [10usize, 100, 1_000] {
        let old = flat_view_with_n_children(size, "old");
        let new = flat_view_with_n_children(size, "new");

        group.bench_with_input(BenchmarkId::new("all_modified", size), &size, |b, _| {
            b.iter(|| diff_ir(black_box(&old), black_box(&new)))
        });

        let unchanged = flat_view_with_n_children(size, "old");
        group.bench_with_input(BenchmarkId::new("unchanged", size), &size, |b, _| {
            b.iter(|| diff_ir(black_box(&old), black_box(&unchanged)))
        });
    }

    group.finish();
}

fn benchmark_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_delta");

    for size in [10usize, 100, 1_000] {
        let old = flat_view_with_n_children(size, "old");
        let new = flat_view_with_n_children(size, "new");
        let delta = diff_ir(&old, &new).unwrap();

        group.bench_with_input(BenchmarkId::new("all_modified", size), &size, |b, _| {
            b.iter(|| apply_delta(black_box(&old), black_box(&delta)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_diff, benchmark_apply);
criterion_main!(benches);
