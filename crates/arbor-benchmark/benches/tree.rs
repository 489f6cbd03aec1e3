use std::hint::black_box;

use arbor_tree::{InputEdit, Language, Length, Point, Symbol, TreeId, TreePool};
use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};

const BRANCHING: usize = 8;

fn length(bytes: u32) -> Length {
    Length::new(bytes.into(), Point::new(0, bytes))
}

/// A tree of `leaves` tokens of the form ` abc`, grouped `BRANCHING` at a time.
fn build(pool: &mut TreePool, language: &Language, leaves: usize) -> TreeId {
    let mut level: Vec<TreeId> = (0..leaves)
        .map(|_| pool.make_leaf(Symbol(1), length(1), length(3), language))
        .collect();

    while level.len() > 1 {
        level = level
            .chunks(BRANCHING)
            .map(|chunk| pool.make_node(Symbol(2), chunk.to_vec(), language))
            .collect();
    }
    level[0]
}

fn benchmark_tree(c: &mut Criterion) {
    let language = Language::new();
    let sizes = [64, 4096];

    let mut group = c.benchmark_group("Tree Benchmark");

    for leaves in sizes {
        group.throughput(Throughput::Elements(leaves as u64));
        group.bench_with_input(BenchmarkId::new("build_and_release", leaves), &leaves, |b, &leaves| {
            let mut pool = TreePool::new();
            b.iter(|| {
                let tree = build(&mut pool, &language, leaves);
                black_box(pool[tree].total_bytes());
                pool.release(tree);
            });
        });

        let mut pool = TreePool::new();
        let tree = build(&mut pool, &language, leaves);
        let middle = u32::from(pool[tree].total_bytes()) / 2;
        let edit = InputEdit::new(length(middle), length(2), length(5));

        group.bench_with_input(BenchmarkId::new("edit_shared", leaves), &edit, |b, edit| {
            b.iter(|| {
                pool.retain(tree);
                let edited = pool.edit(tree, edit).unwrap();
                black_box(pool[edited].has_changes);
                pool.release(edited);
            });
        });
        pool.release(tree);
    }

    group.finish();
}

criterion_group!(benches, benchmark_tree);
criterion_main!(benches);
