use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use tree_diagram::{DrawOptions, Node};

fn example_tree() -> Node {
    let root = Node::new("root");
    root.new_child("Alfa");
    let bravo = root.new_child("Bravo");
    bravo.new_child("Charlie");
    let delta = bravo.new_child("Delta");
    delta.new_child("Echo");
    delta.new_child("Foxtrot");
    bravo.new_child("Golf");
    root.new_child("Hotel");
    let india = root.new_child("India");
    for name in ["Juliett", "Kilo", "Lima", "Mike", "November"] {
        india.new_child(name);
    }
    root.new_child("Oscar");
    let papa = root.new_child("Papa");
    for name in ["Quebec", "Romeo", "Sierra", "Tango", "Uniform"] {
        papa.new_child(name);
    }
    let victor = papa.new_child("Victor");
    for name in ["Whiskey", "Xray", "Yankee"] {
        victor.new_child(name).set_color_magenta();
    }
    root.new_child("Zulu");
    root
}

/// A tree `depth` levels deep with `width` children on every node.
fn wide_tree(depth: usize, width: usize) -> Node {
    let root = Node::new("root");
    let mut current = vec![root.clone()];
    for level in 0..depth {
        current = current
            .iter()
            .flat_map(|node| {
                (0..width)
                    .map(|index| node.new_child(format!("level{level}-{index}")))
                    .collect::<Vec<_>>()
            })
            .collect();
    }
    root
}

fn build(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("build");
    group.throughput(Throughput::Elements(1));

    group.bench_function("example-tree", |bencher| {
        bencher.iter(|| black_box(example_tree()));
    });

    group.bench_function("graft", |bencher| {
        bencher.iter(|| {
            let root = example_tree();
            let leaf = root.new_child("a").new_child("b").new_child("c");
            leaf.add_child(black_box(&example_tree())).unwrap();
            black_box(root)
        });
    });

    group.finish();
}

fn renders(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("render");
    group.throughput(Throughput::Elements(1)); // Diagrams per second

    let tree = Node::new("root");
    group.bench_function("single", |bencher| {
        bencher.iter(|| black_box(black_box(&tree).draw()));
    });

    let tree = example_tree();
    group.bench_function("example-tree", |bencher| {
        bencher.iter(|| black_box(black_box(&tree).draw()));
    });

    let options = DrawOptions::new()
        .border(true)
        .debug(true)
        .align_right(true);
    group.bench_function("example-tree-all-options", |bencher| {
        bencher.iter(|| black_box(black_box(&tree).draw_options(&options)));
    });

    let tree = wide_tree(4, 6);
    group.bench_function("wide-tree", |bencher| {
        bencher.iter(|| black_box(black_box(&tree).draw()));
    });

    group.finish();
}

/// Create flamegraphs with `cargo bench --bench bench -- --profile-time=5`
#[cfg(unix)]
fn profiled() -> Criterion {
    use pprof::criterion::{Output, PProfProfiler};
    Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}
#[cfg(not(unix))]
fn profiled() -> Criterion {
    Criterion::default()
}

criterion_group! {
    name = benches;
    config = profiled();
    targets = build, renders
}
criterion_main!(benches);
