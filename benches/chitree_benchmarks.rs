use chitree::binning::supervised_cuts;
use chitree::{DecisionTree, TreeConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

// data generating
// functions
mod utils;
use utils::create_data;

pub fn tree_benchmarks(c: &mut Criterion) {
    let n_samples = 2_000usize;
    let dataset = create_data(n_samples, 4, 3);

    let column: Vec<(f64, bool)> = dataset
        .column("x0")
        .unwrap()
        .into_iter()
        .map(|(raw, label)| (raw.parse::<f64>().unwrap(), label))
        .collect();
    c.bench_function("supervised_cuts", |b| {
        b.iter(|| {
            let mut values = column.clone();
            supervised_cuts(black_box(&mut values), black_box(10))
        })
    });

    let mut group = c.benchmark_group("fit_tree");
    group.warm_up_time(Duration::from_secs(5));
    group.sample_size(10);
    println!("\nBenchmarking on {} examples:\n", n_samples);
    group.bench_function("fit_unpruned", |b| {
        b.iter(|| DecisionTree::fit(black_box(dataset.clone()), TreeConfig::default()).unwrap())
    });
    group.bench_function("fit_pruned", |b| {
        b.iter(|| DecisionTree::fit(black_box(dataset.clone()), TreeConfig::default().set_prune(true)).unwrap())
    });
    group.finish();

    let tree = DecisionTree::fit(dataset.clone(), TreeConfig::default()).unwrap();
    let rows: Vec<_> = (0..dataset.len()).map(|i| dataset.probe(i).unwrap()).collect();
    c.bench_function("predict_rows", |b| b.iter(|| tree.predict_rows(black_box(&rows)).unwrap()));
}

criterion_group!(benches, tree_benchmarks);
criterion_main!(benches);
