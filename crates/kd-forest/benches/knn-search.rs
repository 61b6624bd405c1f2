//! Benchmarks for building and querying a KD-forest.

#![expect(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kd_forest::{Forest, ForestParams};
use rand08::SeedableRng;

fn knn_search(c: &mut Criterion) {
    let (car, dim) = (50_000, 16);
    let mut data_rng = rand08::rngs::StdRng::seed_from_u64(42);
    let data = symagen::random_data::random_tabular_floats(car, dim, -1.0_f32, 1.0, &mut data_rng)
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    let mut query_rng = rand08::rngs::StdRng::seed_from_u64(43);
    let queries = symagen::random_data::random_tabular_floats(100, dim, -1.0_f32, 1.0, &mut query_rng);

    let mut group = c.benchmark_group("knn-search");
    group.throughput(criterion::Throughput::Elements(queries.len() as u64)).sample_size(10);

    for num_trees in [1_usize, 4, 8] {
        let params = ForestParams::default().with_num_trees(num_trees).with_seed(42);

        group.bench_function(BenchmarkId::new("build", num_trees), |b| {
            b.iter_with_large_drop(|| Forest::par_new(&data, dim, &params));
        });

        let mut forest = Forest::par_new(&data, dim, &params).unwrap_or_else(|e| unreachable!("{e}"));
        for budget in [0_usize, 512, 2048] {
            forest.set_max_comparisons(budget);
            group.bench_function(BenchmarkId::new(format!("query-k10-b{budget}"), num_trees), |b| {
                b.iter_with_large_drop(|| forest.par_batch_query(&queries, 10));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, knn_search);
criterion_main!(benches);
