use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;
use kplusplus_core::{Dataset, Matrix};
use kplusplus_models::k_means::KMeans;
use kplusplus_models::k_medoids::KMedoids;
use kplusplus_models::seeding::kmeans_plusplus;

fn make_cluster_data(points_per_cluster: usize, dims: usize, clusters: usize) -> Dataset {
    let rows = points_per_cluster * clusters;
    let x = Matrix::from_fn(rows, dims, |i, j| {
        let cluster = i / points_per_cluster;
        let within = i % points_per_cluster;
        let center = cluster as f64 * 8.0;
        center + (within as f64 * 0.01) + (j as f64 * 0.05)
    });
    Dataset::from_matrix(x).unwrap()
}

fn bench_seeding(c: &mut Criterion) {
    let x = make_cluster_data(1_000, 8, 16);

    let mut group = c.benchmark_group("kmeans_plusplus");
    for k in [4, 16, 64] {
        group.bench_function(format!("seed_16000x8_k{k}"), |b| {
            b.iter_batched(
                || StdRng::seed_from_u64(42),
                |mut rng| {
                    let centers = kmeans_plusplus(black_box(&x), k, &mut rng).unwrap();
                    black_box(centers);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_kmeans(c: &mut Criterion) {
    let x = make_cluster_data(300, 6, 4);

    let mut group = c.benchmark_group("kmeans");
    group.bench_function("fit_1200x6_k4", |b| {
        b.iter_batched(
            || KMeans::new(4, 50).with_seed(7),
            |mut model| {
                model.fit(black_box(&x)).unwrap();
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("fit_1200x6_k4_n_init8", |b| {
        b.iter_batched(
            || KMeans::new(4, 50).with_seed(7).with_n_init(8),
            |mut model| {
                model.fit(black_box(&x)).unwrap();
            },
            BatchSize::SmallInput,
        )
    });

    let mut fitted = KMeans::new(4, 50).with_seed(7);
    fitted.fit(&x).unwrap();
    group.bench_function("predict_1200x6_k4", |b| {
        b.iter(|| {
            let preds = fitted.predict(black_box(&x)).unwrap();
            black_box(preds);
        })
    });
    group.finish();
}

fn bench_kmedoids(c: &mut Criterion) {
    let x = make_cluster_data(300, 6, 4);

    let mut group = c.benchmark_group("kmedoids");
    group.bench_function("fit_1200x6_k4", |b| {
        b.iter_batched(
            || KMedoids::new(4, 50).with_seed(7),
            |mut model| {
                model.fit(black_box(&x)).unwrap();
            },
            BatchSize::SmallInput,
        )
    });

    let mut fitted = KMedoids::new(4, 50).with_seed(7);
    fitted.fit(&x).unwrap();
    group.bench_function("predict_1200x6_k4", |b| {
        b.iter(|| {
            let preds = fitted.predict(black_box(&x)).unwrap();
            black_box(preds);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_seeding, bench_kmeans, bench_kmedoids);
criterion_main!(benches);
