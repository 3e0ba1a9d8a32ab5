//! Benchmarks for point-pattern algorithms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geopattern_algorithms::interpolation::{idw_interpolate, IdwParams};
use geopattern_algorithms::pattern::{distance_matrix, nearest_neighbor_distances_indexed, Metric};
use geopattern_algorithms::statistics::{focal_smooth, FocalParams};
use geopattern_algorithms::gridding::rasterize;
use geopattern_algorithms::statistics::Reducer;
use geopattern_algorithms::tessellation::voronoi;
use geopattern_core::{BoundingExtent, Grid, Point, PointSet, CRS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZE: f64 = 10_000.0;

fn create_points(n: usize) -> PointSet {
    let mut rng = StdRng::seed_from_u64(1);
    let points = (0..n)
        .map(|_| {
            Point::new(rng.random_range(0.0..SIZE), rng.random_range(0.0..SIZE))
                .with_attribute("nbikes", rng.random_range(0..40_i64))
        })
        .collect();
    PointSet::new(points, CRS::british_national_grid()).unwrap()
}

fn extent() -> BoundingExtent {
    BoundingExtent::new(0.0, 0.0, SIZE, SIZE).unwrap()
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_neighbour");

    for n in [1_000, 4_000].iter() {
        let points = create_points(*n);
        group.bench_with_input(BenchmarkId::new("matrix", n), n, |b, _| {
            b.iter(|| distance_matrix(black_box(&points), Metric::Euclidean).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("kdtree", n), n, |b, _| {
            b.iter(|| nearest_neighbor_distances_indexed(black_box(&points)).unwrap())
        });
    }

    group.finish();
}

fn bench_voronoi(c: &mut Criterion) {
    let mut group = c.benchmark_group("voronoi");

    for n in [1_000, 10_000, 50_000].iter() {
        let points = create_points(*n);
        let clip = extent();
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| voronoi(black_box(&points), &clip).unwrap())
        });
    }

    group.finish();
}

fn bench_surfaces(c: &mut Criterion) {
    let mut group = c.benchmark_group("surfaces");
    let points = create_points(800);

    for cells in [128, 512].iter() {
        let grid = Grid::new(extent(), *cells, *cells, CRS::british_national_grid()).unwrap();

        group.bench_with_input(BenchmarkId::new("idw_local", cells), cells, |b, _| {
            let params = IdwParams {
                max_points: Some(12),
                ..Default::default()
            };
            b.iter(|| idw_interpolate(black_box(&points), "nbikes", &grid, params.clone()).unwrap())
        });

        let counts = rasterize(&points, &grid, "nbikes", Reducer::Count).unwrap();
        group.bench_with_input(BenchmarkId::new("focal_fill", cells), cells, |b, _| {
            let params = FocalParams {
                window_size: 5,
                fill_only_missing: true,
                ..Default::default()
            };
            b.iter(|| focal_smooth(black_box(&counts), params.clone()).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_nearest, bench_voronoi, bench_surfaces);
criterion_main!(benches);
