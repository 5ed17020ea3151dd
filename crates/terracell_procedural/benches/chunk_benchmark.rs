//! Benchmark for chunk generation performance.
//!
//! Run with: cargo bench --package terracell_procedural --bench chunk_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use terracell_core::{ChunkCoord, Extent3, VoxelChunkStore, WorldConfig};
use terracell_procedural::{populate, populate_parallel, GenerationPlan, TerrainGenerator};

fn generator(config: &WorldConfig) -> TerrainGenerator {
    TerrainGenerator::new(config).expect("default config is valid")
}

fn benchmark_single_chunk(c: &mut Criterion) {
    let gen = generator(&WorldConfig::default());

    c.bench_function("single_chunk_fill", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(gen.fill_chunk(ChunkCoord::new(coord, 0, coord / 2)))
        });
    });
}

fn benchmark_column_profile(c: &mut Criterion) {
    let gen = generator(&WorldConfig::default());

    c.bench_function("column_profile", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x = x.wrapping_add(1);
            black_box(gen.column_profile(black_box(x), black_box(x / 3)))
        });
    });
}

fn benchmark_populate(c: &mut Criterion) {
    let config = WorldConfig::default();
    let gen = generator(&config);
    let cell_count = Extent3::new(8, 1, 8);

    let mut group = c.benchmark_group("populate");
    group.throughput(Throughput::Elements(cell_count.volume() as u64));
    group.sample_size(10);

    group.bench_function("8x8_sequential", |b| {
        b.iter(|| {
            let store = VoxelChunkStore::new(config.cell_size).expect("valid cell size");
            black_box(populate(&gen, &store, GenerationPlan::new(cell_count)))
        });
    });

    group.bench_function("8x8_parallel", |b| {
        b.iter(|| {
            let store = VoxelChunkStore::new(config.cell_size).expect("valid cell size");
            black_box(populate_parallel(&gen, &store, GenerationPlan::new(cell_count)))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_chunk,
    benchmark_column_profile,
    benchmark_populate,
);
criterion_main!(benches);
