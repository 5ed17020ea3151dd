//! # Terrain Quality Tests
//!
//! Verifies that generated terrain is reproducible, layered the way the
//! column model says, and free of hard seams between biomes.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use terracell_core::{BlockType, ChunkCoord, Extent3, VoxelChunkStore, WorldConfig};
use terracell_procedural::{populate, populate_parallel, GenerationPlan, TerrainGenerator};

fn config(seed: f64) -> WorldConfig {
    WorldConfig {
        seed,
        ..WorldConfig::default()
    }
}

/// Test: the same chunk generated twice is byte-identical.
#[test]
fn test_determinism() {
    let a = TerrainGenerator::new(&config(42.0)).unwrap();
    let b = TerrainGenerator::new(&config(42.0)).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..12 {
        let coord = ChunkCoord::new(rng.gen_range(-50..50), 0, rng.gen_range(-50..50));
        let first = a.fill_chunk(coord);
        let again = a.fill_chunk(coord);
        let fresh = b.fill_chunk(coord);
        assert_eq!(first.as_bytes(), again.as_bytes());
        assert_eq!(first.as_bytes(), fresh.as_bytes());
    }
}

/// Test: different seeds give different worlds.
#[test]
fn test_seed_changes_world() {
    let a = TerrainGenerator::new(&config(1.0)).unwrap();
    let b = TerrainGenerator::new(&config(2.0)).unwrap();
    let coord = ChunkCoord::new(3, 0, 3);
    assert_ne!(a.fill_chunk(coord).as_bytes(), b.fill_chunk(coord).as_bytes());
}

/// Test: generation order and threading do not change the result.
#[test]
fn test_out_of_order_and_concurrent_fill() {
    let reference = TerrainGenerator::new(&config(7.0)).unwrap();
    let shared = Arc::new(TerrainGenerator::new(&config(7.0)).unwrap());

    let coords: Vec<ChunkCoord> = (-3..3)
        .flat_map(|x| (-3..3).map(move |z| ChunkCoord::new(x, 0, z)))
        .collect();

    let threads: Vec<_> = (0..4)
        .map(|t| {
            let shared = Arc::clone(&shared);
            let mut mine: Vec<ChunkCoord> = coords.clone();
            if t % 2 == 1 {
                mine.reverse();
            }
            std::thread::spawn(move || {
                mine.into_iter()
                    .map(|c| (c, shared.fill_chunk(c)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in threads {
        for (coord, chunk) in handle.join().unwrap() {
            assert_eq!(chunk.as_bytes(), reference.fill_chunk(coord).as_bytes());
        }
    }
}

/// Test: sequential and parallel population store the same world.
#[test]
fn test_parallel_population_matches_sequential() {
    let cfg = config(99.0);
    let generator = TerrainGenerator::new(&cfg).unwrap();

    let sequential = VoxelChunkStore::new(cfg.cell_size).unwrap();
    let parallel = VoxelChunkStore::new(cfg.cell_size).unwrap();
    let plan = GenerationPlan::new(Extent3::new(4, 2, 4));

    assert_eq!(populate(&generator, &sequential, plan.clone()), 32);
    assert_eq!(populate_parallel(&generator, &parallel, plan), 32);

    assert_eq!(sequential.chunk_coords(), parallel.chunk_coords());
    for coord in sequential.chunk_coords() {
        let a = sequential.with_chunk(coord, |c| c.as_bytes().to_vec()).unwrap();
        let b = parallel.with_chunk(coord, |c| c.as_bytes().to_vec()).unwrap();
        assert_eq!(a, b, "chunk {coord:?} differs");
    }
}

/// Test: columns are layered stone, dirt, surface, then water or air.
#[test]
fn test_column_layers() {
    let generator = TerrainGenerator::new(&config(3.0)).unwrap();
    let chunk = generator.fill_chunk(ChunkCoord::new(0, 0, 0));
    let water_level = generator.water_level();

    for z in 0..16 {
        for x in 0..16 {
            let profile = generator.column_profile(x as i32, z as i32);
            let top = profile.height.floor() as usize;
            assert!(top < 32, "height {} escapes the chunk", profile.height);

            assert_eq!(chunk.get(x, top, z).kind, profile.surface.id());
            assert_eq!(chunk.get(x, 0, z).kind, BlockType::Stone.id());
            for y in top + 1..32 {
                let expected = if y as f64 <= water_level {
                    BlockType::Water
                } else {
                    BlockType::Air
                };
                assert_eq!(chunk.get(x, y, z).kind, expected.id());
            }
        }
    }
}

/// Test: everything above the terrain is air and everything below is stone.
#[test]
fn test_chunks_above_and_below() {
    let generator = TerrainGenerator::new(&config(11.0)).unwrap();
    assert!(generator.fill_chunk(ChunkCoord::new(2, 1, -1)).is_empty());

    let below = generator.fill_chunk(ChunkCoord::new(2, -1, -1));
    assert!(below
        .voxels()
        .iter()
        .all(|v| v.kind == BlockType::Stone.id()));
}

/// Test: a generated world uses several block kinds.
#[test]
fn test_terrain_variety() {
    let cfg = config(5.0);
    let generator = TerrainGenerator::new(&cfg).unwrap();
    let mut kinds = std::collections::HashSet::new();
    for cz in -4..4 {
        for cx in -4..4 {
            let chunk = generator.fill_chunk(ChunkCoord::new(cx, 0, cz));
            kinds.extend(chunk.voxels().iter().map(|v| v.kind));
        }
    }
    println!("Block kinds present: {kinds:?}");
    assert!(kinds.contains(&BlockType::Stone.id()));
    assert!(kinds.contains(&BlockType::Dirt.id()));
    assert!(kinds.len() >= 4, "world is too uniform: {kinds:?}");
}

/// Sum of height jumps where the nearest biome changes, plus the mean and
/// max jump over the whole line.
fn seam_stats(generator: &TerrainGenerator, partition: &TerrainGenerator) -> (f64, f64, f64) {
    let mut seam_total = 0.0;
    let mut total = 0.0;
    let mut max: f64 = 0.0;
    let mut samples = 0;

    for z in [-301, -97, 5, 143, 388] {
        let mut prev_height = generator.column_profile(-2000, z).height;
        let mut prev_grid = partition.biomes().biomes_near(-2000.0, f64::from(z))[0].biome.grid;
        for x in -1999..2000 {
            let height = generator.column_profile(x, z).height;
            let grid = partition.biomes().biomes_near(f64::from(x), f64::from(z))[0].biome.grid;
            let jump = (height - prev_height).abs();
            if grid != prev_grid {
                seam_total += jump;
            }
            total += jump;
            max = max.max(jump);
            samples += 1;
            prev_height = height;
            prev_grid = grid;
        }
    }
    (seam_total, total / f64::from(samples), max)
}

/// Test: blending removes the height steps a hard Voronoi partition has.
#[test]
fn test_biome_boundary_continuity() {
    let blended = TerrainGenerator::new(&config(2024.0)).unwrap();
    let mut hard_cfg = config(2024.0);
    hard_cfg.biome.core_ratio = 1.0;
    let hard = TerrainGenerator::new(&hard_cfg).unwrap();

    let (blended_seams, blended_mean, blended_max) = seam_stats(&blended, &blended);
    let (hard_seams, hard_mean, hard_max) = seam_stats(&hard, &blended);

    println!("Blended: seams {blended_seams:.2}, mean {blended_mean:.4}, max {blended_max:.3}");
    println!("Hard:    seams {hard_seams:.2}, mean {hard_mean:.4}, max {hard_max:.3}");

    assert!(
        blended_seams < hard_seams,
        "blending should shrink seam steps ({blended_seams:.2} vs {hard_seams:.2})"
    );
    assert!(blended_mean < 1.5, "terrain too jagged: mean step {blended_mean:.3}");
    assert!(blended_max <= 2.0, "cliff of {blended_max:.2}");
    assert!(hard_max > blended_max, "hard partition should step more, max {hard_max:.2}");
}

/// Test: no column step where the nearest biome changes exceeds two blocks.
#[test]
fn test_no_cliffs_at_biome_seams() {
    let generator = TerrainGenerator::new(&config(2024.0)).unwrap();
    let biomes = generator.biomes();

    let mut worst = (0.0, 0, 0);
    let mut seams = 0;
    for z in (-600..600).step_by(14) {
        let mut prev = generator.column_profile(-601, z).height;
        let mut prev_site = biomes.blend_weights(-601.0, f64::from(z))[0].biome.grid;
        for x in -600..600 {
            let height = generator.column_profile(x, z).height;
            let site = biomes.blend_weights(f64::from(x), f64::from(z))[0].biome.grid;
            let jump = (height - prev).abs();
            if site != prev_site {
                seams += 1;
                if jump > worst.0 {
                    worst = (jump, x, z);
                }
            }
            prev = height;
            prev_site = site;
        }
    }

    println!("{seams} seam crossings, worst step {:.3} at ({}, {})", worst.0, worst.1, worst.2);
    assert!(seams > 500, "sweep crossed too few seams: {seams}");
    assert!(worst.0 <= 2.0, "cliff of {:.3} at ({}, {})", worst.0, worst.1, worst.2);

    // Two sites close together: the blend still spreads over several columns
    let step = (generator.column_profile(482, -544).height
        - generator.column_profile(481, -544).height)
        .abs();
    assert!(step <= 2.0, "step of {step:.3} between close sites");
}
