//! # Ray Cast Scenarios
//!
//! Picking against small hand-built scenes.

use terracell_core::{cast_ray, BlockType, Extent3, TerraError, Voxel, VoxelChunkStore};

fn floor_scene() -> VoxelChunkStore {
    let store = VoxelChunkStore::new(Extent3::new(16, 32, 16)).unwrap();
    for x in -8..8 {
        for z in -8..8 {
            store.set_voxel(x, 0, z, Voxel::of(BlockType::Grass));
        }
    }
    store
}

/// Test: the canonical straight-down pick.
#[test]
fn test_pick_from_above() {
    let store = VoxelChunkStore::new(Extent3::new(16, 32, 16)).unwrap();
    store.set_voxel(0, 0, 0, Voxel::of(BlockType::Stone));

    let hit = cast_ray(&store, [0.5, 5.0, 0.5], [0.5, -5.0, 0.5])
        .unwrap()
        .expect("should hit the stone");
    assert!((hit.position[1] - 1.0).abs() < 1e-9, "hit y = {}", hit.position[1]);
    assert_eq!(hit.normal, [0, 1, 0]);
    assert_eq!(hit.voxel, Voxel::of(BlockType::Stone));
}

/// Test: picks across a chunk boundary into negative coordinates.
#[test]
fn test_pick_across_chunks() {
    let store = floor_scene();
    let hit = cast_ray(&store, [3.2, 6.0, 3.7], [-5.4, -1.0, -4.1])
        .unwrap()
        .expect("should hit the floor");
    assert_eq!(hit.voxel_coord[1], 0);
    assert_eq!(hit.normal, [0, 1, 0]);
    assert_eq!(hit.placement_coord()[1], 1);
    assert!(hit.voxel_coord[0] < 0 || hit.voxel_coord[2] < 0);
}

/// Test: a side hit reports the side normal.
#[test]
fn test_pick_wall_side() {
    let store = VoxelChunkStore::new(Extent3::new(16, 32, 16)).unwrap();
    for y in 0..4 {
        for z in -2..3 {
            store.set_voxel(10, y, z, Voxel::of(BlockType::Stone));
        }
    }
    let hit = cast_ray(&store, [0.5, 1.5, 0.5], [20.5, 1.5, 0.5])
        .unwrap()
        .expect("should hit the wall");
    assert_eq!(hit.voxel_coord, [10, 1, 0]);
    assert_eq!(hit.normal, [-1, 0, 0]);
    assert_eq!(hit.placement_coord(), [9, 1, 0]);
    assert!((hit.distance - 9.5).abs() < 1e-9);
}

/// Test: looking away from the floor misses.
#[test]
fn test_pick_misses_upward() {
    let store = floor_scene();
    let hit = cast_ray(&store, [0.5, 2.0, 0.5], [3.0, 40.0, 1.0]).unwrap();
    assert!(hit.is_none());
}

/// Test: zero-length rays are rejected rather than dividing by zero.
#[test]
fn test_degenerate_ray() {
    let store = floor_scene();
    assert!(matches!(
        cast_ray(&store, [0.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
        Err(TerraError::DegenerateRay)
    ));
}
