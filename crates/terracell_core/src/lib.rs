//! # Terracell Core
//!
//! Voxel storage and queries for a procedurally generated block world.
//!
//! ## Core Components
//!
//! - `Voxel`: 16-byte block record (type id + RGB tint)
//! - `Chunk`: dense fixed-size block of voxels
//! - `VoxelChunkStore`: sparse, thread-safe map of chunks addressed by world
//!   coordinates, with dirty tracking for remeshing
//! - `cast_ray` / `VoxelRayCaster`: DDA picking against the store
//! - `WorldConfig`: every tunable, loadable from TOML
//!
//! ## Example
//!
//! ```rust
//! use terracell_core::{cast_ray, BlockType, Extent3, Voxel, VoxelChunkStore};
//!
//! let store = VoxelChunkStore::new(Extent3::new(16, 32, 16)).unwrap();
//! store.set_voxel(0, 0, 0, Voxel::of(BlockType::Stone));
//!
//! let hit = cast_ray(&store, [0.5, 5.0, 0.5], [0.5, -5.0, 0.5]).unwrap().unwrap();
//! assert_eq!(hit.normal, [0, 1, 0]);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod config;
pub mod error;
pub mod raycast;
pub mod store;
pub mod voxel;

pub use chunk::{Chunk, ChunkCoord, Extent3};
pub use config::{BiomeSettings, NoiseSettings, TerrainSettings, WorldConfig};
pub use error::{TerraError, TerraResult};
pub use raycast::{cast_ray, RayHit, VoxelRayCaster, VoxelSource};
pub use store::{ChunkHandle, VoxelChunkStore};
pub use voxel::{BlockType, Tint, Voxel, WHITE};
