//! # Terracell Procedural Generation
//!
//! Deterministic world generation for reproducible voxel worlds.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same world
//! 2. **Chunked**: World is generated in fixed-size chunks
//! 3. **Order-free**: Chunks can be generated in any order, on any thread
//!
//! ## Core Components
//!
//! - `NoiseField`: smoothed, interpolated multi-octave value noise
//! - `BiomeField`: jittered Voronoi biome cells with boundary-aware blending
//! - `TerrainGenerator`: per-column height, surface block and tint
//! - `GenerationPlan`: chunk-at-a-time work queue with progress
//!
//! ## Example
//!
//! ```rust
//! use terracell_core::{VoxelChunkStore, WorldConfig};
//! use terracell_procedural::{populate, GenerationPlan, TerrainGenerator};
//!
//! let config = WorldConfig::default();
//! let generator = TerrainGenerator::new(&config).unwrap();
//! let store = VoxelChunkStore::new(config.cell_size).unwrap();
//!
//! populate(&generator, &store, GenerationPlan::new(config.cell_count));
//! assert_eq!(store.chunk_count(), 16);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod color;
pub mod noise;
pub mod pipeline;
pub mod terrain;

pub use biome::{Biome, BiomeCandidate, BiomeField, BiomeKind, BiomeWeight};
pub use color::hsb_to_rgb;
pub use noise::{clamp01, sample, NoiseField, WorldSeed};
pub use pipeline::{populate, populate_parallel, GenerationPlan, GenerationStep};
pub use terrain::{ColumnProfile, TerrainGenerator};
