//! # Terracell Meshing
//!
//! Turns stored chunks into flat geometry buffers.
//!
//! Every solid voxel face that is not hidden by its neighbor becomes one
//! quad: four vertices with position, normal, atlas UV and tint, and six
//! indices. Buffers carry no renderer types.
//!
//! ## Example
//!
//! ```rust
//! use terracell_core::{BlockType, ChunkCoord, Extent3, Voxel, VoxelChunkStore};
//! use terracell_meshing::ChunkMesher;
//!
//! let store = VoxelChunkStore::new(Extent3::new(16, 16, 16)).unwrap();
//! store.set_voxel(3, 3, 3, Voxel::of(BlockType::Stone));
//!
//! let mesher = ChunkMesher::new(16).unwrap();
//! let mesh = mesher.build_mesh(&store, ChunkCoord::new(0, 0, 0));
//! assert_eq!(mesh.vertex_count(), 24);
//! assert_eq!(mesh.indices.len(), 36);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod face;
pub mod mesher;

pub use face::{Corner, Face, FACES};
pub use mesher::{ChunkMesher, LayeredMesh, MeshBuffers};
