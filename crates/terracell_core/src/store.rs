//! # Voxel Chunk Store
//!
//! Sparse world storage: a map from chunk coordinate to dense chunk.
//!
//! - Reads never fail. An absent chunk reads as empty voxels.
//! - Writes create the backing chunk on first touch.
//! - Each chunk sits behind its own reader/writer lock, so picking and
//!   meshing can read while other chunks are being written.
//!
//! Every write also records which chunk meshes went stale (the written
//! chunk plus any neighbor sharing the written voxel's faces).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::chunk::{Chunk, ChunkCoord, Extent3};
use crate::error::TerraResult;
use crate::voxel::Voxel;

/// Shared handle to one chunk.
pub type ChunkHandle = Arc<RwLock<Chunk>>;

/// Thread-safe sparse voxel storage.
pub struct VoxelChunkStore {
    /// Chunk dimensions.
    cell_size: Extent3,
    /// Chunks indexed by coordinate.
    chunks: RwLock<HashMap<ChunkCoord, ChunkHandle>>,
    /// Chunks whose geometry is out of date.
    dirty: Mutex<HashSet<ChunkCoord>>,
}

impl VoxelChunkStore {
    /// Creates an empty store for chunks of `cell_size`.
    ///
    /// # Errors
    ///
    /// Returns an error if any component of `cell_size` is zero.
    pub fn new(cell_size: Extent3) -> TerraResult<Self> {
        let cell_size = cell_size.checked("cell_size")?;
        Ok(Self {
            cell_size,
            chunks: RwLock::new(HashMap::new()),
            dirty: Mutex::new(HashSet::new()),
        })
    }

    /// Chunk dimensions.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> Extent3 {
        self.cell_size
    }

    /// Chunk coordinate containing a world voxel.
    #[inline]
    #[must_use]
    pub const fn chunk_coord_of(&self, x: i32, y: i32, z: i32) -> ChunkCoord {
        self.cell_size.chunk_of(x, y, z)
    }

    /// World coordinate of a chunk's minimum corner.
    #[inline]
    #[must_use]
    pub const fn chunk_origin(&self, coord: ChunkCoord) -> [i32; 3] {
        self.cell_size.origin(coord)
    }

    /// Gets the voxel at world coordinates.
    ///
    /// Unwritten coordinates (absent chunk or empty cell) return
    /// [`Voxel::EMPTY`].
    #[must_use]
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> Voxel {
        let (coord, index) = self.cell_size.split(x, y, z);
        match self.chunk(coord) {
            Some(handle) => {
                let voxel = handle.read().get_index(index);
                voxel
            }
            None => Voxel::EMPTY,
        }
    }

    /// Sets the voxel at world coordinates, creating the chunk if needed.
    pub fn set_voxel(&self, x: i32, y: i32, z: i32, voxel: Voxel) {
        let (coord, index) = self.cell_size.split(x, y, z);
        let handle = self.chunk_or_create(coord);
        handle.write().set_index(index, voxel);

        let affected = self.affected_chunks(x, y, z);
        self.dirty.lock().extend(affected);
    }

    /// Chunks whose geometry depends on the voxel at `(x, y, z)`.
    ///
    /// This is the voxel's own chunk plus the chunk across each of its six
    /// faces, de-duplicated. Interior voxels map to a single chunk. Faces on
    /// the edge of the `i32` grid have no neighbor.
    #[must_use]
    pub fn affected_chunks(&self, x: i32, y: i32, z: i32) -> Vec<ChunkCoord> {
        let own = self.chunk_coord_of(x, y, z);
        let mut out = vec![own];
        for [dx, dy, dz] in ChunkCoord::FACE_OFFSETS {
            let (Some(nx), Some(ny), Some(nz)) =
                (x.checked_add(dx), y.checked_add(dy), z.checked_add(dz))
            else {
                continue;
            };
            let coord = self.chunk_coord_of(nx, ny, nz);
            if !out.contains(&coord) {
                out.push(coord);
            }
        }
        out
    }

    /// Returns the chunk handle if the chunk exists.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<ChunkHandle> {
        self.chunks.read().get(&coord).cloned()
    }

    /// Executes a closure with read access to a chunk.
    pub fn with_chunk<F, R>(&self, coord: ChunkCoord, f: F) -> Option<R>
    where
        F: FnOnce(&Chunk) -> R,
    {
        let handle = self.chunk(coord)?;
        let guard = handle.read();
        Some(f(&guard))
    }

    /// Returns true if the chunk has been created.
    #[must_use]
    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.read().contains_key(&coord)
    }

    /// Creates an empty chunk at `coord` if absent.
    ///
    /// Returns true if the chunk was newly created.
    pub fn ensure_chunk(&self, coord: ChunkCoord) -> bool {
        if self.contains_chunk(coord) {
            return false;
        }
        let mut chunks = self.chunks.write();
        if chunks.contains_key(&coord) {
            return false;
        }
        chunks.insert(coord, Arc::new(RwLock::new(Chunk::new(coord, self.cell_size))));
        tracing::debug!("created empty chunk ({}, {}, {})", coord.x, coord.y, coord.z);
        true
    }

    /// Stores a whole chunk, replacing any existing one at its coordinate.
    ///
    /// The chunk and its six neighbors are marked dirty, since boundary
    /// faces on both sides may change.
    ///
    /// # Panics
    ///
    /// Panics if the chunk extent differs from the store's cell size.
    pub fn insert_chunk(&self, chunk: Chunk) {
        assert_eq!(
            chunk.extent(),
            self.cell_size,
            "chunk extent does not match store cell size"
        );
        let coord = chunk.coord();
        if let Some(handle) = self.chunk(coord) {
            let mut guard = handle.write();
            *guard = chunk;
        } else {
            self.chunks
                .write()
                .insert(coord, Arc::new(RwLock::new(chunk)));
        }

        let mut dirty = self.dirty.lock();
        dirty.insert(coord);
        dirty.extend(coord.neighbors());
    }

    /// Unloads a chunk, returning its data if it existed.
    pub fn remove_chunk(&self, coord: ChunkCoord) -> Option<Chunk> {
        let handle = self.chunks.write().remove(&coord)?;
        self.dirty.lock().remove(&coord);
        let chunk = handle.read().clone();
        Some(chunk)
    }

    /// Returns and clears the set of chunks needing new geometry.
    ///
    /// Only coordinates of chunks that currently exist are returned, in
    /// ascending order.
    pub fn take_dirty_chunks(&self) -> Vec<ChunkCoord> {
        let drained: Vec<ChunkCoord> = self.dirty.lock().drain().collect();
        let chunks = self.chunks.read();
        let mut out: Vec<ChunkCoord> = drained
            .into_iter()
            .filter(|coord| chunks.contains_key(coord))
            .collect();
        out.sort_unstable();
        out
    }

    /// Number of chunks created so far.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.read().len()
    }

    /// Coordinates of all created chunks, in ascending order.
    #[must_use]
    pub fn chunk_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.read().keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    fn chunk_or_create(&self, coord: ChunkCoord) -> ChunkHandle {
        if let Some(handle) = self.chunk(coord) {
            return handle;
        }
        let mut chunks = self.chunks.write();
        Arc::clone(chunks.entry(coord).or_insert_with(|| {
            tracing::debug!("created chunk ({}, {}, {}) on write", coord.x, coord.y, coord.z);
            Arc::new(RwLock::new(Chunk::new(coord, self.cell_size)))
        }))
    }
}
