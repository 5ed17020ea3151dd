//! # Chunk Mesher
//!
//! Face-culling geometry extraction: one quad per exposed unit face, no
//! merging. Positions are chunk-local; place the mesh at
//! [`MeshBuffers::origin`].
//!
//! ## Occlusion
//!
//! A face is hidden when the neighbor across it is opaque, or when both the
//! voxel and its neighbor are liquid. Air and liquid never hide an opaque
//! face, so terrain under water keeps its faces and the water surface is
//! drawn only where it meets air.
//!
//! ## Neighbors
//!
//! Meshing reads a snapshot of the chunk plus a one-voxel border taken from
//! the store. Border voxels from absent chunks read as air, so meshing never
//! waits on neighbors being generated.

use bytemuck::cast_slice;
use terracell_core::{ChunkCoord, Extent3, TerraError, TerraResult, Voxel, VoxelChunkStore};

use crate::face::FACES;

// =============================================================================
// MESH OUTPUT
// =============================================================================

/// Flat geometry buffers for one chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions, 3 floats each, chunk-local.
    pub positions: Vec<f32>,
    /// Vertex normals, 3 floats each.
    pub normals: Vec<f32>,
    /// Atlas UVs, 2 floats each, `v` flipped.
    pub uvs: Vec<f32>,
    /// Vertex tints, 3 floats each.
    pub colors: Vec<f32>,
    /// Triangle indices.
    pub indices: Vec<u32>,
    /// World position of the chunk's minimum corner.
    pub origin: [i32; 3],
}

impl MeshBuffers {
    fn with_origin(origin: [i32; 3]) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of quads (two triangles each).
    #[inline]
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Returns true if no faces were emitted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position data as raw bytes.
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        cast_slice(&self.positions)
    }

    /// Index data as raw bytes.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        cast_slice(&self.indices)
    }
}

/// Opaque terrain and liquid geometry of one chunk, kept apart so each can
/// use its own material.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayeredMesh {
    /// Every non-liquid face.
    pub terrain: MeshBuffers,
    /// Liquid faces.
    pub water: MeshBuffers,
}

// =============================================================================
// NEIGHBORHOOD SNAPSHOT
// =============================================================================

/// Chunk voxels plus a one-voxel border, `y`-major.
struct Neighborhood {
    /// Padded size per axis.
    size: [usize; 3],
    /// Padded voxel data.
    voxels: Vec<Voxel>,
}

impl Neighborhood {
    /// Snapshots a chunk and its border, or `None` if the chunk is absent.
    fn capture(store: &VoxelChunkStore, coord: ChunkCoord) -> Option<Self> {
        let inner = store.with_chunk(coord, |chunk| chunk.voxels().to_vec())?;
        let extent = store.cell_size();
        let (sx, sy, sz) = (extent.x as usize, extent.y as usize, extent.z as usize);
        let size = [sx + 2, sy + 2, sz + 2];
        let [ox, oy, oz] = extent.origin(coord);

        let mut voxels = Vec::with_capacity(size[0] * size[1] * size[2]);
        for py in 0..size[1] {
            for pz in 0..size[2] {
                for px in 0..size[0] {
                    let interior = (1..=sx).contains(&px)
                        && (1..=sy).contains(&py)
                        && (1..=sz).contains(&pz);
                    let voxel = if interior {
                        inner[(py - 1) * sx * sz + (pz - 1) * sx + (px - 1)]
                    } else {
                        border_voxel(store, [ox, oy, oz], [px, py, pz])
                    };
                    voxels.push(voxel);
                }
            }
        }
        Some(Self { size, voxels })
    }

    /// Voxel at padded coordinates.
    #[inline]
    fn get(&self, x: usize, y: usize, z: usize) -> Voxel {
        self.voxels[y * self.size[0] * self.size[2] + z * self.size[0] + x]
    }
}

/// Border voxel at padded coordinates; air past the edge of the `i32` grid.
fn border_voxel(store: &VoxelChunkStore, origin: [i32; 3], padded: [usize; 3]) -> Voxel {
    let mut world = [0; 3];
    for ((w, o), p) in world.iter_mut().zip(origin).zip(padded) {
        match o.checked_add(p as i32 - 1) {
            Some(v) => *w = v,
            None => return Voxel::EMPTY,
        }
    }
    store.get_voxel(world[0], world[1], world[2])
}

/// Returns true if `neighbor` hides the face of `voxel` it touches.
#[inline]
fn occludes(voxel: Voxel, neighbor: Voxel) -> bool {
    neighbor.is_opaque() || (voxel.is_liquid() && neighbor.is_liquid())
}

// =============================================================================
// MESHER
// =============================================================================

/// Face-culling mesher for a fixed tile atlas.
#[derive(Clone, Copy, Debug)]
pub struct ChunkMesher {
    /// Atlas columns.
    tile_count: u16,
}

impl ChunkMesher {
    /// Creates a mesher for an atlas with `tile_count` columns.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::InvalidTileCount`] for zero.
    pub fn new(tile_count: u16) -> TerraResult<Self> {
        if tile_count == 0 {
            return Err(TerraError::InvalidTileCount(tile_count));
        }
        Ok(Self { tile_count })
    }

    /// Atlas columns.
    #[inline]
    #[must_use]
    pub const fn tile_count(&self) -> u16 {
        self.tile_count
    }

    /// Builds geometry for every visible face of a chunk.
    ///
    /// Absent chunks produce empty buffers.
    #[must_use]
    pub fn build_mesh(&self, store: &VoxelChunkStore, coord: ChunkCoord) -> MeshBuffers {
        let origin = store.chunk_origin(coord);
        let Some(hood) = Neighborhood::capture(store, coord) else {
            return MeshBuffers::with_origin(origin);
        };
        let mut mesh = MeshBuffers::with_origin(origin);
        self.emit(&hood, store.cell_size(), &mut mesh, |_| true);
        tracing::trace!(
            "meshed chunk ({}, {}, {}): {} quads",
            coord.x,
            coord.y,
            coord.z,
            mesh.quad_count()
        );
        mesh
    }

    /// Builds terrain and liquid geometry as separate buffers.
    ///
    /// Together they hold exactly the faces of [`Self::build_mesh`].
    #[must_use]
    pub fn build_layered(&self, store: &VoxelChunkStore, coord: ChunkCoord) -> LayeredMesh {
        let origin = store.chunk_origin(coord);
        let mut layered = LayeredMesh {
            terrain: MeshBuffers::with_origin(origin),
            water: MeshBuffers::with_origin(origin),
        };
        if let Some(hood) = Neighborhood::capture(store, coord) {
            let extent = store.cell_size();
            self.emit(&hood, extent, &mut layered.terrain, |v| !v.is_liquid());
            self.emit(&hood, extent, &mut layered.water, Voxel::is_liquid);
        }
        layered
    }

    /// Rebuilds every chunk the store reports as dirty.
    ///
    /// Drains the store's dirty set; results are in ascending coordinate
    /// order.
    #[must_use]
    pub fn remesh_dirty(&self, store: &VoxelChunkStore) -> Vec<(ChunkCoord, MeshBuffers)> {
        let dirty = store.take_dirty_chunks();
        if dirty.is_empty() {
            return Vec::new();
        }
        tracing::debug!("remeshing {} dirty chunks", dirty.len());
        dirty
            .into_iter()
            .map(|coord| (coord, self.build_mesh(store, coord)))
            .collect()
    }

    /// Appends the faces of every voxel accepted by `include`.
    fn emit<F>(&self, hood: &Neighborhood, extent: Extent3, mesh: &mut MeshBuffers, include: F)
    where
        F: Fn(Voxel) -> bool,
    {
        let tc = f32::from(self.tile_count);
        let (sx, sy, sz) = (extent.x as usize, extent.y as usize, extent.z as usize);

        for y in 0..sy {
            for z in 0..sz {
                for x in 0..sx {
                    let voxel = hood.get(x + 1, y + 1, z + 1);
                    if voxel.is_empty() || !include(voxel) {
                        continue;
                    }
                    let (tile_x, tile_y) = voxel.atlas_tile(self.tile_count);
                    let (tile_x, tile_y) = (f32::from(tile_x), f32::from(tile_y));

                    for face in &FACES {
                        let neighbor = hood.get(
                            (x as i32 + 1 + face.dir[0]) as usize,
                            (y as i32 + 1 + face.dir[1]) as usize,
                            (z as i32 + 1 + face.dir[2]) as usize,
                        );
                        if occludes(voxel, neighbor) {
                            continue;
                        }

                        let base = mesh.vertex_count() as u32;
                        for c in &face.corners {
                            mesh.positions.extend_from_slice(&[
                                x as f32 + f32::from(c.pos[0]),
                                y as f32 + f32::from(c.pos[1]),
                                z as f32 + f32::from(c.pos[2]),
                            ]);
                            mesh.normals.extend(face.dir.map(|d| d as f32));
                            mesh.uvs.extend_from_slice(&[
                                (tile_x + f32::from(c.uv[0])) / tc,
                                1.0 - (tile_y + f32::from(c.uv[1])) / tc,
                            ]);
                            mesh.colors.extend_from_slice(&voxel.tint);
                        }
                        mesh.indices.extend_from_slice(&[
                            base,
                            base + 1,
                            base + 2,
                            base + 2,
                            base + 1,
                            base + 3,
                        ]);
                    }
                }
            }
        }
    }
}
