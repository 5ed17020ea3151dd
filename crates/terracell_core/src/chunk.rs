//! # Chunk System
//!
//! World data is organized into fixed-size dense chunks. A world coordinate
//! splits into a chunk coordinate (`floor(v / size)` per axis) and a local
//! coordinate (`v mod size`, always non-negative).
//!
//! ## Storage Order
//!
//! Voxels are stored `y`-major: `index = y * sx * sz + z * sx + x`.

use serde::{Deserialize, Serialize};

use crate::error::{TerraError, TerraResult};
use crate::voxel::Voxel;

/// Unsigned 3D extent (chunk size, chunk count, biome size).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent3 {
    /// Size along X.
    pub x: u32,
    /// Size along Y.
    pub y: u32,
    /// Size along Z.
    pub z: u32,
}

impl Extent3 {
    /// Creates an extent without validation.
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Returns the extent if every component is positive and fits in `i32`.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::InvalidExtent`] naming `field` otherwise.
    pub fn checked(self, field: &'static str) -> TerraResult<Self> {
        let limit = i32::MAX as u32;
        let valid = [self.x, self.y, self.z]
            .iter()
            .all(|&v| v > 0 && v <= limit);
        if valid {
            Ok(self)
        } else {
            Err(TerraError::InvalidExtent {
                field,
                x: self.x,
                y: self.y,
                z: self.z,
            })
        }
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub const fn volume(self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Components as signed integers.
    #[inline]
    #[must_use]
    pub const fn as_i32(self) -> [i32; 3] {
        [self.x as i32, self.y as i32, self.z as i32]
    }

    /// Chunk coordinate containing a world voxel.
    #[inline]
    #[must_use]
    pub const fn chunk_of(self, x: i32, y: i32, z: i32) -> ChunkCoord {
        let [sx, sy, sz] = self.as_i32();
        ChunkCoord::new(x.div_euclid(sx), y.div_euclid(sy), z.div_euclid(sz))
    }

    /// Local coordinate of a world voxel inside its chunk.
    ///
    /// Always lands in `[0, size)` per axis, negative inputs included.
    #[inline]
    #[must_use]
    pub const fn local_of(self, x: i32, y: i32, z: i32) -> [usize; 3] {
        let [sx, sy, sz] = self.as_i32();
        [
            x.rem_euclid(sx) as usize,
            y.rem_euclid(sy) as usize,
            z.rem_euclid(sz) as usize,
        ]
    }

    /// Flat storage index of a local coordinate.
    ///
    /// Returns `None` if the local coordinate lies outside the extent.
    #[inline]
    #[must_use]
    pub const fn local_index(self, x: usize, y: usize, z: usize) -> Option<usize> {
        let (sx, sy, sz) = (self.x as usize, self.y as usize, self.z as usize);
        if x < sx && y < sy && z < sz {
            Some(y * sx * sz + z * sx + x)
        } else {
            None
        }
    }

    /// Splits a world coordinate into chunk coordinate and flat index.
    #[inline]
    #[must_use]
    pub const fn split(self, x: i32, y: i32, z: i32) -> (ChunkCoord, usize) {
        let [lx, ly, lz] = self.local_of(x, y, z);
        let (sx, sz) = (self.x as usize, self.z as usize);
        (self.chunk_of(x, y, z), ly * sx * sz + lz * sx + lx)
    }

    /// World coordinate of a chunk's minimum corner.
    #[inline]
    #[must_use]
    pub const fn origin(self, coord: ChunkCoord) -> [i32; 3] {
        let [sx, sy, sz] = self.as_i32();
        [coord.x * sx, coord.y * sy, coord.z * sz]
    }
}

/// Chunk coordinate (in chunks, not voxels).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Offsets to the six face-adjacent chunks: -X, +X, -Y, +Y, -Z, +Z.
    pub const FACE_OFFSETS: [[i32; 3]; 6] = [
        [-1, 0, 0],
        [1, 0, 0],
        [0, -1, 0],
        [0, 1, 0],
        [0, 0, -1],
        [0, 0, 1],
    ];

    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this coordinate moved by `(dx, dy, dz)` chunks.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The six face-adjacent chunk coordinates.
    #[must_use]
    pub fn neighbors(self) -> [Self; 6] {
        Self::FACE_OFFSETS.map(|[dx, dy, dz]| self.offset(dx, dy, dz))
    }
}

/// A dense block of voxels.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    /// Chunk position in the world.
    coord: ChunkCoord,
    /// Chunk dimensions.
    extent: Extent3,
    /// Voxel data, `y`-major.
    voxels: Box<[Voxel]>,
}

impl Chunk {
    /// Creates an all-empty chunk.
    #[must_use]
    pub fn new(coord: ChunkCoord, extent: Extent3) -> Self {
        Self {
            coord,
            extent,
            voxels: vec![Voxel::EMPTY; extent.volume()].into_boxed_slice(),
        }
    }

    /// Wraps pre-filled voxel data.
    ///
    /// # Panics
    ///
    /// Panics if `voxels.len()` differs from `extent.volume()`; that is a
    /// bug in the caller, not a runtime condition.
    #[must_use]
    pub fn from_voxels(coord: ChunkCoord, extent: Extent3, voxels: Vec<Voxel>) -> Self {
        assert_eq!(
            voxels.len(),
            extent.volume(),
            "voxel buffer does not match chunk extent"
        );
        Self {
            coord,
            extent,
            voxels: voxels.into_boxed_slice(),
        }
    }

    /// Chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Chunk dimensions.
    #[inline]
    #[must_use]
    pub const fn extent(&self) -> Extent3 {
        self.extent
    }

    /// World coordinate of the minimum corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> [i32; 3] {
        self.extent.origin(self.coord)
    }

    /// Gets a voxel at local coordinates. Outside the extent is empty.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Voxel {
        self.extent
            .local_index(x, y, z)
            .map_or(Voxel::EMPTY, |i| self.voxels[i])
    }

    /// Sets a voxel at local coordinates.
    ///
    /// Returns false (and writes nothing) outside the extent.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: Voxel) -> bool {
        match self.extent.local_index(x, y, z) {
            Some(i) => {
                self.voxels[i] = voxel;
                true
            }
            None => false,
        }
    }

    /// Gets a voxel by flat index.
    #[inline]
    #[must_use]
    pub fn get_index(&self, index: usize) -> Voxel {
        self.voxels.get(index).copied().unwrap_or(Voxel::EMPTY)
    }

    /// Sets a voxel by flat index. Out-of-range indices are ignored.
    #[inline]
    pub fn set_index(&mut self, index: usize, voxel: Voxel) {
        if let Some(slot) = self.voxels.get_mut(index) {
            *slot = voxel;
        }
    }

    /// All voxels in storage order.
    #[inline]
    #[must_use]
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Raw bytes of the voxel array.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.voxels)
    }

    /// Number of non-empty voxels.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| !v.is_empty()).count()
    }

    /// Returns true if every voxel is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voxels.iter().all(|v| v.is_empty())
    }
}
