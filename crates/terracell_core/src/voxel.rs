//! # Voxel Record
//!
//! A voxel is a block type plus an RGB tint, packed into 16 bytes so a
//! whole chunk can be viewed as raw bytes.
//!
//! ## Block Ids
//!
//! The block type doubles as an index into a flat tile atlas with
//! `tile_count` columns: tile `(type % tile_count, type / tile_count)`.
//! Type `0` is the empty/air sentinel.

use bytemuck::{Pod, Zeroable};

/// RGB tint in `[0, 1]` per channel.
pub type Tint = [f32; 3];

/// Neutral tint.
pub const WHITE: Tint = [1.0, 1.0, 1.0];

/// Well-known block kinds and their atlas tiles.
///
/// Any other non-zero id is a valid voxel type and is treated as an
/// opaque solid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum BlockType {
    /// Empty space.
    Air = 0,
    /// Stone.
    Stone = 2,
    /// Dirt.
    Dirt = 3,
    /// Sand (beaches, deserts).
    Sand = 11,
    /// Grass top, tinted per biome.
    Grass = 38,
    /// Water (liquid).
    Water = 46,
    /// Snow cap.
    Snow = 47,
}

impl BlockType {
    /// Returns the raw voxel type id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Looks up a known block kind by id.
    #[must_use]
    pub const fn from_id(id: u16) -> Option<Self> {
        match id {
            0 => Some(Self::Air),
            2 => Some(Self::Stone),
            3 => Some(Self::Dirt),
            11 => Some(Self::Sand),
            38 => Some(Self::Grass),
            46 => Some(Self::Water),
            47 => Some(Self::Snow),
            _ => None,
        }
    }

    /// Returns true for liquids.
    #[inline]
    #[must_use]
    pub const fn is_liquid(self) -> bool {
        matches!(self, Self::Water)
    }
}

/// A single voxel.
///
/// Layout (16 bytes, no implicit padding):
/// - `kind`: block type id (0 = empty)
/// - `_pad`: reserved, always zero
/// - `tint`: RGB tint
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Voxel {
    /// Block type id, also the tile atlas index.
    pub kind: u16,
    /// Padding for alignment.
    pub _pad: u16,
    /// Per-voxel color tint.
    pub tint: Tint,
}

impl Voxel {
    /// The empty voxel. Returned for every unwritten coordinate.
    pub const EMPTY: Self = Self {
        kind: 0,
        _pad: 0,
        tint: [0.0; 3],
    };

    /// Creates a voxel with an explicit tint.
    #[inline]
    #[must_use]
    pub const fn new(kind: u16, tint: Tint) -> Self {
        Self { kind, _pad: 0, tint }
    }

    /// Creates an untinted (white) voxel of a known block kind.
    #[inline]
    #[must_use]
    pub const fn of(block: BlockType) -> Self {
        Self::new(block.id(), WHITE)
    }

    /// Returns true if this is the empty sentinel.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.kind == 0
    }

    /// Returns true for liquid voxels.
    #[inline]
    #[must_use]
    pub const fn is_liquid(self) -> bool {
        match self.block() {
            Some(block) => block.is_liquid(),
            None => false,
        }
    }

    /// Returns true for non-empty, non-liquid voxels.
    #[inline]
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        !self.is_empty() && !self.is_liquid()
    }

    /// Returns the known block kind, if any.
    #[inline]
    #[must_use]
    pub const fn block(self) -> Option<BlockType> {
        BlockType::from_id(self.kind)
    }

    /// Atlas tile `(column, row)` for an atlas with `tile_count` columns.
    ///
    /// `tile_count` must be non-zero; `ChunkMesher` validates this.
    #[inline]
    #[must_use]
    pub const fn atlas_tile(self, tile_count: u16) -> (u16, u16) {
        (self.kind % tile_count, self.kind / tile_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voxel_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<Voxel>(), 16);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Voxel::default().is_empty());
        assert_eq!(Voxel::default(), Voxel::EMPTY);
    }

    #[test]
    fn test_categories() {
        assert!(Voxel::of(BlockType::Stone).is_opaque());
        assert!(Voxel::of(BlockType::Water).is_liquid());
        assert!(!Voxel::of(BlockType::Water).is_opaque());
        assert!(!Voxel::EMPTY.is_opaque());
        // Unknown ids are plain solids
        assert!(Voxel::new(200, WHITE).is_opaque());
        assert_eq!(Voxel::new(200, WHITE).block(), None);
    }

    #[test]
    fn test_voxel_liquid_follows_block() {
        for block in [
            BlockType::Air,
            BlockType::Stone,
            BlockType::Dirt,
            BlockType::Sand,
            BlockType::Grass,
            BlockType::Water,
            BlockType::Snow,
        ] {
            assert_eq!(Voxel::of(block).is_liquid(), block.is_liquid(), "{block:?}");
        }
        assert!(BlockType::Water.is_liquid());
        assert!(!Voxel::new(200, WHITE).is_liquid());
    }

    #[test]
    fn test_atlas_tile() {
        assert_eq!(Voxel::of(BlockType::Grass).atlas_tile(16), (6, 2));
        assert_eq!(Voxel::of(BlockType::Sand).atlas_tile(16), (11, 0));
        assert_eq!(Voxel::of(BlockType::Snow).atlas_tile(16), (15, 2));
    }

    #[test]
    fn test_block_roundtrip_ids() {
        for block in [
            BlockType::Air,
            BlockType::Stone,
            BlockType::Dirt,
            BlockType::Sand,
            BlockType::Grass,
            BlockType::Water,
            BlockType::Snow,
        ] {
            assert_eq!(BlockType::from_id(block.id()), Some(block));
        }
        assert_eq!(BlockType::from_id(1), None);
    }
}
