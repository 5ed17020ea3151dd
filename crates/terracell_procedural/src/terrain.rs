//! # Terrain Generator
//!
//! Combines the height noise with the biome partition into voxels.
//!
//! ## Column Model
//!
//! Every XZ column gets one [`ColumnProfile`]: a surface height, the surface
//! block and a tint. Voxels in the column are then classified top-down:
//!
//! | Condition                          | Block   |
//! |------------------------------------|---------|
//! | above height, at/below water level | water   |
//! | above height                       | air     |
//! | `y >= floor(height)`               | surface |
//! | `y <= height / 2`                  | stone   |
//! | otherwise                          | dirt    |
//!
//! ## Blending
//!
//! Height and tint are weighted over the biomes near the column (see
//! [`BiomeField::blend_weights`]); every biome shapes the same height noise.
//! The surface block always follows the nearest biome.

use terracell_core::{
    BlockType, Chunk, ChunkCoord, Extent3, TerraResult, TerrainSettings, Tint, Voxel,
    WorldConfig, WHITE,
};

use crate::biome::{Biome, BiomeField, BiomeKind};
use crate::color::{hsb_to_rgb, weighted_tint};
use crate::noise::{NoiseField, WorldSeed};

/// Saturation of biome grass tints.
const GRASS_SATURATION: f64 = 0.35;
/// Brightness of biome grass tints.
const GRASS_BRIGHTNESS: f64 = 1.0;

/// Per-column generation result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnProfile {
    /// Surface height in world units.
    pub height: f64,
    /// Block placed on the top layer.
    pub surface: BlockType,
    /// Tint of the surface block.
    pub tint: Tint,
    /// Kind of the nearest biome.
    pub biome: BiomeKind,
    /// Total share of biomes other than the nearest, in `[0, 1)`.
    pub blend: f64,
}

/// Deterministic world generator.
///
/// `fill_chunk` is a pure function of seed and chunk coordinate. The only
/// shared mutable state is the biome cache, so one generator can be used
/// from many threads at once.
pub struct TerrainGenerator {
    /// Chunk dimensions.
    cell_size: Extent3,
    /// Height noise.
    noise: NoiseField,
    /// Biome partition.
    biomes: BiomeField,
    /// Vertical scale of terrain (`biome.size.y`).
    vertical: f64,
    /// Water surface height.
    water_level: f64,
    /// Column thresholds.
    terrain: TerrainSettings,
}

impl TerrainGenerator {
    /// Creates a generator for a validated world description.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found.
    pub fn new(config: &WorldConfig) -> TerraResult<Self> {
        config.validate()?;
        let seed = WorldSeed::new(config.seed_bits());
        let generator = Self {
            cell_size: config.cell_size,
            noise: NoiseField::new(seed, config.noise)?,
            biomes: BiomeField::new(seed, &config.biome)?,
            vertical: f64::from(config.biome.size.y),
            water_level: config.biome.water_level,
            terrain: config.terrain,
        };
        tracing::debug!(
            "terrain generator ready: seed {}, chunk {}x{}x{}, water level {}",
            config.seed,
            config.cell_size.x,
            config.cell_size.y,
            config.cell_size.z,
            config.biome.water_level
        );
        Ok(generator)
    }

    /// Chunk dimensions.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> Extent3 {
        self.cell_size
    }

    /// Height noise.
    #[inline]
    #[must_use]
    pub const fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Biome partition.
    #[inline]
    #[must_use]
    pub const fn biomes(&self) -> &BiomeField {
        &self.biomes
    }

    /// Water surface height.
    #[inline]
    #[must_use]
    pub const fn water_level(&self) -> f64 {
        self.water_level
    }

    /// Height a single biome would give this column.
    #[must_use]
    pub fn biome_height(&self, biome: &Biome, x: f64, z: f64) -> f64 {
        self.shaped_height(biome, self.noise.value_noise01(x, z))
    }

    /// Height of `biome` for a noise value in `[0, 1)`.
    fn shaped_height(&self, biome: &Biome, noise: f64) -> f64 {
        let (base, amplitude) = biome.kind().height_shape();
        self.vertical * self.terrain.height_fraction * (base + amplitude * noise)
    }

    /// Height, surface block and tint of the column at `(x, z)`.
    #[must_use]
    pub fn column_profile(&self, x: i32, z: i32) -> ColumnProfile {
        let (x, z) = (f64::from(x), f64::from(z));
        let weights = self.biomes.blend_weights(x, z);
        let nearest = weights[0];
        let noise = self.noise.value_noise01(x, z);

        let height = weights
            .iter()
            .map(|w| w.weight * self.shaped_height(&w.biome, noise))
            .sum::<f64>();
        let blend = 1.0 - nearest.weight;

        let kind = nearest.biome.kind();
        let surface = self.surface_block(kind, height);
        let tint = if surface == BlockType::Grass {
            weighted_tint(weights.iter().map(|w| (grass_tint(&w.biome), w.weight)))
        } else {
            WHITE
        };

        ColumnProfile {
            height,
            surface,
            tint,
            biome: kind,
            blend,
        }
    }

    /// Top-layer block for a column.
    #[must_use]
    pub fn surface_block(&self, kind: BiomeKind, height: f64) -> BlockType {
        if height < self.water_level + self.terrain.sand_margin {
            return BlockType::Sand;
        }
        let snow_level = self.vertical * self.terrain.snow_fraction;
        let stone_level = self.vertical * self.terrain.stone_fraction;
        match kind {
            BiomeKind::Desert => BlockType::Sand,
            BiomeKind::Tundra => BlockType::Snow,
            BiomeKind::Mountains if height > snow_level => BlockType::Snow,
            BiomeKind::Mountains if height > stone_level => BlockType::Stone,
            _ if height > snow_level => BlockType::Snow,
            _ => BlockType::Grass,
        }
    }

    /// Voxel at world height `y` within a column.
    #[must_use]
    pub fn classify(&self, profile: &ColumnProfile, y: i32) -> Voxel {
        let y = f64::from(y);
        let height = profile.height;
        if y > height {
            if y <= self.water_level {
                Voxel::of(BlockType::Water)
            } else {
                Voxel::EMPTY
            }
        } else if y >= height.floor() {
            Voxel::new(profile.surface.id(), profile.tint)
        } else if y <= height / 2.0 {
            Voxel::of(BlockType::Stone)
        } else {
            Voxel::of(BlockType::Dirt)
        }
    }

    /// Generates one chunk.
    ///
    /// Identical coordinates always produce identical voxels.
    #[must_use]
    pub fn fill_chunk(&self, coord: ChunkCoord) -> Chunk {
        let extent = self.cell_size;
        let [ox, oy, oz] = extent.origin(coord);
        let (sx, sy, sz) = (extent.x as usize, extent.y as usize, extent.z as usize);
        let mut voxels = vec![Voxel::EMPTY; extent.volume()];

        for z in 0..sz {
            for x in 0..sx {
                let profile = self.column_profile(ox + x as i32, oz + z as i32);
                for y in 0..sy {
                    voxels[y * sx * sz + z * sx + x] = self.classify(&profile, oy + y as i32);
                }
            }
        }

        tracing::trace!("filled chunk ({}, {}, {})", coord.x, coord.y, coord.z);
        Chunk::from_voxels(coord, extent, voxels)
    }
}

/// Grass tint for a biome, hue taken from its categorical value.
fn grass_tint(biome: &Biome) -> [f64; 3] {
    hsb_to_rgb(biome.value * 360.0, GRASS_SATURATION, GRASS_BRIGHTNESS)
}
