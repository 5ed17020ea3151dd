//! # World Configuration
//!
//! Every tunable of the world lives here: chunk geometry, noise shape, biome
//! layout and the terrain thresholds. Configuration is plain data that can be
//! loaded from TOML; any part of it may be omitted and falls back to the
//! defaults below.
//!
//! ```toml
//! seed = 1337.0
//! cell_size = { x = 16, y = 32, z = 16 }
//!
//! [noise]
//! octaves = 4
//!
//! [biome]
//! water_level = 10.0
//! ```
//!
//! Validation runs eagerly on load so a malformed world is rejected before
//! any generation starts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::Extent3;
use crate::error::{TerraError, TerraResult};

/// Multi-octave value noise shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Number of octaves summed.
    pub octaves: u32,
    /// Base lattice frequency.
    pub frequency: f64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            persistence: 0.8,
            octaves: 3,
            frequency: 0.05,
        }
    }
}

impl NoiseSettings {
    /// Rejects non-positive or non-finite values and zero octaves.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::InvalidOctaves`] or [`TerraError::InvalidNoise`].
    pub fn validate(&self) -> TerraResult<()> {
        if self.octaves == 0 {
            return Err(TerraError::InvalidOctaves(self.octaves));
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(TerraError::InvalidNoise(format!(
                "frequency must be positive, got {}",
                self.frequency
            )));
        }
        if !(self.persistence.is_finite() && self.persistence > 0.0) {
            return Err(TerraError::InvalidNoise(format!(
                "persistence must be positive, got {}",
                self.persistence
            )));
        }
        Ok(())
    }
}

/// Biome cell layout and blending.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeSettings {
    /// Size of one biome cell. `y` is the vertical scale of terrain.
    pub size: Extent3,
    /// World height at or below which empty space fills with water.
    pub water_level: f64,
    /// Share of the smaller cell side left unblended. The blend band is
    /// `(1 - core_ratio) * side`, capped at half a side; `1.0` gives hard
    /// seams.
    pub core_ratio: f64,
    /// Falloff exponent of the blend across the band.
    pub blend_exponent: f64,
}

impl Default for BiomeSettings {
    fn default() -> Self {
        Self {
            size: Extent3::new(32, 32, 32),
            water_level: 13.0,
            core_ratio: 0.5,
            blend_exponent: 5.0,
        }
    }
}

impl BiomeSettings {
    /// Checks the biome extent and blend parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::InvalidExtent`] or [`TerraError::InvalidBlend`].
    pub fn validate(&self) -> TerraResult<()> {
        self.size.checked("biome.size")?;
        if !self.water_level.is_finite() {
            return Err(TerraError::InvalidBlend(format!(
                "water_level must be finite, got {}",
                self.water_level
            )));
        }
        if !(0.0..=1.0).contains(&self.core_ratio) {
            return Err(TerraError::InvalidBlend(format!(
                "core_ratio must lie in [0, 1], got {}",
                self.core_ratio
            )));
        }
        if !(self.blend_exponent.is_finite() && self.blend_exponent > 0.0) {
            return Err(TerraError::InvalidBlend(format!(
                "blend_exponent must be positive, got {}",
                self.blend_exponent
            )));
        }
        Ok(())
    }
}

/// Column classification thresholds.
///
/// Fractions are relative to the biome cell height (`biome.size.y`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Surfaces lower than `water_level + sand_margin` become sand.
    pub sand_margin: f64,
    /// Surfaces above this fraction are capped with snow.
    pub snow_fraction: f64,
    /// Mountain surfaces above this fraction are bare stone.
    pub stone_fraction: f64,
    /// Overall vertical scale applied to every biome's height.
    pub height_fraction: f64,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            sand_margin: 1.0,
            snow_fraction: 0.75,
            stone_fraction: 0.6,
            height_fraction: 0.9,
        }
    }
}

impl TerrainSettings {
    /// Checks that every fraction lies in `(0, 1]` and the margin is finite.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::InvalidTerrain`] naming the bad field.
    pub fn validate(&self) -> TerraResult<()> {
        let fractions = [
            ("snow_fraction", self.snow_fraction),
            ("stone_fraction", self.stone_fraction),
            ("height_fraction", self.height_fraction),
        ];
        for (name, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(TerraError::InvalidTerrain(format!(
                    "{name} must lie in (0, 1], got {value}"
                )));
            }
        }
        if !self.sand_margin.is_finite() {
            return Err(TerraError::InvalidTerrain(format!(
                "sand_margin must be finite, got {}",
                self.sand_margin
            )));
        }
        Ok(())
    }
}

/// Complete world description.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed. Any finite value; equal seeds give equal worlds.
    pub seed: f64,
    /// Columns in the block tile atlas.
    pub tile_count: u16,
    /// Voxels per chunk.
    pub cell_size: Extent3,
    /// Chunks in the generated world.
    pub cell_count: Extent3,
    /// Height noise.
    pub noise: NoiseSettings,
    /// Biome layout.
    pub biome: BiomeSettings,
    /// Column thresholds.
    pub terrain: TerrainSettings,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0.0,
            tile_count: 16,
            cell_size: Extent3::new(16, 32, 16),
            cell_count: Extent3::new(4, 1, 4),
            noise: NoiseSettings::default(),
            biome: BiomeSettings::default(),
            terrain: TerrainSettings::default(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::ConfigParse`] for malformed TOML, or the
    /// validation error for out-of-range values.
    pub fn from_toml_str(source: &str) -> TerraResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::ConfigIo`] if the file cannot be read, otherwise
    /// as [`WorldConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> TerraResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            "loaded world config from {} (seed {}, {} octaves)",
            path.display(),
            config.seed,
            config.noise.octaves
        );
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> TerraResult<()> {
        if !self.seed.is_finite() {
            return Err(TerraError::InvalidNoise(format!(
                "seed must be finite, got {}",
                self.seed
            )));
        }
        if self.tile_count == 0 {
            return Err(TerraError::InvalidTileCount(self.tile_count));
        }
        self.cell_size.checked("cell_size")?;
        self.cell_count.checked("cell_count")?;
        self.noise.validate()?;
        self.biome.validate()?;
        self.terrain.validate()?;
        Ok(())
    }

    /// Integer seed derived from the floating-point seed.
    ///
    /// Equal seeds map to equal integers; `-0.0` and `0.0` are the same world.
    #[must_use]
    pub fn seed_bits(&self) -> u64 {
        if self.seed == 0.0 {
            0
        } else {
            self.seed.to_bits()
        }
    }

    /// Serializes back to TOML.
    ///
    /// # Errors
    ///
    /// Never fails for a valid config; the error type is the serializer's.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
