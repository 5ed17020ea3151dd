//! # Terracell Error Types
//!
//! Everything that can be rejected by the core. Reads and generation are
//! total, so these are almost exclusively construction-time failures.

use thiserror::Error;

/// Errors produced by Terracell components.
#[derive(Error, Debug)]
pub enum TerraError {
    /// A 3D extent had a zero component.
    #[error("invalid extent for `{field}`: ({x}, {y}, {z}), every component must be positive")]
    InvalidExtent {
        /// Which configuration field was rejected.
        field: &'static str,
        /// X component.
        x: u32,
        /// Y component.
        y: u32,
        /// Z component.
        z: u32,
    },

    /// Octave count must be at least one.
    #[error("invalid octave count: {0}, at least one octave is required")]
    InvalidOctaves(u32),

    /// Noise frequency or persistence was non-positive or not finite.
    #[error("invalid noise settings: {0}")]
    InvalidNoise(String),

    /// The tile atlas needs at least one column.
    #[error("invalid tile count: {0}")]
    InvalidTileCount(u16),

    /// Biome blending parameters out of range.
    #[error("invalid biome blend settings: {0}")]
    InvalidBlend(String),

    /// Terrain thresholds out of range.
    #[error("invalid terrain settings: {0}")]
    InvalidTerrain(String),

    /// A ray segment had zero length, so it has no direction.
    #[error("degenerate ray: start and end points coincide")]
    DegenerateRay,

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),
}

/// Result type for Terracell operations.
pub type TerraResult<T> = Result<T, TerraError>;
