//! # Value Noise
//!
//! Deterministic multi-octave value noise over a 2D integer lattice.
//!
//! ## Stages
//!
//! 1. **Lattice**: integer coordinates hash to a value in `[0, 1)`.
//! 2. **Smoothed**: each lattice value is blended with its 3x3 neighborhood
//!    (corners 1/16, sides 1/8, center 1/4).
//! 3. **Interpolated**: bilinear blend of the four smoothed corners around a
//!    fractional coordinate.
//! 4. **Octaves**: `sum(interpolated(p * f * 2^i) * persistence^i)`.
//!
//! Every stage is exposed so debugging tools can visualize it.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed` and settings, this implementation produces
//! **exactly** the same values on any platform, any time. All hashing is
//! wrapping integer arithmetic; floating point only enters after the hash.

use terracell_core::{NoiseSettings, TerraResult};

/// Lattice hash multiplier for `x`.
const X_NOISE_GEN: i64 = 31;
/// Lattice hash multiplier for `y`.
const Y_NOISE_GEN: i64 = 211;
/// Lattice hash multiplier for the seed.
const SEED_NOISE_GEN: i64 = 1009;
/// Modulus applied before mixing.
const HASH_MODULUS: i64 = 2_147_483_647;
/// `2^32`, maps a `u32` to `[0, 1)`.
const U32_RANGE: f64 = 4_294_967_296.0;
/// Largest `f64` strictly below one.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for a specific purpose.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// Seed folded into the signed range used by the lattice hash.
    #[inline]
    const fn lattice_key(self) -> i64 {
        (self.0 ^ (self.0 >> 32)) as i64
    }
}

/// Integer avalanche mix.
#[inline]
const fn avalanche(mut a: u32) -> u32 {
    a = (a ^ 61) ^ (a >> 16);
    a = a.wrapping_add(a << 3);
    a ^= a >> 4;
    a = a.wrapping_mul(0x27d4_eb2d);
    a ^= a >> 15;
    a
}

/// Pseudo-random lattice value in `[0, 1)` for integer coordinates.
#[inline]
#[must_use]
pub fn sample(x: i64, y: i64, seed: WorldSeed) -> f64 {
    let n = X_NOISE_GEN
        .wrapping_mul(x)
        .wrapping_add(Y_NOISE_GEN.wrapping_mul(y))
        .wrapping_add(SEED_NOISE_GEN.wrapping_mul(seed.lattice_key()))
        .rem_euclid(HASH_MODULUS);
    f64::from(avalanche(n as u32)) / U32_RANGE
}

/// Clamps a value into `[0, 1)`.
#[inline]
#[must_use]
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, BELOW_ONE)
}

/// Linear interpolation.
#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Multi-octave value noise generator.
///
/// Holds only its seed and immutable settings, so it is freely shared
/// between threads.
///
/// # Example
///
/// ```rust
/// use terracell_core::NoiseSettings;
/// use terracell_procedural::noise::{NoiseField, WorldSeed};
///
/// let noise = NoiseField::new(WorldSeed::new(42), NoiseSettings::default()).unwrap();
/// let value = noise.value_noise01(100.0, 200.0);
/// assert!((0.0..1.0).contains(&value));
/// ```
#[derive(Clone, Debug)]
pub struct NoiseField {
    /// Seed for the lattice hash.
    seed: WorldSeed,
    /// Octave shape.
    settings: NoiseSettings,
    /// `sum(persistence^i)` over all octaves.
    amplitude_sum: f64,
}

impl NoiseField {
    /// Creates a noise field.
    ///
    /// # Errors
    ///
    /// Rejects zero octaves and non-positive frequency or persistence.
    pub fn new(seed: WorldSeed, settings: NoiseSettings) -> TerraResult<Self> {
        settings.validate()?;
        let mut amplitude_sum = 0.0;
        let mut amplitude = 1.0;
        for _ in 0..settings.octaves {
            amplitude_sum += amplitude;
            amplitude *= settings.persistence;
        }
        Ok(Self {
            seed,
            settings,
            amplitude_sum,
        })
    }

    /// Seed in use.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Settings in use.
    #[inline]
    #[must_use]
    pub const fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    /// Maximum possible raw octave sum.
    #[inline]
    #[must_use]
    pub const fn amplitude_sum(&self) -> f64 {
        self.amplitude_sum
    }

    /// Raw lattice value in `[0, 1)`.
    #[inline]
    #[must_use]
    pub fn lattice(&self, x: i64, z: i64) -> f64 {
        sample(x, z, self.seed)
    }

    /// Lattice value blended with its 3x3 neighborhood.
    #[must_use]
    pub fn smoothed(&self, x: i64, z: i64) -> f64 {
        let corners = self.lattice(x - 1, z - 1)
            + self.lattice(x + 1, z - 1)
            + self.lattice(x - 1, z + 1)
            + self.lattice(x + 1, z + 1);
        let sides = self.lattice(x - 1, z)
            + self.lattice(x + 1, z)
            + self.lattice(x, z - 1)
            + self.lattice(x, z + 1);
        let center = self.lattice(x, z);
        corners / 16.0 + sides / 8.0 + center / 4.0
    }

    /// Bilinear interpolation of the smoothed lattice.
    #[must_use]
    pub fn interpolated(&self, x: f64, z: f64) -> f64 {
        let fx = x.floor();
        let fz = z.floor();
        let (ix, iz) = (fx as i64, fz as i64);
        let (tx, tz) = (x - fx, z - fz);

        let x0z0 = self.smoothed(ix, iz);
        let x1z0 = self.smoothed(ix + 1, iz);
        let x0z1 = self.smoothed(ix, iz + 1);
        let x1z1 = self.smoothed(ix + 1, iz + 1);

        let z0 = lerp(x0z0, x1z0, tx);
        let z1 = lerp(x0z1, x1z1, tx);
        lerp(z0, z1, tz)
    }

    /// Raw octave sum in `[0, amplitude_sum)`. Not normalized.
    #[must_use]
    pub fn octaves_raw(&self, x: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.settings.frequency;
        let mut amplitude = 1.0;
        for _ in 0..self.settings.octaves {
            total += self.interpolated(x * frequency, z * frequency) * amplitude;
            frequency *= 2.0;
            amplitude *= self.settings.persistence;
        }
        total
    }

    /// Octave sum rescaled by [`Self::amplitude_sum`] and clamped to `[0, 1)`.
    #[inline]
    #[must_use]
    pub fn value_noise01(&self, x: f64, z: f64) -> f64 {
        clamp01(self.octaves_raw(x, z) / self.amplitude_sum)
    }
}
