//! # Biome Field
//!
//! Voronoi-like partition of the XZ plane.
//!
//! The plane is cut into a regular grid of biome cells. Each cell owns one
//! **site**, jittered to a pseudo-random position inside the cell, and one
//! **categorical value** in `[0, 1)` sampled independently at the cell's grid
//! coordinate. A column belongs to the biome whose site is nearest.
//!
//! ## Candidate Ordering
//!
//! [`BiomeField::biomes_near`] returns the 3x3 cells around a query,
//! nearest first. The rest are ordered boundary-aware: candidates lying on
//! the same side of the nearest site as the query come before those behind
//! it, each group by distance. The second entry is then the biome across
//! the edge the query is approaching, which is the one worth blending with.
//!
//! ## Blending
//!
//! [`BiomeField::blend_weights`] weighs every site within a fixed band of
//! the nearest one. A site whose distance exceeds the nearest distance by
//! `gap` gets `(1 - gap / band)^k`, the nearest gets one, and the weights
//! are normalized. Two sites equidistant from a column weigh the same from
//! either side of their shared edge, so heights stay continuous across it.
//! The band is measured in world units, so the blend never collapses into a
//! single column step however close two sites are.
//!
//! ## Caching
//!
//! Biomes are a pure function of grid coordinate and seed, memoized in an
//! insert-if-absent map. Two threads racing on the same cell both compute
//! it; the loser's copy is discarded.

use std::cmp::Ordering;
use std::collections::HashMap;

use parking_lot::RwLock;
use terracell_core::{BiomeSettings, Extent3, TerraResult};

use crate::noise::{sample, WorldSeed};

/// Sub-seed for site jitter.
const SITE_STREAM: u64 = 1;
/// Sub-seed for categorical values.
const KIND_STREAM: u64 = 2;
/// Cells searched on each side of the query when blending.
const BLEND_REACH: i32 = 2;
/// Widest blend band, as a fraction of the smaller cell side.
///
/// Sites dropped from the blend search when the query crosses a cell edge
/// are then always outside the band.
const MAX_BAND_FRACTION: f64 = 0.5;

/// Discrete biome kinds, banded from the categorical value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BiomeKind {
    /// Low, flat and sandy.
    Desert = 0,
    /// Gentle grassland.
    Plains = 1,
    /// Rolling grassland.
    Forest = 2,
    /// High, cold and snow-covered.
    Tundra = 3,
    /// Tall peaks with stone and snow caps.
    Mountains = 4,
}

impl BiomeKind {
    /// All kinds in band order.
    pub const ALL: [Self; 5] = [
        Self::Desert,
        Self::Plains,
        Self::Forest,
        Self::Tundra,
        Self::Mountains,
    ];

    /// Bands a categorical value in `[0, 1)` into a kind.
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        let band = (value * Self::ALL.len() as f64).floor();
        let index = (band.max(0.0) as usize).min(Self::ALL.len() - 1);
        Self::ALL[index]
    }

    /// Terrain shape as `(base, amplitude)`, both fractions of biome height.
    ///
    /// Column height is `base + amplitude * noise` before global scaling.
    #[must_use]
    pub const fn height_shape(self) -> (f64, f64) {
        match self {
            Self::Desert => (0.38, 0.12),
            Self::Plains => (0.40, 0.15),
            Self::Forest => (0.40, 0.30),
            Self::Tundra => (0.45, 0.25),
            Self::Mountains => (0.40, 0.55),
        }
    }
}

/// One biome cell.
///
/// Immutable once computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Biome {
    /// Cell coordinate on the biome grid.
    pub grid: (i32, i32),
    /// Jittered site in world XZ.
    pub center: [f64; 2],
    /// Categorical value in `[0, 1)`.
    pub value: f64,
}

impl Biome {
    /// Discrete kind of this biome.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> BiomeKind {
        BiomeKind::from_value(self.value)
    }

    fn distance_to(&self, x: f64, z: f64) -> f64 {
        (self.center[0] - x).hypot(self.center[1] - z)
    }
}

/// A biome together with its distance to one particular query point.
///
/// Distances are per query and never stored in the cache.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeCandidate {
    /// The biome.
    pub biome: Biome,
    /// Distance from the query point to the biome's site.
    pub dist: f64,
}

/// A biome and its normalized share of a column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeWeight {
    /// The biome.
    pub biome: Biome,
    /// Share in `(0, 1]`; shares for one column sum to one.
    pub weight: f64,
}

/// Lazily populated biome partition.
pub struct BiomeField {
    /// Cell size; only `x` and `z` shape the partition.
    size: Extent3,
    /// Blend band width in world units.
    band: f64,
    /// Blend falloff exponent.
    exponent: f64,
    /// Seed for site jitter.
    site_seed: WorldSeed,
    /// Seed for categorical values.
    kind_seed: WorldSeed,
    /// Memoized cells.
    cache: RwLock<HashMap<(i32, i32), Biome>>,
}

impl BiomeField {
    /// Creates a biome field.
    ///
    /// # Errors
    ///
    /// Rejects biome sizes with a zero component and out-of-range blend
    /// settings.
    pub fn new(seed: WorldSeed, settings: &BiomeSettings) -> TerraResult<Self> {
        settings.validate()?;
        let size = settings.size;
        let side = f64::from(size.x.min(size.z));
        let band = ((1.0 - settings.core_ratio) * side).min(MAX_BAND_FRACTION * side);
        Ok(Self {
            size,
            band,
            exponent: settings.blend_exponent,
            site_seed: seed.derive(SITE_STREAM),
            kind_seed: seed.derive(KIND_STREAM),
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Biome cell size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Extent3 {
        self.size
    }

    /// Blend band width in world units. Zero means hard seams.
    #[inline]
    #[must_use]
    pub const fn blend_band(&self) -> f64 {
        self.band
    }

    /// Grid cell containing a world XZ position.
    #[must_use]
    pub fn grid_of(&self, x: f64, z: f64) -> (i32, i32) {
        (
            (x / f64::from(self.size.x)).floor() as i32,
            (z / f64::from(self.size.z)).floor() as i32,
        )
    }

    /// Returns the biome for a grid cell, computing it on first use.
    #[must_use]
    pub fn biome(&self, gx: i32, gz: i32) -> Biome {
        if let Some(biome) = self.cache.read().get(&(gx, gz)) {
            return *biome;
        }
        let computed = self.compute(gx, gz);
        *self.cache.write().entry((gx, gz)).or_insert(computed)
    }

    /// Number of memoized cells.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache.read().len()
    }

    fn compute(&self, gx: i32, gz: i32) -> Biome {
        let (bx, bz) = (u64::from(self.size.x), u64::from(self.size.z));
        let cells = bx * bz;
        let jitter = sample(i64::from(gx), i64::from(gz), self.site_seed);
        let index = ((jitter * cells as f64) as u64).min(cells - 1);
        let (ox, oz) = (index % bx, index / bx);

        Biome {
            grid: (gx, gz),
            center: [
                f64::from(gx) * bx as f64 + ox as f64,
                f64::from(gz) * bz as f64 + oz as f64,
            ],
            value: sample(i64::from(gx), i64::from(gz), self.kind_seed),
        }
    }

    /// The nine biomes around `(x, z)`, nearest first, boundary-aware after.
    ///
    /// The first candidate is always the nearest site. Remaining candidates
    /// with `dot(c0 - q, c0 - c) >= 0` (same side of the nearest site as the
    /// query `q`) precede the others; each group is ordered by distance.
    #[must_use]
    pub fn biomes_near(&self, x: f64, z: f64) -> Vec<BiomeCandidate> {
        let candidates = self.candidates(x, z, 1);

        let mut closest = 0;
        for (i, c) in candidates.iter().enumerate() {
            if c.dist < candidates[closest].dist {
                closest = i;
            }
        }

        let c0 = candidates[closest].biome.center;
        let toward = [c0[0] - x, c0[1] - z];
        let mut keyed: Vec<(u8, BiomeCandidate)> = candidates
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let rank = if i == closest {
                    0
                } else {
                    let away = [c0[0] - c.biome.center[0], c0[1] - c.biome.center[1]];
                    let dot = toward[0] * away[0] + toward[1] * away[1];
                    if dot >= 0.0 {
                        1
                    } else {
                        2
                    }
                };
                (rank, c)
            })
            .collect();

        keyed.sort_by(|(ra, a), (rb, b)| match ra.cmp(rb) {
            Ordering::Equal => a.dist.total_cmp(&b.dist),
            other => other,
        });
        keyed.into_iter().map(|(_, c)| c).collect()
    }

    /// Normalized blend shares of the biomes around `(x, z)`.
    ///
    /// Only sites within [`Self::blend_band`] of the nearest distance
    /// contribute. The result is ordered by distance, so the nearest site
    /// comes first; shares sum to one.
    #[must_use]
    pub fn blend_weights(&self, x: f64, z: f64) -> Vec<BiomeWeight> {
        let mut candidates = self.candidates(x, z, BLEND_REACH);
        candidates.sort_by(|a, b| a.dist.total_cmp(&b.dist));
        let nearest = candidates[0].dist;

        let mut weights: Vec<BiomeWeight> = candidates
            .into_iter()
            .map(|c| BiomeWeight {
                biome: c.biome,
                weight: Self::blend_falloff(c.dist - nearest, self.band, self.exponent),
            })
            .take_while(|w| w.weight > 0.0)
            .collect();

        let total: f64 = weights.iter().map(|w| w.weight).sum();
        for w in &mut weights {
            w.weight /= total;
        }
        weights
    }

    /// Unnormalized weight of a site `gap` units farther than the nearest.
    ///
    /// One at `gap = 0`, falling as `(1 - gap / band)^k` to zero at the band
    /// edge. A zero band keeps only exact ties.
    #[must_use]
    pub fn blend_falloff(gap: f64, band: f64, exponent: f64) -> f64 {
        if gap <= 0.0 {
            1.0
        } else if gap >= band {
            0.0
        } else {
            (1.0 - gap / band).powf(exponent)
        }
    }

    /// Every biome in the `(2 * reach + 1)^2` cells around `(x, z)`.
    fn candidates(&self, x: f64, z: f64, reach: i32) -> Vec<BiomeCandidate> {
        let (gx, gz) = self.grid_of(x, z);
        let side = (2 * reach + 1) as usize;
        let mut candidates = Vec::with_capacity(side * side);
        for dz in -reach..=reach {
            for dx in -reach..=reach {
                let biome = self.biome(gx + dx, gz + dz);
                candidates.push(BiomeCandidate {
                    dist: biome.distance_to(x, z),
                    biome,
                });
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> BiomeField {
        BiomeField::new(WorldSeed::new(42), &BiomeSettings::default()).unwrap()
    }

    #[test]
    fn test_site_inside_cell() {
        let f = field();
        for gx in -20..20 {
            for gz in -20..20 {
                let b = f.biome(gx, gz);
                let (x0, z0) = (f64::from(gx) * 32.0, f64::from(gz) * 32.0);
                assert!(b.center[0] >= x0 && b.center[0] < x0 + 32.0);
                assert!(b.center[1] >= z0 && b.center[1] < z0 + 32.0);
                assert!((0.0..1.0).contains(&b.value));
            }
        }
    }

    #[test]
    fn test_biomes_are_stable() {
        let a = field();
        let b = field();
        // Warm one cache in a different order
        for g in (-5..5).rev() {
            let _ = a.biome(g, -g);
        }
        for g in -5..5 {
            assert_eq!(a.biome(g, -g), b.biome(g, -g));
        }
    }

    #[test]
    fn test_nearest_first_and_nine() {
        let f = field();
        for i in 0..200 {
            let x = f64::from(i) * 7.3 - 600.0;
            let z = f64::from(i) * -3.1 + 100.0;
            let near = f.biomes_near(x, z);
            assert_eq!(near.len(), 9);
            let min = near.iter().map(|c| c.dist).fold(f64::MAX, f64::min);
            assert_eq!(near[0].dist, min);
        }
    }

    #[test]
    fn test_directional_groups_sorted() {
        let f = field();
        for i in 0..200 {
            let (x, z) = (f64::from(i) * 3.7, f64::from(i) * 1.9 - 80.0);
            let near = f.biomes_near(x, z);
            let c0 = near[0].biome.center;
            let side = |c: &BiomeCandidate| {
                let away = [c0[0] - c.biome.center[0], c0[1] - c.biome.center[1]];
                (c0[0] - x) * away[0] + (c0[1] - z) * away[1] >= 0.0
            };
            // Same-side group first, then the rest
            let split = near[1..].iter().position(|c| !side(c)).unwrap_or(8);
            assert!(near[1..1 + split].iter().all(side));
            assert!(near[1 + split..].iter().all(|c| !side(c)));
            for group in [&near[1..1 + split], &near[1 + split..]] {
                assert!(group.windows(2).all(|w| w[0].dist <= w[1].dist));
            }
        }
    }

    #[test]
    fn test_cache_fills_lazily() {
        let f = field();
        assert_eq!(f.cached_count(), 0);
        let _ = f.biomes_near(10.0, 10.0);
        assert_eq!(f.cached_count(), 9);
        let _ = f.biomes_near(11.0, 12.0);
        assert_eq!(f.cached_count(), 9);
    }

    #[test]
    fn test_blend_falloff() {
        assert_eq!(BiomeField::blend_falloff(0.0, 16.0, 5.0), 1.0);
        assert_eq!(BiomeField::blend_falloff(16.0, 16.0, 5.0), 0.0);
        assert_eq!(BiomeField::blend_falloff(40.0, 16.0, 5.0), 0.0);
        assert!((BiomeField::blend_falloff(8.0, 16.0, 1.0) - 0.5).abs() < 1e-12);
        let near_edge = BiomeField::blend_falloff(15.0, 16.0, 5.0);
        assert!(near_edge > 0.0 && near_edge < 1e-5);
        // A zero band only keeps exact ties
        assert_eq!(BiomeField::blend_falloff(0.0, 0.0, 5.0), 1.0);
        assert_eq!(BiomeField::blend_falloff(0.1, 0.0, 5.0), 0.0);
    }

    #[test]
    fn test_band_width() {
        assert_eq!(field().blend_band(), 16.0);
        let hard = BiomeSettings {
            core_ratio: 1.0,
            ..BiomeSettings::default()
        };
        assert_eq!(BiomeField::new(WorldSeed::new(42), &hard).unwrap().blend_band(), 0.0);
        let wide = BiomeSettings {
            core_ratio: 0.0,
            ..BiomeSettings::default()
        };
        assert_eq!(BiomeField::new(WorldSeed::new(42), &wide).unwrap().blend_band(), 16.0);
    }

    #[test]
    fn test_weights_normalized_nearest_first() {
        let f = field();
        for i in 0..300 {
            let (x, z) = (f64::from(i) * 5.3 - 700.0, f64::from(i) * -2.9 + 150.0);
            let weights = f.blend_weights(x, z);
            let total: f64 = weights.iter().map(|w| w.weight).sum();
            assert!((total - 1.0).abs() < 1e-9);
            assert!(weights.iter().all(|w| w.weight > 0.0));
            assert_eq!(weights[0].biome, f.biomes_near(x, z)[0].biome);
        }
    }

    #[test]
    fn test_weights_agree_on_shared_edge() {
        let f = field();
        let (a, b) = (f.biome(0, 0), f.biome(1, 0));
        // Midpoint of the two sites lies on their shared edge
        let (mx, mz) = (
            (a.center[0] + b.center[0]) / 2.0,
            (a.center[1] + b.center[1]) / 2.0,
        );
        let weights = f.blend_weights(mx, mz);
        let share = |biome: Biome| {
            weights
                .iter()
                .find(|w| w.biome == biome)
                .map_or(0.0, |w| w.weight)
        };
        assert!(share(a) > 0.0);
        assert!((share(a) - share(b)).abs() < 1e-12);
    }

    #[test]
    fn test_hard_band_keeps_nearest_only() {
        let hard = BiomeSettings {
            core_ratio: 1.0,
            ..BiomeSettings::default()
        };
        let f = BiomeField::new(WorldSeed::new(42), &hard).unwrap();
        for i in 0..100 {
            let weights = f.blend_weights(f64::from(i) * 3.3, f64::from(i) * 1.7);
            assert_eq!(weights.len(), 1);
            assert_eq!(weights[0].weight, 1.0);
        }
    }

    #[test]
    fn test_kind_bands() {
        assert_eq!(BiomeKind::from_value(0.0), BiomeKind::Desert);
        assert_eq!(BiomeKind::from_value(0.3), BiomeKind::Plains);
        assert_eq!(BiomeKind::from_value(0.999), BiomeKind::Mountains);
        assert_eq!(BiomeKind::from_value(1.0), BiomeKind::Mountains);
    }
}
