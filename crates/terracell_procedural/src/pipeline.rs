//! # Generation Pipeline
//!
//! Chunk-by-chunk world population.
//!
//! A [`GenerationPlan`] walks the chunk grid `y` outer, then `z`, then `x`,
//! yielding one [`GenerationStep`] at a time with its progress. Callers that
//! need to stay responsive drive the iterator themselves and yield between
//! steps; [`populate`] and [`populate_parallel`] run a plan to completion.

use std::time::Instant;

use rayon::prelude::*;
use terracell_core::{ChunkCoord, Extent3, VoxelChunkStore};

use crate::terrain::TerrainGenerator;

/// One unit of generation work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationStep {
    /// Chunk to generate.
    pub coord: ChunkCoord,
    /// Zero-based position in the plan.
    pub index: usize,
    /// Total steps in the plan.
    pub total: usize,
}

impl GenerationStep {
    /// Fraction of the plan done once this step completes, in `(0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        (self.index + 1) as f64 / self.total as f64
    }
}

/// Iterator over every chunk of a `cell_count` grid anchored at the origin.
#[derive(Clone, Debug)]
pub struct GenerationPlan {
    /// Chunks per axis.
    cell_count: Extent3,
    /// Next step index.
    next: usize,
}

impl GenerationPlan {
    /// Creates a plan covering `cell_count` chunks.
    #[must_use]
    pub const fn new(cell_count: Extent3) -> Self {
        Self {
            cell_count,
            next: 0,
        }
    }

    /// Total number of steps.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> usize {
        self.cell_count.volume()
    }

    /// Steps not yet yielded.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.total() - self.next
    }

    fn coord_at(&self, index: usize) -> ChunkCoord {
        let (cx, cz) = (self.cell_count.x as usize, self.cell_count.z as usize);
        let x = index % cx;
        let z = (index / cx) % cz;
        let y = index / (cx * cz);
        ChunkCoord::new(x as i32, y as i32, z as i32)
    }
}

impl Iterator for GenerationPlan {
    type Item = GenerationStep;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.total();
        if self.next >= total {
            return None;
        }
        let step = GenerationStep {
            coord: self.coord_at(self.next),
            index: self.next,
            total,
        };
        self.next += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GenerationPlan {}

/// Generates every remaining chunk of `plan` in order and stores it.
///
/// Returns the number of chunks generated.
///
/// # Panics
///
/// Panics if the generator's chunk size differs from the store's.
pub fn populate(
    generator: &TerrainGenerator,
    store: &VoxelChunkStore,
    plan: GenerationPlan,
) -> usize {
    let start = Instant::now();
    let mut count = 0;
    for step in plan {
        store.insert_chunk(generator.fill_chunk(step.coord));
        tracing::trace!(
            "generated chunk {}/{} ({:.0}%)",
            step.index + 1,
            step.total,
            step.progress() * 100.0
        );
        count += 1;
    }
    tracing::info!(
        "populated {} chunks in {:.1}ms ({} biome cells cached)",
        count,
        start.elapsed().as_secs_f64() * 1000.0,
        generator.biomes().cached_count()
    );
    count
}

/// Generates every remaining chunk of `plan` on the rayon pool.
///
/// Chunks are independent, so completion order is unspecified; the stored
/// result is identical to [`populate`].
///
/// # Panics
///
/// Panics if the generator's chunk size differs from the store's.
pub fn populate_parallel(
    generator: &TerrainGenerator,
    store: &VoxelChunkStore,
    plan: GenerationPlan,
) -> usize {
    let start = Instant::now();
    let coords: Vec<ChunkCoord> = plan.map(|step| step.coord).collect();
    let count = coords.len();
    coords
        .into_par_iter()
        .for_each(|coord| store.insert_chunk(generator.fill_chunk(coord)));
    tracing::info!(
        "populated {} chunks in parallel in {:.1}ms ({} biome cells cached)",
        count,
        start.elapsed().as_secs_f64() * 1000.0,
        generator.biomes().cached_count()
    );
    count
}
