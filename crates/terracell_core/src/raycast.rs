//! # Voxel Ray Casting
//!
//! Amanatides-Woo grid traversal: walk the voxels pierced by a segment in
//! order, stopping at the first non-empty one.
//!
//! The normal of a hit is reconstructed from the last axis stepped: the face
//! entered is the one facing back along that step. A segment that starts
//! inside a solid voxel reports a zero normal.

use crate::error::{TerraError, TerraResult};
use crate::store::VoxelChunkStore;
use crate::voxel::Voxel;

/// Result of a successful ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space point where the ray entered the voxel.
    pub position: [f64; 3],
    /// Outward normal of the entered face (zero if the ray started inside).
    pub normal: [i32; 3],
    /// Integer coordinate of the voxel hit.
    pub voxel_coord: [i32; 3],
    /// The voxel hit.
    pub voxel: Voxel,
    /// Distance along the ray to `position`.
    pub distance: f64,
}

impl RayHit {
    /// Coordinate of the empty cell in front of the hit face.
    ///
    /// This is where a block placed against the hit face goes.
    #[must_use]
    pub const fn placement_coord(&self) -> [i32; 3] {
        [
            self.voxel_coord[0] + self.normal[0],
            self.voxel_coord[1] + self.normal[1],
            self.voxel_coord[2] + self.normal[2],
        ]
    }
}

/// Anything that answers point-wise voxel reads.
pub trait VoxelSource {
    /// Voxel at world coordinates, empty if unset.
    fn voxel_at(&self, x: i32, y: i32, z: i32) -> Voxel;
}

impl VoxelSource for VoxelChunkStore {
    #[inline]
    fn voxel_at(&self, x: i32, y: i32, z: i32) -> Voxel {
        self.get_voxel(x, y, z)
    }
}

/// Per-axis traversal state.
#[derive(Clone, Copy)]
struct Axis {
    /// Current integer cell.
    cell: i32,
    /// +1 or -1.
    step: i32,
    /// Ray distance between successive boundaries on this axis.
    delta: f64,
    /// Ray distance to the next boundary on this axis.
    next: f64,
}

impl Axis {
    fn new(start: f64, dir: f64) -> Self {
        let cell = start.floor() as i32;
        let step = if dir > 0.0 { 1 } else { -1 };
        if dir == 0.0 {
            return Self {
                cell,
                step,
                delta: f64::INFINITY,
                next: f64::INFINITY,
            };
        }
        let delta = (1.0 / dir).abs();
        let dist = if step > 0 {
            f64::from(cell) + 1.0 - start
        } else {
            start - f64::from(cell)
        };
        Self {
            cell,
            step,
            delta,
            next: delta * dist,
        }
    }
}

/// Casts a ray from `origin` toward `target` through `source`.
///
/// The segment is bounded: voxels beyond `|target - origin|` are never
/// reported.
///
/// # Errors
///
/// Returns [`TerraError::DegenerateRay`] if `origin == target`.
pub fn cast_ray<S: VoxelSource + ?Sized>(
    source: &S,
    origin: [f64; 3],
    target: [f64; 3],
) -> TerraResult<Option<RayHit>> {
    let mut dir = [
        target[0] - origin[0],
        target[1] - origin[1],
        target[2] - origin[2],
    ];
    let len = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
    if len == 0.0 || !len.is_finite() {
        return Err(TerraError::DegenerateRay);
    }
    for d in &mut dir {
        *d /= len;
    }

    let mut axes = [
        Axis::new(origin[0], dir[0]),
        Axis::new(origin[1], dir[1]),
        Axis::new(origin[2], dir[2]),
    ];
    let mut t = 0.0;
    let mut stepped: Option<usize> = None;

    while t <= len {
        let coord = [axes[0].cell, axes[1].cell, axes[2].cell];
        let voxel = source.voxel_at(coord[0], coord[1], coord[2]);
        if !voxel.is_empty() {
            let mut normal = [0; 3];
            if let Some(i) = stepped {
                normal[i] = -axes[i].step;
            }
            return Ok(Some(RayHit {
                position: [
                    origin[0] + t * dir[0],
                    origin[1] + t * dir[1],
                    origin[2] + t * dir[2],
                ],
                normal,
                voxel_coord: coord,
                voxel,
                distance: t,
            }));
        }

        // Ties go to the later axis (y over x, z over both)
        let i = if axes[0].next < axes[1].next {
            if axes[0].next < axes[2].next {
                0
            } else {
                2
            }
        } else if axes[1].next < axes[2].next {
            1
        } else {
            2
        };
        let axis = &mut axes[i];
        let Some(cell) = axis.cell.checked_add(axis.step) else {
            // Left the voxel grid
            return Ok(None);
        };
        axis.cell = cell;
        t = axis.next;
        axis.next += axis.delta;
        stepped = Some(i);
    }

    Ok(None)
}

/// Convenience wrapper over [`cast_ray`] for the chunk store.
pub struct VoxelRayCaster<'a> {
    store: &'a VoxelChunkStore,
}

impl<'a> VoxelRayCaster<'a> {
    /// Creates a caster reading from `store`.
    #[must_use]
    pub const fn new(store: &'a VoxelChunkStore) -> Self {
        Self { store }
    }

    /// Casts a ray from `origin` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::DegenerateRay`] for a zero-length segment.
    pub fn cast_ray(&self, origin: [f64; 3], target: [f64; 3]) -> TerraResult<Option<RayHit>> {
        cast_ray(self.store, origin, target)
    }
}
