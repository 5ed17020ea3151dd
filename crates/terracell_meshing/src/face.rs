//! Unit-cube face table.
//!
//! Each face lists its four corners in emission order. Triangles
//! `(0, 1, 2)` and `(2, 1, 3)` are counter-clockwise seen from outside.

/// One corner of a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corner {
    /// Offset from the voxel's minimum corner.
    pub pos: [u8; 3],
    /// Offset inside the atlas tile.
    pub uv: [u8; 2],
}

/// One axis-aligned face of a unit cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    /// Outward direction, also the neighbor offset.
    pub dir: [i32; 3],
    /// Corners in emission order.
    pub corners: [Corner; 4],
}

const fn corner(pos: [u8; 3], uv: [u8; 2]) -> Corner {
    Corner { pos, uv }
}

/// The six faces: -X, +X, -Y, +Y, -Z, +Z.
pub const FACES: [Face; 6] = [
    Face {
        dir: [-1, 0, 0],
        corners: [
            corner([0, 1, 0], [0, 1]),
            corner([0, 0, 0], [0, 0]),
            corner([0, 1, 1], [1, 1]),
            corner([0, 0, 1], [1, 0]),
        ],
    },
    Face {
        dir: [1, 0, 0],
        corners: [
            corner([1, 1, 1], [0, 1]),
            corner([1, 0, 1], [0, 0]),
            corner([1, 1, 0], [1, 1]),
            corner([1, 0, 0], [1, 0]),
        ],
    },
    Face {
        dir: [0, -1, 0],
        corners: [
            corner([1, 0, 1], [1, 0]),
            corner([0, 0, 1], [0, 0]),
            corner([1, 0, 0], [1, 1]),
            corner([0, 0, 0], [0, 1]),
        ],
    },
    Face {
        dir: [0, 1, 0],
        corners: [
            corner([0, 1, 1], [1, 1]),
            corner([1, 1, 1], [0, 1]),
            corner([0, 1, 0], [1, 0]),
            corner([1, 1, 0], [0, 0]),
        ],
    },
    Face {
        dir: [0, 0, -1],
        corners: [
            corner([1, 0, 0], [0, 0]),
            corner([0, 0, 0], [1, 0]),
            corner([1, 1, 0], [0, 1]),
            corner([0, 1, 0], [1, 1]),
        ],
    },
    Face {
        dir: [0, 0, 1],
        corners: [
            corner([0, 0, 1], [0, 0]),
            corner([1, 0, 1], [1, 0]),
            corner([0, 1, 1], [0, 1]),
            corner([1, 1, 1], [1, 1]),
        ],
    },
];
