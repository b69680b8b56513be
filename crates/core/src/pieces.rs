//! Pieces module - Tetromino shapes and the guideline rotation system
//!
//! Shapes are stored as mino offsets inside each kind's square bounding box
//! (side 2 for O, 3 for J/L/S/T/Z, 4 for I). Kick tables are pure data: each
//! (orientation, direction) pair yields five candidate offsets in priority
//! order, and spin detection depends on which index succeeded.

use arrayvec::ArrayVec;

use crate::tetromino::Tetromino;
use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
    }
}

/// I piece shapes
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece shapes (same for all rotations, 2x2 box)
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(0, 0), (1, 0), (0, 1), (1, 1)]
}

/// T piece shapes
fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// S piece shapes
fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// Z piece shapes
fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

/// J piece shapes
fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

/// L piece shapes
fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Boolean occupancy matrix of one orientation, indexed `[col][row]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceGrid {
    size: u8,
    cells: [[bool; 4]; 4],
}

impl PieceGrid {
    /// Side length of the bounding box.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Whether the cell at (col, row) of the bounding box is filled.
    /// Positions outside the box are empty.
    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        col < self.size as usize && row < self.size as usize && self.cells[col][row]
    }

    /// Number of filled cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&cell| cell).count()
    }

    /// Row-major text rendering, `#` for filled cells. Handy in test output.
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.size as usize)
            .map(|row| {
                (0..self.size as usize)
                    .map(|col| if self.cells[col][row] { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

/// The fixed occupancy pattern of `kind` in `rotation`.
pub fn orientation_grid(kind: PieceKind, rotation: Rotation) -> PieceGrid {
    let mut cells = [[false; 4]; 4];
    for (dx, dy) in get_shape(kind, rotation) {
        cells[dx as usize][dy as usize] = true;
    }
    PieceGrid {
        size: kind.grid_size(),
        cells,
    }
}

/// Five kick offsets (dx, dy) in priority order; +dy is down.
pub type KickRow = [(i8, i8); 5];

/// Kick data indexed by `[from_rotation][direction]`, direction 0 = CW, 1 = CCW.
pub type KickTable = [[KickRow; 2]; 4];

/// Kick table shared by J, L, S and Z
const JLSZ_KICKS: KickTable = [
    // from N
    [
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    ],
    // from E
    [
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    // from S
    [
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    ],
    // from W
    [
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
];

/// I piece kick table
const I_KICKS: KickTable = [
    // from N
    [
        [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
        [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    ],
    // from E
    [
        [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
        [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    ],
    // from S
    [
        [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
        [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    ],
    // from W
    [
        [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
        [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    ],
];

/// T piece kick table (guideline appendix variant)
const T_KICKS: KickTable = [
    // from N
    [
        [(0, 0), (-1, 0), (-1, -1), (0, 0), (-1, 2)],
        [(0, 0), (1, 0), (1, -1), (0, 0), (1, 2)],
    ],
    // from E
    [
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    // from S
    [
        [(0, 0), (1, 0), (0, 0), (0, 2), (1, 2)],
        [(0, 0), (-1, 0), (0, 0), (0, 2), (-1, 2)],
    ],
    // from W
    [
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
];

/// Kick table for a rotating kind. O has none.
pub fn get_kick_table(kind: PieceKind) -> Option<&'static KickTable> {
    match kind {
        PieceKind::O => None,
        PieceKind::I => Some(&I_KICKS),
        PieceKind::T => Some(&T_KICKS),
        PieceKind::J | PieceKind::L | PieceKind::S | PieceKind::Z => Some(&JLSZ_KICKS),
    }
}

/// Kicks tried for `from` rotating in the given direction.
pub fn get_kicks(kind: PieceKind, from: Rotation, clockwise: bool) -> Option<&'static KickRow> {
    get_kick_table(kind).map(|table| &table[from.index()][usize::from(!clockwise)])
}

/// One transform to test during rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationCandidate {
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

/// Index of the last-resort kick; success there is a full T-spin trigger.
pub const FINAL_KICK_INDEX: usize = 4;

/// Candidate transforms for rotating `piece`, in priority order.
///
/// Rotating kinds get five candidates. O gets a single candidate that leaves
/// orientation and position untouched.
pub fn rotation_candidates(piece: &Tetromino, clockwise: bool) -> ArrayVec<RotationCandidate, 5> {
    let mut out = ArrayVec::new();

    let Some(kicks) = get_kicks(piece.kind, piece.rotation, clockwise) else {
        out.push(RotationCandidate {
            rotation: piece.rotation,
            x: piece.x,
            y: piece.y,
        });
        return out;
    };

    let rotation = if clockwise {
        piece.rotation.rotate_cw()
    } else {
        piece.rotation.rotate_ccw()
    };
    for &(dx, dy) in kicks {
        out.push(RotationCandidate {
            rotation,
            x: piece.x + dx,
            y: piece.y + dy,
        });
    }
    out
}
