//! Piece instances: a kind plus orientation and board position.

use serde::{Deserialize, Serialize};

use crate::pieces::{get_shape, PieceShape};
use crate::types::{Color, PieceKind, Rotation};

/// Spawn position (x, y) of the bounding-box origin for most kinds.
///
/// y = -2 keeps the piece above the skyline until gravity brings it in.
pub const SPAWN_POSITION: (i8, i8) = (3, -2);

/// Spawn position of the O piece, whose box is only 2 wide.
pub const O_SPAWN_POSITION: (i8, i8) = (4, -2);

/// Spawn position for a kind.
pub fn spawn_position(kind: PieceKind) -> (i8, i8) {
    match kind {
        PieceKind::O => O_SPAWN_POSITION,
        _ => SPAWN_POSITION,
    }
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at spawn position and orientation
    pub fn new(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Create a tetromino with an explicit transform.
    pub fn at(kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> Self {
        Self {
            kind,
            rotation,
            x,
            y,
        }
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board coordinates of the four minos.
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }
}
