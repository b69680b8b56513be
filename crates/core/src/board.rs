//! Board module - manages the game grid and the active piece
//!
//! The board is a 10x20 grid where each cell is empty or holds the colour of
//! the piece that locked there. Uses a flat array for cache locality and
//! zero-allocation line clears.
//!
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom). Pieces spawn above the skyline at y = -2, so collision
//! tests treat rows above the field as open air unless the caller asks for
//! the `top` flag.
//!
//! At most one piece is active. Its footprint lives only in [`Board::active`]
//! and is written into the grid by [`Board::merge_piece`].

use arrayvec::ArrayVec;

use crate::error::InvariantViolation;
use crate::pieces::{get_shape, rotation_candidates, FINAL_KICK_INDEX};
use crate::tetromino::Tetromino;
use crate::types::{Cell, Color, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Colour used by [`Board::from_rows`] fixtures.
pub const FIXTURE_COLOR: Color = Color::rgb(0x808080);

/// Which board edges a placement crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutOfBounds {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl OutOfBounds {
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }
}

/// Result of testing a placement against the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collision {
    /// An in-bounds mino overlaps a filled cell
    pub collides: bool,
    pub out_of_bounds: OutOfBounds,
}

impl Collision {
    /// Placement is illegal for gravity: overlap or below the floor.
    pub fn blocks_fall(&self) -> bool {
        self.collides || self.out_of_bounds.bottom
    }

    /// Placement is illegal for rotation. The top edge is ignored so pieces can
    /// still turn above the skyline.
    pub fn blocks_rotation(&self) -> bool {
        self.collides
            || self.out_of_bounds.bottom
            || self.out_of_bounds.left
            || self.out_of_bounds.right
    }
}

/// Outcome of [`Board::rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// Basic rotation fit without any offset
    NoKick,
    /// One of the intermediate kicks fit
    Kicked,
    /// Only the last-resort kick fit
    FinalKick,
    /// No candidate fit; the piece is unchanged
    Blocked,
}

impl RotationOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, RotationOutcome::Blocked)
    }
}

/// The game board - 10 columns x 20 rows plus the active piece
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
    active: Option<Tetromino>,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            active: None,
        }
    }

    /// Build a fixture from ASCII rows aligned to the bottom of the board.
    ///
    /// `#` marks a filled cell, anything else is empty. Extra rows beyond
    /// the board height are ignored.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let skip = rows.len().saturating_sub(BOARD_HEIGHT as usize);
        let top = BOARD_HEIGHT as usize - (rows.len() - skip);
        for (offset, row) in rows[skip..].iter().enumerate() {
            let y = (top + offset) as i8;
            for (x, ch) in row.chars().take(BOARD_WIDTH as usize).enumerate() {
                if ch == '#' {
                    board.set(x as i8, y, Some(FIXTURE_COLOR));
                }
            }
        }
        board
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether (x, y) holds a locked mino. `None` when out of bounds.
    pub fn is_occupied(&self, x: i8, y: i8) -> Option<bool> {
        self.get(x, y).map(|cell| cell.is_some())
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Locked cell, or the active piece's colour when it covers (x, y).
    pub fn cell_with_active(&self, x: i8, y: i8) -> Option<Cell> {
        let locked = self.get(x, y)?;
        if let Some(piece) = &self.active {
            if piece.cells().contains(&(x, y)) {
                return Some(Some(piece.color()));
            }
        }
        Some(locked)
    }

    /// Clear the grid and drop the active piece
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
        self.active = None;
    }

    pub fn active(&self) -> Option<&Tetromino> {
        self.active.as_ref()
    }

    /// Place a fresh spawn-state instance of `kind` as the active piece.
    pub fn spawn(&mut self, kind: PieceKind) -> Tetromino {
        let piece = Tetromino::new(kind);
        self.active = Some(piece);
        piece
    }

    /// Replace the active piece without any collision check.
    pub fn set_active(&mut self, piece: Tetromino) {
        self.active = Some(piece);
    }

    pub fn clear_active(&mut self) -> Option<Tetromino> {
        self.active.take()
    }

    /// Test `piece` at its own transform.
    pub fn collide(&self, piece: &Tetromino) -> Collision {
        self.collide_at(piece.kind, piece.rotation, piece.x, piece.y)
    }

    /// Test `kind` placed with the given orientation and origin.
    pub fn collide_at(&self, kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> Collision {
        let mut result = Collision::default();
        for (dx, dy) in get_shape(kind, rotation) {
            let (px, py) = (x + dx, y + dy);
            let bounds = &mut result.out_of_bounds;
            bounds.left |= px < 0;
            bounds.right |= px >= BOARD_WIDTH as i8;
            bounds.top |= py < 0;
            bounds.bottom |= py >= BOARD_HEIGHT as i8;
            if self.is_occupied(px, py) == Some(true) {
                result.collides = true;
            }
        }
        result
    }

    /// Whether the active piece cannot move one row down.
    pub fn is_grounded(&self) -> bool {
        match &self.active {
            Some(p) => self.collide_at(p.kind, p.rotation, p.x, p.y + 1).blocks_fall(),
            None => false,
        }
    }

    fn try_shift(&mut self, dx: i8) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let hit = self.collide_at(piece.kind, piece.rotation, piece.x + dx, piece.y);
        let blocked = hit.collides
            || if dx < 0 {
                hit.out_of_bounds.left
            } else {
                hit.out_of_bounds.right
            };
        if blocked {
            return false;
        }
        self.active = Some(Tetromino {
            x: piece.x + dx,
            ..piece
        });
        true
    }

    /// Shift the active piece one column left
    pub fn move_left(&mut self) -> bool {
        self.try_shift(-1)
    }

    /// Shift the active piece one column right
    pub fn move_right(&mut self) -> bool {
        self.try_shift(1)
    }

    /// Move the active piece down one row if nothing is below it.
    pub fn fall_one_step(&mut self) -> bool {
        if self.active.is_none() || self.is_grounded() {
            return false;
        }
        if let Some(piece) = &mut self.active {
            piece.y += 1;
        }
        true
    }

    /// Move the active piece to its resting row. Returns rows travelled.
    pub fn drop(&mut self) -> u32 {
        let mut rows = 0;
        while self.fall_one_step() {
            rows += 1;
        }
        rows
    }

    /// Row the active piece would rest on after a hard drop.
    pub fn ghost_y(&self) -> Option<i8> {
        let piece = self.active?;
        let mut y = piece.y;
        while !self
            .collide_at(piece.kind, piece.rotation, piece.x, y + 1)
            .blocks_fall()
        {
            y += 1;
        }
        Some(y)
    }

    /// Rotate the active piece, trying each kick candidate in priority order.
    pub fn rotate(&mut self, clockwise: bool) -> RotationOutcome {
        let Some(piece) = self.active else {
            return RotationOutcome::Blocked;
        };

        for (index, candidate) in rotation_candidates(&piece, clockwise)
            .into_iter()
            .enumerate()
        {
            let hit = self.collide_at(piece.kind, candidate.rotation, candidate.x, candidate.y);
            if hit.blocks_rotation() {
                continue;
            }
            self.active = Some(Tetromino::at(
                piece.kind,
                candidate.rotation,
                candidate.x,
                candidate.y,
            ));
            return match index {
                0 => RotationOutcome::NoKick,
                FINAL_KICK_INDEX => RotationOutcome::FinalKick,
                _ => RotationOutcome::Kicked,
            };
        }
        RotationOutcome::Blocked
    }

    /// Write the active piece into the grid and clear it.
    ///
    /// Every mino is validated before any cell is written, so a failed merge
    /// leaves the grid untouched.
    pub fn merge_piece(&mut self) -> Result<(), InvariantViolation> {
        let piece = self.active.ok_or(InvariantViolation::NoActivePiece)?;
        let cells = piece.cells();
        for &(x, y) in &cells {
            match self.is_occupied(x, y) {
                None => return Err(InvariantViolation::MergeOutOfBounds { x, y }),
                Some(true) => return Err(InvariantViolation::MergeCollision { x, y }),
                Some(false) => {}
            }
        }
        let color = piece.color();
        for (x, y) in cells {
            self.set(x, y, Some(color));
        }
        self.active = None;
        Ok(())
    }

    /// Clear all full rows and return their indices in ascending order.
    ///
    /// Uses a two-pointer scan from the bottom so non-adjacent rows shift by
    /// the right cumulative amount in a single pass.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, { BOARD_HEIGHT as usize }> {
        let mut cleared_rows = ArrayVec::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared_rows.reverse();
        cleared_rows
    }

    /// Rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(BOARD_WIDTH as usize)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
