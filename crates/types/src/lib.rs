//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental vocabulary used by the engine and its
//! presentation-layer callers. Everything here is plain data: piece kinds,
//! orientations, colours, intents and score events.
//!
//! # Board Dimensions
//!
//! Standard guideline playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn position**: (3, -2) for most pieces, (4, -2) for O, above the skyline
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `PACING_MS` | 8 | Suspension between falling/lock iterations |
//! | `PAUSE_POLL_MS` | 16 | Poll interval while paused |
//! | `BASE_DROP_MS` | 1000 | Gravity at level 1 |
//! | `SOFT_DROP_DIVISOR` | 20 | Soft drop is 20x faster |
//! | `LOCK_DOWN_MS` | 500 | Lock-down grace period |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock-reset actions per lowest row |
//!
//! # Examples
//!
//! ```
//! use guideline_tetris_types::{Intent, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::T.grid_size(), 3);
//! assert_eq!(PieceKind::T.color().to_string(), "#FF97FF");
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_ne!(Intent::HardDrop, Intent::Swap);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Suspension between falling/lock iterations
pub const PACING_MS: u64 = 8;

/// Poll interval while the session is paused
pub const PAUSE_POLL_MS: u64 = 16;

/// Base gravity interval at level 1 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u64 = 1000;

/// Soft drop divides the current drop interval by this value
pub const SOFT_DROP_DIVISOR: u32 = 20;

/// Lock-down grace period when the piece is grounded
pub const LOCK_DOWN_MS: u64 = 500;

/// Maximum number of lock-reset actions before a forced lock
pub const LOCK_RESET_LIMIT: u32 = 15;

/// Number of upcoming pieces shown in the queue
pub const QUEUE_LENGTH: usize = 5;

/// Highest level fed into the drop-time curve.
///
/// The curve base `0.8 - (level - 1) * 0.007` is last positive at level 115.
pub const MAX_SPEED_LEVEL: u32 = 115;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u64 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u64 = 2;

/// A 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    pub const fn rgb(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell (the sentinel, distinct from every real colour)
/// - `Some(Color)`: Cell filled with the colour of the piece that locked there
pub type Cell = Option<Color>;

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and colour:
/// - **I**: Sky blue, 4-wide bar
/// - **J**: Dark blue
/// - **L**: Orange (mirror of J)
/// - **O**: Yellow, 2x2 square
/// - **S**: Green
/// - **T**: Pink
/// - **Z**: Red (mirror of S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Every kind, in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Number of occupied cells in every orientation.
    pub const CELL_COUNT: usize = 4;

    /// Position in [`PieceKind::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Fixed display colour.
    pub const fn color(self) -> Color {
        match self {
            PieceKind::I => Color::rgb(0x87CEEB),
            PieceKind::J => Color::rgb(0x0341AE),
            PieceKind::L => Color::rgb(0xFF971C),
            PieceKind::O => Color::rgb(0xFFD500),
            PieceKind::S => Color::rgb(0x72CB3B),
            PieceKind::T => Color::rgb(0xFF97FF),
            PieceKind::Z => Color::rgb(0xFF3213),
        }
    }

    /// Side length of the square bounding box.
    pub const fn grid_size(self) -> u8 {
        match self {
            PieceKind::O => 2,
            PieceKind::I => 4,
            _ => 3,
        }
    }
}

/// Orientation states
///
/// - **North**: Spawn orientation (0)
/// - **East**: Rotated 90° clockwise (1)
/// - **South**: Rotated 180° (2)
/// - **West**: Rotated 90° counter-clockwise (3)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Numeric orientation (N=0, E=1, S=2, W=3)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Rotation::index`], wrapping modulo 4.
    pub const fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use guideline_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotate counter-clockwise (-90° or 270°)
    ///
    /// # Examples
    ///
    /// ```
    /// use guideline_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        Self::from_index(self.index() + 3)
    }
}

/// Resolved user intents accepted by the engine
///
/// The presentation layer maps keys or pointer gestures onto these. Each one
/// only writes the input latch; the session consumes it on its next iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Shift piece one cell left
    MoveLeft,
    /// Shift piece one cell right
    MoveRight,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Begin soft drop (gravity 20x faster)
    StartSoftDrop,
    /// End soft drop
    StopSoftDrop,
    /// Drop to the resting position and lock
    HardDrop,
    /// Swap with the held piece (once per piece)
    Swap,
    Pause,
    Resume,
}

/// T-Spin detection result
///
/// - **None**: Not a T-spin
/// - **Mini**: Front corners filled but the cell facing the open side is empty,
///   or only the back corners are filled
/// - **Full**: Both front corners plus a back corner filled, or the rotation
///   used its last-resort kick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TSpinKind {
    #[default]
    None,
    Mini,
    Full,
}

/// Scoring actions reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreAction {
    /// Sentinel emitted before any real event
    #[default]
    NoAction,
    Single,
    Double,
    Triple,
    Tetris,
    MiniTSpin,
    MiniTSpinSingle,
    TSpin,
    TSpinSingle,
    TSpinDouble,
    TSpinTriple,
    BackToBack,
    SoftDrop,
    HardDrop,
}

/// A score event anchored at a board position, used for popups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub action: ScoreAction,
    pub board_x: i32,
    pub board_y: i32,
}

impl ScoreEvent {
    /// The default event every subscriber sees before play produces one.
    pub const NO_ACTION: ScoreEvent = ScoreEvent {
        action: ScoreAction::NoAction,
        board_x: 5,
        board_y: 18,
    };

    pub const fn new(action: ScoreAction, board_x: i32, board_y: i32) -> Self {
        Self {
            action,
            board_x,
            board_y,
        }
    }
}

impl Default for ScoreEvent {
    fn default() -> Self {
        Self::NO_ACTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guideline_timing_defaults() {
        assert_eq!(PACING_MS, 8);
        assert_eq!(PAUSE_POLL_MS, 16);
        assert_eq!(BASE_DROP_MS, 1000);
        assert_eq!(SOFT_DROP_DIVISOR, 20);
        assert_eq!(LOCK_DOWN_MS, 500);
        assert_eq!(LOCK_RESET_LIMIT, 15);
        assert_eq!(QUEUE_LENGTH, 5);
        assert!(0.8 - f64::from(MAX_SPEED_LEVEL - 1) * 0.007 > 0.0);
        assert!(0.8 - f64::from(MAX_SPEED_LEVEL) * 0.007 < 0.0);
    }

    #[test]
    fn test_rotation_index_round_trip() {
        for (i, rotation) in [
            Rotation::North,
            Rotation::East,
            Rotation::South,
            Rotation::West,
        ]
        .into_iter()
        .enumerate()
        {
            assert_eq!(rotation.index(), i);
            assert_eq!(Rotation::from_index(i), rotation);
            assert_eq!(rotation.rotate_cw().rotate_ccw(), rotation);
        }
        assert_eq!(Rotation::from_index(5), Rotation::East);
    }

    #[test]
    fn test_piece_colors_are_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a.color(), b.color(), "{a:?} and {b:?} share a colour");
            }
        }
        assert_eq!(PieceKind::T.color().to_string(), "#FF97FF");
        assert_eq!(PieceKind::J.color().to_string(), "#0341AE");
    }

    #[test]
    fn test_grid_sizes() {
        assert_eq!(PieceKind::O.grid_size(), 2);
        assert_eq!(PieceKind::I.grid_size(), 4);
        for kind in [PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::T, PieceKind::Z] {
            assert_eq!(kind.grid_size(), 3);
        }
    }

    #[test]
    fn test_score_event_default_is_no_action() {
        let event = ScoreEvent::default();
        assert_eq!(event.action, ScoreAction::NoAction);
        assert_eq!(event, ScoreEvent::NO_ACTION);
    }

    #[test]
    fn test_score_action_serializes_snake_case() {
        let json = serde_json::to_string(&ScoreAction::TSpinDouble).unwrap();
        assert_eq!(json, "\"t_spin_double\"");
    }
}
