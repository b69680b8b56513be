//! Read model published to presentation layers.
//!
//! A snapshot is a plain copy of everything a renderer needs. The session
//! fills one with [`Session::snapshot_into`](crate::session::Session::snapshot_into)
//! so callers can reuse the allocation between frames.

use serde::Serialize;

use crate::scoring::Statistics;
use crate::session::Phase;
use crate::tetromino::Tetromino;
use crate::types::{Cell, PieceKind, Rotation, ScoreEvent, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

impl ActiveSnapshot {
    /// Absolute cells of the piece
    pub fn cells(&self) -> [(i8, i8); 4] {
        Tetromino::at(self.kind, self.rotation, self.x, self.y).cells()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Locked cells only, `board[y][x]`
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub hold: Option<PieceKind>,
    /// Whether a swap is still available for the current piece
    pub can_swap: bool,
    pub queue: Vec<PieceKind>,
    pub stats: Statistics,
    pub paused: bool,
    pub game_over: bool,
    pub phase: Phase,
    pub last_event: ScoreEvent,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.active = None;
        self.ghost_y = None;
        self.hold = None;
        self.can_swap = true;
        self.queue.clear();
        self.stats = Statistics::new();
        self.paused = false;
        self.game_over = false;
        self.phase = Phase::Generation;
        self.last_event = ScoreEvent::NO_ACTION;
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// Number of locked cells on the board
    pub fn filled_cells(&self) -> usize {
        self.board.iter().flatten().filter(|c| c.is_some()).count()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            hold: None,
            can_swap: true,
            queue: Vec::new(),
            stats: Statistics::new(),
            paused: false,
            game_over: false,
            phase: Phase::Generation,
            last_event: ScoreEvent::NO_ACTION,
        };
        s.clear();
        s
    }
}
