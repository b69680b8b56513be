//! Core game logic - guideline rules as a synchronous state machine
//!
//! This crate contains the rules, geometry and scoring of guideline Tetris.
//! It has **no dependency** on rendering, key handling or an async runtime:
//!
//! - **Deterministic**: a fixed bag seed plus [`ManualClock`] replays exactly
//! - **Testable**: every timer is driven through the [`Clock`] trait
//! - **Portable**: any driver that can sleep can run a [`Session`]
//!
//! # Module Structure
//!
//! - [`pieces`]: shape catalog and the rotation/kick tables
//! - [`tetromino`]: a piece instance (kind, orientation, position)
//! - [`board`]: 10x20 grid, collision, rotation with kicks, merge, line clears
//! - [`bag`]: 7-bag randomizer
//! - [`latch`]: lock-free input latch shared with callers
//! - [`clock`]: game time that excludes paused spans
//! - [`scoring`]: line-clear table, back-to-back, level and gravity curves
//! - [`events`]: append-only score event log
//! - [`config`]: session configuration
//! - [`error`]: invariant and configuration errors
//! - [`session`]: the Generation / Falling / Lock / Pattern phase machine
//! - [`snapshot`]: read model for presentation layers
//!
//! # Example
//!
//! ```
//! use guideline_tetris_core::{ManualClock, Session, SessionConfig, Step};
//!
//! let clock = ManualClock::new();
//! let mut session = Session::with_clock(SessionConfig::default().with_seed(7), clock.clone()).unwrap();
//! let latch = session.latch();
//!
//! // Run until the first piece is falling
//! while session.step().unwrap() == Step::Continue {}
//!
//! latch.hard_drop();
//! while session.step().unwrap() == Step::Continue {}
//!
//! assert!(session.stats().score > 0); // hard drop awards points
//! ```
//!
//! # Timing
//!
//! - **Pacing**: 8ms between falling/lock iterations, 16ms while paused
//! - **Gravity**: 1000ms at level 1, `base * (0.8 - (l-1) * 0.007)^(l-1)` after
//! - **Soft Drop**: 20x faster than normal gravity
//! - **Lock Delay**: 500ms grace, reset by moves and rotations up to 15 times

pub mod bag;
pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod latch;
pub mod pieces;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod tetromino;

pub use guideline_tetris_types as types;

// Re-export commonly used types for convenience
pub use bag::PieceBag;
pub use board::{Board, Collision, OutOfBounds, RotationOutcome};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{GoalSystem, LockDownPolicy, SessionConfig};
pub use error::{ConfigError, InvariantViolation, SessionError};
pub use events::ScoreEventLog;
pub use latch::{InputLatch, Move, Moves};
pub use pieces::{get_shape, orientation_grid, rotation_candidates, PieceGrid, RotationCandidate};
pub use scoring::{calculate_drop_score, calculate_score, ScoreResult, Statistics};
pub use session::{Phase, Session, Step};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use tetromino::Tetromino;
