//! Session module - the guideline phase state machine
//!
//! A session owns the board, bag, queue, hold slot, statistics and clock, and
//! advances one phase transition per [`Session::step`]. It never sleeps: every
//! place where the game waits is returned to the driver as
//! [`Step::Suspend`], and the driver (the async runtime or a test) performs
//! the wait.
//!
//! # Phases
//!
//! | Phase | Work | Next |
//! |-------|------|------|
//! | Generation | reset per-piece state, fill queue, spawn | Generation (queue short) / Falling |
//! | Falling | pause, swap, moves, hard drop, gravity | Falling / Lock / Pattern / Generation |
//! | Lock | extended-placement grace timer | Pattern / Falling |
//! | Pattern | game-over check, spin detection, merge, clear, score | Generation / GameOver |
//! | GameOver | terminal | - |
//!
//! Input only reaches the session through the shared [`InputLatch`], which
//! is read once per Falling iteration.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::bag::PieceBag;
use crate::board::{Board, RotationOutcome};
use crate::clock::{Clock, MonotonicClock};
use crate::config::{LockDownPolicy, SessionConfig};
use crate::error::{ConfigError, InvariantViolation, SessionError};
use crate::events::ScoreEventLog;
use crate::latch::{InputLatch, Move};
use crate::scoring::{self, Statistics};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::tetromino::Tetromino;
use crate::types::{
    PieceKind, Rotation, ScoreAction, TSpinKind, PACING_MS, PAUSE_POLL_MS, SOFT_DROP_DIVISOR,
};

/// Suspension between falling/lock iterations
pub const PACING: Duration = Duration::from_millis(PACING_MS);

/// Suspension while paused
pub const PAUSE_POLL: Duration = Duration::from_millis(PAUSE_POLL_MS);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Generation,
    Falling,
    Lock,
    Pattern,
    GameOver,
}

/// What the driver should do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Call `step` again right away
    Continue,
    /// Wait this long, then call `step` again
    Suspend(Duration),
    /// Game over, cancelled or faulted. Further steps do nothing.
    Halted,
}

/// Per-piece bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActionState {
    /// Swap already used for this piece
    swapped: bool,
    lowest_row: i8,
    soft_drop_cells: u32,
    hard_drop_cells: u32,
    last_fall: Duration,
    /// Time of the last successful move or rotation
    lock_reset_at: Duration,
    action_count: u32,
    drop_time: Duration,
    /// Previous piece cleared rows (back-to-back chain)
    cleared_on_last: bool,
}

impl ActionState {
    fn new(drop_time: Duration) -> Self {
        Self {
            swapped: false,
            lowest_row: i8::MIN,
            soft_drop_cells: 0,
            hard_drop_cells: 0,
            last_fall: Duration::ZERO,
            lock_reset_at: Duration::ZERO,
            action_count: 0,
            drop_time,
            cleared_on_last: false,
        }
    }

    /// Start a new piece. Swap flag, clear streak and drop interval carry over.
    fn reset(&mut self, now: Duration) {
        *self = Self {
            swapped: self.swapped,
            cleared_on_last: self.cleared_on_last,
            last_fall: now,
            lock_reset_at: now,
            ..Self::new(self.drop_time)
        };
    }
}

/// One game of guideline Tetris
#[derive(Debug)]
pub struct Session<C: Clock = MonotonicClock> {
    config: SessionConfig,
    board: Board,
    latch: Arc<InputLatch>,
    clock: C,
    bag: PieceBag,
    queue: VecDeque<PieceKind>,
    held: Option<PieceKind>,
    stats: Statistics,
    action: ActionState,
    phase: Phase,
    events: ScoreEventLog,
    faulted: bool,
}

impl Session<MonotonicClock> {
    /// Create a session on the wall clock.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> Session<C> {
    /// Create a session on an explicit clock.
    ///
    /// Only numeric config ranges are checked here. A reserved lock-down
    /// policy is accepted and faults the session at its first lock.
    pub fn with_clock(config: SessionConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate_values()?;
        let bag = match config.seed {
            Some(seed) => PieceBag::with_seed(seed),
            None => PieceBag::new(),
        };
        let drop_time = config.base_drop_time();
        Ok(Self {
            queue: VecDeque::with_capacity(config.queue_length),
            config,
            board: Board::new(),
            latch: Arc::new(InputLatch::new()),
            clock,
            bag,
            held: None,
            stats: Statistics::new(),
            action: ActionState::new(drop_time),
            phase: Phase::Generation,
            events: ScoreEventLog::new(),
            faulted: false,
        })
    }

    /// Shared handle for writing intents.
    pub fn latch(&self) -> Arc<InputLatch> {
        Arc::clone(&self.latch)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for fixtures and puzzle setups.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn queue(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }

    pub fn events(&self) -> &ScoreEventLog {
        &self.events
    }

    pub fn can_swap(&self) -> bool {
        !self.action.swapped
    }

    /// Current gravity interval
    pub fn drop_time(&self) -> Duration {
        self.action.drop_time
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Advance the state machine by one phase iteration.
    pub fn step(&mut self) -> Result<Step, SessionError> {
        if self.faulted || self.phase == Phase::GameOver || self.latch.is_cancelled() {
            return Ok(Step::Halted);
        }

        let result = match self.phase {
            Phase::Generation => Ok(self.generation()),
            Phase::Falling => self.falling(),
            Phase::Lock => self.lock(),
            Phase::Pattern => self.pattern(),
            Phase::GameOver => Ok(Step::Halted),
        };

        result.map_err(|violation| {
            self.faulted = true;
            tracing::error!(%violation, phase = ?self.phase, "session faulted");
            SessionError::from(violation)
        })
    }

    fn generation(&mut self) -> Step {
        let now = self.clock.now();
        self.action.reset(now);
        self.latch.reset_transients();

        if self.bag.is_empty() {
            self.bag.refill();
        }
        if self.queue.len() < self.config.queue_length {
            self.queue.push_back(self.bag.next_piece());
            return Step::Continue;
        }

        // queue_length >= 1 is validated, so the queue is non-empty here
        let Some(kind) = self.queue.pop_front() else {
            return Step::Continue;
        };
        self.queue.push_back(self.bag.next_piece());

        let piece = self.board.spawn(kind);
        self.action.lowest_row = piece.y;
        tracing::debug!(?kind, "spawned piece");
        self.phase = Phase::Falling;
        Step::Continue
    }

    fn falling(&mut self) -> Result<Step, InvariantViolation> {
        if self.latch.is_paused() {
            if !self.clock.is_paused() {
                self.clock.pause();
                tracing::debug!("paused");
            }
            return Ok(Step::Suspend(PAUSE_POLL));
        }
        if self.clock.is_paused() {
            self.clock.resume();
            tracing::debug!("resumed");
        }
        if self.board.active().is_none() {
            return Err(InvariantViolation::NoActivePiece);
        }

        let now = self.clock.now();
        if self.latch.take_swap_request() && !self.action.swapped {
            self.swap(now);
            return Ok(Step::Continue);
        }

        self.apply_moves(now);

        if self.latch.take_hard_drop() {
            // moves latched with the drop never make it a spin
            self.latch.set_last_action_was_rotation(false);
            self.action.hard_drop_cells = self.board.drop();
            self.phase = Phase::Pattern;
            return Ok(Step::Continue);
        }

        if self.board.is_grounded() {
            self.phase = Phase::Lock;
            return Ok(Step::Continue);
        }

        let soft_drop = self.latch.soft_drop();
        let interval = if soft_drop {
            self.action.drop_time / SOFT_DROP_DIVISOR
        } else {
            self.action.drop_time
        };
        if now.saturating_sub(self.action.last_fall) < interval {
            return Ok(Step::Suspend(PACING));
        }

        if self.board.fall_one_step() {
            self.action.last_fall = now;
            if let Some(piece) = self.board.active() {
                if piece.y > self.action.lowest_row {
                    self.action.lowest_row = piece.y;
                    self.action.action_count = 0;
                }
            }
            if soft_drop {
                self.action.soft_drop_cells += 1;
            }
        }
        Ok(Step::Continue)
    }

    fn register_action(&mut self, now: Duration) {
        self.action.action_count += 1;
        self.action.lock_reset_at = now;
    }

    /// Replay latched shifts and rotations in press order.
    fn apply_moves(&mut self, now: Duration) {
        for next in self.latch.take_moves() {
            match next {
                Move::Left | Move::Right => {
                    let moved = if next == Move::Left {
                        self.board.move_left()
                    } else {
                        self.board.move_right()
                    };
                    if !moved {
                        continue;
                    }
                    self.register_action(now);
                    self.latch.set_last_action_was_rotation(false);
                    self.latch.set_spin_detected(TSpinKind::None);
                }
                Move::RotateCw | Move::RotateCcw => {
                    let outcome = self.board.rotate(next == Move::RotateCw);
                    if !outcome.is_success() {
                        continue;
                    }
                    self.register_action(now);
                    let is_t = self
                        .board
                        .active()
                        .is_some_and(|piece| piece.kind == PieceKind::T);
                    let spin = if is_t && outcome == RotationOutcome::FinalKick {
                        TSpinKind::Full
                    } else {
                        TSpinKind::None
                    };
                    self.latch.set_last_action_was_rotation(true);
                    self.latch.set_spin_detected(spin);
                }
            }
        }
    }

    fn swap(&mut self, now: Duration) {
        let Some(current) = self.board.clear_active() else {
            return;
        };
        self.action.swapped = true;

        match self.held.replace(current.kind) {
            None => {
                tracing::debug!(held = ?current.kind, "hold");
                self.phase = Phase::Generation;
            }
            Some(kind) => {
                self.action.reset(now);
                self.latch.reset_transients();
                let piece = self.board.spawn(kind);
                self.action.lowest_row = piece.y;
                tracing::debug!(held = ?current.kind, active = ?kind, "swap");
            }
        }
    }

    fn lock(&mut self) -> Result<Step, InvariantViolation> {
        if self.config.lock_down != LockDownPolicy::ExtendedPlacement {
            return Err(InvariantViolation::UnimplementedLockDown {
                policy: self.config.lock_down,
            });
        }
        if self.latch.is_paused() {
            self.phase = Phase::Falling;
            return Ok(Step::Continue);
        }

        let now = self.clock.now();
        let anchor = self.action.last_fall.max(self.action.lock_reset_at);
        let expired = now.saturating_sub(anchor) > self.config.lock_down_time()
            || self.action.action_count >= self.config.max_lock_actions;
        if expired && self.board.is_grounded() {
            self.phase = Phase::Pattern;
            return Ok(Step::Continue);
        }

        self.phase = Phase::Falling;
        Ok(Step::Suspend(PACING))
    }

    fn pattern(&mut self) -> Result<Step, InvariantViolation> {
        let piece = *self.board.active().ok_or(InvariantViolation::NoActivePiece)?;

        // merge cannot represent cells above the skyline
        let hit = self.board.collide(&piece);
        if hit.collides || hit.out_of_bounds.top {
            self.phase = Phase::GameOver;
            tracing::info!(score = self.stats.score, level = self.stats.level, "game over");
            return Ok(Step::Halted);
        }

        let mut spin = self.detect_spin(&piece);
        self.board.merge_piece()?;
        let cleared = self.board.clear_full_rows();
        let lines = cleared.len();
        if spin == TSpinKind::Mini && lines >= 2 {
            // a mini has no multi-row entry; the clear proves a full slot
            spin = TSpinKind::Full;
        }
        let (px, py) = (i32::from(piece.x), i32::from(piece.y));

        let mut points = 0;
        let award = scoring::calculate_score(
            spin,
            lines,
            self.stats.level,
            self.action.cleared_on_last,
        )?;
        if let Some(result) = award {
            points += result.points;
            self.events.record(result.action, px, py);
            if result.back_to_back {
                self.events.record(ScoreAction::BackToBack, 5, py - 2);
            }
            self.stats.rewarded_lines_cleared += result.credit;
        }
        if lines > 0 {
            self.stats.actual_lines_cleared += lines as u32;
            tracing::info!(rows = ?cleared.as_slice(), ?spin, "cleared rows");
        }
        if award.is_some() || lines > 0 {
            self.update_level();
        }
        self.action.cleared_on_last = lines > 0;

        if self.action.soft_drop_cells > 0 {
            points += scoring::calculate_drop_score(self.action.soft_drop_cells, false);
            self.events.record(ScoreAction::SoftDrop, 5, py - 4);
        }
        if self.action.hard_drop_cells > 0 {
            points += scoring::calculate_drop_score(self.action.hard_drop_cells, true);
            self.events.record(ScoreAction::HardDrop, 5, py - 4);
        }
        self.stats.score += points;

        self.action.swapped = false;
        self.phase = Phase::Generation;
        Ok(Step::Continue)
    }

    fn update_level(&mut self) {
        let level = scoring::calculate_level(
            self.config.goal_system,
            self.stats.actual_lines_cleared,
            self.stats.rewarded_lines_cleared,
        );
        if level != self.stats.level {
            self.stats.level = level;
            self.action.drop_time = scoring::drop_interval(self.config.base_drop_time(), level);
            tracing::info!(level, drop_ms = self.action.drop_time.as_millis() as u64, "level up");
        }
    }

    fn detect_spin(&self, piece: &Tetromino) -> TSpinKind {
        if !self.latch.last_action_was_rotation() {
            return TSpinKind::None;
        }
        if self.latch.spin_detected() == TSpinKind::Full {
            return TSpinKind::Full;
        }
        if piece.kind != PieceKind::T {
            return TSpinKind::None;
        }
        detect_t_spin(
            &self.board,
            piece,
            self.config.recognise_wall_in_t_spin,
            self.config.empty_front_as_mini,
        )
    }

    /// Fill `out` with the current read model.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        for (dst, src) in out.board.iter_mut().zip(self.board.rows()) {
            dst.copy_from_slice(src);
        }
        out.active = self.board.active().copied().map(ActiveSnapshot::from);
        out.ghost_y = self.board.ghost_y();
        out.hold = self.held;
        out.can_swap = !self.action.swapped;
        out.queue.clear();
        out.queue.extend(self.queue.iter().copied());
        out.stats = self.stats;
        out.paused = self.latch.is_paused();
        out.game_over = self.phase == Phase::GameOver;
        out.phase = self.phase;
        out.last_event = self.events.latest();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snapshot = GameSnapshot::default();
        self.snapshot_into(&mut snapshot);
        snapshot
    }
}

/// Corner test for a T piece resting at its current transform.
///
/// Corners are read clockwise from the top-left of the 3x3 box and rotated so
/// the first two face the way the T points. Cells outside the board count as
/// filled only when `wall_counts` is set.
pub fn detect_t_spin(
    board: &Board,
    piece: &Tetromino,
    wall_counts: bool,
    empty_front_as_mini: bool,
) -> TSpinKind {
    let filled = |x: i8, y: i8| board.is_occupied(x, y).unwrap_or(wall_counts);
    let (x, y) = (piece.x, piece.y);

    let mut corners = [
        filled(x, y),
        filled(x + 2, y),
        filled(x + 2, y + 2),
        filled(x, y + 2),
    ];
    corners.rotate_left(piece.rotation.index());
    let [front_a, front_b, back_a, back_b] = corners;

    if front_a && front_b && (back_a || back_b) {
        if !empty_front_as_mini {
            return TSpinKind::Full;
        }
        let (fx, fy) = match piece.rotation {
            Rotation::North => (x + 1, y + 2),
            Rotation::East => (x, y + 1),
            Rotation::South => (x + 1, y),
            Rotation::West => (x + 2, y + 1),
        };
        if filled(fx, fy) {
            TSpinKind::Full
        } else {
            TSpinKind::Mini
        }
    } else if back_a && back_b && (front_a || front_b) {
        TSpinKind::Mini
    } else {
        TSpinKind::None
    }
}
