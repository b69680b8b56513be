//! Input latch - the only state shared between callers and the session
//!
//! Callers write intents; the session reads and clears them once per
//! FALLING/LOCK iteration. Every field is an independent atomic, so a write
//! never blocks and never waits on the session.
//!
//! Shifts and rotations share one packed queue so the session replays them in
//! the order they were pressed. The queue holds [`MOVE_CAPACITY`] moves;
//! presses beyond that within one iteration are dropped.
//!
//! | Field | Written by | Cleared by |
//! |-------|------------|------------|
//! | `moves` | move and rotate intents | session (take) |
//! | `soft_drop` | start/stop soft drop | generation reset |
//! | `hard_drop` | hard drop intent | session (take) |
//! | `swap_requested` | swap intent | session (take) |
//! | `paused` | pause/resume | resume |
//! | `cancelled` | teardown | never |
//!
//! Intents are ignored while paused, except stop-soft-drop, pause, resume
//! and cancel.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

use crate::types::{Intent, TSpinKind};

const MOVE_BITS: u32 = 2;
const MOVE_MASK: u64 = (1 << MOVE_BITS) - 1;
/// The top bits of the packed queue hold the move count.
const COUNT_SHIFT: u32 = 58;
const SLOTS_MASK: u64 = (1 << COUNT_SHIFT) - 1;

/// Moves held between two session reads.
pub const MOVE_CAPACITY: u32 = COUNT_SHIFT / MOVE_BITS;

/// A shift or rotation waiting in the latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    RotateCw,
    RotateCcw,
}

impl Move {
    const fn code(self) -> u64 {
        match self {
            Move::Left => 0,
            Move::Right => 1,
            Move::RotateCw => 2,
            Move::RotateCcw => 3,
        }
    }

    const fn from_code(code: u64) -> Self {
        match code & MOVE_MASK {
            0 => Move::Left,
            1 => Move::Right,
            2 => Move::RotateCw,
            _ => Move::RotateCcw,
        }
    }
}

/// Moves taken from the latch, oldest press first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moves {
    slots: u64,
    remaining: u32,
}

impl Iterator for Moves {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let next = Move::from_code(self.slots);
        self.slots >>= MOVE_BITS;
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Moves {}

#[derive(Debug, Default)]
pub struct InputLatch {
    moves: AtomicU64,
    soft_drop: AtomicBool,
    hard_drop: AtomicBool,
    swap_requested: AtomicBool,
    paused: AtomicBool,
    cancelled: AtomicBool,
    last_action_was_rotation: AtomicBool,
    spin_detected: AtomicU8,
}

fn spin_to_u8(spin: TSpinKind) -> u8 {
    match spin {
        TSpinKind::None => 0,
        TSpinKind::Mini => 1,
        TSpinKind::Full => 2,
    }
}

fn spin_from_u8(raw: u8) -> TSpinKind {
    match raw {
        1 => TSpinKind::Mini,
        2 => TSpinKind::Full,
        _ => TSpinKind::None,
    }
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    fn accepting(&self) -> bool {
        !self.is_paused() && !self.is_cancelled()
    }

    /// Append a move behind the ones already queued. Fails when full.
    fn push_move(&self, next: Move) -> bool {
        if !self.accepting() {
            return false;
        }
        self.moves
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |packed| {
                let count = (packed >> COUNT_SHIFT) as u32;
                (count < MOVE_CAPACITY).then(|| {
                    let slots = (packed & SLOTS_MASK) | (next.code() << (count * MOVE_BITS));
                    (u64::from(count + 1) << COUNT_SHIFT) | slots
                })
            })
            .is_ok()
    }

    pub fn move_left(&self) -> bool {
        self.push_move(Move::Left)
    }

    pub fn move_right(&self) -> bool {
        self.push_move(Move::Right)
    }

    pub fn rotate(&self, clockwise: bool) -> bool {
        self.push_move(if clockwise {
            Move::RotateCw
        } else {
            Move::RotateCcw
        })
    }

    pub fn start_soft_drop(&self) -> bool {
        if !self.accepting() {
            return false;
        }
        self.soft_drop.store(true, Ordering::Release);
        true
    }

    /// Always accepted, so a key release during pause is not lost.
    pub fn stop_soft_drop(&self) -> bool {
        self.soft_drop.store(false, Ordering::Release);
        true
    }

    pub fn hard_drop(&self) -> bool {
        if !self.accepting() {
            return false;
        }
        self.last_action_was_rotation.store(false, Ordering::Release);
        self.hard_drop.store(true, Ordering::Release);
        true
    }

    pub fn swap(&self) -> bool {
        if !self.accepting() {
            return false;
        }
        self.last_action_was_rotation.store(false, Ordering::Release);
        self.swap_requested.store(true, Ordering::Release);
        true
    }

    pub fn pause(&self) -> bool {
        self.paused.store(true, Ordering::Release);
        true
    }

    pub fn resume(&self) -> bool {
        self.paused.store(false, Ordering::Release);
        true
    }

    /// Request session teardown. Sticky.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Route a resolved intent to the matching write.
    pub fn apply(&self, intent: Intent) -> bool {
        match intent {
            Intent::MoveLeft => self.move_left(),
            Intent::MoveRight => self.move_right(),
            Intent::RotateCw => self.rotate(true),
            Intent::RotateCcw => self.rotate(false),
            Intent::StartSoftDrop => self.start_soft_drop(),
            Intent::StopSoftDrop => self.stop_soft_drop(),
            Intent::HardDrop => self.hard_drop(),
            Intent::Swap => self.swap(),
            Intent::Pause => self.pause(),
            Intent::Resume => self.resume(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn soft_drop(&self) -> bool {
        self.soft_drop.load(Ordering::Acquire)
    }

    /// Shifts and rotations since the last call, in press order.
    pub fn take_moves(&self) -> Moves {
        let packed = self.moves.swap(0, Ordering::AcqRel);
        Moves {
            slots: packed & SLOTS_MASK,
            remaining: (packed >> COUNT_SHIFT) as u32,
        }
    }

    pub fn take_hard_drop(&self) -> bool {
        self.hard_drop.swap(false, Ordering::AcqRel)
    }

    pub fn take_swap_request(&self) -> bool {
        self.swap_requested.swap(false, Ordering::AcqRel)
    }

    pub fn last_action_was_rotation(&self) -> bool {
        self.last_action_was_rotation.load(Ordering::Acquire)
    }

    pub fn set_last_action_was_rotation(&self, value: bool) {
        self.last_action_was_rotation.store(value, Ordering::Release);
    }

    pub fn spin_detected(&self) -> TSpinKind {
        spin_from_u8(self.spin_detected.load(Ordering::Acquire))
    }

    pub fn set_spin_detected(&self, spin: TSpinKind) {
        self.spin_detected.store(spin_to_u8(spin), Ordering::Release);
    }

    /// Clear every per-piece flag. Pause and cancel survive.
    pub fn reset_transients(&self) {
        self.moves.store(0, Ordering::Release);
        self.soft_drop.store(false, Ordering::Release);
        self.hard_drop.store(false, Ordering::Release);
        self.swap_requested.store(false, Ordering::Release);
        self.last_action_was_rotation.store(false, Ordering::Release);
        self.set_spin_detected(TSpinKind::None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_keep_press_order() {
        let latch = InputLatch::new();
        assert!(latch.move_left());
        assert!(latch.rotate(true));
        assert!(latch.move_right());
        assert!(latch.rotate(false));
        assert!(latch.move_left());

        let moves: Vec<_> = latch.take_moves().collect();
        assert_eq!(
            moves,
            vec![Move::Left, Move::RotateCw, Move::Right, Move::RotateCcw, Move::Left]
        );
        assert_eq!(latch.take_moves().len(), 0);
    }

    #[test]
    fn test_paused_latch_ignores_intents() {
        let latch = InputLatch::new();
        latch.start_soft_drop();
        latch.pause();

        assert!(!latch.move_left());
        assert!(!latch.hard_drop());
        assert!(!latch.swap());
        assert!(!latch.apply(Intent::RotateCw));
        assert_eq!(latch.take_moves().len(), 0);
        assert!(!latch.take_hard_drop());

        assert!(latch.stop_soft_drop());
        assert!(!latch.soft_drop());

        assert!(latch.apply(Intent::Resume));
        assert!(!latch.is_paused());
        assert!(latch.apply(Intent::HardDrop));
        assert!(latch.take_hard_drop());
    }

    #[test]
    fn test_hard_drop_and_swap_clear_rotation_flag() {
        let latch = InputLatch::new();
        latch.set_last_action_was_rotation(true);
        latch.hard_drop();
        assert!(!latch.last_action_was_rotation());

        latch.set_last_action_was_rotation(true);
        latch.swap();
        assert!(!latch.last_action_was_rotation());
        assert!(latch.take_swap_request());
        assert!(!latch.take_swap_request());
    }

    #[test]
    fn test_reset_keeps_pause() {
        let latch = InputLatch::new();
        latch.move_right();
        latch.start_soft_drop();
        latch.set_spin_detected(TSpinKind::Full);
        latch.pause();
        latch.reset_transients();
        assert!(latch.is_paused());
        assert!(!latch.soft_drop());
        assert_eq!(latch.spin_detected(), TSpinKind::None);
        assert_eq!(latch.take_moves().len(), 0);
    }

    #[test]
    fn test_move_queue_drops_overflow() {
        let latch = InputLatch::new();
        let accepted = (0..300).filter(|_| latch.move_right()).count();
        assert_eq!(accepted, MOVE_CAPACITY as usize);

        // the last slot still decodes
        let _ = latch.take_moves();
        for _ in 0..MOVE_CAPACITY - 1 {
            latch.move_left();
        }
        latch.rotate(false);
        assert_eq!(latch.take_moves().last(), Some(Move::RotateCcw));
        assert!(latch.move_right());
    }

    #[test]
    fn test_cancel_blocks_intents() {
        let latch = InputLatch::new();
        latch.cancel();
        assert!(latch.is_cancelled());
        assert!(!latch.move_right());
    }
}
