//! Score event log - append-only record of scoring actions.
//!
//! The session appends; readers either look at the latest event (popups) or
//! walk everything after a cursor they keep themselves (the runtime uses this
//! to forward events without copying the whole log every iteration).

use serde::Serialize;

use crate::types::{ScoreAction, ScoreEvent};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreEventLog {
    events: Vec<ScoreEvent>,
}

impl ScoreEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ScoreEvent) {
        tracing::debug!(action = ?event.action, x = event.board_x, y = event.board_y, "score event");
        self.events.push(event);
    }

    pub fn record(&mut self, action: ScoreAction, board_x: i32, board_y: i32) {
        self.push(ScoreEvent::new(action, board_x, board_y));
    }

    /// Latest event, or the `NoAction` sentinel before the first one.
    pub fn latest(&self) -> ScoreEvent {
        self.events.last().copied().unwrap_or(ScoreEvent::NO_ACTION)
    }

    /// Events appended at or after `cursor`.
    pub fn since(&self, cursor: usize) -> &[ScoreEvent] {
        self.events.get(cursor..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[ScoreEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
