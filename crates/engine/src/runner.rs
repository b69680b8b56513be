//! Async driver loop: steps a session and performs its suspensions.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, error, info, instrument};

use guideline_tetris_core::{Clock, GameSnapshot, Session, SessionError, Step};
use guideline_tetris_types::ScoreEvent;

/// Shared score history
pub(crate) type EventLog = Arc<Mutex<Vec<ScoreEvent>>>;

/// Sending halves of the read model, owned by the running task.
#[derive(Debug)]
pub(crate) struct Publisher {
    pub(crate) snapshots: watch::Sender<GameSnapshot>,
    pub(crate) events: watch::Sender<ScoreEvent>,
    pub(crate) log: EventLog,
    /// Number of session events already forwarded
    cursor: usize,
}

impl Publisher {
    pub(crate) fn new(
        snapshots: watch::Sender<GameSnapshot>,
        events: watch::Sender<ScoreEvent>,
        log: EventLog,
    ) -> Self {
        Self {
            snapshots,
            events,
            log,
            cursor: 0,
        }
    }

    /// Push the session's current state and any new events.
    pub(crate) fn publish<C: Clock>(&mut self, session: &Session<C>) {
        self.snapshots.send_modify(|snapshot| session.snapshot_into(snapshot));

        let fresh = session.events().since(self.cursor);
        if fresh.is_empty() {
            return;
        }
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(fresh);
        for event in fresh {
            self.events.send_replace(*event);
        }
        self.cursor += fresh.len();
    }
}

/// Run `session` to completion.
///
/// Returns the final snapshot on game over or cancellation, and the fault on
/// an invariant violation.
#[instrument(skip_all)]
pub(crate) async fn run_session<C: Clock>(
    mut session: Session<C>,
    mut publisher: Publisher,
) -> Result<GameSnapshot, SessionError> {
    info!("session started");
    loop {
        let step = session.step();
        publisher.publish(&session);
        match step {
            Ok(Step::Continue) => {}
            Ok(Step::Suspend(duration)) => tokio::time::sleep(duration).await,
            Ok(Step::Halted) => break,
            Err(err) => {
                error!(%err, "session ended with an error");
                return Err(err);
            }
        }
    }

    let snapshot = session.snapshot();
    if snapshot.game_over {
        info!(score = snapshot.stats.score, level = snapshot.stats.level, "session over");
    } else {
        debug!("session cancelled");
    }
    Ok(snapshot)
}
