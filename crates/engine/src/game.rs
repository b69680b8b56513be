//! Lifecycle handle for a running game.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use guideline_tetris_core::{
    Clock, ConfigError, GameSnapshot, InputLatch, MonotonicClock, Session, SessionConfig,
    SessionError,
};
use guideline_tetris_types::{Intent, ScoreEvent};

use crate::runner::{run_session, EventLog, Publisher};

type SessionTask = JoinHandle<Result<GameSnapshot, SessionError>>;

/// A game session plus the task that drives it.
///
/// Intents only write the shared input latch and return immediately. The
/// read model is published through `tokio::sync::watch` channels after every
/// phase iteration.
///
/// Dropping a `Game` cancels its task; [`Game::destroy`] also waits for it.
#[derive(Debug)]
pub struct Game<C: Clock = MonotonicClock> {
    latch: Arc<InputLatch>,
    /// Session and publisher waiting for `start`
    pending: Option<(Session<C>, Publisher)>,
    task: Option<SessionTask>,
    snapshots: watch::Receiver<GameSnapshot>,
    events: watch::Receiver<ScoreEvent>,
    log: EventLog,
}

impl Game<MonotonicClock> {
    /// Validate `config` and build a game on the wall clock. Nothing runs
    /// until [`Game::start`].
    #[instrument(skip(config), fields(seed = ?config.seed))]
    pub fn new_game(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock + Send + 'static> Game<C> {
    pub fn with_clock(config: SessionConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = Session::with_clock(config, clock)?;
        let latch = session.latch();

        let (snapshot_tx, snapshots) = watch::channel(session.snapshot());
        let (event_tx, events) = watch::channel(ScoreEvent::NO_ACTION);
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let publisher = Publisher::new(snapshot_tx, event_tx, Arc::clone(&log));

        Ok(Self {
            latch,
            pending: Some((session, publisher)),
            task: None,
            snapshots,
            events,
            log,
        })
    }

    /// Spawn the driver task on the current tokio runtime.
    ///
    /// Returns `false` if the game was already started.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> bool {
        let Some((session, publisher)) = self.pending.take() else {
            warn!("game already started");
            return false;
        };
        self.task = Some(tokio::spawn(run_session(session, publisher)));
        info!("game started");
        true
    }

    pub fn is_started(&self) -> bool {
        self.pending.is_none()
    }

    /// Whether the driver task has ended (game over, cancelled or faulted).
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_some_and(|task| task.is_finished())
    }

    pub fn pause(&self) -> bool {
        self.latch.pause()
    }

    pub fn resume(&self) -> bool {
        self.latch.resume()
    }

    /// Cancel the session and wait for its task.
    ///
    /// Returns the final snapshot, or the invariant violation that ended the
    /// session early. A game that was never started returns its initial
    /// snapshot.
    #[instrument(skip(self))]
    pub async fn destroy(mut self) -> Result<GameSnapshot, SessionError> {
        self.latch.cancel();
        if let Some((session, _)) = self.pending.take() {
            return Ok(session.snapshot());
        }
        let Some(task) = self.task.take() else {
            return Ok(self.snapshot());
        };
        match task.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => {
                // aborted by runtime shutdown
                Ok(self.snapshot())
            }
        }
    }

    pub fn move_left(&self) -> bool {
        self.latch.move_left()
    }

    pub fn move_right(&self) -> bool {
        self.latch.move_right()
    }

    pub fn rotate(&self, clockwise: bool) -> bool {
        self.latch.rotate(clockwise)
    }

    pub fn start_soft_drop(&self) -> bool {
        self.latch.start_soft_drop()
    }

    pub fn stop_soft_drop(&self) -> bool {
        self.latch.stop_soft_drop()
    }

    pub fn hard_drop(&self) -> bool {
        self.latch.hard_drop()
    }

    pub fn swap(&self) -> bool {
        self.latch.swap()
    }

    pub fn apply(&self, intent: Intent) -> bool {
        self.latch.apply(intent)
    }

    /// Latest published read model
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// Latest score event. Starts at the `NoAction` sentinel.
    pub fn events(&self) -> watch::Receiver<ScoreEvent> {
        self.events.clone()
    }

    /// Every score event so far, oldest first.
    pub fn event_log(&self) -> Vec<ScoreEvent> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<C: Clock> Drop for Game<C> {
    fn drop(&mut self) {
        self.latch.cancel();
    }
}
