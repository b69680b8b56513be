//! Headless guideline Tetris runner (default binary).
//!
//! Starts a session, plays a trivial policy (spread pieces across the board
//! and hard drop each one) for a few seconds, and logs score events.
//!
//! Usage: `guideline-tetris [config.json]`. Set `RUST_LOG=debug` for phase
//! milestones.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use guideline_tetris::core::{Phase, SessionConfig};
use guideline_tetris::engine::Game;

/// How long the demo plays before tearing the session down
const PLAY_TIME: Duration = Duration::from_secs(10);

/// Delay between policy decisions
const DECISION_INTERVAL: Duration = Duration::from_millis(120);

fn load_config() -> Result<SessionConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            SessionConfig::from_json(&json).with_context(|| format!("parsing {path}"))
        }
        None => Ok(SessionConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    let mut game = Game::new_game(config).context("creating game")?;

    let mut events = game.events();
    let logger = tokio::spawn(async move {
        while events.changed().await.is_ok() {
            let event = *events.borrow_and_update();
            info!(action = ?event.action, x = event.board_x, y = event.board_y, "score event");
        }
    });

    game.start();
    let mut placed: u32 = 0;
    let deadline = tokio::time::Instant::now() + PLAY_TIME;

    while tokio::time::Instant::now() < deadline && !game.is_finished() {
        tokio::time::sleep(DECISION_INTERVAL).await;
        let snapshot = game.snapshot();
        if snapshot.game_over {
            break;
        }
        if snapshot.phase != Phase::Falling || snapshot.active.is_none() {
            continue;
        }

        // walk the target column across the board, one piece at a time
        let shift = (placed % 7) as i8 - 3;
        for _ in 0..shift.unsigned_abs() {
            if shift < 0 {
                game.move_left();
            } else {
                game.move_right();
            }
        }
        if placed % 3 == 0 {
            game.rotate(true);
        }
        game.hard_drop();
        placed += 1;
    }

    let last = game.destroy().await.context("session faulted")?;
    logger.abort();

    info!(
        score = last.stats.score,
        level = last.stats.level,
        lines = last.stats.actual_lines_cleared,
        game_over = last.game_over,
        "finished"
    );
    Ok(())
}
