//! Real-time runtime for guideline Tetris sessions.
//!
//! [`Game`] wraps a [`Session`](guideline_tetris_core::Session) in a tokio task
//! that performs the session's suspensions with `tokio::time::sleep`.
//! Callers interact only through the lock-free input latch and the published
//! read model, so they never wait on the game loop.
//!
//! ```no_run
//! use guideline_tetris_core::SessionConfig;
//! use guideline_tetris_engine::Game;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let mut game = Game::new_game(SessionConfig::default())?;
//! game.start();
//! game.hard_drop();
//! let last = game.destroy().await?;
//! println!("score: {}", last.stats.score);
//! # Ok(())
//! # }
//! ```

mod game;
mod runner;

pub use game::Game;
