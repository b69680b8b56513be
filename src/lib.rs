//! Guideline Tetris (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `guideline_tetris::{types, core, engine}` and ships a
//! headless runner binary.

pub use guideline_tetris_core as core;
pub use guideline_tetris_engine as engine;
pub use guideline_tetris_types as types;
