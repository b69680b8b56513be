//! Error taxonomy for the session.
//!
//! Expected negative outcomes (a blocked shift, a rotation with no fitting
//! candidate, a second swap) are plain return values and never show up here.
//! Only programming invariant breaks and bad configuration are errors.

use crate::config::LockDownPolicy;

/// Broken engine invariant. Fatal for the session that raised it.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvariantViolation {
    #[display("no active piece on the board")]
    NoActivePiece,
    #[display("merge would overwrite an occupied cell at ({x}, {y})")]
    MergeCollision { x: i8, y: i8 },
    #[display("merge would write outside the board at ({x}, {y})")]
    MergeOutOfBounds { x: i8, y: i8 },
    #[display("mini T-spin cannot clear {lines} rows")]
    MiniSpinMultiClear { lines: usize },
    #[display("lock-down policy {policy:?} is not implemented")]
    UnimplementedLockDown { policy: LockDownPolicy },
}

/// Rejected session configuration.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("queue length must be at least 1")]
    ZeroQueueLength,
    #[display("base drop time must be positive")]
    ZeroBaseDropTime,
    #[display("lock-down time must be positive")]
    ZeroLockDownTime,
    #[display("max lock-reset actions must be at least 1")]
    ZeroLockActions,
    #[display("lock-down policy {policy:?} is reserved")]
    ReservedLockDown { policy: LockDownPolicy },
    #[display("invalid config JSON: {_0}")]
    #[from]
    Parse(serde_json::Error),
}

/// Anything that ends a running session abnormally.
///
/// Configuration is rejected before a session exists, so only invariant
/// breaks reach here.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SessionError {
    #[display("invariant violation: {_0}")]
    #[from]
    Invariant(InvariantViolation),
}
