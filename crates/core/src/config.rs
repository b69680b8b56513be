//! Session configuration
//!
//! Every field has a guideline default, so an empty JSON object is a valid
//! config. [`SessionConfig::validate`] runs before a session is built.
//!
//! ```
//! use guideline_tetris_core::config::{GoalSystem, SessionConfig};
//!
//! let config = SessionConfig::from_json(r#"{ "goal_system": "fixed", "seed": 42 }"#).unwrap();
//! assert_eq!(config.goal_system, GoalSystem::Fixed);
//! assert_eq!(config.queue_length, 5);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{BASE_DROP_MS, LOCK_DOWN_MS, LOCK_RESET_LIMIT, QUEUE_LENGTH};

/// How a grounded piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockDownPolicy {
    /// Grace timer resets on move/rotate, capped at a number of actions per lowest row
    #[default]
    ExtendedPlacement,
    /// Reserved
    InfinitePlacement,
    /// Reserved
    Classic,
}

/// How cleared lines turn into levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalSystem {
    /// Level from rewarded line credits, with a growing goal per level
    #[default]
    Variable,
    /// One level every 10 actual lines
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Gravity interval at level 1
    pub base_drop_ms: u64,
    pub lock_down: LockDownPolicy,
    /// Grace period before a grounded piece locks
    pub lock_down_ms: u64,
    /// Lock-reset actions allowed per lowest row
    pub max_lock_actions: u32,
    /// Count walls and floor as filled corners in T-spin detection
    pub recognise_wall_in_t_spin: bool,
    /// Front corners plus a back corner with an empty front-centre cell is a mini
    pub empty_front_as_mini: bool,
    pub goal_system: GoalSystem,
    /// Number of upcoming kinds kept in the queue
    pub queue_length: usize,
    /// Fixed bag seed. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_drop_ms: BASE_DROP_MS,
            lock_down: LockDownPolicy::default(),
            lock_down_ms: LOCK_DOWN_MS,
            max_lock_actions: LOCK_RESET_LIMIT,
            recognise_wall_in_t_spin: false,
            empty_front_as_mini: true,
            goal_system: GoalSystem::default(),
            queue_length: QUEUE_LENGTH,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Full validation: numeric ranges plus the lock-down policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_values()?;
        if self.lock_down != LockDownPolicy::ExtendedPlacement {
            return Err(ConfigError::ReservedLockDown {
                policy: self.lock_down,
            });
        }
        Ok(())
    }

    /// Numeric ranges only. A session built from a config that passes this
    /// but names a reserved policy faults at its first lock.
    pub fn validate_values(&self) -> Result<(), ConfigError> {
        if self.queue_length == 0 {
            return Err(ConfigError::ZeroQueueLength);
        }
        if self.base_drop_ms == 0 {
            return Err(ConfigError::ZeroBaseDropTime);
        }
        if self.lock_down_ms == 0 {
            return Err(ConfigError::ZeroLockDownTime);
        }
        if self.max_lock_actions == 0 {
            return Err(ConfigError::ZeroLockActions);
        }
        Ok(())
    }

    pub fn base_drop_time(&self) -> Duration {
        Duration::from_millis(self.base_drop_ms)
    }

    pub fn lock_down_time(&self) -> Duration {
        Duration::from_millis(self.lock_down_ms)
    }
}
