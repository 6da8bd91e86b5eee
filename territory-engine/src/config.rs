//! Engine configuration with host-tunable thresholds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::SLOTS_PER_PAGE;

/// How printable registry sections break across physical pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Every section after the first starts on a fresh print page.
    #[default]
    PageBreak,
    /// Sections flow without forced breaks.
    Continuous,
}

/// Tunable knobs for the analytics engine.
///
/// The staleness threshold and the minimum registry column count are
/// congregation policy, not engine policy, so both arrive here instead of
/// living as literals next to the math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Days without any recorded activity before an unassigned territory
    /// is reported as stale.
    #[serde(default = "EngineConfig::default_stale_after_days")]
    pub stale_after_days: u32,
    /// Minimum number of assignment columns laid out per territory row.
    /// Operators may raise this; it never drops below the print form's
    /// four-slot width.
    #[serde(default = "EngineConfig::default_minimum_columns")]
    pub minimum_columns: usize,
    #[serde(default)]
    pub layout: LayoutMode,
}

impl EngineConfig {
    #[must_use]
    pub const fn default_stale_after_days() -> u32 {
        180
    }

    #[must_use]
    pub const fn default_minimum_columns() -> usize {
        SLOTS_PER_PAGE
    }

    /// Check configured values against their documented bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_columns < SLOTS_PER_PAGE {
            return Err(ConfigError::MinViolation {
                field: "minimum_columns",
                min: SLOTS_PER_PAGE,
                value: self.minimum_columns,
            });
        }
        if self.stale_after_days == 0 {
            return Err(ConfigError::MinViolation {
                field: "stale_after_days",
                min: 1,
                value: self.stale_after_days as usize,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stale_after_days: Self::default_stale_after_days(),
            minimum_columns: Self::default_minimum_columns(),
            layout: LayoutMode::default(),
        }
    }
}

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: usize,
        value: usize,
    },
}
