//! Territory Analytics Engine
//!
//! Platform-agnostic coverage, idle, and registry analytics for
//! congregation territory management. The engine is a pure batch
//! transform: the host hands it one immutable [`Snapshot`] of
//! already-fetched collections and an explicit clock, and reads back a
//! [`DerivedState`]. It holds no state between calls, performs no I/O,
//! and recomputes from scratch on every invocation, so the host's
//! change-detection policy (poll, webhook, push) stays entirely outside.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub mod config;
pub mod coverage;
pub mod history;
pub mod idle;
pub mod last_completed;
pub mod model;
pub mod numbers;
pub mod ordering;
pub mod registry;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig, LayoutMode};
pub use coverage::{CoverageStat, StatusBreakdown, aggregate_coverage, hybrid_display_ratio};
pub use history::{HistoryIndex, RegionCompletions, TerritoryTimeline, index_history};
pub use idle::{IdleTerritory, IdleVariant, classify_idle};
pub use last_completed::{last_completed_dates, resolve_last_completed};
pub use model::{
    AddressId, AddressVisitRecord, Assignment, AssignmentId, AssignmentKind, AssignmentStatus,
    InvalidInputError, Region, RegionId, ServiceYearWindow, Snapshot, Territory, TerritoryId,
    VisitStatus,
};
pub use ordering::natural_cmp;
pub use registry::{
    AssignmentSlot, RegistryPage, RegistryRow, SLOTS_PER_PAGE, paginate_registry,
};

/// Everything the engine derives from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedState {
    pub coverage: HashMap<RegionId, CoverageStat>,
    /// Pre-sorted: never-worked first, then ascending by last activity.
    pub idle: Vec<IdleTerritory>,
    /// Region sections in natural order, each section's pages in order.
    pub registry: Vec<RegistryPage>,
}

/// Failures surfaced by the single entry point.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Derive coverage, idle, and registry state from one snapshot.
///
/// `now` is the caller's clock; passing it in keeps the computation a
/// pure function of its arguments. Partial or dangling data degrades
/// silently per the component rules; only an unusable snapshot shape or
/// configuration is an error.
///
/// # Errors
///
/// Returns `EngineError` when the snapshot fails [`Snapshot::validate`]
/// or the configuration fails [`EngineConfig::validate`].
pub fn recompute(
    snapshot: &Snapshot,
    cfg: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<DerivedState, EngineError> {
    snapshot.validate()?;
    cfg.validate()?;

    let index = index_history(&snapshot.territories, &snapshot.regions, &snapshot.assignments);
    let resolved = last_completed_dates(&snapshot.territories, &index);

    let coverage = aggregate_coverage(&snapshot.regions, &snapshot.addresses, &index);
    let idle = classify_idle(
        &snapshot.territories,
        &snapshot.regions,
        &snapshot.assignments,
        &index,
        cfg,
        now,
    );
    let registry = paginate_registry(
        &snapshot.territories,
        &snapshot.regions,
        &snapshot.assignments,
        &resolved,
        &index,
        snapshot.service_year.as_ref(),
        cfg,
    );

    Ok(DerivedState {
        coverage,
        idle,
        registry,
    })
}
