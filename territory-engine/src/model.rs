//! Snapshot data model consumed by the analytics engine.
//!
//! The engine never talks to a data store; callers hand it one immutable
//! [`Snapshot`] of already-fetched collections and read back derived values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// Identifier of a territory within the congregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerritoryId(pub String);

impl TerritoryId {
    /// Construct an id from a string slice, trimming whitespace.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Returns true when the id has no visible characters.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a region (city or neighborhood).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub String);

impl RegionId {
    /// Construct an id from a string slice, trimming whitespace.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Returns true when the id has no visible characters.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an assignment record (a map hand-out).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(pub String);

impl AssignmentId {
    /// Construct an id from a string slice, trimming whitespace.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Returns true when the id has no visible characters.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressId(pub String);

impl AddressId {
    /// Construct an id from a string slice, trimming whitespace.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Returns true when the id has no visible characters.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// The unit of field-service work, owned by exactly one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub id: TerritoryId,
    pub name: String,
    pub region_id: RegionId,
    /// Administrator-entered completion date; overrides indexed history.
    #[serde(default)]
    pub manual_last_completed: Option<DateTime<Utc>>,
}

/// A city or neighborhood grouping territories; same shape either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    #[serde(default)]
    pub parent_region_name: Option<String>,
}

/// What a shared map hand-out covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    Territory,
    AddressCollection,
}

/// Lifecycle state of an assignment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Currently handed out.
    Active,
    /// Returned (may be reverted by an undo-return correction).
    Completed,
    /// Terminal; kept for history only.
    Archived,
}

/// Record of a territory or address set handed to a person for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub kind: AssignmentKind,
    /// Territories named by this hand-out; non-empty for territory kind.
    #[serde(default)]
    pub territory_ids: BTreeSet<TerritoryId>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set once the hand-out is returned, i.e. the territory was worked.
    #[serde(default)]
    pub returned_at: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
}

/// Current visit outcome recorded for an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    #[default]
    None,
    Contacted,
    NotContacted,
    Moved,
    DoNotVisit,
    Contested,
}

/// Current status snapshot for one address; history is not modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressVisitRecord {
    pub address_id: AddressId,
    pub territory_id: TerritoryId,
    pub region_id: RegionId,
    #[serde(default)]
    pub visit_status: VisitStatus,
    #[serde(default)]
    pub last_visited_at: Option<DateTime<Utc>>,
}

/// Fixed fiscal period supplied by the date-window collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceYearWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ServiceYearWindow {
    /// Half-open membership test over `[start, end)`.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// One consistent set of input collections, fetched by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub territories: Vec<Territory>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub addresses: Vec<AddressVisitRecord>,
    /// Bounds which assignments occupy registry slots; coverage and idle
    /// figures stay all-time regardless.
    #[serde(default)]
    pub service_year: Option<ServiceYearWindow>,
}

/// Errors raised when a snapshot's top-level shape is unusable.
///
/// Partial or dangling data never lands here; the engine degrades over it
/// silently. Only missing identity fields and contradictory region rows
/// make the snapshot unreportable.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidInputError {
    #[error("{collection} record at index {index} has a blank id")]
    BlankId {
        collection: &'static str,
        index: usize,
    },
    #[error("duplicate region id {id}")]
    DuplicateRegion { id: RegionId },
    #[error("service year window ends {end} before it starts {start}")]
    WindowOrder {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Snapshot {
    /// Check identity fields and window ordering.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` when any record lacks its id or two
    /// regions share one.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        for (index, territory) in self.territories.iter().enumerate() {
            if territory.id.is_blank() {
                return Err(InvalidInputError::BlankId {
                    collection: "territories",
                    index,
                });
            }
        }
        let mut seen = HashSet::new();
        for (index, region) in self.regions.iter().enumerate() {
            if region.id.is_blank() {
                return Err(InvalidInputError::BlankId {
                    collection: "regions",
                    index,
                });
            }
            if !seen.insert(&region.id) {
                return Err(InvalidInputError::DuplicateRegion {
                    id: region.id.clone(),
                });
            }
        }
        for (index, assignment) in self.assignments.iter().enumerate() {
            if assignment.id.is_blank() {
                return Err(InvalidInputError::BlankId {
                    collection: "assignments",
                    index,
                });
            }
        }
        for (index, address) in self.addresses.iter().enumerate() {
            if address.address_id.is_blank() {
                return Err(InvalidInputError::BlankId {
                    collection: "addresses",
                    index,
                });
            }
        }
        if let Some(window) = &self.service_year {
            if window.end < window.start {
                return Err(InvalidInputError::WindowOrder {
                    start: window.start,
                    end: window.end,
                });
            }
        }
        Ok(())
    }
}
