//! Assignment history indexing.
//!
//! Flattens the raw assignment list into per-territory activity timelines
//! and per-region completion aggregates. Everything downstream (coverage,
//! idle classification, the printable registry) reads from this index
//! instead of rescanning assignments.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::model::{Assignment, Region, RegionId, Territory, TerritoryId};

/// Activity extremes recorded for one territory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryTimeline {
    /// Latest return across assignments naming the territory.
    pub latest_returned_at: Option<DateTime<Utc>>,
    /// Latest of any creation or return touching the territory.
    pub latest_any_activity_at: Option<DateTime<Utc>>,
}

impl TerritoryTimeline {
    fn record(&mut self, created_at: DateTime<Utc>, returned_at: Option<DateTime<Utc>>) {
        self.latest_any_activity_at = max_instant(self.latest_any_activity_at, Some(created_at));
        self.latest_any_activity_at = max_instant(self.latest_any_activity_at, returned_at);
        self.latest_returned_at = max_instant(self.latest_returned_at, returned_at);
    }
}

/// Completion aggregates for one region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCompletions {
    /// Distinct territories with at least one returned hand-out.
    pub completed_unique: HashSet<TerritoryId>,
    /// Every returned hand-out per territory, repeats included.
    pub completed_volume: u32,
}

/// Indexed view over the assignment history of one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryIndex {
    timelines: HashMap<TerritoryId, TerritoryTimeline>,
    completions: HashMap<RegionId, RegionCompletions>,
    territory_regions: HashMap<TerritoryId, RegionId>,
}

impl HistoryIndex {
    /// Timeline for a territory; territories without history yield the
    /// empty timeline.
    #[must_use]
    pub fn timeline(&self, territory: &TerritoryId) -> TerritoryTimeline {
        self.timelines.get(territory).copied().unwrap_or_default()
    }

    /// Completion aggregates for a region, if any hand-out was returned.
    #[must_use]
    pub fn completions(&self, region: &RegionId) -> Option<&RegionCompletions> {
        self.completions.get(region)
    }

    /// Region owning a territory, restricted to resolvable regions.
    #[must_use]
    pub fn region_of(&self, territory: &TerritoryId) -> Option<&RegionId> {
        self.territory_regions.get(territory)
    }

    /// Territories that were counted, i.e. whose region resolved.
    #[must_use]
    pub fn counted_territories(&self) -> &HashMap<TerritoryId, RegionId> {
        &self.territory_regions
    }
}

/// Build the history index from one snapshot's collections.
///
/// Territories with a dangling region reference are dropped entirely;
/// assignment territory ids that resolve to no counted territory are
/// ignored for that id. Neither is an error.
#[must_use]
pub fn index_history(
    territories: &[Territory],
    regions: &[Region],
    assignments: &[Assignment],
) -> HistoryIndex {
    let known_regions: HashSet<&RegionId> = regions.iter().map(|region| &region.id).collect();

    let mut territory_regions = HashMap::with_capacity(territories.len());
    let mut dropped = 0usize;
    for territory in territories {
        if known_regions.contains(&territory.region_id) {
            territory_regions.insert(territory.id.clone(), territory.region_id.clone());
        } else {
            debug!(
                "territory {} references unknown region {}; dropping",
                territory.id, territory.region_id
            );
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!("{dropped} territories excluded over dangling region references");
    }

    let mut timelines: HashMap<TerritoryId, TerritoryTimeline> = territory_regions
        .keys()
        .map(|id| (id.clone(), TerritoryTimeline::default()))
        .collect();
    let mut completions: HashMap<RegionId, RegionCompletions> = HashMap::new();

    for assignment in assignments {
        for territory_id in &assignment.territory_ids {
            let Some(timeline) = timelines.get_mut(territory_id) else {
                debug!(
                    "assignment {} names unknown territory {}; ignoring",
                    assignment.id, territory_id
                );
                continue;
            };
            timeline.record(assignment.created_at, assignment.returned_at);

            if assignment.returned_at.is_some() {
                let region_id = &territory_regions[territory_id];
                let entry = completions.entry(region_id.clone()).or_default();
                entry.completed_unique.insert(territory_id.clone());
                entry.completed_volume += 1;
            }
        }
    }

    HistoryIndex {
        timelines,
        completions,
        territory_regions,
    }
}

fn max_instant(
    current: Option<DateTime<Utc>>,
    candidate: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (value, None) | (None, value) => value,
    }
}
