//! Region coverage aggregation with the hybrid unique/volume rule.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::history::HistoryIndex;
use crate::model::{AddressVisitRecord, Region, RegionId, VisitStatus};
use crate::numbers::{count_to_u32, floor_ratio_to_percent};

/// Per-status tally of a region's address records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub none: u32,
    pub contacted: u32,
    pub not_contacted: u32,
    pub moved: u32,
    pub do_not_visit: u32,
    pub contested: u32,
}

impl StatusBreakdown {
    /// Tally one address record.
    pub const fn record(&mut self, status: VisitStatus) {
        match status {
            VisitStatus::None => self.none += 1,
            VisitStatus::Contacted => self.contacted += 1,
            VisitStatus::NotContacted => self.not_contacted += 1,
            VisitStatus::Moved => self.moved += 1,
            VisitStatus::DoNotVisit => self.do_not_visit += 1,
            VisitStatus::Contested => self.contested += 1,
        }
    }

    /// Total addresses tallied.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.none
            + self.contacted
            + self.not_contacted
            + self.moved
            + self.do_not_visit
            + self.contested
    }
}

/// Derived coverage figures for one region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStat {
    /// Counted territories owned by the region.
    pub total: u32,
    /// Distinct territories worked at least once.
    pub completed_unique: u32,
    /// Returned hand-outs, repeats included.
    pub completed_volume: u32,
    /// Floor of the hybrid ratio in percent; may exceed 100.
    pub display_percent: u32,
    /// Bar fill, clamped to the full width.
    pub bar_percent: u32,
    /// Set once every territory has been worked at least once.
    pub is_green: bool,
    pub status_breakdown: StatusBreakdown,
}

/// The hybrid coverage ratio.
///
/// Below full unique coverage the region is still in its first pass and
/// shows the raw unique fraction. Once every territory has been worked,
/// the figure switches to returned volume over total, which can exceed 1
/// and rewards continued re-coverage. The switch keys on the *unique*
/// threshold, never on volume.
#[must_use]
pub fn hybrid_display_ratio(total: u32, completed_unique: u32, completed_volume: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    if completed_unique < total {
        f64::from(completed_unique) / f64::from(total)
    } else {
        f64::from(completed_volume) / f64::from(total)
    }
}

/// Aggregate coverage for every known region.
///
/// Regions with zero counted territories report 0 % and no green flag.
/// Address records referencing an unknown region are dropped, never an
/// error.
#[must_use]
pub fn aggregate_coverage(
    regions: &[Region],
    addresses: &[AddressVisitRecord],
    index: &HistoryIndex,
) -> HashMap<RegionId, CoverageStat> {
    let mut totals: HashMap<&RegionId, u32> = HashMap::new();
    for region_id in index.counted_territories().values() {
        *totals.entry(region_id).or_default() += 1;
    }

    let mut stats: HashMap<RegionId, CoverageStat> = regions
        .iter()
        .map(|region| {
            let total = totals.get(&region.id).copied().unwrap_or(0);
            let (unique, volume) = index
                .completions(&region.id)
                .map_or((0, 0), |completions| {
                    (
                        count_to_u32(completions.completed_unique.len()),
                        completions.completed_volume,
                    )
                });
            let display_percent =
                floor_ratio_to_percent(hybrid_display_ratio(total, unique, volume));
            let stat = CoverageStat {
                total,
                completed_unique: unique,
                completed_volume: volume,
                display_percent,
                bar_percent: display_percent.min(100),
                is_green: display_percent >= 100 && total > 0,
                status_breakdown: StatusBreakdown::default(),
            };
            (region.id.clone(), stat)
        })
        .collect();

    let mut dropped = 0usize;
    for address in addresses {
        if let Some(stat) = stats.get_mut(&address.region_id) {
            stat.status_breakdown.record(address.visit_status);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!("{dropped} address records dropped over unknown region references");
    }

    stats
}
