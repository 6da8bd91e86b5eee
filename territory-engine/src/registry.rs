//! Printable assignment-registry pagination.
//!
//! Lays each region out as a fixed-width grid: one row per territory, up
//! to four assignment columns per page, with the reference date carried
//! from page to page the way the paper ledger expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::config::{EngineConfig, LayoutMode};
use crate::history::HistoryIndex;
use crate::model::{
    Assignment, AssignmentId, Region, RegionId, ServiceYearWindow, Territory, TerritoryId,
};
use crate::numbers::ceil_div;
use crate::ordering::natural_cmp;

/// Assignment columns on one printed page.
pub const SLOTS_PER_PAGE: usize = 4;

/// One filled assignment cell in a territory's row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSlot {
    pub assignment_id: AssignmentId,
    /// Who held the territory, when recorded.
    pub assigned_to: Option<String>,
    pub assigned_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
}

/// Chronological slot history for one territory; inline up to one page.
pub type AssignmentHistory = SmallVec<[AssignmentSlot; SLOTS_PER_PAGE]>;

/// One territory's row on one page. Slots beyond the territory's own
/// history stay empty and render as add-capable cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryRow {
    pub territory_id: TerritoryId,
    pub territory_name: String,
    /// Date shown at the head of the row for this page; absent when the
    /// carry chain is broken.
    pub reference_date: Option<DateTime<Utc>>,
    pub slots: [Option<AssignmentSlot>; SLOTS_PER_PAGE],
}

/// One printed page of one region's section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryPage {
    pub region_name: String,
    pub page_index: usize,
    pub total_pages: usize,
    /// Presentational only; the row and column math is identical in both
    /// layout modes.
    pub starts_new_print_page: bool,
    pub rows: Vec<RegistryRow>,
}

/// Lay out the full registry, region by region.
///
/// Regions without counted territories are skipped. When a service-year
/// window is supplied, only assignments whose assigned date falls inside
/// `[start, end)` occupy slots.
#[must_use]
pub fn paginate_registry(
    territories: &[Territory],
    regions: &[Region],
    assignments: &[Assignment],
    resolved: &HashMap<TerritoryId, Option<DateTime<Utc>>>,
    index: &HistoryIndex,
    window: Option<&ServiceYearWindow>,
    cfg: &EngineConfig,
) -> Vec<RegistryPage> {
    let histories = collect_histories(assignments, index, window);

    let mut region_territories: HashMap<&RegionId, Vec<&Territory>> = HashMap::new();
    for territory in territories {
        if let Some(region_id) = index.region_of(&territory.id) {
            region_territories.entry(region_id).or_default().push(territory);
        }
    }

    let mut ordered_regions: Vec<&Region> = regions
        .iter()
        .filter(|region| region_territories.contains_key(&region.id))
        .collect();
    ordered_regions.sort_by(|a, b| {
        natural_cmp(&a.name, &b.name).then_with(|| a.id.cmp(&b.id))
    });

    let empty = AssignmentHistory::new();
    let mut pages = Vec::new();
    let mut first_section = true;

    for region in ordered_regions {
        let mut section = region_territories.remove(&region.id).unwrap_or_default();
        section.sort_by(|a, b| natural_cmp(&a.name, &b.name));

        let max_assignments = section
            .iter()
            .map(|territory| histories.get(&territory.id).map_or(0, SmallVec::len))
            .max()
            .unwrap_or(0)
            .max(cfg.minimum_columns);
        let total_pages = ceil_div(max_assignments, SLOTS_PER_PAGE).max(1);

        for page_index in 0..total_pages {
            let rows = section
                .iter()
                .map(|territory| {
                    let history = histories.get(&territory.id).unwrap_or(&empty);
                    build_row(territory, history, resolved, page_index)
                })
                .collect();
            pages.push(RegistryPage {
                region_name: region.name.clone(),
                page_index,
                total_pages,
                starts_new_print_page: cfg.layout == LayoutMode::PageBreak && !first_section,
                rows,
            });
            first_section = false;
        }
    }

    pages
}

fn collect_histories(
    assignments: &[Assignment],
    index: &HistoryIndex,
    window: Option<&ServiceYearWindow>,
) -> HashMap<TerritoryId, AssignmentHistory> {
    let mut histories: HashMap<TerritoryId, AssignmentHistory> = HashMap::new();
    for assignment in assignments {
        if window.is_some_and(|window| !window.contains(assignment.created_at)) {
            continue;
        }
        for territory_id in &assignment.territory_ids {
            if index.region_of(territory_id).is_none() {
                continue;
            }
            histories
                .entry(territory_id.clone())
                .or_default()
                .push(AssignmentSlot {
                    assignment_id: assignment.id.clone(),
                    assigned_to: assignment.assigned_to.clone(),
                    assigned_date: assignment.created_at,
                    completed_date: assignment.returned_at,
                });
        }
    }
    for history in histories.values_mut() {
        history.sort_by(|a, b| {
            a.assigned_date
                .cmp(&b.assigned_date)
                .then_with(|| a.assignment_id.cmp(&b.assignment_id))
        });
    }
    histories
}

fn build_row(
    territory: &Territory,
    history: &AssignmentHistory,
    resolved: &HashMap<TerritoryId, Option<DateTime<Utc>>>,
    page_index: usize,
) -> RegistryRow {
    let start = page_index * SLOTS_PER_PAGE;
    let reference_date = if page_index == 0 {
        resolved.get(&territory.id).copied().flatten()
    } else {
        // Completion of the previous page's last slot; a gap breaks the
        // chain rather than reaching further back.
        history
            .get(start - 1)
            .and_then(|slot| slot.completed_date)
    };
    RegistryRow {
        territory_id: territory.id.clone(),
        territory_name: territory.name.clone(),
        reference_date,
        slots: std::array::from_fn(|offset| history.get(start + offset).cloned()),
    }
}
