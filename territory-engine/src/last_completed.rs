//! Authoritative last-completed date resolution.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::history::HistoryIndex;
use crate::model::{Territory, TerritoryId};

/// Resolve one authoritative "last fully worked" date.
///
/// A manual date is an administrator correction and wins outright over
/// indexed history, not merely when history is missing. With neither
/// present the territory has never been completed.
#[must_use]
pub const fn resolve_last_completed(
    manual: Option<DateTime<Utc>>,
    history: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match manual {
        Some(date) => Some(date),
        None => history,
    }
}

/// Resolve every counted territory's last-completed date in one pass.
#[must_use]
pub fn last_completed_dates(
    territories: &[Territory],
    index: &HistoryIndex,
) -> HashMap<TerritoryId, Option<DateTime<Utc>>> {
    territories
        .iter()
        .filter(|territory| index.region_of(&territory.id).is_some())
        .map(|territory| {
            let history = index.timeline(&territory.id).latest_returned_at;
            (
                territory.id.clone(),
                resolve_last_completed(territory.manual_last_completed, history),
            )
        })
        .collect()
}
