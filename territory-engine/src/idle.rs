//! Idle and stale territory classification.
//!
//! Advisory output only; nothing here mutates territory or assignment
//! state. Territories currently out with a publisher never appear.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::config::EngineConfig;
use crate::history::HistoryIndex;
use crate::model::{Assignment, AssignmentStatus, Region, RegionId, Territory, TerritoryId};
use crate::ordering::natural_cmp;

/// Severity of an idle territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleVariant {
    /// Never worked at all.
    Danger,
    /// Worked once, but longer ago than the staleness threshold.
    Warning,
}

/// One unassigned territory flagged for attention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdleTerritory {
    pub id: TerritoryId,
    pub name: String,
    pub region_name: String,
    /// Manual correction or latest recorded hand-out/return; absent when
    /// never worked.
    pub last_activity: Option<DateTime<Utc>>,
    pub variant: IdleVariant,
}

/// Flag unassigned territories that have gone unworked too long.
///
/// A territory is in scope only when no active-status assignment
/// references it. Its last activity is the manual completion correction
/// when one exists, else the indexed any-activity timestamp (never the
/// completed-only one). No recorded activity classifies as danger;
/// activity older than the configured threshold (relative to `now`) as
/// warning; anything fresher is omitted. The result is sorted ascending
/// by last activity with never-worked territories first, name order
/// breaking ties.
#[must_use]
pub fn classify_idle(
    territories: &[Territory],
    regions: &[Region],
    assignments: &[Assignment],
    index: &HistoryIndex,
    cfg: &EngineConfig,
    now: DateTime<Utc>,
) -> Vec<IdleTerritory> {
    let actively_assigned: HashSet<&TerritoryId> = assignments
        .iter()
        .filter(|assignment| assignment.status == AssignmentStatus::Active)
        .flat_map(|assignment| assignment.territory_ids.iter())
        .collect();
    let region_names: HashMap<&RegionId, &str> = regions
        .iter()
        .map(|region| (&region.id, region.name.as_str()))
        .collect();
    let stale_after = Duration::days(i64::from(cfg.stale_after_days));

    let mut idle: Vec<IdleTerritory> = territories
        .iter()
        .filter(|territory| index.region_of(&territory.id).is_some())
        .filter(|territory| !actively_assigned.contains(&territory.id))
        .filter_map(|territory| {
            let last_activity = territory
                .manual_last_completed
                .or(index.timeline(&territory.id).latest_any_activity_at);
            let variant = match last_activity {
                None => IdleVariant::Danger,
                Some(instant) if now.signed_duration_since(instant) > stale_after => {
                    IdleVariant::Warning
                }
                Some(_) => return None,
            };
            let region_name = index
                .region_of(&territory.id)
                .and_then(|region_id| region_names.get(region_id))
                .copied()
                .unwrap_or_default()
                .to_string();
            Some(IdleTerritory {
                id: territory.id.clone(),
                name: territory.name.clone(),
                region_name,
                last_activity,
                variant,
            })
        })
        .collect();

    // Option<DateTime> orders None first, which is exactly "oldest possible".
    idle.sort_by(|a, b| {
        a.last_activity
            .cmp(&b.last_activity)
            .then_with(|| natural_cmp(&a.name, &b.name))
    });
    idle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::index_history;
    use crate::model::{AssignmentId, AssignmentKind};
    use chrono::TimeZone;

    fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn territory(id: &str, name: &str) -> Territory {
        Territory {
            id: TerritoryId::new(id),
            name: name.to_string(),
            region_id: RegionId::new("r1"),
            manual_last_completed: None,
        }
    }

    fn region(id: &str, name: &str) -> Region {
        Region {
            id: RegionId::new(id),
            name: name.to_string(),
            parent_region_name: None,
        }
    }

    fn assignment(
        id: &str,
        territory: &str,
        created: DateTime<Utc>,
        returned: Option<DateTime<Utc>>,
        status: AssignmentStatus,
    ) -> Assignment {
        Assignment {
            id: AssignmentId::new(id),
            kind: AssignmentKind::Territory,
            territory_ids: [TerritoryId::new(territory)].into_iter().collect(),
            assigned_to: Some("A. Publisher".to_string()),
            created_at: created,
            returned_at: returned,
            status,
        }
    }

    #[test]
    fn never_worked_territories_are_danger_and_sort_first() {
        let territories = [territory("t1", "10"), territory("t2", "2")];
        let regions = [region("r1", "Riverside")];
        let worked = assignment(
            "a1",
            "t1",
            instant(2024, 1, 1),
            Some(instant(2024, 1, 10)),
            AssignmentStatus::Completed,
        );
        let index = index_history(&territories, &regions, std::slice::from_ref(&worked));

        let idle = classify_idle(
            &territories,
            &regions,
            &[worked],
            &index,
            &EngineConfig::default(),
            instant(2025, 6, 1),
        );

        assert_eq!(idle.len(), 2);
        assert_eq!(idle[0].id, TerritoryId::new("t2"));
        assert_eq!(idle[0].variant, IdleVariant::Danger);
        assert_eq!(idle[0].last_activity, None);
        assert_eq!(idle[1].variant, IdleVariant::Warning);
    }

    #[test]
    fn fresh_activity_is_omitted() {
        let territories = [territory("t1", "1")];
        let regions = [region("r1", "Riverside")];
        let worked = assignment(
            "a1",
            "t1",
            instant(2025, 5, 1),
            Some(instant(2025, 5, 20)),
            AssignmentStatus::Completed,
        );
        let index = index_history(&territories, &regions, std::slice::from_ref(&worked));

        let idle = classify_idle(
            &territories,
            &regions,
            &[worked],
            &index,
            &EngineConfig::default(),
            instant(2025, 6, 1),
        );
        assert!(idle.is_empty());
    }

    #[test]
    fn actively_assigned_territories_never_appear() {
        let territories = [territory("t1", "1")];
        let regions = [region("r1", "Riverside")];
        let out = assignment(
            "a1",
            "t1",
            instant(2023, 1, 1),
            None,
            AssignmentStatus::Active,
        );
        let index = index_history(&territories, &regions, std::slice::from_ref(&out));

        let idle = classify_idle(
            &territories,
            &regions,
            &[out],
            &index,
            &EngineConfig::default(),
            instant(2025, 6, 1),
        );
        assert!(idle.is_empty());
    }

    #[test]
    fn staleness_threshold_is_strict() {
        let territories = [territory("t1", "1")];
        let regions = [region("r1", "Riverside")];
        let returned_at = instant(2025, 1, 1);
        let worked = assignment(
            "a1",
            "t1",
            instant(2024, 12, 1),
            Some(returned_at),
            AssignmentStatus::Completed,
        );
        let index = index_history(&territories, &regions, std::slice::from_ref(&worked));
        let cfg = EngineConfig::default();

        let exactly_at_threshold = returned_at + Duration::days(180);
        let idle = classify_idle(
            &territories,
            &regions,
            std::slice::from_ref(&worked),
            &index,
            &cfg,
            exactly_at_threshold,
        );
        assert!(idle.is_empty());

        let past_threshold = exactly_at_threshold + Duration::days(1);
        let idle = classify_idle(
            &territories,
            &regions,
            std::slice::from_ref(&worked),
            &index,
            &cfg,
            past_threshold,
        );
        assert_eq!(idle.len(), 1);
        assert_eq!(idle[0].variant, IdleVariant::Warning);
        assert_eq!(idle[0].last_activity, Some(returned_at));
        assert_eq!(idle[0].region_name, "Riverside");
    }

    #[test]
    fn manual_correction_counts_as_activity() {
        let mut corrected = territory("t1", "1");
        corrected.manual_last_completed = Some(instant(2025, 5, 1));
        let territories = [corrected];
        let regions = [region("r1", "Riverside")];
        let index = index_history(&territories, &regions, &[]);

        // No assignment history at all, but the manual date is recent.
        let idle = classify_idle(
            &territories,
            &regions,
            &[],
            &index,
            &EngineConfig::default(),
            instant(2025, 6, 1),
        );
        assert!(idle.is_empty());

        let idle = classify_idle(
            &territories,
            &regions,
            &[],
            &index,
            &EngineConfig::default(),
            instant(2026, 6, 1),
        );
        assert_eq!(idle.len(), 1);
        assert_eq!(idle[0].variant, IdleVariant::Warning);
        assert_eq!(idle[0].last_activity, Some(instant(2025, 5, 1)));
    }

    #[test]
    fn stale_entries_sort_ascending_by_last_activity() {
        let territories = [territory("t1", "1"), territory("t2", "2")];
        let regions = [region("r1", "Riverside")];
        let assignments = [
            assignment(
                "a1",
                "t1",
                instant(2023, 1, 1),
                Some(instant(2023, 6, 1)),
                AssignmentStatus::Completed,
            ),
            assignment(
                "a2",
                "t2",
                instant(2023, 1, 1),
                Some(instant(2023, 2, 1)),
                AssignmentStatus::Completed,
            ),
        ];
        let index = index_history(&territories, &regions, &assignments);

        let idle = classify_idle(
            &territories,
            &regions,
            &assignments,
            &index,
            &EngineConfig::default(),
            instant(2025, 6, 1),
        );
        assert_eq!(idle.len(), 2);
        assert_eq!(idle[0].id, TerritoryId::new("t2"));
        assert_eq!(idle[1].id, TerritoryId::new("t1"));
    }
}
