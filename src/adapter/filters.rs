use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::error::{FeedError, Result};
use crate::feed::models::Unit;

pub const AVAILABLE_STATUSES: [&str; 2] = ["Vacant Unrented Ready", "Vacant Unrented Not Ready"];

/// 120 days.
pub const LEAD_TIME_SECS: i64 = 10_368_000;

pub const UNITS_PER_FLOORPLAN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterRules {
    pub lead_time: Duration,
    pub units_per_floorplan: usize,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            lead_time: Duration::seconds(LEAD_TIME_SECS),
            units_per_floorplan: UNITS_PER_FLOORPLAN,
        }
    }
}

/// Availability, then lead time, then the per-floor-plan cap. The cap only
/// sees units that passed the first two.
pub fn apply(
    units: IndexMap<String, Unit>,
    now: DateTime<Utc>,
    rules: &FilterRules,
) -> Result<IndexMap<String, Unit>> {
    let units = retain_available(units);
    // Deadlines past the representable calendar saturate.
    let deadline = now.checked_add_signed(rules.lead_time).unwrap_or_else(|| {
        if rules.lead_time < Duration::zero() {
            NaiveDateTime::MIN.and_utc()
        } else {
            NaiveDateTime::MAX.and_utc()
        }
    });
    let units = retain_within_lead_time(units, deadline)?;
    Ok(cap_per_floorplan(units, rules.units_per_floorplan))
}

pub fn retain_available(mut units: IndexMap<String, Unit>) -> IndexMap<String, Unit> {
    let before = units.len();
    units.retain(|_, unit| AVAILABLE_STATUSES.contains(&unit.availability_status.as_str()));
    debug!(dropped = before - units.len(), "Availability filter applied");
    units
}

pub fn retain_within_lead_time(
    units: IndexMap<String, Unit>,
    deadline: DateTime<Utc>,
) -> Result<IndexMap<String, Unit>> {
    let before = units.len();
    let mut kept = IndexMap::with_capacity(before);

    for (id, unit) in units {
        let available_at =
            parse_date_available(&unit.date_available).ok_or_else(|| FeedError::InvalidDate {
                unit_ext_id: unit.unit_ext_id.clone(),
                value: unit.date_available.clone(),
            })?;

        if available_at <= deadline {
            kept.insert(id, unit);
        }
    }

    debug!(dropped = before - kept.len(), %deadline, "Lead-time filter applied");
    Ok(kept)
}

/// Keeps the `cap` cheapest units of every floor plan. Equal prices keep
/// feed order.
pub fn cap_per_floorplan(mut units: IndexMap<String, Unit>, cap: usize) -> IndexMap<String, Unit> {
    let mut groups: IndexMap<&str, Vec<&Unit>> = IndexMap::new();
    for unit in units.values() {
        groups.entry(unit.floorplan_id.as_str()).or_default().push(unit);
    }

    let mut removed: HashSet<String> = HashSet::new();
    for (floorplan_id, mut group) in groups {
        if group.len() <= cap {
            continue;
        }

        group.sort_by_key(|unit| unit.price);
        debug!(floorplan_id, dropped = group.len() - cap, "Capping floor plan inventory");
        removed.extend(group[cap..].iter().map(|unit| unit.unit_ext_id.clone()));
    }

    units.retain(|id, _| !removed.contains(id));
    units
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DD[ HH:MM:SS]` and `MM/DD/YYYY`.
/// Bare dates are taken as midnight UTC.
pub fn parse_date_available(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp.and_utc());
        }
    }

    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
