use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::records::{CalfLoad, Load};

/// A tag value as it arrives from callers: intake sheets frequently carry
/// electronic ids as numbers, so both forms are accepted and compared as
/// strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Number(serde_json::Number),
    Text(String),
}

impl TagValue {
    /// String-coerced form used for matching.
    pub fn as_tag(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<u64> for TagValue {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

/// Selects the calves to attach to a load: a set of EIDs, a set of
/// primary ids, or both. An empty selector is valid and creates a load
/// with zero attached animals.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CalfSelector {
    #[serde(default)]
    pub eids: Vec<TagValue>,
    #[serde(default)]
    pub primary_ids: Vec<TagValue>,
}

impl CalfSelector {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn by_eids<T: Into<TagValue>>(eids: impl IntoIterator<Item = T>) -> Self {
        Self {
            eids: eids.into_iter().map(Into::into).collect(),
            primary_ids: Vec::new(),
        }
    }

    pub fn by_primary_ids<T: Into<TagValue>>(ids: impl IntoIterator<Item = T>) -> Self {
        Self {
            eids: Vec::new(),
            primary_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.eids.is_empty() && self.primary_ids.is_empty()
    }

    /// String-coerced EID set, empty entries dropped.
    pub fn eid_set(&self) -> HashSet<String> {
        self.eids
            .iter()
            .map(TagValue::as_tag)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// String-coerced primary-id set, empty entries dropped.
    pub fn primary_id_set(&self) -> HashSet<String> {
        self.primary_ids
            .iter()
            .map(TagValue::as_tag)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// The result of a committed load transfer: the load row plus one linkage
/// row per calf that actually shipped. Selector entries that matched no
/// feeding calf are absent here, by design.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub load: Load,
    pub manifest: Vec<CalfLoad>,
}

impl TransferReceipt {
    pub fn shipped_count(&self) -> usize {
        self.manifest.len()
    }
}

/// Whole days from placement to departure, snapshotted onto the linkage
/// row. Never negative.
pub fn days_on_feed_at_shipment(placed: DateTime<Utc>, departure: DateTime<Utc>) -> i64 {
    (departure.date_naive() - placed.date_naive())
        .num_days()
        .max(0)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use drover_types::utc_midnight;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        utc_midnight(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn numeric_eids_are_string_coerced() {
        let selector: CalfSelector =
            serde_json::from_str(r#"{"eids": [982000123456789, "982000987654321"]}"#).unwrap();
        let set = selector.eid_set();
        assert!(set.contains("982000123456789"));
        assert!(set.contains("982000987654321"));
    }

    #[test]
    fn blank_entries_are_dropped() {
        let selector = CalfSelector::by_primary_ids(["T-1", "  ", ""]);
        assert_eq!(selector.primary_id_set().len(), 1);
    }

    #[test]
    fn empty_selector_reports_empty() {
        assert!(CalfSelector::empty().is_empty());
        assert!(!CalfSelector::by_eids(["1"]).is_empty());
    }

    #[test]
    fn shipment_dof_is_whole_days_clamped_at_zero() {
        assert_eq!(
            days_on_feed_at_shipment(day(2024, 3, 1), day(2024, 4, 15)),
            45
        );
        assert_eq!(
            days_on_feed_at_shipment(day(2024, 4, 15), day(2024, 3, 1)),
            0
        );
    }
}
