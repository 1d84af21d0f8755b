use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use drover_types::{CalfId, CalfStatus, LoadId, MovementKind, RanchId};

use crate::error::{StockResult, StockyardError};
use crate::records::MovementRecord;
use crate::traits::StockReader;

/// Aggregate view of a ranch's current animals (the manage view rolled
/// up): head counts by status, purchase value, mean days on feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RanchRollup {
    pub ranch_id: RanchId,
    pub head_count: usize,
    pub by_status: BTreeMap<CalfStatus, usize>,
    pub total_purchase: Decimal,
    /// `None` when the ranch currently holds no animals.
    pub mean_days_on_feed: Option<f64>,
}

/// A movement-history record flattened for reporting: every field the
/// tagged variants can carry, surfaced uniformly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub event_date: DateTime<Utc>,
    pub kind: MovementKind,
    pub load_id: Option<LoadId>,
    pub from_ranch: Option<RanchId>,
    pub to_ranch: Option<RanchId>,
    pub from_status: Option<CalfStatus>,
    pub to_status: Option<CalfStatus>,
    pub notes: Option<String>,
}

impl From<&MovementRecord> for TimelineEntry {
    fn from(record: &MovementRecord) -> Self {
        Self {
            event_date: record.event_date,
            kind: record.movement.kind(),
            load_id: record.movement.load_id(),
            from_ranch: record.movement.from_ranch(),
            to_ranch: record.movement.to_ranch(),
            from_status: record.movement.from_status(),
            to_status: record.movement.to_status(),
            notes: record.notes.clone(),
        }
    }
}

/// Deterministic projection builders over any [`StockReader`].
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn ranch_rollup<R: StockReader>(
        reader: &R,
        ranch: RanchId,
        as_of: DateTime<Utc>,
    ) -> StockResult<RanchRollup> {
        if reader.ranch(ranch)?.is_none() {
            return Err(StockyardError::not_found("ranch", ranch));
        }

        let calves = reader.manage_view(ranch)?;
        let mut by_status = BTreeMap::new();
        let mut total_purchase = Decimal::ZERO;
        let mut feed_days_total = 0i64;

        for calf in &calves {
            *by_status.entry(calf.status).or_insert(0usize) += 1;
            total_purchase += calf.purchase_price;
            feed_days_total += calf.days_on_feed(as_of);
        }

        let mean_days_on_feed = if calves.is_empty() {
            None
        } else {
            Some(feed_days_total as f64 / calves.len() as f64)
        };

        Ok(RanchRollup {
            ranch_id: ranch,
            head_count: calves.len(),
            by_status,
            total_purchase,
            mean_days_on_feed,
        })
    }

    /// The calf's timeline, flattened. Missing calves are a not-found
    /// error, not an empty timeline.
    pub fn timeline<R: StockReader>(reader: &R, calf: CalfId) -> StockResult<Vec<TimelineEntry>> {
        if reader.calf(calf)?.is_none() {
            return Err(StockyardError::not_found("calf", calf));
        }
        let records = reader.movement_history(calf)?;
        Ok(records.iter().map(TimelineEntry::from).collect())
    }
}
