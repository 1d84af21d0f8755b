use drover_types::{CalfId, MovementKind};

use crate::error::{StockResult, StockyardError};
use crate::traits::StockReader;

/// Result of validating one calf's history stream against its ledger row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryReport {
    pub calf_id: CalfId,
    pub record_count: usize,
    pub violations: Vec<Violation>,
}

impl HistoryReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific inconsistency detected during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Index of the offending record in event-date order.
    pub index: usize,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    OutOfOrder,
    MissingIntake,
    DuplicateIntake,
    IntakeNotFirst,
    StatusDrift,
}

/// History stream validator.
///
/// The history is the sole source of truth for "what happened and when";
/// this checks that the mutable ledger row hasn't drifted away from it.
pub struct HistoryValidator;

impl HistoryValidator {
    pub fn validate_calf<R: StockReader>(
        reader: &R,
        calf_id: CalfId,
    ) -> StockResult<HistoryReport> {
        let calf = reader
            .calf(calf_id)?
            .ok_or_else(|| StockyardError::not_found("calf", calf_id))?;
        let records = reader.movement_history(calf_id)?;

        let mut violations = Vec::new();

        for (index, window) in records.windows(2).enumerate() {
            if window[1].event_date < window[0].event_date {
                violations.push(Violation {
                    index: index + 1,
                    kind: ViolationKind::OutOfOrder,
                    description: "event date precedes the previous record".into(),
                });
            }
        }

        let intake_indexes: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.movement.kind() == MovementKind::Intake)
            .map(|(i, _)| i)
            .collect();
        match intake_indexes.as_slice() {
            [] => violations.push(Violation {
                index: 0,
                kind: ViolationKind::MissingIntake,
                description: "no intake record in stream".into(),
            }),
            [first, rest @ ..] => {
                if *first != 0 {
                    violations.push(Violation {
                        index: *first,
                        kind: ViolationKind::IntakeNotFirst,
                        description: "intake is not the first record".into(),
                    });
                }
                for &extra in rest {
                    violations.push(Violation {
                        index: extra,
                        kind: ViolationKind::DuplicateIntake,
                        description: "more than one intake record".into(),
                    });
                }
            }
        }

        // The last status-bearing record must agree with the ledger row.
        let last_status = records.iter().rev().find_map(|r| r.movement.to_status());
        if let Some(last_status) = last_status {
            if last_status != calf.status {
                violations.push(Violation {
                    index: records.len().saturating_sub(1),
                    kind: ViolationKind::StatusDrift,
                    description: format!(
                        "ledger status {} disagrees with history status {}",
                        calf.status, last_status
                    ),
                });
            }
        }

        Ok(HistoryReport {
            calf_id,
            record_count: records.len(),
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, Utc};
    use drover_types::{utc_midnight, CalfStatus, CalfType, RanchId, Sex};
    use rust_decimal::Decimal;

    use crate::memory::InMemoryStockyard;
    use crate::records::{CalfDraft, CalfPatch, Destination, LoadDraft, RanchDraft};
    use crate::traits::StockWriter;
    use crate::transfer::CalfSelector;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        utc_midnight(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn admit(yard: &InMemoryStockyard, tag: &str, ranch: RanchId) -> CalfId {
        yard.admit_calf(CalfDraft {
            primary_id: tag.into(),
            eid: None,
            original_tag: None,
            placed_date: day(2024, 3, 1),
            breed: "Angus".into(),
            sex: Sex::Bull,
            purchase_price: Decimal::from(800),
            seller: "Smith Cattle".into(),
            current_ranch_id: Some(ranch),
            origin_ranch_id: Some(ranch),
            status: None,
            condition: None,
            calf_type: CalfType::Two,
            pre_days_on_feed: 0,
            created_by: None,
        })
        .unwrap()
        .id
    }

    #[test]
    fn freshly_admitted_calf_validates() {
        let yard = InMemoryStockyard::new();
        let home = yard.create_ranch(RanchDraft::named("Home")).unwrap();
        let calf = admit(&yard, "T-1", home.id);

        let report = HistoryValidator::validate_calf(&yard, calf).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.record_count, 1);
    }

    #[test]
    fn full_lifecycle_validates() {
        let yard = InMemoryStockyard::new();
        let origin = yard.create_ranch(RanchDraft::named("Origin")).unwrap();
        let dest = yard.create_ranch(RanchDraft::named("Destination")).unwrap();
        let calf = admit(&yard, "T-1", origin.id);

        yard.create_load(
            LoadDraft::new(origin.id, Destination::Ranch(dest.id), day(2024, 4, 15)),
            &CalfSelector::by_primary_ids(["T-1"]),
        )
        .unwrap();
        yard.update_calf(
            calf,
            CalfPatch {
                status: Some(CalfStatus::Alive),
                ..CalfPatch::default()
            },
        )
        .unwrap();

        let report = HistoryValidator::validate_calf(&yard, calf).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.record_count, 3);
    }

    #[test]
    fn load_deletion_leaves_detectable_status_drift() {
        let yard = InMemoryStockyard::new();
        let origin = yard.create_ranch(RanchDraft::named("Origin")).unwrap();
        let dest = yard.create_ranch(RanchDraft::named("Destination")).unwrap();
        let calf = admit(&yard, "T-1", origin.id);

        let receipt = yard
            .create_load(
                LoadDraft::new(origin.id, Destination::Ranch(dest.id), day(2024, 4, 15)),
                &CalfSelector::by_primary_ids(["T-1"]),
            )
            .unwrap();
        yard.delete_load(receipt.load.id).unwrap();

        // The transfer record degraded to a ranch transfer, so the last
        // status-bearing record (intake: Feeding) no longer matches the
        // ledger's Shipped. The report makes that visible.
        let report = HistoryValidator::validate_calf(&yard, calf).unwrap();
        assert!(!report.is_valid());
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::StatusDrift));
    }

    #[test]
    fn missing_calf_is_not_found() {
        let yard = InMemoryStockyard::new();
        let err = HistoryValidator::validate_calf(&yard, CalfId::new()).unwrap_err();
        assert!(matches!(err, StockyardError::NotFound { entity: "calf", .. }));
    }
}
