use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use drover_types::{
    ArrivalStatus, CalfId, CalfLoadId, CalfStatus, CalfType, LoadId, MovementId, MovementKind,
    RanchId, SellStatus, Sex,
};

use crate::error::StockyardError;

// ---------------------------------------------------------------------------
// Ranch
// ---------------------------------------------------------------------------

/// A labeled numeric range used for ranch weight-bracket and price-period
/// configuration. Lists of these are kept in the owner's display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRange {
    pub id: u32,
    pub label: String,
    pub lower: Decimal,
    /// `None` means open-ended ("and up").
    pub upper: Option<Decimal>,
}

impl LabeledRange {
    /// Whether `value` falls inside this range (lower inclusive, upper
    /// inclusive when bounded).
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.lower && self.upper.map_or(true, |upper| value <= upper)
    }
}

/// A ranch: the location entity calves and loads point at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ranch {
    pub id: RanchId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub manager: Option<String>,
    pub color: Option<String>,
    pub weight_brackets: Vec<LabeledRange>,
    pub price_periods: Vec<LabeledRange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ranch {
    /// The weight bracket a given weight falls into, if configured.
    pub fn bracket_for(&self, weight: Decimal) -> Option<&LabeledRange> {
        self.weight_brackets.iter().find(|b| b.contains(weight))
    }

    /// The price period a days-on-feed count falls into, if configured.
    pub fn price_period_for(&self, days_on_feed: i64) -> Option<&LabeledRange> {
        let days = Decimal::from(days_on_feed);
        self.price_periods.iter().find(|p| p.contains(days))
    }
}

/// Input for creating a ranch.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RanchDraft {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub manager: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub weight_brackets: Vec<LabeledRange>,
    #[serde(default)]
    pub price_periods: Vec<LabeledRange>,
}

impl RanchDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial ranch update. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RanchPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub manager: Option<String>,
    pub color: Option<String>,
    pub weight_brackets: Option<Vec<LabeledRange>>,
    pub price_periods: Option<Vec<LabeledRange>>,
}

// ---------------------------------------------------------------------------
// Calf
// ---------------------------------------------------------------------------

/// A tracked animal: the mutable entity owning its current location and
/// lifecycle status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calf {
    pub id: CalfId,
    /// Visual tag. Required, but not unique across ranch histories.
    pub primary_id: String,
    /// Electronic tag, when present. Stored as text; selectors string-
    /// coerce numeric input before comparing.
    pub eid: Option<String>,
    pub original_tag: Option<String>,
    pub placed_date: DateTime<Utc>,
    /// Canonical breed name, resolved through the registry before storage.
    pub breed: String,
    pub sex: Sex,
    pub purchase_price: Decimal,
    /// Canonical seller name, resolved through the registry before storage.
    pub seller: String,
    pub current_ranch_id: Option<RanchId>,
    pub origin_ranch_id: Option<RanchId>,
    pub status: CalfStatus,
    pub condition: Option<String>,
    pub calf_type: CalfType,
    /// Feed days accrued before entering this system.
    pub pre_days_on_feed: i64,
    pub death_date: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Calf {
    /// Derived open/sold flag.
    pub fn sell_status(&self) -> SellStatus {
        self.status.sell_status()
    }

    /// Days on feed as of `as_of`: whole days since placement plus the
    /// feed days accrued before intake. Never negative.
    pub fn days_on_feed(&self, as_of: DateTime<Utc>) -> i64 {
        (as_of.date_naive() - self.placed_date.date_naive())
            .num_days()
            .max(0)
            + self.pre_days_on_feed
    }
}

/// Input for admitting a calf. Dates are already normalized and breed /
/// seller already canonicalized by the intake layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalfDraft {
    pub primary_id: String,
    pub eid: Option<String>,
    pub original_tag: Option<String>,
    pub placed_date: DateTime<Utc>,
    pub breed: String,
    pub sex: Sex,
    pub purchase_price: Decimal,
    pub seller: String,
    pub current_ranch_id: Option<RanchId>,
    pub origin_ranch_id: Option<RanchId>,
    /// Defaults to Feeding when omitted.
    pub status: Option<CalfStatus>,
    pub condition: Option<String>,
    pub calf_type: CalfType,
    #[serde(default)]
    pub pre_days_on_feed: i64,
    pub created_by: Option<String>,
}

/// Partial calf update. `None` leaves the field untouched.
///
/// A status change appends exactly one movement record; a current-ranch
/// change outside a load appends a ranch-transfer record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CalfPatch {
    pub primary_id: Option<String>,
    pub eid: Option<String>,
    pub original_tag: Option<String>,
    pub placed_date: Option<DateTime<Utc>>,
    pub breed: Option<String>,
    pub sex: Option<Sex>,
    pub purchase_price: Option<Decimal>,
    pub seller: Option<String>,
    pub current_ranch_id: Option<RanchId>,
    pub status: Option<CalfStatus>,
    pub condition: Option<String>,
    pub calf_type: Option<CalfType>,
    pub pre_days_on_feed: Option<i64>,
    pub death_date: Option<DateTime<Utc>>,
    /// Carried into the movement record a status or ranch change appends.
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Where a shipment is headed: a tracked ranch, or a free-text name for
/// destinations outside the system (sale barns, packers).
///
/// Exactly one of the two is always present at creation time; the
/// empty/both case is unrepresentable here and rejected at the boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Ranch(RanchId),
    Named(String),
}

impl Destination {
    /// Build a destination from the two optional wire fields, enforcing
    /// the exactly-one rule.
    pub fn from_fields(
        ranch_id: Option<RanchId>,
        name: Option<String>,
    ) -> Result<Self, StockyardError> {
        match (ranch_id, name) {
            (Some(id), None) => Ok(Self::Ranch(id)),
            (None, Some(name)) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    Err(StockyardError::validation(
                        "destination",
                        "destination name is empty",
                    ))
                } else {
                    Ok(Self::Named(trimmed.to_string()))
                }
            }
            (Some(_), Some(_)) => Err(StockyardError::validation(
                "destination",
                "destination ranch and destination name are mutually exclusive",
            )),
            (None, None) => Err(StockyardError::validation(
                "destination",
                "either a destination ranch or a destination name is required",
            )),
        }
    }

    pub fn ranch_id(&self) -> Option<RanchId> {
        match self {
            Self::Ranch(id) => Some(*id),
            Self::Named(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Ranch(_) => None,
            Self::Named(name) => Some(name),
        }
    }
}

/// A single shipment event moving zero or more calves from an origin
/// ranch toward a destination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Load {
    pub id: LoadId,
    /// Required at creation; nulled if the ranch is later deleted.
    pub origin_ranch_id: Option<RanchId>,
    pub destination_ranch_id: Option<RanchId>,
    pub destination_name: Option<String>,
    pub departure_date: DateTime<Utc>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub after_arrival_notes: Option<String>,
    pub trucking: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoadDraft {
    pub origin_ranch_id: RanchId,
    pub destination: Destination,
    pub departure_date: DateTime<Utc>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub trucking: Option<String>,
    pub created_by: Option<String>,
}

impl LoadDraft {
    pub fn new(
        origin_ranch_id: RanchId,
        destination: Destination,
        departure_date: DateTime<Utc>,
    ) -> Self {
        Self {
            origin_ranch_id,
            destination,
            departure_date,
            arrival_date: None,
            notes: None,
            trucking: None,
            created_by: None,
        }
    }
}

/// Partial load update. Origin and destination are immutable after
/// creation; only logistics metadata can change.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoadPatch {
    pub departure_date: Option<DateTime<Utc>>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub after_arrival_notes: Option<String>,
    pub trucking: Option<String>,
}

/// The row proving "this calf traveled on this load". Created exactly
/// once per (load, calf) pair per shipment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalfLoad {
    pub id: CalfLoadId,
    pub load_id: LoadId,
    pub calf_id: CalfId,
    /// Whole days from placement to departure, snapshotted at link time.
    pub days_on_feed_at_shipment: i64,
    /// Post-arrival paperwork exception; never auto-applied to the calf.
    pub arrival_status: Option<ArrivalStatus>,
}

/// A load together with its linkage rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadManifest {
    pub load: Load,
    pub links: Vec<CalfLoad>,
}

// ---------------------------------------------------------------------------
// Movement history
// ---------------------------------------------------------------------------

/// What happened in a movement-history record. The tagged representation
/// makes "which fields are meaningful for which event kind" a
/// compile-time fact instead of a pile of nullable columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Movement {
    Intake {
        to_ranch: Option<RanchId>,
    },
    LoadTransfer {
        load_id: LoadId,
        from_ranch: Option<RanchId>,
        to_ranch: Option<RanchId>,
        from_status: CalfStatus,
        to_status: CalfStatus,
    },
    RanchTransfer {
        from_ranch: Option<RanchId>,
        to_ranch: Option<RanchId>,
    },
    StatusChange {
        from_status: CalfStatus,
        to_status: CalfStatus,
    },
    Death {
        from_status: CalfStatus,
        ranch: Option<RanchId>,
    },
    ShippedOut {
        from_ranch: Option<RanchId>,
        from_status: CalfStatus,
    },
}

impl Movement {
    pub fn kind(&self) -> MovementKind {
        match self {
            Self::Intake { .. } => MovementKind::Intake,
            Self::LoadTransfer { .. } => MovementKind::LoadTransfer,
            Self::RanchTransfer { .. } => MovementKind::RanchTransfer,
            Self::StatusChange { .. } => MovementKind::StatusChange,
            Self::Death { .. } => MovementKind::Death,
            Self::ShippedOut { .. } => MovementKind::ShippedOut,
        }
    }

    pub fn load_id(&self) -> Option<LoadId> {
        match self {
            Self::LoadTransfer { load_id, .. } => Some(*load_id),
            _ => None,
        }
    }

    pub fn from_ranch(&self) -> Option<RanchId> {
        match self {
            Self::LoadTransfer { from_ranch, .. }
            | Self::RanchTransfer { from_ranch, .. }
            | Self::ShippedOut { from_ranch, .. } => *from_ranch,
            Self::Death { ranch, .. } => *ranch,
            _ => None,
        }
    }

    pub fn to_ranch(&self) -> Option<RanchId> {
        match self {
            Self::Intake { to_ranch } => *to_ranch,
            Self::LoadTransfer { to_ranch, .. } | Self::RanchTransfer { to_ranch, .. } => *to_ranch,
            _ => None,
        }
    }

    pub fn from_status(&self) -> Option<CalfStatus> {
        match self {
            Self::LoadTransfer { from_status, .. }
            | Self::StatusChange { from_status, .. }
            | Self::Death { from_status, .. }
            | Self::ShippedOut { from_status, .. } => Some(*from_status),
            _ => None,
        }
    }

    pub fn to_status(&self) -> Option<CalfStatus> {
        match self {
            Self::Intake { .. } => Some(CalfStatus::Feeding),
            Self::LoadTransfer { to_status, .. } | Self::StatusChange { to_status, .. } => {
                Some(*to_status)
            }
            Self::Death { .. } => Some(CalfStatus::Deceased),
            Self::ShippedOut { .. } => Some(CalfStatus::Shipped),
            Self::RanchTransfer { .. } => None,
        }
    }
}

/// One entry in a calf's append-only audit trail. Records are never
/// mutated or deleted after insertion (whole-calf cascade aside): they
/// are self-contained snapshots of where the animal was and what its
/// status was at the time, and they reconstruct the full timeline when
/// scanned in event-date order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: MovementId,
    pub calf_id: CalfId,
    pub event_date: DateTime<Utc>,
    pub movement: Movement,
    pub notes: Option<String>,
}

impl MovementRecord {
    pub fn new(calf_id: CalfId, event_date: DateTime<Utc>, movement: Movement) -> Self {
        Self {
            id: MovementId::new(),
            calf_id,
            event_date,
            movement,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}

#[cfg(test)]
mod tests {
    use drover_types::utc_midnight;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        utc_midnight(chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn destination_requires_exactly_one_field() {
        let ranch = RanchId::new();
        assert!(Destination::from_fields(Some(ranch), None).is_ok());
        assert!(Destination::from_fields(None, Some("Salebarn".into())).is_ok());
        assert!(Destination::from_fields(None, None).is_err());
        assert!(Destination::from_fields(Some(ranch), Some("Salebarn".into())).is_err());
        assert!(Destination::from_fields(None, Some("   ".into())).is_err());
    }

    #[test]
    fn destination_named_is_trimmed() {
        let dest = Destination::from_fields(None, Some("  Dodge City Salebarn ".into())).unwrap();
        assert_eq!(dest.name(), Some("Dodge City Salebarn"));
        assert_eq!(dest.ranch_id(), None);
    }

    #[test]
    fn labeled_range_containment() {
        let bounded = LabeledRange {
            id: 1,
            label: "400-500".into(),
            lower: Decimal::from(400),
            upper: Some(Decimal::from(500)),
        };
        assert!(bounded.contains(Decimal::from(400)));
        assert!(bounded.contains(Decimal::from(500)));
        assert!(!bounded.contains(Decimal::from(501)));

        let open = LabeledRange {
            id: 2,
            label: "700+".into(),
            lower: Decimal::from(700),
            upper: None,
        };
        assert!(open.contains(Decimal::from(10_000)));
        assert!(!open.contains(Decimal::from(699)));
    }

    #[test]
    fn days_on_feed_includes_pre_days_and_clamps() {
        let calf = Calf {
            id: CalfId::new(),
            primary_id: "T-100".into(),
            eid: None,
            original_tag: None,
            placed_date: day(2024, 3, 1),
            breed: "Angus".into(),
            sex: Sex::Steer,
            purchase_price: Decimal::from(900),
            seller: "Smith Cattle".into(),
            current_ranch_id: None,
            origin_ranch_id: None,
            status: CalfStatus::Feeding,
            condition: None,
            calf_type: CalfType::One,
            pre_days_on_feed: 30,
            death_date: None,
            created_by: None,
            created_at: day(2024, 3, 1),
            updated_at: day(2024, 3, 1),
        };
        assert_eq!(calf.days_on_feed(day(2024, 3, 11)), 40);
        // As-of before placement clamps the in-system span to zero.
        assert_eq!(calf.days_on_feed(day(2024, 2, 1)), 30);
    }

    #[test]
    fn movement_accessors_expose_meaningful_fields_only() {
        let load_id = LoadId::new();
        let from = RanchId::new();
        let to = RanchId::new();

        let transfer = Movement::LoadTransfer {
            load_id,
            from_ranch: Some(from),
            to_ranch: Some(to),
            from_status: CalfStatus::Feeding,
            to_status: CalfStatus::Shipped,
        };
        assert_eq!(transfer.kind(), MovementKind::LoadTransfer);
        assert_eq!(transfer.load_id(), Some(load_id));
        assert_eq!(transfer.from_ranch(), Some(from));
        assert_eq!(transfer.to_ranch(), Some(to));
        assert_eq!(transfer.to_status(), Some(CalfStatus::Shipped));

        let death = Movement::Death {
            from_status: CalfStatus::Shipped,
            ranch: Some(to),
        };
        assert_eq!(death.load_id(), None);
        assert_eq!(death.to_status(), Some(CalfStatus::Deceased));
        assert_eq!(death.from_ranch(), Some(to));

        let intake = Movement::Intake { to_ranch: Some(to) };
        assert_eq!(intake.from_status(), None);
        assert_eq!(intake.to_status(), Some(CalfStatus::Feeding));
    }

    #[test]
    fn movement_serde_is_kind_tagged() {
        let record = Movement::StatusChange {
            from_status: CalfStatus::Shipped,
            to_status: CalfStatus::Alive,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "status_change");
        assert_eq!(json["from_status"], "shipped");
        let back: Movement = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
