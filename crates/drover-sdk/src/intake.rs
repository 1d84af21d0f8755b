use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use drover_types::{ArrivalStatus, CalfStatus, CalfType, DateInput, RanchId, Sex};

use drover_stockyard::{CalfSelector, TagValue};

use crate::error::DroverError;

/// One already-shaped intake record, as supplied by the bulk producer
/// after spreadsheet parsing. Breed and seller are free text here; dates
/// may be ISO strings or day-serials; the EID may be numeric.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalfIntake {
    pub primary_id: String,
    pub eid: Option<TagValue>,
    pub original_tag: Option<String>,
    pub placed_date: DateInput,
    pub breed: String,
    pub sex: Sex,
    pub purchase_price: Decimal,
    pub seller: String,
    pub seller_address: Option<String>,
    pub seller_city: Option<String>,
    pub seller_state: Option<String>,
    pub seller_zip: Option<String>,
    pub current_ranch_id: Option<RanchId>,
    pub origin_ranch_id: Option<RanchId>,
    pub status: Option<CalfStatus>,
    pub condition: Option<String>,
    pub calf_type: CalfType,
    #[serde(default)]
    pub pre_days_on_feed: i64,
}

/// Partial calf update in caller-facing form: dates not yet normalized,
/// breed and seller not yet canonicalized.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CalfUpdate {
    pub primary_id: Option<String>,
    pub eid: Option<TagValue>,
    pub original_tag: Option<String>,
    pub placed_date: Option<DateInput>,
    pub breed: Option<String>,
    pub sex: Option<Sex>,
    pub purchase_price: Option<Decimal>,
    pub seller: Option<String>,
    pub seller_address: Option<String>,
    pub seller_city: Option<String>,
    pub seller_state: Option<String>,
    pub seller_zip: Option<String>,
    pub current_ranch_id: Option<RanchId>,
    pub status: Option<CalfStatus>,
    pub condition: Option<String>,
    pub calf_type: Option<CalfType>,
    pub pre_days_on_feed: Option<i64>,
    pub death_date: Option<DateInput>,
    pub notes: Option<String>,
}

/// A transfer request as it arrives at the boundary: two optional
/// destination fields (exactly one must be present), raw dates, and the
/// calf selector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoadRequest {
    pub origin_ranch_id: RanchId,
    pub destination_ranch_id: Option<RanchId>,
    pub destination_name: Option<String>,
    pub departure_date: DateInput,
    pub arrival_date: Option<DateInput>,
    pub notes: Option<String>,
    pub trucking: Option<String>,
    #[serde(default)]
    pub selector: CalfSelector,
}

/// Post-creation load amendment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoadAmendment {
    pub departure_date: Option<DateInput>,
    pub arrival_date: Option<DateInput>,
    pub notes: Option<String>,
    pub after_arrival_notes: Option<String>,
    pub trucking: Option<String>,
}

/// Arrival exception amendment for one (load, calf) pair. `None` clears.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ArrivalAmendment {
    pub arrival_status: Option<ArrivalStatus>,
}

/// Result of a bulk intake: everything admitted, plus per-row failures.
/// A failing row never blocks the rows around it.
#[derive(Debug)]
pub struct BatchOutcome {
    pub admitted: Vec<drover_stockyard::Calf>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One failed bulk-intake row, addressed by input position and tag.
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub primary_id: String,
    pub error: DroverError,
}
