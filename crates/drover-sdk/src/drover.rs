use chrono::Utc;

use drover_registry::{Breed, BreedDraft, BreedRegistry, Seller, SellerDraft, SellerRegistry};
use drover_stockyard::{
    Calf, CalfDraft, CalfLoad, CalfPatch, Destination, HistoryReport, HistoryValidator,
    InMemoryStockyard, Load, LoadDraft, LoadManifest, LoadPatch, ProjectionBuilder, Ranch,
    RanchDraft, RanchPatch, RanchRollup, StockReader, StockWriter, TagValue, TimelineEntry,
    TransferReceipt,
};
use drover_types::{ArrivalStatus, CalfId, LoadId, RanchId};

use crate::error::{DroverError, DroverResult};
use crate::intake::{BatchFailure, BatchOutcome, CalfIntake, CalfUpdate, LoadAmendment, LoadRequest};

/// The high-level Drover system: registries plus stockyard behind one
/// facade. Raw, sheet-shaped input comes in; canonical records go down.
pub struct Drover {
    stockyard: InMemoryStockyard,
    breeds: BreedRegistry,
    sellers: SellerRegistry,
}

impl Drover {
    pub fn new() -> Self {
        Self {
            stockyard: InMemoryStockyard::new(),
            breeds: BreedRegistry::new(),
            sellers: SellerRegistry::new(),
        }
    }

    // ---- Ranches ----

    pub fn create_ranch(&self, draft: RanchDraft) -> DroverResult<Ranch> {
        Ok(self.stockyard.create_ranch(draft)?)
    }

    pub fn update_ranch(&self, id: RanchId, patch: RanchPatch) -> DroverResult<Ranch> {
        Ok(self.stockyard.update_ranch(id, patch)?)
    }

    pub fn delete_ranch(&self, id: RanchId) -> DroverResult<()> {
        Ok(self.stockyard.delete_ranch(id)?)
    }

    pub fn ranch(&self, id: RanchId) -> DroverResult<Option<Ranch>> {
        Ok(self.stockyard.ranch(id)?)
    }

    pub fn ranches(&self) -> DroverResult<Vec<Ranch>> {
        Ok(self.stockyard.ranches()?)
    }

    // ---- Master data ----

    /// Resolve a free-text breed name to its canonical stored form,
    /// creating the row when it is new.
    pub fn ensure_breed(&self, name: &str) -> DroverResult<String> {
        Ok(self.breeds.ensure(BreedDraft::named(name))?)
    }

    /// All breeds in display order.
    pub fn breeds(&self) -> DroverResult<Vec<Breed>> {
        let mut breeds = self.breeds.all()?;
        breeds.sort_by_key(|b| b.order_index);
        Ok(breeds)
    }

    /// Resolve a free-text seller (name plus address tuple) to its
    /// canonical stored name, creating the row when it is new.
    pub fn ensure_seller(&self, draft: SellerDraft) -> DroverResult<String> {
        Ok(self.sellers.ensure(draft)?)
    }

    pub fn sellers(&self) -> DroverResult<Vec<Seller>> {
        Ok(self.sellers.all()?)
    }

    /// Rename a breed, keeping its row identity. Conflicts when the new
    /// name already names a different breed.
    pub fn rename_breed(&self, from: &str, to: BreedDraft) -> DroverResult<String> {
        Ok(self.breeds.rename(&BreedDraft::named(from), to)?)
    }

    /// Remove a breed row. Calves keep the canonical name they were
    /// stored with.
    pub fn remove_breed(&self, name: &str) -> DroverResult<bool> {
        Ok(self.breeds.remove(&BreedDraft::named(name))?)
    }

    pub fn rename_seller(&self, from: &SellerDraft, to: SellerDraft) -> DroverResult<String> {
        Ok(self.sellers.rename(from, to)?)
    }

    pub fn remove_seller(&self, draft: &SellerDraft) -> DroverResult<bool> {
        Ok(self.sellers.remove(draft)?)
    }

    // ---- Intake ----

    /// Admit one calf: normalize its dates, resolve breed and seller to
    /// canonical rows, stamp the acting user, and write the ledger row
    /// plus its intake movement record.
    pub fn admit(&self, intake: CalfIntake, actor: Option<&str>) -> DroverResult<Calf> {
        let placed_date = intake
            .placed_date
            .normalize()
            .map_err(DroverError::invalid_date("placed_date"))?;

        let breed = self.breeds.ensure(BreedDraft::named(&intake.breed))?;
        let seller = self.sellers.ensure(SellerDraft {
            name: intake.seller,
            address: intake.seller_address,
            city: intake.seller_city,
            state: intake.seller_state,
            zip: intake.seller_zip,
        })?;

        let draft = CalfDraft {
            primary_id: intake.primary_id,
            eid: intake.eid.as_ref().map(TagValue::as_tag),
            original_tag: intake.original_tag,
            placed_date,
            breed,
            sex: intake.sex,
            purchase_price: intake.purchase_price,
            seller,
            current_ranch_id: intake.current_ranch_id,
            origin_ranch_id: intake.origin_ranch_id,
            status: intake.status,
            condition: intake.condition,
            calf_type: intake.calf_type,
            pre_days_on_feed: intake.pre_days_on_feed,
            created_by: actor.map(str::to_string),
        };
        Ok(self.stockyard.admit_calf(draft)?)
    }

    /// Bulk intake. Rows are independent: each failure is recorded with
    /// its input position and never blocks the rest of the batch.
    pub fn admit_batch(&self, rows: Vec<CalfIntake>, actor: Option<&str>) -> BatchOutcome {
        let mut admitted = Vec::new();
        let mut failures = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            let primary_id = row.primary_id.clone();
            match self.admit(row, actor) {
                Ok(calf) => admitted.push(calf),
                Err(error) => {
                    tracing::warn!(index, tag = %primary_id, %error, "intake row rejected");
                    failures.push(BatchFailure {
                        index,
                        primary_id,
                        error,
                    });
                }
            }
        }

        BatchOutcome { admitted, failures }
    }

    pub fn update_calf(&self, id: CalfId, update: CalfUpdate) -> DroverResult<Calf> {
        let placed_date = update
            .placed_date
            .map(|d| d.normalize())
            .transpose()
            .map_err(DroverError::invalid_date("placed_date"))?;
        let death_date = update
            .death_date
            .map(|d| d.normalize())
            .transpose()
            .map_err(DroverError::invalid_date("death_date"))?;

        let breed = update
            .breed
            .map(|name| self.breeds.ensure(BreedDraft::named(name)))
            .transpose()?;
        let seller = update
            .seller
            .map(|name| {
                self.sellers.ensure(SellerDraft {
                    name,
                    address: update.seller_address,
                    city: update.seller_city,
                    state: update.seller_state,
                    zip: update.seller_zip,
                })
            })
            .transpose()?;

        let patch = CalfPatch {
            primary_id: update.primary_id,
            eid: update.eid.as_ref().map(TagValue::as_tag),
            original_tag: update.original_tag,
            placed_date,
            breed,
            sex: update.sex,
            purchase_price: update.purchase_price,
            seller,
            current_ranch_id: update.current_ranch_id,
            status: update.status,
            condition: update.condition,
            calf_type: update.calf_type,
            pre_days_on_feed: update.pre_days_on_feed,
            death_date,
            notes: update.notes,
        };
        Ok(self.stockyard.update_calf(id, patch)?)
    }

    pub fn delete_calf(&self, id: CalfId) -> DroverResult<()> {
        Ok(self.stockyard.delete_calf(id)?)
    }

    pub fn calf(&self, id: CalfId) -> DroverResult<Option<Calf>> {
        Ok(self.stockyard.calf(id)?)
    }

    // ---- Transfers ----

    /// Create a load and atomically ship every matching calf on it.
    pub fn ship(&self, request: LoadRequest, actor: Option<&str>) -> DroverResult<TransferReceipt> {
        let destination =
            Destination::from_fields(request.destination_ranch_id, request.destination_name)?;
        let departure_date = request
            .departure_date
            .normalize()
            .map_err(DroverError::invalid_date("departure_date"))?;
        let arrival_date = request
            .arrival_date
            .map(|d| d.normalize())
            .transpose()
            .map_err(DroverError::invalid_date("arrival_date"))?;

        let draft = LoadDraft {
            origin_ranch_id: request.origin_ranch_id,
            destination,
            departure_date,
            arrival_date,
            notes: request.notes,
            trucking: request.trucking,
            created_by: actor.map(str::to_string),
        };
        Ok(self.stockyard.create_load(draft, &request.selector)?)
    }

    pub fn amend_load(&self, id: LoadId, amendment: LoadAmendment) -> DroverResult<Load> {
        let departure_date = amendment
            .departure_date
            .map(|d| d.normalize())
            .transpose()
            .map_err(DroverError::invalid_date("departure_date"))?;
        let arrival_date = amendment
            .arrival_date
            .map(|d| d.normalize())
            .transpose()
            .map_err(DroverError::invalid_date("arrival_date"))?;

        let patch = LoadPatch {
            departure_date,
            arrival_date,
            notes: amendment.notes,
            after_arrival_notes: amendment.after_arrival_notes,
            trucking: amendment.trucking,
        };
        Ok(self.stockyard.update_load(id, patch)?)
    }

    pub fn delete_load(&self, id: LoadId) -> DroverResult<()> {
        Ok(self.stockyard.delete_load(id)?)
    }

    /// Record or clear a post-arrival exception on a (load, calf) pair.
    pub fn set_arrival_status(
        &self,
        load: LoadId,
        calf: CalfId,
        status: Option<ArrivalStatus>,
    ) -> DroverResult<CalfLoad> {
        Ok(self.stockyard.set_arrival_status(load, calf, status)?)
    }

    pub fn load(&self, id: LoadId) -> DroverResult<Option<Load>> {
        Ok(self.stockyard.load(id)?)
    }

    pub fn load_manifest(&self, id: LoadId) -> DroverResult<Option<LoadManifest>> {
        Ok(self.stockyard.load_manifest(id)?)
    }

    pub fn loads_by_ranch(&self, origin: RanchId) -> DroverResult<Vec<Load>> {
        Ok(self.stockyard.loads_by_ranch(origin)?)
    }

    // ---- Reports ----

    pub fn inventory(&self, ranch: RanchId) -> DroverResult<Vec<Calf>> {
        Ok(self.stockyard.inventory(ranch)?)
    }

    pub fn manage_view(&self, ranch: RanchId) -> DroverResult<Vec<Calf>> {
        Ok(self.stockyard.manage_view(ranch)?)
    }

    pub fn calves_by_origin(&self, ranch: RanchId) -> DroverResult<Vec<Calf>> {
        Ok(self.stockyard.calves_by_origin(ranch)?)
    }

    /// The calf's full movement timeline, oldest first.
    pub fn movement_history(&self, calf: CalfId) -> DroverResult<Vec<TimelineEntry>> {
        Ok(ProjectionBuilder::timeline(&self.stockyard, calf)?)
    }

    pub fn ranch_rollup(&self, ranch: RanchId) -> DroverResult<RanchRollup> {
        Ok(ProjectionBuilder::ranch_rollup(
            &self.stockyard,
            ranch,
            Utc::now(),
        )?)
    }

    pub fn validate_history(&self, calf: CalfId) -> DroverResult<HistoryReport> {
        Ok(HistoryValidator::validate_calf(&self.stockyard, calf)?)
    }
}

impl Default for Drover {
    fn default() -> Self {
        Self::new()
    }
}
