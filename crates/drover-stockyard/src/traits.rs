use drover_types::{ArrivalStatus, CalfId, LoadId, RanchId};

use crate::error::StockResult;
use crate::records::{
    Calf, CalfDraft, CalfLoad, CalfPatch, Load, LoadDraft, LoadManifest, LoadPatch, MovementRecord,
    Ranch, RanchDraft, RanchPatch,
};
use crate::transfer::{CalfSelector, TransferReceipt};

/// Read side of the stockyard.
///
/// All reads are snapshots: the returned values are owned copies and
/// never observe a transfer mid-flight.
pub trait StockReader: Send + Sync {
    fn ranch(&self, id: RanchId) -> StockResult<Option<Ranch>>;

    /// All ranches, ordered by name.
    fn ranches(&self) -> StockResult<Vec<Ranch>>;

    fn calf(&self, id: CalfId) -> StockResult<Option<Calf>>;

    /// Full-detail list filtered by **origin** ranch: the historical
    /// "where did it come from" view.
    fn calves_by_origin(&self, ranch: RanchId) -> StockResult<Vec<Calf>>;

    /// Calves physically present now: current ranch AND status Feeding.
    fn inventory(&self, ranch: RanchId) -> StockResult<Vec<Calf>>;

    /// Operational view: current-ranch calves regardless of status.
    fn manage_view(&self, ranch: RanchId) -> StockResult<Vec<Calf>>;

    fn load(&self, id: LoadId) -> StockResult<Option<Load>>;

    /// Loads originating at a ranch, ordered by departure date.
    fn loads_by_ranch(&self, origin: RanchId) -> StockResult<Vec<Load>>;

    /// A load together with its linkage rows.
    fn load_manifest(&self, id: LoadId) -> StockResult<Option<LoadManifest>>;

    /// The calf's full audit trail, ordered by event date ascending (ties
    /// broken by record id, which is time-ordered). Records are
    /// self-contained; reconstructing the timeline never requires joining
    /// back through mutable ledger state.
    fn movement_history(&self, calf: CalfId) -> StockResult<Vec<MovementRecord>>;
}

/// Write side of the stockyard.
///
/// Implementations must guarantee:
/// - `create_load` is atomic: the load row, all linkage rows, all history
///   rows, and all calf mutations commit together or not at all.
/// - Two concurrent `create_load` calls claiming the same calf commit at
///   most one mutation for it; the loser silently excludes the calf.
/// - Ranch deletion nulls dependent references, never cascades to calves.
/// - History rows are never mutated or deleted, except by whole-calf
///   cascade (and linkage severing on load delete).
pub trait StockWriter: Send + Sync {
    fn create_ranch(&self, draft: RanchDraft) -> StockResult<Ranch>;
    fn update_ranch(&self, id: RanchId, patch: RanchPatch) -> StockResult<Ranch>;

    /// Delete a ranch, setting dependent calf/load references to null.
    fn delete_ranch(&self, id: RanchId) -> StockResult<()>;

    /// Admit a calf and append its intake movement record.
    fn admit_calf(&self, draft: CalfDraft) -> StockResult<Calf>;

    /// Patch a calf. Status and ranch changes append movement records.
    fn update_calf(&self, id: CalfId, patch: CalfPatch) -> StockResult<Calf>;

    /// Delete a calf, cascading its linkage and history rows.
    fn delete_calf(&self, id: CalfId) -> StockResult<()>;

    /// The atomic load transfer. Matching calves (status Feeding, tag in
    /// selector) are relocated to the destination, marked Shipped, linked
    /// to the load, and given a load-transfer history record — all as one
    /// unit of work. Selector entries that match nothing, or match calves
    /// not in Feeding status, are silently excluded: partial and stale
    /// selectors from intake sheets are expected input, not errors. An
    /// empty selector creates the load with zero attached animals.
    fn create_load(&self, draft: LoadDraft, selector: &CalfSelector)
        -> StockResult<TransferReceipt>;

    fn update_load(&self, id: LoadId, patch: LoadPatch) -> StockResult<Load>;

    /// Delete a load: linkage rows cascade away; movement records survive
    /// with their load linkage severed.
    fn delete_load(&self, id: LoadId) -> StockResult<()>;

    /// Record or clear a post-arrival exception on a (load, calf) pair.
    /// Never touches the calf's ledger status.
    fn set_arrival_status(
        &self,
        load: LoadId,
        calf: CalfId,
        status: Option<ArrivalStatus>,
    ) -> StockResult<CalfLoad>;
}
