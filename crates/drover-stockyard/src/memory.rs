use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use drover_registry::identity_key;
use drover_types::{ArrivalStatus, CalfId, CalfLoadId, CalfStatus, LoadId, RanchId};

use crate::error::{StockResult, StockyardError};
use crate::records::{
    Calf, CalfDraft, CalfLoad, CalfPatch, Destination, Load, LoadDraft, LoadManifest, LoadPatch,
    Movement, MovementRecord, Ranch, RanchDraft, RanchPatch,
};
use crate::traits::{StockReader, StockWriter};
use crate::transfer::{days_on_feed_at_shipment, CalfSelector, TransferReceipt};

/// In-memory stockyard: every table behind one `RwLock`, so a write
/// operation observes and mutates a single consistent snapshot.
///
/// The load-transfer path stages its mutations on a scratch copy of the
/// state and swaps it in only when every step has succeeded, which makes
/// the whole operation all-or-nothing by construction.
pub struct InMemoryStockyard {
    inner: RwLock<StockState>,
    #[cfg(test)]
    fail_before_history: std::sync::atomic::AtomicBool,
}

#[derive(Default, Clone)]
struct StockState {
    ranches: HashMap<RanchId, Ranch>,
    /// Normalized ranch name -> id. The uniqueness backstop.
    ranch_names: HashMap<String, RanchId>,
    calves: HashMap<CalfId, Calf>,
    loads: HashMap<LoadId, Load>,
    calf_loads: HashMap<CalfLoadId, CalfLoad>,
    movements: Vec<MovementRecord>,
}

impl InMemoryStockyard {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StockState::default()),
            #[cfg(test)]
            fail_before_history: std::sync::atomic::AtomicBool::new(false),
        }
    }

    fn read(&self) -> StockResult<RwLockReadGuard<'_, StockState>> {
        self.inner
            .read()
            .map_err(|_| StockyardError::Internal("stockyard read lock poisoned".into()))
    }

    fn write(&self) -> StockResult<RwLockWriteGuard<'_, StockState>> {
        self.inner
            .write()
            .map_err(|_| StockyardError::Internal("stockyard write lock poisoned".into()))
    }
}

impl Default for InMemoryStockyard {
    fn default() -> Self {
        Self::new()
    }
}

fn require_ranch(
    state: &StockState,
    field: &'static str,
    id: RanchId,
) -> StockResult<()> {
    if state.ranches.contains_key(&id) {
        Ok(())
    } else {
        Err(StockyardError::referential(field, "ranch", id))
    }
}

impl StockWriter for InMemoryStockyard {
    fn create_ranch(&self, draft: RanchDraft) -> StockResult<Ranch> {
        let key = identity_key(&draft.name);
        if key.is_empty() {
            return Err(StockyardError::validation("ranch.name", "name is empty"));
        }

        let mut state = self.write()?;
        if state.ranch_names.contains_key(&key) {
            return Err(StockyardError::conflict("ranch.name", draft.name));
        }

        let now = Utc::now();
        let ranch = Ranch {
            id: RanchId::new(),
            name: draft.name.trim().to_string(),
            address: draft.address,
            city: draft.city,
            state: draft.state,
            zip: draft.zip,
            manager: draft.manager,
            color: draft.color,
            weight_brackets: draft.weight_brackets,
            price_periods: draft.price_periods,
            created_at: now,
            updated_at: now,
        };

        state.ranch_names.insert(key, ranch.id);
        state.ranches.insert(ranch.id, ranch.clone());
        tracing::debug!(ranch = %ranch.id.short_id(), name = %ranch.name, "ranch created");
        Ok(ranch)
    }

    fn update_ranch(&self, id: RanchId, patch: RanchPatch) -> StockResult<Ranch> {
        let mut state = self.write()?;

        let mut ranch = state
            .ranches
            .get(&id)
            .cloned()
            .ok_or_else(|| StockyardError::not_found("ranch", id))?;

        if let Some(name) = &patch.name {
            let new_key = identity_key(name);
            if new_key.is_empty() {
                return Err(StockyardError::validation("ranch.name", "name is empty"));
            }
            if state.ranch_names.get(&new_key).is_some_and(|&other| other != id) {
                return Err(StockyardError::conflict("ranch.name", name.clone()));
            }
        }
        if let Some(name) = patch.name {
            state.ranch_names.remove(&identity_key(&ranch.name));
            ranch.name = name.trim().to_string();
            state.ranch_names.insert(identity_key(&ranch.name), id);
        }
        if let Some(address) = patch.address {
            ranch.address = Some(address);
        }
        if let Some(city) = patch.city {
            ranch.city = Some(city);
        }
        if let Some(st) = patch.state {
            ranch.state = Some(st);
        }
        if let Some(zip) = patch.zip {
            ranch.zip = Some(zip);
        }
        if let Some(manager) = patch.manager {
            ranch.manager = Some(manager);
        }
        if let Some(color) = patch.color {
            ranch.color = Some(color);
        }
        if let Some(brackets) = patch.weight_brackets {
            ranch.weight_brackets = brackets;
        }
        if let Some(periods) = patch.price_periods {
            ranch.price_periods = periods;
        }
        ranch.updated_at = Utc::now();

        state.ranches.insert(id, ranch.clone());
        Ok(ranch)
    }

    fn delete_ranch(&self, id: RanchId) -> StockResult<()> {
        let mut state = self.write()?;
        let ranch = state
            .ranches
            .remove(&id)
            .ok_or_else(|| StockyardError::not_found("ranch", id))?;
        state.ranch_names.remove(&identity_key(&ranch.name));

        // SET NULL semantics: dependents survive with the reference gone.
        let mut calves_touched = 0usize;
        for calf in state.calves.values_mut() {
            let mut touched = false;
            if calf.current_ranch_id == Some(id) {
                calf.current_ranch_id = None;
                touched = true;
            }
            if calf.origin_ranch_id == Some(id) {
                calf.origin_ranch_id = None;
                touched = true;
            }
            if touched {
                calves_touched += 1;
            }
        }

        let mut loads_touched = 0usize;
        for load in state.loads.values_mut() {
            let mut touched = false;
            if load.origin_ranch_id == Some(id) {
                load.origin_ranch_id = None;
                touched = true;
            }
            if load.destination_ranch_id == Some(id) {
                load.destination_ranch_id = None;
                touched = true;
            }
            if touched {
                loads_touched += 1;
            }
        }

        tracing::info!(
            ranch = %id.short_id(),
            calves = calves_touched,
            loads = loads_touched,
            "ranch deleted; dependent references nulled"
        );
        Ok(())
    }

    fn admit_calf(&self, draft: CalfDraft) -> StockResult<Calf> {
        let primary_id = draft.primary_id.trim().to_string();
        if primary_id.is_empty() {
            return Err(StockyardError::validation(
                "calf.primary_id",
                "primary id is empty",
            ));
        }
        if draft.breed.trim().is_empty() {
            return Err(StockyardError::validation("calf.breed", "breed is empty"));
        }
        if draft.seller.trim().is_empty() {
            return Err(StockyardError::validation("calf.seller", "seller is empty"));
        }

        let mut state = self.write()?;
        if let Some(ranch) = draft.current_ranch_id {
            require_ranch(&state, "calf.current_ranch_id", ranch)?;
        }
        if let Some(ranch) = draft.origin_ranch_id {
            require_ranch(&state, "calf.origin_ranch_id", ranch)?;
        }

        let now = Utc::now();
        let status = draft.status.unwrap_or(CalfStatus::Feeding);
        let calf = Calf {
            id: CalfId::new(),
            primary_id,
            eid: draft.eid.and_then(none_if_blank),
            original_tag: draft.original_tag.and_then(none_if_blank),
            placed_date: draft.placed_date,
            breed: draft.breed,
            sex: draft.sex,
            purchase_price: draft.purchase_price,
            seller: draft.seller,
            current_ranch_id: draft.current_ranch_id,
            origin_ranch_id: draft.origin_ranch_id,
            status,
            condition: draft.condition,
            calf_type: draft.calf_type,
            pre_days_on_feed: draft.pre_days_on_feed,
            death_date: None,
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        };

        state.movements.push(MovementRecord::new(
            calf.id,
            calf.placed_date,
            Movement::Intake {
                to_ranch: calf.current_ranch_id,
            },
        ));

        // Admitting directly into a non-Feeding status still leaves one
        // history row per transition: intake, then the jump.
        if status != CalfStatus::Feeding {
            state.movements.push(MovementRecord::new(
                calf.id,
                calf.placed_date,
                Movement::StatusChange {
                    from_status: CalfStatus::Feeding,
                    to_status: status,
                },
            ));
        }

        state.calves.insert(calf.id, calf.clone());
        tracing::debug!(calf = %calf.id.short_id(), tag = %calf.primary_id, "calf admitted");
        Ok(calf)
    }

    fn update_calf(&self, id: CalfId, patch: CalfPatch) -> StockResult<Calf> {
        let mut state = self.write()?;

        let mut calf = state
            .calves
            .get(&id)
            .cloned()
            .ok_or_else(|| StockyardError::not_found("calf", id))?;

        if let Some(ranch) = patch.current_ranch_id {
            require_ranch(&state, "calf.current_ranch_id", ranch)?;
        }

        let now = Utc::now();
        let old_status = calf.status;
        let old_ranch = calf.current_ranch_id;

        if let Some(primary_id) = patch.primary_id {
            let trimmed = primary_id.trim().to_string();
            if trimmed.is_empty() {
                return Err(StockyardError::validation(
                    "calf.primary_id",
                    "primary id is empty",
                ));
            }
            calf.primary_id = trimmed;
        }
        if let Some(eid) = patch.eid {
            calf.eid = none_if_blank(eid);
        }
        if let Some(tag) = patch.original_tag {
            calf.original_tag = none_if_blank(tag);
        }
        if let Some(placed) = patch.placed_date {
            calf.placed_date = placed;
        }
        if let Some(breed) = patch.breed {
            calf.breed = breed;
        }
        if let Some(sex) = patch.sex {
            calf.sex = sex;
        }
        if let Some(price) = patch.purchase_price {
            calf.purchase_price = price;
        }
        if let Some(seller) = patch.seller {
            calf.seller = seller;
        }
        if let Some(ranch) = patch.current_ranch_id {
            calf.current_ranch_id = Some(ranch);
        }
        if let Some(condition) = patch.condition {
            calf.condition = Some(condition);
        }
        if let Some(calf_type) = patch.calf_type {
            calf.calf_type = calf_type;
        }
        if let Some(pre_days) = patch.pre_days_on_feed {
            calf.pre_days_on_feed = pre_days;
        }
        if let Some(death_date) = patch.death_date {
            calf.death_date = Some(death_date);
        }

        // A manual relocation (no load involved) is still a movement.
        if calf.current_ranch_id != old_ranch {
            state.movements.push(
                MovementRecord::new(
                    id,
                    now,
                    Movement::RanchTransfer {
                        from_ranch: old_ranch,
                        to_ranch: calf.current_ranch_id,
                    },
                )
                .with_notes(patch.notes.clone()),
            );
        }

        if let Some(new_status) = patch.status {
            if new_status != old_status {
                if old_status.is_terminal() {
                    tracing::warn!(
                        calf = %id.short_id(),
                        from = %old_status,
                        to = %new_status,
                        "status transition out of a terminal state"
                    );
                }
                calf.status = new_status;
                let movement = match new_status {
                    CalfStatus::Deceased => {
                        if calf.death_date.is_none() {
                            calf.death_date = Some(now);
                        }
                        Movement::Death {
                            from_status: old_status,
                            ranch: calf.current_ranch_id,
                        }
                    }
                    CalfStatus::Shipped => Movement::ShippedOut {
                        from_ranch: calf.current_ranch_id,
                        from_status: old_status,
                    },
                    _ => Movement::StatusChange {
                        from_status: old_status,
                        to_status: new_status,
                    },
                };
                let event_date = match new_status {
                    CalfStatus::Deceased => calf.death_date.unwrap_or(now),
                    _ => now,
                };
                state.movements.push(
                    MovementRecord::new(id, event_date, movement).with_notes(patch.notes.clone()),
                );
            }
        }

        calf.updated_at = now;
        state.calves.insert(id, calf.clone());
        Ok(calf)
    }

    fn delete_calf(&self, id: CalfId) -> StockResult<()> {
        let mut state = self.write()?;
        state
            .calves
            .remove(&id)
            .ok_or_else(|| StockyardError::not_found("calf", id))?;

        state.calf_loads.retain(|_, link| link.calf_id != id);
        state.movements.retain(|record| record.calf_id != id);
        tracing::info!(calf = %id.short_id(), "calf deleted with linkage and history");
        Ok(())
    }

    fn create_load(
        &self,
        draft: LoadDraft,
        selector: &CalfSelector,
    ) -> StockResult<TransferReceipt> {
        let mut state = self.write()?;

        // Stage every mutation on a scratch copy; swap in on success. A
        // failure at any step leaves the live state untouched.
        let mut staged = state.clone();

        require_ranch(&staged, "load.origin_ranch_id", draft.origin_ranch_id)?;
        let (destination_ranch_id, destination_name) = match &draft.destination {
            Destination::Ranch(id) => {
                require_ranch(&staged, "load.destination_ranch_id", *id)?;
                (Some(*id), None)
            }
            Destination::Named(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(StockyardError::validation(
                        "load.destination_name",
                        "destination name is empty",
                    ));
                }
                (None, Some(trimmed.to_string()))
            }
        };
        if let Some(arrival) = draft.arrival_date {
            if arrival < draft.departure_date {
                return Err(StockyardError::validation(
                    "load.arrival_date",
                    "arrival date precedes departure date",
                ));
            }
        }

        let now = Utc::now();
        let load = Load {
            id: LoadId::new(),
            origin_ranch_id: Some(draft.origin_ranch_id),
            destination_ranch_id,
            destination_name,
            departure_date: draft.departure_date,
            arrival_date: draft.arrival_date,
            notes: draft.notes,
            after_arrival_notes: None,
            trucking: draft.trucking,
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        };
        staged.loads.insert(load.id, load.clone());

        let mut manifest = Vec::new();
        let mut history = Vec::new();

        if !selector.is_empty() {
            let eids = selector.eid_set();
            let primary_ids = selector.primary_id_set();

            // Calves not found, or found outside Feeding, are silently
            // excluded: stale selector rows from intake sheets are
            // expected input.
            let mut matched: Vec<CalfId> = staged
                .calves
                .values()
                .filter(|calf| calf.status == CalfStatus::Feeding)
                .filter(|calf| {
                    calf.eid.as_deref().is_some_and(|eid| eids.contains(eid))
                        || primary_ids.contains(calf.primary_id.as_str())
                })
                .map(|calf| calf.id)
                .collect();
            matched.sort();

            for calf_id in matched {
                let Some(calf) = staged.calves.get_mut(&calf_id) else {
                    continue;
                };
                // Guarded update: the conditional re-check is what makes a
                // racing transfer lose cleanly instead of double-shipping.
                if calf.status != CalfStatus::Feeding {
                    continue;
                }

                let from_ranch = calf.current_ranch_id;
                calf.current_ranch_id = destination_ranch_id;
                calf.status = CalfStatus::Shipped;
                calf.updated_at = now;

                let link = CalfLoad {
                    id: CalfLoadId::new(),
                    load_id: load.id,
                    calf_id,
                    days_on_feed_at_shipment: days_on_feed_at_shipment(
                        calf.placed_date,
                        load.departure_date,
                    ),
                    arrival_status: None,
                };
                staged.calf_loads.insert(link.id, link.clone());
                manifest.push(link);

                history.push(MovementRecord::new(
                    calf_id,
                    load.departure_date,
                    Movement::LoadTransfer {
                        load_id: load.id,
                        from_ranch,
                        to_ranch: destination_ranch_id,
                        from_status: CalfStatus::Feeding,
                        to_status: CalfStatus::Shipped,
                    },
                ));
            }
        }

        #[cfg(test)]
        if self
            .fail_before_history
            .load(std::sync::atomic::Ordering::SeqCst)
        {
            return Err(StockyardError::TransactionFailed {
                reason: "injected failure before history insert".into(),
            });
        }

        staged.movements.extend(history);
        *state = staged;

        tracing::info!(
            load = %load.id.short_id(),
            origin = %draft.origin_ranch_id.short_id(),
            shipped = manifest.len(),
            "load transfer committed"
        );
        Ok(TransferReceipt { load, manifest })
    }

    fn update_load(&self, id: LoadId, patch: LoadPatch) -> StockResult<Load> {
        let mut state = self.write()?;
        let mut load = state
            .loads
            .get(&id)
            .cloned()
            .ok_or_else(|| StockyardError::not_found("load", id))?;

        if let Some(departure) = patch.departure_date {
            load.departure_date = departure;
        }
        if let Some(arrival) = patch.arrival_date {
            load.arrival_date = Some(arrival);
        }
        if let (Some(arrival), departure) = (load.arrival_date, load.departure_date) {
            if arrival < departure {
                return Err(StockyardError::validation(
                    "load.arrival_date",
                    "arrival date precedes departure date",
                ));
            }
        }
        if let Some(notes) = patch.notes {
            load.notes = Some(notes);
        }
        if let Some(notes) = patch.after_arrival_notes {
            load.after_arrival_notes = Some(notes);
        }
        if let Some(trucking) = patch.trucking {
            load.trucking = Some(trucking);
        }
        load.updated_at = Utc::now();

        state.loads.insert(id, load.clone());
        Ok(load)
    }

    fn delete_load(&self, id: LoadId) -> StockResult<()> {
        let mut state = self.write()?;
        state
            .loads
            .remove(&id)
            .ok_or_else(|| StockyardError::not_found("load", id))?;

        state.calf_loads.retain(|_, link| link.load_id != id);

        // History survives with the load linkage severed: the transfer
        // degrades to a plain ranch transfer, timeline intact.
        for record in state.movements.iter_mut() {
            if record.movement.load_id() == Some(id) {
                if let Movement::LoadTransfer {
                    from_ranch,
                    to_ranch,
                    ..
                } = record.movement
                {
                    record.movement = Movement::RanchTransfer {
                        from_ranch,
                        to_ranch,
                    };
                }
            }
        }

        tracing::info!(load = %id.short_id(), "load deleted; linkage cascaded");
        Ok(())
    }

    fn set_arrival_status(
        &self,
        load: LoadId,
        calf: CalfId,
        status: Option<ArrivalStatus>,
    ) -> StockResult<CalfLoad> {
        let mut state = self.write()?;
        let link = state
            .calf_loads
            .values_mut()
            .find(|link| link.load_id == load && link.calf_id == calf)
            .ok_or_else(|| {
                StockyardError::not_found("calf_load", format!("{load}/{calf}"))
            })?;

        link.arrival_status = status;
        Ok(link.clone())
    }
}

impl StockReader for InMemoryStockyard {
    fn ranch(&self, id: RanchId) -> StockResult<Option<Ranch>> {
        Ok(self.read()?.ranches.get(&id).cloned())
    }

    fn ranches(&self) -> StockResult<Vec<Ranch>> {
        let state = self.read()?;
        let mut ranches: Vec<Ranch> = state.ranches.values().cloned().collect();
        ranches.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(ranches)
    }

    fn calf(&self, id: CalfId) -> StockResult<Option<Calf>> {
        Ok(self.read()?.calves.get(&id).cloned())
    }

    fn calves_by_origin(&self, ranch: RanchId) -> StockResult<Vec<Calf>> {
        let state = self.read()?;
        Ok(sorted_calves(
            state
                .calves
                .values()
                .filter(|calf| calf.origin_ranch_id == Some(ranch)),
        ))
    }

    fn inventory(&self, ranch: RanchId) -> StockResult<Vec<Calf>> {
        let state = self.read()?;
        Ok(sorted_calves(state.calves.values().filter(|calf| {
            calf.current_ranch_id == Some(ranch) && calf.status == CalfStatus::Feeding
        })))
    }

    fn manage_view(&self, ranch: RanchId) -> StockResult<Vec<Calf>> {
        let state = self.read()?;
        Ok(sorted_calves(
            state
                .calves
                .values()
                .filter(|calf| calf.current_ranch_id == Some(ranch)),
        ))
    }

    fn load(&self, id: LoadId) -> StockResult<Option<Load>> {
        Ok(self.read()?.loads.get(&id).cloned())
    }

    fn loads_by_ranch(&self, origin: RanchId) -> StockResult<Vec<Load>> {
        let state = self.read()?;
        let mut loads: Vec<Load> = state
            .loads
            .values()
            .filter(|load| load.origin_ranch_id == Some(origin))
            .cloned()
            .collect();
        loads.sort_by(|a, b| {
            a.departure_date
                .cmp(&b.departure_date)
                .then(a.id.cmp(&b.id))
        });
        Ok(loads)
    }

    fn load_manifest(&self, id: LoadId) -> StockResult<Option<LoadManifest>> {
        let state = self.read()?;
        let Some(load) = state.loads.get(&id).cloned() else {
            return Ok(None);
        };
        let mut links: Vec<CalfLoad> = state
            .calf_loads
            .values()
            .filter(|link| link.load_id == id)
            .cloned()
            .collect();
        links.sort_by(|a, b| a.calf_id.cmp(&b.calf_id));
        Ok(Some(LoadManifest { load, links }))
    }

    fn movement_history(&self, calf: CalfId) -> StockResult<Vec<MovementRecord>> {
        let state = self.read()?;
        let mut records: Vec<MovementRecord> = state
            .movements
            .iter()
            .filter(|record| record.calf_id == calf)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.event_date.cmp(&b.event_date).then(a.id.cmp(&b.id)));
        Ok(records)
    }
}

fn sorted_calves<'a>(calves: impl Iterator<Item = &'a Calf>) -> Vec<Calf> {
    let mut calves: Vec<Calf> = calves.cloned().collect();
    calves.sort_by(|a, b| a.primary_id.cmp(&b.primary_id).then(a.id.cmp(&b.id)));
    calves
}

fn none_if_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use chrono::{DateTime, NaiveDate, Utc};
    use drover_types::{utc_midnight, CalfType, MovementKind, Sex};
    use rust_decimal::Decimal;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        utc_midnight(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn ranch(yard: &InMemoryStockyard, name: &str) -> Ranch {
        yard.create_ranch(RanchDraft::named(name)).unwrap()
    }

    fn draft(primary_id: &str, ranch: RanchId) -> CalfDraft {
        CalfDraft {
            primary_id: primary_id.into(),
            eid: None,
            original_tag: None,
            placed_date: day(2024, 3, 1),
            breed: "Angus".into(),
            sex: Sex::Steer,
            purchase_price: Decimal::from(900),
            seller: "Smith Cattle".into(),
            current_ranch_id: Some(ranch),
            origin_ranch_id: Some(ranch),
            status: None,
            condition: None,
            calf_type: CalfType::One,
            pre_days_on_feed: 0,
            created_by: Some("tester".into()),
        }
    }

    fn feeding_calf(yard: &InMemoryStockyard, primary_id: &str, ranch: RanchId) -> Calf {
        yard.admit_calf(draft(primary_id, ranch)).unwrap()
    }

    fn load_draft(origin: RanchId, destination: RanchId) -> LoadDraft {
        LoadDraft::new(origin, Destination::Ranch(destination), day(2024, 4, 15))
    }

    #[test]
    fn admit_defaults_to_feeding_and_writes_intake() {
        let yard = InMemoryStockyard::new();
        let home = ranch(&yard, "Home Ranch");
        let calf = feeding_calf(&yard, "T-1", home.id);

        assert_eq!(calf.status, CalfStatus::Feeding);
        let history = yard.movement_history(calf.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].movement.kind(), MovementKind::Intake);
        assert_eq!(history[0].movement.to_ranch(), Some(home.id));
    }

    #[test]
    fn admit_rejects_missing_ranch() {
        let yard = InMemoryStockyard::new();
        let err = yard.admit_calf(draft("T-1", RanchId::new())).unwrap_err();
        assert!(matches!(err, StockyardError::Referential { entity: "ranch", .. }));
    }

    #[test]
    fn duplicate_ranch_name_is_a_conflict() {
        let yard = InMemoryStockyard::new();
        ranch(&yard, "North Forty");
        let err = yard
            .create_ranch(RanchDraft::named("  NORTH   FORTY "))
            .unwrap_err();
        assert!(matches!(err, StockyardError::Conflict { field: "ranch.name", .. }));
    }

    #[test]
    fn zero_selector_load_succeeds_with_no_links() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let dest = ranch(&yard, "Destination");

        let receipt = yard
            .create_load(load_draft(origin.id, dest.id), &CalfSelector::empty())
            .unwrap();

        assert_eq!(receipt.shipped_count(), 0);
        let manifest = yard.load_manifest(receipt.load.id).unwrap().unwrap();
        assert!(manifest.links.is_empty());
    }

    #[test]
    fn load_transfer_relocates_links_and_records_history() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let dest = ranch(&yard, "Destination");
        let calf = feeding_calf(&yard, "T-1", origin.id);

        let receipt = yard
            .create_load(
                load_draft(origin.id, dest.id),
                &CalfSelector::by_primary_ids(["T-1"]),
            )
            .unwrap();

        assert_eq!(receipt.shipped_count(), 1);
        let link = &receipt.manifest[0];
        assert_eq!(link.calf_id, calf.id);
        assert_eq!(link.days_on_feed_at_shipment, 45);

        let moved = yard.calf(calf.id).unwrap().unwrap();
        assert_eq!(moved.status, CalfStatus::Shipped);
        assert_eq!(moved.current_ranch_id, Some(dest.id));

        let history = yard.movement_history(calf.id).unwrap();
        let transfer = history.last().unwrap();
        assert_eq!(transfer.movement.kind(), MovementKind::LoadTransfer);
        assert_eq!(transfer.movement.load_id(), Some(receipt.load.id));
        assert_eq!(transfer.movement.from_ranch(), Some(origin.id));
        assert_eq!(transfer.movement.to_ranch(), Some(dest.id));
        assert_eq!(transfer.movement.to_status(), Some(CalfStatus::Shipped));
    }

    #[test]
    fn selector_matches_by_numeric_eid() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let dest = ranch(&yard, "Destination");
        let mut d = draft("T-9", origin.id);
        d.eid = Some("982000123456789".into());
        let calf = yard.admit_calf(d).unwrap();

        let receipt = yard
            .create_load(
                load_draft(origin.id, dest.id),
                &CalfSelector::by_eids([982000123456789u64]),
            )
            .unwrap();

        assert_eq!(receipt.shipped_count(), 1);
        assert_eq!(receipt.manifest[0].calf_id, calf.id);
    }

    #[test]
    fn non_feeding_and_unknown_tags_are_silently_excluded() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let dest = ranch(&yard, "Destination");

        let a = feeding_calf(&yard, "A", origin.id);
        let b = feeding_calf(&yard, "B", origin.id);
        yard.update_calf(
            b.id,
            CalfPatch {
                status: Some(CalfStatus::Shipped),
                ..CalfPatch::default()
            },
        )
        .unwrap();

        let receipt = yard
            .create_load(
                load_draft(origin.id, dest.id),
                &CalfSelector::by_primary_ids(["A", "B", "nonexistent"]),
            )
            .unwrap();

        assert_eq!(receipt.shipped_count(), 1);
        assert_eq!(receipt.manifest[0].calf_id, a.id);
        assert_eq!(
            yard.calf(b.id).unwrap().unwrap().current_ranch_id,
            Some(origin.id)
        );
    }

    #[test]
    fn free_text_destination_nulls_current_ranch() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let calf = feeding_calf(&yard, "T-1", origin.id);

        let receipt = yard
            .create_load(
                LoadDraft::new(
                    origin.id,
                    Destination::Named("Dodge City Salebarn".into()),
                    day(2024, 4, 15),
                ),
                &CalfSelector::by_primary_ids(["T-1"]),
            )
            .unwrap();

        assert_eq!(receipt.load.destination_name.as_deref(), Some("Dodge City Salebarn"));
        assert_eq!(receipt.load.destination_ranch_id, None);

        let moved = yard.calf(calf.id).unwrap().unwrap();
        assert_eq!(moved.current_ranch_id, None);
        assert_eq!(moved.status, CalfStatus::Shipped);
    }

    #[test]
    fn missing_destination_ranch_fails_with_nothing_persisted() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let calf = feeding_calf(&yard, "T-1", origin.id);

        let err = yard
            .create_load(
                load_draft(origin.id, RanchId::new()),
                &CalfSelector::by_primary_ids(["T-1"]),
            )
            .unwrap_err();
        assert!(matches!(err, StockyardError::Referential { .. }));

        let untouched = yard.calf(calf.id).unwrap().unwrap();
        assert_eq!(untouched.status, CalfStatus::Feeding);
        assert_eq!(yard.loads_by_ranch(origin.id).unwrap().len(), 0);
        assert_eq!(yard.movement_history(calf.id).unwrap().len(), 1);
    }

    #[test]
    fn injected_failure_after_mutation_persists_nothing() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let dest = ranch(&yard, "Destination");
        let calf = feeding_calf(&yard, "T-1", origin.id);

        yard.fail_before_history.store(true, Ordering::SeqCst);
        let err = yard
            .create_load(
                load_draft(origin.id, dest.id),
                &CalfSelector::by_primary_ids(["T-1"]),
            )
            .unwrap_err();
        assert!(matches!(err, StockyardError::TransactionFailed { .. }));
        yard.fail_before_history.store(false, Ordering::SeqCst);

        // Zero side effects: no load, no link, no history, calf untouched.
        let untouched = yard.calf(calf.id).unwrap().unwrap();
        assert_eq!(untouched.status, CalfStatus::Feeding);
        assert_eq!(untouched.current_ranch_id, Some(origin.id));
        assert!(yard.loads_by_ranch(origin.id).unwrap().is_empty());
        assert_eq!(yard.movement_history(calf.id).unwrap().len(), 1);

        // The same call succeeds once the fault is gone.
        let receipt = yard
            .create_load(
                load_draft(origin.id, dest.id),
                &CalfSelector::by_primary_ids(["T-1"]),
            )
            .unwrap();
        assert_eq!(receipt.shipped_count(), 1);
    }

    #[test]
    fn racing_transfers_claim_a_calf_at_most_once() {
        let yard = Arc::new(InMemoryStockyard::new());
        let origin = ranch(&yard, "Origin");
        let dest_a = ranch(&yard, "Destination A");
        let dest_b = ranch(&yard, "Destination B");
        let calf = feeding_calf(&yard, "T-1", origin.id);

        let mut handles = Vec::new();
        for dest in [dest_a.id, dest_b.id] {
            let yard = Arc::clone(&yard);
            let origin = origin.id;
            handles.push(std::thread::spawn(move || {
                yard.create_load(
                    LoadDraft::new(origin, Destination::Ranch(dest), day(2024, 4, 15)),
                    &CalfSelector::by_primary_ids(["T-1"]),
                )
            }));
        }
        let receipts: Vec<TransferReceipt> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();

        // Both loads commit; exactly one of them carries the calf.
        let shipped: usize = receipts.iter().map(TransferReceipt::shipped_count).sum();
        assert_eq!(shipped, 1);

        let history = yard.movement_history(calf.id).unwrap();
        let transfers: Vec<_> = history
            .iter()
            .filter(|r| r.movement.kind() == MovementKind::LoadTransfer)
            .collect();
        assert_eq!(transfers.len(), 1);

        let winner = receipts.iter().find(|r| r.shipped_count() == 1).unwrap();
        assert_eq!(
            yard.calf(calf.id).unwrap().unwrap().current_ranch_id,
            winner.load.destination_ranch_id
        );
    }

    #[test]
    fn history_stays_ordered_across_repeated_transfers() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let dest = ranch(&yard, "Destination");
        let calf = feeding_calf(&yard, "T-1", origin.id);

        yard.create_load(
            LoadDraft::new(origin.id, Destination::Ranch(dest.id), day(2024, 4, 1)),
            &CalfSelector::by_primary_ids(["T-1"]),
        )
        .unwrap();
        // Back on feed at the destination, then shipped again.
        yard.update_calf(
            calf.id,
            CalfPatch {
                status: Some(CalfStatus::Feeding),
                ..CalfPatch::default()
            },
        )
        .unwrap();
        yard.create_load(
            LoadDraft::new(dest.id, Destination::Ranch(origin.id), day(2024, 5, 1)),
            &CalfSelector::by_primary_ids(["T-1"]),
        )
        .unwrap();

        let history = yard.movement_history(calf.id).unwrap();
        assert!(history
            .windows(2)
            .all(|w| (w[0].event_date, w[0].id) <= (w[1].event_date, w[1].id)));

        // Load transfers carry their departure dates; the patch-driven
        // status change is stamped at wall-clock time, so it sorts last.
        let kinds: Vec<MovementKind> = history.iter().map(|r| r.movement.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                MovementKind::Intake,
                MovementKind::LoadTransfer,
                MovementKind::LoadTransfer,
                MovementKind::StatusChange,
            ]
        );
    }

    #[test]
    fn status_patch_to_deceased_stamps_death_date() {
        let yard = InMemoryStockyard::new();
        let home = ranch(&yard, "Home");
        let calf = feeding_calf(&yard, "T-1", home.id);

        let updated = yard
            .update_calf(
                calf.id,
                CalfPatch {
                    status: Some(CalfStatus::Deceased),
                    ..CalfPatch::default()
                },
            )
            .unwrap();

        assert!(updated.death_date.is_some());
        let history = yard.movement_history(calf.id).unwrap();
        assert_eq!(history.last().unwrap().movement.kind(), MovementKind::Death);
    }

    #[test]
    fn manual_ranch_move_appends_ranch_transfer() {
        let yard = InMemoryStockyard::new();
        let a = ranch(&yard, "A");
        let b = ranch(&yard, "B");
        let calf = feeding_calf(&yard, "T-1", a.id);

        yard.update_calf(
            calf.id,
            CalfPatch {
                current_ranch_id: Some(b.id),
                notes: Some("walked over".into()),
                ..CalfPatch::default()
            },
        )
        .unwrap();

        let history = yard.movement_history(calf.id).unwrap();
        let last = history.last().unwrap();
        assert_eq!(last.movement.kind(), MovementKind::RanchTransfer);
        assert_eq!(last.movement.from_ranch(), Some(a.id));
        assert_eq!(last.movement.to_ranch(), Some(b.id));
        assert_eq!(last.notes.as_deref(), Some("walked over"));
    }

    #[test]
    fn ranch_delete_nulls_references_without_cascading() {
        let yard = InMemoryStockyard::new();
        let doomed = ranch(&yard, "Doomed");
        let other = ranch(&yard, "Other");
        let calf = feeding_calf(&yard, "T-1", doomed.id);
        let receipt = yard
            .create_load(load_draft(doomed.id, other.id), &CalfSelector::empty())
            .unwrap();

        yard.delete_ranch(doomed.id).unwrap();

        let survivor = yard.calf(calf.id).unwrap().unwrap();
        assert_eq!(survivor.current_ranch_id, None);
        assert_eq!(survivor.origin_ranch_id, None);

        let load = yard.load(receipt.load.id).unwrap().unwrap();
        assert_eq!(load.origin_ranch_id, None);

        // The freed name is reusable.
        assert!(yard.create_ranch(RanchDraft::named("Doomed")).is_ok());
    }

    #[test]
    fn load_delete_cascades_links_and_severs_history_linkage() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let dest = ranch(&yard, "Destination");
        let calf = feeding_calf(&yard, "T-1", origin.id);

        let receipt = yard
            .create_load(
                load_draft(origin.id, dest.id),
                &CalfSelector::by_primary_ids(["T-1"]),
            )
            .unwrap();

        yard.delete_load(receipt.load.id).unwrap();

        assert!(yard.load(receipt.load.id).unwrap().is_none());
        let history = yard.movement_history(calf.id).unwrap();
        assert_eq!(history.len(), 2);
        let severed = history.last().unwrap();
        assert_eq!(severed.movement.kind(), MovementKind::RanchTransfer);
        assert_eq!(severed.movement.load_id(), None);
        assert_eq!(severed.movement.from_ranch(), Some(origin.id));
        assert_eq!(severed.movement.to_ranch(), Some(dest.id));
    }

    #[test]
    fn calf_delete_cascades_links_and_history() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let dest = ranch(&yard, "Destination");
        let calf = feeding_calf(&yard, "T-1", origin.id);
        let receipt = yard
            .create_load(
                load_draft(origin.id, dest.id),
                &CalfSelector::by_primary_ids(["T-1"]),
            )
            .unwrap();

        yard.delete_calf(calf.id).unwrap();

        assert!(yard.movement_history(calf.id).unwrap().is_empty());
        let manifest = yard.load_manifest(receipt.load.id).unwrap().unwrap();
        assert!(manifest.links.is_empty());
    }

    #[test]
    fn arrival_status_amends_linkage_without_touching_the_calf() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let dest = ranch(&yard, "Destination");
        let calf = feeding_calf(&yard, "T-1", origin.id);
        let receipt = yard
            .create_load(
                load_draft(origin.id, dest.id),
                &CalfSelector::by_primary_ids(["T-1"]),
            )
            .unwrap();

        let link = yard
            .set_arrival_status(receipt.load.id, calf.id, Some(ArrivalStatus::Doa))
            .unwrap();
        assert_eq!(link.arrival_status, Some(ArrivalStatus::Doa));

        // Paperwork only: the ledger status is untouched.
        assert_eq!(yard.calf(calf.id).unwrap().unwrap().status, CalfStatus::Shipped);

        let cleared = yard
            .set_arrival_status(receipt.load.id, calf.id, None)
            .unwrap();
        assert_eq!(cleared.arrival_status, None);

        let err = yard
            .set_arrival_status(receipt.load.id, CalfId::new(), Some(ArrivalStatus::Issue))
            .unwrap_err();
        assert!(matches!(err, StockyardError::NotFound { entity: "calf_load", .. }));
    }

    #[test]
    fn views_filter_by_the_right_ranch_field() {
        let yard = InMemoryStockyard::new();
        let origin = ranch(&yard, "Origin");
        let dest = ranch(&yard, "Destination");
        feeding_calf(&yard, "T-1", origin.id);
        feeding_calf(&yard, "T-2", origin.id);
        yard.create_load(
            load_draft(origin.id, dest.id),
            &CalfSelector::by_primary_ids(["T-2"]),
        )
        .unwrap();

        // Inventory: currently present and feeding.
        let origin_inventory = yard.inventory(origin.id).unwrap();
        assert_eq!(origin_inventory.len(), 1);
        assert_eq!(origin_inventory[0].primary_id, "T-1");
        assert!(yard.inventory(dest.id).unwrap().is_empty());

        // Manage view: present regardless of status.
        assert_eq!(yard.manage_view(dest.id).unwrap().len(), 1);

        // Origin view: historical, unaffected by the move.
        assert_eq!(yard.calves_by_origin(origin.id).unwrap().len(), 2);
    }
}
