use std::collections::HashMap;
use std::sync::RwLock;

use crate::entity::CanonicalEntity;
use crate::error::{RegistryError, RegistryResult};

/// Generic lookup-or-create store for canonical master data.
///
/// Lookup and insert execute under one write lock, so two concurrent
/// `ensure` calls for the same normalized name can never both insert —
/// the in-memory analog of a unique constraint with
/// insert-then-fallback-to-read on conflict.
pub struct CanonicalRegistry<E: CanonicalEntity> {
    inner: RwLock<Table<E>>,
}

struct Table<E> {
    rows: Vec<E>,
    by_key: HashMap<String, usize>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            by_key: HashMap::new(),
        }
    }
}

impl<E: CanonicalEntity> CanonicalRegistry<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Table::default()),
        }
    }

    /// Look up an existing row under normalized equality; create one when
    /// absent. Returns the stored canonical name either way.
    pub fn ensure(&self, raw: E::Raw) -> RegistryResult<String> {
        let key = E::identity_key_of(&raw);
        if key.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let mut table = self.inner.write().map_err(|_| RegistryError::Poisoned)?;
        if let Some(&index) = table.by_key.get(&key) {
            return Ok(table.rows[index].canonical_name().to_string());
        }

        let row = E::materialize(raw, &table.rows);
        let name = row.canonical_name().to_string();
        tracing::debug!(key = %key, name = %name, "registry insert");

        let index = table.rows.len();
        table.rows.push(row);
        table.by_key.insert(key, index);
        Ok(name)
    }

    /// Find the row matching the raw input's identity, if any.
    pub fn find(&self, raw: &E::Raw) -> RegistryResult<Option<E>> {
        let key = E::identity_key_of(raw);
        let table = self.inner.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(table.by_key.get(&key).map(|&index| table.rows[index].clone()))
    }

    /// All rows in insertion order.
    pub fn all(&self) -> RegistryResult<Vec<E>> {
        let table = self.inner.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(table.rows.clone())
    }

    /// Re-identify an existing row from new raw input, keeping its id.
    /// Fails with a conflict when the new identity already names a
    /// different row.
    pub fn rename(&self, from: &E::Raw, to: E::Raw) -> RegistryResult<String> {
        let old_key = E::identity_key_of(from);
        let new_key = E::identity_key_of(&to);
        if new_key.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let mut table = self.inner.write().map_err(|_| RegistryError::Poisoned)?;
        let index = *table
            .by_key
            .get(&old_key)
            .ok_or(RegistryError::NotFound(old_key.clone()))?;

        if let Some(&other) = table.by_key.get(&new_key) {
            if other != index {
                return Err(RegistryError::Conflict {
                    field: "name",
                    value: new_key,
                });
            }
        }

        table.rows[index].rekey(to);
        let name = table.rows[index].canonical_name().to_string();
        table.by_key.remove(&old_key);
        table.by_key.insert(new_key, index);
        Ok(name)
    }

    /// Delete the row matching the raw input's identity. Returns `true`
    /// if a row existed.
    pub fn remove(&self, raw: &E::Raw) -> RegistryResult<bool> {
        let key = E::identity_key_of(raw);
        let mut table = self.inner.write().map_err(|_| RegistryError::Poisoned)?;
        let Some(index) = table.by_key.remove(&key) else {
            return Ok(false);
        };

        table.rows.remove(index);
        // Removal shifts everything after `index` left by one.
        for slot in table.by_key.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        Ok(true)
    }

    pub fn len(&self) -> RegistryResult<usize> {
        let table = self.inner.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(table.rows.len())
    }

    pub fn is_empty(&self) -> RegistryResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<E: CanonicalEntity> Default for CanonicalRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
