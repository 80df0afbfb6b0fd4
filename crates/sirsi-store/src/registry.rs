// crates/sirsi-store/src/registry.rs
//
// Generic in-memory registry implementing the `Registry<E>` trait.
//
// Layout:
//   - by_seq:  sequence number -> entity (ordered; drives cursor pagination)
//   - seq_of:  entity id -> sequence number
//   - unique:  (key name, normalized value) -> owning entity id
//
// All three maps live behind one RwLock, so a uniqueness check and the insert
// or update it guards happen in the same critical section.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use sirsi_core::error::AdminError;
use sirsi_core::pagination::{paginate, Page, PageRequest};
use sirsi_core::traits::{Entity, Registry};

use crate::poisoned;

#[derive(Debug)]
struct Inner<E> {
    next_seq: u64,
    by_seq: BTreeMap<u64, E>,
    seq_of: HashMap<Uuid, u64>,
    unique: HashMap<(&'static str, String), Uuid>,
}

impl<E> Default for Inner<E> {
    fn default() -> Self {
        Self {
            next_seq: 1,
            by_seq: BTreeMap::new(),
            seq_of: HashMap::new(),
            unique: HashMap::new(),
        }
    }
}

/// Concurrent-safe in-memory registry for one entity type.
#[derive(Debug)]
pub struct MemoryRegistry<E: Entity> {
    inner: RwLock<Inner<E>>,
}

impl<E: Entity> MemoryRegistry<E> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Return the number of stored entities.
    pub fn len(&self) -> Result<usize, AdminError> {
        Ok(self.inner.read().map_err(poisoned)?.by_seq.len())
    }

    /// Return whether the registry is empty.
    pub fn is_empty(&self) -> Result<bool, AdminError> {
        Ok(self.len()? == 0)
    }
}

impl<E: Entity> Default for MemoryRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject `keys` already held by an entity other than `owner`.
fn check_unique<E: Entity>(
    unique: &HashMap<(&'static str, String), Uuid>,
    keys: &[(&'static str, String)],
    owner: Uuid,
) -> Result<(), AdminError> {
    for key in keys {
        if let Some(holder) = unique.get(key) {
            if *holder != owner {
                return Err(AdminError::Validation(format!(
                    "{} {} {:?} is already taken",
                    E::KIND,
                    key.0,
                    key.1
                )));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl<E: Entity> Registry<E> for MemoryRegistry<E> {
    async fn list(&self, filter: &E::Filter, page: &PageRequest) -> Result<Page<E>, AdminError> {
        let inner = self.inner.read().map_err(poisoned)?;
        let total = inner.by_seq.values().filter(|e| e.matches(filter)).count() as u64;
        let matching = inner
            .by_seq
            .iter()
            .filter(|(_, e)| e.matches(filter))
            .map(|(seq, e)| (*seq, e.clone()));
        paginate(matching, page, total)
    }

    async fn get(&self, id: &Uuid) -> Result<E, AdminError> {
        let inner = self.inner.read().map_err(poisoned)?;
        inner
            .seq_of
            .get(id)
            .and_then(|seq| inner.by_seq.get(seq))
            .cloned()
            .ok_or_else(|| AdminError::not_found(E::KIND, id))
    }

    async fn create(&self, draft: E::Draft) -> Result<E, AdminError> {
        let entity = E::from_draft(Uuid::now_v7(), draft, Utc::now())?;
        let keys = entity.unique_keys();

        let mut inner = self.inner.write().map_err(poisoned)?;
        check_unique::<E>(&inner.unique, &keys, entity.id())?;

        let seq = inner.next_seq;
        inner.next_seq += 1;
        for key in keys {
            inner.unique.insert(key, entity.id());
        }
        inner.seq_of.insert(entity.id(), seq);
        inner.by_seq.insert(seq, entity.clone());

        tracing::debug!("Created {} {}", E::KIND, entity.id());
        Ok(entity)
    }

    async fn update(&self, id: &Uuid, patch: E::Patch) -> Result<E, AdminError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let seq = *inner
            .seq_of
            .get(id)
            .ok_or_else(|| AdminError::not_found(E::KIND, id))?;
        let current = inner
            .by_seq
            .get(&seq)
            .cloned()
            .ok_or_else(|| AdminError::Internal(format!("{} index out of sync for {}", E::KIND, id)))?;

        // Patch a copy so a rejected patch leaves the stored entity untouched.
        let mut next = current.clone();
        next.apply_patch(patch)?;
        if next.id() != *id {
            return Err(AdminError::Validation(format!("{} id is immutable", E::KIND)));
        }

        let new_keys = next.unique_keys();
        check_unique::<E>(&inner.unique, &new_keys, *id)?;
        for key in current.unique_keys() {
            inner.unique.remove(&key);
        }
        for key in new_keys {
            inner.unique.insert(key, *id);
        }
        inner.by_seq.insert(seq, next.clone());

        Ok(next)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), AdminError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let seq = inner
            .seq_of
            .remove(id)
            .ok_or_else(|| AdminError::not_found(E::KIND, id))?;
        if let Some(entity) = inner.by_seq.remove(&seq) {
            for key in entity.unique_keys() {
                inner.unique.remove(&key);
            }
        }
        tracing::debug!("Deleted {} {}", E::KIND, id);
        Ok(())
    }

    async fn count(&self, filter: &E::Filter) -> Result<u64, AdminError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.by_seq.values().filter(|e| e.matches(filter)).count() as u64)
    }
}
