//! In-memory household list mirrored to local storage.

use std::sync::Arc;

use serde_json::Value;

use guest_core::Household;
use guest_core::derive::ensure_derived_fields;
use guest_core::seed::seed_households;

use crate::local_store::{DATA_KEY, LocalStore};

/// The canonical client-side list. Every record in it has passed through
/// `ensure_derived_fields`.
pub struct HouseholdCache {
    households: Vec<Household>,
    store: Arc<dyn LocalStore>,
}

impl HouseholdCache {
    /// Start from the local cache, or the seed list when it is empty or
    /// unreadable.
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let cached = store
            .get(DATA_KEY)
            .and_then(|raw| match serde_json::from_str::<Value>(&raw) {
                Ok(value) => Some(Household::list_from_value(value)),
                Err(error) => {
                    tracing::warn!(%error, "ignoring unreadable guest list cache");
                    None
                }
            })
            .unwrap_or_default();

        let households = if cached.is_empty() {
            seed_households()
        } else {
            cached.into_iter().map(ensure_derived_fields).collect()
        };
        Self { households, store }
    }

    #[must_use]
    pub fn households(&self) -> &[Household] {
        &self.households
    }

    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.households.iter().map(|h| h.id.clone()).collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Household> {
        self.households.iter().find(|h| h.id == id)
    }

    /// Replace the household `id` with `f(current)`. Returns whether it existed.
    pub fn update(&mut self, id: &str, f: impl FnOnce(Household) -> Household) -> bool {
        let Some(slot) = self.households.iter_mut().find(|h| h.id == id) else {
            return false;
        };
        *slot = f(std::mem::take(slot));
        self.persist();
        true
    }

    pub fn push(&mut self, household: Household) {
        self.households.push(ensure_derived_fields(household));
        self.persist();
    }

    pub fn remove(&mut self, id: &str) -> Option<Household> {
        let index = self.households.iter().position(|h| h.id == id)?;
        let removed = self.households.remove(index);
        self.persist();
        Some(removed)
    }

    /// Replace the whole list, as after a successful remote fetch.
    pub fn replace_all(&mut self, households: Vec<Household>) {
        self.households = households.into_iter().map(ensure_derived_fields).collect();
        self.persist();
    }

    /// Write the list to local storage. Failures are logged.
    pub fn persist(&self) {
        let result = serde_json::to_string(&self.households)
            .map_err(crate::error::ClientError::from)
            .and_then(|json| self.store.set(DATA_KEY, &json));
        if let Err(error) = result {
            tracing::warn!(%error, "unable to persist guest list");
        }
    }
}
