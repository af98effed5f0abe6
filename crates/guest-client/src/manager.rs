//! The guest list as the editing screen sees it.
//!
//! Every mutation updates the cache, writes it through to local storage and
//! marks the affected household dirty. Remote sync happens on [`GuestListManager::tick`]
//! once the edits go quiet.
//!
//! `tick`, `flush` and `refresh` hold the manager for the whole request. A
//! host that keeps editing while a request is out drives the split form:
//!
//! ```text
//! let pending = manager.begin_sync()?;     // snapshot dirty ids, build batch
//! let api = manager.api_handle();
//! let result = api.save(&pending.batch).await;
//! manager.finish_sync(&pending, &result);  // ids edited meanwhile stay dirty
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use guest_core::entities::AddressField;
use guest_core::seed::{blank_household, new_guest};
use guest_core::stats::GuestListStats;
use guest_core::updates::{GuestUpdate, HouseholdUpdate};
use guest_core::wire::SaveResponse;
use guest_core::{CoreError, GuestListSnapshot, GuestType, Household};

use crate::cache::HouseholdCache;
use crate::clock::Clock;
use crate::dirty::DirtyKind;
use crate::error::ClientError;
use crate::local_store::LocalStore;
use crate::remote::SyncApi;
use crate::sync_queue::{PendingFlush, SyncQueue, SyncStatus};

pub struct GuestListManager<A> {
    api: Arc<A>,
    cache: HouseholdCache,
    queue: SyncQueue,
    expanded: HashSet<String>,
}

impl<A: SyncApi> GuestListManager<A> {
    /// Load the local cache (or seed data) with every household expanded.
    pub fn new(api: A, store: Arc<dyn LocalStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_queue(api, store, SyncQueue::new(clock))
    }

    pub fn with_queue(api: A, store: Arc<dyn LocalStore>, queue: SyncQueue) -> Self {
        let cache = HouseholdCache::load(store);
        let expanded = cache.ids().into_iter().collect();
        Self {
            api: Arc::new(api),
            cache,
            queue,
            expanded,
        }
    }

    #[must_use]
    pub fn households(&self) -> &[Household] {
        self.cache.households()
    }

    #[must_use]
    pub fn household(&self, id: &str) -> Option<&Household> {
        self.cache.get(id)
    }

    #[must_use]
    pub fn stats(&self) -> GuestListStats {
        GuestListStats::compute(self.cache.households())
    }

    #[must_use]
    pub const fn queue(&self) -> &SyncQueue {
        &self.queue
    }

    #[must_use]
    pub const fn status(&self) -> SyncStatus {
        self.queue.status()
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Shared handle for issuing requests without borrowing the manager.
    #[must_use]
    pub fn api_handle(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    // -----------------------------------------------------------------------
    // Remote
    // -----------------------------------------------------------------------

    /// Replace the local list with the remote one and expand every household.
    ///
    /// # Errors
    ///
    /// Returns the transport or response error. The local list is left as is
    /// and the status becomes `Offline`.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.begin_refresh();
        let api = self.api_handle();
        let result = api.fetch().await;
        self.finish_refresh(result)
    }

    /// Mark the list as loading. Pair with [`Self::finish_refresh`].
    pub fn begin_refresh(&mut self) {
        self.queue.set_status(SyncStatus::Loading);
    }

    /// Apply the result of a fetch started with [`Self::begin_refresh`].
    ///
    /// A successful fetch replaces the list, except that households with
    /// unsent local edits keep their local copy and unsent deletes stay
    /// deleted. Edits made while the fetch was out are therefore kept.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after logging it; the local list is kept.
    pub fn finish_refresh(
        &mut self,
        result: Result<GuestListSnapshot, ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok(GuestListSnapshot { households, .. }) => {
                let merged = self.keep_unsent_edits(households);
                self.cache.replace_all(merged);
                self.expanded = self.cache.ids().into_iter().collect();
                self.queue.set_status(SyncStatus::Idle);
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "unable to load guest list");
                self.queue.set_status(SyncStatus::Offline);
                Err(error)
            }
        }
    }

    fn keep_unsent_edits(&self, remote: Vec<Household>) -> Vec<Household> {
        let dirty = self.queue.dirty();
        let mut merged: Vec<Household> = remote
            .into_iter()
            .filter(|h| !dirty.contains(&h.id, DirtyKind::Delete))
            .map(|h| {
                if dirty.contains(&h.id, DirtyKind::Upsert) {
                    self.cache.get(&h.id).cloned().unwrap_or(h)
                } else {
                    h
                }
            })
            .collect();
        for local in self.cache.households() {
            if dirty.contains(&local.id, DirtyKind::Upsert)
                && !merged.iter().any(|h| h.id == local.id)
            {
                merged.push(local.clone());
            }
        }
        merged
    }

    /// Whether the edit debounce has elapsed and no flush is in flight.
    #[must_use]
    pub fn is_sync_due(&self) -> bool {
        self.queue.is_due()
    }

    /// Snapshot the dirty ids and build the request from the current records.
    ///
    /// Returns `None` while a flush is in flight or nothing is dirty.
    pub fn begin_sync(&mut self) -> Option<PendingFlush> {
        self.queue.begin_flush(self.cache.households())
    }

    /// Settle a flush started with [`Self::begin_sync`].
    pub fn finish_sync(
        &mut self,
        pending: &PendingFlush,
        result: &Result<SaveResponse, ClientError>,
    ) {
        self.queue.finish_flush(pending, result);
    }

    /// Send pending edits if the debounce has elapsed.
    pub async fn tick(&mut self) -> Option<Result<SaveResponse, ClientError>> {
        if !self.is_sync_due() {
            return None;
        }
        self.flush().await
    }

    /// Send pending edits now.
    pub async fn flush(&mut self) -> Option<Result<SaveResponse, ClientError>> {
        let pending = self.begin_sync()?;
        let api = self.api_handle();
        let result = api.save(&pending.batch).await;
        self.finish_sync(&pending, &result);
        Some(result)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// # Errors
    ///
    /// `CoreError::HouseholdNotFound` when `id` is unknown.
    pub fn update_household(&mut self, id: &str, update: HouseholdUpdate) -> Result<(), ClientError> {
        self.edit(id, |h| update.apply(h))
    }

    /// # Errors
    ///
    /// `CoreError::HouseholdNotFound` when `id` is unknown.
    pub fn update_address_field(
        &mut self,
        id: &str,
        field: AddressField,
        value: impl Into<String>,
    ) -> Result<(), ClientError> {
        let value = value.into();
        self.edit(id, |mut h| {
            h.address.set(field, value);
            h
        })
    }

    /// # Errors
    ///
    /// `CoreError::HouseholdNotFound` or `CoreError::GuestNotFound`.
    pub fn update_guest(
        &mut self,
        household_id: &str,
        guest_id: &str,
        update: GuestUpdate,
    ) -> Result<(), ClientError> {
        self.require_guest(household_id, guest_id)?;
        self.edit(household_id, |h| update.apply(h, guest_id))
    }

    /// Append a guest with the defaults for `guest_type`. Returns its id.
    ///
    /// # Errors
    ///
    /// `CoreError::HouseholdNotFound` when `household_id` is unknown.
    pub fn add_guest(&mut self, household_id: &str, guest_type: GuestType) -> Result<String, ClientError> {
        let guest = new_guest(guest_type);
        let guest_id = guest.id.clone();
        self.edit(household_id, |mut h| {
            h.guests.push(guest);
            h.normalize();
            h
        })?;
        Ok(guest_id)
    }

    /// # Errors
    ///
    /// `CoreError::LastGuest` when it is the only guest left, or a not-found
    /// error.
    pub fn remove_guest(&mut self, household_id: &str, guest_id: &str) -> Result<(), ClientError> {
        let household = self.require_guest(household_id, guest_id)?;
        if household.guests.len() == 1 {
            return Err(CoreError::LastGuest(household_id.to_string()).into());
        }
        self.edit(household_id, |mut h| {
            h.guests.retain(|g| g.id != guest_id);
            h
        })
    }

    /// Append a blank household, expanded. Returns its id.
    pub fn add_household(&mut self) -> String {
        let household = blank_household();
        let id = household.id.clone();
        self.cache.push(household);
        self.expanded.insert(id.clone());
        self.queue.mark(&id, DirtyKind::Upsert);
        id
    }

    /// # Errors
    ///
    /// `CoreError::HouseholdNotFound` when `id` is unknown.
    pub fn remove_household(&mut self, id: &str) -> Result<Household, ClientError> {
        let removed = self
            .cache
            .remove(id)
            .ok_or_else(|| CoreError::HouseholdNotFound(id.to_string()))?;
        self.expanded.remove(id);
        self.queue.mark(id, DirtyKind::Delete);
        Ok(removed)
    }

    fn edit(&mut self, id: &str, f: impl FnOnce(Household) -> Household) -> Result<(), ClientError> {
        if !self.cache.update(id, f) {
            return Err(CoreError::HouseholdNotFound(id.to_string()).into());
        }
        self.queue.mark(id, DirtyKind::Upsert);
        Ok(())
    }

    fn require_guest(&self, household_id: &str, guest_id: &str) -> Result<&Household, ClientError> {
        let household = self
            .cache
            .get(household_id)
            .ok_or_else(|| CoreError::HouseholdNotFound(household_id.to_string()))?;
        if household.guest(guest_id).is_none() {
            return Err(CoreError::GuestNotFound {
                household_id: household_id.to_string(),
                guest_id: guest_id.to_string(),
            }
            .into());
        }
        Ok(household)
    }

    // -----------------------------------------------------------------------
    // Expansion
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Returns whether the household is now expanded.
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn set_expanded(&mut self, expanded: HashSet<String>) {
        self.expanded = expanded;
    }

    pub fn expand_all(&mut self) {
        self.expanded = self.cache.ids().into_iter().collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }
}
