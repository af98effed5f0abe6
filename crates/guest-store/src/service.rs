//! Load and save operations behind `/guest-list`.

use chrono::{SecondsFormat, Utc};

use guest_core::derive::ensure_derived_fields;
use guest_core::wire::{SaveResponse, SyncRequest};
use guest_core::{GuestListSnapshot, Household, HouseholdIndex};

use crate::error::StoreError;
use crate::store::HouseholdStore;

/// Current time as an ISO-8601 UTC timestamp with millisecond precision.
#[must_use]
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Guest list reads and writes with index reconciliation.
#[derive(Debug, Clone)]
pub struct GuestListService {
    store: HouseholdStore,
}

impl GuestListService {
    pub const fn new(store: HouseholdStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &HouseholdStore {
        &self.store
    }

    /// Assemble the full guest list.
    ///
    /// With an index, households are fetched in index order and unreadable
    /// ones are dropped. Without one, the legacy blob is returned as stored,
    /// or an empty list.
    ///
    /// An index that exists but lists no ids counts as an index: the result
    /// is empty and the legacy blob is not read. Earlier deployments fell
    /// back to the legacy blob in that case, which resurrected every
    /// household after the last one was deleted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the index or legacy blob cannot be read.
    pub async fn load(&self) -> Result<GuestListSnapshot, StoreError> {
        if let Some(index) = self.store.get_index().await? {
            let households = self.store.get_households(&index.household_ids).await;
            tracing::debug!(
                indexed = index.household_ids.len(),
                loaded = households.len(),
                "loaded guest list from index"
            );
            return Ok(GuestListSnapshot {
                households,
                updated_at: index.updated_at,
            });
        }

        if let Some(legacy) = self.store.get_legacy().await? {
            tracing::debug!(households = legacy.households.len(), "loaded legacy guest list");
            return Ok(legacy);
        }

        Ok(GuestListSnapshot::empty())
    }

    /// Dispatch a parsed `POST` body.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the index cannot be read or written.
    pub async fn save(&self, request: SyncRequest) -> Result<SaveResponse, StoreError> {
        match request {
            SyncRequest::Replace { households } => self.replace_all(households).await,
            SyncRequest::Incremental { upserts, deletes } => {
                self.apply_batch(upserts, deletes).await
            }
        }
    }

    /// Write every household and rebuild the index from exactly that set.
    ///
    /// Objects for ids not in the set are left in place; they are simply no
    /// longer indexed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the index write fails.
    pub async fn replace_all(&self, households: Vec<Household>) -> Result<SaveResponse, StoreError> {
        let households = canonical(households);
        let outcome = self.store.put_households(&households).await;
        let ids = HouseholdIndex::reconcile(
            households.into_iter().map(|h| h.id),
            std::iter::empty::<&str>(),
            std::iter::empty::<&str>(),
        );

        let updated_at = timestamp();
        self.store.put_index(ids, &updated_at).await?;
        tracing::info!(
            upserted = outcome.applied.len(),
            failed = outcome.failed.len(),
            "replaced guest list"
        );

        Ok(SaveResponse {
            saved: true,
            upserted: outcome.applied.len(),
            deleted: 0,
            updated_at: Some(updated_at),
            migrated: Some(true),
            failed: outcome.failed,
        })
    }

    /// Apply an incremental change set and reconcile the index.
    ///
    /// Only writes and deletes that succeeded change the index. Ids that
    /// failed are reported in `failed` so the client keeps them dirty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the index cannot be read or written.
    pub async fn apply_batch(
        &self,
        upserts: Vec<Household>,
        deletes: Vec<String>,
    ) -> Result<SaveResponse, StoreError> {
        let current = match self.store.get_index().await? {
            Some(index) => index.household_ids,
            None => self.recover_ids().await?,
        };

        let upserts = canonical(upserts);
        let written = self.store.put_households(&upserts).await;
        let removed = self.store.delete_households(&deletes).await;

        let ids = HouseholdIndex::reconcile(
            current,
            written.applied.iter().map(String::as_str),
            removed.applied.iter().map(String::as_str),
        );

        let updated_at = timestamp();
        self.store.put_index(ids, &updated_at).await?;
        tracing::info!(
            upserted = written.applied.len(),
            deleted = removed.applied.len(),
            failed = written.failed.len() + removed.failed.len(),
            "applied guest list changes"
        );

        let mut failed = written.failed;
        failed.extend(removed.failed);
        Ok(SaveResponse {
            saved: true,
            upserted: written.applied.len(),
            deleted: removed.applied.len(),
            updated_at: Some(updated_at),
            migrated: None,
            failed,
        })
    }

    /// Rebuild the id set when no index exists yet.
    ///
    /// A legacy blob is migrated into per-household objects and its ids
    /// become the index. Otherwise the households directory is listed.
    async fn recover_ids(&self) -> Result<Vec<String>, StoreError> {
        if let Some(legacy) = self.store.get_legacy().await? {
            let households = canonical(legacy.households);
            if !households.is_empty() {
                let outcome = self.store.put_households(&households).await;
                tracing::info!(
                    migrated = outcome.applied.len(),
                    failed = outcome.failed.len(),
                    "migrated legacy guest list"
                );
                return Ok(households.into_iter().map(|h| h.id).collect());
            }
        }

        let ids = self.store.list_household_ids().await?;
        tracing::info!(households = ids.len(), "rebuilt index from listing");
        Ok(ids)
    }
}

/// Drop id-less records and normalize the rest.
fn canonical(households: Vec<Household>) -> Vec<Household> {
    households
        .into_iter()
        .filter(|h| !h.id.is_empty())
        .map(ensure_derived_fields)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_iso_utc_millis() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000Z".len());
    }
}
