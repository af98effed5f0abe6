//! Typed household records over an [`ObjectBackend`].

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use guest_config::S3Config;
use guest_core::{GuestListSnapshot, Household, HouseholdIndex};

use crate::backend::{ObjectBackend, ObjectStoreBackend};
use crate::error::StoreError;
use crate::fanout::map_limit;
use crate::layout::StoreLayout;

/// Default number of concurrent per-household requests.
pub const DEFAULT_FANOUT: usize = 8;

/// Which ids of a batch were applied and which failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub applied: Vec<String>,
    pub failed: Vec<String>,
}

/// Household, index and legacy blob access.
#[derive(Debug, Clone)]
pub struct HouseholdStore {
    backend: Arc<dyn ObjectBackend>,
    layout: StoreLayout,
    fanout: usize,
}

impl HouseholdStore {
    pub fn new(backend: Arc<dyn ObjectBackend>, layout: StoreLayout) -> Self {
        Self {
            backend,
            layout,
            fanout: DEFAULT_FANOUT,
        }
    }

    /// S3-backed store using the configured bucket and prefix.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the S3 client cannot be built.
    pub fn from_config(config: &S3Config, fanout: usize) -> Result<Self, StoreError> {
        let backend = ObjectStoreBackend::from_config(config)?;
        Ok(Self::new(
            Arc::new(backend),
            StoreLayout::new(config.key_prefix_with_slash()),
        )
        .with_fanout(fanout))
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(ObjectStoreBackend::in_memory()),
            StoreLayout::default(),
        )
    }

    #[must_use]
    pub fn with_fanout(mut self, fanout: usize) -> Self {
        self.fanout = fanout.max(1);
        self
    }

    #[must_use]
    pub const fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    #[must_use]
    pub const fn fanout(&self) -> usize {
        self.fanout
    }

    async fn read_json(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let Some(body) = self.backend.get(key).await? else {
            return Ok(None);
        };
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let value: Value = serde_json::from_slice(&body).map_err(|source| StoreError::Malformed {
            key: key.to_string(),
            source,
        })?;
        Ok((!value.is_null()).then_some(value))
    }

    async fn write_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let body = serde_json::to_vec(value)?;
        self.backend.put(key, body).await
    }

    fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, StoreError> {
        serde_json::from_value(value).map_err(|source| StoreError::Malformed {
            key: key.to_string(),
            source,
        })
    }

    /// Read the index. `None` when it is missing or has no id array.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on backend failure or malformed JSON.
    pub async fn get_index(&self) -> Result<Option<HouseholdIndex>, StoreError> {
        let key = self.layout.index_key();
        let Some(value) = self.read_json(&key).await? else {
            return Ok(None);
        };
        if !value.get("householdIds").is_some_and(Value::is_array) {
            return Ok(None);
        }
        Self::decode(&key, value).map(Some)
    }

    /// Overwrite the index.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn put_index(&self, household_ids: Vec<String>, updated_at: &str) -> Result<(), StoreError> {
        let index = HouseholdIndex {
            household_ids,
            updated_at: Some(updated_at.to_string()),
        };
        self.write_json(&self.layout.index_key(), &index).await
    }

    /// Read the legacy single-blob list, if one was ever written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on backend failure or malformed JSON.
    pub async fn get_legacy(&self) -> Result<Option<GuestListSnapshot>, StoreError> {
        let key = self.layout.legacy_key();
        match self.read_json(&key).await? {
            Some(value) if value.is_object() => Self::decode(&key, value).map(Some),
            _ => Ok(None),
        }
    }

    /// Ids of every household object present, found by listing the prefix.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if listing fails.
    pub async fn list_household_ids(&self) -> Result<Vec<String>, StoreError> {
        let keys = self.backend.list(&self.layout.households_prefix()).await?;
        Ok(keys
            .iter()
            .filter_map(|key| self.layout.household_id_from_key(key))
            .collect())
    }

    /// Read one household. Missing and non-object bodies are `None`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on backend failure or malformed JSON.
    pub async fn get_household(&self, id: &str) -> Result<Option<Household>, StoreError> {
        let key = self.layout.household_key(id);
        match self.read_json(&key).await? {
            Some(value) if value.is_object() => Self::decode(&key, value).map(Some),
            _ => Ok(None),
        }
    }

    /// Write one household to its own object.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn put_household(&self, household: &Household) -> Result<(), StoreError> {
        self.write_json(&self.layout.household_key(&household.id), household)
            .await
    }

    /// Delete one household object. Deleting a missing object succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the delete fails.
    pub async fn delete_household(&self, id: &str) -> Result<(), StoreError> {
        self.backend.delete(&self.layout.household_key(id)).await
    }

    /// Read many households with bounded concurrency, in `ids` order.
    ///
    /// Missing records are skipped. Individual failures are logged and
    /// skipped so one bad object cannot fail the whole load.
    pub async fn get_households(&self, ids: &[String]) -> Vec<Household> {
        let results = map_limit(ids.to_vec(), self.fanout, |id| async move {
            let result = self.get_household(&id).await;
            (id, result)
        })
        .await;

        results
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(household) => household,
                Err(error) => {
                    tracing::warn!(household_id = %id, code = error.code(), %error, "failed to read household");
                    None
                }
            })
            .collect()
    }

    /// Write many households with bounded concurrency.
    pub async fn put_households(&self, households: &[Household]) -> BatchOutcome {
        let results = map_limit((0..households.len()).collect(), self.fanout, |index: usize| {
            let household = &households[index];
            async move { (household.id.clone(), self.put_household(household).await) }
        })
        .await;
        collect_outcome(results, "write")
    }

    /// Delete many households with bounded concurrency.
    pub async fn delete_households(&self, ids: &[String]) -> BatchOutcome {
        let results = map_limit(ids.to_vec(), self.fanout, |id| async move {
            let result = self.delete_household(&id).await;
            (id, result)
        })
        .await;
        collect_outcome(results, "delete")
    }
}

fn collect_outcome(results: Vec<(String, Result<(), StoreError>)>, action: &str) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for (id, result) in results {
        match result {
            Ok(()) => outcome.applied.push(id),
            Err(error) => {
                tracing::warn!(household_id = %id, code = error.code(), %error, "failed to {action} household");
                outcome.failed.push(id);
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use guest_core::seed::seed_households;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn household_round_trip() {
        let store = HouseholdStore::in_memory();
        let household = seed_households().remove(0);
        store.put_household(&household).await.unwrap();
        assert_eq!(
            store.get_household(&household.id).await.unwrap(),
            Some(household)
        );
    }

    #[tokio::test]
    async fn missing_household_is_none() {
        let store = HouseholdStore::in_memory();
        assert_eq!(store.get_household("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn index_without_id_array_is_absent() {
        let store = HouseholdStore::in_memory();
        assert_eq!(store.get_index().await.unwrap(), None);

        store
            .write_json(&store.layout.index_key(), &serde_json::json!({"householdIds": "x"}))
            .await
            .unwrap();
        assert_eq!(store.get_index().await.unwrap(), None);

        store.put_index(vec![], "2026-01-01T00:00:00.000Z").await.unwrap();
        let index = store.get_index().await.unwrap().unwrap();
        assert!(index.household_ids.is_empty());
    }

    #[tokio::test]
    async fn list_returns_decoded_ids() {
        let store = HouseholdStore::in_memory();
        let mut households = seed_households();
        households[0].id = "a/b".into();
        store.put_households(&households).await;
        store.put_index(vec![], "t").await.unwrap();

        let mut ids = store.list_household_ids().await.unwrap();
        ids.sort();
        let mut expected: Vec<String> = households.iter().map(|h| h.id.clone()).collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn get_households_keeps_order_and_skips_missing() {
        let store = HouseholdStore::in_memory().with_fanout(2);
        let households = seed_households();
        store.put_households(&households).await;

        let ids = vec![
            households[2].id.clone(),
            "missing".to_string(),
            households[0].id.clone(),
        ];
        let loaded = store.get_households(&ids).await;
        assert_eq!(loaded, vec![households[2].clone(), households[0].clone()]);
    }

    #[tokio::test]
    async fn malformed_household_is_skipped_in_batch() {
        let store = HouseholdStore::in_memory();
        let good = seed_households().remove(0);
        store.put_household(&good).await.unwrap();
        store
            .backend
            .put(&store.layout.household_key("broken"), b"{not json".to_vec())
            .await
            .unwrap();

        let err = store.get_household("broken").await.unwrap_err();
        assert_eq!(err.code(), "MalformedObject");

        let loaded = store
            .get_households(&["broken".to_string(), good.id.clone()])
            .await;
        assert_eq!(loaded, vec![good]);
    }
}
