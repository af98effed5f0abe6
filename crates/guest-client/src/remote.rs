//! Transport to the `/guest-list` sync endpoint.

use std::future::Future;

use serde_json::Value;

use guest_core::wire::{SaveResponse, SyncBatch};
use guest_core::{GuestListSnapshot, Household};

use crate::error::ClientError;

/// The two calls the client makes against the sync endpoint.
pub trait SyncApi {
    /// `GET` the full list.
    fn fetch(&self) -> impl Future<Output = Result<GuestListSnapshot, ClientError>> + Send;

    /// `POST` an incremental change set.
    fn save(
        &self,
        batch: &SyncBatch,
    ) -> impl Future<Output = Result<SaveResponse, ClientError>> + Send;
}

/// [`SyncApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSyncClient {
    http: reqwest::Client,
    url: String,
}

impl HttpSyncClient {
    /// `base_url` is the origin serving `/guest-list`, e.g. `http://localhost:8888`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            url: format!("{}/guest-list", base_url.trim_end_matches('/')),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Map a non-success status to [`ClientError::Api`].
///
/// # Errors
///
/// Returns `ClientError::Api` with the status and body text.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if !resp.status().is_success() {
        return Err(ClientError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Validate a `GET` body. `households` must be an array.
///
/// # Errors
///
/// Returns `ClientError::InvalidResponse` when `households` is missing or
/// not an array.
pub fn snapshot_from_value(mut body: Value) -> Result<GuestListSnapshot, ClientError> {
    let households = match body.get_mut("households").map(Value::take) {
        Some(list @ Value::Array(_)) => Household::list_from_value(list),
        _ => {
            return Err(ClientError::InvalidResponse(
                "households is not an array".into(),
            ));
        }
    };
    let updated_at = body
        .get("updatedAt")
        .and_then(Value::as_str)
        .map(String::from);
    Ok(GuestListSnapshot {
        households,
        updated_at,
    })
}

impl SyncApi for HttpSyncClient {
    async fn fetch(&self) -> Result<GuestListSnapshot, ClientError> {
        let resp = check_response(self.http.get(&self.url).send().await?).await?;
        let body: Value = resp.json().await?;
        snapshot_from_value(body)
    }

    async fn save(&self, batch: &SyncBatch) -> Result<SaveResponse, ClientError> {
        let resp = check_response(self.http.post(&self.url).json(batch).send().await?).await?;
        Ok(resp.json().await?)
    }
}
