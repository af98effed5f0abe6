//! `/guest-list` request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::Household;
use crate::lenient;

/// A parsed `POST /guest-list` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncRequest {
    /// `{ households }`: full replacement. The index is rebuilt from exactly
    /// this set.
    Replace { households: Vec<Household> },
    /// `{ upserts, deletes }`: incremental change set.
    Incremental {
        upserts: Vec<Household>,
        deletes: Vec<String>,
    },
}

impl SyncRequest {
    /// Interpret a decoded JSON body.
    ///
    /// Returns `None` when the body carries none of `households`, `upserts`
    /// or `deletes` as an array. `households` wins when present. Entries that
    /// are not objects or lack an id, and blank delete ids, are dropped.
    #[must_use]
    pub fn from_value(body: &Value) -> Option<Self> {
        let field = |name: &str| body.get(name).filter(|v| v.is_array());

        if let Some(households) = field("households") {
            return Some(Self::Replace {
                households: with_ids(households),
            });
        }

        let upserts = field("upserts");
        let deletes = field("deletes");
        if upserts.is_none() && deletes.is_none() {
            return None;
        }

        Some(Self::Incremental {
            upserts: upserts.map(with_ids).unwrap_or_default(),
            deletes: deletes.map(lenient::ids_from_value).unwrap_or_default(),
        })
    }
}

fn with_ids(value: &Value) -> Vec<Household> {
    lenient::records_from_value::<Household>(value.clone())
        .into_iter()
        .filter(|h| !h.id.is_empty())
        .collect()
}

/// Client-side incremental change set, serialized as `{ upserts, deletes }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncBatch {
    pub upserts: Vec<Household>,
    pub deletes: Vec<String>,
}

impl SyncBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }
}

/// `POST /guest-list` success body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub saved: bool,
    pub upserted: usize,
    pub deleted: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrated: Option<bool>,
    /// Ids whose individual write or delete failed and were not applied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn households_shape_is_replace() {
        let req = SyncRequest::from_value(&json!({
            "households": [{"id": "a"}, {"envelopeName": "no id"}, 3],
            "upserts": [{"id": "ignored"}],
        }))
        .unwrap();
        let SyncRequest::Replace { households } = req else {
            panic!("expected replace");
        };
        assert_eq!(households.len(), 1);
        assert_eq!(households[0].id, "a");
    }

    #[test]
    fn upserts_and_deletes_shape_is_incremental() {
        let req = SyncRequest::from_value(&json!({
            "upserts": [{"id": "a"}],
            "deletes": ["b", "", 4],
        }))
        .unwrap();
        let SyncRequest::Incremental { upserts, deletes } = req else {
            panic!("expected incremental");
        };
        assert_eq!(upserts.len(), 1);
        assert_eq!(deletes, vec!["b".to_string()]);
    }

    #[test]
    fn deletes_alone_is_incremental() {
        let req = SyncRequest::from_value(&json!({"deletes": ["x"]})).unwrap();
        assert_eq!(
            req,
            SyncRequest::Incremental {
                upserts: vec![],
                deletes: vec!["x".into()],
            }
        );
    }

    #[test]
    fn unknown_shape_is_rejected() {
        assert!(SyncRequest::from_value(&json!({"upserts": "nope"})).is_none());
        assert!(SyncRequest::from_value(&json!([1, 2])).is_none());
        assert!(SyncRequest::from_value(&json!({})).is_none());
    }

    #[test]
    fn save_response_omits_optional_fields() {
        let body = serde_json::to_value(SaveResponse {
            saved: true,
            upserted: 2,
            deleted: 0,
            ..SaveResponse::default()
        })
        .unwrap();
        assert_eq!(body, json!({"saved": true, "upserted": 2, "deleted": 0}));
    }
}
