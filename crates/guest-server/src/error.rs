//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use guest_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing S3 bucket configuration")]
    MissingBucket,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Expected {{ upserts, deletes }} or {{ households }}")]
    UnexpectedShape,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Unable to load guest list")]
    Load(#[source] StoreError),

    #[error("Unable to save guest list")]
    Save(#[source] StoreError),
}

/// JSON error body: `{ error, detail?, code? }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson | Self::UnexpectedShape => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Load(e) | Self::Save(e) if e.is_forbidden() => StatusCode::FORBIDDEN,
            Self::MissingBucket | Self::Load(_) | Self::Save(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        let (detail, code) = match self {
            Self::Load(e) | Self::Save(e) => (Some(e.to_string()), Some(e.code())),
            _ => (None, None),
        };
        ErrorBody {
            error: self.to_string(),
            detail,
            code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Load(error) | Self::Save(error) = &self {
            tracing::error!(code = error.code(), %error, "{self}");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_storage_error_is_403() {
        let err = ApiError::Load(StoreError::from(object_store::Error::PermissionDenied {
            path: "guest-list/index.json".into(),
            source: "denied".into(),
        }));
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["error"], "Unable to load guest list");
        assert_eq!(body["code"], "PermissionDenied");
    }

    #[test]
    fn other_storage_errors_are_500() {
        let err = ApiError::Save(StoreError::from(object_store::Error::Generic {
            store: "S3",
            source: "timeout".into(),
        }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().code, Some("Generic"));
    }

    #[test]
    fn client_errors_have_no_detail() {
        let body = serde_json::to_value(ApiError::UnexpectedShape.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": "Expected { upserts, deletes } or { households }"})
        );
        assert_eq!(ApiError::InvalidJson.status(), StatusCode::BAD_REQUEST);
    }
}
