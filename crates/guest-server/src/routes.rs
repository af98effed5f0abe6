//! `/guest-list` handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use guest_core::GuestListSnapshot;
use guest_core::wire::{SaveResponse, SyncRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn load_guest_list(
    State(state): State<AppState>,
) -> Result<Json<GuestListSnapshot>, ApiError> {
    let service = state.service()?;
    let snapshot = service.load().await.map_err(ApiError::Load)?;
    Ok(Json(snapshot))
}

pub async fn save_guest_list(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SaveResponse>, ApiError> {
    let service = state.service()?;
    let request = parse_request(&body)?;
    let response = service.save(request).await.map_err(ApiError::Save)?;
    Ok(Json(response))
}

pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (CONTENT_TYPE, "application/json"),
            (ACCESS_CONTROL_ALLOW_METHODS, "GET,POST,OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Applied to every response from the guest-list routes.
pub async fn allow_any_origin(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

/// An empty body reads as `{}`.
fn parse_request(body: &[u8]) -> Result<SyncRequest, ApiError> {
    let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(body).map_err(|error| {
            tracing::warn!(%error, "guest-list payload parse error");
            ApiError::InvalidJson
        })?
    };
    SyncRequest::from_value(&payload).ok_or(ApiError::UnexpectedShape)
}
