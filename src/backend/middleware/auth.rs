/**
 * Identity Extraction
 *
 * The identity provider is an external collaborator: requests arrive with
 * gateway-verified `x-user-id` and `x-user-name` headers, and this module
 * only consumes them. The extracted pair is used verbatim for author
 * attribution in edit events and flushes; nothing here re-derives or
 * re-validates identity.
 *
 * The session context is explicit - handlers receive `Identity` as an
 * extractor argument instead of reading ambient global state.
 */
use axum::{
    extract::FromRequestParts,
    http::{header::HeaderMap, request::Parts},
};

use crate::backend::error::ApiError;
use crate::shared::UserIdentity;

/// Fallback display name when the gateway forwards none
const ANONYMOUS: &str = "Anonymous";

/// Axum extractor for the verified identity on a request
///
/// Rejects with `401 Unauthorized` when the user id header is missing.
#[derive(Clone, Debug)]
pub struct Identity(pub UserIdentity);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers)
    }
}

fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, ApiError> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            tracing::warn!("[Auth] request without verified identity");
            ApiError::unauthorized("missing verified identity")
        })?;

    let display_name = headers
        .get("x-user-name")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(ANONYMOUS);

    Ok(Identity(UserIdentity {
        user_id: user_id.to_string(),
        display_name: display_name.to_string(),
    }))
}
