/**
 * Edit Publish Path
 *
 * POST /rooms/{room_id}/code - the data leg of the live channel. The role
 * gate lives here, in the publish path, not only in any UI: a `view`
 * participant (or a non-participant) is rejected with `Forbidden` and the
 * live buffer stays untouched.
 *
 * An accepted edit is applied last-writer-wins, fanned out to every other
 * connection, and resets the flush timer for this session. Content equal to
 * the current buffer is acknowledged but neither broadcast nor scheduled -
 * that is what stops a persistence re-fetch from echoing forever.
 */
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::middleware::auth::Identity;
use crate::backend::rooms::PublishOutcome;
use crate::backend::server::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub code: String,
    /// The publisher's live connection id, issued by the `room-joined`
    /// event; used for echo suppression and the flush session key
    pub connection_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    /// "applied" or "unchanged"
    pub status: &'static str,
}

/// Publish an edit to a room (POST /rooms/{room_id}/code)
pub async fn publish_code(
    State(app_state): State<AppState>,
    Identity(user): Identity,
    Path(room_id): Path<Uuid>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, ApiError> {
    let handle = app_state.registry.open(room_id).await?;

    let outcome = handle
        .publish(request.connection_id, user.clone(), request.code)
        .await?;

    match outcome {
        PublishOutcome::Forbidden => Err(ApiError::forbidden(
            "edit role required to publish to this room",
        )),
        PublishOutcome::Unchanged => Ok(Json(PublishResponse {
            status: "unchanged",
        })),
        PublishOutcome::Applied => {
            // Edit accepted: reset this session's flush timer.
            app_state
                .scheduler
                .schedule_flush(handle, request.connection_id, user);
            Ok(Json(PublishResponse { status: "applied" }))
        }
    }
}
