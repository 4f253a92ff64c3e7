/**
 * Membership & Role Registry Handlers
 *
 * - `GET /users/search?q=` - candidate lookup against the user directory.
 *   Queries shorter than the minimum prefix return an empty set without
 *   touching the directory; bursts from one user are debounced with the
 *   same cancellable-task pattern as persistence, at a shorter window, and
 *   a superseded query resolves to the empty set.
 * - `POST /rooms/{room_id}/participants` - admission by the room admin.
 *   Fails `Unauthorized` for anyone but the admin, `InvalidRole` for roles
 *   outside {edit, view}; otherwise upserts the grant, pushes the refreshed
 *   list into the live actor and broadcasts `participants-update`.
 *
 * Membership failures are always surfaced synchronously to the caller -
 * they gate write access, so swallowing them would be worse than noise.
 */
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::directory::client::DirectoryUser;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::Identity;
use crate::backend::rooms::db as rooms_db;
use crate::backend::server::config::MIN_SEARCH_PREFIX;
use crate::backend::server::state::AppState;
use crate::backend::membership::db;
use crate::shared::room::{Participant, Role};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Name prefix, case-insensitive
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<DirectoryUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddParticipantRequest {
    pub user_id: String,
    /// Role as a string; anything outside {edit, view} is rejected
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct AddParticipantResponse {
    pub participants: Vec<Participant>,
}

/// Search the user directory (GET /users/search)
pub async fn search_users(
    State(app_state): State<AppState>,
    Identity(user): Identity,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let prefix = query.q.trim().to_string();
    if prefix.len() < MIN_SEARCH_PREFIX {
        // Too short to bound result volume; skip the directory entirely.
        return Ok(Json(SearchResponse { results: Vec::new() }));
    }

    let directory = app_state.directory.clone();
    let pending = app_state
        .search_debounce
        .schedule(user.user_id.clone(), async move {
            directory.search(&prefix).await
        });

    match pending.await {
        Ok(results) => Ok(Json(SearchResponse { results: results? })),
        // A newer query from the same user superseded this one; stale
        // results would be discarded anyway.
        Err(join_err) if join_err.is_cancelled() => {
            Ok(Json(SearchResponse { results: Vec::new() }))
        }
        Err(join_err) => Err(ApiError::transient(format!(
            "search task failed: {}",
            join_err
        ))),
    }
}

/// Admit or re-role a participant (POST /rooms/{room_id}/participants)
pub async fn add_participant(
    State(app_state): State<AppState>,
    Identity(acting): Identity,
    Path(room_id): Path<Uuid>,
    Json(request): Json<AddParticipantRequest>,
) -> Result<Json<AddParticipantResponse>, ApiError> {
    let room = rooms_db::get_room(&app_state.pool, room_id)
        .await?
        .ok_or_else(|| ApiError::not_found("room"))?;

    if room.admin_id != acting.user_id {
        return Err(ApiError::unauthorized(
            "only the room admin can add participants",
        ));
    }

    let role: Role = request
        .role
        .parse()
        .map_err(|_| ApiError::invalid_role(request.role.as_str()))?;

    db::upsert_participant(&app_state.pool, room_id, &request.user_id, role).await?;
    let participants = db::list_participants(&app_state.pool, room_id).await?;

    tracing::info!(
        "[Membership] {} granted {} to {} in {}",
        acting.user_id,
        role,
        request.user_id,
        room_id
    );

    // Live connections learn about the change immediately.
    app_state
        .registry
        .membership_changed(room_id, participants.clone())
        .await;

    Ok(Json(AddParticipantResponse { participants }))
}
