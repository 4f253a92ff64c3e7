/**
 * Room Directory Handlers
 *
 * Room lifecycle endpoints:
 * - `POST /rooms` - create a room; the creator becomes the admin and an
 *   implicit `edit` participant
 * - `GET /rooms` - rooms the caller participates in
 * - `GET /rooms/{room_id}` - metadata plus the participant list with
 *   display names resolved through the user directory
 * - `GET /rooms/{room_id}/buffer` - the authoritative buffer, seeded by
 *   the one durable read at room open
 */
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::membership;
use crate::backend::middleware::auth::Identity;
use crate::backend::rooms::db;
use crate::backend::server::state::AppState;
use crate::shared::room::{ParticipantInfo, Role, Room, RoomSummary};
use crate::shared::SharedError;

/// Default execution language when a room does not declare one
const DEFAULT_LANGUAGE: &str = "javascript";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_name: String,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ListRoomsResponse {
    pub rooms: Vec<RoomSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailsResponse {
    #[serde(flatten)]
    pub room: Room,
    pub participants: Vec<ParticipantInfo>,
}

#[derive(Debug, Serialize)]
pub struct BufferResponse {
    pub content: String,
}

/// Create a room (POST /rooms)
pub async fn create_room(
    State(app_state): State<AppState>,
    Identity(user): Identity,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), ApiError> {
    let room_name = request.room_name.trim();
    if room_name.is_empty() {
        return Err(SharedError::validation("roomName", "must not be empty").into());
    }
    let language = request
        .language
        .as_deref()
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string();

    let room = db::create_room(&app_state.pool, room_name, &user.user_id, &language).await?;
    // The admin is an implicit participant with the edit role.
    membership::db::upsert_participant(&app_state.pool, room.room_id, &user.user_id, Role::Edit)
        .await?;

    tracing::info!(
        "[Rooms] created {} ({:?}) for admin {}",
        room.room_id,
        room.room_name,
        user.user_id
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateRoomResponse {
            room_id: room.room_id,
        }),
    ))
}

/// List rooms the caller participates in (GET /rooms)
pub async fn list_rooms(
    State(app_state): State<AppState>,
    Identity(user): Identity,
) -> Result<Json<ListRoomsResponse>, ApiError> {
    let rooms = db::list_rooms_for_user(&app_state.pool, &user.user_id).await?;
    Ok(Json(ListRoomsResponse { rooms }))
}

/// Room metadata plus participants (GET /rooms/{room_id})
///
/// Display names are resolved through the user directory in parallel;
/// lookup failures degrade to no name, never to an error.
pub async fn get_room(
    State(app_state): State<AppState>,
    Identity(_user): Identity,
    Path(room_id): Path<Uuid>,
) -> Result<Json<RoomDetailsResponse>, ApiError> {
    let room = db::get_room(&app_state.pool, room_id)
        .await?
        .ok_or_else(|| ApiError::not_found("room"))?;
    let participants = membership::db::list_participants(&app_state.pool, room_id).await?;

    // Live presence, when the room actor happens to be open.
    let live = match app_state.registry.peek(room_id).await {
        Some(handle) => handle.snapshot().await.unwrap_or_default(),
        None => Vec::new(),
    };

    let directory = app_state.directory.clone();
    let infos = join_all(participants.into_iter().map(|p| {
        let directory = directory.clone();
        let live_entry = live.iter().find(|l| l.user_id == p.user_id).cloned();
        async move {
            let display_name = match directory.display_name(&p.user_id).await {
                Some(name) => Some(name),
                None => live_entry.as_ref().and_then(|l| l.display_name.clone()),
            };
            ParticipantInfo {
                user_id: p.user_id,
                display_name,
                role: p.role,
                online: live_entry.map(|l| l.online).unwrap_or(false),
            }
        }
    }))
    .await;

    Ok(Json(RoomDetailsResponse {
        room,
        participants: infos,
    }))
}

/// Authoritative buffer content (GET /rooms/{room_id}/buffer)
///
/// Opening the room performs the one durable read; after that this serves
/// the live copy, which a reconnecting client must re-fetch instead of
/// trusting whatever it held before the drop.
pub async fn get_buffer(
    State(app_state): State<AppState>,
    Identity(_user): Identity,
    Path(room_id): Path<Uuid>,
) -> Result<Json<BufferResponse>, ApiError> {
    let handle = app_state.registry.open(room_id).await?;
    let content = handle.buffer().await?;
    Ok(Json(BufferResponse { content }))
}
