//! Database operations for rooms
//!
//! Room metadata CRUD. Participant grants live in `membership::db`; the
//! persisted buffer is owned exclusively by `persist::store`.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::room::{Room, RoomSummary};

/// Create a new room owned by `admin_id`
pub async fn create_room(
    pool: &SqlitePool,
    room_name: &str,
    admin_id: &str,
    language: &str,
) -> Result<Room, sqlx::Error> {
    let room_id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO rooms (room_id, room_name, admin_id, language, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(room_id)
    .bind(room_name)
    .bind(admin_id)
    .bind(language)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Room {
        room_id,
        room_name: room_name.to_string(),
        admin_id: admin_id.to_string(),
        language: language.to_string(),
        created_at: now,
    })
}

/// Get a room by id
pub async fn get_room(pool: &SqlitePool, room_id: Uuid) -> Result<Option<Room>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT room_id, room_name, admin_id, language, created_at
        FROM rooms
        WHERE room_id = $1
        "#,
    )
    .bind(room_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| Room {
        room_id: r.get("room_id"),
        room_name: r.get("room_name"),
        admin_id: r.get("admin_id"),
        language: r.get("language"),
        created_at: r.get("created_at"),
    }))
}

/// List rooms the user participates in, newest first
pub async fn list_rooms_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<RoomSummary>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT r.room_id, r.room_name, r.language, r.created_at
        FROM rooms r
        INNER JOIN room_participants p ON r.room_id = p.room_id
        WHERE p.user_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| RoomSummary {
            room_id: r.get("room_id"),
            room_name: r.get("room_name"),
            language: r.get("language"),
            created_at: r.get("created_at"),
        })
        .collect())
}
