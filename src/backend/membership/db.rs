//! Database operations for participant grants
//!
//! One role grant per (room, user), enforced by the primary key; the upsert
//! makes re-adding a participant overwrite their role instead of erroring.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::room::{Participant, Role};

/// Upsert the (room, user) -> role mapping
pub async fn upsert_participant(
    pool: &SqlitePool,
    room_id: Uuid,
    user_id: &str,
    role: Role,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO room_participants (room_id, user_id, role, added_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (room_id, user_id) DO UPDATE
        SET role = excluded.role
        "#,
    )
    .bind(room_id)
    .bind(user_id)
    .bind(role.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// All participants of a room, ordered by user id
pub async fn list_participants(
    pool: &SqlitePool,
    room_id: Uuid,
) -> Result<Vec<Participant>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, role
        FROM room_participants
        WHERE room_id = $1
        ORDER BY user_id ASC
        "#,
    )
    .bind(room_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Participant {
            user_id: row.get("user_id"),
            role: row
                .get::<String, _>("role")
                .parse()
                .unwrap_or(Role::View),
        })
        .collect())
}

/// Role of one user in a room, if granted
pub async fn get_role(
    pool: &SqlitePool,
    room_id: Uuid,
    user_id: &str,
) -> Result<Option<Role>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT role
        FROM room_participants
        WHERE room_id = $1 AND user_id = $2
        "#,
    )
    .bind(room_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.get::<String, _>("role").parse().unwrap_or(Role::View)))
}
