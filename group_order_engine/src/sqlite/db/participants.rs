use chrono::Utc;
use cn_common::Pence;
use log::debug;
use sqlx::{types::Json, SqliteConnection};

use crate::{
    db_types::{MealSelection, NewParticipant, Participant, SelectionStatus, UserId},
    helpers::{color_tag_for_join_index, derive_initials},
    traits::GroupOrderError,
};

/// Appends a participant to the lobby's ledger. Initials and colour tag are derived here from the display name and
/// the join order. The `(lobby_id, user_id)` unique constraint is the backstop against double joins.
pub async fn insert_participant(
    lobby_id: i64,
    participant: NewParticipant,
    conn: &mut SqliteConnection,
) -> Result<Participant, GroupOrderError> {
    let join_index = count_participants(lobby_id, &mut *conn).await? as usize;
    let initials = derive_initials(&participant.display_name);
    let color_tag = color_tag_for_join_index(join_index);
    let row: Participant = sqlx::query_as(
        r#"
            INSERT INTO participants (
                lobby_id,
                user_id,
                display_name,
                initials,
                color_tag,
                budget_contribution,
                selections,
                selection_status,
                joined_at
            ) VALUES ($1, $2, $3, $4, $5, $6, '[]', 'NotReady', $7)
            RETURNING *;
        "#,
    )
    .bind(lobby_id)
    .bind(&participant.user_id)
    .bind(&participant.display_name)
    .bind(initials)
    .bind(color_tag)
    .bind(participant.budget_contribution)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    debug!("📝️ Participant {} joined lobby #{lobby_id}", row.user_id);
    Ok(row)
}

pub async fn count_participants(lobby_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM participants WHERE lobby_id = $1")
        .bind(lobby_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

/// Returns the lobby's participants in join order.
pub async fn fetch_participants(lobby_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Participant>, sqlx::Error> {
    let participants = sqlx::query_as("SELECT * FROM participants WHERE lobby_id = $1 ORDER BY id")
        .bind(lobby_id)
        .fetch_all(conn)
        .await?;
    Ok(participants)
}

pub async fn fetch_participant(
    lobby_id: i64,
    user_id: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Option<Participant>, sqlx::Error> {
    let participant = sqlx::query_as("SELECT * FROM participants WHERE lobby_id = $1 AND user_id = $2")
        .bind(lobby_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(participant)
}

/// Sets (overwrites) the participant's budget contribution. Returns the updated row, or `None` if the user has not
/// joined the lobby.
pub async fn set_contribution(
    lobby_id: i64,
    user_id: &UserId,
    amount: Pence,
    conn: &mut SqliteConnection,
) -> Result<Option<Participant>, sqlx::Error> {
    let participant = sqlx::query_as(
        r#"
            UPDATE participants SET budget_contribution = $1
            WHERE lobby_id = $2 AND user_id = $3
            RETURNING *;
        "#,
    )
    .bind(amount)
    .bind(lobby_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(participant)
}

/// Replaces the participant's meal selections. Any change resets their readiness to `NotReady`, so other
/// participants never see a `Ready` flag that refers to stale selections.
pub async fn update_selections(
    lobby_id: i64,
    user_id: &UserId,
    selections: Vec<MealSelection>,
    conn: &mut SqliteConnection,
) -> Result<Option<Participant>, sqlx::Error> {
    let participant = sqlx::query_as(
        r#"
            UPDATE participants SET selections = $1, selection_status = 'NotReady', ready_at = NULL
            WHERE lobby_id = $2 AND user_id = $3
            RETURNING *;
        "#,
    )
    .bind(Json(selections))
    .bind(lobby_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(participant)
}

/// Sets the participant's own readiness flag.
pub async fn set_selection_status(
    lobby_id: i64,
    user_id: &UserId,
    status: SelectionStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Participant>, sqlx::Error> {
    let ready_at = match status {
        SelectionStatus::Ready => Some(Utc::now()),
        SelectionStatus::NotReady => None,
    };
    let participant = sqlx::query_as(
        r#"
            UPDATE participants SET selection_status = $1, ready_at = $2
            WHERE lobby_id = $3 AND user_id = $4
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(ready_at)
    .bind(lobby_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(participant)
}
