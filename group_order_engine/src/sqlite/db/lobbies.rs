use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{GroupOrder, GroupOrderId, NewGroupOrder, OrderId, Phase},
    helpers::{default_lobby_title, new_group_order_id, new_share_token, share_link_for_token},
    traits::GroupOrderError,
};

/// Inserts a new lobby row in the `Budgeting` phase. The public id, share token and share link are generated here,
/// once, and are immutable thereafter.
pub async fn insert_group_order(
    lobby: NewGroupOrder,
    conn: &mut SqliteConnection,
) -> Result<GroupOrder, GroupOrderError> {
    let group_order_id = new_group_order_id();
    let share_token = new_share_token();
    let share_link = share_link_for_token(&share_token);
    let title = lobby
        .title
        .clone()
        .unwrap_or_else(|| default_lobby_title(&lobby.creator_name, &lobby.restaurant_name));
    let now = Utc::now();
    let expires_at = now + lobby.expires_in;
    let order: GroupOrder = sqlx::query_as(
        r#"
            INSERT INTO group_orders (
                group_order_id,
                created_by,
                restaurant_name,
                title,
                currency,
                phase,
                share_token,
                share_link,
                created_at,
                updated_at,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5, 'Budgeting', $6, $7, $8, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(&group_order_id)
    .bind(&lobby.created_by)
    .bind(&lobby.restaurant_name)
    .bind(title)
    .bind(lobby.currency())
    .bind(share_token)
    .bind(share_link)
    .bind(now)
    .bind(expires_at)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Group order [{}] inserted with id {}", order.group_order_id, order.id);
    Ok(order)
}

/// Returns the lobby row for the given public id.
pub async fn fetch_group_order(
    id: &GroupOrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<GroupOrder>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM group_orders WHERE group_order_id = $1")
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Returns the lobby row the given share token invites to.
pub async fn fetch_group_order_by_share_token(
    token: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<GroupOrder>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM group_orders WHERE share_token = $1")
        .bind(token)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Advances the phase of the lobby with internal id `lobby_id` from `from` to `to`. The current phase is part of
/// the WHERE clause, so a concurrent transition loses cleanly: `None` is returned and nothing is written.
pub async fn set_phase(
    lobby_id: i64,
    from: Phase,
    to: Phase,
    conn: &mut SqliteConnection,
) -> Result<Option<GroupOrder>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE group_orders SET phase = $1, updated_at = $2
            WHERE id = $3 AND phase = $4 AND expired_at IS NULL
            RETURNING *;
        "#,
    )
    .bind(to)
    .bind(Utc::now())
    .bind(lobby_id)
    .bind(from)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Records the id of the order the lobby was materialized into. The `placed_order_id IS NULL` guard makes this a
/// once-only write.
pub async fn record_placed_order_id(
    lobby_id: i64,
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<GroupOrder>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE group_orders SET placed_order_id = $1, updated_at = $2
            WHERE id = $3 AND placed_order_id IS NULL
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(Utc::now())
    .bind(lobby_id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Bumps the lobby's `updated_at` after a participant-level change and returns the refreshed row, so callers
/// never hand a stale timestamp back to the client.
pub async fn touch(lobby_id: i64, conn: &mut SqliteConnection) -> Result<GroupOrder, sqlx::Error> {
    let order = sqlx::query_as("UPDATE group_orders SET updated_at = $1 WHERE id = $2 RETURNING *")
        .bind(Utc::now())
        .bind(lobby_id)
        .fetch_one(conn)
        .await?;
    Ok(order)
}

/// Marks every lobby whose `expires_at` lies before `now` and that never reached `Locked` as expired, and returns
/// the newly expired rows.
pub async fn expire_abandoned(
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<GroupOrder>, sqlx::Error> {
    let expired = sqlx::query_as(
        r#"
            UPDATE group_orders SET expired_at = $1, updated_at = $1
            WHERE expires_at < $1 AND expired_at IS NULL AND phase <> 'Locked'
            RETURNING *;
        "#,
    )
    .bind(now)
    .fetch_all(conn)
    .await?;
    Ok(expired)
}
