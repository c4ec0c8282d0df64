use chrono::Utc;
use log::debug;
use sqlx::{types::Json, SqliteConnection};

use crate::{
    db_types::{MealSelection, OrderId},
    goe_api::lobby_objects::LobbyState,
    traits::GroupOrderError,
};

/// Snapshots the materialized order for a locked lobby: every participant's selections flattened into one item
/// list, with the group discount applied. The unique constraint on `lobby_id` means a lobby can only ever be
/// materialized once.
pub async fn insert_placed_order(
    lobby: &LobbyState,
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<(), GroupOrderError> {
    let items: Vec<MealSelection> =
        lobby.participants.iter().flat_map(|p| p.selections.0.iter().cloned()).collect();
    let totals = lobby.totals();
    sqlx::query(
        r#"
            INSERT INTO placed_orders (
                order_id,
                lobby_id,
                customer_id,
                restaurant_name,
                subtotal,
                discount,
                total_amount,
                participant_count,
                order_items,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10);
        "#,
    )
    .bind(order_id)
    .bind(lobby.order.id)
    .bind(&lobby.order.created_by)
    .bind(&lobby.order.restaurant_name)
    .bind(totals.subtotal)
    .bind(totals.discount)
    .bind(totals.payable)
    .bind(lobby.participants.len() as i64)
    .bind(Json(items))
    .bind(Utc::now())
    .execute(conn)
    .await?;
    debug!("📝️ Lobby [{}] materialized into order {order_id}", lobby.order.group_order_id);
    Ok(())
}
