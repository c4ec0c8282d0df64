use chrono::Utc;
use log::info;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::{
    db_types::OrderId,
    goe_api::lobby_objects::LobbyState,
    traits::{MaterializeError, OrderMaterializer},
};

/// A local stand-in for the order service. It mints an order id in the same shape the marketplace uses; the
/// SQLite backend snapshots the merged selections against that id as part of the lock transaction.
#[derive(Debug, Clone, Default)]
pub struct LocalOrderService;

impl OrderMaterializer for LocalOrderService {
    async fn materialize(&self, lobby: &LobbyState) -> Result<OrderId, MaterializeError> {
        let suffix: String = thread_rng().sample_iter(&Alphanumeric).take(8).map(char::from).collect();
        let order_id = OrderId(format!("order_{}_{}", Utc::now().timestamp_millis(), suffix.to_lowercase()));
        let totals = lobby.totals();
        info!(
            "🧾️ Materializing lobby [{}] into order {order_id}: {} participants, {} payable",
            lobby.order.group_order_id,
            lobby.participants.len(),
            totals.payable
        );
        Ok(order_id)
    }
}
