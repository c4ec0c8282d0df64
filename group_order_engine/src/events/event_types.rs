use serde::{Deserialize, Serialize};

use crate::{
    db_types::{GroupOrder, GroupOrderId, OrderId, Phase},
    goe_api::lobby_objects::BudgetSummary,
};

/// Fired whenever a lobby moves forward a phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseChangedEvent {
    pub order: GroupOrder,
    pub from: Phase,
    pub to: Phase,
}

impl PhaseChangedEvent {
    pub fn new(order: GroupOrder, from: Phase) -> Self {
        let to = order.phase;
        Self { order, from, to }
    }
}

/// Fired whenever the budget pool changes, carrying the freshly recomputed summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetUpdatedEvent {
    pub group_order_id: GroupOrderId,
    pub summary: BudgetSummary,
}

impl BudgetUpdatedEvent {
    pub fn new(group_order_id: GroupOrderId, summary: BudgetSummary) -> Self {
        Self { group_order_id, summary }
    }
}

/// Fired once per lobby, when it is locked and materialized into a payable order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyLockedEvent {
    pub order: GroupOrder,
    pub placed_order_id: OrderId,
}

impl LobbyLockedEvent {
    pub fn new(order: GroupOrder, placed_order_id: OrderId) -> Self {
        Self { order, placed_order_id }
    }
}
