use cn_common::Pence;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{GroupOrder, Participant, Phase, UserId},
    helpers::LobbyTotals,
};

//--------------------------------------     BudgetSummary     -------------------------------------------------------
/// The derived view over the budget pool. Recomputed from the participant ledger on every read; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_budget: Pence,
    pub participant_count: usize,
    pub contributions: Vec<Contribution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub user_id: UserId,
    pub amount: Pence,
}

impl BudgetSummary {
    pub fn for_participants(participants: &[Participant]) -> Self {
        let contributions = participants
            .iter()
            .map(|p| Contribution { user_id: p.user_id.clone(), amount: p.budget_contribution })
            .collect::<Vec<Contribution>>();
        let total_budget = contributions.iter().map(|c| c.amount).sum();
        Self { total_budget, participant_count: participants.len(), contributions }
    }

    pub fn is_empty(&self) -> bool {
        self.total_budget.is_zero()
    }
}

//--------------------------------------       LobbyState      -------------------------------------------------------
/// The full lobby aggregate: the group order row plus its participants in join order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyState {
    pub order: GroupOrder,
    pub participants: Vec<Participant>,
}

impl LobbyState {
    pub fn new(order: GroupOrder, participants: Vec<Participant>) -> Self {
        Self { order, participants }
    }

    pub fn phase(&self) -> Phase {
        self.order.phase
    }

    pub fn budget_summary(&self) -> BudgetSummary {
        BudgetSummary::for_participants(&self.participants)
    }

    pub fn totals(&self) -> LobbyTotals {
        LobbyTotals::for_participants(&self.participants)
    }

    pub fn participant(&self, user_id: &UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.user_id == user_id)
    }

    pub fn is_creator(&self, user_id: &UserId) -> bool {
        &self.order.created_by == user_id
    }

    pub fn all_ready(&self) -> bool {
        self.participants.iter().all(Participant::is_ready)
    }

    pub fn status(&self) -> LobbyStatus {
        LobbyStatus { group_order_id: self.order.group_order_id.clone(), phase: self.phase(), budget: self.budget_summary() }
    }
}

//--------------------------------------      LobbyStatus      -------------------------------------------------------
/// The cheap status view that clients poll or subscribe to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyStatus {
    pub group_order_id: crate::db_types::GroupOrderId,
    pub phase: Phase,
    pub budget: BudgetSummary,
}
