use cn_common::Pence;
use serde::{Deserialize, Serialize};

use crate::db_types::Participant;

/// The flat group discount applied once a lobby has two or more participants.
pub const GROUP_DISCOUNT_PERCENT: i64 = 25;

pub fn group_discount_percent(participant_count: usize) -> i64 {
    if participant_count >= 2 {
        GROUP_DISCOUNT_PERCENT
    } else {
        0
    }
}

/// The derived money view over a lobby. Never stored; recomputed from the participant ledger on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyTotals {
    /// Sum of every participant's selection line items.
    pub subtotal: Pence,
    pub discount_percent: i64,
    pub discount: Pence,
    /// What the materialized order will actually charge.
    pub payable: Pence,
}

impl LobbyTotals {
    pub fn for_participants(participants: &[Participant]) -> Self {
        let subtotal: Pence = participants.iter().map(Participant::selection_total).sum();
        let discount_percent = group_discount_percent(participants.len());
        let discount = subtotal.discount(discount_percent);
        Self { subtotal, discount_percent, discount, payable: subtotal - discount }
    }
}
