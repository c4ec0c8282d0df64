use thiserror::Error;

use crate::{db_types::OrderId, goe_api::lobby_objects::LobbyState};

/// The boundary to the order service that turns a locked lobby into a single payable order.
///
/// The engine's only contract with the materializer is: it is called once, exactly once, after the lobby reaches
/// `Locked`. How the per-participant selections are merged and how costs are split between participants is the
/// order service's business.
#[allow(async_fn_in_trait)]
pub trait OrderMaterializer {
    /// Converts the locked lobby into a payable order and returns its id.
    async fn materialize(&self, lobby: &LobbyState) -> Result<OrderId, MaterializeError>;
}

#[derive(Debug, Clone, Error)]
pub enum MaterializeError {
    #[error("The order service rejected the group order: {0}")]
    Rejected(String),
    #[error("The order service is unavailable: {0}")]
    Unavailable(String),
}
