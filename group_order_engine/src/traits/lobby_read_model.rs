use crate::{
    db_types::GroupOrderId,
    goe_api::lobby_objects::{LobbyState, LobbyStatus},
    traits::GroupOrderError,
};

/// Read-side queries over the lobby aggregate.
///
/// The budget summary is always recomputed from the participant ledger; backends must never cache it
/// authoritatively.
#[allow(async_fn_in_trait)]
pub trait LobbyReadModel {
    /// Fetches the full lobby aggregate (the group order row plus its participants in join order).
    async fn fetch_lobby(&self, id: &GroupOrderId) -> Result<Option<LobbyState>, GroupOrderError>;

    /// Fetches the cheap status view: current phase and budget summary.
    async fn fetch_lobby_status(&self, id: &GroupOrderId) -> Result<Option<LobbyStatus>, GroupOrderError>;

    /// Resolves a share token to the lobby it invites to, if any.
    async fn fetch_lobby_by_share_token(&self, token: &str) -> Result<Option<LobbyState>, GroupOrderError>;
}
