use chrono::{DateTime, Utc};
use cn_common::Pence;
use thiserror::Error;

use crate::{
    db_types::{GroupOrder, GroupOrderId, MealSelection, NewGroupOrder, NewParticipant, OrderId, Participant, Phase, SelectionStatus, UserId},
    goe_api::lobby_objects::{BudgetSummary, LobbyState},
    traits::{LobbyReadModel, MaterializeError, OrderMaterializer},
};

/// The policy governing the `Selection` → `Locked` transition.
///
/// By default the gate is left to the creator's discretion (locking with unready participants logs a warning but
/// goes ahead). Deployments that want a hard all-ready gate opt in via configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockPolicy {
    /// The creator may lock the lobby at any point during `Selection`.
    #[default]
    CreatorDiscretion,
    /// Locking fails with `PreconditionFailed` until every participant is `Ready`.
    RequireAllReady,
}

/// The result of a successful lock: the final lobby state and the order the materializer placed for it.
#[derive(Debug, Clone)]
pub struct LockOutcome {
    pub lobby: LobbyState,
    pub placed_order_id: OrderId,
}

/// This trait defines the mutation-side behaviour for backends supporting the group order engine.
///
/// Every method that changes a lobby must run as a single atomic transaction against that lobby, and must verify
/// the phase guard *inside* the transaction. That gives the engine its two core guarantees: no partial mutation is
/// ever observable, and the phase only moves forward.
#[allow(async_fn_in_trait)]
pub trait GroupOrderDatabase: Clone + LobbyReadModel {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Creates a new lobby in the `Budgeting` phase, with the creator as its first (and so far only) participant.
    ///
    /// The public id, share token and share link are generated here, once, and never change. The creator's
    /// opening contribution (which may be zero) is recorded on their participant row.
    async fn insert_lobby(&self, lobby: NewGroupOrder) -> Result<LobbyState, GroupOrderError>;

    /// Adds a participant to the lobby.
    ///
    /// Fails with `AlreadyJoined` if the user is already in the lobby, and with `PhaseError` unless the lobby is
    /// still in `Budgeting`. Presentation fields (initials, colour tag) are derived here from the display name
    /// and join order.
    async fn join_lobby(&self, id: &GroupOrderId, participant: NewParticipant) -> Result<Participant, GroupOrderError>;

    /// Sets (not increments) the participant's budget contribution and returns the recomputed pool summary.
    ///
    /// Repeating a call with the same amount is a no-op, which keeps client retries safe. Only legal during
    /// `Budgeting`; the amount must be non-negative.
    async fn set_contribution(
        &self,
        id: &GroupOrderId,
        user_id: &UserId,
        amount: Pence,
    ) -> Result<BudgetSummary, GroupOrderError>;

    /// Advances the lobby from `Budgeting` to `Selection`.
    ///
    /// The caller is responsible for the authorization check (creator only); this method enforces the phase guard
    /// and the non-zero-budget precondition atomically, and returns the updated lobby.
    async fn start_selection(&self, id: &GroupOrderId) -> Result<LobbyState, GroupOrderError>;

    /// Replaces the participant's meal selections and resets their readiness to `NotReady`.
    ///
    /// Only legal during `Selection`.
    async fn update_selections(
        &self,
        id: &GroupOrderId,
        user_id: &UserId,
        selections: Vec<MealSelection>,
    ) -> Result<LobbyState, GroupOrderError>;

    /// Sets the participant's own readiness flag. Only legal during `Selection`.
    ///
    /// Marking `Ready` with an empty selection fails with `PreconditionFailed`.
    async fn set_selection_status(
        &self,
        id: &GroupOrderId,
        user_id: &UserId,
        status: SelectionStatus,
    ) -> Result<LobbyState, GroupOrderError>;

    /// Advances the lobby from `Selection` to `Locked`, materializes it into a single payable order, and records
    /// the placed order id, all in one transaction, so the materializer is invoked exactly once per lobby.
    ///
    /// The caller is responsible for the authorization check (creator only); `policy` decides whether unready
    /// participants block the lock.
    async fn lock_lobby<M: OrderMaterializer + Sync>(
        &self,
        id: &GroupOrderId,
        policy: LockPolicy,
        materializer: &M,
    ) -> Result<LockOutcome, GroupOrderError>;

    /// Marks lobbies whose `expires_at` has passed and that never reached `Locked` as expired.
    ///
    /// Expired lobbies reject all further mutations. Returns the lobbies expired by this sweep.
    async fn expire_old_lobbies(&self, now: DateTime<Utc>) -> Result<Vec<GroupOrder>, GroupOrderError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), GroupOrderError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum GroupOrderError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("Invalid request: {0}")]
    ValidationError(String),
    #[error("Not allowed: {0}")]
    AuthorizationError(String),
    #[error("The lobby is in the {actual} phase, but this operation requires {required}")]
    PhaseError { required: Phase, actual: Phase },
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
    #[error("The requested group order {0} does not exist")]
    LobbyNotFound(GroupOrderId),
    #[error("User {0} is not a participant in this group order")]
    ParticipantNotFound(UserId),
    #[error("User {0} has already joined this group order")]
    AlreadyJoined(UserId),
    #[error("The group order {0} has already been materialized into order {1}")]
    AlreadyMaterialized(GroupOrderId, OrderId),
    #[error("The group order {0} has expired")]
    LobbyExpired(GroupOrderId),
    #[error("Could not materialize the group order: {0}")]
    MaterializeError(#[from] MaterializeError),
}

impl From<sqlx::Error> for GroupOrderError {
    fn from(e: sqlx::Error) -> Self {
        GroupOrderError::DatabaseError(e.to_string())
    }
}

impl GroupOrderError {
    pub fn phase(required: Phase, actual: Phase) -> Self {
        Self::PhaseError { required, actual }
    }
}
