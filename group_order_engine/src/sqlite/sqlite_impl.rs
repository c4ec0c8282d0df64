//! `SqliteDatabase` is a concrete implementation of a group order engine backend.
//!
//! Every mutation runs as a single SQLite transaction against the lobby aggregate, with the phase guard re-checked
//! inside the transaction. SQLite's writer serialization is what turns "two participants contribute concurrently"
//! into two cleanly ordered transactions rather than a destructive race.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use cn_common::Pence;
use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, lobbies, new_pool, participants, placed_orders};
use crate::{
    db_types::{GroupOrder, GroupOrderId, MealSelection, NewGroupOrder, NewParticipant, Participant, Phase, SelectionStatus, UserId},
    goe_api::lobby_objects::{BudgetSummary, LobbyState, LobbyStatus},
    traits::{GroupOrderDatabase, GroupOrderError, LobbyReadModel, LockOutcome, LockPolicy, OrderMaterializer},
};

/// Largest quantity a single selection line may carry. Keeps line totals comfortably inside `i64` and catches
/// fat-fingered clients early.
pub const MAX_SELECTION_QUANTITY: i64 = 100;

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database at `CN_DATABASE_URL` (or the default path).
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fetches the lobby row and verifies it is still live (not expired). Most mutations start here.
    async fn fetch_live_lobby(
        &self,
        id: &GroupOrderId,
        conn: &mut sqlx::SqliteConnection,
    ) -> Result<GroupOrder, GroupOrderError> {
        let order =
            lobbies::fetch_group_order(id, conn).await?.ok_or_else(|| GroupOrderError::LobbyNotFound(id.clone()))?;
        if order.is_expired() {
            return Err(GroupOrderError::LobbyExpired(id.clone()));
        }
        Ok(order)
    }
}

impl LobbyReadModel for SqliteDatabase {
    async fn fetch_lobby(&self, id: &GroupOrderId) -> Result<Option<LobbyState>, GroupOrderError> {
        let mut conn = self.pool.acquire().await?;
        let order = match lobbies::fetch_group_order(id, &mut conn).await? {
            Some(order) => order,
            None => return Ok(None),
        };
        let members = participants::fetch_participants(order.id, &mut conn).await?;
        Ok(Some(LobbyState::new(order, members)))
    }

    async fn fetch_lobby_status(&self, id: &GroupOrderId) -> Result<Option<LobbyStatus>, GroupOrderError> {
        Ok(self.fetch_lobby(id).await?.map(|lobby| lobby.status()))
    }

    async fn fetch_lobby_by_share_token(&self, token: &str) -> Result<Option<LobbyState>, GroupOrderError> {
        let mut conn = self.pool.acquire().await?;
        let order = match lobbies::fetch_group_order_by_share_token(token, &mut conn).await? {
            Some(order) => order,
            None => return Ok(None),
        };
        let members = participants::fetch_participants(order.id, &mut conn).await?;
        Ok(Some(LobbyState::new(order, members)))
    }
}

impl GroupOrderDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_lobby(&self, lobby: NewGroupOrder) -> Result<LobbyState, GroupOrderError> {
        let mut tx = self.pool.begin().await?;
        let creator = NewParticipant::new(lobby.created_by.clone(), lobby.creator_name.clone())
            .with_contribution(lobby.initial_budget);
        let order = lobbies::insert_group_order(lobby, &mut tx).await?;
        let first = participants::insert_participant(order.id, creator, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Group order [{}] created by {}", order.group_order_id, first.user_id);
        Ok(LobbyState::new(order, vec![first]))
    }

    async fn join_lobby(&self, id: &GroupOrderId, participant: NewParticipant) -> Result<Participant, GroupOrderError> {
        let mut tx = self.pool.begin().await?;
        let order = self.fetch_live_lobby(id, &mut tx).await?;
        if order.phase != Phase::Budgeting {
            return Err(GroupOrderError::phase(Phase::Budgeting, order.phase));
        }
        if participants::fetch_participant(order.id, &participant.user_id, &mut tx).await?.is_some() {
            return Err(GroupOrderError::AlreadyJoined(participant.user_id));
        }
        if participant.budget_contribution.is_negative() {
            return Err(GroupOrderError::ValidationError("Budget contribution cannot be negative".to_string()));
        }
        let row = participants::insert_participant(order.id, participant, &mut tx).await?;
        lobbies::touch(order.id, &mut tx).await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn set_contribution(
        &self,
        id: &GroupOrderId,
        user_id: &UserId,
        amount: Pence,
    ) -> Result<BudgetSummary, GroupOrderError> {
        if amount.is_negative() {
            return Err(GroupOrderError::ValidationError("Budget contribution cannot be negative".to_string()));
        }
        let mut tx = self.pool.begin().await?;
        let order = self.fetch_live_lobby(id, &mut tx).await?;
        if order.phase != Phase::Budgeting {
            return Err(GroupOrderError::phase(Phase::Budgeting, order.phase));
        }
        participants::set_contribution(order.id, user_id, amount, &mut tx)
            .await?
            .ok_or_else(|| GroupOrderError::ParticipantNotFound(user_id.clone()))?;
        lobbies::touch(order.id, &mut tx).await?;
        let members = participants::fetch_participants(order.id, &mut tx).await?;
        tx.commit().await?;
        Ok(BudgetSummary::for_participants(&members))
    }

    async fn start_selection(&self, id: &GroupOrderId) -> Result<LobbyState, GroupOrderError> {
        let mut tx = self.pool.begin().await?;
        let order = self.fetch_live_lobby(id, &mut tx).await?;
        if order.phase != Phase::Budgeting {
            return Err(GroupOrderError::phase(Phase::Budgeting, order.phase));
        }
        let members = participants::fetch_participants(order.id, &mut tx).await?;
        let summary = BudgetSummary::for_participants(&members);
        if summary.is_empty() {
            return Err(GroupOrderError::PreconditionFailed(
                "Please verify the budget before starting selection".to_string(),
            ));
        }
        let updated = lobbies::set_phase(order.id, Phase::Budgeting, Phase::Selection, &mut tx)
            .await?
            .ok_or_else(|| GroupOrderError::phase(Phase::Budgeting, order.phase))?;
        tx.commit().await?;
        Ok(LobbyState::new(updated, members))
    }

    async fn update_selections(
        &self,
        id: &GroupOrderId,
        user_id: &UserId,
        selections: Vec<MealSelection>,
    ) -> Result<LobbyState, GroupOrderError> {
        if selections.iter().any(|s| !(1..=MAX_SELECTION_QUANTITY).contains(&s.quantity)) {
            return Err(GroupOrderError::ValidationError(format!(
                "Selection quantities must be between 1 and {MAX_SELECTION_QUANTITY}"
            )));
        }
        if selections.iter().any(|s| s.unit_price.is_negative()) {
            return Err(GroupOrderError::ValidationError("Selection prices cannot be negative".to_string()));
        }
        let mut tx = self.pool.begin().await?;
        let order = self.fetch_live_lobby(id, &mut tx).await?;
        if order.phase != Phase::Selection {
            return Err(GroupOrderError::phase(Phase::Selection, order.phase));
        }
        participants::update_selections(order.id, user_id, selections, &mut tx)
            .await?
            .ok_or_else(|| GroupOrderError::ParticipantNotFound(user_id.clone()))?;
        let order = lobbies::touch(order.id, &mut tx).await?;
        let members = participants::fetch_participants(order.id, &mut tx).await?;
        tx.commit().await?;
        Ok(LobbyState::new(order, members))
    }

    async fn set_selection_status(
        &self,
        id: &GroupOrderId,
        user_id: &UserId,
        status: SelectionStatus,
    ) -> Result<LobbyState, GroupOrderError> {
        let mut tx = self.pool.begin().await?;
        let order = self.fetch_live_lobby(id, &mut tx).await?;
        if order.phase != Phase::Selection {
            return Err(GroupOrderError::phase(Phase::Selection, order.phase));
        }
        let me = participants::fetch_participant(order.id, user_id, &mut tx)
            .await?
            .ok_or_else(|| GroupOrderError::ParticipantNotFound(user_id.clone()))?;
        if status == SelectionStatus::Ready && !me.has_selections() {
            return Err(GroupOrderError::PreconditionFailed(
                "Cannot mark ready without any selections".to_string(),
            ));
        }
        participants::set_selection_status(order.id, user_id, status, &mut tx)
            .await?
            .ok_or_else(|| GroupOrderError::ParticipantNotFound(user_id.clone()))?;
        let order = lobbies::touch(order.id, &mut tx).await?;
        let members = participants::fetch_participants(order.id, &mut tx).await?;
        tx.commit().await?;
        Ok(LobbyState::new(order, members))
    }

    async fn lock_lobby<M: OrderMaterializer + Sync>(
        &self,
        id: &GroupOrderId,
        policy: LockPolicy,
        materializer: &M,
    ) -> Result<LockOutcome, GroupOrderError> {
        let mut tx = self.pool.begin().await?;
        let order = self.fetch_live_lobby(id, &mut tx).await?;
        if let Some(placed) = &order.placed_order_id {
            return Err(GroupOrderError::AlreadyMaterialized(id.clone(), placed.clone()));
        }
        if order.phase != Phase::Selection {
            return Err(GroupOrderError::phase(Phase::Selection, order.phase));
        }
        let members = participants::fetch_participants(order.id, &mut tx).await?;
        let lobby = LobbyState::new(order, members);
        match policy {
            LockPolicy::RequireAllReady if !lobby.all_ready() => {
                return Err(GroupOrderError::PreconditionFailed(
                    "Not all participants have marked their selections as ready".to_string(),
                ));
            },
            LockPolicy::CreatorDiscretion if !lobby.all_ready() => {
                warn!(
                    "🔒️ Lobby [{}] is being locked before all participants are ready",
                    lobby.order.group_order_id
                );
            },
            _ => {},
        }
        let updated = lobbies::set_phase(lobby.order.id, Phase::Selection, Phase::Locked, &mut tx)
            .await?
            .ok_or_else(|| GroupOrderError::phase(Phase::Selection, lobby.order.phase))?;
        // A materializer failure rolls the phase change back, so the lock can be retried cleanly.
        let placed_order_id = materializer.materialize(&lobby).await?;
        placed_orders::insert_placed_order(&lobby, &placed_order_id, &mut tx).await?;
        let updated = lobbies::record_placed_order_id(updated.id, &placed_order_id, &mut tx)
            .await?
            .ok_or_else(|| GroupOrderError::AlreadyMaterialized(id.clone(), placed_order_id.clone()))?;
        tx.commit().await?;
        info!("🔒️ Lobby [{}] locked and materialized into order {placed_order_id}", updated.group_order_id);
        Ok(LockOutcome { lobby: LobbyState::new(updated, lobby.participants), placed_order_id })
    }

    async fn expire_old_lobbies(&self, now: DateTime<Utc>) -> Result<Vec<GroupOrder>, GroupOrderError> {
        let mut conn = self.pool.acquire().await?;
        let expired = lobbies::expire_abandoned(now, &mut conn).await?;
        Ok(expired)
    }

    async fn close(&mut self) -> Result<(), GroupOrderError> {
        self.pool.close().await;
        Ok(())
    }
}
