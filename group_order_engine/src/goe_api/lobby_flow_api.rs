use std::fmt::Debug;

use chrono::{DateTime, Utc};
use cn_common::Pence;
use log::*;

use crate::{
    db_types::{
        GroupOrder,
        GroupOrderId,
        MealSelection,
        NewGroupOrder,
        NewParticipant,
        Participant,
        Phase,
        SelectionStatus,
        UserId,
    },
    events::{BudgetUpdatedEvent, EventProducers, LobbyLockedEvent, PhaseChangedEvent},
    goe_api::lobby_objects::{BudgetSummary, LobbyState, LobbyStatus},
    traits::{GroupOrderDatabase, GroupOrderError, LockOutcome, LockPolicy, OrderMaterializer},
};

/// `LobbyFlowApi` is the primary API for driving the group order lifecycle: budgeting, selection and the final
/// lock-and-materialize step.
///
/// Every operation takes the authenticated principal explicitly. There is no ambient identity: the caller proves
/// who is acting, and this API decides what that actor may do (creator-only transitions, own-row-only mutations).
pub struct LobbyFlowApi<B, M> {
    db: B,
    materializer: M,
    lock_policy: LockPolicy,
    producers: EventProducers,
}

impl<B, M> Debug for LobbyFlowApi<B, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LobbyFlowApi")
    }
}

impl<B, M> LobbyFlowApi<B, M> {
    pub fn new(db: B, materializer: M, producers: EventProducers) -> Self {
        Self { db, materializer, lock_policy: LockPolicy::default(), producers }
    }

    pub fn with_lock_policy(mut self, policy: LockPolicy) -> Self {
        self.lock_policy = policy;
        self
    }
}

impl<B, M> LobbyFlowApi<B, M>
where
    B: GroupOrderDatabase,
    M: OrderMaterializer + Sync,
{
    /// Creates a new lobby in the `Budgeting` phase. The creator is auto-joined as the first participant with
    /// their opening contribution, so the "at least one participant" invariant holds from the first moment.
    pub async fn create_lobby(&self, lobby: NewGroupOrder) -> Result<LobbyState, GroupOrderError> {
        if lobby.restaurant_name.trim().is_empty() {
            return Err(GroupOrderError::ValidationError("Restaurant name cannot be empty".to_string()));
        }
        if lobby.initial_budget.is_negative() {
            return Err(GroupOrderError::ValidationError("Budget contribution cannot be negative".to_string()));
        }
        let state = self.db.insert_lobby(lobby).await?;
        debug!("🍲️ Lobby [{}] created for {}", state.order.group_order_id, state.order.restaurant_name);
        if !state.budget_summary().is_empty() {
            self.call_budget_updated_hook(&state).await;
        }
        Ok(state)
    }

    /// Adds the principal to the lobby. Joining is only possible while the lobby is still budgeting.
    pub async fn join_lobby(
        &self,
        id: &GroupOrderId,
        principal: &UserId,
        display_name: &str,
        opening_contribution: Pence,
    ) -> Result<Participant, GroupOrderError> {
        let participant = NewParticipant::new(principal.clone(), display_name.to_string())
            .with_contribution(opening_contribution);
        let joined = self.db.join_lobby(id, participant).await?;
        debug!("🍲️ {} joined lobby [{id}]", joined.user_id);
        if !opening_contribution.is_zero() {
            if let Some(lobby) = self.db.fetch_lobby(id).await? {
                self.call_budget_updated_hook(&lobby).await;
            }
        }
        Ok(joined)
    }

    /// Sets (not increments) the principal's budget contribution and returns the recomputed pool summary.
    /// Repeating the call with the same amount is a no-op.
    pub async fn contribute_budget(
        &self,
        id: &GroupOrderId,
        principal: &UserId,
        amount: Pence,
    ) -> Result<BudgetSummary, GroupOrderError> {
        let summary = self.db.set_contribution(id, principal, amount).await?;
        debug!("🍲️ {principal} set their contribution in lobby [{id}] to {amount}. Pool: {}", summary.total_budget);
        for emitter in &self.producers.budget_updated_producer {
            emitter.publish_event(BudgetUpdatedEvent::new(id.clone(), summary.clone())).await;
        }
        Ok(summary)
    }

    /// Advances the lobby from `Budgeting` to `Selection`. Creator only; requires a non-zero pool.
    pub async fn start_selection(&self, id: &GroupOrderId, requester: &UserId) -> Result<LobbyState, GroupOrderError> {
        let lobby = self.require_lobby(id).await?;
        if !lobby.is_creator(requester) {
            return Err(GroupOrderError::AuthorizationError(
                "Only the creator can start the selection phase".to_string(),
            ));
        }
        let updated = self.db.start_selection(id).await?;
        info!("🍲️ Lobby [{id}] entered the selection phase");
        self.call_phase_changed_hook(updated.order.clone(), Phase::Budgeting).await;
        Ok(updated)
    }

    /// Replaces the principal's meal selections, resetting their readiness.
    pub async fn update_selections(
        &self,
        id: &GroupOrderId,
        principal: &UserId,
        selections: Vec<MealSelection>,
    ) -> Result<LobbyState, GroupOrderError> {
        self.db.update_selections(id, principal, selections).await
    }

    /// Sets a participant's readiness flag. A participant can only set their own status; `target` exists so that
    /// the authorization rule is checked here rather than assumed at the transport layer.
    pub async fn set_selection_status(
        &self,
        id: &GroupOrderId,
        principal: &UserId,
        target: &UserId,
        status: SelectionStatus,
    ) -> Result<LobbyState, GroupOrderError> {
        if principal != target {
            return Err(GroupOrderError::AuthorizationError(
                "A participant cannot change another participant's selection status".to_string(),
            ));
        }
        let lobby = self.db.set_selection_status(id, principal, status).await?;
        if lobby.all_ready() {
            info!("🍲️ All participants in lobby [{id}] are ready");
        }
        Ok(lobby)
    }

    /// Locks the lobby and materializes it into a single payable order. Creator only. The configured
    /// [`LockPolicy`] decides whether unready participants block the lock.
    pub async fn lock_lobby(&self, id: &GroupOrderId, requester: &UserId) -> Result<LockOutcome, GroupOrderError> {
        let lobby = self.require_lobby(id).await?;
        if !lobby.is_creator(requester) {
            return Err(GroupOrderError::AuthorizationError("Only the creator can lock the group order".to_string()));
        }
        let outcome = self.db.lock_lobby(id, self.lock_policy, &self.materializer).await?;
        self.call_phase_changed_hook(outcome.lobby.order.clone(), Phase::Selection).await;
        for emitter in &self.producers.lobby_locked_producer {
            let event = LobbyLockedEvent::new(outcome.lobby.order.clone(), outcome.placed_order_id.clone());
            emitter.publish_event(event).await;
        }
        Ok(outcome)
    }

    /// The cheap status view: current phase plus the freshly recomputed budget summary.
    pub async fn lobby_status(&self, id: &GroupOrderId) -> Result<LobbyStatus, GroupOrderError> {
        self.db.fetch_lobby_status(id).await?.ok_or_else(|| GroupOrderError::LobbyNotFound(id.clone()))
    }

    /// The full lobby aggregate.
    pub async fn fetch_lobby(&self, id: &GroupOrderId) -> Result<LobbyState, GroupOrderError> {
        self.require_lobby(id).await
    }

    /// Resolves an invite token to its lobby.
    pub async fn fetch_lobby_by_share_token(&self, token: &str) -> Result<Option<LobbyState>, GroupOrderError> {
        self.db.fetch_lobby_by_share_token(token).await
    }

    /// Sweeps lobbies whose TTL has passed without reaching `Locked`. Returns the lobbies expired by this run.
    pub async fn expire_old_lobbies(&self, now: DateTime<Utc>) -> Result<Vec<GroupOrder>, GroupOrderError> {
        let expired = self.db.expire_old_lobbies(now).await?;
        if !expired.is_empty() {
            info!("🕰️ {} abandoned lobbies expired", expired.len());
        }
        Ok(expired)
    }

    async fn require_lobby(&self, id: &GroupOrderId) -> Result<LobbyState, GroupOrderError> {
        self.db.fetch_lobby(id).await?.ok_or_else(|| GroupOrderError::LobbyNotFound(id.clone()))
    }

    async fn call_phase_changed_hook(&self, order: GroupOrder, from: Phase) {
        for emitter in &self.producers.phase_changed_producer {
            debug!("🍲️ Notifying phase change hook subscribers");
            emitter.publish_event(PhaseChangedEvent::new(order.clone(), from)).await;
        }
    }

    async fn call_budget_updated_hook(&self, lobby: &LobbyState) {
        let event = BudgetUpdatedEvent::new(lobby.order.group_order_id.clone(), lobby.budget_summary());
        for emitter in &self.producers.budget_updated_producer {
            emitter.publish_event(event.clone()).await;
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use chrono::Duration;

    use super::*;
    use crate::{
        db_types::OrderId,
        order_service::LocalOrderService,
        test_utils::{prepare_test_env, random_db_path},
        traits::MaterializeError,
        SqliteDatabase,
    };

    async fn new_test_api() -> LobbyFlowApi<SqliteDatabase, LocalOrderService> {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.unwrap();
        LobbyFlowApi::new(db, LocalOrderService, EventProducers::default())
    }

    fn marias_kitchen(creator: &str, budget: i64) -> NewGroupOrder {
        NewGroupOrder::new(
            UserId::from(creator),
            "Maria Okafor".to_string(),
            "Maria's Kitchen".to_string(),
            Pence::from(budget),
        )
    }

    fn jollof(quantity: i64) -> MealSelection {
        MealSelection {
            meal_id: "meal-jollof".to_string(),
            name: "Jollof rice".to_string(),
            quantity,
            unit_price: Pence::from(450),
        }
    }

    #[tokio::test]
    async fn creator_is_the_first_participant() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        assert_eq!(lobby.phase(), Phase::Budgeting);
        assert_eq!(lobby.participants.len(), 1);
        assert_eq!(lobby.participants[0].user_id, UserId::from("u1"));
        assert_eq!(lobby.participants[0].initials, "MO");
        assert_eq!(lobby.budget_summary().total_budget, Pence::from(1000));
        assert!(lobby.order.share_link.contains(&lobby.order.share_token));
        assert_eq!(lobby.order.title, "Maria Okafor's group order from Maria's Kitchen");
    }

    #[tokio::test]
    async fn budgeting_to_selection_happy_path() {
        // The scenario from the product brief: U1 creates and contributes 1000, U2 joins and contributes 500.
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 0)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let u1 = UserId::from("u1");
        let u2 = UserId::from("u2");

        api.contribute_budget(&id, &u1, Pence::from(1000)).await.unwrap();
        api.join_lobby(&id, &u2, "Sam Idowu", Pence::default()).await.unwrap();
        let summary = api.contribute_budget(&id, &u2, Pence::from(500)).await.unwrap();
        assert_eq!(summary.total_budget, Pence::from(1500));
        assert_eq!(summary.participant_count, 2);

        // A non-creator may not advance the phase.
        let err = api.start_selection(&id, &u2).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::AuthorizationError(_)));
        assert_eq!(api.lobby_status(&id).await.unwrap().phase, Phase::Budgeting);

        let lobby = api.start_selection(&id, &u1).await.unwrap();
        assert_eq!(lobby.phase(), Phase::Selection);
    }

    #[tokio::test]
    async fn start_selection_requires_a_nonzero_pool() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 0)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let err = api.start_selection(&id, &UserId::from("u1")).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::PreconditionFailed(_)));
        assert_eq!(api.lobby_status(&id).await.unwrap().phase, Phase::Budgeting);
    }

    #[tokio::test]
    async fn contributions_overwrite_rather_than_accumulate() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 0)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let u1 = UserId::from("u1");
        api.contribute_budget(&id, &u1, Pence::from(1000)).await.unwrap();
        let summary = api.contribute_budget(&id, &u1, Pence::from(1000)).await.unwrap();
        assert_eq!(summary.total_budget, Pence::from(1000));
        let summary = api.contribute_budget(&id, &u1, Pence::from(700)).await.unwrap();
        assert_eq!(summary.total_budget, Pence::from(700));
    }

    #[tokio::test]
    async fn negative_contributions_are_rejected() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 0)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let err = api.contribute_budget(&id, &UserId::from("u1"), Pence::from(-100)).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::ValidationError(_)));
    }

    #[tokio::test]
    async fn joining_twice_fails() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let u2 = UserId::from("u2");
        api.join_lobby(&id, &u2, "Sam", Pence::default()).await.unwrap();
        let err = api.join_lobby(&id, &u2, "Sam", Pence::default()).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::AlreadyJoined(_)));
    }

    #[tokio::test]
    async fn joining_is_only_possible_while_budgeting() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        api.start_selection(&id, &UserId::from("u1")).await.unwrap();
        let err = api.join_lobby(&id, &UserId::from("u3"), "Late Larry", Pence::default()).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::PhaseError { .. }));
    }

    #[tokio::test]
    async fn contributing_after_selection_starts_fails() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let u1 = UserId::from("u1");
        api.start_selection(&id, &u1).await.unwrap();
        let err = api.contribute_budget(&id, &u1, Pence::from(2000)).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::PhaseError { .. }));
        // The pool is untouched by the failed call.
        assert_eq!(api.lobby_status(&id).await.unwrap().budget.total_budget, Pence::from(1000));
    }

    #[tokio::test]
    async fn participants_cannot_set_each_others_status() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let u1 = UserId::from("u1");
        let u2 = UserId::from("u2");
        api.join_lobby(&id, &u2, "Sam", Pence::default()).await.unwrap();
        api.start_selection(&id, &u1).await.unwrap();
        let err = api.set_selection_status(&id, &u2, &u1, SelectionStatus::Ready).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::AuthorizationError(_)));
    }

    #[tokio::test]
    async fn readiness_requires_selections_and_resets_on_change() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let u1 = UserId::from("u1");
        api.start_selection(&id, &u1).await.unwrap();

        let err = api.set_selection_status(&id, &u1, &u1, SelectionStatus::Ready).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::PreconditionFailed(_)));

        api.update_selections(&id, &u1, vec![jollof(2)]).await.unwrap();
        let lobby = api.set_selection_status(&id, &u1, &u1, SelectionStatus::Ready).await.unwrap();
        assert!(lobby.all_ready());

        // Changing selections flips the participant back to NotReady.
        let lobby = api.update_selections(&id, &u1, vec![jollof(3)]).await.unwrap();
        assert!(!lobby.all_ready());
    }

    #[tokio::test]
    async fn oversized_selection_quantities_are_rejected() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let u1 = UserId::from("u1");
        api.start_selection(&id, &u1).await.unwrap();

        for quantity in [0, -1, 101, i64::MAX] {
            let err = api.update_selections(&id, &u1, vec![jollof(quantity)]).await.unwrap_err();
            assert!(matches!(err, GroupOrderError::ValidationError(_)), "quantity {quantity} must be rejected");
        }
        // The cap is inclusive.
        let lobby = api.update_selections(&id, &u1, vec![jollof(100)]).await.unwrap();
        assert_eq!(lobby.participants[0].selection_total(), Pence::from(45_000));
    }

    #[tokio::test]
    async fn mutations_return_a_freshly_stamped_lobby() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let u1 = UserId::from("u1");
        let created_stamp = lobby.order.updated_at;
        api.start_selection(&id, &u1).await.unwrap();

        // The aggregate handed back by a mutation must match what a fresh read sees.
        let state = api.update_selections(&id, &u1, vec![jollof(1)]).await.unwrap();
        assert!(state.order.updated_at > created_stamp);
        let stored = api.fetch_lobby(&id).await.unwrap();
        assert_eq!(state.order.updated_at, stored.order.updated_at);

        let state = api.set_selection_status(&id, &u1, &u1, SelectionStatus::Ready).await.unwrap();
        let stored = api.fetch_lobby(&id).await.unwrap();
        assert_eq!(state.order.updated_at, stored.order.updated_at);
    }

    #[tokio::test]
    async fn lock_materializes_exactly_once() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let u1 = UserId::from("u1");
        let u2 = UserId::from("u2");
        api.join_lobby(&id, &u2, "Sam Idowu", Pence::from(500)).await.unwrap();
        api.start_selection(&id, &u1).await.unwrap();
        api.update_selections(&id, &u1, vec![jollof(2)]).await.unwrap();
        api.update_selections(&id, &u2, vec![jollof(1)]).await.unwrap();

        let err = api.lock_lobby(&id, &u2).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::AuthorizationError(_)));

        let outcome = api.lock_lobby(&id, &u1).await.unwrap();
        assert_eq!(outcome.lobby.phase(), Phase::Locked);
        assert_eq!(outcome.lobby.order.placed_order_id, Some(outcome.placed_order_id.clone()));

        // Two participants, so the 25% group discount applies: 3 * 450 = 1350, payable 1013.
        let totals = outcome.lobby.totals();
        assert_eq!(totals.subtotal, Pence::from(1350));
        assert_eq!(totals.payable, Pence::from(1013));

        let err = api.lock_lobby(&id, &u1).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::AlreadyMaterialized(_, _)));
    }

    #[tokio::test]
    async fn require_all_ready_policy_blocks_early_locks() {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.unwrap();
        let api = LobbyFlowApi::new(db, LocalOrderService, EventProducers::default())
            .with_lock_policy(LockPolicy::RequireAllReady);

        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let u1 = UserId::from("u1");
        api.start_selection(&id, &u1).await.unwrap();
        api.update_selections(&id, &u1, vec![jollof(1)]).await.unwrap();

        let err = api.lock_lobby(&id, &u1).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::PreconditionFailed(_)));
        assert_eq!(api.lobby_status(&id).await.unwrap().phase, Phase::Selection);

        api.set_selection_status(&id, &u1, &u1, SelectionStatus::Ready).await.unwrap();
        let outcome = api.lock_lobby(&id, &u1).await.unwrap();
        assert_eq!(outcome.lobby.phase(), Phase::Locked);
    }

    /// A materializer that fails a configurable number of times before succeeding, counting its invocations.
    #[derive(Clone)]
    struct FlakyMaterializer {
        calls: Arc<AtomicUsize>,
        failures: usize,
    }

    impl OrderMaterializer for FlakyMaterializer {
        async fn materialize(&self, _lobby: &LobbyState) -> Result<OrderId, MaterializeError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(MaterializeError::Unavailable("order service timeout".to_string()))
            } else {
                Ok(OrderId("order_test_1".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn failed_materialization_rolls_the_lock_back() {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let materializer = FlakyMaterializer { calls: calls.clone(), failures: 1 };
        let api = LobbyFlowApi::new(db, materializer, EventProducers::default());

        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        let id = lobby.order.group_order_id.clone();
        let u1 = UserId::from("u1");
        api.start_selection(&id, &u1).await.unwrap();
        api.update_selections(&id, &u1, vec![jollof(1)]).await.unwrap();

        let err = api.lock_lobby(&id, &u1).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::MaterializeError(_)));
        // The phase change was rolled back with the failed transaction, so the lock can be retried.
        assert_eq!(api.lobby_status(&id).await.unwrap().phase, Phase::Selection);

        let outcome = api.lock_lobby(&id, &u1).await.unwrap();
        assert_eq!(outcome.placed_order_id.as_str(), "order_test_1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn abandoned_lobbies_expire_and_reject_mutations() {
        let api = new_test_api().await;
        let lobby = api
            .create_lobby(marias_kitchen("u1", 1000).with_expiry(Duration::hours(1)))
            .await
            .unwrap();
        let id = lobby.order.group_order_id.clone();

        let expired = api.expire_old_lobbies(Utc::now()).await.unwrap();
        assert!(expired.is_empty());

        let expired = api.expire_old_lobbies(Utc::now() + Duration::hours(2)).await.unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].group_order_id, id);

        let err = api.contribute_budget(&id, &UserId::from("u1"), Pence::from(500)).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::LobbyExpired(_)));
    }

    #[tokio::test]
    async fn share_token_resolves_the_lobby() {
        let api = new_test_api().await;
        let lobby = api.create_lobby(marias_kitchen("u1", 1000)).await.unwrap();
        let found = api.fetch_lobby_by_share_token(&lobby.order.share_token).await.unwrap().unwrap();
        assert_eq!(found.order.group_order_id, lobby.order.group_order_id);
        assert!(api.fetch_lobby_by_share_token("no-such-token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_lobbies_are_not_found() {
        let api = new_test_api().await;
        let missing = GroupOrderId("GRP-0-NOPE".to_string());
        let err = api.lobby_status(&missing).await.unwrap_err();
        assert!(matches!(err, GroupOrderError::LobbyNotFound(_)));
    }
}
