use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use cn_common::{Pence, GBP_CURRENCY_CODE};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

//--------------------------------------     GroupOrderId      -------------------------------------------------------
/// The public, opaque identifier for a group order lobby, e.g. `GRP-1722500000000-9XKQ2F`. Assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct GroupOrderId(pub String);

impl FromStr for GroupOrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for GroupOrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for GroupOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl GroupOrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------        UserId         -------------------------------------------------------
/// A lightweight wrapper around the identifier issued by the (external) identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct UserId(pub String);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------        OrderId        -------------------------------------------------------
/// The identifier of a materialized (payable) order, as assigned by the order service.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------         Phase         -------------------------------------------------------
/// The lifecycle phase of a group order. Transitions are strictly forward-only:
/// `Budgeting` → `Selection` → `Locked`. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum Phase {
    /// The lobby is open. Participants may join and pool budget.
    Budgeting,
    /// The budget is fixed. Participants choose meals and mark themselves ready.
    Selection,
    /// Terminal. The lobby has been converted into a single payable order.
    Locked,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Budgeting => write!(f, "Budgeting"),
            Phase::Selection => write!(f, "Selection"),
            Phase::Locked => write!(f, "Locked"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid phase: {0}")]
pub struct PhaseConversionError(String);

impl FromStr for Phase {
    type Err = PhaseConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Budgeting" => Ok(Self::Budgeting),
            "Selection" => Ok(Self::Selection),
            "Locked" => Ok(Self::Locked),
            s => Err(PhaseConversionError(s.to_string())),
        }
    }
}

impl From<String> for Phase {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid phase: {value}. But this conversion cannot fail. Defaulting to Budgeting");
            Phase::Budgeting
        })
    }
}

impl Phase {
    /// The only legal forward step from this phase, if any.
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Budgeting => Some(Phase::Selection),
            Phase::Selection => Some(Phase::Locked),
            Phase::Locked => None,
        }
    }
}

//--------------------------------------    SelectionStatus    -------------------------------------------------------
/// A participant's per-user readiness flag. Only meaningful while the lobby is in the `Selection` phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum SelectionStatus {
    NotReady,
    Ready,
}

impl Display for SelectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionStatus::NotReady => write!(f, "NotReady"),
            SelectionStatus::Ready => write!(f, "Ready"),
        }
    }
}

impl FromStr for SelectionStatus {
    type Err = PhaseConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotReady" => Ok(Self::NotReady),
            "Ready" => Ok(Self::Ready),
            s => Err(PhaseConversionError(format!("Invalid selection status: {s}"))),
        }
    }
}

impl From<String> for SelectionStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid selection status: {value}. But this conversion cannot fail. Defaulting to NotReady");
            SelectionStatus::NotReady
        })
    }
}

//--------------------------------------     MealSelection     -------------------------------------------------------
/// A single line item in a participant's meal selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSelection {
    pub meal_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Pence,
}

impl MealSelection {
    pub fn line_total(&self) -> Pence {
        self.unit_price * self.quantity
    }
}

//--------------------------------------      GroupOrder       -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GroupOrder {
    pub id: i64,
    pub group_order_id: GroupOrderId,
    pub created_by: UserId,
    pub restaurant_name: String,
    pub title: String,
    pub currency: String,
    pub phase: Phase,
    pub share_token: String,
    pub share_link: String,
    pub placed_order_id: Option<OrderId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expired_at: Option<DateTime<Utc>>,
}

impl GroupOrder {
    pub fn is_expired(&self) -> bool {
        self.expired_at.is_some()
    }

    pub fn is_locked(&self) -> bool {
        self.phase == Phase::Locked
    }
}

//--------------------------------------     NewGroupOrder     -------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewGroupOrder {
    /// The principal creating the lobby. They become the first participant and the only user able to advance phases.
    pub created_by: UserId,
    pub creator_name: String,
    pub restaurant_name: String,
    /// Display title. When `None`, a default of the form "Maria's group order from ..." is derived.
    pub title: Option<String>,
    /// The creator's opening budget contribution, in pence.
    pub initial_budget: Pence,
    /// How long the lobby stays open before the expiry sweep abandons it.
    pub expires_in: Duration,
}

impl NewGroupOrder {
    pub fn new(created_by: UserId, creator_name: String, restaurant_name: String, initial_budget: Pence) -> Self {
        Self {
            created_by,
            creator_name,
            restaurant_name,
            title: None,
            initial_budget,
            expires_in: Duration::hours(24),
        }
    }

    pub fn with_title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_expiry(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    pub fn currency(&self) -> &'static str {
        GBP_CURRENCY_CODE
    }
}

//--------------------------------------      Participant      -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub lobby_id: i64,
    pub user_id: UserId,
    pub display_name: String,
    pub initials: String,
    pub color_tag: String,
    pub budget_contribution: Pence,
    pub selections: Json<Vec<MealSelection>>,
    pub selection_status: SelectionStatus,
    pub joined_at: DateTime<Utc>,
    pub ready_at: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn is_ready(&self) -> bool {
        self.selection_status == SelectionStatus::Ready
    }

    pub fn selection_total(&self) -> Pence {
        self.selections.0.iter().map(MealSelection::line_total).sum()
    }

    pub fn has_selections(&self) -> bool {
        !self.selections.0.is_empty()
    }
}

//--------------------------------------    NewParticipant     -------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub user_id: UserId,
    pub display_name: String,
    /// An optional opening contribution made at join time.
    pub budget_contribution: Pence,
}

impl NewParticipant {
    pub fn new(user_id: UserId, display_name: String) -> Self {
        Self { user_id, display_name, budget_contribution: Pence::default() }
    }

    pub fn with_contribution(mut self, amount: Pence) -> Self {
        self.budget_contribution = amount;
        self
    }
}
