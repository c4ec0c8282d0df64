use std::fmt::Display;

use group_order_engine::db_types::{MealSelection, OrderId, Phase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLobbyRequest {
    pub restaurant_name: String,
    #[serde(default)]
    pub title: Option<String>,
    /// The creator's opening contribution, in pence.
    #[serde(default)]
    pub initial_budget: i64,
    #[serde(default)]
    pub expires_in_hours: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// The joiner's opening contribution, in pence.
    #[serde(default)]
    pub initial_budget: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributeRequest {
    /// The participant's (total, not incremental) contribution, in pence.
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionsRequest {
    pub selections: Vec<MealSelection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyRequest {
    pub ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockResponse {
    pub phase: Phase,
    pub placed_order_id: OrderId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}
