//! Group Order Engine
//!
//! The group order engine is the core of CribNosh's shared-cart feature: several customers pool budget against a
//! single home-cook, choose meals together, and check out as one payable order. This library contains the full
//! lifecycle logic and is transport-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`SqliteDatabase`]). SQLite is the supported backend. You should never need to
//!    access the database directly. Instead, use the public API provided by the engine. The exception is the data
//!    types used in the database. These are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@goe_api`]). This provides the public-facing functionality of the engine: lobby
//!    creation, the participant ledger, the budget pool and the phase state machine. Specific backends need to
//!    implement the traits in the [`mod@traits`] module in order to drive the lifecycle.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted when certain
//! actions occur within a lobby: a phase change, a budget update, the final lock. A simple actor framework is
//! used so that you can easily hook into these events and perform custom actions (this is the push channel that
//! keeps lobby screens live without polling).
pub mod db_types;
pub mod events;
pub mod goe_api;
pub mod helpers;
mod order_service;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use order_service::LocalOrderService;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteDatabase, MIGRATOR};
pub use goe_api::{
    lobby_flow_api::LobbyFlowApi,
    lobby_objects::{BudgetSummary, Contribution, LobbyState, LobbyStatus},
};
pub use traits::{
    GroupOrderDatabase,
    GroupOrderError,
    LobbyReadModel,
    LockOutcome,
    LockPolicy,
    MaterializeError,
    OrderMaterializer,
};
