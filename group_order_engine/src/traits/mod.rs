//! # Backend contracts for the group order engine.
//!
//! This module defines the interface contracts that database *backends* must expose in order to drive the group
//! order lifecycle.
//!
//! ## The aggregate
//! A group order lobby is the unit of consistency: one `group_orders` row plus its `participants` rows. Backends
//! must serialize all mutations to a single lobby (the SQLite backend does this with one transaction per
//! mutation), so two participants contributing budget concurrently can never destroy each other's writes.
//!
//! ## Traits
//! * [`GroupOrderDatabase`] defines the mutation side: creating lobbies, joining, contributing budget, phase
//!   transitions and the lock-and-record step.
//! * [`LobbyReadModel`] provides the read-side queries: full lobby state and the cheap phase/budget status
//!   summary that clients poll or subscribe to.
//! * [`OrderMaterializer`] is the boundary to the (external) order service that converts a locked lobby into a
//!   single payable order.
mod group_order_database;
mod lobby_read_model;
mod materializer;

pub use group_order_database::{GroupOrderDatabase, GroupOrderError, LockOutcome, LockPolicy};
pub use lobby_read_model::LobbyReadModel;
pub use materializer::{MaterializeError, OrderMaterializer};
