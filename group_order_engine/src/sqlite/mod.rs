//! SQLite database module for the group order engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;

/// The engine's embedded migrations. Run these against a fresh pool before serving traffic.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
