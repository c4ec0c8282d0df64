//! # CribNosh group order server
//! This crate hosts the REST front-end for the group order engine. It is responsible for:
//! * Verifying the caller's access token and turning it into an explicit principal.
//! * Translating HTTP requests into engine API calls and engine errors into HTTP status codes.
//! * Running the background sweep that expires abandoned lobbies.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! All lobby routes live under `/api` and require a bearer token. See [routes] for the full list.
pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod expiry_worker;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
