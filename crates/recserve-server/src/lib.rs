//! Recommendation Serving JSON-RPC Server Library
//!
//! Newline-delimited JSON-RPC 2.0 over stdio, exposing the recserve
//! operations (`similar_items`, `recommendations_offline`,
//! `recommendations_online`, `recommendations`) plus the in-memory event
//! store and lifecycle methods.
//!
//! This library exposes the handlers and protocol types for integration testing.

pub mod handlers;
pub mod protocol;
pub mod server;

pub use handlers::Handlers;
pub use server::RecServer;
