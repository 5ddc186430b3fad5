//! HTTP API server for the SkillForge progression engine.
//!
//! A thin Axum service over the pure domain engine: handlers load
//! aggregates from the in-memory document store, invoke engine commands,
//! write results back, and serialize responses. LLM collaborators are
//! reached through the coach crate between lock scopes.
//!
//! The React client is the only intended consumer; it renders entirely
//! from these responses and issues commands, holding no domain logic of
//! its own.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod store;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
pub use store::DocumentStore;
