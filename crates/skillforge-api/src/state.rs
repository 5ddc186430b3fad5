//! Shared application state for the API server.
//!
//! [`AppState`] holds the document store, the live challenge sessions, and
//! the configured coach. Sessions are transient: they live only in this
//! map, are replaced when a user re-enters the same skill, and are dropped
//! on terminal results. Nothing about a session survives a restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use skillforge_coach::Coach;
use skillforge_engine::ChallengeSession;
use skillforge_types::{SessionId, UserId};

use crate::store::DocumentStore;

/// A live challenge session plus the user driving it.
pub struct ActiveSession {
    /// The user who opened the session.
    pub user: UserId,
    /// The engine-side session state machine.
    pub session: ChallengeSession,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
pub struct AppState {
    /// Persistent documents: skills and ledgers.
    pub store: DocumentStore,
    /// Live challenge sessions keyed by session id.
    pub sessions: RwLock<BTreeMap<SessionId, ActiveSession>>,
    /// The LLM collaborator layer.
    pub coach: Coach,
}

impl AppState {
    /// Build fresh state around a configured coach.
    pub fn new(coach: Coach) -> Arc<Self> {
        Arc::new(Self {
            store: DocumentStore::new(),
            sessions: RwLock::new(BTreeMap::new()),
            coach,
        })
    }
}
