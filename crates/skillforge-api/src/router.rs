//! Axum router construction.
//!
//! Assembles all routes into a single [`Router`] with CORS and request
//! tracing enabled. CORS allows any origin for development; restrict it
//! in production.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the API server.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // Skill directory. GET takes a user id, PUT/DELETE a skill id;
        // one parameterized path serves all three, as the original API did.
        .route("/api/skills", post(handlers::skills::create))
        .route("/api/skills/batch", post(handlers::skills::batch_add))
        .route(
            "/api/skills/{id}",
            get(handlers::skills::overview)
                .put(handlers::skills::update)
                .delete(handlers::skills::delete),
        )
        // Shop and economy
        .route("/api/shop/items", get(handlers::shop::list_items))
        .route("/api/shop/buy", post(handlers::shop::buy))
        .route("/api/shop/equip", post(handlers::shop::equip))
        .route("/api/users/penalize", post(handlers::shop::penalize))
        // Challenge sessions
        .route("/api/challenges/start", post(handlers::sessions::start))
        .route("/api/challenges/{id}/hint", post(handlers::sessions::hint))
        .route(
            "/api/challenges/{id}/submit",
            post(handlers::sessions::submit),
        )
        .route(
            "/api/challenges/{id}/visibility",
            post(handlers::sessions::visibility),
        )
        // Advisory collaborators
        .route("/api/ai/skill-gap", post(handlers::advisory::skill_gap))
        .route(
            "/api/ai/recommend-resources",
            post(handlers::advisory::recommend_resources),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
