//! Error types for the API layer.
//!
//! [`ApiError`] unifies engine, coach, and HTTP-level failures into a
//! single enum convertible into an Axum response. Domain rule violations
//! map to client-errors; collaborator outages map to 502 so the client
//! can distinguish "you can't" from "we can't right now".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use skillforge_coach::CoachError;
use skillforge_engine::EngineError;

/// Errors that can occur while serving an API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested skill, ledger, or session does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request body or parameters are invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// An LLM collaborator failed; the operation can be retried.
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoachError> for ApiError {
    fn from(err: CoachError) -> Self {
        Self::CollaboratorUnavailable(err.to_string())
    }
}

impl ApiError {
    /// The HTTP status this error maps to.
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Engine(engine) => match engine {
                EngineError::InsufficientBalance { .. }
                | EngineError::AlreadyOwned(_)
                | EngineError::UnknownItem(_)
                | EngineError::InvalidLevel(_)
                | EngineError::HintsExhausted => StatusCode::BAD_REQUEST,
                EngineError::NotOwned(_) => StatusCode::FORBIDDEN,
                EngineError::LockedSkill { .. }
                | EngineError::LevelNotUnlocked { .. }
                | EngineError::InvalidSessionPhase { .. } => StatusCode::CONFLICT,
                EngineError::ArithmeticOverflow { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CollaboratorUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::Serialization(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_client_statuses() {
        let err = ApiError::Engine(EngineError::InsufficientBalance {
            requested: 200,
            available: 150,
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::Engine(EngineError::NotOwned(String::from("title-architect")));
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err = ApiError::Engine(EngineError::LockedSkill {
            reason: String::from("Need Docker Lvl.5"),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn coach_errors_are_bad_gateway() {
        let err = ApiError::from(CoachError::Backend(String::from("timeout")));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn not_found_is_404() {
        assert_eq!(
            ApiError::NotFound(String::from("skill")).status(),
            StatusCode::NOT_FOUND
        );
    }
}
