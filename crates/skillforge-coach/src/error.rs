//! Error types for the coach crate.
//!
//! Collaborator failures are non-fatal by contract: the engine never
//! mutates state on a coach error, and the API layer decides between
//! aborting a session (generator), offering a retry (grader), or
//! degrading to empty advice (recommender, gap analyzer).

/// Errors that can occur while talking to an LLM collaborator.
#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    /// The backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    Backend(String),

    /// A prompt template failed to load or render.
    #[error("template error: {0}")]
    Template(String),

    /// The model's response could not be parsed into the expected shape.
    #[error("response parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
