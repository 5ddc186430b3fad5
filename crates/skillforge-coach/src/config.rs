//! Configuration for the coach.
//!
//! Loaded from environment variables. One backend serves all four
//! collaborators; per-call knobs (temperature, prompt) are decided by the
//! coach itself.

use crate::error::CoachError;

/// Supported LLM backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible chat completions API (works with `OpenAI`, Groq,
    /// `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API (different request format).
    Anthropic,
    /// Deterministic offline responses; no network. Used in tests and when
    /// running without an API key.
    Scripted,
}

/// Configuration for the LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// The backend type.
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.groq.com/openai/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier (e.g. `llama-3.3-70b-versatile`).
    pub model: String,
}

/// Complete coach configuration.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    /// Backend connection settings.
    pub backend: LlmBackendConfig,
    /// Path to the prompt templates directory.
    pub templates_dir: String,
}

impl CoachConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LLM_BACKEND` -- `openai`, `anthropic`, or `scripted`
    ///   (default `scripted`, which needs no credentials)
    /// - `LLM_API_URL` -- base API URL (required unless scripted)
    /// - `LLM_API_KEY` -- API key (required unless scripted)
    /// - `LLM_MODEL` -- model name (required unless scripted)
    /// - `TEMPLATES_DIR` -- prompt templates path
    ///   (default `crates/skillforge-coach/templates`)
    pub fn from_env() -> Result<Self, CoachError> {
        let backend_str =
            std::env::var("LLM_BACKEND").unwrap_or_else(|_| String::from("scripted"));
        let backend_type = parse_backend_type(&backend_str)?;

        let backend = if backend_type == BackendType::Scripted {
            LlmBackendConfig {
                backend_type,
                api_url: String::new(),
                api_key: String::new(),
                model: String::from("scripted"),
            }
        } else {
            LlmBackendConfig {
                backend_type,
                api_url: env_var("LLM_API_URL")?,
                api_key: env_var("LLM_API_KEY")?,
                model: env_var("LLM_MODEL")?,
            }
        };

        let templates_dir = std::env::var("TEMPLATES_DIR")
            .unwrap_or_else(|_| String::from("crates/skillforge-coach/templates"));

        Ok(Self {
            backend,
            templates_dir,
        })
    }
}

/// Read a required environment variable.
fn env_var(name: &str) -> Result<String, CoachError> {
    std::env::var(name)
        .map_err(|e| CoachError::Config(format!("missing required env var {name}: {e}")))
}

/// Parse a backend type label.
fn parse_backend_type(label: &str) -> Result<BackendType, CoachError> {
    match label.to_lowercase().as_str() {
        "openai" | "groq" | "deepseek" | "ollama" => Ok(BackendType::OpenAi),
        "anthropic" | "claude" => Ok(BackendType::Anthropic),
        "scripted" | "offline" => Ok(BackendType::Scripted),
        other => Err(CoachError::Config(format!("unknown backend type: {other}"))),
    }
}
