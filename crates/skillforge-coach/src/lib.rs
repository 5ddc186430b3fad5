//! LLM collaborators for the SkillForge engine.
//!
//! Four narrow contracts sit between the engine and whatever model is
//! configured:
//!
//! - **Challenge generator**: `(skill, level) -> Challenge`
//! - **Challenge grader**: `(description, code, attempt_count) -> GradeReport`
//! - **Resource recommender**: `(skill) -> [LearningResource]` (advisory)
//! - **Role gap analyzer**: `(skills, role) -> [SkillSuggestion]` (advisory)
//!
//! # Pipeline
//!
//! ```text
//! Prompt Engine (minijinja) --> LLM Backend (HTTP) --> Parser --> typed payload
//! ```
//!
//! Responses are validated and repaired at the parse boundary; nothing
//! downstream ever sees raw model output. Failures are surfaced as
//! [`CoachError`] and never mutate engine state -- the API layer decides
//! whether to abort, retry, or degrade.

pub mod config;
pub mod error;
pub mod llm;
pub mod parse;
pub mod prompt;

pub use config::{BackendType, CoachConfig, LlmBackendConfig};
pub use error::CoachError;
pub use prompt::{PromptEngine, PromptKind, RenderedPrompt};

use tracing::debug;

use skillforge_types::{Challenge, GradeReport, LearningResource, SkillSuggestion};

use crate::llm::{LlmBackend, create_backend};

/// Sampling temperature for challenge generation.
const GENERATION_TEMPERATURE: f64 = 0.6;

/// Sampling temperature for grading. Near-deterministic on purpose.
const GRADING_TEMPERATURE: f64 = 0.1;

/// Sampling temperature for advisory calls (resources, gap analysis).
const ADVISORY_TEMPERATURE: f64 = 0.7;

/// Per-level difficulty labels for the 20-level ladder.
///
/// Boss levels (5, 10, 15, 20) carry the `BOSS` flavor the generator
/// turns into harder challenges.
pub const DIFFICULTY_LADDER: [&str; 20] = [
    "Novice",
    "Novice",
    "Beginner",
    "Beginner",
    "BOSS: Basic",
    "Intermediate",
    "Intermediate",
    "Adept",
    "Adept",
    "BOSS: Problem Solving",
    "Advanced",
    "Advanced",
    "Expert",
    "Expert",
    "BOSS: System Design",
    "Master",
    "Master",
    "Grandmaster",
    "Grandmaster",
    "FINAL BOSS",
];

/// The difficulty label for a ladder level (1-based; out-of-range input
/// clamps to the nearest end).
pub fn difficulty_for_level(level: u32) -> &'static str {
    let index = usize::try_from(level.saturating_sub(1)).unwrap_or(0);
    DIFFICULTY_LADDER
        .get(index.min(19))
        .copied()
        .unwrap_or("Novice")
}

/// The coach: prompt engine plus one configured LLM backend.
pub struct Coach {
    backend: LlmBackend,
    prompts: PromptEngine,
}

impl Coach {
    /// Build a coach from explicit configuration.
    pub fn new(config: &CoachConfig) -> Result<Self, CoachError> {
        let prompts = PromptEngine::new(&config.templates_dir)?;
        let backend = create_backend(&config.backend);
        debug!(backend = backend.name(), "coach configured");
        Ok(Self { backend, prompts })
    }

    /// Build a coach from environment variables.
    pub fn from_env() -> Result<Self, CoachError> {
        Self::new(&CoachConfig::from_env()?)
    }

    /// Generate a challenge for one level of one skill.
    pub async fn generate_challenge(
        &self,
        skill_name: &str,
        level: u32,
    ) -> Result<Challenge, CoachError> {
        let difficulty = difficulty_for_level(level);
        let prompt = self.prompts.render_challenge(skill_name, level, difficulty)?;
        let raw = self.backend.complete(&prompt, GENERATION_TEMPERATURE).await?;
        parse::parse_challenge(&raw)
    }

    /// Grade a submitted solution.
    pub async fn grade_submission(
        &self,
        description: &str,
        submitted_code: &str,
        attempt_count: u32,
    ) -> Result<GradeReport, CoachError> {
        let prompt = self
            .prompts
            .render_grade(description, submitted_code, attempt_count)?;
        let raw = self.backend.complete(&prompt, GRADING_TEMPERATURE).await?;
        parse::parse_grade(&raw)
    }

    /// Recommend learning resources for a skill. Advisory.
    pub async fn suggest_resources(
        &self,
        skill_name: &str,
    ) -> Result<Vec<LearningResource>, CoachError> {
        let prompt = self.prompts.render_resources(skill_name)?;
        let raw = self.backend.complete(&prompt, ADVISORY_TEMPERATURE).await?;
        parse::parse_resources(&raw)
    }

    /// Identify missing skills for a target role. Advisory.
    pub async fn analyze_role_gap(
        &self,
        current_skill_names: &[String],
        target_role: &str,
    ) -> Result<Vec<SkillSuggestion>, CoachError> {
        let prompt = self
            .prompts
            .render_skill_gap(current_skill_names, target_role)?;
        let raw = self.backend.complete(&prompt, ADVISORY_TEMPERATURE).await?;
        parse::parse_suggestions(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted_coach() -> Option<Coach> {
        let config = CoachConfig {
            backend: LlmBackendConfig {
                backend_type: BackendType::Scripted,
                api_url: String::new(),
                api_key: String::new(),
                model: String::from("scripted"),
            },
            templates_dir: format!("{}/templates", env!("CARGO_MANIFEST_DIR")),
        };
        Coach::new(&config).ok()
    }

    #[test]
    fn difficulty_ladder_covers_every_level() {
        assert_eq!(difficulty_for_level(1), "Novice");
        assert_eq!(difficulty_for_level(5), "BOSS: Basic");
        assert_eq!(difficulty_for_level(10), "BOSS: Problem Solving");
        assert_eq!(difficulty_for_level(15), "BOSS: System Design");
        assert_eq!(difficulty_for_level(20), "FINAL BOSS");
        // Out-of-range clamps instead of panicking.
        assert_eq!(difficulty_for_level(0), "Novice");
        assert_eq!(difficulty_for_level(99), "FINAL BOSS");
    }

    #[tokio::test]
    async fn scripted_pipeline_generates_a_challenge() {
        let Some(coach) = scripted_coach() else {
            // Template directory must exist in the repo.
            assert!(scripted_coach().is_some());
            return;
        };

        let challenge = coach.generate_challenge("Docker", 5).await;
        assert!(challenge.is_ok());
        let Ok(challenge) = challenge else { return };
        assert!(!challenge.title.is_empty());
        assert_eq!(challenge.hints.len(), 2);
        // The camelCase starterCode key from the wire is normalized.
        assert!(challenge.starter_code.contains("TODO"));
    }

    #[tokio::test]
    async fn scripted_grader_judges_todo_markers() {
        let Some(coach) = scripted_coach() else {
            assert!(scripted_coach().is_some());
            return;
        };

        let fail = coach
            .grade_submission("Implement it.", "// TODO: implement", 0)
            .await;
        assert!(matches!(fail, Ok(GradeReport { passed: false, .. })));

        let pass = coach
            .grade_submission("Implement it.", "fn done() -> u32 { 42 }", 1)
            .await;
        assert!(matches!(
            pass,
            Ok(GradeReport {
                passed: true,
                stars: 2,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn scripted_advisors_return_normalized_lists() {
        let Some(coach) = scripted_coach() else {
            assert!(scripted_coach().is_some());
            return;
        };

        let suggestions = coach
            .analyze_role_gap(&[String::from("React")], "DevOps Engineer")
            .await
            .unwrap_or_default();
        assert_eq!(suggestions.len(), 3);

        let resources = coach.suggest_resources("Docker").await.unwrap_or_default();
        assert_eq!(resources.len(), 2);
    }
}
