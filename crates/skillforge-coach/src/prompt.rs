//! Prompt template loading and rendering via `minijinja`.
//!
//! User-message templates are loaded from the filesystem so prompts can be
//! tuned without recompiling. System messages are fixed output contracts
//! compiled into the binary: they pin the JSON shapes the parser expects,
//! so they are deliberately not operator-editable.

use minijinja::Environment;

use crate::error::CoachError;

/// Which collaborator a rendered prompt belongs to.
///
/// Carried on the prompt so backends that do not inspect text (the
/// scripted backend) can still answer in the right shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Challenge generation for one skill level.
    Challenge,
    /// Grading a submitted solution.
    Grade,
    /// Role gap analysis.
    SkillGap,
    /// Learning resource recommendation.
    Resources,
}

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// The collaborator this prompt serves.
    pub kind: PromptKind,
    /// System message: persona and output contract.
    pub system: String,
    /// User message carrying the request data.
    pub user: String,
}

/// System message for challenge generation.
const SYSTEM_CHALLENGE: &str = "You are a coding-challenge author. Output strictly valid JSON \
     only, as an object: { \"title\": \"...\", \"description\": \"...\", \"starterCode\": \
     \"...\", \"hints\": [\"...\"] }. Do not output markdown or explanations.";

/// System message for grading.
const SYSTEM_GRADE: &str = "Evaluate the submitted code against the challenge. Return strictly \
     valid JSON: { \"passed\": boolean, \"stars\": number (0-3), \"feedback\": \"string\" }.";

/// System message for role gap analysis.
const SYSTEM_SKILL_GAP: &str =
    "You are a career coach. Output strictly valid JSON only, as an object with a single key \
     \"suggestions\" holding an array of { \"name\": \"...\", \"category\": \"...\" }.";

/// System message for resource recommendation.
const SYSTEM_RESOURCES: &str = "You are a curriculum curator. Output strictly valid JSON only, \
     as an object: { \"resources\": [{ \"title\": \"...\", \"url\": \"...\" }] }.";

/// Manages prompt template loading and rendering.
///
/// Wraps a `minijinja` [`Environment`] with the four collaborator
/// templates pre-loaded. Templates can be edited on disk and are picked
/// up on the next [`PromptEngine::new`].
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Create a prompt engine loading templates from the given directory.
    ///
    /// The directory must contain `challenge.j2`, `grade.j2`,
    /// `skill_gap.j2`, and `resources.j2`.
    pub fn new(templates_dir: &str) -> Result<Self, CoachError> {
        let mut env = Environment::new();

        for name in ["challenge", "grade", "skill_gap", "resources"] {
            let body = load_template(templates_dir, &format!("{name}.j2"))?;
            env.add_template_owned(String::from(name), body)
                .map_err(|e| CoachError::Template(format!("failed to add {name} template: {e}")))?;
        }

        Ok(Self { env })
    }

    /// Render the challenge-generation prompt for one skill level.
    pub fn render_challenge(
        &self,
        skill_name: &str,
        level: u32,
        difficulty: &str,
    ) -> Result<RenderedPrompt, CoachError> {
        let user = self.render(
            "challenge",
            &serde_json::json!({
                "skill": skill_name,
                "level": level,
                "difficulty": difficulty,
            }),
        )?;
        Ok(RenderedPrompt {
            kind: PromptKind::Challenge,
            system: String::from(SYSTEM_CHALLENGE),
            user,
        })
    }

    /// Render the grading prompt for a submission.
    pub fn render_grade(
        &self,
        description: &str,
        submitted_code: &str,
        attempt_count: u32,
    ) -> Result<RenderedPrompt, CoachError> {
        let user = self.render(
            "grade",
            &serde_json::json!({
                "description": description,
                "code": submitted_code,
                "attempt_count": attempt_count,
            }),
        )?;
        Ok(RenderedPrompt {
            kind: PromptKind::Grade,
            system: String::from(SYSTEM_GRADE),
            user,
        })
    }

    /// Render the role gap analysis prompt.
    pub fn render_skill_gap(
        &self,
        current_skills: &[String],
        target_role: &str,
    ) -> Result<RenderedPrompt, CoachError> {
        let user = self.render(
            "skill_gap",
            &serde_json::json!({
                "current_skills": current_skills.join(", "),
                "target_role": target_role,
            }),
        )?;
        Ok(RenderedPrompt {
            kind: PromptKind::SkillGap,
            system: String::from(SYSTEM_SKILL_GAP),
            user,
        })
    }

    /// Render the resource recommendation prompt.
    pub fn render_resources(&self, skill_name: &str) -> Result<RenderedPrompt, CoachError> {
        let user = self.render("resources", &serde_json::json!({ "skill": skill_name }))?;
        Ok(RenderedPrompt {
            kind: PromptKind::Resources,
            system: String::from(SYSTEM_RESOURCES),
            user,
        })
    }

    /// Render one template with the given context.
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, CoachError> {
        self.env
            .get_template(name)
            .map_err(|e| CoachError::Template(format!("missing {name} template: {e}")))?
            .render(context)
            .map_err(|e| CoachError::Template(format!("{name} render failed: {e}")))
    }
}

/// Read a template file from disk.
fn load_template(dir: &str, filename: &str) -> Result<String, CoachError> {
    let path = format!("{dir}/{filename}");
    std::fs::read_to_string(&path)
        .map_err(|e| CoachError::Template(format!("failed to read {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipped_templates_dir() -> String {
        format!("{}/templates", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn shipped_templates_load_and_render() {
        let engine = PromptEngine::new(&shipped_templates_dir());
        assert!(engine.is_ok());
        let Ok(engine) = engine else { return };

        let prompt = engine.render_challenge("Docker", 5, "BOSS: Basic");
        assert!(prompt.is_ok());
        let Ok(prompt) = prompt else { return };
        assert_eq!(prompt.kind, PromptKind::Challenge);
        assert!(prompt.user.contains("Docker"));
        assert!(prompt.user.contains("BOSS: Basic"));
        assert!(prompt.system.contains("starterCode"));
    }

    #[test]
    fn grade_prompt_carries_the_submission() {
        let engine = PromptEngine::new(&shipped_templates_dir());
        let Ok(engine) = engine else {
            assert!(engine.is_ok());
            return;
        };

        let prompt = engine.render_grade("Reverse a list.", "fn main() {}", 2);
        let Ok(prompt) = prompt else {
            assert!(prompt.is_ok());
            return;
        };
        assert!(prompt.user.contains("Reverse a list."));
        assert!(prompt.user.contains("fn main() {}"));
        assert!(prompt.user.contains('2'));
    }

    #[test]
    fn missing_directory_is_a_template_error() {
        let result = PromptEngine::new("/nonexistent/templates");
        assert!(matches!(result, Err(CoachError::Template(_))));
    }

    #[test]
    fn skill_gap_prompt_joins_current_skills() {
        let engine = PromptEngine::new(&shipped_templates_dir());
        let Ok(engine) = engine else {
            assert!(engine.is_ok());
            return;
        };

        let skills = vec![String::from("React"), String::from("CSS")];
        let prompt = engine.render_skill_gap(&skills, "Backend Engineer");
        let Ok(prompt) = prompt else {
            assert!(prompt.is_ok());
            return;
        };
        assert!(prompt.user.contains("React, CSS"));
        assert!(prompt.user.contains("Backend Engineer"));
    }
}
