//! Skill directory: creation, batch-add, and category classification.
//!
//! Batch-add feeds from the role-gap analyzer's suggestions. Each creation
//! is independent; a candidate that duplicates an existing skill name
//! (case-insensitively) is skipped without affecting its siblings.
//!
//! Categories are assigned by a static keyword table over the skill name.
//! When no keyword matches, the analyzer's category hint is honored if it
//! parses to a known category; otherwise the fallback category applies.

use chrono::{DateTime, Utc};
use tracing::debug;

use skillforge_types::{Skill, SkillCategory, SkillSuggestion, TargetProficiency, UserId};

/// Keyword fragments mapped to categories, checked in order against the
/// lowercased skill name.
const CATEGORY_KEYWORDS: &[(&str, SkillCategory)] = &[
    // --- Frontend ---
    ("react", SkillCategory::Frontend),
    ("vue", SkillCategory::Frontend),
    ("angular", SkillCategory::Frontend),
    ("svelte", SkillCategory::Frontend),
    ("css", SkillCategory::Frontend),
    ("html", SkillCategory::Frontend),
    ("tailwind", SkillCategory::Frontend),
    ("next", SkillCategory::Frontend),
    ("frontend", SkillCategory::Frontend),
    // --- Backend ---
    ("node", SkillCategory::Backend),
    ("express", SkillCategory::Backend),
    ("django", SkillCategory::Backend),
    ("flask", SkillCategory::Backend),
    ("spring", SkillCategory::Backend),
    ("graphql", SkillCategory::Backend),
    ("sql", SkillCategory::Backend),
    ("mongo", SkillCategory::Backend),
    ("postgres", SkillCategory::Backend),
    ("redis", SkillCategory::Backend),
    ("api", SkillCategory::Backend),
    ("backend", SkillCategory::Backend),
    // --- Tools ---
    ("docker", SkillCategory::Tools),
    ("kubernetes", SkillCategory::Tools),
    ("git", SkillCategory::Tools),
    ("terraform", SkillCategory::Tools),
    ("aws", SkillCategory::Tools),
    ("azure", SkillCategory::Tools),
    ("linux", SkillCategory::Tools),
    ("ci/cd", SkillCategory::Tools),
    ("jenkins", SkillCategory::Tools),
    // --- Soft skills ---
    ("communication", SkillCategory::SoftSkills),
    ("leadership", SkillCategory::SoftSkills),
    ("mentoring", SkillCategory::SoftSkills),
    ("negotiation", SkillCategory::SoftSkills),
    ("presentation", SkillCategory::SoftSkills),
    ("teamwork", SkillCategory::SoftSkills),
    // --- Languages ---
    ("python", SkillCategory::Languages),
    ("rust", SkillCategory::Languages),
    ("golang", SkillCategory::Languages),
    ("java", SkillCategory::Languages),
    ("typescript", SkillCategory::Languages),
    ("javascript", SkillCategory::Languages),
    ("c++", SkillCategory::Languages),
    ("c#", SkillCategory::Languages),
    ("kotlin", SkillCategory::Languages),
    ("swift", SkillCategory::Languages),
];

/// Classify a skill name via the keyword table.
///
/// `hint` is consulted only when no keyword matches; it must spell a
/// category exactly (the analyzer frequently invents labels like
/// `"Recommended"`, which fall through to the fallback).
pub fn classify(name: &str, hint: Option<&str>) -> SkillCategory {
    let lowered = name.to_lowercase();
    for (keyword, category) in CATEGORY_KEYWORDS {
        if lowered.contains(keyword) {
            return *category;
        }
    }

    // "go" is too short for substring matching; require an exact token.
    if lowered.split_whitespace().any(|token| token == "go") {
        return SkillCategory::Languages;
    }

    hint.and_then(parse_category).unwrap_or(SkillCategory::FALLBACK)
}

/// Parse a category label as the analyzer or an older client would spell it.
fn parse_category(label: &str) -> Option<SkillCategory> {
    match label.trim().to_lowercase().as_str() {
        "frontend" => Some(SkillCategory::Frontend),
        "backend" => Some(SkillCategory::Backend),
        "tools" => Some(SkillCategory::Tools),
        "soft skills" | "softskills" => Some(SkillCategory::SoftSkills),
        "languages" => Some(SkillCategory::Languages),
        _ => None,
    }
}

/// Whether `name` already exists in the skill set (case-insensitive).
pub fn name_taken(existing: &[Skill], name: &str) -> bool {
    let lowered = name.to_lowercase();
    existing
        .iter()
        .any(|skill| skill.name.to_lowercase() == lowered)
}

/// Create skills from analyzer suggestions, skipping duplicates.
///
/// Every accepted suggestion becomes a fresh skill at the bottom of the
/// ladder. Candidates are also deduplicated against each other, so a
/// suggestion list that repeats a name yields one skill.
pub fn add_skills_from_suggestions(
    owner: &UserId,
    existing: &[Skill],
    suggestions: &[SkillSuggestion],
    now: DateTime<Utc>,
) -> Vec<Skill> {
    let mut created: Vec<Skill> = Vec::new();

    for suggestion in suggestions {
        let name = suggestion.name.trim();
        if name.is_empty() {
            continue;
        }
        if name_taken(existing, name) || name_taken(&created, name) {
            debug!(skill = name, "skipping duplicate suggestion");
            continue;
        }

        let category = classify(name, suggestion.category_hint.as_deref());
        created.push(Skill::new(
            owner.clone(),
            String::from(name),
            category,
            TargetProficiency::default(),
            Vec::new(),
            now,
        ));
    }

    created
}
