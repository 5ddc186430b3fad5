//! Enumeration types for the SkillForge engine.
//!
//! The variants and their wire spellings are fixed: skill documents written
//! by earlier versions of the product use the human-readable strings (e.g.
//! `"Soft Skills"`), so the serde renames here are load-bearing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Skill category
// ---------------------------------------------------------------------------

/// The fixed category a skill belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SkillCategory {
    /// Client-side web technologies (frameworks, styling, accessibility).
    Frontend,
    /// Server-side technologies (APIs, databases, queues).
    Backend,
    /// Developer tooling and infrastructure (VCS, containers, CI).
    Tools,
    /// Interpersonal and organizational skills.
    #[serde(rename = "Soft Skills")]
    SoftSkills,
    /// Programming languages themselves.
    Languages,
}

impl SkillCategory {
    /// The category assigned when classification finds no keyword match.
    pub const FALLBACK: Self = Self::Tools;
}

// ---------------------------------------------------------------------------
// Target proficiency
// ---------------------------------------------------------------------------

/// The proficiency level a user is aiming for on a skill.
///
/// Advisory display state; nothing in the engine gates on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TargetProficiency {
    /// Just getting started.
    Beginner,
    /// Comfortable day-to-day use.
    Intermediate,
    /// Deep command of the skill.
    Expert,
}

impl Default for TargetProficiency {
    fn default() -> Self {
        Self::Intermediate
    }
}

// ---------------------------------------------------------------------------
// Shop item kind
// ---------------------------------------------------------------------------

/// The slot a cosmetic shop item occupies.
///
/// Exactly one item of each kind is equipped at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// An editor/UI color theme.
    Theme,
    /// A profile title shown next to the user's name.
    Title,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_skills_wire_spelling() {
        let json = serde_json::to_string(&SkillCategory::SoftSkills).unwrap_or_default();
        assert_eq!(json, "\"Soft Skills\"");

        let parsed: Result<SkillCategory, _> = serde_json::from_str("\"Soft Skills\"");
        assert_eq!(parsed.ok(), Some(SkillCategory::SoftSkills));
    }

    #[test]
    fn item_kind_is_lowercase_on_the_wire() {
        let json = serde_json::to_string(&ItemKind::Theme).unwrap_or_default();
        assert_eq!(json, "\"theme\"");
    }

    #[test]
    fn default_target_is_intermediate() {
        assert_eq!(TargetProficiency::default(), TargetProficiency::Intermediate);
    }
}
