//! Prerequisite lock resolution.
//!
//! A skill may declare prerequisites on other skills in the same user's
//! set. Resolution is single-hop and consults only the first declared
//! prerequisite; the list shape exists for document compatibility, and the
//! resolver deliberately preserves the observed first-entry behavior.
//! Because resolution never recurses into the parent's own prerequisites,
//! cyclic declarations cannot loop the engine.
//!
//! The comparison runs against the parent's *derived level*, computed from
//! the legacy 0..=100 progress number: `floor(percent / 5) + 1`, capped at
//! the top of the ladder.

use std::collections::BTreeMap;

use skillforge_types::{LockState, Skill};

use crate::progression::MAX_LEVEL;

/// Derived prerequisite level from a legacy progress percent.
///
/// `floor(percent / 5) + 1`, capped at [`MAX_LEVEL`]. A freshly created
/// skill (percent 5) therefore reads as derived level 2.
pub const fn derived_level(progress_percent: u32) -> u32 {
    let level = (progress_percent / 5).saturating_add(1);
    if level > MAX_LEVEL { MAX_LEVEL } else { level }
}

/// Build a lowercase-name index over a user's skill set.
///
/// Prerequisite names match case-insensitively, so lookups go through this
/// index rather than raw names.
pub fn index_by_name(skills: &[Skill]) -> BTreeMap<String, &Skill> {
    skills
        .iter()
        .map(|skill| (skill.name.to_lowercase(), skill))
        .collect()
}

/// Compute the lock state of a skill against the user's full skill set.
///
/// - No prerequisites: unlocked.
/// - First prerequisite names an absent skill: locked, `"missing <name>"`.
/// - Present but under-leveled parent: locked, `"Need <name> Lvl.<n>"`.
/// - Otherwise: unlocked.
///
/// A locked skill cannot enter the progression state machine for any
/// level; callers may still display it.
pub fn resolve_lock(skill: &Skill, skills_by_name: &BTreeMap<String, &Skill>) -> LockState {
    let Some(prereq) = skill.prerequisites.first() else {
        return LockState::UNLOCKED;
    };

    let Some(parent) = skills_by_name.get(&prereq.required_skill_name.to_lowercase()) else {
        return LockState::locked(format!("missing {}", prereq.required_skill_name));
    };

    if derived_level(parent.progress_percent) < prereq.required_level {
        return LockState::locked(format!(
            "Need {} Lvl.{}",
            prereq.required_skill_name, prereq.required_level
        ));
    }

    LockState::UNLOCKED
}
