//! The per-skill unlock ladder state machine.
//!
//! Twenty sequential levels per skill. A level may be attempted only while
//! the skill is unlocked and the level is at or below the unlock frontier
//! (no skipping ahead). Passing the frontier level advances it by one;
//! passing an earlier level only ever improves its star record. Failing
//! mutates nothing on the skill record.
//!
//! Every fifth level is a boss level: a difficulty flavor passed to the
//! challenge generator, with identical transition rules.

use chrono::{DateTime, Utc};
use tracing::info;

use skillforge_types::{LockState, Skill};

use crate::error::EngineError;

/// Top of the unlock ladder.
pub const MAX_LEVEL: u32 = 20;

/// Maximum stars earnable on a single level.
pub const MAX_STARS: u32 = 3;

/// Boss levels occur every `BOSS_INTERVAL` levels (5, 10, 15, 20).
pub const BOSS_INTERVAL: u32 = 5;

/// Whether a level carries the boss difficulty flavor.
pub const fn is_boss_level(level: u32) -> bool {
    level > 0 && level % BOSS_INTERVAL == 0
}

/// XP reward for passing a level: a flat `level * 100`.
///
/// Stars earned do not change the payout.
pub const fn reward_for(level: u32) -> u32 {
    level.saturating_mul(100)
}

/// The state changes produced by a passing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassOutcome {
    /// Whether the unlock frontier advanced.
    pub frontier_advanced: bool,
    /// The unlock frontier after the attempt.
    pub unlocked_level: u32,
    /// The stars now on record for the attempted level.
    pub stars_recorded: u32,
    /// Whether the whole ladder is complete (level 20 passed).
    pub mastered: bool,
}

/// Validate that `level` may be attempted on this skill right now.
///
/// Rejects levels outside the ladder, levels above the unlock frontier,
/// and any attempt while the skill is locked. Runs before any collaborator
/// call so a locked skill never costs a generation request.
pub fn validate_attempt(skill: &Skill, level: u32, lock: &LockState) -> Result<(), EngineError> {
    if !(1..=MAX_LEVEL).contains(&level) {
        return Err(EngineError::InvalidLevel(level));
    }
    if lock.locked {
        let reason = lock
            .reason
            .clone()
            .unwrap_or_else(|| String::from("prerequisite not met"));
        return Err(EngineError::LockedSkill { reason });
    }
    if level > skill.unlocked_level {
        return Err(EngineError::LevelNotUnlocked {
            requested: level,
            unlocked: skill.unlocked_level,
        });
    }
    Ok(())
}

/// Apply a passing grade to the skill record.
///
/// Stars are clamped into `1..=3` and recorded as the maximum of the new
/// and any previous result for the level, so a weaker re-run never erases
/// an earlier three-star clear. Passing the frontier level (below 20)
/// advances the frontier; the legacy progress percent follows it, floored,
/// and `last_practiced_at` is refreshed.
///
/// The caller is responsible for having validated the attempt and for
/// crediting the reward *before* this mutation is persisted, so an
/// interrupted write leaves the user over-paid rather than locked out.
pub fn apply_pass(
    skill: &mut Skill,
    level: u32,
    stars: u32,
    now: DateTime<Utc>,
) -> Result<PassOutcome, EngineError> {
    if !(1..=MAX_LEVEL).contains(&level) {
        return Err(EngineError::InvalidLevel(level));
    }
    if level > skill.unlocked_level {
        return Err(EngineError::LevelNotUnlocked {
            requested: level,
            unlocked: skill.unlocked_level,
        });
    }

    let stars = stars.clamp(1, MAX_STARS);
    let recorded = skill
        .level_stars
        .get(&level)
        .copied()
        .unwrap_or(0)
        .max(stars);
    skill.level_stars.insert(level, recorded);

    let mut frontier_advanced = false;
    if level == skill.unlocked_level && level < MAX_LEVEL {
        skill.unlocked_level = skill.unlocked_level.saturating_add(1);
        frontier_advanced = true;
    }

    // Always floor: percent must never run ahead of unlock progress.
    skill.progress_percent = skill.unlocked_level.saturating_mul(5).min(100);
    skill.last_practiced_at = now;

    let mastered = level == MAX_LEVEL;
    if frontier_advanced || mastered {
        info!(
            skill = %skill.name,
            level,
            unlocked_level = skill.unlocked_level,
            mastered,
            "ladder advanced"
        );
    }

    Ok(PassOutcome {
        frontier_advanced,
        unlocked_level: skill.unlocked_level,
        stars_recorded: recorded,
        mastered,
    })
}
