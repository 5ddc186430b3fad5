//! Core entity structs for the SkillForge engine.
//!
//! Two aggregates are persisted per user: [`Skill`] records (one per tracked
//! skill) and a single [`ProgressLedger`] (the XP economy). Everything else
//! here is either static catalog data ([`ShopItem`]), collaborator payloads
//! ([`Challenge`], [`GradeReport`], [`SkillSuggestion`],
//! [`LearningResource`]), or derived read-side annotations ([`LockState`]).

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ItemKind, SkillCategory, TargetProficiency};
use crate::ids::{SkillId, UserId};

// ---------------------------------------------------------------------------
// Skill aggregate
// ---------------------------------------------------------------------------

/// A learning resource attached to a skill (advisory, recommender-sourced).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LearningResource {
    /// Display title of the resource.
    pub title: String,
    /// Link to the resource.
    pub url: String,
}

/// A dependency from one skill on another skill reaching a minimum
/// derived level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Prerequisite {
    /// Name of the skill that must be leveled first (matched
    /// case-insensitively against the user's skill set).
    pub required_skill_name: String,
    /// The derived level the named skill must have reached.
    pub required_level: u32,
}

/// A tracked skill with its 20-level unlock ladder.
///
/// Invariants maintained by the progression engine:
/// - `unlocked_level` stays within `1..=20`.
/// - `level_stars` only holds keys `<= unlocked_level`; star values are in
///   `0..=3` and never decrease across re-attempts.
/// - `progress_percent` is derived from `unlocked_level`, never set
///   directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Skill {
    /// Unique skill record identifier.
    pub id: SkillId,
    /// The user this record belongs to.
    pub owner: UserId,
    /// Display name, unique per user (case-insensitive).
    pub name: String,
    /// Fixed category.
    pub category: SkillCategory,
    /// Highest level the user may attempt (1..=20).
    pub unlocked_level: u32,
    /// Stars earned per level (level -> 0..=3).
    pub level_stars: BTreeMap<u32, u32>,
    /// Legacy 0..=100 progress number, kept in sync with `unlocked_level`.
    pub progress_percent: u32,
    /// The proficiency the user is aiming for.
    pub target: TargetProficiency,
    /// Recommended learning resources.
    pub resources: Vec<LearningResource>,
    /// When a level of this skill was last passed.
    pub last_practiced_at: DateTime<Utc>,
    /// Skills that must be leveled before this one is playable.
    pub prerequisites: Vec<Prerequisite>,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

impl Skill {
    /// Create a fresh skill at the bottom of the ladder.
    ///
    /// Starts at `unlocked_level = 1` with no stars earned and a legacy
    /// progress percent of 5 (one of twenty levels reachable).
    pub fn new(
        owner: UserId,
        name: String,
        category: SkillCategory,
        target: TargetProficiency,
        prerequisites: Vec<Prerequisite>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SkillId::new(),
            owner,
            name,
            category,
            unlocked_level: 1,
            level_stars: BTreeMap::new(),
            progress_percent: 5,
            target,
            resources: Vec::new(),
            last_practiced_at: now,
            prerequisites,
            created_at: now,
        }
    }
}

/// Derived lock annotation for a skill, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LockState {
    /// Whether the skill's levels may currently be attempted.
    pub locked: bool,
    /// Human-readable reason when locked (e.g. `"Need Docker Lvl.5"`).
    pub reason: Option<String>,
}

impl LockState {
    /// An unlocked state with no reason attached.
    pub const UNLOCKED: Self = Self {
        locked: false,
        reason: None,
    };

    /// Build a locked state with the given reason.
    pub fn locked(reason: impl Into<String>) -> Self {
        Self {
            locked: true,
            reason: Some(reason.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Progress ledger aggregate
// ---------------------------------------------------------------------------

/// The cosmetic items currently equipped, one per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EquippedCosmetics {
    /// Item id of the active theme.
    pub theme: String,
    /// Item id of the active title.
    pub title: String,
}

/// A user's XP economy record: balances, streak, and cosmetics.
///
/// Invariants maintained by the economy operations:
/// - `spendable_xp >= 0` at all times (debits beyond balance are rejected).
/// - `lifetime_xp` only grows, except through an explicit penalty.
/// - `inventory` always contains the free default theme and title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProgressLedger {
    /// The user this ledger belongs to (one ledger per user).
    pub user: UserId,
    /// Currency that can be earned and spent (hints, shop).
    pub spendable_xp: u32,
    /// Monotonic currency used only to derive rank; not spendable.
    pub lifetime_xp: u64,
    /// Consecutive-day activity counter.
    pub streak: u32,
    /// Timestamp of the last activity that touched this ledger.
    pub last_activity_at: DateTime<Utc>,
    /// Ids of owned shop items.
    pub inventory: BTreeSet<String>,
    /// The active theme and title.
    pub equipped: EquippedCosmetics,
}

impl ProgressLedger {
    /// Derived prestige level: `floor(lifetime_xp / 100) + 1`.
    pub const fn rank(&self) -> u64 {
        (self.lifetime_xp / 100).saturating_add(1)
    }

    /// Progress toward the next rank: `lifetime_xp mod 100`.
    pub const fn rank_progress(&self) -> u64 {
        self.lifetime_xp % 100
    }
}

// ---------------------------------------------------------------------------
// Shop catalog item
// ---------------------------------------------------------------------------

/// A purchasable cosmetic item from the immutable shop catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ShopItem {
    /// Stable catalog id (e.g. `"theme-dracula"`).
    pub id: String,
    /// The slot this item occupies when equipped.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Price in spendable XP (0 for the free defaults).
    pub cost: u32,
    /// Display name.
    pub display_name: String,
    /// One-line flavor description.
    pub description: String,
}

// ---------------------------------------------------------------------------
// Collaborator payloads
// ---------------------------------------------------------------------------

/// A generated coding challenge for one level of one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Challenge {
    /// Challenge title.
    pub title: String,
    /// Problem statement shown to the user.
    pub description: String,
    /// Code seeded into the user's editable buffer.
    pub starter_code: String,
    /// Ordered hints, revealed one at a time for a fee.
    pub hints: Vec<String>,
}

/// The grading verdict for a submitted solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GradeReport {
    /// Whether the submission passed the level.
    pub passed: bool,
    /// Stars earned (0..=3; at least 1 when passed).
    pub stars: u32,
    /// Feedback text shown to the user.
    pub feedback: String,
}

/// A skill the role-gap analyzer suggests adding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SkillSuggestion {
    /// Suggested skill name.
    pub name: String,
    /// The analyzer's category guess, as raw text. The skill directory
    /// classifies authoritatively via its keyword table; this is only a
    /// fallback when no keyword matches.
    pub category_hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn ledger_with_lifetime(lifetime_xp: u64) -> ProgressLedger {
        ProgressLedger {
            user: UserId::from("user_test"),
            spendable_xp: 0,
            lifetime_xp,
            streak: 1,
            last_activity_at: Utc::now(),
            inventory: BTreeSet::new(),
            equipped: EquippedCosmetics {
                theme: String::from("theme-light"),
                title: String::from("title-novice"),
            },
        }
    }

    #[test]
    fn fresh_skill_starts_at_level_one() {
        let skill = Skill::new(
            UserId::from("user_test"),
            String::from("Docker"),
            SkillCategory::Tools,
            TargetProficiency::default(),
            Vec::new(),
            Utc::now(),
        );
        assert_eq!(skill.unlocked_level, 1);
        assert!(skill.level_stars.is_empty());
        assert_eq!(skill.progress_percent, 5);
    }

    #[test]
    fn rank_is_derived_from_lifetime() {
        assert_eq!(ledger_with_lifetime(0).rank(), 1);
        assert_eq!(ledger_with_lifetime(99).rank(), 1);
        assert_eq!(ledger_with_lifetime(100).rank(), 2);
        assert_eq!(ledger_with_lifetime(550).rank(), 6);
    }

    #[test]
    fn rank_progress_is_the_remainder() {
        assert_eq!(ledger_with_lifetime(0).rank_progress(), 0);
        assert_eq!(ledger_with_lifetime(99).rank_progress(), 99);
        assert_eq!(ledger_with_lifetime(550).rank_progress(), 50);
    }

    #[test]
    fn shop_item_kind_uses_type_on_the_wire() {
        let item = ShopItem {
            id: String::from("theme-dracula"),
            kind: ItemKind::Theme,
            cost: 300,
            display_name: String::from("Dracula"),
            description: String::from("A dark theme for vampires."),
        };
        let json = serde_json::to_value(&item).unwrap_or_default();
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("theme"));
    }
}
