//! Error types for the progression engine.
//!
//! Every domain rule violation is a typed error decided locally, before any
//! collaborator or store call. Nothing in the engine panics.

/// Errors produced by engine commands.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A debit or purchase would push the spendable balance negative.
    #[error("insufficient balance: wanted {requested} XP but only have {available}")]
    InsufficientBalance {
        /// The amount the caller tried to spend.
        requested: u32,
        /// The spendable balance at the time of the attempt.
        available: u32,
    },

    /// The item id does not exist in the shop catalog.
    #[error("unknown shop item: {0}")]
    UnknownItem(String),

    /// Attempted to purchase an item that is already in the inventory.
    #[error("item already owned: {0}")]
    AlreadyOwned(String),

    /// Attempted to equip an item that is not in the inventory.
    #[error("item not owned: {0}")]
    NotOwned(String),

    /// Attempted a level on a skill whose prerequisites are unmet.
    #[error("skill is locked: {reason}")]
    LockedSkill {
        /// Why the skill is locked (prerequisite missing or under-leveled).
        reason: String,
    },

    /// Attempted a level above the skill's unlock frontier.
    #[error("level {requested} not unlocked yet (frontier is {unlocked})")]
    LevelNotUnlocked {
        /// The level the caller tried to attempt.
        requested: u32,
        /// The skill's current unlock frontier.
        unlocked: u32,
    },

    /// The level is outside the 1..=20 ladder.
    #[error("level {0} is outside the ladder (1..=20)")]
    InvalidLevel(u32),

    /// A hint was requested but every hint is already revealed.
    #[error("no hints left to reveal")]
    HintsExhausted,

    /// A session operation was invoked in the wrong phase.
    #[error("invalid session phase: expected {expected}, session is {actual}")]
    InvalidSessionPhase {
        /// The phase the operation requires.
        expected: &'static str,
        /// The phase the session is actually in.
        actual: &'static str,
    },

    /// An arithmetic operation overflowed.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
