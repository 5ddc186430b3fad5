//! Shared type definitions for the SkillForge progression engine.
//!
//! Every crate in the workspace builds on these types: strongly-typed
//! identifiers, fixed enumerations, and the entity structs that flow
//! between the HTTP API, the domain engine, and the LLM coach.
//!
//! All wire-visible types derive [`ts_rs::TS`] so the React client consumes
//! generated TypeScript bindings instead of hand-maintained interfaces.

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::{ItemKind, SkillCategory, TargetProficiency};
pub use ids::{SessionId, SkillId, UserId};
pub use structs::{
    Challenge, EquippedCosmetics, GradeReport, LearningResource, LockState, Prerequisite,
    ProgressLedger, ShopItem, Skill, SkillSuggestion,
};
