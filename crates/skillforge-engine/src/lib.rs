//! The SkillForge domain engine.
//!
//! Implements the skill mastery and progression rules behind the tracker:
//! a per-skill 20-level unlock ladder, a prerequisite graph between skills,
//! a dual-currency XP economy with a cosmetic shop, practice-decay
//! detection, and the challenge session state machine with paid hints and
//! anti-cheat termination.
//!
//! # Architecture
//!
//! The engine is pure and synchronous. Every command operates on explicit
//! [`Skill`](skillforge_types::Skill) and
//! [`ProgressLedger`](skillforge_types::ProgressLedger) aggregates that the
//! caller loads from its store and writes back afterwards; collaborator
//! outputs (generated challenges, grading verdicts) enter as plain data.
//! Nothing in this crate performs IO, so every rule is unit-testable
//! without a server or an LLM.
//!
//! Modules, leaf-first:
//!
//! - [`catalog`] -- the immutable cosmetic shop catalog.
//! - [`economy`] -- ledger operations: credit, debit, penalize, purchase,
//!   equip, and streak maintenance.
//! - [`prerequisite`] -- lock-state resolution over the user's skill set.
//! - [`progression`] -- the unlock ladder state machine.
//! - [`decay`] -- the stale-skill predicate.
//! - [`directory`] -- batch skill creation with keyword classification.
//! - [`session`] -- the challenge attempt lifecycle.

pub mod catalog;
pub mod decay;
pub mod directory;
pub mod economy;
pub mod error;
pub mod prerequisite;
pub mod progression;
pub mod session;

pub use error::EngineError;
pub use prerequisite::resolve_lock;
pub use progression::{MAX_LEVEL, MAX_STARS};
pub use session::ChallengeSession;
