//! The challenge session state machine.
//!
//! A session is the transient server-side record of one attempt run at one
//! level of one skill:
//!
//! ```text
//! Loading -> Ready -> (hint)* -> Submitting -> Resolved(pass)
//!              ^                     |
//!              +---- fail / retry ---+
//! ```
//!
//! Sessions are never persisted. Only the effects of a passing result are
//! written back to the skill record and the ledger, by the caller.
//!
//! Hints are paid content: each reveal debits a fixed fee from the
//! spendable balance, and a short balance rejects the reveal outright.
//! While a session is live, tab-visibility violations accumulate; the
//! third one terminates the session as a failure without consulting the
//! grader.

use tracing::warn;

use skillforge_types::{Challenge, GradeReport, ProgressLedger, SkillId};

use crate::economy;
use crate::error::EngineError;

/// Spendable XP debited per revealed hint.
pub const HINT_COST: u32 = 200;

/// Tab-visibility violations tolerated before forced termination.
pub const MAX_CHEAT_WARNINGS: u32 = 3;

/// Feedback attached to a cheat-terminated result.
pub const CHEAT_TERMINATION_FEEDBACK: &str = "Session terminated: too many focus violations.";

/// Lifecycle phase of a challenge session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the challenge generator.
    Loading,
    /// Challenge on screen; hints and submission available.
    Ready,
    /// Submission sent to the grader.
    Submitting,
    /// Terminal: the session produced a final result.
    Resolved,
}

impl SessionPhase {
    /// Phase name for error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Ready => "Ready",
            Self::Submitting => "Submitting",
            Self::Resolved => "Resolved",
        }
    }
}

/// One live challenge attempt against a single skill level.
#[derive(Debug, Clone)]
pub struct ChallengeSession {
    skill_id: SkillId,
    level: u32,
    phase: SessionPhase,
    challenge: Option<Challenge>,
    attempt_count: u32,
    cheat_warning_count: u32,
    revealed_hint_count: u32,
    last_result: Option<GradeReport>,
}

impl ChallengeSession {
    /// Open a session for a level; the generator call is in flight.
    ///
    /// Anti-cheat and hint counters start at zero: a fresh session never
    /// inherits violations from a previous one.
    pub const fn begin(skill_id: SkillId, level: u32) -> Self {
        Self {
            skill_id,
            level,
            phase: SessionPhase::Loading,
            challenge: None,
            attempt_count: 0,
            cheat_warning_count: 0,
            revealed_hint_count: 0,
            last_result: None,
        }
    }

    /// The skill this session runs against.
    pub const fn skill_id(&self) -> SkillId {
        self.skill_id
    }

    /// The ladder level being attempted.
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Current lifecycle phase.
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The generated challenge, once loaded.
    pub const fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    /// Failed submissions so far in this session.
    pub const fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Tab-visibility violations so far.
    pub const fn cheat_warning_count(&self) -> u32 {
        self.cheat_warning_count
    }

    /// Hints already revealed (and paid for).
    pub const fn revealed_hint_count(&self) -> u32 {
        self.revealed_hint_count
    }

    /// The most recent grading result, if any.
    pub const fn last_result(&self) -> Option<&GradeReport> {
        self.last_result.as_ref()
    }

    /// Whether the session has produced its final result.
    pub const fn is_resolved(&self) -> bool {
        matches!(self.phase, SessionPhase::Resolved)
    }

    /// The hints revealed so far, in order.
    pub fn revealed_hints(&self) -> &[String] {
        let count = usize::try_from(self.revealed_hint_count).unwrap_or(0);
        self.challenge
            .as_ref()
            .map(|c| c.hints.get(..count).unwrap_or(&[]))
            .unwrap_or(&[])
    }

    /// Deliver the generator's challenge: `Loading -> Ready`.
    pub fn load_challenge(&mut self, challenge: Challenge) -> Result<(), EngineError> {
        self.require_phase(SessionPhase::Loading)?;
        self.challenge = Some(challenge);
        self.phase = SessionPhase::Ready;
        Ok(())
    }

    /// Reveal the next hint for a fee: `Ready -> Ready`.
    ///
    /// Checks availability before money: a session with every hint already
    /// revealed reports [`EngineError::HintsExhausted`] without charging.
    /// The debit touches the spendable balance only; a short balance
    /// rejects the reveal and mutates nothing.
    pub fn request_hint<'a>(
        &'a mut self,
        ledger: &mut ProgressLedger,
    ) -> Result<&'a str, EngineError> {
        self.require_phase(SessionPhase::Ready)?;

        let total_hints = self
            .challenge
            .as_ref()
            .map(|c| u32::try_from(c.hints.len()).unwrap_or(u32::MAX))
            .unwrap_or(0);
        if self.revealed_hint_count >= total_hints {
            return Err(EngineError::HintsExhausted);
        }

        economy::debit(ledger, HINT_COST)?;
        let index = usize::try_from(self.revealed_hint_count).unwrap_or(usize::MAX);
        self.revealed_hint_count = self.revealed_hint_count.saturating_add(1);

        self.challenge
            .as_ref()
            .and_then(|c| c.hints.get(index))
            .map(String::as_str)
            .ok_or_else(|| EngineError::ArithmeticOverflow {
                context: String::from("hint index out of range after reveal"),
            })
    }

    /// Hand the submission to the grader: `Ready -> Submitting`.
    pub fn begin_submit(&mut self) -> Result<(), EngineError> {
        self.require_phase(SessionPhase::Ready)?;
        self.phase = SessionPhase::Submitting;
        Ok(())
    }

    /// The grader was unreachable: `Submitting -> Ready`.
    ///
    /// A retryable surface error; the attempt counter is untouched because
    /// no verdict was rendered.
    pub fn submission_failed(&mut self) -> Result<(), EngineError> {
        self.require_phase(SessionPhase::Submitting)?;
        self.phase = SessionPhase::Ready;
        Ok(())
    }

    /// Apply the grader's verdict: `Submitting -> Resolved | Ready`.
    ///
    /// A pass resolves the session. A fail records the attempt and returns
    /// to `Ready` for a retry; the skill record is untouched either way
    /// (the caller applies pass effects separately).
    pub fn resolve(&mut self, report: GradeReport) -> Result<&GradeReport, EngineError> {
        self.require_phase(SessionPhase::Submitting)?;

        if report.passed {
            self.phase = SessionPhase::Resolved;
        } else {
            self.attempt_count = self.attempt_count.saturating_add(1);
            self.phase = SessionPhase::Ready;
        }
        self.last_result = Some(report);

        self.last_result
            .as_ref()
            .ok_or_else(|| EngineError::ArithmeticOverflow {
                context: String::from("result missing after resolve"),
            })
    }

    /// Record a tab-hidden event while the session is live.
    ///
    /// Returns the forced failure result when the violation budget is
    /// exhausted; the session is then terminal and the grader is never
    /// consulted. Events outside `Ready`/`Submitting` are ignored.
    pub fn record_hidden_tab(&mut self) -> Option<&GradeReport> {
        if !matches!(self.phase, SessionPhase::Ready | SessionPhase::Submitting) {
            return None;
        }

        self.cheat_warning_count = self.cheat_warning_count.saturating_add(1);
        if self.cheat_warning_count < MAX_CHEAT_WARNINGS {
            return None;
        }

        warn!(
            skill_id = %self.skill_id,
            level = self.level,
            warnings = self.cheat_warning_count,
            "session terminated for repeated visibility violations"
        );
        self.phase = SessionPhase::Resolved;
        self.last_result = Some(GradeReport {
            passed: false,
            stars: 0,
            feedback: String::from(CHEAT_TERMINATION_FEEDBACK),
        });
        self.last_result.as_ref()
    }

    /// Guard helper: error unless the session is in `expected`.
    fn require_phase(&self, expected: SessionPhase) -> Result<(), EngineError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidSessionPhase {
                expected: expected.name(),
                actual: self.phase.name(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use skillforge_types::UserId;

    use super::*;
    use crate::economy::{credit, open_ledger};

    fn two_hint_challenge() -> Challenge {
        Challenge {
            title: String::from("Reverse a linked list"),
            description: String::from("Reverse the list in place."),
            starter_code: String::from("fn reverse(head: Node) {}"),
            hints: vec![
                String::from("Walk the list with two pointers."),
                String::from("Swap next pointers as you go."),
            ],
        }
    }

    fn ready_session() -> ChallengeSession {
        let mut session = ChallengeSession::begin(SkillId::new(), 3);
        let loaded = session.load_challenge(two_hint_challenge());
        assert!(loaded.is_ok());
        session
    }

    fn funded_ledger(amount: u32) -> ProgressLedger {
        let mut ledger = open_ledger(UserId::from("user_test"), Utc::now());
        assert!(credit(&mut ledger, amount).is_ok());
        ledger
    }

    fn pass(stars: u32) -> GradeReport {
        GradeReport {
            passed: true,
            stars,
            feedback: String::from("Clean solution."),
        }
    }

    fn fail() -> GradeReport {
        GradeReport {
            passed: false,
            stars: 0,
            feedback: String::from("Off-by-one on the tail."),
        }
    }

    // -----------------------------------------------------------------------
    // Phase transitions
    // -----------------------------------------------------------------------

    #[test]
    fn begins_loading_with_zeroed_counters() {
        let session = ChallengeSession::begin(SkillId::new(), 5);
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert_eq!(session.attempt_count(), 0);
        assert_eq!(session.cheat_warning_count(), 0);
        assert_eq!(session.revealed_hint_count(), 0);
        assert!(session.challenge().is_none());
    }

    #[test]
    fn load_challenge_moves_to_ready() {
        let session = ready_session();
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert!(session.challenge().is_some());
    }

    #[test]
    fn load_challenge_twice_is_rejected() {
        let mut session = ready_session();
        let result = session.load_challenge(two_hint_challenge());
        assert!(matches!(
            result,
            Err(EngineError::InvalidSessionPhase { .. })
        ));
    }

    #[test]
    fn submit_requires_ready() {
        let mut session = ChallengeSession::begin(SkillId::new(), 1);
        assert!(matches!(
            session.begin_submit(),
            Err(EngineError::InvalidSessionPhase { .. })
        ));
    }

    #[test]
    fn pass_resolves_the_session() {
        let mut session = ready_session();
        assert!(session.begin_submit().is_ok());
        let result = session.resolve(pass(2));
        assert!(result.is_ok());
        assert!(session.is_resolved());
        assert_eq!(session.attempt_count(), 0);
    }

    #[test]
    fn fail_returns_to_ready_and_counts_the_attempt() {
        let mut session = ready_session();
        assert!(session.begin_submit().is_ok());
        assert!(session.resolve(fail()).is_ok());

        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.attempt_count(), 1);

        // Retry is possible.
        assert!(session.begin_submit().is_ok());
        assert!(session.resolve(pass(1)).is_ok());
        assert!(session.is_resolved());
        assert_eq!(session.attempt_count(), 1);
    }

    #[test]
    fn grader_outage_reverts_without_counting() {
        let mut session = ready_session();
        assert!(session.begin_submit().is_ok());
        assert!(session.submission_failed().is_ok());
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.attempt_count(), 0);
    }

    // -----------------------------------------------------------------------
    // Hints
    // -----------------------------------------------------------------------

    #[test]
    fn hint_debits_spendable_and_reveals_in_order() {
        let mut session = ready_session();
        let mut ledger = funded_ledger(500);

        let first = session.request_hint(&mut ledger).map(String::from);
        assert_eq!(first.ok().as_deref(), Some("Walk the list with two pointers."));
        assert_eq!(ledger.spendable_xp, 300);
        assert_eq!(session.revealed_hint_count(), 1);
        // Rank currency is untouched by hint spend.
        assert_eq!(ledger.lifetime_xp, 500);

        let second = session.request_hint(&mut ledger).map(String::from);
        assert_eq!(second.ok().as_deref(), Some("Swap next pointers as you go."));
        assert_eq!(ledger.spendable_xp, 100);
    }

    #[test]
    fn short_balance_rejects_hint_without_reveal() {
        // Scenario: balance 150, hint costs 200.
        let mut session = ready_session();
        let mut ledger = funded_ledger(150);

        let result = session.request_hint(&mut ledger);
        assert!(matches!(
            result,
            Err(EngineError::InsufficientBalance {
                requested: HINT_COST,
                available: 150
            })
        ));
        assert_eq!(ledger.spendable_xp, 150);
        assert_eq!(session.revealed_hint_count(), 0);
    }

    #[test]
    fn exhausted_hints_are_rejected_before_charging() {
        let mut session = ready_session();
        let mut ledger = funded_ledger(1000);

        assert!(session.request_hint(&mut ledger).is_ok());
        assert!(session.request_hint(&mut ledger).is_ok());
        assert_eq!(ledger.spendable_xp, 600);

        let result = session.request_hint(&mut ledger);
        assert!(matches!(result, Err(EngineError::HintsExhausted)));
        assert_eq!(ledger.spendable_xp, 600);
    }

    #[test]
    fn revealed_hints_tracks_paid_prefix() {
        let mut session = ready_session();
        let mut ledger = funded_ledger(200);
        assert!(session.revealed_hints().is_empty());

        assert!(session.request_hint(&mut ledger).is_ok());
        assert_eq!(session.revealed_hints().len(), 1);
    }

    // -----------------------------------------------------------------------
    // Anti-cheat
    // -----------------------------------------------------------------------

    #[test]
    fn three_hidden_tabs_terminate_the_session() {
        let mut session = ready_session();

        assert!(session.record_hidden_tab().is_none());
        assert!(session.record_hidden_tab().is_none());
        assert_eq!(session.cheat_warning_count(), 2);
        assert!(!session.is_resolved());

        let result = session.record_hidden_tab().cloned();
        assert!(session.is_resolved());
        let report = result.unwrap_or(GradeReport {
            passed: true,
            stars: 3,
            feedback: String::new(),
        });
        assert!(!report.passed);
        assert_eq!(report.stars, 0);
        assert_eq!(report.feedback, CHEAT_TERMINATION_FEEDBACK);
        // Attempt counter is not touched by termination.
        assert_eq!(session.attempt_count(), 0);
    }

    #[test]
    fn hidden_tab_during_submitting_counts() {
        let mut session = ready_session();
        assert!(session.begin_submit().is_ok());
        assert!(session.record_hidden_tab().is_none());
        assert_eq!(session.cheat_warning_count(), 1);
    }

    #[test]
    fn hidden_tab_while_loading_or_resolved_is_ignored() {
        let mut loading = ChallengeSession::begin(SkillId::new(), 1);
        assert!(loading.record_hidden_tab().is_none());
        assert_eq!(loading.cheat_warning_count(), 0);

        let mut resolved = ready_session();
        assert!(resolved.begin_submit().is_ok());
        assert!(resolved.resolve(pass(3)).is_ok());
        assert!(resolved.record_hidden_tab().is_none());
        assert_eq!(resolved.cheat_warning_count(), 0);
    }

    #[test]
    fn terminated_session_rejects_submission() {
        let mut session = ready_session();
        session.record_hidden_tab();
        session.record_hidden_tab();
        session.record_hidden_tab();
        assert!(session.is_resolved());

        assert!(matches!(
            session.begin_submit(),
            Err(EngineError::InvalidSessionPhase { .. })
        ));
    }
}
