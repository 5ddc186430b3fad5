//! Challenge session handlers: start, hint, submit, visibility.
//!
//! The session state machine lives in the engine; these handlers wire it
//! to the coach and the store. Two ordering rules matter:
//!
//! - Attempt validation (lock, frontier) runs before the generator is
//!   called, so a locked skill never costs an LLM round-trip.
//! - On a pass, the ledger credit is written before the skill unlock, so
//!   an interruption between the two leaves the user net-positive rather
//!   than locked out.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use skillforge_coach::difficulty_for_level;
use skillforge_engine::{ChallengeSession, economy, prerequisite, progression, resolve_lock};
use skillforge_types::{GradeReport, SessionId, SkillId, UserId};

use crate::error::ApiError;
use crate::state::{ActiveSession, AppState};

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Body of `POST /api/challenges/start`.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    /// The acting user.
    pub user_id: String,
    /// The skill to attempt.
    pub skill_id: Uuid,
    /// The ladder level to attempt (1..=20).
    pub level: u32,
}

/// Response after opening a session. Hints are withheld: only the count
/// is disclosed, and bodies leave the server one paid reveal at a time.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    /// Handle for the new session.
    pub session_id: SessionId,
    /// The skill under attempt.
    pub skill_id: SkillId,
    /// The level under attempt.
    pub level: u32,
    /// Difficulty label for the level (boss flavor every fifth).
    pub difficulty: &'static str,
    /// Challenge title.
    pub title: String,
    /// Problem statement.
    pub description: String,
    /// Code seeded into the editor buffer.
    pub starter_code: String,
    /// Total hints available for purchase.
    pub hint_count: u32,
}

/// Response after a paid hint reveal.
#[derive(Debug, Serialize)]
pub struct HintResponse {
    /// The newly revealed hint.
    pub hint: String,
    /// Hints revealed so far.
    pub revealed_hint_count: u32,
    /// Spendable balance after the debit.
    pub spendable_xp: u32,
}

/// Body of `POST /api/challenges/{id}/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// The candidate solution.
    pub code: String,
}

/// Response after grading (pass or fail).
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Whether the submission passed.
    pub passed: bool,
    /// Stars on record for the level (pass) or reported (fail).
    pub stars: u32,
    /// Grader feedback.
    pub feedback: String,
    /// XP credited (zero on fail).
    pub reward: u32,
    /// Failed attempts so far in this session.
    pub attempt_count: u32,
    /// Unlock frontier after a pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_level: Option<u32>,
    /// Whether level 20 was just passed.
    pub mastered: bool,
    /// Spendable balance after the reward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spendable_xp: Option<u32>,
    /// Rank after the reward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u64>,
    /// Rank progress after the reward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_progress: Option<u64>,
}

/// Response after a visibility report.
#[derive(Debug, Serialize)]
pub struct VisibilityResponse {
    /// Violations recorded so far.
    pub cheat_warning_count: u32,
    /// Whether the session was forcibly terminated.
    pub terminated: bool,
    /// The forced failure result, when terminated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GradeReport>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/challenges/start` -- validate the attempt, generate a
/// challenge, and open a session.
///
/// Any previous session of the same user on the same skill is replaced;
/// its counters do not carry over. A generator failure aborts before a
/// session exists, so there is nothing to clean up.
pub async fn start(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartRequest>,
) -> Result<Json<StartResponse>, ApiError> {
    let user = UserId::from(req.user_id);
    let skill_id = SkillId::from(req.skill_id);

    let skill = state.store.get_skill(skill_id).await?;
    if skill.owner != user {
        return Err(ApiError::NotFound(format!("skill {skill_id}")));
    }

    let all_skills = state.store.list_skills(&user).await;
    let index = prerequisite::index_by_name(&all_skills);
    let lock = resolve_lock(&skill, &index);
    progression::validate_attempt(&skill, req.level, &lock)?;

    let challenge = state.coach.generate_challenge(&skill.name, req.level).await?;

    let mut session = ChallengeSession::begin(skill_id, req.level);
    session
        .load_challenge(challenge.clone())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let session_id = SessionId::new();
    {
        let mut sessions = state.sessions.write().await;
        sessions.retain(|_, active| {
            !(active.user == user && active.session.skill_id() == skill_id)
        });
        sessions.insert(
            session_id,
            ActiveSession {
                user: user.clone(),
                session,
            },
        );
    }

    Ok(Json(StartResponse {
        session_id,
        skill_id,
        level: req.level,
        difficulty: difficulty_for_level(req.level),
        title: challenge.title,
        description: challenge.description,
        starter_code: challenge.starter_code,
        hint_count: u32::try_from(challenge.hints.len()).unwrap_or(0),
    }))
}

/// `POST /api/challenges/{id}/hint` -- debit the hint fee and reveal the
/// next hint.
pub async fn hint(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HintResponse>, ApiError> {
    let session_id = SessionId::from(session_id);
    let now = Utc::now();

    let mut sessions = state.sessions.write().await;
    let active = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("session {session_id}")))?;

    let user = active.user.clone();
    let session = &mut active.session;

    let response = state
        .store
        .update_ledger(&user, now, |ledger| {
            let hint = session.request_hint(ledger).map(String::from)?;
            Ok(HintResponse {
                hint,
                revealed_hint_count: session.revealed_hint_count(),
                spendable_xp: ledger.spendable_xp,
            })
        })
        .await?;

    Ok(Json(response))
}

/// `POST /api/challenges/{id}/submit` -- grade the submission and apply
/// the verdict.
///
/// The session sits in `Submitting` while the grader runs, which rejects
/// a concurrent double-submit of the same session. A grader outage
/// reverts to `Ready` without counting an attempt.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let session_id = SessionId::from(session_id);

    // Phase guard plus grading inputs, without holding the lock across
    // the LLM call.
    let (description, attempt_count) = {
        let mut sessions = state.sessions.write().await;
        let active = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ApiError::NotFound(format!("session {session_id}")))?;
        active.session.begin_submit()?;
        let challenge = active
            .session
            .challenge()
            .ok_or_else(|| ApiError::Internal(String::from("ready session has no challenge")))?;
        (challenge.description.clone(), active.session.attempt_count())
    };

    let graded = state
        .coach
        .grade_submission(&description, &req.code, attempt_count)
        .await;

    let report = match graded {
        Ok(report) => report,
        Err(err) => {
            warn!(%session_id, error = %err, "grader unavailable, session reverts to Ready");
            let mut sessions = state.sessions.write().await;
            if let Some(active) = sessions.get_mut(&session_id) {
                let _ = active.session.submission_failed();
            }
            return Err(err.into());
        }
    };

    let mut sessions = state.sessions.write().await;
    let active = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("session {session_id}")))?;

    let user = active.user.clone();
    let skill_id = active.session.skill_id();
    let level = active.session.level();
    active.session.resolve(report.clone())?;

    if !report.passed {
        let attempt_count = active.session.attempt_count();
        return Ok(Json(SubmitResponse {
            passed: false,
            stars: report.stars,
            feedback: report.feedback,
            reward: 0,
            attempt_count,
            unlocked_level: None,
            mastered: false,
            spendable_xp: None,
            rank: None,
            rank_progress: None,
        }));
    }

    sessions.remove(&session_id);
    drop(sessions);

    let now = Utc::now();
    let reward = progression::reward_for(level);

    // Credit strictly before the unlock write: a crash between the two
    // leaves the user net-positive, never locked out of an earned level.
    let (spendable_xp, rank, rank_progress) = state
        .store
        .update_ledger(&user, now, |ledger| {
            economy::touch(ledger, now);
            economy::credit(ledger, reward)?;
            Ok((ledger.spendable_xp, ledger.rank(), ledger.rank_progress()))
        })
        .await?;

    let outcome = state
        .store
        .update_skill(skill_id, |skill| {
            progression::apply_pass(skill, level, report.stars, now).map_err(ApiError::from)
        })
        .await?;

    Ok(Json(SubmitResponse {
        passed: true,
        stars: outcome.stars_recorded,
        feedback: report.feedback,
        reward,
        attempt_count,
        unlocked_level: Some(outcome.unlocked_level),
        mastered: outcome.mastered,
        spendable_xp: Some(spendable_xp),
        rank: Some(rank),
        rank_progress: Some(rank_progress),
    }))
}

/// `POST /api/challenges/{id}/visibility` -- record a hidden-tab event.
///
/// The third violation forcibly fails the session; the grader is never
/// consulted and no reward or level mutation happens.
pub async fn visibility(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<VisibilityResponse>, ApiError> {
    let session_id = SessionId::from(session_id);

    let mut sessions = state.sessions.write().await;
    let active = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("session {session_id}")))?;

    let result = active.session.record_hidden_tab().cloned();
    let cheat_warning_count = active.session.cheat_warning_count();
    let terminated = active.session.is_resolved();

    if terminated {
        sessions.remove(&session_id);
    }

    Ok(Json(VisibilityResponse {
        cheat_warning_count,
        terminated,
        result,
    }))
}
