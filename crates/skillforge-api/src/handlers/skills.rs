//! Skill directory handlers: list, create, update, delete, batch-add.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use skillforge_engine::{decay, directory, economy, prerequisite, resolve_lock};
use skillforge_types::{
    EquippedCosmetics, LockState, Prerequisite, Skill, SkillCategory, SkillId, SkillSuggestion,
    TargetProficiency, UserId,
};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// A skill plus its derived, read-time annotations.
#[derive(Debug, Serialize)]
pub struct SkillView {
    /// The stored skill document.
    #[serde(flatten)]
    pub skill: Skill,
    /// Prerequisite lock state, recomputed on every read.
    pub lock: LockState,
    /// Whether the skill needs practice (stale beyond the decay window).
    pub decaying: bool,
}

/// The `GET /api/skills/{user_id}` response: skills plus ledger summary.
#[derive(Debug, Serialize)]
pub struct SkillOverview {
    /// Annotated skills, most recently practiced first.
    pub skills: Vec<SkillView>,
    /// Spendable XP balance.
    pub xp: u32,
    /// Derived rank.
    pub rank: u64,
    /// Progress toward the next rank (0..=99).
    pub rank_progress: u64,
    /// Consecutive-day streak.
    pub streak: u32,
    /// Owned shop item ids.
    pub inventory: Vec<String>,
    /// The active theme and title.
    pub equipped: EquippedCosmetics,
}

/// Body of `POST /api/skills`.
#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    /// Owner of the new skill.
    pub user_id: String,
    /// Skill display name.
    pub name: String,
    /// Category; classified from the name when omitted.
    pub category: Option<SkillCategory>,
    /// Target proficiency; defaults to Intermediate.
    pub target: Option<TargetProficiency>,
    /// Prerequisites on other skills.
    #[serde(default)]
    pub prerequisites: Vec<Prerequisite>,
}

/// Body of `PUT /api/skills/{id}`. Progression fields are deliberately
/// absent: `unlocked_level` and `level_stars` are engine-owned.
#[derive(Debug, Deserialize)]
pub struct UpdateSkillRequest {
    /// New display name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<SkillCategory>,
    /// New target proficiency.
    pub target: Option<TargetProficiency>,
    /// Replacement resource list.
    pub resources: Option<Vec<skillforge_types::LearningResource>>,
    /// Replacement prerequisite list.
    pub prerequisites: Option<Vec<Prerequisite>>,
}

/// Body of `POST /api/skills/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchAddRequest {
    /// Owner of the new skills.
    pub user_id: String,
    /// Analyzer suggestions to turn into skills.
    pub suggestions: Vec<SkillSuggestion>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/skills/{user_id}` -- skills with lock/decay annotations plus
/// the ledger summary. Creates the default ledger on first read.
pub async fn overview(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<SkillOverview>, ApiError> {
    let user = UserId::from(user_id);
    let now = Utc::now();

    let mut skills = state.store.list_skills(&user).await;
    skills.sort_by(|a, b| b.last_practiced_at.cmp(&a.last_practiced_at));

    let index = prerequisite::index_by_name(&skills);
    let views: Vec<SkillView> = skills
        .iter()
        .map(|skill| SkillView {
            lock: resolve_lock(skill, &index),
            decaying: decay::is_decaying(skill.last_practiced_at, now),
            skill: skill.clone(),
        })
        .collect();

    let ledger = state.store.get_or_open_ledger(&user, now).await;

    Ok(Json(SkillOverview {
        skills: views,
        xp: ledger.spendable_xp,
        rank: ledger.rank(),
        rank_progress: ledger.rank_progress(),
        streak: ledger.streak,
        inventory: ledger.inventory.iter().cloned().collect(),
        equipped: ledger.equipped,
    }))
}

/// `POST /api/skills` -- create a skill and refresh the activity streak.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSkillRequest>,
) -> Result<Json<Skill>, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidRequest(String::from("name is required")));
    }

    let user = UserId::from(req.user_id);
    let now = Utc::now();

    let existing = state.store.list_skills(&user).await;
    if directory::name_taken(&existing, name) {
        return Err(ApiError::InvalidRequest(format!(
            "skill \"{name}\" already exists"
        )));
    }

    let category = req
        .category
        .unwrap_or_else(|| directory::classify(name, None));
    let skill = Skill::new(
        user.clone(),
        String::from(name),
        category,
        req.target.unwrap_or_default(),
        req.prerequisites,
        now,
    );
    state.store.put_skill(skill.clone()).await;

    state
        .store
        .update_ledger(&user, now, |ledger| {
            economy::touch(ledger, now);
            Ok(())
        })
        .await?;

    Ok(Json(skill))
}

/// `PUT /api/skills/{id}` -- update the editable fields of a skill.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSkillRequest>,
) -> Result<Json<Skill>, ApiError> {
    let updated = state
        .store
        .update_skill(SkillId::from(id), |skill| {
            if let Some(name) = req.name {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(ApiError::InvalidRequest(String::from("name is required")));
                }
                skill.name = String::from(trimmed);
            }
            if let Some(category) = req.category {
                skill.category = category;
            }
            if let Some(target) = req.target {
                skill.target = target;
            }
            if let Some(resources) = req.resources {
                skill.resources = resources;
            }
            if let Some(prerequisites) = req.prerequisites {
                skill.prerequisites = prerequisites;
            }
            Ok(skill.clone())
        })
        .await?;

    Ok(Json(updated))
}

/// `DELETE /api/skills/{id}` -- delete a skill. Other skills'
/// prerequisite references are not repaired; dependents resolve as
/// locked with a `missing` reason.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.remove_skill(SkillId::from(id)).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// `POST /api/skills/batch` -- create skills from analyzer suggestions.
///
/// Each creation is an independent write; duplicates are skipped without
/// rolling back earlier successes.
pub async fn batch_add(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchAddRequest>,
) -> Result<Json<Vec<Skill>>, ApiError> {
    let user = UserId::from(req.user_id);
    let now = Utc::now();

    let existing = state.store.list_skills(&user).await;
    let created = directory::add_skills_from_suggestions(&user, &existing, &req.suggestions, now);

    for skill in &created {
        state.store.put_skill(skill.clone()).await;
    }

    if !created.is_empty() {
        state
            .store
            .update_ledger(&user, now, |ledger| {
                economy::touch(ledger, now);
                Ok(())
            })
            .await?;
    }

    Ok(Json(created))
}
