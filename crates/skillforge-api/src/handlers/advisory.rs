//! Advisory handlers: role gap analysis and resource recommendation.
//!
//! Both collaborators are advisory by contract: an outage degrades to an
//! empty list instead of an error, matching how the product has always
//! treated them. Nothing here mutates progression or economy state.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use skillforge_types::{LearningResource, SkillId, SkillSuggestion, UserId};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Body of `POST /api/ai/skill-gap`.
#[derive(Debug, Deserialize)]
pub struct SkillGapRequest {
    /// The user whose stored skill names feed the analysis.
    pub user_id: String,
    /// The role to analyze against.
    pub target_role: String,
}

/// Response of the gap analysis.
#[derive(Debug, Serialize)]
pub struct SkillGapResponse {
    /// Suggested skills to add; feed these to `POST /api/skills/batch`.
    pub suggestions: Vec<SkillSuggestion>,
}

/// Body of `POST /api/ai/recommend-resources`.
#[derive(Debug, Deserialize)]
pub struct RecommendResourcesRequest {
    /// The skill to recommend resources for.
    pub skill_id: Uuid,
}

/// Response carrying the skill's full resource list after the append.
#[derive(Debug, Serialize)]
pub struct RecommendResourcesResponse {
    /// All resources now attached to the skill.
    pub resources: Vec<LearningResource>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/ai/skill-gap` -- identify missing skills for a target role.
pub async fn skill_gap(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SkillGapRequest>,
) -> Result<Json<SkillGapResponse>, ApiError> {
    let user = UserId::from(req.user_id);
    let current: Vec<String> = state
        .store
        .list_skills(&user)
        .await
        .into_iter()
        .map(|skill| skill.name)
        .collect();

    let suggestions = match state
        .coach
        .analyze_role_gap(&current, &req.target_role)
        .await
    {
        Ok(suggestions) => suggestions,
        Err(err) => {
            warn!(error = %err, "gap analyzer unavailable, degrading to empty");
            Vec::new()
        }
    };

    Ok(Json(SkillGapResponse { suggestions }))
}

/// `POST /api/ai/recommend-resources` -- fetch recommendations and append
/// them to the skill's resource list, deduplicated by URL.
pub async fn recommend_resources(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecommendResourcesRequest>,
) -> Result<Json<RecommendResourcesResponse>, ApiError> {
    let skill_id = SkillId::from(req.skill_id);
    let skill = state.store.get_skill(skill_id).await?;

    let recommended = match state.coach.suggest_resources(&skill.name).await {
        Ok(resources) => resources,
        Err(err) => {
            warn!(error = %err, "recommender unavailable, degrading to empty");
            Vec::new()
        }
    };

    let resources = state
        .store
        .update_skill(skill_id, |skill| {
            for resource in recommended {
                let duplicate = skill.resources.iter().any(|r| r.url == resource.url);
                if !duplicate {
                    skill.resources.push(resource);
                }
            }
            Ok(skill.resources.clone())
        })
        .await?;

    Ok(Json(RecommendResourcesResponse { resources }))
}
