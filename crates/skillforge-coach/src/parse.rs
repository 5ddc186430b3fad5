//! Strict parsing of model responses into typed payloads.
//!
//! Models return text that is usually, but not reliably, clean JSON. Every
//! collaborator response passes through here before the engine sees it:
//! malformed payloads are repaired where possible (markdown fences,
//! trailing commas) and rejected otherwise. Field-level sloppiness the
//! models are known for -- string items instead of objects, alternative
//! key names, out-of-range star counts -- is normalized at this boundary
//! so ad hoc shapes never leak inward.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use skillforge_types::{Challenge, GradeReport, LearningResource, SkillSuggestion};

use crate::error::CoachError;

// ---------------------------------------------------------------------------
// Lenient JSON extraction
// ---------------------------------------------------------------------------

/// Parse raw model output into `T`, repairing common damage.
///
/// Strategies, in order:
/// 1. Direct `serde_json` deserialization.
/// 2. Extract the body of a markdown code fence and retry.
/// 3. Strip trailing commas and retry (also combined with strategy 2).
fn parse_lenient<T: DeserializeOwned>(raw: &str) -> Result<T, CoachError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = serde_json::from_str::<T>(trimmed) {
        return Ok(parsed);
    }

    if let Some(inner) = extract_json_from_codeblock(trimmed)
        && let Ok(parsed) = serde_json::from_str::<T>(inner)
    {
        return Ok(parsed);
    }

    let cleaned = strip_trailing_commas(trimmed);
    if let Ok(parsed) = serde_json::from_str::<T>(&cleaned) {
        return Ok(parsed);
    }

    if let Some(inner) = extract_json_from_codeblock(trimmed) {
        let cleaned_inner = strip_trailing_commas(inner);
        if let Ok(parsed) = serde_json::from_str::<T>(&cleaned_inner) {
            return Ok(parsed);
        }
    }

    Err(CoachError::Parse(format!(
        "all parse strategies failed for: {trimmed}"
    )))
}

/// Extract the body of the first markdown code fence, if any.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = text.get(open.checked_add(3)?..)?;
    // Skip an optional language tag on the fence line.
    let body_start = after_fence.find('\n').map_or(0, |i| i.saturating_add(1));
    let body = after_fence.get(body_start..)?;
    let close = body.find("```")?;
    body.get(..close).map(str::trim)
}

/// Remove trailing commas before closing brackets and braces.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ',' {
            // Look ahead past whitespace for a closer.
            let next_significant = chars.clone().find(|n| !n.is_whitespace());
            if matches!(next_significant, Some('}' | ']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Challenge
// ---------------------------------------------------------------------------

/// Wire shape of a generated challenge, tolerant of both key styles.
#[derive(Debug, Deserialize)]
struct RawChallenge {
    title: String,
    description: String,
    #[serde(default, alias = "starterCode")]
    starter_code: String,
    #[serde(default)]
    hints: Vec<String>,
}

/// Parse and validate a generated challenge.
///
/// Title and description must be non-blank; starter code and hints may be
/// absent and default to empty.
pub fn parse_challenge(raw: &str) -> Result<Challenge, CoachError> {
    let parsed: RawChallenge = parse_lenient(raw)?;

    if parsed.title.trim().is_empty() {
        return Err(CoachError::Parse(String::from("challenge title is blank")));
    }
    if parsed.description.trim().is_empty() {
        return Err(CoachError::Parse(String::from(
            "challenge description is blank",
        )));
    }

    Ok(Challenge {
        title: parsed.title,
        description: parsed.description,
        starter_code: parsed.starter_code,
        hints: parsed
            .hints
            .into_iter()
            .filter(|h| !h.trim().is_empty())
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Grade report
// ---------------------------------------------------------------------------

/// Wire shape of a grading verdict.
#[derive(Debug, Deserialize)]
struct RawGrade {
    passed: bool,
    #[serde(default)]
    stars: i64,
    #[serde(default)]
    feedback: String,
}

/// Parse and normalize a grading verdict.
///
/// Star counts outside `0..=3` are clamped rather than rejected; the
/// model occasionally grades on imaginary scales.
pub fn parse_grade(raw: &str) -> Result<GradeReport, CoachError> {
    let parsed: RawGrade = parse_lenient(raw)?;

    let stars = u32::try_from(parsed.stars.clamp(0, 3)).unwrap_or(0);
    if !(0..=3).contains(&parsed.stars) {
        warn!(reported = parsed.stars, clamped = stars, "grader star count out of range");
    }

    Ok(GradeReport {
        passed: parsed.passed,
        stars,
        feedback: parsed.feedback,
    })
}

// ---------------------------------------------------------------------------
// Skill suggestions
// ---------------------------------------------------------------------------

/// Wire shape of the gap analyzer response.
///
/// The analyzer sometimes returns a bare array instead of the requested
/// `{"suggestions": [...]}` object, and items are sometimes bare strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSuggestions {
    Wrapped {
        #[serde(default)]
        suggestions: Vec<RawSuggestion>,
    },
    Bare(Vec<RawSuggestion>),
}

/// One suggestion item, in any of the shapes the analyzer produces.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSuggestion {
    Name(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        skill: Option<String>,
        #[serde(default)]
        tool: Option<String>,
        #[serde(default)]
        category: Option<String>,
    },
}

/// Parse and normalize gap analyzer suggestions.
///
/// Items without a usable name are dropped.
pub fn parse_suggestions(raw: &str) -> Result<Vec<SkillSuggestion>, CoachError> {
    let parsed: RawSuggestions = parse_lenient(raw)?;
    let items = match parsed {
        RawSuggestions::Wrapped { suggestions } => suggestions,
        RawSuggestions::Bare(items) => items,
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            RawSuggestion::Name(name) => {
                let trimmed = name.trim();
                (!trimmed.is_empty()).then(|| SkillSuggestion {
                    name: String::from(trimmed),
                    category_hint: None,
                })
            }
            RawSuggestion::Detailed {
                name,
                skill,
                tool,
                category,
            } => {
                let best = name.or(skill).or(tool)?;
                let trimmed = best.trim();
                (!trimmed.is_empty()).then(|| SkillSuggestion {
                    name: String::from(trimmed),
                    category_hint: category,
                })
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Learning resources
// ---------------------------------------------------------------------------

/// Wire shape of the recommender response.
#[derive(Debug, Deserialize)]
struct RawResources {
    #[serde(default)]
    resources: Vec<RawResource>,
}

/// One recommended resource.
#[derive(Debug, Deserialize)]
struct RawResource {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
}

/// Parse and filter recommended resources.
///
/// Entries missing a title or URL are dropped rather than failing the
/// whole response; the recommender is advisory.
pub fn parse_resources(raw: &str) -> Result<Vec<LearningResource>, CoachError> {
    let parsed: RawResources = parse_lenient(raw)?;
    Ok(parsed
        .resources
        .into_iter()
        .filter(|r| !r.title.trim().is_empty() && !r.url.trim().is_empty())
        .map(|r| LearningResource {
            title: r.title,
            url: r.url,
        })
        .collect())
}
