use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::classifier::ClassifiedJob;
use super::variants::RoleVariant;

/// Final scores at or above this are an automatic APPLY.
pub const APPLY_THRESHOLD: u32 = 65;

/// Apply/skip decision for a scored posting.
///
/// `Save` is never produced by the scoring formula; it exists for the
/// lifecycle/UI layer where a human can park a posting for later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Apply,
    Save,
    Skip,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Decision::Apply => "APPLY",
            Decision::Save => "SAVE",
            Decision::Skip => "SKIP",
        }
    }
}

/// Deterministic scoring output. Derived purely from the classified job
/// and its role variant; same inputs always yield the same result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub matched_skills: BTreeSet<String>,
    pub primary_skill_hits: BTreeSet<String>,
    pub skill_score: u32,
    pub role_confidence: u32,
    pub description_score: u32,
    pub final_score: u32,
    pub decision: Decision,
    pub reason: String,
}

/// Score a classified job against its role variant.
///
/// The formula is fixed for compatibility with previously persisted
/// decision records:
///
/// - skill_score   = min(matched_skills * 15, 60)
/// - role_confidence = 20 when the family name (underscores as spaces)
///   appears in the lowercase title, else 10
/// - description_score = 20 over 800 chars, 10 over 300, else 0
/// - decision = APPLY iff the sum reaches [`APPLY_THRESHOLD`]
///
/// Absent skill lists behave as empty sets; every component then bottoms
/// out at its lowest tier.
pub fn score(job: &ClassifiedJob, variant: &RoleVariant) -> ScoreResult {
    let description = job.posting.description_text.to_lowercase();

    let matched_skills: BTreeSet<String> = variant
        .allowed_skills
        .iter()
        .filter(|skill| description.contains(&skill.to_lowercase()))
        .cloned()
        .collect();
    let primary_skill_hits: BTreeSet<String> = variant
        .primary_focus
        .iter()
        .filter(|skill| description.contains(&skill.to_lowercase()))
        .cloned()
        .collect();

    let skill_score = (matched_skills.len() as u32 * 15).min(60);

    let family_phrase = variant.role_family.replace('_', " ").to_lowercase();
    let title = job.posting.role_title.to_lowercase();
    let role_confidence = if title.contains(&family_phrase) { 20 } else { 10 };

    let description_chars = job.posting.description_text.chars().count();
    let description_score = if description_chars > 800 {
        20
    } else if description_chars > 300 {
        10
    } else {
        0
    };

    let final_score = skill_score + role_confidence + description_score;
    let decision = if final_score >= APPLY_THRESHOLD {
        Decision::Apply
    } else {
        Decision::Skip
    };

    let alignment = if role_confidence == 20 { "clear" } else { "partial" };
    let detail = match description_score {
        20 => "detailed",
        10 => "moderate",
        _ => "sparse",
    };
    let reason = format!(
        "{}/{} key skills matched; {} primary focus hits; {} role alignment; {} description",
        matched_skills.len(),
        variant.allowed_skills.len(),
        primary_skill_hits.len(),
        alignment,
        detail,
    );

    ScoreResult {
        matched_skills,
        primary_skill_hits,
        skill_score,
        role_confidence,
        description_score,
        final_score,
        decision,
        reason,
    }
}
