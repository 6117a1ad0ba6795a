use serde::{Deserialize, Serialize};

use super::variants::RoleVariantSet;

/// A posting must hit at least this many allowed skills before a role
/// family is considered a candidate.
pub const CLASSIFICATION_THRESHOLD: usize = 2;

/// Raw posting as produced by the (external) collectors. Treated as
/// opaque input; any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub company: String,
    #[serde(default, alias = "role")]
    pub role_title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, alias = "job_description")]
    pub description_text: String,
    #[serde(default)]
    pub apply_url: String,
    #[serde(default)]
    pub source: String,
}

/// A posting assigned to its best-matching role family, or discarded
/// (`role_family: None`). Discarded postings must not be scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedJob {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub role_family: Option<String>,
    pub match_score: usize,
}

impl ClassifiedJob {
    pub fn is_discarded(&self) -> bool {
        self.role_family.is_none()
    }
}

/// Assign a posting to the role variant with the most allowed-skill hits
/// in the combined title + description text.
///
/// A variant qualifies only with `CLASSIFICATION_THRESHOLD` or more hits.
/// A strictly higher hit count wins; on ties the first-seen variant is
/// kept, and the variant set iterates in sorted family order, so the
/// result is reproducible for a given posting and set.
pub fn classify(posting: &JobPosting, variants: &RoleVariantSet) -> ClassifiedJob {
    let haystack = format!("{} {}", posting.role_title, posting.description_text).to_lowercase();

    let mut best: Option<(&str, usize)> = None;
    for variant in variants.iter() {
        let hits = variant
            .allowed_skills
            .iter()
            .filter(|skill| haystack.contains(&skill.to_lowercase()))
            .count();

        if hits < CLASSIFICATION_THRESHOLD {
            continue;
        }

        match best {
            Some((_, current)) if hits <= current => {}
            _ => best = Some((variant.role_family.as_str(), hits)),
        }
    }

    ClassifiedJob {
        posting: posting.clone(),
        role_family: best.map(|(family, _)| family.to_string()),
        match_score: best.map_or(0, |(_, hits)| hits),
    }
}

/// Classify a batch, dropping discarded postings.
pub fn classify_postings(postings: &[JobPosting], variants: &RoleVariantSet) -> Vec<ClassifiedJob> {
    postings
        .iter()
        .map(|posting| classify(posting, variants))
        .filter(|job| !job.is_discarded())
        .collect()
}
