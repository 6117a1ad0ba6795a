use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::classifier::ClassifiedJob;
use super::scorer::{score, Decision, ScoreResult};
use super::variants::RoleVariantSet;
use super::PipelineError;

/// Persisted output of scoring: one record per classified job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub company: String,
    pub role: String,
    pub role_family: String,
    pub resume_variant: String,
    pub match_score: usize,
    pub final_score: u32,
    pub decision: Decision,
    pub reason: String,
    pub apply_url: String,
    /// ISO-8601 UTC, always `Z`-suffixed.
    pub evaluated_at: String,
}

/// Outcome of a batch evaluation run. Skipped jobs are surfaced, never
/// silently scored with defaults.
#[derive(Debug, Default)]
pub struct EvaluationReport {
    pub decisions: Vec<DecisionRecord>,
    pub skipped: Vec<SkippedJob>,
}

#[derive(Debug)]
pub struct SkippedJob {
    pub company: String,
    pub role: String,
    pub error: PipelineError,
}

/// Score one classified job, refusing when its role family is absent
/// from the loaded variant set.
pub fn score_classified(
    job: &ClassifiedJob,
    variants: &RoleVariantSet,
) -> Result<ScoreResult, PipelineError> {
    let role_family = job.role_family.as_deref().ok_or(PipelineError::Unclassified)?;
    let variant = variants
        .get(role_family)
        .ok_or_else(|| PipelineError::UnknownRoleFamily {
            role_family: role_family.to_string(),
        })?;
    Ok(score(job, variant))
}

/// Evaluate a batch of classified jobs. Re-running over the same inputs
/// with the same `evaluated_at` produces an identical report and has no
/// side effects on any store.
pub fn evaluate_batch(
    jobs: &[ClassifiedJob],
    variants: &RoleVariantSet,
    evaluated_at: DateTime<Utc>,
) -> EvaluationReport {
    let stamp = evaluated_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut report = EvaluationReport::default();

    for job in jobs {
        let result = match score_classified(job, variants) {
            Ok(result) => result,
            Err(error) => {
                warn!(
                    company = %job.posting.company,
                    role = %job.posting.role_title,
                    %error,
                    "skipping posting during evaluation"
                );
                report.skipped.push(SkippedJob {
                    company: job.posting.company.clone(),
                    role: job.posting.role_title.clone(),
                    error,
                });
                continue;
            }
        };

        // role_family is present whenever score_classified succeeds
        let role_family = job.role_family.clone().unwrap_or_default();
        info!(
            company = %job.posting.company,
            role = %job.posting.role_title,
            decision = result.decision.label(),
            final_score = result.final_score,
            "evaluated posting"
        );

        report.decisions.push(DecisionRecord {
            company: job.posting.company.clone(),
            role: job.posting.role_title.clone(),
            resume_variant: role_family.clone(),
            role_family,
            match_score: job.match_score,
            final_score: result.final_score,
            decision: result.decision,
            reason: result.reason,
            apply_url: job.posting.apply_url.clone(),
            evaluated_at: stamp.clone(),
        });
    }

    report
}

/// Read a JSON array of raw postings produced by the collectors.
pub fn load_postings(path: &Path) -> Result<Vec<super::classifier::JobPosting>, DecisionIoError> {
    let raw = fs::read_to_string(path).map_err(|source| DecisionIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DecisionIoError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Write decision records as a pretty-printed JSON array, creating the
/// parent directory when needed.
pub fn write_decisions(path: &Path, decisions: &[DecisionRecord]) -> Result<(), DecisionIoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| DecisionIoError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let body = serde_json::to_string_pretty(decisions).map_err(|source| {
        DecisionIoError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, body).map_err(|source| DecisionIoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum DecisionIoError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed json in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
