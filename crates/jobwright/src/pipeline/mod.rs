//! Posting evaluation pipeline: role variants, classification, scoring,
//! and decision-record output.

pub mod classifier;
pub mod decisions;
pub mod scorer;
pub mod variants;

pub use classifier::{classify, classify_postings, ClassifiedJob, JobPosting};
pub use decisions::{
    evaluate_batch, load_postings, score_classified, write_decisions, DecisionIoError,
    DecisionRecord, EvaluationReport, SkippedJob,
};
pub use scorer::{score, Decision, ScoreResult, APPLY_THRESHOLD};
pub use variants::{RoleVariant, RoleVariantSet, VariantError};

/// Why a posting could not be scored.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The classifier discarded the posting; it must not reach the scorer.
    #[error("posting was not classified into any role family")]
    Unclassified,
    /// A classified job references a family missing from the loaded
    /// variant set. Configuration problem, surfaced to the caller.
    #[error("role family '{role_family}' is not present in the loaded variant set")]
    UnknownRoleFamily { role_family: String },
}
