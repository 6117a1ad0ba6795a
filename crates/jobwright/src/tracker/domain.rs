use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Contractual status of a tracked application. Transitions are enforced
/// by the lifecycle state machine; this enum never changes outside it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Not yet submitted.
    Pending,
    /// Successfully applied.
    Submitted,
    /// Recruiter viewed the profile.
    Viewed,
    /// Interview offered.
    Interview,
    Rejected,
    /// Offer received.
    Offer,
    Accepted,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Viewed => "viewed",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::all().into_iter().find(|status| status.label() == value)
    }

    pub const fn all() -> [ApplicationStatus; 8] {
        [
            ApplicationStatus::Pending,
            ApplicationStatus::Submitted,
            ApplicationStatus::Viewed,
            ApplicationStatus::Interview,
            ApplicationStatus::Rejected,
            ApplicationStatus::Offer,
            ApplicationStatus::Accepted,
            ApplicationStatus::Withdrawn,
        ]
    }
}

/// One entry in an application's append-only status history.
/// Immutable once appended; insertion order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ApplicationStatus,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub notes: String,
}

/// Single application record with status tracking and follow-up dates.
///
/// Owned exclusively by the store: created on `add`, mutated only through
/// store methods, never deleted — terminal states are kept for history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub job_id: String,
    pub company: String,
    pub role: String,
    pub apply_url: String,
    pub status: ApplicationStatus,
    /// Set exactly once, the first time the status becomes Submitted.
    pub submitted_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub filled_fields: BTreeMap<String, String>,
    #[serde(default)]
    pub ambiguous_fields_filled: BTreeMap<String, String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    pub last_followup_at: Option<NaiveDateTime>,
    pub next_followup_at: Option<NaiveDateTime>,
}

impl Application {
    pub fn new(
        job_id: &str,
        company: &str,
        role: &str,
        apply_url: &str,
        status: ApplicationStatus,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            job_id: job_id.to_string(),
            company: company.to_string(),
            role: role.to_string(),
            apply_url: apply_url.to_string(),
            status,
            submitted_at: (status == ApplicationStatus::Submitted).then_some(now),
            filled_fields: BTreeMap::new(),
            ambiguous_fields_filled: BTreeMap::new(),
            notes: String::new(),
            status_history: Vec::new(),
            last_followup_at: None,
            next_followup_at: None,
        }
    }
}
