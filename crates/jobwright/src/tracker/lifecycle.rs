use chrono::NaiveDateTime;

use super::domain::{Application, ApplicationStatus, StatusChange};

impl ApplicationStatus {
    /// The centrally-defined transition table. Directed, no self-loops.
    pub const fn allowed_transitions(self) -> &'static [ApplicationStatus] {
        match self {
            ApplicationStatus::Pending => &[ApplicationStatus::Submitted],
            ApplicationStatus::Submitted => &[
                ApplicationStatus::Viewed,
                ApplicationStatus::Rejected,
                ApplicationStatus::Withdrawn,
            ],
            ApplicationStatus::Viewed => &[
                ApplicationStatus::Interview,
                ApplicationStatus::Rejected,
                ApplicationStatus::Withdrawn,
            ],
            ApplicationStatus::Interview => &[
                ApplicationStatus::Offer,
                ApplicationStatus::Rejected,
                ApplicationStatus::Withdrawn,
            ],
            ApplicationStatus::Offer => {
                &[ApplicationStatus::Accepted, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Accepted
            | ApplicationStatus::Rejected
            | ApplicationStatus::Withdrawn => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

/// Rejected status transition. Carries both endpoints for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid status transition {} -> {}", .from.label(), .to.label())]
pub struct TransitionError {
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
}

/// Apply a status transition to an application.
///
/// This is the only mutation path for `status`. On rejection the
/// application is left completely unchanged: no history append, no
/// status change. On success the change is appended to the history,
/// and `submitted_at` is set the first time the status reaches
/// Submitted, never overwritten afterwards.
pub fn transition(
    application: &mut Application,
    new_status: ApplicationStatus,
    notes: &str,
    now: NaiveDateTime,
) -> Result<(), TransitionError> {
    if !application.status.can_transition_to(new_status) {
        return Err(TransitionError {
            from: application.status,
            to: new_status,
        });
    }

    application.status_history.push(StatusChange {
        status: new_status,
        timestamp: now,
        notes: notes.to_string(),
    });
    application.status = new_status;

    if new_status == ApplicationStatus::Submitted && application.submitted_at.is_none() {
        application.submitted_at = Some(now);
    }

    Ok(())
}
