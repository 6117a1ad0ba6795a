use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::domain::{Interview, InterviewStatus, InterviewType, SentReminder};
use super::reminders::{compute_reminders, ReminderEntry, ReminderSchedule};

#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("interview {0} not found")]
    NotFound(String),
    #[error("no pending {reminder_type} reminder for interview {interview_id}")]
    ReminderNotPending {
        interview_id: String,
        reminder_type: String,
    },
}

fn default_interviewer() -> String {
    "TBD".to_string()
}

fn default_location() -> String {
    "Virtual (TBD)".to_string()
}

/// Incoming scheduling request. Interviewer and location are often
/// unknown at booking time, so both default to placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewRequest {
    pub job_id: String,
    pub company: String,
    pub role: String,
    pub interview_type: InterviewType,
    pub scheduled_at: NaiveDateTime,
    #[serde(default = "default_interviewer")]
    pub interviewer: String,
    #[serde(default = "default_location")]
    pub location: String,
}

/// Fields a caller may amend on an existing interview. Absent fields
/// are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewUpdate {
    pub status: Option<InterviewStatus>,
    pub interviewer: Option<String>,
    pub location: Option<String>,
    pub feedback: Option<String>,
    pub preparation_complete: Option<bool>,
}

/// In-memory interview book plus its reminder schedule. Interview ids
/// are `int_<job_id>_<seq>` where `seq` counts prior interviews for the
/// same job, so repeat rounds stay distinguishable.
#[derive(Debug, Default)]
pub struct InterviewPlanner {
    interviews: BTreeMap<String, Interview>,
    schedule: ReminderSchedule,
}

impl InterviewPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_interview(
        &mut self,
        request: InterviewRequest,
        now: NaiveDateTime,
    ) -> Interview {
        let seq = self
            .interviews
            .values()
            .filter(|interview| interview.job_id == request.job_id)
            .count();
        let id = format!("int_{}_{}", request.job_id, seq);

        let interview = Interview {
            id: id.clone(),
            job_id: request.job_id,
            company: request.company,
            role: request.role,
            interview_type: request.interview_type,
            scheduled_at: request.scheduled_at,
            interviewer: request.interviewer,
            location: request.location,
            status: InterviewStatus::Scheduled,
            reminders_sent: Vec::new(),
            feedback: None,
            preparation_complete: false,
        };

        let entries = compute_reminders(&id, interview.scheduled_at, interview.interview_type, now);
        info!(
            interview_id = %id,
            interview_type = interview.interview_type.label(),
            reminders = entries.len(),
            "interview scheduled"
        );
        self.schedule.set(&id, entries);
        self.interviews.insert(id, interview.clone());
        interview
    }

    /// Move an interview to a new time. Reminder entries are recomputed
    /// from scratch; anything already sent against the old time is
    /// forgotten.
    pub fn reschedule(
        &mut self,
        interview_id: &str,
        scheduled_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Interview, InterviewError> {
        let interview = self
            .interviews
            .get_mut(interview_id)
            .ok_or_else(|| InterviewError::NotFound(interview_id.to_string()))?;

        interview.scheduled_at = scheduled_at;
        interview.status = InterviewStatus::Rescheduled;
        let entries = compute_reminders(interview_id, scheduled_at, interview.interview_type, now);
        info!(interview_id, %scheduled_at, reminders = entries.len(), "interview rescheduled");
        self.schedule.set(interview_id, entries);
        Ok(interview.clone())
    }

    pub fn update(
        &mut self,
        interview_id: &str,
        update: InterviewUpdate,
    ) -> Result<Interview, InterviewError> {
        let interview = self
            .interviews
            .get_mut(interview_id)
            .ok_or_else(|| InterviewError::NotFound(interview_id.to_string()))?;

        if let Some(status) = update.status {
            interview.status = status;
        }
        if let Some(interviewer) = update.interviewer {
            interview.interviewer = interviewer;
        }
        if let Some(location) = update.location {
            interview.location = location;
        }
        if let Some(feedback) = update.feedback {
            interview.feedback = Some(feedback);
        }
        if let Some(done) = update.preparation_complete {
            interview.preparation_complete = done;
        }
        Ok(interview.clone())
    }

    pub fn get(&self, interview_id: &str) -> Option<&Interview> {
        self.interviews.get(interview_id)
    }

    pub fn snapshot(&self) -> Vec<Interview> {
        self.interviews.values().cloned().collect()
    }

    pub fn for_job(&self, job_id: &str) -> Vec<Interview> {
        self.interviews
            .values()
            .filter(|interview| interview.job_id == job_id)
            .cloned()
            .collect()
    }

    pub fn reminders_for(&self, interview_id: &str) -> &[ReminderEntry] {
        self.schedule.for_interview(interview_id)
    }

    pub fn due_reminders(&self, now: NaiveDateTime) -> Vec<ReminderEntry> {
        self.schedule.due(now)
    }

    /// Record a reminder dispatch. Marks the schedule entry sent, logs
    /// the dispatch on the interview, and bumps a still-scheduled
    /// interview to reminder-sent state.
    pub fn mark_reminder_sent(
        &mut self,
        interview_id: &str,
        reminder_type: &str,
        now: NaiveDateTime,
    ) -> Result<Interview, InterviewError> {
        if !self.interviews.contains_key(interview_id) {
            return Err(InterviewError::NotFound(interview_id.to_string()));
        }
        if !self.schedule.mark_sent(interview_id, reminder_type, now) {
            return Err(InterviewError::ReminderNotPending {
                interview_id: interview_id.to_string(),
                reminder_type: reminder_type.to_string(),
            });
        }

        let interview = self
            .interviews
            .get_mut(interview_id)
            .ok_or_else(|| InterviewError::NotFound(interview_id.to_string()))?;
        interview.reminders_sent.push(SentReminder {
            reminder_type: reminder_type.to_string(),
            sent_at: now,
        });
        if matches!(
            interview.status,
            InterviewStatus::Scheduled | InterviewStatus::Confirmed
        ) {
            interview.status = InterviewStatus::ReminderSent;
        }
        Ok(interview.clone())
    }
}
