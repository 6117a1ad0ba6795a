use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    PhoneScreen,
    VideoInterview,
    Technical,
    Behavioral,
    OnSite,
    Panel,
    FinalRound,
    Debrief,
}

impl InterviewType {
    pub const fn label(self) -> &'static str {
        match self {
            InterviewType::PhoneScreen => "phone_screen",
            InterviewType::VideoInterview => "video_interview",
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
            InterviewType::OnSite => "on_site",
            InterviewType::Panel => "panel",
            InterviewType::FinalRound => "final_round",
            InterviewType::Debrief => "debrief",
        }
    }

    /// Hours before the interview at which reminders fire, most distant
    /// first.
    pub const fn reminder_offsets(self) -> &'static [i64] {
        match self {
            InterviewType::Technical | InterviewType::Behavioral | InterviewType::Panel => {
                &[48, 24, 2]
            }
            InterviewType::OnSite => &[72, 24, 2],
            InterviewType::FinalRound => &[72, 24],
            InterviewType::Debrief => &[24],
            InterviewType::PhoneScreen | InterviewType::VideoInterview => &[24, 2],
        }
    }
}

/// Informational interview state. Unlike [`crate::tracker`]'s application
/// status there is no enforced transition graph: any value may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    Confirmed,
    ReminderSent,
    InProgress,
    Completed,
    Cancelled,
    Rescheduled,
}

/// Audit entry recording a dispatched reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentReminder {
    pub reminder_type: String,
    pub sent_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    /// `int_<job_id>_<seq>`, unique per interview.
    pub id: String,
    pub job_id: String,
    pub company: String,
    pub role: String,
    pub interview_type: InterviewType,
    pub scheduled_at: NaiveDateTime,
    pub interviewer: String,
    pub location: String,
    pub status: InterviewStatus,
    #[serde(default)]
    pub reminders_sent: Vec<SentReminder>,
    pub feedback: Option<String>,
    #[serde(default)]
    pub preparation_complete: bool,
}
