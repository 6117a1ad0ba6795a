//! Interview scheduling and reminder dispatch.
//!
//! Once an application reaches the interview stage it picks up a second
//! timeline: rounds to book, reminders to fire ahead of each round, and
//! feedback to capture afterwards. The [`InterviewPlanner`] owns that
//! timeline per process; reminder timing lives in [`reminders`].

pub mod domain;
pub mod planner;
pub mod reminders;
pub mod router;

pub use domain::{Interview, InterviewStatus, InterviewType, SentReminder};
pub use planner::{InterviewError, InterviewPlanner, InterviewRequest, InterviewUpdate};
pub use reminders::{
    compute_reminders, reminder_label, ReminderEntry, ReminderSchedule, ReminderState,
};
pub use router::interview_router;
