use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::domain::InterviewType;

/// A reminder is dispatchable when `now` is within this many seconds of
/// its scheduled time, on either side.
const DUE_WINDOW_SECONDS: i64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderState {
    Pending,
    Sent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderEntry {
    pub interview_id: String,
    pub reminder_type: String,
    pub hours_before: i64,
    pub scheduled_for: NaiveDateTime,
    pub status: ReminderState,
    pub sent_at: Option<NaiveDateTime>,
}

/// Human-readable name for a reminder offset.
pub fn reminder_label(hours_before: i64) -> String {
    if hours_before >= 48 {
        format!("{} day reminder", hours_before / 24)
    } else if hours_before > 24 {
        format!("{} hours before", hours_before - 24)
    } else if hours_before >= 2 {
        format!("{} hour reminder", hours_before)
    } else {
        "last minute reminder".to_string()
    }
}

/// Compute the reminder entries for an interview at `scheduled_at`.
///
/// One entry per type offset; entries whose fire time is already behind
/// `now` are dropped — reminders are never scheduled retroactively.
pub fn compute_reminders(
    interview_id: &str,
    scheduled_at: NaiveDateTime,
    interview_type: InterviewType,
    now: NaiveDateTime,
) -> Vec<ReminderEntry> {
    interview_type
        .reminder_offsets()
        .iter()
        .filter_map(|&hours_before| {
            let scheduled_for = scheduled_at - Duration::hours(hours_before);
            (scheduled_for > now).then(|| ReminderEntry {
                interview_id: interview_id.to_string(),
                reminder_type: reminder_label(hours_before),
                hours_before,
                scheduled_for,
                status: ReminderState::Pending,
                sent_at: None,
            })
        })
        .collect()
}

/// Owned reminder book, one entry list per interview. Replaces the
/// process-wide schedule dictionary of the original design: callers hold
/// and pass this explicitly.
#[derive(Debug, Default)]
pub struct ReminderSchedule {
    entries: BTreeMap<String, Vec<ReminderEntry>>,
}

impl ReminderSchedule {
    /// Install the entries for an interview, replacing any previous set
    /// wholesale. Rescheduling recomputes, it never merges.
    pub fn set(&mut self, interview_id: &str, entries: Vec<ReminderEntry>) {
        self.entries.insert(interview_id.to_string(), entries);
    }

    pub fn remove(&mut self, interview_id: &str) {
        self.entries.remove(interview_id);
    }

    pub fn for_interview(&self, interview_id: &str) -> &[ReminderEntry] {
        self.entries
            .get(interview_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pending entries whose scheduled time is within the dispatch
    /// window around `now`.
    pub fn due(&self, now: NaiveDateTime) -> Vec<ReminderEntry> {
        self.entries
            .values()
            .flatten()
            .filter(|entry| entry.status == ReminderState::Pending)
            .filter(|entry| {
                (entry.scheduled_for - now).num_seconds().abs() <= DUE_WINDOW_SECONDS
            })
            .cloned()
            .collect()
    }

    /// Flip a pending reminder to sent, recording `sent_at`. The
    /// transition is irreversible; returns false when no pending entry
    /// matched.
    pub fn mark_sent(
        &mut self,
        interview_id: &str,
        reminder_type: &str,
        now: NaiveDateTime,
    ) -> bool {
        let Some(entries) = self.entries.get_mut(interview_id) else {
            return false;
        };

        let mut marked = false;
        for entry in entries.iter_mut() {
            if entry.reminder_type == reminder_type && entry.status == ReminderState::Pending {
                entry.status = ReminderState::Sent;
                entry.sent_at = Some(now);
                marked = true;
            }
        }
        marked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> NaiveDateTime {
        raw.parse().expect("valid timestamp")
    }

    #[test]
    fn technical_interviews_get_three_reminders_when_all_are_ahead() {
        let reminders = compute_reminders(
            "int_job-001_0",
            ts("2025-03-10T14:00:00"),
            InterviewType::Technical,
            ts("2025-03-01T09:00:00"),
        );

        let offsets: Vec<i64> = reminders.iter().map(|r| r.hours_before).collect();
        assert_eq!(offsets, vec![48, 24, 2]);
        assert_eq!(reminders[0].scheduled_for, ts("2025-03-08T14:00:00"));
        assert_eq!(reminders[1].scheduled_for, ts("2025-03-09T14:00:00"));
        assert_eq!(reminders[2].scheduled_for, ts("2025-03-10T12:00:00"));
        assert!(reminders.iter().all(|r| r.status == ReminderState::Pending));
    }

    #[test]
    fn past_offsets_are_dropped_when_now_is_inside_the_window() {
        // within 24h of the interview only the 2h entry remains
        let reminders = compute_reminders(
            "int_job-001_0",
            ts("2025-03-10T14:00:00"),
            InterviewType::Technical,
            ts("2025-03-09T20:00:00"),
        );

        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].hours_before, 2);
    }

    #[test]
    fn labels_follow_the_offset_tiers() {
        assert_eq!(reminder_label(72), "3 day reminder");
        assert_eq!(reminder_label(48), "2 day reminder");
        assert_eq!(reminder_label(24), "24 hour reminder");
        assert_eq!(reminder_label(2), "2 hour reminder");
        assert_eq!(reminder_label(1), "last minute reminder");
    }

    #[test]
    fn due_requires_the_five_minute_window_and_pending_state() {
        let mut schedule = ReminderSchedule::default();
        schedule.set(
            "int_job-001_0",
            compute_reminders(
                "int_job-001_0",
                ts("2025-03-10T14:00:00"),
                InterviewType::Debrief,
                ts("2025-03-01T09:00:00"),
            ),
        );

        // 24h reminder fires at 2025-03-09T14:00:00
        assert!(schedule.due(ts("2025-03-09T13:50:00")).is_empty());
        assert_eq!(schedule.due(ts("2025-03-09T13:56:00")).len(), 1);
        assert_eq!(schedule.due(ts("2025-03-09T14:04:00")).len(), 1);
        assert!(schedule.due(ts("2025-03-09T14:06:00")).is_empty());

        let marked =
            schedule.mark_sent("int_job-001_0", "24 hour reminder", ts("2025-03-09T14:00:00"));
        assert!(marked);
        assert!(schedule.due(ts("2025-03-09T14:00:00")).is_empty());
    }

    #[test]
    fn mark_sent_is_irreversible_and_records_the_dispatch_time() {
        let mut schedule = ReminderSchedule::default();
        schedule.set(
            "int_job-002_0",
            compute_reminders(
                "int_job-002_0",
                ts("2025-04-01T10:00:00"),
                InterviewType::PhoneScreen,
                ts("2025-03-25T10:00:00"),
            ),
        );

        assert!(schedule.mark_sent("int_job-002_0", "24 hour reminder", ts("2025-03-31T10:01:00")));
        // already sent: a second dispatch attempt finds nothing pending
        let resent =
            schedule.mark_sent("int_job-002_0", "24 hour reminder", ts("2025-03-31T10:05:00"));
        assert!(!resent);

        let entry = schedule
            .for_interview("int_job-002_0")
            .iter()
            .find(|e| e.hours_before == 24)
            .expect("entry present")
            .clone();
        assert_eq!(entry.status, ReminderState::Sent);
        assert_eq!(entry.sent_at, Some(ts("2025-03-31T10:01:00")));
    }

    #[test]
    fn rescheduling_replaces_entries_wholesale() {
        let mut schedule = ReminderSchedule::default();
        let first = compute_reminders(
            "int_job-003_0",
            ts("2025-05-01T09:00:00"),
            InterviewType::OnSite,
            ts("2025-04-20T09:00:00"),
        );
        schedule.set("int_job-003_0", first);
        schedule.mark_sent("int_job-003_0", "3 day reminder", ts("2025-04-28T09:00:00"));

        let second = compute_reminders(
            "int_job-003_0",
            ts("2025-05-08T09:00:00"),
            InterviewType::OnSite,
            ts("2025-04-29T09:00:00"),
        );
        schedule.set("int_job-003_0", second);

        let entries = schedule.for_interview("int_job-003_0");
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.status == ReminderState::Pending));
    }
}
