use super::common::*;
use chrono::NaiveDate;

use crate::tracker::domain::ApplicationStatus;
use crate::tracker::followup::{
    due_followups, followup_interval_days, next_followup, template,
};

#[test]
fn submitted_applications_wait_fourteen_days() {
    let next = next_followup(
        ApplicationStatus::Submitted,
        Some(ts("2025-01-01T00:00:00")),
        None,
        ts("2025-02-01T00:00:00"),
    );
    assert_eq!(next, Some(ts("2025-01-15T00:00:00")));
}

#[test]
fn viewed_applications_wait_seven_days() {
    let next = next_followup(
        ApplicationStatus::Viewed,
        Some(ts("2025-01-01T00:00:00")),
        None,
        ts("2025-02-01T00:00:00"),
    );
    assert_eq!(next, Some(ts("2025-01-08T00:00:00")));
}

#[test]
fn a_previous_followup_moves_the_base() {
    let next = next_followup(
        ApplicationStatus::Submitted,
        Some(ts("2025-01-01T00:00:00")),
        Some(ts("2025-01-20T00:00:00")),
        ts("2025-02-01T00:00:00"),
    );
    assert_eq!(next, Some(ts("2025-02-03T00:00:00")));
}

#[test]
fn now_is_the_base_of_last_resort() {
    let next = next_followup(
        ApplicationStatus::Viewed,
        None,
        None,
        ts("2025-02-01T00:00:00"),
    );
    assert_eq!(next, Some(ts("2025-02-08T00:00:00")));
}

#[test]
fn statuses_without_an_interval_get_no_followup() {
    for status in [
        ApplicationStatus::Pending,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ] {
        assert_eq!(followup_interval_days(status), 0);
        assert_eq!(
            next_followup(status, Some(ts("2025-01-01T00:00:00")), None, ts("2025-02-01T00:00:00")),
            None
        );
    }
}

#[test]
fn templates_exist_for_exactly_three_statuses() {
    for status in ApplicationStatus::all() {
        let body = template(status, "Initech", "Backend Engineer", Some(ts("2025-01-01T09:00:00")));
        let expected = matches!(
            status,
            ApplicationStatus::Submitted
                | ApplicationStatus::Viewed
                | ApplicationStatus::Interview
        );
        assert_eq!(body.is_some(), expected, "status {}", status.label());
    }
}

#[test]
fn the_submitted_template_spells_out_the_date() {
    let body = template(
        ApplicationStatus::Submitted,
        "Initech",
        "Backend Engineer",
        Some(ts("2025-01-01T09:00:00")),
    )
    .expect("submitted has a template");

    assert!(body.starts_with("Subject: Following Up - Backend Engineer Application at Initech"));
    assert!(body.contains("January 01, 2025"));
}

#[test]
fn due_followups_sort_most_overdue_first() {
    let mut early = application("job-001", ApplicationStatus::Submitted);
    early.next_followup_at = Some(ts("2025-01-10T00:00:00"));
    let mut late = application("job-002", ApplicationStatus::Viewed);
    late.next_followup_at = Some(ts("2025-01-18T00:00:00"));
    let mut future = application("job-003", ApplicationStatus::Submitted);
    future.next_followup_at = Some(ts("2025-02-10T00:00:00"));
    let none = application("job-004", ApplicationStatus::Pending);

    let today = NaiveDate::from_ymd_opt(2025, 1, 20).expect("valid date");
    let due = due_followups([&early, &late, &future, &none], today);

    assert_eq!(due.len(), 2);
    assert_eq!(due[0].job_id, "job-001");
    assert_eq!(due[0].days_overdue, 10);
    assert_eq!(due[1].job_id, "job-002");
    assert_eq!(due[1].days_overdue, 2);
    assert!(due[0].template.is_some());
}

#[test]
fn followups_due_today_count_as_due() {
    let mut app = application("job-001", ApplicationStatus::Submitted);
    app.next_followup_at = Some(ts("2025-01-20T15:30:00"));

    let today = NaiveDate::from_ymd_opt(2025, 1, 20).expect("valid date");
    let due = due_followups([&app], today);

    assert_eq!(due.len(), 1);
    assert_eq!(due[0].days_overdue, 0);
}
