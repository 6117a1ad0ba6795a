use super::common::*;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;

use chrono::{Duration, NaiveDate, Utc};

use crate::tracker::domain::ApplicationStatus;
use crate::tracker::store::{ApplicationStore, ApplicationUpdate, StoreError};

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[test]
fn add_assigns_defaults_and_rejects_duplicates() {
    let (store, _guard) = temp_store();

    let app = store
        .add(
            "job-001",
            "Initech",
            "Backend Engineer",
            "https://example.com",
            ApplicationStatus::Pending,
        )
        .expect("first add succeeds");
    assert_eq!(app.status, ApplicationStatus::Pending);
    assert!(app.submitted_at.is_none());
    assert!(app.status_history.is_empty());

    let err = store
        .add("job-001", "Initech", "Backend Engineer", "", ApplicationStatus::Pending)
        .expect_err("duplicate id");
    assert!(matches!(err, StoreError::Duplicate(_)));
    assert_eq!(store.len(), 1);
}

#[test]
fn blank_job_ids_are_rejected() {
    let (store, _guard) = temp_store();
    let err = store
        .add("   ", "Initech", "Backend Engineer", "", ApplicationStatus::Pending)
        .expect_err("blank id");
    assert!(matches!(err, StoreError::EmptyJobId));
    assert!(store.is_empty());
}

#[test]
fn update_merges_maps_and_replaces_scalars() {
    let (store, _guard) = temp_store();
    store
        .add("job-001", "Initech", "Backend Engineer", "", ApplicationStatus::Pending)
        .expect("add succeeds");

    store
        .update(
            "job-001",
            ApplicationUpdate {
                filled_fields: Some(BTreeMap::from([
                    ("name".to_string(), "A. Candidate".to_string()),
                    ("email".to_string(), "a@example.com".to_string()),
                ])),
                notes: Some("first pass".to_string()),
                ..ApplicationUpdate::default()
            },
        )
        .expect("update succeeds");

    let app = store
        .update(
            "job-001",
            ApplicationUpdate {
                filled_fields: Some(BTreeMap::from([
                    ("email".to_string(), "b@example.com".to_string()),
                ])),
                notes: Some("second pass".to_string()),
                ..ApplicationUpdate::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(app.filled_fields.len(), 2);
    assert_eq!(app.filled_fields["email"], "b@example.com");
    assert_eq!(app.filled_fields["name"], "A. Candidate");
    assert_eq!(app.notes, "second pass");
}

#[test]
fn update_of_a_missing_application_fails() {
    let (store, _guard) = temp_store();
    let err = store
        .update("job-404", ApplicationUpdate::default())
        .expect_err("missing application");
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn transition_recomputes_the_followup_date() {
    let (store, _guard) = temp_store();
    store
        .add("job-001", "Initech", "Backend Engineer", "", ApplicationStatus::Pending)
        .expect("add succeeds");

    let app = store
        .transition("job-001", ApplicationStatus::Submitted, "applied")
        .expect("legal transition");
    assert!(app.submitted_at.is_some());
    let expected = app.submitted_at.map(|ts| ts + Duration::days(14));
    assert_eq!(app.next_followup_at, expected);

    let app = store
        .transition("job-001", ApplicationStatus::Viewed, "")
        .expect("legal transition");
    assert!(app.next_followup_at.is_some());

    let app = store
        .transition("job-001", ApplicationStatus::Interview, "")
        .expect("legal transition");
    assert_eq!(app.next_followup_at, None);
    assert_eq!(app.status_history.len(), 3);
}

#[test]
fn illegal_transitions_do_not_touch_the_record() {
    let (store, _guard) = temp_store();
    store
        .add("job-001", "Initech", "Backend Engineer", "", ApplicationStatus::Pending)
        .expect("add succeeds");

    let err = store
        .transition("job-001", ApplicationStatus::Offer, "")
        .expect_err("pending cannot jump to offer");
    assert!(matches!(err, StoreError::Transition(_)));

    let app = store.get("job-001").expect("record exists");
    assert_eq!(app.status, ApplicationStatus::Pending);
    assert!(app.status_history.is_empty());
}

#[test]
fn reopening_the_log_restores_the_table() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let log = dir.path().join("applications.csv");

    {
        let store = ApplicationStore::open(&log).expect("store opens");
        store
            .add(
                "job-001",
                "Initech",
                "Backend Engineer",
                "https://example.com",
                ApplicationStatus::Pending,
            )
            .expect("add succeeds");
        store
            .transition("job-001", ApplicationStatus::Submitted, "applied")
            .expect("legal transition");
        store
            .update(
                "job-001",
                ApplicationUpdate {
                    filled_fields: Some(BTreeMap::from([
                        ("name".to_string(), "A. Candidate".to_string()),
                    ])),
                    ..ApplicationUpdate::default()
                },
            )
            .expect("update succeeds");
        store
            .add("job-002", "Globex", "Platform Engineer", "", ApplicationStatus::Submitted)
            .expect("add succeeds");
    }

    let reopened = ApplicationStore::open(&log).expect("store reopens");
    assert_eq!(reopened.len(), 2);

    let app = reopened.get("job-001").expect("record survives");
    assert_eq!(app.status, ApplicationStatus::Submitted);
    assert_eq!(app.status_history.len(), 1);
    assert_eq!(app.status_history[0].notes, "applied");
    assert_eq!(app.filled_fields["name"], "A. Candidate");
    assert!(app.submitted_at.is_some());
    assert!(app.next_followup_at.is_some());
}

#[test]
fn malformed_rows_are_skipped_on_replay() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let log = dir.path().join("applications.csv");

    {
        let store = ApplicationStore::open(&log).expect("store opens");
        store
            .add("job-001", "Initech", "Backend Engineer", "", ApplicationStatus::Pending)
            .expect("add succeeds");
    }

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&log)
        .expect("log writable");
    writeln!(file, "job-bad,only,three").expect("write succeeds");

    let reopened = ApplicationStore::open(&log).expect("bad row is not fatal");
    assert_eq!(reopened.len(), 1);
    assert!(reopened.get("job-001").is_some());
}

#[test]
fn corrupt_embedded_json_degrades_to_empty() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let log = dir.path().join("applications.csv");

    {
        let store = ApplicationStore::open(&log).expect("store opens");
        store
            .add("job-001", "Initech", "Backend Engineer", "", ApplicationStatus::Pending)
            .expect("add succeeds");
    }

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&log)
        .expect("log writable");
    writeln!(
        file,
        "job-001,Initech,Backend Engineer,,pending,,not-json,{{}},[],,,"
    )
    .expect("write succeeds");

    let reopened = ApplicationStore::open(&log).expect("corrupt cell is not fatal");
    let app = reopened.get("job-001").expect("record survives");
    assert!(app.filled_fields.is_empty());
}

#[test]
fn unknown_status_labels_default_to_pending() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let log = dir.path().join("applications.csv");

    {
        let store = ApplicationStore::open(&log).expect("store opens");
        store
            .add("job-001", "Initech", "Backend Engineer", "", ApplicationStatus::Pending)
            .expect("add succeeds");
    }

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&log)
        .expect("log writable");
    writeln!(
        file,
        "job-001,Initech,Backend Engineer,,ghosted,,{{}},{{}},[],,,"
    )
    .expect("write succeeds");

    let reopened = ApplicationStore::open(&log).expect("store reopens");
    let app = reopened.get("job-001").expect("record survives");
    assert_eq!(app.status, ApplicationStatus::Pending);
}

#[test]
fn query_by_status_filters_the_snapshot() {
    let (store, _guard) = temp_store();
    store
        .add("job-001", "Initech", "Backend Engineer", "", ApplicationStatus::Pending)
        .expect("add succeeds");
    store
        .add("job-002", "Globex", "Platform Engineer", "", ApplicationStatus::Submitted)
        .expect("add succeeds");
    store
        .add("job-003", "Hooli", "SRE", "", ApplicationStatus::Submitted)
        .expect("add succeeds");

    let submitted = store.query_by_status(ApplicationStatus::Submitted);
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0].job_id, "job-002");
    assert_eq!(store.snapshot().len(), 3);
}

#[test]
fn summary_counts_statuses_and_rates() {
    let (store, _guard) = temp_store();
    store
        .add("job-001", "Initech", "Backend Engineer", "", ApplicationStatus::Submitted)
        .expect("add succeeds");
    store
        .add("job-002", "Globex", "Platform Engineer", "", ApplicationStatus::Submitted)
        .expect("add succeeds");
    store
        .add("job-003", "Hooli", "SRE", "", ApplicationStatus::Submitted)
        .expect("add succeeds");
    store
        .transition("job-003", ApplicationStatus::Viewed, "")
        .expect("legal transition");
    store
        .transition("job-003", ApplicationStatus::Interview, "")
        .expect("legal transition");

    let summary = store.summary(today() + Duration::days(30));
    assert_eq!(summary.total_applications, 3);
    assert_eq!(summary.by_status["submitted"], 2);
    assert_eq!(summary.by_status["interview"], 1);
    assert_eq!(summary.by_status["pending"], 0);
    assert_eq!(summary.needing_followup, 2);
    assert_eq!(summary.success_rate, Some(50.0));
    assert_eq!(summary.success_rate_label(), "50.0%");
}

#[test]
fn summary_without_submissions_has_no_success_rate() {
    let (store, _guard) = temp_store();
    store
        .add("job-001", "Initech", "Backend Engineer", "", ApplicationStatus::Pending)
        .expect("add succeeds");

    let summary = store.summary(today());
    assert_eq!(summary.success_rate, None);
    assert_eq!(summary.success_rate_label(), "N/A");
}

#[test]
fn due_followups_flow_through_from_the_table() {
    let (store, _guard) = temp_store();
    store
        .add("job-001", "Initech", "Backend Engineer", "", ApplicationStatus::Submitted)
        .expect("add succeeds");

    let due = store.due_followups(today() + Duration::days(20));
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].job_id, "job-001");
    assert!(due[0].template.is_some());

    assert!(store.due_followups(today() + Duration::days(2)).is_empty());
}
