use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDateTime;
use serde_json::Value;
use tempfile::TempDir;

use crate::tracker::domain::{Application, ApplicationStatus};
use crate::tracker::store::ApplicationStore;

pub(super) fn ts(raw: &str) -> NaiveDateTime {
    raw.parse().expect("valid timestamp")
}

pub(super) fn application(job_id: &str, status: ApplicationStatus) -> Application {
    Application::new(
        job_id,
        "Initech",
        "Backend Engineer",
        "https://jobs.example.com/backend",
        status,
        ts("2025-01-01T09:00:00"),
    )
}

/// Store backed by a throwaway log file. The directory guard must stay
/// alive for the duration of the test.
pub(super) fn temp_store() -> (Arc<ApplicationStore>, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let store =
        ApplicationStore::open(dir.path().join("applications.csv")).expect("store opens");
    (Arc::new(store), dir)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
