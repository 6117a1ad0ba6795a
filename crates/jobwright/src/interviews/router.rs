use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::planner::{InterviewError, InterviewPlanner, InterviewRequest, InterviewUpdate};

type SharedPlanner = Arc<Mutex<InterviewPlanner>>;

/// Router builder exposing interview scheduling and reminder dispatch.
pub fn interview_router(planner: SharedPlanner) -> Router {
    Router::new()
        .route(
            "/api/v1/interviews",
            post(schedule_handler).get(list_handler),
        )
        .route(
            "/api/v1/interviews/reminders/due",
            get(due_reminders_handler),
        )
        .route(
            "/api/v1/interviews/:interview_id",
            get(get_handler).patch(update_handler),
        )
        .route(
            "/api/v1/interviews/:interview_id/reschedule",
            post(reschedule_handler),
        )
        .route(
            "/api/v1/interviews/:interview_id/reminders/sent",
            post(reminder_sent_handler),
        )
        .with_state(planner)
}

fn lock(planner: &SharedPlanner) -> MutexGuard<'_, InterviewPlanner> {
    planner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Deserialize)]
struct RescheduleRequest {
    scheduled_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
struct ReminderSentRequest {
    reminder_type: String,
}

#[derive(Debug, Deserialize)]
struct ListFilter {
    job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AsOfQuery {
    now: Option<NaiveDateTime>,
}

async fn schedule_handler(
    State(planner): State<SharedPlanner>,
    axum::Json(request): axum::Json<InterviewRequest>,
) -> Response {
    let interview = lock(&planner).schedule_interview(request, Utc::now().naive_utc());
    (StatusCode::CREATED, axum::Json(interview)).into_response()
}

async fn list_handler(
    State(planner): State<SharedPlanner>,
    Query(filter): Query<ListFilter>,
) -> Response {
    let planner = lock(&planner);
    let interviews = match filter.job_id {
        Some(job_id) => planner.for_job(&job_id),
        None => planner.snapshot(),
    };
    (StatusCode::OK, axum::Json(interviews)).into_response()
}

async fn get_handler(
    State(planner): State<SharedPlanner>,
    Path(interview_id): Path<String>,
) -> Response {
    match lock(&planner).get(&interview_id) {
        Some(interview) => (StatusCode::OK, axum::Json(interview.clone())).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            &InterviewError::NotFound(interview_id),
        ),
    }
}

async fn update_handler(
    State(planner): State<SharedPlanner>,
    Path(interview_id): Path<String>,
    axum::Json(update): axum::Json<InterviewUpdate>,
) -> Response {
    match lock(&planner).update(&interview_id, update) {
        Ok(interview) => (StatusCode::OK, axum::Json(interview)).into_response(),
        Err(error) => error_response(StatusCode::NOT_FOUND, &error),
    }
}

async fn reschedule_handler(
    State(planner): State<SharedPlanner>,
    Path(interview_id): Path<String>,
    axum::Json(request): axum::Json<RescheduleRequest>,
) -> Response {
    match lock(&planner).reschedule(&interview_id, request.scheduled_at, Utc::now().naive_utc()) {
        Ok(interview) => (StatusCode::OK, axum::Json(interview)).into_response(),
        Err(error) => error_response(StatusCode::NOT_FOUND, &error),
    }
}

async fn due_reminders_handler(
    State(planner): State<SharedPlanner>,
    Query(query): Query<AsOfQuery>,
) -> Response {
    let now = query.now.unwrap_or_else(|| Utc::now().naive_utc());
    (StatusCode::OK, axum::Json(lock(&planner).due_reminders(now))).into_response()
}

async fn reminder_sent_handler(
    State(planner): State<SharedPlanner>,
    Path(interview_id): Path<String>,
    axum::Json(request): axum::Json<ReminderSentRequest>,
) -> Response {
    match lock(&planner).mark_reminder_sent(
        &interview_id,
        &request.reminder_type,
        Utc::now().naive_utc(),
    ) {
        Ok(interview) => (StatusCode::OK, axum::Json(interview)).into_response(),
        Err(error @ InterviewError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, &error)
        }
        Err(error @ InterviewError::ReminderNotPending { .. }) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &error)
        }
    }
}

fn error_response(status: StatusCode, error: &InterviewError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
