use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::ApplicationStatus;
use super::store::{ApplicationStore, ApplicationUpdate, StoreError};

/// Router builder exposing the application tracker to dashboard-style
/// consumers.
pub fn application_router(store: Arc<ApplicationStore>) -> Router {
    Router::new()
        .route("/api/v1/applications", post(add_handler).get(list_handler))
        .route("/api/v1/applications/summary", get(summary_handler))
        .route(
            "/api/v1/applications/followups/due",
            get(due_followups_handler),
        )
        .route(
            "/api/v1/applications/:job_id",
            get(get_handler).patch(update_handler),
        )
        .route(
            "/api/v1/applications/:job_id/transition",
            post(transition_handler),
        )
        .with_state(store)
}

#[derive(Debug, Deserialize)]
struct AddRequest {
    job_id: String,
    company: String,
    role: String,
    #[serde(default)]
    apply_url: String,
    #[serde(default)]
    status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
struct TransitionRequest {
    status: ApplicationStatus,
    #[serde(default)]
    notes: String,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
struct AsOfQuery {
    today: Option<NaiveDate>,
}

async fn add_handler(
    State(store): State<Arc<ApplicationStore>>,
    axum::Json(request): axum::Json<AddRequest>,
) -> Response {
    let status = request.status.unwrap_or(ApplicationStatus::Pending);
    match store.add(
        &request.job_id,
        &request.company,
        &request.role,
        &request.apply_url,
        status,
    ) {
        Ok(app) => (StatusCode::CREATED, axum::Json(app)).into_response(),
        Err(error @ StoreError::Duplicate(_)) => {
            error_response(StatusCode::CONFLICT, &error)
        }
        Err(error @ StoreError::EmptyJobId) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &error)
        }
        Err(error) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &error),
    }
}

async fn list_handler(
    State(store): State<Arc<ApplicationStore>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let applications = match query.status {
        Some(status) => store.query_by_status(status),
        None => store.snapshot(),
    };
    (StatusCode::OK, axum::Json(applications)).into_response()
}

async fn get_handler(
    State(store): State<Arc<ApplicationStore>>,
    Path(job_id): Path<String>,
) -> Response {
    match store.get(&job_id) {
        Some(app) => (StatusCode::OK, axum::Json(app)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            &StoreError::NotFound(job_id),
        ),
    }
}

async fn update_handler(
    State(store): State<Arc<ApplicationStore>>,
    Path(job_id): Path<String>,
    axum::Json(update): axum::Json<ApplicationUpdate>,
) -> Response {
    match store.update(&job_id, update) {
        Ok(app) => (StatusCode::OK, axum::Json(app)).into_response(),
        Err(error @ StoreError::NotFound(_)) => error_response(StatusCode::NOT_FOUND, &error),
        Err(error) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &error),
    }
}

async fn transition_handler(
    State(store): State<Arc<ApplicationStore>>,
    Path(job_id): Path<String>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response {
    match store.transition(&job_id, request.status, &request.notes) {
        Ok(app) => (StatusCode::OK, axum::Json(app)).into_response(),
        Err(error @ StoreError::NotFound(_)) => error_response(StatusCode::NOT_FOUND, &error),
        Err(error @ StoreError::Transition(_)) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &error)
        }
        Err(error) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &error),
    }
}

async fn summary_handler(
    State(store): State<Arc<ApplicationStore>>,
    Query(query): Query<AsOfQuery>,
) -> Response {
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    (StatusCode::OK, axum::Json(store.summary(today))).into_response()
}

async fn due_followups_handler(
    State(store): State<Arc<ApplicationStore>>,
    Query(query): Query<AsOfQuery>,
) -> Response {
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    (StatusCode::OK, axum::Json(store.due_followups(today))).into_response()
}

fn error_response(status: StatusCode, error: &StoreError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
