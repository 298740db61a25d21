//! `POST /api/crawlJobs`, `GET /api/crawlJobs/{id}`, `GET /api/crawlJobs`
//! (§6), grounded in
//! `examples/original_source/src/server/crawlJobs.go`.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::models::CrawlJobRequest;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/crawlJobs", post(create_crawl_job).get(list_crawl_jobs))
        .route("/crawlJobs/:id", get(get_crawl_job))
}

// Decodes the body by hand rather than via axum's `Json` extractor: the
// enforce_json_request middleware already validated Content-Type (§6),
// and the spec allows a body with no Content-Type header at all, which
// `Json`'s own built-in rejection does not.
async fn create_crawl_job(State(state): State<AppState>, body: Bytes) -> Response {
    let request: CrawlJobRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid json body").into_response(),
    };

    if request.base_url.is_empty() {
        return (StatusCode::BAD_REQUEST, "Invalid json body").into_response();
    }

    match state.orchestrator.start_job(&request.base_url).await {
        Ok(job_id) => (StatusCode::OK, Json(job_id)).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

async fn get_crawl_job(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.storage.get_crawl_job(id).await {
        Ok(Some(job)) => (StatusCode::OK, Json(job)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "crawl job not found").into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

async fn list_crawl_jobs(State(state): State<AppState>) -> Response {
    match state.storage.get_crawl_jobs().await {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}
