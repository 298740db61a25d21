//! `GET /api/links?crawlJobId={n}` (§6), grounded in
//! `examples/original_source/src/server/links.go`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct LinksQuery {
    #[serde(rename = "crawlJobId")]
    crawl_job_id: Option<i64>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/links", get(get_links))
}

async fn get_links(State(state): State<AppState>, Query(query): Query<LinksQuery>) -> Response {
    let Some(crawl_job_id) = query.crawl_job_id else {
        return (StatusCode::BAD_REQUEST, "crawlJobId must be an integer").into_response();
    };

    match state.storage.get_links(crawl_job_id).await {
        Ok(links) => (StatusCode::OK, Json(links)).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}
