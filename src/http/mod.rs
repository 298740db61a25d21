//! The HTTP API (§6), consumed by clients and produced by this out-of-core
//! server layer. Routing and the content-type middleware are patterned on
//! `StractOrg-stract`'s `crates/core/src/api` (the pack's one comparable
//! axum JSON API) and on
//! `examples/original_source/src/server/server.go`'s `enforceJSONRequest`.

pub mod crawl_jobs;
pub mod links;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::orchestrator::Orchestrator;
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub orchestrator: Orchestrator,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(crawl_jobs::routes())
        .merge(links::routes())
        .layer(middleware::from_fn(enforce_json_request))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}

/// Reimplements `enforceJSONRequest` (§6): an absent `Content-Type` is
/// allowed through; a present-but-unparseable header is a 400; a
/// present-and-parseable-but-wrong media type is a 415.
async fn enforce_json_request(request: Request<Body>, next: Next) -> Response {
    if let Some(content_type) = request.headers().get(axum::http::header::CONTENT_TYPE) {
        let content_type = match content_type.to_str() {
            Ok(value) => value,
            Err(_) => {
                return (StatusCode::BAD_REQUEST, "Malformed Content-Type header").into_response();
            }
        };

        let mime: Result<mime::Mime, _> = content_type.parse();
        match mime {
            Ok(mime) if mime.essence_str() == "application/json" => {}
            Ok(_) => {
                return (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "Content-Type header must be application/json",
                )
                    .into_response();
            }
            Err(_) => {
                return (StatusCode::BAD_REQUEST, "Malformed Content-Type header").into_response();
            }
        }
    }

    next.run(request).await
}
