//! Storage contract (§6): the persistence surface the core depends on but
//! does not own. Grounded in `examples/original_source/src/dal/dal.go`'s
//! `LinkRepository`/`CrawlJobRepository` interfaces, rendered as one async
//! trait object-safe enough to be shared behind an `Arc` from both the HTTP
//! handlers and the orchestrator's background task.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Job, JobStatus, Link};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// "Not found" is signalled by `Ok(None)`, never an error (§6).
#[async_trait]
pub trait Storage: Send + Sync {
    async fn add_crawl_job(&self, base_url: &str) -> Result<i64, StoreError>;
    async fn get_crawl_job_for_url(&self, base_url: &str) -> Result<Option<Job>, StoreError>;
    async fn get_crawl_job(&self, job_id: i64) -> Result<Option<Job>, StoreError>;
    async fn get_crawl_jobs(&self) -> Result<Vec<Job>, StoreError>;
    async fn update_crawl_job_status(&self, job_id: i64, status: JobStatus) -> Result<(), StoreError>;
    async fn add_link(&self, url: &str, crawl_job_id: i64) -> Result<i64, StoreError>;
    async fn get_links(&self, crawl_job_id: i64) -> Result<Vec<Link>, StoreError>;
}
