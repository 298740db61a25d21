//! In-memory `Storage` implementation. Plays the role the Go reference's
//! `mocks` package plays for its tests: lets the crawler and orchestrator be
//! exercised without a live Postgres instance.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{Job, JobStatus, Link};

use super::{Storage, StoreError};

#[derive(Default)]
struct Inner {
    jobs: HashMap<i64, Job>,
    links: HashMap<i64, Link>,
    next_job_id: i64,
    next_link_id: i64,
}

#[derive(Default)]
pub struct InMemoryStorage {
    inner: Mutex<Inner>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn add_crawl_job(&self, base_url: &str) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_job_id += 1;
        let job_id = inner.next_job_id;
        inner.jobs.insert(
            job_id,
            Job {
                job_id,
                base_url: base_url.to_string(),
                status: JobStatus::InProgress,
                last_updated: Utc::now(),
            },
        );
        Ok(job_id)
    }

    async fn get_crawl_job_for_url(&self, base_url: &str) -> Result<Option<Job>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.jobs.values().find(|job| job.base_url == base_url).cloned())
    }

    async fn get_crawl_job(&self, job_id: i64) -> Result<Option<Job>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.jobs.get(&job_id).cloned())
    }

    async fn get_crawl_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut jobs: Vec<_> = inner.jobs.values().cloned().collect();
        jobs.sort_by_key(|job| job.job_id);
        Ok(jobs)
    }

    async fn update_crawl_job_status(&self, job_id: i64, status: JobStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(job) = inner.jobs.get_mut(&job_id) {
            job.status = status;
            job.last_updated = Utc::now();
        }
        Ok(())
    }

    async fn add_link(&self, url: &str, crawl_job_id: i64) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_link_id += 1;
        let link_id = inner.next_link_id;
        inner.links.insert(
            link_id,
            Link {
                link_id,
                url: url.to_string(),
                crawl_job_id,
            },
        );
        Ok(link_id)
    }

    async fn get_links(&self, crawl_job_id: i64) -> Result<Vec<Link>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut links: Vec<_> = inner
            .links
            .values()
            .filter(|link| link.crawl_job_id == crawl_job_id)
            .cloned()
            .collect();
        links.sort_by_key(|link| link.link_id);
        Ok(links)
    }
}
