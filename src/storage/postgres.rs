//! Postgres-backed `Storage`, grounded in
//! `examples/original_source/src/dal/postgres/{postgres,crawlJobs,links}.go`.
//!
//! The reference uses `database/sql` with hand-written `$n` placeholder SQL
//! against `lib/pq`; `sqlx::PgPool` plus `query_as` is the direct async
//! Rust analogue, keeping the same "thin SQL DAL, no ORM" shape rather than
//! reaching for `diesel`. Queries are issued through the runtime-checked
//! `query`/`query_as` API (not the `query!` macros), so building this crate
//! never requires a live database connection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::{Job, JobStatus, Link};

use super::{Storage, StoreError};

pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub async fn connect(dsn: &str) -> anyhow::Result<Self> {
        if dsn.is_empty() {
            anyhow::bail!("dsn required");
        }
        let pool = PgPool::connect(dsn).await?;
        Ok(Self { pool })
    }

    /// Creates the `crawljob` / `crawllink` tables if they do not already
    /// exist. The reference relies on a separately-run migration; this
    /// crate folds the equivalent DDL in so a fresh database can be used
    /// without an external migration step.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS crawljob (
                job_id BIGSERIAL PRIMARY KEY,
                crawljobstatus_id INT NOT NULL,
                base_url TEXT NOT NULL,
                last_updated TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS crawllink (
                link_id BIGSERIAL PRIMARY KEY,
                url TEXT NOT NULL,
                crawljob_id BIGINT NOT NULL REFERENCES crawljob(job_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(FromRow)]
struct JobRow {
    job_id: i64,
    crawljobstatus_id: i32,
    base_url: String,
    last_updated: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            job_id: row.job_id,
            base_url: row.base_url,
            status: JobStatus::from_i32(row.crawljobstatus_id).unwrap_or(JobStatus::InProgress),
            last_updated: row.last_updated,
        }
    }
}

#[derive(FromRow)]
struct LinkRow {
    link_id: i64,
    url: String,
    crawljob_id: i64,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            link_id: row.link_id,
            url: row.url,
            crawl_job_id: row.crawljob_id,
        }
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn add_crawl_job(&self, base_url: &str) -> Result<i64, StoreError> {
        let job_id: i64 = sqlx::query_scalar(
            "INSERT INTO crawljob (crawljobstatus_id, base_url, last_updated) \
             VALUES ($1, $2, $3) RETURNING job_id",
        )
        .bind(JobStatus::InProgress.as_i32())
        .bind(base_url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.into()))?;

        Ok(job_id)
    }

    async fn get_crawl_job_for_url(&self, base_url: &str) -> Result<Option<Job>, StoreError> {
        let row: Option<JobRow> = sqlx::query_as(
            "SELECT job_id, crawljobstatus_id, base_url, last_updated \
             FROM crawljob WHERE base_url = $1",
        )
        .bind(base_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.into()))?;

        Ok(row.map(Job::from))
    }

    async fn get_crawl_job(&self, job_id: i64) -> Result<Option<Job>, StoreError> {
        let row: Option<JobRow> = sqlx::query_as(
            "SELECT job_id, crawljobstatus_id, base_url, last_updated \
             FROM crawljob WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.into()))?;

        Ok(row.map(Job::from))
    }

    async fn get_crawl_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let rows: Vec<JobRow> = sqlx::query_as(
            "SELECT job_id, crawljobstatus_id, base_url, last_updated FROM crawljob",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.into()))?;

        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn update_crawl_job_status(&self, job_id: i64, status: JobStatus) -> Result<(), StoreError> {
        sqlx::query("UPDATE crawljob SET crawljobstatus_id = $1, last_updated = $2 WHERE job_id = $3")
            .bind(status.as_i32())
            .bind(Utc::now())
            .bind(job_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.into()))?;

        Ok(())
    }

    async fn add_link(&self, url: &str, crawl_job_id: i64) -> Result<i64, StoreError> {
        let link_id: i64 = sqlx::query_scalar(
            "INSERT INTO crawllink (url, crawljob_id) VALUES ($1, $2) RETURNING link_id",
        )
        .bind(url)
        .bind(crawl_job_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.into()))?;

        Ok(link_id)
    }

    async fn get_links(&self, crawl_job_id: i64) -> Result<Vec<Link>, StoreError> {
        let rows: Vec<LinkRow> = sqlx::query_as(
            "SELECT link_id, url, crawljob_id FROM crawllink WHERE crawljob_id = $1",
        )
        .bind(crawl_job_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.into()))?;

        Ok(rows.into_iter().map(Link::from).collect())
    }
}
