//! Wire and storage types shared between the crawler, the orchestrator and
//! the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a crawl job. Wire values match the reference DAL exactly:
/// `InProgress = 1`, `Completed = 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    InProgress,
    Completed,
}

impl JobStatus {
    pub fn as_i32(self) -> i32 {
        match self {
            JobStatus::InProgress => 1,
            JobStatus::Completed => 2,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(JobStatus::InProgress),
            2 => Some(JobStatus::Completed),
            _ => None,
        }
    }
}

impl Serialize for JobStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.as_i32())
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i32::deserialize(deserializer)?;
        JobStatus::from_i32(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid job status: {value}")))
    }
}

/// A single crawl job, one per distinct base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "jobId")]
    pub job_id: i64,
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    pub status: JobStatus,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

/// A single discovered link, owned by exactly one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "linkId")]
    pub link_id: i64,
    pub url: String,
    #[serde(rename = "crawlJobId")]
    pub crawl_job_id: i64,
}

/// Request body for `POST /api/crawlJobs`.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlJobRequest {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
}
