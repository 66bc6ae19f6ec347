//! Raw upstream JSON shapes. Only the fields the gateway reshapes are
//! declared; everything else in the upstream object is dropped.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::models::FileStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssuePayload {
    pub number: i64,
    pub title: String,
    pub state: String,
    pub body: Option<String>,
    pub user: UserRef,
    pub comments: i64,
    pub created_at: DateTime<Utc>,
    // Present (as an object) exactly when the "issue" is really a pull
    // request surfaced through the issues API.
    pub pull_request: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullPayload {
    pub number: i64,
    pub title: String,
    pub state: String,
    pub body: Option<String>,
    pub user: UserRef,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub head: BranchRef,
    pub base: BranchRef,
    // Detail-only counters; list payloads omit them entirely.
    #[serde(default)]
    pub additions: i64,
    #[serde(default)]
    pub deletions: i64,
    #[serde(default)]
    pub changed_files: i64,
    pub mergeable: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPayload {
    pub user: UserRef,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilePayload {
    pub filename: String,
    pub status: FileStatus,
    pub additions: i64,
    pub deletions: i64,
    pub patch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
    pub name: Option<String>,
}
