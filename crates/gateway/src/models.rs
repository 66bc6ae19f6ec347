//! Narrow response shapes returned to callers. Optional upstream fields
//! stay optional here and serialize as `null`, never as a default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payloads::{CommentPayload, FilePayload, IssuePayload, PullPayload, UserPayload};

/// List-endpoint `state` filter, validated before any upstream call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl StateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub user_login: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CommentPayload> for Comment {
    fn from(payload: CommentPayload) -> Self {
        Self {
            user_login: payload.user.login,
            body: payload.body,
            created_at: payload.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueSummary {
    pub number: i64,
    pub title: String,
    pub user_login: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub comments_count: i64,
}

impl From<IssuePayload> for IssueSummary {
    fn from(payload: IssuePayload) -> Self {
        Self {
            number: payload.number,
            title: payload.title,
            user_login: payload.user.login,
            state: payload.state,
            created_at: payload.created_at,
            comments_count: payload.comments,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueDetail {
    pub number: i64,
    pub title: String,
    pub user_login: String,
    pub state: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub comments_count: i64,
}

impl From<IssuePayload> for IssueDetail {
    fn from(payload: IssuePayload) -> Self {
        Self {
            number: payload.number,
            title: payload.title,
            user_login: payload.user.login,
            state: payload.state,
            body: payload.body,
            created_at: payload.created_at,
            comments_count: payload.comments,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueListResponse {
    pub issues: Vec<IssueSummary>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueThreadResponse {
    pub issue: IssueDetail,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PullRequestSummary {
    pub number: i64,
    pub title: String,
    pub user_login: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub head_ref: String,
    pub base_ref: String,
}

impl From<PullPayload> for PullRequestSummary {
    fn from(payload: PullPayload) -> Self {
        Self {
            number: payload.number,
            title: payload.title,
            user_login: payload.user.login,
            state: payload.state,
            created_at: payload.created_at,
            merged_at: payload.merged_at,
            head_ref: payload.head.name,
            base_ref: payload.base.name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PullRequestListResponse {
    pub pull_requests: Vec<PullRequestSummary>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PullRequestDetail {
    pub number: i64,
    pub title: String,
    pub user_login: String,
    pub state: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub head_ref: String,
    pub base_ref: String,
    pub additions: i64,
    pub deletions: i64,
    pub changed_files: i64,
    pub mergeable: Option<bool>,
}

impl From<PullPayload> for PullRequestDetail {
    fn from(payload: PullPayload) -> Self {
        Self {
            number: payload.number,
            title: payload.title,
            user_login: payload.user.login,
            state: payload.state,
            body: payload.body,
            created_at: payload.created_at,
            merged_at: payload.merged_at,
            head_ref: payload.head.name,
            base_ref: payload.base.name,
            additions: payload.additions,
            deletions: payload.deletions,
            changed_files: payload.changed_files,
            mergeable: payload.mergeable,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileDiff {
    pub filename: String,
    pub status: FileStatus,
    pub additions: i64,
    pub deletions: i64,
    pub patch: Option<String>,
}

impl From<FilePayload> for FileDiff {
    fn from(payload: FilePayload) -> Self {
        Self {
            filename: payload.filename,
            status: payload.status,
            additions: payload.additions,
            deletions: payload.deletions,
            patch: payload.patch,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PullRequestDetailResponse {
    pub pull_request: PullRequestDetail,
    pub comments: Vec<Comment>,
    pub files: Vec<FileDiff>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub login: String,
    pub name: Option<String>,
}

impl From<UserPayload> for UserInfo {
    fn from(payload: UserPayload) -> Self {
        Self {
            login: payload.login,
            name: payload.name,
        }
    }
}
