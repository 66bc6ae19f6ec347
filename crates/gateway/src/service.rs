use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::client::{Credential, UpstreamClient, LIST_PAGE_SIZE};
use crate::error::UpstreamError;
use crate::models::{
    Comment, FileDiff, IssueDetail, IssueListResponse, IssueSummary, IssueThreadResponse,
    PullRequestDetail, PullRequestDetailResponse, PullRequestListResponse, PullRequestSummary,
    StateFilter, UserInfo,
};
use crate::payloads::{CommentPayload, FilePayload, IssuePayload, PullPayload, UserPayload};

/// Reshapes upstream resources into the narrow response models.
///
/// Failure policy: the primary resource of an operation propagates its
/// upstream status; secondary resources (comments, changed files) degrade
/// to an empty list instead of failing the whole operation.
pub struct UpstreamGateway {
    client: Arc<dyn UpstreamClient>,
}

impl UpstreamGateway {
    pub fn new(client: Arc<dyn UpstreamClient>) -> Self {
        Self { client }
    }

    pub async fn list_issues(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        page: u32,
        state: StateFilter,
    ) -> Result<IssueListResponse, UpstreamError> {
        let raw = self
            .client
            .list_issues(credential, owner, repo, state, page)
            .await?;
        // Heuristic: a full page suggests another one exists. Computed on
        // the raw count, before pull requests are filtered out.
        let has_more = raw.len() == LIST_PAGE_SIZE as usize;

        let mut issues = Vec::with_capacity(raw.len());
        for value in raw {
            let payload: IssuePayload = serde_json::from_value(value)?;
            if payload.pull_request.is_some() {
                continue;
            }
            issues.push(IssueSummary::from(payload));
        }
        Ok(IssueListResponse { issues, has_more })
    }

    pub async fn issue_thread(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<IssueThreadResponse, UpstreamError> {
        let (issue_result, comments_result) = tokio::join!(
            self.client.get_issue(credential, owner, repo, number),
            self.client.list_issue_comments(credential, owner, repo, number),
        );

        let payload: IssuePayload = serde_json::from_value(issue_result?)?;
        let comments = map_comments(comments_result)?;
        Ok(IssueThreadResponse {
            issue: IssueDetail::from(payload),
            comments,
        })
    }

    pub async fn list_pull_requests(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        page: u32,
        state: StateFilter,
    ) -> Result<PullRequestListResponse, UpstreamError> {
        let raw = self
            .client
            .list_pulls(credential, owner, repo, state, page)
            .await?;
        let has_more = raw.len() == LIST_PAGE_SIZE as usize;

        let mut pull_requests = Vec::with_capacity(raw.len());
        for value in raw {
            let payload: PullPayload = serde_json::from_value(value)?;
            pull_requests.push(PullRequestSummary::from(payload));
        }
        Ok(PullRequestListResponse {
            pull_requests,
            has_more,
        })
    }

    pub async fn pull_request_detail(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestDetailResponse, UpstreamError> {
        // PR discussion comments ride the issues API under the same number.
        let (pull_result, comments_result, files_result) = tokio::join!(
            self.client.get_pull(credential, owner, repo, number),
            self.client.list_issue_comments(credential, owner, repo, number),
            self.client.list_pull_files(credential, owner, repo, number),
        );

        let payload: PullPayload = serde_json::from_value(pull_result?)?;
        let comments = map_comments(comments_result)?;
        let files = map_files(files_result)?;
        Ok(PullRequestDetailResponse {
            pull_request: PullRequestDetail::from(payload),
            comments,
            files,
        })
    }

    pub async fn current_user(&self, credential: &Credential) -> Result<UserInfo, UpstreamError> {
        let payload: UserPayload =
            serde_json::from_value(self.client.current_user(credential).await?)?;
        Ok(UserInfo::from(payload))
    }
}

fn map_comments(result: Result<Vec<Value>, UpstreamError>) -> Result<Vec<Comment>, UpstreamError> {
    let raw = match result {
        Ok(raw) => raw,
        Err(err) => {
            warn!(error = %err, "comment fetch failed, degrading to empty list");
            return Ok(Vec::new());
        }
    };
    raw.into_iter()
        .map(|value| {
            let payload: CommentPayload = serde_json::from_value(value)?;
            Ok(Comment::from(payload))
        })
        .collect()
}

fn map_files(result: Result<Vec<Value>, UpstreamError>) -> Result<Vec<FileDiff>, UpstreamError> {
    let raw = match result {
        Ok(raw) => raw,
        Err(err) => {
            warn!(error = %err, "file fetch failed, degrading to empty list");
            return Ok(Vec::new());
        }
    };
    raw.into_iter()
        .map(|value| {
            let payload: FilePayload = serde_json::from_value(value)?;
            Ok(FileDiff::from(payload))
        })
        .collect()
}
