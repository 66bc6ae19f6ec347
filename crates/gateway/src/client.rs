use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use http::header;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::UpstreamError;
use crate::models::StateFilter;

/// Items requested per page on list endpoints. The `has_more` heuristic
/// compares the raw item count against this value.
pub const LIST_PAGE_SIZE: u32 = 30;
/// Upper bound on changed files fetched for a pull request.
pub const FILES_PAGE_SIZE: u32 = 100;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
// Pull-request detail may pull up to 100 files with diff patches.
const PULL_DETAIL_TIMEOUT: Duration = Duration::from_secs(60);

/// Caller-supplied `Authorization` header value, forwarded verbatim.
///
/// Opaque on purpose: never parsed, never validated, never logged.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn header_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn list_issues(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        state: StateFilter,
        page: u32,
    ) -> Result<Vec<Value>, UpstreamError>;

    async fn get_issue(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Value, UpstreamError>;

    async fn list_issue_comments(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Value>, UpstreamError>;

    async fn list_pulls(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        state: StateFilter,
        page: u32,
    ) -> Result<Vec<Value>, UpstreamError>;

    async fn get_pull(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Value, UpstreamError>;

    async fn list_pull_files(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Value>, UpstreamError>;

    async fn current_user(&self, credential: &Credential) -> Result<Value, UpstreamError>;
}

/// Reqwest-backed client against the configured GHE host.
///
/// The connection pool is shared across requests; the credential is not —
/// it rides on each individual request and is never stored here.
pub struct HttpUpstreamClient {
    http: reqwest::Client,
    base: Url,
    user_agent: String,
}

impl HttpUpstreamClient {
    pub fn new(base: Url, user_agent: impl Into<String>) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base,
            user_agent: user_agent.into(),
        })
    }

    async fn get_json(
        &self,
        credential: &Credential,
        url: Url,
        timeout: Option<Duration>,
    ) -> Result<Value, UpstreamError> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        debug!(endpoint = %endpoint, "dispatching upstream request");

        let mut request = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, credential.header_value())
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header(header::USER_AGENT, &self.user_agent);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %endpoint, status = %status, "upstream returned non-success");
            return Err(UpstreamError::status(status, endpoint));
        }
        Ok(response.json().await?)
    }

    async fn get_json_array(
        &self,
        credential: &Credential,
        url: Url,
        timeout: Option<Duration>,
    ) -> Result<Vec<Value>, UpstreamError> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        match self.get_json(credential, url, timeout).await? {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            _ => Err(UpstreamError::Shape { endpoint }),
        }
    }

    fn join(&self, path: &str) -> Result<Url, UpstreamError> {
        Ok(self.base.join(path)?)
    }

    fn with_query(url: &mut Url, params: &[(&str, String)]) {
        let mut query_pairs = url.query_pairs_mut();
        for (key, val) in params {
            query_pairs.append_pair(key, val);
        }
    }

    fn list_url(&self, resource: &str, owner: &str, repo: &str, state: StateFilter, page: u32) -> Result<Url, UpstreamError> {
        let path = format!("repos/{owner}/{repo}/{resource}");
        let mut url = self.join(&path)?;
        let params = [
            ("state", state.as_str().to_string()),
            ("page", page.to_string()),
            ("per_page", LIST_PAGE_SIZE.to_string()),
            ("sort", "created".to_string()),
            ("direction", "desc".to_string()),
        ];
        Self::with_query(&mut url, &params);
        Ok(url)
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn list_issues(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        state: StateFilter,
        page: u32,
    ) -> Result<Vec<Value>, UpstreamError> {
        let url = self.list_url("issues", owner, repo, state, page)?;
        self.get_json_array(credential, url, None).await
    }

    async fn get_issue(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Value, UpstreamError> {
        let url = self.join(&format!("repos/{owner}/{repo}/issues/{number}"))?;
        self.get_json(credential, url, None).await
    }

    async fn list_issue_comments(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Value>, UpstreamError> {
        let url = self.join(&format!("repos/{owner}/{repo}/issues/{number}/comments"))?;
        self.get_json_array(credential, url, None).await
    }

    async fn list_pulls(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        state: StateFilter,
        page: u32,
    ) -> Result<Vec<Value>, UpstreamError> {
        let url = self.list_url("pulls", owner, repo, state, page)?;
        self.get_json_array(credential, url, None).await
    }

    async fn get_pull(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Value, UpstreamError> {
        let url = self.join(&format!("repos/{owner}/{repo}/pulls/{number}"))?;
        self.get_json(credential, url, Some(PULL_DETAIL_TIMEOUT)).await
    }

    async fn list_pull_files(
        &self,
        credential: &Credential,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Value>, UpstreamError> {
        let mut url = self.join(&format!("repos/{owner}/{repo}/pulls/{number}/files"))?;
        Self::with_query(&mut url, &[("per_page", FILES_PAGE_SIZE.to_string())]);
        self.get_json_array(credential, url, Some(PULL_DETAIL_TIMEOUT))
            .await
    }

    async fn current_user(&self, credential: &Credential) -> Result<Value, UpstreamError> {
        let url = self.join("user")?;
        self.get_json(credential, url, None).await
    }
}
