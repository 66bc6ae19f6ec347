use std::sync::Arc;

use api::{build_router, ApiState};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use gateway::client::{Credential, UpstreamClient};
use gateway::error::UpstreamError;
use gateway::models::StateFilter;
use gateway::UpstreamGateway;
use http::StatusCode as UpstreamStatus;
use serde_json::{json, Value};
use tower::util::ServiceExt;

const TOKEN: &str = "Bearer test-token";

/// Scripted upstream: unset fields mean "this call must not happen".
#[derive(Default)]
struct ScriptedClient {
    issues: Option<Result<Vec<Value>, u16>>,
    pull: Option<Result<Value, u16>>,
    comments: Option<Result<Vec<Value>, u16>>,
    files: Option<Result<Vec<Value>, u16>>,
    user: Option<Result<Value, u16>>,
}

fn scripted(result: &Option<Result<Vec<Value>, u16>>, endpoint: &str) -> Result<Vec<Value>, UpstreamError> {
    match result.as_ref().expect("unexpected upstream call") {
        Ok(items) => Ok(items.clone()),
        Err(code) => Err(UpstreamError::status(
            UpstreamStatus::from_u16(*code).unwrap(),
            endpoint,
        )),
    }
}

fn scripted_one(result: &Option<Result<Value, u16>>, endpoint: &str) -> Result<Value, UpstreamError> {
    match result.as_ref().expect("unexpected upstream call") {
        Ok(value) => Ok(value.clone()),
        Err(code) => Err(UpstreamError::status(
            UpstreamStatus::from_u16(*code).unwrap(),
            endpoint,
        )),
    }
}

#[async_trait]
impl UpstreamClient for ScriptedClient {
    async fn list_issues(
        &self,
        credential: &Credential,
        _owner: &str,
        _repo: &str,
        _state: StateFilter,
        _page: u32,
    ) -> Result<Vec<Value>, UpstreamError> {
        assert_eq!(credential.header_value(), TOKEN);
        scripted(&self.issues, "repos/octo/demo/issues")
    }

    async fn get_issue(
        &self,
        _credential: &Credential,
        _owner: &str,
        _repo: &str,
        _number: u64,
    ) -> Result<Value, UpstreamError> {
        unreachable!()
    }

    async fn list_issue_comments(
        &self,
        _credential: &Credential,
        _owner: &str,
        _repo: &str,
        _number: u64,
    ) -> Result<Vec<Value>, UpstreamError> {
        scripted(&self.comments, "repos/octo/demo/issues/7/comments")
    }

    async fn list_pulls(
        &self,
        _credential: &Credential,
        _owner: &str,
        _repo: &str,
        _state: StateFilter,
        _page: u32,
    ) -> Result<Vec<Value>, UpstreamError> {
        unreachable!()
    }

    async fn get_pull(
        &self,
        credential: &Credential,
        _owner: &str,
        _repo: &str,
        _number: u64,
    ) -> Result<Value, UpstreamError> {
        assert_eq!(credential.header_value(), TOKEN);
        scripted_one(&self.pull, "repos/octo/demo/pulls/7")
    }

    async fn list_pull_files(
        &self,
        _credential: &Credential,
        _owner: &str,
        _repo: &str,
        _number: u64,
    ) -> Result<Vec<Value>, UpstreamError> {
        scripted(&self.files, "repos/octo/demo/pulls/7/files")
    }

    async fn current_user(&self, _credential: &Credential) -> Result<Value, UpstreamError> {
        scripted_one(&self.user, "user")
    }
}

fn app(client: ScriptedClient) -> axum::Router {
    let gateway = Arc::new(UpstreamGateway::new(Arc::new(client)));
    build_router(Arc::new(ApiState { gateway }))
}

fn issue_value(number: i64, is_pull_request: bool) -> Value {
    let mut value = json!({
        "number": number,
        "title": format!("issue {number}"),
        "state": "open",
        "user": { "login": "octocat" },
        "comments": 0,
        "created_at": "2024-03-01T12:00:00Z"
    });
    if is_pull_request {
        value["pull_request"] = json!({ "url": "https://ghe.example.com/..." });
    }
    value
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn issue_listing_end_to_end() {
    // 30 raw entries, one pull-request-tagged: 29 survive, has_more set.
    let mut items: Vec<Value> = (1..=29).map(|n| issue_value(n, false)).collect();
    items.push(issue_value(30, true));
    let app = app(ScriptedClient {
        issues: Some(Ok(items)),
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::get("/api/issues/octo/demo?page=1")
                .header("authorization", TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["issues"].as_array().unwrap().len(), 29);
    assert_eq!(body["has_more"], json!(true));
    assert_eq!(body["issues"][0]["user_login"], "octocat");
}

#[tokio::test]
async fn pull_request_detail_end_to_end_with_absent_optionals() {
    let pull = json!({
        "number": 7,
        "title": "add retry budget",
        "state": "open",
        "body": null,
        "user": { "login": "octocat" },
        "created_at": "2024-03-01T12:00:00Z",
        "merged_at": null,
        "head": { "ref": "feature" },
        "base": { "ref": "main" },
        "additions": 10,
        "deletions": 2,
        "changed_files": 1,
        "mergeable": null
    });
    let files = vec![json!({
        "filename": "assets/logo.png",
        "status": "modified",
        "additions": 0,
        "deletions": 0,
        "patch": null
    })];
    let app = app(ScriptedClient {
        pull: Some(Ok(pull)),
        comments: Some(Ok(Vec::new())),
        files: Some(Ok(files)),
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::get("/api/pulls/octo/demo/7")
                .header("authorization", TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["pull_request"]["merged_at"], Value::Null);
    assert_eq!(body["pull_request"]["mergeable"], Value::Null);
    assert_eq!(body["files"][0]["patch"], Value::Null);
    assert_eq!(body["files"][0]["status"], "modified");
}

#[tokio::test]
async fn secondary_failures_still_yield_success() {
    let pull = json!({
        "number": 7,
        "title": "add retry budget",
        "state": "open",
        "user": { "login": "octocat" },
        "created_at": "2024-03-01T12:00:00Z",
        "merged_at": "2024-03-05T12:00:00Z",
        "head": { "ref": "feature" },
        "base": { "ref": "main" },
        "additions": 10,
        "deletions": 2,
        "changed_files": 1,
        "mergeable": true
    });
    let app = app(ScriptedClient {
        pull: Some(Ok(pull)),
        comments: Some(Err(403)),
        files: Some(Err(403)),
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::get("/api/pulls/octo/demo/7")
                .header("authorization", TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["files"], json!([]));
    assert_eq!(body["comments"], json!([]));
    assert_eq!(body["pull_request"]["number"], 7);
}

#[tokio::test]
async fn primary_status_passes_through() {
    let app = app(ScriptedClient {
        pull: Some(Err(404)),
        comments: Some(Ok(Vec::new())),
        files: Some(Ok(Vec::new())),
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::get("/api/pulls/octo/demo/7")
                .header("authorization", TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "upstream request failed");
}

#[tokio::test]
async fn invalid_state_filter_is_rejected_before_upstream() {
    // `issues` deliberately unset: a scripted call would panic.
    let app = app(ScriptedClient::default());

    let response = app
        .oneshot(
            Request::get("/api/issues/octo/demo?state=merged")
                .header("authorization", TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn undecodable_upstream_payload_maps_to_bad_gateway() {
    let app = app(ScriptedClient {
        user: Some(Ok(json!({ "unexpected": true }))),
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::get("/api/user")
                .header("authorization", TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn current_user_maps_login_and_name() {
    let app = app(ScriptedClient {
        user: Some(Ok(json!({ "login": "octocat", "name": "The Octocat" }))),
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::get("/api/user")
                .header("authorization", TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["login"], "octocat");
    assert_eq!(body["name"], "The Octocat");
}
