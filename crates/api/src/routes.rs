use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use gateway::models::{
    IssueListResponse, IssueThreadResponse, PullRequestDetailResponse, PullRequestListResponse,
    StateFilter, UserInfo,
};
use gateway::UpstreamGateway;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::instrument;

use crate::error::{ApiError, ApiResult};
use crate::extract::Caller;
use crate::middleware;

#[derive(Clone)]
pub struct ApiState {
    pub gateway: Arc<UpstreamGateway>,
}

pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/issues/:owner/:repo", get(list_issues))
        .route("/api/issues/:owner/:repo/:issue_number", get(issue_thread))
        .route("/api/pulls/:owner/:repo", get(list_pull_requests))
        .route("/api/pulls/:owner/:repo/:pr_number", get(pull_request_detail))
        .route("/api/user", get(current_user))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        // Permissive on purpose: the browser frontend may be served from
        // anywhere during local development.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    state: Option<String>,
}

fn parse_list_query(query: &ListQuery) -> ApiResult<(u32, StateFilter)> {
    let page = query.page.unwrap_or(1).max(1);
    let filter = match query.state.as_deref() {
        None => StateFilter::default(),
        Some(value) => StateFilter::parse(value)
            .ok_or_else(|| ApiError::bad_request(format!("invalid state filter: {value}")))?,
    };
    Ok((page, filter))
}

#[instrument(skip(state, caller))]
async fn list_issues(
    State(state): State<Arc<ApiState>>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<ListQuery>,
    caller: Caller,
) -> ApiResult<Json<IssueListResponse>> {
    let (page, filter) = parse_list_query(&query)?;
    let response = state
        .gateway
        .list_issues(&caller.0, &owner, &repo, page, filter)
        .await?;
    Ok(Json(response))
}

#[instrument(skip(state, caller))]
async fn issue_thread(
    State(state): State<Arc<ApiState>>,
    Path((owner, repo, issue_number)): Path<(String, String, u64)>,
    caller: Caller,
) -> ApiResult<Json<IssueThreadResponse>> {
    let response = state
        .gateway
        .issue_thread(&caller.0, &owner, &repo, issue_number)
        .await?;
    Ok(Json(response))
}

#[instrument(skip(state, caller))]
async fn list_pull_requests(
    State(state): State<Arc<ApiState>>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<ListQuery>,
    caller: Caller,
) -> ApiResult<Json<PullRequestListResponse>> {
    let (page, filter) = parse_list_query(&query)?;
    let response = state
        .gateway
        .list_pull_requests(&caller.0, &owner, &repo, page, filter)
        .await?;
    Ok(Json(response))
}

#[instrument(skip(state, caller))]
async fn pull_request_detail(
    State(state): State<Arc<ApiState>>,
    Path((owner, repo, pr_number)): Path<(String, String, u64)>,
    caller: Caller,
) -> ApiResult<Json<PullRequestDetailResponse>> {
    let response = state
        .gateway
        .pull_request_detail(&caller.0, &owner, &repo, pr_number)
        .await?;
    Ok(Json(response))
}

#[instrument(skip(state, caller))]
async fn current_user(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
) -> ApiResult<Json<UserInfo>> {
    let response = state.gateway.current_user(&caller.0).await?;
    Ok(Json(response))
}
