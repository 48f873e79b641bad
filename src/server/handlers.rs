//! Route handlers for `/api/issues/:project`.
//!
//! Every outcome the client can act on, success or failure, is answered with
//! HTTP 200; callers tell them apart by the shape of the JSON body.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{AppState, body};
use crate::error::{Error, Result};
use crate::model::{Issue, IssueFilter, IssuePatch, NewIssue, UpdateRequest};
use crate::validate;

/// Body of a successful update or delete.
#[derive(Debug, Serialize)]
pub struct MutationResult {
    pub result: &'static str,
    #[serde(rename = "_id")]
    pub id: Value,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: &'static str,
    pub uptime_seconds: i64,
    pub projects: usize,
}

/// `GET /api/issues/:project`: list issues, optionally filtered by query.
pub async fn list_issues(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<Vec<Issue>> {
    let filter = IssueFilter::from_pairs(query);
    for key in filter.unknown_keys() {
        debug!(project = %project, key, "Filter key is not an issue field; nothing will match");
    }
    Json(state.store.list(&project, &filter).await)
}

/// `POST /api/issues/:project`: create an issue.
pub async fn create_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<Json<Issue>> {
    let fields = body::decode(&headers, &payload)?;
    let input = NewIssue::from_body(&fields)?;
    Ok(Json(state.store.create(&project, input).await))
}

/// `PUT /api/issues/:project`: update fields of an issue.
pub async fn update_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<Json<MutationResult>> {
    let fields = body::decode(&headers, &payload)?;
    let UpdateRequest { id, patch } = IssuePatch::from_body(&fields)?;
    state.store.update(&project, &id, &patch).await?;
    Ok(Json(MutationResult {
        result: "successfully updated",
        id,
    }))
}

/// `DELETE /api/issues/:project`: delete an issue.
pub async fn delete_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<Json<MutationResult>> {
    let fields = body::decode(&headers, &payload)?;
    let id = match fields.get("_id") {
        Some(id) if validate::is_truthy(Some(id)) => id.clone(),
        _ => return Err(Error::MissingId),
    };
    state.store.delete(&project, &id).await?;
    Ok(Json(MutationResult {
        result: "successfully deleted",
        id,
    }))
}

/// `GET /healthz`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: (chrono::Utc::now() - state.started_at).num_seconds(),
        projects: state.store.project_count().await,
    })
}

/// Anything that isn't a known route.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
