use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::domain::changelog::models::entry::{
    ChangeEvent, ChangelogStats, EntryFilter, NewChangeEvent, Severity,
};
use crate::domain::changelog::port::ChangelogService;
use crate::domain::monitor::models::action::ActionResult;
use crate::domain::monitor::models::container::ContainerRecord;
use crate::domain::monitor::ports::ContainerRuntime;
use crate::domain::monitor::service::Monitor;
use crate::domain::tools::ToolStatus;

#[derive(Clone)]
pub struct AppState<R: ContainerRuntime, C: ChangelogService> {
    pub monitor: Monitor<R, C>,
    pub changelog: C,
}

#[derive(Serialize, Deserialize, Debug, TS)]
#[ts(export)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

#[derive(TS, Serialize, Deserialize, Debug)]
#[ts(export)]
pub struct ToolStatusEntry {
    pub tool: String,
    pub status: ToolStatus,
}

/// Entry posted by the portal UI to record a manual note.
#[derive(TS, Serialize, Deserialize, Debug)]
#[ts(export)]
pub struct AppendEntryRequest {
    pub details: String,
    #[serde(default)]
    pub level: Option<Severity>,
    #[serde(default)]
    pub user: Option<String>,
}

// Web handlers
async fn health() -> &'static str {
    "OK"
}

async fn get_container_status<R: ContainerRuntime, C: ChangelogService>(
    State(state): State<AppState<R, C>>,
) -> Json<ApiResponse<Vec<ContainerRecord>>> {
    let snapshot = state.monitor.current_status().await;
    Json(ApiResponse::success(snapshot.into_iter().collect()))
}

async fn get_tool_status<R: ContainerRuntime, C: ChangelogService>(
    State(state): State<AppState<R, C>>,
) -> Json<ApiResponse<Vec<ToolStatusEntry>>> {
    let tools = state
        .monitor
        .tool_status()
        .await
        .into_iter()
        .map(|(tool, status)| ToolStatusEntry { tool, status })
        .collect();
    Json(ApiResponse::success(tools))
}

async fn start_container<R: ContainerRuntime, C: ChangelogService>(
    State(state): State<AppState<R, C>>,
    Path(name): Path<String>,
) -> Json<ActionResult> {
    Json(state.monitor.start_container(&name).await)
}

async fn stop_container<R: ContainerRuntime, C: ChangelogService>(
    State(state): State<AppState<R, C>>,
    Path(name): Path<String>,
) -> Json<ActionResult> {
    Json(state.monitor.stop_container(&name).await)
}

async fn restart_container<R: ContainerRuntime, C: ChangelogService>(
    State(state): State<AppState<R, C>>,
    Path(name): Path<String>,
) -> Json<ActionResult> {
    Json(state.monitor.restart_container(&name).await)
}

async fn get_changelog<R: ContainerRuntime, C: ChangelogService>(
    State(state): State<AppState<R, C>>,
    Query(filter): Query<EntryFilter>,
) -> Json<ApiResponse<Vec<ChangeEvent>>> {
    Json(ApiResponse::success(state.changelog.entries(filter).await))
}

async fn get_changelog_stats<R: ContainerRuntime, C: ChangelogService>(
    State(state): State<AppState<R, C>>,
) -> Json<ApiResponse<ChangelogStats>> {
    Json(ApiResponse::success(state.changelog.stats().await))
}

async fn append_changelog_entry<R: ContainerRuntime, C: ChangelogService>(
    State(state): State<AppState<R, C>>,
    Json(payload): Json<AppendEntryRequest>,
) -> Json<ApiResponse<ChangeEvent>> {
    let mut event = NewChangeEvent::generic(payload.details);
    if let Some(level) = payload.level {
        event = event.with_level(level);
    }
    if let Some(user) = payload.user {
        event = event.with_user(user);
    }
    Json(ApiResponse::success(state.changelog.append(event).await))
}

pub async fn create_app<R: ContainerRuntime, C: ChangelogService>(
    state: AppState<R, C>,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/containers/status", get(get_container_status))
        .route("/api/tools/status", get(get_tool_status))
        .route("/api/containers/{name}/start", post(start_container))
        .route("/api/containers/{name}/stop", post(stop_container))
        .route("/api/containers/{name}/restart", post(restart_container))
        .route("/api/changelog", get(get_changelog))
        .route("/api/changelog", post(append_changelog_entry))
        .route("/api/changelog/stats", get(get_changelog_stats))
        .with_state(state)
}
