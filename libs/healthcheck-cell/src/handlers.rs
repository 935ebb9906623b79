use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, instrument, warn};

use shared_models::AppError;

use crate::models::{
    AddUrlForm, AddUrlRequest, AddWatcherForm, AddWatcherRequest, GroupRequest, NewInstanceForm,
    RemoveUrlRequest, ServiceGroupsQuery,
};
use crate::router::HealthCheckState;

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// =====================================================================================
// INSTANCE-LEVEL ENDPOINTS (form bodies)
// =====================================================================================

#[instrument(skip(state))]
pub async fn new_instance(
    State(state): State<Arc<HealthCheckState>>,
    Form(form): Form<NewInstanceForm>,
) -> Result<StatusCode, AppError> {
    state.service.new_instance(&form.name).await?;
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state))]
pub async fn remove_instance(
    State(state): State<Arc<HealthCheckState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.remove_instance(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn add_url_form(
    State(state): State<Arc<HealthCheckState>>,
    Form(form): Form<AddUrlForm>,
) -> Result<StatusCode, AppError> {
    state.service.add_url(&form.name, &form.url, None, None).await?;
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state))]
pub async fn remove_url_path(
    State(state): State<Arc<HealthCheckState>>,
    Path((name, url)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state.service.remove_url(&name, &url).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn add_watcher_form(
    State(state): State<Arc<HealthCheckState>>,
    Form(form): Form<AddWatcherForm>,
) -> Result<StatusCode, AppError> {
    state.service.add_watcher(&form.name, &form.watcher, None).await?;
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state))]
pub async fn remove_watcher(
    State(state): State<Arc<HealthCheckState>>,
    Path((name, watcher)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state.service.remove_watcher(&name, &watcher).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Serves the CLI plugin so users can install it from the service itself.
pub async fn get_plugin(State(state): State<Arc<HealthCheckState>>) -> Result<String, AppError> {
    let path = state
        .config
        .plugin_path
        .as_ref()
        .ok_or_else(|| AppError::NotFound("plugin is not available".to_string()))?;

    debug!("Serving plugin from {}", path.display());
    tokio::fs::read_to_string(path).await.map_err(|e| {
        warn!("Failed to read plugin at {}: {}", path.display(), e);
        AppError::NotFound("plugin is not available".to_string())
    })
}

pub async fn service_status() -> &'static str {
    "healthcheck-as-a-service is running!"
}

// =====================================================================================
// RESOURCE ENDPOINTS (JSON bodies, reached through the platform proxy)
// =====================================================================================

#[instrument(skip(state))]
pub async fn add_url(
    State(state): State<Arc<HealthCheckState>>,
    Path(name): Path<String>,
    Json(request): Json<AddUrlRequest>,
) -> Result<StatusCode, AppError> {
    state
        .service
        .add_url(
            &name,
            &request.url,
            non_empty(&request.expected_string),
            non_empty(&request.comment),
        )
        .await?;
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state))]
pub async fn remove_url(
    State(state): State<Arc<HealthCheckState>>,
    Path(name): Path<String>,
    Json(request): Json<RemoveUrlRequest>,
) -> Result<StatusCode, AppError> {
    state.service.remove_url(&name, &request.url).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_urls(
    State(state): State<Arc<HealthCheckState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.service.list_urls(&name).await?))
}

#[instrument(skip(state, request))]
pub async fn add_watcher(
    State(state): State<Arc<HealthCheckState>>,
    Path(name): Path<String>,
    Json(request): Json<AddWatcherRequest>,
) -> Result<StatusCode, AppError> {
    state
        .service
        .add_watcher(&name, &request.watcher, non_empty(&request.password))
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn list_watchers(
    State(state): State<Arc<HealthCheckState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.service.list_watchers(&name).await?))
}

#[instrument(skip(state))]
pub async fn add_group(
    State(state): State<Arc<HealthCheckState>>,
    Path(name): Path<String>,
    Json(request): Json<GroupRequest>,
) -> Result<StatusCode, AppError> {
    state.service.add_group(&name, &request.group).await?;
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state))]
pub async fn remove_group(
    State(state): State<Arc<HealthCheckState>>,
    Path(name): Path<String>,
    Json(request): Json<GroupRequest>,
) -> Result<StatusCode, AppError> {
    state.service.remove_group(&name, &request.group).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_groups(
    State(state): State<Arc<HealthCheckState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.service.list_groups(&name).await?))
}

/// Service-wide; answers on both the instance and the service callback paths.
pub async fn list_service_groups(
    State(state): State<Arc<HealthCheckState>>,
    Query(query): Query<ServiceGroupsQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(
        state
            .service
            .list_service_groups(query.keyword.as_deref())
            .await?,
    ))
}
