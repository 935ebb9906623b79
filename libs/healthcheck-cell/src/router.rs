use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_database::MemoryStorage;

use crate::handlers::*;
use crate::services::{HealthCheckService, InMemoryMonitor};

pub struct HealthCheckState {
    pub service: HealthCheckService,
    pub config: Arc<AppConfig>,
}

impl HealthCheckState {
    pub fn new(service: HealthCheckService, config: Arc<AppConfig>) -> Self {
        Self { service, config }
    }

    /// State backed by the in-process store and monitoring backend, seeded
    /// with the configured service groups.
    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let monitor = Arc::new(InMemoryMonitor::with_host_groups(
            config.service_groups.iter().cloned(),
        ));
        Self::new(HealthCheckService::new(storage, monitor), config)
    }
}

pub fn create_healthcheck_router(state: Arc<HealthCheckState>) -> Router {
    let resource_routes = Router::new()
        .route("/{name}/url", get(list_urls).post(add_url).delete(remove_url))
        .route("/{name}/watcher", get(list_watchers).post(add_watcher))
        .route("/{name}/watcher/{watcher}", delete(remove_watcher))
        .route(
            "/{name}/groups",
            get(list_groups).post(add_group).delete(remove_group),
        )
        .route("/servicegroups", get(list_service_groups))
        .route("/{name}/servicegroups", get(list_service_groups));

    Router::new()
        .route("/", post(new_instance))
        .route("/healthz", get(service_status))
        .route("/plugin", get(get_plugin))
        .route("/url", post(add_url_form))
        .route("/watcher", post(add_watcher_form))
        .route("/{name}", delete(remove_instance))
        .route("/{name}/url/{*url}", delete(remove_url_path))
        .route("/{name}/watcher/{watcher}", delete(remove_watcher))
        .nest("/resources", resource_routes)
        .with_state(state)
}
