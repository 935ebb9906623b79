// =====================================================================================
// HEALTHCHECK CELL - INSTANCE, URL, WATCHER AND GROUP LIFECYCLE
// =====================================================================================
//
// Lifecycle operations requested by the platform (and by the CLI plugin through
// the platform proxy) are translated into storage writes and monitoring backend
// calls by `HealthCheckService`, and exposed over HTTP by the router.
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    AddUrlForm, AddUrlRequest, AddWatcherForm, AddWatcherRequest, GroupRequest, NewInstanceForm,
    RemoveUrlRequest, ServiceGroupsQuery,
};

pub use services::{
    HealthCheckService, InMemoryMonitor, MonitorError, MonitoringBackend, UrlCheck,
};

pub use router::{create_healthcheck_router, HealthCheckState};
