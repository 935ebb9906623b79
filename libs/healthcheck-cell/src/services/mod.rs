pub mod healthcheck;
pub mod memory_monitor;
pub mod monitor;

pub use healthcheck::HealthCheckService;
pub use memory_monitor::InMemoryMonitor;
pub use monitor::{MonitorError, MonitoringBackend, UrlCheck};
