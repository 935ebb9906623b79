use async_trait::async_trait;
use thiserror::Error;

use shared_models::AppError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error("hostgroup {0} not found in the monitoring backend")]
    HostGroupNotFound(String),

    #[error("hostgroup {0} already exists in the monitoring backend")]
    HostGroupExists(String),

    #[error("check {0} not found in the monitoring backend")]
    CheckNotFound(u64),

    #[error("user {0} not found in the monitoring backend")]
    UserNotFound(String),

    #[error("monitoring backend request failed: {0}")]
    Request(String),
}

impl From<MonitorError> for AppError {
    fn from(err: MonitorError) -> Self {
        match err {
            MonitorError::HostGroupExists(_) => AppError::Conflict(err.to_string()),
            _ => AppError::ExternalService(err.to_string()),
        }
    }
}

/// What the backend needs to create a web check for a url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCheck {
    pub group_id: String,
    pub url: String,
    pub expected_string: Option<String>,
    pub comment: Option<String>,
}

/// Operations the healthcheck service needs from the monitoring backend
/// (hostgroups, web checks and notified users).
#[async_trait]
pub trait MonitoringBackend: Send + Sync {
    /// Creates the hostgroup backing a new instance and returns its id.
    /// Fails with `HostGroupExists` when the name is taken.
    async fn create_host_group(&self, name: &str) -> Result<String, MonitorError>;
    async fn delete_host_group(&self, group_id: &str) -> Result<(), MonitorError>;
    async fn host_group_exists(&self, name: &str) -> Result<bool, MonitorError>;
    /// Hostgroup names, sorted, optionally restricted to a prefix.
    async fn list_host_groups(&self, keyword: Option<&str>) -> Result<Vec<String>, MonitorError>;
    async fn attach_host_group(&self, group_id: &str, group: &str) -> Result<(), MonitorError>;
    async fn detach_host_group(&self, group_id: &str, group: &str) -> Result<(), MonitorError>;

    async fn create_url_check(&self, check: &UrlCheck) -> Result<u64, MonitorError>;
    async fn delete_url_check(&self, item_id: u64) -> Result<(), MonitorError>;

    async fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        groups: &[String],
    ) -> Result<String, MonitorError>;
    async fn update_user_groups(&self, user_id: &str, groups: &[String]) -> Result<(), MonitorError>;
    async fn delete_user(&self, user_id: &str) -> Result<(), MonitorError>;
}
