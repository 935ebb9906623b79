use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::monitor::{MonitorError, MonitoringBackend, UrlCheck};

#[derive(Debug, Default)]
struct MonitorState {
    /// hostgroup name -> hostgroup id
    host_groups: BTreeMap<String, String>,
    /// instance hostgroup id -> hostgroups its hosts were added to
    attachments: HashMap<String, Vec<String>>,
    checks: HashMap<u64, UrlCheck>,
    /// user id -> (email, hostgroup ids)
    users: HashMap<String, (String, Vec<String>)>,
}

/// Monitoring backend kept in process memory. Used when the service runs
/// without an external monitoring system, and by tests.
#[derive(Debug)]
pub struct InMemoryMonitor {
    state: RwLock<MonitorState>,
    next_id: AtomicU64,
}

impl Default for InMemoryMonitor {
    fn default() -> Self {
        Self {
            state: RwLock::new(MonitorState::default()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl InMemoryMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monitor with pre-existing hostgroups that instances may be added to.
    pub fn with_host_groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut monitor = Self::new();
        {
            let state = monitor.state.get_mut();
            for group in groups {
                let id = monitor.next_id.fetch_add(1, Ordering::Relaxed).to_string();
                state.host_groups.insert(group.into(), id);
            }
        }
        monitor
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn attached_groups(&self, group_id: &str) -> Vec<String> {
        let state = self.state.read().await;
        state.attachments.get(group_id).cloned().unwrap_or_default()
    }

    pub async fn check(&self, item_id: u64) -> Option<UrlCheck> {
        self.state.read().await.checks.get(&item_id).cloned()
    }

    pub async fn check_count(&self) -> usize {
        self.state.read().await.checks.len()
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn user_groups(&self, user_id: &str) -> Option<Vec<String>> {
        let state = self.state.read().await;
        state.users.get(user_id).map(|(_, groups)| groups.clone())
    }
}

#[async_trait]
impl MonitoringBackend for InMemoryMonitor {
    async fn create_host_group(&self, name: &str) -> Result<String, MonitorError> {
        let mut state = self.state.write().await;
        if state.host_groups.contains_key(name) {
            return Err(MonitorError::HostGroupExists(name.to_string()));
        }
        let id = self.allocate_id().to_string();
        state.host_groups.insert(name.to_string(), id.clone());
        info!("Created hostgroup {} ({})", name, id);
        Ok(id)
    }

    async fn delete_host_group(&self, group_id: &str) -> Result<(), MonitorError> {
        let mut state = self.state.write().await;
        let name = state
            .host_groups
            .iter()
            .find(|(_, id)| id.as_str() == group_id)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| MonitorError::HostGroupNotFound(group_id.to_string()))?;
        state.host_groups.remove(&name);
        state.attachments.remove(group_id);
        info!("Deleted hostgroup {} ({})", name, group_id);
        Ok(())
    }

    async fn host_group_exists(&self, name: &str) -> Result<bool, MonitorError> {
        Ok(self.state.read().await.host_groups.contains_key(name))
    }

    async fn list_host_groups(&self, keyword: Option<&str>) -> Result<Vec<String>, MonitorError> {
        let state = self.state.read().await;
        Ok(state
            .host_groups
            .keys()
            .filter(|name| keyword.map_or(true, |prefix| name.starts_with(prefix)))
            .cloned()
            .collect())
    }

    async fn attach_host_group(&self, group_id: &str, group: &str) -> Result<(), MonitorError> {
        let mut state = self.state.write().await;
        if !state.host_groups.contains_key(group) {
            return Err(MonitorError::HostGroupNotFound(group.to_string()));
        }
        let attached = state.attachments.entry(group_id.to_string()).or_default();
        if !attached.iter().any(|g| g == group) {
            attached.push(group.to_string());
        }
        Ok(())
    }

    async fn detach_host_group(&self, group_id: &str, group: &str) -> Result<(), MonitorError> {
        let mut state = self.state.write().await;
        if let Some(attached) = state.attachments.get_mut(group_id) {
            attached.retain(|g| g != group);
        }
        Ok(())
    }

    async fn create_url_check(&self, check: &UrlCheck) -> Result<u64, MonitorError> {
        let item_id = self.allocate_id();
        debug!("Creating check {} for {}", item_id, check.url);
        self.state.write().await.checks.insert(item_id, check.clone());
        Ok(item_id)
    }

    async fn delete_url_check(&self, item_id: u64) -> Result<(), MonitorError> {
        self.state
            .write()
            .await
            .checks
            .remove(&item_id)
            .map(|_| ())
            .ok_or(MonitorError::CheckNotFound(item_id))
    }

    async fn create_user(
        &self,
        email: &str,
        _password: Option<&str>,
        groups: &[String],
    ) -> Result<String, MonitorError> {
        let user_id = self.allocate_id().to_string();
        self.state
            .write()
            .await
            .users
            .insert(user_id.clone(), (email.to_string(), groups.to_vec()));
        Ok(user_id)
    }

    async fn update_user_groups(&self, user_id: &str, groups: &[String]) -> Result<(), MonitorError> {
        let mut state = self.state.write().await;
        let (_, current) = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| MonitorError::UserNotFound(user_id.to_string()))?;
        *current = groups.to_vec();
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), MonitorError> {
        self.state
            .write()
            .await
            .users
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| MonitorError::UserNotFound(user_id.to_string()))
    }
}
