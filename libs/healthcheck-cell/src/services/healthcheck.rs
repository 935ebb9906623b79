use std::sync::Arc;

use tracing::{info, instrument, warn};

use shared_database::{Storage, StorageError};
use shared_models::{AppError, HealthCheck, Item, User};

use super::monitor::{MonitorError, MonitoringBackend, UrlCheck};

/// Translates instance lifecycle operations into storage writes and
/// monitoring backend calls.
#[derive(Clone)]
pub struct HealthCheckService {
    storage: Arc<dyn Storage>,
    monitor: Arc<dyn MonitoringBackend>,
}

impl HealthCheckService {
    pub fn new(storage: Arc<dyn Storage>, monitor: Arc<dyn MonitoringBackend>) -> Self {
        Self { storage, monitor }
    }

    async fn instance(&self, name: &str) -> Result<HealthCheck, AppError> {
        Ok(self.storage.find_healthcheck_by_name(name).await?)
    }

    #[instrument(skip(self))]
    pub async fn new_instance(&self, name: &str) -> Result<HealthCheck, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError("name is required".to_string()));
        }
        match self.storage.find_healthcheck_by_name(name).await {
            Ok(_) => return Err(AppError::Conflict(format!("healthcheck {} already exists", name))),
            Err(StorageError::HealthCheckNotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let group_id = self.monitor.create_host_group(name).await?;
        let healthcheck = HealthCheck::new(name, group_id);
        if let Err(e) = self.storage.add_healthcheck(&healthcheck).await {
            undo("hostgroup", self.monitor.delete_host_group(&healthcheck.group_id).await);
            return Err(e.into());
        }

        info!("Created healthcheck instance {}", name);
        Ok(healthcheck)
    }

    /// Removes items and watchers first, then the hostgroup and the instance.
    #[instrument(skip(self))]
    pub async fn remove_instance(&self, name: &str) -> Result<(), AppError> {
        let healthcheck = self.instance(name).await?;

        for item in self.storage.find_items_by_group(&healthcheck.group_id).await? {
            self.monitor.delete_url_check(item.item_id).await?;
            self.storage.remove_item(&item).await?;
        }

        for user in self.storage.find_users_by_group(&healthcheck.group_id).await? {
            self.detach_watcher(&user, &healthcheck.group_id).await?;
        }

        self.monitor.delete_host_group(&healthcheck.group_id).await?;
        self.storage.remove_healthcheck(&healthcheck).await?;

        info!("Removed healthcheck instance {}", name);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn add_url(
        &self,
        name: &str,
        url: &str,
        expected_string: Option<&str>,
        comment: Option<&str>,
    ) -> Result<Item, AppError> {
        if url.trim().is_empty() {
            return Err(AppError::ValidationError("url is required".to_string()));
        }
        let healthcheck = self.instance(name).await?;

        match self.storage.find_item_by_url(&healthcheck.group_id, url).await {
            Ok(_) => return Err(AppError::Conflict(format!("url {} already exists", url))),
            Err(StorageError::ItemNotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let check = UrlCheck {
            group_id: healthcheck.group_id.clone(),
            url: url.to_string(),
            expected_string: expected_string.map(String::from),
            comment: comment.map(String::from),
        };
        let item_id = self.monitor.create_url_check(&check).await?;
        let item = Item::new(url, item_id, healthcheck.group_id);
        if let Err(e) = self.storage.add_item(&item).await {
            undo("url check", self.monitor.delete_url_check(item_id).await);
            return Err(e.into());
        }

        info!("Added url {} to {}", url, name);
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn remove_url(&self, name: &str, url: &str) -> Result<(), AppError> {
        let healthcheck = self.instance(name).await?;
        let item = self.storage.find_item_by_url(&healthcheck.group_id, url).await?;

        self.monitor.delete_url_check(item.item_id).await?;
        self.storage.remove_item(&item).await?;

        info!("Removed url {} from {}", url, name);
        Ok(())
    }

    pub async fn list_urls(&self, name: &str) -> Result<Vec<String>, AppError> {
        Ok(self.storage.find_urls_by_healthcheck_name(name).await?)
    }

    /// Reuses the watcher when the email is already known.
    #[instrument(skip(self, password))]
    pub async fn add_watcher(
        &self,
        name: &str,
        email: &str,
        password: Option<&str>,
    ) -> Result<User, AppError> {
        if email.trim().is_empty() {
            return Err(AppError::ValidationError("watcher is required".to_string()));
        }
        let healthcheck = self.instance(name).await?;
        let group_id = healthcheck.group_id;

        let user = match self.storage.find_user_by_email(email).await {
            Ok(mut user) => {
                if !user.in_group(&group_id) {
                    self.storage.add_user_to_group(&user, &group_id).await?;
                    user.groups_id.push(group_id.clone());
                    self.monitor.update_user_groups(&user.id, &user.groups_id).await?;
                }
                user
            }
            Err(StorageError::UserNotFound(_)) => {
                let groups = vec![group_id.clone()];
                let user_id = self.monitor.create_user(email, password, &groups).await?;
                let user = User::new(user_id, email, groups);
                if let Err(e) = self.storage.add_user(&user).await {
                    undo("user", self.monitor.delete_user(&user.id).await);
                    return Err(e.into());
                }
                user
            }
            Err(e) => return Err(e.into()),
        };

        info!("Watcher {} now follows {}", email, name);
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn remove_watcher(&self, name: &str, email: &str) -> Result<(), AppError> {
        let healthcheck = self.instance(name).await?;
        let user = self.storage.find_user_by_email(email).await?;
        if !user.in_group(&healthcheck.group_id) {
            return Err(AppError::NotFound(format!(
                "watcher {} not found in {}",
                email, name
            )));
        }

        self.detach_watcher(&user, &healthcheck.group_id).await?;
        info!("Watcher {} no longer follows {}", email, name);
        Ok(())
    }

    /// Users left without any group are deleted.
    async fn detach_watcher(&self, user: &User, group_id: &str) -> Result<(), AppError> {
        self.storage.remove_user_from_group(user, group_id).await?;
        let remaining: Vec<String> = user
            .groups_id
            .iter()
            .filter(|g| g.as_str() != group_id)
            .cloned()
            .collect();

        if remaining.is_empty() {
            self.monitor.delete_user(&user.id).await?;
            self.storage.remove_user(user).await?;
            info!("Deleted watcher {} with no remaining groups", user.email);
        } else {
            self.monitor.update_user_groups(&user.id, &remaining).await?;
        }
        Ok(())
    }

    pub async fn list_watchers(&self, name: &str) -> Result<Vec<String>, AppError> {
        Ok(self.storage.find_watchers_by_healthcheck_name(name).await?)
    }

    #[instrument(skip(self))]
    pub async fn add_group(&self, name: &str, group: &str) -> Result<(), AppError> {
        let healthcheck = self.instance(name).await?;
        if !self.monitor.host_group_exists(group).await? {
            return Err(AppError::NotFound(format!("group {} not found", group)));
        }
        if healthcheck.has_host_group(group) {
            return Err(AppError::Conflict(format!(
                "group {} already added to {}",
                group, name
            )));
        }

        self.monitor.attach_host_group(&healthcheck.group_id, group).await?;
        self.storage.add_group_to_instance(&healthcheck, group).await?;

        info!("Added group {} to {}", group, name);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_group(&self, name: &str, group: &str) -> Result<(), AppError> {
        let healthcheck = self.instance(name).await?;
        if !healthcheck.has_host_group(group) {
            warn!("Group {} is not attached to {}", group, name);
            return Err(AppError::NotFound(format!(
                "group {} not found in {}",
                group, name
            )));
        }

        self.monitor.detach_host_group(&healthcheck.group_id, group).await?;
        self.storage.remove_group_from_instance(&healthcheck, group).await?;

        info!("Removed group {} from {}", group, name);
        Ok(())
    }

    pub async fn list_groups(&self, name: &str) -> Result<Vec<String>, AppError> {
        Ok(self.instance(name).await?.host_groups)
    }

    pub async fn list_service_groups(&self, keyword: Option<&str>) -> Result<Vec<String>, AppError> {
        let keyword = keyword.filter(|k| !k.is_empty());
        Ok(self.monitor.list_host_groups(keyword).await?)
    }
}

/// Logs a failed rollback of a backend write whose storage write failed.
fn undo(what: &str, result: Result<(), MonitorError>) {
    if let Err(e) = result {
        warn!("Could not roll back {}: {}", what, e);
    }
}
