use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use shared_models::{HealthCheck, Item, User};

use crate::error::StorageError;
use crate::storage::{Storage, StorageResult};

#[derive(Debug, Default)]
struct Collections {
    healthchecks: Vec<HealthCheck>,
    items: Vec<Item>,
    users: Vec<User>,
}

impl Collections {
    fn healthcheck_mut(&mut self, name: &str) -> StorageResult<&mut HealthCheck> {
        self.healthchecks
            .iter_mut()
            .find(|hc| hc.name == name)
            .ok_or_else(|| StorageError::HealthCheckNotFound(name.to_string()))
    }

    fn user_mut(&mut self, email: &str) -> StorageResult<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| StorageError::UserNotFound(email.to_string()))
    }

    fn group_of(&self, name: &str) -> StorageResult<String> {
        self.healthchecks
            .iter()
            .find(|hc| hc.name == name)
            .map(|hc| hc.group_id.clone())
            .ok_or_else(|| StorageError::HealthCheckNotFound(name.to_string()))
    }
}

/// In-process document store. Collections keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: RwLock<Collections>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn add_healthcheck(&self, healthcheck: &HealthCheck) -> StorageResult<()> {
        let mut db = self.inner.write().await;
        if db.healthchecks.iter().any(|hc| hc.name == healthcheck.name) {
            return Err(StorageError::Duplicate(format!("healthcheck {}", healthcheck.name)));
        }
        debug!("Storing healthcheck {}", healthcheck.name);
        db.healthchecks.push(healthcheck.clone());
        Ok(())
    }

    async fn find_healthcheck_by_name(&self, name: &str) -> StorageResult<HealthCheck> {
        let db = self.inner.read().await;
        db.healthchecks
            .iter()
            .find(|hc| hc.name == name)
            .cloned()
            .ok_or_else(|| StorageError::HealthCheckNotFound(name.to_string()))
    }

    async fn remove_healthcheck(&self, healthcheck: &HealthCheck) -> StorageResult<()> {
        let mut db = self.inner.write().await;
        let position = db
            .healthchecks
            .iter()
            .position(|hc| hc.name == healthcheck.name)
            .ok_or_else(|| StorageError::HealthCheckNotFound(healthcheck.name.clone()))?;

        let group_id = &db.healthchecks[position].group_id;
        if db.items.iter().any(|item| &item.group_id == group_id) {
            return Err(StorageError::HealthCheckHasItems(healthcheck.name.clone()));
        }

        debug!("Removing healthcheck {}", healthcheck.name);
        db.healthchecks.remove(position);
        Ok(())
    }

    async fn add_item(&self, item: &Item) -> StorageResult<()> {
        let mut db = self.inner.write().await;
        if !db.healthchecks.iter().any(|hc| hc.group_id == item.group_id) {
            return Err(StorageError::UnknownGroup(item.group_id.clone()));
        }
        if db
            .items
            .iter()
            .any(|i| i.group_id == item.group_id && i.url == item.url)
        {
            return Err(StorageError::Duplicate(format!("url {}", item.url)));
        }
        db.items.push(item.clone());
        Ok(())
    }

    async fn find_item_by_url(&self, group_id: &str, url: &str) -> StorageResult<Item> {
        let db = self.inner.read().await;
        db.items
            .iter()
            .find(|i| i.group_id == group_id && i.url == url)
            .cloned()
            .ok_or_else(|| StorageError::ItemNotFound(url.to_string()))
    }

    async fn find_items_by_group(&self, group_id: &str) -> StorageResult<Vec<Item>> {
        let db = self.inner.read().await;
        Ok(db
            .items
            .iter()
            .filter(|i| i.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn remove_item(&self, item: &Item) -> StorageResult<()> {
        let mut db = self.inner.write().await;
        let before = db.items.len();
        db.items
            .retain(|i| !(i.group_id == item.group_id && i.url == item.url));
        if db.items.len() == before {
            return Err(StorageError::ItemNotFound(item.url.clone()));
        }
        Ok(())
    }

    async fn find_urls_by_healthcheck_name(&self, name: &str) -> StorageResult<Vec<String>> {
        let db = self.inner.read().await;
        let group_id = db.group_of(name)?;
        Ok(db
            .items
            .iter()
            .filter(|i| i.group_id == group_id)
            .map(|i| i.url.clone())
            .collect())
    }

    async fn add_user(&self, user: &User) -> StorageResult<()> {
        let mut db = self.inner.write().await;
        if db.users.iter().any(|u| u.email == user.email) {
            return Err(StorageError::Duplicate(format!("user {}", user.email)));
        }
        db.users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<User> {
        let db = self.inner.read().await;
        db.users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| StorageError::UserNotFound(email.to_string()))
    }

    async fn remove_user(&self, user: &User) -> StorageResult<()> {
        let mut db = self.inner.write().await;
        let before = db.users.len();
        db.users.retain(|u| u.email != user.email);
        if db.users.len() == before {
            return Err(StorageError::UserNotFound(user.email.clone()));
        }
        Ok(())
    }

    async fn find_users_by_group(&self, group_id: &str) -> StorageResult<Vec<User>> {
        let db = self.inner.read().await;
        Ok(db
            .users
            .iter()
            .filter(|u| u.in_group(group_id))
            .cloned()
            .collect())
    }

    async fn find_watchers_by_healthcheck_name(&self, name: &str) -> StorageResult<Vec<String>> {
        let db = self.inner.read().await;
        let group_id = db.group_of(name)?;
        Ok(db
            .users
            .iter()
            .filter(|u| u.in_group(&group_id))
            .map(|u| u.email.clone())
            .collect())
    }

    async fn add_user_to_group(&self, user: &User, group_id: &str) -> StorageResult<()> {
        let mut db = self.inner.write().await;
        let stored = db.user_mut(&user.email)?;
        if !stored.in_group(group_id) {
            stored.groups_id.push(group_id.to_string());
        }
        Ok(())
    }

    async fn remove_user_from_group(&self, user: &User, group_id: &str) -> StorageResult<()> {
        let mut db = self.inner.write().await;
        let stored = db.user_mut(&user.email)?;
        stored.groups_id.retain(|g| g != group_id);
        Ok(())
    }

    async fn add_group_to_instance(&self, healthcheck: &HealthCheck, group: &str) -> StorageResult<()> {
        let mut db = self.inner.write().await;
        let stored = db.healthcheck_mut(&healthcheck.name)?;
        if !stored.has_host_group(group) {
            stored.host_groups.push(group.to_string());
        }
        Ok(())
    }

    async fn remove_group_from_instance(&self, healthcheck: &HealthCheck, group: &str) -> StorageResult<()> {
        let mut db = self.inner.write().await;
        let stored = db.healthcheck_mut(&healthcheck.name)?;
        if !stored.has_host_group(group) {
            return Err(StorageError::GroupNotFound(group.to_string()));
        }
        stored.host_groups.retain(|g| g != group);
        Ok(())
    }
}
