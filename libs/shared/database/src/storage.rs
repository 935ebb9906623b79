use async_trait::async_trait;

use shared_models::{HealthCheck, Item, User};

use crate::error::StorageError;

pub type StorageResult<T> = Result<T, StorageError>;

/// Document store holding healthchecks, their url items and their watchers.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn add_healthcheck(&self, healthcheck: &HealthCheck) -> StorageResult<()>;
    async fn find_healthcheck_by_name(&self, name: &str) -> StorageResult<HealthCheck>;
    /// Fails while the healthcheck still owns items.
    async fn remove_healthcheck(&self, healthcheck: &HealthCheck) -> StorageResult<()>;

    async fn add_item(&self, item: &Item) -> StorageResult<()>;
    async fn find_item_by_url(&self, group_id: &str, url: &str) -> StorageResult<Item>;
    async fn find_items_by_group(&self, group_id: &str) -> StorageResult<Vec<Item>>;
    async fn remove_item(&self, item: &Item) -> StorageResult<()>;
    async fn find_urls_by_healthcheck_name(&self, name: &str) -> StorageResult<Vec<String>>;

    async fn add_user(&self, user: &User) -> StorageResult<()>;
    async fn find_user_by_email(&self, email: &str) -> StorageResult<User>;
    async fn remove_user(&self, user: &User) -> StorageResult<()>;
    async fn find_users_by_group(&self, group_id: &str) -> StorageResult<Vec<User>>;
    async fn find_watchers_by_healthcheck_name(&self, name: &str) -> StorageResult<Vec<String>>;
    async fn add_user_to_group(&self, user: &User, group_id: &str) -> StorageResult<()>;
    async fn remove_user_from_group(&self, user: &User, group_id: &str) -> StorageResult<()>;

    async fn add_group_to_instance(&self, healthcheck: &HealthCheck, group: &str) -> StorageResult<()>;
    async fn remove_group_from_instance(&self, healthcheck: &HealthCheck, group: &str) -> StorageResult<()>;
}
