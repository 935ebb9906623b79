use serde::{Deserialize, Serialize};

/// A monitored instance, mirrored as a hostgroup in the monitoring backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub group_id: String,
    #[serde(default)]
    pub host_groups: Vec<String>,
}

impl HealthCheck {
    pub fn new(name: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group_id: group_id.into(),
            host_groups: Vec::new(),
        }
    }

    pub fn has_host_group(&self, group: &str) -> bool {
        self.host_groups.iter().any(|g| g == group)
    }
}

/// A url check owned by a healthcheck's group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub url: String,
    pub item_id: u64,
    pub group_id: String,
}

impl Item {
    pub fn new(url: impl Into<String>, item_id: u64, group_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            item_id,
            group_id: group_id.into(),
        }
    }
}

/// A watcher: an email address notified for every group it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub groups_id: Vec<String>,
}

impl User {
    pub fn new<I, S>(id: impl Into<String>, email: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            email: email.into(),
            groups_id: groups.into_iter().map(Into::into).collect(),
        }
    }

    pub fn in_group(&self, group_id: &str) -> bool {
        self.groups_id.iter().any(|g| g == group_id)
    }
}
