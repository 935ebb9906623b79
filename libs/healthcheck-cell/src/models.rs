use serde::{Deserialize, Serialize};

// Form bodies of the instance-level endpoints.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInstanceForm {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUrlForm {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddWatcherForm {
    pub name: String,
    pub watcher: String,
}

// JSON bodies sent by the CLI plugin to `/resources/{name}/...`.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUrlRequest {
    pub url: String,
    pub expected_string: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveUrlRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddWatcherRequest {
    pub watcher: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRequest {
    pub group: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceGroupsQuery {
    pub keyword: Option<String>,
}
