use std::collections::HashMap;
use std::sync::Arc;

use shared_config::AppConfig;

pub struct TestConfig {
    pub plugin_path: Option<String>,
    pub service_groups: Vec<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            plugin_path: None,
            service_groups: vec![
                "projects".to_string(),
                "projects-internal".to_string(),
                "infra".to_string(),
            ],
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            plugin_path: self.plugin_path.as_ref().map(Into::into),
            service_groups: self.service_groups.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Stand-in for the process environment so tests never touch `std::env`.
#[derive(Debug, Clone, Default)]
pub struct TestEnv {
    vars: HashMap<String, String>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment the platform hands to a plugin pointed at `target`.
    pub fn platform(target: &str) -> Self {
        Self::new()
            .with("TSURU_TARGET", target)
            .with("TSURU_TOKEN", "abc123")
            .with("TSURU_PLUGIN_NAME", "hc")
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.vars.remove(name);
        self
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    pub fn lookup(&self) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
        let vars = self.vars.clone();
        move |name| vars.get(name).cloned()
    }
}
