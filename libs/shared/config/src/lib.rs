use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

mod plugin;

pub use plugin::{ConfigError, PluginConfig, DEFAULT_PLUGIN_NAME};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8888;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub plugin_path: Option<PathBuf>,
    pub service_groups: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HCAAS_HOST")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| {
                warn!("HCAAS_HOST not set, using default");
                DEFAULT_HOST.to_string()
            });

        let port = match lookup("HCAAS_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("HCAAS_PORT is not a valid port ({}), using default", raw);
                DEFAULT_PORT
            }),
            None => {
                warn!("HCAAS_PORT not set, using default");
                DEFAULT_PORT
            }
        };

        let plugin_path = lookup("HCAAS_PLUGIN_PATH")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        if plugin_path.is_none() {
            warn!("HCAAS_PLUGIN_PATH not set, GET /plugin will answer 404");
        }

        let service_groups = lookup("HCAAS_SERVICE_GROUPS")
            .map(|raw| parse_list(&raw))
            .unwrap_or_default();

        Self {
            host,
            port,
            plugin_path,
            service_groups,
        }
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "HCAAS_HOST",
                value: self.host.clone(),
            })
    }

    pub fn is_plugin_configured(&self) -> bool {
        self.plugin_path.is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            plugin_path: None,
            service_groups: Vec::new(),
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}
