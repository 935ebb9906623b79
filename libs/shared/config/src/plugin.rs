use std::env;

use thiserror::Error;

pub const DEFAULT_PLUGIN_NAME: &str = "hc";

/// Prefix the platform puts on the variables it exports to plugins.
const PLATFORM_PREFIX: &str = "TSURU_";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing {0}")]
    Missing(String),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Settings the CLI plugin needs to reach the service through the platform.
#[derive(Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub target: String,
    pub token: String,
}

impl std::fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginConfig")
            .field("target", &self.target)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl PluginConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let target = required(&lookup, "TARGET")?;
        let token = required(&lookup, "TOKEN")?;

        Ok(Self {
            target: normalize_target(&target),
            token,
        })
    }

    /// Display name used in generated help text.
    pub fn plugin_name<F>(lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        platform_var(&lookup, "PLUGIN_NAME").unwrap_or_else(|| DEFAULT_PLUGIN_NAME.to_string())
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    platform_var(lookup, name).ok_or_else(|| ConfigError::Missing(format!("{PLATFORM_PREFIX}{name}")))
}

fn platform_var<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&format!("{PLATFORM_PREFIX}{name}"))
        .filter(|value| !value.is_empty())
        .or_else(|| lookup(name).filter(|value| !value.is_empty()))
}

fn normalize_target(raw: &str) -> String {
    let target = raw.trim_end_matches('/');
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("http://{target}")
    }
}
