use std::time::Duration;

use reqwest::{header::AUTHORIZATION, Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use shared_config::PluginConfig;

use crate::error::PluginError;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the platform proxy url that forwards `path` to the service.
///
/// With an instance the request lands on `/resources/{instance}/{path}`,
/// without one on `/resources/{path}`. Leading slashes of `path` are dropped.
/// The callback is percent-encoded so the platform hands it back unchanged
/// (a `+` in an email must not turn into a space).
pub fn proxy_url(
    target: &str,
    service_name: &str,
    instance_name: Option<&str>,
    path: &str,
) -> String {
    let path = path.trim_start_matches('/');
    match instance_name {
        Some(instance) => {
            let callback = format!("/resources/{}/{}", instance, path);
            format!(
                "{}/services/{}/proxy/{}?callback={}",
                target,
                service_name,
                instance,
                urlencoding::encode(&callback)
            )
        }
        None => {
            let callback = format!("/resources/{}", path);
            format!(
                "{}/services/proxy/service/{}?callback={}",
                target,
                service_name,
                urlencoding::encode(&callback)
            )
        }
    }
}

/// Everything needed to issue one proxied call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(&'static str, &'static str)>,
}

impl ProxyRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn json(self) -> Self {
        self.with_header("Content-Type", "application/json")
    }

    pub fn accept_text(self) -> Self {
        self.with_header("Accept", "text/plain")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyOutcome {
    Success { status: StatusCode, body: String },
    HttpError { status: StatusCode, reason: String },
    Transport(String),
}

pub struct ProxyClient {
    client: Client,
    target: String,
    token: String,
}

impl ProxyClient {
    pub fn new(config: &PluginConfig) -> Result<Self, PluginError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            target: config.target.clone(),
            token: config.token.clone(),
        })
    }

    pub fn url_for(&self, service_name: &str, instance_name: Option<&str>, path: &str) -> String {
        proxy_url(&self.target, service_name, instance_name, path)
    }

    /// Sends the request once. Failures are reported in the outcome, never
    /// raised.
    pub async fn send(
        &self,
        service_name: &str,
        instance_name: Option<&str>,
        request: &ProxyRequest,
    ) -> ProxyOutcome {
        let url = self.url_for(service_name, instance_name, &request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(AUTHORIZATION, format!("bearer {}", self.token));

        for (name, value) in &request.headers {
            builder = builder.header(*name, *value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                return ProxyOutcome::Transport(describe_transport_error(&e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!("Service answered {}", status);
            return ProxyOutcome::HttpError {
                status,
                reason: status.canonical_reason().unwrap_or("unknown error").to_string(),
            };
        }

        match response.text().await {
            Ok(body) => ProxyOutcome::Success { status, body },
            Err(e) => ProxyOutcome::Transport(describe_transport_error(&e)),
        }
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "could not connect to the platform".to_string()
    } else {
        error.to_string()
    }
}
