use std::collections::BTreeMap;
use std::io::{self, Write};

use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::debug;

use crate::proxy::{ProxyClient, ProxyOutcome, ProxyRequest};
use crate::usage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    AddUrl,
    RemoveUrl,
    ListUrls,
    AddWatcher,
    RemoveWatcher,
    ListWatchers,
    ListServiceGroups,
    AddGroup,
    RemoveGroup,
    ListGroups,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub kind: CommandKind,
    pub min_args: usize,
    pub max_args: usize,
    pub usage: &'static str,
}

impl CommandSpec {
    const fn new(
        name: &'static str,
        kind: CommandKind,
        min_args: usize,
        max_args: usize,
        usage: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            min_args,
            max_args,
            usage,
        }
    }

    pub fn accepts(&self, arg_count: usize) -> bool {
        (self.min_args..=self.max_args).contains(&arg_count)
    }
}

const BUILTIN_COMMANDS: [CommandSpec; 11] = [
    CommandSpec::new("add-url", CommandKind::AddUrl, 3, 5, usage::ADD_URL),
    CommandSpec::new("remove-url", CommandKind::RemoveUrl, 3, 3, usage::REMOVE_URL),
    CommandSpec::new("list-urls", CommandKind::ListUrls, 2, 2, usage::LIST_URLS),
    CommandSpec::new("add-watcher", CommandKind::AddWatcher, 3, 4, usage::ADD_WATCHER),
    CommandSpec::new("remove-watcher", CommandKind::RemoveWatcher, 3, 3, usage::REMOVE_WATCHER),
    CommandSpec::new("list-watchers", CommandKind::ListWatchers, 2, 2, usage::LIST_WATCHERS),
    CommandSpec::new(
        "list-service-groups",
        CommandKind::ListServiceGroups,
        2,
        3,
        usage::LIST_SERVICE_GROUPS,
    ),
    CommandSpec::new("add-group", CommandKind::AddGroup, 3, 3, usage::ADD_GROUP),
    CommandSpec::new("remove-group", CommandKind::RemoveGroup, 3, 3, usage::REMOVE_GROUP),
    CommandSpec::new("list-groups", CommandKind::ListGroups, 2, 2, usage::LIST_GROUPS),
    CommandSpec::new("help", CommandKind::Help, 0, 1, usage::HELP),
];

/// Fixed mapping from command name to its handler and help text.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let commands = BUILTIN_COMMANDS
            .iter()
            .map(|command| (command.name, command.clone()))
            .collect();
        Self { commands }
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    /// Command names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one remote command. `args` must already satisfy the command's arity.
/// Remote failures are rendered to `out`; only write errors are returned.
pub async fn execute(
    kind: CommandKind,
    client: &ProxyClient,
    args: &[String],
    out: &mut dyn Write,
) -> io::Result<()> {
    let service_name = arg(args, 0);
    let instance_name = optional(args, 1);

    match kind {
        CommandKind::AddUrl => {
            add_url(
                client,
                out,
                service_name,
                instance_name,
                arg(args, 2),
                optional(args, 3),
                optional(args, 4),
            )
            .await
        }
        CommandKind::RemoveUrl => {
            remove_url(client, out, service_name, instance_name, arg(args, 2)).await
        }
        CommandKind::ListUrls => list_urls(client, out, service_name, instance_name).await,
        CommandKind::AddWatcher => {
            add_watcher(
                client,
                out,
                service_name,
                instance_name,
                arg(args, 2),
                optional(args, 3),
            )
            .await
        }
        CommandKind::RemoveWatcher => {
            remove_watcher(client, out, service_name, instance_name, arg(args, 2)).await
        }
        CommandKind::ListWatchers => {
            let request = ProxyRequest::get("/watcher").json();
            list(client, out, service_name, instance_name, &request).await
        }
        CommandKind::ListServiceGroups => {
            let path = match optional(args, 2) {
                Some(keyword) => format!("/servicegroups?keyword={}", urlencoding::encode(keyword)),
                None => "/servicegroups".to_string(),
            };
            let request = ProxyRequest::get(path).json();
            list(client, out, service_name, instance_name, &request).await
        }
        CommandKind::AddGroup => {
            add_group(client, out, service_name, instance_name, arg(args, 2)).await
        }
        CommandKind::RemoveGroup => {
            remove_group(client, out, service_name, instance_name, arg(args, 2)).await
        }
        CommandKind::ListGroups => {
            let request = ProxyRequest::get("/groups").json();
            list(client, out, service_name, instance_name, &request).await
        }
        // Help never reaches the network; the dispatcher renders it.
        CommandKind::Help => Ok(()),
    }
}

async fn add_url(
    client: &ProxyClient,
    out: &mut dyn Write,
    service_name: &str,
    instance_name: Option<&str>,
    url: &str,
    expected_string: Option<&str>,
    comment: Option<&str>,
) -> io::Result<()> {
    let mut body = Map::new();
    body.insert("url".to_string(), Value::from(url));
    if let Some(expected_string) = expected_string {
        body.insert("expected_string".to_string(), Value::from(expected_string));
    }
    if let Some(comment) = comment {
        body.insert("comment".to_string(), Value::from(comment));
    }

    let request = ProxyRequest::post("/url")
        .with_body(Value::Object(body))
        .json()
        .accept_text();

    match client.send(service_name, instance_name, &request).await {
        ProxyOutcome::Success { .. } => writeln!(out, "url {} successfully added!", url),
        failure => write_failure(out, &failure),
    }
}

async fn remove_url(
    client: &ProxyClient,
    out: &mut dyn Write,
    service_name: &str,
    instance_name: Option<&str>,
    url: &str,
) -> io::Result<()> {
    let request = ProxyRequest::delete("/url")
        .with_body(single_field("url", url))
        .json();

    match client.send(service_name, instance_name, &request).await {
        ProxyOutcome::Success { .. } => writeln!(out, "url {} successfully removed!", url),
        ProxyOutcome::HttpError { status, .. } if status == StatusCode::NOT_FOUND => {
            writeln!(out, "URL {} not found.", url)
        }
        failure => write_failure(out, &failure),
    }
}

async fn list_urls(
    client: &ProxyClient,
    out: &mut dyn Write,
    service_name: &str,
    instance_name: Option<&str>,
) -> io::Result<()> {
    let request = ProxyRequest::get("/url").json();

    match client.send(service_name, instance_name, &request).await {
        ProxyOutcome::Success { body, .. } => writeln!(out, "{}", body),
        failure => write_failure(out, &failure),
    }
}

async fn add_watcher(
    client: &ProxyClient,
    out: &mut dyn Write,
    service_name: &str,
    instance_name: Option<&str>,
    watcher: &str,
    password: Option<&str>,
) -> io::Result<()> {
    let mut body = Map::new();
    body.insert("watcher".to_string(), Value::from(watcher));
    if let Some(password) = password {
        body.insert("password".to_string(), Value::from(password));
    }

    let request = ProxyRequest::post("/watcher")
        .with_body(Value::Object(body))
        .json()
        .accept_text();

    match client.send(service_name, instance_name, &request).await {
        ProxyOutcome::Success { .. } => writeln!(out, "watcher {} successfully added!", watcher),
        failure => write_failure(out, &failure),
    }
}

async fn remove_watcher(
    client: &ProxyClient,
    out: &mut dyn Write,
    service_name: &str,
    instance_name: Option<&str>,
    watcher: &str,
) -> io::Result<()> {
    let request = ProxyRequest::delete(format!("/watcher/{}", watcher));

    match client.send(service_name, instance_name, &request).await {
        ProxyOutcome::Success { .. } => {
            writeln!(out, "watcher {} successfully removed!", watcher)
        }
        failure => write_failure(out, &failure),
    }
}

async fn add_group(
    client: &ProxyClient,
    out: &mut dyn Write,
    service_name: &str,
    instance_name: Option<&str>,
    group: &str,
) -> io::Result<()> {
    let request = ProxyRequest::post("/groups")
        .with_body(single_field("group", group))
        .json()
        .accept_text();

    match client.send(service_name, instance_name, &request).await {
        ProxyOutcome::Success { .. } => writeln!(out, "group {} successfully added!", group),
        failure => write_failure(out, &failure),
    }
}

async fn remove_group(
    client: &ProxyClient,
    out: &mut dyn Write,
    service_name: &str,
    instance_name: Option<&str>,
    group: &str,
) -> io::Result<()> {
    let request = ProxyRequest::delete("/groups")
        .with_body(single_field("group", group))
        .json();

    match client.send(service_name, instance_name, &request).await {
        ProxyOutcome::Success { .. } => writeln!(out, "group {} successfully removed!", group),
        ProxyOutcome::HttpError { status, .. } if status == StatusCode::NOT_FOUND => {
            writeln!(out, "group not found in the instance.")
        }
        failure => write_failure(out, &failure),
    }
}

async fn list(
    client: &ProxyClient,
    out: &mut dyn Write,
    service_name: &str,
    instance_name: Option<&str>,
    request: &ProxyRequest,
) -> io::Result<()> {
    match client.send(service_name, instance_name, request).await {
        ProxyOutcome::Success { body, .. } => write_lines(out, &body),
        failure => write_failure(out, &failure),
    }
}

/// Prints a JSON array of strings one entry per line, in response order.
fn write_lines(out: &mut dyn Write, body: &str) -> io::Result<()> {
    match serde_json::from_str::<Vec<String>>(body) {
        Ok(entries) => {
            for entry in entries {
                writeln!(out, "{}", entry)?;
            }
            Ok(())
        }
        Err(e) => {
            debug!("Response is not a list of strings: {}", e);
            writeln!(out, "error: unexpected response from the service.")
        }
    }
}

fn write_failure(out: &mut dyn Write, outcome: &ProxyOutcome) -> io::Result<()> {
    match outcome {
        ProxyOutcome::HttpError { reason, .. } => writeln!(out, "error: {}.", reason),
        ProxyOutcome::Transport(message) => writeln!(out, "error: {}.", message),
        ProxyOutcome::Success { .. } => Ok(()),
    }
}

fn single_field(key: &str, value: &str) -> Value {
    let mut body = Map::new();
    body.insert(key.to_string(), Value::from(value));
    Value::Object(body)
}

fn arg(args: &[String], index: usize) -> &str {
    args.get(index).map(String::as_str).unwrap_or_default()
}

/// Optional positional argument; an empty string counts as absent.
fn optional(args: &[String], index: usize) -> Option<&str> {
    args.get(index)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_every_command() {
        let registry = CommandRegistry::new();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "add-group",
                "add-url",
                "add-watcher",
                "help",
                "list-groups",
                "list-service-groups",
                "list-urls",
                "list-watchers",
                "remove-group",
                "remove-url",
                "remove-watcher",
            ]
        );
        assert_eq!(registry.len(), 11);
    }

    #[test]
    fn test_arity_bounds() {
        let registry = CommandRegistry::new();

        let add_url = registry.get("add-url").unwrap();
        assert!(!add_url.accepts(2));
        assert!(add_url.accepts(3));
        assert!(add_url.accepts(5));
        assert!(!add_url.accepts(6));

        let help = registry.get("help").unwrap();
        assert!(help.accepts(0));
        assert!(help.accepts(1));
        assert!(!help.accepts(2));

        assert!(registry.get("remove-everything").is_none());
    }

    #[test]
    fn test_write_lines() {
        let mut out = Vec::new();
        write_lines(&mut out, r#"["a@x.com","b@x.com"]"#).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a@x.com\nb@x.com\n");

        let mut out = Vec::new();
        write_lines(&mut out, "[]").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_lines_rejects_non_list() {
        let mut out = Vec::new();
        write_lines(&mut out, r#"{"error":"boom"}"#).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "error: unexpected response from the service.\n"
        );
    }

    #[test]
    fn test_empty_optional_counts_as_absent() {
        let args: Vec<String> = vec!["svc".into(), "".into(), "http://x".into()];
        assert_eq!(optional(&args, 1), None);
        assert_eq!(optional(&args, 2), Some("http://x"));
        assert_eq!(optional(&args, 7), None);
        assert_eq!(arg(&args, 0), "svc");
    }
}
