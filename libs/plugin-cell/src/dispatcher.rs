use std::env;
use std::ffi::OsString;
use std::io::{self, Write};

use tracing::{debug, error};

use shared_config::PluginConfig;

use crate::commands::{self, CommandKind, CommandRegistry};
use crate::error::PluginError;
use crate::proxy::ProxyClient;
use crate::usage;

pub const EXIT_OK: i32 = 0;
/// Output could not be written.
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_CONFIG: i32 = 5;

/// Command line arguments as text. Bytes that are not valid UTF-8 are
/// replaced rather than aborting the process.
pub fn args_from_os<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves a command line to a registered command and runs it.
///
/// The dispatcher never terminates the process; it hands back the exit code.
pub struct Dispatcher {
    registry: CommandRegistry,
    env: EnvLookup,
}

impl Dispatcher {
    pub fn new<F>(registry: CommandRegistry, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            registry,
            env: Box::new(env),
        }
    }

    pub fn from_process_env(registry: CommandRegistry) -> Self {
        Self::new(registry, |name| env::var(name).ok())
    }

    pub fn plugin_name(&self) -> String {
        PluginConfig::plugin_name(|name| (self.env)(name))
    }

    /// Runs `args` (command name first). Results go to `out`, usage and
    /// configuration errors to `err`.
    pub async fn run(&self, args: &[String], out: &mut dyn Write, err: &mut dyn Write) -> i32 {
        let code = match self.dispatch(args, out, err).await {
            Ok(code) => code,
            Err(PluginError::Config(e)) => {
                let _ = writeln!(err, "ERROR: {}", e);
                EXIT_CONFIG
            }
            Err(e) => {
                error!("Command failed: {}", e);
                let _ = writeln!(err, "ERROR: {}", e);
                EXIT_FAILURE
            }
        };

        let _ = out.flush();
        let _ = err.flush();
        code
    }

    async fn dispatch(
        &self,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<i32, PluginError> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(self.show_help(None, EXIT_USAGE, err)?);
        };

        let Some(command) = self.registry.get(name) else {
            debug!("Unknown command {}", name);
            return Ok(self.show_help(None, EXIT_USAGE, err)?);
        };

        if !command.accepts(rest.len()) {
            debug!("{} called with {} arguments", command.name, rest.len());
            return Ok(self.show_help(Some(command.name), EXIT_USAGE, err)?);
        }

        if command.kind == CommandKind::Help {
            let topic = rest.first().map(String::as_str);
            return Ok(self.show_help(topic, EXIT_OK, err)?);
        }

        let config = PluginConfig::from_lookup(|name| (self.env)(name))?;
        let client = ProxyClient::new(&config)?;

        commands::execute(command.kind, &client, rest, out).await?;
        Ok(EXIT_OK)
    }

    /// Writes the detailed usage of `command` when it is known, otherwise the
    /// list of every command. Returns `exit_code` unchanged.
    pub fn show_help(
        &self,
        command: Option<&str>,
        exit_code: i32,
        err: &mut dyn Write,
    ) -> io::Result<i32> {
        let plugin_name = self.plugin_name();

        if let Some(entry) = command.and_then(|name| self.registry.get(name)) {
            writeln!(err, "{}", usage::render(entry.usage, &plugin_name))?;
            return Ok(exit_code);
        }

        writeln!(err, "Usage: tsuru {} command [args]", plugin_name)?;
        writeln!(err)?;
        writeln!(err, "Available commands:")?;
        for name in self.registry.names().filter(|name| *name != "help") {
            writeln!(err, "  {}", name)?;
        }
        writeln!(err, "  help")?;
        writeln!(err)?;
        writeln!(
            err,
            "Use tsuru {} help <commandname> to get more details.",
            plugin_name
        )?;
        Ok(exit_code)
    }
}
