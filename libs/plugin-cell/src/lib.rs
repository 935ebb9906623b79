// =====================================================================================
// PLUGIN CELL - PLATFORM CLI PLUGIN
// =====================================================================================
//
// Turns `tsuru <plugin> <command> [args...]` into one authenticated request sent
// through the platform's service proxy, and renders the answer for the user.
//
// =====================================================================================

pub mod commands;
pub mod dispatcher;
pub mod error;
pub mod proxy;
pub mod usage;

pub use commands::{CommandKind, CommandRegistry, CommandSpec};
pub use dispatcher::{args_from_os, Dispatcher, EXIT_CONFIG, EXIT_FAILURE, EXIT_OK, EXIT_USAGE};
pub use error::PluginError;
pub use proxy::{proxy_url, ProxyClient, ProxyOutcome, ProxyRequest, REQUEST_TIMEOUT};
