use std::io::{self, Write};

use plugin_cell::{args_from_os, CommandRegistry, Dispatcher};
use shared_utils::telemetry::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Diagnostics go to stderr so command output stays clean.
    init_tracing("warn", io::stderr);

    let args = args_from_os(std::env::args_os().skip(1));
    let dispatcher = Dispatcher::from_process_env(CommandRegistry::new());

    let mut out = io::stdout();
    let mut err = io::stderr();
    let code = dispatcher.run(&args, &mut out, &mut err).await;

    let _ = out.flush();
    std::process::exit(code);
}
