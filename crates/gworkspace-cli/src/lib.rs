//! Process plumbing shared by the `gmail`, `gcal` and `gdrive` binaries.

use std::process::ExitCode;

use gworkspace_core::{AppResult, Output};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Log to stderr at `warn` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print the outcome and map it to the process exit status.
pub fn finish(result: AppResult<Output>) -> ExitCode {
    let err = match result.and_then(|output| output.render()) {
        Ok(rendered) => {
            println!("{}", rendered);
            return ExitCode::SUCCESS;
        }
        Err(err) => err,
    };

    debug!(category = err.category(), "Command failed");
    eprintln!("{}", err);
    if let Some(hint) = err.hint() {
        eprintln!("Hint: {}", hint);
    }
    ExitCode::FAILURE
}
