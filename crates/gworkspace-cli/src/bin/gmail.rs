//! `gmail <command> [args...]`: read Gmail messages, threads and labels.

use std::process::ExitCode;

use gworkspace_core::auth::connect_from_env;
use gworkspace_core::dispatch::mail;
use gworkspace_core::google::GmailApi;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    gworkspace_cli::init_logging();

    let result = mail::execute(std::env::args_os(), || async {
        connect_from_env().await.map(GmailApi::from)
    })
    .await;

    gworkspace_cli::finish(result)
}
