//! `gdrive <command> [args...]`: find and read Google Sheets spreadsheets.

use std::process::ExitCode;

use gworkspace_core::auth::connect_from_env;
use gworkspace_core::dispatch::files;
use gworkspace_core::google::FileStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    gworkspace_cli::init_logging();

    let result = files::execute(std::env::args_os(), || async {
        connect_from_env().await.map(FileStore::from)
    })
    .await;

    gworkspace_cli::finish(result)
}
