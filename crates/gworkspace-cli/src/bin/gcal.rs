//! `gcal <command> [args...]`: read, create and update Google Calendar events.

use std::process::ExitCode;

use gworkspace_core::auth::connect_from_env;
use gworkspace_core::dispatch::calendar;
use gworkspace_core::google::CalendarApi;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    gworkspace_cli::init_logging();

    let result = calendar::execute(std::env::args_os(), || async {
        connect_from_env().await.map(CalendarApi::from)
    })
    .await;

    gworkspace_cli::finish(result)
}
