use assert_cmd::Command;
use predicates::prelude::*;

/// A command with no credentials anywhere: empty environment, empty home.
fn isolated(bin: &str) -> Command {
    let program = match bin {
        "gmail" => env!("CARGO_BIN_EXE_gmail"),
        "gcal" => env!("CARGO_BIN_EXE_gcal"),
        _ => env!("CARGO_BIN_EXE_gdrive"),
    };
    let home = std::env::temp_dir().join(format!("gworkspace-home-{}-{}", bin, std::process::id()));
    std::fs::create_dir_all(&home).expect("create temp home");

    let mut cmd = Command::new(program);
    cmd.env_clear().env("HOME", &home);
    cmd
}

#[test]
fn unknown_command_prints_listing_and_exits_1() {
    isolated("gmail")
        .arg("purge")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unrecognized subcommand 'purge'"))
        .stderr(predicate::str::contains("labels"))
        .stderr(predicate::str::contains("threads"));
}

#[test]
fn calendar_has_no_delete_command() {
    isolated("gcal")
        .args(["delete", "ev1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unrecognized subcommand 'delete'"))
        .stderr(predicate::str::contains("update"));
}

#[test]
fn missing_command_prints_listing() {
    isolated("gdrive")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("files"))
        .stderr(predicate::str::contains("info"));
}

#[test]
fn missing_argument_is_reported_before_credentials() {
    isolated("gdrive")
        .arg("read")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("<SPREADSHEET_ID>"))
        .stderr(predicate::str::contains("GOOGLE_CLIENT_ID").not());
}

#[test]
fn missing_credentials_fail_before_any_request() {
    isolated("gmail")
        .arg("labels")
        .env("GWORKSPACE_TOKEN_URL", "http://127.0.0.1:9/token")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("GOOGLE_CLIENT_ID"));
}

#[test]
fn unreadable_credential_file_is_a_config_error() {
    isolated("gcal")
        .arg("calendars")
        .env("GWORKSPACE_CREDENTIALS", "/nonexistent/google_oauth.json")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn help_and_version_exit_0() {
    isolated("gcal")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("today"))
        .stdout(predicate::str::contains("quick"))
        .stdout(predicate::str::contains("calendars"));

    isolated("gmail")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
