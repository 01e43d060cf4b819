//! Command-line surface and exit codes.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn gdk_release() -> Command {
    let mut cmd = Command::cargo_bin("gdk-release").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("GDK_RELEASE_CONFIG")
        .env("XDG_CONFIG_HOME", "/nonexistent-gdk-release-config")
        .env("HOME", "/nonexistent-gdk-release-home");
    cmd
}

const FORK: &[&str] = &["--github-user", "gdk-bot", "--git-repository-name", "gdk-for-unity"];

#[test]
fn help_exits_zero() {
    gdk_release()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("release"));
}

#[test]
fn release_help_lists_options() {
    gdk_release()
        .args(["release", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--pull-request-url")
                .and(predicate::str::contains("--github-key-file"))
                .and(predicate::str::contains("--unattended"))
                .and(predicate::str::contains("--metadata-file-path")),
        );
}

#[test]
fn version_exits_zero() {
    gdk_release()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_required_argument_exits_one() {
    gdk_release()
        .args(["release", "0.3.0"])
        .args(FORK)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--pull-request-url"));
}

#[test]
fn malformed_pull_request_url_exits_one() {
    gdk_release()
        .args([
            "release",
            "0.3.0",
            "-u",
            "https://github.com/spatialos/gdk-for-unity/pull/abc",
            "--github-key",
            "x",
            "--unattended",
        ])
        .args(FORK)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected a positive number"));
}

#[test]
fn pull_request_of_other_organization_exits_one() {
    gdk_release()
        .args([
            "release",
            "0.3.0",
            "-u",
            "https://github.com/someone-else/gdk-for-unity/pull/1",
            "--github-key",
            "x",
        ])
        .args(FORK)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("malformed pull request url"));
}

#[test]
fn missing_key_file_exits_one() {
    let dir = assert_fs::TempDir::new().unwrap();
    let key_file = dir.child("github.token");

    gdk_release()
        .args([
            "release",
            "0.3.0",
            "-u",
            "https://github.com/spatialos/gdk-for-unity/pull/1",
            "--github-key-file",
        ])
        .arg(key_file.path())
        .args(FORK)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("github.token"));
}

#[test]
fn blank_key_file_exits_one() {
    let dir = assert_fs::TempDir::new().unwrap();
    let key_file = dir.child("github.token");
    key_file.write_str("  \n").unwrap();

    gdk_release()
        .args([
            "release",
            "0.3.0",
            "-u",
            "https://github.com/spatialos/gdk-for-unity/pull/1",
            "--github-key-file",
        ])
        .arg(key_file.path())
        .args(FORK)
        .assert()
        .code(1);
}

#[test]
fn invalid_config_file_exits_one() {
    let dir = assert_fs::TempDir::new().unwrap();
    let config = dir.child("config.toml");
    config.write_str("unknown_key = 1\n").unwrap();

    gdk_release()
        .arg("--config")
        .arg(config.path())
        .args([
            "release",
            "0.3.0",
            "-u",
            "https://github.com/spatialos/gdk-for-unity/pull/1",
            "--github-key",
            "x",
        ])
        .args(FORK)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn config_env_naming_missing_file_exits_one() {
    let dir = assert_fs::TempDir::new().unwrap();
    let missing = dir.child("gone.toml");

    gdk_release()
        .env("GDK_RELEASE_CONFIG", missing.path())
        .args([
            "release",
            "0.3.0",
            "-u",
            "https://github.com/spatialos/gdk-for-unity/pull/1",
            "--github-key",
            "x",
        ])
        .args(FORK)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("gone.toml"));
}

#[test]
fn unsupported_repository_lists_supported_names() {
    gdk_release()
        .args([
            "release",
            "0.3.0",
            "-u",
            "https://github.com/spatialos/some-tool/pull/3",
            "--github-key",
            "x",
        ])
        .args(FORK)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("gdk-for-unity-fps-starter-project"));
}
