//! Command-line tests against scripted `sh` backends.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const PNG_REPLY: &str = r#"read line; echo '{"comm_id":"p1","data":{"jsonrpc":"2.0","id":1,"result":{"data":"aGVsbG8=","mime_type":"image/png"}}}'"#;

fn plotclient() -> Command {
    Command::cargo_bin("plotclient").unwrap()
}

#[test]
fn render_writes_decoded_plot() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("plot.png");

    plotclient()
        .args(["render", "--plot-id", "p1", "--out"])
        .arg(&out)
        .args(["--", "sh", "-c", PNG_REPLY])
        .assert()
        .success()
        .stdout(predicate::str::contains("p1 image/png 5 bytes"));

    assert_eq!(std::fs::read(&out).unwrap(), b"hello");
}

#[test]
fn render_forwards_settings_to_backend() {
    // The backend echoes the request it received to stderr.
    let script = r#"read line; echo "$line" >&2; echo '{"comm_id":"p1","data":{"jsonrpc":"2.0","id":1,"result":{"data":"PHN2Zz4=","mime_type":"image/svg+xml","intrinsic_size":{"width":640,"height":480,"unit":"pixels","source":"test"}}}}'"#;

    plotclient()
        .args([
            "render",
            "--plot-id",
            "p1",
            "--width",
            "800",
            "--height",
            "600",
            "--pixel-ratio",
            "2",
            "--format",
            "svg",
            "--",
            "sh",
            "-c",
            script,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("image/svg+xml 5 bytes 640x480 pixels"))
        .stderr(
            predicate::str::contains(r#""method":"render""#)
                .and(predicate::str::contains(r#""format":"svg""#))
                .and(predicate::str::contains(r#""pixel_ratio":2.0"#))
                .and(predicate::str::contains(r#""width":800.0"#)),
        );
}

#[test]
fn backend_error_fails_render() {
    let script = r#"read line; echo '{"comm_id":"p1","data":{"jsonrpc":"2.0","id":1,"error":{"code":-32603,"message":"device error"}}}'"#;

    plotclient()
        .args(["render", "--plot-id", "p1", "--", "sh", "-c", script])
        .assert()
        .failure()
        .stderr(predicate::str::contains("device error"));
}

#[test]
fn backend_exit_reports_disconnect() {
    plotclient()
        .args(["render", "--plot-id", "p1", "--", "sh", "-c", "exit 0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("backend disconnected"));
}

#[test]
fn silent_backend_times_out() {
    plotclient()
        .args([
            "render",
            "--plot-id",
            "p1",
            "--timeout-secs",
            "1",
            "--",
            "sh",
            "-c",
            "exec sleep 10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Timed out"));
}

#[test]
fn missing_backend_fails_to_start() {
    plotclient()
        .args(["render", "--plot-id", "p1", "--", "plotclient-no-such-backend"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to start backend"));
}

#[test]
fn width_requires_height() {
    plotclient()
        .args(["render", "--plot-id", "p1", "--width", "10", "--", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--height"));
}

#[test]
fn log_file_records_lifecycle() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("plotclient.log");

    plotclient()
        .env_remove("RUST_LOG")
        .arg("--log")
        .arg(&log)
        .args(["render", "--plot-id", "p1", "--", "sh", "-c", PNG_REPLY])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("Starting plotclient"));
    assert!(contents.contains("render completed"));
}

#[test]
fn log_file_records_plot_code() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("plotclient.log");

    plotclient()
        .env_remove("RUST_LOG")
        .arg("--log")
        .arg(&log)
        .args(["render", "--plot-id", "p1", "--code", "plot(x)", "--language", "r"])
        .args(["--", "sh", "-c", PNG_REPLY])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("rendering plot"));
    assert!(contents.contains("plot(x)"));
}

#[test]
fn tiff_format_is_rejected() {
    plotclient()
        .args(["render", "--plot-id", "p1", "--format", "tiff", "--", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown render format: tiff"));
}

#[test]
fn help_lists_subcommands() {
    plotclient()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render").and(predicate::str::contains("view")));
}
