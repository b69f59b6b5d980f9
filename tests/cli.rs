//! Integration tests for top-level binary behavior.

use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use serde_json::json;

use llamagate::cassette::recorder::CassetteRecorder;

/// A scratch directory without a `.env`, used as the child's working directory.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn llamagate(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_llamagate"));
    cmd.current_dir(dir)
        .env_remove("HUGGINGFACE_TOKEN")
        .env_remove("LLAMAGATE_RECORD")
        .env_remove("LLAMAGATE_REPLAY")
        .env("RUST_LOG", "info");
    cmd
}

#[test]
fn missing_token_exits_before_serving() {
    let dir = scratch("llamagate_it_missing_token");
    // Hold the service port: a child that tried to bind it would report
    // "failed to bind" instead of the credential error.
    let held = TcpListener::bind(("0.0.0.0", 8000)).ok();

    let started = Instant::now();
    let output = llamagate(&dir).output().expect("failed to run llamagate binary");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(started.elapsed() < Duration::from_secs(30));
    assert!(!output.status.success());
    assert!(stderr.contains("HUGGINGFACE_TOKEN is not set"), "{stderr}");
    assert!(!stderr.contains("failed to bind"), "{stderr}");
    drop(held);
    assert!(!stderr.contains("downloading model"), "{stderr}");
    assert!(!stderr.contains("starting OpenAI-compatible API"), "{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_token_counts_as_missing() {
    let dir = scratch("llamagate_it_empty_token");
    let output = llamagate(&dir)
        .arg("serve")
        .env("HUGGINGFACE_TOKEN", "")
        .output()
        .expect("failed to run llamagate binary");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("HUGGINGFACE_TOKEN is not set"), "{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn token_from_dotenv_file_is_used() {
    let dir = scratch("llamagate_it_dotenv");
    std::fs::write(dir.join(".env"), "HUGGINGFACE_TOKEN=hf_from_file\n").unwrap();
    let empty_path = dir.join("bin");
    std::fs::create_dir_all(&empty_path).unwrap();

    let output = llamagate(&dir)
        .arg("provision")
        .env("PATH", &empty_path)
        .output()
        .expect("failed to run llamagate binary");
    let stderr = String::from_utf8_lossy(&output.stderr);

    // Past the credential check, stopped by the missing downloader.
    assert!(!output.status.success());
    assert!(!stderr.contains("is not set"), "{stderr}");
    assert!(stderr.contains("failed to run huggingface-cli"), "{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn provision_replayed_from_cassette_succeeds() {
    let dir = scratch("llamagate_it_replay_provision");
    let cassette = dir.join("provision.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&cassette, "provision", "afrideva/Tiny-Vicuna-1B-GGUF");
    recorder.record(
        "process",
        "run",
        json!({"program": "huggingface-cli"}),
        json!({"Ok": {"exit_code": 0, "stdout": "done\n", "stderr": ""}}),
    );
    recorder.finish().unwrap();

    let output = llamagate(&dir)
        .arg("provision")
        .env("HUGGINGFACE_TOKEN", "hf_test")
        .env("LLAMAGATE_REPLAY", &cassette)
        .output()
        .expect("failed to run llamagate binary");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "{stderr}");
    assert!(stderr.contains("model downloaded successfully"), "{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn failed_download_is_fatal() {
    let dir = scratch("llamagate_it_replay_download_fail");
    let cassette = dir.join("provision.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&cassette, "provision", "afrideva/Tiny-Vicuna-1B-GGUF");
    recorder.record(
        "process",
        "run",
        json!({"program": "huggingface-cli"}),
        json!({"Ok": {"exit_code": 1, "stdout": "", "stderr": "401 Client Error\n"}}),
    );
    recorder.finish().unwrap();

    let output = llamagate(&dir)
        .env("HUGGINGFACE_TOKEN", "hf_test")
        .env("LLAMAGATE_REPLAY", &cassette)
        .output()
        .expect("failed to run llamagate binary");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Failed to load model: model download exited with status 1"), "{stderr}");
    assert!(stderr.contains("401 Client Error"), "{stderr}");
    assert!(!stderr.contains("starting OpenAI-compatible API"), "{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn help_lists_subcommands() {
    let dir = scratch("llamagate_it_help");
    let output = llamagate(&dir).arg("--help").output().expect("failed to run llamagate binary");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("provision"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let dir = scratch("llamagate_it_invalid");
    let output = llamagate(&dir).arg("nonsense").output().expect("failed to run llamagate binary");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_dotenv_is_reported() {
    let dir = scratch("llamagate_it_bad_dotenv");
    std::fs::write(dir.join(".env"), "this line is not an assignment\n").unwrap();

    let output = llamagate(&dir).output().expect("failed to run llamagate binary");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("failed to load .env"), "{stderr}");
    assert!(stderr.contains("HUGGINGFACE_TOKEN is not set"), "{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}
