// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use assert_cmd::Command;
use serde_json::json;

fn upload_cmd() -> Command {
    let mut cmd = Command::cargo_bin("framevault-upload").expect("binary should build");
    // Keep tests hermetic from the caller's environment.
    cmd.env_remove("FRAMEVAULT_SERVER");
    cmd.env_remove("FRAMEVAULT_TOKEN");
    cmd
}

#[test]
fn test_help_lists_flags() {
    upload_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("--name"))
        .stdout(predicates::str::contains("--version"))
        .stdout(predicates::str::contains("--workdir"))
        .stdout(predicates::str::contains("--jsondir"))
        .stdout(predicates::str::contains("--uploadURI"))
        .stdout(predicates::str::contains("--batch"))
        .stdout(predicates::str::contains("--startix"));
}

#[test]
fn test_missing_required_args() {
    upload_cmd()
        .assert()
        .failure()
        .stderr(predicates::str::contains("--name"));
}

#[test]
fn test_rejects_invalid_upload_uri() {
    upload_cmd()
        .args(["--name", "ffhq", "--version", "1.0", "--uploadURI", "not a uri"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("UrlParseError"));
}

#[test]
fn test_malformed_frame_path_fails_before_upload() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let contents = json!({
        "0": { "image": { "face_landmarks": [1, 2], "file_path": "only-two/segments" } }
    });
    std::fs::write(dir.path().join("train.json"), contents.to_string())?;

    upload_cmd()
        .args(["--name", "ffhq", "--version", "1.0", "--uploadURI", "s3://bucket/ffhq"])
        .arg("--workdir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("only-two/segments"));

    Ok(())
}

#[test]
fn test_malformed_json_fails_before_upload() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("train.json"), "not json")?;

    upload_cmd()
        .args(["--name", "ffhq", "--version", "1.0", "--uploadURI", "s3://bucket/ffhq"])
        .arg("--workdir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("JsonError"));

    Ok(())
}

#[test]
fn test_invalid_token_fails_before_network() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    upload_cmd()
        .args(["--name", "ffhq", "--version", "1.0", "--uploadURI", "s3://bucket/ffhq"])
        .args(["--token", "not-a-jwt"])
        .arg("--jsondir")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicates::str::contains("Adding 0 frame groups"))
        .stderr(predicates::str::contains("InvalidToken"));

    Ok(())
}
