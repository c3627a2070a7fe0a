#![allow(deprecated)] // cargo_bin deprecation - still works fine

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("require-codeowners").expect("binary should exist")
}

struct Repo {
    dir: TempDir,
}

impl Repo {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    fn dir(self, relative_path: &str) -> Self {
        fs::create_dir_all(self.dir.path().join(relative_path)).expect("Failed to create dir");
        self
    }

    fn file(self, relative_path: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
        self
    }

    fn cmd(&self) -> Command {
        let mut cmd = cmd();
        cmd.arg("--root").arg(self.dir.path());
        cmd
    }
}

fn glob_repo() -> Repo {
    Repo::new()
        .dir("apps/a/services/foo")
        .dir("apps/a/services/bar")
        .dir("apps/b/services/baz")
        .file(
            ".github/CODEOWNERS",
            "/apps/a/services/foo/ @team-foo\n/apps/a/services/bar/ @team-bar\n",
        )
}

#[test]
fn covered_directories_pass() {
    let repo = Repo::new()
        .dir("src")
        .file("CODEOWNERS", "/src/ @team\n")
        .file(".requirecodeowners.yml", "directories:\n  - path: src\n");

    repo.cmd()
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "✓ all directories have CODEOWNERS coverage",
        ));
}

#[test]
fn uncovered_glob_directory_fails() {
    let repo = glob_repo().file(
        ".requirecodeowners.yml",
        "directories:\n  - path: apps/*/services\n    level: 1\n",
    );

    repo.cmd()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("  ✗ apps/b/services/baz"))
        .stderr(predicate::str::contains(
            "✗ 1 directory failed CODEOWNERS check",
        ))
        .stdout(predicate::str::contains("## ❌ CODEOWNERS Check Failed"))
        .stdout(predicate::str::contains(
            "/apps/b/services/baz/ @owner",
        ));
}

#[test]
fn dir_flags_replace_config() {
    let repo = glob_repo().file(
        ".requirecodeowners.yml",
        "directories:\n  - path: apps/*/services\n    level: 1\n",
    );

    repo.cmd()
        .args(["--dir", "apps/a/services:1"])
        .assert()
        .code(0);

    repo.cmd()
        .args(["--dir", "apps/a/services:1", "--dir", "missing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "directory does not exist. Create it or remove from --dir flags",
        ));
}

#[test]
fn json_output() {
    let repo = glob_repo();

    let output = repo
        .cmd()
        .args(["--dir", "apps/*/services:1", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["errors"].as_array().unwrap().len(), 1);
    assert_eq!(value["errors"][0]["path"], "apps/b/services/baz");
    assert_eq!(value["errors"][0]["reason"], "not_covered");
}

#[test]
fn explicit_codeowners_path() {
    let repo = Repo::new()
        .dir("src")
        .file("owners/RULES", "/src/ @team\n");
    let codeowners = repo.dir.path().join("owners/RULES");

    repo.cmd()
        .args(["--dir", "src"])
        .arg("--codeowners-path")
        .arg(&codeowners)
        .assert()
        .code(0);
}

#[test]
fn missing_codeowners_is_a_config_error() {
    let repo = Repo::new().dir("src");

    repo.cmd()
        .args(["--dir", "src"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "CODEOWNERS not found in standard locations",
        ));
}

#[test]
fn missing_config_is_a_config_error() {
    let repo = Repo::new().file("CODEOWNERS", "* @everyone\n");

    repo.cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("reading config file"));
}

#[test]
fn invalid_config_is_a_config_error() {
    let repo = Repo::new()
        .file("CODEOWNERS", "* @everyone\n")
        .file(
            ".requirecodeowners.yml",
            "directories:\n  - path: src\n    level: -1\n",
        );

    repo.cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "directory src has invalid level -1 (must be >= 0)",
        ));
}

#[test]
fn invalid_codeowners_is_a_config_error() {
    let repo = Repo::new()
        .dir("src")
        .file("CODEOWNERS", "/src/ team\n");

    repo.cmd()
        .args(["--dir", "src"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(":1: invalid owner: team"));
}

#[test]
fn negative_dir_flag_level_is_rejected() {
    cmd()
        .args(["--dir", "src:-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid level -1"));
}
