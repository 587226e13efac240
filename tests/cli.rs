use std::io::Write;
use std::process::{Command, Output, Stdio};

const DIFF: &str = "\
diff --git a/app/routes.py b/app/routes.py
--- a/app/routes.py
+++ b/app/routes.py
@@ -1,2 +1,5 @@
 from flask import Flask
+@app.post(\"/users\")
+def create_user():
+    return {}
diff --git a/config.yaml b/config.yaml
--- a/config.yaml
+++ b/config.yaml
@@ -1 +1 @@
-debug: true
+debug: false
";

fn scenarist(dir: &std::path::Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_scenarist"))
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    // Commands that fail early never read stdin.
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "scenarist failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn analyze_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout(&scenarist(dir.path(), &["analyze"], DIFF));
    assert!(out.contains("Change Report"));
    assert!(out.contains("app/routes.py"));
    assert!(out.contains("Config Changes (1)"));
    assert!(out.contains("Summary: 2 files, +4 additions, -1 deletions"));
}

#[test]
fn analyze_json_has_report_shape() {
    let dir = tempfile::tempdir().unwrap();
    let patch = dir.path().join("changes.patch");
    std::fs::write(&patch, DIFF).unwrap();

    let out = stdout(&scenarist(
        dir.path(),
        &["analyze", "--file", "changes.patch", "--format", "json"],
        "",
    ));
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["stats"]["totalFiles"], 2);
    assert_eq!(json["stats"]["totalAdditions"], 4);
    assert_eq!(json["changeTypes"]["api_changes"][0], "app/routes.py: @app.post(\"/users\")");
    assert!(json["changeTypes"]["deleted_functions"].as_array().unwrap().is_empty());
    assert!(json["generatedAt"].is_string());
}

#[test]
fn empty_diff_prints_notice() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout(&scenarist(dir.path(), &["analyze"], "not a diff\n"));
    assert!(out.contains("No file changes found"));
}

#[test]
fn config_limits_listed_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".scenarist.toml"), "[report]\nmax_files = 1\n").unwrap();
    let out = stdout(&scenarist(dir.path(), &["analyze"], DIFF));
    assert!(out.contains("... 1 more files"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.toml"), "[prompt]\nmax_files = 0\n").unwrap();
    let output = scenarist(dir.path(), &["analyze", "--config", "bad.toml"], DIFF);
    assert!(!output.status.success());
}

#[test]
fn prompt_includes_pr_context_and_findings() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout(&scenarist(
        dir.path(),
        &["prompt", "--title", "Add user creation"],
        DIFF,
    ));
    assert!(out.contains("## Pull Request Context\nTitle: Add user creation\nDescription: N/A"));
    assert!(out.contains("### Api Changes\n- app/routes.py: @app.post(\"/users\")"));
    assert!(out.contains("### File: config.yaml"));
    assert!(out.contains("## Your Task"));
}

#[cfg(unix)]
#[test]
fn generate_runs_command_and_writes_document() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout(&scenarist(
        dir.path(),
        &[
            "generate",
            "--command",
            "echo '1. create_user returns an empty object'",
            "--with-code",
            "--output",
            "TESTS.md",
        ],
        DIFF,
    ));
    assert!(out.contains("Wrote TESTS.md"));

    let doc = std::fs::read_to_string(dir.path().join("TESTS.md")).unwrap();
    assert!(doc.starts_with("# Generated Test Scenarios"));
    assert!(doc.contains("- Files changed: 2"));
    assert!(doc.contains("1. create_user returns an empty object"));
    assert!(doc.contains("# Generated Test Code"));
}

#[test]
fn generate_without_command_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = scenarist(dir.path(), &["generate"], DIFF);
    assert!(!output.status.success());
}

#[test]
fn codegen_prompt_uses_flags_over_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("scenarios.md"), "1. login works\n").unwrap();
    let out = stdout(&scenarist(
        dir.path(),
        &["codegen-prompt", "--scenarios", "scenarios.md", "--language", "rust"],
        "",
    ));
    assert!(out.contains("written in rust using pytest"));
    assert!(out.contains("1. login works"));
}
