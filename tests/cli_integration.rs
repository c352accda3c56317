//! Integration tests for the `cascade` CLI.
//!
//! Each test writes markdown files into a temp directory, runs `cascade` as a
//! subprocess, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use insta::assert_snapshot;
use pretty_assertions::assert_eq;

/// Get the path to the built `cascade` binary.
fn cascade_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("cascade");
    path
}

/// Two-space indentation with both propagation features on.
fn write_space_config(root: &Path) {
    fs::write(
        root.join("cascade.toml"),
        r#"auto_complete_parent = true
mark_in_progress_on_partial = true

[indent]
use_tabs = false
tab_size = 2
"#,
    )
    .unwrap();
}

const TODO: &str = "\
# Release

- [ ] Ship 1.0
  - [x] Write changelog
  - [ ] Tag release
    - [ ] Push tag
- [ ] Announce
";

/// Run `cascade` with the given args in the given directory.
/// Returns (stdout, stderr, success).
fn run_cascade(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(cascade_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run cascade");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `cascade` expecting success, return stdout.
fn run_cascade_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_cascade(dir, args);
    if !success {
        panic!(
            "cascade {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

#[test]
fn test_set_completes_parent() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_space_config(tmp.path());
    fs::write(tmp.path().join("todo.md"), TODO).unwrap();

    let (out, err, ok) = run_cascade(tmp.path(), &["set", "todo.md", "5", "x"]);
    assert!(ok, "stderr: {}", err);
    assert_snapshot!(out, @r"
    # Release

    - [x] Ship 1.0
      - [x] Write changelog
      - [x] Tag release
        - [ ] Push tag
    - [ ] Announce
    ");
    assert!(err.contains("line 5: parent at line 3 completed"));

    // Without --write the file is untouched
    assert_eq!(fs::read_to_string(tmp.path().join("todo.md")).unwrap(), TODO);
}

#[test]
fn test_set_partial_marks_parent_in_progress() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_space_config(tmp.path());
    fs::write(tmp.path().join("todo.md"), TODO).unwrap();

    let out = run_cascade_ok(tmp.path(), &["set", "todo.md", "5", "/"]);
    assert!(out.contains("- [>] Ship 1.0\n  - [x] Write changelog\n  - [/] Tag release\n"));
}

#[test]
fn test_set_write() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_space_config(tmp.path());
    let file = tmp.path().join("todo.md");
    fs::write(&file, TODO).unwrap();

    let out = run_cascade_ok(tmp.path(), &["set", "todo.md", "5", "x", "--write"]);
    assert_eq!(out.trim(), "line 5: parent at line 3 completed");
    let written = fs::read_to_string(&file).unwrap();
    assert!(written.contains("- [x] Ship 1.0\n"));
    assert!(written.contains("  - [x] Tag release\n"));
}

#[test]
fn test_set_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_space_config(tmp.path());
    fs::write(tmp.path().join("todo.md"), TODO).unwrap();

    let out = run_cascade_ok(tmp.path(), &["set", "todo.md", "5", "x", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["outcome"], "updated");
    assert_eq!(parsed["child_line"], 5);
    assert_eq!(parsed["parent"]["line_number"], 3);
    assert_eq!(parsed["action"]["kind"], "complete-parent");
    assert_eq!(parsed["summary"]["all_completed"], true);
    assert!(
        parsed["document"]
            .as_str()
            .unwrap()
            .starts_with("# Release\n\n- [x] Ship 1.0")
    );
}

#[test]
fn test_set_top_level_task_has_no_parent() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_space_config(tmp.path());
    fs::write(tmp.path().join("todo.md"), TODO).unwrap();

    let out = run_cascade_ok(tmp.path(), &["set", "todo.md", "7", "x", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["outcome"], "no-parent");
    assert_eq!(parsed["child_line"], 7);
}

#[test]
fn test_set_with_explicit_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    let conf_dir = tmp.path().join("conf");
    fs::create_dir_all(&conf_dir).unwrap();
    fs::write(
        conf_dir.join("custom.toml"),
        "auto_complete_parent = false\nmark_in_progress_on_partial = false\n",
    )
    .unwrap();
    fs::write(tmp.path().join("todo.md"), TODO).unwrap();

    let out = run_cascade_ok(
        tmp.path(),
        &["set", "todo.md", "5", "x", "--json", "-c", "conf/custom.toml"],
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["outcome"], "skipped");
    assert_eq!(parsed["reason"], "disabled");
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

#[test]
fn test_apply_tab_indented_revisions() {
    // No config file: tabs are the default indent unit
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("old.md"), "- [ ] Parent\n\t- [x] A\n\t- [ ] B\n").unwrap();
    fs::write(tmp.path().join("new.md"), "- [ ] Parent\n\t- [x] A\n\t- [x] B\n").unwrap();

    let out = run_cascade_ok(tmp.path(), &["apply", "old.md", "new.md"]);
    assert_eq!(out, "- [x] Parent\n\t- [x] A\n\t- [x] B\n");
}

#[test]
fn test_apply_write_over_new() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("old.md"), "- [ ] Parent\n\t- [ ] A\n").unwrap();
    fs::write(tmp.path().join("new.md"), "- [ ] Parent\n\t- [x] A\n").unwrap();

    run_cascade_ok(tmp.path(), &["apply", "old.md", "new.md", "--write"]);
    assert_eq!(
        fs::read_to_string(tmp.path().join("new.md")).unwrap(),
        "- [x] Parent\n\t- [x] A\n"
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("old.md")).unwrap(),
        "- [ ] Parent\n\t- [ ] A\n"
    );
}

#[test]
fn test_apply_identical_revisions() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("old.md"), "- [ ] Parent\n\t- [x] A\n").unwrap();
    fs::write(tmp.path().join("new.md"), "- [ ] Parent\n\t- [x] A\n").unwrap();

    let out = run_cascade_ok(tmp.path(), &["apply", "old.md", "new.md", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["outcome"], "skipped");
    assert_eq!(parsed["reason"], "unchanged");
}

// ---------------------------------------------------------------------------
// parents
// ---------------------------------------------------------------------------

#[test]
fn test_parents_listing() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_space_config(tmp.path());
    fs::write(tmp.path().join("todo.md"), TODO).unwrap();

    let out = run_cascade_ok(tmp.path(), &["parents", "todo.md"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "   3 - [ ] Ship 1.0  (partial)",
            "   4   - [x] Write changelog  <- 3",
            "   5   - [ ] Tag release  <- 3  (not started)",
            "   6     - [ ] Push tag  <- 5",
            "   7 - [ ] Announce",
        ]
    );
}

#[test]
fn test_parents_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_space_config(tmp.path());
    fs::write(tmp.path().join("todo.md"), TODO).unwrap();

    let out = run_cascade_ok(tmp.path(), &["parents", "todo.md", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let nodes = parsed.as_array().unwrap();
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[0]["line"], 3);
    assert!(nodes[0].get("parent").is_none());
    assert_eq!(nodes[0]["children"]["has_any_child"], true);
    assert_eq!(nodes[3]["line"], 6);
    assert_eq!(nodes[3]["parent"], 5);
    assert_eq!(nodes[3]["indent"], 4);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_error_line_out_of_range() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("todo.md"), TODO).unwrap();

    let (_, err, ok) = run_cascade(tmp.path(), &["set", "todo.md", "99", "x"]);
    assert!(!ok);
    assert!(err.contains("error: line 99 is out of range"));
}

#[test]
fn test_error_not_a_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("todo.md"), TODO).unwrap();

    let (_, err, ok) = run_cascade(tmp.path(), &["set", "todo.md", "1", "x"]);
    assert!(!ok);
    assert!(err.contains("error: line 1 is not a task"));
}

#[test]
fn test_error_invalid_status() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("todo.md"), TODO).unwrap();

    let (_, err, ok) = run_cascade(tmp.path(), &["set", "todo.md", "3", "done"]);
    assert!(!ok);
    assert!(err.contains("status must be a single character"));
}

#[test]
fn test_error_missing_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, err, ok) = run_cascade(tmp.path(), &["parents", "nope.md"]);
    assert!(!ok);
    assert!(err.contains("error: could not read nope.md"));
}

#[test]
fn test_error_invalid_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("cascade.toml"), "[indent]\ntab_size = 0\n").unwrap();
    fs::write(tmp.path().join("todo.md"), TODO).unwrap();

    let (_, err, ok) = run_cascade(tmp.path(), &["parents", "todo.md"]);
    assert!(!ok);
    assert!(err.contains("tab_size"));
}
