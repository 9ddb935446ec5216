//! Integration tests for the vault-tags CLI
//!
//! These tests exercise the full workflow against temporary vaults on disk.
//! They verify that commands work end-to-end without mocking.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Helper to run vault-tags against a vault root
fn run_vault_tags(args: &[&str], root: &Path) -> Output {
    let mut all_args: Vec<&str> = args.to_vec();
    let root_str = root.to_str().unwrap();
    all_args.push(root_str);
    Command::new(env!("CARGO_BIN_EXE_vault-tags"))
        .args(&all_args)
        .output()
        .expect("Failed to execute vault-tags")
}

/// Helper to get stdout as string
fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Build a small vault:
///
/// ```text
/// root/
///   inbox.md                  (no frontmatter)
///   Projects/
///     plan.md                 (tags: [urgent, Projects])
///     2024/
///       goals.md              (no frontmatter)
///   Daily Notes/
///     today.md                (tags + title)
///   .obsidian/
///     ignored.md
/// ```
fn make_vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("Projects/2024")).unwrap();
    fs::create_dir_all(root.join("Daily Notes")).unwrap();
    fs::create_dir_all(root.join(".obsidian")).unwrap();

    fs::write(root.join("inbox.md"), "# Inbox\n\nloose thoughts\n").unwrap();
    fs::write(
        root.join("Projects/plan.md"),
        "---\ntags:\n- urgent\n- Projects\n---\n# Plan\n",
    )
    .unwrap();
    fs::write(root.join("Projects/2024/goals.md"), "# Goals\n\nship it\n").unwrap();
    fs::write(
        root.join("Daily Notes/today.md"),
        "---\ntitle: Today\ntags:\n- journal\n---\nwoke up early\n",
    )
    .unwrap();
    fs::write(
        root.join(".obsidian/ignored.md"),
        "---\ntags:\n- Projects\n---\nconfig note\n",
    )
    .unwrap();
    dir
}

// =============================================================================
// Basic Command Tests
// =============================================================================

#[test]
fn test_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_vault-tags"))
        .arg("--help")
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("vault-tags"));
    assert!(out.contains("folder structure"));
}

#[test]
fn test_version_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_vault-tags"))
        .arg("--version")
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    assert!(stdout(&output).contains("vault-tags"));
}

// =============================================================================
// Shell Completion Tests
// =============================================================================

#[test]
fn test_completion_zsh() {
    let output = Command::new(env!("CARGO_BIN_EXE_vault-tags"))
        .args(["completion", "zsh"])
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    assert!(
        stdout(&output).contains("#compdef vault-tags"),
        "zsh completion should contain #compdef"
    );
}

#[test]
fn test_completion_bash() {
    let output = Command::new(env!("CARGO_BIN_EXE_vault-tags"))
        .args(["completion", "bash"])
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    let out = stdout(&output);
    // clap_complete mangles the hyphen in the function name
    assert!(
        out.contains("_vault__tags"),
        "bash completion should contain a _vault__tags function"
    );
    assert!(out.contains("vault-tags"));
}

// =============================================================================
// nest (single nested path tag)
// =============================================================================

#[test]
fn test_nest_creates_frontmatter_for_nested_note() {
    let dir = make_vault();
    let root = dir.path();
    let output = run_vault_tags(&["nest"], root);
    assert!(output.status.success());

    let goals = fs::read_to_string(root.join("Projects/2024/goals.md")).unwrap();
    assert_eq!(goals, "---\ntags:\n- Projects/2024\n---\n# Goals\n\nship it\n");
    assert!(stdout(&output).contains("Added initial path tag"));
}

#[test]
fn test_nest_leaves_root_note_byte_identical() {
    let dir = make_vault();
    let root = dir.path();
    let before = fs::read_to_string(root.join("inbox.md")).unwrap();

    let output = run_vault_tags(&["nest"], root);
    assert!(output.status.success());

    let after = fs::read_to_string(root.join("inbox.md")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_nest_preserves_custom_tags_and_other_keys() {
    let dir = make_vault();
    let root = dir.path();
    let output = run_vault_tags(&["nest"], root);
    assert!(output.status.success());

    let today = fs::read_to_string(root.join("Daily Notes/today.md")).unwrap();
    assert_eq!(
        today,
        "---\ntitle: Today\ntags:\n- Daily_Notes\n- journal\n---\nwoke up early\n"
    );
}

#[test]
fn test_nest_replaces_stale_path_tag_after_move() {
    let dir = make_vault();
    let root = dir.path();
    // Single string tag pointing at a folder the note no longer lives in
    fs::write(
        root.join("Projects/2024/moved.md"),
        "---\ntags: Projects\n---\nmoved here\n",
    )
    .unwrap();

    let output = run_vault_tags(&["nest"], root);
    assert!(output.status.success());

    let moved = fs::read_to_string(root.join("Projects/2024/moved.md")).unwrap();
    assert_eq!(moved, "---\ntags:\n- Projects/2024\n---\nmoved here\n");
}

#[test]
fn test_nest_is_idempotent() {
    let dir = make_vault();
    let root = dir.path();
    run_vault_tags(&["nest"], root);

    let snapshot: Vec<(String, String)> = ["inbox.md", "Projects/plan.md", "Projects/2024/goals.md", "Daily Notes/today.md"]
        .iter()
        .map(|rel| (rel.to_string(), fs::read_to_string(root.join(rel)).unwrap()))
        .collect();

    let output = run_vault_tags(&["nest"], root);
    assert!(output.status.success());
    // Second pass reports no per-file changes
    assert!(!stdout(&output).contains("File:"));

    for (rel, before) in snapshot {
        let after = fs::read_to_string(root.join(&rel)).unwrap();
        assert_eq!(before, after, "{} changed on second pass", rel);
    }
}

#[test]
fn test_nest_skips_config_dir() {
    let dir = make_vault();
    let root = dir.path();
    let before = fs::read_to_string(root.join(".obsidian/ignored.md")).unwrap();

    run_vault_tags(&["nest"], root);

    let after = fs::read_to_string(root.join(".obsidian/ignored.md")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_nest_reports_processed_count() {
    let dir = make_vault();
    let root = dir.path();
    let output = run_vault_tags(&["nest"], root);
    // inbox, plan, goals, today - the .obsidian note is not counted
    assert!(stdout(&output).contains("Files processed: 4"));
}

#[test]
fn test_nest_skips_note_with_bad_yaml_and_continues() {
    let dir = make_vault();
    let root = dir.path();
    let bad = "---\ntags: [unclosed\n---\nbody\n";
    fs::write(root.join("Projects/broken.md"), bad).unwrap();

    let output = run_vault_tags(&["nest"], root);
    assert!(output.status.success());

    // Broken note untouched, the rest still processed
    assert_eq!(fs::read_to_string(root.join("Projects/broken.md")).unwrap(), bad);
    let goals = fs::read_to_string(root.join("Projects/2024/goals.md")).unwrap();
    assert!(goals.starts_with("---\ntags:\n- Projects/2024\n---\n"));
}

// =============================================================================
// strip (remove folder-name tags)
// =============================================================================

#[test]
fn test_strip_removes_folder_name_tags() {
    let dir = make_vault();
    let root = dir.path();
    let output = run_vault_tags(&["strip", "--yes"], root);
    assert!(output.status.success());

    let plan = fs::read_to_string(root.join("Projects/plan.md")).unwrap();
    assert_eq!(plan, "---\ntags:\n- urgent\n---\n# Plan\n");
    assert!(stdout(&output).contains("Files changed: 1"));
}

#[test]
fn test_strip_never_adds_tags() {
    let dir = make_vault();
    let root = dir.path();
    run_vault_tags(&["strip", "--yes"], root);

    // Notes without matching tags are untouched
    let today = fs::read_to_string(root.join("Daily Notes/today.md")).unwrap();
    assert_eq!(today, "---\ntitle: Today\ntags:\n- journal\n---\nwoke up early\n");
    let inbox = fs::read_to_string(root.join("inbox.md")).unwrap();
    assert_eq!(inbox, "# Inbox\n\nloose thoughts\n");
}

#[test]
fn test_strip_drops_block_when_only_key_removed() {
    let dir = make_vault();
    let root = dir.path();
    fs::write(
        root.join("Projects/only-tag.md"),
        "---\ntags: Projects\n---\nbody\n",
    )
    .unwrap();

    run_vault_tags(&["strip", "--yes"], root);

    let note = fs::read_to_string(root.join("Projects/only-tag.md")).unwrap();
    assert_eq!(note, "body\n");
}

#[test]
fn test_strip_declined_confirmation_is_a_noop() {
    let dir = make_vault();
    let root = dir.path();
    let before = fs::read_to_string(root.join("Projects/plan.md")).unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_vault-tags"))
        .args(["strip", root.to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn vault-tags");
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(b"no\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("Operation cancelled."));
    let after = fs::read_to_string(root.join("Projects/plan.md")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_strip_accepts_yes_on_stdin() {
    let dir = make_vault();
    let root = dir.path();

    let mut child = Command::new(env!("CARGO_BIN_EXE_vault-tags"))
        .args(["strip", root.to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn vault-tags");
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(b"YES\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let plan = fs::read_to_string(root.join("Projects/plan.md")).unwrap();
    assert_eq!(plan, "---\ntags:\n- urgent\n---\n# Plan\n");
}

// =============================================================================
// prefix (two-level tags, rebuilt frontmatter)
// =============================================================================

#[test]
fn test_prefix_rebuilds_frontmatter_and_drops_title() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("Folder A/Sub B")).unwrap();
    fs::write(
        root.join("Folder A/Sub B/note.md"),
        "---\ntitle: X\ntags:\n- a\n---\nbody\n",
    )
    .unwrap();

    let output = run_vault_tags(&["prefix"], root);
    assert!(output.status.success());

    let note = fs::read_to_string(root.join("Folder A/Sub B/note.md")).unwrap();
    assert_eq!(note, "---\ntags:\n- Folder_A\n- Sub_B\n- a\n---\nbody\n");
}

#[test]
fn test_prefix_leaves_config_dir_files_untouched() {
    let dir = make_vault();
    let root = dir.path();
    let before = fs::read_to_string(root.join(".obsidian/ignored.md")).unwrap();

    let output = run_vault_tags(&["prefix"], root);
    assert!(output.status.success());

    let after = fs::read_to_string(root.join(".obsidian/ignored.md")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_prefix_skips_notes_in_root() {
    let dir = make_vault();
    let root = dir.path();
    let before = fs::read_to_string(root.join("inbox.md")).unwrap();

    let output = run_vault_tags(&["prefix"], root);
    assert!(output.status.success());

    assert_eq!(before, fs::read_to_string(root.join("inbox.md")).unwrap());
    // Root note is not even counted
    assert!(stdout(&output).contains("Files processed: 3"));
}

#[test]
fn test_prefix_takes_only_two_levels() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("A/B/C")).unwrap();
    fs::write(root.join("A/B/C/deep.md"), "deep\n").unwrap();

    run_vault_tags(&["prefix"], root);

    let deep = fs::read_to_string(root.join("A/B/C/deep.md")).unwrap();
    assert_eq!(deep, "---\ntags:\n- A\n- B\n---\ndeep\n");
}

#[test]
fn test_prefix_preserves_custom_tags() {
    let dir = make_vault();
    let root = dir.path();
    run_vault_tags(&["prefix"], root);

    let plan = fs::read_to_string(root.join("Projects/plan.md")).unwrap();
    // "Projects" was folder-derived and stays (still current); "urgent" is custom
    assert_eq!(plan, "---\ntags:\n- Projects\n- urgent\n---\n# Plan\n");
}
