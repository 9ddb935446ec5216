//! Per-note processing and whole-vault runs
//!
//! Content transforms are pure (text in, text out) so the write decision and
//! the reporting stay testable without touching a filesystem. The drivers
//! compute the reference tag set once, walk the vault sequentially, and treat
//! every per-note failure as skip-and-continue: a read, decode, or write
//! error is reported with its path and never aborts the run.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use serde_yaml::Mapping;

use crate::frontmatter::{self, FrontmatterError};
use crate::reconcile::{self, Reconciled, Stripped};
use crate::vault;

/// Error type for note processing
#[derive(Debug)]
pub enum SyncError {
    Io(io::Error),
    Frontmatter(FrontmatterError),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Io(e) => write!(f, "IO error: {}", e),
            SyncError::Frontmatter(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<io::Error> for SyncError {
    fn from(e: io::Error) -> Self {
        SyncError::Io(e)
    }
}

impl From<FrontmatterError> for SyncError {
    fn from(e: FrontmatterError) -> Self {
        SyncError::Frontmatter(e)
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// A rewrite produced for a single note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteUpdate {
    /// The full new note text.
    pub content: String,
    pub outcome: Reconciled,
    /// True when the note had no frontmatter and a fresh block was created.
    pub created: bool,
}

/// Counters for a whole-vault run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub processed: usize,
    pub changed: usize,
    pub errors: usize,
}

/// Strip folder-name tags from one note's text.
///
/// `None` means no tag matched and the note must not be rewritten. When the
/// tag list empties, the `tags` key is deleted; when that leaves the mapping
/// empty, the whole frontmatter block goes with it.
pub fn strip_content(
    content: &str,
    folder_names: &HashSet<String>,
) -> Result<Option<(String, Stripped)>> {
    let doc = frontmatter::parse(content)?;
    let Some(mut mapping) = doc.frontmatter else {
        return Ok(None);
    };
    if !frontmatter::has_tags(&mapping) {
        return Ok(None);
    }
    let existing = frontmatter::read_tags(&mapping);
    let Some(stripped) = reconcile::strip_folder_tags(&existing, folder_names) else {
        return Ok(None);
    };
    if stripped.kept.is_empty() {
        frontmatter::remove_tags(&mut mapping);
    } else {
        frontmatter::write_tags(&mut mapping, stripped.kept.clone());
    }
    Ok(Some((frontmatter::render(&mapping, &doc.body)?, stripped)))
}

/// Reconcile one note against its single nested path tag.
///
/// `None` means the note needs no rewrite: either nothing changed, or the
/// note has no frontmatter and no path tag is computable (in which case it
/// stays byte-identical). A note without frontmatter but with a computable
/// path tag gets a fresh block prepended.
pub fn nest_content(
    content: &str,
    current: Option<&str>,
    known_path_tags: &HashSet<String>,
) -> Result<Option<NoteUpdate>> {
    let doc = frontmatter::parse(content)?;
    match doc.frontmatter {
        Some(mut mapping) => {
            let existing = frontmatter::read_tags(&mapping);
            let outcome = reconcile::reconcile_nested(&existing, current, known_path_tags);
            if !outcome.changed() {
                return Ok(None);
            }
            frontmatter::write_tags(&mut mapping, outcome.tags.clone());
            Ok(Some(NoteUpdate {
                content: frontmatter::render(&mapping, &doc.body)?,
                outcome,
                created: false,
            }))
        }
        None => {
            let Some(tag) = current else {
                return Ok(None);
            };
            let mut mapping = Mapping::new();
            frontmatter::write_tags(&mut mapping, vec![tag.to_string()]);
            Ok(Some(NoteUpdate {
                content: frontmatter::render(&mapping, &doc.body)?,
                outcome: Reconciled {
                    tags: vec![tag.to_string()],
                    added: vec![tag.to_string()],
                    removed: Vec::new(),
                },
                created: true,
            }))
        }
    }
}

/// Rebuild one note's frontmatter around its two-level prefix tags.
///
/// Always produces new text: the block is rebuilt from scratch with only the
/// `tags` key, so any other frontmatter keys are discarded. Callers write the
/// result unconditionally; `outcome` is for reporting only.
pub fn prefix_content(
    content: &str,
    current: &[String],
    known_prefix_tags: &HashSet<String>,
) -> Result<NoteUpdate> {
    let doc = frontmatter::parse(content)?;
    let created = doc.frontmatter.is_none();
    let existing = doc
        .frontmatter
        .as_ref()
        .map(frontmatter::read_tags)
        .unwrap_or_default();
    let outcome = reconcile::reconcile_prefix(&existing, current, known_prefix_tags);
    let mut mapping = Mapping::new();
    frontmatter::write_tags(&mut mapping, outcome.tags.clone());
    Ok(NoteUpdate {
        content: frontmatter::render(&mapping, &doc.body)?,
        outcome,
        created,
    })
}

fn report_error(path: &Path, err: &SyncError) {
    eprintln!("{} {}: {}", "Error processing".red(), path.display(), err);
}

fn read_note(path: &Path, summary: &mut RunSummary) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            report_error(path, &SyncError::Io(err));
            summary.errors += 1;
            None
        }
    }
}

fn write_note(path: &Path, content: &str, summary: &mut RunSummary) -> bool {
    match fs::write(path, content) {
        Ok(()) => true,
        Err(err) => {
            report_error(path, &SyncError::Io(err));
            summary.errors += 1;
            false
        }
    }
}

fn print_summary(summary: &RunSummary, show_changed: bool) {
    println!("\n{}", "Summary:".bold());
    println!("Files processed: {}", summary.processed);
    if show_changed {
        println!("Files changed: {}", summary.changed);
    }
    if summary.errors > 0 {
        println!("Files skipped on error: {}", summary.errors);
    }
}

fn print_note_changes(root: &Path, path: &Path, update: &NoteUpdate) {
    let rel = path.strip_prefix(root).unwrap_or(path);
    println!("\n{} {}", "File:".cyan(), rel.display());
    if update.created {
        for tag in &update.outcome.added {
            println!("  Added initial path tag: {}", tag.green());
        }
        return;
    }
    for tag in &update.outcome.added {
        println!("  Added path tag: {}", tag.green());
    }
    if !update.outcome.removed.is_empty() {
        println!(
            "  Removed old path tags: {}",
            update.outcome.removed.join(", ").yellow()
        );
    }
}

/// Remove tags that duplicate folder names across the whole vault.
///
/// Destructive and one-way; callers are expected to confirm with the
/// operator before invoking this.
pub fn run_strip(root: &Path) -> RunSummary {
    let folder_names = vault::folder_names(root);
    let mut sorted: Vec<&str> = folder_names.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    println!("Found folders: {}", sorted.join(", "));

    let mut summary = RunSummary::default();
    for path in vault::markdown_files(root) {
        summary.processed += 1;
        let Some(content) = read_note(&path, &mut summary) else {
            continue;
        };
        match strip_content(&content, &folder_names) {
            Ok(Some((new_content, stripped))) => {
                if write_note(&path, &new_content, &mut summary) {
                    println!(
                        "{} {:?} from: {}",
                        "Removed folder tags".yellow(),
                        stripped.removed,
                        path.display()
                    );
                    summary.changed += 1;
                }
            }
            Ok(None) => {}
            Err(err) => {
                report_error(&path, &err);
                summary.errors += 1;
            }
        }
    }

    print_summary(&summary, true);
    summary
}

/// Tag every note with its full nested folder path.
pub fn run_nest(root: &Path) -> RunSummary {
    let known = vault::nested_path_tags(root);

    let mut summary = RunSummary::default();
    for path in vault::markdown_files(root) {
        summary.processed += 1;
        let Some(content) = read_note(&path, &mut summary) else {
            continue;
        };
        let current = vault::nested_path_tag(&path, root);
        match nest_content(&content, current.as_deref(), &known) {
            Ok(Some(update)) => {
                if write_note(&path, &update.content, &mut summary) {
                    print_note_changes(root, &path, &update);
                    summary.changed += 1;
                }
            }
            Ok(None) => {}
            Err(err) => {
                report_error(&path, &err);
                summary.errors += 1;
            }
        }
    }

    print_summary(&summary, false);
    summary
}

/// Tag every note with its first two folder levels, rebuilding frontmatter.
///
/// Writes every visited note unconditionally; notes directly in the vault
/// root are not visited at all.
pub fn run_prefix(root: &Path) -> RunSummary {
    let known = vault::prefix_tags(root);

    let mut summary = RunSummary::default();
    for path in vault::markdown_files_in_subdirs(root) {
        summary.processed += 1;
        let Some(content) = read_note(&path, &mut summary) else {
            continue;
        };
        let current = vault::file_prefix_tags(&path, root);
        match prefix_content(&content, &current, &known) {
            Ok(update) => {
                if write_note(&path, &update.content, &mut summary) && update.outcome.changed() {
                    print_note_changes(root, &path, &update);
                    summary.changed += 1;
                }
            }
            Err(err) => {
                report_error(&path, &err);
                summary.errors += 1;
            }
        }
    }

    print_summary(&summary, true);
    summary
}
