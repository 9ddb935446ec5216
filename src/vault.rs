//! Vault traversal and path-tag derivation
//!
//! Walks a note vault, collects the reference sets of folder-derived tags
//! under the three derivation policies, and computes the tag(s) a given note
//! should carry for its current location. The hidden configuration folder is
//! pruned everywhere; unreadable entries are skipped silently.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// Obsidian keeps its workspace configuration here; never traversed.
pub const CONFIG_DIR: &str = ".obsidian";

/// Stray script files inside a vault are never markdown candidates.
const SCRIPT_EXT: &str = "py";

fn not_config_dir(entry: &DirEntry) -> bool {
    entry.file_name().to_str() != Some(CONFIG_DIR)
}

fn walk(root: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(not_config_dir)
        .filter_map(|entry| entry.ok())
}

/// Replace spaces with underscores so folder names make valid tags.
pub fn clean_component(component: &str) -> String {
    component.replace(' ', "_")
}

fn rel_components(path: &Path, root: &Path) -> Vec<String> {
    path.strip_prefix(root)
        .map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

/// Every bare folder name anywhere under the root, unmodified.
pub fn folder_names(root: &Path) -> HashSet<String> {
    walk(root)
        .filter(|entry| entry.depth() > 0 && entry.file_type().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
        .collect()
}

/// Every folder's full relative path as a single slash-joined tag, spaces
/// replaced with underscores in each component.
pub fn nested_path_tags(root: &Path) -> HashSet<String> {
    let mut tags = HashSet::new();
    for entry in walk(root) {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            continue;
        }
        let parts: Vec<String> = rel_components(entry.path(), root)
            .iter()
            .map(|part| clean_component(part))
            .filter(|part| !part.is_empty())
            .collect();
        if !parts.is_empty() {
            tags.insert(parts.join("/"));
        }
    }
    tags
}

/// The first two relative path components of every folder, each as an
/// independent entry, spaces replaced with underscores.
pub fn prefix_tags(root: &Path) -> HashSet<String> {
    let mut tags = HashSet::new();
    for entry in walk(root) {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            continue;
        }
        for part in rel_components(entry.path(), root).iter().take(2) {
            let cleaned = clean_component(part);
            if !cleaned.is_empty() {
                tags.insert(cleaned);
            }
        }
    }
    tags
}

/// The note's full relative folder path as one slash-joined tag, or `None`
/// for a note sitting directly in the root.
pub fn nested_path_tag(file: &Path, root: &Path) -> Option<String> {
    let parent = file.parent()?;
    let parts: Vec<String> = rel_components(parent, root)
        .iter()
        .map(|part| clean_component(part))
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// The first two folder components of the note's location: zero, one, or two
/// tags depending on depth.
pub fn file_prefix_tags(file: &Path, root: &Path) -> Vec<String> {
    file.parent()
        .map(|parent| {
            rel_components(parent, root)
                .iter()
                .take(2)
                .map(|part| clean_component(part))
                .filter(|part| !part.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn is_markdown(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.path().extension().and_then(|ext| ext.to_str()) == Some("md")
}

/// Every `.md` file under the root, configuration folder excluded, in a
/// deterministic order.
pub fn markdown_files(root: &Path) -> Vec<PathBuf> {
    walk(root).filter(is_markdown).map(DirEntry::into_path).collect()
}

/// Markdown files below the root's immediate subdirectories. Notes directly
/// in the root are skipped, as are script files.
///
/// Depth is filtered after pruning: a depth limit on the walk itself would
/// hide the depth-1 configuration folder from the pruning predicate and let
/// its contents through.
pub fn markdown_files_in_subdirs(root: &Path) -> Vec<PathBuf> {
    walk(root)
        .filter(|entry| entry.depth() >= 2)
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) != Some(SCRIPT_EXT))
        .filter(is_markdown)
        .map(DirEntry::into_path)
        .collect()
}
