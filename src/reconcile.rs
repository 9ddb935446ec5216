//! Tag reconciliation
//!
//! Pure set logic, no I/O. Given a note's existing tags and the tag(s)
//! derived from its current folder location, decide which tags survive,
//! which are added, and which previously folder-derived tags are dropped.
//! Membership in a reference set (all folder-derived tags reachable in the
//! vault) is what separates custom tags from path tags.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// Outcome of reconciling a note's tags against its folder location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciled {
    /// The tag list to write: deduplicated, sorted ascending.
    pub tags: Vec<String>,
    /// Path tags the note did not carry before.
    pub added: Vec<String>,
    /// Previously folder-derived tags that no longer apply.
    pub removed: Vec<String>,
}

impl Reconciled {
    /// Whether anything worth reporting happened. Variants that write
    /// conditionally use this as the write decision.
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Result of stripping folder-name tags from a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stripped {
    /// Surviving tags, original order preserved.
    pub kept: Vec<String>,
    /// Tags dropped because they matched a folder name.
    pub removed: Vec<String>,
}

/// Remove every tag whose literal value matches a folder name anywhere in
/// the vault. Returns `None` when nothing matched, meaning the note must not
/// be rewritten. Never adds a tag.
pub fn strip_folder_tags(existing: &[String], folder_names: &HashSet<String>) -> Option<Stripped> {
    let (removed, kept): (Vec<String>, Vec<String>) = existing
        .iter()
        .cloned()
        .partition(|tag| folder_names.contains(tag));
    if removed.is_empty() {
        None
    } else {
        Some(Stripped { kept, removed })
    }
}

/// Reconcile against a single nested path tag (full folder path, or none for
/// a note at the vault root).
///
/// The result is the note's custom tags plus the current path tag. An "added"
/// signal fires only when the current tag was not already present; a
/// "removed" signal fires only when old path tags exist and the current tag
/// is not among them. Old path tags are dropped from the result either way.
pub fn reconcile_nested(
    existing: &[String],
    current: Option<&str>,
    known_path_tags: &HashSet<String>,
) -> Reconciled {
    let mut custom: Vec<String> = Vec::new();
    let mut old_path: Vec<String> = Vec::new();
    for tag in existing {
        if known_path_tags.contains(tag) {
            old_path.push(tag.clone());
        } else {
            custom.push(tag.clone());
        }
    }

    let mut tags: BTreeSet<String> = custom.into_iter().collect();
    if let Some(tag) = current {
        tags.insert(tag.to_string());
    }

    let added = match current {
        Some(tag) if !existing.iter().any(|t| t == tag) => vec![tag.to_string()],
        _ => Vec::new(),
    };

    let stale = match current {
        Some(tag) => !old_path.iter().any(|t| t == tag),
        None => true,
    };
    let removed = if !old_path.is_empty() && stale {
        old_path
    } else {
        Vec::new()
    };

    Reconciled {
        tags: tags.into_iter().collect(),
        added,
        removed,
    }
}

/// Reconcile against two-level prefix tags (vault folder and immediate
/// subfolder, independently).
///
/// Custom tags are whatever is absent from the two-level reference set; the
/// result is their union with the note's current prefix tags. Added/removed
/// are for reporting only: callers of this variant rewrite unconditionally.
pub fn reconcile_prefix(
    existing: &[String],
    current: &[String],
    known_prefix_tags: &HashSet<String>,
) -> Reconciled {
    let mut tags: BTreeSet<String> = existing
        .iter()
        .filter(|tag| !known_prefix_tags.contains(tag.as_str()))
        .cloned()
        .collect();
    for tag in current {
        tags.insert(tag.clone());
    }

    let added = current
        .iter()
        .filter(|tag| !existing.iter().any(|t| &t == tag))
        .cloned()
        .collect();
    let removed = existing
        .iter()
        .filter(|tag| {
            known_prefix_tags.contains(tag.as_str()) && !current.iter().any(|c| &c == tag)
        })
        .cloned()
        .collect();

    Reconciled {
        tags: tags.into_iter().collect(),
        added,
        removed,
    }
}
