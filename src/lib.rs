//! vault-tags - Keep vault tags in sync with folder structure
//!
//! Notes in an Obsidian-style vault carry a YAML frontmatter `tags` field.
//! This crate derives tags from a note's folder location, reconciles them
//! with hand-written tags, and rewrites notes in place.
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `nest` | Tag each note with its full folder path (`Projects/2024`) |
//! | `prefix` | Tag each note with its first two folder levels; rebuilds frontmatter |
//! | `strip` | Remove tags that duplicate folder names (irreversible) |
//!
//! Hand-written tags always survive: a tag is only treated as folder-derived
//! when it appears in the reference set collected from the vault's actual
//! folder tree, so renaming or moving a note never loses the tags a person
//! typed in.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use vault_tags::sync;
//!
//! let summary = sync::run_nest(Path::new("my-vault"));
//! println!("processed {} notes, changed {}", summary.processed, summary.changed);
//! ```

pub mod frontmatter;
pub mod reconcile;
pub mod sync;
pub mod vault;

pub use frontmatter::{Document, FrontmatterError};
pub use reconcile::{reconcile_nested, reconcile_prefix, strip_folder_tags, Reconciled, Stripped};
pub use sync::{NoteUpdate, RunSummary, SyncError};
