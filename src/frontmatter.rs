//! YAML Frontmatter Parser and Rewriter
//!
//! Detects the leading `---` delimited metadata block of a note, decodes it
//! into an order-preserving mapping, and renders it back around the document
//! body. Detection and decoding are separate phases so that "no frontmatter"
//! and "frontmatter that is not valid YAML" stay distinguishable.

use std::ops::Range;

use serde_yaml::{Mapping, Value};

/// Key under which a note's tags live.
pub const TAGS_KEY: &str = "tags";

/// Error type for frontmatter operations
#[derive(Debug)]
pub enum FrontmatterError {
    Yaml(serde_yaml::Error),
    NotAMapping(&'static str),
}

impl std::fmt::Display for FrontmatterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrontmatterError::Yaml(e) => write!(f, "YAML error: {}", e),
            FrontmatterError::NotAMapping(kind) => {
                write!(f, "frontmatter is not a mapping (found {})", kind)
            }
        }
    }
}

impl std::error::Error for FrontmatterError {}

impl From<serde_yaml::Error> for FrontmatterError {
    fn from(e: serde_yaml::Error) -> Self {
        FrontmatterError::Yaml(e)
    }
}

pub type Result<T> = std::result::Result<T, FrontmatterError>;

/// Byte spans of a detected frontmatter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSpan {
    /// The YAML text between the marker lines.
    pub block: Range<usize>,
    /// Where the document body begins, just past the closing marker.
    pub body_start: usize,
}

/// A note split into its optional frontmatter mapping and its body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// `None` when the note has no frontmatter block at all. A present but
    /// empty block decodes to an empty mapping.
    pub frontmatter: Option<Mapping>,
    /// Everything after the closing marker, untouched.
    pub body: String,
}

/// Locate a frontmatter block anchored at byte offset 0.
///
/// The document must open with exactly `---` on its own line; the block runs
/// to the first following line that starts with `---`. Marker lines elsewhere
/// in the document are never recognized.
pub fn detect_block(content: &str) -> Option<BlockSpan> {
    let after_open = content.strip_prefix("---\n")?;
    let close = after_open.find("\n---")?;
    let block_start = "---\n".len();
    Some(BlockSpan {
        block: block_start..block_start + close,
        body_start: block_start + close + "\n---".len(),
    })
}

/// Decode a frontmatter block into a mapping.
///
/// An empty block (YAML null) is an empty mapping; any other non-mapping
/// document is rejected.
pub fn decode(block: &str) -> Result<Mapping> {
    let value: Value = serde_yaml::from_str(block)?;
    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(FrontmatterError::NotAMapping(value_kind(&other))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Split a note into frontmatter and body.
pub fn parse(content: &str) -> Result<Document> {
    match detect_block(content) {
        Some(span) => Ok(Document {
            frontmatter: Some(decode(&content[span.block.clone()])?),
            body: content[span.body_start..].to_string(),
        }),
        None => Ok(Document {
            frontmatter: None,
            body: content.to_string(),
        }),
    }
}

/// Render a mapping and body back into note text.
///
/// Keys keep their insertion order. Leading whitespace on the body is
/// dropped so exactly one marker line separates block and body. An empty
/// mapping produces no block at all, only the body.
pub fn render(mapping: &Mapping, body: &str) -> Result<String> {
    if mapping.is_empty() {
        return Ok(body.trim_start().to_string());
    }
    let yaml = serde_yaml::to_string(mapping)?;
    Ok(format!("---\n{}---\n{}", yaml, body.trim_start()))
}

/// Read the `tags` field as a list of strings.
///
/// Absent or null tags are an empty list, a single scalar is a one-element
/// list, and scalar list entries are stringified. Non-scalar entries are
/// ignored.
pub fn read_tags(mapping: &Mapping) -> Vec<String> {
    match mapping.get(&Value::from(TAGS_KEY)) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(entries)) => entries.iter().filter_map(scalar_string).collect(),
        Some(other) => scalar_string(other).into_iter().collect(),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Write `tags` as a string list. An existing key keeps its position in the
/// mapping; a new key lands at the end.
pub fn write_tags(mapping: &mut Mapping, tags: Vec<String>) {
    let entries = tags.into_iter().map(Value::String).collect();
    mapping.insert(Value::from(TAGS_KEY), Value::Sequence(entries));
}

/// Drop the `tags` key. Returns whether it was present.
pub fn remove_tags(mapping: &mut Mapping) -> bool {
    mapping.remove(&Value::from(TAGS_KEY)).is_some()
}

/// Whether the mapping carries a `tags` key at all.
pub fn has_tags(mapping: &Mapping) -> bool {
    mapping.contains_key(&Value::from(TAGS_KEY))
}
