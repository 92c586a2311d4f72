//! Navigation table parsing.
//!
//! The docs index file carries a Markdown table between a `## Navigation`
//! heading and a `## Redirects` heading:
//!
//! ```text
//! ## Navigation
//!
//! | Level | Path | Navlink |
//! |--|--|--|
//! | 1 | tutorial | [Tutorial](/t/tutorial/12) |
//!
//! ## Redirects
//! ```
//!
//! Each row whose link column points at a Discourse topic (`/t/`) maps the
//! local file `{path}.md` to the topic ID, the last segment of the link.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::Error;

/// Section markers.
const NAVIGATION_START: &str = "## Navigation";
const NAVIGATION_END: &str = "## Redirects";

/// Marker of a Discourse topic link.
const TOPIC_PATH: &str = "/t/";

/// Column indices after splitting a row on `|`.
const LEVEL_COLUMN: usize = 1;
const PATH_COLUMN: usize = 2;
const TARGET_COLUMN: usize = 3;

/// One navigation row that maps a file to a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRow {
    pub level: String,
    pub path: String,
    pub target: String,
    pub topic_id: String,
}

impl NavRow {
    /// Local file name this row describes.
    pub fn filename(&self) -> String {
        format!("{}.md", self.path)
    }
}

/// Why a line inside the navigation section produced no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than four `|`-separated columns.
    TooFewColumns,
    /// Path column is blank.
    EmptyPath,
    /// Link column does not point at a Discourse topic.
    NotATopicLink,
    /// Link ends in `/` so no ID could be taken from it.
    EmptyTopicId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Entry(NavRow),
    Skipped(SkipReason),
}

/// Classify one line of the navigation section.
pub fn classify_row(line: &str) -> RowOutcome {
    let columns: Vec<&str> = line.split('|').collect();
    if columns.len() <= TARGET_COLUMN {
        return RowOutcome::Skipped(SkipReason::TooFewColumns);
    }

    let path = columns[PATH_COLUMN].trim();
    if path.is_empty() {
        return RowOutcome::Skipped(SkipReason::EmptyPath);
    }

    let target = columns[TARGET_COLUMN].trim();
    if !target.contains(TOPIC_PATH) {
        return RowOutcome::Skipped(SkipReason::NotATopicLink);
    }

    let topic_id = topic_id_from_target(target);
    if topic_id.is_empty() {
        return RowOutcome::Skipped(SkipReason::EmptyTopicId);
    }

    RowOutcome::Entry(NavRow {
        level: columns[LEVEL_COLUMN].trim().to_string(),
        path: path.to_string(),
        target: target.to_string(),
        topic_id: topic_id.to_string(),
    })
}

/// Extract the topic ID from a link such as `[Intro](/t/intro/42)`.
///
/// The final character (the closing `)` of a Markdown link) is dropped and the
/// last `/`-separated segment of the rest is the ID.
pub fn topic_id_from_target(target: &str) -> &str {
    let target = target.trim();
    let without_last = match target.char_indices().next_back() {
        Some((idx, _)) => &target[..idx],
        None => target,
    };
    without_last.rsplit('/').next().unwrap_or_default()
}

/// Local file name -> Discourse topic ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationMapping {
    entries: HashMap<String, String>,
}

impl NavigationMapping {
    /// Mapping holding only the index file itself.
    pub fn new(index_file: &str, index_topic_id: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(index_file.to_string(), index_topic_id.to_string());
        Self { entries }
    }

    /// Build the mapping from index file content.
    ///
    /// Only lines strictly between the navigation and redirects markers are
    /// considered. Later rows overwrite earlier ones with the same path.
    pub fn parse(content: &str, index_file: &str, index_topic_id: &str) -> Self {
        let mut mapping = Self::new(index_file, index_topic_id);
        let mut in_navigation = false;

        for (lineno, line) in content.lines().enumerate() {
            if line.contains(NAVIGATION_START) {
                in_navigation = true;
                continue;
            } else if line.contains(NAVIGATION_END) {
                in_navigation = false;
                continue;
            }
            if !in_navigation {
                continue;
            }

            match classify_row(line) {
                RowOutcome::Entry(row) => {
                    mapping.entries.insert(row.filename(), row.topic_id);
                }
                RowOutcome::Skipped(reason) => {
                    debug!(line = lineno + 1, ?reason, "Skipping navigation row");
                }
            }
        }

        mapping
    }

    /// Read and parse the index file at `path`.
    ///
    /// The index maps to its own topic under its file name, wherever it lives.
    pub fn from_file(path: &Path, index_topic_id: &str) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        let index_file = path
            .file_name()
            .unwrap_or(path.as_os_str())
            .to_string_lossy();
        let mapping = Self::parse(&content, &index_file, index_topic_id);
        debug!(path = %path.display(), entries = mapping.len(), "Loaded navigation mapping");
        Ok(mapping)
    }

    /// Topic ID for a local file name.
    pub fn get(&self, filename: &str) -> Option<&str> {
        self.entries.get(filename).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
