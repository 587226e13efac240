use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::parser::FileChange;

/// Aggregate line counts for a parsed diff.
///
/// # Examples
///
/// ```
/// use scenarist_difflens::parser::parse;
/// use scenarist_difflens::summary::DiffStats;
///
/// let files = parse("diff --git a/a.rs b/a.rs\n+x\n+y\n-z\n");
/// let stats = DiffStats::from_changes(&files);
/// assert_eq!(stats.total_files, 1);
/// assert_eq!(stats.total_additions, 2);
/// assert_eq!(stats.total_deletions, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStats {
    /// Number of file records.
    pub total_files: usize,
    /// Sum of added lines across files.
    pub total_additions: usize,
    /// Sum of deleted lines across files.
    pub total_deletions: usize,
}

impl DiffStats {
    pub fn from_changes(files: &[FileChange]) -> Self {
        Self {
            total_files: files.len(),
            total_additions: files.iter().map(|f| f.additions.len()).sum(),
            total_deletions: files.iter().map(|f| f.deletions.len()).sum(),
        }
    }
}

/// Per-file line counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    pub path: String,
    pub additions: usize,
    pub deletions: usize,
}

impl From<&FileChange> for FileAnalysis {
    fn from(change: &FileChange) -> Self {
        Self {
            path: change.path.clone(),
            additions: change.additions.len(),
            deletions: change.deletions.len(),
        }
    }
}

/// Render the plain-text change summary handed to the prompt builder.
///
/// Totals come first, then one `path (+adds, -dels)` line per file in
/// diff order.
///
/// # Examples
///
/// ```
/// use scenarist_difflens::parser::parse;
/// use scenarist_difflens::summary::summarize;
///
/// let files = parse("diff --git a/app.py b/app.py\n+def foo():\n-def bar():\n");
/// let summary = summarize(&files);
/// assert!(summary.contains("- Files changed: 1"));
/// assert!(summary.contains("- Lines added: 1"));
/// assert!(summary.contains("- Lines deleted: 1"));
/// assert!(summary.contains("  - app.py (+1, -1)"));
/// ```
pub fn summarize(files: &[FileChange]) -> String {
    let stats = DiffStats::from_changes(files);

    let mut out = String::new();
    out.push_str("Changes Summary:\n");
    let _ = writeln!(out, "- Files changed: {}", stats.total_files);
    let _ = writeln!(out, "- Lines added: {}", stats.total_additions);
    let _ = writeln!(out, "- Lines deleted: {}", stats.total_deletions);
    out.push_str("\nModified files:\n");
    for file in files {
        let _ = writeln!(out, "  - {file}");
    }
    out
}
