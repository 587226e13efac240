use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Captures the post-change path from a `diff --git a/<old> b/<new>` header.
static HEADER_PATHS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"a/(.*?) b/(.+)$").expect("header regex is valid"));

/// All added, deleted and context lines recorded for one file of a diff.
///
/// # Examples
///
/// ```
/// use scenarist_difflens::parser::parse;
///
/// let diff = "diff --git a/hello.py b/hello.py\n\
///             --- a/hello.py\n\
///             +++ b/hello.py\n\
///             @@ -1,2 +1,3 @@\n\
///             \x20import os\n\
///             +import sys\n";
/// let files = parse(diff);
/// assert_eq!(files.len(), 1);
/// assert_eq!(files[0].path, "hello.py");
/// assert_eq!(files[0].additions, vec!["import sys"]);
/// assert_eq!(files[0].context, vec!["import os"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Target-side path taken from the `b/` half of the header.
    pub path: String,
    /// Added lines without the leading `+`, in diff order.
    pub additions: Vec<String>,
    /// Removed lines without the leading `-`, in diff order.
    pub deletions: Vec<String>,
    /// Unchanged lines without the leading space, in diff order.
    pub context: Vec<String>,
}

impl FileChange {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (+{}, -{})",
            self.path,
            self.additions.len(),
            self.deletions.len()
        )
    }
}

/// Parse unified-diff text into one [`FileChange`] per `diff --git` header.
///
/// Parsing is permissive and never fails. Input is split on `\n` only, so a
/// trailing `\r` stays part of paths and line content. Unrecognized lines are
/// skipped and lines seen before the first recognized header are dropped.
/// Every `diff --git` line flushes the current file; when its paths cannot
/// be read, the flushed file also stays open, so it is emitted once more and
/// both copies carry every line collected for it. Records keep header order;
/// a repeated header yields a second record rather than a merge.
///
/// # Examples
///
/// ```
/// use scenarist_difflens::parser::parse;
///
/// assert!(parse("").is_empty());
/// assert!(parse("+orphan line\n").is_empty());
///
/// let files = parse("diff --git a/app.py b/app.py\n+def foo():\n-def bar():\n");
/// assert_eq!(files[0].additions, vec!["def foo():"]);
/// assert_eq!(files[0].deletions, vec!["def bar():"]);
/// ```
pub fn parse(input: &str) -> Vec<FileChange> {
    let mut files: Vec<FileChange> = Vec::new();
    let mut current: Option<OpenFile> = None;

    for line in input.split('\n') {
        if line.starts_with("diff --git") {
            let Some(path) = header_path(line) else {
                tracing::debug!(header = line, "unreadable diff header keeps current file open");
                if let Some(open) = current.as_mut() {
                    open.flushes += 1;
                }
                continue;
            };
            if let Some(open) = current.take() {
                open.finish(&mut files);
            }
            current = Some(OpenFile::new(path));
            continue;
        }

        let Some(file) = current.as_mut().map(|open| &mut open.change) else {
            continue;
        };

        if line.starts_with("+++") || line.starts_with("---") {
            continue;
        }

        if let Some(added) = line.strip_prefix('+') {
            file.additions.push(added.to_string());
        } else if let Some(removed) = line.strip_prefix('-') {
            file.deletions.push(removed.to_string());
        } else if let Some(unchanged) = line.strip_prefix(' ') {
            file.context.push(unchanged.to_string());
        }
    }

    if let Some(open) = current.take() {
        open.finish(&mut files);
    }

    tracing::debug!(files = files.len(), "parsed diff");
    files
}

/// The file being accumulated, plus how many unreadable headers flushed it
/// while it stayed open.
struct OpenFile {
    change: FileChange,
    flushes: usize,
}

impl OpenFile {
    fn new(path: &str) -> Self {
        Self {
            change: FileChange::new(path),
            flushes: 0,
        }
    }

    fn finish(self, files: &mut Vec<FileChange>) {
        files.extend(std::iter::repeat(self.change.clone()).take(self.flushes));
        files.push(self.change);
    }
}

fn header_path(line: &str) -> Option<&str> {
    HEADER_PATHS
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}
