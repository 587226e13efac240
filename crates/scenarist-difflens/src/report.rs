use std::fmt;

use serde::Serialize;

use crate::classify::{classify, ChangeTypeMap};
use crate::parser::FileChange;
use crate::summary::{summarize, DiffStats, FileAnalysis};

/// Everything the analyzer knows about a diff, ready for rendering.
///
/// # Examples
///
/// ```
/// use scenarist_difflens::parser::parse;
/// use scenarist_difflens::report::ChangeReport;
///
/// let files = parse("diff --git a/api.py b/api.py\n+@app.get(\"/ping\")\n");
/// let report = ChangeReport::build(&files, 10);
/// assert_eq!(report.stats.total_additions, 1);
/// assert_eq!(report.change_types.api_changes.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeReport {
    /// Totals across every file.
    pub stats: DiffStats,
    /// Per-file counts, truncated to the configured limit.
    pub files: Vec<FileAnalysis>,
    /// Categorized findings.
    pub change_types: ChangeTypeMap,
    /// Plain-text summary used in prompts.
    pub summary: String,
}

impl ChangeReport {
    /// Build a report, listing at most `max_files` files individually.
    ///
    /// Totals and findings always cover every file.
    pub fn build(files: &[FileChange], max_files: usize) -> Self {
        Self {
            stats: DiffStats::from_changes(files),
            files: files.iter().take(max_files).map(FileAnalysis::from).collect(),
            change_types: classify(files),
            summary: summarize(files),
        }
    }

    /// `true` when the diff contained no file records.
    pub fn is_empty(&self) -> bool {
        self.stats.total_files == 0
    }

    fn hidden_files(&self) -> usize {
        self.stats.total_files.saturating_sub(self.files.len())
    }

    /// Render the report as a markdown string.
    ///
    /// # Examples
    ///
    /// ```
    /// use scenarist_difflens::report::ChangeReport;
    ///
    /// let report = ChangeReport::build(&[], 10);
    /// let md = report.to_markdown();
    /// assert!(md.contains("# Change Report"));
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Change Report\n\n");
        out.push_str(&format!(
            "**Summary:** {} files, +{} additions, -{} deletions\n\n",
            self.stats.total_files, self.stats.total_additions, self.stats.total_deletions
        ));

        if !self.files.is_empty() {
            out.push_str("| File | + | - |\n");
            out.push_str("|------|---|---|\n");
            for fa in &self.files {
                out.push_str(&format!(
                    "| `{}` | {} | {} |\n",
                    fa.path, fa.additions, fa.deletions
                ));
            }
            if self.hidden_files() > 0 {
                out.push_str(&format!("\n_{} more files not shown_\n", self.hidden_files()));
            }
            out.push('\n');
        }

        for (category, findings) in self.change_types.non_empty() {
            out.push_str(&format!("## {}\n\n", category.title()));
            for finding in findings {
                out.push_str(&format!("- `{finding}`\n"));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for ChangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Change Report")?;
        writeln!(f, "=============")?;

        if !self.files.is_empty() {
            writeln!(f, "{:<50} {:>6} {:>6}", "File", "+", "-")?;
            writeln!(f, "{}", "-".repeat(64))?;
            for fa in &self.files {
                writeln!(f, "{:<50} {:>6} {:>6}", fa.path, fa.additions, fa.deletions)?;
            }
            if self.hidden_files() > 0 {
                writeln!(f, "... {} more files", self.hidden_files())?;
            }
        }

        for (category, findings) in self.change_types.non_empty() {
            writeln!(f, "\n{} ({})", category.title(), findings.len())?;
            for finding in findings {
                writeln!(f, "  - {finding}")?;
            }
        }

        writeln!(
            f,
            "\nSummary: {} files, +{} additions, -{} deletions",
            self.stats.total_files, self.stats.total_additions, self.stats.total_deletions
        )
    }
}
