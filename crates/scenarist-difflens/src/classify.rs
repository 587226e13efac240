use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parser::FileChange;

/// One bucket of the fixed change taxonomy.
///
/// # Examples
///
/// ```
/// use scenarist_difflens::classify::ChangeCategory;
///
/// assert_eq!(ChangeCategory::NewFunctions.as_str(), "new_functions");
/// assert_eq!(ChangeCategory::ApiChanges.title(), "Api Changes");
/// assert_eq!(ChangeCategory::ALL.len(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    NewFunctions,
    /// Reserved; no rule populates it.
    ModifiedFunctions,
    /// Reserved; no rule populates it.
    DeletedFunctions,
    NewClasses,
    /// Reserved; no rule populates it.
    ModifiedClasses,
    ApiChanges,
    DatabaseChanges,
    ConfigChanges,
}

impl ChangeCategory {
    /// Every category, in declaration order.
    pub const ALL: [ChangeCategory; 8] = [
        ChangeCategory::NewFunctions,
        ChangeCategory::ModifiedFunctions,
        ChangeCategory::DeletedFunctions,
        ChangeCategory::NewClasses,
        ChangeCategory::ModifiedClasses,
        ChangeCategory::ApiChanges,
        ChangeCategory::DatabaseChanges,
        ChangeCategory::ConfigChanges,
    ];

    /// Snake-case identifier, e.g. `"api_changes"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeCategory::NewFunctions => "new_functions",
            ChangeCategory::ModifiedFunctions => "modified_functions",
            ChangeCategory::DeletedFunctions => "deleted_functions",
            ChangeCategory::NewClasses => "new_classes",
            ChangeCategory::ModifiedClasses => "modified_classes",
            ChangeCategory::ApiChanges => "api_changes",
            ChangeCategory::DatabaseChanges => "database_changes",
            ChangeCategory::ConfigChanges => "config_changes",
        }
    }

    /// Heading form, e.g. `"New Functions"`.
    pub fn title(self) -> &'static str {
        match self {
            ChangeCategory::NewFunctions => "New Functions",
            ChangeCategory::ModifiedFunctions => "Modified Functions",
            ChangeCategory::DeletedFunctions => "Deleted Functions",
            ChangeCategory::NewClasses => "New Classes",
            ChangeCategory::ModifiedClasses => "Modified Classes",
            ChangeCategory::ApiChanges => "Api Changes",
            ChangeCategory::DatabaseChanges => "Database Changes",
            ChangeCategory::ConfigChanges => "Config Changes",
        }
    }
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Findings grouped by [`ChangeCategory`].
///
/// Line-based categories hold `"<path>: <trimmed line>"`; database and
/// config categories hold bare paths.
///
/// # Examples
///
/// ```
/// use scenarist_difflens::classify::{ChangeCategory, ChangeTypeMap};
///
/// let map = ChangeTypeMap::default();
/// assert!(map.is_empty());
/// assert!(map.get(ChangeCategory::ConfigChanges).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeTypeMap {
    pub new_functions: Vec<String>,
    pub modified_functions: Vec<String>,
    pub deleted_functions: Vec<String>,
    pub new_classes: Vec<String>,
    pub modified_classes: Vec<String>,
    pub api_changes: Vec<String>,
    pub database_changes: Vec<String>,
    pub config_changes: Vec<String>,
}

impl ChangeTypeMap {
    /// Findings recorded under `category`.
    pub fn get(&self, category: ChangeCategory) -> &[String] {
        match category {
            ChangeCategory::NewFunctions => &self.new_functions,
            ChangeCategory::ModifiedFunctions => &self.modified_functions,
            ChangeCategory::DeletedFunctions => &self.deleted_functions,
            ChangeCategory::NewClasses => &self.new_classes,
            ChangeCategory::ModifiedClasses => &self.modified_classes,
            ChangeCategory::ApiChanges => &self.api_changes,
            ChangeCategory::DatabaseChanges => &self.database_changes,
            ChangeCategory::ConfigChanges => &self.config_changes,
        }
    }

    fn push(&mut self, category: ChangeCategory, finding: String) {
        let bucket = match category {
            ChangeCategory::NewFunctions => &mut self.new_functions,
            ChangeCategory::ModifiedFunctions => &mut self.modified_functions,
            ChangeCategory::DeletedFunctions => &mut self.deleted_functions,
            ChangeCategory::NewClasses => &mut self.new_classes,
            ChangeCategory::ModifiedClasses => &mut self.modified_classes,
            ChangeCategory::ApiChanges => &mut self.api_changes,
            ChangeCategory::DatabaseChanges => &mut self.database_changes,
            ChangeCategory::ConfigChanges => &mut self.config_changes,
        };
        bucket.push(finding);
    }

    /// Categories and their findings, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ChangeCategory, &[String])> + '_ {
        ChangeCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Only the categories that have at least one finding.
    pub fn non_empty(&self) -> impl Iterator<Item = (ChangeCategory, &[String])> + '_ {
        self.iter().filter(|(_, findings)| !findings.is_empty())
    }

    /// Total number of findings across all categories.
    pub fn len(&self) -> usize {
        self.iter().map(|(_, findings)| findings.len()).sum()
    }

    /// `true` when no category has a finding.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A line shape and the category it files matching additions under.
struct LineRule {
    category: ChangeCategory,
    patterns: Vec<Regex>,
}

impl LineRule {
    fn new(category: ChangeCategory, patterns: &[&str]) -> Self {
        Self {
            category,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("line rule regex is valid"))
                .collect(),
        }
    }

    fn matches(&self, line: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(line))
    }
}

/// Evaluated top to bottom; the first rule that matches claims the line.
static LINE_RULES: Lazy<Vec<LineRule>> = Lazy::new(|| {
    vec![
        LineRule::new(
            ChangeCategory::NewFunctions,
            &[
                r"^\s*def\s+\w+\s*\(",
                r"^\s*function\s+\w+\s*\(",
                r"^\s*const\s+\w+\s*=\s*\(.*\)\s*=>",
                r"^\s*(public|private|protected)?\s*(static)?\s*\w+\s+\w+\s*\(",
            ],
        ),
        LineRule::new(
            ChangeCategory::NewClasses,
            &[r"^\s*class\s+\w+", r"^\s*(public|private)?\s*class\s+\w+"],
        ),
        LineRule::new(
            ChangeCategory::ApiChanges,
            &[
                r"(?i)@app\.(get|post|put|delete|patch)",
                r"(?i)@(get|post|put|delete|patch)mapping",
                r"(?i)router\.(get|post|put|delete|patch)",
            ],
        ),
    ]
});

const CONFIG_SUFFIXES: &[&str] = &[".yml", ".yaml", ".json", ".env", ".config", ".ini", ".toml"];

const DATABASE_MARKERS: &[&str] = &["migration", "schema", "model", "entity", "repository"];

/// Bucket every file's additions and path into a [`ChangeTypeMap`].
///
/// Only additions are scanned. Each addition lands in at most one of
/// `new_functions`, `new_classes` and `api_changes`, tried in that order.
/// Path checks for config and database files are independent of each other
/// and of the line rules.
///
/// # Examples
///
/// ```
/// use scenarist_difflens::classify::classify;
/// use scenarist_difflens::parser::parse;
///
/// let files = parse("diff --git a/app.py b/app.py\n+def foo():\n-def bar():\n");
/// let map = classify(&files);
/// assert_eq!(map.new_functions, vec!["app.py: def foo():"]);
/// assert!(map.deleted_functions.is_empty());
/// ```
pub fn classify(files: &[FileChange]) -> ChangeTypeMap {
    let mut map = ChangeTypeMap::default();

    for file in files {
        for line in &file.additions {
            if let Some(rule) = LINE_RULES.iter().find(|rule| rule.matches(line)) {
                map.push(rule.category, format!("{}: {}", file.path, line.trim()));
            }
        }

        if is_config_file(&file.path) {
            map.push(ChangeCategory::ConfigChanges, file.path.clone());
        }
        if is_database_file(&file.path) {
            map.push(ChangeCategory::DatabaseChanges, file.path.clone());
        }
    }

    tracing::debug!(findings = map.len(), "classified changes");
    map
}

fn is_config_file(path: &str) -> bool {
    CONFIG_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

fn is_database_file(path: &str) -> bool {
    let lower = path.to_lowercase();
    DATABASE_MARKERS.iter().any(|marker| lower.contains(marker))
}
