//! Diff parsing and change classification.
//!
//! Turns raw unified-diff text into per-file change records, buckets the
//! added lines and touched paths into a fixed change taxonomy, and renders
//! the plain-text summary and reports built on top of them. Every function
//! here is total over its input.
pub mod classify;
pub mod parser;
pub mod report;
pub mod summary;

pub use classify::{classify, ChangeCategory, ChangeTypeMap};
pub use parser::{parse, FileChange};
pub use report::ChangeReport;
pub use summary::{summarize, DiffStats, FileAnalysis};
