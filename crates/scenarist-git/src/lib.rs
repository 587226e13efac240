//! Local repository comparison.
//!
//! Produces unified-diff text between two revisions of a git repository
//! using git2, in the same `diff --git` patch format the `git diff` command
//! prints, so it can be fed straight into the diff parser.

pub mod compare;

pub use compare::{changed_files, diff_between};
