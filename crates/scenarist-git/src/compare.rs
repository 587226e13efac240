use std::path::Path;

use git2::{Delta, Diff, DiffFindOptions, DiffFormat, DiffOptions, Repository, Tree};
use scenarist_core::{Result, ScenaristError};

/// Unified-diff text of the changes from `base` to `compare`.
///
/// Both revisions accept anything `git rev-parse` does: branch names, tags,
/// commit ids, `HEAD~2`. Renames are detected, so a moved file shows up under
/// its new path.
///
/// # Errors
///
/// Returns [`ScenaristError::Git`] if the repository cannot be opened, a
/// revision does not resolve to a tree, or the diff cannot be rendered.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use scenarist_git::diff_between;
///
/// let diff = diff_between(Path::new("."), "main", "feature/signup").unwrap();
/// println!("{diff}");
/// ```
pub fn diff_between(repo_path: &Path, base: &str, compare: &str) -> Result<String> {
    let repo = open(repo_path)?;
    let diff = tree_diff(&repo, base, compare)?;

    let mut out = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let content = String::from_utf8_lossy(line.content());
        match line.origin() {
            origin @ ('+' | '-' | ' ') => {
                out.push(origin);
                out.push_str(&content);
            }
            _ => out.push_str(&content),
        }
        true
    })
    .map_err(|e| ScenaristError::Git(format!("failed to render diff: {e}")))?;

    tracing::debug!(base, compare, bytes = out.len(), "computed repository diff");
    Ok(out)
}

/// Paths touched between `base` and `compare`.
///
/// Deleted files are reported under their old path, everything else under
/// the new one.
///
/// # Errors
///
/// Returns [`ScenaristError::Git`] under the same conditions as
/// [`diff_between`].
pub fn changed_files(repo_path: &Path, base: &str, compare: &str) -> Result<Vec<String>> {
    let repo = open(repo_path)?;
    let diff = tree_diff(&repo, base, compare)?;

    let paths = diff
        .deltas()
        .filter_map(|delta| {
            let file = match delta.status() {
                Delta::Deleted => delta.old_file(),
                _ => delta.new_file(),
            };
            file.path().map(|p| p.to_string_lossy().to_string())
        })
        .collect();
    Ok(paths)
}

fn open(repo_path: &Path) -> Result<Repository> {
    Repository::open(repo_path).map_err(|e| {
        ScenaristError::Git(format!(
            "'{}' is not a valid git repository: {e}",
            repo_path.display()
        ))
    })
}

fn resolve_tree<'r>(repo: &'r Repository, spec: &str) -> Result<Tree<'r>> {
    repo.revparse_single(spec)
        .and_then(|object| object.peel_to_tree())
        .map_err(|e| ScenaristError::Git(format!("failed to resolve '{spec}': {e}")))
}

fn tree_diff<'r>(repo: &'r Repository, base: &str, compare: &str) -> Result<Diff<'r>> {
    let base_tree = resolve_tree(repo, base)?;
    let compare_tree = resolve_tree(repo, compare)?;

    let mut diff_opts = DiffOptions::new();
    let mut diff = repo
        .diff_tree_to_tree(Some(&base_tree), Some(&compare_tree), Some(&mut diff_opts))
        .map_err(|e| ScenaristError::Git(format!("failed to compute diff: {e}")))?;

    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))
        .map_err(|e| ScenaristError::Git(format!("failed to find renames: {e}")))?;

    Ok(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{IndexAddOption, Oid, Signature};

    fn commit_all(repo: &Repository, message: &str) -> Oid {
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    fn fixture_repo() -> (tempfile::TempDir, Oid, Oid) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        std::fs::write(dir.path().join("app.py"), "def bar():\n    return 1\n").unwrap();
        std::fs::write(dir.path().join("old.txt"), "obsolete\n").unwrap();
        let first = commit_all(&repo, "initial");

        std::fs::write(dir.path().join("app.py"), "def foo():\n    return 1\n").unwrap();
        std::fs::write(dir.path().join("config.yaml"), "debug: true\n").unwrap();
        std::fs::remove_file(dir.path().join("old.txt")).unwrap();
        let second = commit_all(&repo, "rework");

        (dir, first, second)
    }

    #[test]
    fn diff_between_commits_is_parseable() {
        let (dir, first, second) = fixture_repo();
        let text = diff_between(dir.path(), &first.to_string(), &second.to_string()).unwrap();

        assert!(text.contains("diff --git a/app.py b/app.py"));
        let files = scenarist_difflens::parse(&text);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["app.py", "config.yaml", "old.txt"]);

        assert_eq!(files[0].additions, vec!["def foo():"]);
        assert_eq!(files[0].deletions, vec!["def bar():"]);
        assert_eq!(files[0].context, vec!["    return 1"]);
        assert_eq!(files[1].additions, vec!["debug: true"]);
        assert_eq!(files[2].deletions, vec!["obsolete"]);
    }

    #[test]
    fn head_resolves_as_revision() {
        let (dir, first, _) = fixture_repo();
        let text = diff_between(dir.path(), &first.to_string(), "HEAD").unwrap();
        assert!(text.contains("+def foo():"));
    }

    #[test]
    fn identical_revisions_give_empty_diff() {
        let (dir, _, _) = fixture_repo();
        let text = diff_between(dir.path(), "HEAD", "HEAD").unwrap();
        assert!(text.is_empty());
        assert!(scenarist_difflens::parse(&text).is_empty());
    }

    #[test]
    fn changed_files_lists_deleted_under_old_path() {
        let (dir, first, second) = fixture_repo();
        let files = changed_files(dir.path(), &first.to_string(), &second.to_string()).unwrap();
        assert_eq!(files, vec!["app.py", "config.yaml", "old.txt"]);
    }

    #[test]
    fn unknown_revision_is_a_git_error() {
        let (dir, _, _) = fixture_repo();
        let err = diff_between(dir.path(), "no-such-branch", "HEAD").unwrap_err();
        assert!(matches!(err, ScenaristError::Git(_)));
        assert!(err.to_string().contains("no-such-branch"));
    }

    #[test]
    fn non_repository_is_a_git_error() {
        let dir = tempfile::tempdir().unwrap();
        let result: scenarist_core::Result<String> = diff_between(dir.path(), "main", "HEAD");
        assert!(matches!(result, Err(ScenaristError::Git(_))));
        let listed: scenarist_core::Result<Vec<String>> = changed_files(dir.path(), "main", "HEAD");
        assert!(matches!(listed, Err(ScenaristError::Git(_))));
    }
}
